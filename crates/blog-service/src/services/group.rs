//! Group service
//!
//! Groups are curated by operators; readers only list and browse them.

use blog_core::entities::Group;
use blog_core::DomainError;
use tracing::{info, instrument};

use crate::dto::{GroupOption, GroupView};
use crate::forms::FormErrors;

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct GroupService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GroupService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, description))]
    pub async fn create(&self, title: &str, slug: &str, description: &str) -> ServiceResult<Group> {
        let title = title.trim();
        let slug = slug.trim();

        let mut errors = FormErrors::new();
        if title.is_empty() || title.chars().count() > Group::MAX_TITLE_LEN {
            errors.add(
                "title",
                format!("Enter a title of 1 to {} characters.", Group::MAX_TITLE_LEN),
            );
        }
        if !Group::is_valid_slug(slug) {
            errors.add(
                "slug",
                "Enter a valid \u{201c}slug\u{201d} consisting of letters, numbers, underscores or hyphens.",
            );
        }
        errors.into_result()?;

        let group = Group::new(
            self.ctx.generate_id(),
            title.to_string(),
            slug.to_string(),
            description.trim().to_string(),
        );
        self.ctx.group_repo().create(&group).await?;

        info!(group_id = %group.id, slug = %group.slug, "Group created");
        Ok(group)
    }

    pub async fn list(&self) -> ServiceResult<Vec<GroupView>> {
        let groups = self.ctx.group_repo().list().await?;
        Ok(groups.iter().map(GroupView::from).collect())
    }

    /// Choices for the post form's group select box
    pub async fn options(&self) -> ServiceResult<Vec<GroupOption>> {
        let groups = self.ctx.group_repo().list().await?;
        Ok(groups.iter().map(GroupOption::from).collect())
    }

    /// Delete a group; its posts stay, without a group
    #[instrument(skip(self))]
    pub async fn delete(&self, slug: &str) -> ServiceResult<()> {
        let group = self
            .ctx
            .group_repo()
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::GroupNotFound(slug.to_string()))?;
        self.ctx.group_repo().delete(group.id).await?;

        info!(group_id = %group.id, "Group deleted");
        Ok(())
    }
}
