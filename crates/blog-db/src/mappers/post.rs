//! Post model -> entity mappers

use blog_core::entities::{Author, GroupLink, Post, PostSummary};
use blog_core::value_objects::Snowflake;

use crate::models::{PostModel, PostSummaryModel};

impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: Snowflake::new(model.id),
            text: model.text,
            pub_date: model.pub_date,
            author_id: Snowflake::new(model.author_id),
            group_id: model.group_id.map(Snowflake::new),
            image: model.image,
        }
    }
}

impl From<PostSummaryModel> for PostSummary {
    fn from(model: PostSummaryModel) -> Self {
        // LEFT JOIN: slug and title are present exactly when group_id is
        let group = match (model.group_id, model.group_slug, model.group_title) {
            (Some(id), Some(slug), Some(title)) => Some(GroupLink {
                id: Snowflake::new(id),
                slug,
                title,
            }),
            _ => None,
        };

        PostSummary {
            author: Author {
                id: Snowflake::new(model.author_id),
                username: model.author_username,
            },
            group,
            post: Post {
                id: Snowflake::new(model.id),
                text: model.text,
                pub_date: model.pub_date,
                author_id: Snowflake::new(model.author_id),
                group_id: model.group_id.map(Snowflake::new),
                image: model.image,
            },
        }
    }
}
