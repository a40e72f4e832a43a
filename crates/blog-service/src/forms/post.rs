//! Post and comment forms

use blog_core::Snowflake;
use validator::Validate;

use super::{not_blank, FormErrors, UploadedFile};

/// Create/edit post form
#[derive(Debug, Clone, Default, Validate)]
pub struct PostForm {
    #[validate(custom(function = "not_blank"))]
    pub text: String,
    /// Raw select value: empty for no group, otherwise a group id
    pub group: String,
    pub image: Option<UploadedFile>,
    /// Edit only: drop the current image
    pub clear_image: bool,
}

/// Outcome of reading the group select box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupChoice {
    None,
    Id(Snowflake),
    Invalid,
}

impl PostForm {
    pub const INVALID_CHOICE: &'static str =
        "Select a valid choice. That choice is not one of the available choices.";

    pub fn new(text: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            group: group.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: Option<UploadedFile>) -> Self {
        self.image = image;
        self
    }

    pub fn group_choice(&self) -> GroupChoice {
        let raw = self.group.trim();
        if raw.is_empty() {
            return GroupChoice::None;
        }
        Snowflake::parse(raw).map_or(GroupChoice::Invalid, GroupChoice::Id)
    }

    /// Text with surrounding whitespace removed, as stored
    pub fn cleaned_text(&self) -> String {
        self.text.trim().to_string()
    }

    /// Field-level checks that need no database
    pub fn check(&self) -> FormErrors {
        let mut errors = self.validate().map_or_else(FormErrors::from, |()| FormErrors::new());
        if self.group_choice() == GroupChoice::Invalid {
            errors.add("group", Self::INVALID_CHOICE);
        }
        errors
    }
}

/// Comment form
#[derive(Debug, Clone, Default, Validate)]
pub struct CommentForm {
    #[validate(custom(function = "not_blank"))]
    pub text: String,
}

impl CommentForm {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn cleaned_text(&self) -> String {
        self.text.trim().to_string()
    }

    pub fn check(&self) -> FormErrors {
        self.validate().map_or_else(FormErrors::from, |()| FormErrors::new())
    }
}
