//! Signup and login forms

use std::borrow::Cow;

use blog_core::User;
use validator::{Validate, ValidationError};

use super::{FormErrors, REQUIRED};

/// Account registration form
#[derive(Debug, Clone, Default, Validate)]
#[validate(schema(function = "passwords_match", skip_on_field_errors = false))]
pub struct SignupForm {
    #[validate(custom(function = "valid_username"))]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password1: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password2: String,
}

impl SignupForm {
    pub fn new(
        username: impl Into<String>,
        email: Option<String>,
        password1: impl Into<String>,
        password2: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into().trim().to_string(),
            email: email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
            password1: password1.into(),
            password2: password2.into(),
        }
    }

    pub fn check(&self) -> FormErrors {
        let mut errors = self.validate().map_or_else(FormErrors::from, |()| FormErrors::new());
        if !self.password1.is_empty() {
            if let Err(e) = blog_common::validate_password_strength(&self.password1) {
                errors.add("password1", validation_message(&e));
            }
        }
        errors
    }
}

/// Login form
#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
}

impl LoginForm {
    pub const INVALID_LOGIN: &'static str =
        "Please enter a correct username and password. Note that both fields may be case-sensitive.";

    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn check(&self) -> FormErrors {
        self.validate().map_or_else(FormErrors::from, |()| FormErrors::new())
    }
}

fn valid_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed(REQUIRED)));
    }
    if !User::is_valid_username(username) {
        return Err(ValidationError::new("invalid_username").with_message(Cow::Borrowed(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        )));
    }
    Ok(())
}

fn passwords_match(form: &SignupForm) -> Result<(), ValidationError> {
    if form.password1 != form.password2 {
        return Err(ValidationError::new("password_mismatch")
            .with_message(Cow::Borrowed("The two password fields didn't match.")));
    }
    Ok(())
}

/// Message of a validation `AppError` without its "Validation error:" prefix
fn validation_message(err: &blog_common::AppError) -> String {
    match err {
        blog_common::AppError::Validation(msg) => msg.clone(),
        other => other.to_string(),
    }
}
