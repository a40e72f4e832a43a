//! Account service
//!
//! Signup, login and turning a session cookie back into a user.

use blog_common::auth::{hash_password, verify_password};
use blog_core::entities::User;
use blog_core::DomainError;
use tracing::{debug, info, instrument, warn};

use crate::dto::CurrentUser;
use crate::forms::{FormErrors, LoginForm, SignupForm};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user
    #[instrument(skip(self, form), fields(username = %form.username))]
    pub async fn signup(&self, form: &SignupForm) -> ServiceResult<User> {
        let mut errors = form.check();
        if !errors.has_field("username")
            && self.ctx.user_repo().username_exists(&form.username).await?
        {
            errors.add("username", USERNAME_TAKEN);
        }
        errors.into_result()?;

        let password_hash =
            hash_password(&form.password1).map_err(|e| ServiceError::internal(e.to_string()))?;
        let user = User::new(self.ctx.generate_id(), form.username.clone(), form.email.clone());

        match self.ctx.user_repo().create(&user, &password_hash).await {
            Ok(()) => {}
            Err(DomainError::UsernameTaken) => {
                return Err(ServiceError::field("username", USERNAME_TAKEN));
            }
            Err(e) => return Err(e.into()),
        }

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check credentials
    ///
    /// # Errors
    /// `InvalidForm` with a non-field message when the username or password
    /// is wrong
    #[instrument(skip(self, form), fields(username = %form.username))]
    pub async fn login(&self, form: &LoginForm) -> ServiceResult<User> {
        form.check().into_result()?;

        let Some(user) = self.ctx.user_repo().find_by_username(&form.username).await? else {
            warn!("Login failed: unknown username");
            return Err(invalid_login());
        };

        let Some(password_hash) = self.ctx.user_repo().get_password_hash(user.id).await? else {
            warn!(user_id = %user.id, "Login failed: no password hash");
            return Err(invalid_login());
        };

        let is_valid = verify_password(&form.password, &password_hash)
            .map_err(|e| ServiceError::internal(e.to_string()))?;
        if !is_valid {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(invalid_login());
        }

        info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// Signed token for the session cookie
    pub fn session_token(&self, user: &User) -> ServiceResult<String> {
        Ok(self.ctx.jwt_service().issue(user.id, &user.username)?)
    }

    /// Resolve a session token to its user. Bad, expired or orphaned tokens
    /// resolve to `None`, the request is then treated as anonymous.
    #[instrument(skip_all)]
    pub async fn resolve_session(&self, token: &str) -> ServiceResult<Option<CurrentUser>> {
        let claims = match self.ctx.jwt_service().verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "Ignoring session cookie");
                return Ok(None);
            }
        };
        let Ok(user_id) = claims.user_id() else {
            return Ok(None);
        };

        let user = self.ctx.user_repo().find_by_id(user_id).await?;
        Ok(user.as_ref().map(CurrentUser::from))
    }
}

fn invalid_login() -> ServiceError {
    let mut errors = FormErrors::new();
    errors.add_non_field(LoginForm::INVALID_LOGIN);
    ServiceError::InvalidForm(errors)
}
