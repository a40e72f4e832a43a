//! User model -> entity mapper

use blog_core::entities::User;
use blog_core::value_objects::Snowflake;

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            username: model.username,
            email: model.email,
            date_joined: model.date_joined,
        }
    }
}
