//! User model -> entity mapper

use chat_core::entities::User;
use chat_core::value_objects::UserId;

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User::new(UserId::new(model.id), model.nickname)
    }
}
