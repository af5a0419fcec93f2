use crate::{errors::ApiError, types::User};

use super::client::WebApi;

impl WebApi {
    /// Profile of the user the token belongs to (`GET /me`).
    pub async fn get_current_user(&self, token: &str) -> Result<User, ApiError> {
        self.json(|| self.get(token, "me")).await
    }
}
