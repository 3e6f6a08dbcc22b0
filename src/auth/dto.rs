use serde::{Deserialize, Serialize};

use crate::users::repo_types::User;

/// Request body for user registration. Fields are optional so that missing
/// ones produce a field-level message instead of a body-level reject.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Payload returned after register and login: the user (hash stripped via
/// its serializer) plus the session token.
#[derive(Debug, Serialize)]
pub struct AuthData {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}
