use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::repo_types::User;

/// Request body for partial profile update. Only provided fields change.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub password: Option<String>,
}

/// Request body for admin-initiated deletion.
#[derive(Debug, Deserialize)]
pub struct AdminDeleteRequest {
    pub id: Option<Uuid>,
}

/// Single-user payload.
#[derive(Debug, Serialize)]
pub struct UserData {
    pub user: User,
}

/// All-users payload for the admin listing.
#[derive(Debug, Serialize)]
pub struct UsersData {
    pub users: Vec<User>,
}
