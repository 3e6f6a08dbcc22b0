use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::claims::Role;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // argon2 hash, never exposed in JSON
    pub bio: String,
    pub image: String,
    pub role: Role,
    pub is_verified: bool,
    pub created_at: OffsetDateTime,
}

/// Partial update applied to a user row. `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.bio.is_none()
            && self.image.is_none()
            && self.password_hash.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ann".into(),
            email: "ann@x.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            bio: "I'm a new user!".into(),
            image: "https://example.com/avatar.jpg".into(),
            role: Role::User,
            is_verified: false,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn serialized_user_never_contains_hash() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
        assert!(json.contains("ann@x.com"));
        assert!(json.contains(r#""role":"user""#));
    }

    #[test]
    fn empty_changes_detected() {
        assert!(UserChanges::default().is_empty());
        let changes = UserChanges {
            bio: Some("new bio".into()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
