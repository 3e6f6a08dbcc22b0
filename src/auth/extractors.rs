use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use tracing::warn;
use uuid::Uuid;

use crate::auth::claims::Role;
use crate::auth::cookies;
use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;

/// Identity proven by the session-token cookie. The role is taken from the
/// verified token only; the `role` cookie is never consulted.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let token = cookies::token_from_headers(&parts.headers)
            .ok_or_else(|| ApiError::Unauthenticated("No token provided".to_string()))?;

        let claims = keys.verify(&token).map_err(|e| {
            warn!(error = %e, "session token rejected");
            ApiError::Unauthenticated("Invalid token".to_string())
        })?;

        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

/// `AuthUser` narrowed to the admin role.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            warn!(user_id = %user.id, role = %user.role, "admin route rejected");
            return Err(ApiError::Forbidden("Forbidden action".to_string()));
        }
        Ok(AdminUser(user))
    }
}
