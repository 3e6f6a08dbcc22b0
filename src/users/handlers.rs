use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use tracing::{info, instrument, warn};

use crate::auth::cookies;
use crate::auth::extractors::{AdminUser, AuthUser};
use crate::auth::password::hash_password;
use crate::error::{is_unique_violation, ApiError};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::users::dto::{AdminDeleteRequest, UpdateUserRequest, UserData, UsersData};
use crate::users::repo_types::{User, UserChanges};

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserData>>, ApiError> {
    let user = User::find_by_id(&state.db, auth.id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %auth.id, "authenticated user no longer exists");
            ApiError::NotFound("User not found!".into())
        })?;

    Ok(Json(ApiResponse::new(
        "User fetched successfully!",
        UserData { user },
    )))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<ApiResponse<UsersData>>, ApiError> {
    let users = User::list_all(&state.db).await?;

    // An empty listing answers 404, kept from the previous deployment
    if users.is_empty() {
        return Err(ApiError::NotFound("No users found!".into()));
    }

    info!(admin_id = %admin.id, count = users.len(), "admin listed users");
    Ok(Json(ApiResponse::new(
        "All Users fetched successfully!",
        UsersData { users },
    )))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserData>>, ApiError> {
    let mut changes = UserChanges {
        name: payload.name.filter(|s| !s.is_empty()),
        email: payload
            .email
            .filter(|s| !s.is_empty())
            .map(|e| e.trim().to_lowercase()),
        bio: payload.bio.filter(|s| !s.is_empty()),
        image: payload.image.filter(|s| !s.is_empty()),
        password_hash: None,
    };

    if let Some(password) = payload.password.filter(|s| !s.is_empty()) {
        changes.password_hash = Some(hash_password(&password, &state.config.hashing)?);
    }

    if changes.is_empty() {
        warn!(user_id = %auth.id, "update with no fields");
        return Err(ApiError::Validation("No fields provided to update!".into()));
    }

    let user = match User::update(&state.db, auth.id, &changes).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(user_id = %auth.id, "update target missing");
            return Err(ApiError::NotFound("User not found!".into()));
        }
        Err(e) if is_unique_violation(&e) => {
            warn!(user_id = %auth.id, "update email already taken");
            return Err(ApiError::Conflict("Email already registered".into()));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %user.id, "user updated");
    Ok(Json(ApiResponse::new(
        "User updated successfully!",
        UserData { user },
    )))
}

#[instrument(skip(state))]
pub async fn delete_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<(HeaderMap, Json<ApiResponse<()>>), ApiError> {
    if !User::delete(&state.db, auth.id).await? {
        warn!(user_id = %auth.id, "delete target missing");
        return Err(ApiError::NotFound("User not found!".into()));
    }

    let cleared = cookies::clear_session_headers(state.config.cookie_secure)?;
    info!(user_id = %auth.id, "user deleted own account");
    Ok((
        cleared,
        Json(ApiResponse::message("User deleted successfully!")),
    ))
}

#[instrument(skip(state, payload))]
pub async fn admin_delete(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<AdminDeleteRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let target = payload
        .id
        .ok_or_else(|| ApiError::Validation("User ID is required!".into()))?;

    if !User::delete(&state.db, target).await? {
        warn!(admin_id = %admin.id, target_id = %target, "admin delete target missing");
        return Err(ApiError::NotFound("User not found!".into()));
    }

    info!(admin_id = %admin.id, target_id = %target, "admin deleted user");
    Ok(Json(ApiResponse::message("User deleted successfully!")))
}
