use axum::extract::{FromRef, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::cookies;
use crate::auth::dto::{AuthData, LoginRequest, RegisterRequest};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::validate::{is_strong_password, is_valid_email};
use crate::error::{is_unique_violation, ApiError};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::users::repo_types::User;

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<ApiResponse<AuthData>>), ApiError> {
    let (name, email, password) = match (payload.name, payload.email, payload.password) {
        (Some(n), Some(e), Some(p)) => (n, e, p),
        _ => {
            warn!("register missing fields");
            return Err(ApiError::Validation("All fields are required".into()));
        }
    };

    let name = name.trim().to_string();
    let email = email.trim().to_lowercase();

    if name.len() < 2 {
        warn!("register name too short");
        return Err(ApiError::Validation(
            "Name must be at least 2 characters".into(),
        ));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "register invalid email");
        return Err(ApiError::Validation("Invalid email address".into()));
    }
    if !is_strong_password(&password) {
        warn!("register weak password");
        return Err(ApiError::Validation(
            "Password must be at least 8 characters and contain a letter, a number and a special character".into(),
        ));
    }

    // Pre-check for a friendlier message; the unique constraint is the
    // arbiter under concurrent registration
    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "register email already taken");
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let hash = hash_password(&password, &state.config.hashing)?;

    let user = match User::create(&state.db, Uuid::new_v4(), &name, &email, &hash).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %email, "register lost duplicate-email race");
            return Err(ApiError::Conflict("User already exists".into()));
        }
        Err(e) => return Err(e.into()),
    };

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, user.role)?;
    let headers = cookies::session_headers(&token, user.role, keys.ttl, state.config.cookie_secure)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        headers,
        Json(ApiResponse::new(
            "User created successfully",
            AuthData { user, token },
        )),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<ApiResponse<AuthData>>), ApiError> {
    let (email, password) = match (payload.email, payload.password) {
        (Some(e), Some(p)) => (e, p),
        _ => {
            warn!("login missing fields");
            return Err(ApiError::Validation("All fields are required".into()));
        }
    };

    let email = email.trim().to_lowercase();

    if !is_valid_email(&email) {
        warn!(email = %email, "login invalid email");
        return Err(ApiError::Validation("Invalid email address".into()));
    }

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| {
            warn!(email = %email, "login unknown email");
            ApiError::NotFound("User not found".into())
        })?;

    if !verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthenticated("Invalid password".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, user.role)?;
    let headers = cookies::session_headers(&token, user.role, keys.ttl, state.config.cookie_secure)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        headers,
        Json(ApiResponse::new(
            "User logged in successfully",
            AuthData { user, token },
        )),
    ))
}

#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<ApiResponse<()>>), ApiError> {
    if cookies::token_from_headers(&headers).is_none() {
        warn!("logout without session cookie");
        return Err(ApiError::Validation("User is not logged in!".into()));
    }

    let cleared = cookies::clear_session_headers(state.config.cookie_secure)?;
    info!("user logged out");
    Ok((
        cleared,
        Json(ApiResponse::message("User logged out successfully!")),
    ))
}
