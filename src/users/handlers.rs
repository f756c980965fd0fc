use axum::{
    extract::{FromRef, Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        jwt::JwtKeys,
        password::{hash_password, verify_password},
    },
    error::ApiError,
    response::ApiResponse,
    state::AppState,
    users::{
        dto::{BearerToken, LoginRequest, PublicUser, RegisterRequest, RegisteredUser},
        repo::User,
        validation::{validate_login, validate_registration},
    },
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/users/:username", get(get_profile))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
}

/// Username collisions win over email collisions when both apply.
fn duplicate_message(existing: &User, username: &str) -> &'static str {
    if existing.username == username {
        "Username already exists"
    } else {
        "Email already exists"
    }
}

#[instrument(skip(state))]
async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<PublicUser>>, ApiError> {
    let user = User::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(ApiResponse::success(user.into(), "User retrieved")))
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<RegisteredUser>>, ApiError> {
    let errors = validate_registration(&payload);
    if !errors.is_valid() {
        warn!(username = %payload.username, "registration payload rejected");
        return Err(ApiError::BadRequest(errors.message()));
    }

    if let Some(existing) =
        User::find_by_email_or_username(&state.db, &payload.email, &payload.username).await?
    {
        let message = duplicate_message(&existing, &payload.username);
        warn!(username = %payload.username, "registration conflict");
        return Err(ApiError::Conflict(message.into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::new(payload.username, payload.email, hash);
    let id = User::create(&state.db, &user).await?;

    info!(user_id = %id, username = %user.username, "user registered");
    Ok(Json(ApiResponse::success(
        RegisteredUser { id: id.to_hex() },
        "Registration successful",
    )))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<BearerToken>>, ApiError> {
    let errors = validate_login(&payload);
    if !errors.is_valid() {
        warn!(email = %payload.email, "login payload rejected");
        return Err(ApiError::BadRequest(errors.message()));
    }

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::NotFound("Email not found".into())
        })?;

    if !verify_password(&payload.password, &user.password) {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::IncorrectCredentials("Password incorrect".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&user)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(ApiResponse::success(
        BearerToken {
            token: format!("Bearer {token}"),
        },
        "Login successful",
    )))
}
