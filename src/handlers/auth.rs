use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use sea_orm::*;
use tracing::instrument;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::form::AppForm;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    LoginFailure, LoginRequest, LoginResponse, MeResponse, RegisterForm, RegisterResponse,
    validate_register_form,
};
use crate::state::AppState;
use crate::utils::{hash, jwt};

/// Handle user registration.
///
/// Uniqueness is enforced by the database unique constraints; the explicit
/// existence checks only exist to give the friendlier of two possible errors.
/// A concurrent identical registration loses on the insert, not the check.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    operation_id = "register",
    summary = "Register a new user",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "User created, session established", body = RegisterResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Conflict (USERNAME_TAKEN, EMAIL_TAKEN)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn register(
    State(state): State<AppState>,
    AppForm(payload): AppForm<RegisterForm>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_form(&payload)?;

    let username = payload.username.trim().to_string();
    let email = payload.email.trim().to_string();

    if user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&state.db)
        .await?
        .is_some()
    {
        return Err(AppError::UsernameTaken);
    }
    if user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .is_some()
    {
        return Err(AppError::EmailTaken);
    }

    let hash = hash::hash_password(&payload.password1)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let new_user = user::ActiveModel {
        username: Set(username),
        email: Set(email),
        password: Set(hash),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let user = new_user.insert(&state.db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!("Registration race: unique constraint caught on insert");
            if detail.contains("email") {
                AppError::EmailTaken
            } else {
                AppError::UsernameTaken
            }
        }
        _ => AppError::from(e),
    })?;

    let token = jwt::sign(user.id, &user.username, &state.config.auth.jwt_secret)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            username: user.username,
            token,
        }),
    ))
}

/// Handle user login.
///
/// The response bodies are the historical `{"detail": ...}` shape, which
/// predates the structured error format and is relied upon by existing
/// callers: 200 on success, 400 for bad credentials with no distinction
/// between unknown user and wrong password. Internal failures return the
/// opaque 500 body; the detail is only logged.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid username or password", body = LoginFailure),
        (status = 500, description = "Internal error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Response, AppError> {
    let username = payload.username.trim();

    let user = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(&state.db)
        .await?;

    let Some(user) = user else {
        return Ok(login_failure());
    };

    let is_valid = hash::verify_password(&payload.password, &user.password)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;

    if !is_valid {
        return Ok(login_failure());
    }

    let token = jwt::sign(user.id, &user.username, &state.config.auth.jwt_secret)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(Json(LoginResponse {
        detail: "Login successful",
        token,
        username: user.username,
    })
    .into_response())
}

fn login_failure() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(LoginFailure {
            detail: "Invalid username or password",
        }),
    )
        .into_response()
}

/// Handle logout.
///
/// Sessions are stateless bearer tokens, so there is nothing to revoke
/// server-side; callers discard their token. No authentication required.
#[utoipa::path(
    get,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    operation_id = "logout",
    summary = "Log out",
    responses((status = 303, description = "Redirect to home")),
)]
pub async fn logout() -> Redirect {
    Redirect::to("/")
}

/// Return the current authenticated user's info.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    operation_id = "me",
    summary = "Current user",
    responses(
        (status = 200, description = "Current user info", body = MeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user), fields(user_id = auth_user.user_id))]
pub async fn me(auth_user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: auth_user.user_id,
        username: auth_user.username,
    })
}
