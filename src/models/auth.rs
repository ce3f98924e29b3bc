use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Form-encoded body for user registration.
///
/// Registration is form-encoded while login is JSON; the asymmetry is part of
/// the published interface and kept as-is.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterForm {
    /// Unique username (1-32 chars, alphanumeric and underscores).
    #[schema(example = "alice_wonder")]
    pub username: String,
    /// Unique email address.
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Password (8-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password1: String,
    /// Password confirmation; must match `password1`.
    #[schema(example = "s3cure_P@ss!")]
    pub password2: String,
}

pub fn validate_register_form(payload: &RegisterForm) -> Result<(), AppError> {
    let username = payload.username.trim();
    if username.is_empty() || username.chars().count() > 32 {
        return Err(AppError::Validation(
            "Username must be 1-32 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AppError::Validation(
            "Username must contain only letters, digits, and underscores".into(),
        ));
    }
    let email = payload.email.trim();
    let valid_email = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !email.chars().any(|c| c.is_whitespace())
        }
        None => false,
    };
    if !valid_email {
        return Err(AppError::Validation("Email address is not valid".into()));
    }
    if payload.password1.len() < 8 || payload.password1.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    if payload.password1 != payload.password2 {
        return Err(AppError::Validation("Passwords do not match".into()));
    }
    Ok(())
}

/// JSON body for user login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Username of the account to log into.
    #[schema(example = "alice_wonder")]
    pub username: String,
    /// Account password.
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

/// Successful registration response. The token establishes the new session.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    /// ID of the newly created user.
    #[schema(example = 42)]
    pub id: i32,
    /// Username of the newly created user.
    #[schema(example = "alice_wonder")]
    pub username: String,
    /// JWT bearer token for the new session.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// Always `"Login successful"`.
    #[schema(example = "Login successful")]
    pub detail: &'static str,
    /// JWT bearer token valid for 7 days.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Authenticated user's username.
    #[schema(example = "alice_wonder")]
    pub username: String,
}

/// Failed login response, kept bit-for-bit compatible with existing callers.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginFailure {
    /// Always `"Invalid username or password"`.
    #[schema(example = "Invalid username or password")]
    pub detail: &'static str,
}

/// Current authenticated user's profile.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    /// User ID.
    #[schema(example = 42)]
    pub id: i32,
    /// Username.
    #[schema(example = "alice_wonder")]
    pub username: String,
}
