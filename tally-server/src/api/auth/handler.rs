//! Authentication Handlers

use std::time::Duration;

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use shared::dto::{LoginRequest, LoginResponse, UserInfo};
use shared::{AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login
///
/// Authenticates user credentials and returns a JWT token.
/// Failures use one unified error message to prevent username enumeration.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_username(&req.username)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) => {
            if !u.is_active {
                return Err(AppError::forbidden("Account has been disabled"));
            }

            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                tracing::warn!(username = %req.username, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            tracing::warn!(username = %req.username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user
        .id
        .as_ref()
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::internal("User record has no id"))?;

    let token = state
        .jwt_service
        .generate_token(&user_id, &user.username, user.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    tracing::info!(username = %user.username, "Login successful");

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: user_id,
            username: user.username,
            role: user.role.as_str().to_string(),
        },
    }))
}

/// GET /api/auth/me - echo the authenticated user
pub async fn me(user: CurrentUser) -> Json<UserInfo> {
    Json(UserInfo {
        id: user.id,
        username: user.username,
        role: user.role.as_str().to_string(),
    })
}
