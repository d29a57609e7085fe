//! Axum extractor for [`CurrentUser`]
//!
//! Handlers take `user: CurrentUser` to require authentication. The global
//! auth middleware normally validated the token already and stashed the user
//! in request extensions; the header fallback covers routes mounted without
//! the middleware (tests, embedded routers).

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::CurrentUser;
use crate::auth::middleware::verify_bearer;
use crate::core::ServerState;
use shared::AppError;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let jwt_service = state.get_jwt_service();
        let user = verify_bearer(&jwt_service, &parts.headers, parts.uri.path())?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
