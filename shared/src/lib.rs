//! Shared types for the Tally backend
//!
//! Common types used by the server and clients: the unified error system,
//! the API response envelope, and the auth DTOs.

pub mod dto;
pub mod error;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
