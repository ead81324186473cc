// HTTP API routes
//
// This module contains all HTTP route handlers for the public API.
// Snippet, language and tag routes share one AppState.

pub mod common;
pub mod index;
pub mod metadata;
pub mod snippets;
pub mod validation;

// Re-export common types
pub use common::{ApiError, ErrorResponse, MessageResponse};
pub use snippets::AppState;
