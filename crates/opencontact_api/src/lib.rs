//! HTTP surface for OpenContact.
//!
//! # Responsibility
//! - Expose agenda/contact use-cases as a JSON REST API over axum.
//! - Translate service errors into status codes and a stable error body.
//!
//! # Invariants
//! - Handlers never touch SQL; every call goes through core services.
//! - Each request runs its use-case on the blocking pool with its own
//!   connection and transaction.

pub mod dto;
mod error;
mod handlers;
mod router;
mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
