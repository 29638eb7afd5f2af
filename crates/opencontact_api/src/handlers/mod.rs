//! Route handlers, one module per resource.
//!
//! Extractors are taken as `Result<_, Rejection>` so malformed bodies, ids
//! and queries answer with the API error body instead of axum's plain text.

pub mod agendas;
pub mod contacts;
pub mod health;
