//! Core use-case services.
//!
//! # Responsibility
//! - Enforce agenda and contact business rules above the repositories.
//! - Keep the HTTP layer decoupled from storage details.

pub mod agenda_service;
pub mod contact_service;
pub mod error;
