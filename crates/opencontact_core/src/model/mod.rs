//! Domain model for agendas and the contacts they own.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the structural validation rules applied before persistence.
//!
//! # Invariants
//! - Every record is identified by a stable UUID generated at creation.
//! - A contact references its agenda by id only; agendas never hold a
//!   collection of contacts.

pub mod agenda;
pub mod contact;
pub mod validation;
