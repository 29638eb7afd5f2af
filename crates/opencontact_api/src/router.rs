//! Router construction for the OpenContact server.

use crate::handlers::{agendas, contacts, health};
use crate::state::AppState;
use axum::routing::get;
use axum::Router;

/// Builds the full axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/agendas",
            get(agendas::list_agendas).post(agendas::create_agenda),
        )
        .route(
            "/agendas/{id}",
            get(agendas::get_agenda)
                .put(agendas::update_agenda)
                .delete(agendas::delete_agenda),
        )
        .route(
            "/agendas/{id}/contacts",
            get(contacts::list_contacts)
                .post(contacts::create_contact)
                .delete(contacts::delete_contacts_by_prefix),
        )
        .route(
            "/contacts/{id}",
            get(contacts::get_contact)
                .put(contacts::update_contact)
                .delete(contacts::delete_contact),
        )
        .with_state(state)
}
