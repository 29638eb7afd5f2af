//! Contact handlers.
//!
//! POST   /agendas/{id}/contacts               create in agenda
//! GET    /agendas/{id}/contacts               filtered, paged list
//! DELETE /agendas/{id}/contacts?namePrefix=   prefix bulk delete
//! GET    /contacts/{id}                       fetch one
//! PUT    /contacts/{id}                       replace fields
//! DELETE /contacts/{id}                       delete

use crate::dto::{ContactListQuery, DeletedResponse, PageResponse, PrefixDeleteQuery};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use log::info;
use opencontact_core::{Contact, ContactInfo, ContactSort};
use uuid::Uuid;

pub async fn create_contact(
    State(state): State<AppState>,
    agenda_id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<ContactInfo>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(agenda_id) = agenda_id?;
    let Json(info) = body?;
    let contact = state
        .write(move |s| s.contacts.create(agenda_id, &info))
        .await?;

    info!(
        "event=contact_create module=api status=ok agenda_id={agenda_id} contact_id={}",
        contact.id
    );
    let location = format!("/contacts/{}", contact.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(contact),
    ))
}

pub async fn list_contacts(
    State(state): State<AppState>,
    agenda_id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<ContactListQuery>, QueryRejection>,
) -> Result<Json<PageResponse<Contact>>, ApiError> {
    let Path(agenda_id) = agenda_id?;
    let Query(query) = query?;
    let request = query.to_request::<ContactSort>()?;
    let page = state
        .read(move |s| {
            s.contacts.find_all_by_criteria(
                agenda_id,
                query.name_contains.as_deref(),
                query.phone_contains.as_deref(),
                &request,
            )
        })
        .await?;
    Ok(Json(page.into()))
}

pub async fn delete_contacts_by_prefix(
    State(state): State<AppState>,
    agenda_id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<PrefixDeleteQuery>, QueryRejection>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let Path(agenda_id) = agenda_id?;
    let Query(query) = query?;
    let prefix = query.prefix()?.to_string();
    let deleted = state
        .write(move |s| s.contacts.delete_contacts_by_name_prefix(agenda_id, &prefix))
        .await?;
    Ok(Json(DeletedResponse { deleted }))
}

pub async fn get_contact(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Contact>, ApiError> {
    let Path(id) = id?;
    let contact = state.read(move |s| s.contacts.find_by_id(id)).await?;
    Ok(Json(contact))
}

pub async fn update_contact(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<ContactInfo>, JsonRejection>,
) -> Result<Json<Contact>, ApiError> {
    let Path(id) = id?;
    let Json(info) = body?;
    let contact = state.write(move |s| s.contacts.update(id, info)).await?;
    Ok(Json(contact))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.write(move |s| s.contacts.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
