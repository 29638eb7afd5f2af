//! Agenda handlers.
//!
//! POST   /agendas          create
//! GET    /agendas          paged list
//! GET    /agendas/{id}     fetch one
//! PUT    /agendas/{id}     rename
//! DELETE /agendas/{id}     delete (refused while contacts remain)

use crate::dto::{AgendaRequest, PageQuery, PageResponse};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use log::info;
use opencontact_core::{Agenda, AgendaSort};
use uuid::Uuid;

pub async fn create_agenda(
    State(state): State<AppState>,
    body: Result<Json<AgendaRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body?;
    let agenda = state
        .write(move |s| s.agendas.create(&request.name))
        .await?;

    info!(
        "event=agenda_create module=api status=ok agenda_id={}",
        agenda.id
    );
    let location = format!("/agendas/{}", agenda.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(agenda),
    ))
}

pub async fn list_agendas(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<PageResponse<Agenda>>, ApiError> {
    let Query(query) = query?;
    let request = query.to_request::<AgendaSort>()?;
    let page = state.read(move |s| s.agendas.find_all(&request)).await?;
    Ok(Json(page.into()))
}

pub async fn get_agenda(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Agenda>, ApiError> {
    let Path(id) = id?;
    let agenda = state.read(move |s| s.agendas.find_by_id(id)).await?;
    Ok(Json(agenda))
}

pub async fn update_agenda(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<AgendaRequest>, JsonRejection>,
) -> Result<Json<Agenda>, ApiError> {
    let Path(id) = id?;
    let Json(request) = body?;
    let agenda = state
        .write(move |s| s.agendas.update(id, &request.name))
        .await?;
    Ok(Json(agenda))
}

pub async fn delete_agenda(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.write(move |s| s.agendas.delete(id)).await?;

    info!("event=agenda_delete module=api status=ok agenda_id={id}");
    Ok(StatusCode::NO_CONTENT)
}
