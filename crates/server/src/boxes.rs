//! Box entries API endpoints

use api_types::box_entry::{BoxEntry, BoxEntryNew, BoxImport, BoxList};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_box_type(kind: api_types::BoxType) -> engine::BoxType {
    match kind {
        api_types::BoxType::DoubleBox => engine::BoxType::DoubleBox,
        api_types::BoxType::FlushBox => engine::BoxType::FlushBox,
        api_types::BoxType::NormalBox => engine::BoxType::NormalBox,
    }
}

fn map_box_type_view(kind: engine::BoxType) -> api_types::BoxType {
    match kind {
        engine::BoxType::DoubleBox => api_types::BoxType::DoubleBox,
        engine::BoxType::FlushBox => api_types::BoxType::FlushBox,
        engine::BoxType::NormalBox => api_types::BoxType::NormalBox,
    }
}

fn map_draft(payload: BoxEntryNew) -> engine::EntryDraft {
    engine::EntryDraft {
        date: payload.date,
        box_type: map_box_type(payload.box_type),
        number_of_boxes: payload.number_of_boxes,
        total_cost: payload.total_cost,
        unit_cost: payload.unit_cost,
        unit_margin: payload.unit_margin,
        total_margin: payload.total_margin,
    }
}

fn map_view(entry: engine::Entry) -> BoxEntry {
    BoxEntry {
        id: entry.id,
        date: entry.date,
        box_type: map_box_type_view(entry.box_type),
        number_of_boxes: entry.number_of_boxes,
        total_cost: entry.total_cost,
        unit_cost: entry.unit_cost,
        unit_margin: entry.unit_margin,
        total_margin: entry.total_margin,
        created_at: entry.created_at,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<BoxList>, ServerError> {
    let entries = state.engine.list_entries().await?;

    Ok(Json(BoxList {
        entries: entries.into_iter().map(map_view).collect(),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BoxEntryNew>,
) -> Result<(StatusCode, Json<BoxEntry>), ServerError> {
    let entry = state.engine.insert_entry(map_draft(payload)).await?;

    Ok((StatusCode::CREATED, Json(map_view(entry))))
}

pub async fn import(
    State(state): State<ServerState>,
    Json(payload): Json<BoxImport>,
) -> Result<(StatusCode, Json<BoxList>), ServerError> {
    let drafts = payload.entries.into_iter().map(map_draft).collect();
    let entries = state.engine.insert_entries(drafts).await?;

    Ok((
        StatusCode::CREATED,
        Json(BoxList {
            entries: entries.into_iter().map(map_view).collect(),
        }),
    ))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BoxEntryNew>,
) -> Result<Json<BoxEntry>, ServerError> {
    let entry = state.engine.update_entry(id, map_draft(payload)).await?;

    Ok(Json(map_view(entry)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_entry(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
