use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::controller::ApiResponse;
use crate::{AppState, Error};
use domain::draft as DraftApi;
use domain::draft::ScopedDuplicates;
use domain::draft_picks::Model;
use log::*;

/// POST record a new draft pick for a session.
///
/// This is the league's single write path for picks: it stores the row,
/// invalidates the duplicate-card cache, and pushes the pick to every
/// draft board streaming this session.
#[utoipa::path(
    post,
    path = "/drafts/{session_id}/picks",
    params(
        ("session_id" = String, Path, description = "Draft session id")
    ),
    request_body = domain::draft_picks::Model,
    responses(
        (status = 201, description = "Successfully recorded the draft pick", body = domain::draft_picks::Model),
        (status = 422, description = "Unprocessable Entity"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn create(
    Path(session_id): Path<String>,
    State(app_state): State<AppState>,
    Json(mut model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Record a New Draft Pick from: {model:?}");

    // The path owns the session identity; a mismatched body value is ignored.
    model.session_id = session_id;

    let pick = DraftApi::record_pick(
        app_state.db_conn_ref(),
        &app_state.duplicate_cache,
        &app_state.event_publisher,
        model,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), pick)))
}

/// GET all picks recorded for a session, ordered by pick number. Draft
/// boards call this to resync after an SSE reconnect.
#[utoipa::path(
    get,
    path = "/drafts/{session_id}/picks",
    params(
        ("session_id" = String, Path, description = "Draft session id")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the session's picks", body = [domain::draft_picks::Model]),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn index(
    Path(session_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all draft picks for session: {session_id}");

    let picks = DraftApi::pick_history(app_state.db_conn_ref(), &session_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), picks)))
}

/// GET the card ids picked more than once across the league, sorted for
/// deterministic output. Served from the process-level cache when warm.
#[utoipa::path(
    get,
    path = "/drafts/duplicates",
    responses(
        (status = 200, description = "Successfully retrieved the duplicate card ids", body = [String]),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn duplicates(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    debug!("GET duplicate card ids");

    let scoped = ScopedDuplicates::new();
    let duplicates = scoped
        .get(&app_state.duplicate_cache, app_state.db_conn_ref())
        .await?;

    let mut card_ids: Vec<String> = duplicates.iter().cloned().collect();
    card_ids.sort();

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), card_ids)))
}
