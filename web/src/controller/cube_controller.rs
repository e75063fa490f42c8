use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::controller::ApiResponse;
use crate::{AppState, Error};
use domain::gateway::cube_cobra::extract_card_data_map;
use log::*;

/// GET a card's ELO rating within a CubeCobra cube.
///
/// The data field is null when the cube does not exist, the card is not in
/// the cube's rating map, or the upstream fetch failed; upstream failures
/// are logged server-side rather than surfaced.
#[utoipa::path(
    get,
    path = "/cubes/{cube_id}/cards/{card_name}/elo",
    params(
        ("cube_id" = String, Path, description = "CubeCobra cube id"),
        ("card_name" = String, Path, description = "Card name, matched case-insensitively")
    ),
    responses(
        (status = 200, description = "Rating lookup completed; data is null when unknown", body = Option<i64>)
    )
)]
pub async fn read_elo(
    Path((cube_id, card_name)): Path<(String, String)>,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET ELO for card {card_name} in cube {cube_id}");

    let elo = app_state.cube_client.card_elo(&card_name, &cube_id).await;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), elo)))
}

/// GET a card's normalized record within a CubeCobra cube.
///
/// Unlike the ELO lookup, a card present in the cube but missing a rating is
/// still returned, with its rating defaulted to 0.
#[utoipa::path(
    get,
    path = "/cubes/{cube_id}/cards/{card_name}",
    params(
        ("cube_id" = String, Path, description = "CubeCobra cube id"),
        ("card_name" = String, Path, description = "Card name, matched case-insensitively")
    ),
    responses(
        (status = 200, description = "Card lookup completed; data is null when unknown"),
        (status = 502, description = "CubeCobra is unreachable")
    )
)]
pub async fn read_card(
    Path((cube_id, card_name)): Path<(String, String)>,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET card data for {card_name} in cube {cube_id}");

    let card = match app_state.cube_client.fetch_cube(&cube_id).await? {
        Some(cube) => extract_card_data_map(&cube)
            .remove(&card_name.to_lowercase()),
        None => None,
    };

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), card)))
}
