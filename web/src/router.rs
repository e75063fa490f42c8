use crate::controller::{
    cube_controller, draft_pick_controller, health_check_controller,
};
use crate::{sse, AppState};
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Dynasty Cube API"
        ),
        paths(
            health_check_controller::health_check,
            draft_pick_controller::create,
            draft_pick_controller::index,
            draft_pick_controller::duplicates,
            cube_controller::read_elo,
            cube_controller::read_card,
        ),
        components(
            schemas(
                domain::draft_picks::Model,
            )
        ),
        tags(
            (name = "dynasty_cube", description = "Dynasty Cube draft league API")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(draft_pick_routes(app_state.clone()))
        .merge(draft_stream_routes(app_state.clone()))
        .merge(cube_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

/// Builds the full application router with the CORS policy from the runtime
/// configuration applied on top.
pub fn init_router(app_state: AppState) -> Router {
    let allowed_origins: Vec<HeaderValue> = app_state
        .config()
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(allowed_origins);

    define_routes(app_state).layer(cors)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn draft_pick_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/drafts/duplicates", get(draft_pick_controller::duplicates))
        .route(
            "/drafts/:session_id/picks",
            post(draft_pick_controller::create),
        )
        .route(
            "/drafts/:session_id/picks",
            get(draft_pick_controller::index),
        )
        .with_state(app_state)
}

fn draft_stream_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/draft-stream/:session_id", get(sse::handler::draft_stream))
        // A stream request with no session segment at all is a client error,
        // not a routing miss.
        .route("/draft-stream", get(sse::handler::missing_session))
        .route("/draft-stream/", get(sse::handler::missing_session))
        .with_state(app_state)
}

fn cube_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/cubes/:cube_id/cards/:card_name/elo",
            get(cube_controller::read_elo),
        )
        .route(
            "/cubes/:cube_id/cards/:card_name",
            get(cube_controller::read_card),
        )
        .with_state(app_state)
}
