use log::{error, info};
use service::{config::Config, logging::Logger};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    info!("Starting Dynasty Cube draft server...");

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let service_state = service::AppState::new(config.clone(), &db);

    let sse_manager = Arc::new(sse::Manager::new());
    let event_publisher = events::EventPublisher::new().with_handler(Arc::new(
        sse::domain_event_handler::SseDomainEventHandler::new(Arc::clone(&sse_manager)),
    ));

    let cube_client = match domain::gateway::cube_cobra::CubeCobraClient::new(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to build CubeCobra client: {e}");
            std::process::exit(1);
        }
    };
    let duplicate_cache = Arc::new(domain::draft::DuplicateCardCache::new());

    let app_state = web::AppState::new(
        service_state,
        sse_manager,
        event_publisher,
        cube_client,
        duplicate_cache,
    );

    let router = web::router::init_router(app_state.clone());

    let host = app_state
        .config()
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", host, app_state.config().port);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {addr}: {e}");
            std::process::exit(1);
        }
    };

    info!("Server listening on {addr}");

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}
