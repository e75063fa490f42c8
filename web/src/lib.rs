//! HTTP surface for the Dynasty Cube draft server: routing, controllers,
//! the live draft stream handler, and translation of domain errors into
//! HTTP status codes.

use domain::draft::DuplicateCardCache;
use domain::gateway::cube_cobra::CubeCobraClient;
use sea_orm::DatabaseConnection;
use service::config::Config;
use std::sync::Arc;

pub(crate) mod controller;
pub(crate) mod error;
pub mod router;
pub(crate) mod sse;

pub use error::{Error, Result};

/// Application state shared with every handler through the Router.
#[derive(Clone)]
pub struct AppState {
    pub service: service::AppState,
    pub sse_manager: Arc<::sse::Manager>,
    pub event_publisher: events::EventPublisher,
    pub cube_client: Arc<CubeCobraClient>,
    pub duplicate_cache: Arc<DuplicateCardCache>,
}

impl AppState {
    pub fn new(
        service: service::AppState,
        sse_manager: Arc<::sse::Manager>,
        event_publisher: events::EventPublisher,
        cube_client: Arc<CubeCobraClient>,
        duplicate_cache: Arc<DuplicateCardCache>,
    ) -> Self {
        Self {
            service,
            sse_manager,
            event_publisher,
            cube_client,
            duplicate_cache,
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.service.db_conn_ref()
    }

    pub fn config(&self) -> &Config {
        &self.service.config
    }
}
