use async_stream::stream;
use axum::extract::{Path, State};
use axum::http::{header, HeaderName, StatusCode};
use axum::response::sse::{KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use log::*;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::AppState;
use ::sse::connection::ConnectionId;
use ::sse::Manager;

/// Unregisters the connection when the response stream is dropped, whether
/// the client disconnected or the server tore the stream down.
struct ConnectionGuard {
    manager: Arc<Manager>,
    connection_id: ConnectionId,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        debug!("SSE stream closed, cleaning up connection");
        self.manager.unregister_connection(&self.connection_id);
    }
}

/// SSE handler that establishes a long-lived connection for live draft
/// updates. One connection per draft board, held open for the life of the
/// board view; each recorded pick arrives as a bare `data: <json>` frame.
pub(crate) async fn draft_stream(
    Path(session_id): Path<String>,
    State(app_state): State<AppState>,
) -> Response {
    if session_id.trim().is_empty() {
        return missing_session().await.into_response();
    }

    debug!("Establishing SSE connection for draft session {session_id}");

    let (tx, mut rx) = mpsc::channel(app_state.config().sse_queue_capacity);

    let guard = ConnectionGuard {
        connection_id: app_state.sse_manager.register_connection(&session_id, tx),
        manager: app_state.sse_manager.clone(),
    };

    // The guard is moved into the stream so cleanup runs exactly when the
    // stream is dropped.
    let stream = stream! {
        let _guard = guard;
        while let Some(event) = rx.recv().await {
            yield event;
        }
    };

    // Proxies buffer SSE responses unless told not to.
    let headers = [
        (header::CACHE_CONTROL, "no-cache"),
        (HeaderName::from_static("x-accel-buffering"), "no"),
    ];

    (
        headers,
        Sse::new(stream).keep_alive(KeepAlive::default()),
    )
        .into_response()
}

/// Answers stream requests whose session segment is absent entirely, which
/// Axum would otherwise report as a routing miss.
pub(crate) async fn missing_session() -> impl IntoResponse {
    (StatusCode::BAD_REQUEST, "missing draft session identifier")
}
