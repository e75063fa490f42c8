use crate::connection::{ConnectionId, ConnectionRegistry};
use crate::message::{channel_name, DraftPickEvent, NEW_PICK_EVENT};
use axum::response::sse::Event;
use log::*;
use std::sync::Arc;

pub struct Manager {
    registry: Arc<ConnectionRegistry>,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
        }
    }

    /// Subscribe a connection to a draft session's broadcast channel and
    /// return its unique ID.
    pub fn register_connection(
        &self,
        session_id: &str,
        sender: tokio::sync::mpsc::Sender<Result<Event, std::convert::Infallible>>,
    ) -> ConnectionId {
        let channel = channel_name(session_id);
        info!("Registered new SSE connection on {channel} for {NEW_PICK_EVENT} events");
        self.registry.register(channel, sender)
    }

    /// Unregister a connection by ID
    pub fn unregister_connection(&self, connection_id: &ConnectionId) {
        info!("Unregistering SSE connection");
        self.registry.unregister(connection_id);
    }

    /// Serialize a pick event once and fan it out to every connection on the
    /// session's channel, as a bare `data: <json>` frame.
    pub fn publish_pick(&self, session_id: &str, pick: &DraftPickEvent) {
        let event_data = match serde_json::to_string(pick) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize pick event: {e}");
                return;
            }
        };

        let event = Event::default().data(event_data);
        self.registry
            .send_to_channel(&channel_name(session_id), event);
    }

    /// Number of live connections, across all sessions.
    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn pick_event(id: &str) -> DraftPickEvent {
        DraftPickEvent {
            id: id.to_string(),
            pick_number: 1,
            card_name: "Ponder".to_string(),
            card_set: "c18".to_string(),
            rarity: "common".to_string(),
            image_url: "https://cards.example/ponder.jpg".to_string(),
            team_name: "Dimir Deep Divers".to_string(),
            team_id: "team-1".to_string(),
        }
    }

    #[tokio::test]
    async fn publish_pick_delivers_one_event_per_subscriber() {
        let manager = Manager::new();

        let (tx_one, mut rx_one) = mpsc::channel(4);
        let (tx_two, mut rx_two) = mpsc::channel(4);
        manager.register_connection("S1", tx_one);
        manager.register_connection("S1", tx_two);
        assert_eq!(manager.connection_count(), 2);

        manager.publish_pick("S1", &pick_event("p1"));

        assert!(rx_one.try_recv().is_ok());
        assert!(rx_one.try_recv().is_err());
        assert!(rx_two.try_recv().is_ok());
    }

    #[tokio::test]
    async fn publish_pick_to_other_sessions_delivers_nothing() {
        let manager = Manager::new();

        let (tx, mut rx) = mpsc::channel(4);
        manager.register_connection("S1", tx);

        manager.publish_pick("S2", &pick_event("p1"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unregistered_connections_receive_nothing_further() {
        let manager = Manager::new();

        let (tx, mut rx) = mpsc::channel(4);
        let connection_id = manager.register_connection("S1", tx);

        manager.publish_pick("S1", &pick_event("p1"));
        manager.unregister_connection(&connection_id);
        manager.publish_pick("S1", &pick_event("p2"));

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
        assert_eq!(manager.connection_count(), 0);
    }
}
