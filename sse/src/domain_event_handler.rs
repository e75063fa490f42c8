use crate::message::DraftPickEvent;
use crate::Manager;
use async_trait::async_trait;
use events::{DomainEvent, EventHandler};
use log::*;
use std::sync::Arc;

/// Handles domain events by converting them to SSE pick events and fanning
/// them out to the draft session's subscribers.
///
/// The domain layer decides what was recorded and on which session; this
/// handler only reshapes the payload and routes it.
pub struct SseDomainEventHandler {
    sse_manager: Arc<Manager>,
}

impl SseDomainEventHandler {
    pub fn new(sse_manager: Arc<Manager>) -> Self {
        Self { sse_manager }
    }
}

#[async_trait]
impl EventHandler for SseDomainEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        match event {
            DomainEvent::DraftPickRecorded { session_id, pick } => {
                debug!("Handling DraftPickRecorded event for session {session_id}");

                // The payload is a serialized draft pick row; the event type
                // exposes the subset draft boards render.
                let pick_event: DraftPickEvent = match serde_json::from_value(pick.clone()) {
                    Ok(pick_event) => pick_event,
                    Err(e) => {
                        error!("Malformed pick payload for session {session_id}: {e}");
                        return;
                    }
                };

                self.sse_manager.publish_pick(session_id, &pick_event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn pick_recorded_events_are_fanned_out_to_the_session() {
        let manager = Arc::new(Manager::new());
        let handler = SseDomainEventHandler::new(Arc::clone(&manager));

        let (tx, mut rx) = mpsc::channel(4);
        manager.register_connection("S1", tx);

        handler
            .handle(&DomainEvent::DraftPickRecorded {
                session_id: "S1".to_string(),
                pick: json!({
                    "id": "p1",
                    "pick_number": 1,
                    "card_name": "Ponder",
                    "card_set": "c18",
                    "rarity": "common",
                    "image_url": "https://cards.example/ponder.jpg",
                    "team_name": "Dimir Deep Divers",
                    "team_id": "team-1"
                }),
            })
            .await;

        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn malformed_payloads_are_dropped_without_panicking() {
        let manager = Arc::new(Manager::new());
        let handler = SseDomainEventHandler::new(Arc::clone(&manager));

        let (tx, mut rx) = mpsc::channel(4);
        manager.register_connection("S1", tx);

        handler
            .handle(&DomainEvent::DraftPickRecorded {
                session_id: "S1".to_string(),
                pick: json!({"id": "p1"}),
            })
            .await;

        assert!(rx.try_recv().is_err());
    }
}
