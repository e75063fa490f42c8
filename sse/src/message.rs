use serde::{Deserialize, Serialize};

/// Broadcast event type draft boards subscribe to.
pub const NEW_PICK_EVENT: &str = "new_pick";

/// Deterministic broadcast channel name for a draft session.
pub fn channel_name(session_id: &str) -> String {
    format!("draft-updates-{session_id}")
}

/// A single draft pick as delivered to live draft boards.
///
/// The transport does not guarantee at-most-once delivery; consumers
/// deduplicate by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPickEvent {
    pub id: String,
    pub pick_number: i32,
    pub card_name: String,
    pub card_set: String,
    pub rarity: String,
    pub image_url: String,
    pub team_name: String,
    pub team_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_name_is_deterministic_per_session() {
        assert_eq!(channel_name("S1"), "draft-updates-S1");
        assert_eq!(channel_name("S1"), channel_name("S1"));
        assert_ne!(channel_name("S1"), channel_name("S2"));
    }

    #[test]
    fn pick_events_ignore_unknown_payload_fields() {
        // Payloads come from serialized draft pick rows, which carry more
        // columns than the event exposes.
        let event: DraftPickEvent = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "session_id": "S1",
            "pick_number": 3,
            "card_id": "card-9",
            "card_name": "Ponder",
            "card_set": "c18",
            "rarity": "common",
            "image_url": "https://cards.example/ponder.jpg",
            "team_name": "Dimir Deep Divers",
            "team_id": "11111111-2222-3333-4444-555555555555",
            "created_at": "2026-08-01T10:00:00Z"
        }))
        .expect("event should deserialize from a pick row");

        assert_eq!(event.id, "p1");
        assert_eq!(event.pick_number, 3);
        assert_eq!(event.team_name, "Dimir Deep Divers");
    }
}
