//! Event system infrastructure for the Dynasty Cube draft server.
//!
//! This crate provides the event system that enables loose coupling between
//! domain logic and infrastructure concerns (like SSE notifications).
//!
//! # Architecture
//!
//! - **DomainEvent**: Enum representing all business events in the system
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! This crate has no dependencies on internal crates (entity, domain, etc.),
//! avoiding circular dependencies. Entity data is carried as serialized JSON
//! values.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Domain events that represent business-level changes in the system.
/// These events are emitted when domain operations complete successfully.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    /// Emitted once per draft pick written through the domain write path.
    /// Drives live draft-board updates over SSE.
    DraftPickRecorded {
        /// Draft session the pick belongs to; determines the broadcast
        /// channel subscribers receive it on.
        session_id: String,
        /// Complete serialized draft pick row. Carried as `serde_json::Value`
        /// to avoid a dependency on the entity crate.
        pick: Value,
    },
}

/// Trait for handling domain events.
/// Implementations can perform side effects like sending notifications,
/// updating caches, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers.
    /// Handlers are called sequentially in registration order.
    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct RecordingHandler {
        seen: Mutex<Vec<DomainEvent>>,
    }

    #[async_trait]
    impl EventHandler for RecordingHandler {
        async fn handle(&self, event: &DomainEvent) {
            self.seen.lock().unwrap().push(event.clone());
        }
    }

    #[tokio::test]
    async fn publish_reaches_every_registered_handler() {
        let first = Arc::new(RecordingHandler {
            seen: Mutex::new(Vec::new()),
        });
        let second = Arc::new(RecordingHandler {
            seen: Mutex::new(Vec::new()),
        });

        let publisher = EventPublisher::new()
            .with_handler(first.clone())
            .with_handler(second.clone());

        let event = DomainEvent::DraftPickRecorded {
            session_id: "S1".to_string(),
            pick: json!({"id": "p1", "card_name": "Ponder"}),
        };
        publisher.publish(event.clone()).await;

        assert_eq!(*first.seen.lock().unwrap(), vec![event.clone()]);
        assert_eq!(*second.seen.lock().unwrap(), vec![event]);
    }

    #[tokio::test]
    async fn publish_without_handlers_is_a_no_op() {
        let publisher = EventPublisher::new();
        publisher
            .publish(DomainEvent::DraftPickRecorded {
                session_id: "S1".to_string(),
                pick: json!({}),
            })
            .await;
    }
}
