//! Server-Sent Events (SSE) infrastructure for live draft boards.
//!
//! This crate pushes draft pick events from the backend to connected draft
//! boards in real time.
//!
//! # Architecture
//!
//! - **One connection per draft board**: each client opens one SSE
//!   connection against its draft session and holds it for the life of the
//!   board view.
//! - **Dual-index registry**: O(1) lookups for both connection cleanup and
//!   session-scoped fan-out via separate DashMap indices.
//! - **Bounded per-connection queues**: the registry pushes events into a
//!   bounded channel; the response stream is the single consumer draining
//!   it, which gives an explicit backpressure and shutdown point. A slow
//!   consumer loses events rather than growing the queue.
//! - **Ephemeral messages**: events are not persisted here. A client that
//!   misses events resyncs its board from the pick history endpoint; the
//!   payload's `id` field lets it deduplicate what it already has.
//!
//! # Message Flow
//!
//! 1. A draft board opens `/draft-stream/{session_id}`
//! 2. The web handler registers a bounded sender under the session's
//!    broadcast channel name (`draft-updates-<session_id>`)
//! 3. When a pick is recorded, the domain layer publishes
//!    `DomainEvent::DraftPickRecorded`
//! 4. [`SseDomainEventHandler`] converts it to a [`DraftPickEvent`] and the
//!    manager fans it out to every connection on that session's channel
//! 5. The board receives one `data: <json>` frame per pick, in publish order
//!
//! # Modules
//!
//! - `connection`: ConnectionRegistry with dual-index architecture and type-safe ConnectionId
//! - `manager`: High-level fan-out (delegates to ConnectionRegistry)
//! - `message`: Pick event payload and channel naming
//! - `domain_event_handler`: bridges the domain event bus into this crate

pub mod connection;
pub mod domain_event_handler;
pub mod manager;
pub mod message;

pub use domain_event_handler::SseDomainEventHandler;
pub use manager::Manager;
