use axum::response::sse::Event;
use dashmap::DashMap;
use log::*;
use std::collections::HashSet;
use std::convert::Infallible;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::Sender;

/// Broadcast channel name a connection is subscribed to
/// (see [`crate::message::channel_name`]).
pub type ChannelName = String;

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Connection information
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub channel: ChannelName,
    pub sender: Sender<Result<Event, Infallible>>,
}

/// Connection registry with dual indices for O(1) lookups
pub struct ConnectionRegistry {
    /// Primary storage: lookup by connection_id for registration/cleanup - O(1)
    connections: DashMap<ConnectionId, ConnectionInfo>,

    /// Secondary index: fast lookup by channel name for fan-out - O(1)
    channel_index: DashMap<ChannelName, HashSet<ConnectionId>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            channel_index: DashMap::new(),
        }
    }

    /// Register a new connection on a channel - O(1)
    pub fn register(
        &self,
        channel: ChannelName,
        sender: Sender<Result<Event, Infallible>>,
    ) -> ConnectionId {
        let connection_id = ConnectionId::new();

        self.connections.insert(
            connection_id.clone(),
            ConnectionInfo {
                channel: channel.clone(),
                sender,
            },
        );

        self.channel_index
            .entry(channel)
            .or_default()
            .insert(connection_id.clone());

        connection_id
    }

    /// Unregister a connection - O(1)
    pub fn unregister(&self, connection_id: &ConnectionId) {
        if let Some((_, info)) = self.connections.remove(connection_id) {
            if let Some(mut entry) = self.channel_index.get_mut(&info.channel) {
                entry.remove(connection_id);

                // Clean up empty channel entries
                if entry.is_empty() {
                    drop(entry); // Release lock before removal
                    self.channel_index.remove(&info.channel);
                }
            }
        }
    }

    /// Fan an event out to every connection subscribed to `channel` - O(1)
    /// lookup + O(k) send where k = the channel's connections.
    ///
    /// Events are ephemeral: a queue that is full (consumer not draining) or
    /// closed (consumer gone, cleanup pending) loses the event with a
    /// warning, and the client resyncs from the pick history on reconnect.
    pub fn send_to_channel(&self, channel: &str, event: Event) {
        if let Some(connection_ids) = self.channel_index.get(channel) {
            for conn_id in connection_ids.iter() {
                if let Some(info) = self.connections.get(conn_id) {
                    match info.sender.try_send(Ok(event.clone())) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            warn!(
                                "Queue full for connection {} on {channel}, dropping event",
                                conn_id.as_str()
                            );
                        }
                        Err(TrySendError::Closed(_)) => {
                            warn!(
                                "Connection {} on {channel} is closed, dropping event. \
                                 Connection will be cleaned up.",
                                conn_id.as_str()
                            );
                        }
                    }
                }
            }
        }
    }

    /// Number of live registrations, across all channels.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
