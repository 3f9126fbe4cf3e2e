//! Session registry: the open channels currently eligible for broadcasts.

use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

use super::events::Event;

/// Identity of one connection. Two sockets for the same salesperson are two channels.
pub type ConnectionId = Uuid;

/// Sending half of one connected client's outbound queue.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    pub id: ConnectionId,
    pub client_id: i64,
    tx: mpsc::Sender<Event>,
}

impl ChannelHandle {
    pub fn new(client_id: i64, tx: mpsc::Sender<Event>) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            tx,
        }
    }

    /// Non-blocking enqueue. Fails when the queue is full or the reader is gone.
    pub fn try_send(&self, event: Event) -> Result<(), TrySendError<Event>> {
        self.tx.try_send(event)
    }
}

/// Insertion-ordered set of open channels.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    channels: Vec<ChannelHandle>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a channel. Returns false (and changes nothing) if its id is already registered.
    pub fn register(&mut self, channel: ChannelHandle) -> bool {
        if self.contains(channel.id) {
            return false;
        }
        self.channels.push(channel);
        true
    }

    /// Remove a channel. Removing an unknown id is a no-op.
    pub fn deregister(&mut self, id: ConnectionId) -> Option<ChannelHandle> {
        let pos = self.channels.iter().position(|c| c.id == id)?;
        Some(self.channels.remove(pos))
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.channels.iter().any(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Channels in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ChannelHandle> {
        self.channels.iter()
    }
}
