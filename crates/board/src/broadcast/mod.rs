//! Broadcast manager: history log plus fan-out to every registered channel.
//!
//! Registry and history share one mutex so that append + fan-out is a single
//! step (one global order) and a joining channel is registered in the same
//! critical section that snapshots its replay (nothing lost, nothing twice).
//! Fan-out only uses `try_send`, so the lock is never held while waiting on a
//! slow client.

pub mod events;
pub mod registry;

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

pub use events::Event;
pub use registry::{ChannelHandle, ConnectionId, SessionRegistry};

/// Default outbound queue capacity per channel.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// What a newly opened channel needs: its history replay and the live queue.
///
/// Write `replay` first, then drain `rx`.
#[derive(Debug)]
pub struct Subscription {
    pub connection_id: ConnectionId,
    pub client_id: i64,
    pub replay: Vec<Event>,
    pub rx: mpsc::Receiver<Event>,
}

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: usize,
    pub dropped: usize,
}

#[derive(Default)]
struct BoardState {
    registry: SessionRegistry,
    history: Vec<Event>,
}

pub struct BroadcastManager {
    state: Mutex<BoardState>,
    queue_capacity: usize,
}

impl Default for BroadcastManager {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

impl BroadcastManager {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            state: Mutex::new(BoardState::default()),
            queue_capacity: queue_capacity.max(1),
        }
    }

    fn state(&self) -> MutexGuard<'_, BoardState> {
        // Every critical section leaves the state consistent, so a poisoned lock is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a channel for `client_id`: register it for live delivery and
    /// snapshot the history it must be replayed.
    pub fn on_connect(&self, client_id: i64) -> Subscription {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let handle = ChannelHandle::new(client_id, tx);
        let connection_id = handle.id;
        let replay = {
            let mut state = self.state();
            state.registry.register(handle);
            state.history.clone()
        };
        info!(%connection_id, client_id, replay = replay.len(), "channel opened");
        Subscription {
            connection_id,
            client_id,
            replay,
            rx,
        }
    }

    /// Close a channel and tell the others. Returns false if it was already closed,
    /// in which case no departure notice is sent.
    pub fn on_disconnect(&self, connection_id: ConnectionId, client_id: i64) -> bool {
        let notice: Event = events::departure(client_id).into();
        let mut state = self.state();
        if state.registry.deregister(connection_id).is_none() {
            debug!(%connection_id, "channel already closed");
            return false;
        }
        let delivery = fan_out(&state.registry, &notice);
        drop(state);
        info!(%connection_id, client_id, delivered = delivery.delivered, "channel closed");
        true
    }

    /// Sale received on a live channel.
    pub fn on_message(&self, client_id: i64, raw: &str) -> Event {
        let event: Event = events::sale(client_id, raw).into();
        self.publish(event.clone());
        event
    }

    /// Sale received through the authenticated HTTP ingress.
    pub fn report_sale(&self, message: &str) -> Event {
        let event: Event = events::reported_sale(message).into();
        self.publish(event.clone());
        event
    }

    /// Append to history and fan out in one step.
    pub fn publish(&self, event: Event) -> Delivery {
        let mut state = self.state();
        state.history.push(event.clone());
        fan_out(&state.registry, &event)
    }

    /// Append to history without sending anything.
    pub fn record_event(&self, event: Event) {
        self.state().history.push(event);
    }

    /// Send to every registered channel without recording.
    pub fn broadcast(&self, event: &Event) -> Delivery {
        fan_out(&self.state().registry, event)
    }

    /// The full history log, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.state().history.iter().map(|e| e.to_string()).collect()
    }

    pub fn connection_count(&self) -> usize {
        self.state().registry.len()
    }
}

/// Offer `event` to every channel in registry order. A failed channel is logged and skipped.
fn fan_out(registry: &SessionRegistry, event: &Event) -> Delivery {
    let mut delivery = Delivery::default();
    for channel in registry.iter() {
        match channel.try_send(event.clone()) {
            Ok(()) => delivery.delivered += 1,
            Err(TrySendError::Full(_)) => {
                delivery.dropped += 1;
                warn!(connection_id = %channel.id, client_id = channel.client_id, "outbound queue full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {
                delivery.dropped += 1;
                warn!(connection_id = %channel.id, client_id = channel.client_id, "channel writer gone, dropping event");
            }
        }
    }
    debug!(
        recipients = registry.len(),
        delivered = delivery.delivered,
        dropped = delivery.dropped,
        "broadcast event"
    );
    delivery
}
