//! Event text formats.

use std::sync::Arc;

/// An immutable recorded board event. Cloning shares the text.
pub type Event = Arc<str>;

/// Sale reported over a live channel by salesperson `client_id`.
pub fn sale(client_id: i64, raw: &str) -> String {
    format!("Salesperson #{} reports a sale: {}", client_id, raw)
}

/// Sale reported through the authenticated HTTP ingress.
pub fn reported_sale(message: &str) -> String {
    format!("Salesperson reports a sale: {}", message)
}

/// Notice sent to the remaining channels when `client_id` leaves.
pub fn departure(client_id: i64) -> String {
    format!("Salesperson #{} left the board.", client_id)
}
