/**
 * Real-time Event Broadcasting
 *
 * Fan-out of one server event to a snapshot of room members. The event is
 * serialized once and the same `Arc<str>` is queued on every recipient's
 * outbound channel with `try_send`, so a slow or dead recipient never blocks
 * delivery to the others.
 *
 * # Delivery failures
 *
 * - `Closed` - the recipient's socket writer has gone away
 * - `Full` - the recipient's bounded queue is full (slow consumer)
 *
 * Failures are recorded in the [`DeliveryReport`]; the caller decides what to
 * do with the failed connections (the hub evicts them).
 */

use crate::backend::chat::registry::{ConnectionEntry, OutboundFrame};
use crate::shared::{ConnectionId, ServerEvent};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;

/// Why a single delivery failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    Closed,
    Full,
}

/// Per-recipient outcome of one broadcast
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: Vec<ConnectionId>,
    pub failed: Vec<(ConnectionId, DeliveryFailure)>,
}

impl DeliveryReport {
    /// Total delivery attempts (one per recipient in the snapshot)
    pub fn attempts(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }

    pub fn failed_ids(&self) -> Vec<ConnectionId> {
        self.failed.iter().map(|(id, _)| *id).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Serialize an event once for every recipient
pub fn encode_event(event: &ServerEvent) -> Result<Arc<str>, serde_json::Error> {
    serde_json::to_string(event).map(Arc::from)
}

/// Queue an encoded event on every recipient
///
/// # Arguments
///
/// * `recipients` - Member snapshot taken under the room lock
/// * `payload` - Encoded event from [`encode_event`]
///
/// # Returns
///
/// One delivery attempt per recipient, successful or not
pub fn fan_out(recipients: &[ConnectionEntry], payload: &Arc<str>) -> DeliveryReport {
    let mut report = DeliveryReport::default();

    for entry in recipients {
        let connection = &entry.connection;
        match connection.try_send(OutboundFrame::Event(Arc::clone(payload))) {
            Ok(()) => report.delivered.push(connection.id),
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(connection_id = %connection.id, "[Realtime] Recipient channel closed");
                report.failed.push((connection.id, DeliveryFailure::Closed));
            }
            Err(TrySendError::Full(_)) => {
                tracing::warn!(connection_id = %connection.id, "[Realtime] Recipient queue full, dropping slow consumer");
                report.failed.push((connection.id, DeliveryFailure::Full));
            }
        }
    }

    tracing::debug!(
        "[Realtime] Event delivered to {}/{} recipients",
        report.delivered.len(),
        report.attempts()
    );
    report
}
