//! The seam to the external booking backend.
use crate::error::TransportError;
use async_trait::async_trait;

mod contact_store;
mod payload;
mod webhook;

pub use contact_store::{ContactStore, FileContactStore, MemoryContactStore};
pub use payload::*;
pub use webhook::WebhookClient;

/// The result of one fire-and-forget call to the booking backend.
///
/// The booking flow completes regardless; this type keeps the three cases apart
/// so a retry or outbox mechanism can hook onto failures later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome<T> {
    Delivered(T),
    TransportError(TransportError),
    /// No endpoint is configured for this call.
    ConfigAbsent,
}

impl<T> SubmissionOutcome<T> {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SubmissionOutcome::Delivered(_))
    }

    pub fn delivered(&self) -> Option<&T> {
        match self {
            SubmissionOutcome::Delivered(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> SubmissionOutcome<U> {
        match self {
            SubmissionOutcome::Delivered(value) => SubmissionOutcome::Delivered(f(value)),
            SubmissionOutcome::TransportError(e) => SubmissionOutcome::TransportError(e),
            SubmissionOutcome::ConfigAbsent => SubmissionOutcome::ConfigAbsent,
        }
    }
}

/// Receives confirmed bookings and intake forms.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    async fn submit_booking(&self, payload: &BookingPayload) -> SubmissionOutcome<BookingReceipt>;

    async fn submit_intake(&self, payload: &IntakePayload) -> SubmissionOutcome<()>;
}
