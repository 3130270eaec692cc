//! Coarse request status for UI-wide indicators.
//!
//! Every networked operation reports [`RequestStatus::Loading`] before its
//! remote call and exactly one of [`RequestStatus::Succeeded`] /
//! [`RequestStatus::Failed`] after it. Operations rejected locally report
//! only `Failed`. The engine never reports `Idle`; it is the initial value
//! and what [`BroadcastStatusReporter::reset`] restores.

use async_stream::stream;
use futures::Stream;
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::broadcast;

/// Lifecycle signal of the most recent operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    /// Nothing reported yet
    #[default]
    Idle,
    /// A remote call is in flight
    Loading,
    /// The last call succeeded
    Succeeded,
    /// The last operation failed
    Failed,
}

impl RequestStatus {
    const fn to_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Loading => 1,
            Self::Succeeded => 2,
            Self::Failed => 3,
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Loading,
            2 => Self::Succeeded,
            3 => Self::Failed,
            _ => Self::Idle,
        }
    }
}

/// Receiver of status signals. Reporting is fire-and-forget.
pub trait StatusReporter: Send + Sync {
    /// Record a status change.
    fn report(&self, status: RequestStatus);
}

/// Reporter that discards every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStatusReporter;

impl StatusReporter for NoopStatusReporter {
    fn report(&self, _status: RequestStatus) {}
}

/// Reporter that keeps the latest status and broadcasts every change.
///
/// Concurrent operations share one status, so the last writer wins.
#[derive(Debug)]
pub struct BroadcastStatusReporter {
    current: AtomicU8,
    sender: broadcast::Sender<RequestStatus>,
}

impl BroadcastStatusReporter {
    /// Create a reporter buffering up to `capacity` signals per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            current: AtomicU8::new(RequestStatus::Idle.to_u8()),
            sender,
        }
    }

    /// The latest reported status.
    #[must_use]
    pub fn current(&self) -> RequestStatus {
        RequestStatus::from_u8(self.current.load(Ordering::Acquire))
    }

    /// Set the status back to `Idle` and broadcast it.
    pub fn reset(&self) {
        self.report(RequestStatus::Idle);
    }

    /// Subscribe to raw status changes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RequestStatus> {
        self.sender.subscribe()
    }

    /// Stream of status changes from now on.
    ///
    /// A subscriber that falls behind skips the signals it missed.
    pub fn stream(&self) -> impl Stream<Item = RequestStatus> + Send + use<> {
        let mut rx = self.sender.subscribe();
        stream! {
            loop {
                match rx.recv().await {
                    Ok(status) => yield status,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Status subscriber lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}

impl Default for BroadcastStatusReporter {
    fn default() -> Self {
        Self::new(64)
    }
}

impl StatusReporter for BroadcastStatusReporter {
    fn report(&self, status: RequestStatus) {
        self.current.store(status.to_u8(), Ordering::Release);
        // No subscribers is fine
        let _ = self.sender.send(status);
    }
}
