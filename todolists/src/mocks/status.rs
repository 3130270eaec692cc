//! Recording status reporter for testing.

use std::sync::{Mutex, PoisonError};

use crate::status::{RequestStatus, StatusReporter};

/// Reporter that keeps every signal it receives.
#[derive(Debug, Default)]
pub struct RecordingStatusReporter {
    reports: Mutex<Vec<RequestStatus>>,
}

impl RecordingStatusReporter {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals received so far, oldest first.
    #[must_use]
    pub fn reports(&self) -> Vec<RequestStatus> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StatusReporter for RecordingStatusReporter {
    fn report(&self, status: RequestStatus) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(status);
    }
}
