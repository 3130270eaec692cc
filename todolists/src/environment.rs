//! Sync environment.
//!
//! Dependencies shared by the todolist and task reducers.

use std::sync::Arc;

use crate::api::RemoteApi;
use crate::status::{NoopStatusReporter, StatusReporter};

/// External collaborators of the sync engine.
///
/// Both fields are trait objects so effects can capture clones of them and
/// outlive the reducer call that created them.
#[derive(Clone)]
pub struct SyncEnvironment {
    /// Backend
    pub api: Arc<dyn RemoteApi>,

    /// Receiver of `loading` / `succeeded` / `failed` signals
    pub status: Arc<dyn StatusReporter>,
}

impl SyncEnvironment {
    /// Create an environment from its collaborators.
    #[must_use]
    pub fn new(api: Arc<dyn RemoteApi>, status: Arc<dyn StatusReporter>) -> Self {
        Self { api, status }
    }

    /// Environment that drops status signals.
    #[must_use]
    pub fn without_status(api: Arc<dyn RemoteApi>) -> Self {
        Self::new(api, Arc::new(NoopStatusReporter))
    }
}

impl std::fmt::Debug for SyncEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEnvironment").finish_non_exhaustive()
    }
}
