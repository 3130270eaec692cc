//! Mock collaborators for tests and local runs.
//!
//! Enabled by the `test-utils` feature.

pub mod remote_api;
pub mod status;

pub use remote_api::{ApiCall, InMemoryRemoteApi};
pub use status::RecordingStatusReporter;
