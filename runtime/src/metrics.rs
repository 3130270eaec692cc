//! Prometheus metrics for observability and monitoring.
//!
//! Metrics are emitted through the `metrics` facade. Without an installed
//! recorder they are dropped, so libraries can record unconditionally and
//! binaries decide whether to export them.
//!
//! # Example
//!
//! ```rust,no_run
//! use todosync_runtime::metrics::MetricsExporter;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut exporter = MetricsExporter::new();
//! exporter.install()?;
//!
//! if let Some(text) = exporter.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, gauge, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Process-wide Prometheus recorder.
///
/// Renders the text exposition format on demand; serving it over HTTP is
/// left to the embedding binary.
#[derive(Default)]
pub struct MetricsExporter {
    handle: Option<PrometheusHandle>,
}

impl MetricsExporter {
    /// Create an exporter that has not been installed yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Describe all metrics and install the Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// Only one recorder can be installed per process. If one already is
    /// (e.g. in tests), this logs a warning and leaves `render()` returning
    /// `None`.
    pub fn install(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
                    5.0, 10.0,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!("Prometheus metrics recorder installed");
                Ok(())
            },
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!(
                        "Metrics recorder already initialized, skipping re-initialization"
                    );
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            },
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if this exporter did not install the recorder.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
pub fn register_metrics() {
    // Store
    describe_counter!(
        "store.commands.total",
        "Total number of actions reduced by stores"
    );
    describe_histogram!(
        "store.reducer.duration_seconds",
        "Time spent inside reducers while holding the state lock"
    );
    describe_counter!(
        "store.effects.executed",
        "Total number of effects started, labelled by effect type"
    );
    describe_counter!(
        "store.shutdown.rejected_actions",
        "Actions rejected because the store was shutting down"
    );

    // Remote operations
    describe_counter!(
        "sync_operations_total",
        "Remote operations finished, labelled by operation and outcome"
    );
    describe_histogram!(
        "sync_operation_duration_seconds",
        "Time from issuing a remote call to receiving its result"
    );
    describe_gauge!(
        "sync_operations_in_flight",
        "Remote operations currently awaiting a response"
    );
}

/// Remote operation metrics recorder.
pub struct SyncMetrics;

impl SyncMetrics {
    /// Record that a remote call was issued.
    pub fn record_started() {
        gauge!("sync_operations_in_flight").increment(1.0);
    }

    /// Record the outcome of a remote call.
    pub fn record_outcome(operation: &'static str, succeeded: bool, duration: Duration) {
        let outcome = if succeeded { "succeeded" } else { "failed" };
        gauge!("sync_operations_in_flight").decrement(1.0);
        counter!("sync_operations_total", "operation" => operation, "outcome" => outcome)
            .increment(1);
        histogram!("sync_operation_duration_seconds", "operation" => operation)
            .record(duration.as_secs_f64());
    }

    /// Record an operation rejected locally, before any remote call.
    pub fn record_local_failure(operation: &'static str) {
        counter!("sync_operations_total", "operation" => operation, "outcome" => "rejected")
            .increment(1);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_exporter_creation() {
        let exporter = MetricsExporter::new();
        assert!(exporter.handle().is_none());
        assert!(exporter.render().is_none());
    }

    #[test]
    fn test_exporter_renders_sync_metrics() {
        let mut exporter = MetricsExporter::new();
        exporter.install().unwrap();

        SyncMetrics::record_started();
        SyncMetrics::record_outcome("fetch_todolists", true, Duration::from_millis(20));
        SyncMetrics::record_local_failure("update_task");

        // Another test may have installed the recorder first
        if let Some(rendered) = exporter.render() {
            assert!(rendered.contains("sync_operations_total"));
            assert!(rendered.contains("fetch_todolists"));
        }
    }
}
