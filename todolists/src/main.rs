//! `todosync` demo.
//!
//! Runs a short session against the backend named by `TODOSYNC_BASE_URL`, or
//! against a seeded in-memory backend when it is unset, and prints the
//! resulting state followed by the recorded Prometheus metrics. Set
//! `RUST_LOG=debug` to see each remote call.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::StreamExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todolists::api::RemoteApi;
use todolists::config::HttpApiConfig;
use todolists::http::HttpRemoteApi;
use todolists::mocks::InMemoryRemoteApi;
use todolists::selectors;
use todolists::status::BroadcastStatusReporter;
use todolists::types::FilterValue;
use todolists::{SyncEnvironment, TodoClient};
use todosync_runtime::metrics::MetricsExporter;

fn backend() -> Arc<dyn RemoteApi> {
    match HttpApiConfig::from_env() {
        Ok(config) => {
            tracing::info!(base_url = %config.base_url, "Using HTTP backend");
            Arc::new(HttpRemoteApi::new(config))
        },
        Err(error) => {
            tracing::info!(%error, "Using in-memory backend");
            let api = InMemoryRemoteApi::new().with_latency(Duration::from_millis(20));
            let list = api.seed_todolist("Work");
            let _ = api.seed_task(&list.id, "Buy milk");
            Arc::new(api)
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todosync=info,todolists=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut exporter = MetricsExporter::new();
    exporter.install().context("installing metrics recorder")?;

    let status = Arc::new(BroadcastStatusReporter::default());
    let mut signals = status.stream().boxed();
    tokio::spawn(async move {
        while let Some(signal) = signals.next().await {
            tracing::debug!(?signal, "Status changed");
        }
    });

    let client = TodoClient::new(SyncEnvironment::new(backend(), status.clone()));

    let lists = client
        .fetch_todolists()
        .await
        .context("fetching todolists")?;
    tracing::info!(count = lists.len(), "Fetched todolists");

    let list = match lists.first() {
        Some(list) => list.clone(),
        None => client
            .create_todolist("Work")
            .await
            .context("creating todolist")?,
    };

    client
        .fetch_tasks(&list.id)
        .await
        .context("fetching tasks")?;
    let task = client
        .create_task(&list.id, "Call the plumber")
        .await
        .context("creating task")?;
    client
        .change_task_status(&list.id, &task.id, true)
        .await
        .context("completing task")?;
    client
        .change_filter(&list.id, FilterValue::Active)
        .await
        .context("changing filter")?;

    let state = client.state().await;
    for todolist in selectors::select_todolists(&state) {
        println!("{} [{:?}]", todolist.title, todolist.filter);
        for task in selectors::select_tasks(&state, &todolist.id) {
            let visible = todolist.filter.matches(task);
            println!(
                "  {} {:?}{}",
                task.title,
                task.status,
                if visible { "" } else { " (hidden)" }
            );
        }
    }
    println!("last status: {:?}", status.current());

    client
        .delete_task(&list.id, &task.id)
        .await
        .context("deleting task")?;
    client
        .shutdown(Duration::from_secs(5))
        .await
        .context("shutting down")?;

    if let Some(metrics) = exporter.render() {
        println!("\n{metrics}");
    }
    Ok(())
}
