//! # Todolists
//!
//! Client-side mirror of remote todolists and their tasks, kept in sync
//! through a reducer store.
//!
//! ## Architecture
//!
//! Two stores share one [`Store`](todosync_runtime::Store):
//!
//! - the **todolist store** holds the ordered lists and their display filters
//! - the **task store** holds one bucket of tasks per list, created and
//!   dropped by [`TodolistLifecycle`](todolists::TodolistLifecycle) events
//!
//! Every networked operation is an intent that makes exactly one
//! [`RemoteApi`](api::RemoteApi) call and an outcome that the owning reducer
//! merges into state. State never changes before the call resolves, and a
//! failed call leaves it as it was.
//!
//! ```text
//! intent → reducer → effect (remote call) → outcome → reducer → state
//! ```
//!
//! [`TodoClient`](client::TodoClient) wraps the store and returns each
//! operation's outcome to its caller.
//!
//! ## Features
//!
//! - `test-utils` (default): [`mocks`] with an in-memory backend and a
//!   recording status reporter

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod api;
pub mod app;
pub mod client;
pub mod config;
pub mod environment;
pub mod error;
pub mod http;
pub mod protocol;
pub mod selectors;
pub mod status;
pub mod tasks;
pub mod todolists;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod mocks;

pub use app::{AppAction, AppReducer, AppState};
pub use client::TodoClient;
pub use environment::SyncEnvironment;
pub use error::{ApiError, Result, SyncError};
