//! [`RemoteApi`] over HTTP.
//!
//! Mutations answer with an envelope `{resultCode, messages, data}`; a
//! non-zero `resultCode` is an application-level rejection even though the
//! HTTP exchange succeeded.

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::{ApiFuture, RemoteApi};
use crate::config::HttpApiConfig;
use crate::error::ApiError;
use crate::types::{GetTasksResponse, Task, TaskId, Todolist, TodolistId, UpdateTaskModel};

/// Envelope wrapping every mutation response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponse<D> {
    /// `0` on success
    pub result_code: i32,
    /// Human-readable messages, usually set on rejection
    #[serde(default)]
    pub messages: Vec<String>,
    /// Payload
    pub data: D,
}

impl<D> BaseResponse<D> {
    /// The payload, or a rejection when `resultCode` is non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] with the server's messages.
    pub fn into_data(self) -> Result<D, ApiError> {
        if self.result_code == 0 {
            Ok(self.data)
        } else {
            Err(ApiError::Rejected {
                messages: self.messages,
            })
        }
    }
}

/// Payload of mutations that return the stored entity.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData<T> {
    /// Stored entity
    pub item: T,
}

/// Payload of mutations that return nothing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmptyData {}

#[derive(Serialize)]
struct TitleBody<'a> {
    title: &'a str,
}

/// HTTP client for the todolist backend.
#[derive(Clone)]
pub struct HttpRemoteApi {
    client: Client,
    config: HttpApiConfig,
}

impl HttpRemoteApi {
    /// Create a client for the given configuration.
    #[must_use]
    pub fn new(config: HttpApiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a client reusing an existing `reqwest` client.
    #[must_use]
    pub const fn with_client(client: Client, config: HttpApiConfig) -> Self {
        Self { client, config }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &HttpApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.config.api_key {
            Some(key) => request.header("API-KEY", key),
            None => request,
        };
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Backend returned error status");
            Err(ApiError::Status {
                status: status.as_u16(),
                message: body,
            })
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::ResponseParseFailed(e.to_string()))
    }

    async fn send_envelope<D: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<D, ApiError> {
        self.send_json::<BaseResponse<D>>(request).await?.into_data()
    }
}

impl RemoteApi for HttpRemoteApi {
    fn get_todolists(&self) -> ApiFuture<'_, Vec<Todolist>> {
        Box::pin(async move {
            self.send_json(self.client.get(self.url("/todo-lists")))
                .await
        })
    }

    fn create_todolist(&self, title: String) -> ApiFuture<'_, Todolist> {
        Box::pin(async move {
            let request = self
                .client
                .post(self.url("/todo-lists"))
                .json(&TitleBody { title: &title });
            let data: ItemData<Todolist> = self.send_envelope(request).await?;
            Ok(data.item)
        })
    }

    fn delete_todolist(&self, id: TodolistId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self.client.delete(self.url(&format!("/todo-lists/{id}")));
            self.send_envelope::<EmptyData>(request).await?;
            Ok(())
        })
    }

    fn rename_todolist(&self, id: TodolistId, title: String) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self
                .client
                .put(self.url(&format!("/todo-lists/{id}")))
                .json(&TitleBody { title: &title });
            self.send_envelope::<EmptyData>(request).await?;
            Ok(())
        })
    }

    fn get_tasks(&self, todolist_id: TodolistId) -> ApiFuture<'_, GetTasksResponse> {
        Box::pin(async move {
            let request = self
                .client
                .get(self.url(&format!("/todo-lists/{todolist_id}/tasks")));
            self.send_json(request).await
        })
    }

    fn create_task(&self, todolist_id: TodolistId, title: String) -> ApiFuture<'_, Task> {
        Box::pin(async move {
            let request = self
                .client
                .post(self.url(&format!("/todo-lists/{todolist_id}/tasks")))
                .json(&TitleBody { title: &title });
            let data: ItemData<Task> = self.send_envelope(request).await?;
            Ok(data.item)
        })
    }

    fn delete_task(&self, todolist_id: TodolistId, task_id: TaskId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self.client.delete(
                self.url(&format!("/todo-lists/{todolist_id}/tasks/{task_id}")),
            );
            self.send_envelope::<EmptyData>(request).await?;
            Ok(())
        })
    }

    fn update_task(
        &self,
        todolist_id: TodolistId,
        task_id: TaskId,
        model: UpdateTaskModel,
    ) -> ApiFuture<'_, Task> {
        Box::pin(async move {
            let request = self
                .client
                .put(self.url(&format!("/todo-lists/{todolist_id}/tasks/{task_id}")))
                .json(&model);
            let data: ItemData<Task> = self.send_envelope(request).await?;
            Ok(data.item)
        })
    }
}
