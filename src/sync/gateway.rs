use std::collections::BTreeMap;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::chat::response::ChatResponse;
use crate::core::task::{NewTask, Task, TaskPatch};

/// Status name to task count, as reported by `GET /asistente/resumen`.
pub type StatusSummary = BTreeMap<String, u32>;

/// A failed remote call. The sync engine treats every variant the same way
/// (rollback or alert); the split only exists for logging.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{method} {path} returned {status}")]
    Status {
        method: &'static str,
        path: String,
        status: StatusCode,
    },
}

/// The remote task store and its assistant endpoint.
///
/// Abstracted as a trait so the sync engine can be exercised against a
/// scripted in-memory gateway in tests.
#[allow(async_fn_in_trait)]
pub trait TaskGateway {
    async fn list_tasks(&self) -> Result<Vec<Task>, GatewayError>;
    async fn create_task(&self, new: &NewTask) -> Result<(), GatewayError>;
    async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<(), GatewayError>;
    async fn delete_task(&self, id: i64) -> Result<(), GatewayError>;
    /// Send free text to the natural-language endpoint.
    async fn interpret(&self, text: &str) -> Result<ChatResponse, GatewayError>;
    /// Plain-text schedule suggestions.
    async fn suggestions(&self) -> Result<String, GatewayError>;
    /// Tasks due and not yet done.
    async fn pending(&self) -> Result<Vec<Task>, GatewayError>;
    /// Task counts per status.
    async fn summary(&self) -> Result<StatusSummary, GatewayError>;
}

/// HTTP implementation of [`TaskGateway`] against the service's JSON API.
#[derive(Clone)]
pub struct HttpGateway {
    base_url: String,
    http: Client,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let http = Client::builder().build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-2xx response into a [`GatewayError::Status`], logging the body.
async fn checked(
    method: &'static str,
    path: &str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, GatewayError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    log::warn!("{} {} returned {}: {}", method, path, status, body);
    Err(GatewayError::Status {
        method,
        path: path.to_string(),
        status,
    })
}

impl TaskGateway for HttpGateway {
    async fn list_tasks(&self) -> Result<Vec<Task>, GatewayError> {
        let path = "/tareas";
        let resp = self.http.get(self.url(path)).send().await?;
        let resp = checked("GET", path, resp).await?;
        Ok(resp.json().await?)
    }

    async fn create_task(&self, new: &NewTask) -> Result<(), GatewayError> {
        let path = "/tareas";
        let resp = self.http.post(self.url(path)).json(new).send().await?;
        checked("POST", path, resp).await?;
        Ok(())
    }

    async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<(), GatewayError> {
        let path = format!("/tareas/{id}");
        let resp = self.http.put(self.url(&path)).json(patch).send().await?;
        checked("PUT", &path, resp).await?;
        Ok(())
    }

    async fn delete_task(&self, id: i64) -> Result<(), GatewayError> {
        let path = format!("/tareas/{id}");
        let resp = self.http.delete(self.url(&path)).send().await?;
        checked("DELETE", &path, resp).await?;
        Ok(())
    }

    async fn interpret(&self, text: &str) -> Result<ChatResponse, GatewayError> {
        let path = "/nlu";
        let body = serde_json::json!({ "texto": text });
        let resp = self.http.post(self.url(path)).json(&body).send().await?;
        let resp = checked("POST", path, resp).await?;
        let value: serde_json::Value = resp.json().await?;
        Ok(ChatResponse::decode(&value))
    }

    async fn suggestions(&self) -> Result<String, GatewayError> {
        let path = "/sugerencias";
        let resp = self.http.get(self.url(path)).send().await?;
        let resp = checked("GET", path, resp).await?;
        Ok(resp.text().await?)
    }

    async fn pending(&self) -> Result<Vec<Task>, GatewayError> {
        let path = "/asistente/pendientes";
        let resp = self.http.get(self.url(path)).send().await?;
        let resp = checked("GET", path, resp).await?;
        Ok(resp.json().await?)
    }

    async fn summary(&self) -> Result<StatusSummary, GatewayError> {
        let path = "/asistente/resumen";
        let resp = self.http.get(self.url(path)).send().await?;
        let resp = checked("GET", path, resp).await?;
        Ok(resp.json().await?)
    }
}
