//! HTTP client for the persistence service.

use api_types::box_entry::{BoxEntry, BoxEntryNew, BoxImport, BoxList};
use api_types::session::Session;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("invalid base_url: {0}")]
    InvalidUrl(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    credentials: Credentials,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|err| ClientError::InvalidUrl(err.to_string()))?;
        Ok(Self {
            base_url,
            credentials,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::InvalidUrl(err.to_string()))
    }

    /// Sends an authenticated request and maps non-success statuses onto the
    /// error taxonomy, decoding the server's `{ "error": … }` body.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ClientError> {
        let res = request
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await?;

        if res.status().is_success() {
            return Ok(res);
        }

        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());

        Err(match status.as_u16() {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden,
            404 => ClientError::NotFound(body),
            422 => ClientError::Validation(body),
            _ => ClientError::Server(body),
        })
    }

    pub async fn session(&self) -> Result<Session, ClientError> {
        let res = self.send(self.http.get(self.endpoint("session")?)).await?;
        res.json::<Session>().await.map_err(ClientError::Transport)
    }

    pub async fn boxes_list(&self) -> Result<Vec<BoxEntry>, ClientError> {
        let res = self.send(self.http.get(self.endpoint("boxes")?)).await?;
        let list = res.json::<BoxList>().await.map_err(ClientError::Transport)?;
        Ok(list.entries)
    }

    pub async fn boxes_create(&self, payload: &BoxEntryNew) -> Result<BoxEntry, ClientError> {
        let res = self
            .send(self.http.post(self.endpoint("boxes")?).json(payload))
            .await?;
        res.json::<BoxEntry>().await.map_err(ClientError::Transport)
    }

    pub async fn boxes_import(&self, payload: &BoxImport) -> Result<Vec<BoxEntry>, ClientError> {
        let res = self
            .send(self.http.post(self.endpoint("boxes/import")?).json(payload))
            .await?;
        let list = res.json::<BoxList>().await.map_err(ClientError::Transport)?;
        Ok(list.entries)
    }

    pub async fn boxes_update(
        &self,
        id: Uuid,
        payload: &BoxEntryNew,
    ) -> Result<BoxEntry, ClientError> {
        let endpoint = self.endpoint(&format!("boxes/{id}"))?;
        let res = self.send(self.http.patch(endpoint).json(payload)).await?;
        res.json::<BoxEntry>().await.map_err(ClientError::Transport)
    }

    pub async fn boxes_delete(&self, id: Uuid) -> Result<(), ClientError> {
        let endpoint = self.endpoint(&format!("boxes/{id}"))?;
        self.send(self.http.delete(endpoint)).await?;
        Ok(())
    }
}
