//! HTTP plumbing for the management API

use crate::{
    Error,
    ManagementConfig,
    Result,
    types::Overview,
};
use reqwest::{
    Method,
    StatusCode,
    header::CONTENT_TYPE,
};
use serde::{
    Serialize,
    de::DeserializeOwned,
};
use tracing::{
    debug,
    trace,
};
use url::Url;

/// What a request produced once transport and status errors are ruled out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// 404: the addressed resource does not exist
    NotFound,
    /// 201/204 or a success with an empty body
    Empty,
    Body(String),
}

impl Reply {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Reply::NotFound)
    }

    /// Decode the body, treating "not found" and "no content" alike
    pub fn decode<T: DeserializeOwned>(self) -> Result<Option<T>> {
        match self {
            Reply::NotFound | Reply::Empty => Ok(None),
            Reply::Body(text) => Ok(Some(serde_json::from_str(&text)?)),
        }
    }
}

/// Authenticated client for one broker's management API
#[derive(Debug, Clone)]
pub struct ManagementClient {
    config: ManagementConfig,
    base: Url,
    http: reqwest::Client,
}

impl ManagementClient {
    /// Create a new client, validating the configuration first
    pub fn new(config: ManagementConfig) -> Result<Self> {
        config.validate()?;
        let base = config.api_base()?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { config, base, http })
    }

    pub fn config(&self) -> &ManagementConfig {
        &self.config
    }

    /// Root of the API, e.g. `http://localhost:15672/api/`
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Build the URL for a resource path
    ///
    /// Each segment is percent-encoded on its own, so a vhost of `/` lands in
    /// the path as `%2F` instead of splitting it.
    pub fn url_for(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| Error::ConfigError(format!("Cannot append paths to '{}'", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request without a body
    pub async fn send(&self, method: Method, segments: &[&str]) -> Result<Reply> {
        self.execute(method, segments, None).await
    }

    /// Send a request with a JSON body
    pub async fn send_json<B>(&self, method: Method, segments: &[&str], body: &B) -> Result<Reply>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(body)?;
        self.execute(method, segments, Some(body)).await
    }

    /// Send a request without a body and decode the answer
    pub async fn request<T>(&self, method: Method, segments: &[&str]) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        self.send(method, segments).await?.decode()
    }

    /// Send a request with a JSON body and decode the answer
    pub async fn request_json<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(method, segments, body).await?.decode()
    }

    /// `GET /api/overview`
    pub async fn overview(&self) -> Result<Option<Overview>> {
        self.request(Method::GET, &["overview"]).await
    }

    async fn execute(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Vec<u8>>,
    ) -> Result<Reply> {
        let url = self.url_for(segments)?;
        debug!(target: "broker_mgmt_client", %method, %url, "Sending management API request");

        let mut request = self
            .config
            .credentials
            .apply(self.http.request(method.clone(), url.clone()))
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(Error::ConnectionError)?;
        let status = response.status();
        trace!(target: "broker_mgmt_client", %method, %url, %status, "Received response");

        if status == StatusCode::NOT_FOUND {
            debug!(target: "broker_mgmt_client", %url, "Resource not found");
            return Ok(Reply::NotFound);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::StatusError { status, body });
        }

        if status == StatusCode::CREATED || status == StatusCode::NO_CONTENT {
            return Ok(Reply::Empty);
        }

        let text = response.text().await.map_err(Error::ConnectionError)?;
        if text.trim().is_empty() {
            Ok(Reply::Empty)
        } else {
            Ok(Reply::Body(text))
        }
    }
}
