//! The client for the payments REST API that backs the dashboard.
//!
//! Each resource is a single `GET` that returns the full collection as JSON.
//! Failures are logged here and handed back to the caller unchanged: there is
//! no retry and no timeout beyond what the transport reports.

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode, Url,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;

use crate::models::{Transaction, User, Wallet};

/// Why a request to the payments API failed.
///
/// The `Display` text is shown to the user on the error panel.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    /// The request was sent but no response came back, e.g. the server is
    /// unreachable or the connection dropped.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status code.
    #[error("Request failed with status code {status}: {body}")]
    Response {
        /// The HTTP status code.
        status: u16,
        /// The response body, as text.
        body: String,
    },

    /// Anything else, e.g. a response body that is not the expected JSON.
    #[error("{0}")]
    Generic(String),
}

/// The read operations the dashboard needs from the payments API.
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// `GET /user`
    async fn get_user(&self) -> Result<User, GatewayError>;

    /// `GET /wallet`
    async fn get_wallet(&self) -> Result<Wallet, GatewayError>;

    /// `GET /transactions`
    async fn get_transactions(&self) -> Result<Vec<Transaction>, GatewayError>;
}

/// The path of the user resource, relative to the API base URL.
pub const USER_PATH: &str = "user";
/// The path of the wallet resource, relative to the API base URL.
pub const WALLET_PATH: &str = "wallet";
/// The path of the transactions resource, relative to the API base URL.
pub const TRANSACTIONS_PATH: &str = "transactions";

/// A [DataGateway] that talks JSON over HTTP.
#[derive(Debug, Clone)]
pub struct RestGateway {
    http_client: Client,
    base_url: Url,
}

impl RestGateway {
    /// Create a gateway for the API rooted at `base_url`.
    ///
    /// A trailing slash is added to `base_url` if missing so that resource
    /// paths are appended rather than replacing the last path segment.
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|error| {
                tracing::warn!("could not build HTTP client with default headers: {error}");
                Client::new()
            });

        Self {
            http_client,
            base_url,
        }
    }

    /// The URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let result = self.fetch_json(path).await;

        if let Err(ref error) = result {
            match error {
                GatewayError::Network(_) => {
                    tracing::error!("no response from GET /{path}: {error}")
                }
                GatewayError::Response { status, .. } => {
                    tracing::error!("GET /{path} failed with status {status}: {error}")
                }
                GatewayError::Generic(_) => tracing::error!("GET /{path} failed: {error}"),
            }
        }

        result
    }

    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|error| GatewayError::Generic(format!("Invalid URL for {path}: {error}")))?;

        tracing::debug!("GET {url}");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|error| GatewayError::Network(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(response_error(status, response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|error| GatewayError::Generic(format!("Could not read response: {error}")))
    }
}

async fn response_error(status: StatusCode, response: reqwest::Response) -> GatewayError {
    let body = response.text().await.unwrap_or_default();

    GatewayError::Response {
        status: status.as_u16(),
        body,
    }
}

#[async_trait]
impl DataGateway for RestGateway {
    async fn get_user(&self) -> Result<User, GatewayError> {
        self.get_json(USER_PATH).await
    }

    async fn get_wallet(&self) -> Result<Wallet, GatewayError> {
        self.get_json(WALLET_PATH).await
    }

    async fn get_transactions(&self) -> Result<Vec<Transaction>, GatewayError> {
        self.get_json(TRANSACTIONS_PATH).await
    }
}
