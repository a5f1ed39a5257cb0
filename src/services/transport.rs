use crate::constants::api::ERROR_PREFIX;
use crate::constants::limits::LOG_BODY_PREVIEW_BYTES;
use crate::constants::network::TIMEOUT_API_REQUEST_MS;
use crate::errors::ToolError;
use crate::services::config::ApiConfig;
use crate::services::logger::Logger;
use crate::utils::text::preview;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// One outbound call: method, path below the resolved base URL, optional
/// JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body,
        }
    }
}

/// Performs a single request against the upstream API.
///
/// Implementations must honour `cancel`: once it fires, the in-flight call is
/// dropped and an error is returned. No implementation retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform(
        &self,
        config: &ApiConfig,
        request: &ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<Bytes, ToolError>;
}

#[derive(Clone)]
pub struct HttpTransport {
    logger: Logger,
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(logger: Logger) -> Result<Self, ToolError> {
        Self::with_timeout(logger, Duration::from_millis(TIMEOUT_API_REQUEST_MS))
    }

    pub fn with_timeout(logger: Logger, timeout: Duration) -> Result<Self, ToolError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ToolError::internal(format!("Failed to build HTTP client: {}", err)))?;
        Ok(Self {
            logger: logger.child("transport"),
            client,
            timeout,
        })
    }

    async fn send(&self, config: &ApiConfig, request: &ApiRequest) -> Result<Bytes, ToolError> {
        let url = build_url(&config.base_url, &request.path);
        let parsed = Url::parse(&url)
            .map_err(|err| ToolError::transport(format!("build request: {}: {}", url, err)))?;

        let mut req = self.client.request(request.method.clone(), parsed);
        if !config.token.is_empty() {
            req = req.bearer_auth(&config.token);
        }
        if let Some(body) = &request.body {
            let encoded = serde_json::to_vec(body)
                .map_err(|err| ToolError::transport(format!("marshal payload: {}", err)))?;
            req = req.header(CONTENT_TYPE, "application/json").body(encoded);
        }

        let response = req
            .send()
            .await
            .map_err(|err| self.map_reqwest_error("call ABS API", err))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            self.logger.warn(
                "upstream returned non-success status",
                Some(&serde_json::json!({
                    "method": request.method.as_str(),
                    "path": request.path,
                    "status": status.as_u16(),
                    "body": preview(&body, LOG_BODY_PREVIEW_BYTES),
                })),
            );
            return Err(ToolError::upstream(
                status.as_u16(),
                format!("{} returned {}: {}", ERROR_PREFIX, status, body),
            ));
        }

        response
            .bytes()
            .await
            .map_err(|err| self.map_reqwest_error("read response", err))
    }

    fn map_reqwest_error(&self, stage: &str, err: reqwest::Error) -> ToolError {
        let message = if err.is_timeout() {
            format!(
                "{}: request timed out after {}ms",
                stage,
                self.timeout.as_millis()
            )
        } else {
            format!("{}: {}", stage, err)
        };
        self.logger.warn(&message, None);
        ToolError::transport(message)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform(
        &self,
        config: &ApiConfig,
        request: &ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<Bytes, ToolError> {
        self.logger.debug(
            "request",
            Some(&serde_json::json!({
                "method": request.method.as_str(),
                "base_url": config.base_url,
                "path": request.path,
                "has_body": request.body.is_some(),
            })),
        );
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                self.logger.info(
                    "request cancelled",
                    Some(&serde_json::json!({ "path": request.path })),
                );
                Err(ToolError::transport("call ABS API: request cancelled"))
            }
            result = self.send(config, request) => result,
        }
    }
}

/// Joins base and path verbatim after dropping one trailing slash from the
/// base.
pub fn build_url(base_url: &str, path: &str) -> String {
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    format!("{}{}", base, path)
}
