#![allow(dead_code)]

use abs_mcp::app::App;
use abs_mcp::errors::ToolError;
use abs_mcp::services::config::{ApiConfig, ConfigResolver};
use abs_mcp::services::logger::{LogLevel, Logger};
use abs_mcp::services::transport::{ApiRequest, Transport};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// One request as seen by the transport.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub config: ApiConfig,
    pub request: ApiRequest,
}

#[derive(Clone)]
pub enum Reply {
    Body(Bytes),
    Fail(ToolError),
    /// Never answers; resolves only once the call is cancelled.
    Hang,
}

/// In-memory transport that records every request and answers with a fixed
/// reply.
pub struct RecordingTransport {
    reply: Reply,
    calls: Mutex<Vec<Recorded>>,
    cancelled: Mutex<u32>,
}

impl RecordingTransport {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
            cancelled: Mutex::new(0),
        })
    }

    pub fn replying(body: &'static [u8]) -> Arc<Self> {
        Self::new(Reply::Body(Bytes::from_static(body)))
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.calls().pop().expect("at least one request")
    }

    pub fn cancelled(&self) -> u32 {
        *self.cancelled.lock().unwrap()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn perform(
        &self,
        config: &ApiConfig,
        request: &ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<Bytes, ToolError> {
        self.calls.lock().unwrap().push(Recorded {
            config: config.clone(),
            request: request.clone(),
        });
        match &self.reply {
            Reply::Body(body) => Ok(body.clone()),
            Reply::Fail(err) => Err(err.clone()),
            Reply::Hang => {
                cancel.cancelled().await;
                *self.cancelled.lock().unwrap() += 1;
                Err(ToolError::transport("call ABS API: request cancelled"))
            }
        }
    }
}

pub fn env_with(pairs: &[(&str, &str)]) -> ConfigResolver {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ConfigResolver::with_env(move |key| vars.get(key).cloned())
}

pub fn default_env() -> ConfigResolver {
    env_with(&[
        ("ABS_BASE_URL", "http://abs.test"),
        ("ABS_API_KEY", "env-token"),
    ])
}

pub fn quiet_logger() -> Logger {
    Logger::with_level("test", LogLevel::Error)
}

pub fn app_with(resolver: ConfigResolver, transport: Arc<RecordingTransport>) -> App {
    App::with_parts(quiet_logger(), resolver, transport).expect("app wiring")
}
