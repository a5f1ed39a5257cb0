//! Handler combinators shared by every tool.
//!
//! A handler is "resolve configuration, turn the arguments into one
//! [`ApiRequest`], hand it to the transport". The combinators below differ only
//! in how the request is built.

use crate::errors::ToolError;
use crate::managers::sub_resources::SubResource;
use crate::services::args::ToolArgs;
use crate::services::config::{ApiConfig, ApiScope, ConfigResolver};
use crate::services::tool_executor::ToolHandler;
use crate::services::transport::{ApiRequest, Transport};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const ID_PLACEHOLDER: &str = "{id}";

/// Configuration resolver plus transport, shared by all handlers.
#[derive(Clone)]
pub struct ApiCaller {
    resolver: ConfigResolver,
    transport: Arc<dyn Transport>,
}

impl ApiCaller {
    pub fn new(resolver: ConfigResolver, transport: Arc<dyn Transport>) -> Self {
        Self {
            resolver,
            transport,
        }
    }

    pub fn config(&self, args: &ToolArgs, scope: ApiScope) -> Result<ApiConfig, ToolError> {
        self.resolver.resolve(args, scope)
    }

    pub async fn call(
        &self,
        config: &ApiConfig,
        request: &ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<Bytes, ToolError> {
        self.transport.perform(config, request, cancel).await
    }
}

/// Static path with a single `{id}` placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathTemplate(&'static str);

impl PathTemplate {
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    pub fn render(&self, id: &str) -> String {
        self.0.replacen(ID_PLACEHOLDER, id, 1)
    }
}

type BuildRequest = dyn Fn(&ToolArgs) -> Result<ApiRequest, ToolError> + Send + Sync;

pub struct ApiHandler {
    api: ApiCaller,
    scope: ApiScope,
    build: Box<BuildRequest>,
}

impl ApiHandler {
    pub fn new(
        api: ApiCaller,
        scope: ApiScope,
        build: impl Fn(&ToolArgs) -> Result<ApiRequest, ToolError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            api,
            scope,
            build: Box::new(build),
        }
    }

    /// Builds the request without sending it. Configuration is resolved
    /// first so a missing base URL or token wins over argument errors.
    pub fn prepare(&self, args: &ToolArgs) -> Result<(ApiConfig, ApiRequest), ToolError> {
        let config = self.api.config(args, self.scope)?;
        let request = (self.build)(args)?;
        Ok((config, request))
    }
}

#[async_trait]
impl ToolHandler for ApiHandler {
    async fn handle(
        &self,
        args: &ToolArgs,
        cancel: &CancellationToken,
    ) -> Result<Bytes, ToolError> {
        let (config, request) = self.prepare(args)?;
        self.api.call(&config, &request, cancel).await
    }
}

pub fn simple_get(api: &ApiCaller, path: &'static str) -> Arc<dyn ToolHandler> {
    Arc::new(ApiHandler::new(api.clone(), ApiScope::Api, move |_| {
        Ok(ApiRequest::get(path))
    }))
}

/// Like [`simple_get`] but for endpoints outside the `/api` root.
pub fn root_get(api: &ApiCaller, path: &'static str) -> Arc<dyn ToolHandler> {
    Arc::new(ApiHandler::new(api.clone(), ApiScope::Root, move |_| {
        Ok(ApiRequest::get(path))
    }))
}

pub fn get_by_id(
    api: &ApiCaller,
    template: PathTemplate,
    id_arg: &'static str,
) -> Arc<dyn ToolHandler> {
    Arc::new(ApiHandler::new(api.clone(), ApiScope::Api, move |args| {
        let id = args.require_string(id_arg)?;
        Ok(ApiRequest::get(template.render(&id)))
    }))
}

pub fn get_by_id_with<S: SubResource>(
    api: &ApiCaller,
    template: PathTemplate,
    id_arg: &'static str,
) -> Arc<dyn ToolHandler> {
    Arc::new(ApiHandler::new(api.clone(), ApiScope::Api, move |args| {
        let id = args.require_string(id_arg)?;
        let path = S::apply(template.render(&id), S::select(args));
        Ok(ApiRequest::get(path))
    }))
}
