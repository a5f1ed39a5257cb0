use crate::errors::ToolError;
use crate::managers::builders::ApiCaller;
use crate::managers::registry::build_handlers;
use crate::mcp::catalog::tool_catalog;
use crate::services::config::ConfigResolver;
use crate::services::logger::Logger;
use crate::services::tool_executor::{ToolExecutor, ToolHandler};
use crate::services::transport::{HttpTransport, Transport};
use std::collections::HashMap;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    fn validate_tool_wiring(
        handlers: &HashMap<String, Arc<dyn ToolHandler>>,
    ) -> Result<(), ToolError> {
        let catalog = tool_catalog().map_err(|err| ToolError::internal(err.message))?;

        let mut missing: Vec<String> = catalog
            .iter()
            .filter(|tool| !handlers.contains_key(&tool.name))
            .map(|tool| tool.name.clone())
            .collect();
        let mut unlisted: Vec<String> = handlers
            .keys()
            .filter(|name| !catalog.iter().any(|tool| &tool.name == *name))
            .cloned()
            .collect();
        if missing.is_empty() && unlisted.is_empty() {
            return Ok(());
        }
        missing.sort();
        unlisted.sort();
        Err(ToolError::internal("Tool wiring is incomplete")
            .with_hint(
                "Every tool in tool_catalog.json needs a registry handler and vice versa",
            )
            .with_details(serde_json::json!({
                "missing_handlers": missing,
                "missing_catalog_entries": unlisted,
            })))
    }

    pub fn initialize(logger: Logger) -> Result<Self, ToolError> {
        let transport = Arc::new(HttpTransport::new(logger.clone())?);
        Self::with_parts(logger, ConfigResolver::from_process_env(), transport)
    }

    /// Wires the app around an explicit resolver and transport.
    pub fn with_parts(
        logger: Logger,
        resolver: ConfigResolver,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ToolError> {
        let api = ApiCaller::new(resolver, transport);
        let handlers = build_handlers(&api);
        Self::validate_tool_wiring(&handlers)?;

        logger.info(
            "tools registered",
            Some(&serde_json::json!({ "count": handlers.len() })),
        );
        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), handlers));
        Ok(Self {
            logger,
            tool_executor,
        })
    }
}
