pub mod args;
pub mod config;
pub mod logger;
pub mod tool_executor;
pub mod transport;
