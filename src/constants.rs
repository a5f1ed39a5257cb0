pub mod network {
    pub const TIMEOUT_API_REQUEST_MS: u64 = 10_000;
    pub const ALLOWED_SCHEMES: &[&str] = &["http", "https"];
}

pub mod api {
    pub const API_ROOT: &str = "/api";
    pub const ERROR_PREFIX: &str = "ABS API";
}

pub mod env {
    pub const BASE_URL: &str = "ABS_BASE_URL";
    pub const API_KEY: &str = "ABS_API_KEY";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}

pub mod args {
    pub const BASE_URL: &str = "base_url";
    pub const TOKEN: &str = "token";
}

pub mod limits {
    pub const LOG_BODY_PREVIEW_BYTES: usize = 256;
    pub const SUGGESTION_LIMIT: usize = 5;
}

pub mod server {
    pub const PROTOCOL_VERSION: &str = "2025-06-18";
    pub const NAME: &str = "abs-mcp";
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
