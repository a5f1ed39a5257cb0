use crate::constants::api::API_ROOT;
use crate::constants::{args, env, network::ALLOWED_SCHEMES};
use crate::errors::ToolError;
use crate::services::args::ToolArgs;
use std::fmt;
use std::sync::Arc;
use url::Url;

pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Where an endpoint lives relative to the server root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiScope {
    /// Resource endpoints under `/api`.
    Api,
    /// Health and status endpoints served from the root.
    Root,
}

#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: String,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone)]
pub struct ConfigResolver {
    env: EnvLookup,
}

impl ConfigResolver {
    pub fn from_process_env() -> Self {
        Self::with_env(|key| std::env::var(key).ok())
    }

    pub fn with_env(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            env: Arc::new(lookup),
        }
    }

    pub fn resolve(&self, args: &ToolArgs, scope: ApiScope) -> Result<ApiConfig, ToolError> {
        let base_url = self
            .pick(args.optional_string(args::BASE_URL), env::BASE_URL)
            .ok_or_else(|| missing_field(args::BASE_URL, env::BASE_URL))?;
        let token = self
            .pick(args.optional_string(args::TOKEN), env::API_KEY)
            .ok_or_else(|| missing_field(args::TOKEN, env::API_KEY))?;

        validate_base_url(&base_url)?;

        let root = base_url.strip_suffix('/').unwrap_or(&base_url);
        let base_url = match scope {
            ApiScope::Api => format!("{}{}", root, API_ROOT),
            ApiScope::Root => root.to_string(),
        };
        Ok(ApiConfig { base_url, token })
    }

    fn pick(&self, explicit: Option<String>, env_key: &str) -> Option<String> {
        explicit.map(|v| v.trim().to_string()).or_else(|| {
            (self.env)(env_key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
    }
}

fn missing_field(field: &str, env_key: &str) -> ToolError {
    ToolError::configuration(format!(
        "{} parameter or {} environment variable is required",
        field, env_key
    ))
    .with_hint(format!(
        "Pass '{}' in the tool arguments or export {} before starting the server",
        field, env_key
    ))
    .with_details(serde_json::json!({ "field": field }))
}

fn validate_base_url(raw: &str) -> Result<(), ToolError> {
    let parsed = Url::parse(raw).map_err(|err| {
        ToolError::configuration(format!("base_url '{}' is not a valid URL: {}", raw, err))
            .with_details(serde_json::json!({ "field": args::BASE_URL }))
    })?;
    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(ToolError::configuration(format!(
            "base_url scheme '{}' is not supported (use http or https)",
            parsed.scheme()
        ))
        .with_details(serde_json::json!({ "field": args::BASE_URL })));
    }
    Ok(())
}
