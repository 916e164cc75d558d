//! Runtime configuration for the report mini-app
//!
//! Replaces the per-deployment copies of the page script: the endpoint, the
//! diagnostic verbosity and the version tag are inputs instead of literals.

use crate::error::ConfigError;
use std::time::Duration;
use url::Url;

/// Value shipped in the page template before anyone fills in the real endpoint
pub const PLACEHOLDER_ENDPOINT: &str = "YOUR_BACKEND_API_URL_HERE/web/submit_report";

/// How much request/response detail reaches the visible status log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Outcome messages only; request diagnostics go to tracing
    #[default]
    Normal,
    /// Also report request URL, response status and raw body
    Verbose,
}

#[derive(Debug, Clone, Default)]
pub struct WebAppConfig {
    /// Report endpoint, e.g. `https://api.example.com/web/submit_report`
    pub endpoint: Option<String>,
    pub verbosity: Verbosity,
    /// Tag prefixed to every status message, e.g. `v1.1`
    pub script_version: Option<String>,
    /// Optional upper bound for the attached image
    pub max_attachment_bytes: Option<u64>,
    /// Optional request timeout; unset means the network layer decides
    pub request_timeout: Option<Duration>,
}

impl WebAppConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Default::default()
        }
    }

    /// Load configuration from `REPORT_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`WebAppConfig::from_env`] with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let verbosity = match non_empty("REPORT_VERBOSE") {
            Some(value) => {
                if parse_flag("REPORT_VERBOSE", &value)? {
                    Verbosity::Verbose
                } else {
                    Verbosity::Normal
                }
            }
            None => Verbosity::Normal,
        };

        let max_attachment_bytes = non_empty("REPORT_MAX_ATTACHMENT_BYTES")
            .map(|value| parse_number("REPORT_MAX_ATTACHMENT_BYTES", &value))
            .transpose()?;

        let request_timeout = non_empty("REPORT_REQUEST_TIMEOUT_SECS")
            .map(|value| parse_number("REPORT_REQUEST_TIMEOUT_SECS", &value))
            .transpose()?
            .map(Duration::from_secs);

        Ok(Self {
            endpoint: non_empty("REPORT_ENDPOINT_URL").map(|v| v.trim().to_string()),
            verbosity,
            script_version: non_empty("REPORT_SCRIPT_VERSION"),
            max_attachment_bytes,
            request_timeout,
        })
    }

    /// Validate the endpoint: present, not the placeholder, absolute, https
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let raw = self
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;

        if raw == PLACEHOLDER_ENDPOINT || raw.contains("YOUR_BACKEND_API_URL_HERE") {
            return Err(ConfigError::PlaceholderEndpoint(raw.to_string()));
        }

        let url = Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint {
            url: raw.to_string(),
            source,
        })?;

        if url.scheme() != "https" {
            return Err(ConfigError::InsecureEndpoint {
                url: raw.to_string(),
                scheme: url.scheme().to_string(),
            });
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::InvalidEndpoint {
                url: raw.to_string(),
                source: url::ParseError::EmptyHost,
            });
        }

        Ok(url)
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

fn parse_number(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
