// Settings module for configuration
//
// This module defines the connection settings for the Xen Orchestra REST API
// and how they are resolved from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use log::LevelFilter;
use url::Url;

/// Environment variable key for the Xen Orchestra base URL
pub const ENV_BASE_URL: &str = "XO_BASE_URL";

/// Environment variable key for the API token
pub const ENV_API_TOKEN: &str = "XO_API_TOKEN";

/// Environment variable key for the certificate verification flag
pub const ENV_CERT_VERIFY: &str = "CERT_VERIFY";

/// Environment variable key for the CA bundle path
pub const ENV_CERT_PATH: &str = "CERT_PATH";

/// Environment variable key for the log level
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Environment variable key for the request timeout in seconds
pub const ENV_REQUEST_TIMEOUT: &str = "XO_REQUEST_TIMEOUT";

/// Certificate verification policy for requests to Xen Orchestra
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsVerify {
    /// Verify against the system trust store
    Enabled,
    /// Accept any certificate
    Disabled,
    /// Verify against the PEM bundle at this path
    CaBundle(PathBuf),
}

/// Process-wide connection settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    base_url: String,
    credential: Option<String>,
    tls_verify: TlsVerify,
    request_timeout: Duration,
    log_level: LevelFilter,
    warnings: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: crate::defaults::BASE_URL.to_string(),
            credential: None,
            tls_verify: TlsVerify::Enabled,
            request_timeout: Duration::from_secs(crate::defaults::REQUEST_TIMEOUT_SECS),
            log_level: LevelFilter::Info,
            warnings: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Build settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(base_url) = value(ENV_BASE_URL) {
            config.base_url = normalize_base_url(&base_url);
        }
        if Url::parse(&config.base_url).is_err() {
            config.warnings.push(format!(
                "{} is not a valid URL: '{}'",
                ENV_BASE_URL, config.base_url
            ));
        }

        config.credential = value(ENV_API_TOKEN);
        if config.credential.is_none() {
            config.warnings.push(format!(
                "{} not set. Tools that need authentication will fail.",
                ENV_API_TOKEN
            ));
        }

        if let Some(flag) = value(ENV_CERT_VERIFY) {
            match flag.to_ascii_lowercase().as_str() {
                "true" => config.tls_verify = TlsVerify::Enabled,
                "false" => config.tls_verify = TlsVerify::Disabled,
                other => config.warnings.push(format!(
                    "{} has unrecognised value '{}', keeping certificate verification on",
                    ENV_CERT_VERIFY, other
                )),
            }
        }

        // A CA bundle overrides the boolean flag
        if let Some(path) = value(ENV_CERT_PATH) {
            let path = PathBuf::from(path);
            if !path.exists() {
                config.warnings.push(format!(
                    "{} points to '{}' which does not exist",
                    ENV_CERT_PATH,
                    path.display()
                ));
            }
            config.tls_verify = TlsVerify::CaBundle(path);
        }

        if let Some(level) = value(ENV_LOG_LEVEL) {
            match parse_log_level(&level) {
                Some(level) => config.log_level = level,
                None => config.warnings.push(format!(
                    "{} has unrecognised value '{}', using INFO",
                    ENV_LOG_LEVEL, level
                )),
            }
        }

        if let Some(timeout) = value(ENV_REQUEST_TIMEOUT) {
            match timeout.parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => config.warnings.push(format!(
                    "{} must be a positive number of seconds, got '{}'",
                    ENV_REQUEST_TIMEOUT, timeout
                )),
            }
        }

        config
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// API token, if one was configured
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn tls_verify(&self) -> &TlsVerify {
        &self.tls_verify
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    /// Problems found while loading, to be logged once the logger is up
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    pub fn with_credential(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.credential = if token.trim().is_empty() { None } else { Some(token) };
        self
    }

    pub fn with_tls_verify(mut self, tls_verify: TlsVerify) -> Self {
        self.tls_verify = tls_verify;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

/// Map the log level names accepted by the server to a filter
pub fn parse_log_level(raw: &str) -> Option<LevelFilter> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "TRACE" => Some(LevelFilter::Trace),
        "DEBUG" => Some(LevelFilter::Debug),
        "INFO" => Some(LevelFilter::Info),
        "WARN" | "WARNING" => Some(LevelFilter::Warn),
        "ERROR" | "CRITICAL" => Some(LevelFilter::Error),
        "OFF" => Some(LevelFilter::Off),
        _ => None,
    }
}
