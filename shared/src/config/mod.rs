//! Process configuration and its startup validation
//!
//! The whole raw environment is checked in one pass. Every rejected key is
//! reported, and a [`ProcessConfig`] only exists when all of them passed.

pub mod environment;

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use crate::utils::validation::{validators, FieldViolation, Violations};

pub use environment::{Environment, LogLevel};

/// Environment keys read at startup
pub mod keys {
    pub const ENVIRONMENT: &str = "APP_ENV";
    pub const HOST: &str = "HOST";
    pub const PORT: &str = "PORT";
    pub const PROVIDER_URL: &str = "PROVIDER_URL";
    pub const PROVIDER_SERVICE_KEY: &str = "PROVIDER_SERVICE_KEY";
    pub const FRONTEND_URL: &str = "FRONTEND_URL";
    pub const ADDITIONAL_ORIGINS: &str = "ADDITIONAL_ORIGINS";
    pub const JWT_SECRET: &str = "JWT_SECRET";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const PROVIDER_TIMEOUT_SECS: &str = "PROVIDER_TIMEOUT_SECS";
    pub const CREDENTIAL_HASH_COST: &str = "CREDENTIAL_HASH_COST";
    pub const TOKEN_TTL_MINUTES: &str = "TOKEN_TTL_MINUTES";
    pub const RATE_LIMIT_MAX_REQUESTS: &str = "RATE_LIMIT_MAX_REQUESTS";
    pub const RATE_LIMIT_WINDOW_SECS: &str = "RATE_LIMIT_WINDOW_SECS";
}

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CREDENTIAL_HASH_COST: u32 = 12;
pub const DEFAULT_TOKEN_TTL_MINUTES: u64 = 60;
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u64 = 100;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;
pub const MIN_SIGNING_SECRET_CHARS: usize = 32;
pub const MIN_HASH_COST: u32 = 4;
pub const MAX_HASH_COST: u32 = 31;

/// Startup configuration failure listing every rejected key
#[derive(Debug, Clone, Error)]
#[error("invalid configuration ({} violation(s)): {}", .violations.len(), join_violations(.violations))]
pub struct ConfigError {
    violations: Vec<FieldViolation>,
}

impl ConfigError {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Immutable configuration shared by every component for the process lifetime
pub struct ProcessConfig {
    environment: Environment,
    host: String,
    port: u16,
    service_endpoint: Url,
    elevated_credential: SecretString,
    public_origin: Url,
    additional_origins: Vec<Url>,
    signing_secret: SecretString,
    log_level: LogLevel,
    provider_timeout: Duration,
    credential_hash_cost: u32,
    token_ttl: Duration,
    rate_limit_max_requests: u32,
    rate_limit_window: Duration,
}

impl ProcessConfig {
    /// Load `.env` if present, then validate the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let raw: HashMap<String, String> = std::env::vars().collect();
        Self::validate(&raw)
    }

    /// Validate a raw key/value mapping, collecting every violation
    pub fn validate(raw: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut violations = Violations::new();

        let environment = optional(raw, keys::ENVIRONMENT)
            .map(|value| value.parse::<Environment>())
            .transpose()
            .unwrap_or_else(|message| reject(&mut violations, keys::ENVIRONMENT, message))
            .unwrap_or_default();

        let host = optional(raw, keys::HOST).unwrap_or(DEFAULT_HOST).to_string();

        let port = match optional(raw, keys::PORT) {
            None => Some(DEFAULT_PORT),
            Some(value) => match value.parse::<u16>() {
                Ok(port) if port > 0 => Some(port),
                _ => reject(&mut violations, keys::PORT, "must be a positive integer no greater than 65535"),
            },
        };

        let service_endpoint = required_url(raw, keys::PROVIDER_URL, &mut violations);

        let elevated_credential = match optional(raw, keys::PROVIDER_SERVICE_KEY) {
            Some(value) => Some(SecretString::from(value.to_string())),
            None => reject(&mut violations, keys::PROVIDER_SERVICE_KEY, "is required"),
        };

        let public_origin = required_url(raw, keys::FRONTEND_URL, &mut violations);

        let mut additional_origins = Vec::new();
        if let Some(list) = optional(raw, keys::ADDITIONAL_ORIGINS) {
            for origin in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                match validators::parse_http_url(origin) {
                    Ok(url) => additional_origins.push(url),
                    Err(message) => {
                        violations.add(keys::ADDITIONAL_ORIGINS, format!("'{}' {}", origin, message))
                    }
                }
            }
        }

        // Secrets are checked for presence and length only; their content is never echoed.
        let signing_secret = match optional(raw, keys::JWT_SECRET) {
            None => reject(&mut violations, keys::JWT_SECRET, "is required"),
            Some(value) if value.chars().count() < MIN_SIGNING_SECRET_CHARS => reject(
                &mut violations,
                keys::JWT_SECRET,
                format!("must be at least {} characters", MIN_SIGNING_SECRET_CHARS),
            ),
            Some(value) => Some(SecretString::from(value.to_string())),
        };

        let log_level = optional(raw, keys::LOG_LEVEL)
            .map(|value| value.parse::<LogLevel>())
            .transpose()
            .unwrap_or_else(|message| reject(&mut violations, keys::LOG_LEVEL, message))
            .unwrap_or_default();

        let provider_timeout = positive_integer(
            raw,
            keys::PROVIDER_TIMEOUT_SECS,
            DEFAULT_PROVIDER_TIMEOUT_SECS,
            &mut violations,
        )
        .map(Duration::from_secs);

        let credential_hash_cost = match optional(raw, keys::CREDENTIAL_HASH_COST) {
            None => Some(DEFAULT_CREDENTIAL_HASH_COST),
            Some(value) => match value.parse::<u32>() {
                Ok(cost) if (MIN_HASH_COST..=MAX_HASH_COST).contains(&cost) => Some(cost),
                _ => reject(
                    &mut violations,
                    keys::CREDENTIAL_HASH_COST,
                    format!("must be an integer between {} and {}", MIN_HASH_COST, MAX_HASH_COST),
                ),
            },
        };

        let token_ttl = positive_integer(
            raw,
            keys::TOKEN_TTL_MINUTES,
            DEFAULT_TOKEN_TTL_MINUTES,
            &mut violations,
        )
        .map(|minutes| Duration::from_secs(minutes * 60));

        let rate_limit_max_requests = positive_integer(
            raw,
            keys::RATE_LIMIT_MAX_REQUESTS,
            DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            &mut violations,
        )
        .and_then(|n| match u32::try_from(n) {
            Ok(n) => Some(n),
            Err(_) => reject(&mut violations, keys::RATE_LIMIT_MAX_REQUESTS, "is too large"),
        });

        let rate_limit_window = positive_integer(
            raw,
            keys::RATE_LIMIT_WINDOW_SECS,
            DEFAULT_RATE_LIMIT_WINDOW_SECS,
            &mut violations,
        )
        .map(Duration::from_secs);

        match (
            port,
            service_endpoint,
            elevated_credential,
            public_origin,
            signing_secret,
            provider_timeout,
            credential_hash_cost,
            token_ttl,
            rate_limit_max_requests,
            rate_limit_window,
        ) {
            (
                Some(port),
                Some(service_endpoint),
                Some(elevated_credential),
                Some(public_origin),
                Some(signing_secret),
                Some(provider_timeout),
                Some(credential_hash_cost),
                Some(token_ttl),
                Some(rate_limit_max_requests),
                Some(rate_limit_window),
            ) if violations.is_empty() => Ok(Self {
                environment,
                host,
                port,
                service_endpoint,
                elevated_credential,
                public_origin,
                additional_origins,
                signing_secret,
                log_level,
                provider_timeout,
                credential_hash_cost,
                token_ttl,
                rate_limit_max_requests,
                rate_limit_window,
            }),
            _ => Err(ConfigError {
                violations: violations.into_vec(),
            }),
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn service_endpoint(&self) -> &Url {
        &self.service_endpoint
    }

    pub fn elevated_credential(&self) -> &SecretString {
        &self.elevated_credential
    }

    pub fn public_origin(&self) -> &Url {
        &self.public_origin
    }

    /// Browser origins allowed to call the API
    ///
    /// Outside production the local frontend dev servers are appended.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut candidates: Vec<String> = std::iter::once(&self.public_origin)
            .chain(self.additional_origins.iter())
            .map(|url| url.origin().ascii_serialization())
            .collect();
        if !self.environment.is_production() {
            candidates.push("http://localhost:3000".to_string());
            candidates.push("http://localhost:5173".to_string());
        }

        let mut origins = Vec::with_capacity(candidates.len());
        for origin in candidates {
            if !origins.contains(&origin) {
                origins.push(origin);
            }
        }
        origins
    }

    pub fn signing_secret(&self) -> &SecretString {
        &self.signing_secret
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn provider_timeout(&self) -> Duration {
        self.provider_timeout
    }

    pub fn credential_hash_cost(&self) -> u32 {
        self.credential_hash_cost
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Requests one client address may make per rate-limit window
    pub fn rate_limit_max_requests(&self) -> u32 {
        self.rate_limit_max_requests
    }

    pub fn rate_limit_window(&self) -> Duration {
        self.rate_limit_window
    }
}

impl fmt::Debug for ProcessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessConfig")
            .field("environment", &self.environment)
            .field("bind_address", &self.bind_address())
            .field("service_endpoint", &self.service_endpoint.as_str())
            .field("elevated_credential", &"[REDACTED]")
            .field("public_origin", &self.public_origin.as_str())
            .field("additional_origins", &self.additional_origins.len())
            .field("signing_secret", &"[REDACTED]")
            .field("log_level", &self.log_level)
            .field("provider_timeout", &self.provider_timeout)
            .field("credential_hash_cost", &self.credential_hash_cost)
            .field("token_ttl", &self.token_ttl)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window", &self.rate_limit_window)
            .finish()
    }
}

impl ProcessConfig {
    /// Whether the signing secret and elevated credential are distinct values
    pub fn secrets_are_distinct(&self) -> bool {
        self.signing_secret.expose_secret() != self.elevated_credential.expose_secret()
    }
}

/// Non-blank value for `key`, or `None` when absent or blank
fn optional<'a>(raw: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    raw.get(key)
        .map(|value| value.trim())
        .filter(|value| validators::not_blank(value))
}

fn reject<T>(violations: &mut Violations, field: &str, message: impl Into<String>) -> Option<T> {
    violations.add(field, message);
    None
}

fn required_url(raw: &HashMap<String, String>, key: &str, violations: &mut Violations) -> Option<Url> {
    match optional(raw, key) {
        None => reject(violations, key, "is required"),
        Some(value) => match validators::parse_http_url(value) {
            Ok(url) => Some(url),
            Err(message) => reject(violations, key, message),
        },
    }
}

fn positive_integer(
    raw: &HashMap<String, String>,
    key: &str,
    default: u64,
    violations: &mut Violations,
) -> Option<u64> {
    match optional(raw, key) {
        None => Some(default),
        Some(value) => match value.parse::<u64>() {
            Ok(n) if n > 0 => Some(n),
            _ => reject(violations, key, "must be a positive integer"),
        },
    }
}
