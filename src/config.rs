// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the immutable settings structs
//! built from them at startup. Nothing here is mutated after the process
//! starts; the auth core receives an [`AuthSettings`] by value.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//! | `AUTH_SIGNING_SECRET` | HS256 token signing key (min 32 bytes) | Required |
//! | `AUTH_INTEGRITY_SECRET` | Role integrity key (min 32 bytes) | Derived from signing key |
//! | `AUTH_ISSUER` | `iss` claim written and expected | `rolegate-api` |
//! | `AUTH_AUDIENCE` | `aud` claim written and expected | `rolegate-client` |
//! | `AUTH_TOKEN_TTL_MINUTES` | Token lifetime | `30` |
//! | `AUTH_BCRYPT_COST` | bcrypt cost factor (4-31) | `12` |
//! | `AUTH_CLOCK_SKEW_LEEWAY_SECS` | Grace period after `exp` | `0` |
//! | `AUTH_LOG_REJECTION_DETAIL` | Log the precise rejection reason | `true` |

use std::fmt;
use std::time::Duration;

use chrono::TimeDelta;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const SIGNING_SECRET_ENV: &str = "AUTH_SIGNING_SECRET";
pub const INTEGRITY_SECRET_ENV: &str = "AUTH_INTEGRITY_SECRET";
pub const ISSUER_ENV: &str = "AUTH_ISSUER";
pub const AUDIENCE_ENV: &str = "AUTH_AUDIENCE";
pub const TOKEN_TTL_ENV: &str = "AUTH_TOKEN_TTL_MINUTES";
pub const BCRYPT_COST_ENV: &str = "AUTH_BCRYPT_COST";
pub const LEEWAY_ENV: &str = "AUTH_CLOCK_SKEW_LEEWAY_SECS";
pub const REJECTION_DETAIL_ENV: &str = "AUTH_LOG_REJECTION_DETAIL";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ISSUER: &str = "rolegate-api";
pub const DEFAULT_AUDIENCE: &str = "rolegate-client";
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// HS256 keys shorter than the digest size are rejected.
pub const MIN_SECRET_LEN: usize = 32;

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be at least {min} bytes")]
    SecretTooShort { name: &'static str, min: usize },

    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// How much detail token rejections carry in the server logs.
///
/// Clients always receive the same generic rejection. This only controls
/// whether the internal log line names the precise failure (bad signature,
/// role tampering, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RejectionLogging {
    #[default]
    Detailed,
    Generic,
}

/// Process-level settings: bind address and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

/// Keys and claim values for the token lifecycle.
#[derive(Clone)]
pub struct AuthSettings {
    pub signing_secret: Vec<u8>,
    /// `None` means the integrity key is derived from `signing_secret`.
    pub integrity_secret: Option<Vec<u8>>,
    pub issuer: String,
    pub audience: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub leeway: Duration,
    pub rejection_logging: RejectionLogging,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("signing_secret", &"<redacted>")
            .field(
                "integrity_secret",
                &self.integrity_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("leeway", &self.leeway)
            .field("rejection_logging", &self.rejection_logging)
            .finish()
    }
}

impl AuthSettings {
    /// Settings with defaults for everything except the signing key.
    pub fn new(signing_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            signing_secret: signing_secret.into(),
            integrity_secret: None,
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            token_ttl: DEFAULT_TOKEN_TTL,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            leeway: Duration::ZERO,
            rejection_logging: RejectionLogging::default(),
        }
    }

    /// Set a dedicated integrity key instead of deriving one.
    pub fn with_integrity_secret(mut self, secret: impl Into<Vec<u8>>) -> Self {
        self.integrity_secret = Some(secret.into());
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}

/// Full configuration loaded at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerSettings,
    pub auth: AuthSettings,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = ServerSettings {
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, PORT_ENV, DEFAULT_PORT)?,
            log_format: match lookup(LOG_FORMAT_ENV).as_deref() {
                None | Some("pretty") => LogFormat::Pretty,
                Some("json") => LogFormat::Json,
                Some(other) => {
                    return Err(ConfigError::Invalid {
                        name: LOG_FORMAT_ENV,
                        value: other.to_string(),
                    })
                }
            },
        };

        let signing_secret = lookup(SIGNING_SECRET_ENV)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(SIGNING_SECRET_ENV))?;
        require_secret_len(SIGNING_SECRET_ENV, &signing_secret)?;

        let integrity_secret = match lookup(INTEGRITY_SECRET_ENV).filter(|s| !s.is_empty()) {
            Some(secret) => {
                require_secret_len(INTEGRITY_SECRET_ENV, &secret)?;
                Some(secret.into_bytes())
            }
            None => None,
        };

        let ttl_minutes: u64 = parse_or(&lookup, TOKEN_TTL_ENV, DEFAULT_TOKEN_TTL.as_secs() / 60)?;
        if ttl_minutes == 0 {
            return Err(ConfigError::Invalid {
                name: TOKEN_TTL_ENV,
                value: ttl_minutes.to_string(),
            });
        }
        let token_ttl = ttl_minutes
            .checked_mul(60)
            .map(Duration::from_secs)
            .filter(|ttl| fits_time_delta(*ttl))
            .ok_or_else(|| ConfigError::Invalid {
                name: TOKEN_TTL_ENV,
                value: ttl_minutes.to_string(),
            })?;

        let bcrypt_cost: u32 = parse_or(&lookup, BCRYPT_COST_ENV, DEFAULT_BCRYPT_COST)?;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: BCRYPT_COST_ENV,
                value: bcrypt_cost.to_string(),
            });
        }

        let leeway_secs: u64 = parse_or(&lookup, LEEWAY_ENV, 0)?;
        let leeway = Duration::from_secs(leeway_secs);
        if !fits_time_delta(leeway) {
            return Err(ConfigError::Invalid {
                name: LEEWAY_ENV,
                value: leeway_secs.to_string(),
            });
        }

        let rejection_logging = if parse_or(&lookup, REJECTION_DETAIL_ENV, true)? {
            RejectionLogging::Detailed
        } else {
            RejectionLogging::Generic
        };

        let auth = AuthSettings {
            signing_secret: signing_secret.into_bytes(),
            integrity_secret,
            issuer: lookup(ISSUER_ENV).unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            audience: lookup(AUDIENCE_ENV).unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
            token_ttl,
            bcrypt_cost,
            leeway,
            rejection_logging,
        };

        Ok(Self { server, auth })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

/// Durations are applied to timestamps as `chrono::TimeDelta`, which tops out
/// near 292 million years.
fn fits_time_delta(duration: Duration) -> bool {
    TimeDelta::from_std(duration).is_ok()
}

fn require_secret_len(name: &'static str, secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::SecretTooShort {
            name,
            min: MIN_SECRET_LEN,
        });
    }
    Ok(())
}
