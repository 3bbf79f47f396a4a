// src/config/options.rs
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use sha2::{Digest, Sha256};

use super::consts::*;
use crate::error::ConfigError;

/// Account identifier + secret. Fixed for the lifetime of a client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    identifier: String,
    secret: String,
}

impl Credentials {
    pub fn new(
        identifier: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let identifier = identifier.into();
        let secret = secret.into();
        if identifier.trim().is_empty() {
            return Err(ConfigError::EmptyIdentifier);
        }
        if secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(Self { identifier, secret })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Stable jar location for this account: `<tmp>/alert_scrape.<sha256>.cookie`.
    pub fn default_cookie_jar(&self) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(self.identifier.as_bytes());
        hasher.update(self.secret.as_bytes());
        let digest = hex::encode(hasher.finalize());

        std::env::temp_dir().join(join!(COOKIE_FILE_PREFIX, &digest, ".", COOKIE_FILE_EXT))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"[redacted]")
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub credentials: Credentials,
    pub cookie_jar: Option<PathBuf>,      // explicit jar, else derived from credentials
    pub user_agent: Option<String>,       // override for DEFAULT_USER_AGENT
    pub settle_delay: Duration,           // wait between a mutation and its reverify read
    pub request_timeout: Duration,        // per-request bound, enforced by the transport
}

impl ClientOptions {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            cookie_jar: None,
            user_agent: None,
            settle_delay: Duration::from_millis(SETTLE_DELAY_MS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_cookie_jar(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_jar = Some(path.into());
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        let ua = ua.into();
        self.user_agent = if ua.trim().is_empty() { None } else { Some(ua) };
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn cookie_jar_path(&self) -> PathBuf {
        self.cookie_jar
            .clone()
            .unwrap_or_else(|| self.credentials.default_cookie_jar())
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    Both(PathBuf), // file and stderr
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogOptions {
    pub target: LogTarget,
    pub level: String, // EnvFilter directive, RUST_LOG wins when set
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            target: LogTarget::Stderr,
            level: s!(DEFAULT_LOG_LEVEL),
        }
    }
}

impl LogOptions {
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self { target: LogTarget::File(path.into()), ..Self::default() }
    }

    pub fn to_file_and_stderr(path: impl Into<PathBuf>) -> Self {
        Self { target: LogTarget::Both(path.into()), ..Self::default() }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}
