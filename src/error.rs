// src/error.rs
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("account identifier must not be empty")]
    EmptyIdentifier,
    #[error("account secret must not be empty")]
    EmptySecret,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("cookie jar {path}: {source}")]
    CookieJar {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cookie jar {path} is corrupt: {source}")]
    CorruptJar {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("login rejected, credentials are likely wrong")]
    BadCredentials,
    #[error("login accepted but the session cookie was not confirmed")]
    CookieRejected,
    #[error("session cookie jar was not written to {0}")]
    PersistenceFailure(String),
    #[error("could not remove cookie jar {path}: {source}")]
    JarRemoval {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    #[error("page is not the alerts UI (session not authenticated)")]
    NotAuthenticated,
    #[error("required form field '{0}' not found; page markup may have changed")]
    MissingFormToken(&'static str),
}

/// Failure of a page read that needed an authenticated session.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Scrape(#[from] ScrapeError),
}

#[derive(Debug, Error)]
pub enum MutationError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Scrape(#[from] ScrapeError),
    #[error("alert '{0}' already exists")]
    AlreadyExists(String),
    #[error("alert '{0}' not found")]
    NotFound(String),
    #[error("alert '{0}' has no deletion token on the manage page")]
    MissingDeletionToken(String),
    #[error("remote did not accept the {action} of '{term}'")]
    RemoteRejected { action: &'static str, term: String },
    #[error("could not confirm the {action} of '{term}' after refresh")]
    VerificationFailed { action: &'static str, term: String },
}

impl From<FetchError> for MutationError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Auth(e) => Self::Auth(e),
            FetchError::Transport(e) => Self::Transport(e),
            FetchError::Scrape(e) => Self::Scrape(e),
        }
    }
}

impl MutationError {
    /// Expected remote-state outcomes, reported but not treated as faults.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::AlreadyExists(_) | Self::NotFound(_))
    }
}
