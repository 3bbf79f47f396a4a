// src/session.rs
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::config::consts::*;
use crate::config::Credentials;
use crate::core::{Request, Transport};
use crate::error::{AuthError, FetchError, ScrapeError, TransportError};

/// Owns the authenticated-session lifecycle for one account.
///
/// The session itself is the cookie jar file. Its presence is taken as
/// validity (no probe request); pages that come back unauthenticated are
/// handled by [`SessionManager::fetch_scraped`], which re-logs in once.
#[derive(Debug)]
pub struct SessionManager {
    credentials: Credentials,
    jar: PathBuf,
    user_agent: String,
}

impl SessionManager {
    pub fn new(credentials: Credentials, jar: PathBuf, user_agent: impl Into<String>) -> Self {
        Self { credentials, jar, user_agent: user_agent.into() }
    }

    pub fn cookie_jar(&self) -> &Path {
        &self.jar
    }

    pub fn has_session(&self) -> bool {
        self.jar.exists()
    }

    pub fn ensure_session(&self, transport: &dyn Transport) -> Result<(), AuthError> {
        if self.has_session() {
            debug!(jar = %self.jar.display(), "reusing existing session");
            return Ok(());
        }
        match self.login(transport) {
            Ok(()) => Ok(()),
            Err(e) => {
                // Never leave a half-made jar behind: the next run would trust it.
                if let Err(clear) = self.clear_jar() {
                    warn!(error = %clear, "could not discard partial cookie jar");
                }
                error!(error = %e, account = self.credentials.identifier(), "login failed");
                Err(e)
            }
        }
    }

    pub fn force_reauthenticate(&self, transport: &dyn Transport) -> Result<(), AuthError> {
        if self.clear_jar()? {
            info!(jar = %self.jar.display(), "removed cookie jar for re-authentication");
        }
        self.ensure_session(transport)
    }

    /// Delete the jar. `Ok(false)` when there was nothing to delete.
    fn clear_jar(&self) -> Result<bool, AuthError> {
        match std::fs::remove_file(&self.jar) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => {
                Err(AuthError::JarRemoval { path: self.jar.display().to_string(), source })
            }
        }
    }

    fn login(&self, transport: &dyn Transport) -> Result<(), AuthError> {
        debug!(account = self.credentials.identifier(), "logging in");

        let form = vec![
            ("Email", s!(self.credentials.identifier())),
            ("Passwd", s!(self.credentials.secret())),
            ("PersistentCookie", s!("yes")),
            ("rmShown", s!("1")),
            ("signIn", s!("Sign in")),
            ("asts", s!()),
        ];
        let body = self.post(transport, LOGIN_AUTH_URL, LOGIN_REFERER, form)?;
        if !body.contains(LOGIN_DONE_MARKER) {
            return Err(AuthError::BadCredentials);
        }

        let body = self.get(transport, CHECK_COOKIE_URL, LOGIN_REFERER)?;
        if !body.contains(COOKIE_CONFIRMED_MARKER) {
            return Err(AuthError::CookieRejected);
        }

        if !self.has_session() {
            return Err(AuthError::PersistenceFailure(self.jar.display().to_string()));
        }

        info!(account = self.credentials.identifier(), jar = %self.jar.display(), "logged in");
        Ok(())
    }

    pub fn get(
        &self,
        transport: &dyn Transport,
        url: &str,
        referer: &str,
    ) -> Result<String, TransportError> {
        transport.request(&Request::get(url, referer, &self.user_agent, &self.jar))
    }

    pub fn post(
        &self,
        transport: &dyn Transport,
        url: &str,
        referer: &str,
        form: Vec<(&'static str, String)>,
    ) -> Result<String, TransportError> {
        transport.request(&Request::post(url, referer, &self.user_agent, &self.jar, form))
    }

    /// GET a page that only renders for a logged-in session and parse it.
    ///
    /// A `NotAuthenticated` parse forces one re-login and one retry; any
    /// other scrape error is returned as is, since retrying cannot fix
    /// markup that changed.
    pub fn fetch_scraped<R>(
        &self,
        transport: &dyn Transport,
        url: &str,
        referer: &str,
        parse: impl Fn(&str) -> Result<R, ScrapeError>,
    ) -> Result<R, FetchError> {
        self.ensure_session(transport)?;

        let body = self.get(transport, url, referer)?;
        match parse(&body) {
            Err(ScrapeError::NotAuthenticated) => {
                warn!(url, "session looks expired, logging in again");
                self.force_reauthenticate(transport)?;
                let body = self.get(transport, url, referer)?;
                Ok(parse(&body)?)
            }
            other => Ok(other?),
        }
    }
}
