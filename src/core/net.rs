// src/core/net.rs

// Blocking HTTP with a per-account cookie jar file.
// Redirects are deliberately not followed: the alerts endpoints answer an
// accepted mutation with a 302 whose body ("The document has moved") is
// the only receipt we get.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{COOKIE, REFERER, SET_COOKIE, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::Url;
use tracing::{debug, trace};

use super::cookies::CookieJar;
use crate::error::TransportError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One browser-like request. `form` present means POST body, urlencoded.
#[derive(Clone, Debug)]
pub struct Request<'a> {
    pub method: Method,
    pub url: &'a str,
    pub referer: &'a str,
    pub user_agent: &'a str,
    pub cookie_jar: &'a Path,
    pub form: Option<Vec<(&'static str, String)>>,
}

impl<'a> Request<'a> {
    pub fn get(url: &'a str, referer: &'a str, user_agent: &'a str, cookie_jar: &'a Path) -> Self {
        Self { method: Method::Get, url, referer, user_agent, cookie_jar, form: None }
    }

    pub fn post(
        url: &'a str,
        referer: &'a str,
        user_agent: &'a str,
        cookie_jar: &'a Path,
        form: Vec<(&'static str, String)>,
    ) -> Self {
        Self { method: Method::Post, url, referer, user_agent, cookie_jar, form: Some(form) }
    }

    /// Form value by field name, mostly for fakes and logging.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form
            .as_ref()?
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Anything that can carry a `Request` and hand back the raw body.
/// Must read and write `request.cookie_jar` so the session round-trips.
pub trait Transport {
    fn request(&self, request: &Request<'_>) -> Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn request(&self, request: &Request<'_>) -> Result<String, TransportError> {
        (**self).request(request)
    }
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|source| TransportError::Http { url: s!("<client>"), source })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn request(&self, req: &Request<'_>) -> Result<String, TransportError> {
        let url = Url::parse(req.url).map_err(|e| TransportError::InvalidUrl {
            url: s!(req.url),
            reason: e.to_string(),
        })?;
        let http_err = |source| TransportError::Http { url: s!(req.url), source };

        let mut jar = CookieJar::load(req.cookie_jar)?;

        let mut builder = match req.method {
            Method::Get => self.client.get(url.clone()),
            Method::Post => self.client.post(url.clone()),
        }
        .header(USER_AGENT, req.user_agent)
        .header(REFERER, req.referer);

        if let Some(cookies) = jar.header_for(&url) {
            builder = builder.header(COOKIE, cookies);
        }
        if let Some(form) = &req.form {
            let fields: Vec<&str> = form.iter().map(|(k, _)| *k).collect();
            debug!(url = req.url, ?fields, "POST");
            builder = builder.form(form);
        } else {
            debug!(url = req.url, "GET");
        }

        let resp = builder.send().map_err(http_err)?;
        let status = resp.status();

        let mut changed = false;
        for value in resp.headers().get_all(SET_COOKIE) {
            if let Ok(v) = value.to_str() {
                changed |= jar.store_set_cookie(v, &url);
            }
        }
        if changed && (!jar.is_empty() || req.cookie_jar.exists()) {
            jar.save(req.cookie_jar)?;
        }

        let body = resp.text().map_err(http_err)?;
        trace!(url = req.url, %status, len = body.len(), "response");
        Ok(body)
    }
}
