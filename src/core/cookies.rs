// src/core/cookies.rs
//
// On-disk cookie jar shared by every request of one account.
// Loaded before a request, updated from Set-Cookie, written back after.
// The file only appears once the remote has actually set a cookie, so
// "jar exists" doubles as "we have been handed a session".

use std::fs;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use cookie::{Cookie, Expiration};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(default)]
    pub host_only: bool,
    pub path: String,
    #[serde(default)]
    pub secure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>, // unix seconds; None = session cookie
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieJar {
    cookies: Vec<StoredCookie>,
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn jar_io(path: &Path, source: io::Error) -> TransportError {
    TransportError::CookieJar { path: path.display().to_string(), source }
}

impl CookieJar {
    /// Missing file is an empty jar.
    pub fn load(path: &Path) -> Result<Self, TransportError> {
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(jar_io(path, e)),
        };
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&text).map_err(|source| TransportError::CorruptJar {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), TransportError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| jar_io(path, e))?;
            }
        }
        let text = serde_json::to_string_pretty(self).map_err(|source| TransportError::CorruptJar {
            path: path.display().to_string(),
            source,
        })?;
        fs::write(path, text).map_err(|e| jar_io(path, e))
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn cookies(&self) -> &[StoredCookie] {
        &self.cookies
    }

    /// Apply one Set-Cookie header received for `url`. Returns false if unparseable.
    pub fn store_set_cookie(&mut self, header: &str, url: &Url) -> bool {
        let Ok(parsed) = Cookie::parse(header.to_string()) else {
            return false;
        };
        let Some(host) = url.host_str() else {
            return false;
        };
        let now = now_secs();

        let (domain, host_only) = match parsed.domain() {
            Some(d) => {
                let d = d.trim_start_matches('.').to_ascii_lowercase();
                if !domain_matches(host, &d, false) {
                    return false; // foreign domain
                }
                (d, false)
            }
            None => (host.to_ascii_lowercase(), true),
        };

        let path = match parsed.path() {
            Some(p) if p.starts_with('/') => p.to_string(),
            _ => default_path(url),
        };

        let expires = match parsed.max_age() {
            Some(age) => Some(now.saturating_add(age.whole_seconds())),
            None => match parsed.expires() {
                Some(Expiration::DateTime(dt)) => Some(dt.unix_timestamp()),
                _ => None,
            },
        };

        self.cookies
            .retain(|c| !(c.name == parsed.name() && c.domain == domain && c.path == path));

        if expires.is_some_and(|t| t <= now) {
            return true; // deletion
        }

        self.cookies.push(StoredCookie {
            name: parsed.name().to_string(),
            value: parsed.value().to_string(),
            domain,
            host_only,
            path,
            secure: parsed.secure().unwrap_or(false),
            expires,
        });
        true
    }

    /// `Cookie` header value for a request to `url`, if any cookie applies.
    pub fn header_for(&self, url: &Url) -> Option<String> {
        let host = url.host_str()?;
        let req_path = url.path();
        let https = url.scheme() == "https";
        let now = now_secs();

        let mut matching: Vec<&StoredCookie> = self
            .cookies
            .iter()
            .filter(|c| c.expires.is_none_or(|t| t > now))
            .filter(|c| !c.secure || https)
            .filter(|c| domain_matches(host, &c.domain, c.host_only))
            .filter(|c| path_matches(req_path, &c.path))
            .collect();

        if matching.is_empty() {
            return None;
        }
        // Longer paths first, as browsers do
        matching.sort_by(|a, b| b.path.len().cmp(&a.path.len()));

        Some(
            matching
                .iter()
                .map(|c| format!("{}={}", c.name, c.value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

fn domain_matches(host: &str, domain: &str, host_only: bool) -> bool {
    let host = host.to_ascii_lowercase();
    if host == domain {
        return true;
    }
    !host_only && host.ends_with(domain) && host[..host.len() - domain.len()].ends_with('.')
}

fn path_matches(req_path: &str, cookie_path: &str) -> bool {
    if req_path == cookie_path {
        return true;
    }
    req_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/') || req_path[cookie_path.len()..].starts_with('/'))
}

fn default_path(url: &Url) -> String {
    let p = url.path();
    match p.rfind('/') {
        Some(0) | None => s!("/"),
        Some(i) => s!(&p[..i]),
    }
}
