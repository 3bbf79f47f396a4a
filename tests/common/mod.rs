// tests/common/mod.rs
//
// Scripted stand-in for the alerts site. Renders pages in the same shape
// the real one does, rotates `sig` and row tokens on every read, and only
// accepts mutations that echo the newest tokens back.

#![allow(dead_code)]

use std::cell::{Ref, RefCell, RefMut};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use alert_scrape::config::consts::*;
use alert_scrape::core::{Method, Request, Transport};
use alert_scrape::{Client, ClientOptions, Credentials, TransportError};

pub const USER: &str = "me@example.com";
pub const PASSWORD: &str = "correct horse";

#[derive(Clone, Debug)]
pub struct RemoteAlert {
    pub id: u32,
    pub display: String,
    pub feed: Option<String>,
}

#[derive(Debug)]
pub struct RemoteState {
    pub password: String,
    pub alerts: Vec<RemoteAlert>,
    pub next_id: u32,
    pub generation: u32,        // bumps on every manage/create render
    pub manage_sig: String,
    pub create_sig: String,
    pub server_session: bool,   // what the site thinks, independent of the jar file
    pub write_jar: bool,        // false: login "succeeds" but no cookie lands on disk
    pub confirm_cookie: bool,
    pub reject_mutations: bool,
    pub drop_writes: bool,      // accept with a redirect, never apply
    pub drop_removals: bool,    // same, for deletions only
    pub provision_feeds: bool,
    pub omit_tokens: bool,      // render rows without the delete checkbox
    pub ignore_sessions: bool,  // alerts pages always answer with the login form
    pub logins: usize,
    pub log: Vec<(Method, String)>,
}

impl Default for RemoteState {
    fn default() -> Self {
        Self {
            password: PASSWORD.to_string(),
            alerts: Vec::new(),
            next_id: 1,
            generation: 0,
            manage_sig: String::new(),
            create_sig: String::new(),
            server_session: false,
            write_jar: true,
            confirm_cookie: true,
            reject_mutations: false,
            drop_writes: false,
            drop_removals: false,
            provision_feeds: true,
            omit_tokens: false,
            ignore_sessions: false,
            logins: 0,
            log: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeRemote {
    state: RefCell<RemoteState>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alerts(terms: &[(&str, Option<&str>)]) -> Self {
        let remote = Self::new();
        {
            let mut st = remote.state_mut();
            for (display, feed) in terms {
                let id = st.next_id;
                st.next_id += 1;
                st.alerts.push(RemoteAlert {
                    id,
                    display: display.to_string(),
                    feed: feed.map(str::to_string),
                });
            }
        }
        remote
    }

    pub fn state(&self) -> Ref<'_, RemoteState> {
        self.state.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, RemoteState> {
        self.state.borrow_mut()
    }

    pub fn count(&self, method: Method, url: &str) -> usize {
        self.state().log.iter().filter(|(m, u)| *m == method && u == url).count()
    }

    pub fn logins(&self) -> usize {
        self.state().logins
    }

    pub fn remote_terms(&self) -> Vec<String> {
        self.state().alerts.iter().map(|a| a.display.to_lowercase()).collect()
    }

    fn authed(st: &RemoteState, jar: &Path) -> bool {
        st.server_session && !st.ignore_sessions && jar.exists()
    }

    fn login(&self, req: &Request<'_>) -> String {
        let mut st = self.state_mut();
        st.logins += 1;
        if req.field("Email") != Some(USER) || req.field("Passwd") != Some(st.password.as_str()) {
            return s("<html><form action=\"LoginAuth\">Sign in. \
                      The username or password you entered is incorrect.</form></html>");
        }
        if req.field("PersistentCookie") != Some("yes") {
            return s("<html>missing PersistentCookie</html>");
        }
        st.server_session = true;
        if st.write_jar {
            let jar = r#"{"cookies":[{"name":"SID","value":"fake","domain":"google.com","path":"/"}]}"#;
            fs::write(req.cookie_jar, jar).expect("write fake jar");
        }
        s("<html><script>var LoginDoneHtml = 1;</script></html>")
    }

    fn check_cookie(&self) -> String {
        let st = self.state();
        if st.confirm_cookie && st.server_session {
            s("<a href=\"/accounts/ManageAccount\">My Account</a>")
        } else {
            s("<html>Your browser's cookie functionality is turned off.</html>")
        }
    }

    fn render_manage(&self) -> String {
        let mut st = self.state_mut();
        st.generation += 1;
        st.manage_sig = format!("MSIG{}", st.generation);

        let mut rows = String::new();
        if st.alerts.is_empty() {
            rows.push_str("<tr><td>You don't have any Google Alerts.</td></tr>");
        }
        for a in &st.alerts {
            let checkbox = if st.omit_tokens {
                String::new()
            } else {
                format!(r#"<input type=checkbox name="s" value="S{}-{}">"#, a.id, st.generation)
            };
            let feed = a
                .feed
                .as_ref()
                .map(|f| format!(r#"<a href="{f}">Feed</a>"#))
                .unwrap_or_else(|| s("Email"));
            rows.push_str(&format!(
                r#"<tr class="data_row"><td>{checkbox}</td><td><a href="http://news.google.com/news?q={id}">{term}</a></td><td>Comprehensive</td><td>as-it-happens</td><td>{feed}</td></tr>"#,
                id = a.id,
                term = escape(&a.display),
            ));
        }

        format!(
            r#"<html><script>function conditionallySetSingleSelectValue(a,b){{}}</script>
<form action="/alerts/save?hl=en&amp;gl=us" method=post>
<input type=hidden name="sig" value="{sig}">
<input type=hidden name=e value="{USER}">
<table class="alerts">
<tr class="header_row"><th></th><th>Search terms</th><th>Type</th><th>How often</th><th>Deliver to</th></tr>
{rows}
</table></form></html>"#,
            sig = st.manage_sig,
        )
    }

    fn render_create_form(&self) -> String {
        let mut st = self.state_mut();
        st.generation += 1;
        st.create_sig = format!("CSIG{}", st.generation);
        format!(
            r#"<html><script>conditionallySetSingleSelectValue</script>
<form action="/alerts/create?hl=en&amp;gl=us" method=post>
<input type=hidden name="sig" value="{}"><input name=q><select name=t></select></form></html>"#,
            st.create_sig
        )
    }

    fn create(&self, req: &Request<'_>) -> String {
        let mut st = self.state_mut();
        let valid = req.field("sig") == Some(st.create_sig.as_str())
            && req.field("t") == Some(SEARCH_TYPE_COMPREHENSIVE)
            && req.field("e") == Some(DELIVERY_FEED);
        if st.reject_mutations || !valid {
            return s("<html>Your request could not be processed.</html>");
        }
        let term = req.field("q").unwrap_or_default().to_string();
        if !st.drop_writes {
            let id = st.next_id;
            st.next_id += 1;
            let feed = st
                .provision_feeds
                .then(|| format!("http://www.google.com/alerts/feeds/0001/{id}"));
            st.alerts.push(RemoteAlert { id, display: term, feed });
        }
        moved()
    }

    fn save(&self, req: &Request<'_>) -> String {
        let mut st = self.state_mut();
        let valid = req.field("sig") == Some(st.manage_sig.as_str())
            && req.field("e") == Some(USER)
            && req.field("da") == Some(DELETE_ACTION);
        if st.reject_mutations || !valid {
            return s("<html>Your request could not be processed.</html>");
        }
        let generation = st.generation;
        let token = req.field("s").unwrap_or_default().to_string();
        let Some(pos) = st
            .alerts
            .iter()
            .position(|a| format!("S{}-{}", a.id, generation) == token)
        else {
            return s("<html>Unknown alert.</html>");
        };
        if !st.drop_writes && !st.drop_removals {
            st.alerts.remove(pos);
        }
        moved()
    }
}

impl Transport for FakeRemote {
    fn request(&self, req: &Request<'_>) -> Result<String, TransportError> {
        self.state_mut().log.push((req.method, req.url.to_string()));
        assert!(!req.user_agent.is_empty(), "requests must carry a user agent");
        assert!(!req.referer.is_empty(), "requests must carry a referer");

        let authed = Self::authed(&self.state(), req.cookie_jar);
        let body = match (req.method, req.url) {
            (Method::Post, LOGIN_AUTH_URL) => self.login(req),
            (Method::Get, CHECK_COOKIE_URL) => self.check_cookie(),
            (_, _) if !authed => login_page(),
            (Method::Get, MANAGE_URL) => self.render_manage(),
            (Method::Get, CREATE_FORM_URL) => self.render_create_form(),
            (Method::Post, CREATE_URL) => self.create(req),
            (Method::Post, SAVE_URL) => self.save(req),
            (m, u) => return Err(TransportError::Other(format!("unexpected {m:?} {u}"))),
        };
        Ok(body)
    }
}

fn s(v: &str) -> String {
    v.to_string()
}

fn moved() -> String {
    s("<HTML><HEAD><TITLE>Moved Temporarily</TITLE></HEAD>\
       <BODY>The document has moved <A HREF=\"http://www.google.com/alerts/manage\">here</A>.\
       </BODY></HTML>")
}

fn login_page() -> String {
    s("<html><form action=\"https://www.google.com/accounts/LoginAuth\">Sign in</form></html>")
}

fn escape(v: &str) -> String {
    v.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

pub fn jar_in(dir: &Path) -> PathBuf {
    dir.join("session.cookie")
}

pub fn options(jar: &Path) -> ClientOptions {
    ClientOptions::new(Credentials::new(USER, PASSWORD).unwrap())
        .with_cookie_jar(jar)
        .with_settle_delay(Duration::ZERO)
}

pub fn client(jar: &Path, remote: FakeRemote) -> Client<FakeRemote> {
    Client::with_transport(options(jar), remote)
}

pub fn client_with<T: Transport>(jar: &Path, transport: T) -> Client<T> {
    Client::with_transport(options(jar), transport)
}
