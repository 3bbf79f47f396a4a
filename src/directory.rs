// src/directory.rs
use tracing::debug;

use crate::config::consts::{ALERTS_REFERER, MANAGE_URL};
use crate::core::Transport;
use crate::data::{AlertEntry, AlertList, Directory};
use crate::error::FetchError;
use crate::scrape;
use crate::session::SessionManager;

/// Last synchronized view of the remote alerts.
///
/// `None` until the first successful refresh. Each refresh replaces the
/// whole directory; nothing from an earlier read survives it.
#[derive(Debug, Default)]
pub struct AlertDirectory {
    current: Option<Directory>,
}

impl AlertDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh(
        &mut self,
        session: &SessionManager,
        transport: &dyn Transport,
    ) -> Result<&Directory, FetchError> {
        let dir = session.fetch_scraped(
            transport,
            MANAGE_URL,
            ALERTS_REFERER,
            scrape::parse_management_page,
        )?;
        debug!(alerts = dir.len(), "directory refreshed");
        let dir = self.current.insert(dir);
        Ok(&*dir)
    }

    /// `None` = never refreshed; `Some(empty)` = refreshed, account has no alerts.
    pub fn list(&self) -> Option<AlertList> {
        self.current.as_ref().map(Directory::to_list)
    }

    pub fn snapshot(&self) -> Option<&Directory> {
        self.current.as_ref()
    }

    pub fn get(&self, term: &str) -> Option<&AlertEntry> {
        self.current.as_ref()?.get(term)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.get(term).is_some()
    }
}
