// src/protocol.rs
//
// Verify-after-write for alert mutations. The remote offers no receipts
// and no transactions, so every mutation runs:
//
//   EnsureSession -> Precheck -> SubmitForm -> SettleDelay -> Reverify
//
// and is only reported as confirmed once a fresh read of the manage page
// shows the expected end state.

use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::config::consts::*;
use crate::core::Transport;
use crate::core::sanitize::fold_term;
use crate::data::PurgeReport;
use crate::directory::AlertDirectory;
use crate::error::MutationError;
use crate::scrape::{confirm_redirect, parse_create_alert_form};
use crate::session::SessionManager;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    EnsureSession,
    Precheck,
    SubmitForm,
    SettleDelay,
    Reverify,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    Add(String),
    Remove(String),
}

impl Mutation {
    /// Build with the term already folded to its key form.
    pub fn add(term: &str) -> Self {
        Self::Add(fold_term(term))
    }

    pub fn remove(term: &str) -> Self {
        Self::Remove(fold_term(term))
    }

    pub fn term(&self) -> &str {
        match self {
            Self::Add(t) | Self::Remove(t) => t,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Remove(_) => "remove",
        }
    }

    /// Whether the term must be present once the mutation has landed.
    fn present_after(&self) -> bool {
        matches!(self, Self::Add(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmed {
    pub mutation: Mutation,
    pub feed_url: Option<String>, // for adds, the feed the remote provisioned
}

pub struct MutationProtocol<'a> {
    session: &'a SessionManager,
    transport: &'a dyn Transport,
    directory: &'a mut AlertDirectory,
    settle_delay: Duration,
}

impl<'a> MutationProtocol<'a> {
    pub fn new(
        session: &'a SessionManager,
        transport: &'a dyn Transport,
        directory: &'a mut AlertDirectory,
        settle_delay: Duration,
    ) -> Self {
        Self { session, transport, directory, settle_delay }
    }

    pub fn run(&mut self, mutation: &Mutation) -> Result<Confirmed, MutationError> {
        let term = mutation.term();
        let action = mutation.action();

        debug!(?mutation, step = ?Step::EnsureSession);
        self.session.ensure_session(self.transport)?;

        debug!(?mutation, step = ?Step::Precheck);
        self.directory.refresh(self.session, self.transport)?;
        match mutation {
            Mutation::Add(_) if self.directory.contains(term) => {
                warn!(term, "not adding, alert already exists");
                return Err(MutationError::AlreadyExists(s!(term)));
            }
            Mutation::Remove(_) if !self.directory.contains(term) => {
                warn!(term, "not removing, alert does not exist");
                return Err(MutationError::NotFound(s!(term)));
            }
            _ => {}
        }

        debug!(?mutation, step = ?Step::SubmitForm);
        let body = match mutation {
            Mutation::Add(_) => self.submit_add(term)?,
            Mutation::Remove(_) => self.submit_remove(term)?,
        };
        if !confirm_redirect(&body) {
            error!(term, action, "remote did not accept the request");
            return Err(MutationError::RemoteRejected { action, term: s!(term) });
        }

        let delay_ms = self.settle_delay.as_millis() as u64;
        debug!(?mutation, step = ?Step::SettleDelay, delay_ms);
        if !self.settle_delay.is_zero() {
            thread::sleep(self.settle_delay);
        }

        debug!(?mutation, step = ?Step::Reverify);
        self.directory.refresh(self.session, self.transport)?;
        if self.directory.contains(term) != mutation.present_after() {
            error!(term, action, "mutation not visible after refresh");
            return Err(MutationError::VerificationFailed { action, term: s!(term) });
        }

        let feed_url = self.directory.get(term).and_then(|e| e.feed_url.clone());
        info!(term, action, "confirmed");
        Ok(Confirmed { mutation: mutation.clone(), feed_url })
    }

    fn submit_add(&self, term: &str) -> Result<String, MutationError> {
        // The create form carries its own sig, distinct from the manage page's.
        let sig = self.session.fetch_scraped(
            self.transport,
            CREATE_FORM_URL,
            ALERTS_REFERER,
            parse_create_alert_form,
        )?;

        let form = vec![
            ("sig", sig),
            ("q", s!(term)),
            ("t", s!(SEARCH_TYPE_COMPREHENSIVE)),
            ("e", s!(DELIVERY_FEED)),
        ];
        Ok(self.session.post(self.transport, CREATE_URL, ALERTS_REFERER, form)?)
    }

    fn submit_remove(&self, term: &str) -> Result<String, MutationError> {
        let Some(snapshot) = self.directory.snapshot() else {
            return Err(MutationError::NotFound(s!(term)));
        };
        let token = snapshot
            .get(term)
            .and_then(|e| e.deletion_token.clone())
            .ok_or_else(|| MutationError::MissingDeletionToken(s!(term)))?;

        let form = vec![
            ("e", snapshot.form.email.clone()),
            ("sig", snapshot.form.sig.clone()),
            ("s", token),
            ("da", s!(DELETE_ACTION)),
        ];
        Ok(self.session.post(self.transport, SAVE_URL, MANAGE_URL, form)?)
    }

    /// Rename: remove `old`, then add `new` whatever the removal returned.
    /// The result is the add's result.
    pub fn edit(&mut self, old: &str, new: &str) -> Result<Confirmed, MutationError> {
        match self.run(&Mutation::remove(old)) {
            Ok(_) => {}
            Err(MutationError::NotFound(t)) => {
                warn!(term = %t, "old term was already gone, adding new term anyway")
            }
            Err(e) => {
                warn!(term = old, error = %e, "could not remove old term, adding new term anyway")
            }
        }
        self.run(&Mutation::add(new))
    }

    /// Remove every alert seen at the start, one at a time.
    /// A failed removal is recorded and the loop moves on.
    pub fn purge_all(&mut self) -> Result<PurgeReport, MutationError> {
        self.session.ensure_session(self.transport)?;
        let terms = self.directory.refresh(self.session, self.transport)?.terms();

        let mut report = PurgeReport { attempted: terms.len(), ..PurgeReport::default() };
        if terms.is_empty() {
            warn!("no alerts defined, nothing to purge");
            return Ok(report);
        }

        for term in terms {
            match self.run(&Mutation::Remove(term.clone())) {
                Ok(_) => report.removed.push(term),
                Err(e) => {
                    warn!(term = %term, error = %e, "purge could not remove alert");
                    report.failed.push((term, e));
                }
            }
        }

        info!(removed = report.removed_count(), failed = report.failed_count(), "purge finished");
        Ok(report)
    }
}
