// src/client.rs
use std::path::Path;
use std::time::Duration;

use tracing::Dispatch;

use crate::config::ClientOptions;
use crate::core::{HttpTransport, Transport};
use crate::data::{AlertList, PurgeReport};
use crate::directory::AlertDirectory;
use crate::error::{AuthError, FetchError, MutationError, TransportError};
use crate::protocol::{Confirmed, Mutation, MutationProtocol};
use crate::session::SessionManager;

/// Public surface: list, add, remove, edit, purge.
///
/// Building a client does no I/O. Nothing is fetched until `refresh`,
/// `login` or a mutation is called. `list` only reports what the last
/// refresh (explicit or as part of a mutation) saw.
///
/// ```no_run
/// use alert_scrape::{Client, ClientOptions, Credentials};
///
/// let creds = Credentials::new("me@example.com", "secret")?;
/// let mut client = Client::new(ClientOptions::new(creds))?;
/// client.refresh()?;
/// client.add("rust release")?;
/// println!("{:?}", client.list());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Client<T: Transport = HttpTransport> {
    transport: T,
    session: SessionManager,
    directory: AlertDirectory,
    settle_delay: Duration,
    logger: Option<Dispatch>,
}

impl Client<HttpTransport> {
    pub fn new(options: ClientOptions) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(options.request_timeout)?;
        Ok(Self::with_transport(options, transport))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(options: ClientOptions, transport: T) -> Self {
        let session = SessionManager::new(
            options.credentials.clone(),
            options.cookie_jar_path(),
            options.user_agent(),
        );
        Self {
            transport,
            session,
            directory: AlertDirectory::new(),
            settle_delay: options.settle_delay,
            logger: None,
        }
    }

    /// Route this client's events to `dispatch` instead of the ambient subscriber.
    pub fn with_logger(mut self, dispatch: Dispatch) -> Self {
        self.logger = Some(dispatch);
        self
    }

    pub fn cookie_jar(&self) -> &Path {
        self.session.cookie_jar()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn protocol(&mut self) -> MutationProtocol<'_> {
        MutationProtocol::new(
            &self.session,
            &self.transport,
            &mut self.directory,
            self.settle_delay,
        )
    }

    /// Re-read the manage page, replacing the local view.
    pub fn refresh(&mut self) -> Result<(), FetchError> {
        let dispatch = self.logger.clone();
        with_dispatch(dispatch, || {
            self.directory.refresh(&self.session, &self.transport).map(|_| ())
        })
    }

    /// term → feed URL as of the last refresh. `None` if never refreshed.
    pub fn list(&self) -> Option<AlertList> {
        self.directory.list()
    }

    /// Discard the stored session and log in again.
    pub fn login(&self) -> Result<(), AuthError> {
        with_dispatch(self.logger.clone(), || self.session.force_reauthenticate(&self.transport))
    }

    pub fn add(&mut self, term: &str) -> Result<Confirmed, MutationError> {
        let dispatch = self.logger.clone();
        let mutation = Mutation::add(term);
        let mut protocol = self.protocol();
        with_dispatch(dispatch, || protocol.run(&mutation))
    }

    pub fn remove(&mut self, term: &str) -> Result<Confirmed, MutationError> {
        let dispatch = self.logger.clone();
        let mutation = Mutation::remove(term);
        let mut protocol = self.protocol();
        with_dispatch(dispatch, || protocol.run(&mutation))
    }

    pub fn edit(&mut self, old: &str, new: &str) -> Result<Confirmed, MutationError> {
        let dispatch = self.logger.clone();
        let mut protocol = self.protocol();
        with_dispatch(dispatch, || protocol.edit(old, new))
    }

    pub fn purge_all(&mut self) -> Result<PurgeReport, MutationError> {
        let dispatch = self.logger.clone();
        let mut protocol = self.protocol();
        with_dispatch(dispatch, || protocol.purge_all())
    }
}

// Scoped, never global: other clients in the process keep their own sinks.
fn with_dispatch<R>(dispatch: Option<Dispatch>, f: impl FnOnce() -> R) -> R {
    match dispatch {
        Some(d) => tracing::dispatcher::with_default(&d, f),
        None => f(),
    }
}
