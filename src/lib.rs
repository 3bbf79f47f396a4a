// src/lib.rs

#[macro_use]
pub mod macros;

pub mod client;
pub mod config;
pub mod core;
pub mod data;
pub mod directory;
pub mod error;
pub mod log;
pub mod protocol;
pub mod scrape;
pub mod session;

#[cfg(feature = "cli")]
pub mod cli;

pub use client::Client;
pub use config::{ClientOptions, Credentials, LogOptions};
pub use data::{AlertEntry, AlertList, Directory, FormContext, PurgeReport};
pub use error::{AuthError, ConfigError, FetchError, MutationError, ScrapeError, TransportError};
pub use protocol::{Confirmed, Mutation};
