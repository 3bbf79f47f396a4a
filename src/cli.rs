// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};

use crate::client::Client;
use crate::config::consts::SETTLE_DELAY_MS;
use crate::config::{ClientOptions, Credentials, LogOptions};
use crate::data::AlertList;
use crate::log::build_dispatch;

#[derive(Debug, Parser)]
#[command(name = "alerts", version, about = "Manage Google Alerts from the command line")]
pub struct Cli {
    /// Google account (email)
    #[arg(short, long, env = "ALERTS_USER")]
    pub user: String,

    #[arg(short, long, env = "ALERTS_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Cookie jar to use instead of the per-account default in the temp dir
    #[arg(long, env = "ALERTS_COOKIE_JAR")]
    pub cookie_jar: Option<PathBuf>,

    #[arg(long, env = "ALERTS_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// With --log-file, keep logging to stderr as well
    #[arg(long, requires = "log_file")]
    pub log_both: bool,

    /// -v debug, -vv trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Wait between a change and its verification read. Values below the
    /// default are raised to it; shorter waits report changes as failed.
    #[arg(long, default_value_t = SETTLE_DELAY_MS)]
    pub settle_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List alert terms and their feed URLs
    List,
    /// Add an alert
    Add { term: String },
    /// Remove an alert
    Remove { term: String },
    /// Replace one alert term with another
    Edit { old: String, new: String },
    /// Remove every alert on the account
    Purge,
    /// Drop the stored session and log in again
    Login,
}

impl Cli {
    fn client_options(&self) -> Result<ClientOptions> {
        let creds = Credentials::new(self.user.as_str(), self.password.as_str())?;
        let mut opts = ClientOptions::new(creds).with_settle_delay(self.settle_delay());
        if let Some(jar) = &self.cookie_jar {
            opts = opts.with_cookie_jar(jar);
        }
        if let Some(ua) = &self.user_agent {
            opts = opts.with_user_agent(ua.as_str());
        }
        Ok(opts)
    }

    fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms.max(SETTLE_DELAY_MS))
    }

    fn log_options(&self) -> LogOptions {
        let level = match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        match &self.log_file {
            Some(path) if self.log_both => LogOptions::to_file_and_stderr(path).with_level(level),
            Some(path) => LogOptions::to_file(path).with_level(level),
            None => LogOptions::default().with_level(level),
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    execute(&cli)
}

pub fn execute(cli: &Cli) -> Result<()> {
    let dispatch = build_dispatch(&cli.log_options()).wrap_err("could not open log sink")?;
    let mut client = Client::new(cli.client_options()?)?.with_logger(dispatch);

    match &cli.command {
        Command::List => {
            client.refresh()?;
            print_list(client.list().as_ref());
        }
        Command::Add { term } => {
            let done = client.add(term)?;
            println!("added '{}'", done.mutation.term());
            if let Some(feed) = done.feed_url {
                println!("  feed: {feed}");
            }
        }
        Command::Remove { term } => {
            let done = client.remove(term)?;
            println!("removed '{}'", done.mutation.term());
        }
        Command::Edit { old, new } => {
            let done = client.edit(old, new)?;
            println!("'{}' now replaces '{}'", done.mutation.term(), old);
        }
        Command::Purge => {
            let report = client.purge_all()?;
            println!(
                "purged {} of {} alerts ({} failed)",
                report.removed_count(),
                report.attempted,
                report.failed_count()
            );
            for (term, err) in &report.failed {
                eprintln!("  {term}: {err}");
            }
            if !report.is_clean() {
                return Err(eyre!("{} alerts could not be removed", report.failed_count()));
            }
        }
        Command::Login => {
            client.login()?;
            println!("session stored at {}", client.cookie_jar().display());
        }
    }
    Ok(())
}

fn print_list(list: Option<&AlertList>) {
    match list {
        None => println!("alerts were not loaded"),
        Some(l) if l.is_empty() => println!("no alerts defined for this account"),
        Some(l) => {
            for (term, feed) in l {
                println!("{},{}", term, feed.as_deref().unwrap_or(""));
            }
        }
    }
}
