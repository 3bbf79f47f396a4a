// src/log.rs
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use tracing::Dispatch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::fmt::time::FormatTime;

use crate::config::options::{LogOptions, LogTarget};

/// `[HH:MM:SS.mmm]` since the dispatch was built.
#[derive(Clone, Copy, Debug)]
pub struct Elapsed(Instant);

impl Elapsed {
    pub fn start() -> Self {
        Self(Instant::now())
    }
}

impl FormatTime for Elapsed {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", fmt_elapsed(self.0.elapsed().as_millis()))
    }
}

fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Build a log sink without installing it anywhere.
/// Hand it to `Client::with_logger`, or install it yourself.
pub fn build_dispatch(opts: &LogOptions) -> io::Result<Dispatch> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(&opts.level))
        .with_timer(Elapsed::start())
        .with_target(false);

    let dispatch = match &opts.target {
        LogTarget::Stderr => Dispatch::new(builder.with_writer(io::stderr).finish()),
        LogTarget::File(path) => {
            let file = open_append(path)?;
            Dispatch::new(builder.with_ansi(false).with_writer(Mutex::new(file)).finish())
        }
        LogTarget::Both(path) => {
            let file = open_append(path)?;
            let tee = io::stderr.and(Mutex::new(file));
            Dispatch::new(builder.with_ansi(false).with_writer(tee).finish())
        }
    };
    Ok(dispatch)
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}
