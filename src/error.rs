use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a ping cycle before a reachability sample exists.
///
/// A probe that goes out and simply gets no reply is not one of these; it is
/// recorded as a failed sample and the session keeps pinging.
#[derive(Debug, Error)]
pub enum PingError {
    #[error("invalid input")]
    InvalidTarget(String),

    #[error("could not resolve {host}")]
    Resolve {
        host: String,
        #[source]
        source: Option<io::Error>,
    },

    #[error("could not create ICMP client: {0}")]
    Client(#[source] io::Error),

    #[error("failed to send probe to {target}: {reason}")]
    Send { target: String, reason: String },
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not find config directory")]
    NoConfigDir,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Fatal errors that end the process with a non-zero status.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    #[error("could not open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
