//! Error types for mailbox-ingest

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The configured incoming-mail folder could not be resolved.
    /// Fatal for the current ingestion cycle.
    #[error("Mail folder not found: {0}")]
    FolderNotFound(String),

    /// A transport-layer failure reported by the remote mail client.
    #[error("Mail client error: {0}")]
    Client(String),

    #[error("Message parsing error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS error: {0}")]
    Tls(String),
}

pub type Result<T> = std::result::Result<T, Error>;
