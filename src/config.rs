//! Ingestion configuration
//!
//! Configuration is owned by the embedding application; this module
//! only defines the shape the core consumes and an environment-based
//! loader in the same mold for each config struct. A `.env` file is
//! honored when present.

use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Configuration for one monitored mailbox folder.
#[derive(Debug, Clone)]
pub struct MailboxConfig {
    /// Display name or path of the folder to ingest from.
    pub folder: String,
    /// Recipient filter entries (addresses or display names). `None`
    /// or an empty list means no filtering.
    pub recipients: Option<Vec<String>>,
    /// Derive message identity from the conversation GUID only.
    /// Consumed opaquely by the message wrapper.
    pub conversation_guid_only: bool,
    /// Staging directory for attachment materialization.
    pub scratch_dir: PathBuf,
}

impl MailboxConfig {
    /// Configuration for `folder` with no filter and the system temp
    /// directory as scratch space.
    #[must_use]
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            recipients: None,
            conversation_guid_only: false,
            scratch_dir: env::temp_dir(),
        }
    }

    /// Load mailbox configuration from environment variables.
    ///
    /// Reads from `.env` if present. Required:
    /// - `MAILBOX_FOLDER`
    ///
    /// Optional:
    /// - `MAILBOX_RECIPIENTS` (comma-separated addresses/names)
    /// - `MAILBOX_CONVERSATION_GUID_ONLY` (default: `false`)
    /// - `MAILBOX_SCRATCH_DIR` (default: system temp directory)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a required variable is missing or
    /// a value fails to parse.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            folder: env::var("MAILBOX_FOLDER")
                .map_err(|_| Error::Config("MAILBOX_FOLDER not set".into()))?,
            recipients: env::var("MAILBOX_RECIPIENTS").ok().map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect()
            }),
            conversation_guid_only: env_bool("MAILBOX_CONVERSATION_GUID_ONLY")?,
            scratch_dir: env::var("MAILBOX_SCRATCH_DIR")
                .map_or_else(|_| env::temp_dir(), PathBuf::from),
        })
    }
}

/// IMAP connection configuration for the bundled backend.
#[cfg(feature = "imap-backend")]
#[derive(Debug, Clone)]
pub struct ImapConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Accept self-signed certificates (local bridges, test servers).
    pub accept_invalid_certs: bool,
}

#[cfg(feature = "imap-backend")]
impl ImapConfig {
    /// Load IMAP configuration from environment variables.
    ///
    /// Reads from `.env` if present. Required variables:
    /// - `IMAP_HOST`
    /// - `IMAP_USERNAME`
    /// - `IMAP_PASSWORD`
    ///
    /// Optional (with defaults):
    /// - `IMAP_PORT` (default: `993`)
    /// - `IMAP_ACCEPT_INVALID_CERTS` (default: `false`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a required variable is missing or
    /// a value fails to parse.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            host: env::var("IMAP_HOST").map_err(|_| Error::Config("IMAP_HOST not set".into()))?,
            port: env::var("IMAP_PORT")
                .unwrap_or_else(|_| "993".to_string())
                .parse()
                .map_err(|e| Error::Config(format!("Invalid IMAP_PORT: {e}")))?,
            username: env::var("IMAP_USERNAME")
                .map_err(|_| Error::Config("IMAP_USERNAME not set".into()))?,
            password: env::var("IMAP_PASSWORD")
                .map_err(|_| Error::Config("IMAP_PASSWORD not set".into()))?,
            accept_invalid_certs: env_bool("IMAP_ACCEPT_INVALID_CERTS")?,
        })
    }
}

/// Parse an optional boolean variable; absent means `false`.
fn env_bool(var: &str) -> Result<bool> {
    env::var(var).map_or(Ok(false), |raw| match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(Error::Config(format!("Invalid {var}: {other}"))),
    })
}
