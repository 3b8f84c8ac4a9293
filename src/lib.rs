//! Mailbox ingestion and filtering core
//!
//! Monitors a folder of a remote mailbox, filters incoming messages
//! against a configured recipient set, and normalizes the qualifying
//! messages (and their attachments) for a downstream processing
//! pipeline. The remote mail service is consumed through the
//! [`MailClient`] capability trait; a synchronous IMAP backend is
//! available behind the `imap-backend` feature.
//!
//! The core is synchronous, single-threaded and pull-based: an
//! external driver calls [`MailboxManager::read_messages`] per cycle
//! and reports each handled message back through
//! [`MailboxManager::on_processing_finished`].

mod attachment;
mod client;
mod config;
mod error;
mod folder;
#[cfg(feature = "imap-backend")]
mod imap;
mod item;
mod manager;
mod matcher;
mod message;
mod resolver;

pub use attachment::{AttachmentId, AttachmentInfo, IncomingAttachment, PROCESSED_MARKER};
pub use client::{MailClient, MessageDetails};
pub use config::MailboxConfig;
#[cfg(feature = "imap-backend")]
pub use config::ImapConfig;
pub use error::{Error, Result};
pub use folder::Folder;
#[cfg(feature = "imap-backend")]
pub use imap::ImapMailClient;
pub use item::{ItemId, ItemKind, MESSAGE_ITEM_CLASS, RawItem};
pub use manager::{MailboxManager, PostProcessor};
pub use matcher::should_consider;
pub use message::{IncomingMessage, MessageSummary, Recipient};
pub use resolver::find_folder_by_name;
