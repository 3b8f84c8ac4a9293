//! Remote mail client capability trait
//!
//! The ingestion core consumes an already-authenticated remote mail
//! client through [`MailClient`] and never names a concrete mail SDK.
//! Backends (see the `imap-backend` feature) adapt their protocol to
//! this surface; tests substitute an in-process fake.
//!
//! All calls are synchronous and may block on network I/O. Callers that
//! need concurrency parallelize above this crate; implementations must
//! therefore be `Send + Sync`.

use crate::attachment::{AttachmentId, AttachmentInfo};
use crate::error::Result;
use crate::folder::Folder;
use crate::item::{ItemId, RawItem};
use crate::message::Recipient;

/// Full per-message details, loaded on demand.
///
/// The folder listing is deliberately cheap (see [`RawItem`]); recipient
/// lists, attachment metadata and the conversation index require this
/// second fetch. Recipient order is preserved as reported by the remote
/// client.
#[derive(Debug, Clone, Default)]
pub struct MessageDetails {
    pub to: Vec<Recipient>,
    pub cc: Vec<Recipient>,
    pub attachments: Vec<AttachmentInfo>,
    /// Opaque conversation index bytes; identity derivation happens in
    /// the message wrapper.
    pub conversation_index: Vec<u8>,
}

/// Capability surface of the remote mail service.
///
/// Implementations hold whatever they need to reach the service
/// (typically credentials, opening a session per call); the core holds
/// no connection state. Errors are transport-layer failures and
/// propagate to the caller unmodified.
pub trait MailClient: Send + Sync {
    /// Enumerate every folder accessible to the authenticated account,
    /// nested folders included.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote listing fails.
    fn list_folders(&self) -> Result<Vec<Folder>>;

    /// Summary listing of all items in a folder.
    ///
    /// Implementations should list in ascending received order where
    /// the protocol allows it; the manager re-sorts defensively either
    /// way.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote fetch fails.
    fn list_items(&self, folder: &Folder) -> Result<Vec<RawItem>>;

    /// Load recipients, attachment metadata and the conversation index
    /// for one message item.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote detail fetch fails.
    fn load_details(&self, item: &ItemId) -> Result<MessageDetails>;

    /// Load the binary content of one attachment.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote content fetch fails.
    fn load_attachment_content(&self, attachment: &AttachmentId) -> Result<Vec<u8>>;
}
