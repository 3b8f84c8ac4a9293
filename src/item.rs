//! Folder listing entries
//!
//! A folder listing returns [`RawItem`]s, not messages: mailbox folders
//! can hold calendar invites, contacts, delivery reports and other
//! non-mail items alongside regular messages. [`RawItem::kind`]
//! classifies an entry from its item-class string; only
//! [`ItemKind::Message`] entries are ever surfaced by the manager.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Item class reported for regular mail messages (MAPI convention).
/// Subclasses such as `IPM.Note.SMIME` are still mail.
pub const MESSAGE_ITEM_CLASS: &str = "IPM.Note";

/// Backend-specific identifier for one item in a folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coarse classification of a listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// A regular mail message.
    Message,
    /// Anything else a folder can hold; never surfaced.
    Other,
}

/// One entry of a folder listing, as reported by the summary fetch.
///
/// Carries only what the cheap listing provides: identity,
/// classification input, subject and the received timestamp used for
/// ordering. Recipients and attachments require the on-demand detail
/// load ([`MailClient::load_details`]).
///
/// [`MailClient::load_details`]: crate::MailClient::load_details
#[derive(Debug, Clone, Serialize)]
pub struct RawItem {
    pub id: ItemId,
    /// MAPI-style item class string (e.g. `IPM.Note`).
    pub item_class: String,
    pub subject: String,
    pub received_at: DateTime<Utc>,
}

impl RawItem {
    /// Classify this entry from its item-class string.
    ///
    /// `IPM.Note` and its subclasses are messages; everything else
    /// (meeting requests, contacts, reports, ...) is [`ItemKind::Other`].
    /// Matching is case-insensitive.
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        let class = self.item_class.as_bytes();
        let prefix = MESSAGE_ITEM_CLASS.as_bytes();
        // "IPM.Note" exactly, or a subclass "IPM.Note.*" -- but not
        // e.g. "IPM.NoteWorthy".
        if class.len() >= prefix.len()
            && class[..prefix.len()].eq_ignore_ascii_case(prefix)
            && (class.len() == prefix.len() || class[prefix.len()] == b'.')
        {
            ItemKind::Message
        } else {
            ItemKind::Other
        }
    }
}
