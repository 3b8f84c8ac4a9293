//! Normalized incoming messages
//!
//! [`IncomingMessage`] is the entity handed to callers by
//! [`MailboxManager::read_messages`]: an immutable snapshot of one
//! qualifying message with its recipients and attachments, plus a
//! reference back to the underlying listing entry for downstream use.
//!
//! [`MailboxManager::read_messages`]: crate::MailboxManager::read_messages

use crate::attachment::IncomingAttachment;
use crate::client::{MailClient, MessageDetails};
use crate::item::RawItem;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;

/// One To/Cc entry of a message.
///
/// Address and display name are identity-relevant case-insensitively
/// (ordinal fold, locale-independent): `PartialEq` and `Hash` operate
/// on the ASCII-folded forms. The display name may be empty.
#[derive(Debug, Clone, Serialize)]
pub struct Recipient {
    pub address: String,
    pub name: String,
}

impl Recipient {
    #[must_use]
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
        }
    }
}

impl PartialEq for Recipient {
    fn eq(&self, other: &Self) -> bool {
        self.address.eq_ignore_ascii_case(&other.address)
            && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for Recipient {}

impl Hash for Recipient {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.to_ascii_lowercase().hash(state);
        self.name.to_ascii_lowercase().hash(state);
    }
}

/// A normalized message returned by one ingestion cycle.
///
/// Immutable once constructed and owned exclusively by the caller;
/// instances are rebuilt fresh on every cycle and carry no state across
/// cycles.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    raw: RawItem,
    to: Vec<Recipient>,
    cc: Vec<Recipient>,
    attachments: Vec<IncomingAttachment>,
    conversation_id: String,
}

impl IncomingMessage {
    /// Wrap a classified listing entry and its loaded details.
    ///
    /// `conversation_guid_only` controls identity derivation: when set,
    /// only the stable GUID portion of the conversation index (bytes
    /// 6..22 of an Exchange-style index) identifies the conversation;
    /// otherwise the full index does. The flag's meaning beyond that is
    /// a downstream concern.
    pub(crate) fn new(
        raw: RawItem,
        details: MessageDetails,
        client: Arc<dyn MailClient>,
        conversation_guid_only: bool,
        scratch_dir: &Path,
    ) -> Self {
        let conversation_id =
            derive_conversation_id(&details.conversation_index, conversation_guid_only);
        let attachments = details
            .attachments
            .into_iter()
            .map(|info| IncomingAttachment::new(Arc::clone(&client), info, scratch_dir, None))
            .collect();
        Self {
            raw,
            to: details.to,
            cc: details.cc,
            attachments,
            conversation_id,
        }
    }

    /// The ordering key: when the remote service received the message.
    #[must_use]
    pub const fn received_at(&self) -> DateTime<Utc> {
        self.raw.received_at
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.raw.subject
    }

    /// The listing entry this message was built from.
    #[must_use]
    pub const fn raw_item(&self) -> &RawItem {
        &self.raw
    }

    #[must_use]
    pub fn to_recipients(&self) -> &[Recipient] {
        &self.to
    }

    #[must_use]
    pub fn cc_recipients(&self) -> &[Recipient] {
        &self.cc
    }

    #[must_use]
    pub fn attachments(&self) -> &[IncomingAttachment] {
        &self.attachments
    }

    /// Conversation identity under the configured derivation flag.
    #[must_use]
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// A serializable view for reporting and CLI output.
    #[must_use]
    pub fn summary(&self) -> MessageSummary<'_> {
        MessageSummary {
            id: &self.raw.id.0,
            subject: &self.raw.subject,
            received_at: self.raw.received_at,
            to: &self.to,
            cc: &self.cc,
            attachment_count: self.attachments.len(),
            conversation_id: &self.conversation_id,
        }
    }
}

/// Borrowed, serializable projection of an [`IncomingMessage`].
#[derive(Debug, Serialize)]
pub struct MessageSummary<'a> {
    pub id: &'a str,
    pub subject: &'a str,
    pub received_at: DateTime<Utc>,
    pub to: &'a [Recipient],
    pub cc: &'a [Recipient],
    pub attachment_count: usize,
    pub conversation_id: &'a str,
}

/// Hex-encode the conversation index, optionally reduced to its GUID
/// portion. Indexes shorter than a full 22-byte header are encoded
/// whole.
fn derive_conversation_id(index: &[u8], guid_only: bool) -> String {
    let bytes = if guid_only && index.len() >= 22 {
        &index[6..22]
    } else {
        index
    };
    bytes.iter().fold(String::new(), |mut out, b| {
        let _ = write!(out, "{b:02X}");
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn recipient_equality_ignores_case() {
        let a = Recipient::new("Alice@Example.com", "Alice");
        let b = Recipient::new("alice@example.com", "ALICE");
        assert_eq!(a, b);
    }

    #[test]
    fn recipient_hash_agrees_with_eq() {
        let mut set = HashSet::new();
        set.insert(Recipient::new("Bob@Example.com", "Bob"));
        assert!(set.contains(&Recipient::new("bob@example.com", "BOB")));
    }

    #[test]
    fn different_addresses_differ() {
        assert_ne!(
            Recipient::new("alice@example.com", ""),
            Recipient::new("bob@example.com", "")
        );
    }

    #[test]
    fn conversation_id_full_index() {
        assert_eq!(derive_conversation_id(&[0x01, 0xAB, 0xFF], false), "01ABFF");
    }

    #[test]
    fn conversation_id_guid_only_takes_guid_bytes() {
        // 22-byte header: 6 bytes of reserved+timestamp, then the GUID.
        let mut index = vec![0u8; 6];
        index.extend(1u8..=16);
        let id = derive_conversation_id(&index, true);
        assert_eq!(id, "0102030405060708090A0B0C0D0E0F10");
    }

    #[test]
    fn conversation_id_guid_only_short_index_encoded_whole() {
        assert_eq!(derive_conversation_id(&[0xDE, 0xAD], true), "DEAD");
    }
}
