//! Synchronous IMAP backend
//!
//! [`ImapMailClient`] adapts an IMAP mailbox to the [`MailClient`]
//! capability surface. It holds credentials only and opens a fresh
//! session per operation, so the type stays `Sync` without any
//! connection locking.
//!
//! Adapter conventions:
//! - Item ids encode `uid:folder`, attachment ids `uid:part:folder`;
//!   both are opaque to the core.
//! - Every listed item is reported with the regular message class,
//!   since IMAP folders hold only mail.
//! - IMAP has no conversation index; the Message-ID header stands in
//!   for it.

use crate::attachment::{AttachmentId, AttachmentInfo};
use crate::client::{MailClient, MessageDetails};
use crate::config::ImapConfig;
use crate::error::{Error, Result};
use crate::folder::Folder;
use crate::item::{ItemId, MESSAGE_ITEM_CLASS, RawItem};
use crate::message::Recipient;
use chrono::Utc;
use mail_parser::{Message, MessageParser, MimeHeaders};
use std::net::TcpStream;
use tracing::{debug, warn};

type ImapSession = imap::Session<native_tls::TlsStream<TcpStream>>;

/// IMAP implementation of the remote mail client.
pub struct ImapMailClient {
    config: ImapConfig,
}

impl ImapMailClient {
    #[must_use]
    pub const fn new(config: ImapConfig) -> Self {
        Self { config }
    }

    fn connect(&self) -> Result<ImapSession> {
        let addr = (self.config.host.as_str(), self.config.port);
        debug!(host = %self.config.host, port = self.config.port, "Connecting to IMAP server");

        let tls = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(self.config.accept_invalid_certs)
            .build()
            .map_err(|e| Error::Tls(e.to_string()))?;

        let client = imap::connect(addr, &self.config.host, &tls)
            .map_err(|e| Error::Client(format!("Connection failed: {e}")))?;

        client
            .login(&self.config.username, &self.config.password)
            .map_err(|(e, _)| Error::Client(format!("Login failed: {e}")))
    }

    /// Fetch and parse the full body of one message, then hand it to
    /// `read` for extraction.
    fn with_message<T>(
        &self,
        folder: &str,
        uid: u32,
        read: impl FnOnce(&Message<'_>) -> T,
    ) -> Result<T> {
        let mut session = self.connect()?;
        session
            .examine(folder)
            .map_err(|e| Error::Client(format!("Failed to open {folder}: {e}")))?;

        let fetches = session
            .uid_fetch(uid.to_string(), "(BODY.PEEK[])")
            .map_err(|e| Error::Client(format!("Fetch failed: {e}")))?;

        let body = fetches
            .iter()
            .find_map(imap::types::Fetch::body)
            .ok_or_else(|| Error::Client(format!("No body returned for UID {uid} in {folder}")))?;

        let parser = MessageParser::default();
        let message = parser
            .parse(body)
            .ok_or_else(|| Error::Parse(format!("Unparsable message for UID {uid} in {folder}")))?;

        let value = read(&message);
        session.logout().ok();
        Ok(value)
    }
}

impl MailClient for ImapMailClient {
    fn list_folders(&self) -> Result<Vec<Folder>> {
        let mut session = self.connect()?;

        let names = session
            .list(Some(""), Some("*"))
            .map_err(|e| Error::Client(format!("List folders failed: {e}")))?;

        let mut folders = Vec::new();
        for name in names.iter().map(|n| n.name().to_string()) {
            // Containers flagged \Noselect reject EXAMINE; report them
            // as empty so resolution still sees them.
            let total_count = match session.examine(&name) {
                Ok(mailbox) => mailbox.exists,
                Err(e) => {
                    warn!(folder = %name, "EXAMINE failed, treating folder as empty: {e}");
                    0
                }
            };
            folders.push(Folder::new(name, total_count));
        }

        session.logout().ok();
        Ok(folders)
    }

    fn list_items(&self, folder: &Folder) -> Result<Vec<RawItem>> {
        let mut session = self.connect()?;

        let mailbox = session
            .examine(&folder.id)
            .map_err(|e| Error::Client(format!("Failed to open {folder}: {e}")))?;

        if mailbox.exists == 0 {
            session.logout().ok();
            return Ok(Vec::new());
        }

        let fetches = session
            .fetch("1:*", "(UID INTERNALDATE ENVELOPE)")
            .map_err(|e| Error::Client(format!("Listing fetch failed: {e}")))?;

        let mut items = Vec::new();
        for fetch in fetches.iter() {
            let Some(uid) = fetch.uid else {
                continue;
            };
            let Some(received_at) = fetch.internal_date() else {
                continue;
            };
            let subject = fetch
                .envelope()
                .and_then(|env| env.subject.as_ref())
                .map(|s| String::from_utf8_lossy(s).into_owned())
                .unwrap_or_default();

            items.push(RawItem {
                id: item_id(uid, &folder.id),
                item_class: MESSAGE_ITEM_CLASS.to_string(),
                subject,
                received_at: received_at.with_timezone(&Utc),
            });
        }

        session.logout().ok();
        Ok(items)
    }

    fn load_details(&self, item: &ItemId) -> Result<MessageDetails> {
        let (uid, folder) = parse_item_id(item)?;

        self.with_message(&folder, uid, |message| {
            let attachments = message
                .attachments()
                .enumerate()
                .map(|(index, part)| AttachmentInfo {
                    id: attachment_id(uid, index, &folder),
                    name: part
                        .attachment_name()
                        .map_or_else(|| format!("attachment-{index}"), ToString::to_string),
                    content_type: part.content_type().map(|ct| {
                        ct.subtype().map_or_else(
                            || ct.ctype().to_string(),
                            |sub| format!("{}/{sub}", ct.ctype()),
                        )
                    }),
                })
                .collect();

            MessageDetails {
                to: recipients_from(message.to()),
                cc: recipients_from(message.cc()),
                attachments,
                conversation_index: message
                    .message_id()
                    .map(|id| id.as_bytes().to_vec())
                    .unwrap_or_default(),
            }
        })
    }

    fn load_attachment_content(&self, attachment: &AttachmentId) -> Result<Vec<u8>> {
        let (uid, index, folder) = parse_attachment_id(attachment)?;

        self.with_message(&folder, uid, |message| {
            message
                .attachments()
                .nth(index)
                .map(|part| part.contents().to_vec())
        })?
        .ok_or_else(|| Error::Client(format!("No attachment at index {index} for UID {uid}")))
    }
}

fn item_id(uid: u32, folder: &str) -> ItemId {
    ItemId(format!("{uid}:{folder}"))
}

fn attachment_id(uid: u32, index: usize, folder: &str) -> AttachmentId {
    AttachmentId(format!("{uid}:{index}:{folder}"))
}

fn parse_item_id(id: &ItemId) -> Result<(u32, String)> {
    let malformed = || Error::Client(format!("Malformed item id: {id}"));
    let (uid, folder) = id.0.split_once(':').ok_or_else(malformed)?;
    let uid = uid.parse().map_err(|_| malformed())?;
    Ok((uid, folder.to_string()))
}

fn parse_attachment_id(id: &AttachmentId) -> Result<(u32, usize, String)> {
    let malformed = || Error::Client(format!("Malformed attachment id: {id}"));
    let (uid, rest) = id.0.split_once(':').ok_or_else(malformed)?;
    let (index, folder) = rest.split_once(':').ok_or_else(malformed)?;
    let uid = uid.parse().map_err(|_| malformed())?;
    let index = index.parse().map_err(|_| malformed())?;
    Ok((uid, index, folder.to_string()))
}

/// Flatten a parsed address header into ordered recipients, preserving
/// group members in place.
fn recipients_from(address: Option<&mail_parser::Address<'_>>) -> Vec<Recipient> {
    let Some(address) = address else {
        return Vec::new();
    };
    match address {
        mail_parser::Address::List(addrs) => addrs.iter().map(recipient_from_addr).collect(),
        mail_parser::Address::Group(groups) => groups
            .iter()
            .flat_map(|g| g.addresses.iter())
            .map(recipient_from_addr)
            .collect(),
    }
}

fn recipient_from_addr(addr: &mail_parser::Addr<'_>) -> Recipient {
    Recipient::new(
        addr.address.as_deref().unwrap_or_default(),
        addr.name.as_deref().unwrap_or_default(),
    )
}
