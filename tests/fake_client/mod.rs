//! In-process fake mail client for integration testing
//!
//! Implements [`MailClient`] over fixture data built with
//! [`FakeMailboxBuilder`]:
//!
//! ```ignore
//! let client = FakeMailboxBuilder::new()
//!     .folder("Inbox/Bugs")
//!     .message("m1", ts(100), "First")
//!     .with_to("alice@example.com", "Alice")
//!     .with_attachment("report.pdf", b"%PDF")
//!     .item("i2", "IPM.Schedule.Meeting.Request", ts(150), "Invite")
//!     .build();
//! ```
//!
//! The fake counts listing and detail fetches so tests can assert that
//! cheap paths (e.g. the empty-folder early return) really skip the
//! expensive calls.

// Not every test binary uses every helper.
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use mailbox_ingest::{
    AttachmentId, AttachmentInfo, Error, Folder, ItemId, MailClient, MessageDetails, RawItem,
    Recipient, Result, MESSAGE_ITEM_CLASS,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

struct FakeItem {
    raw: RawItem,
    details: MessageDetails,
}

struct FakeFolder {
    name: String,
    items: Vec<FakeItem>,
}

/// A [`MailClient`] double backed by fixture data.
pub struct FakeMailClient {
    folders: Vec<FakeFolder>,
    attachment_contents: HashMap<String, Vec<u8>>,
    fail_detail_loads: bool,
    list_items_calls: AtomicUsize,
    load_details_calls: AtomicUsize,
}

impl FakeMailClient {
    /// Number of folder listings served so far.
    pub fn listing_calls(&self) -> usize {
        self.list_items_calls.load(Ordering::SeqCst)
    }

    /// Number of detail loads served so far.
    pub fn detail_calls(&self) -> usize {
        self.load_details_calls.load(Ordering::SeqCst)
    }
}

impl MailClient for FakeMailClient {
    fn list_folders(&self) -> Result<Vec<Folder>> {
        Ok(self
            .folders
            .iter()
            .map(|f| Folder::new(f.name.clone(), u32::try_from(f.items.len()).unwrap()))
            .collect())
    }

    fn list_items(&self, folder: &Folder) -> Result<Vec<RawItem>> {
        self.list_items_calls.fetch_add(1, Ordering::SeqCst);
        let folder = self
            .folders
            .iter()
            .find(|f| f.name == folder.id)
            .ok_or_else(|| Error::Client(format!("unknown folder {}", folder.id)))?;
        Ok(folder.items.iter().map(|i| i.raw.clone()).collect())
    }

    fn load_details(&self, item: &ItemId) -> Result<MessageDetails> {
        self.load_details_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_detail_loads {
            return Err(Error::Client("detail load refused by test".into()));
        }
        self.folders
            .iter()
            .flat_map(|f| f.items.iter())
            .find(|i| i.raw.id == *item)
            .map(|i| i.details.clone())
            .ok_or_else(|| Error::Client(format!("unknown item {item}")))
    }

    fn load_attachment_content(&self, attachment: &AttachmentId) -> Result<Vec<u8>> {
        self.attachment_contents
            .get(&attachment.0)
            .cloned()
            .ok_or_else(|| Error::Client(format!("unknown attachment {attachment}")))
    }
}

/// Builder for [`FakeMailClient`] fixtures.
///
/// `.folder(name)` starts a folder; `.message(..)` and `.item(..)` add
/// entries to the most recent folder; `.with_to(..)`, `.with_cc(..)`
/// and `.with_attachment(..)` refine the most recent message.
pub struct FakeMailboxBuilder {
    folders: Vec<FakeFolder>,
    attachment_contents: HashMap<String, Vec<u8>>,
    fail_detail_loads: bool,
}

impl FakeMailboxBuilder {
    pub fn new() -> Self {
        Self {
            folders: Vec::new(),
            attachment_contents: HashMap::new(),
            fail_detail_loads: false,
        }
    }

    /// Add a new folder. Subsequent entries go into this folder.
    pub fn folder(mut self, name: &str) -> Self {
        self.folders.push(FakeFolder {
            name: name.to_string(),
            items: Vec::new(),
        });
        self
    }

    /// Add a regular message to the most recent folder.
    ///
    /// # Panics
    ///
    /// Panics if called before any `.folder()` call.
    pub fn message(self, id: &str, received_at: DateTime<Utc>, subject: &str) -> Self {
        self.push_item(MESSAGE_ITEM_CLASS, id, received_at, subject)
    }

    /// Add a non-message item (meeting request, report, ...) to the
    /// most recent folder.
    ///
    /// # Panics
    ///
    /// Panics if called before any `.folder()` call.
    pub fn item(
        self,
        id: &str,
        item_class: &str,
        received_at: DateTime<Utc>,
        subject: &str,
    ) -> Self {
        self.push_item(item_class, id, received_at, subject)
    }

    /// Append a To recipient to the most recent message.
    pub fn with_to(mut self, address: &str, name: &str) -> Self {
        self.last_item().details.to.push(Recipient::new(address, name));
        self
    }

    /// Append a Cc recipient to the most recent message.
    pub fn with_cc(mut self, address: &str, name: &str) -> Self {
        self.last_item().details.cc.push(Recipient::new(address, name));
        self
    }

    /// Set the conversation index of the most recent message.
    pub fn with_conversation_index(mut self, index: &[u8]) -> Self {
        self.last_item().details.conversation_index = index.to_vec();
        self
    }

    /// Attach named content to the most recent message.
    pub fn with_attachment(mut self, name: &str, content: &[u8]) -> Self {
        let item = self.last_item();
        let id = format!("{}/att-{}", item.raw.id, item.details.attachments.len());
        item.details.attachments.push(AttachmentInfo {
            id: AttachmentId(id.clone()),
            name: name.to_string(),
            content_type: None,
        });
        self.attachment_contents.insert(id, content.to_vec());
        self
    }

    /// Make every detail load fail with a transport error.
    pub fn failing_detail_loads(mut self) -> Self {
        self.fail_detail_loads = true;
        self
    }

    pub fn build(self) -> FakeMailClient {
        FakeMailClient {
            folders: self.folders,
            attachment_contents: self.attachment_contents,
            fail_detail_loads: self.fail_detail_loads,
            list_items_calls: AtomicUsize::new(0),
            load_details_calls: AtomicUsize::new(0),
        }
    }

    fn push_item(
        mut self,
        item_class: &str,
        id: &str,
        received_at: DateTime<Utc>,
        subject: &str,
    ) -> Self {
        self.folders
            .last_mut()
            .expect("call .folder() before adding items")
            .items
            .push(FakeItem {
                raw: RawItem {
                    id: ItemId(id.to_string()),
                    item_class: item_class.to_string(),
                    subject: subject.to_string(),
                    received_at,
                },
                details: MessageDetails::default(),
            });
        self
    }

    fn last_item(&mut self) -> &mut FakeItem {
        self.folders
            .last_mut()
            .and_then(|f| f.items.last_mut())
            .expect("add an item before refining it")
    }
}
