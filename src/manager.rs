//! Mailbox ingestion orchestration
//!
//! [`MailboxManager`] monitors one folder of the remote mailbox. Every
//! call to [`MailboxManager::read_messages`] runs a full ingestion
//! cycle — resolve the folder, list its items, drop non-messages, apply
//! the recipient filter, normalize — and returns the qualifying
//! messages oldest-first. Once the caller has handled a message it
//! reports the outcome through
//! [`MailboxManager::on_processing_finished`], which forwards to the
//! configured [`PostProcessor`].
//!
//! The manager is synchronous and stateless across cycles; an external
//! driver decides when cycles run.

use crate::client::MailClient;
use crate::config::MailboxConfig;
use crate::error::{Error, Result};
use crate::item::ItemKind;
use crate::matcher;
use crate::message::IncomingMessage;
use crate::resolver;
use std::sync::Arc;
use tracing::{debug, error};

/// Downstream collaborator recording the outcome of each handled
/// message. Failures inside an implementation are its own concern;
/// the manager neither inspects nor reports them.
pub trait PostProcessor: Send + Sync {
    fn process(&self, message: &IncomingMessage, successful: bool);
}

/// Monitors a single folder and yields normalized messages from it.
pub struct MailboxManager {
    client: Arc<dyn MailClient>,
    config: MailboxConfig,
    post_processor: Box<dyn PostProcessor>,
}

impl MailboxManager {
    #[must_use]
    pub fn new(
        client: Arc<dyn MailClient>,
        config: MailboxConfig,
        post_processor: Box<dyn PostProcessor>,
    ) -> Self {
        Self {
            client,
            config,
            post_processor,
        }
    }

    /// Run one ingestion cycle.
    ///
    /// Returns every qualifying message currently in the monitored
    /// folder, ordered ascending by received timestamp. The result is
    /// materialized fresh on every call; nothing is retained between
    /// cycles. An empty folder yields an empty list without fetching
    /// its listing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FolderNotFound`] when the configured folder
    /// cannot be resolved, and propagates transport failures from the
    /// listing and detail loads unmodified.
    ///
    /// [`Error::FolderNotFound`]: crate::Error::FolderNotFound
    pub fn read_messages(&self) -> Result<Vec<IncomingMessage>> {
        let folder = resolver::find_folder_by_name(&self.config.folder, self.client.as_ref())
            .inspect_err(|e| {
                if matches!(e, Error::FolderNotFound(_)) {
                    error!(folder = %self.config.folder, "Couldn't find incoming mail folder");
                }
            })?;

        if folder.total_count == 0 {
            debug!(folder = %folder, "No items found in folder, returning empty list");
            return Ok(Vec::new());
        }

        let mut items = self.client.list_items(&folder)?;
        items.sort_by_key(|item| item.received_at);

        let mut messages = Vec::new();
        for item in items {
            if item.kind() != ItemKind::Message {
                debug!(item = %item.id, class = %item.item_class, "Skipping non-message item");
                continue;
            }

            let details = self.client.load_details(&item.id)?;

            if let Some(filter) = &self.config.recipients {
                if !matcher::should_consider(Some(&details), filter) {
                    continue;
                }
            }

            messages.push(IncomingMessage::new(
                item,
                details,
                Arc::clone(&self.client),
                self.config.conversation_guid_only,
                &self.config.scratch_dir,
            ));
        }

        // The listing was already sorted, but filtering and loading may
        // interleave differently per backend. Keep the ordering
        // guarantee independent of them.
        messages.sort_by_key(IncomingMessage::received_at);

        debug!(folder = %folder, count = messages.len(), "Ingestion cycle complete");
        Ok(messages)
    }

    /// Report a handled message back. The message and its outcome flag
    /// are forwarded to the [`PostProcessor`]; the manager itself keeps
    /// no record and raises no error.
    pub fn on_processing_finished(&self, message: &IncomingMessage, successful: bool) {
        debug!(subject = message.subject(), successful, "Processing finished");
        self.post_processor.process(message, successful);
    }
}
