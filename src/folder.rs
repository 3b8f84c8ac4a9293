//! Remote mailbox folder handles
//!
//! A [`Folder`] is an opaque handle to a location in the monitored
//! mailbox, produced by [`MailClient::list_folders`] and consumed by
//! the listing calls. The core never creates folders and never writes
//! to them.
//!
//! [`MailClient::list_folders`]: crate::MailClient::list_folders

use serde::Serialize;
use std::fmt;

/// A folder in the remote mailbox.
///
/// The `id` is whatever the backend uses to address the folder in
/// follow-up calls (an IMAP mailbox name, an EWS folder id, ...); the
/// core treats it as opaque. `name` is the human-readable display name
/// resolution matches against, which may be a `/`-separated path for
/// nested folders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Folder {
    /// Backend-specific folder identifier.
    pub id: String,
    /// Display name or path used for resolution.
    pub name: String,
    /// Total number of items the folder reported at listing time.
    pub total_count: u32,
}

impl Folder {
    /// Create a folder handle whose id doubles as its display name.
    #[must_use]
    pub fn new(name: impl Into<String>, total_count: u32) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            total_count,
        }
    }

    /// The final segment of the folder path.
    ///
    /// For a top-level folder this is the name itself.
    #[must_use]
    pub fn leaf_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
