//! Folder resolution
//!
//! Maps the configured human-readable folder name to a concrete
//! [`Folder`] handle on the remote client. Purely a lookup; resolution
//! is cheap and happens once per ingestion cycle, so nothing is cached.

use crate::client::MailClient;
use crate::error::{Error, Result};
use crate::folder::Folder;
use tracing::debug;

/// Resolve a folder by display name or path.
///
/// Exact name matches win; failing that, a folder whose final path
/// segment equals `name` matches, so nested folders can be addressed by
/// their leaf name alone.
///
/// # Errors
///
/// Returns [`Error::FolderNotFound`] naming the unresolved folder when
/// no accessible folder matches.
pub fn find_folder_by_name(name: &str, client: &dyn MailClient) -> Result<Folder> {
    let folders = client.list_folders()?;
    debug!(folder = name, candidates = folders.len(), "Resolving folder");

    if let Some(folder) = folders.iter().find(|f| f.name == name) {
        return Ok(folder.clone());
    }

    folders
        .into_iter()
        .find(|f| f.leaf_name() == name)
        .ok_or_else(|| Error::FolderNotFound(name.to_string()))
}
