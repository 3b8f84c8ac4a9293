//! Attachment materialization
//!
//! [`IncomingAttachment`] wraps one attachment of a normalized message
//! and can write its content to disk. Two save paths exist:
//!
//! - [`IncomingAttachment::save_to_file`] — batch mode. Derives a file
//!   name from the attachment, skips base names the caller has already
//!   seen in this batch, and picks a collision-free path in the scratch
//!   directory.
//! - [`IncomingAttachment::save_to_file_as`] — pinned-name mode. Writes
//!   to the exact path given, unless the name stem carries the
//!   reprocessing marker.
//!
//! A skipped save is signalled with `Ok(None)`; it is never an error.

use crate::client::MailClient;
use crate::error::Result;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Trailing stem character marking an attachment file as already
/// persisted by a previous run. Files named with this marker are never
/// written again; nothing in this crate appends it.
pub const PROCESSED_MARKER: char = '_';

/// Backend-specific identifier for one attachment of one message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AttachmentId(pub String);

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Attachment metadata reported by the detail load. Content is not
/// fetched until save time.
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentInfo {
    pub id: AttachmentId,
    /// Logical file name from the message headers.
    pub name: String,
    /// MIME content type, when the backend reports one.
    pub content_type: Option<String>,
}

/// An attachment of an [`IncomingMessage`], ready to materialize.
///
/// Holds a reference back to the mail client so content can be loaded
/// lazily at save time. An override name supplied at construction takes
/// precedence over the logical name when deriving file names.
///
/// [`IncomingMessage`]: crate::IncomingMessage
#[derive(Clone)]
pub struct IncomingAttachment {
    client: Arc<dyn MailClient>,
    info: AttachmentInfo,
    scratch_dir: PathBuf,
    override_name: Option<String>,
}

impl fmt::Debug for IncomingAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncomingAttachment")
            .field("info", &self.info)
            .field("scratch_dir", &self.scratch_dir)
            .field("override_name", &self.override_name)
            .finish_non_exhaustive()
    }
}

impl IncomingAttachment {
    #[must_use]
    pub fn new(
        client: Arc<dyn MailClient>,
        info: AttachmentInfo,
        scratch_dir: &Path,
        override_name: Option<String>,
    ) -> Self {
        Self {
            client,
            info,
            scratch_dir: scratch_dir.to_path_buf(),
            override_name,
        }
    }

    #[must_use]
    pub const fn info(&self) -> &AttachmentInfo {
        &self.info
    }

    /// The name used when deriving file names: the override name when
    /// one was supplied, the logical name otherwise.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.override_name.as_deref().unwrap_or(&self.info.name)
    }

    /// Save with an automatically chosen, collision-free name in the
    /// scratch directory.
    ///
    /// When `known_base_names` already contains this attachment's base
    /// name (without extension), the save is skipped and `Ok(None)` is
    /// returned: the attachment is already represented in the current
    /// batch. The comparison is exact.
    ///
    /// # Errors
    ///
    /// Returns an error if the content fetch or the file write fails.
    pub fn save_to_file(&self, known_base_names: Option<&[String]>) -> Result<Option<PathBuf>> {
        let (stem, extension) = split_file_name(self.file_name());

        if known_base_names.is_some_and(|names| names.iter().any(|n| *n == stem)) {
            debug!(name = %self.file_name(), "Attachment base name already seen, skipping");
            return Ok(None);
        }

        self.save_to_file_as(unique_path(&self.scratch_dir, &stem, extension.as_deref()))
    }

    /// Save to an explicit path.
    ///
    /// Reprocessing guard: if the file stem already ends with
    /// [`PROCESSED_MARKER`], the attachment was persisted by an earlier
    /// run and the save is skipped with `Ok(None)`. Otherwise the
    /// content is fetched and written, and the path is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the content fetch or the file write fails.
    pub fn save_to_file_as(&self, path: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        if stem.ends_with(PROCESSED_MARKER) {
            debug!(path = %path.display(), "File name carries the processed marker, skipping");
            return Ok(None);
        }

        debug!(name = %self.info.name, path = %path.display(), "Saving attachment");
        let content = self.client.load_attachment_content(&self.info.id)?;
        fs::write(path, content)?;

        Ok(Some(path.to_path_buf()))
    }
}

/// Split a file name into stem and extension (extension without the
/// dot, `None` when absent).
fn split_file_name(name: &str) -> (String, Option<String>) {
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());
    (stem, extension)
}

/// First path under `dir` for `stem`/`extension` that does not collide
/// with an existing file, disambiguating with a numeric suffix.
fn unique_path(dir: &Path, stem: &str, extension: Option<&str>) -> PathBuf {
    let join = |base: &str| {
        let file = extension.map_or_else(|| base.to_string(), |ext| format!("{base}.{ext}"));
        dir.join(file)
    };

    let mut candidate = join(stem);
    let mut n = 1u32;
    while candidate.exists() {
        candidate = join(&format!("{stem} ({n})"));
        n += 1;
    }
    candidate
}
