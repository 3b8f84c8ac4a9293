//! Attachment materialization tests.
//!
//! Messages with attachments are ingested through the fake client and
//! their attachments saved into a `tempfile` scratch directory, so the
//! collision-avoidance and skip paths are observed on a real
//! filesystem.

mod fake_client;

use chrono::{DateTime, TimeZone, Utc};
use fake_client::FakeMailboxBuilder;
use mailbox_ingest::{
    IncomingAttachment, IncomingMessage, MailClient, MailboxConfig, MailboxManager, PostProcessor,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

struct NullPostProcessor;

impl PostProcessor for NullPostProcessor {
    fn process(&self, _message: &IncomingMessage, _successful: bool) {}
}

/// Ingest one message carrying the given attachments and return it
/// together with the client handle.
fn message_with_attachments(
    scratch_dir: &Path,
    attachments: &[(&str, &[u8])],
) -> (IncomingMessage, Arc<dyn MailClient>) {
    let mut builder = FakeMailboxBuilder::new()
        .folder("Inbox")
        .message("m1", ts(100), "With attachments");
    for &(name, content) in attachments {
        builder = builder.with_attachment(name, content);
    }
    let client: Arc<dyn MailClient> = Arc::new(builder.build());

    let mut config = MailboxConfig::new("Inbox");
    config.scratch_dir = scratch_dir.to_path_buf();

    let manager = MailboxManager::new(Arc::clone(&client), config, Box::new(NullPostProcessor));
    let mut messages = manager.read_messages().unwrap();
    (messages.remove(0), client)
}

// ── Tests ──────────────────────────────────────────────────────────

#[test]
fn fresh_save_writes_content_and_returns_path() {
    let dir = tempfile::tempdir().unwrap();
    let (message, _) = message_with_attachments(dir.path(), &[("report.pdf", b"%PDF-1.7")]);

    let path = message.attachments()[0].save_to_file(None).unwrap().unwrap();

    assert_eq!(path, dir.path().join("report.pdf"));
    assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.7");
}

#[test]
fn known_base_name_skips_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let (message, _) = message_with_attachments(dir.path(), &[("report.pdf", b"%PDF-1.7")]);

    let known = vec!["report".to_string()];
    let result = message.attachments()[0].save_to_file(Some(&known)).unwrap();

    assert!(result.is_none());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn unrelated_known_names_do_not_block_the_save() {
    let dir = tempfile::tempdir().unwrap();
    let (message, _) = message_with_attachments(dir.path(), &[("report.pdf", b"%PDF-1.7")]);

    let known = vec!["summary".to_string(), "Report".to_string()];
    let result = message.attachments()[0].save_to_file(Some(&known)).unwrap();

    // Base-name dedupe is exact; "Report" != "report".
    assert!(result.is_some());
}

#[test]
fn marker_stem_skips_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let (message, _) = message_with_attachments(dir.path(), &[("report.pdf", b"%PDF-1.7")]);

    let target = dir.path().join("report_.pdf");
    let result = message.attachments()[0].save_to_file_as(&target).unwrap();

    assert!(result.is_none());
    assert!(!target.exists());
}

#[test]
fn explicit_fresh_filename_writes_and_returns_it() {
    let dir = tempfile::tempdir().unwrap();
    let (message, _) = message_with_attachments(dir.path(), &[("report.pdf", b"%PDF-1.7")]);

    let target = dir.path().join("pinned-name.pdf");
    let result = message.attachments()[0].save_to_file_as(&target).unwrap();

    assert_eq!(result, Some(target.clone()));
    assert_eq!(fs::read(&target).unwrap(), b"%PDF-1.7");
}

#[test]
fn identical_logical_names_get_distinct_paths() {
    let dir = tempfile::tempdir().unwrap();
    let (message, _) = message_with_attachments(
        dir.path(),
        &[("photo.jpg", b"first"), ("photo.jpg", b"second")],
    );

    let first = message.attachments()[0].save_to_file(None).unwrap().unwrap();
    let second = message.attachments()[1].save_to_file(None).unwrap().unwrap();

    assert_ne!(first, second);
    assert_eq!(fs::read(&first).unwrap(), b"first");
    assert_eq!(fs::read(&second).unwrap(), b"second");
}

#[test]
fn override_name_drives_file_naming() {
    let dir = tempfile::tempdir().unwrap();
    let (message, client) = message_with_attachments(dir.path(), &[("original.bin", b"bytes")]);

    let renamed = IncomingAttachment::new(
        client,
        message.attachments()[0].info().clone(),
        dir.path(),
        Some("renamed.bin".to_string()),
    );

    let path = renamed.save_to_file(None).unwrap().unwrap();
    assert_eq!(path, dir.path().join("renamed.bin"));
    assert_eq!(fs::read(&path).unwrap(), b"bytes");
}
