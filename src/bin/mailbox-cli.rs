#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI driver for the mailbox ingestion core
//!
//! Connects the IMAP backend to a [`MailboxManager`] and runs
//! ingestion cycles on demand (`read`) or on a fixed cadence
//! (`watch`). Configuration comes from the environment (see
//! `ImapConfig::from_env` and `MailboxConfig::from_env`).

use clap::{Parser, Subcommand};
use mailbox_ingest::{
    ImapConfig, ImapMailClient, IncomingMessage, MailboxConfig, MailboxManager, PostProcessor,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mailbox-cli")]
#[command(about = "Ingest and filter messages from a monitored mailbox folder")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List folders accessible to the configured account
    Folders,

    /// Run a single ingestion cycle
    Read {
        /// Materialize attachments into the scratch directory
        #[arg(long)]
        save_attachments: bool,
    },

    /// Run ingestion cycles on a fixed interval
    Watch {
        /// Seconds between cycles
        #[arg(long, default_value = "60")]
        interval: u64,

        /// Materialize attachments into the scratch directory
        #[arg(long)]
        save_attachments: bool,
    },
}

/// Records each completed message in the log. Stands in for the
/// tracker-side post processor of a full pipeline.
struct LogPostProcessor;

impl PostProcessor for LogPostProcessor {
    fn process(&self, message: &IncomingMessage, successful: bool) {
        info!(
            subject = message.subject(),
            successful, "Message processing recorded"
        );
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let client = Arc::new(ImapMailClient::new(ImapConfig::from_env()?));

    match &args.command {
        Command::Folders => cmd_folders(&client, &args)?,
        Command::Read { save_attachments } => {
            let manager = manager_for(client)?;
            run_cycle(&manager, &args, *save_attachments)?;
        }
        Command::Watch {
            interval,
            save_attachments,
        } => {
            let manager = manager_for(client)?;
            loop {
                if let Err(e) = run_cycle(&manager, &args, *save_attachments) {
                    warn!("Ingestion cycle failed: {e}");
                }
                std::thread::sleep(Duration::from_secs(*interval));
            }
        }
    }

    Ok(())
}

fn manager_for(client: Arc<ImapMailClient>) -> anyhow::Result<MailboxManager> {
    Ok(MailboxManager::new(
        client,
        MailboxConfig::from_env()?,
        Box::new(LogPostProcessor),
    ))
}

fn cmd_folders(client: &ImapMailClient, args: &Args) -> anyhow::Result<()> {
    use mailbox_ingest::MailClient;

    let folders = client.list_folders()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&folders)?);
    } else {
        for folder in &folders {
            println!("{:<40} {:>6} item(s)", folder.name, folder.total_count);
        }
    }

    Ok(())
}

fn run_cycle(manager: &MailboxManager, args: &Args, save_attachments: bool) -> anyhow::Result<()> {
    let messages = manager.read_messages()?;

    if args.json {
        let summaries: Vec<_> = messages.iter().map(IncomingMessage::summary).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        print_message_table(&messages);
    }

    for message in &messages {
        if save_attachments {
            save_message_attachments(message);
        }
        manager.on_processing_finished(message, true);
    }

    Ok(())
}

/// Save every attachment of one message, deduplicating base names
/// within the message.
fn save_message_attachments(message: &IncomingMessage) {
    let mut seen_base_names: Vec<String> = Vec::new();

    for attachment in message.attachments() {
        match attachment.save_to_file(Some(&seen_base_names)) {
            Ok(Some(path)) => {
                info!(path = %path.display(), "Saved attachment");
                let base = Path::new(attachment.file_name())
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                seen_base_names.push(base);
            }
            Ok(None) => {}
            Err(e) => warn!(name = attachment.file_name(), "Attachment save failed: {e}"),
        }
    }
}

fn print_message_table(messages: &[IncomingMessage]) {
    if messages.is_empty() {
        println!("No messages found.");
        return;
    }

    println!(
        "{:<20} {:<30} {:<8} {}",
        "Received", "To", "Attach", "Subject"
    );
    println!("{}", "-".repeat(100));

    for message in messages {
        let to = message
            .to_recipients()
            .iter()
            .map(|r| r.address.clone())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{:<20} {:<30} {:<8} {}",
            message.received_at().format("%Y-%m-%d %H:%M"),
            truncate(&to, 28),
            message.attachments().len(),
            truncate(message.subject(), 40),
        );
    }

    println!("\n{} message(s)", messages.len());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
