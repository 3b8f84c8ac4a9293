//! Recipient filtering
//!
//! Decides whether a message is intended for this ingestion pipeline:
//! a message qualifies when any configured filter entry matches any of
//! its To/Cc addresses or display names. An empty filter accepts
//! everything.

use crate::client::MessageDetails;
use crate::message::Recipient;

/// Should this message be considered for ingestion?
///
/// - `None` (a malformed or unloadable message) never qualifies.
/// - An empty `filter` means no filtering: everything qualifies.
/// - Otherwise at least one filter entry must match a To address, To
///   display name, Cc address, or Cc display name. Comparison is
///   ordinal and case-insensitive, so `"Alice@Example.com"` matches the
///   entry `"alice@example.com"`.
#[must_use]
pub fn should_consider(message: Option<&MessageDetails>, filter: &[String]) -> bool {
    let Some(details) = message else {
        return false;
    };

    if filter.is_empty() {
        return true;
    }

    let lists = ToCcLists::from_details(details);
    filter.iter().any(|entry| lists.matches(entry))
}

/// The four ordered sequences a filter entry is checked against,
/// To and Cc kept separate.
struct ToCcLists {
    to_addresses: Vec<String>,
    to_names: Vec<String>,
    cc_addresses: Vec<String>,
    cc_names: Vec<String>,
}

impl ToCcLists {
    fn from_details(details: &MessageDetails) -> Self {
        let (to_addresses, to_names) = split_recipients(&details.to);
        let (cc_addresses, cc_names) = split_recipients(&details.cc);
        Self {
            to_addresses,
            to_names,
            cc_addresses,
            cc_names,
        }
    }

    fn matches(&self, entry: &str) -> bool {
        addresses_match(&self.to_addresses, entry)
            || addresses_match(&self.to_names, entry)
            || addresses_match(&self.cc_addresses, entry)
            || addresses_match(&self.cc_names, entry)
    }
}

fn split_recipients(recipients: &[Recipient]) -> (Vec<String>, Vec<String>) {
    let addresses = recipients.iter().map(|r| r.address.clone()).collect();
    let names = recipients.iter().map(|r| r.name.clone()).collect();
    (addresses, names)
}

fn addresses_match(values: &[String], entry: &str) -> bool {
    values.iter().any(|value| value.eq_ignore_ascii_case(entry))
}
