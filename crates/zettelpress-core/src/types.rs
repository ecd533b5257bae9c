// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Zettelpress ticket printer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a submitted ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(pub Uuid);

impl TicketId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A ticket as submitted by the client: a short title, free-form body text,
/// and an optional target printer. The image, when present, travels
/// separately as an uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRequest {
    pub title: String,
    pub description: String,
    /// Spool queue to print on. `None` means the OS default printer.
    pub printer: Option<String>,
}

impl TicketRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            printer: None,
        }
    }
}

/// Confirmation returned once a ticket has been handed to the spool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketReceipt {
    pub id: TicketId,
    /// The printer the job was dispatched to, when the caller named one.
    pub printer: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl TicketReceipt {
    pub fn new(printer: Option<String>) -> Self {
        Self {
            id: TicketId::new(),
            printer,
            submitted_at: Utc::now(),
        }
    }
}

/// Snapshot of the printers the OS currently knows about.
///
/// Constructed fresh on every discovery call — never cached, never
/// persisted. An empty `printers` list means "unknown", not "no printers
/// installed": every query mechanism may have failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterInventory {
    /// Resolved printer names in the order the producing mechanism listed
    /// them. Not deduplicated.
    pub printers: Vec<String>,
    /// Name of the OS default printer, when one could be determined.
    pub default_printer: Option<String>,
}
