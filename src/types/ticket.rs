//! Support ticket records as supplied by the ticket loader

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::Result;
use crate::types::Classification;

/// Incoming support ticket
///
/// Every field is optional on input and defaults to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(default)]
    pub ticket_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub created_at: String,
}

impl Ticket {
    pub fn new(subject: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Subject and description combined into the text models see
    pub fn full_text(&self) -> String {
        combine_text(&self.subject, &self.description)
    }
}

/// Ticket with its classification attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedTicket {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub classification: Classification,
}

/// Join subject and description the same way for every classifier path
pub fn combine_text(subject: &str, description: &str) -> String {
    format!("{}. {}", subject.trim(), description.trim())
}

/// Load tickets from a JSON array file
pub fn load_tickets(path: &Path) -> Result<Vec<Ticket>> {
    let contents = std::fs::read_to_string(path)?;
    let tickets = serde_json::from_str(&contents)?;
    Ok(tickets)
}
