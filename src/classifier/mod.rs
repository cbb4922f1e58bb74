//! Ticket classification
//!
//! - `rules`: keyword vocabularies and the deterministic fallback
//! - `generative`: single chat call returning JSON labels
//! - `ticket`: the classifier combining models and rules

pub mod generative;
pub mod rules;
pub mod ticket;

pub use rules::{rule_priority, rule_sentiment, rule_topic};
pub use ticket::TicketClassifier;
