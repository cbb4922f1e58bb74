//! Type definitions module
//!
//! Plain data exchanged with the UI layer: tickets, classifications,
//! retrieval results, and answers.

pub mod classification;
pub mod response;
pub mod ticket;

// Re-export commonly used types
pub use classification::{Classification, Polarity, Priority, Sentiment, Topic};
pub use response::{dedup_sources, RAGResponse, RetrievalResult};
pub use ticket::{combine_text, load_tickets, ClassifiedTicket, Ticket};
