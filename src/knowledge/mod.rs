//! Knowledge store: chunks, keyword sets and the optional dense index

pub mod builder;
pub mod index;
pub mod store;

pub use builder::KnowledgeStoreBuilder;
pub use index::{FlatIndex, NO_HIT};
pub use store::{keyword_set, Chunk, KnowledgeStore};
