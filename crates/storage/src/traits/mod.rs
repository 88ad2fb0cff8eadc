//! Storage backend trait abstraction
//!
//! Async repository traits, independent of any particular storage engine.

pub mod cache;
pub mod history;

pub use cache::CacheStore;
pub use history::HistoryStore;
