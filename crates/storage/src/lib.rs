//! Storage layer for weather-cache
//!
//! Repository traits for the weather cache and per-user search history, with
//! a PostgreSQL backend for deployments and an in-memory backend for
//! development and tests.

pub mod backend;
pub mod error;
mod memory;
mod pg_migrations;
pub mod pg_storage;
pub mod traits;

pub use backend::StorageBackend;
pub use error::StorageError;
pub use memory::MemoryStorage;
pub use pg_migrations::run_pg_migrations;
pub use pg_storage::PgStorage;
pub use traits::{CacheStore, HistoryStore};
