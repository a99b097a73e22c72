//! # Chirp Infrastructure
//!
//! Concrete implementations of the store ports defined in `chirp-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL store via SeaORM
//! - `minimal` - no external services, in-memory store only

pub mod database;

// Re-exports - In-Memory
pub use database::InMemoryStore;

// Re-exports - PostgreSQL
#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, PostgresStore, connect};
