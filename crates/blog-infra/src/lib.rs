//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//! This crate contains database, clock, configuration and telemetry plumbing.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM

pub mod clock;
pub mod config;
pub mod context;
pub mod database;
pub mod memory;
pub mod telemetry;

// Re-exports - In-Memory
pub use clock::{ManualClock, SystemClock};
pub use config::BlogConfig;
pub use context::BlogContext;
pub use database::DatabaseConnections;
pub use memory::{InMemoryCommentStore, InMemoryPostRepository, InMemoryTagIndex, InMemoryUserRepository};
