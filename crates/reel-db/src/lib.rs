//! reel-db: SQLite persistence for the catalog, users, and watched state.
//!
//! Provides connection pooling, embedded migrations, typed models, and the
//! query functions the streaming server's collaborator traits sit on.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;

pub use pool::{DbPool, PooledConnection};
