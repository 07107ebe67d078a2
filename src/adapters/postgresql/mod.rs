//! PostgreSQL target store
//!
//! - [`PostgresSink`] - transactional writer used by sync runs
//! - [`PostgresTitleRepository`] - read queries over the synced table

pub mod client;
pub mod repository;
pub mod sink;
pub mod statements;

pub use client::PostgresConnection;
pub use repository::{PostgresTitleRepository, StoredTitle};
pub use sink::PostgresSink;
pub use statements::TitleStatements;
