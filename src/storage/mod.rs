//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - groups(id, name)
//! - pins(id, title, content, visibility, priority, color, persistent, show_actions, group_id)

pub mod schema;
pub mod sqlite;

pub use schema::SCHEMA_VERSION;
pub use sqlite::{PinStore, StoreStats};
