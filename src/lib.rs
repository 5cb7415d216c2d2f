//! # Pinstore - local persistence for pinned notes
//!
//! Pinstore keeps short user-authored pins (title, body and presentation
//! attributes) in a single SQLite file, organized into named groups.
//!
//! Pinstore provides:
//! - A validated record model with the on-disk color encoding
//! - A versioned schema with the 1 -> 2 migration
//! - A store that decides create vs. update from the record's identity
//! - Group lookup plus the display-ordering helper used by front ends
//! - A boot-time restorer that replays every stored pin

pub mod pin;
pub mod group;
pub mod storage;
pub mod restore;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use pin::{Color, Pin, UNSET_ID};
pub use group::{GroupMenu, UNLIMITED_GROUP};
pub use storage::PinStore;

/// Result type alias for Pinstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Pinstore operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid color value: {0} (expected 0..=3)")]
    InvalidColor(i64),

    #[error("Pin title must not be empty")]
    EmptyTitle,

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Unsupported schema migration from version {from} to {to}")]
    UnsupportedMigration { from: i32, to: i32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
