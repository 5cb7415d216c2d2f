//! Database schema definitions and version migration
//!
//! The schema version lives in `PRAGMA user_version`. Version 2 added the
//! `color` and `group_id` columns to `pins` together with the `groups` table.

use rusqlite::Connection;
use crate::group::UNLIMITED_GROUP;
use crate::{Error, Result};

/// Schema version written by this build
pub const SCHEMA_VERSION: i32 = 2;

/// SQL to create the groups table
pub const CREATE_GROUPS_TABLE: &str = r#"
CREATE TABLE groups (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
)
"#;

/// SQL to create the pins table (references groups, so it goes second)
pub const CREATE_PINS_TABLE: &str = r#"
CREATE TABLE pins (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    visibility INTEGER NOT NULL,
    priority INTEGER NOT NULL,
    color INTEGER DEFAULT NULL,
    persistent INTEGER NOT NULL,
    show_actions INTEGER NOT NULL,
    group_id INTEGER DEFAULT NULL,
    FOREIGN KEY(group_id) REFERENCES groups(id)
)
"#;

/// SQL to seed the sentinel group
pub const SEED_UNLIMITED_GROUP: &str = "INSERT INTO groups (name) VALUES (?1)";

/// Table the old pins are parked in while migrating
pub const MIGRATION_TEMP_TABLE: &str = "temp_pins";

/// Pin columns that already existed in version 1
pub const V1_PIN_COLUMNS: &[&str] = &[
    "id",
    "title",
    "content",
    "visibility",
    "priority",
    "persistent",
    "show_actions",
];

/// Read the stored schema version (0 for a fresh database)
pub fn schema_version(conn: &Connection) -> Result<i32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.pragma_update(None, "user_version", version)?;
    Ok(())
}

/// Create both tables and seed the sentinel group
fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_GROUPS_TABLE, [])?;
    conn.execute(CREATE_PINS_TABLE, [])?;
    conn.execute(SEED_UNLIMITED_GROUP, [UNLIMITED_GROUP])?;
    Ok(())
}

/// Bring an opened database to [`SCHEMA_VERSION`].
///
/// A fresh database is initialized, an older one migrated. A database
/// written by a newer build is refused.
pub fn prepare(conn: &mut Connection) -> Result<()> {
    let found = schema_version(conn)?;

    if found == 0 {
        return initialize(conn);
    }

    match found.cmp(&SCHEMA_VERSION) {
        std::cmp::Ordering::Equal => {
            tracing::debug!("Database schema is current (version {})", found);
            Ok(())
        }
        std::cmp::Ordering::Less => migrate(conn, found, SCHEMA_VERSION),
        std::cmp::Ordering::Greater => Err(Error::UnsupportedMigration {
            from: found,
            to: SCHEMA_VERSION,
        }),
    }
}

/// Create the schema on a fresh database.
///
/// Runs in one transaction: on failure nothing is committed.
pub fn initialize(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    create_tables(&tx)?;
    set_schema_version(&tx, SCHEMA_VERSION)?;
    tx.commit()?;

    tracing::info!("Initialized database schema (version {})", SCHEMA_VERSION);
    Ok(())
}

/// Migrate between two schema versions.
///
/// Only 1 -> 2 is known. Groups are recreated and re-seeded rather than
/// carried over; pins keep their version 1 columns and get no color and no
/// group. Runs in one transaction.
pub fn migrate(conn: &mut Connection, from: i32, to: i32) -> Result<()> {
    if (from, to) != (1, 2) {
        return Err(Error::UnsupportedMigration { from, to });
    }

    tracing::warn!("Upgrading database from version {} to {}", from, to);

    let columns = V1_PIN_COLUMNS.join(", ");
    let tx = conn.transaction()?;

    tx.execute(&format!("ALTER TABLE pins RENAME TO {MIGRATION_TEMP_TABLE}"), [])?;
    tx.execute("DROP TABLE IF EXISTS pins", [])?;
    tx.execute("DROP TABLE IF EXISTS groups", [])?;

    create_tables(&tx)?;

    let copied = tx.execute(
        &format!("INSERT INTO pins ({columns}) SELECT {columns} FROM {MIGRATION_TEMP_TABLE}"),
        [],
    )?;
    tx.execute(&format!("DROP TABLE IF EXISTS {MIGRATION_TEMP_TABLE}"), [])?;

    set_schema_version(&tx, to)?;
    tx.commit()?;

    tracing::info!("Database upgraded to version {}; carried over {} pins", to, copied);
    Ok(())
}
