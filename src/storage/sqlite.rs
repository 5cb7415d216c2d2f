//! SQLite pin store

use std::collections::BTreeMap;
use std::path::Path;
use rusqlite::{Connection, params};
use crate::Result;
use crate::group::UNLIMITED_GROUP;
use crate::pin::{PIN_COLUMNS, Pin};
use super::schema;

/// SQLite-backed storage for pins and groups.
///
/// Owns the single connection for the process. Construct it once at the
/// top of the application and pass it by reference.
pub struct PinStore {
    conn: Connection,
}

impl PinStore {
    /// Open a database file (creates if doesn't exist), migrating if needed
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        tracing::debug!("Opened pin database at {}", path.display());
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        schema::prepare(&mut conn)?;
        Ok(Self { conn })
    }

    /// Schema version of the open database
    pub fn schema_version(&self) -> Result<i32> {
        schema::schema_version(&self.conn)
    }

    // ========== Pin Operations ==========

    /// Create or update a pin.
    ///
    /// An unset pin is inserted and receives its new identity; a persisted
    /// pin is updated in place.
    pub fn save(&self, pin: &mut Pin) -> Result<()> {
        tracing::info!("Write pin called for pin {:?}", pin);

        match pin.id() {
            None => self.create_pin(pin),
            Some(id) => self.update_pin(pin, id),
        }
    }

    fn create_pin(&self, pin: &mut Pin) -> Result<()> {
        let row = pin.to_row();
        self.conn.execute(
            r#"
            INSERT INTO pins (title, content, visibility, priority, color, persistent, show_actions, group_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                row.title,
                row.content,
                row.visibility,
                row.priority,
                row.color,
                row.persistent,
                row.show_actions,
                row.group_id,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        pin.assign_id(id);
        tracing::info!("Created new pin with id {}", id);
        self.log_count()
    }

    fn update_pin(&self, pin: &Pin, id: i64) -> Result<()> {
        let row = pin.to_row();
        let updated = self.conn.execute(
            r#"
            UPDATE pins
            SET title = ?1, content = ?2, visibility = ?3, priority = ?4, color = ?5,
                persistent = ?6, show_actions = ?7, group_id = ?8
            WHERE id = ?9
            "#,
            params![
                row.title,
                row.content,
                row.visibility,
                row.priority,
                row.color,
                row.persistent,
                row.show_actions,
                row.group_id,
                id,
            ],
        )?;

        if updated == 0 {
            tracing::warn!("Update matched no pin with id {}", id);
        } else {
            tracing::info!("Updated pin with id {}", id);
        }
        self.log_count()
    }

    /// Delete a pin and reset it to unset.
    ///
    /// Deleting a pin that is not stored is a no-op.
    pub fn delete(&self, pin: &mut Pin) -> Result<()> {
        match pin.id() {
            Some(id) => {
                let deleted = self.conn.execute("DELETE FROM pins WHERE id = ?1", [id])?;
                tracing::info!("Deleting pin with id {}; success {}", id, deleted > 0);
            }
            None => tracing::info!("Delete called for a pin that was never saved"),
        }

        pin.clear_id();
        self.log_count()
    }

    /// Report the pin count after a write
    fn log_count(&self) -> Result<()> {
        tracing::debug!("Pin count after write: {}", self.count()?);
        Ok(())
    }

    /// Delete every pin; groups are kept. Returns the number of rows removed.
    pub fn delete_all(&self) -> Result<usize> {
        tracing::info!("Deleting all pins");
        let deleted = self.conn.execute("DELETE FROM pins", [])?;
        Ok(deleted)
    }

    /// Count all pins
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM pins", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// All pins keyed by identity
    pub fn all_pins(&self) -> Result<BTreeMap<i64, Pin>> {
        let mut stmt = self.conn.prepare(&format!("SELECT {PIN_COLUMNS} FROM pins"))?;

        let pins = stmt
            .query_map([], Pin::from_row)?
            .map(|r| r.map(|pin| (pin.id_or_unset(), pin)))
            .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;

        tracing::debug!("Loaded {} pins", pins.len());
        Ok(pins)
    }

    // ========== Group Operations ==========

    /// All groups as `id -> name`. The map order carries no meaning.
    pub fn all_groups(&self) -> Result<BTreeMap<i64, String>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM groups")?;

        let groups = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<BTreeMap<i64, String>>>()?;

        Ok(groups)
    }

    /// Name of a group, `None` if no such group exists
    pub fn group_name(&self, group_id: i64) -> Result<Option<String>> {
        // TODO: select the single row instead of loading every group
        Ok(self.all_groups()?.remove(&group_id))
    }

    /// Identity of the group with the given name (linear scan)
    pub fn group_id_by_name(&self, name: &str) -> Result<Option<i64>> {
        let found = self
            .all_groups()?
            .into_iter()
            .find(|(_, group)| group == name)
            .map(|(id, _)| id);
        Ok(found)
    }

    /// Identity of the sentinel group
    pub fn unlimited_group_id(&self) -> Result<Option<i64>> {
        self.group_id_by_name(UNLIMITED_GROUP)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            pins: self.count()?,
            groups: self.all_groups()?.len(),
            schema_version: self.schema_version()?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoreStats {
    pub pins: usize,
    pub groups: usize,
    pub schema_version: i32,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Pins: {}", self.pins)?;
        writeln!(f, "  Groups: {}", self.groups)?;
        writeln!(f, "  Schema version: {}", self.schema_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::pin::{Color, UNSET_ID};

    fn milk() -> Pin {
        Pin::new("Milk", "", 1, 0, 0).unwrap().with_show_actions(true)
    }

    #[test]
    fn test_milk_end_to_end() {
        let store = PinStore::open_in_memory().unwrap();
        let mut pin = milk();

        store.save(&mut pin).unwrap();
        assert_eq!(pin.id(), Some(1));

        let pins = store.all_pins().unwrap();
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[&1], pin);

        store.delete(&mut pin).unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert_eq!(pin.id_or_unset(), UNSET_ID);
    }

    #[test]
    fn test_round_trip_all_fields() {
        let store = PinStore::open_in_memory().unwrap();
        let unlimited = store.unlimited_group_id().unwrap();

        let mut pins = vec![
            Pin::new("a", "", 0, 0, 0).unwrap(),
            Pin::new("b", "body", -1, 2, 1).unwrap().with_persistent(true),
            Pin::new("c", "x", 1, -2, 2).unwrap().with_show_actions(true).with_group(unlimited),
            Pin::new("d", "y", 0, 1, 3).unwrap().with_persistent(true).with_show_actions(true),
        ];
        for pin in &mut pins {
            store.save(pin).unwrap();
        }

        let stored = store.all_pins().unwrap();
        for pin in &pins {
            assert_eq!(stored[&pin.id().unwrap()], *pin);
        }
    }

    #[test]
    fn test_color_stored_off_by_one() {
        let store = PinStore::open_in_memory().unwrap();
        let mut none = Pin::new("none", "", 0, 0, 0).unwrap();
        let mut two = Pin::new("two", "", 0, 0, 2).unwrap();
        store.save(&mut none).unwrap();
        store.save(&mut two).unwrap();

        let raw = |id: i64| -> Option<i64> {
            store
                .conn
                .query_row("SELECT color FROM pins WHERE id = ?1", [id], |row| row.get(0))
                .unwrap()
        };
        assert_eq!(raw(none.id().unwrap()), None);
        assert_eq!(raw(two.id().unwrap()), Some(1));
    }

    #[test]
    fn test_save_twice_updates_in_place() {
        let store = PinStore::open_in_memory().unwrap();
        let mut pin = milk();

        store.save(&mut pin).unwrap();
        let id = pin.id().unwrap();
        assert!(id > 0);

        pin.set_content("2 litres");
        pin.set_color(3).unwrap();
        store.save(&mut pin).unwrap();

        assert_eq!(pin.id(), Some(id));
        assert_eq!(store.count().unwrap(), 1);
        let stored = &store.all_pins().unwrap()[&id];
        assert_eq!(stored.content(), "2 litres");
        assert_eq!(stored.color().value(), 3);
    }

    #[test]
    fn test_saving_deleted_clone_inserts_nothing() {
        let store = PinStore::open_in_memory().unwrap();
        let mut pin = milk();
        store.save(&mut pin).unwrap();
        let id = pin.id().unwrap();

        let mut stale = pin.clone();
        store.delete(&mut pin).unwrap();

        stale.set_content("edited after delete");
        assert!(store.save(&mut stale).is_ok());
        assert_eq!(stale.id(), Some(id));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_count_after_creates_and_deletes() {
        let store = PinStore::open_in_memory().unwrap();
        let mut pins: Vec<Pin> = (0..5)
            .map(|i| Pin::new(format!("pin {i}"), "", 0, 0, 0).unwrap())
            .collect();
        for pin in &mut pins {
            store.save(pin).unwrap();
        }
        store.delete(&mut pins[1]).unwrap();
        store.delete(&mut pins[3]).unwrap();

        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let store = PinStore::open_in_memory().unwrap();
        let mut kept = milk();
        store.save(&mut kept).unwrap();

        let mut ghost = milk();
        store.save(&mut ghost).unwrap();
        let mut stale = ghost.clone();
        store.delete(&mut ghost).unwrap();

        // Already gone from storage
        store.delete(&mut stale).unwrap();
        assert_eq!(stale.id(), None);
        assert_eq!(store.count().unwrap(), 1);

        // Never saved
        let mut fresh = milk();
        store.delete(&mut fresh).unwrap();
        assert_eq!(fresh.id(), None);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_deleted_pin_can_be_saved_again() {
        let store = PinStore::open_in_memory().unwrap();
        let mut pin = milk();
        store.save(&mut pin).unwrap();
        let first = pin.id().unwrap();
        store.delete(&mut pin).unwrap();

        store.save(&mut pin).unwrap();
        assert_ne!(pin.id(), Some(first));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_delete_all_keeps_groups() {
        let store = PinStore::open_in_memory().unwrap();
        for title in ["a", "b", "c"] {
            store.save(&mut Pin::new(title, "", 0, 0, 0).unwrap()).unwrap();
        }

        assert_eq!(store.delete_all().unwrap(), 3);
        assert_eq!(store.count().unwrap(), 0);
        assert_eq!(store.all_groups().unwrap().len(), 1);
    }

    #[test]
    fn test_sentinel_group() {
        let store = PinStore::open_in_memory().unwrap();
        let groups = store.all_groups().unwrap();
        assert_eq!(groups.len(), 1);

        let (id, name) = groups.iter().next().unwrap();
        assert_eq!(name, UNLIMITED_GROUP);
        assert_eq!(store.unlimited_group_id().unwrap(), Some(*id));
        assert_eq!(store.group_name(*id).unwrap().as_deref(), Some(UNLIMITED_GROUP));
        assert_eq!(store.group_name(id + 100).unwrap(), None);
        assert_eq!(store.group_id_by_name("nope").unwrap(), None);
    }

    #[test]
    fn test_unknown_group_is_rejected() {
        let store = PinStore::open_in_memory().unwrap();
        let mut pin = milk().with_group(Some(42));

        assert!(matches!(store.save(&mut pin), Err(Error::Storage(_))));
        assert_eq!(pin.id(), None);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_invalid_stored_color_fails_loudly() {
        let store = PinStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO pins (title, content, visibility, priority, color, persistent, show_actions)
                 VALUES ('bad', '', 0, 0, 3, 0, 0)",
                [],
            )
            .unwrap();

        match store.all_pins() {
            Err(Error::Storage(rusqlite::Error::FromSqlConversionFailure(_, _, inner))) => {
                assert!(inner.to_string().contains("Invalid color value: 4"));
            }
            other => panic!("expected a conversion failure, got {:?}", other.map(|p| p.len())),
        }
    }

    #[test]
    fn test_reopen_keeps_data_and_single_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pins.db");

        let mut pin = Pin::new("Persist", "me", 0, 1, 1).unwrap();
        {
            let store = PinStore::open(&path).unwrap();
            store.save(&mut pin).unwrap();
        }

        let store = PinStore::open(&path).unwrap();
        assert_eq!(store.schema_version().unwrap(), schema::SCHEMA_VERSION);
        assert_eq!(store.all_groups().unwrap().len(), 1);
        assert_eq!(store.all_pins().unwrap()[&pin.id().unwrap()], pin);
    }

    #[test]
    fn test_open_migrates_v1_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE pins (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    content TEXT NOT NULL,
                    visibility INTEGER NOT NULL,
                    priority INTEGER NOT NULL,
                    persistent INTEGER NOT NULL,
                    show_actions INTEGER NOT NULL
                );
                INSERT INTO pins VALUES (1, 'Milk', '', 1, 0, 0, 1);
                INSERT INTO pins VALUES (4, 'Dentist', 'Tuesday 9am', 0, 1, 1, 0);
                PRAGMA user_version = 1;",
            )
            .unwrap();
        }

        let store = PinStore::open(&path).unwrap();
        assert_eq!(store.schema_version().unwrap(), 2);

        let groups = store.all_groups().unwrap();
        assert_eq!(groups.values().collect::<Vec<_>>(), vec![UNLIMITED_GROUP]);

        let pins = store.all_pins().unwrap();
        assert_eq!(pins.len(), 2);

        let milk = &pins[&1];
        assert_eq!(milk.title(), "Milk");
        assert_eq!(milk.content(), "");
        assert_eq!(milk.visibility(), 1);
        assert_eq!(milk.priority(), 0);
        assert!(!milk.is_persistent());
        assert!(milk.shows_actions());

        let dentist = &pins[&4];
        assert_eq!(dentist.summary(), "Dentist - Tuesday 9am");
        assert!(dentist.is_persistent());
        assert!(!dentist.shows_actions());

        for pin in pins.values() {
            assert_eq!(pin.color(), Color::NONE);
            assert_eq!(pin.group_id(), None);
        }

        // New pins continue after the carried-over ids
        let mut next = Pin::new("Next", "", 0, 0, 0).unwrap();
        store.save(&mut next).unwrap();
        assert_eq!(next.id(), Some(5));
    }

    #[test]
    fn test_stats() {
        let store = PinStore::open_in_memory().unwrap();
        store.save(&mut milk()).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.pins, 1);
        assert_eq!(stats.groups, 1);
        assert_eq!(stats.schema_version, 2);
        assert!(stats.to_string().contains("Pins: 1"));
    }
}
