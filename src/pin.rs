//! Pin record - one user-authored entry and its storage encoding
//!
//! A pin carries a title, a body and a handful of presentation attributes.
//! Every construction path (direct, from a storage row, from JSON) goes
//! through the same validation:
//! - `title` must be non-empty
//! - `color` must lie in `0..=3`
//!
//! The `color` column does not use the in-memory numbering. In memory `0`
//! means "no color" and `1..=3` are concrete colors; on disk "no color" is
//! `NULL` and the concrete colors are stored as `0..=2`.

use crate::{Error, Result};
use rusqlite::Row;
use rusqlite::types::Type;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Numeric identity reported for a pin that has not been persisted yet
pub const UNSET_ID: i64 = -1;

/// Column list used when reading pins back
pub const PIN_COLUMNS: &str =
    "id, title, content, visibility, priority, color, persistent, show_actions, group_id";

/// Presentation color of a pin, validated to `0..=3`.
///
/// `Color::NONE` (0) means no color was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Color(u8);

impl Color {
    /// No color selected
    pub const NONE: Color = Color(0);

    /// Highest valid in-memory value
    pub const MAX: u8 = 3;

    /// Validate an in-memory color value
    pub fn new(value: i64) -> Result<Self> {
        if (0..=i64::from(Self::MAX)).contains(&value) {
            Ok(Color(value as u8))
        } else {
            Err(Error::InvalidColor(value))
        }
    }

    /// The in-memory value (`0..=3`)
    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether no color is selected
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Encode for the `color` column: `NULL` for no color, `value - 1` otherwise
    pub fn to_column(self) -> Option<i64> {
        if self.is_none() {
            None
        } else {
            Some(i64::from(self.0) - 1)
        }
    }

    /// Decode the `color` column: `NULL` is no color, `v` becomes `v + 1`
    pub fn from_column(stored: Option<i64>) -> Result<Self> {
        match stored {
            None => Ok(Color::NONE),
            Some(v) => Color::new(v.saturating_add(1)),
        }
    }
}

impl TryFrom<i64> for Color {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Color::new(value)
    }
}

impl From<Color> for i64 {
    fn from(color: Color) -> Self {
        i64::from(color.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "none")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A single pinned note.
///
/// A freshly built pin is unset (`id() == None`). The store assigns the
/// identity on first save and clears it again on delete, so the same value
/// can be saved, deleted and saved again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pin {
    #[serde(serialize_with = "serialize_id")]
    id: Option<i64>,
    title: String,
    content: String,
    visibility: i32,
    priority: i32,
    color: Color,
    persistent: bool,
    show_actions: bool,
    group_id: Option<i64>,
}

fn serialize_id<S: Serializer>(id: &Option<i64>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_i64(id.unwrap_or(UNSET_ID))
}

impl Pin {
    /// Create an unset pin. `persistent` and `show_actions` start off and the
    /// pin belongs to no group until told otherwise.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        visibility: i32,
        priority: i32,
        color: i64,
    ) -> Result<Self> {
        let title = title.into();
        if title.is_empty() {
            return Err(Error::EmptyTitle);
        }

        Ok(Self {
            id: None,
            title,
            content: content.into(),
            visibility,
            priority,
            color: Color::new(color)?,
            persistent: false,
            show_actions: false,
            group_id: None,
        })
    }

    pub fn with_persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    pub fn with_show_actions(mut self, show_actions: bool) -> Self {
        self.show_actions = show_actions;
        self
    }

    pub fn with_group(mut self, group_id: Option<i64>) -> Self {
        self.group_id = group_id;
        self
    }

    /// Decode a row selected with [`PIN_COLUMNS`].
    ///
    /// Validation failures are reported as `FromSqlConversionFailure`
    /// wrapping the underlying [`Error`].
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let title: String = row.get("title")?;
        if title.is_empty() {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                1,
                Type::Text,
                Box::new(Error::EmptyTitle),
            ));
        }

        let stored_color: Option<i64> = row.get("color")?;
        let color = Color::from_column(stored_color).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, Type::Integer, Box::new(e))
        })?;

        Ok(Self {
            id: Some(row.get("id")?),
            title,
            content: row.get("content")?,
            visibility: row.get("visibility")?,
            priority: row.get("priority")?,
            color,
            persistent: row.get("persistent")?,
            show_actions: row.get("show_actions")?,
            group_id: row.get("group_id")?,
        })
    }

    /// Flatten into the column values written on insert/update
    pub fn to_row(&self) -> PinRow<'_> {
        PinRow {
            title: &self.title,
            content: &self.content,
            visibility: self.visibility,
            priority: self.priority,
            color: self.color.to_column(),
            persistent: self.persistent,
            show_actions: self.show_actions,
            group_id: self.group_id,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Identity with the unset state reported as [`UNSET_ID`]
    pub fn id_or_unset(&self) -> i64 {
        self.id.unwrap_or(UNSET_ID)
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub(crate) fn assign_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn visibility(&self) -> i32 {
        self.visibility
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub fn shows_actions(&self) -> bool {
        self.show_actions
    }

    pub fn group_id(&self) -> Option<i64> {
        self.group_id
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        if title.is_empty() {
            return Err(Error::EmptyTitle);
        }
        self.title = title;
        Ok(())
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn set_visibility(&mut self, visibility: i32) {
        self.visibility = visibility;
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    pub fn set_color(&mut self, color: i64) -> Result<()> {
        self.color = Color::new(color)?;
        Ok(())
    }

    pub fn set_persistent(&mut self, persistent: bool) {
        self.persistent = persistent;
    }

    pub fn set_show_actions(&mut self, show_actions: bool) {
        self.show_actions = show_actions;
    }

    pub fn set_group_id(&mut self, group_id: Option<i64>) {
        self.group_id = group_id;
    }

    /// Single-line summary for display and clipboard use:
    /// `title`, or `title - content` when there is content.
    pub fn summary(&self) -> String {
        if self.content.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.content)
        }
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

/// Column values of a pin as stored (all columns except `id`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinRow<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub visibility: i32,
    pub priority: i32,
    pub color: Option<i64>,
    pub persistent: bool,
    pub show_actions: bool,
    pub group_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milk() -> Pin {
        Pin::new("Milk", "", 1, 0, 0).unwrap().with_show_actions(true)
    }

    #[test]
    fn test_color_column_mapping() {
        assert_eq!(Color::new(0).unwrap().to_column(), None);
        assert_eq!(Color::new(1).unwrap().to_column(), Some(0));
        assert_eq!(Color::new(2).unwrap().to_column(), Some(1));
        assert_eq!(Color::new(3).unwrap().to_column(), Some(2));

        assert_eq!(Color::from_column(None).unwrap(), Color::NONE);
        assert_eq!(Color::from_column(Some(0)).unwrap().value(), 1);
        assert_eq!(Color::from_column(Some(1)).unwrap().value(), 2);
        assert_eq!(Color::from_column(Some(2)).unwrap().value(), 3);

        // Stored -1 decodes to "no color"
        assert_eq!(Color::from_column(Some(-1)).unwrap(), Color::NONE);
    }

    #[test]
    fn test_color_column_out_of_range() {
        assert!(matches!(Color::from_column(Some(3)), Err(Error::InvalidColor(4))));
        assert!(Color::from_column(Some(i64::MAX)).is_err());
    }

    #[test]
    fn test_color_bounds() {
        assert!(Color::new(0).is_ok());
        assert!(Color::new(3).is_ok());
        assert!(matches!(Color::new(4), Err(Error::InvalidColor(4))));
        assert!(matches!(Color::new(-1), Err(Error::InvalidColor(-1))));
    }

    #[test]
    fn test_pin_rejects_invalid_color() {
        assert!(Pin::new("t", "", 0, 0, 4).is_err());
        assert!(Pin::new("t", "", 0, 0, -1).is_err());
        assert!(Pin::new("t", "", 0, 0, 3).is_ok());

        let mut pin = milk();
        assert!(pin.set_color(7).is_err());
        assert_eq!(pin.color(), Color::NONE);
    }

    #[test]
    fn test_pin_rejects_empty_title() {
        assert!(matches!(Pin::new("", "body", 0, 0, 0), Err(Error::EmptyTitle)));
        let mut pin = milk();
        assert!(pin.set_title("").is_err());
        assert_eq!(pin.title(), "Milk");
    }

    #[test]
    fn test_new_pin_is_unset() {
        let pin = milk();
        assert_eq!(pin.id(), None);
        assert_eq!(pin.id_or_unset(), UNSET_ID);
        assert!(!pin.is_persisted());
        assert!(!pin.is_persistent());
        assert!(pin.shows_actions());
        assert_eq!(pin.group_id(), None);
    }

    #[test]
    fn test_summary() {
        assert_eq!(milk().summary(), "Milk");
        let pin = Pin::new("Call", "the plumber", 0, 0, 0).unwrap();
        assert_eq!(pin.summary(), "Call - the plumber");
        assert_eq!(pin.to_string(), "Call - the plumber");
    }

    #[test]
    fn test_to_row_encodes_color() {
        let pin = Pin::new("t", "c", 1, 2, 2).unwrap().with_persistent(true).with_group(Some(5));
        let row = pin.to_row();
        assert_eq!(row.color, Some(1));
        assert!(row.persistent);
        assert_eq!(row.group_id, Some(5));

        assert_eq!(milk().to_row().color, None);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(milk()).unwrap();
        assert_eq!(json["id"], -1);
        assert_eq!(json["title"], "Milk");
        assert_eq!(json["color"], 0);
        assert!(json["group_id"].is_null());

        let color: Color = serde_json::from_str("3").unwrap();
        assert_eq!(color.value(), 3);
        assert!(serde_json::from_str::<Color>("9").is_err());
    }
}
