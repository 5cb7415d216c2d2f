//! Groups and their display ordering
//!
//! The store hands out groups as a plain `id -> name` map with no ordering
//! guarantee. Front ends that let a user pick a group build a [`GroupMenu`]
//! from that map:
//! - a synthetic "default" entry (no group) comes first
//! - real group names follow, sorted alphabetically
//! - the sentinel group is shown under a localized label
//! - a group whose name collides with the default label is hidden

use std::collections::BTreeMap;

/// Name of the pre-seeded group exempt from the visible-pin limit
pub const UNLIMITED_GROUP: &str = "unlimited";

/// Label shown for "no group" when none is configured
pub const DEFAULT_LABEL: &str = "Default";

/// Label shown for the sentinel group when none is configured
pub const UNLIMITED_LABEL: &str = "Unlimited";

/// Whether a stored group name is the sentinel group
pub fn is_unlimited(name: &str) -> bool {
    name == UNLIMITED_GROUP
}

/// What a menu label resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupChoice {
    /// The synthetic default entry: the pin belongs to no group
    Ungrouped,
    /// A stored group
    Group(i64),
}

impl GroupChoice {
    pub fn group_id(self) -> Option<i64> {
        match self {
            GroupChoice::Ungrouped => None,
            GroupChoice::Group(id) => Some(id),
        }
    }
}

/// Ordered, localized view over the stored groups
#[derive(Debug, Clone)]
pub struct GroupMenu {
    groups: BTreeMap<i64, String>,
    default_label: String,
    unlimited_label: String,
    labels: Vec<String>,
}

impl GroupMenu {
    pub fn new(
        groups: BTreeMap<i64, String>,
        default_label: impl Into<String>,
        unlimited_label: impl Into<String>,
    ) -> Self {
        let default_label = default_label.into();
        let unlimited_label = unlimited_label.into();

        let mut labels: Vec<String> = groups
            .values()
            .filter(|name| **name != default_label)
            .map(|name| {
                if is_unlimited(name) {
                    unlimited_label.clone()
                } else {
                    name.clone()
                }
            })
            .collect();
        labels.sort();
        labels.insert(0, default_label.clone());

        Self {
            groups,
            default_label,
            unlimited_label,
            labels,
        }
    }

    /// Menu with the built-in English labels
    pub fn with_default_labels(groups: BTreeMap<i64, String>) -> Self {
        Self::new(groups, DEFAULT_LABEL, UNLIMITED_LABEL)
    }

    /// Labels in display order, default entry first
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn default_label(&self) -> &str {
        &self.default_label
    }

    pub fn unlimited_label(&self) -> &str {
        &self.unlimited_label
    }

    /// Label shown for a pin's group. `None` for an id that is not stored.
    pub fn label_for(&self, group_id: Option<i64>) -> Option<&str> {
        match group_id {
            None => Some(&self.default_label),
            Some(id) => self.groups.get(&id).map(|name| {
                if is_unlimited(name) {
                    self.unlimited_label.as_str()
                } else {
                    name.as_str()
                }
            }),
        }
    }

    /// Position of a pin's group in [`labels`](Self::labels)
    pub fn position_of(&self, group_id: Option<i64>) -> Option<usize> {
        let label = self.label_for(group_id)?;
        self.labels.iter().position(|l| l == label)
    }

    /// Resolve a displayed label back to a group.
    ///
    /// The localized sentinel label maps to the group literally named
    /// `"unlimited"`; every lookup is a scan over the stored names.
    pub fn resolve(&self, label: &str) -> Option<GroupChoice> {
        if label == self.default_label {
            return Some(GroupChoice::Ungrouped);
        }

        let wanted = if label == self.unlimited_label {
            UNLIMITED_GROUP
        } else {
            label
        };

        let found = self
            .groups
            .iter()
            .find(|(_, name)| name.as_str() == wanted)
            .map(|(id, _)| GroupChoice::Group(*id));

        if found.is_none() {
            tracing::warn!("Could not find selected group with name {}", label);
        }
        found
    }

    /// Resolve a menu position, as returned by a picker widget
    pub fn resolve_index(&self, index: usize) -> Option<GroupChoice> {
        match self.labels.get(index) {
            Some(label) => self.resolve(label),
            None => {
                tracing::warn!("Unknown group selection index: {}", index);
                None
            }
        }
    }
}
