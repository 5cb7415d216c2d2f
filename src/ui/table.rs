use tabled::{settings::Style, Table, Tabled};

use crate::pin::Pin;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

/// One line of the pin listing
#[derive(Tabled)]
pub struct PinTableRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Content")]
    pub content: String,
    #[tabled(rename = "Vis")]
    pub visibility: i32,
    #[tabled(rename = "Prio")]
    pub priority: i32,
    #[tabled(rename = "Color")]
    pub color: String,
    #[tabled(rename = "Group")]
    pub group: String,
    #[tabled(rename = "Flags")]
    pub flags: String,
}

impl PinTableRow {
    pub fn new(pin: &Pin, group_label: &str) -> Self {
        let mut flags = Vec::new();
        if pin.is_persistent() {
            flags.push("persistent");
        }
        if pin.shows_actions() {
            flags.push("actions");
        }

        Self {
            id: pin.id_or_unset(),
            title: pin.title().to_string(),
            content: pin.content().to_string(),
            visibility: pin.visibility(),
            priority: pin.priority(),
            color: pin.color().to_string(),
            group: group_label.to_string(),
            flags: flags.join(", "),
        }
    }
}

pub fn pins_table(rows: &[PinTableRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}
