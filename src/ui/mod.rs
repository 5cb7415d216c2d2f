pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{banner, dim, info, section, success, summary_row, warn};
pub use table::{PinTableRow, TableBuilder, pins_table, stats_table};
pub use theme::{theme, Theme};
