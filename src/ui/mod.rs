pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    accent, dim, error, header, muted, record_line, section, status, success, summary_row, warn,
};
pub use progress::Spinner;
pub use table::{record_table, stats_table, RecordRow, TableBuilder};
pub use theme::{init_theme, theme, Theme};
