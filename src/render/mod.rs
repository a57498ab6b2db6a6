//! HTML rendering: the style/format chain and the table fragment builder.

pub mod format;
pub mod html;

pub use format::{CellKey, FormatFn, FormatTable, LabelKey, numeric_formatter};
pub use html::{css, render_table};
