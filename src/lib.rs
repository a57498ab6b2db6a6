//! dfview: interactive HTML table views for Polars DataFrames.
//!
//! The crate implements the server half of a notebook-style table widget:
//! a client sends a serialized UI state (search, sort, filter, column
//! order, hidden rows/columns, viewport bounds), and [`ViewSync`] replays
//! a deterministic transform pipeline over an immutable source table,
//! then renders the visible window as a self-contained HTML fragment.
//!
//! ```no_run
//! use dfview::{ViewConfig, ViewState, ViewSync, SyncOutcome};
//! use polars::prelude::*;
//!
//! # fn main() -> color_eyre::Result<()> {
//! let df = DataFrame::new(vec![
//!     Series::new("name".into(), ["a", "b", "c"]).into(),
//!     Series::new("value".into(), [1i32, 2, 3]).into(),
//! ])?;
//! let mut view = ViewSync::new(df, ViewConfig::default());
//! let initial = view.initial_view()?;
//!
//! let state = ViewState::from_json(r#"{"search_query": "a"}"#)?;
//! match view.on_state_change(&state)? {
//!     SyncOutcome::Reset { n_rows, n_cols } => { /* client resyncs bounds */ }
//!     SyncOutcome::Render(rendered) => { /* publish rendered.html */ }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod frame;
pub mod logging;
pub mod render;
pub mod state;
pub mod sync;
pub mod transform;
pub mod viewport;

// Re-export commonly used types
pub use config::ViewConfig;
pub use frame::{ColumnRef, WorkingFrame};
pub use logging::{LogBuffer, LogLevel, LogRecord};
pub use render::{CellKey, FormatFn, FormatTable, LabelKey};
pub use state::{SortDirection, ViewState};
pub use sync::{RenderedView, SyncOutcome, ViewSync};
pub use viewport::RowWindow;
