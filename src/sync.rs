//! Sync controller: one full pipeline pass per inbound state change.

use color_eyre::{Result, eyre::eyre};
use polars::prelude::DataFrame;

use crate::config::ViewConfig;
use crate::frame::WorkingFrame;
use crate::logging::{LogBuffer, LogRecord};
use crate::render::format::{CellKey, FormatFn, FormatTable, LabelKey};
use crate::render::html::render_table;
use crate::state::ViewState;
use crate::transform::{filter, reorder, search, sort};
use crate::viewport::RowWindow;

/// Outbound payload of a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    pub html: String,
    pub n_rows: usize,
    pub n_cols: usize,
    pub start_rows: usize,
    pub end_rows: usize,
}

/// Result of one update cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The transformed shape differs from the last known shape: the
    /// client must re-request viewport bounds before anything is
    /// rendered. Counters are already updated.
    Reset { n_rows: usize, n_cols: usize },
    /// A fresh view for the (clamped) requested window.
    Render(RenderedView),
}

/// Orchestrates the transform pipeline over an immutable source table.
///
/// Synchronous and single-threaded: each state change runs the whole
/// pass (filter, search, sort, reorder, slice, render) to completion.
/// A failing stage degrades to a no-op for that stage (logged to the
/// client channel); only controller-level failures surface as errors, in
/// which case the previously published view and counters stay in place.
pub struct ViewSync {
    source: DataFrame,
    config: ViewConfig,
    base_formats: FormatTable,
    window: RowWindow,
    n_rows: usize,
    n_cols: usize,
    log: LogBuffer,
}

impl ViewSync {
    /// Wrap a source table with the given view configuration.
    pub fn new(source: DataFrame, config: ViewConfig) -> Self {
        let n_rows = source.height();
        let n_cols = source.width();
        let window = RowWindow::initial(n_rows, &config);
        Self {
            source,
            config,
            base_formats: FormatTable::new(),
            window,
            n_rows,
            n_cols,
            log: LogBuffer::new(),
        }
    }

    pub fn source(&self) -> &DataFrame {
        &self.source
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Last known transformed shape.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    pub fn window(&self) -> RowWindow {
        self.window
    }

    /// Replace the source table wholesale. Counters and window are
    /// re-derived; persisted formatters survive (they are keyed by
    /// stable source coordinates).
    pub fn replace_source(&mut self, source: DataFrame) {
        self.n_rows = source.height();
        self.n_cols = source.width();
        self.window = RowWindow::initial(self.n_rows, &self.config);
        self.source = source;
    }

    /// Persisted formatter for every body cell of one source column.
    pub fn set_column_format(&mut self, iloc: usize, f: FormatFn) {
        self.base_formats.set_column(iloc, f);
    }

    /// Persisted formatter for one exact cell.
    pub fn set_cell_format(&mut self, key: CellKey, f: FormatFn) {
        self.base_formats.set_cell(key, f);
    }

    /// Persisted formatter for a header or index label.
    pub fn set_label_format(&mut self, key: LabelKey, f: FormatFn) {
        self.base_formats.set_label(key, f);
    }

    /// Render the construction-time default window.
    pub fn initial_view(&mut self) -> Result<RenderedView> {
        match self.on_state_change(&ViewState::default())? {
            SyncOutcome::Render(view) => Ok(view),
            SyncOutcome::Reset { .. } => Err(eyre!("shape changed during initial render")),
        }
    }

    /// Run one full update cycle for an inbound state blob.
    pub fn on_state_change(&mut self, state: &ViewState) -> Result<SyncOutcome> {
        let mut working = WorkingFrame::from_source(&self.source)?;
        working = self.run_stage("filter", working, |f| filter::apply(f, state));
        working = self.run_stage("search", working, |f| search::apply(f, state));
        working = self.run_stage("sort", working, |f| sort::apply(f, state));
        working = self.run_stage("reorder", working, |f| reorder::apply(f, state));

        let (n_rows, n_cols) = working.shape();
        if (n_rows, n_cols) != (self.n_rows, self.n_cols) {
            self.n_rows = n_rows;
            self.n_cols = n_cols;
            self.window = self.window.clamp_to(n_rows);
            self.log.debug(
                "sync",
                format!("shape changed to {n_rows}x{n_cols}, requesting viewport reset"),
            );
            return Ok(SyncOutcome::Reset { n_rows, n_cols });
        }

        let start = state.start_rows.unwrap_or(self.window.start());
        let end = state.end_rows.unwrap_or(self.window.end());
        let window = RowWindow::clamped(start, end, n_rows);

        if self.base_formats.is_empty() {
            self.base_formats
                .seed_numeric(&working, self.config.precision)?;
        }
        let html = match render_table(&working, window, &self.base_formats, &self.config) {
            Ok(html) => html,
            Err(e) => {
                self.log.error("render", format!("render failed: {e:?}"));
                return Err(e);
            }
        };
        self.window = window;
        Ok(SyncOutcome::Render(RenderedView {
            html,
            n_rows,
            n_cols,
            start_rows: window.start(),
            end_rows: window.end(),
        }))
    }

    /// Drain the client-visible log records accumulated so far.
    pub fn take_log(&mut self) -> Vec<LogRecord> {
        self.log.drain()
    }

    fn run_stage<F>(&mut self, name: &'static str, working: WorkingFrame, stage: F) -> WorkingFrame
    where
        F: FnOnce(&WorkingFrame) -> Result<WorkingFrame>,
    {
        match stage(&working) {
            Ok(next) => next,
            Err(e) => {
                self.log
                    .error(name, format!("{name} stage failed, treated as no-op: {e:?}"));
                working
            }
        }
    }
}
