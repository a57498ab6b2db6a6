//! Row window applied after the transform stages.

use crate::config::ViewConfig;
use crate::frame::WorkingFrame;

/// Half-open row range `[start, end)` rendered to the client.
///
/// Bounds are client-supplied and always clamped server-side; windows are
/// built only through the clamping constructors, so `start <= end` holds
/// and a window never exceeds the transformed row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    start: usize,
    end: usize,
}

impl RowWindow {
    /// Clamp requested bounds into `[0, n_rows]` with `start <= end`.
    pub fn clamped(start: usize, end: usize, n_rows: usize) -> Self {
        let start = start.min(n_rows);
        let end = end.clamp(start, n_rows);
        Self { start, end }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Exclusive end bound.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Default window for a freshly shaped table: the whole table, unless
    /// it exceeds `max_rows`, in which case a lazy-load window sized from
    /// `min_rows` and `win_sizefactor`.
    pub fn initial(n_rows: usize, config: &ViewConfig) -> Self {
        let end = if config.max_rows > 0 && n_rows > config.max_rows {
            n_rows.min(config.min_rows / 2 + config.win_sizefactor * config.min_rows)
        } else {
            n_rows
        };
        Self { start: 0, end }
    }

    /// Re-clamp this window against a new row count.
    pub fn clamp_to(self, n_rows: usize) -> Self {
        Self::clamped(self.start, self.end, n_rows)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Slice the working copy to this window.
    pub fn slice(&self, frame: &WorkingFrame) -> WorkingFrame {
        frame.with_df(frame.df().slice(self.start as i64, self.len()))
    }
}
