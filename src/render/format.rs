//! Per-cell formatting functions and their composition.
//!
//! Two formatter tables exist per render: a *local* table rebuilt every
//! cycle (structural markup: header icons, label spans, truncation and
//! escaping) and a *base* table that persists across cycles (user- or
//! default-supplied value formatting). Both are keyed by stable source
//! coordinates, never by render offsets, so the pairing survives
//! filtering and reordering. Rendering composes `base(local(value))` for
//! each destination.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use color_eyre::Result;

use crate::frame::WorkingFrame;

/// A formatting function applied to one cell's text.
pub type FormatFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Stable coordinate of a header or index label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKey {
    /// Column header, keyed by source column offset.
    Column { iloc: usize },
    /// Row index label, keyed by source row offset.
    Row { iloc: u32 },
}

/// Stable coordinate of a body cell in source-table space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub row: u32,
    pub col: usize,
}

/// One set of formatting functions keyed by stable positions.
///
/// Body formatters resolve exact `(row, col)` entries first, then fall
/// back to a per-column entry.
#[derive(Clone, Default)]
pub struct FormatTable {
    labels: HashMap<LabelKey, FormatFn>,
    columns: HashMap<usize, FormatFn>,
    cells: HashMap<CellKey, FormatFn>,
}

impl FormatTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.columns.is_empty() && self.cells.is_empty()
    }

    pub fn set_label(&mut self, key: LabelKey, f: FormatFn) {
        self.labels.insert(key, f);
    }

    /// Formatter for every body cell of one source column.
    pub fn set_column(&mut self, iloc: usize, f: FormatFn) {
        self.columns.insert(iloc, f);
    }

    /// Exact-cell formatter; takes precedence over the column entry.
    pub fn set_cell(&mut self, key: CellKey, f: FormatFn) {
        self.cells.insert(key, f);
    }

    pub fn label(&self, key: &LabelKey) -> Option<&FormatFn> {
        self.labels.get(key)
    }

    pub fn cell(&self, key: &CellKey) -> Option<&FormatFn> {
        self.cells.get(key).or_else(|| self.columns.get(&key.col))
    }

    /// Seed the table with the default numeric formatter for every float
    /// column of the source schema.
    pub fn seed_numeric(&mut self, frame: &WorkingFrame, precision: usize) -> Result<()> {
        for col in frame.all_columns() {
            if frame.is_float_column(col)? {
                self.set_column(col.iloc, numeric_formatter(precision));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FormatTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatTable")
            .field("labels", &self.labels.len())
            .field("columns", &self.columns.len())
            .field("cells", &self.cells.len())
            .finish()
    }
}

/// Fixed-precision formatter for numeric cell text; non-numeric text
/// passes through untouched.
pub fn numeric_formatter(precision: usize) -> FormatFn {
    Arc::new(move |raw: &str| match raw.parse::<f64>() {
        Ok(v) => format!("{v:.precision$}"),
        Err(_) => raw.to_string(),
    })
}

/// Composition of the persisted base table with one cycle's local table.
pub struct FormatChain<'a> {
    base: &'a FormatTable,
    local: FormatTable,
}

impl<'a> FormatChain<'a> {
    pub fn new(base: &'a FormatTable, local: FormatTable) -> Self {
        Self { base, local }
    }

    /// Format a header or index label: `base(local(raw))`.
    pub fn label(&self, key: LabelKey, raw: &str) -> String {
        let inner = match self.local.label(&key) {
            Some(f) => f(raw),
            None => raw.to_string(),
        };
        match self.base.label(&key) {
            Some(f) => f(&inner),
            None => inner,
        }
    }

    /// Format a body cell: `base(local(raw))`.
    pub fn cell(&self, key: CellKey, raw: &str) -> String {
        let inner = match self.local.cell(&key) {
            Some(f) => f(raw),
            None => raw.to_string(),
        };
        match self.base.cell(&key) {
            Some(f) => f(&inner),
            None => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_numeric_formatter() {
        let f = numeric_formatter(2);
        assert_eq!(f("1.23456"), "1.23");
        assert_eq!(f("3"), "3.00");
        assert_eq!(f("hello"), "hello");
    }

    #[test]
    fn test_cell_lookup_prefers_exact_entry() {
        let mut table = FormatTable::new();
        table.set_column(0, Arc::new(|s: &str| format!("col:{s}")));
        table.set_cell(
            CellKey { row: 1, col: 0 },
            Arc::new(|s: &str| format!("cell:{s}")),
        );
        let exact = table.cell(&CellKey { row: 1, col: 0 }).unwrap();
        assert_eq!(exact("x"), "cell:x");
        let fallback = table.cell(&CellKey { row: 0, col: 0 }).unwrap();
        assert_eq!(fallback("x"), "col:x");
        assert!(table.cell(&CellKey { row: 0, col: 1 }).is_none());
    }

    #[test]
    fn test_chain_composes_base_over_local() {
        let mut base = FormatTable::new();
        base.set_column(0, Arc::new(|s: &str| format!("[{s}]")));
        let mut local = FormatTable::new();
        local.set_column(0, Arc::new(|s: &str| format!("<{s}>")));
        let chain = FormatChain::new(&base, local);
        // Inner (local) runs first, outer (base) wraps it.
        assert_eq!(chain.cell(CellKey { row: 0, col: 0 }, "v"), "[<v>]");
        // Missing entries degrade to identity on that side.
        assert_eq!(chain.cell(CellKey { row: 0, col: 1 }, "v"), "v");
    }

    #[test]
    fn test_seed_numeric_targets_float_columns() {
        let s1 = Series::new("f".into(), [1.5f64, 2.5]);
        let s2 = Series::new("i".into(), [1i32, 2]);
        let df = DataFrame::new(vec![s1.into(), s2.into()]).unwrap();
        let frame = WorkingFrame::from_source(&df).unwrap();
        let mut table = FormatTable::new();
        assert!(table.is_empty());
        table.seed_numeric(&frame, 3).unwrap();
        assert!(table.cell(&CellKey { row: 0, col: 0 }).is_some());
        assert!(table.cell(&CellKey { row: 0, col: 1 }).is_none());
    }
}
