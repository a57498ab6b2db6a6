//! Data holder: immutable source table plus the per-cycle working copy.
//!
//! Stable identity is positional. Each row carries its source offset in an
//! internal `__iloc` column so it survives filtering and sorting; each
//! column is addressed by a [`ColumnRef`] pairing its name with its source
//! offset, so reorders and hides never shift identities. Column names are
//! only ever used to address polars columns.

use color_eyre::{Result, eyre::eyre};
use polars::prelude::*;

/// Name of the internal row-identity column carried by every working copy.
pub const ROW_ILOC: &str = "__iloc";

/// A column of the source table: display name plus source offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub name: String,
    pub iloc: usize,
}

/// Per-cycle mutable duplicate of the source table.
///
/// Row transforms go through the inner [`DataFrame`] (which carries the
/// row-identity column along); column transforms only touch the visible
/// column list. The source table is never modified.
#[derive(Debug, Clone)]
pub struct WorkingFrame {
    df: DataFrame,
    all_columns: Vec<ColumnRef>,
    columns: Vec<ColumnRef>,
}

impl WorkingFrame {
    /// Duplicate the source table and attach row identities.
    pub fn from_source(source: &DataFrame) -> Result<Self> {
        if source
            .get_column_names()
            .iter()
            .any(|n| n.as_str() == ROW_ILOC)
        {
            return Err(eyre!("source table already has a '{ROW_ILOC}' column"));
        }
        let all_columns: Vec<ColumnRef> = source
            .get_column_names()
            .iter()
            .enumerate()
            .map(|(iloc, name)| ColumnRef {
                name: name.to_string(),
                iloc,
            })
            .collect();
        let mut cols: Vec<Column> = source.get_columns().to_vec();
        let ids: Vec<u32> = (0..source.height() as u32).collect();
        cols.push(Series::new(ROW_ILOC.into(), ids).into());
        let df = DataFrame::new(cols)?;
        Ok(Self {
            df,
            columns: all_columns.clone(),
            all_columns,
        })
    }

    /// Number of rows currently in the working copy.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Visible (rows, columns) shape. Recomputed on every call.
    pub fn shape(&self) -> (usize, usize) {
        (self.df.height(), self.columns.len())
    }

    pub fn df(&self) -> &DataFrame {
        &self.df
    }

    /// Visible columns in display order.
    pub fn columns(&self) -> &[ColumnRef] {
        &self.columns
    }

    /// Full source column schema, in source order.
    pub fn all_columns(&self) -> &[ColumnRef] {
        &self.all_columns
    }

    /// Resolve a source column offset against the source schema.
    pub fn source_column(&self, iloc: usize) -> Result<&ColumnRef> {
        self.all_columns
            .get(iloc)
            .ok_or_else(|| eyre!("column offset {iloc} out of bounds"))
    }

    /// Same frame with the rows replaced (visible columns unchanged).
    pub fn with_df(&self, df: DataFrame) -> Self {
        Self {
            df,
            all_columns: self.all_columns.clone(),
            columns: self.columns.clone(),
        }
    }

    /// Same frame with the visible column list replaced.
    pub fn with_visible_columns(&self, columns: Vec<ColumnRef>) -> Self {
        Self {
            df: self.df.clone(),
            all_columns: self.all_columns.clone(),
            columns,
        }
    }

    /// Source offset of the row at the given working-copy position.
    pub fn row_iloc(&self, row: usize) -> Result<u32> {
        let ca = self.df.column(ROW_ILOC)?.u32()?;
        ca.get(row)
            .ok_or_else(|| eyre!("row {row} out of bounds"))
    }

    /// Source offsets for all rows, in working-copy order.
    pub fn row_ilocs(&self) -> Result<Vec<u32>> {
        let ca = self.df.column(ROW_ILOC)?.u32()?;
        Ok(ca.into_no_null_iter().collect())
    }

    /// Visible columns with string dtype, in display order.
    pub fn string_columns(&self) -> Result<Vec<&ColumnRef>> {
        let mut out = Vec::new();
        for col in &self.columns {
            if self.df.column(&col.name)?.dtype() == &DataType::String {
                out.push(col);
            }
        }
        Ok(out)
    }

    /// Whether a visible column holds floating point values.
    pub fn is_float_column(&self, col: &ColumnRef) -> Result<bool> {
        Ok(matches!(
            self.df.column(&col.name)?.dtype(),
            DataType::Float32 | DataType::Float64
        ))
    }

    /// Raw display text of one cell.
    pub fn cell_text(&self, row: usize, col: &ColumnRef) -> Result<String> {
        let value = self.df.column(&col.name)?.get(row)?;
        Ok(anyvalue_to_display_string(&value))
    }
}

/// Convert a Polars AnyValue into a display string
pub fn anyvalue_to_display_string(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => "".to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => format!("{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        let s1 = Series::new("name".into(), ["a", "b", "c"]);
        let s2 = Series::new("value".into(), [1i32, 2, 3]);
        DataFrame::new(vec![s1.into(), s2.into()]).unwrap()
    }

    #[test]
    fn test_from_source_attaches_row_identity() {
        let frame = WorkingFrame::from_source(&sample_df()).unwrap();
        assert_eq!(frame.shape(), (3, 2));
        assert_eq!(frame.row_ilocs().unwrap(), vec![0, 1, 2]);
        // The identity column is internal, not part of the visible shape.
        assert_eq!(frame.df().width(), 3);
    }

    #[test]
    fn test_from_source_rejects_reserved_name() {
        let s = Series::new(ROW_ILOC.into(), [1i32]);
        let df = DataFrame::new(vec![s.into()]).unwrap();
        assert!(WorkingFrame::from_source(&df).is_err());
    }

    #[test]
    fn test_column_refs_carry_source_offsets() {
        let frame = WorkingFrame::from_source(&sample_df()).unwrap();
        let cols = frame.columns();
        assert_eq!(cols[0], ColumnRef { name: "name".to_string(), iloc: 0 });
        assert_eq!(cols[1], ColumnRef { name: "value".to_string(), iloc: 1 });
        assert!(frame.source_column(2).is_err());
    }

    #[test]
    fn test_string_columns() {
        let frame = WorkingFrame::from_source(&sample_df()).unwrap();
        let strings = frame.string_columns().unwrap();
        assert_eq!(strings.len(), 1);
        assert_eq!(strings[0].name, "name");
    }

    #[test]
    fn test_cell_text() {
        let frame = WorkingFrame::from_source(&sample_df()).unwrap();
        let cols = frame.columns().to_vec();
        assert_eq!(frame.cell_text(0, &cols[0]).unwrap(), "a");
        assert_eq!(frame.cell_text(2, &cols[1]).unwrap(), "3");
    }

    #[test]
    fn test_anyvalue_null_is_empty() {
        assert_eq!(anyvalue_to_display_string(&AnyValue::Null), "");
    }
}
