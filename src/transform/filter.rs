//! Filter stage: hidden rows and columns, plus the value-predicate stub.

use std::collections::HashSet;

use color_eyre::Result;
use polars::prelude::*;

use crate::frame::{ColumnRef, WorkingFrame};
use crate::state::{ViewState, parse_col_key};

/// Drop rows and columns the client flagged hidden.
///
/// Rows are matched by source offset through the row-identity column, so a
/// hidden row stays hidden regardless of prior sorting. Hidden columns are
/// removed from the visible list only; the working copy keeps their data so
/// later stages can still resolve them. The `filter` predicate map is
/// validated but intentionally never applied.
pub fn apply(frame: &WorkingFrame, state: &ViewState) -> Result<WorkingFrame> {
    let mut next = frame.clone();

    if !state.hidden_rows.is_empty() {
        let hidden: HashSet<u32> = state.hidden_rows.iter().map(|&i| i as u32).collect();
        let keep: Vec<bool> = next
            .row_ilocs()?
            .iter()
            .map(|iloc| !hidden.contains(iloc))
            .collect();
        let mask = BooleanChunked::from_slice("".into(), &keep);
        next = next.with_df(next.df().filter(&mask)?);
    }

    if !state.hidden_cols.is_empty() {
        let visible: Vec<ColumnRef> = next
            .columns()
            .iter()
            .filter(|col| !state.hidden_cols.contains(&col.iloc))
            .cloned()
            .collect();
        next = next.with_visible_columns(visible);
    }

    // Per-column value predicates are an extension point. Validate the
    // blob so a bad key still surfaces in the log, apply nothing.
    for key in state.filter.keys() {
        let iloc = parse_col_key(key)?;
        frame.source_column(iloc)?;
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> WorkingFrame {
        let s1 = Series::new("name".into(), ["a", "b", "c", "d"]);
        let s2 = Series::new("value".into(), [1i32, 2, 3, 4]);
        let df = DataFrame::new(vec![s1.into(), s2.into()]).unwrap();
        WorkingFrame::from_source(&df).unwrap()
    }

    #[test]
    fn test_no_state_is_identity() {
        let frame = sample_frame();
        let out = apply(&frame, &ViewState::default()).unwrap();
        assert_eq!(out.shape(), (4, 2));
    }

    #[test]
    fn test_hidden_rows_removed_by_source_offset() {
        let frame = sample_frame();
        let state = ViewState {
            hidden_rows: vec![0, 2],
            ..ViewState::default()
        };
        let out = apply(&frame, &state).unwrap();
        assert_eq!(out.height(), 2);
        assert_eq!(out.row_ilocs().unwrap(), vec![1, 3]);
    }

    #[test]
    fn test_hidden_column_removed_from_display_only() {
        let frame = sample_frame();
        let state = ViewState {
            hidden_cols: vec![0],
            ..ViewState::default()
        };
        let out = apply(&frame, &state).unwrap();
        assert_eq!(out.shape(), (4, 1));
        assert_eq!(out.columns()[0].name, "value");
        // Data survives for later stages; only the display set shrinks.
        assert!(out.df().column("name").is_ok());
    }

    #[test]
    fn test_predicate_map_is_validated_not_applied() {
        let frame = sample_frame();
        let state = ViewState::from_json(r#"{"filter": {"col1": {"gt": 2}}}"#).unwrap();
        let out = apply(&frame, &state).unwrap();
        assert_eq!(out.shape(), (4, 2));

        let bad = ViewState::from_json(r#"{"filter": {"col9": {}}}"#).unwrap();
        assert!(apply(&frame, &bad).is_err());
    }
}
