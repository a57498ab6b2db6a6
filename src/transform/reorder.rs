//! Reorder stage: project visible columns into the client's order.

use std::collections::HashSet;

use color_eyre::Result;

use crate::frame::{ColumnRef, WorkingFrame};
use crate::state::ViewState;

/// Re-project the visible column list to exactly the requested order.
///
/// The result is the intersection of the requested offsets and the current
/// visible set, in requested order: offsets not listed are dropped from
/// display, unknown or already-hidden offsets are skipped, and a column is
/// never duplicated. An empty order list is a no-op.
pub fn apply(frame: &WorkingFrame, state: &ViewState) -> Result<WorkingFrame> {
    let order = state.order_ilocs()?;
    if order.is_empty() {
        return Ok(frame.clone());
    }

    let mut seen: HashSet<usize> = HashSet::new();
    let mut visible: Vec<ColumnRef> = Vec::with_capacity(order.len());
    for iloc in order {
        if !seen.insert(iloc) {
            continue;
        }
        if let Some(col) = frame.columns().iter().find(|c| c.iloc == iloc) {
            visible.push(col.clone());
        }
    }
    Ok(frame.with_visible_columns(visible))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn sample_frame() -> WorkingFrame {
        let s1 = Series::new("a".into(), [1i32, 2]);
        let s2 = Series::new("b".into(), ["x", "y"]);
        let s3 = Series::new("c".into(), [1.0f64, 2.0]);
        let df = DataFrame::new(vec![s1.into(), s2.into(), s3.into()]).unwrap();
        WorkingFrame::from_source(&df).unwrap()
    }

    fn order(keys: &[&str]) -> ViewState {
        ViewState {
            col_order: keys.iter().map(|k| k.to_string()).collect(),
            ..ViewState::default()
        }
    }

    #[test]
    fn test_empty_order_is_noop() {
        let frame = sample_frame();
        let out = apply(&frame, &ViewState::default()).unwrap();
        assert_eq!(out.shape().1, 3);
    }

    #[test]
    fn test_permutation() {
        let frame = sample_frame();
        let out = apply(&frame, &order(&["col2", "col0", "col1"])).unwrap();
        let names: Vec<&str> = out.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_unlisted_columns_are_dropped() {
        let frame = sample_frame();
        let out = apply(&frame, &order(&["col1"])).unwrap();
        assert_eq!(out.shape().1, 1);
        assert_eq!(out.columns()[0].name, "b");
    }

    #[test]
    fn test_never_adds_or_duplicates() {
        let frame = sample_frame();
        let out = apply(&frame, &order(&["col1", "col1", "col9"])).unwrap();
        let names: Vec<&str> = out.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b"]);
    }

    #[test]
    fn test_hidden_offsets_are_skipped() {
        let frame = sample_frame();
        // Hide column 0 first, then request it in the order list.
        let visible = frame.columns()[1..].to_vec();
        let frame = frame.with_visible_columns(visible);
        let out = apply(&frame, &order(&["col0", "col2"])).unwrap();
        let names: Vec<&str> = out.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["c"]);
    }

    #[test]
    fn test_bad_key_is_stage_error() {
        let frame = sample_frame();
        assert!(apply(&frame, &order(&["first"])).is_err());
    }
}
