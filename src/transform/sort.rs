//! Sort stage: one stable multi-key sort from the ordered state map.

use color_eyre::Result;
use polars::prelude::*;

use crate::frame::WorkingFrame;
use crate::state::ViewState;

/// Sort the working copy by the client's sort instructions.
///
/// Key priority is the insertion order of `state_cols`; columns without a
/// direction are excluded from the key list entirely. The sort is stable
/// (`maintain_order`), so rows with equal keys keep their relative order.
/// Nulls sort last in both directions.
pub fn apply(frame: &WorkingFrame, state: &ViewState) -> Result<WorkingFrame> {
    let keys = state.sort_keys()?;
    if keys.is_empty() {
        return Ok(frame.clone());
    }

    let mut by: Vec<String> = Vec::with_capacity(keys.len());
    let mut descending: Vec<bool> = Vec::with_capacity(keys.len());
    for (iloc, direction) in keys {
        let col = frame.source_column(iloc)?;
        by.push(col.name.clone());
        descending.push(direction.is_descending());
    }

    let options = SortMultipleOptions::default()
        .with_order_descending_multi(descending)
        .with_nulls_last(true)
        .with_maintain_order(true);
    Ok(frame.with_df(frame.df().sort(&by, options)?))
}
