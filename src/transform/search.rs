//! Search stage: free-text containment over string columns.

use color_eyre::{Result, eyre::eyre};
use polars::prelude::*;

use crate::frame::WorkingFrame;
use crate::state::ViewState;

/// Narrow the working copy to rows matching the free-text query.
///
/// The query splits on commas and whitespace into independent sub-queries
/// with AND semantics. Each sub-query is a case-insensitive regex
/// containment test over the visible string columns; a row survives a
/// sub-query if any string column matches, so the row set shrinks
/// monotonically across sub-queries. Null cells never match. A table with
/// no string columns searches to zero rows, not an error.
pub fn apply(frame: &WorkingFrame, state: &ViewState) -> Result<WorkingFrame> {
    let query = state.search_query.replace(',', " ");
    let sub_queries: Vec<&str> = query.split_whitespace().collect();
    if sub_queries.is_empty() {
        return Ok(frame.clone());
    }

    let string_cols: Vec<String> = frame
        .string_columns()?
        .iter()
        .map(|col| col.name.clone())
        .collect();
    if string_cols.is_empty() {
        return Ok(frame.with_df(frame.df().head(Some(0))));
    }

    let mut df = frame.df().clone();
    for sub in &sub_queries {
        let pattern = format!("(?i){sub}");
        let mut mask = BooleanChunked::full("".into(), false, df.height());
        for name in &string_cols {
            let col_mask = df
                .column(name)?
                .str()?
                .contains(&pattern, true)
                .map_err(|e| eyre!("search failed on column '{name}': {e}"))?;
            mask = mask | col_mask;
        }
        df = df.filter(&mask)?;
    }
    Ok(frame.with_df(df))
}
