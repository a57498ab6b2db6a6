//! Inbound UI state blob.
//!
//! The client serializes its interaction state as one JSON object; the
//! controller deserializes it here and the transform stages read from it.
//! `serde_json` is built with `preserve_order`, so the iteration order of
//! `state_cols` is the client's insertion order, which defines the
//! multi-key sort priority.

use color_eyre::{Result, eyre::eyre};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Direction of a per-column sort instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn is_descending(self) -> bool {
        matches!(self, Self::Desc)
    }
}

/// Client-supplied view state for one update cycle.
///
/// Column keys are strings of the form `colN` where `N` is the column's
/// offset in the *source* table. Offsets stay stable across reorders and
/// hides, so the same key always refers to the same column.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViewState {
    /// Free-text search; commas and whitespace delimit AND-ed sub-queries.
    pub search_query: String,
    /// Ordered map `colN` -> `{"sort": "asc"|"desc"|null}`.
    pub state_cols: Map<String, Value>,
    /// Ordered list of `colN` keys describing the displayed column order.
    pub col_order: Vec<String>,
    /// Source row offsets hidden by the client.
    pub hidden_rows: Vec<usize>,
    /// Source column offsets hidden by the client.
    pub hidden_cols: Vec<usize>,
    /// Per-column value predicates, `colN` -> predicate object.
    /// Extension point; currently validated but never applied.
    pub filter: Map<String, Value>,
    /// Requested viewport start row (clamped server-side).
    pub start_rows: Option<usize>,
    /// Requested viewport end row, exclusive (clamped server-side).
    pub end_rows: Option<usize>,
}

impl ViewState {
    /// Deserialize a state blob from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| eyre!("malformed view state: {e}"))
    }

    /// Sort instructions in client insertion order.
    ///
    /// Entries whose `sort` is null or missing are excluded from the key
    /// list entirely. A malformed key or direction is an error for the
    /// whole stage.
    pub fn sort_keys(&self) -> Result<Vec<(usize, SortDirection)>> {
        let mut keys = Vec::new();
        for (key, value) in &self.state_cols {
            let iloc = parse_col_key(key)?;
            let direction = match value.get("sort") {
                None | Some(Value::Null) => continue,
                Some(Value::String(s)) if s == "asc" => SortDirection::Asc,
                Some(Value::String(s)) if s == "desc" => SortDirection::Desc,
                Some(other) => return Err(eyre!("invalid sort direction for {key}: {other}")),
            };
            keys.push((iloc, direction));
        }
        Ok(keys)
    }

    /// Requested column order as source offsets.
    pub fn order_ilocs(&self) -> Result<Vec<usize>> {
        self.col_order.iter().map(|k| parse_col_key(k)).collect()
    }
}

/// Parse a `colN` state key into a source column offset.
pub fn parse_col_key(key: &str) -> Result<usize> {
    key.strip_prefix("col")
        .and_then(|n| n.parse::<usize>().ok())
        .ok_or_else(|| eyre!("invalid column key '{key}'"))
}
