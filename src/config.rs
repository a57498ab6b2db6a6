//! View configuration consumed by the sync pipeline.
//!
//! Defaults mirror the usual notebook display options; every field can be
//! overridden from a JSON5 document. A malformed document or a malformed
//! individual field falls back to the default for that field. Configuration
//! problems are logged, never fatal.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Display and windowing configuration for a table view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Minimum number of rows a rendered view should show.
    pub min_rows: usize,
    /// Row count above which the view switches to a windowed (lazy) render.
    /// Zero disables windowing.
    pub max_rows: usize,
    /// Maximum cell text width in characters. Zero disables truncation.
    pub max_colwidth: usize,
    /// Multiplier applied to `min_rows` when sizing the lazy-load window.
    pub win_sizefactor: usize,
    /// Decimal places used by the default numeric cell formatter.
    pub precision: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_rows: 10,
            max_rows: 60,
            max_colwidth: 50,
            win_sizefactor: 10,
            precision: 6,
        }
    }
}

impl ViewConfig {
    /// Parse a configuration from JSON5 text.
    ///
    /// Fields that are missing or not non-negative integers keep their
    /// defaults; an unparseable document yields the full defaults.
    pub fn from_json5(text: &str) -> Self {
        let defaults = Self::default();
        let doc: Value = match json5::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                warn!("unparseable view config, using defaults: {e}");
                return defaults;
            }
        };
        Self {
            min_rows: field(&doc, "min_rows", defaults.min_rows),
            max_rows: field(&doc, "max_rows", defaults.max_rows),
            max_colwidth: field(&doc, "max_colwidth", defaults.max_colwidth),
            win_sizefactor: field(&doc, "win_sizefactor", defaults.win_sizefactor),
            precision: field(&doc, "precision", defaults.precision),
        }
    }
}

fn field(doc: &Value, name: &str, default: usize) -> usize {
    match doc.get(name) {
        None => default,
        Some(v) => match v.as_u64() {
            Some(n) => n as usize,
            None => {
                warn!(
                    "view config field '{name}' is not a non-negative integer ({v}), using {default}"
                );
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ViewConfig::default();
        assert_eq!(cfg.min_rows, 10);
        assert_eq!(cfg.max_rows, 60);
        assert_eq!(cfg.max_colwidth, 50);
        assert_eq!(cfg.win_sizefactor, 10);
        assert_eq!(cfg.precision, 6);
    }

    #[test]
    fn test_from_json5_overrides() {
        let cfg = ViewConfig::from_json5("{ max_rows: 200, precision: 2 }");
        assert_eq!(cfg.max_rows, 200);
        assert_eq!(cfg.precision, 2);
        assert_eq!(cfg.min_rows, 10);
    }

    #[test]
    fn test_malformed_field_falls_back() {
        // Non-numeric precision keeps its default, other fields still apply.
        let cfg = ViewConfig::from_json5("{ precision: 'six', min_rows: 5 }");
        assert_eq!(cfg.precision, 6);
        assert_eq!(cfg.min_rows, 5);
    }

    #[test]
    fn test_unparseable_document_falls_back() {
        let cfg = ViewConfig::from_json5("not json at all {{{");
        assert_eq!(cfg, ViewConfig::default());
    }

    #[test]
    fn test_negative_value_falls_back() {
        let cfg = ViewConfig::from_json5("{ max_rows: -1 }");
        assert_eq!(cfg.max_rows, 60);
    }
}
