//! Self-contained HTML table fragment.
//!
//! Structural classes follow a fixed scheme (see [`css`]); every header
//! and index cell records its *source* position in the `--dv-df-iloc`
//! custom property so the client can map DOM elements back to source
//! coordinates after any combination of filtering, sorting and
//! reordering. Data cells carry render-offset classes and resolve to
//! source coordinates through their row and column headers.

use std::fmt::Write as _;
use std::sync::Arc;

use color_eyre::Result;

use crate::config::ViewConfig;
use crate::frame::WorkingFrame;
use crate::viewport::RowWindow;

use super::format::{CellKey, FormatChain, FormatTable, LabelKey};

/// CSS class contract of the rendered fragment.
pub mod css {
    pub const TABLE: &str = "dv-table";
    pub const LEVEL_PREFIX: &str = "dv-lvl-";
    pub const ROW_PREFIX: &str = "dv-row-";
    pub const COL_PREFIX: &str = "dv-col-";
    pub const ROW_HEAD: &str = "dv-row-head";
    pub const COL_HEAD: &str = "dv-col-head";
    pub const ROW_TRIM: &str = "dv-row-trim";
    pub const INDEX_NAME: &str = "dv-index";
    pub const DATA: &str = "dv-data";
    pub const BLANK: &str = "dv-blank";
    pub const ROW_TEXT: &str = "dv-row-text";
    pub const COL_TEXT: &str = "dv-col-text";
    pub const COL_ICON_SORT: &str = "dv-col-i-sort";
    pub const COL_ICON_FILTER: &str = "dv-col-i-filter";
    /// Custom property carrying a cell's source offset.
    pub const ILOC_VAR: &str = "--dv-df-iloc";
}

/// Escape text for safe interpolation into element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Truncate to `max` characters with a trailing ellipsis; `max == 0`
/// disables truncation.
fn truncate(text: &str, max: usize) -> String {
    if max == 0 || text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str("...");
    out
}

/// Cycle-local structural formatters for the windowed frame.
///
/// Rebuilt on every render: header labels get the sort/filter icon
/// wrapper, row labels get the index span, body cells get truncation and
/// escaping. Keys are source offsets so the persisted base table can be
/// composed on top without any index-shift bookkeeping.
fn structural_formats(frame: &WorkingFrame, config: &ViewConfig) -> Result<FormatTable> {
    let mut local = FormatTable::new();

    for col in frame.columns() {
        local.set_label(
            LabelKey::Column { iloc: col.iloc },
            Arc::new(|raw: &str| {
                format!(
                    "<span class=\"{sort}\"></span>\
                     <span class=\"{text}\" draggable=\"true\">{value}</span>\
                     <span class=\"{filter}\"></span>",
                    sort = css::COL_ICON_SORT,
                    text = css::COL_TEXT,
                    filter = css::COL_ICON_FILTER,
                    value = escape_html(raw),
                )
            }),
        );
        let max = config.max_colwidth;
        local.set_column(
            col.iloc,
            Arc::new(move |raw: &str| escape_html(&truncate(raw, max))),
        );
    }

    for row in 0..frame.height() {
        let iloc = frame.row_iloc(row)?;
        local.set_label(
            LabelKey::Row { iloc },
            Arc::new(|raw: &str| {
                format!(
                    "<span class=\"{text}\">{value}</span>",
                    text = css::ROW_TEXT,
                    value = escape_html(raw),
                )
            }),
        );
    }

    Ok(local)
}

/// Render the windowed rows of a transformed frame as an HTML fragment.
///
/// `base` is the persisted formatter table; the cycle-local structural
/// table is built here and composed under it.
pub fn render_table(
    frame: &WorkingFrame,
    window: RowWindow,
    base: &FormatTable,
    config: &ViewConfig,
) -> Result<String> {
    let visible = window.slice(frame);
    let chain = FormatChain::new(base, structural_formats(&visible, config)?);
    let mut html = String::new();

    let _ = write!(html, "<table class=\"{}\">", css::TABLE);

    // Header row: corner cell over the index, then one heading per
    // visible column.
    let _ = write!(html, "<thead><tr>");
    let _ = write!(
        html,
        "<th class=\"{} {} {}0\"></th>",
        css::BLANK,
        css::INDEX_NAME,
        css::LEVEL_PREFIX
    );
    for (j, col) in visible.columns().iter().enumerate() {
        let label = chain.label(LabelKey::Column { iloc: col.iloc }, &col.name);
        let _ = write!(
            html,
            "<th class=\"{head} {lvl}0 {colp}{j}\" style=\"{var}: {iloc}\">{label}</th>",
            head = css::COL_HEAD,
            lvl = css::LEVEL_PREFIX,
            colp = css::COL_PREFIX,
            var = css::ILOC_VAR,
            iloc = col.iloc,
        );
    }
    let _ = write!(html, "</tr></thead>");

    let _ = write!(html, "<tbody>");
    for i in 0..visible.height() {
        let row_iloc = visible.row_iloc(i)?;
        let _ = write!(html, "<tr>");
        let label = chain.label(LabelKey::Row { iloc: row_iloc }, &row_iloc.to_string());
        let _ = write!(
            html,
            "<th class=\"{head} {lvl}0 {rowp}{i}\" style=\"{var}: {iloc}\">{label}</th>",
            head = css::ROW_HEAD,
            lvl = css::LEVEL_PREFIX,
            rowp = css::ROW_PREFIX,
            var = css::ILOC_VAR,
            iloc = row_iloc,
        );
        for (j, col) in visible.columns().iter().enumerate() {
            let raw = visible.cell_text(i, col)?;
            let key = CellKey {
                row: row_iloc,
                col: col.iloc,
            };
            let _ = write!(
                html,
                "<td class=\"{data} {rowp}{i} {colp}{j}\">{value}</td>",
                data = css::DATA,
                rowp = css::ROW_PREFIX,
                colp = css::COL_PREFIX,
                value = chain.cell(key, &raw),
            );
        }
        let _ = write!(html, "</tr>");
    }

    // Marker row when the window stops short of the transformed table.
    if window.end() < frame.height() {
        let _ = write!(html, "<tr class=\"{}\">", css::ROW_TRIM);
        let _ = write!(
            html,
            "<th class=\"{} {}\">...</th>",
            css::ROW_HEAD,
            css::ROW_TRIM
        );
        for (j, _) in visible.columns().iter().enumerate() {
            let _ = write!(
                html,
                "<td class=\"{data} {trim} {colp}{j}\">...</td>",
                data = css::DATA,
                trim = css::ROW_TRIM,
                colp = css::COL_PREFIX,
            );
        }
        let _ = write!(html, "</tr>");
    }
    let _ = write!(html, "</tbody></table>");

    Ok(html)
}
