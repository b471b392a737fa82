//! Table reconstruction.
//!
//! Each `<table>` becomes a [`Table`] with a header row, data rows, optional
//! header -> cell mappings and a pipe-delimited text rendering. Rows belong to
//! the nearest enclosing table only, so nested tables never leak rows into
//! their parent.

use indexmap::IndexMap;

use crate::dom::{self, Document, NodeRef};
use crate::error::Result;
use crate::patterns::{LINE_BREAK_SELECTOR, ROW_SELECTOR, TABLE_SELECTOR};
use crate::result::Table;
use crate::text::single_line;

pub(super) fn tables_from(doc: &Document) -> Result<Vec<Table>> {
    // `<td>Rohit<br>Sharma</td>` should read "Rohit Sharma", not "RohitSharma".
    dom::replace_matching(doc, LINE_BREAK_SELECTOR, " ")?;

    let mut tables = Vec::new();

    for (index, table) in dom::query_all(doc, TABLE_SELECTOR)?.iter().enumerate() {
        if let Some(parsed) = parse_table(index, table)? {
            tables.push(parsed);
        }
    }

    Ok(tables)
}

/// Build one table; `None` when it has neither headers nor non-blank rows.
fn parse_table(index: usize, table: &NodeRef) -> Result<Option<Table>> {
    let caption = dom::element_children(table)
        .into_iter()
        .find(|child| dom::tag_name(child).as_deref() == Some("caption"))
        .map(|caption| single_line(&dom::text_content(&caption)))
        .unwrap_or_default();

    let rows = own_rows(table)?;
    let header_row = rows
        .iter()
        .find(|row| dom::parent_tag(row).as_deref() == Some("thead"))
        .or_else(|| rows.first())
        .copied();

    let headers = header_row
        .as_ref()
        .map(row_cells)
        .filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .unwrap_or_default();

    let not_header = |row: &&NodeRef| header_row.as_ref().is_none_or(|h| !dom::same_node(row, h));
    let body_rows: Vec<&NodeRef> = rows
        .iter()
        .filter(|row| dom::parent_tag(row).as_deref() == Some("tbody"))
        .filter(not_header)
        .collect();
    let data_rows: Vec<&NodeRef> = if body_rows.is_empty() {
        rows.iter().filter(not_header).collect()
    } else {
        body_rows
    };

    let rows: Vec<Vec<String>> = data_rows
        .into_iter()
        .map(row_cells)
        .filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .collect();

    if headers.is_empty() && rows.is_empty() {
        return Ok(None);
    }

    Ok(Some(build_table(index, caption, headers, rows)))
}

/// Assemble a table from already-extracted cell text.
pub(super) fn build_table(
    index: usize,
    caption: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> Table {
    let column_count = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0);

    let structured_rows = (!headers.is_empty() && !rows.is_empty()).then(|| {
        rows.iter()
            .map(|row| {
                let mut mapped = IndexMap::with_capacity(headers.len());
                for (i, header) in headers.iter().enumerate() {
                    mapped.insert(header.clone(), row.get(i).cloned().unwrap_or_default());
                }
                mapped
            })
            .collect()
    });

    let mut table = Table {
        index,
        caption,
        row_count: rows.len(),
        column_count,
        headers,
        rows,
        structured_rows,
        text_representation: String::new(),
    };
    table.text_representation = table_to_text(&table);
    table
}

/// Pipe-delimited rendering: caption line, header line, separator, rows.
#[must_use]
pub fn table_to_text(table: &Table) -> String {
    let mut text = String::new();

    if !table.caption.is_empty() {
        text.push_str("Table: ");
        text.push_str(&table.caption);
        text.push_str("\n\n");
    }

    if !table.headers.is_empty() {
        text.push_str(&table.headers.join(" | "));
        text.push('\n');
        text.push_str(&vec!["---"; table.headers.len()].join(" | "));
        text.push('\n');
    }

    for row in &table.rows {
        text.push_str(&row.join(" | "));
        text.push('\n');
    }

    text.trim().to_string()
}

/// Rows whose nearest enclosing table is `table`.
fn own_rows<'a>(table: &NodeRef<'a>) -> Result<Vec<NodeRef<'a>>> {
    Ok(dom::query_within(table, ROW_SELECTOR)?
        .into_iter()
        .filter(|row| {
            dom::closest_ancestor(row, "table").is_some_and(|owner| dom::same_node(&owner, table))
        })
        .collect())
}

fn row_cells(row: &NodeRef) -> Vec<String> {
    dom::element_children(row)
        .iter()
        .filter(|cell| matches!(dom::tag_name(cell).as_deref(), Some("td" | "th")))
        .map(|cell| single_line(&dom::text_content(cell)))
        .collect()
}
