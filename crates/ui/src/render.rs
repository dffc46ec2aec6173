//! Plain-text rendering of tables, cards and pages

use crate::navigation::NavGroup;
use crate::reports::SummaryCard;
use crate::table::{Column, RowAction, SortDirection, TableView, format_amount};
use std::fmt::Write;

/// Render rows as an aligned text grid with a header rule
pub fn render_grid(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let rules: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut out = String::new();
    out.push_str(&pad_line(headers.iter().copied(), &widths));
    out.push_str(&pad_line(rules.iter().map(String::as_str), &widths));
    for row in rows {
        out.push_str(&pad_line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn pad_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut line = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string();
    line.push('\n');
    line
}

/// Render every row against a set of columns, without paging
pub fn render_rows<R>(columns: &[Column<R>], rows: &[R]) -> String {
    let headers: Vec<&str> = columns.iter().map(|c| c.header).collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|c| c.render(row)).collect())
        .collect();
    render_grid(&headers, &cells)
}

fn sort_marker(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "^",
        SortDirection::Descending => "v",
    }
}

/// Render the current page of a list with its paging footer
pub fn render_table_page<R>(title: &str, table: &TableView<R>) -> String {
    let sorted = table.sort();
    let mut headers: Vec<String> = vec!["Sl.".to_string()];
    headers.extend(table.columns().iter().map(|c| match sorted {
        Some((key, direction)) if key == c.key => format!("{} {}", c.header, sort_marker(direction)),
        _ => c.header.to_string(),
    }));
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();

    let offset = table.page_index() * table.page_size().value();
    let rows: Vec<Vec<String>> = table
        .page_rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let mut cells = vec![(offset + i + 1).to_string()];
            cells.extend(table.render_row(row));
            cells
        })
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    if !table.filter().is_empty() {
        let _ = writeln!(out, "Filter: \"{}\"", table.filter());
    }
    out.push('\n');
    if rows.is_empty() {
        out.push_str("No records found.\n");
    } else {
        out.push_str(&render_grid(&header_refs, &rows));
    }
    out.push('\n');
    let _ = writeln!(
        out,
        "{}  ({} of {} rows, {} per page)  [{}] [{}]",
        table.page_label(),
        table.filtered_count(),
        table.rows().len(),
        table.page_size(),
        if table.can_previous() { "Previous" } else { "-" },
        if table.can_next() { "Next" } else { "-" },
    );
    let actions: Vec<&str> = [RowAction::Edit, RowAction::Delete]
        .iter()
        .map(RowAction::label)
        .collect();
    let _ = writeln!(out, "Row actions: {}", actions.join(", "));
    out
}

/// Render the Total / Active / Deleted cards side by side
pub fn render_cards(cards: &[SummaryCard]) -> String {
    let headers: Vec<&str> = std::iter::once("")
        .chain(cards.iter().map(|c| c.title))
        .collect();
    let amounts: Vec<String> = std::iter::once("Amount".to_string())
        .chain(cards.iter().map(|c| format_amount(c.amount)))
        .collect();
    let counts: Vec<String> = std::iter::once("Count".to_string())
        .chain(cards.iter().map(|c| c.count.to_string()))
        .collect();
    render_grid(&headers, &[amounts, counts])
}

/// Render key/value pairs of a single record
pub fn render_record(fields: &[(&str, String)]) -> String {
    let width = fields.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    fields
        .iter()
        .map(|(key, value)| format!("{:<width$}  {}\n", key, value, width = width))
        .collect()
}

/// Render sidebar groups with the command that opens each page
pub fn render_nav(groups: &[NavGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "{}", group.label);
        for page in &group.pages {
            let _ = writeln!(out, "  {:<18} {}", page.display_name(), page.command());
        }
    }
    out
}
