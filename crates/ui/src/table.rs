//! # Table View
//!
//! Client-side filtering, sorting and paging over a cached collection.
//!
//! ## Behaviour
//!
//! - The global filter matches the rendered text of every column, ignoring
//!   case. Changing it returns to the first page.
//! - Toggling a column cycles none, ascending, descending, none. Toggling a
//!   different column starts it at ascending.
//! - Numbers compare numerically and text ignores case. Empty cells always
//!   sort last.
//! - Changing the page size keeps the first visible row on screen, and the
//!   page index is clamped whenever the rows shrink.

use donation_core::{AdminError, AdminResult, Donation, User};
use std::cmp::Ordering;
use std::fmt;

// ============================================================================
// Cells and Columns
// ============================================================================

/// Typed value of one cell, used for sorting
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Text cell; blank text is treated as empty
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Ordering between two non-empty cells
    fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (CellValue::Number(_), CellValue::Text(_)) => Ordering::Less,
            (CellValue::Text(_), CellValue::Number(_)) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::text(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::text(value)
    }
}

type Accessor<R> = Box<dyn Fn(&R) -> CellValue + Send + Sync>;
type Renderer = Box<dyn Fn(&CellValue) -> String + Send + Sync>;

/// One table column
pub struct Column<R> {
    pub key: &'static str,
    pub header: &'static str,
    accessor: Accessor<R>,
    renderer: Option<Renderer>,
}

impl<R> Column<R> {
    pub fn new(
        key: &'static str,
        header: &'static str,
        accessor: impl Fn(&R) -> CellValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            key,
            header,
            accessor: Box::new(accessor),
            renderer: None,
        }
    }

    /// Render cells with a custom formatter instead of `Display`
    pub fn with_renderer(
        mut self,
        renderer: impl Fn(&CellValue) -> String + Send + Sync + 'static,
    ) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn value(&self, row: &R) -> CellValue {
        (self.accessor)(row)
    }

    pub fn render(&self, row: &R) -> String {
        let value = self.value(row);
        match &self.renderer {
            Some(renderer) => renderer(&value),
            None => value.to_string(),
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .finish()
    }
}

// ============================================================================
// Sorting and Paging
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Rows per page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    Five,
    Ten,
    Twenty,
}

impl PageSize {
    pub fn all() -> &'static [PageSize] {
        &[PageSize::Five, PageSize::Ten, PageSize::Twenty]
    }

    pub fn value(&self) -> usize {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = AdminError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            5 => Ok(PageSize::Five),
            10 => Ok(PageSize::Ten),
            20 => Ok(PageSize::Twenty),
            other => Err(AdminError::validation(format!(
                "Page size must be 5, 10 or 20 (got {})",
                other
            ))),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Per-row actions offered by list pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Delete,
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            RowAction::Edit => "Edit",
            RowAction::Delete => "Delete",
        }
    }

    /// Delete is only dispatched after the operator confirms
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, RowAction::Delete)
    }
}

// ============================================================================
// Table View
// ============================================================================

/// Filter, sort and page state over a set of rows
#[derive(Debug)]
pub struct TableView<R> {
    rows: Vec<R>,
    columns: Vec<Column<R>>,
    filter: String,
    sort: Option<(usize, SortDirection)>,
    page_index: usize,
    page_size: PageSize,
}

impl<R> TableView<R> {
    pub fn new(columns: Vec<Column<R>>, page_size: PageSize) -> Self {
        Self {
            rows: Vec::new(),
            columns,
            filter: String::new(),
            sort: None,
            page_index: 0,
            page_size,
        }
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Replace the rows, keeping filter and sort
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.clamp_page();
    }

    // ===== Filter =====

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.page_index = 0;
    }

    fn matches(&self, row: &R) -> bool {
        let needle = self.filter.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.columns
            .iter()
            .any(|column| column.render(row).to_lowercase().contains(&needle))
    }

    // ===== Sort =====

    fn column_index(&self, key: &str) -> AdminResult<usize> {
        self.columns
            .iter()
            .position(|c| c.key.eq_ignore_ascii_case(key))
            .ok_or_else(|| {
                let keys: Vec<&str> = self.columns.iter().map(|c| c.key).collect();
                AdminError::validation(format!(
                    "Unknown column '{}' (expected one of: {})",
                    key,
                    keys.join(", ")
                ))
            })
    }

    /// Advance the sort cycle for a column and return its new direction
    pub fn toggle_sort(&mut self, key: &str) -> AdminResult<Option<SortDirection>> {
        let index = self.column_index(key)?;
        self.sort = match self.sort {
            Some((current, SortDirection::Ascending)) if current == index => {
                Some((index, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == index => None,
            _ => Some((index, SortDirection::Ascending)),
        };
        Ok(self.sort.map(|(_, direction)| direction))
    }

    /// Set the sort directly
    pub fn set_sort(&mut self, key: &str, direction: SortDirection) -> AdminResult<()> {
        self.sort = Some((self.column_index(key)?, direction));
        Ok(())
    }

    /// Sorted column key and direction
    pub fn sort(&self) -> Option<(&'static str, SortDirection)> {
        self.sort
            .map(|(index, direction)| (self.columns[index].key, direction))
    }

    // ===== Derived rows =====

    /// Filtered and sorted rows across all pages
    pub fn visible_rows(&self) -> Vec<&R> {
        let mut rows: Vec<&R> = self.rows.iter().filter(|row| self.matches(row)).collect();

        if let Some((index, direction)) = self.sort {
            let column = &self.columns[index];
            let mut keyed: Vec<(CellValue, &R)> =
                rows.into_iter().map(|row| (column.value(row), row)).collect();
            keyed.sort_by(|(a, _), (b, _)| match (a.is_empty(), b.is_empty()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => match direction {
                    SortDirection::Ascending => a.compare(b),
                    SortDirection::Descending => b.compare(a),
                },
            });
            rows = keyed.into_iter().map(|(_, row)| row).collect();
        }

        rows
    }

    pub fn filtered_count(&self) -> usize {
        self.rows.iter().filter(|row| self.matches(row)).count()
    }

    /// Rows on the current page
    pub fn page_rows(&self) -> Vec<&R> {
        let size = self.page_size.value();
        self.visible_rows()
            .into_iter()
            .skip(self.page_index * size)
            .take(size)
            .collect()
    }

    // ===== Paging =====

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Change the page size, keeping the first visible row on screen
    pub fn set_page_size(&mut self, page_size: PageSize) {
        let first_row = self.page_index * self.page_size.value();
        self.page_size = page_size;
        self.page_index = first_row / page_size.value();
        self.clamp_page();
    }

    /// Number of pages, at least one
    pub fn page_count(&self) -> usize {
        self.filtered_count().div_ceil(self.page_size.value()).max(1)
    }

    /// Zero-based page index
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// One-based page number
    pub fn page_number(&self) -> usize {
        self.page_index + 1
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    pub fn next_page(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.page_index += 1;
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.can_previous() {
            return false;
        }
        self.page_index -= 1;
        true
    }

    /// Jump to a one-based page number, clamped to the available pages
    pub fn goto_page(&mut self, page_number: usize) {
        self.page_index = page_number.saturating_sub(1);
        self.clamp_page();
    }

    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page_number(), self.page_count())
    }

    fn clamp_page(&mut self) {
        let last = self.page_count() - 1;
        if self.page_index > last {
            self.page_index = last;
        }
    }

    /// Rendered cells of a row, in column order
    pub fn render_row(&self, row: &R) -> Vec<String> {
        self.columns.iter().map(|column| column.render(row)).collect()
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|column| column.header).collect()
    }
}

// ============================================================================
// Entity Tables
// ============================================================================

/// Amounts are shown with two decimals
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

fn render_amount(value: &CellValue) -> String {
    match value {
        CellValue::Number(n) => format_amount(*n),
        other => other.to_string(),
    }
}

/// Columns of the user list
pub fn user_columns() -> Vec<Column<User>> {
    vec![
        Column::new("id", "ID", |u: &User| CellValue::from(u.id.value())),
        Column::new("name", "Name", |u: &User| CellValue::from(u.name.as_str())),
        Column::new("username", "Username", |u: &User| {
            CellValue::from(u.username.as_str())
        }),
        Column::new("email", "Email", |u: &User| CellValue::from(u.email.as_str())),
        Column::new("role", "Role", |u: &User| CellValue::from(u.role.as_str())),
    ]
}

/// Columns of the donation list
pub fn donation_columns() -> Vec<Column<Donation>> {
    vec![
        Column::new("id", "ID", |d: &Donation| CellValue::from(d.id.value())),
        Column::new("amount", "Amount", |d: &Donation| CellValue::from(d.amount))
            .with_renderer(render_amount),
        Column::new("description", "Description", |d: &Donation| {
            CellValue::from(d.description.as_str())
        }),
        Column::new("donated_by", "Donated By", |d: &Donation| {
            CellValue::from(d.user.display_name())
        }),
    ]
}

pub fn user_table(page_size: PageSize) -> TableView<User> {
    TableView::new(user_columns(), page_size)
}

pub fn donation_table(page_size: PageSize) -> TableView<Donation> {
    TableView::new(donation_columns(), page_size)
}

// ============================================================================
// Tests
// ============================================================================
