//! Subcommand handlers

pub mod auth;
pub mod donations;
pub mod reports;
pub mod users;

use crate::ListOptions;
use crate::output::{confirm, print_form_errors};
use donation_core::AdminResult;
use donation_ui::{PageSize, RowAction, SortDirection, SubmitOutcome, TableView};

/// Apply command-line filter, sort and paging to a loaded table
pub(crate) fn apply_list_options<R>(
    table: &mut TableView<R>,
    options: &ListOptions,
) -> AdminResult<()> {
    if let Some(page_size) = options.page_size {
        table.set_page_size(page_size);
    }
    if let Some(filter) = &options.filter {
        table.set_filter(filter.as_str());
    }
    if let Some(key) = &options.sort {
        let direction = if options.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        table.set_sort(key, direction)?;
    }
    table.goto_page(options.page);
    Ok(())
}

/// Page size from the flag, falling back to the configured one
pub(crate) fn page_size(
    options: &ListOptions,
    configured: AdminResult<PageSize>,
) -> AdminResult<PageSize> {
    match options.page_size {
        Some(size) => Ok(size),
        None => configured,
    }
}

/// Ask before a delete row action unless `--yes` was given
pub(crate) fn confirm_delete(entity: &str, yes: bool) -> AdminResult<bool> {
    if yes || !RowAction::Delete.requires_confirmation() {
        return Ok(true);
    }
    confirm(&format!("Are you sure you want to delete this {}?", entity))
}

/// Turn a form submission into the command result
pub(crate) fn finish_submit<T>(outcome: SubmitOutcome<T>) -> anyhow::Result<T> {
    match outcome {
        SubmitOutcome::Saved { value, .. } => Ok(value),
        SubmitOutcome::Invalid(errors) => {
            print_form_errors(&errors);
            Err(donation_core::AdminError::from(errors).into())
        }
        SubmitOutcome::Rejected(err) => Err(err.into()),
    }
}
