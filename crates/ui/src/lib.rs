//! # Donation Admin UI
//!
//! View-models for the donation admin client.
//!
//! This crate holds everything a front-end needs between the HTTP client and
//! the screen, independent of how the screen is drawn.
//!
//! ## Features
//!
//! - Entity containers with request fencing (`UserStore`, `DonationStore`, `AuthStore`)
//! - Filter / sort / paging table view-model
//! - Create and edit forms with full-form validation
//! - Role capabilities and sidebar navigation
//! - Report cards and plain-text renderers
//!

// ============================================================================
// Modules
// ============================================================================

pub mod forms;
pub mod navigation;
pub mod notify;
pub mod render;
pub mod reports;
pub mod state;
pub mod stores;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use forms::{
    DonationForm, DonationFormMode, FieldError, FormErrors, SubmitOutcome, UserForm, UserFormMode,
    is_valid_email,
};
pub use navigation::{Capability, CapabilitySet, NavGroup, Page, nav_groups};
pub use notify::{Notification, NotificationLevel, NotificationLog, Notifier};
pub use reports::{DateRangeInput, SummaryCard, daily_columns, monthly_columns, summary_cards};
pub use state::{Container, EntityState, Slot, Snapshot, Status, Ticket};
pub use stores::{AuthState, AuthStore, DonationState, DonationStore, UserStore};
pub use table::{
    CellValue, Column, PageSize, RowAction, SortDirection, TableView, donation_table,
    format_amount, user_table,
};
