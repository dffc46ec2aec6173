//! # Donation Admin Core
//!
//! Core types, traits, and error handling for the donation admin client.
//!
//! This crate provides the foundational building blocks used by the client,
//! state and CLI crates, including:
//!
//! - **Types**: Entity identities and roles
//! - **Models**: Users, donations, reports and login payloads
//! - **Session**: The persisted login and token expiry derivation
//! - **Traits**: `Validatable` and `Identified`
//! - **Errors**: Unified error handling with `AdminError` and `AdminResult`
//!

pub mod error;
pub mod models;
pub mod session;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{AdminError, AdminResult, GENERIC_ERROR_MESSAGE, ResultExt};
pub use models::{
    Contributor, DailyReport, DateRange, DateRangeReport, Donation, DonationPayload,
    DonationSummary, LoginProfile, LoginRequest, LoginResponse, MonthlySummary, NewUser, User,
    UserUpdate,
};
pub use session::{AuthUser, Session, token_expiry};
pub use traits::{Identified, Validatable};
pub use types::{DonationId, Role, UserId};
