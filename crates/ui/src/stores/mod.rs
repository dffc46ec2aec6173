//! Entity containers wired to the backend traits

pub mod auth;
pub mod donations;
pub mod users;

pub use auth::{AuthState, AuthStore};
pub use donations::{DonationState, DonationStore};
pub use users::UserStore;
