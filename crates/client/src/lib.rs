//! # Donation Admin Client
//!
//! HTTP access to the donation backend.
//!
//! - **HTTP**: [`ApiClient`], a `reqwest` wrapper that attaches the session token
//! - **API**: [`AuthApi`], [`UserApi`] and [`DonationApi`], one trait per resource
//! - **Session**: [`SessionHandle`] over a pluggable [`SessionStore`]
//! - **Errors**: [`ClientError`], normalized backend and transport failures

pub mod api;
pub mod error;
pub mod http;
pub mod session;

pub use api::{AuthApi, DonationApi, UserApi};
pub use error::{ClientError, ClientResult, extract_message};
pub use http::{ApiClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use session::{FileSessionStore, MemorySessionStore, SessionHandle, SessionStore};
