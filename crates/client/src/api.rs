//! Backend endpoints
//!
//! Each resource is a trait so the state containers can run against a fake
//! backend in tests. [`ApiClient`] is the HTTP implementation.

use crate::error::ClientResult;
use crate::http::ApiClient;
use async_trait::async_trait;
use donation_core::{
    DateRange, DateRangeReport, Donation, DonationId, DonationPayload, DonationSummary,
    LoginRequest, LoginResponse, MonthlySummary, NewUser, User, UserId, UserUpdate,
};
use serde::Deserialize;

// ===== Paths =====

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const USERS_PATH: &str = "/users";
pub const DONATIONS_PATH: &str = "/donations";
pub const SUMMARY_PATH: &str = "/donations/summary/report";
pub const MONTHLY_SUMMARY_PATH: &str = "/donations/summary/monthly";
pub const DATE_RANGE_PATH: &str = "/donations/summary/date-range";

fn user_path(id: UserId) -> String {
    format!("{}/{}", USERS_PATH, id)
}

fn donation_path(id: DonationId) -> String {
    format!("{}/{}", DONATIONS_PATH, id)
}

// ===== Traits =====

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> ClientResult<LoginResponse>;
}

#[async_trait]
pub trait UserApi: Send + Sync {
    async fn list_users(&self) -> ClientResult<Vec<User>>;

    async fn get_user(&self, id: UserId) -> ClientResult<User>;

    async fn create_user(&self, user: &NewUser) -> ClientResult<User>;

    /// Register through the auth endpoint. The backend does not always echo
    /// the created account back.
    async fn register_user(&self, user: &NewUser) -> ClientResult<Option<User>>;

    async fn update_user(&self, id: UserId, update: &UserUpdate) -> ClientResult<User>;

    async fn delete_user(&self, id: UserId) -> ClientResult<()>;
}

#[async_trait]
pub trait DonationApi: Send + Sync {
    async fn list_donations(&self) -> ClientResult<Vec<Donation>>;

    async fn get_donation(&self, id: DonationId) -> ClientResult<Donation>;

    async fn create_donation(&self, payload: &DonationPayload) -> ClientResult<Donation>;

    async fn update_donation(
        &self,
        id: DonationId,
        payload: &DonationPayload,
    ) -> ClientResult<Donation>;

    async fn delete_donation(&self, id: DonationId) -> ClientResult<()>;

    async fn donation_summary(&self) -> ClientResult<DonationSummary>;

    async fn monthly_summary(&self) -> ClientResult<Vec<MonthlySummary>>;

    async fn date_range_report(&self, range: &DateRange) -> ClientResult<DateRangeReport>;
}

/// Shapes seen in registration responses
#[derive(Deserialize)]
#[serde(untagged)]
enum RegisterResponse {
    Direct(User),
    Wrapped { user: User },
    Data { data: User },
    Other(serde_json::Value),
}

impl RegisterResponse {
    fn into_user(self) -> Option<User> {
        match self {
            Self::Direct(user) | Self::Wrapped { user } | Self::Data { data: user } => Some(user),
            Self::Other(_) => None,
        }
    }
}

// ===== HTTP implementation =====

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &LoginRequest) -> ClientResult<LoginResponse> {
        self.post_anonymous(LOGIN_PATH, credentials).await
    }
}

#[async_trait]
impl UserApi for ApiClient {
    async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.get(USERS_PATH).await
    }

    async fn get_user(&self, id: UserId) -> ClientResult<User> {
        self.get(&user_path(id)).await
    }

    async fn create_user(&self, user: &NewUser) -> ClientResult<User> {
        self.post(USERS_PATH, user).await
    }

    async fn register_user(&self, user: &NewUser) -> ClientResult<Option<User>> {
        let response: RegisterResponse = self.post(REGISTER_PATH, user).await?;
        Ok(response.into_user())
    }

    async fn update_user(&self, id: UserId, update: &UserUpdate) -> ClientResult<User> {
        self.put_multipart(&user_path(id), update.form_fields()).await
    }

    async fn delete_user(&self, id: UserId) -> ClientResult<()> {
        self.delete(&user_path(id)).await
    }
}

#[async_trait]
impl DonationApi for ApiClient {
    async fn list_donations(&self) -> ClientResult<Vec<Donation>> {
        self.get(DONATIONS_PATH).await
    }

    async fn get_donation(&self, id: DonationId) -> ClientResult<Donation> {
        self.get(&donation_path(id)).await
    }

    async fn create_donation(&self, payload: &DonationPayload) -> ClientResult<Donation> {
        self.post(DONATIONS_PATH, payload).await
    }

    async fn update_donation(
        &self,
        id: DonationId,
        payload: &DonationPayload,
    ) -> ClientResult<Donation> {
        self.put(&donation_path(id), payload).await
    }

    async fn delete_donation(&self, id: DonationId) -> ClientResult<()> {
        self.delete(&donation_path(id)).await
    }

    async fn donation_summary(&self) -> ClientResult<DonationSummary> {
        self.get(SUMMARY_PATH).await
    }

    async fn monthly_summary(&self) -> ClientResult<Vec<MonthlySummary>> {
        self.get(MONTHLY_SUMMARY_PATH).await
    }

    async fn date_range_report(&self, range: &DateRange) -> ClientResult<DateRangeReport> {
        self.get_query(DATE_RANGE_PATH, &range.query()).await
    }
}
