//! In-memory backend for container and form tests

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{NaiveDate, Utc};
use donation_client::{AuthApi, ClientError, ClientResult, DonationApi, UserApi};
use donation_core::{
    Contributor, DailyReport, DateRange, DateRangeReport, Donation, DonationId, DonationPayload,
    DonationSummary, LoginProfile, LoginRequest, LoginResponse, MonthlySummary, NewUser, Role,
    User, UserId, UserUpdate,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub(crate) const PASSWORD: &str = "secret";

pub(crate) fn user(id: i64, username: &str) -> User {
    let mut name = username.to_string();
    if let Some(first) = name.get_mut(..1) {
        first.make_ascii_uppercase();
    }
    User {
        id: UserId::new(id),
        username: username.to_string(),
        name,
        email: format!("{}@example.com", username),
        role: Role::User,
    }
}

pub(crate) fn donation(id: i64, amount: f64, description: &str) -> Donation {
    Donation {
        id: DonationId::new(id),
        amount,
        description: description.to_string(),
        user: Contributor::new(UserId::new(2), "Amy"),
    }
}

pub(crate) fn jwt(exp_offset_secs: i64) -> String {
    let exp = Utc::now().timestamp() + exp_offset_secs;
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"amy","exp":{}}}"#, exp))
    )
}

type GatedList = (Vec<Donation>, oneshot::Receiver<()>);

/// Backend double that records calls and can fail or delay them
pub(crate) struct FakeBackend {
    users: Mutex<Vec<User>>,
    donations: Mutex<Vec<Donation>>,
    next_id: AtomicI64,
    failure: Mutex<Option<(u16, String)>>,
    calls: Mutex<Vec<String>>,
    gated_lists: Mutex<VecDeque<GatedList>>,
    admin: bool,
}

impl FakeBackend {
    fn build(users: Vec<User>, donations: Vec<Donation>, admin: bool) -> Arc<Self> {
        Arc::new(Self {
            users: Mutex::new(users),
            donations: Mutex::new(donations),
            next_id: AtomicI64::new(100),
            failure: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            gated_lists: Mutex::new(VecDeque::new()),
            admin,
        })
    }

    pub(crate) fn with_users(users: Vec<User>) -> Arc<Self> {
        Self::build(users, Vec::new(), false)
    }

    pub(crate) fn with_donations(donations: Vec<Donation>) -> Arc<Self> {
        Self::build(Vec::new(), donations, false)
    }

    /// Login succeeds with the admin flag set
    pub(crate) fn admin() -> Arc<Self> {
        Self::build(Vec::new(), Vec::new(), true)
    }

    /// Make the next call fail with this status and body
    pub(crate) fn fail_next(&self, status: u16, body: &str) {
        *self.failure.lock().unwrap() = Some((status, body.to_string()));
    }

    /// Queue a donation list response that is held until the sender fires
    pub(crate) fn gate_donation_list(&self, response: Vec<Donation>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gated_lists.lock().unwrap().push_back((response, rx));
        tx
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) -> ClientResult<()> {
        self.calls.lock().unwrap().push(call.into());
        match self.failure.lock().unwrap().take() {
            Some((status, body)) => Err(ClientError::from_body(status, &body)),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn not_found(entity: &str) -> ClientError {
        ClientError::from_body(404, &format!(r#"{{"message":"{} not found"}}"#, entity))
    }
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn login(&self, credentials: &LoginRequest) -> ClientResult<LoginResponse> {
        self.record("POST /auth/login")?;
        if credentials.password != PASSWORD {
            return Err(ClientError::from_body(401, r#"{"message":"Invalid credentials"}"#));
        }
        Ok(LoginResponse {
            token: jwt(3600),
            is_admin: self.admin,
            data: LoginProfile {
                id: UserId::new(2),
                username: credentials.username.clone(),
                name: "Amy".to_string(),
                email: Some("amy@example.com".to_string()),
                role: if self.admin { Role::Admin } else { Role::User },
            },
            status: None,
            message: Some("Login successful".to_string()),
        })
    }
}

#[async_trait]
impl UserApi for FakeBackend {
    async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.record("GET /users")?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn get_user(&self, id: UserId) -> ClientResult<User> {
        self.record(format!("GET /users/{}", id))?;
        let users = self.users.lock().unwrap();
        users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("User"))
    }

    async fn create_user(&self, new_user: &NewUser) -> ClientResult<User> {
        self.record("POST /users")?;
        let created = User {
            id: UserId::new(self.next_id()),
            username: new_user.username.clone(),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            role: new_user.role,
        };
        self.users.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn register_user(&self, new_user: &NewUser) -> ClientResult<Option<User>> {
        self.record("POST /auth/register")?;
        let created = User {
            id: UserId::new(self.next_id()),
            username: new_user.username.clone(),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            role: new_user.role,
        };
        self.users.lock().unwrap().push(created.clone());
        Ok(Some(created))
    }

    async fn update_user(&self, id: UserId, update: &UserUpdate) -> ClientResult<User> {
        self.record(format!("PUT /users/{}", id))?;
        let mut users = self.users.lock().unwrap();
        let existing = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Self::not_found("User"))?;
        existing.name = update.name.clone();
        existing.username = update.username.clone();
        existing.email = update.email.clone();
        existing.role = update.role;
        Ok(existing.clone())
    }

    async fn delete_user(&self, id: UserId) -> ClientResult<()> {
        self.record(format!("DELETE /users/{}", id))?;
        self.users.lock().unwrap().retain(|u| u.id != id);
        Ok(())
    }
}

#[async_trait]
impl DonationApi for FakeBackend {
    async fn list_donations(&self) -> ClientResult<Vec<Donation>> {
        self.record("GET /donations")?;
        let gated = self.gated_lists.lock().unwrap().pop_front();
        match gated {
            Some((response, gate)) => {
                let _ = gate.await;
                Ok(response)
            }
            None => Ok(self.donations.lock().unwrap().clone()),
        }
    }

    async fn get_donation(&self, id: DonationId) -> ClientResult<Donation> {
        self.record(format!("GET /donations/{}", id))?;
        let donations = self.donations.lock().unwrap();
        donations
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("Donation"))
    }

    async fn create_donation(&self, payload: &DonationPayload) -> ClientResult<Donation> {
        self.record("POST /donations")?;
        let created = Donation {
            id: DonationId::new(self.next_id()),
            amount: payload.amount,
            description: payload.description.clone(),
            user: payload.user.clone(),
        };
        self.donations.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_donation(
        &self,
        id: DonationId,
        payload: &DonationPayload,
    ) -> ClientResult<Donation> {
        self.record(format!("PUT /donations/{}", id))?;
        let updated = Donation {
            id,
            amount: payload.amount,
            description: payload.description.clone(),
            user: payload.user.clone(),
        };
        let mut donations = self.donations.lock().unwrap();
        if let Some(existing) = donations.iter_mut().find(|d| d.id == id) {
            *existing = updated.clone();
        }
        Ok(updated)
    }

    async fn delete_donation(&self, id: DonationId) -> ClientResult<()> {
        self.record(format!("DELETE /donations/{}", id))?;
        self.donations.lock().unwrap().retain(|d| d.id != id);
        Ok(())
    }

    async fn donation_summary(&self) -> ClientResult<DonationSummary> {
        self.record("GET /donations/summary/report")?;
        let donations = self.donations.lock().unwrap();
        let total: f64 = donations.iter().map(|d| d.amount).sum();
        Ok(DonationSummary {
            total_amount: total,
            total_count: donations.len() as u64,
            active_amount: total,
            active_count: donations.len() as u64,
            deleted_amount: 0.0,
            deleted_count: 0,
        })
    }

    async fn monthly_summary(&self) -> ClientResult<Vec<MonthlySummary>> {
        self.record("GET /donations/summary/monthly")?;
        Ok(vec![MonthlySummary {
            month: 3,
            year: 2024,
            month_name: "March".to_string(),
            total_amount: 150.0,
            count: 3,
        }])
    }

    async fn date_range_report(&self, range: &DateRange) -> ClientResult<DateRangeReport> {
        self.record(format!(
            "GET /donations/summary/date-range?startDate={}&endDate={}",
            range.start, range.end
        ))?;
        let day = |date: NaiveDate| DailyReport {
            date,
            total_amount: 150.0,
            total_count: 3,
            active_amount: 100.0,
            active_count: 2,
            deleted_amount: 50.0,
            deleted_count: 1,
        };
        Ok(DateRangeReport {
            total_amount: 150.0,
            total_count: 3,
            active_amount: 100.0,
            active_count: 2,
            deleted_amount: 50.0,
            deleted_count: 1,
            daily_reports: vec![day(range.start)],
        })
    }
}
