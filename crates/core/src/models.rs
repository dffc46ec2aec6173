//! Backend records mirrored by the client
//!
//! Field names follow the backend's camelCase JSON. Payload types are
//! separate from the records they create so a request can never carry a
//! client-invented id.

use crate::error::{AdminError, AdminResult};
use crate::traits::{Identified, Validatable};
use crate::types::{DonationId, Role, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Users
// ============================================================================

/// A user account as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl Identified for User {
    type Id = UserId;
    const KIND: &'static str = "User";

    fn id(&self) -> UserId {
        self.id
    }
}

/// Registration / creation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Validatable for NewUser {
    fn validate(&self) -> AdminResult<()> {
        require("user", "username", &self.username)?;
        require("user", "name", &self.name)?;
        require("user", "email", &self.email)?;
        require("user", "password", &self.password)
    }
}

/// Editable subset of a user, sent as multipart form fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl UserUpdate {
    /// Prefill an update from the current record
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }

    /// Field name / value pairs in the order the backend expects them
    pub fn form_fields(&self) -> [(&'static str, String); 4] {
        [
            ("name", self.name.clone()),
            ("username", self.username.clone()),
            ("email", self.email.clone()),
            ("role", self.role.as_str().to_string()),
        ]
    }
}

impl Validatable for UserUpdate {
    fn validate(&self) -> AdminResult<()> {
        require("user", "username", &self.username)?;
        require("user", "name", &self.name)?;
        require("user", "email", &self.email)
    }
}

// ============================================================================
// Donations
// ============================================================================

/// The user a donation is attributed to, denormalized at creation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Contributor {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            username: None,
        }
    }

    /// Name shown in the "Donated By" column
    pub fn display_name(&self) -> &str {
        match &self.username {
            Some(username) if !username.is_empty() => username,
            _ => &self.name,
        }
    }
}

/// A donation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: DonationId,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    pub user: Contributor,
}

impl Identified for Donation {
    type Id = DonationId;
    const KIND: &'static str = "Donation";

    fn id(&self) -> DonationId {
        self.id
    }
}

/// Create / full-replace payload for a donation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationPayload {
    pub amount: f64,
    pub description: String,
    pub user: Contributor,
}

impl Validatable for DonationPayload {
    fn validate(&self) -> AdminResult<()> {
        if !self.amount.is_finite() {
            return Err(AdminError::field_validation(
                "donation",
                "amount",
                "Amount must be a number",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Reports
// ============================================================================

/// Overall totals partitioned into total / active / deleted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationSummary {
    pub total_amount: f64,
    pub total_count: u64,
    pub active_amount: f64,
    pub active_count: u64,
    pub deleted_amount: f64,
    pub deleted_count: u64,
}

/// One month of donations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// 1-12
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub month_name: String,
    pub total_amount: f64,
    pub count: u64,
}

/// One day inside a date-range report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    #[serde(deserialize_with = "deserialize_report_date")]
    pub date: NaiveDate,
    pub total_amount: f64,
    pub total_count: u64,
    pub active_amount: f64,
    pub active_count: u64,
    pub deleted_amount: f64,
    pub deleted_count: u64,
}

/// Totals plus a per-day breakdown for a queried range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeReport {
    pub total_amount: f64,
    pub total_count: u64,
    pub active_amount: f64,
    pub active_count: u64,
    pub deleted_amount: f64,
    pub deleted_count: u64,
    #[serde(default)]
    pub daily_reports: Vec<DailyReport>,
}

impl DateRangeReport {
    /// The range totals without the daily rows
    pub fn totals(&self) -> DonationSummary {
        DonationSummary {
            total_amount: self.total_amount,
            total_count: self.total_count,
            active_amount: self.active_amount,
            active_count: self.active_count,
            deleted_amount: self.deleted_amount,
            deleted_count: self.deleted_count,
        }
    }
}

/// Backend dates arrive either as `2024-03-01` or as a full timestamp
fn deserialize_report_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let day = raw.get(..10).unwrap_or(raw.as_str());
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

/// Inclusive date range for the date-wise report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting reversed bounds
    pub fn new(start: NaiveDate, end: NaiveDate) -> AdminResult<Self> {
        if start > end {
            return Err(AdminError::InvalidDateRange(format!(
                "Start date {} is after end date {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse the two date inputs; both are required
    pub fn parse(start: &str, end: &str) -> AdminResult<Self> {
        if start.trim().is_empty() || end.trim().is_empty() {
            return Err(AdminError::InvalidDateRange(
                "Both start and end dates are required".to_string(),
            ));
        }
        let parse = |value: &str| {
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
                AdminError::InvalidDateRange(format!("'{}' is not a YYYY-MM-DD date", value))
            })
        };
        Self::new(parse(start)?, parse(end)?)
    }

    /// Query parameters understood by the report endpoint
    pub fn query(&self) -> [(&'static str, String); 2] {
        [
            ("startDate", self.start.format("%Y-%m-%d").to_string()),
            ("endDate", self.end.format("%Y-%m-%d").to_string()),
        ]
    }
}

// ============================================================================
// Authentication
// ============================================================================

/// Credentials posted to `/auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Profile block inside the login response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginProfile {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// Body returned by `/auth/login`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub is_admin: bool,
    pub data: LoginProfile,
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

fn require(form: &str, field: &str, value: &str) -> AdminResult<()> {
    if value.trim().is_empty() {
        return Err(AdminError::field_validation(
            form,
            field,
            format!("{} is required", capitalize(field)),
        ));
    }
    Ok(())
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_donation_with_string_id() {
        let json = r#"{"id":"1","amount":50,"description":"gift","user":{"id":2,"name":"Amy"}}"#;
        let donation: Donation = serde_json::from_str(json).unwrap();
        assert_eq!(donation.id, DonationId::new(1));
        assert_eq!(donation.amount, 50.0);
        assert_eq!(donation.user, Contributor::new(UserId::new(2), "Amy"));
    }

    #[test]
    fn test_donation_payload_shape() {
        let payload = DonationPayload {
            amount: 100.0,
            description: String::new(),
            user: Contributor::new(UserId::new(2), "Amy"),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"amount": 100.0, "description": "", "user": {"id": 2, "name": "Amy"}})
        );
    }

    #[test]
    fn test_contributor_display_prefers_username() {
        let mut contributor = Contributor::new(UserId::new(2), "Amy Pond");
        assert_eq!(contributor.display_name(), "Amy Pond");
        contributor.username = Some("amy".to_string());
        assert_eq!(contributor.display_name(), "amy");
    }

    #[test]
    fn test_new_user_requires_fields() {
        let user = NewUser {
            username: "amy".to_string(),
            name: String::new(),
            email: "amy@example.com".to_string(),
            password: "secret".to_string(),
            role: Role::User,
        };
        let err = user.validate().unwrap_err();
        assert_eq!(err.user_message(), "Name is required");
    }

    #[test]
    fn test_user_update_form_fields() {
        let update = UserUpdate {
            name: "Amy".to_string(),
            username: "amy".to_string(),
            email: "amy@example.com".to_string(),
            role: Role::Admin,
        };
        let fields = update.form_fields();
        assert_eq!(fields[3], ("role", "admin".to_string()));
    }

    #[test]
    fn test_date_range_report_parsing() {
        let json = r#"{
            "totalAmount": 150.0, "totalCount": 3,
            "activeAmount": 100.0, "activeCount": 2,
            "deletedAmount": 50.0, "deletedCount": 1,
            "dailyReports": [
                {"date": "2024-03-01T00:00:00", "totalAmount": 150.0, "totalCount": 3,
                 "activeAmount": 100.0, "activeCount": 2, "deletedAmount": 50.0, "deletedCount": 1}
            ]
        }"#;
        let report: DateRangeReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.daily_reports.len(), 1);
        assert_eq!(
            report.daily_reports[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(report.totals().deleted_count, 1);
    }

    #[test]
    fn test_date_range_validation() {
        assert!(DateRange::parse("2024-01-01", "").is_err());
        assert!(DateRange::parse("2024-02-01", "2024-01-01").is_err());

        let range = DateRange::parse("2024-01-01", "2024-01-31").unwrap();
        assert_eq!(range.query()[0], ("startDate", "2024-01-01".to_string()));
        assert_eq!(range.query()[1], ("endDate", "2024-01-31".to_string()));
    }

    #[test]
    fn test_login_response_parsing() {
        let json = r#"{
            "token": "a.b.c", "isAdmin": true, "status": 200, "message": "ok",
            "data": {"id": "5", "username": "root", "name": "Root", "email": "r@x.io", "role": "admin"}
        }"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert!(response.is_admin);
        assert_eq!(response.data.id, UserId::new(5));
        assert_eq!(response.data.role, Role::Admin);
    }
}
