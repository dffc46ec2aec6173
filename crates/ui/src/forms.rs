//! # Forms
//!
//! Create and edit forms for users and donations.
//!
//! A form keeps the operator's raw input. Validation collects every field
//! error at once, and a submission either navigates back to the list page or
//! leaves the form (and its values) as they were.

use crate::navigation::Page;
use crate::notify::Notifier;
use crate::stores::{DonationStore, UserStore};
use donation_core::{
    AdminError, AuthUser, Donation, DonationId, DonationPayload, NewUser, Role, User, UserId,
    UserUpdate,
};
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

/// Whether `email` looks like an address the backend will accept
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

// ============================================================================
// Form Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every validation failure of one submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn require(&mut self, field: &'static str, label: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, format!("{} is required", label));
            return false;
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// First message for a field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// All messages joined for a single-line notification
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<FormErrors> for AdminError {
    fn from(errors: FormErrors) -> Self {
        AdminError::validation(errors.summary())
    }
}

// ============================================================================
// Submission
// ============================================================================

/// Result of submitting a form
#[derive(Debug)]
pub enum SubmitOutcome<T> {
    /// Saved; the caller moves on to `next`
    Saved { value: T, next: Page },
    /// Local validation failed and nothing was sent
    Invalid(FormErrors),
    /// The backend rejected the submission
    Rejected(AdminError),
}

impl<T> SubmitOutcome<T> {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved { .. })
    }

    /// Page to show after the submission; `None` means stay on the form
    pub fn next_page(&self) -> Option<Page> {
        match self {
            SubmitOutcome::Saved { next, .. } => Some(*next),
            _ => None,
        }
    }

    pub fn into_result(self) -> Result<T, AdminError> {
        match self {
            SubmitOutcome::Saved { value, .. } => Ok(value),
            SubmitOutcome::Invalid(errors) => Err(errors.into()),
            SubmitOutcome::Rejected(err) => Err(err),
        }
    }
}

fn settle<T>(
    result: Result<T, AdminError>,
    page: Page,
    notifier: &dyn Notifier,
    success: &str,
    failure: &str,
) -> SubmitOutcome<T> {
    match result {
        Ok(value) => {
            notifier.success(success);
            SubmitOutcome::Saved {
                value,
                next: page.list_page(),
            }
        }
        Err(err) if err.is_validation() => {
            notifier.warning(&err.user_message());
            let mut errors = FormErrors::new();
            errors.add("form", err.user_message());
            SubmitOutcome::Invalid(errors)
        }
        Err(err) => {
            notifier.error(&format!("{}: {}", failure, err.user_message()));
            SubmitOutcome::Rejected(err)
        }
    }
}

fn invalid<T>(errors: FormErrors, notifier: &dyn Notifier) -> SubmitOutcome<T> {
    notifier.warning(&errors.summary());
    SubmitOutcome::Invalid(errors)
}

// ============================================================================
// User Form
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFormMode {
    Create,
    Edit(UserId),
}

/// Create or edit a user
#[derive(Debug, Clone, PartialEq)]
pub struct UserForm {
    pub mode: UserFormMode,
    pub name: String,
    pub username: String,
    pub email: String,
    /// Only used when creating
    pub password: String,
    pub role: Option<Role>,
}

impl UserForm {
    /// Blank create form; the role selector starts at `user`
    pub fn create() -> Self {
        Self {
            mode: UserFormMode::Create,
            name: String::new(),
            username: String::new(),
            email: String::new(),
            password: String::new(),
            role: Some(Role::User),
        }
    }

    /// Edit form pre-populated from the fetched detail
    pub fn edit(user: &User) -> Self {
        Self {
            mode: UserFormMode::Edit(user.id),
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            password: String::new(),
            role: Some(user.role),
        }
    }

    pub fn page(&self) -> Page {
        match self.mode {
            UserFormMode::Create => Page::CreateUser,
            UserFormMode::Edit(_) => Page::EditUser,
        }
    }

    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        errors.require("name", "Name", &self.name);
        errors.require("username", "Username", &self.username);
        if errors.require("email", "Email", &self.email) && !is_valid_email(self.email.trim()) {
            errors.add("email", "Invalid email format");
        }
        if self.mode == UserFormMode::Create {
            errors.require("password", "Password", &self.password);
        }
        if self.role.is_none() {
            errors.add("role", "Role is required");
        }
        errors
    }

    fn new_user(&self, role: Role) -> NewUser {
        NewUser {
            username: self.username.trim().to_string(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role,
        }
    }

    fn update(&self, role: Role) -> UserUpdate {
        UserUpdate {
            name: self.name.trim().to_string(),
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            role,
        }
    }

    /// Validate, then create (`POST /users`) or update the user
    pub async fn submit(&self, store: &UserStore, notifier: &dyn Notifier) -> SubmitOutcome<User> {
        if let Err(errors) = self.validate().into_result() {
            return invalid(errors, notifier);
        }
        let role = self.role.unwrap_or_default();
        match self.mode {
            UserFormMode::Create => settle(
                store.create(&self.new_user(role)).await,
                self.page(),
                notifier,
                "User created successfully",
                "Failed to create user",
            ),
            UserFormMode::Edit(id) => settle(
                store.update(id, &self.update(role)).await,
                self.page(),
                notifier,
                "Successfully Updated",
                "Failed to update user",
            ),
        }
    }

    /// Validate, then register through `/auth/register`
    pub async fn submit_registration(
        &self,
        store: &UserStore,
        notifier: &dyn Notifier,
    ) -> SubmitOutcome<Option<User>> {
        if let Err(errors) = self.validate().into_result() {
            return invalid(errors, notifier);
        }
        let role = self.role.unwrap_or_default();
        settle(
            store.register(&self.new_user(role)).await,
            Page::CreateUser,
            notifier,
            "Registration successful",
            "Registration failed",
        )
    }
}

// ============================================================================
// Donation Form
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonationFormMode {
    Create,
    Edit(DonationId),
}

/// Create or edit a donation; the contributor comes from the session
#[derive(Debug, Clone, PartialEq)]
pub struct DonationForm {
    pub mode: DonationFormMode,
    /// Raw amount input
    pub amount: String,
    pub description: String,
}

impl DonationForm {
    pub fn create() -> Self {
        Self {
            mode: DonationFormMode::Create,
            amount: String::new(),
            description: String::new(),
        }
    }

    pub fn edit(donation: &Donation) -> Self {
        Self {
            mode: DonationFormMode::Edit(donation.id),
            amount: donation.amount.to_string(),
            description: donation.description.clone(),
        }
    }

    pub fn page(&self) -> Page {
        match self.mode {
            DonationFormMode::Create => Page::CreateDonation,
            DonationFormMode::Edit(_) => Page::EditDonation,
        }
    }

    fn parsed_amount(&self, errors: &mut FormErrors) -> Option<f64> {
        if !errors.require("amount", "Amount", &self.amount) {
            return None;
        }
        match self.amount.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() => Some(amount),
            _ => {
                errors.add("amount", "Amount must be a number");
                None
            }
        }
    }

    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        self.parsed_amount(&mut errors);
        errors
    }

    /// Payload attributed to the logged-in operator
    pub fn payload(&self, contributor: &AuthUser) -> Result<DonationPayload, FormErrors> {
        let mut errors = FormErrors::new();
        let amount = self.parsed_amount(&mut errors);
        match amount {
            Some(amount) if errors.is_empty() => Ok(DonationPayload {
                amount,
                description: self.description.trim().to_string(),
                user: contributor.as_contributor(),
            }),
            _ => Err(errors),
        }
    }

    pub async fn submit(
        &self,
        store: &DonationStore,
        contributor: &AuthUser,
        notifier: &dyn Notifier,
    ) -> SubmitOutcome<Donation> {
        let payload = match self.payload(contributor) {
            Ok(payload) => payload,
            Err(errors) => return invalid(errors, notifier),
        };
        match self.mode {
            DonationFormMode::Create => settle(
                store.create(&payload).await,
                self.page(),
                notifier,
                "Donation Successfully Created",
                "Failed to create donation",
            ),
            DonationFormMode::Edit(id) => settle(
                store.update(id, &payload).await,
                self.page(),
                notifier,
                "Donation updated successfully",
                "Failed to update donation",
            ),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
