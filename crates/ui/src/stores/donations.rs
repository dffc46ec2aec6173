//! Donation container and report slots

use crate::state::{Container, EntityState, Slot, Snapshot, Status};
use donation_client::DonationApi;
use donation_core::{
    AdminResult, DateRange, DateRangeReport, Donation, DonationId, DonationPayload,
    DonationSummary, MonthlySummary, Validatable,
};
use std::sync::Arc;

/// Everything the donation pages read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonationState {
    pub entities: EntityState<Donation>,
    pub summary: Option<DonationSummary>,
    pub monthly: Vec<MonthlySummary>,
    pub date_range: Option<DateRangeReport>,
}

/// Cached donations and reports backed by the donation endpoints
pub struct DonationStore {
    api: Arc<dyn DonationApi>,
    state: Container<DonationState>,
}

impl DonationStore {
    pub fn new(api: Arc<dyn DonationApi>) -> Self {
        Self {
            api,
            state: Container::new("donations"),
        }
    }

    // ===== Entity actions =====

    pub async fn list(&self) -> AdminResult<Vec<Donation>> {
        let ticket = self.state.begin_fetch(Slot::Collection);
        let result = self.api.list_donations().await;
        self.state.settle(ticket, result, |state, donations| {
            state.entities.collection = donations.clone();
        })
    }

    pub async fn fetch_detail(&self, id: DonationId) -> AdminResult<Donation> {
        let ticket = self.state.begin_fetch(Slot::Detail);
        let result = self.api.get_donation(id).await;
        self.state.settle(ticket, result, |state, donation| {
            state.entities.detail = Some(donation.clone());
        })
    }

    pub async fn create(&self, payload: &DonationPayload) -> AdminResult<Donation> {
        payload.validate()?;
        let ticket = self.state.begin_mutation();
        let result = self.api.create_donation(payload).await;
        let created = self.state.settle(ticket, result, |state, donation| {
            state.entities.upsert(donation.clone());
        })?;
        tracing::info!(id = %created.id, amount = created.amount, "donation created");
        Ok(created)
    }

    pub async fn update(&self, id: DonationId, payload: &DonationPayload) -> AdminResult<Donation> {
        payload.validate()?;
        let ticket = self.state.begin_mutation();
        let result = self.api.update_donation(id, payload).await;
        let updated = self.state.settle(ticket, result, |state, donation| {
            state.entities.replace(id, donation.clone());
        })?;
        tracing::info!(%id, "donation updated");
        Ok(updated)
    }

    pub async fn remove(&self, id: DonationId) -> AdminResult<()> {
        let ticket = self.state.begin_mutation();
        let result = self.api.delete_donation(id).await;
        self.state
            .settle(ticket, result, |state, _| state.entities.remove(id))?;
        tracing::info!(%id, "donation deleted");
        Ok(())
    }

    // ===== Report actions =====

    pub async fn fetch_summary(&self) -> AdminResult<DonationSummary> {
        let ticket = self.state.begin_fetch(Slot::Summary);
        let result = self.api.donation_summary().await;
        self.state.settle(ticket, result, |state, summary| {
            state.summary = Some(summary.clone());
        })
    }

    pub async fn fetch_monthly_summary(&self) -> AdminResult<Vec<MonthlySummary>> {
        let ticket = self.state.begin_fetch(Slot::Monthly);
        let result = self.api.monthly_summary().await;
        self.state.settle(ticket, result, |state, monthly| {
            state.monthly = monthly.clone();
        })
    }

    pub async fn fetch_date_range_report(&self, range: &DateRange) -> AdminResult<DateRangeReport> {
        let ticket = self.state.begin_fetch(Slot::DateRange);
        let result = self.api.date_range_report(range).await;
        self.state.settle(ticket, result, |state, report| {
            state.date_range = Some(report.clone());
        })
    }

    // ===== Readers =====

    pub fn donations(&self) -> Vec<Donation> {
        self.state.with(|state| state.entities.collection.clone())
    }

    pub fn detail(&self) -> Option<Donation> {
        self.state.with(|state| state.entities.detail.clone())
    }

    pub fn summary(&self) -> Option<DonationSummary> {
        self.state.with(|state| state.summary.clone())
    }

    pub fn monthly(&self) -> Vec<MonthlySummary> {
        self.state.with(|state| state.monthly.clone())
    }

    pub fn date_range(&self) -> Option<DateRangeReport> {
        self.state.with(|state| state.date_range.clone())
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    pub fn snapshot(&self) -> Snapshot<DonationState> {
        self.state.snapshot()
    }
}

// ============================================================================
// Tests
// ============================================================================
