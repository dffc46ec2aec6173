//! Report view-models
//!
//! Reports are computed by the backend; nothing here aggregates rows.

use crate::notify::Notifier;
use crate::stores::DonationStore;
use crate::table::{CellValue, Column, format_amount};
use donation_core::{
    AdminResult, DailyReport, DateRange, DateRangeReport, DonationSummary, MonthlySummary,
};

/// One of the Total / Active / Deleted cards
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCard {
    pub title: &'static str,
    pub amount: f64,
    pub count: u64,
}

pub fn summary_cards(summary: &DonationSummary) -> [SummaryCard; 3] {
    [
        SummaryCard {
            title: "Total",
            amount: summary.total_amount,
            count: summary.total_count,
        },
        SummaryCard {
            title: "Active",
            amount: summary.active_amount,
            count: summary.active_count,
        },
        SummaryCard {
            title: "Deleted",
            amount: summary.deleted_amount,
            count: summary.deleted_count,
        },
    ]
}

fn amount_column<R>(
    key: &'static str,
    header: &'static str,
    accessor: impl Fn(&R) -> f64 + Send + Sync + 'static,
) -> Column<R> {
    Column::new(key, header, move |row: &R| CellValue::from(accessor(row))).with_renderer(
        |value| match value {
            CellValue::Number(n) => format_amount(*n),
            other => other.to_string(),
        },
    )
}

fn count_column<R>(
    key: &'static str,
    header: &'static str,
    accessor: impl Fn(&R) -> u64 + Send + Sync + 'static,
) -> Column<R> {
    Column::new(key, header, move |row: &R| CellValue::Number(accessor(row) as f64))
}

/// Columns of the daily breakdown
pub fn daily_columns() -> Vec<Column<DailyReport>> {
    vec![
        Column::new("date", "Date", |d: &DailyReport| {
            CellValue::text(d.date.format("%Y-%m-%d").to_string())
        }),
        amount_column("total_amount", "Total Amount", |d: &DailyReport| d.total_amount),
        count_column("total_count", "Total Count", |d: &DailyReport| d.total_count),
        amount_column("active_amount", "Active Amount", |d: &DailyReport| d.active_amount),
        count_column("active_count", "Active Count", |d: &DailyReport| d.active_count),
        amount_column("deleted_amount", "Deleted Amount", |d: &DailyReport| d.deleted_amount),
        count_column("deleted_count", "Deleted Count", |d: &DailyReport| d.deleted_count),
    ]
}

/// Columns of the monthly summary
pub fn monthly_columns() -> Vec<Column<MonthlySummary>> {
    vec![
        Column::new("month", "Month", |m: &MonthlySummary| {
            if m.month_name.is_empty() {
                CellValue::Number(f64::from(m.month))
            } else {
                CellValue::text(m.month_name.clone())
            }
        }),
        Column::new("year", "Year", |m: &MonthlySummary| CellValue::Number(f64::from(m.year))),
        amount_column("total_amount", "Total Amount", |m: &MonthlySummary| m.total_amount),
        count_column("count", "Count", |m: &MonthlySummary| m.count),
    ]
}

/// Raw inputs of the date-wise report page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateRangeInput {
    pub start: String,
    pub end: String,
}

impl DateRangeInput {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn range(&self) -> AdminResult<DateRange> {
        DateRange::parse(&self.start, &self.end)
    }

    /// Check the dates, then fetch the report; nothing is sent for a bad range
    pub async fn load(
        &self,
        store: &DonationStore,
        notifier: &dyn Notifier,
    ) -> AdminResult<DateRangeReport> {
        let range = match self.range() {
            Ok(range) => range,
            Err(err) => {
                notifier.warning(&err.user_message());
                return Err(err);
            }
        };
        store.fetch_date_range_report(&range).await.inspect_err(|err| {
            notifier.error(&format!("Failed to load report: {}", err.user_message()));
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationLog;
    use crate::testing::FakeBackend;

    #[test]
    fn test_cards_follow_summary() {
        let summary = DonationSummary {
            total_amount: 150.0,
            total_count: 3,
            active_amount: 100.0,
            active_count: 2,
            deleted_amount: 50.0,
            deleted_count: 1,
        };
        let cards = summary_cards(&summary);
        let titles: Vec<&str> = cards.iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["Total", "Active", "Deleted"]);
        assert_eq!(cards[2].amount, 50.0);
        assert_eq!(cards[1].count, 2);
    }

    #[test]
    fn test_monthly_columns_render() {
        let row = MonthlySummary {
            month: 3,
            year: 2024,
            month_name: "March".to_string(),
            total_amount: 150.0,
            count: 3,
        };
        let cells: Vec<String> = monthly_columns().iter().map(|c| c.render(&row)).collect();
        assert_eq!(cells, vec!["March", "2024", "150.00", "3"]);
    }

    #[tokio::test]
    async fn test_missing_date_blocks_fetch() {
        let backend = FakeBackend::with_donations(vec![]);
        let store = DonationStore::new(backend.clone());
        let log = NotificationLog::new();

        let err = DateRangeInput::new("2024-03-01", "").load(&store, &log).await.unwrap_err();
        assert!(err.is_validation());
        assert!(backend.calls().is_empty());
        assert!(log.last().is_some());
    }

    #[tokio::test]
    async fn test_range_report_loads() {
        let backend = FakeBackend::with_donations(vec![]);
        let store = DonationStore::new(backend.clone());
        let log = NotificationLog::new();

        let report = DateRangeInput::new("2024-03-01", "2024-03-02")
            .load(&store, &log)
            .await
            .unwrap();
        assert_eq!(report.totals().total_count, 3);
        let cells: Vec<String> = daily_columns()
            .iter()
            .map(|c| c.render(&report.daily_reports[0]))
            .collect();
        assert_eq!(
            cells,
            vec!["2024-03-01", "150.00", "3", "100.00", "2", "50.00", "1"]
        );
    }
}
