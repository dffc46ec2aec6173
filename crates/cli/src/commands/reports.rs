//! `reports` subcommands (admin only).

use anyhow::Result;
use colored::Colorize;
use donation_ui::render::{render_cards, render_rows};
use donation_ui::{
    Capability, DateRangeInput, Notifier, daily_columns, monthly_columns, summary_cards,
};

use crate::ReportAction;
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, action: ReportAction) -> Result<()> {
    ctx.auth_store().require(Capability::ViewReports)?;
    let store = ctx.donation_store();

    match action {
        ReportAction::Summary => {
            let summary = store.fetch_summary().await.inspect_err(|err| {
                ctx.notifier
                    .error(&format!("Failed to load summary: {}", err.user_message()));
            })?;
            println!("{}", "Donation Summary".bold());
            print!("{}", render_cards(&summary_cards(&summary)));
        }
        ReportAction::Monthly => {
            let months = store.fetch_monthly_summary().await.inspect_err(|err| {
                ctx.notifier
                    .error(&format!("Failed to load monthly summary: {}", err.user_message()));
            })?;
            println!("{}", "Monthly Summary".bold());
            if months.is_empty() {
                println!("No donations recorded yet.");
            } else {
                print!("{}", render_rows(&monthly_columns(), &months));
            }
        }
        ReportAction::Range { from, to } => {
            let input = DateRangeInput::new(from, to);
            let report = input.load(&store, &ctx.notifier).await?;
            println!(
                "{} {} to {}",
                "Date-wise Report".bold(),
                input.start.trim(),
                input.end.trim()
            );
            print!("{}", render_cards(&summary_cards(&report.totals())));
            println!();
            if report.daily_reports.is_empty() {
                println!("No donations in this range.");
            } else {
                print!("{}", render_rows(&daily_columns(), &report.daily_reports));
            }
        }
    }
    Ok(())
}
