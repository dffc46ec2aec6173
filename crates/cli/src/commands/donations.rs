//! `donations` subcommands.

use anyhow::Result;
use donation_core::{Donation, DonationId};
use donation_ui::render::{render_record, render_table_page};
use donation_ui::{
    Capability, DonationForm, DonationStore, Notifier, donation_table, format_amount,
};

use super::{apply_list_options, confirm_delete, finish_submit, page_size};
use crate::context::AppContext;
use crate::{DonationAction, DonationFields, ListOptions};

pub async fn run(ctx: &AppContext, action: DonationAction) -> Result<()> {
    let auth = ctx.auth_store();
    let capability = match action {
        DonationAction::List { .. } | DonationAction::Show { .. } => Capability::ViewDonations,
        _ => Capability::ManageDonations,
    };
    let operator = auth.require(capability)?;
    let store = ctx.donation_store();

    match action {
        DonationAction::List { options } => list(ctx, &store, &options).await,
        DonationAction::Show { id } => show(ctx, &store, id).await,
        DonationAction::Create { fields } => {
            let mut form = DonationForm::create();
            apply_fields(&mut form, fields);
            let donation = finish_submit(form.submit(&store, &operator, &ctx.notifier).await)?;
            print!("{}", render_record(&donation_fields(&donation)));
            Ok(())
        }
        DonationAction::Edit { id, fields } => {
            let current = store.fetch_detail(id).await.inspect_err(|err| {
                ctx.notifier
                    .error(&format!("Failed to load donation: {}", err.user_message()));
            })?;
            let mut form = DonationForm::edit(&current);
            apply_fields(&mut form, fields);
            let donation = finish_submit(form.submit(&store, &operator, &ctx.notifier).await)?;
            print!("{}", render_record(&donation_fields(&donation)));
            Ok(())
        }
        DonationAction::Delete { id, yes } => delete(ctx, &store, id, yes).await,
    }
}

async fn list(ctx: &AppContext, store: &DonationStore, options: &ListOptions) -> Result<()> {
    let donations = store.list().await.inspect_err(|err| {
        ctx.notifier
            .error(&format!("Failed to load donations: {}", err.user_message()));
    })?;

    let mut table = donation_table(page_size(options, ctx.config.donation_page_size())?);
    table.set_rows(donations);
    apply_list_options(&mut table, options)?;
    print!("{}", render_table_page("Donation List", &table));
    Ok(())
}

fn donation_fields(donation: &Donation) -> Vec<(&'static str, String)> {
    vec![
        ("ID", donation.id.to_string()),
        ("Amount", format_amount(donation.amount)),
        ("Description", donation.description.clone()),
        ("Donated By", donation.user.display_name().to_string()),
    ]
}

async fn show(ctx: &AppContext, store: &DonationStore, id: DonationId) -> Result<()> {
    let donation = store.fetch_detail(id).await.inspect_err(|err| {
        ctx.notifier
            .error(&format!("Failed to load donation: {}", err.user_message()));
    })?;
    print!("{}", render_record(&donation_fields(&donation)));
    Ok(())
}

fn apply_fields(form: &mut DonationForm, fields: DonationFields) {
    if let Some(amount) = fields.amount {
        form.amount = amount;
    }
    if let Some(description) = fields.description {
        form.description = description;
    }
}

async fn delete(ctx: &AppContext, store: &DonationStore, id: DonationId, yes: bool) -> Result<()> {
    if !confirm_delete("donation", yes)? {
        ctx.notifier.info("Cancelled");
        return Ok(());
    }

    match store.remove(id).await {
        Ok(()) => {
            ctx.notifier.success("Donation deleted successfully");
            Ok(())
        }
        Err(err) => {
            ctx.notifier
                .error(&format!("Failed to delete donation: {}", err.user_message()));
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use donation_core::{Contributor, UserId};

    #[test]
    fn test_edit_keeps_unset_fields() {
        let current = Donation {
            id: DonationId::new(1),
            amount: 50.0,
            description: "gift".to_string(),
            user: Contributor::new(UserId::new(2), "Amy"),
        };
        let mut form = DonationForm::edit(&current);
        apply_fields(
            &mut form,
            DonationFields {
                amount: Some("75".to_string()),
                description: None,
            },
        );
        assert_eq!(form.amount, "75");
        assert_eq!(form.description, "gift");

        let mut form = DonationForm::edit(&Donation {
            amount: 12.345,
            ..current.clone()
        });
        apply_fields(
            &mut form,
            DonationFields {
                amount: None,
                description: Some("pledge".to_string()),
            },
        );
        assert_eq!(form.amount, "12.345");

        let fields = donation_fields(&current);
        assert_eq!(fields[1], ("Amount", "50.00".to_string()));
        assert_eq!(fields[3], ("Donated By", "Amy".to_string()));
    }
}
