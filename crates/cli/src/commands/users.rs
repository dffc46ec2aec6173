//! `users` subcommands (admin only).

use anyhow::Result;
use donation_core::{User, UserId};
use donation_ui::render::{render_record, render_table_page};
use donation_ui::{Capability, Notifier, UserForm, UserStore, user_table};

use super::{apply_list_options, confirm_delete, finish_submit, page_size};
use crate::context::AppContext;
use crate::{ListOptions, UserAction, UserFields};

pub async fn run(ctx: &AppContext, action: UserAction) -> Result<()> {
    ctx.auth_store().require(Capability::ManageUsers)?;
    let store = ctx.user_store();

    match action {
        UserAction::List { options } => list(ctx, &store, &options).await,
        UserAction::Show { id } => show(ctx, &store, id).await,
        UserAction::Create {
            fields,
            password,
            register,
        } => create(ctx, &store, fields, password, register).await,
        UserAction::Edit { id, fields } => edit(ctx, &store, id, fields).await,
        UserAction::Delete { id, yes } => delete(ctx, &store, id, yes).await,
    }
}

async fn list(ctx: &AppContext, store: &UserStore, options: &ListOptions) -> Result<()> {
    let users = store.list().await.inspect_err(|err| {
        ctx.notifier
            .error(&format!("Failed to load users: {}", err.user_message()));
    })?;

    let mut table = user_table(page_size(options, ctx.config.user_page_size())?);
    table.set_rows(users);
    apply_list_options(&mut table, options)?;
    print!("{}", render_table_page("User List", &table));
    Ok(())
}

fn user_fields(user: &User) -> Vec<(&'static str, String)> {
    vec![
        ("ID", user.id.to_string()),
        ("Name", user.name.clone()),
        ("Username", user.username.clone()),
        ("Email", user.email.clone()),
        ("Role", user.role.display_name().to_string()),
    ]
}

async fn show(ctx: &AppContext, store: &UserStore, id: UserId) -> Result<()> {
    let user = store.fetch_detail(id).await.inspect_err(|err| {
        ctx.notifier
            .error(&format!("Failed to load user: {}", err.user_message()));
    })?;
    print!("{}", render_record(&user_fields(&user)));
    Ok(())
}

/// Overlay command-line values on a form
fn apply_fields(form: &mut UserForm, fields: UserFields) {
    if let Some(name) = fields.name {
        form.name = name;
    }
    if let Some(username) = fields.username {
        form.username = username;
    }
    if let Some(email) = fields.email {
        form.email = email;
    }
    if let Some(role) = fields.role {
        form.role = Some(role);
    }
}

async fn create(
    ctx: &AppContext,
    store: &UserStore,
    fields: UserFields,
    password: Option<String>,
    register: bool,
) -> Result<()> {
    let mut form = UserForm::create();
    apply_fields(&mut form, fields);
    form.password = match password {
        Some(p) => p,
        None => rpassword::prompt_password("Password for the new user: ")?,
    };

    if register {
        if let Some(user) = finish_submit(form.submit_registration(store, &ctx.notifier).await)? {
            print!("{}", render_record(&user_fields(&user)));
        }
    } else {
        let user = finish_submit(form.submit(store, &ctx.notifier).await)?;
        print!("{}", render_record(&user_fields(&user)));
    }
    Ok(())
}

async fn edit(ctx: &AppContext, store: &UserStore, id: UserId, fields: UserFields) -> Result<()> {
    let current = store.fetch_detail(id).await.inspect_err(|err| {
        ctx.notifier
            .error(&format!("Failed to load user: {}", err.user_message()));
    })?;

    let mut form = UserForm::edit(&current);
    apply_fields(&mut form, fields);
    if form == UserForm::edit(&current) {
        ctx.notifier.info("Nothing to change");
        return Ok(());
    }

    let user = finish_submit(form.submit(store, &ctx.notifier).await)?;
    print!("{}", render_record(&user_fields(&user)));
    Ok(())
}

async fn delete(ctx: &AppContext, store: &UserStore, id: UserId, yes: bool) -> Result<()> {
    if !confirm_delete("user", yes)? {
        ctx.notifier.info("Cancelled");
        return Ok(());
    }

    match store.remove(id).await {
        Ok(()) => {
            ctx.notifier.success("Successfully Deleted");
            Ok(())
        }
        Err(err) => {
            ctx.notifier
                .error(&format!("Failed to delete user: {}", err.user_message()));
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use donation_core::Role;

    fn amy() -> User {
        User {
            id: UserId::new(2),
            username: "amy".to_string(),
            name: "Amy".to_string(),
            email: "amy@example.com".to_string(),
            role: Role::User,
        }
    }

    #[test]
    fn test_fields_override_only_given_values() {
        let mut form = UserForm::edit(&amy());
        apply_fields(
            &mut form,
            UserFields {
                email: Some("amy.pond@example.com".to_string()),
                role: Some(Role::Admin),
                ..UserFields::default()
            },
        );
        assert_eq!(form.name, "Amy");
        assert_eq!(form.email, "amy.pond@example.com");
        assert_eq!(form.role, Some(Role::Admin));
    }

    #[test]
    fn test_user_record() {
        let fields = user_fields(&amy());
        assert_eq!(fields[0], ("ID", "2".to_string()));
        assert_eq!(fields[4], ("Role", "User".to_string()));
    }
}
