//! Login / logout and the dashboard.

use anyhow::Result;
use colored::Colorize;
use donation_core::Session;
use donation_ui::render::{render_nav, render_record};
use donation_ui::{Capability, Notifier, nav_groups};

use crate::context::AppContext;
use crate::output::prompt_line;

/// Log in against `/auth/login` and store the session.
pub async fn login(
    ctx: &AppContext,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let username = match username {
        Some(u) => u,
        None => prompt_line("Username: ")?,
    };
    let password = match password {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ")?,
    };

    let auth = ctx.auth_store();
    match auth.login(&username, &password).await {
        Ok(session) => {
            ctx.notifier.success("Login successful");
            println!(
                "Logged in as {} ({}).",
                session.user.name.bold(),
                session.role()
            );
            if let Some(expiry) = session.expires_at {
                println!("Session expires at {}.", expiry.format("%Y-%m-%d %H:%M UTC"));
            }
            Ok(())
        }
        Err(err) => {
            ctx.notifier.error(&format!("Login failed: {}", err.user_message()));
            Err(err.into())
        }
    }
}

/// Forget the stored session.
pub fn logout(ctx: &AppContext) -> Result<()> {
    let was_logged_in = ctx.session.current().is_some();
    ctx.auth_store().logout()?;
    if was_logged_in {
        ctx.notifier.success("Logged out");
    } else {
        ctx.notifier.info("No session to clear");
    }
    Ok(())
}

fn session_fields(session: &Session) -> Vec<(&'static str, String)> {
    vec![
        ("Name", session.user.name.clone()),
        ("Username", session.user.username.clone()),
        ("Email", session.user.email.clone().unwrap_or_default()),
        ("Role", session.role().display_name().to_string()),
        (
            "Expires",
            session
                .expires_at
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "never".to_string()),
        ),
    ]
}

/// Dashboard: who is logged in and what they may open.
pub fn whoami(ctx: &AppContext) -> Result<()> {
    let auth = ctx.auth_store();
    auth.require(Capability::ViewDashboard)?;
    let session = auth
        .session()
        .active()
        .ok_or(donation_core::AdminError::Unauthenticated)?;

    println!("{}", "Dashboard".bold());
    print!("{}", render_record(&session_fields(&session)));
    Ok(())
}

/// Sidebar: pages the current role can open.
pub fn nav(ctx: &AppContext) -> Result<()> {
    let auth = ctx.auth_store();
    let groups = nav_groups(auth.capabilities());
    if groups.is_empty() {
        println!("Not logged in. Run `donation-admin login` first.");
        return Ok(());
    }
    print!("{}", render_nav(&groups));
    Ok(())
}
