//! # Donation Admin CLI
//!
//! Terminal front-end over the donation admin view-models.
//!
//! Every page of the admin client is a subcommand: `users list` is the user
//! list page, `donations create` the donation form, `reports range` the
//! date-wise report. Commands check the logged-in role before they touch
//! the network.

pub mod commands;
pub mod config;
pub mod context;
pub mod output;

use clap::{Args, Parser, Subcommand};
use donation_core::{DonationId, Role, UserId};
use donation_ui::PageSize;
use std::path::PathBuf;

pub use config::ClientConfig;
pub use context::AppContext;

// ============================================================================
// Command Line
// ============================================================================

/// Donation admin client.
#[derive(Parser, Debug)]
#[command(
    name = "donation-admin",
    version,
    about = "Manage users and donations through the donation backend"
)]
pub struct Cli {
    /// Path to client config file (default: <config dir>/donation-admin/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend URL, overriding the config file.
    #[arg(long, global = true, env = "DONATION_ADMIN_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Session file, overriding the config file.
    #[arg(long, global = true, value_name = "PATH")]
    pub session_file: Option<PathBuf>,

    /// Show debug logs on stderr.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and keep the session for later commands.
    Login {
        /// Username (prompted when omitted).
        #[arg(long, short = 'u')]
        username: Option<String>,
        /// Password (not recommended; prompted when omitted).
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session.
    Logout,

    /// Show the logged-in operator.
    Whoami,

    /// List the pages available to the current role.
    Nav,

    /// User management (admin only).
    Users {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Donation records.
    Donations {
        #[command(subcommand)]
        action: DonationAction,
    },

    /// Donation reports (admin only).
    Reports {
        #[command(subcommand)]
        action: ReportAction,
    },
}

/// Filter, sort and paging of a list page
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    /// Keep rows where any column contains this text (case-insensitive).
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Sort by column key (e.g. amount, name).
    #[arg(long, short = 's')]
    pub sort: Option<String>,

    /// Sort descending.
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Page number, starting at 1.
    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: usize,

    /// Rows per page: 5, 10 or 20.
    #[arg(long, value_parser = parse_page_size)]
    pub page_size: Option<PageSize>,
}

/// Fields of the user form
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct UserFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// Role: user or admin.
    #[arg(long)]
    pub role: Option<Role>,
}

/// Fields of the donation form
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct DonationFields {
    /// Amount, e.g. 100 or 12.50.
    #[arg(long, short = 'a', allow_hyphen_values = true)]
    pub amount: Option<String>,
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// List users.
    List {
        #[command(flatten)]
        options: ListOptions,
    },
    /// Show one user.
    Show { id: UserId },
    /// Create a user.
    Create {
        #[command(flatten)]
        fields: UserFields,
        /// Password (prompted when omitted).
        #[arg(long)]
        password: Option<String>,
        /// Go through the public registration endpoint instead.
        #[arg(long)]
        register: bool,
    },
    /// Edit a user; omitted fields keep their current value.
    Edit {
        id: UserId,
        #[command(flatten)]
        fields: UserFields,
    },
    /// Delete a user.
    Delete {
        id: UserId,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum DonationAction {
    /// List donations.
    List {
        #[command(flatten)]
        options: ListOptions,
    },
    /// Show one donation.
    Show { id: DonationId },
    /// Record a donation attributed to the logged-in operator.
    Create {
        #[command(flatten)]
        fields: DonationFields,
    },
    /// Edit a donation; omitted fields keep their current value.
    Edit {
        id: DonationId,
        #[command(flatten)]
        fields: DonationFields,
    },
    /// Delete a donation.
    Delete {
        id: DonationId,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ReportAction {
    /// Total, active and deleted donations.
    Summary,
    /// Totals per month.
    Monthly,
    /// Daily breakdown between two dates (YYYY-MM-DD, inclusive).
    Range {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
}

fn parse_page_size(value: &str) -> Result<PageSize, String> {
    let size: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    PageSize::try_from(size).map_err(|err| err.user_message())
}

// ============================================================================
// Entry Point
// ============================================================================

/// Run one parsed command line
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(ClientConfig::default_path);
    let mut config = ClientConfig::load(&config_path)?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(session_file) = cli.session_file {
        config.session_file = Some(session_file);
    }
    config.validate()?;

    let ctx = AppContext::new(config)?;
    tracing::debug!(base_url = %ctx.config.base_url, "running command");

    match cli.command {
        Command::Login { username, password } => {
            commands::auth::login(&ctx, username, password).await
        }
        Command::Logout => commands::auth::logout(&ctx),
        Command::Whoami => commands::auth::whoami(&ctx),
        Command::Nav => commands::auth::nav(&ctx),
        Command::Users { action } => commands::users::run(&ctx, action).await,
        Command::Donations { action } => commands::donations::run(&ctx, action).await,
        Command::Reports { action } => commands::reports::run(&ctx, action).await,
    }
}

// ============================================================================
// Tests
// ============================================================================
