//! Washline CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (including the session table)
//! washline-cli migrate
//!
//! # Create a directory account
//! WASHLINE_ACCOUNT_PASSWORD=... washline-cli account create -e staff@example.com -n "Priya" -r staff
//!
//! # Recompute certification statuses
//! washline-cli certifications refresh
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `account create` - Create directory accounts
//! - `certifications refresh` - Recompute certification statuses from expiry dates

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "washline-cli")]
#[command(author, version, about = "Washline CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage directory accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Manage staff certifications
    Certifications {
        #[command(subcommand)]
        action: CertificationsAction,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Create a new account
    Create {
        /// Login email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Role (`user`, `staff`, `admin`)
        #[arg(short, long, default_value = "user")]
        role: String,

        /// Password (read from the environment to keep it out of shell history)
        #[arg(long, env = "WASHLINE_ACCOUNT_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
enum CertificationsAction {
    /// Recompute every certification status for today
    Refresh,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Account { action } => match action {
            AccountAction::Create {
                email,
                name,
                role,
                password,
            } => {
                let password = SecretString::from(password);
                commands::account::create(&email, &name, &role, &password).await?;
            }
        },
        Commands::Certifications { action } => match action {
            CertificationsAction::Refresh => commands::certifications::refresh().await?,
        },
    }
    Ok(())
}
