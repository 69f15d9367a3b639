//! CLI administration tool for qr-shortener.
//!
//! Provides commands for managing user accounts, purging stale tokens,
//! and performing database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Create a user account
//! cargo run --bin admin -- user create
//!
//! # Confirm a user's email manually
//! cargo run --bin admin -- user confirm-email alice@example.com
//!
//! # Purge time-limited tokens older than 30 days
//! cargo run --bin admin -- tokens purge --days 30
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use qr_shortener::domain::entities::NewUser;
use qr_shortener::domain::repositories::{TokenRepository, UserRepository};
use qr_shortener::infrastructure::persistence::{PgTokenRepository, PgUserRepository};

use anyhow::{Context, Result};
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHasher};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;

/// CLI tool for managing qr-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage time-limited tokens
    Tokens {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// User management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Create a user account
    Create {
        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Email address
        #[arg(short, long)]
        email: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Mark a user's email as confirmed
    ConfirmEmail {
        /// Email address of the account
        email: String,
    },
}

/// Token maintenance subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Delete time-limited tokens older than a cutoff
    Purge {
        /// Age cutoff in days
        #[arg(short, long, default_value_t = 30)]
        days: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Tokens { action } => handle_token_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = PgUserRepository::new(pool.clone());

    match action {
        UserAction::Create { name, email, yes } => {
            create_user(&repo, name, email, yes).await?;
        }
        UserAction::ConfirmEmail { email } => {
            confirm_email(&repo, &email).await?;
        }
    }

    Ok(())
}

/// Creates a user account with interactive prompts.
///
/// The password is prompted with hidden input and stored as an argon2
/// hash; the cleartext never touches the database.
async fn create_user(
    repo: &PgUserRepository,
    name: Option<String>,
    email: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "Create User Account".bright_blue().bold());
    println!();

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Name").interact_text()?,
    };

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let password: String = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    anyhow::ensure!(password.len() >= 8, "Password must be at least 8 characters");

    println!();
    println!("  Name:  {}", name.cyan());
    println!("  Email: {}", email.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this account?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?
        .to_string();

    let user = repo
        .create(NewUser {
            name,
            email,
            password_hash,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {e}"))?;

    println!();
    println!("{}", "User created successfully!".green().bold());
    println!("  ID: {}", user.id.to_string().bright_white());
    println!();

    Ok(())
}

/// Marks an account's email as confirmed, bypassing the token flow.
async fn confirm_email(repo: &PgUserRepository, email: &str) -> Result<()> {
    let user = repo
        .find_by_email(email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {e}"))?
        .context("User not found")?;

    if user.email_confirmed {
        println!("{}", "Email is already confirmed".yellow());
        return Ok(());
    }

    repo.mark_email_confirmed(user.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to confirm email: {e}"))?;

    println!("{}", "Email confirmed".green().bold());

    Ok(())
}

/// Dispatches token maintenance commands.
async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let repo = PgTokenRepository::new(pool.clone());

    match action {
        TokenAction::Purge { days, yes } => {
            purge_tokens(&repo, days, yes).await?;
        }
    }

    Ok(())
}

/// Deletes time-limited tokens created before the cutoff.
///
/// Consumed and expired tokens are kept by the service for auditability;
/// this is the only place they get removed.
async fn purge_tokens(repo: &PgTokenRepository, days: i64, skip_confirm: bool) -> Result<()> {
    anyhow::ensure!(days > 0, "--days must be greater than 0");

    let cutoff = Utc::now() - Duration::days(days);

    println!("{}", "Purge Time-Limited Tokens".bright_blue().bold());
    println!();
    println!(
        "  Cutoff: tokens created before {}",
        cutoff.format("%Y-%m-%d %H:%M").to_string().cyan()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete these tokens?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let deleted = repo
        .purge_created_before(cutoff)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to purge tokens: {e}"))?;

    println!();
    println!(
        "{} {}",
        "Deleted tokens:".green().bold(),
        deleted.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of users
/// - Total number of QR records (excluding soft-deleted)
/// - Total scan count across all records
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let qr_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM qr_codes WHERE deleted_at IS NULL")
            .fetch_one(pool)
            .await?;

    let scans_count: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(scan_count), 0)::BIGINT FROM qr_codes")
            .fetch_one(pool)
            .await?;

    println!(
        "  Users:    {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  QR codes: {}",
        qr_count.to_string().bright_green().bold()
    );
    println!(
        "  Scans:    {}",
        scans_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
