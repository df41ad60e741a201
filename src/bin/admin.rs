//! CLI administration tool for linfy.
//!
//! Provides commands for managing users, viewing statistics, and performing
//! database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # List users
//! cargo run --bin admin -- user list
//!
//! # Create a user (prompts for missing fields)
//! cargo run --bin admin -- user create --name Ada --email ada@example.com
//!
//! # Show a user's API keys
//! cargo run --bin admin -- user keys ada@example.com
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection / apply migrations
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components: PostgreSQL connection

use linfy::config::Config;
use linfy::domain::entities::{MAX_API_KEYS_PER_USER, NewUser, User};
use linfy::domain::repositories::{ApiKeyRepository, LinkRepository, UserRepository};
use linfy::infrastructure::persistence::{PgApiKeyRepository, PgLinkRepository, PgUserRepository};
use linfy::infrastructure::security::password::hash_password;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;
use validator::ValidateEmail;

/// CLI tool for managing linfy.
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
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
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
    /// List all users
    List,

    /// Create a user
    Create {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Generate a random password instead of prompting for one
        #[arg(short, long)]
        generate_password: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show a user's API keys (ids and usage only)
    Keys {
        /// Email of the user
        email: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url().context("Database is not configured")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let users = PgUserRepository::new(pool.clone());

    match action {
        UserAction::List => list_users(&users).await?,
        UserAction::Create {
            name,
            email,
            generate_password,
            yes,
        } => create_user(&users, name, email, generate_password, yes).await?,
        UserAction::Keys { email } => {
            let keys = PgApiKeyRepository::new(pool);
            list_keys(&users, &keys, &email).await?;
        }
    }

    Ok(())
}

/// Lists all users.
///
/// # Output Format
///
/// ```text
/// 👥 Users
///
///   ID  Name                   Email                          Created
///   ────────────────────────────────────────────────────────────────────────
///   1   Ada                    ada@example.com                2025-01-15 10:30
/// ```
async fn list_users(users: &PgUserRepository) -> Result<()> {
    println!("{}", "👥 Users".bright_blue().bold());
    println!();

    let all = users
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if all.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<4} {:<22} {:<30} {}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Email".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for user in &all {
        println!(
            "  {:<4} {:<22} {:<30} {}",
            user.id.to_string().bright_black(),
            user.name.cyan(),
            user.email,
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", all.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Creates a user with interactive prompts for missing fields.
///
/// The password is hashed with Argon2id exactly as registration does; a
/// generated password is printed once.
async fn create_user(
    users: &PgUserRepository,
    name: Option<String>,
    email: Option<String>,
    generate: bool,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Name").interact_text()?,
    };

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let email = checked_email(&email)?;

    let password = if generate {
        let generated = generate_password();
        println!("{}", "✨ Generated password".green());
        println!("  Password: {}", generated.bright_yellow().bold());
        println!(
            "{}",
            "⚠️  Save this password now; it cannot be shown again."
                .red()
                .bold()
        );
        generated
    } else {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?
    };

    if name.trim().is_empty() || password.is_empty() {
        anyhow::bail!("Name and password are required");
    }

    println!();
    println!("  Name:  {}", name.trim().cyan());
    println!("  Email: {}", email.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this user?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let password_hash = hash_password(&password)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let user = users
        .create(NewUser {
            name: name.trim().to_string(),
            email,
            password_hash,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!();
    println!(
        "{} (id {})",
        "✅ User created successfully!".green().bold(),
        user.id
    );
    println!();

    Ok(())
}

/// Normalizes an email and applies the same format check as registration.
fn checked_email(raw: &str) -> Result<String> {
    let email = User::normalize_email(raw);

    if !email.validate_email() {
        anyhow::bail!("Invalid email format: '{}'", raw.trim());
    }

    Ok(email)
}

/// Shows a user's API keys without their secret values.
async fn list_keys(users: &PgUserRepository, keys: &PgApiKeyRepository, email: &str) -> Result<()> {
    let user = users
        .find_by_email(&User::normalize_email(email))
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("User not found")?;

    println!(
        "{} {}",
        "🔑 API keys of".bright_blue().bold(),
        user.email.cyan()
    );
    println!();

    let list = keys
        .list_for_user(user.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list API keys: {}", e))?;

    if list.is_empty() {
        println!("{}", "  No API keys".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<6} {:<20} {}",
        "ID".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold()
    );
    println!("  {}", "─".repeat(50).bright_black());

    for key in &list {
        let last_used = key
            .last_used
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<6} {:<20} {}",
            key.id.to_string().bright_black(),
            key.created_at.format("%Y-%m-%d %H:%M").to_string(),
            last_used.bright_black()
        );
    }

    println!();
    println!(
        "  {} of {} keys in use",
        list.len().to_string().bright_white().bold(),
        MAX_API_KEYS_PER_USER
    );
    println!();

    Ok(())
}

/// Displays system statistics: users, links and total clicks.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let pool = Arc::new(pool.clone());
    let users = PgUserRepository::new(pool.clone());
    let links = PgLinkRepository::new(pool);

    let users_count = users
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count users: {}", e))?;
    let links_count = links
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;
    let clicks_count = links
        .total_clicks()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count clicks: {}", e))?;

    let rows = [
        ("Users:", users_count),
        ("Links:", links_count),
        ("Clicks:", clicks_count),
    ];
    for (label, count) in rows {
        println!("  {label:<7} {}", count.to_string().bright_green().bold());
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
        DbAction::Migrate => {
            println!("{}", "🛠  Applying migrations...".bright_blue());

            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to run migrations")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}

/// Generates a random password.
///
/// # Format
///
/// - Length: 20 characters
/// - Character set: A-Z, a-z, 0-9
fn generate_password() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const PASSWORD_LEN: usize = 20;

    let mut rng = rand::rng();

    (0..PASSWORD_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_email_normalizes() {
        assert_eq!(
            checked_email("  Ada@Example.COM ").unwrap(),
            "ada@example.com"
        );
    }

    #[test]
    fn test_checked_email_rejects_malformed() {
        assert!(checked_email("not-an-email").is_err());
        assert!(checked_email("").is_err());
        assert!(checked_email("a@").is_err());
    }

    #[test]
    fn test_generate_password() {
        let password = generate_password();

        assert_eq!(password.len(), 20);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
