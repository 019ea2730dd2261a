//! CLI administration tool for shorturl.
//!
//! Manages API tokens and performs link and database maintenance without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Issue a token; its name becomes the owner of links created with it
//! cargo run --bin admin -- token create --name ci-bot
//!
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke ci-bot
//!
//! # Remove expired links now instead of waiting for the sweeper
//! cargo run --bin admin -- links sweep
//! cargo run --bin admin -- links stats
//!
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_*` components): PostgreSQL connection
//! - `TOKEN_SIGNING_SECRET`: required by `token create`; must match the server

use shorturl::application::services::auth_service::hash_token;
use shorturl::config::{Config, mask_connection_string};
use shorturl::domain::repositories::{LinkRepository, TokenRepository};
use shorturl::infrastructure::persistence::{PgLinkRepository, PgTokenRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use rand::Rng;
use rand::distr::Alphanumeric;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

const TOKEN_LEN: usize = 48;

/// CLI tool for managing shorturl.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Link maintenance
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token
    Create {
        /// Token name; links created with the token are owned by this name
        #[arg(short, long)]
        name: Option<String>,

        /// Custom token value (auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum LinksAction {
    /// Delete every expired link now
    Sweep,

    /// Show link counts
    Stats,
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[derive(Debug, FromRow)]
struct LinkCounts {
    total: i64,
    custom: i64,
    owned: i64,
    expiring: i64,
    awaiting_sweep: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;
    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;
    let pool = Arc::new(pool);

    match cli.command {
        Commands::Token { action } => handle_token_action(action, pool).await?,
        Commands::Links { action } => handle_links_action(action, pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: Arc<PgPool>) -> Result<()> {
    let repo = PgTokenRepository::new(pool);

    match action {
        TokenAction::Create { name, token, yes } => create_token(&repo, name, token, yes).await,
        TokenAction::List => list_tokens(&repo).await,
        TokenAction::Revoke { name_or_id, yes } => revoke_token(&repo, name_or_id, yes).await,
    }
}

/// Creates a new API token with interactive prompts.
///
/// Only the HMAC of the token is stored, so the raw value is shown once and
/// cannot be recovered afterwards.
async fn create_token(
    repo: &PgTokenRepository,
    name: Option<String>,
    token: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    let signing_secret = std::env::var("TOKEN_SIGNING_SECRET")
        .context("TOKEN_SIGNING_SECRET must be set to create tokens")?;
    if signing_secret.is_empty() {
        anyhow::bail!("TOKEN_SIGNING_SECRET must not be empty");
    }

    println!("{}", "Create API Token".bright_blue().bold());
    println!();

    let token_name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Token name").interact_text()?,
    };

    if repo
        .find_by_name(&token_name)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .is_some()
    {
        anyhow::bail!("A token named '{}' already exists", token_name);
    }

    let token_value = match token {
        Some(t) => {
            println!("{}", "Using provided token value".yellow());
            t
        }
        None => generate_token(),
    };

    println!("  Name:  {}", token_name.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "Save this token now. It cannot be shown again.".red().bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let token_hash = hash_token(&signing_secret, &token_value)
        .map_err(|e| anyhow::anyhow!("Failed to hash token: {}", e))?;

    repo.create_token(&token_name, &token_hash)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!("{}", "Token created.".green().bold());
    println!();
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/links",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

async fn list_tokens(repo: &PgTokenRepository) -> Result<()> {
    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "No tokens found".yellow());
        println!("Create one with: {}", "admin token create".bright_cyan());
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<17} {:<17} {}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "-".repeat(80).bright_black());

    for token in &tokens {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };
        let last_used = token
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<5} {:<30} {:<17} {:<17} {}",
            token.id.to_string().bright_black(),
            token.name.cyan(),
            token.created_at.format("%Y-%m-%d %H:%M").to_string(),
            last_used.bright_black(),
            status
        );
    }

    println!();
    println!("  Total: {}", tokens.len().to_string().bright_white().bold());

    Ok(())
}

/// Revokes a token by ID (numeric input) or exact name.
async fn revoke_token(repo: &PgTokenRepository, name_or_id: String, skip_confirm: bool) -> Result<()> {
    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_name(&name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Revoke this token?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!("{}", "Token revoked.".green().bold());

    Ok(())
}

async fn handle_links_action(action: LinksAction, pool: Arc<PgPool>) -> Result<()> {
    match action {
        LinksAction::Sweep => {
            let repo = PgLinkRepository::new(pool);
            let removed = repo
                .sweep_expired()
                .await
                .map_err(|e| anyhow::anyhow!("Sweep failed: {}", e))?;

            println!(
                "Removed {} expired link(s)",
                removed.to_string().bright_green().bold()
            );
        }
        LinksAction::Stats => {
            let counts: LinkCounts = sqlx::query_as(
                r#"
                SELECT
                    COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE is_custom) AS custom,
                    COUNT(*) FILTER (WHERE created_by IS NOT NULL) AS owned,
                    COUNT(*) FILTER (WHERE expires_at > NOW()) AS expiring,
                    COUNT(*) FILTER (WHERE expires_at <= NOW()) AS awaiting_sweep
                FROM links
                "#,
            )
            .fetch_one(pool.as_ref())
            .await?;

            let active_tokens: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
                    .fetch_one(pool.as_ref())
                    .await?;

            println!("{}", "Link statistics".bright_blue().bold());
            println!();
            println!("  Links:          {}", counts.total.to_string().bright_green().bold());
            println!("  Custom codes:   {}", counts.custom);
            println!("  Owned:          {}", counts.owned);
            println!("  Expiring:       {}", counts.expiring);
            println!("  Awaiting sweep: {}", counts.awaiting_sweep.to_string().yellow());
            println!("  Active tokens:  {}", active_tokens);
        }
    }

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            sqlx::query("SELECT 1").fetch_one(pool).await?;
            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let migrations: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM _sqlx_migrations WHERE success",
            )
            .fetch_one(pool)
            .await
            .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Applied migrations: {}", migrations);
        }
    }

    Ok(())
}

/// Generates a 48-character alphanumeric token from the thread-local RNG.
fn generate_token() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}
