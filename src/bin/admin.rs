//! CLI administration tool for linkgate.
//!
//! Manages links and the redirect cache directly against the configured
//! store and cache, without going through the HTTP API. Link mutations go
//! through the same service as the API, so cache entries are invalidated
//! exactly as they would be for an HTTP request.
//!
//! # Usage
//!
//! ```bash
//! # Create a link (prompts for the URL if omitted)
//! cargo run --bin admin -- link create --url https://example.com --alias promo
//!
//! # List links
//! cargo run --bin admin -- link list --page 1
//!
//! # Delete a link
//! cargo run --bin admin -- link delete 42
//!
//! # Inspect and clear the redirect cache
//! cargo run --bin admin -- cache keys
//! cargo run --bin admin -- cache clear
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`linkgate::config`]. `DATABASE_URL` (or the
//! `DB_*` components) is required.

use linkgate::application::services::CreateLink;
use linkgate::config::{self, Config, mask_connection_string};
use linkgate::error::LinkError;
use linkgate::server::build_state;
use linkgate::state::AppState;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;

/// CLI tool for managing linkgate.
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
    /// Manage short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Inspect or clear the redirect cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Create a new short link
    Create {
        /// Destination URL
        #[arg(short, long)]
        url: Option<String>,

        /// Custom short code (auto-generated if not provided)
        #[arg(short, long)]
        alias: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List links, newest first
    List {
        #[arg(long, default_value_t = 1)]
        page: i64,

        #[arg(long, default_value_t = 25)]
        page_size: i64,
    },

    /// Delete a link by ID
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Redirect cache subcommands.
#[derive(Subcommand)]
enum CacheAction {
    /// List cached keys with remaining TTL
    Keys,

    /// Remove every redirect cache key
    Clear {
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

    let config = config::load_from_env()?;
    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL (or DB_USER/DB_PASSWORD/DB_NAME) must be set")?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &connect(&config).await?).await?,
        Commands::Cache { action } => {
            handle_cache_action(action, &connect(&config).await?).await?
        }
        Commands::Db { action } => handle_db_action(action, &database_url).await?,
    }

    Ok(())
}

async fn connect(config: &Config) -> Result<AppState> {
    build_state(config)
        .await
        .context("Failed to initialize link store")
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, state: &AppState) -> Result<()> {
    match action {
        LinkAction::Create { url, alias, yes } => create_link(state, url, alias, yes).await?,
        LinkAction::List { page, page_size } => list_links(state, page, page_size).await?,
        LinkAction::Delete { id, yes } => delete_link(state, id, yes).await?,
    }

    Ok(())
}

/// Creates a link with interactive prompts.
///
/// Validation failures are printed per field, the same way the API reports
/// them.
async fn create_link(
    state: &AppState,
    url: Option<String>,
    alias: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔗 Create Short Link".bright_blue().bold());
    println!();

    let url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Destination URL")
            .with_initial_text("https://")
            .interact_text()?,
    };

    println!("  URL:   {}", url.cyan());
    match &alias {
        Some(a) => println!("  Alias: {}", a.cyan()),
        None => println!("  Alias: {}", "(generated)".bright_black()),
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this link?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    match state
        .link_service
        .create_link(CreateLink { url, alias })
        .await
    {
        Ok(link) => {
            println!("{}", "✅ Link created successfully!".green().bold());
            println!("  ID:   {}", link.id.to_string().bright_black());
            println!("  Code: {}", link.short_code.bright_yellow().bold());
            println!();
            Ok(())
        }
        Err(LinkError::Validation(errors)) => {
            println!("{}", "❌ Link rejected:".red().bold());
            for error in errors {
                println!("  {}: {}", error.field.bright_white(), error.message.red());
            }
            println!();
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("Failed to create link: {}", e)),
    }
}

/// Lists links.
///
/// # Output Format
///
/// ```text
/// 📋 Links
///
///   ID    Code             Created              URL
///   ──────────────────────────────────────────────────────────────
///   2     promo            2025-01-16 14:20     https://example.com/landing
/// ```
async fn list_links(state: &AppState, page: i64, page_size: i64) -> Result<()> {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    let links = state
        .link_service
        .list_links(page, page_size)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;
    let total = state
        .link_service
        .count_links()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        println!(
            "  Create one with: {} admin link create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<16} {:<20} {}",
        "ID".bright_white().bold(),
        "Code".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<5} {:<16} {:<20} {}",
            link.id.to_string().bright_black(),
            link.short_code.cyan(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.original_url
        );
    }

    println!();
    println!(
        "  Page {} · showing {} of {}",
        page,
        links.len().to_string().bright_white().bold(),
        total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Deletes a link by ID with confirmation prompt (default: No).
async fn delete_link(state: &AppState, id: i64, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Delete Short Link".bright_blue().bold());
    println!();

    let link = match state.link_service.get_link(id).await {
        Ok(link) => link,
        Err(LinkError::NotFound) => {
            println!("{}", "⚠️  Link not found".yellow());
            return Ok(());
        }
        Err(e) => return Err(anyhow::anyhow!("Database error: {}", e)),
    };

    println!("  Code: {}", link.short_code.cyan());
    println!("  URL:  {}", link.original_url);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    state
        .link_service
        .delete(&link)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!("{}", "✅ Link deleted".green().bold());
    println!();

    Ok(())
}

/// Dispatches redirect cache commands.
async fn handle_cache_action(action: CacheAction, state: &AppState) -> Result<()> {
    match action {
        CacheAction::Keys => {
            println!("{}", "🗂  Cached Redirects".bright_blue().bold());
            println!();

            let keys = state
                .cache
                .keys()
                .await
                .map_err(|e| anyhow::anyhow!("Cache backend unavailable: {}", e))?;

            if keys.is_empty() {
                println!("{}", "  Cache is empty".yellow());
                return Ok(());
            }

            for key in &keys {
                let ttl = key
                    .ttl_seconds
                    .map(|s| format!("{}s", s))
                    .unwrap_or_else(|| "-".to_string());
                println!("  {:<20} {}", key.short_code.cyan(), ttl.bright_black());
            }

            println!();
            println!("  Total: {}", keys.len().to_string().bright_white().bold());
        }
        CacheAction::Clear { yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Remove every cached redirect?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            let removed = state.cache.clear_all().await;
            println!(
                "{} {}",
                "✅ Removed".green().bold(),
                format!("{} keys", removed).bright_white()
            );
        }
    }

    println!();
    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, database_url: &str) -> Result<()> {
    println!(
        "{} {}",
        "🔍 Connecting to".bright_blue(),
        mask_connection_string(database_url).bright_black()
    );

    let pool = PgPool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    match action {
        DbAction::Check => {
            sqlx::query("SELECT 1").fetch_one(&pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(&pool)
                .await?;
            let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
                .fetch_one(&pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Links:      {}", links.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}
