//! CLI administration tool for traffic-attribution.
//!
//! Manages candidate destinations and shows traffic counts without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Add a destination (prompts for missing fields)
//! cargo run --bin admin -- candidate add --category finance \
//!     --domain https://offer.example --path "/lp?sub={click_id}"
//!
//! # List destinations of one category
//! cargo run --bin admin -- candidate list --category finance
//!
//! # Remove a destination
//! cargo run --bin admin -- candidate remove 42
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
//!
//! A running server picks up changes once its cached copy of the category
//! expires (`CANDIDATE_CACHE_TTL_SECONDS`).

use traffic_attribution::domain::entities::NewCandidate;
use traffic_attribution::domain::repositories::CandidateRepository;
use traffic_attribution::infrastructure::persistence::PgCandidateRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing traffic-attribution.
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
    /// Manage candidate destination URLs
    Candidate {
        #[command(subcommand)]
        action: CandidateAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Candidate management subcommands.
#[derive(Subcommand)]
enum CandidateAction {
    /// Add a destination to a category
    Add {
        /// Campaign category (e.g., "finance")
        #[arg(short, long)]
        category: Option<String>,

        /// Scheme and host, e.g. "https://offer.example"
        #[arg(short, long)]
        domain: Option<String>,

        /// Path template with placeholders, e.g. "/lp?sub={click_id}"
        #[arg(short, long)]
        path: Option<String>,

        /// Affiliate network label
        #[arg(short, long)]
        network: Option<String>,

        /// Geography label
        #[arg(short, long, default_value = "")]
        geo: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List destinations
    List {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Remove a destination by ID
    Remove {
        id: i64,

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
        Commands::Candidate { action } => handle_candidate_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches candidate management commands.
async fn handle_candidate_action(action: CandidateAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgCandidateRepository::new(Arc::new(pool.clone())));

    match action {
        CandidateAction::Add {
            category,
            domain,
            path,
            network,
            geo,
            yes,
        } => {
            let new_candidate = NewCandidate {
                category: prompt_missing(category, "Category", "finance")?,
                domain: prompt_missing(domain, "Domain", "https://")?,
                path_template: prompt_missing(path, "Path template", "/?sub={click_id}")?,
                network: prompt_missing(network, "Network", "")?,
                geography: geo,
            };
            add_candidate(repo, new_candidate, yes).await?;
        }
        CandidateAction::List { category } => {
            list_candidates(repo, category).await?;
        }
        CandidateAction::Remove { id, yes } => {
            remove_candidate(repo, id, yes).await?;
        }
    }

    Ok(())
}

fn prompt_missing(value: Option<String>, prompt: &str, initial: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new()
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()?),
    }
}

/// Adds a candidate after compiling its template.
///
/// # Flow
///
/// 1. Compile `domain + path` (rejects unknown placeholders and bad domains)
/// 2. Show the placeholders the template will require
/// 3. Confirm (unless `--yes`)
/// 4. Insert
async fn add_candidate(
    repo: Arc<PgCandidateRepository>,
    new_candidate: NewCandidate,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "➕ Add Candidate".bright_blue().bold());
    println!();

    let template = new_candidate
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid candidate: {}", e))?;

    let placeholders: Vec<String> = template
        .placeholders()
        .iter()
        .map(|p| p.to_string())
        .collect();

    println!("{}", "Candidate details:".bright_white().bold());
    println!("  Category:     {}", new_candidate.category.cyan());
    println!(
        "  URL:          {}{}",
        new_candidate.domain.bright_white(),
        new_candidate.path_template.bright_white()
    );
    println!("  Network:      {}", new_candidate.network.cyan());
    println!("  Geography:    {}", new_candidate.geography.cyan());
    println!(
        "  Requires:     {}",
        if placeholders.is_empty() {
            "nothing".bright_black()
        } else {
            placeholders.join(", ").yellow()
        }
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Add this candidate?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let created = repo
        .create(new_candidate)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to add candidate: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Candidate added with ID".green().bold(),
        created.id.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Lists candidates grouped in category order.
///
/// # Output Format
///
/// ```text
/// 📋 Candidates
///
///   ID    Category     Network      URL
///   ───────────────────────────────────────────────────────────
///   1     finance      mgid         https://a.example/go/{click_id}
/// ```
async fn list_candidates(
    repo: Arc<PgCandidateRepository>,
    category: Option<String>,
) -> Result<()> {
    println!("{}", "📋 Candidates".bright_blue().bold());
    println!();

    let candidates = repo
        .list(category)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list candidates: {}", e))?;

    if candidates.is_empty() {
        println!("{}", "  No candidates found".yellow());
        println!();
        println!(
            "  Add one with: {} admin candidate add",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<12} {:<12} {}",
        "ID".bright_white().bold(),
        "Category".bright_white().bold(),
        "Network".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for candidate in &candidates {
        println!(
            "  {:<5} {:<12} {:<12} {}",
            candidate.id.to_string().bright_black(),
            candidate.category.cyan(),
            candidate.network,
            candidate.raw_url()
        );
    }

    println!();
    println!(
        "  Total: {}",
        candidates.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn remove_candidate(
    repo: Arc<PgCandidateRepository>,
    id: i64,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🗑  Remove Candidate".bright_blue().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove candidate {}?", id))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let removed = repo
        .delete(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to remove candidate: {}", e))?;

    if removed {
        println!("{}", "✅ Candidate removed".green().bold());
    } else {
        println!("{}", "⚠️  Candidate not found".yellow());
    }
    println!();

    Ok(())
}

/// Displays row counts for every table.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let rows = [
        ("Candidates", "SELECT COUNT(*) FROM candidate_urls"),
        (
            "Categories",
            "SELECT COUNT(DISTINCT category) FROM candidate_urls",
        ),
        ("Visits", "SELECT COUNT(*) FROM visits"),
        ("Leads", "SELECT COUNT(*) FROM leads"),
        ("Network events", "SELECT COUNT(*) FROM network_events"),
    ];

    for (label, query) in rows {
        let count: i64 = sqlx::query_scalar(query).fetch_one(pool).await?;
        println!(
            "  {:<15} {}",
            format!("{}:", label),
            count.to_string().bright_green().bold()
        );
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

            let migrations: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
