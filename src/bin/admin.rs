//! CLI administration tool for ad-server.
//!
//! Manages ads and inspects statistics directly on the data directory,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List ads with counters
//! cargo run --bin admin -- ads list
//!
//! # Add an ad (prompts for anything not given)
//! cargo run --bin admin -- ads add --type image --src /media/a.png --link https://example.com
//!
//! # Delete an ad
//! cargo run --bin admin -- ads delete spring-sale
//!
//! # View statistics
//! cargo run --bin admin -- stats
//! ```
//!
//! # Environment Variables
//!
//! - `DATA_DIR` (default `data`): directory holding `ads.json` and `ad_stats.json`
//! - `AD_ID_POLICY` (default `unique`): id policy applied by `ads add`
//! - `CASCADE_DELETE_STATS` (default `true`): whether `ads delete` removes statistics
//!
//! The server keeps both collections in memory and rewrites them on every
//! change, so stop it before modifying data with this tool.

use ad_server::api::dto::ad::CreateAdRequest;
use ad_server::application::services::{
    AdService, AdView, CatalogOptions, CatalogService, StatsService,
};
use ad_server::domain::IdPolicy;
use ad_server::domain::entities::{AdId, AdKind, LimitType, NewAd};
use ad_server::error::AppError;
use ad_server::infrastructure::persistence::JsonFileStore;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Select};
use std::path::PathBuf;
use std::sync::Arc;

/// CLI tool for managing ad-server data.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data directory (overrides DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage ads
    Ads {
        #[command(subcommand)]
        action: AdsAction,
    },

    /// Show per-ad statistics and totals
    Stats,
}

/// Ad management subcommands.
#[derive(Subcommand)]
enum AdsAction {
    /// List all ads with counters and active flag
    List,

    /// Add a new ad
    Add {
        /// Ad id (optional under the auto id policy)
        #[arg(long)]
        id: Option<String>,

        /// Ad type: text, image or video
        #[arg(long = "type")]
        ad_type: Option<String>,

        /// Text body (text ads)
        #[arg(long)]
        text: Option<String>,

        /// Media source (image and video ads)
        #[arg(long)]
        src: Option<String>,

        /// Click-through URL
        #[arg(long)]
        link: Option<String>,

        /// Optional caption
        #[arg(long)]
        caption: Option<String>,

        /// Limit type: none, views or clicks
        #[arg(long)]
        limit_type: Option<String>,

        /// Limit threshold
        #[arg(long)]
        limit_count: Option<u64>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Delete an ad
    Delete {
        /// Id of the ad to delete
        id: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .or_else(|| std::env::var("DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data"));

    let options = catalog_options_from_env()?;
    let catalog = open_catalog(data_dir, options).await;

    match cli.command {
        Commands::Ads { action } => handle_ads_action(action, &catalog).await?,
        Commands::Stats => handle_stats(&catalog).await?,
    }

    Ok(())
}

fn catalog_options_from_env() -> Result<CatalogOptions> {
    let id_policy = match std::env::var("AD_ID_POLICY") {
        Ok(value) if !value.trim().is_empty() => value
            .parse::<IdPolicy>()
            .map_err(|e| anyhow::anyhow!("AD_ID_POLICY: {e}"))?,
        _ => IdPolicy::default(),
    };

    let cascade_delete_stats = std::env::var("CASCADE_DELETE_STATS")
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(true);

    Ok(CatalogOptions {
        id_policy,
        cascade_delete_stats,
    })
}

async fn open_catalog(data_dir: PathBuf, options: CatalogOptions) -> CatalogService {
    let store = Arc::new(JsonFileStore::new(data_dir));
    let ads = Arc::new(AdService::load(store.clone()).await);
    let stats = Arc::new(StatsService::load(store).await);

    CatalogService::new(ads, stats, options)
}

/// Converts an API error into a CLI error, keeping its details.
fn cli_error(err: AppError) -> anyhow::Error {
    let info = err.to_error_info();
    if info.details.is_null() {
        anyhow::anyhow!("{}", info.message)
    } else {
        anyhow::anyhow!("{} ({})", info.message, info.details)
    }
}

/// Dispatches ad management commands.
async fn handle_ads_action(action: AdsAction, catalog: &CatalogService) -> Result<()> {
    match action {
        AdsAction::List => list_ads(catalog).await?,
        AdsAction::Add {
            id,
            ad_type,
            text,
            src,
            link,
            caption,
            limit_type,
            limit_count,
            yes,
        } => {
            let request = CreateAdRequest {
                id: id.map(AdId::new),
                ad_type,
                text,
                src,
                link,
                caption,
                limit_type,
                limit_count,
            };
            add_ad(catalog, request, yes).await?;
        }
        AdsAction::Delete { id, yes } => delete_ad(catalog, AdId::new(id), yes).await?,
    }

    Ok(())
}

/// Lists all ads with counters.
///
/// # Output Format
///
/// ```text
/// 📋 Ads
///
///   ID               Type    Views    Clicks   Limit          Status
///   ─────────────────────────────────────────────────────────────────────
///   1                image   12       3        views/100      ACTIVE
///   spring-sale      text    40       9        clicks/5       LIMITED
/// ```
async fn list_ads(catalog: &CatalogService) -> Result<()> {
    println!("{}", "📋 Ads".bright_blue().bold());
    println!();

    let ads = catalog.list_all().await;

    if ads.is_empty() {
        println!("{}", "  No ads found".yellow());
        println!();
        println!(
            "  Create one with: {} admin ads add",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<16} {:<7} {:<8} {:<8} {:<14} {}",
        "ID".bright_white().bold(),
        "Type".bright_white().bold(),
        "Views".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Limit".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(70).bright_black());

    for view in &ads {
        println!(
            "  {:<16} {:<7} {:<8} {:<8} {:<14} {}",
            view.ad.id.as_str().cyan(),
            view.ad.kind.as_str(),
            view.views,
            view.clicks,
            describe_limit(view).bright_black(),
            status_label(view)
        );
    }

    println!();
    println!("  Total: {}", ads.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

fn describe_limit(view: &AdView) -> String {
    match (view.ad.limit_type, view.ad.limit_count) {
        (LimitType::None, _) | (_, None) => "-".to_string(),
        (limit_type, Some(count)) => format!("{limit_type}/{count}"),
    }
}

fn status_label(view: &AdView) -> ColoredString {
    if view.active.unwrap_or(true) {
        "ACTIVE".green()
    } else {
        "LIMITED".red()
    }
}

/// Creates an ad, prompting for any required field not given on the command line.
async fn add_ad(
    catalog: &CatalogService,
    mut request: CreateAdRequest,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "➕ Add Ad".bright_blue().bold());
    println!();

    let policy = catalog.options().id_policy;

    if request.id.is_none() && policy != IdPolicy::AutoIncrement {
        let id: String = Input::new().with_prompt("Ad id").interact_text()?;
        request.id = Some(AdId::new(id));
    }

    let kind = match request.ad_type.as_deref() {
        Some(raw) => raw
            .parse::<AdKind>()
            .map_err(|e| anyhow::anyhow!("Invalid type: {e}"))?,
        None => {
            let kinds = [AdKind::Text, AdKind::Image, AdKind::Video];
            let labels: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
            let selected = Select::new()
                .with_prompt("Ad type")
                .items(&labels)
                .default(0)
                .interact()?;
            kinds[selected]
        }
    };
    request.ad_type = Some(kind.as_str().to_string());

    match kind {
        AdKind::Text if request.text.is_none() => {
            request.text = Some(Input::new().with_prompt("Text").interact_text()?);
        }
        AdKind::Image | AdKind::Video if request.src.is_none() => {
            request.src = Some(Input::new().with_prompt("Media source").interact_text()?);
        }
        _ => {}
    }

    if request.link.is_none() {
        request.link = Some(
            Input::new()
                .with_prompt("Link")
                .with_initial_text("https://")
                .interact_text()?,
        );
    }

    let new_ad = NewAd::try_from(request).map_err(cli_error)?;

    println!();
    println!("{}", "Ad details:".bright_white().bold());
    match &new_ad.id {
        Some(id) => println!("  ID:      {}", id.as_str().cyan()),
        None => println!("  ID:      {}", "(next sequential id)".bright_black()),
    }
    println!("  Type:    {}", new_ad.kind.as_str().cyan());
    if let Some(text) = &new_ad.text {
        println!("  Text:    {}", text);
    }
    if let Some(src) = &new_ad.src {
        println!("  Source:  {}", src);
    }
    println!("  Link:    {}", new_ad.link.bright_cyan());
    if let Some(caption) = &new_ad.caption {
        println!("  Caption: {}", caption);
    }
    if let (LimitType::Views | LimitType::Clicks, Some(count)) =
        (new_ad.limit_type, new_ad.limit_count)
    {
        println!("  Limit:   {} {}", count, new_ad.limit_type);
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this ad?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let ad = catalog
        .create_ad(new_ad)
        .await
        .map_err(cli_error)
        .context("Failed to create ad")?;

    println!();
    println!(
        "{} {}",
        "✅ Ad created:".green().bold(),
        ad.id.as_str().bright_yellow()
    );
    println!();

    Ok(())
}

/// Deletes an ad with confirmation prompt (default: No).
async fn delete_ad(catalog: &CatalogService, id: AdId, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Delete Ad".bright_blue().bold());
    println!();

    let cascade = catalog.options().cascade_delete_stats;

    println!("  Ad: {}", id.as_str().cyan());
    if cascade {
        println!("  {}", "Statistics for this ad will be removed too".yellow());
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this ad?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    catalog
        .delete_ad(&id)
        .await
        .map_err(cli_error)
        .context("Failed to delete ad")?;

    println!("{}", "✅ Ad deleted".green().bold());
    println!();

    Ok(())
}

/// Displays per-ad statistics and totals.
///
/// Statistics records without a matching ad (left behind when cascading
/// deletes are disabled) are marked as orphaned.
async fn handle_stats(catalog: &CatalogService) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let stats = catalog.stats().await;
    let known: Vec<AdId> = catalog
        .list_all()
        .await
        .into_iter()
        .map(|view| view.ad.id)
        .collect();

    if stats.is_empty() {
        println!("{}", "  No statistics recorded".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<16} {:<8} {:<8} {}",
        "ID".bright_white().bold(),
        "Views".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Viewers".bright_white().bold()
    );
    println!("  {}", "─".repeat(50).bright_black());

    let mut total_views = 0u64;
    let mut total_clicks = 0u64;

    for (id, record) in &stats {
        total_views += record.views;
        total_clicks += record.clicks;

        let label = if known.contains(id) {
            id.as_str().cyan()
        } else {
            format!("{id} (orphaned)").bright_black()
        };

        println!(
            "  {:<16} {:<8} {:<8} {}",
            label,
            record.views,
            record.clicks,
            record.viewers.len()
        );
    }

    println!();
    println!("  Ads tracked:  {}", stats.len().to_string().bright_white().bold());
    println!("  Total views:  {}", total_views.to_string().bright_white().bold());
    println!("  Total clicks: {}", total_clicks.to_string().bright_white().bold());
    println!();

    Ok(())
}
