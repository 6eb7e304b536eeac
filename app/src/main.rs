// In app/src/main.rs

use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use core_types::{Trade, UserId};
use leaderboard::{LeaderboardEngine, LeaderboardPage, LeaderboardQuery, SortKey};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use store::{DisplayProfile, PgStore};
use tracing_subscriber::prelude::*;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Podium: a trading-journal leaderboard service.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs the leaderboard API server.
    Serve,

    /// Computes one leaderboard page and prints it to stdout.
    Leaderboard {
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Page size (1-100).
        #[arg(long, default_value_t = 25)]
        limit: u32,

        /// Sort key: winRate, consistency, riskManagement, totalTrades,
        /// profitFactor, streak, or composite.
        #[arg(long, default_value = "composite")]
        sort_by: String,
    },

    /// Populates the database with synthetic journal data for demos.
    Seed {
        /// Number of users to create.
        #[arg(long, default_value_t = 25)]
        users: u32,

        /// Trades journaled per user.
        #[arg(long, default_value_t = 30)]
        trades_per_user: u32,
    },
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::filter::Targets::new()
            .with_target("sqlx::query", tracing::Level::WARN) // Disable sqlx query debug logs
            .with_default(tracing::Level::INFO),
    );
    tracing_subscriber::registry().with(fmt_layer).init();

    // Parse command-line arguments.
    let cli = Cli::parse();

    tracing::info!("Starting Podium application");

    // Match on the parsed command and call the appropriate handler.
    match cli.command {
        Commands::Serve => {
            run_serve().await?;
        }
        Commands::Leaderboard {
            page,
            limit,
            sort_by,
        } => {
            run_leaderboard(page, limit, &sort_by).await?;
        }
        Commands::Seed {
            users,
            trades_per_user,
        } => {
            run_seed(users, trades_per_user).await?;
        }
    }

    tracing::info!("Podium application has finished successfully.");

    Ok(())
}

/// Connects the store and builds the engine the way every subcommand needs it.
async fn build_engine() -> Result<(Arc<PgStore>, Arc<LeaderboardEngine>, app_config::Settings)> {
    let settings = app_config::load_settings()?;
    tracing::info!("Application settings loaded successfully.");

    let db = Arc::new(store::connect(&settings.database).await?);
    tracing::info!("Database connection established and migrations are up-to-date.");

    let engine = Arc::new(LeaderboardEngine::new(
        db.clone(),
        db.clone(),
        db.clone(),
        settings.leaderboard.fan_out_concurrency,
    ));
    Ok((db, engine, settings))
}

// --- "Serve" Subcommand Logic ---

/// Initializes the store and engine, then runs the web server until terminated.
async fn run_serve() -> Result<()> {
    let (_db, engine, settings) = build_engine().await?;
    web_server::run(settings.server, settings.leaderboard, engine).await
}

// --- "Leaderboard" Subcommand Logic ---

async fn run_leaderboard(page: u32, limit: u32, sort_by: &str) -> Result<()> {
    let sort_by = parse_sort_key(sort_by)?;
    let query = LeaderboardQuery::new(page, limit, sort_by)?;

    let (_db, engine, _settings) = build_engine().await?;
    let result = engine.compute(&query).await?;
    print_leaderboard(&result, query.limit);
    Ok(())
}

fn parse_sort_key(raw: &str) -> Result<SortKey> {
    let key = match raw {
        "winRate" => SortKey::WinRate,
        "consistency" => SortKey::Consistency,
        "riskManagement" => SortKey::RiskManagement,
        "totalTrades" => SortKey::TotalTrades,
        "profitFactor" => SortKey::ProfitFactor,
        "streak" => SortKey::Streak,
        "composite" => SortKey::Composite,
        other => anyhow::bail!("Unknown sort key: {other}"),
    };
    Ok(key)
}

/// Helper function to print one leaderboard page as a text table.
fn print_leaderboard(page: &LeaderboardPage, limit: u32) {
    println!("\n--- Leaderboard (page {}/{}, sorted by {}) ---", page.current_page, page.total_pages, page.sort_by.as_str());
    println!("{} qualifying traders total", page.total_users);
    println!("--------------------------------------------------");

    let rank_offset = (page.current_page as u64 - 1) * limit as u64;
    for (i, user) in page.users.iter().enumerate() {
        println!(
            "[#{:<3}] {} {} ({} {}-{})",
            rank_offset + i as u64 + 1,
            user.username,
            user.league_icon,
            user.league.name(),
            user.league_sub_level,
            user.weekly_streak_rank,
        );
        println!(
            "       score {:.1} | win rate {}% | PF {:.2} | consistency {} | risk {} | {} trades | 30d P&L {}",
            user.composite_score,
            user.win_rate,
            user.profit_factor,
            user.consistency,
            user.risk_management,
            user.total_trades,
            user.monthly_pnl,
        );
    }
    println!("--------------------------------------------------");
}

// --- "Seed" Subcommand Logic ---

/// Generates a plausible synthetic journal so the leaderboard has data to rank.
async fn run_seed(users: u32, trades_per_user: u32) -> Result<()> {
    let (db, _engine, _settings) = build_engine().await?;
    let mut rng = rand::thread_rng();
    let now = Utc::now();

    for u in 0..users {
        let user_id = UserId(format!("user_{:05}", u + 1));
        db.upsert_profile(
            &user_id,
            &DisplayProfile {
                username: format!("demo_trader_{}", u + 1),
                image_url: String::new(),
            },
        )
        .await?;
        db.set_weekly_streak(&user_id, rng.gen_range(0..=25)).await?;

        for _ in 0..trades_per_user {
            let pnl = Decimal::from_f64((rng.gen_range(-300.0..500.0f64) * 100.0).round() / 100.0)
                .unwrap_or(Decimal::ZERO);
            let days_ago = rng.gen_range(0..120);
            let mut trade = Trade::new(user_id.clone(), pnl, now - Duration::days(days_ago));
            trade.symbol = Some("EURUSD".into());
            // Journal fields are filled in sporadically, like real users do.
            if rng.gen_bool(0.7) {
                trade.risk = Some((rng.gen_range(0.2..4.0f64) * 10.0).round() / 10.0);
            }
            if rng.gen_bool(0.6) {
                trade.r_factor = Some((rng.gen_range(0.2..3.5f64) * 10.0).round() / 10.0);
            }
            if rng.gen_bool(0.8) {
                trade.rules_followed = Some(rng.gen_bool(0.75));
            }
            if rng.gen_bool(0.5) {
                trade.fear_to_greed = Some(rng.gen_range(0.0..=10.0f64).round());
                trade.fomo_rating = Some(rng.gen_range(0.0..=10.0f64).round());
                trade.execution_rating = Some(rng.gen_range(0.0..=10.0f64).round());
            }
            db.insert_trade(&trade).await?;
        }
    }

    tracing::info!(users, trades_per_user, "Seeded synthetic journal data");
    Ok(())
}
