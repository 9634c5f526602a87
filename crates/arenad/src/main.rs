//! arenad — the bot arena daemon.
//!
//! Single binary that assembles the tournament subsystems:
//! - State store (redb): users, bots, game ledger
//! - Scheduler with leveled job queues
//! - REST API for admin tooling and game workers
//!
//! # Usage
//!
//! ```text
//! arenad serve --port 8300 --data-dir /var/lib/botarena
//! arenad schedule --data-dir /var/lib/botarena
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use arena_actions::Actions;
use arena_core::ArenaConfig;
use arena_scheduler::Scheduler;
use arena_state::StateStore;

#[derive(Parser)]
#[command(name = "arenad", about = "Bot arena daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the tournament API (single process, all subsystems).
    Serve {
        /// Port to listen on.
        #[arg(long, default_value = "8300")]
        port: u16,

        /// Data directory for persistent state.
        #[arg(long, default_value = "/var/lib/botarena")]
        data_dir: PathBuf,

        /// Optional arena.toml overriding tournament defaults.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run one full scheduling pass and print per-level queue depths.
    Schedule {
        /// Data directory for persistent state.
        #[arg(long, default_value = "/var/lib/botarena")]
        data_dir: PathBuf,

        /// Optional arena.toml overriding tournament defaults.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,arenad=debug,arena=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            data_dir,
            config,
        } => serve(port, &data_dir, load_config(config)?).await,
        Command::Schedule { data_dir, config } => {
            schedule(&data_dir, load_config(config)?).await
        }
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<ArenaConfig> {
    match path {
        Some(path) => ArenaConfig::from_file(&path),
        None => Ok(ArenaConfig::default()),
    }
}

/// Open the store and build the scheduler + actions on top of it.
fn open_subsystems(
    data_dir: &Path,
    config: &ArenaConfig,
) -> anyhow::Result<(Arc<Scheduler>, Arc<Actions>)> {
    std::fs::create_dir_all(data_dir)?;
    let db_path = data_dir.join("arena.redb");

    let store = StateStore::open(&db_path)?;
    info!(path = ?db_path, "state store opened");

    let num_rounds = config.tournament.num_rounds;
    let scheduler = Arc::new(Scheduler::new(Arc::new(store.clone()), num_rounds));
    info!(num_rounds, "scheduler initialized");

    let actions = Arc::new(Actions::new(store, scheduler.clone()));
    Ok((scheduler, actions))
}

async fn serve(port: u16, data_dir: &Path, config: ArenaConfig) -> anyhow::Result<()> {
    info!("bot arena daemon starting");

    let (_scheduler, actions) = open_subsystems(data_dir, &config)?;

    let router = arena_api::build_router(actions);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            info!("shutdown signal received");
        })
        .await?;

    info!("bot arena daemon stopped");
    Ok(())
}

async fn schedule(data_dir: &Path, config: ArenaConfig) -> anyhow::Result<()> {
    let (scheduler, actions) = open_subsystems(data_dir, &config)?;

    // Full passes start from a known baseline.
    scheduler.clear_all().await;
    let queued = actions.request_all_games().await?;
    info!(queued, "scheduling pass complete");

    for (level, depth) in scheduler.queue_depths().await.iter().enumerate() {
        println!("level {level}: {depth} jobs");
    }

    Ok(())
}
