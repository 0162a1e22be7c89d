//! Binary entrypoint for the clickerd CLI.
//!
//! Commands:
//! - `start [--no-bot]` - run the HTTP API and, unless disabled, the Telegram bot
//! - `init` - write a starter `config.toml`
//! - `status` - print the number of players and the current leaderboard
//!
//! See the library crate docs for module-level details: `clickerd::`.
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use tokio::sync::watch;

use clickerd::config::Config;
use clickerd::profile::{ProfileService, DEFAULT_LEADERBOARD_LIMIT};
use clickerd::storage::SledPlayerStoreBuilder;

const METRICS_LOG_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Parser)]
#[command(name = "clickerd")]
#[command(about = "Player profile backend for a Telegram clicker game")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API and the chat bot
    Start {
        /// Serve the HTTP API only
        #[arg(long)]
        no_bot: bool,
    },
    /// Write a default configuration file
    Init,
    /// Show player count and leaderboard
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            init_logging(None, cli.verbose);
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
        }
        Commands::Status => {
            let mut config = Config::load_unvalidated(&cli.config).await?;
            config.telegram.enabled = false;
            config.validate()?;
            init_logging(Some(&config), cli.verbose);
            log_config_source(&cli.config);
            let profiles = open_profiles(&config)?;
            let count = profiles.player_count().await?;
            println!("Players: {}", count);
            for (rank, entry) in profiles
                .top_players(DEFAULT_LEADERBOARD_LIMIT)
                .await?
                .iter()
                .enumerate()
            {
                println!("{:>2}. {} - {}", rank + 1, entry.name, entry.points);
            }
        }
        Commands::Start { no_bot } => {
            let mut config = Config::load_unvalidated(&cli.config).await?;
            if no_bot {
                config.telegram.enabled = false;
            }
            config.validate()?;
            init_logging(Some(&config), cli.verbose);
            info!("Starting clickerd v{}", env!("CARGO_PKG_VERSION"));
            log_config_source(&cli.config);
            start(config).await?;
        }
    }

    Ok(())
}

fn log_config_source(path: &str) {
    if std::path::Path::new(path).exists() {
        info!("Loaded configuration from {}", path);
    } else {
        info!(
            "No config file at {}, relying on defaults and environment variables",
            path
        );
    }
}

fn open_profiles(config: &Config) -> Result<ProfileService> {
    let store = SledPlayerStoreBuilder::new(&config.storage.data_dir)
        .tree(config.storage.db_name.clone())
        .open()
        .map_err(|e| {
            anyhow!(
                "Failed to open player store at {}: {}",
                config.storage.data_dir,
                e
            )
        })?;
    Ok(ProfileService::new(
        Arc::new(store),
        config.storage.op_timeout(),
    ))
}

async fn start(config: Config) -> Result<()> {
    let profiles = open_profiles(&config)?;
    info!(
        "Player store ready ({} players, tree '{}')",
        profiles.player_count().await?,
        config.storage.db_name
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let bot_task = if config.telegram.enabled {
        Some(spawn_bot(&config, profiles.clone(), shutdown_rx).await?)
    } else {
        info!("Chat bot disabled; serving HTTP API only");
        None
    };

    tokio::spawn(async {
        let mut ticker = tokio::time::interval(METRICS_LOG_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            info!("metrics: {}", clickerd::metrics::snapshot());
        }
    });

    let router = clickerd::api::build_router(profiles);
    let listener = tokio::net::TcpListener::bind(config.bind_addr()?).await?;
    let served = tokio::select! {
        served = clickerd::api::serve(listener, router) => served,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown requested");
            Ok(())
        }
    };

    let _ = shutdown_tx.send(true);
    if let Some(task) = bot_task {
        if let Err(e) = task.await {
            warn!("chat bot task ended abnormally: {}", e);
        }
    }
    if let Err(ref e) = served {
        error!("HTTP server failed: {}", e);
    }
    served
}

#[cfg(feature = "telegram")]
async fn spawn_bot(
    config: &Config,
    profiles: ProfileService,
    shutdown: watch::Receiver<bool>,
) -> Result<tokio::task::JoinHandle<()>> {
    use clickerd::bot::{run_bot, CommandProcessor, TelegramGateway};

    let gateway = TelegramGateway::new(config.telegram.clone());
    let me = gateway
        .verify()
        .await
        .map_err(|e| anyhow!("Failed to create bot: {}", e))?;
    info!(
        "Bot created successfully ({})",
        me.username.as_deref().unwrap_or(&me.first_name)
    );
    let processor = CommandProcessor::new(profiles);
    Ok(tokio::spawn(run_bot(Arc::new(gateway), processor, shutdown)))
}

#[cfg(not(feature = "telegram"))]
async fn spawn_bot(
    _config: &Config,
    _profiles: ProfileService,
    _shutdown: watch::Receiver<bool>,
) -> Result<tokio::task::JoinHandle<()>> {
    Err(anyhow!(
        "Chat bot requires the 'telegram' feature; rebuild with it or run `start --no-bot`"
    ))
}

fn init_logging(config: Option<&Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    let configured = config
        .and_then(|c| c.logging.level.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info);
    // CLI verbosity overrides config
    let level = match verbosity {
        0 => configured,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(level);
    // sled is chatty at debug
    builder.filter_module("sled", log::LevelFilter::Warn);

    let log_file = config
        .and_then(|c| c.logging.file.as_ref())
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });
    if let Some(f) = log_file {
        let file = std::sync::Mutex::new(f);
        // Foreground runs also echo to the console
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = file.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
