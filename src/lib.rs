//! # clickerd - backend for a Telegram clicker game
//!
//! clickerd stores player profiles for an incremental "clicker" game and serves
//! them to two front doors: a Telegram bot for registration and profile lookups,
//! and a REST API used by the game client.
//!
//! ## Features
//!
//! - **Progression Economy**: four upgrade tracks (energy capacity and the X10, X100 and X1000
//!   multipliers) with linear stats and exponential upgrade costs.
//! - **Embedded Persistence**: sled-backed player store with per-record atomic updates.
//! - **Chat Bot**: `/start`, `/profile` and `/register` over Telegram long polling.
//! - **REST API**: profile, skills, counters and leaderboard endpoints with permissive CORS.
//! - **Async Design**: Tokio runtime; the bot and the HTTP server run as independent tasks.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use clickerd::config::Config;
//! use clickerd::profile::ProfileService;
//! use clickerd::storage::SledPlayerStoreBuilder;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("config.toml").await?;
//!     let store = SledPlayerStoreBuilder::new(&config.storage.data_dir)
//!         .tree(config.storage.db_name.clone())
//!         .open()?;
//!     let profiles = ProfileService::new(Arc::new(store), config.storage.op_timeout());
//!
//!     let router = clickerd::api::build_router(profiles);
//!     let listener = tokio::net::TcpListener::bind(config.bind_addr()?).await?;
//!     clickerd::api::serve(listener, router).await
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`economy`] - pure level → stat and level → cost rules
//! - [`player`] - the persisted player record
//! - [`storage`] - the [`storage::PlayerStore`] seam and its sled / in-memory implementations
//! - [`profile`] - profile service: upserts, defaults, timeouts, error taxonomy
//! - [`bot`] - chat commands and the Telegram transport
//! - [`api`] - axum router and handlers
//! - [`config`] - configuration loading and validation
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐
//! │  Telegram    │   │  HTTP API    │ ← front doors
//! │  bot         │   │  (axum)      │
//! └──────────────┘   └──────────────┘
//!          │                 │
//!          └──── Profile ────┘         ← orchestration + timeouts
//!                Service
//!                   │
//!     ┌──────────────┴───────────┐
//!     │ Player Store │  Economy  │     ← persistence / pure rules
//!     └──────────────────────────┘
//! ```

pub mod api;
pub mod bot;
pub mod config;
pub mod economy;
pub mod logutil;
pub mod metrics;
pub mod player;
pub mod profile;
pub mod storage;
pub mod validation;
