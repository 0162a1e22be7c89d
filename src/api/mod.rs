//! # HTTP API
//!
//! REST surface consumed by the game client.
//!
//! | Method | Path                          | Body                                              | Success |
//! |--------|-------------------------------|---------------------------------------------------|---------|
//! | GET    | `/user?telegramId=<id>`       | -                                                 | profile with display multipliers |
//! | POST   | `/users/{telegramId}/energy`  | `{"energy": int}`                                 | 200, empty |
//! | POST   | `/users/{telegramId}/points`  | `{"points": int}`                                 | 200, empty |
//! | GET    | `/users/{telegramId}/skills`  | -                                                 | skills snapshot |
//! | POST   | `/users/{telegramId}/skills`  | `{levelEnergy, levelX10, levelX100, levelX1000}`  | skills snapshot after the write |
//! | GET    | `/leaderboard`                | -                                                 | top 10 `{name, points}` |
//! | GET    | `/health`                     | -                                                 | `{"ok": true}` |
//!
//! Unknown players and unknown paths answer 404, undecodable bodies 400 and store failures 500,
//! all with a `{"error": ..}` JSON body. Every response carries wildcard
//! `Access-Control-Allow-*` headers and any `OPTIONS` request is answered 204.

mod error;
mod handlers;
mod middleware;

use anyhow::Result;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use log::info;
use tokio::net::TcpListener;

use crate::profile::ProfileService;

pub use error::{ApiError, JsonBody};
pub use handlers::{PlayerResponse, UpdateSkillsRequest};

#[derive(Clone)]
pub struct ApiState {
    pub profiles: ProfileService,
}

pub fn build_router(profiles: ProfileService) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/user", get(handlers::get_player))
        .route("/users/{telegram_id}/energy", post(handlers::update_energy))
        .route("/users/{telegram_id}/points", post(handlers::update_points))
        .route(
            "/users/{telegram_id}/skills",
            get(handlers::get_skills).post(handlers::update_skills),
        )
        .route("/leaderboard", get(handlers::get_leaderboard))
        .fallback(handlers::fallback)
        .layer(from_fn(middleware::cors))
        .layer(from_fn(middleware::log_requests))
        .with_state(ApiState { profiles })
}

/// Serve `router` on an already bound listener until the server fails.
pub async fn serve(listener: TcpListener, router: Router) -> Result<()> {
    info!("HTTP API listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
