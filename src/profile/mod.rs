//! # Profile Service
//!
//! Orchestrates reads and upserts of [`PlayerRecord`]s on top of an injected
//! [`PlayerStore`]. This is the only API the chat commands and the HTTP layer use
//! to reach player state.
//!
//! Every store call is moved onto Tokio's blocking pool and bounded by the
//! configured operation timeout. An expired timeout fails closed with
//! [`ProfileError::Timeout`]; the underlying blocking call may still finish in
//! the background, in which case its write lands as a normal last-write-wins
//! update.
//!
//! "Not registered" is an expected outcome and surfaces as
//! [`ProfileError::NotFound`]; it is kept apart from infrastructure failures so
//! callers can answer 404 / "please register" instead of 500.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, warn};
use serde::Serialize;
use thiserror::Error;
use tokio::time::timeout;

use crate::metrics;
use crate::player::{PlayerField, PlayerRecord, SkillLevels};
use crate::storage::{PlayerStore, StoreError};

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("player not found: {0}")]
    NotFound(String),

    #[error("store operation '{op}' timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Task join failures on the blocking pool.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ProfileError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProfileError::NotFound(_))
    }
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub points: i64,
}

#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn PlayerStore>,
    op_timeout: Duration,
}

impl ProfileService {
    pub fn new(store: Arc<dyn PlayerStore>, op_timeout: Duration) -> Self {
        Self { store, op_timeout }
    }

    pub fn op_timeout(&self) -> Duration {
        self.op_timeout
    }

    async fn run<T, F>(&self, op: &'static str, call: F) -> Result<T, ProfileError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn PlayerStore) -> Result<T, StoreError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let task = tokio::task::spawn_blocking(move || call(store.as_ref()));
        match timeout(self.op_timeout, task).await {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(e))) => {
                metrics::inc_store_failures();
                error!("store operation '{}' failed: {}", op, e);
                Err(ProfileError::Store(e))
            }
            Ok(Err(join)) => {
                metrics::inc_store_failures();
                error!("store operation '{}' aborted: {}", op, join);
                Err(ProfileError::Internal(join.to_string()))
            }
            Err(_) => {
                metrics::inc_store_failures();
                warn!(
                    "store operation '{}' timed out after {:?}",
                    op, self.op_timeout
                );
                Err(ProfileError::Timeout {
                    op,
                    after: self.op_timeout,
                })
            }
        }
    }

    pub async fn get_profile(&self, telegram_id: &str) -> Result<PlayerRecord, ProfileError> {
        let id = telegram_id.to_string();
        match self.run("get", move |store| store.get(&id)).await? {
            Some(record) => Ok(record),
            None => {
                debug!("no player for telegram id {}", telegram_id);
                Err(ProfileError::NotFound(telegram_id.to_string()))
            }
        }
    }

    /// Create the player with starting attributes, or reset an existing player
    /// back to them. Progress of a returning player is discarded.
    pub async fn register_or_replace(
        &self,
        telegram_id: &str,
        display_name: &str,
    ) -> Result<PlayerRecord, ProfileError> {
        let record = PlayerRecord::new(telegram_id, display_name);
        self.run("replace", move |store| store.replace(record))
            .await
    }

    pub async fn set_field(
        &self,
        telegram_id: &str,
        field: PlayerField,
        value: i64,
    ) -> Result<(), ProfileError> {
        let id = telegram_id.to_string();
        self.run("set_field", move |store| store.set_field(&id, field, value))
            .await?;
        debug!("set {} = {} for telegram id {}", field, value, telegram_id);
        Ok(())
    }

    pub async fn set_energy(&self, telegram_id: &str, energy: i64) -> Result<(), ProfileError> {
        self.set_field(telegram_id, PlayerField::Energy, energy).await
    }

    pub async fn set_points(&self, telegram_id: &str, points: i64) -> Result<(), ProfileError> {
        self.set_field(telegram_id, PlayerField::Points, points).await
    }

    /// Replace all four levels and return the record as written.
    pub async fn set_skills(
        &self,
        telegram_id: &str,
        skills: SkillLevels,
    ) -> Result<PlayerRecord, ProfileError> {
        let id = telegram_id.to_string();
        self.run("set_skills", move |store| store.set_skills(&id, skills))
            .await
    }

    pub async fn top_players(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, ProfileError> {
        let records = self
            .run("top_by_points", move |store| store.top_by_points(limit))
            .await?;
        Ok(records
            .into_iter()
            .map(|r| LeaderboardEntry {
                name: r.name,
                points: r.points,
            })
            .collect())
    }

    pub async fn player_count(&self) -> Result<usize, ProfileError> {
        self.run("count", |store| store.count()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryPlayerStore;

    fn service() -> ProfileService {
        ProfileService::new(Arc::new(MemoryPlayerStore::new()), DEFAULT_OP_TIMEOUT)
    }

    #[tokio::test]
    async fn unknown_player_is_not_found() {
        let err = service().get_profile("nobody").await.unwrap_err();
        assert!(err.is_not_found(), "got {err:?}");
    }

    #[tokio::test]
    async fn register_resets_progress() {
        let svc = service();
        svc.register_or_replace("42", "Ada").await.unwrap();
        svc.set_points("42", 500).await.unwrap();
        svc.set_skills("42", SkillLevels::new(4, 3, 2, 2))
            .await
            .unwrap();

        let again = svc.register_or_replace("42", "Ada").await.unwrap();
        assert_eq!(again.telegram_id, "42");
        assert_eq!(again.points, 0);
        assert_eq!(again.energy, 10);
        assert_eq!(again.skills, SkillLevels::default());
        assert_eq!(svc.get_profile("42").await.unwrap(), again);
    }

    #[tokio::test]
    async fn leaderboard_maps_names_and_points() {
        let svc = service();
        svc.register_or_replace("1", "Low").await.unwrap();
        svc.register_or_replace("2", "High").await.unwrap();
        svc.set_points("2", 99).await.unwrap();
        let top = svc.top_players(DEFAULT_LEADERBOARD_LIMIT).await.unwrap();
        assert_eq!(
            top,
            vec![
                LeaderboardEntry {
                    name: "High".into(),
                    points: 99
                },
                LeaderboardEntry {
                    name: "Low".into(),
                    points: 0
                },
            ]
        );
    }
}
