use std::path::{Path, PathBuf};

use log::{debug, warn};
use sled::IVec;

use super::{rank_by_points, PlayerStore, StoreError};
use crate::player::{PlayerField, PlayerRecord, SkillLevels, PLAYER_SCHEMA_VERSION};

pub const DEFAULT_TREE: &str = "clicker";

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct SledPlayerStoreBuilder {
    path: PathBuf,
    tree: String,
}

impl SledPlayerStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tree: DEFAULT_TREE.to_string(),
        }
    }

    /// Name of the sled tree holding the player records (the "database name").
    pub fn tree(mut self, name: impl Into<String>) -> Self {
        self.tree = name.into();
        self
    }

    pub fn open(self) -> Result<SledPlayerStore, StoreError> {
        SledPlayerStore::open_with_tree(self.path, &self.tree)
    }
}

/// Sled-backed persistence for player records, keyed by Telegram identity.
pub struct SledPlayerStore {
    _db: sled::Db,
    players: sled::Tree,
}

impl SledPlayerStore {
    /// Open (or create) the store rooted at `path` using the default tree.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::open_with_tree(path, DEFAULT_TREE)
    }

    fn open_with_tree<P: AsRef<Path>>(path: P, tree: &str) -> Result<Self, StoreError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let players = db.open_tree(tree)?;
        debug!(
            "opened player store at {} (tree '{}', {} records)",
            path_ref.display(),
            tree,
            players.len()
        );
        Ok(Self { _db: db, players })
    }

    fn key(telegram_id: &str) -> &[u8] {
        telegram_id.as_bytes()
    }

    fn serialize(record: &PlayerRecord) -> Result<Vec<u8>, StoreError> {
        Ok(bincode::serialize(record)?)
    }

    fn deserialize(bytes: &[u8]) -> Result<PlayerRecord, StoreError> {
        let record: PlayerRecord = bincode::deserialize(bytes)?;
        if record.schema_version != PLAYER_SCHEMA_VERSION {
            return Err(StoreError::SchemaMismatch {
                entity: "player",
                expected: PLAYER_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    /// Read-modify-write of one record guarded by compare-and-swap. A concurrent
    /// writer makes the swap fail and the edit is re-applied on the fresh value.
    fn modify<F>(&self, telegram_id: &str, edit: F) -> Result<PlayerRecord, StoreError>
    where
        F: Fn(&mut PlayerRecord),
    {
        let key = Self::key(telegram_id);
        loop {
            let current: Option<IVec> = self.players.get(key)?;
            let mut record = match current.as_deref() {
                Some(bytes) => Self::deserialize(bytes)?,
                None => PlayerRecord::new(telegram_id, ""),
            };
            edit(&mut record);
            let bytes = Self::serialize(&record)?;
            match self.players.compare_and_swap(key, current, Some(bytes))? {
                Ok(()) => {
                    self.players.flush()?;
                    return Ok(record);
                }
                Err(_) => {
                    debug!("concurrent write on player {}, retrying", telegram_id);
                }
            }
        }
    }
}

impl PlayerStore for SledPlayerStore {
    fn get(&self, telegram_id: &str) -> Result<Option<PlayerRecord>, StoreError> {
        let Some(bytes) = self.players.get(Self::key(telegram_id))? else {
            return Ok(None);
        };
        Self::deserialize(&bytes).map(Some)
    }

    fn replace(&self, mut record: PlayerRecord) -> Result<PlayerRecord, StoreError> {
        record.schema_version = PLAYER_SCHEMA_VERSION;
        let bytes = Self::serialize(&record)?;
        self.players.insert(Self::key(&record.telegram_id), bytes)?;
        self.players.flush()?;
        Ok(record)
    }

    fn set_field(
        &self,
        telegram_id: &str,
        field: PlayerField,
        value: i64,
    ) -> Result<PlayerRecord, StoreError> {
        self.modify(telegram_id, |record| record.set_field(field, value))
    }

    fn set_skills(
        &self,
        telegram_id: &str,
        skills: SkillLevels,
    ) -> Result<PlayerRecord, StoreError> {
        self.modify(telegram_id, |record| record.skills = skills)
    }

    fn top_by_points(&self, limit: usize) -> Result<Vec<PlayerRecord>, StoreError> {
        let mut records = Vec::new();
        for entry in self.players.iter() {
            let (key, value) = entry?;
            match Self::deserialize(&value) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    "skipping undecodable player {}: {}",
                    String::from_utf8_lossy(&key),
                    e
                ),
            }
        }
        Ok(rank_by_points(records, limit))
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.players.len())
    }
}
