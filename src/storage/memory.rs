use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::{rank_by_points, PlayerStore, StoreError};
use crate::player::{PlayerField, PlayerRecord, SkillLevels, PLAYER_SCHEMA_VERSION};

/// In-process store. Every operation holds the map lock for its whole duration,
/// which gives the same per-record atomicity as the sled store.
#[derive(Debug, Default)]
pub struct MemoryPlayerStore {
    players: Mutex<BTreeMap<String, PlayerRecord>>,
}

impl MemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, PlayerRecord>>, StoreError> {
        self.players
            .lock()
            .map_err(|_| StoreError::Unavailable("player map lock poisoned".to_string()))
    }

    fn modify<F>(&self, telegram_id: &str, edit: F) -> Result<PlayerRecord, StoreError>
    where
        F: FnOnce(&mut PlayerRecord),
    {
        let mut players = self.lock()?;
        let record = players
            .entry(telegram_id.to_string())
            .or_insert_with(|| PlayerRecord::new(telegram_id, ""));
        edit(record);
        Ok(record.clone())
    }
}

impl PlayerStore for MemoryPlayerStore {
    fn get(&self, telegram_id: &str) -> Result<Option<PlayerRecord>, StoreError> {
        Ok(self.lock()?.get(telegram_id).cloned())
    }

    fn replace(&self, mut record: PlayerRecord) -> Result<PlayerRecord, StoreError> {
        record.schema_version = PLAYER_SCHEMA_VERSION;
        self.lock()?
            .insert(record.telegram_id.clone(), record.clone());
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
        let records = self.lock()?.values().cloned().collect();
        Ok(rank_by_points(records, limit))
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }
}
