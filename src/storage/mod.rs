//! # Player Store
//!
//! Durable keyed storage for [`PlayerRecord`]s. The [`PlayerStore`] trait is the
//! seam between the profile service and whatever persists the records:
//!
//! - [`SledPlayerStore`] - embedded sled database, one tree per configured database name
//! - [`MemoryPlayerStore`] - process-local map, used by tests
//!
//! ## Atomicity
//!
//! Each trait method is atomic for the single record it touches. A field set
//! never loses a concurrent write to a sibling field, and [`PlayerStore::set_skills`]
//! returns the record exactly as that write left it. Separate calls are not
//! atomic together: two concurrent `set_field(Energy, ..)` calls simply resolve
//! as last-write-wins.
//!
//! The methods are blocking; async callers go through
//! [`crate::profile::ProfileService`], which moves them onto the blocking pool
//! and bounds them with a timeout.

mod errors;
mod memory;
mod sled_store;

pub use errors::StoreError;
pub use memory::MemoryPlayerStore;
pub use sled_store::{SledPlayerStore, SledPlayerStoreBuilder};

use crate::player::{PlayerField, PlayerRecord, SkillLevels};

pub trait PlayerStore: Send + Sync {
    /// Point lookup by identity.
    fn get(&self, telegram_id: &str) -> Result<Option<PlayerRecord>, StoreError>;

    /// Insert `record`, or overwrite every attribute of the existing record with
    /// the same identity.
    fn replace(&self, record: PlayerRecord) -> Result<PlayerRecord, StoreError>;

    /// Set one counter. A missing record is created from the starting
    /// attributes (with an empty name) before the field is applied.
    fn set_field(
        &self,
        telegram_id: &str,
        field: PlayerField,
        value: i64,
    ) -> Result<PlayerRecord, StoreError>;

    /// Replace all four skill levels in one write and return the updated record.
    /// Upserts like [`PlayerStore::set_field`].
    fn set_skills(&self, telegram_id: &str, skills: SkillLevels)
        -> Result<PlayerRecord, StoreError>;

    /// Up to `limit` records ordered by descending points.
    fn top_by_points(&self, limit: usize) -> Result<Vec<PlayerRecord>, StoreError>;

    fn count(&self) -> Result<usize, StoreError>;
}

/// Stable descending sort by points, truncated to `limit`.
///
/// Input order decides ties, so both stores feed records in ascending identity order.
pub(crate) fn rank_by_points(mut records: Vec<PlayerRecord>, limit: usize) -> Vec<PlayerRecord> {
    records.sort_by(|a, b| b.points.cmp(&a.points));
    records.truncate(limit);
    records
}
