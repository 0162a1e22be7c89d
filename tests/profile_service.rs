//! Profile service behaviour on top of the sled store and on misbehaving stores.

use std::sync::Arc;
use std::time::Duration;

use clickerd::economy::skills_snapshot;
use clickerd::player::{PlayerField, PlayerRecord, SkillLevels};
use clickerd::profile::{ProfileError, ProfileService, DEFAULT_OP_TIMEOUT};
use clickerd::storage::{PlayerStore, SledPlayerStoreBuilder, StoreError};

fn sled_service(dir: &tempfile::TempDir) -> ProfileService {
    let store = SledPlayerStoreBuilder::new(dir.path())
        .tree("profiles")
        .open()
        .expect("open sled store");
    ProfileService::new(Arc::new(store), DEFAULT_OP_TIMEOUT)
}

/// Store whose every call fails.
struct BrokenStore;

impl PlayerStore for BrokenStore {
    fn get(&self, _: &str) -> Result<Option<PlayerRecord>, StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }
    fn replace(&self, _: PlayerRecord) -> Result<PlayerRecord, StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }
    fn set_field(&self, _: &str, _: PlayerField, _: i64) -> Result<PlayerRecord, StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }
    fn set_skills(&self, _: &str, _: SkillLevels) -> Result<PlayerRecord, StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }
    fn top_by_points(&self, _: usize) -> Result<Vec<PlayerRecord>, StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }
    fn count(&self) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }
}

/// Store that answers only after `delay`.
struct SlowStore {
    delay: Duration,
}

impl SlowStore {
    fn wait(&self) {
        std::thread::sleep(self.delay);
    }
}

impl PlayerStore for SlowStore {
    fn get(&self, id: &str) -> Result<Option<PlayerRecord>, StoreError> {
        self.wait();
        Ok(Some(PlayerRecord::new(id, "late")))
    }
    fn replace(&self, record: PlayerRecord) -> Result<PlayerRecord, StoreError> {
        self.wait();
        Ok(record)
    }
    fn set_field(&self, id: &str, _: PlayerField, _: i64) -> Result<PlayerRecord, StoreError> {
        self.wait();
        Ok(PlayerRecord::new(id, ""))
    }
    fn set_skills(&self, id: &str, _: SkillLevels) -> Result<PlayerRecord, StoreError> {
        self.wait();
        Ok(PlayerRecord::new(id, ""))
    }
    fn top_by_points(&self, _: usize) -> Result<Vec<PlayerRecord>, StoreError> {
        self.wait();
        Ok(Vec::new())
    }
    fn count(&self) -> Result<usize, StoreError> {
        self.wait();
        Ok(0)
    }
}

#[tokio::test]
async fn registered_player_upgrades_energy() {
    let dir = tempfile::tempdir().unwrap();
    let profiles = sled_service(&dir);

    profiles.register_or_replace("42", "Ada").await.unwrap();
    let updated = profiles
        .set_skills("42", SkillLevels::new(2, 1, 1, 1))
        .await
        .unwrap();

    let snap = skills_snapshot(&updated);
    assert_eq!(snap.level_energy, 2);
    assert_eq!(snap.max_energy, 20.0);
    assert_eq!(snap.cost_upgrade_energy, 15);

    let stored = profiles.get_profile("42").await.unwrap();
    assert_eq!(stored.name, "Ada");
    assert_eq!(stored.skills, SkillLevels::new(2, 1, 1, 1));
}

#[tokio::test]
async fn counter_writes_keep_sibling_fields() {
    let dir = tempfile::tempdir().unwrap();
    let profiles = sled_service(&dir);
    profiles.register_or_replace("7", "Bob").await.unwrap();
    profiles
        .set_skills("7", SkillLevels::new(3, 2, 1, 4))
        .await
        .unwrap();

    profiles.set_points("7", 900).await.unwrap();
    profiles.set_energy("7", 12).await.unwrap();

    let player = profiles.get_profile("7").await.unwrap();
    assert_eq!(player.points, 900);
    assert_eq!(player.energy, 12);
    assert_eq!(player.name, "Bob");
    assert_eq!(player.skills, SkillLevels::new(3, 2, 1, 4));
}

#[tokio::test]
async fn concurrent_field_writes_both_land() {
    let dir = tempfile::tempdir().unwrap();
    let profiles = sled_service(&dir);
    profiles.register_or_replace("9", "Cy").await.unwrap();

    let mut handles = Vec::new();
    for i in 0..20i64 {
        let p = profiles.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                p.set_points("9", 1000).await
            } else {
                p.set_energy("9", 55).await
            }
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }

    let player = profiles.get_profile("9").await.unwrap();
    assert_eq!(player.points, 1000);
    assert_eq!(player.energy, 55);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_writes_to_one_field_leave_one_winner() {
    let dir = tempfile::tempdir().unwrap();
    let profiles = sled_service(&dir);
    profiles.register_or_replace("11", "Dee").await.unwrap();
    profiles
        .set_skills("11", SkillLevels::new(4, 3, 2, 1))
        .await
        .unwrap();
    profiles.set_points("11", 640).await.unwrap();
    let before = profiles.get_profile("11").await.unwrap();

    let written: Vec<i64> = (1..=16).map(|i| i * 100 + 7).collect();
    let mut handles = Vec::new();
    for value in written.iter().copied() {
        let p = profiles.clone();
        handles.push(tokio::spawn(async move { p.set_energy("11", value).await }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }

    let after = profiles.get_profile("11").await.unwrap();
    assert!(
        written.contains(&after.energy),
        "energy {} was never written",
        after.energy
    );
    assert_eq!(after.points, before.points);
    assert_eq!(after.skills, before.skills);
    assert_eq!(after.name, before.name);
}

#[tokio::test]
async fn writes_to_unknown_player_create_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let profiles = sled_service(&dir);

    profiles.set_points("100", 5).await.unwrap();
    let player = profiles.get_profile("100").await.unwrap();
    assert_eq!(player.points, 5);
    assert_eq!(player.energy, 10);
    assert_eq!(player.name, "");
    assert_eq!(player.skills, SkillLevels::default());

    let created = profiles
        .set_skills("101", SkillLevels::new(1, 2, 1, 1))
        .await
        .unwrap();
    assert_eq!(created.points, 0);
    assert_eq!(profiles.player_count().await.unwrap(), 2);
}

#[tokio::test]
async fn leaderboard_is_ordered_and_capped() {
    let dir = tempfile::tempdir().unwrap();
    let profiles = sled_service(&dir);
    for i in 0..14i64 {
        let id = format!("{}", 1000 + i);
        profiles
            .register_or_replace(&id, &format!("p{}", i))
            .await
            .unwrap();
        profiles.set_points(&id, (i * 37) % 23).await.unwrap();
    }

    let top = profiles.top_players(10).await.unwrap();
    assert_eq!(top.len(), 10);
    assert!(top.windows(2).all(|w| w[0].points >= w[1].points));
    assert_eq!(top[0].points, 21);
}

#[tokio::test]
async fn store_failures_are_not_not_found() {
    let profiles = ProfileService::new(Arc::new(BrokenStore), DEFAULT_OP_TIMEOUT);
    let err = profiles.get_profile("42").await.unwrap_err();
    assert!(matches!(err, ProfileError::Store(_)), "got {err:?}");
    assert!(!err.is_not_found());
    assert!(profiles.set_points("42", 1).await.is_err());
    assert!(profiles.top_players(10).await.is_err());
}

#[tokio::test]
async fn slow_store_times_out() {
    let profiles = ProfileService::new(
        Arc::new(SlowStore {
            delay: Duration::from_millis(500),
        }),
        Duration::from_millis(50),
    );
    let err = profiles.get_profile("42").await.unwrap_err();
    match err {
        ProfileError::Timeout { op, after } => {
            assert_eq!(op, "get");
            assert_eq!(after, Duration::from_millis(50));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let profiles = sled_service(&dir);
        profiles.register_or_replace("5", "Eve").await.unwrap();
        profiles.set_points("5", 77).await.unwrap();
    }
    let profiles = sled_service(&dir);
    let player = profiles.get_profile("5").await.unwrap();
    assert_eq!((player.name.as_str(), player.points), ("Eve", 77));
}
