//! Profile store: onboarding profiles, finalized target snapshots and
//! intake logs

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use nutrition_planner_shared::{IntakeEntry, ProfileError, UserProfile};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Stored profile
#[derive(Debug, Clone)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub profile: UserProfile,
    /// Flattened targets written at finalization
    pub target_fields: Option<BTreeMap<String, f64>>,
    pub finalized_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored intake entry
#[derive(Debug, Clone)]
pub struct IntakeRecord {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub date: NaiveDate,
    pub entry: IntakeEntry,
    pub logged_at: DateTime<Utc>,
}

/// Input for logging intake
#[derive(Debug, Clone)]
pub struct CreateIntakeLog {
    pub profile_id: Uuid,
    pub date: NaiveDate,
    pub entry: IntakeEntry,
}

/// Change applied to a stored profile
///
/// Runs while the store holds the record, so concurrent edits never see
/// each other's half-applied state. An error leaves the record untouched.
pub type ProfileEdit = Box<dyn FnOnce(&mut UserProfile) -> Result<(), ProfileError> + Send>;

/// Result of [`ProfileStore::edit_profile`]
#[derive(Debug)]
pub enum EditOutcome {
    Saved(ProfileRecord),
    Rejected(ProfileError),
    NotFound,
}

/// Result of [`ProfileStore::add_intake`]
#[derive(Debug)]
pub enum IntakeOutcome {
    Logged(IntakeRecord),
    DailyLimitReached,
}

/// Persistence seam for profiles and intake
///
/// Lookups return `Ok(None)` for unknown ids; errors are reserved for the
/// storage itself failing.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Create an empty profile
    async fn create(&self) -> Result<ProfileRecord>;

    async fn find(&self, id: Uuid) -> Result<Option<ProfileRecord>>;

    /// Read, edit and write back a profile as one step
    async fn edit_profile(&self, id: Uuid, edit: ProfileEdit) -> Result<EditOutcome>;

    /// Store the finalized target fields
    async fn save_targets(
        &self,
        id: Uuid,
        fields: BTreeMap<String, f64>,
    ) -> Result<Option<ProfileRecord>>;

    /// Log an entry unless the day already holds `max_per_day` entries
    ///
    /// The count and the insert happen as one step.
    async fn add_intake(&self, input: CreateIntakeLog, max_per_day: usize)
        -> Result<IntakeOutcome>;

    /// Intake logged for one day, oldest first
    async fn intake_for_day(&self, profile_id: Uuid, date: NaiveDate) -> Result<Vec<IntakeRecord>>;

    /// Check the store can serve requests
    ///
    /// Stores without an external backend have nothing to check and are
    /// always ready.
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<Uuid, ProfileRecord>>,
    intake: RwLock<HashMap<(Uuid, NaiveDate), Vec<IntakeRecord>>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn create(&self) -> Result<ProfileRecord> {
        let now = Utc::now();
        let record = ProfileRecord {
            id: Uuid::new_v4(),
            profile: UserProfile::default(),
            target_fields: None,
            finalized_at: None,
            created_at: now,
            updated_at: now,
        };
        self.profiles
            .write()
            .await
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn find(&self, id: Uuid) -> Result<Option<ProfileRecord>> {
        Ok(self.profiles.read().await.get(&id).cloned())
    }

    async fn edit_profile(&self, id: Uuid, edit: ProfileEdit) -> Result<EditOutcome> {
        let mut profiles = self.profiles.write().await;
        let Some(record) = profiles.get_mut(&id) else {
            return Ok(EditOutcome::NotFound);
        };

        let mut profile = record.profile.clone();
        if let Err(err) = edit(&mut profile) {
            return Ok(EditOutcome::Rejected(err));
        }
        record.profile = profile;
        record.updated_at = Utc::now();
        Ok(EditOutcome::Saved(record.clone()))
    }

    async fn save_targets(
        &self,
        id: Uuid,
        fields: BTreeMap<String, f64>,
    ) -> Result<Option<ProfileRecord>> {
        let mut profiles = self.profiles.write().await;
        Ok(profiles.get_mut(&id).map(|record| {
            let now = Utc::now();
            record.target_fields = Some(fields);
            record.finalized_at = Some(now);
            record.updated_at = now;
            record.clone()
        }))
    }

    async fn add_intake(
        &self,
        input: CreateIntakeLog,
        max_per_day: usize,
    ) -> Result<IntakeOutcome> {
        let mut intake = self.intake.write().await;
        let day = intake.entry((input.profile_id, input.date)).or_default();
        if day.len() >= max_per_day {
            return Ok(IntakeOutcome::DailyLimitReached);
        }

        let record = IntakeRecord {
            id: Uuid::new_v4(),
            profile_id: input.profile_id,
            date: input.date,
            entry: input.entry,
            logged_at: Utc::now(),
        };
        day.push(record.clone());
        Ok(IntakeOutcome::Logged(record))
    }

    async fn intake_for_day(&self, profile_id: Uuid, date: NaiveDate) -> Result<Vec<IntakeRecord>> {
        Ok(self
            .intake
            .read()
            .await
            .get(&(profile_id, date))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutrition_planner_shared::{Gender, Goal};
    use std::sync::Arc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn log(profile_id: Uuid, date: NaiveDate) -> CreateIntakeLog {
        CreateIntakeLog {
            profile_id,
            date,
            entry: IntakeEntry::default(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = InMemoryProfileStore::new();
        let created = store.create().await.unwrap();
        let found = store.find(created.id).await.unwrap().unwrap();
        assert_eq!(found.profile, UserProfile::default());
        assert!(found.finalized_at.is_none());
        assert!(store.find(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_edit_unknown_profile() {
        let store = InMemoryProfileStore::new();
        let outcome = store
            .edit_profile(Uuid::new_v4(), Box::new(|_: &mut UserProfile| Ok(())))
            .await
            .unwrap();
        assert!(matches!(outcome, EditOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_rejected_edit_leaves_record_untouched() {
        let store = InMemoryProfileStore::new();
        let id = store.create().await.unwrap().id;

        let outcome = store
            .edit_profile(
                id,
                Box::new(|profile: &mut UserProfile| {
                    profile.gender = Some(Gender::Male);
                    Err(ProfileError::InvalidField {
                        field: "age".to_string(),
                        message: "too young".to_string(),
                    })
                }),
            )
            .await
            .unwrap();
        assert!(matches!(outcome, EditOutcome::Rejected(_)));
        assert_eq!(store.find(id).await.unwrap().unwrap().profile, UserProfile::default());
    }

    #[tokio::test]
    async fn test_edit_and_save_targets() {
        let store = InMemoryProfileStore::new();
        let id = store.create().await.unwrap().id;

        let outcome = store
            .edit_profile(id, Box::new(|p: &mut UserProfile| {
                p.gender = Some(Gender::Female);
                Ok(())
            }))
            .await
            .unwrap();
        let EditOutcome::Saved(updated) = outcome else {
            panic!("edit should be saved");
        };
        assert_eq!(updated.profile.gender, Some(Gender::Female));

        let fields = BTreeMap::from([("bmrKcal".to_string(), 1400.0)]);
        let saved = store.save_targets(id, fields.clone()).await.unwrap().unwrap();
        assert_eq!(saved.target_fields, Some(fields));
        assert!(saved.finalized_at.is_some());
    }

    #[tokio::test]
    async fn test_intake_is_grouped_by_day() {
        let store = InMemoryProfileStore::new();
        let id = store.create().await.unwrap().id;

        for d in [1, 1, 2] {
            store.add_intake(log(id, day(d)), 10).await.unwrap();
        }

        assert_eq!(store.intake_for_day(id, day(1)).await.unwrap().len(), 2);
        assert_eq!(store.intake_for_day(id, day(2)).await.unwrap().len(), 1);
        assert!(store.intake_for_day(id, day(3)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_daily_limit_is_per_day() {
        let store = InMemoryProfileStore::new();
        let id = store.create().await.unwrap().id;

        let first = store.add_intake(log(id, day(1)), 1).await.unwrap();
        assert!(matches!(first, IntakeOutcome::Logged(_)));
        let second = store.add_intake(log(id, day(1)), 1).await.unwrap();
        assert!(matches!(second, IntakeOutcome::DailyLimitReached));
        let next_day = store.add_intake(log(id, day(2)), 1).await.unwrap();
        assert!(matches!(next_day, IntakeOutcome::Logged(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_logs_never_exceed_limit() {
        let store = Arc::new(InMemoryProfileStore::new());
        let id = store.create().await.unwrap().id;

        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.add_intake(log(id, day(1)), 5).await.unwrap() })
            })
            .collect();

        let mut logged = 0;
        for task in tasks {
            if let IntakeOutcome::Logged(_) = task.await.unwrap() {
                logged += 1;
            }
        }
        assert_eq!(logged, 5);
        assert_eq!(store.intake_for_day(id, day(1)).await.unwrap().len(), 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_edits_keep_every_field() {
        let store = Arc::new(InMemoryProfileStore::new());
        let id = store.create().await.unwrap().id;

        let gender = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .edit_profile(id, Box::new(|p: &mut UserProfile| {
                        p.gender = Some(Gender::Male);
                        Ok(())
                    }))
                    .await
                    .unwrap()
            })
        };
        let goal = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .edit_profile(id, Box::new(|p: &mut UserProfile| {
                        p.goal = Some(Goal::WeightGain);
                        Ok(())
                    }))
                    .await
                    .unwrap()
            })
        };
        gender.await.unwrap();
        goal.await.unwrap();

        let profile = store.find(id).await.unwrap().unwrap().profile;
        assert_eq!(profile.gender, Some(Gender::Male));
        assert_eq!(profile.goal, Some(Goal::WeightGain));
    }

    #[tokio::test]
    async fn test_in_memory_store_is_always_ready() {
        assert!(InMemoryProfileStore::new().health_check().await.is_ok());
    }
}
