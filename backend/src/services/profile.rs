//! Profile service - onboarding profiles and finalized targets

use crate::error::ApiError;
use crate::repositories::{EditOutcome, ProfileRecord, ProfileStore};
use nutrition_planner_shared::types::{
    ProfileResponse, StoredTargetsResponse, UpdateProfileRequest,
};
use nutrition_planner_shared::validation::get_missing_fields_labels;
use nutrition_planner_shared::{compute_targets, NutritionTargets, ProfileError, UserProfile};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

/// Profile service for onboarding operations
pub struct ProfileService;

impl ProfileService {
    /// Create an empty profile
    pub async fn create(store: &dyn ProfileStore) -> Result<ProfileResponse, ApiError> {
        let record = store.create().await?;
        info!(profile_id = %record.id, "Profile created");
        Ok(Self::to_response(record))
    }

    /// Get a profile with a fresh target preview
    pub async fn get(store: &dyn ProfileStore, id: Uuid) -> Result<ProfileResponse, ApiError> {
        let record = Self::find(store, id).await?;
        Ok(Self::to_response(record))
    }

    /// Merge one onboarding step into the profile
    ///
    /// The stored targets are left alone until the profile is finalized again.
    pub async fn update(
        store: &dyn ProfileStore,
        id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<ProfileResponse, ApiError> {
        req.validate()?;

        let edit = Box::new(move |profile: &mut UserProfile| -> Result<(), ProfileError> {
            req.apply_to(profile)?;
            match profile.validate() {
                Err(errors) => match errors.into_iter().next() {
                    Some(first) => Err(ProfileError::InvalidField {
                        field: first.field,
                        message: first.message,
                    }),
                    None => Ok(()),
                },
                Ok(()) => Ok(()),
            }
        });

        let record = match store.edit_profile(id, edit).await? {
            EditOutcome::Saved(record) => record,
            EditOutcome::Rejected(err) => return Err(err.into()),
            EditOutcome::NotFound => return Err(Self::not_found(id)),
        };

        debug!(profile_id = %id, missing = ?record.profile.missing_fields(), "Profile updated");
        Ok(Self::to_response(record))
    }

    /// Compute the targets and store them as flat fields
    pub async fn finalize(
        store: &dyn ProfileStore,
        id: Uuid,
    ) -> Result<StoredTargetsResponse, ApiError> {
        let record = Self::find(store, id).await?;
        let profile = &record.profile;

        let missing = profile.missing_fields();
        if !missing.is_empty() {
            return Err(ApiError::Incomplete(get_missing_fields_labels(&missing)));
        }
        Self::validate_profile(profile)?;

        let targets = compute_targets(profile);
        if !targets.is_complete() {
            return Err(ApiError::Validation(
                "Targets could not be computed for this profile".to_string(),
            ));
        }

        let record = store
            .save_targets(id, targets.to_fields())
            .await?
            .ok_or_else(|| Self::not_found(id))?;

        info!(
            profile_id = %id,
            calories = targets.plan.daily_calorie_target_kcal,
            "Profile finalized"
        );
        Self::stored_response(record)
    }

    /// Targets stored at the last finalization
    pub async fn stored_targets(
        store: &dyn ProfileStore,
        id: Uuid,
    ) -> Result<StoredTargetsResponse, ApiError> {
        let record = Self::find(store, id).await?;
        Self::stored_response(record)
    }

    /// Stored targets decoded for reporting
    pub async fn load_targets(
        store: &dyn ProfileStore,
        id: Uuid,
    ) -> Result<NutritionTargets, ApiError> {
        Ok(Self::stored_targets(store, id).await?.targets)
    }

    async fn find(store: &dyn ProfileStore, id: Uuid) -> Result<ProfileRecord, ApiError> {
        store.find(id).await?.ok_or_else(|| Self::not_found(id))
    }

    fn not_found(id: Uuid) -> ApiError {
        ApiError::NotFound(format!("Profile {} not found", id))
    }

    fn validate_profile(profile: &UserProfile) -> Result<(), ApiError> {
        match profile.validate() {
            Ok(()) => Ok(()),
            Err(errors) => match errors.into_iter().next() {
                Some(first) => Err(first.into()),
                None => Ok(()),
            },
        }
    }

    fn stored_response(record: ProfileRecord) -> Result<StoredTargetsResponse, ApiError> {
        let (fields, finalized_at) = match (record.target_fields, record.finalized_at) {
            (Some(fields), Some(at)) => (fields, at),
            _ => {
                return Err(ApiError::NotFound(format!(
                    "Profile {} has not been finalized",
                    record.id
                )))
            }
        };
        let targets = NutritionTargets::from_fields(&fields)?;

        Ok(StoredTargetsResponse {
            profile_id: record.id.to_string(),
            finalized_at,
            fields,
            targets,
        })
    }

    fn to_response(record: ProfileRecord) -> ProfileResponse {
        let missing_fields = get_missing_fields_labels(&record.profile.missing_fields());
        let preview = compute_targets(&record.profile);

        ProfileResponse {
            id: record.id.to_string(),
            profile: record.profile,
            missing_fields,
            preview,
            finalized_at: record.finalized_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
