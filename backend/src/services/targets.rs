//! Targets service - stateless preview of the full target bundle

use crate::error::ApiError;
use nutrition_planner_shared::types::TargetsPreviewResponse;
use nutrition_planner_shared::validation::get_missing_fields_labels;
use nutrition_planner_shared::{compute_targets, UserProfile};

pub struct TargetsService;

impl TargetsService {
    /// Recompute targets for a profile that is not stored anywhere
    ///
    /// Incomplete profiles are fine; the missing stages come back as zeros.
    pub fn preview(profile: &UserProfile) -> Result<TargetsPreviewResponse, ApiError> {
        if let Err(errors) = profile.validate() {
            if let Some(first) = errors.into_iter().next() {
                return Err(first.into());
            }
        }

        let targets = compute_targets(profile);
        Ok(TargetsPreviewResponse {
            is_complete: targets.is_complete(),
            missing_fields: get_missing_fields_labels(&profile.missing_fields()),
            targets,
        })
    }
}
