//! Intake service - logging consumption and daily progress reports

use crate::config::LimitsConfig;
use crate::error::ApiError;
use crate::repositories::{CreateIntakeLog, IntakeOutcome, ProfileStore};
use crate::services::ProfileService;
use chrono::{NaiveDate, Utc};
use nutrition_planner_shared::{daily_report_in, EnergyUnit};
use nutrition_planner_shared::types::{DailyReportResponse, IntakeLogResponse, LogIntakeRequest};
use tracing::debug;
use uuid::Uuid;

pub struct IntakeService;

impl IntakeService {
    /// Log one entry against a profile's day
    pub async fn log(
        store: &dyn ProfileStore,
        limits: &LimitsConfig,
        profile_id: Uuid,
        req: LogIntakeRequest,
    ) -> Result<IntakeLogResponse, ApiError> {
        req.entry.validate()?;

        if store.find(profile_id).await?.is_none() {
            return Err(ApiError::NotFound(format!(
                "Profile {} not found",
                profile_id
            )));
        }

        let date = req.date.unwrap_or_else(today);
        let input = CreateIntakeLog {
            profile_id,
            date,
            entry: req.entry,
        };
        let record = match store
            .add_intake(input, limits.max_intake_entries_per_day)
            .await?
        {
            IntakeOutcome::Logged(record) => record,
            IntakeOutcome::DailyLimitReached => {
                return Err(ApiError::Validation(format!(
                    "At most {} intake entries can be logged per day",
                    limits.max_intake_entries_per_day
                )))
            }
        };

        debug!(profile_id = %profile_id, %date, "Intake logged");
        Ok(IntakeLogResponse {
            id: record.id.to_string(),
            date: record.date,
            entry: record.entry,
            logged_at: record.logged_at,
        })
    }

    /// Progress toward the finalized targets for one day
    ///
    /// Calories are reported in `energy_unit`; nutrients keep their own units.
    pub async fn report(
        store: &dyn ProfileStore,
        profile_id: Uuid,
        date: Option<NaiveDate>,
        energy_unit: EnergyUnit,
    ) -> Result<DailyReportResponse, ApiError> {
        let targets = ProfileService::load_targets(store, profile_id).await?;
        let date = date.unwrap_or_else(today);
        let entries: Vec<_> = store
            .intake_for_day(profile_id, date)
            .await?
            .into_iter()
            .map(|record| record.entry)
            .collect();

        Ok(DailyReportResponse {
            date,
            report: daily_report_in(&targets, &entries, energy_unit),
        })
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
