// Rim & Face session service - Use cases for the step-by-step measurement flow
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::report_repository::SessionRepository;
use crate::domain::alignment::{optional_finite, require_finite, RawReading};
use crate::domain::report::{normalize_text, Dimensions, IndicatorReadings};
use crate::domain::session::{DialReadings, PhysicalData, RangeCheck, SessionOutcome};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct PhysicalSubmission {
    pub h: Option<RawReading>,
    pub d: Option<RawReading>,
    pub e: Option<RawReading>,
    pub f: Option<RawReading>,
    pub g: Option<RawReading>,
    pub skip_left_side: bool,
}

#[derive(Debug, Clone, Default)]
pub struct IndicatorSubmission {
    pub r0: Option<RawReading>,
    pub r90: Option<RawReading>,
    pub r180: Option<RawReading>,
    pub r270: Option<RawReading>,
    pub f0: Option<RawReading>,
    pub f90: Option<RawReading>,
    pub f180: Option<RawReading>,
    pub f270: Option<RawReading>,
    pub sag: Option<RawReading>,
}

#[derive(Clone)]
pub struct SessionService {
    repository: Arc<dyn SessionRepository>,
}

impl SessionService {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_session(
        &self,
        machine_name: Option<String>,
        description: Option<String>,
    ) -> ServiceResult<i64> {
        let id = self
            .repository
            .create_session(
                normalize_text(machine_name.as_deref()),
                normalize_text(description.as_deref()),
            )
            .await?;
        tracing::info!(session_id = id, "started rim & face session");
        Ok(id)
    }

    /// Step 1: store swing diameter and feet distances.
    pub async fn save_physical(&self, id: i64, submission: PhysicalSubmission) -> ServiceResult<()> {
        let dimensions = Dimensions {
            h: require_finite("H", submission.h.as_ref())?,
            d: require_finite("D", submission.d.as_ref())?,
            e: require_finite("E", submission.e.as_ref())?,
        };
        let f = optional_reading("F", submission.f.as_ref())?;
        let g = optional_reading("G", submission.g.as_ref())?;
        let physical = PhysicalData::new(dimensions, submission.skip_left_side, f, g)?;

        if !self.repository.save_physical(id, physical).await? {
            return Err(ServiceError::NotFound("session"));
        }
        Ok(())
    }

    /// Step 2: store SAG-adjusted dial readings and report the range check.
    pub async fn save_readings(&self, id: i64, submission: IndicatorSubmission) -> ServiceResult<RangeCheck> {
        let readings = IndicatorReadings {
            r90: require_finite("R90", submission.r90.as_ref())?,
            r180: require_finite("R180", submission.r180.as_ref())?,
            r270: require_finite("R270", submission.r270.as_ref())?,
            f90: require_finite("F90", submission.f90.as_ref())?,
            f180: require_finite("F180", submission.f180.as_ref())?,
            f270: require_finite("F270", submission.f270.as_ref())?,
        };
        let dial = DialReadings::new(
            optional_finite("R0", submission.r0.as_ref(), 0.0)?,
            optional_finite("F0", submission.f0.as_ref(), 0.0)?,
            readings,
            optional_finite("SAG", submission.sag.as_ref(), 0.0)?,
        );

        if !self.repository.save_readings(id, dial).await? {
            return Err(ServiceError::NotFound("session"));
        }
        Ok(dial.range_check())
    }

    /// Step 3: compute corrections from the stored steps.
    pub async fn calculate(&self, id: i64) -> ServiceResult<SessionOutcome> {
        let session = self
            .repository
            .find_session(id)
            .await?
            .ok_or(ServiceError::NotFound("session"))?;

        let outcome = session.calculate()?;
        tracing::debug!(session_id = id, "calculated session corrections");
        Ok(outcome)
    }
}

fn optional_reading(field: &'static str, raw: Option<&RawReading>) -> ServiceResult<Option<f64>> {
    Ok(match raw {
        None => None,
        Some(reading) => Some(require_finite(field, Some(reading))?),
    })
}
