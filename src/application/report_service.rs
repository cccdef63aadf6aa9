// Report service - Use cases for submitting and reading alignment reports
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::report_repository::ReportRepository;
use crate::domain::alignment::{compute, optional_finite, RawAlignmentInput, RawReading};
use crate::domain::precision::PrecisionScorer;
use crate::domain::report::{normalize_text, NewReport, StoredReport};
use chrono::Utc;
use std::sync::Arc;

const MAX_LISTED_REPORTS: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct RawDimensions {
    pub h: Option<RawReading>,
    pub d: Option<RawReading>,
    pub e: Option<RawReading>,
}

#[derive(Debug, Clone, Default)]
pub struct RawIndicators {
    pub r90: Option<RawReading>,
    pub r180: Option<RawReading>,
    pub r270: Option<RawReading>,
    pub f90: Option<RawReading>,
    pub f180: Option<RawReading>,
    pub f270: Option<RawReading>,
}

/// A report as submitted by a client.
#[derive(Debug, Clone, Default)]
pub struct ReportSubmission {
    pub title: Option<String>,
    pub description: Option<String>,
    pub equipment_id: Option<String>,
    pub dims: Option<RawDimensions>,
    pub indicators: Option<RawIndicators>,
    pub sag: Option<RawReading>,
}

#[derive(Debug, Clone)]
pub struct ScoredReport {
    pub report: StoredReport,
    pub precision: f64,
}

#[derive(Clone)]
pub struct ReportService {
    repository: Arc<dyn ReportRepository>,
    scorer: PrecisionScorer,
}

impl ReportService {
    pub fn new(repository: Arc<dyn ReportRepository>, scorer: PrecisionScorer) -> Self {
        Self { repository, scorer }
    }

    /// Validate, recompute the corrections from the submitted readings and persist.
    pub async fn create_report(&self, user_id: i64, submission: ReportSubmission) -> ServiceResult<i64> {
        let dims = submission
            .dims
            .filter(has_dimensions)
            .ok_or_else(|| ServiceError::Validation("Missing H, D or E".to_string()))?;
        let indicators = submission
            .indicators
            .ok_or_else(|| ServiceError::Validation("Missing indicator readings".to_string()))?;

        let raw = RawAlignmentInput {
            r90: indicators.r90,
            r180: indicators.r180,
            r270: indicators.r270,
            f90: indicators.f90,
            f180: indicators.f180,
            f270: indicators.f270,
            h: dims.h,
            d: dims.d,
            e: dims.e,
        };
        let input = raw.parse()?;
        let result = compute(&input)?;
        let sag = optional_finite("SAG", submission.sag.as_ref(), 0.0)?;

        let report = NewReport {
            user_id,
            title: normalize_text(submission.title.as_deref()),
            description: normalize_text(submission.description.as_deref()),
            equipment_id: normalize_text(submission.equipment_id.as_deref()),
            input,
            result,
            sag,
            created_at: Utc::now(),
        };

        let id = self.repository.insert_report(report).await?;
        tracing::info!(report_id = id, user_id, "created alignment report");
        Ok(id)
    }

    pub async fn list_reports(&self, user_id: i64) -> ServiceResult<Vec<ScoredReport>> {
        let reports = self
            .repository
            .list_reports_by_user(user_id, MAX_LISTED_REPORTS)
            .await?;
        Ok(reports.into_iter().map(|r| self.scored(r)).collect())
    }

    pub async fn get_report(&self, user_id: i64, id: i64) -> ServiceResult<ScoredReport> {
        match self.repository.find_report(id, user_id).await? {
            Some(report) => Ok(self.scored(report)),
            None => {
                tracing::debug!(report_id = id, user_id, "report not found");
                Err(ServiceError::NotFound("report"))
            }
        }
    }

    fn scored(&self, report: StoredReport) -> ScoredReport {
        let precision = self.scorer.score(&report.results);
        ScoredReport { report, precision }
    }
}

/// H, D and E must all be present, numeric and non-zero.
fn has_dimensions(dims: &RawDimensions) -> bool {
    [&dims.h, &dims.d, &dims.e]
        .into_iter()
        .all(|raw| raw.as_ref().and_then(RawReading::to_finite).is_some_and(|v| v != 0.0))
}
