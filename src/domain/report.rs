// Alignment report domain model
use super::alignment::{AlignmentInput, AlignmentResult};
use super::precision::PartialResult;
use chrono::{DateTime, Duration, Utc};

pub const RIM_FACE_METHOD: &str = "RIM_FACE";

/// Reports newer than this with no title or description are still in progress.
const IN_PROGRESS_WINDOW_HOURS: i64 = 48;

/// Swing diameter and feet distances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub h: f64,
    pub d: f64,
    pub e: f64,
}

/// Rim and face readings at 90/180/270 degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorReadings {
    pub r90: f64,
    pub r180: f64,
    pub r270: f64,
    pub f90: f64,
    pub f180: f64,
    pub f270: f64,
}

impl IndicatorReadings {
    pub fn with_dimensions(&self, dims: &Dimensions) -> AlignmentInput {
        AlignmentInput {
            r90: self.r90,
            r180: self.r180,
            r270: self.r270,
            f90: self.f90,
            f180: self.f180,
            f270: self.f270,
            h: dims.h,
            d: dims.d,
            e: dims.e,
        }
    }
}

impl From<&AlignmentInput> for Dimensions {
    fn from(input: &AlignmentInput) -> Self {
        Self {
            h: input.h,
            d: input.d,
            e: input.e,
        }
    }
}

impl From<&AlignmentInput> for IndicatorReadings {
    fn from(input: &AlignmentInput) -> Self {
        Self {
            r90: input.r90,
            r180: input.r180,
            r270: input.r270,
            f90: input.f90,
            f180: input.f180,
            f270: input.f270,
        }
    }
}

/// A report about to be persisted. The result always comes from the calculator.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub user_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub equipment_id: Option<String>,
    pub input: AlignmentInput,
    pub result: AlignmentResult,
    pub sag: f64,
    pub created_at: DateTime<Utc>,
}

/// A persisted report. Snapshots are decoded leniently, so any part may be missing.
#[derive(Debug, Clone)]
pub struct StoredReport {
    pub id: i64,
    pub user_id: i64,
    pub method: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub equipment_id: Option<String>,
    pub dimensions: Option<Dimensions>,
    pub readings: Option<IndicatorReadings>,
    pub results: PartialResult,
    pub sag: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    Completed,
    InProgress,
    Pending,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Completed => "COMPLETED",
            ReportStatus::InProgress => "IN_PROGRESS",
            ReportStatus::Pending => "PENDING",
        }
    }
}

impl StoredReport {
    /// Title, then equipment id, then a generated name.
    pub fn display_name(&self) -> String {
        non_blank(self.title.as_deref())
            .or_else(|| non_blank(self.equipment_id.as_deref()))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Report #{}", self.id))
    }

    pub fn status(&self, now: DateTime<Utc>) -> ReportStatus {
        if self.title.is_some() || self.description.is_some() {
            ReportStatus::Completed
        } else if now - self.created_at <= Duration::hours(IN_PROGRESS_WINDOW_HOURS) {
            ReportStatus::InProgress
        } else {
            ReportStatus::Pending
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Trim free text; blank becomes `None`.
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    non_blank(value).map(str::to_string)
}
