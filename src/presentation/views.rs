// Wire shapes for requests and responses
use crate::application::dashboard_service::RecentReport;
use crate::application::report_service::{RawDimensions, RawIndicators, ReportSubmission, ScoredReport};
use crate::application::session_service::{IndicatorSubmission, PhysicalSubmission};
use crate::domain::alignment::{AlignmentResult, RawAlignmentInput, RawReading};
use crate::domain::dashboard::{DashboardDelta, DashboardStats};
use crate::domain::precision::PartialResult;
use crate::domain::report::{Dimensions, IndicatorReadings};
use crate::domain::session::{RangeCheck, SessionOutcome};
use serde::{de::IgnoredAny, Deserialize, Serialize};

/// A reading as sent by the client: a number, a string, or something unusable.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireReading {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl From<WireReading> for RawReading {
    fn from(wire: WireReading) -> Self {
        match wire {
            WireReading::Number(n) => RawReading::Number(n),
            WireReading::Text(s) => RawReading::Text(s),
            WireReading::Other(_) => RawReading::Other,
        }
    }
}

fn raw(wire: Option<WireReading>) -> Option<RawReading> {
    wire.map(RawReading::from)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ComputeRequest {
    #[serde(rename = "R90")]
    pub r90: Option<WireReading>,
    #[serde(rename = "R180")]
    pub r180: Option<WireReading>,
    #[serde(rename = "R270")]
    pub r270: Option<WireReading>,
    #[serde(rename = "F90")]
    pub f90: Option<WireReading>,
    #[serde(rename = "F180")]
    pub f180: Option<WireReading>,
    #[serde(rename = "F270")]
    pub f270: Option<WireReading>,
    #[serde(rename = "H")]
    pub h: Option<WireReading>,
    #[serde(rename = "D")]
    pub d: Option<WireReading>,
    #[serde(rename = "E")]
    pub e: Option<WireReading>,
}

impl From<ComputeRequest> for RawAlignmentInput {
    fn from(req: ComputeRequest) -> Self {
        Self {
            r90: raw(req.r90),
            r180: raw(req.r180),
            r270: raw(req.r270),
            f90: raw(req.f90),
            f180: raw(req.f180),
            f270: raw(req.f270),
            h: raw(req.h),
            d: raw(req.d),
            e: raw(req.e),
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ResultsView {
    #[serde(rename = "VN")]
    pub vn: Option<f64>,
    #[serde(rename = "VF")]
    pub vf: Option<f64>,
    #[serde(rename = "HN")]
    pub hn: Option<f64>,
    #[serde(rename = "HF")]
    pub hf: Option<f64>,
}

impl From<PartialResult> for ResultsView {
    fn from(r: PartialResult) -> Self {
        Self {
            vn: r.vn,
            vf: r.vf,
            hn: r.hn,
            hf: r.hf,
        }
    }
}

impl From<AlignmentResult> for ResultsView {
    fn from(r: AlignmentResult) -> Self {
        PartialResult::from(r).into()
    }
}

#[derive(Debug, Serialize)]
pub struct ComputeResponse {
    pub ok: bool,
    pub results: ResultsView,
    pub precision: f64,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

// ---- rim & face session ----

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateSessionRequest {
    pub machine_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub ok: bool,
    pub session_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct PhysicalRequest {
    #[serde(rename = "H", default)]
    pub h: Option<WireReading>,
    #[serde(rename = "D", default)]
    pub d: Option<WireReading>,
    #[serde(rename = "E", default)]
    pub e: Option<WireReading>,
    #[serde(rename = "F", default)]
    pub f: Option<WireReading>,
    #[serde(rename = "G", default)]
    pub g: Option<WireReading>,
    #[serde(default = "default_skip_left_side")]
    pub skip_left_side: bool,
}

fn default_skip_left_side() -> bool {
    true
}

impl From<PhysicalRequest> for PhysicalSubmission {
    fn from(req: PhysicalRequest) -> Self {
        Self {
            h: raw(req.h),
            d: raw(req.d),
            e: raw(req.e),
            f: raw(req.f),
            g: raw(req.g),
            skip_left_side: req.skip_left_side,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IndicatorsRequest {
    #[serde(rename = "R0")]
    pub r0: Option<WireReading>,
    #[serde(rename = "R90")]
    pub r90: Option<WireReading>,
    #[serde(rename = "R180")]
    pub r180: Option<WireReading>,
    #[serde(rename = "R270")]
    pub r270: Option<WireReading>,
    #[serde(rename = "F0")]
    pub f0: Option<WireReading>,
    #[serde(rename = "F90")]
    pub f90: Option<WireReading>,
    #[serde(rename = "F180")]
    pub f180: Option<WireReading>,
    #[serde(rename = "F270")]
    pub f270: Option<WireReading>,
    #[serde(rename = "SAG")]
    pub sag: Option<WireReading>,
}

impl From<IndicatorsRequest> for IndicatorSubmission {
    fn from(req: IndicatorsRequest) -> Self {
        Self {
            r0: raw(req.r0),
            r90: raw(req.r90),
            r180: raw(req.r180),
            r270: raw(req.r270),
            f0: raw(req.f0),
            f90: raw(req.f90),
            f180: raw(req.f180),
            f270: raw(req.f270),
            sag: raw(req.sag),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VarianceView {
    pub rim180_off_by: f64,
    pub face180_off_by: f64,
}

#[derive(Debug, Serialize)]
pub struct RangeView {
    pub rim180_within: &'static str,
    pub face180_within: &'static str,
    pub rim_max: f64,
    pub face_max: f64,
}

fn range_label(within: bool) -> &'static str {
    if within {
        "Within Range"
    } else {
        "Out of Upperbound"
    }
}

impl From<RangeCheck> for RangeView {
    fn from(check: RangeCheck) -> Self {
        Self {
            rim180_within: range_label(check.rim180_within),
            face180_within: range_label(check.face180_within),
            rim_max: check.rim_max,
            face_max: check.face_max,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IndicatorsResponse {
    pub ok: bool,
    pub variance: VarianceView,
    pub range: RangeView,
}

impl From<RangeCheck> for IndicatorsResponse {
    fn from(check: RangeCheck) -> Self {
        Self {
            ok: true,
            variance: VarianceView {
                rim180_off_by: 0.0,
                face180_off_by: 0.0,
            },
            range: check.into(),
        }
    }
}

/// A correction value, or a marker for a side that was not measured.
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum CorrectionView {
    Value(f64),
    Skipped(&'static str),
}

#[derive(Debug, Serialize)]
pub struct FeetView {
    pub near: CorrectionView,
    pub far: CorrectionView,
}

#[derive(Debug, Serialize)]
pub struct SidesView {
    pub right: FeetView,
    pub left: FeetView,
}

#[derive(Debug, Serialize)]
pub struct FinalOutputView {
    pub vertical: SidesView,
    pub horizontal: SidesView,
    pub left_side_skipped: bool,
    pub angularity_vertical: f64,
    pub offset_vertical: f64,
    pub angularity_horizontal: f64,
    pub offset_horizontal: f64,
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub ok: bool,
    pub session_id: i64,
    pub machine_name: Option<String>,
    pub description: Option<String>,
    pub results: ResultsView,
    pub final_output: FinalOutputView,
}

fn skipped_feet() -> FeetView {
    FeetView {
        near: CorrectionView::Skipped("Skipped"),
        far: CorrectionView::Skipped("Skipped"),
    }
}

impl From<SessionOutcome> for CalculateResponse {
    fn from(outcome: SessionOutcome) -> Self {
        let r = outcome.result;
        // Left-of-coupling corrections are not computed
        Self {
            ok: true,
            session_id: outcome.session_id,
            machine_name: outcome.machine_name,
            description: outcome.description,
            results: r.into(),
            final_output: FinalOutputView {
                vertical: SidesView {
                    right: FeetView {
                        near: CorrectionView::Value(r.vn()),
                        far: CorrectionView::Value(r.vf()),
                    },
                    left: skipped_feet(),
                },
                horizontal: SidesView {
                    right: FeetView {
                        near: CorrectionView::Value(r.hn()),
                        far: CorrectionView::Value(r.hf()),
                    },
                    left: skipped_feet(),
                },
                left_side_skipped: outcome.left_side_skipped,
                angularity_vertical: outcome.angularity_vertical,
                offset_vertical: outcome.offset_vertical,
                angularity_horizontal: outcome.angularity_horizontal,
                offset_horizontal: outcome.offset_horizontal,
            },
        }
    }
}

// ---- reports ----

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DimsRequest {
    #[serde(rename = "H")]
    pub h: Option<WireReading>,
    #[serde(rename = "D")]
    pub d: Option<WireReading>,
    #[serde(rename = "E")]
    pub e: Option<WireReading>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IndicatorSnapshotRequest {
    #[serde(rename = "R90")]
    pub r90: Option<WireReading>,
    #[serde(rename = "R180")]
    pub r180: Option<WireReading>,
    #[serde(rename = "R270")]
    pub r270: Option<WireReading>,
    #[serde(rename = "F90")]
    pub f90: Option<WireReading>,
    #[serde(rename = "F180")]
    pub f180: Option<WireReading>,
    #[serde(rename = "F270")]
    pub f270: Option<WireReading>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateReportRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub equipment_id: Option<String>,
    pub dims: Option<DimsRequest>,
    pub indicators: Option<IndicatorSnapshotRequest>,
    pub sag: Option<WireReading>,
}

impl From<CreateReportRequest> for ReportSubmission {
    fn from(req: CreateReportRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            equipment_id: req.equipment_id,
            dims: req.dims.map(|d| RawDimensions {
                h: raw(d.h),
                d: raw(d.d),
                e: raw(d.e),
            }),
            indicators: req.indicators.map(|i| RawIndicators {
                r90: raw(i.r90),
                r180: raw(i.r180),
                r270: raw(i.r270),
                f90: raw(i.f90),
                f180: raw(i.f180),
                f270: raw(i.f270),
            }),
            sag: raw(req.sag),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateReportResponse {
    pub ok: bool,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct DimsView {
    #[serde(rename = "H")]
    pub h: f64,
    #[serde(rename = "D")]
    pub d: f64,
    #[serde(rename = "E")]
    pub e: f64,
}

impl From<Dimensions> for DimsView {
    fn from(d: Dimensions) -> Self {
        Self {
            h: d.h,
            d: d.d,
            e: d.e,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IndicatorsView {
    #[serde(rename = "R90")]
    pub r90: f64,
    #[serde(rename = "R180")]
    pub r180: f64,
    #[serde(rename = "R270")]
    pub r270: f64,
    #[serde(rename = "F90")]
    pub f90: f64,
    #[serde(rename = "F180")]
    pub f180: f64,
    #[serde(rename = "F270")]
    pub f270: f64,
}

impl From<IndicatorReadings> for IndicatorsView {
    fn from(r: IndicatorReadings) -> Self {
        Self {
            r90: r.r90,
            r180: r.r180,
            r270: r.r270,
            f90: r.f90,
            f180: r.f180,
            f270: r.f270,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportView {
    pub id: i64,
    pub user_id: i64,
    pub method: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub equipment_id: Option<String>,
    pub dims: Option<DimsView>,
    pub indicators: Option<IndicatorsView>,
    pub results: ResultsView,
    pub sag: f64,
    pub created_at: String,
    pub precision: f64,
}

impl From<ScoredReport> for ReportView {
    fn from(scored: ScoredReport) -> Self {
        let r = scored.report;
        Self {
            id: r.id,
            user_id: r.user_id,
            method: r.method,
            title: r.title,
            description: r.description,
            equipment_id: r.equipment_id,
            dims: r.dimensions.map(DimsView::from),
            indicators: r.readings.map(IndicatorsView::from),
            results: r.results.into(),
            sag: r.sag,
            created_at: r.created_at.to_rfc3339(),
            precision: scored.precision,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportListResponse {
    pub ok: bool,
    pub items: Vec<ReportView>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub ok: bool,
    pub report: ReportView,
}

// ---- dashboard ----

#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DeltaView {
    pub projects: i64,
    pub calculations: i64,
    pub reports: i64,
    pub accuracy: f64,
}

impl From<DashboardDelta> for DeltaView {
    fn from(d: DashboardDelta) -> Self {
        Self {
            projects: d.projects,
            calculations: d.calculations,
            reports: d.reports,
            accuracy: d.accuracy,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct StatsView {
    pub active_projects: i64,
    pub total_calculations: i64,
    pub generated_reports: i64,
    pub avg_accuracy: f64,
    pub deltas: DeltaView,
}

impl From<DashboardStats> for StatsView {
    fn from(s: DashboardStats) -> Self {
        Self {
            active_projects: s.active_projects,
            total_calculations: s.total_calculations,
            generated_reports: s.generated_reports,
            avg_accuracy: s.avg_accuracy,
            deltas: s.deltas.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecentReportView {
    pub id: i64,
    pub name: String,
    pub status: &'static str,
    pub updated_at: String,
    pub precision: f64,
}

impl From<RecentReport> for RecentReportView {
    fn from(r: RecentReport) -> Self {
        Self {
            id: r.id,
            name: r.name,
            status: r.status.as_str(),
            updated_at: r.updated_at.to_rfc3339(),
            precision: r.precision,
        }
    }
}
