// HTTP request handlers
use crate::application::error::ServiceError;
use crate::domain::alignment::RawAlignmentInput;
use crate::domain::precision::PartialResult;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use crate::presentation::extractors::CurrentUser;
use crate::presentation::views::{
    CalculateResponse, ComputeRequest, ComputeResponse, CreateReportRequest, CreateReportResponse,
    CreateSessionRequest, CreateSessionResponse, IndicatorsRequest, IndicatorsResponse, OkResponse,
    PhysicalRequest, RecentQuery, RecentReportView, ReportListResponse, ReportResponse, StatsView,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::Utc;
use std::sync::Arc;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// One-shot Rim & Face computation
pub async fn compute_alignment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ComputeRequest>, JsonRejection>,
) -> ApiResult<ComputeResponse> {
    let Json(request) = payload?;
    let raw = RawAlignmentInput::from(request);
    let result = state.alignment_service.compute(&raw).map_err(ServiceError::from)?;
    let precision = state.alignment_service.precision(&PartialResult::from(result));

    Ok(Json(ComputeResponse {
        ok: true,
        results: result.into(),
        precision,
    }))
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<CreateSessionRequest>>,
) -> ApiResult<CreateSessionResponse> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let session_id = state
        .session_service
        .create_session(request.machine_name, request.description)
        .await?;

    Ok(Json(CreateSessionResponse { ok: true, session_id }))
}

pub async fn save_physical(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    payload: Result<Json<PhysicalRequest>, JsonRejection>,
) -> ApiResult<OkResponse> {
    let Json(request) = payload?;
    state.session_service.save_physical(id, request.into()).await?;
    Ok(Json(OkResponse { ok: true }))
}

pub async fn save_indicators(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    payload: Result<Json<IndicatorsRequest>, JsonRejection>,
) -> ApiResult<IndicatorsResponse> {
    let Json(request) = payload?;
    let check = state.session_service.save_readings(id, request.into()).await?;
    Ok(Json(check.into()))
}

pub async fn calculate_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<CalculateResponse> {
    let outcome = state.session_service.calculate(id).await?;
    Ok(Json(outcome.into()))
}

pub async fn create_report(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    payload: Result<Json<CreateReportRequest>, JsonRejection>,
) -> ApiResult<CreateReportResponse> {
    let Json(request) = payload?;
    let id = state.report_service.create_report(user_id, request.into()).await?;
    Ok(Json(CreateReportResponse { ok: true, id }))
}

pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<ReportListResponse> {
    let reports = state.report_service.list_reports(user_id).await?;
    Ok(Json(ReportListResponse {
        ok: true,
        items: reports.into_iter().map(Into::into).collect(),
    }))
}

pub async fn get_report(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<ReportResponse> {
    let report = state.report_service.get_report(user_id, id).await?;
    Ok(Json(ReportResponse {
        ok: true,
        report: report.into(),
    }))
}

pub async fn dashboard_stats(State(state): State<Arc<AppState>>) -> ApiResult<StatsView> {
    let stats = state.dashboard_service.get_stats(Utc::now()).await?;
    Ok(Json(stats.into()))
}

pub async fn recent_reports(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RecentQuery>, QueryRejection>,
) -> ApiResult<Vec<RecentReportView>> {
    let Query(query) = query?;
    let recent = state
        .dashboard_service
        .recent_reports(query.limit, Utc::now())
        .await?;
    Ok(Json(recent.into_iter().map(Into::into).collect()))
}
