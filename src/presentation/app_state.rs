// Application state for HTTP handlers
use crate::application::alignment_service::AlignmentService;
use crate::application::dashboard_service::DashboardService;
use crate::application::report_service::ReportService;
use crate::application::session_service::SessionService;

#[derive(Clone)]
pub struct AppState {
    pub alignment_service: AlignmentService,
    pub session_service: SessionService,
    pub report_service: ReportService,
    pub dashboard_service: DashboardService,
}
