// Repository traits for report and session persistence
use crate::domain::dashboard::{ReportRecord, TimeWindow};
use crate::domain::report::{NewReport, StoredReport};
use crate::domain::session::{DialReadings, PhysicalData, RimFaceSession};
use async_trait::async_trait;

#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Persist a report and return its id
    async fn insert_report(&self, report: NewReport) -> anyhow::Result<i64>;

    /// Fetch a report only if it belongs to the given user
    async fn find_report(&self, id: i64, user_id: i64) -> anyhow::Result<Option<StoredReport>>;

    /// A user's reports, newest first
    async fn list_reports_by_user(&self, user_id: i64, limit: usize) -> anyhow::Result<Vec<StoredReport>>;

    /// Newest reports across all users
    async fn recent_reports(&self, limit: usize) -> anyhow::Result<Vec<StoredReport>>;

    /// Aggregation records, optionally restricted to a window
    async fn report_records(&self, window: Option<TimeWindow>) -> anyhow::Result<Vec<ReportRecord>>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(
        &self,
        machine_name: Option<String>,
        description: Option<String>,
    ) -> anyhow::Result<i64>;

    /// Returns false when the session does not exist
    async fn save_physical(&self, id: i64, physical: PhysicalData) -> anyhow::Result<bool>;

    /// Returns false when the session does not exist
    async fn save_readings(&self, id: i64, dial: DialReadings) -> anyhow::Result<bool>;

    async fn find_session(&self, id: i64) -> anyhow::Result<Option<RimFaceSession>>;
}
