// Dashboard service - Use case for building fleet-wide statistics
use crate::application::error::ServiceResult;
use crate::application::report_repository::ReportRepository;
use crate::domain::dashboard::{DashboardStats, StatsWindows};
use crate::domain::precision::PrecisionScorer;
use crate::domain::report::ReportStatus;
use chrono::{DateTime, Utc};
use std::sync::Arc;

const MAX_RECENT: usize = 50;

/// One row of the recent activity list.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentReport {
    pub id: i64,
    pub name: String,
    pub status: ReportStatus,
    pub updated_at: DateTime<Utc>,
    pub precision: f64,
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn ReportRepository>,
    scorer: PrecisionScorer,
    window_days: i64,
    recent_limit: usize,
}

impl DashboardService {
    pub fn new(
        repository: Arc<dyn ReportRepository>,
        scorer: PrecisionScorer,
        window_days: i64,
        recent_limit: usize,
    ) -> Self {
        Self {
            repository,
            scorer,
            window_days,
            recent_limit,
        }
    }

    pub async fn get_stats(&self, now: DateTime<Utc>) -> ServiceResult<DashboardStats> {
        let windows = StatsWindows::ending_at(now, self.window_days);

        let (all, current, prior) = tokio::try_join!(
            self.repository.report_records(None),
            self.repository.report_records(Some(windows.current)),
            self.repository.report_records(Some(windows.prior)),
        )?;

        tracing::debug!(
            total = all.len(),
            current = current.len(),
            prior = prior.len(),
            "building dashboard stats"
        );

        Ok(DashboardStats::build(&all, &current, &prior, &self.scorer))
    }

    /// Most recent reports; `limit` defaults to the configured value and is clamped to 1..=50.
    pub async fn recent_reports(
        &self,
        limit: Option<usize>,
        now: DateTime<Utc>,
    ) -> ServiceResult<Vec<RecentReport>> {
        let limit = limit.unwrap_or(self.recent_limit).clamp(1, MAX_RECENT);
        let reports = self.repository.recent_reports(limit).await?;

        Ok(reports
            .into_iter()
            .map(|report| RecentReport {
                id: report.id,
                name: report.display_name(),
                status: report.status(now),
                updated_at: report.created_at,
                precision: self.scorer.score(&report.results),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alignment::{compute, AlignmentInput};
    use crate::domain::report::NewReport;
    use crate::infrastructure::sqlite_repository::SqliteRepository;
    use chrono::Duration;

    fn report(equipment: Option<&str>, title: Option<&str>, created_at: DateTime<Utc>, r180: f64) -> NewReport {
        let input = AlignmentInput {
            r90: 0.0,
            r180,
            r270: 0.0,
            f90: 0.0,
            f180: 0.0,
            f270: 0.0,
            h: 100.0,
            d: 50.0,
            e: 100.0,
        };
        NewReport {
            user_id: 1,
            title: title.map(str::to_string),
            description: None,
            equipment_id: equipment.map(str::to_string),
            input,
            result: compute(&input).unwrap(),
            sag: 0.0,
            created_at,
        }
    }

    async fn seeded(now: DateTime<Utc>) -> DashboardService {
        let repo = Arc::new(SqliteRepository::open(":memory:").unwrap());
        // current window: perfect alignments on two machines
        for (i, equipment) in ["PUMP-1", "PUMP-1", "FAN-2"].iter().enumerate() {
            repo.insert_report(report(Some(equipment), None, now - Duration::hours(i as i64 + 1), 0.0))
                .await
                .unwrap();
        }
        // prior window: VN = VF = 5 on one machine, so HN = HF = 0 -> 75%
        repo.insert_report(report(Some("PUMP-1"), None, now - Duration::days(9), 10.0))
            .await
            .unwrap();
        // outside both windows
        repo.insert_report(report(None, Some("Old job"), now - Duration::days(30), 0.0))
            .await
            .unwrap();

        DashboardService::new(repo, PrecisionScorer::default(), 7, 5)
    }

    #[tokio::test]
    async fn test_stats() {
        let now = Utc::now();
        let service = seeded(now).await;
        let stats = service.get_stats(now).await.unwrap();

        assert_eq!(stats.total_calculations, 5);
        assert_eq!(stats.generated_reports, 5);
        assert_eq!(stats.active_projects, 2);
        assert_eq!(stats.avg_accuracy, 95.0);
        assert_eq!(stats.deltas.calculations, 2);
        assert_eq!(stats.deltas.reports, 2);
        assert_eq!(stats.deltas.projects, 1);
        assert_eq!(stats.deltas.accuracy, 25.0);
    }

    #[tokio::test]
    async fn test_stats_on_empty_store() {
        let repo = Arc::new(SqliteRepository::open(":memory:").unwrap());
        let service = DashboardService::new(repo, PrecisionScorer::default(), 7, 5);
        let stats = service.get_stats(Utc::now()).await.unwrap();

        assert_eq!(stats.total_calculations, 0);
        assert_eq!(stats.avg_accuracy, 0.0);
        assert_eq!(stats.deltas.calculations, 0);
        assert_eq!(stats.deltas.accuracy, 0.0);
    }

    #[tokio::test]
    async fn test_recent_reports() {
        let now = Utc::now();
        let service = seeded(now).await;

        let recent = service.recent_reports(None, now).await.unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].name, "PUMP-1");
        assert_eq!(recent[0].status, ReportStatus::InProgress);
        assert_eq!(recent[0].precision, 100.0);

        let last = recent.last().unwrap();
        assert_eq!(last.name, "Old job");
        assert_eq!(last.status, ReportStatus::Completed);

        assert_eq!(service.recent_reports(Some(0), now).await.unwrap().len(), 1);
        assert_eq!(service.recent_reports(Some(2), now).await.unwrap().len(), 2);
    }
}
