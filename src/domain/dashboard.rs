// Dashboard aggregation over stored reports
use super::precision::{round_to_tenth, PartialResult, PrecisionScorer};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// What the aggregator needs to know about one stored report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRecord {
    pub created_at: DateTime<Utc>,
    pub equipment_id: Option<String>,
    pub results: PartialResult,
}

impl ReportRecord {
    pub fn new(created_at: DateTime<Utc>, equipment_id: Option<String>, results: PartialResult) -> Self {
        Self {
            created_at,
            equipment_id,
            results,
        }
    }
}

/// Half-open time window `[start, end)`; no end means open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

/// The current period and the one immediately before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindows {
    pub current: TimeWindow,
    pub prior: TimeWindow,
}

impl StatsWindows {
    /// Current = `[now - days, ..)`, prior = `[now - 2*days, now - days)`.
    pub fn ending_at(now: DateTime<Utc>, days: i64) -> Self {
        let boundary = now - Duration::days(days);
        Self {
            current: TimeWindow {
                start: boundary,
                end: None,
            },
            prior: TimeWindow {
                start: boundary - Duration::days(days),
                end: Some(boundary),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSummary {
    pub calculations: i64,
    pub active: i64,
    pub accuracy: f64,
}

impl WindowSummary {
    pub fn from_records(records: &[ReportRecord], scorer: &PrecisionScorer) -> Self {
        Self {
            calculations: records.len() as i64,
            active: active_count(records),
            accuracy: average_accuracy(records, scorer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardDelta {
    pub projects: i64,
    pub calculations: i64,
    pub reports: i64,
    pub accuracy: f64,
}

impl DashboardDelta {
    pub fn between(current: &WindowSummary, prior: &WindowSummary) -> Self {
        let calculations = current.calculations - prior.calculations;
        Self {
            projects: current.active - prior.active,
            calculations,
            // every calculation is stored as a report
            reports: calculations,
            accuracy: round_to_tenth(current.accuracy - prior.accuracy),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardStats {
    pub active_projects: i64,
    pub total_calculations: i64,
    pub generated_reports: i64,
    pub avg_accuracy: f64,
    pub deltas: DashboardDelta,
}

impl DashboardStats {
    pub fn build(
        all: &[ReportRecord],
        current: &[ReportRecord],
        prior: &[ReportRecord],
        scorer: &PrecisionScorer,
    ) -> Self {
        let current = WindowSummary::from_records(current, scorer);
        let prior = WindowSummary::from_records(prior, scorer);
        let total = all.len() as i64;

        Self {
            active_projects: current.active,
            total_calculations: total,
            generated_reports: total,
            avg_accuracy: average_accuracy(all, scorer),
            deltas: DashboardDelta::between(&current, &prior),
        }
    }
}

/// Distinct non-blank equipment identifiers.
pub fn active_count(records: &[ReportRecord]) -> i64 {
    records
        .iter()
        .filter_map(|r| r.equipment_id.as_deref())
        .filter(|id| !id.trim().is_empty())
        .collect::<HashSet<_>>()
        .len() as i64
}

/// Mean precision, one decimal place; 0 when there is nothing to average.
pub fn average_accuracy(records: &[ReportRecord], scorer: &PrecisionScorer) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: f64 = records.iter().map(|r| scorer.score(&r.results)).sum();
    round_to_tenth(sum / records.len() as f64)
}
