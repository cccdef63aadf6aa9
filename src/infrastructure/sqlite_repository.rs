// SQLite repository implementation
use crate::application::report_repository::{ReportRepository, SessionRepository};
use crate::domain::alignment::RawReading;
use crate::domain::dashboard::{ReportRecord, TimeWindow};
use crate::domain::precision::PartialResult;
use crate::domain::report::{Dimensions, IndicatorReadings, NewReport, StoredReport, RIM_FACE_METHOD};
use crate::domain::session::{DialReadings, PhysicalData, RimFaceSession};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS alignment_reports (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      INTEGER NOT NULL,
    method       TEXT    NOT NULL,
    title        TEXT,
    description  TEXT,
    equipment_id TEXT,
    dims         TEXT    NOT NULL,
    indicators   TEXT    NOT NULL,
    results      TEXT    NOT NULL,
    sag          REAL    NOT NULL DEFAULT 0,
    created_at   INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_alignment_reports_created_at ON alignment_reports (created_at);
CREATE INDEX IF NOT EXISTS idx_alignment_reports_user ON alignment_reports (user_id, created_at);

CREATE TABLE IF NOT EXISTS rimface_sessions (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    machine_name TEXT,
    description  TEXT,
    method       TEXT    NOT NULL DEFAULT 'rim_face',
    dims         TEXT,
    readings     TEXT,
    created_at   INTEGER NOT NULL
);
";

const REPORT_COLUMNS: &str =
    "id, user_id, method, title, description, equipment_id, dims, indicators, results, sag, created_at";

#[derive(Clone)]
pub struct SqliteRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRepository {
    /// Open (or create) the database at `path`; `:memory:` gives a private in-memory store.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open SQLite database at {}", path))?;
        conn.execute_batch(SCHEMA)
            .context("Failed to create database schema")?;

        tracing::info!("Opened report database at {}", path);
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run blocking SQLite work off the async executor.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| anyhow::anyhow!("SQLite connection lock poisoned"))?;
            f(&guard)
        })
        .await
        .context("SQLite task panicked")?
    }
}

/// Raw column values of one report row, decoded after the statement finishes.
struct ReportRow {
    id: i64,
    user_id: i64,
    method: String,
    title: Option<String>,
    description: Option<String>,
    equipment_id: Option<String>,
    dims: String,
    indicators: String,
    results: String,
    sag: f64,
    created_at: i64,
}

impl ReportRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            method: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            equipment_id: row.get(5)?,
            dims: row.get(6)?,
            indicators: row.get(7)?,
            results: row.get(8)?,
            sag: row.get(9)?,
            created_at: row.get(10)?,
        })
    }

    fn into_report(self) -> Result<StoredReport> {
        Ok(StoredReport {
            id: self.id,
            user_id: self.user_id,
            method: self.method,
            title: self.title,
            description: self.description,
            equipment_id: self.equipment_id,
            dimensions: dimensions_from_json(&parse_json(&self.dims)),
            readings: readings_from_json(&parse_json(&self.indicators)),
            results: partial_result_from_json(&parse_json(&self.results)),
            sag: self.sag,
            created_at: from_millis(self.created_at)?,
        })
    }
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).with_context(|| format!("Invalid timestamp {}", ms))
}

/// Malformed JSON decodes as `null` so that every field reads as missing.
fn parse_json(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("Stored JSON column could not be parsed: {}", e);
        Value::Null
    })
}

/// Read a numeric field that may have been stored as a number or a numeric string.
fn json_number(value: &Value, key: &str) -> Option<f64> {
    let raw = match value.get(key)? {
        Value::Number(n) => RawReading::Number(n.as_f64()?),
        Value::String(s) => RawReading::Text(s.clone()),
        Value::Null => return None,
        _ => RawReading::Other,
    };
    raw.to_finite()
}

pub fn partial_result_from_json(value: &Value) -> PartialResult {
    PartialResult {
        vn: json_number(value, "VN"),
        vf: json_number(value, "VF"),
        hn: json_number(value, "HN"),
        hf: json_number(value, "HF"),
    }
}

fn dimensions_from_json(value: &Value) -> Option<Dimensions> {
    Some(Dimensions {
        h: json_number(value, "H")?,
        d: json_number(value, "D")?,
        e: json_number(value, "E")?,
    })
}

fn readings_from_json(value: &Value) -> Option<IndicatorReadings> {
    Some(IndicatorReadings {
        r90: json_number(value, "R90")?,
        r180: json_number(value, "R180")?,
        r270: json_number(value, "R270")?,
        f90: json_number(value, "F90")?,
        f180: json_number(value, "F180")?,
        f270: json_number(value, "F270")?,
    })
}

fn physical_to_json(physical: &PhysicalData) -> Value {
    let dims = &physical.dimensions;
    json!({ "H": dims.h, "D": dims.d, "E": dims.e, "F": physical.f, "G": physical.g })
}

fn physical_from_json(value: &Value) -> Option<PhysicalData> {
    Some(PhysicalData {
        dimensions: dimensions_from_json(value)?,
        f: json_number(value, "F"),
        g: json_number(value, "G"),
    })
}

fn dial_to_json(dial: &DialReadings) -> Value {
    let r = &dial.readings;
    json!({
        "R0": dial.r0, "R90": r.r90, "R180": r.r180, "R270": r.r270,
        "F0": dial.f0, "F90": r.f90, "F180": r.f180, "F270": r.f270,
        "SAG": dial.sag,
    })
}

/// Stored readings already carry SAG, so they are rebuilt without re-applying it.
fn dial_from_json(value: &Value) -> Option<DialReadings> {
    Some(DialReadings {
        r0: json_number(value, "R0").unwrap_or(0.0),
        f0: json_number(value, "F0").unwrap_or(0.0),
        readings: readings_from_json(value)?,
        sag: json_number(value, "SAG").unwrap_or(0.0),
    })
}

#[async_trait]
impl ReportRepository for SqliteRepository {
    async fn insert_report(&self, report: NewReport) -> Result<i64> {
        let dims = Dimensions::from(&report.input);
        let readings = IndicatorReadings::from(&report.input);
        let dims_json = json!({ "H": dims.h, "D": dims.d, "E": dims.e });
        let indicators_json = json!({
            "R90": readings.r90, "R180": readings.r180, "R270": readings.r270,
            "F90": readings.f90, "F180": readings.f180, "F270": readings.f270,
        });
        let results_json = json!({
            "VN": report.result.vn(), "VF": report.result.vf(),
            "HN": report.result.hn(), "HF": report.result.hf(),
        });

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO alignment_reports
                 (user_id, method, title, description, equipment_id, dims, indicators, results, sag, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    report.user_id,
                    RIM_FACE_METHOD,
                    report.title,
                    report.description,
                    report.equipment_id,
                    dims_json.to_string(),
                    indicators_json.to_string(),
                    results_json.to_string(),
                    report.sag,
                    report.created_at.timestamp_millis(),
                ],
            )
            .context("Failed to insert alignment report")?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    async fn find_report(&self, id: i64, user_id: i64) -> Result<Option<StoredReport>> {
        let row = self
            .with_conn(move |conn| {
                let sql = format!(
                    "SELECT {} FROM alignment_reports WHERE id = ?1 AND user_id = ?2",
                    REPORT_COLUMNS
                );
                conn.query_row(&sql, params![id, user_id], ReportRow::from_row)
                    .optional()
                    .context("Failed to query alignment report")
            })
            .await?;

        row.map(ReportRow::into_report).transpose()
    }

    async fn list_reports_by_user(&self, user_id: i64, limit: usize) -> Result<Vec<StoredReport>> {
        let rows = self
            .with_conn(move |conn| {
                let sql = format!(
                    "SELECT {} FROM alignment_reports WHERE user_id = ?1
                     ORDER BY created_at DESC, id DESC LIMIT ?2",
                    REPORT_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![user_id, limit as i64], ReportRow::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()
                    .context("Failed to list user reports")?;
                Ok(rows)
            })
            .await?;

        rows.into_iter().map(ReportRow::into_report).collect()
    }

    async fn recent_reports(&self, limit: usize) -> Result<Vec<StoredReport>> {
        let rows = self
            .with_conn(move |conn| {
                let sql = format!(
                    "SELECT {} FROM alignment_reports ORDER BY created_at DESC, id DESC LIMIT ?1",
                    REPORT_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![limit as i64], ReportRow::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()
                    .context("Failed to list recent reports")?;
                Ok(rows)
            })
            .await?;

        rows.into_iter().map(ReportRow::into_report).collect()
    }

    async fn report_records(&self, window: Option<TimeWindow>) -> Result<Vec<ReportRecord>> {
        // Unbounded when no window is given
        let start = window.map(|w| w.start.timestamp_millis());
        let end = window.and_then(|w| w.end).map(|e| e.timestamp_millis());

        let rows = self
            .with_conn(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT created_at, equipment_id, results FROM alignment_reports
                     WHERE (?1 IS NULL OR created_at >= ?1)
                       AND (?2 IS NULL OR created_at < ?2)",
                )?;
                let rows = stmt
                    .query_map(params![start, end], |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, Option<String>>(1)?,
                            row.get::<_, String>(2)?,
                        ))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()
                    .context("Failed to query report records")?;
                Ok(rows)
            })
            .await?;

        tracing::debug!("Loaded {} report records", rows.len());

        rows.into_iter()
            .map(|(created_at, equipment_id, results)| {
                Ok(ReportRecord::new(
                    from_millis(created_at)?,
                    equipment_id,
                    partial_result_from_json(&parse_json(&results)),
                ))
            })
            .collect()
    }
}

#[async_trait]
impl SessionRepository for SqliteRepository {
    async fn create_session(&self, machine_name: Option<String>, description: Option<String>) -> Result<i64> {
        let now = Utc::now().timestamp_millis();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO rimface_sessions (machine_name, description, method, created_at)
                 VALUES (?1, ?2, 'rim_face', ?3)",
                params![machine_name, description, now],
            )
            .context("Failed to create session")?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    async fn save_physical(&self, id: i64, physical: PhysicalData) -> Result<bool> {
        let dims = physical_to_json(&physical).to_string();
        self.with_conn(move |conn| {
            let updated = conn
                .execute("UPDATE rimface_sessions SET dims = ?1 WHERE id = ?2", params![dims, id])
                .context("Failed to save physical data")?;
            Ok(updated > 0)
        })
        .await
    }

    async fn save_readings(&self, id: i64, dial: DialReadings) -> Result<bool> {
        let readings = dial_to_json(&dial).to_string();
        self.with_conn(move |conn| {
            let updated = conn
                .execute(
                    "UPDATE rimface_sessions SET readings = ?1 WHERE id = ?2",
                    params![readings, id],
                )
                .context("Failed to save indicator readings")?;
            Ok(updated > 0)
        })
        .await
    }

    async fn find_session(&self, id: i64) -> Result<Option<RimFaceSession>> {
        let row = self
            .with_conn(move |conn| {
                conn.query_row(
                    "SELECT id, machine_name, description, dims, readings FROM rimface_sessions WHERE id = ?1",
                    params![id],
                    |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, Option<String>>(1)?,
                            row.get::<_, Option<String>>(2)?,
                            row.get::<_, Option<String>>(3)?,
                            row.get::<_, Option<String>>(4)?,
                        ))
                    },
                )
                .optional()
                .context("Failed to query session")
            })
            .await?;

        Ok(row.map(|(id, machine_name, description, dims, readings)| RimFaceSession {
            id,
            machine_name,
            description,
            physical: dims.as_deref().map(parse_json).as_ref().and_then(physical_from_json),
            dial: readings.as_deref().map(parse_json).as_ref().and_then(dial_from_json),
        }))
    }
}
