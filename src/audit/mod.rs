//! Audit log — SQLite-based record of credential access.
//!
//! Every store, retrieve, delete and existence check is written to
//! `<data_dir>/audit.db` together with its outcome. Secret values and
//! their masks never reach this table.
//!
//! If the database can't be opened or written to, the credential
//! operation carries on without a record.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::credential::CredentialKind;
use crate::errors::{CrewKeyError, Result};

/// File name of the audit database inside the data directory.
pub const DB_FILE_NAME: &str = "audit.db";

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    /// `None` for operations that span every kind (`list`).
    pub kind: Option<String>,
    pub outcome: String,
}

/// SQLite-backed audit log.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the audit database at `<data_dir>/audit.db`.
    ///
    /// Returns `None` if the database can't be opened; callers treat that
    /// as "auditing unavailable".
    pub fn open(data_dir: &Path) -> Option<Self> {
        let db_path = Self::db_path(data_dir);
        let conn = Connection::open(&db_path).ok()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS credential_audit (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                operation TEXT NOT NULL,
                kind      TEXT,
                outcome   TEXT NOT NULL
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation. Errors are ignored.
    pub fn log(&self, operation: &str, kind: Option<CredentialKind>, outcome: &str) {
        let now = Utc::now().to_rfc3339();
        let kind = kind.map(CredentialKind::as_str);
        if let Err(e) = self.conn.execute(
            "INSERT INTO credential_audit (timestamp, operation, kind, outcome)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![now, operation, kind, outcome],
        ) {
            tracing::debug!(error = %e, "audit insert failed");
        }
    }

    /// Most recent entries first, at most `limit` of them, optionally only
    /// those at or after `since`.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        // An absent bound matches everything.
        let since = since.map(|ts| ts.to_rfc3339());

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, operation, kind, outcome
                 FROM credential_audit
                 WHERE ?1 IS NULL OR timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
            )
            .map_err(|e| CrewKeyError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params![since, limit_i64], |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    kind: row.get(3)?,
                    outcome: row.get(4)?,
                })
            })
            .map_err(|e| CrewKeyError::AuditError(format!("query exec: {e}")))?;

        rows.map(|row| row.map_err(|e| CrewKeyError::AuditError(format!("row parse: {e}"))))
            .collect()
    }

    pub fn db_path(data_dir: &Path) -> PathBuf {
        data_dir.join(DB_FILE_NAME)
    }
}

/// Log one event to `<data_dir>/audit.db`, creating the directory if
/// needed. Never fails the caller.
pub fn log_audit(data_dir: &Path, op: &str, kind: Option<CredentialKind>, outcome: &str) {
    if std::fs::create_dir_all(data_dir).is_err() {
        return;
    }
    if let Some(audit) = AuditLog::open(data_dir) {
        audit.log(op, kind, outcome);
    }
}
