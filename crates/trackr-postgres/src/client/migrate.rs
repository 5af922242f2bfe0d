//! Embedded schema migrations.

use std::future::Future;
use std::time::{Duration, Instant};

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use crate::{MIGRATIONS, PgClient, PgError, PgResult, PooledConnection, TRACING_TARGET_MIGRATION};

/// Outcome of a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// Time spent applying migrations.
    pub duration: Duration,
    /// Versions applied by this run, in order.
    pub applied_versions: Vec<String>,
}

impl MigrationResult {
    /// Returns whether the schema was already up to date.
    #[inline]
    pub fn is_no_op(&self) -> bool {
        self.applied_versions.is_empty()
    }

    /// Returns the last applied migration version, if any.
    pub fn last_applied_version(&self) -> Option<&str> {
        self.applied_versions.last().map(String::as_str)
    }
}

/// Applies all pending embedded migrations.
///
/// Safe to call on every startup; already applied migrations are skipped.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationResult> {
    let start_time = Instant::now();
    let conn: PooledConnection = pg.get_pooled_connection().await?;
    let mut conn: AsyncConnectionWrapper<PooledConnection> = conn.into();

    let versions = spawn_blocking(move || {
        conn.run_pending_migrations(MIGRATIONS).map(|versions| {
            versions
                .into_iter()
                .map(|version| version.to_string())
                .collect::<Vec<_>>()
        })
    })
    .await
    .map_err(|err| {
        tracing::error!(target: TRACING_TARGET_MIGRATION, error = %err, "Migration task failed to complete");
        PgError::Migration(err.into())
    })?
    .map_err(|err| {
        tracing::error!(target: TRACING_TARGET_MIGRATION, error = %err, "Database migration failed");
        PgError::Migration(err)
    })?;

    let result = MigrationResult {
        duration: start_time.elapsed(),
        applied_versions: versions,
    };

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        duration = ?result.duration,
        applied = result.applied_versions.len(),
        "Database schema is up to date"
    );

    Ok(result)
}

/// Extension trait adding migration support to [`PgClient`].
pub trait PgClientExt {
    /// Applies all pending embedded migrations.
    fn run_pending_migrations(&self) -> impl Future<Output = PgResult<MigrationResult>>;
}

impl PgClientExt for PgClient {
    async fn run_pending_migrations(&self) -> PgResult<MigrationResult> {
        run_pending_migrations(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_is_no_op() {
        let result = MigrationResult {
            duration: Duration::from_millis(5),
            applied_versions: vec![],
        };

        assert!(result.is_no_op());
        assert_eq!(result.last_applied_version(), None);
    }

    #[test]
    fn last_applied_version() {
        let result = MigrationResult {
            duration: Duration::from_millis(5),
            applied_versions: vec!["20250601000000".to_string()],
        };

        assert!(!result.is_no_op());
        assert_eq!(result.last_applied_version(), Some("20250601000000"));
    }
}
