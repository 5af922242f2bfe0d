//! Health check handler.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;

use crate::extract::Json;
use crate::handler::Result;
use crate::handler::response::{DatabaseStatus, MonitorStatus, ServiceStatus};
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "trackr_server::handler::monitors";

/// Reports service health, pinging Postgres when it is configured.
#[tracing::instrument(skip_all)]
async fn health_status(
    State(service_state): State<ServiceState>,
) -> Result<(StatusCode, Json<MonitorStatus>)> {
    let (status, database) = match &service_state.postgres {
        None => (ServiceStatus::Healthy, None),
        Some(pg_client) => {
            let pool_status = pg_client.pool_status();
            let status = match pg_client.get_connection().await {
                Ok(_) if pool_status.is_under_pressure() => ServiceStatus::Degraded,
                Ok(_) => ServiceStatus::Healthy,
                Err(error) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        error = %error,
                        "database health check failed",
                    );
                    ServiceStatus::Unhealthy
                }
            };
            (status, Some(DatabaseStatus::from(pool_status)))
        }
    };

    let status_code = match status {
        ServiceStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        ServiceStatus::Healthy | ServiceStatus::Degraded => StatusCode::OK,
    };

    tracing::debug!(
        target: TRACING_TARGET,
        status_code = status_code.as_u16(),
        "health status prepared",
    );

    Ok((status_code, Json(MonitorStatus::new(status, database))))
}

/// Returns a [`Router`] with all health monitoring routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}

#[cfg(test)]
mod tests {
    use crate::handler::response::{MonitorStatus, ServiceStatus};
    use crate::handler::test::create_test_context;

    #[tokio::test]
    async fn healthy_without_database() -> anyhow::Result<()> {
        let context = create_test_context()?;
        let response = context.server.get("/health").await;
        response.assert_status_ok();

        let status = response.json::<MonitorStatus>();
        assert_eq!(status.status, ServiceStatus::Healthy);
        assert!(status.database.is_none());
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
        Ok(())
    }
}
