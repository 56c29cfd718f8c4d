//! Liveness and readiness endpoints.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use usecase::{OrderRepository, UserRepository};

use super::AppState;

/// Budget for a full readiness probe.
pub const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
pub struct LivenessResponse {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub ok: bool,
    pub details: BTreeMap<&'static str, String>,
}

/// GET /livez — the process is up.
pub async fn live() -> Json<LivenessResponse> {
    Json(LivenessResponse { ok: true })
}

/// GET /healthz — every registered dependency answers within the budget.
#[tracing::instrument(skip(state))]
pub async fn ready<U: UserRepository + 'static, O: OrderRepository + 'static>(
    State(state): State<Arc<AppState<U, O>>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let mut details = BTreeMap::new();

    let probes = async {
        for check in &state.health_checks {
            let result = check.check().await;
            if let Err(ref reason) = result {
                tracing::warn!(dependency = check.name(), %reason, "readiness check failed");
            }
            details.insert(
                check.name(),
                result.err().unwrap_or_else(|| "ok".to_string()),
            );
        }
    };

    if tokio::time::timeout(READINESS_TIMEOUT, probes).await.is_err() {
        tracing::warn!("readiness checks timed out");
        details.insert("timeout", format!("exceeded {}s", READINESS_TIMEOUT.as_secs()));
    }

    let ok = details.values().all(|v| v == "ok");
    let status = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadinessResponse { ok, details }))
}
