use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::Config;
use crate::domain::{ClientId, MatterId, TimeEntry, TimekeeperId};
use crate::ingest::{ingest_activities, summarize_window_activity, AwClient, IngestContext, IngestFilters};
use crate::ledes::{self, InvoiceParams, LedesError};
use crate::mapper::Categorizer;
use crate::observability::MetricsRegistry;
use crate::policy::{self, NarrativeLinter};
use crate::rules::RuleSet;
use crate::storage::Storage;

use super::request::{ComplianceCheckRequest, EntryRequest, ExportRequest, IngestRequest, TextRequest};
use super::response::{
    ComplianceCheckResponse, ErrorResponse, ExportResponse, HealthResponse, IngestResponse,
    NarrativeLintResponse, ReadyResponse,
};

/// Shared application state.
pub struct AppState {
    /// Storage backend for persistence
    pub storage: Arc<dyn Storage>,

    /// Runtime configuration (paths are re-read per request where the
    /// contract demands it)
    pub config: Config,

    /// UTBMS seed categorizer
    pub categorizer: Categorizer,

    /// Single-narrative linter
    pub linter: NarrativeLinter,

    /// Metrics registry
    pub metrics: MetricsRegistry,

    /// Application start time
    pub start_time: Instant,

    /// Application version
    pub version: String,
}

/// Create the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/compliance/check", post(handle_compliance_check))
        .route("/v1/ingest", post(handle_ingest))
        .route("/v1/export/ledes", post(handle_export_ledes))
        .route("/v1/categorize", post(handle_categorize))
        .route("/v1/narrative/lint", post(handle_narrative_lint))
        .route("/health", get(handle_health))
        .route("/ready", get(handle_ready))
        .route("/metrics", get(handle_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn internal_error(error: anyhow::Error) -> Response {
    warn!(error = %error, "Request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(error.to_string())),
    )
        .into_response()
}

/// Handle compliance check requests.
///
/// The rule configuration is resolved fresh on every call so edits to
/// thresholds take effect without a restart.
async fn handle_compliance_check(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ComplianceCheckRequest>,
) -> Response {
    let entries: Vec<TimeEntry> = if let Some(inline) = &req.entries {
        inline.iter().map(EntryRequest::to_time_entry).collect()
    } else if let (Some(matter_id), Some(start), Some(end)) =
        (&req.matter_id, req.start_date, req.end_date)
    {
        match state
            .storage
            .entries_between(&MatterId::new(matter_id.as_str()), start, end)
            .await
        {
            Ok(entries) => entries,
            Err(e) => return internal_error(e),
        }
    } else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "entries, or matter_id with start_date and end_date, are required",
            )),
        )
            .into_response();
    };

    let ruleset = match policy::resolve_rules_config(
        Some(&state.config.rules_config_path),
        Some(&state.config.policy_dir),
        req.client_id.as_deref(),
    ) {
        Some(cfg) => RuleSet::from_config(&cfg),
        None => {
            state.metrics.record_config_fallback();
            RuleSet::default_set()
        }
    };

    let issues = ruleset.run(&entries);
    state.metrics.record_compliance_run(entries.len(), &issues);

    (
        StatusCode::OK,
        Json(ComplianceCheckResponse {
            issues,
            active_rules: ruleset.ids(),
        }),
    )
        .into_response()
}

/// Handle ActivityWatch ingestion requests.
async fn handle_ingest(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IngestRequest>,
) -> Response {
    let client = AwClient::new(req.url.as_deref().unwrap_or(&state.config.aw_base_url));
    let filters = IngestFilters::load(&state.config.filter_path);

    let until = req.until.unwrap_or_else(Utc::now);
    let since = req.since.unwrap_or(until - Duration::hours(24));

    let summaries = summarize_window_activity(&client, since, until, &filters).await;
    let context = IngestContext {
        client_id: ClientId::new(req.client_id),
        matter_id: MatterId::new(req.matter_id),
        timekeeper_id: req.timekeeper_id.map(TimekeeperId::new),
    };

    match ingest_activities(state.storage.as_ref(), &summaries, &context).await {
        Ok(inserted) => {
            state.metrics.record_ingest(inserted);
            (StatusCode::OK, Json(IngestResponse { inserted })).into_response()
        }
        Err(e) => internal_error(e),
    }
}

/// Handle LEDES 1998B export requests.
async fn handle_export_ledes(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExportRequest>,
) -> Response {
    let matter = match state.storage.get_matter(&req.client_matter_id).await {
        Ok(Some(matter)) => matter,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(
                    "Matter not found. Please add it under 'matters'.",
                )),
            )
                .into_response();
        }
        Err(e) => return internal_error(e),
    };

    let entries = match state
        .storage
        .entries_between(
            &MatterId::new(req.client_matter_id.as_str()),
            req.billing_start,
            req.billing_end,
        )
        .await
    {
        Ok(entries) => entries,
        Err(e) => return internal_error(e),
    };

    let mut timekeepers = HashMap::new();
    for entry in &entries {
        let Some(id) = &entry.timekeeper_id else {
            continue;
        };
        if timekeepers.contains_key(id.as_str()) {
            continue;
        }
        match state.storage.get_timekeeper(id).await {
            Ok(Some(tk)) => {
                timekeepers.insert(id.as_str().to_string(), tk);
            }
            Ok(None) => {} // build_invoice reports the missing timekeeper
            Err(e) => return internal_error(e),
        }
    }

    let params = InvoiceParams {
        invoice_number: req.invoice_number.clone(),
        billing_start: req.billing_start,
        billing_end: req.billing_end,
        invoice_description: req.invoice_description.clone(),
    };

    let lines = match ledes::build_invoice(&matter, &entries, &timekeepers, &params) {
        Ok(lines) => lines,
        Err(e @ (LedesError::MissingTimekeeper(_) | LedesError::Validation(_))) => {
            state.metrics.record_export(false);
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response();
        }
        Err(e) => {
            state.metrics.record_export(false);
            return internal_error(e.into());
        }
    };

    let content = ledes::render(&lines);
    match ledes::write_invoice(
        &state.config.export_dir,
        &req.client_matter_id,
        &req.invoice_number,
        &content,
    ) {
        Ok(path) => {
            state.metrics.record_export(true);
            (
                StatusCode::OK,
                Json(ExportResponse {
                    file_path: path.display().to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            state.metrics.record_export(false);
            internal_error(e.into())
        }
    }
}

/// Handle narrative categorization requests.
async fn handle_categorize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Response {
    let override_codes = match state.storage.lookup_override(req.text.trim()).await {
        Ok(codes) => codes,
        Err(e) => return internal_error(e),
    };

    let result = state.categorizer.categorize(&req.text, override_codes.as_ref());
    (StatusCode::OK, Json(result)).into_response()
}

/// Handle narrative lint requests.
async fn handle_narrative_lint(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Response {
    let warnings = state.linter.check(&req.text);
    (StatusCode::OK, Json(NarrativeLintResponse { warnings })).into_response()
}

/// Health check endpoint.
async fn handle_health(State(state): State<Arc<AppState>>) -> Response {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: state.version.clone(),
            uptime_secs: state.start_time.elapsed().as_secs(),
        }),
    )
        .into_response()
}

/// Readiness check endpoint.
async fn handle_ready(State(state): State<Arc<AppState>>) -> Response {
    // Ready once storage answers a trivial query
    let ready = state.storage.list_entries().await.is_ok();
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadyResponse { ready })).into_response()
}

/// Prometheus metrics endpoint.
async fn handle_metrics(State(state): State<Arc<AppState>>) -> Response {
    state.metrics.to_prometheus().into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::UtbmsSeeds;
    use crate::storage::SqliteStorage;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn test_state() -> Arc<AppState> {
        let storage = SqliteStorage::in_memory().await.unwrap();
        storage.init_schema().await.unwrap();

        let mut config = Config::default();
        // Nonexistent paths: rule config resolution falls back to defaults
        config.rules_config_path = "/nonexistent/rules.yml".into();
        config.policy_dir = "/nonexistent/policy".into();

        Arc::new(AppState {
            storage: Arc::new(storage),
            config,
            categorizer: Categorizer::new(UtbmsSeeds::default()),
            linter: NarrativeLinter::new(),
            metrics: MetricsRegistry::new(),
            start_time: Instant::now(),
            version: "test".to_string(),
        })
    }

    async fn post_json(router: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    #[tokio::test]
    async fn test_compliance_check_with_inline_entries() {
        let router = create_router(test_state().await);

        let (status, body) = post_json(
            router,
            "/v1/compliance/check",
            r#"{"entries": [{"duration_hours": 1.0, "description": "work on it"}]}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let issues = body["issues"].as_array().unwrap();
        let rule_ids: Vec<&str> = issues.iter().map(|i| i["rule_id"].as_str().unwrap()).collect();
        assert!(rule_ids.contains(&"description_length"));
        assert!(rule_ids.contains(&"vague_phrase"));
        assert_eq!(body["active_rules"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_compliance_check_requires_entries_or_range() {
        let router = create_router(test_state().await);

        let (status, _) = post_json(router, "/v1/compliance/check", r#"{}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_unknown_matter_is_404() {
        let router = create_router(test_state().await);

        let (status, body) = post_json(
            router,
            "/v1/export/ledes",
            r#"{
                "client_matter_id": "CM-404",
                "invoice_number": "INV-1",
                "billing_start": "2025-08-01",
                "billing_end": "2025-08-31"
            }"#,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("Matter not found"));
    }

    #[tokio::test]
    async fn test_narrative_lint() {
        let router = create_router(test_state().await);

        let (status, body) = post_json(
            router,
            "/v1/narrative/lint",
            r#"{"text": "Handled various tasks"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["warnings"].as_array().unwrap().len(), 1);
    }
}
