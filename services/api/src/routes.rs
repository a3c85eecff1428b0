use crate::infra::{AppState, RiskServices};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use reoffending_risk::error::AppError;
use reoffending_risk::offences::{OffenceCode, OffenceFlags, ReloadSummary, WeightingKind};
use reoffending_risk::{AssessmentOutcome, AssessmentRequest};
use serde::Serialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, Serialize)]
pub(crate) struct OffenceView {
    pub(crate) code: String,
    pub(crate) category: String,
    pub(crate) sub_category: String,
    pub(crate) flags: OffenceFlags,
    pub(crate) general_weighting: Option<f64>,
    pub(crate) violent_weighting: Option<f64>,
    pub(crate) generation: u64,
}

impl OffenceView {
    fn new(offence: &OffenceCode, generation: u64) -> Self {
        Self {
            code: offence.code.clone(),
            category: offence.category.clone(),
            sub_category: offence.sub_category.clone(),
            flags: offence.flags,
            general_weighting: offence.weighting(WeightingKind::General),
            violent_weighting: offence.weighting(WeightingKind::Violent),
            generation,
        }
    }
}

pub(crate) fn with_risk_routes(services: RiskServices) -> Router {
    Router::new()
        .route("/api/v1/assessments", post(assessment_endpoint))
        .route("/api/v1/offences/reload", post(reload_endpoint))
        .route("/api/v1/offences/:code", get(offence_endpoint))
        .with_state(services)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Always 200 once the body parses: per-instrument validation problems are
/// part of the outcome.
pub(crate) async fn assessment_endpoint(
    State(services): State<RiskServices>,
    Json(request): Json<AssessmentRequest>,
) -> Json<AssessmentOutcome> {
    Json(services.engine.assess(&request))
}

pub(crate) async fn offence_endpoint(
    State(services): State<RiskServices>,
    Path(code): Path<String>,
) -> Response {
    let table = services.engine.offences().snapshot();
    match table.lookup(&code) {
        Some(offence) => Json(OffenceView::new(offence, table.generation())).into_response(),
        None => {
            let payload = json!({ "error": format!("offence code {code} is not recognised") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn reload_endpoint(
    State(services): State<RiskServices>,
) -> Result<Json<ReloadSummary>, AppError> {
    let registry = services.engine.offences().clone();
    let source = services.offence_source.clone();

    let summary = tokio::task::spawn_blocking(move || registry.reload(source.as_ref()))
        .await
        .map_err(|err| AppError::Io(std::io::Error::new(std::io::ErrorKind::Other, err)))??;

    info!(
        generation = summary.generation,
        offences = summary.offences,
        "offence table reload requested over http"
    );
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use reoffending_risk::instruments::ModelParameters;
    use reoffending_risk::offences::{FileOffenceSource, OffenceRegistry, OffenceSource};
    use reoffending_risk::RiskEngine;
    use serde_json::Value;
    use std::fs;
    use std::path::{Path as FsPath, PathBuf};
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    const HEADER: &str = "code,category,sub_category,violent,sexual,indecent_image,general_weighting,violent_weighting";

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../crates/reoffending-risk/tests/fixtures")
            .join(name)
    }

    fn write_table(path: &FsPath, rows: &[&str]) {
        let body = std::iter::once(HEADER)
            .chain(rows.iter().copied())
            .collect::<Vec<_>>()
            .join("\n");
        fs::write(path, body).expect("write offence table");
    }

    fn router(offence_table: &FsPath, ready: bool) -> Router {
        let parameters =
            ModelParameters::from_path(fixture("model_parameters.json")).expect("parameters load");
        let source: Arc<dyn OffenceSource> = Arc::new(FileOffenceSource::new(offence_table));
        let registry = Arc::new(OffenceRegistry::default());
        registry.reload(source.as_ref()).expect("initial table loads");

        let services = RiskServices::new(RiskEngine::new(Arc::new(parameters), registry), source);
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_risk_routes(services).layer(Extension(state))
    }

    async fn read_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn assessment_route_returns_scores_and_errors() {
        let router = router(&fixture("offences.csv"), true);
        let body = json!({
            "general": {
                "gender": "MALE",
                "date_of_birth": "1990-03-01",
                "date_of_current_conviction": "2020-03-01",
                "date_of_first_sanction": "2010-03-01",
                "total_sanctions": 20,
                "current_offence_code": "02801"
            },
            "sexual_image": {
                "gender": "FEMALE",
                "indecent_image_sanctions": 0,
                "contact_child_sanctions": 0,
                "sexual_sanctions": 0
            }
        });

        let response = router
            .oneshot(post_json("/api/v1/assessments", body))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let payload = read_json(response).await;
        assert_eq!(payload["general"]["two_year_percentage"], json!(65));
        assert_eq!(payload["sexual_image"]["errors"][0]["field"], json!("gender"));
    }

    #[tokio::test]
    async fn malformed_assessment_body_is_rejected() {
        let router = router(&fixture("offences.csv"), true);
        let response = router
            .oneshot(post_json("/api/v1/assessments", json!({ "general": { "gender": "X" } })))
            .await
            .expect("route executes");
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn offence_lookup_returns_view_or_not_found() {
        let router = router(&fixture("offences.csv"), true);
        let response = router
            .clone()
            .oneshot(Request::get("/api/v1/offences/00501").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        assert_eq!(payload["flags"]["violent"], json!(true));
        assert_eq!(payload["violent_weighting"], json!(0.4));
        assert_eq!(payload["generation"], json!(1));

        let response = router
            .oneshot(Request::get("/api/v1/offences/12345").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reload_route_swaps_table_or_keeps_old_one() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("offences.csv");
        write_table(&path, &["02801,Theft,Shoplifting,N,N,N,0.5,"]);
        let router = router(&path, true);

        write_table(
            &path,
            &[
                "02801,Theft,Shoplifting,N,N,N,0.5,",
                "00501,Violence against the person,Wounding,Y,N,N,0.3,0.4",
            ],
        );
        let response = router
            .clone()
            .oneshot(Request::post("/api/v1/offences/reload").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({ "generation": 2, "offences": 2 })
        );

        write_table(&path, &["02801,Theft,Shoplifting,N,N,N,0.5,", "02801,Theft,Again,N,N,N,0.5,"]);
        let response = router
            .clone()
            .oneshot(Request::post("/api/v1/offences/reload").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let payload = read_json(response).await;
        assert!(payload["error"]
            .as_str()
            .expect("error message")
            .contains("duplicate offence code 02801"));

        let response = router
            .oneshot(Request::get("/api/v1/offences/00501").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(read_json(response).await["generation"], json!(2));
    }

    #[tokio::test]
    async fn readiness_reflects_startup_state() {
        let router = router(&fixture("offences.csv"), false);
        let response = router
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
