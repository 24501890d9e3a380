//! HTTP handlers for SeoLens server.

use actix_web::{HttpResponse, Responder, get, post, web};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use utoipa::{OpenApi, ToSchema};

use seolens_core::{
    AnalysisReport, Analyzer, ComparisonReport, ComparisonSummary, HistoryStore, MemoryBackend,
    PageAddress, PageFetcher,
};

use crate::openapi::ApiDoc;

/// Page fetcher shared by every worker.
pub type SharedFetcher = Box<dyn PageFetcher + Send + Sync>;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Analysis pipeline.
    pub analyzer: Arc<Analyzer<SharedFetcher>>,
    /// In-memory analysis and comparison history.
    pub history: Arc<RwLock<HistoryStore<MemoryBackend>>>,
}

impl AppState {
    /// Build state around a fetcher with an empty history.
    pub fn new(fetcher: SharedFetcher) -> seolens_core::Result<Self> {
        Ok(Self {
            analyzer: Arc::new(Analyzer::new(fetcher)),
            history: Arc::new(RwLock::new(HistoryStore::open(MemoryBackend::new())?)),
        })
    }
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

/// Request payload for a single analysis.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Absolute `http` or `https` address of the page.
    pub url: String,
}

/// Request payload for a comparison.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    /// Address of the primary page.
    pub primary_url: String,
    /// Address of the competitor page.
    pub competitor_url: String,
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse { message })
}

fn internal_error(message: String) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse { message })
}

fn record_history(
    state: &AppState,
    record: impl FnOnce(&mut HistoryStore<MemoryBackend>) -> seolens_core::Result<()>,
) {
    match state.history.write() {
        Ok(mut store) => {
            if let Err(err) = record(&mut store) {
                log::warn!("could not record history: {err}");
            }
        }
        Err(_) => log::warn!("history lock poisoned; entry not recorded"),
    }
}

#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis report", body = AnalysisReport),
        (status = 400, description = "Invalid address", body = ErrorResponse),
        (status = 500, description = "Analysis task failed", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[post("/api/analyze")]
/// Analyse a page and record it in history.
pub async fn analyze(
    state: web::Data<AppState>,
    payload: web::Json<AnalyzeRequest>,
) -> impl Responder {
    let address = match PageAddress::parse(&payload.url) {
        Ok(address) => address,
        Err(err) => return bad_request(err.to_string()),
    };

    let analyzer = state.analyzer.clone();
    let report = match web::block(move || analyzer.analyze(&address)).await {
        Ok(report) => report,
        Err(err) => return internal_error(format!("analysis failed: {err}")),
    };

    record_history(&state, |store| store.record_analysis(&report));
    HttpResponse::Ok().json(report)
}

#[utoipa::path(
    post,
    path = "/compare",
    request_body = CompareRequest,
    responses(
        (status = 200, description = "Comparison report", body = ComparisonReport),
        (status = 400, description = "Invalid address", body = ErrorResponse),
        (status = 500, description = "Comparison task failed", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[post("/api/compare")]
/// Compare a page against a competitor and record the outcome in history.
pub async fn compare(
    state: web::Data<AppState>,
    payload: web::Json<CompareRequest>,
) -> impl Responder {
    let primary = match PageAddress::parse(&payload.primary_url) {
        Ok(address) => address,
        Err(err) => return bad_request(err.to_string()),
    };
    let competitor = match PageAddress::parse(&payload.competitor_url) {
        Ok(address) => address,
        Err(err) => return bad_request(err.to_string()),
    };

    let analyzer = state.analyzer.clone();
    let report = match web::block(move || analyzer.compare(&primary, &competitor)).await {
        Ok(report) => report,
        Err(err) => return internal_error(format!("comparison failed: {err}")),
    };

    record_history(&state, |store| store.record_comparison(&report));
    HttpResponse::Ok().json(report)
}

#[utoipa::path(
    get,
    path = "/history/analyses",
    responses(
        (status = 200, description = "Recent analyses, newest first", body = [AnalysisReport]),
        (status = 500, description = "History unavailable", body = ErrorResponse)
    ),
    tag = "history"
)]
#[get("/api/history/analyses")]
/// List recent analyses.
pub async fn history_analyses(state: web::Data<AppState>) -> impl Responder {
    match state.history.read() {
        Ok(store) => HttpResponse::Ok().json(store.analyses()),
        Err(_) => internal_error("history unavailable".to_string()),
    }
}

#[utoipa::path(
    get,
    path = "/history/comparisons",
    responses(
        (
            status = 200,
            description = "Recent comparisons, newest first",
            body = [ComparisonSummary]
        ),
        (status = 500, description = "History unavailable", body = ErrorResponse)
    ),
    tag = "history"
)]
#[get("/api/history/comparisons")]
/// List recent comparisons.
pub async fn history_comparisons(state: web::Data<AppState>) -> impl Responder {
    match state.history.read() {
        Ok(store) => HttpResponse::Ok().json(store.comparisons()),
        Err(_) => internal_error("history unavailable".to_string()),
    }
}

#[utoipa::path(
    get,
    path = "/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/api/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use seolens_core::{Category, FetchConfig, HttpFetcher, SeoLensError};

    const PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <title>Neighbourhood bakery with fresh bread daily</title>
  <meta name="viewport" content="width=device-width, initial-scale=1">
</head>
<body><h1>Bakery</h1><h2>Bread</h2><img src="loaf.jpg" alt="Sourdough loaf"></body>
</html>"#;

    struct StubFetcher;

    impl PageFetcher for StubFetcher {
        fn fetch(&self, address: &PageAddress) -> seolens_core::Result<String> {
            if address.host().starts_with("down") {
                Err(SeoLensError::Http(format!("{address} unreachable")))
            } else {
                Ok(PAGE.to_string())
            }
        }
    }

    fn test_state() -> web::Data<AppState> {
        web::Data::new(AppState::new(Box::new(StubFetcher)).expect("state"))
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state.clone())
                    .service(analyze)
                    .service(compare)
                    .service(history_analyses)
                    .service(history_comparisons)
                    .service(openapi_json),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn analyze_returns_report_and_records_history() {
        let state = test_state();
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/analyze")
            .set_json(AnalyzeRequest {
                url: "https://bakery.example/".to_string(),
            })
            .to_request();
        let report: AnalysisReport = test::call_and_read_body_json(&app, req).await;

        assert_eq!(report.domain, "bakery.example");
        assert_eq!(report.categories.len(), 11);
        assert_eq!(report.score(Category::TitleTag), Some(95));
        assert!(report.note.is_none());

        let req = test::TestRequest::get()
            .uri("/api/history/analyses")
            .to_request();
        let history: Vec<AnalysisReport> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].domain, "bakery.example");
    }

    #[actix_web::test]
    async fn analyze_falls_back_when_unreachable() {
        let state = test_state();
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/analyze")
            .set_json(AnalyzeRequest {
                url: "https://down.example".to_string(),
            })
            .to_request();
        let report: AnalysisReport = test::call_and_read_body_json(&app, req).await;

        assert!(report.is_estimate());
        assert_eq!(report.categories.len(), 6);
    }

    #[actix_web::test]
    async fn analyze_rejects_invalid_address() {
        let state = test_state();
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/analyze")
            .set_json(AnalyzeRequest {
                url: "ftp://bakery.example".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.message.contains("invalid address"));

        let history = state.history.read().expect("history");
        assert!(history.analyses().is_empty());
    }

    #[actix_web::test]
    async fn compare_returns_report_and_summary() {
        let state = test_state();
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/compare")
            .set_json(CompareRequest {
                primary_url: "https://bakery.example".to_string(),
                competitor_url: "https://down.example".to_string(),
            })
            .to_request();
        let report: ComparisonReport = test::call_and_read_body_json(&app, req).await;

        assert!(report.primary.note.is_none());
        assert!(report.competitor.is_estimate());
        assert_eq!(report.per_category_delta.len(), 6);

        let req = test::TestRequest::get()
            .uri("/api/history/comparisons")
            .to_request();
        let history: Vec<ComparisonSummary> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].primary.domain, "bakery.example");
        assert_eq!(history[0].competitor.domain, "down.example");
    }

    #[actix_web::test]
    async fn compare_rejects_invalid_competitor() {
        let state = test_state();
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/compare")
            .set_json(serde_json::json!({
                "primaryUrl": "https://bakery.example",
                "competitorUrl": "bakery"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn history_starts_empty() {
        let state = test_state();
        let app = test_app!(state);

        let req = test::TestRequest::get()
            .uri("/api/history/comparisons")
            .to_request();
        let history: Vec<ComparisonSummary> = test::call_and_read_body_json(&app, req).await;
        assert!(history.is_empty());
    }

    #[actix_web::test]
    async fn analyze_fetches_over_http() {
        let server = MockServer::start_async().await;
        let page = server
            .mock_async(|when, then| {
                when.method(GET).path("/");
                then.status(200)
                    .header("content-type", "text/html")
                    .body(PAGE);
            })
            .await;

        // The blocking client may not be built on an async worker.
        let fetcher = web::block(|| HttpFetcher::new(&FetchConfig::default()))
            .await
            .expect("block")
            .expect("client");
        let state = web::Data::new(AppState::new(Box::new(fetcher)).expect("state"));
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/analyze")
            .set_json(AnalyzeRequest {
                url: server.url("/"),
            })
            .to_request();
        let report: AnalysisReport = test::call_and_read_body_json(&app, req).await;

        assert!(report.note.is_none());
        assert_eq!(report.score(Category::Headings), Some(85));
        page.assert_async().await;
    }

    #[actix_web::test]
    async fn openapi_json_serves_document() {
        let app = test::init_service(App::new().service(openapi_json)).await;
        let req = test::TestRequest::get()
            .uri("/api/openapi.json")
            .to_request();
        let doc: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(doc["paths"]["/analyze"].is_object());
    }
}
