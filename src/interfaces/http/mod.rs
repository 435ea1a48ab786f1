pub mod error;
pub mod static_assets;
pub mod upload;

use std::time::Instant;

use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::dev::{Server, Service};
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde::Serialize;
use tracing::info;

use crate::domain::error::{AppError, Result};
use crate::domain::review::AggregateResult;
use crate::infrastructure::config::ServerConfig;
use crate::interfaces::dashboard;
use crate::interfaces::state::AppState;

pub use static_assets::serve_static;
pub use upload::read_file_field;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: AggregateResult,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Read the upload and run it through the analysis pipeline on the
/// blocking pool.
pub(crate) async fn analyze_request(
    req: &HttpRequest,
    payload: Multipart,
    state: &AppState,
) -> Result<AggregateResult> {
    let bytes = read_file_field(req, payload, state.config.server.max_upload_bytes).await?;
    let analysis = state.analysis.clone();

    web::block(move || analysis.analyze_upload(&bytes))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}

async fn predict(
    req: HttpRequest,
    payload: Multipart,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let result = analyze_request(&req, payload, &state).await?;
    info!(
        total_reviews = result.total_reviews(),
        labels = result.sentiment_distribution().len(),
        "Prediction served"
    );
    Ok(HttpResponse::Ok().json(PredictResponse {
        success: true,
        result,
    }))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse { status: "healthy" })
}

/// Register every route. The static fallback goes last so API routes win.
pub fn configure(cfg: &mut web::ServiceConfig, server: &ServerConfig) {
    let prefix = server.route_prefix.as_str();
    cfg.service(web::resource(format!("{prefix}/predict")).route(web::post().to(predict)))
        .service(web::resource(format!("{prefix}/health")).route(web::get().to(health)))
        .service(
            web::resource("/dashboard")
                .route(web::get().to(dashboard::dashboard_form))
                .route(web::post().to(dashboard::dashboard_upload)),
        )
        .default_service(web::to(serve_static));
}

pub fn start_server(state: AppState) -> std::io::Result<Server> {
    let config = state.config.clone();
    let (host, port) = config.bind_address();
    let workers = config.server.workers;
    let data = web::Data::new(state);

    let mut server = HttpServer::new(move || {
        let server_config = config.server.clone();
        App::new()
            .wrap_fn(|req, srv| {
                let method = req.method().clone();
                let path = req.path().to_string();
                let start = Instant::now();
                let fut = srv.call(req);
                async move {
                    let res = fut.await?;
                    info!(
                        method = %method,
                        path = %path,
                        status = res.status().as_u16(),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "HTTP request"
                    );
                    Ok(res)
                }
            })
            .wrap(Cors::permissive())
            .app_data(data.clone())
            .configure(|cfg| configure(cfg, &server_config))
    })
    .bind((host.as_str(), port))?;

    if let Some(workers) = workers {
        server = server.workers(workers);
    }

    info!(host = %host, port, "HTTP server listening");
    Ok(server.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ReviewAnalysisService;
    use crate::domain::review::PredictionLabel;
    use crate::infrastructure::config::AppConfig;
    use crate::infrastructure::model::{ModelGateway, SentimentClassifier};
    use crate::interfaces::dashboard::DashboardRenderer;
    use actix_web::http::{header, StatusCode};
    use actix_web::test as actix_test;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::path::Path;
    use std::sync::Arc;

    const BOUNDARY: &str = "----sentimentboundary";

    struct KeywordClassifier;

    impl SentimentClassifier for KeywordClassifier {
        fn predict_batch(&self, texts: &[String]) -> Result<Vec<PredictionLabel>> {
            Ok(texts
                .iter()
                .map(|t| {
                    if t.contains("great") || t.contains("love") {
                        PredictionLabel::Positive
                    } else {
                        PredictionLabel::Negative
                    }
                })
                .collect())
        }
    }

    fn state_with(config: AppConfig) -> AppState {
        let gateway = ModelGateway::from_classifier(Arc::new(KeywordClassifier), "keyword");
        AppState {
            analysis: Arc::new(ReviewAnalysisService::from_config(&config, gateway)),
            dashboard: Arc::new(DashboardRenderer::new().unwrap()),
            config: Arc::new(config),
        }
    }

    fn config_with_static(dir: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.server.static_dir = dir.to_path_buf();
        config
    }

    fn multipart_body(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(uri: &str, field: &str, content: &[u8]) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri(uri)
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body(field, "reviews.csv", content))
    }

    macro_rules! init_app {
        ($state:expr) => {{
            let state = $state;
            let server = state.config.server.clone();
            actix_test::init_service(
                App::new()
                    .app_data(web::Data::new(state))
                    .configure(move |cfg| configure(cfg, &server)),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_predict_summarizes_upload() {
        let app = init_app!(state_with(AppConfig::default()));
        let csv = b"product_name,review\nWidget,great\nWidget,bad\nGadget,love it\n";

        let resp = actix_test::call_service(&app, upload_request("/predict", "file", csv).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let raw = actix_test::read_body(resp).await;
        let text = std::str::from_utf8(&raw).unwrap();
        // Ranking order must survive into the JSON text.
        assert!(text.contains(r#""top_products":{"Gadget":1.0,"Widget":0.5}"#));

        let body: Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(
            body,
            json!({
                "success": true,
                "sentiment_distribution": {"Positive": 2, "Negative": 1},
                "top_products": {"Gadget": 1.0, "Widget": 0.5},
                "sample_predictions": [
                    {"product_name": "Widget", "review": "great", "sentiment_label": "Positive"},
                    {"product_name": "Widget", "review": "bad", "sentiment_label": "Negative"},
                    {"product_name": "Gadget", "review": "love it", "sentiment_label": "Positive"}
                ],
                "total_reviews": 3
            })
        );
    }

    #[actix_web::test]
    async fn test_predict_without_file_field() {
        let app = init_app!(state_with(AppConfig::default()));
        let req = upload_request("/predict", "attachment", b"product_name,review\n").to_request();

        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"], "No file provided");
    }

    #[actix_web::test]
    async fn test_predict_rejects_non_multipart_body() {
        let app = init_app!(state_with(AppConfig::default()));
        let req = actix_test::TestRequest::post()
            .uri("/predict")
            .set_payload("product_name,review\n")
            .to_request();

        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["kind"], "missing_file");
    }

    #[actix_web::test]
    async fn test_predict_missing_column() {
        let app = init_app!(state_with(AppConfig::default()));
        let req = upload_request("/predict", "file", b"product_name,text\nWidget,great\n").to_request();

        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({
                "error": "CSV must contain columns: ['product_name', 'review']",
                "kind": "schema_error",
                "missing": ["review"]
            })
        );
    }

    #[actix_web::test]
    async fn test_predict_invalid_utf8_is_server_error() {
        let app = init_app!(state_with(AppConfig::default()));
        let req = upload_request("/predict", "file", b"product_name,review\nWidget,\xff\xfe\n").to_request();

        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["kind"], "parse_error");
    }

    #[actix_web::test]
    async fn test_predict_upload_limit() {
        let mut config = AppConfig::default();
        config.server.max_upload_bytes = 16;
        let app = init_app!(state_with(config));
        let req = upload_request("/predict", "file", b"product_name,review\nWidget,great\n").to_request();

        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["kind"], "upload_error");
    }

    #[actix_web::test]
    async fn test_health() {
        let app = init_app!(state_with(AppConfig::default()));
        let req = actix_test::TestRequest::get().uri("/health").to_request();

        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"status": "healthy"}));
    }

    #[actix_web::test]
    async fn test_route_prefix() {
        let mut config = AppConfig::default();
        config.server.route_prefix = "/api".to_string();
        let app = init_app!(state_with(config));

        let req = actix_test::TestRequest::get().uri("/api/health").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = upload_request("/api/predict", "file", b"product_name,review\nWidget,great\n").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_static_fallback_and_assets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>app</html>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log('app')").unwrap();
        let app = init_app!(state_with(config_with_static(dir.path())));

        let req = actix_test::TestRequest::get().uri("/").to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        assert_eq!(body, "<html>app</html>");

        let req = actix_test::TestRequest::get().uri("/reports/42").to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        assert_eq!(body, "<html>app</html>");

        let req = actix_test::TestRequest::get().uri("/app.js").to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        assert_eq!(body, "console.log('app')");
    }

    #[actix_web::test]
    async fn test_missing_entry_document() {
        let dir = tempfile::tempdir().unwrap();
        let app = init_app!(state_with(config_with_static(dir.path())));

        let req = actix_test::TestRequest::get().uri("/anything").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"], "Not found");
    }
}
