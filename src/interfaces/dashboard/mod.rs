// ============================================================
// INTERACTIVE DASHBOARD
// ============================================================
// Upload form + charts over the same analysis pipeline as /predict

pub mod charts;

use actix_multipart::Multipart;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{error, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::review::{AggregateResult, SamplePrediction};
use crate::interfaces::http::analyze_request;
use crate::interfaces::http::error::status_for;
use crate::interfaces::state::AppState;

use charts::{BarChart, PieChart};

const TEMPLATE_NAME: &str = "dashboard";

/// One preview table row, pass-through cells included.
#[derive(Serialize)]
struct PreviewRow<'a> {
    product_name: &'a str,
    review: &'a str,
    sentiment_label: &'static str,
    extra: &'a [String],
}

impl<'a> From<&'a SamplePrediction> for PreviewRow<'a> {
    fn from(sample: &'a SamplePrediction) -> Self {
        Self {
            product_name: &sample.product_name,
            review: &sample.review,
            sentiment_label: sample.sentiment_label.as_str(),
            extra: &sample.extra,
        }
    }
}

#[derive(Serialize, Default)]
struct DashboardPage<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a AggregateResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pie: Option<PieChart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bars: Option<BarChart>,
    columns: &'a [String],
    preview: Vec<PreviewRow<'a>>,
}

#[derive(Debug)]
pub struct DashboardRenderer {
    handlebars: Handlebars<'static>,
}

impl DashboardRenderer {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars
            .register_template_string(TEMPLATE_NAME, include_str!("templates/dashboard.hbs"))
            .map_err(|e| AppError::Render(e.to_string()))?;
        Ok(Self { handlebars })
    }

    fn render(&self, page: &DashboardPage<'_>) -> Result<String> {
        self.handlebars
            .render(TEMPLATE_NAME, page)
            .map_err(|e| AppError::Render(e.to_string()))
    }

    pub fn render_form(&self) -> Result<String> {
        self.render(&DashboardPage::default())
    }

    /// Results page; the preview table shows at most `preview_rows` samples.
    pub fn render_result(&self, result: &AggregateResult, preview_rows: usize) -> Result<String> {
        let preview = result
            .sample_predictions()
            .iter()
            .take(preview_rows)
            .map(PreviewRow::from)
            .collect();
        self.render(&DashboardPage {
            error: None,
            result: Some(result),
            pie: Some(charts::pie_chart(result.sentiment_distribution())),
            bars: Some(charts::bar_chart(result.top_products())),
            columns: result.extra_columns(),
            preview,
        })
    }

    pub fn render_error(&self, err: &AppError) -> Result<String> {
        self.render(&DashboardPage {
            error: Some(err.to_string()),
            ..DashboardPage::default()
        })
    }
}

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body)
}

pub async fn dashboard_form(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(html(StatusCode::OK, state.dashboard.render_form()?))
}

pub async fn dashboard_upload(
    req: HttpRequest,
    payload: Multipart,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    match analyze_request(&req, payload, &state).await {
        Ok(result) => {
            let page = state
                .dashboard
                .render_result(&result, state.config.analysis.dashboard_preview_rows)?;
            Ok(html(StatusCode::OK, page))
        }
        Err(err) => {
            let status = status_for(&err);
            if status.is_server_error() {
                error!(error = %err, kind = ?err.kind(), "Dashboard analysis failed");
            } else {
                warn!(error = %err, kind = ?err.kind(), "Dashboard upload rejected");
            }
            Ok(html(status, state.dashboard.render_error(&err)?))
        }
    }
}
