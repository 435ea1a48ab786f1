// ============================================================
// REVIEW ANALYSIS USE CASE
// ============================================================
// Upload bytes -> validated review table -> sentiment summary
// Shared by the JSON API and the dashboard

use std::time::Instant;

use tracing::info;

use crate::application::use_cases::sentiment_aggregator::{AggregationLimits, SentimentAggregator};
use crate::domain::error::Result;
use crate::domain::review::{AggregateResult, ReviewTable};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv::ReviewFrameValidator;
use crate::infrastructure::model::ModelGateway;

#[derive(Debug, Clone)]
pub struct ReviewAnalysisService {
    validator: ReviewFrameValidator,
    aggregator: SentimentAggregator,
}

impl ReviewAnalysisService {
    pub fn new(validator: ReviewFrameValidator, aggregator: SentimentAggregator) -> Self {
        Self {
            validator,
            aggregator,
        }
    }

    pub fn from_config(config: &AppConfig, gateway: ModelGateway) -> Self {
        Self::new(
            ReviewFrameValidator::from_config(&config.csv),
            SentimentAggregator::new(gateway, AggregationLimits::from(&config.analysis)),
        )
    }

    /// Validate an uploaded CSV and summarize its sentiment.
    ///
    /// Schema problems are reported before the classifier is touched.
    pub fn analyze_upload(&self, bytes: &[u8]) -> Result<AggregateResult> {
        let table = self.validator.parse(bytes)?;
        self.analyze_table(&table)
    }

    pub fn analyze_table(&self, table: &ReviewTable) -> Result<AggregateResult> {
        let start = Instant::now();
        let result = self.aggregator.aggregate(table)?;

        info!(
            rows = table.len(),
            products_ranked = result.top_products().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Review table analyzed"
        );

        Ok(result)
    }
}
