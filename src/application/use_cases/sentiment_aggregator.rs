// ============================================================
// SENTIMENT AGGREGATOR USE CASE
// ============================================================
// Classify every review and summarize the labels per table and per product

use std::collections::HashMap;

use crate::domain::error::Result;
use crate::domain::review::{
    AggregateResult, LabelCount, PredictionLabel, ProductScore, ReviewRecord, ReviewTable,
    SamplePrediction, SentimentDistribution, TopProducts,
};
use crate::infrastructure::config::AnalysisConfig;
use crate::infrastructure::model::ModelGateway;

/// Output caps for the ranked and sampled sections of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationLimits {
    pub top_products: usize,
    pub sample_size: usize,
}

impl Default for AggregationLimits {
    fn default() -> Self {
        Self {
            top_products: 10,
            sample_size: 20,
        }
    }
}

impl From<&AnalysisConfig> for AggregationLimits {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            top_products: config.top_products_limit,
            sample_size: config.sample_size,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SentimentAggregator {
    gateway: ModelGateway,
    limits: AggregationLimits,
}

impl SentimentAggregator {
    pub fn new(gateway: ModelGateway, limits: AggregationLimits) -> Self {
        Self { gateway, limits }
    }

    pub fn limits(&self) -> AggregationLimits {
        self.limits
    }

    /// Run inference over the `review` column and build the summary.
    pub fn aggregate(&self, table: &ReviewTable) -> Result<AggregateResult> {
        let labels = self.gateway.predict(table.reviews())?;
        Ok(summarize(table.records(), &labels, self.limits)
            .with_extra_columns(table.extra_columns().to_vec()))
    }
}

/// `labels[i]` is the prediction for `records[i]`.
fn summarize(
    records: &[ReviewRecord],
    labels: &[PredictionLabel],
    limits: AggregationLimits,
) -> AggregateResult {
    AggregateResult::new(
        count_labels(labels),
        rank_products(records, labels, limits.top_products),
        sample_rows(records, labels, limits.sample_size),
        records.len(),
    )
}

/// Most frequent label first; equal counts keep first-seen order.
fn count_labels(labels: &[PredictionLabel]) -> SentimentDistribution {
    let mut counts: Vec<LabelCount> = Vec::new();
    for &label in labels {
        match counts.iter_mut().find(|c| c.label == label) {
            Some(entry) => entry.count += 1,
            None => counts.push(LabelCount { label, count: 1 }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    SentimentDistribution::from_counts(counts)
}

/// Mean positive score per product, best first, truncated to `limit`.
///
/// Groups are collected in first-appearance order and the sort is stable, so
/// products with equal means keep the order in which they were first seen.
/// There is no minimum review count: one positive review scores 1.0.
fn rank_products(records: &[ReviewRecord], labels: &[PredictionLabel], limit: usize) -> TopProducts {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, usize, usize)> = Vec::new(); // (name, positives, total)

    for (record, label) in records.iter().zip(labels) {
        let slot = *index.entry(record.product_name.as_str()).or_insert_with(|| {
            groups.push((record.product_name.as_str(), 0, 0));
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.1 += usize::from(label.value());
        group.2 += 1;
    }

    let mut ranked: Vec<ProductScore> = groups
        .into_iter()
        .map(|(name, positives, total)| ProductScore {
            product_name: name.to_string(),
            score: positives as f64 / total as f64,
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(limit);

    TopProducts::from_ranked(ranked)
}

fn sample_rows(
    records: &[ReviewRecord],
    labels: &[PredictionLabel],
    size: usize,
) -> Vec<SamplePrediction> {
    records
        .iter()
        .zip(labels)
        .take(size)
        .map(|(record, &label)| SamplePrediction {
            product_name: record.product_name.clone(),
            review: record.review.clone(),
            sentiment_label: label,
            extra: record.extra.clone(),
        })
        .collect()
}
