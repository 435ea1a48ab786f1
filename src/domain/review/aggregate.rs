// ============================================================
// AGGREGATE RESULT TYPES
// ============================================================
// Read-only sentiment summary of one uploaded review table

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::PredictionLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelCount {
    pub label: PredictionLabel,
    pub count: usize,
}

/// Row count per sentiment label.
///
/// Labels that never occur are absent. Serializes as a JSON object whose
/// keys follow the stored order (most frequent first).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentimentDistribution(Vec<LabelCount>);

impl SentimentDistribution {
    pub(crate) fn from_counts(counts: Vec<LabelCount>) -> Self {
        Self(counts)
    }

    pub fn get(&self, label: PredictionLabel) -> Option<usize> {
        self.0.iter().find(|c| c.label == label).map(|c| c.count)
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|c| c.count).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabelCount> {
        self.0.iter()
    }
}

impl Serialize for SentimentDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(entry.label.as_str(), &entry.count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductScore {
    pub product_name: String,

    /// Fraction of the product's reviews classified Positive, in [0, 1]
    pub score: f64,
}

/// Products ranked by mean positive score, best first.
///
/// Serializes as a JSON object keyed by product name. Keys follow the
/// ranking order; names are unique after grouping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopProducts(Vec<ProductScore>);

impl TopProducts {
    pub(crate) fn from_ranked(ranked: Vec<ProductScore>) -> Self {
        Self(ranked)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductScore> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ProductScore] {
        &self.0
    }
}

impl Serialize for TopProducts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(&entry.product_name, &entry.score)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SamplePrediction {
    pub product_name: String,
    pub review: String,
    pub sentiment_label: PredictionLabel,

    /// Pass-through cells, aligned with `AggregateResult::extra_columns`
    #[serde(skip)]
    pub extra: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    sentiment_distribution: SentimentDistribution,
    top_products: TopProducts,
    sample_predictions: Vec<SamplePrediction>,
    total_reviews: usize,
    #[serde(skip)]
    extra_columns: Vec<String>,
}

impl AggregateResult {
    pub(crate) fn new(
        sentiment_distribution: SentimentDistribution,
        top_products: TopProducts,
        sample_predictions: Vec<SamplePrediction>,
        total_reviews: usize,
    ) -> Self {
        Self {
            sentiment_distribution,
            top_products,
            sample_predictions,
            total_reviews,
            extra_columns: Vec::new(),
        }
    }

    pub(crate) fn with_extra_columns(mut self, extra_columns: Vec<String>) -> Self {
        self.extra_columns = extra_columns;
        self
    }

    pub fn sentiment_distribution(&self) -> &SentimentDistribution {
        &self.sentiment_distribution
    }

    pub fn top_products(&self) -> &TopProducts {
        &self.top_products
    }

    pub fn sample_predictions(&self) -> &[SamplePrediction] {
        &self.sample_predictions
    }

    pub fn total_reviews(&self) -> usize {
        self.total_reviews
    }

    /// Headers of the uploaded columns besides `product_name` and `review`.
    /// Shown by the dashboard preview, never part of the JSON body.
    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_serializes_in_stored_order() {
        let distribution = SentimentDistribution::from_counts(vec![
            LabelCount {
                label: PredictionLabel::Positive,
                count: 2,
            },
            LabelCount {
                label: PredictionLabel::Negative,
                count: 1,
            },
        ]);

        let json = serde_json::to_string(&distribution).unwrap();
        assert_eq!(json, r#"{"Positive":2,"Negative":1}"#);
        assert_eq!(distribution.total(), 3);
        assert_eq!(distribution.get(PredictionLabel::Negative), Some(1));
    }

    #[test]
    fn test_top_products_serialize_in_rank_order() {
        let top = TopProducts::from_ranked(vec![
            ProductScore {
                product_name: "Zeta".to_string(),
                score: 1.0,
            },
            ProductScore {
                product_name: "Alpha".to_string(),
                score: 0.5,
            },
        ]);

        let json = serde_json::to_string(&top).unwrap();
        assert_eq!(json, r#"{"Zeta":1.0,"Alpha":0.5}"#);
    }

    #[test]
    fn test_empty_result_shape() {
        let result = AggregateResult::new(
            SentimentDistribution::default(),
            TopProducts::default(),
            Vec::new(),
            0,
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sentiment_distribution": {},
                "top_products": {},
                "sample_predictions": [],
                "total_reviews": 0
            })
        );
    }

    #[test]
    fn test_extra_columns_stay_out_of_json() {
        let result = AggregateResult::new(
            SentimentDistribution::default(),
            TopProducts::default(),
            vec![SamplePrediction {
                product_name: "Widget".to_string(),
                review: "great".to_string(),
                sentiment_label: PredictionLabel::Positive,
                extra: vec!["5".to_string()],
            }],
            1,
        )
        .with_extra_columns(vec!["rating".to_string()]);

        assert_eq!(result.extra_columns(), ["rating".to_string()]);
        assert_eq!(
            serde_json::to_value(&result).unwrap()["sample_predictions"],
            serde_json::json!([
                {"product_name": "Widget", "review": "great", "sentiment_label": "Positive"}
            ])
        );
    }
}
