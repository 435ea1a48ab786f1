pub mod use_cases;

pub use use_cases::review_analysis::ReviewAnalysisService;
pub use use_cases::sentiment_aggregator::{AggregationLimits, SentimentAggregator};
