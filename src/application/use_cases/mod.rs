pub mod review_analysis;
pub mod sentiment_aggregator;
