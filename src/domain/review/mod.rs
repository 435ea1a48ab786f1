// ============================================================
// REVIEW DOMAIN LAYER
// ============================================================
// Core types for uploaded review tables and their sentiment summaries
// No I/O, no async

mod aggregate;
mod prediction;
mod review_table;

pub use aggregate::{
    AggregateResult, LabelCount, ProductScore, SamplePrediction, SentimentDistribution,
    TopProducts,
};
pub use prediction::PredictionLabel;
pub use review_table::{ReviewRecord, ReviewTable};
