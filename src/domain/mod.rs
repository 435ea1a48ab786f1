pub mod error;

// Uploaded review tables and sentiment summaries
pub mod review;
