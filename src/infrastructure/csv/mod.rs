// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Review upload parsing, encoding checks, and column validation

mod review_frame;

pub use review_frame::ReviewFrameValidator;
