use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary sentiment produced by the classifier.
///
/// The numeric value is what the model emits; the text form is what users see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictionLabel {
    Negative = 0,
    Positive = 1,
}

impl PredictionLabel {
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(PredictionLabel::Negative),
            1 => Some(PredictionLabel::Positive),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PredictionLabel::Negative => "Negative",
            PredictionLabel::Positive => "Positive",
        }
    }

    pub fn is_positive(self) -> bool {
        self == PredictionLabel::Positive
    }
}

impl fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
