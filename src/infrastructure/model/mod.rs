// ============================================================
// MODEL GATEWAY
// ============================================================
// Owns the pre-trained sentiment classifier loaded once at startup

pub mod linear;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::domain::error::{AppError, Result};
use crate::domain::review::PredictionLabel;

pub use linear::LinearTextClassifier;

/// A fitted binary classifier over review text.
///
/// Implementations are immutable after construction and are shared between
/// request handlers without locking.
pub trait SentimentClassifier: Send + Sync {
    /// One label per input text, in input order.
    fn predict_batch(&self, texts: &[String]) -> Result<Vec<PredictionLabel>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    /// Where the classifier came from (artifact path or a descriptive name)
    pub source: String,
    pub vocabulary_size: Option<usize>,
}

#[derive(Clone)]
pub struct ModelGateway {
    classifier: Arc<dyn SentimentClassifier>,
    info: ModelInfo,
}

impl fmt::Debug for ModelGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelGateway")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl ModelGateway {
    /// Load the classifier artifact. Any failure here is fatal for the service.
    pub fn load(path: &Path) -> Result<Self> {
        let classifier = LinearTextClassifier::from_path(path)?;
        let info = ModelInfo {
            source: path.display().to_string(),
            vocabulary_size: Some(classifier.vocabulary_size()),
        };

        info!(
            path = %path.display(),
            vocabulary_size = classifier.vocabulary_size(),
            "Sentiment model loaded"
        );

        Ok(Self {
            classifier: Arc::new(classifier),
            info,
        })
    }

    pub fn from_classifier(classifier: Arc<dyn SentimentClassifier>, source: &str) -> Self {
        Self {
            classifier,
            info: ModelInfo {
                source: source.to_string(),
                vocabulary_size: None,
            },
        }
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Classify each review. Inputs are stringified first, so numeric-looking
    /// values are scored as their text form.
    pub fn predict<I, T>(&self, reviews: I) -> Result<Vec<PredictionLabel>>
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        let texts: Vec<String> = reviews.into_iter().map(|r| r.to_string()).collect();
        let labels = self.classifier.predict_batch(&texts)?;

        if labels.len() != texts.len() {
            return Err(AppError::Inference(format!(
                "Classifier returned {} labels for {} reviews",
                labels.len(),
                texts.len()
            )));
        }

        Ok(labels)
    }
}
