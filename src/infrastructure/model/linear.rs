// ============================================================
// LINEAR TEXT CLASSIFIER ARTIFACT
// ============================================================
// Bag-of-words / TF-IDF features scored by a logistic-regression decision function

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::SentimentClassifier;
use crate::domain::error::{AppError, Result};
use crate::domain::review::PredictionLabel;

pub const ARTIFACT_KIND: &str = "linear_text_classifier";
pub const ARTIFACT_VERSION: u32 = 1;

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// On-disk layout of the classifier artifact.
#[derive(Debug, Deserialize)]
struct LinearArtifact {
    kind: String,
    version: u32,
    #[serde(default = "default_true")]
    lowercase: bool,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    vocabulary: HashMap<String, usize>,
    #[serde(default)]
    idf: Option<Vec<f64>>,
    coefficients: Vec<f64>,
    #[serde(default)]
    intercept: f64,
    #[serde(default = "default_true")]
    normalize: bool,
}

#[derive(Debug, Clone)]
pub struct LinearTextClassifier {
    lowercase: bool,
    ngram_range: (usize, usize),
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f64>>,
    coefficients: Vec<f64>,
    intercept: f64,
    normalize: bool,
}

impl LinearTextClassifier {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::ModelLoad(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content).map_err(|err| match err {
            AppError::ModelLoad(msg) => {
                AppError::ModelLoad(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let artifact: LinearArtifact = serde_json::from_str(content)
            .map_err(|e| AppError::ModelLoad(format!("Invalid artifact JSON: {}", e)))?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(artifact: LinearArtifact) -> Result<Self> {
        let corrupt = |msg: String| Err(AppError::ModelLoad(msg));

        if artifact.kind != ARTIFACT_KIND {
            return corrupt(format!(
                "Unsupported artifact kind '{}', expected '{}'",
                artifact.kind, ARTIFACT_KIND
            ));
        }
        if artifact.version != ARTIFACT_VERSION {
            return corrupt(format!(
                "Unsupported artifact version {}, expected {}",
                artifact.version, ARTIFACT_VERSION
            ));
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return corrupt(format!("Invalid ngram_range ({}, {})", min_n, max_n));
        }

        let size = artifact.coefficients.len();
        if artifact.vocabulary.len() != size {
            return corrupt(format!(
                "Vocabulary has {} terms but {} coefficients",
                artifact.vocabulary.len(),
                size
            ));
        }

        let mut seen = vec![false; size];
        for (term, &index) in &artifact.vocabulary {
            match seen.get_mut(index) {
                None => {
                    return corrupt(format!(
                        "Vocabulary index {} for '{}' is out of range",
                        index, term
                    ))
                }
                Some(slot) if *slot => {
                    return corrupt(format!("Vocabulary index {} is used twice", index))
                }
                Some(slot) => *slot = true,
            }
        }

        if let Some(idf) = &artifact.idf {
            if idf.len() != size {
                return corrupt(format!(
                    "idf has {} weights but vocabulary has {} terms",
                    idf.len(),
                    size
                ));
            }
            if idf.iter().any(|w| !w.is_finite()) {
                return corrupt("idf contains non-finite weights".to_string());
            }
        }

        if artifact.coefficients.iter().any(|w| !w.is_finite()) || !artifact.intercept.is_finite()
        {
            return corrupt("coefficients contain non-finite weights".to_string());
        }

        Ok(Self {
            lowercase: artifact.lowercase,
            ngram_range: artifact.ngram_range,
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            coefficients: artifact.coefficients,
            intercept: artifact.intercept,
            normalize: artifact.normalize,
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Signed distance from the decision boundary; positive means Positive.
    pub fn decision_function(&self, text: &str) -> f64 {
        let features = self.features(text);
        let score: f64 = features
            .iter()
            .map(|(&idx, &value)| value * self.coefficients[idx])
            .sum();
        score + self.intercept
    }

    pub fn predict_one(&self, text: &str) -> PredictionLabel {
        if self.decision_function(text) > 0.0 {
            PredictionLabel::Positive
        } else {
            PredictionLabel::Negative
        }
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        TOKEN_PATTERN
            .find_iter(&text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Sparse feature vector keyed by vocabulary index. Ordered so that
    /// summation is reproducible run to run.
    fn features(&self, text: &str) -> BTreeMap<usize, f64> {
        let tokens = self.tokenize(text);
        let (min_n, max_n) = self.ngram_range;

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                if let Some(&idx) = self.vocabulary.get(&window.join(" ")) {
                    *counts.entry(idx).or_insert(0.0) += 1.0;
                }
            }
        }

        if let Some(idf) = &self.idf {
            for (idx, value) in counts.iter_mut() {
                *value *= idf[*idx];
            }
        }

        if self.normalize {
            let norm = counts.values().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for value in counts.values_mut() {
                    *value /= norm;
                }
            }
        }

        counts
    }
}

impl SentimentClassifier for LinearTextClassifier {
    fn predict_batch(&self, texts: &[String]) -> Result<Vec<PredictionLabel>> {
        Ok(texts.iter().map(|t| self.predict_one(t)).collect())
    }
}
