// ============================================================
// REVIEW TABLE TYPES
// ============================================================
// Validated rows of an uploaded review CSV

use serde::{Deserialize, Serialize};

/// A single uploaded review row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Product identifier, coerced to text
    pub product_name: String,

    /// Review text, coerced to text (may be empty)
    pub review: String,

    /// Values of the non-required columns, aligned with `ReviewTable::extra_columns`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
}

impl ReviewRecord {
    pub fn new(product_name: impl Into<String>, review: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            review: review.into(),
            extra: Vec::new(),
        }
    }

    pub fn with_extra(mut self, extra: Vec<String>) -> Self {
        self.extra = extra;
        self
    }
}

/// Ordered review rows, in upload order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewTable {
    extra_columns: Vec<String>,
    records: Vec<ReviewRecord>,
}

impl ReviewTable {
    pub fn new(records: Vec<ReviewRecord>) -> Self {
        Self {
            extra_columns: Vec::new(),
            records,
        }
    }

    pub fn with_extra_columns(mut self, extra_columns: Vec<String>) -> Self {
        self.extra_columns = extra_columns;
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }

    /// Header names of the columns the pipeline passes through untouched.
    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    /// The `review` column in row order.
    pub fn reviews(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.review.as_str())
    }
}

impl FromIterator<ReviewRecord> for ReviewTable {
    fn from_iter<T: IntoIterator<Item = ReviewRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
