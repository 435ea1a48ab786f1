// ============================================================
// REVIEW FRAME VALIDATOR
// ============================================================
// Parse uploaded CSV bytes into a review table and enforce the column contract

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::domain::error::{AppError, Result, REQUIRED_COLUMNS};
use crate::domain::review::{ReviewRecord, ReviewTable};
use crate::infrastructure::config::CsvConfig;

/// CSV parser for review uploads
#[derive(Debug, Clone)]
pub struct ReviewFrameValidator {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Sniff the delimiter from the content instead of using `delimiter`
    auto_detect: bool,

    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for ReviewFrameValidator {
    fn default() -> Self {
        Self {
            delimiter: b',',
            auto_detect: false,
            trim: false,
        }
    }
}

impl ReviewFrameValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CsvConfig) -> Self {
        Self {
            delimiter: config.delimiter_byte(),
            auto_detect: config.auto_detect_delimiter,
            trim: config.trim,
        }
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_auto_detect(mut self, auto_detect: bool) -> Self {
        self.auto_detect = auto_detect;
        self
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Parse raw upload bytes and check that the required columns are present.
    pub fn parse(&self, bytes: &[u8]) -> Result<ReviewTable> {
        let content = decode_utf8(bytes)?;
        self.parse_content(&content)
    }

    /// Parse CSV content from string
    pub fn parse_content(&self, content: &str) -> Result<ReviewTable> {
        let delimiter = if self.auto_detect {
            Self::detect_delimiter(content)
        } else {
            self.delimiter
        };

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true) // short rows are padded below, long rows rejected
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::Parse(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        let layout = ColumnLayout::resolve(&headers)?;

        let mut records = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::Parse(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            if record.len() > headers.len() {
                return Err(AppError::Parse(format!(
                    "Failed to parse CSV row {}: expected {} fields, saw {}",
                    index + 1,
                    headers.len(),
                    record.len()
                )));
            }

            records.push(layout.to_record(&record));
        }

        Ok(ReviewTable::new(records).with_extra_columns(layout.extra_names))
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];
        let sample_lines: Vec<_> = content.lines().take(10).collect();

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Score by consistency (low standard deviation) and frequency
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

/// Strict UTF-8 decode with byte-order-mark removal.
fn decode_utf8(bytes: &[u8]) -> Result<String> {
    let (content, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(AppError::Parse(
            "Failed to decode CSV: file is not valid UTF-8".to_string(),
        ));
    }
    Ok(content.into_owned())
}

/// Positions of the required and pass-through columns within the header row.
struct ColumnLayout {
    product_name: usize,
    review: usize,
    extra_positions: Vec<usize>,
    extra_names: Vec<String>,
}

impl ColumnLayout {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let positions = REQUIRED_COLUMNS.map(position);

        let [Some(product_name), Some(review)] = positions else {
            let missing = REQUIRED_COLUMNS
                .iter()
                .zip(positions)
                .filter(|(_, pos)| pos.is_none())
                .map(|(name, _)| *name);
            return Err(AppError::schema(missing));
        };

        let (extra_positions, extra_names) = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != product_name && *idx != review)
            .map(|(idx, name)| (idx, name.to_string()))
            .unzip();

        Ok(Self {
            product_name,
            review,
            extra_positions,
            extra_names,
        })
    }

    /// Cells past the end of a short row are coerced to empty text.
    fn to_record(&self, record: &StringRecord) -> ReviewRecord {
        let cell = |idx: usize| record.get(idx).unwrap_or("").to_string();

        ReviewRecord::new(cell(self.product_name), cell(self.review))
            .with_extra(self.extra_positions.iter().map(|&idx| cell(idx)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_csv() {
        let content = "product_name,review\nWidget,great\nGadget,bad";
        let table = ReviewFrameValidator::new().parse(content.as_bytes()).unwrap();

        assert_eq!(
            table.records(),
            &[
                ReviewRecord::new("Widget", "great"),
                ReviewRecord::new("Gadget", "bad"),
            ]
        );
    }

    #[test]
    fn test_missing_review_column() {
        let err = ReviewFrameValidator::new()
            .parse(b"product_name,text\nWidget,great")
            .unwrap_err();

        let missing: Vec<_> = err.missing_columns().unwrap().iter().cloned().collect();
        assert_eq!(missing, vec!["review".to_string()]);
    }

    #[test]
    fn test_missing_both_columns() {
        let err = ReviewFrameValidator::new()
            .parse(b"name,text\nWidget,great")
            .unwrap_err();

        let missing: Vec<_> = err.missing_columns().unwrap().iter().cloned().collect();
        assert_eq!(
            missing,
            vec!["product_name".to_string(), "review".to_string()]
        );
    }

    #[test]
    fn test_column_match_is_case_sensitive() {
        let err = ReviewFrameValidator::new()
            .parse(b"Product_Name,Review\nWidget,great")
            .unwrap_err();
        assert_eq!(err.missing_columns().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_input_is_schema_error() {
        let err = ReviewFrameValidator::new().parse(b"").unwrap_err();
        assert_eq!(err.missing_columns().unwrap().len(), 2);
    }

    #[test]
    fn test_headers_only_is_valid_empty_table() {
        let table = ReviewFrameValidator::new()
            .parse(b"product_name,review\n")
            .unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_extra_columns_pass_through() {
        let content = "rating,product_name,review,source\n5,Widget,great,web\n";
        let table = ReviewFrameValidator::new().parse(content.as_bytes()).unwrap();

        assert_eq!(table.extra_columns(), &["rating".to_string(), "source".to_string()]);
        assert_eq!(table.records()[0].extra, vec!["5".to_string(), "web".to_string()]);
        assert_eq!(table.records()[0].review, "great");
    }

    #[test]
    fn test_numeric_and_empty_reviews_stay_text() {
        let content = "product_name,review\n42,3.5\nWidget,\nGadget";
        let table = ReviewFrameValidator::new().parse(content.as_bytes()).unwrap();

        let reviews: Vec<_> = table.reviews().collect();
        assert_eq!(reviews, vec!["3.5", "", ""]);
        assert_eq!(table.records()[0].product_name, "42");
    }

    #[test]
    fn test_quoted_fields() {
        let content = "product_name,review\n\"Widget, XL\",\"said \"\"great\"\", really\"\n";
        let table = ReviewFrameValidator::new().parse(content.as_bytes()).unwrap();
        assert_eq!(table.records()[0].product_name, "Widget, XL");
        assert_eq!(table.records()[0].review, "said \"great\", really");
    }

    #[test]
    fn test_row_with_too_many_fields_is_parse_error() {
        let err = ReviewFrameValidator::new()
            .parse(b"product_name,review\nWidget,great,extra\n")
            .unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let err = ReviewFrameValidator::new()
            .parse(b"product_name,review\nWidget,caf\xe9\n")
            .unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn test_bom_is_stripped() {
        let table = ReviewFrameValidator::new()
            .parse(b"\xEF\xBB\xBFproduct_name,review\nWidget,great\n")
            .unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(ReviewFrameValidator::detect_delimiter("a,b,c\nd,e,f"), b',');
        assert_eq!(ReviewFrameValidator::detect_delimiter("a;b;c\nd;e;f"), b';');
        assert_eq!(ReviewFrameValidator::detect_delimiter(""), b',');
    }

    #[test]
    fn test_auto_detect_semicolon_upload() {
        let table = ReviewFrameValidator::new()
            .with_auto_detect(true)
            .parse(b"product_name;review\nWidget;great\n")
            .unwrap();
        assert_eq!(table.records()[0], ReviewRecord::new("Widget", "great"));
    }

    #[test]
    fn test_trim_option() {
        let content = "product_name,review\n  Widget ,  great  \n";
        let table = ReviewFrameValidator::new()
            .with_trim(true)
            .parse(content.as_bytes())
            .unwrap();
        assert_eq!(table.records()[0], ReviewRecord::new("Widget", "great"));

        let untrimmed = ReviewFrameValidator::new().parse(content.as_bytes()).unwrap();
        assert_eq!(untrimmed.records()[0].review, "  great  ");
    }
}
