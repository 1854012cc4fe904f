use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use super::clean::{strip_markers, Sentiment};

// ---------------------------------------------------------------------------
// CellValue – a single spreadsheet cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value as read from the workbook.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date string kept as text.
    Date(String),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Empty => Ok(()),
        }
    }
}

impl CellValue {
    /// Build a cell from a spreadsheet float, folding whole numbers into
    /// `Integer` so keys like `1024.0` read back as `1024`.
    pub fn from_f64(v: f64) -> Self {
        if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
            CellValue::Integer(v as i64)
        } else {
            CellValue::Float(v)
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text form with surrounding whitespace removed; `None` for empty cells.
    pub fn as_text(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_string().trim().to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Rating – the categorical evaluation scale
// ---------------------------------------------------------------------------

/// Evaluation scale used by the `Res1`..`Res3` columns, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rating {
    Insufficient,
    Acceptable,
    Good,
    VeryGood,
    Outstanding,
    NotAvailable,
}

impl Rating {
    /// Scale order, `NotAvailable` last.
    pub const ALL: [Rating; 6] = [
        Rating::Insufficient,
        Rating::Acceptable,
        Rating::Good,
        Rating::VeryGood,
        Rating::Outstanding,
        Rating::NotAvailable,
    ];

    /// Parse a workbook label, ignoring case and surrounding whitespace.
    pub fn parse(label: &str) -> Option<Rating> {
        let normalized = label.trim().to_uppercase();
        let rating = match normalized.as_str() {
            "INSUFICIENTE" => Rating::Insufficient,
            "ACEPTABLE" => Rating::Acceptable,
            "BUENO" => Rating::Good,
            "MUY BUENO" => Rating::VeryGood,
            "SOBRESALIENTE" => Rating::Outstanding,
            "NO DISPONIBLE" => Rating::NotAvailable,
            _ => return None,
        };
        Some(rating)
    }

    /// Numeric score on the 1..=5 scale. `NotAvailable` has none.
    pub fn score(self) -> Option<f64> {
        match self {
            Rating::Insufficient => Some(1.0),
            Rating::Acceptable => Some(2.0),
            Rating::Good => Some(3.0),
            Rating::VeryGood => Some(4.0),
            Rating::Outstanding => Some(5.0),
            Rating::NotAvailable => None,
        }
    }

    /// Canonical workbook label.
    pub fn label(self) -> &'static str {
        match self {
            Rating::Insufficient => "INSUFICIENTE",
            Rating::Acceptable => "ACEPTABLE",
            Rating::Good => "BUENO",
            Rating::VeryGood => "MUY BUENO",
            Rating::Outstanding => "SOBRESALIENTE",
            Rating::NotAvailable => "No disponible",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Response / Observation – one evaluation slot of a student
// ---------------------------------------------------------------------------

/// A `ResN` cell: the raw label plus its parsed rating, if recognised.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub raw: Option<String>,
    pub rating: Option<Rating>,
}

impl Response {
    pub fn from_cell(cell: &CellValue) -> Self {
        let raw = cell.as_text();
        let rating = raw.as_deref().and_then(Rating::parse);
        Response { raw, rating }
    }

    pub fn score(&self) -> Option<f64> {
        self.rating.and_then(Rating::score)
    }

    /// Label used for grouping: canonical for known ratings, raw otherwise.
    pub fn label(&self) -> Option<String> {
        match (self.rating, &self.raw) {
            (Some(r), _) => Some(r.label().to_string()),
            (None, Some(raw)) => Some(raw.clone()),
            (None, None) => None,
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) => f.write_str(&label),
            None => f.write_str("—"),
        }
    }
}

/// An `ObservN` cell, coded by its `(p)` / `(n)` marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Text with sentiment markers removed (empty for blank cells).
    pub text: String,
    pub sentiment: Sentiment,
}

impl Observation {
    pub fn from_cell(cell: &CellValue) -> Self {
        match cell.as_text() {
            Some(raw) => Observation {
                text: strip_markers(&raw),
                sentiment: Sentiment::classify(Some(&raw)),
            },
            None => Observation {
                text: String::new(),
                sentiment: Sentiment::Neutral,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// StudentRecord – one row of the workbook
// ---------------------------------------------------------------------------

/// Number of evaluation slots (`Res1..3` / `Observ1..3`).
pub const SLOTS: usize = 3;

/// A single student (one row of the source sheet).
#[derive(Debug, Clone)]
pub struct StudentRecord {
    /// `Prog` column.
    pub program: String,
    /// `Clave` column, always as text.
    pub key: String,
    /// `Nombre y Email` column: `"<name> - <email>"`.
    pub name_email: String,
    pub responses: [Response; SLOTS],
    pub observations: [Observation; SLOTS],
    /// Columns outside the known schema: column_name → value.
    pub extra: BTreeMap<String, CellValue>,
}

impl StudentRecord {
    /// Name part of `Nombre y Email`.
    pub fn display_name(&self) -> &str {
        display_name(&self.name_email)
    }

    /// Cleaned observation texts joined by single spaces, blanks skipped.
    pub fn combined_observations(&self) -> String {
        self.observations
            .iter()
            .map(|o| o.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Text before the first `" - "` separator (whole string if absent).
pub fn display_name(name_email: &str) -> &str {
    name_email
        .split(" - ")
        .next()
        .unwrap_or(name_email)
        .trim()
}

// ---------------------------------------------------------------------------
// StudentDataset – the complete loaded workbook
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed indices.
#[derive(Debug, Clone)]
pub struct StudentDataset {
    pub records: Vec<StudentRecord>,
    /// Names of columns outside the known schema, in sheet order.
    pub extra_columns: Vec<String>,
    /// Sorted set of unique `Prog` values.
    pub programs: BTreeSet<String>,
    /// File the dataset was read from.
    pub source: PathBuf,
}

impl StudentDataset {
    /// Build indices from the loaded records.
    pub fn from_records(
        records: Vec<StudentRecord>,
        extra_columns: Vec<String>,
        source: PathBuf,
    ) -> Self {
        let programs = records.iter().map(|r| r.program.clone()).collect();
        StudentDataset {
            records,
            extra_columns,
            programs,
            source,
        }
    }

    /// Number of students.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_parse_is_case_and_space_insensitive() {
        assert_eq!(Rating::parse(" muy bueno "), Some(Rating::VeryGood));
        assert_eq!(Rating::parse("No disponible"), Some(Rating::NotAvailable));
        assert_eq!(Rating::parse("EXCELENTE"), None);
    }

    #[test]
    fn rating_scores_follow_scale() {
        let scores: Vec<Option<f64>> = Rating::ALL.iter().map(|r| r.score()).collect();
        assert_eq!(
            scores,
            vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0), None]
        );
    }

    #[test]
    fn whole_floats_become_integers() {
        assert_eq!(CellValue::from_f64(1024.0), CellValue::Integer(1024));
        assert_eq!(CellValue::from_f64(2.5), CellValue::Float(2.5));
        assert_eq!(CellValue::from_f64(1024.0).to_string(), "1024");
    }

    #[test]
    fn unknown_response_keeps_raw_label() {
        let r = Response::from_cell(&CellValue::Text("Regular".into()));
        assert_eq!(r.rating, None);
        assert_eq!(r.label().as_deref(), Some("Regular"));
        assert_eq!(r.score(), None);

        let blank = Response::from_cell(&CellValue::Text("  ".into()));
        assert_eq!(blank.label(), None);
    }

    #[test]
    fn observation_from_cell_codes_and_strips() {
        let obs = Observation::from_cell(&CellValue::Text("Participa mucho (p)".into()));
        assert_eq!(obs.sentiment, Sentiment::Positive);
        assert_eq!(obs.text, "Participa mucho");

        let empty = Observation::from_cell(&CellValue::Empty);
        assert_eq!(empty.sentiment, Sentiment::Neutral);
        assert!(empty.text.is_empty());
    }

    #[test]
    fn display_name_takes_text_before_separator() {
        assert_eq!(display_name("Ana Pérez - ana@uni.edu"), "Ana Pérez");
        assert_eq!(display_name("Solo Nombre"), "Solo Nombre");
    }

    #[test]
    fn combined_observations_joins_cleaned_texts() {
        let rec = crate::data::filter::tests::record(
            "ING",
            "Ana",
            ["BUENO", "", ""],
            ["  Participa mucho (p) ", "", "Entrega tarde (n)"],
        );
        assert_eq!(rec.combined_observations(), "Participa mucho Entrega tarde");

        let silent = crate::data::filter::tests::record("ING", "Eva", ["", "", ""], ["", "", ""]);
        assert_eq!(silent.combined_observations(), "");
    }
}
