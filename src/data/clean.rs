use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

// ---------------------------------------------------------------------------
// Observation coding: `(p)` / `(n)` markers
// ---------------------------------------------------------------------------

const MARKER_PATTERN: &str = r"\s*\([pn]\)";

static MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(MARKER_PATTERN).expect("marker pattern is valid"));

/// Polarity of an observation, taken from the marker the evaluator appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Coded sentiments shown in charts (neutral is never charted).
    pub const CODED: [Sentiment; 2] = [Sentiment::Positive, Sentiment::Negative];

    /// `(p)` wins over `(n)`; no marker or no text is neutral.
    pub fn classify(raw: Option<&str>) -> Sentiment {
        match raw {
            Some(text) if text.contains("(p)") => Sentiment::Positive,
            Some(text) if text.contains("(n)") => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positiva",
            Sentiment::Negative => "Negativa",
            Sentiment::Neutral => "Neutra",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Remove every `(p)` / `(n)` marker together with the whitespace before it.
pub fn strip_markers(raw: &str) -> String {
    MARKER_RE.replace_all(raw, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_prefers_positive_marker() {
        assert_eq!(Sentiment::classify(Some("bien (p) pero (n)")), Sentiment::Positive);
        assert_eq!(Sentiment::classify(Some("falta entrega (n)")), Sentiment::Negative);
        assert_eq!(Sentiment::classify(Some("sin marca")), Sentiment::Neutral);
        assert_eq!(Sentiment::classify(None), Sentiment::Neutral);
    }

    #[test]
    fn strip_removes_all_markers_and_leading_space() {
        assert_eq!(strip_markers("Buen trabajo (p)"), "Buen trabajo");
        assert_eq!(strip_markers("a (p) b  (n)"), "a b");
        assert_eq!(strip_markers("(x) stays"), "(x) stays");
    }
}
