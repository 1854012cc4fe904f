use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::data::clean::Sentiment;
use crate::data::model::{Rating, StudentDataset, StudentRecord, SLOTS};

/// Records at the given indices.
pub fn visible<'a>(
    dataset: &'a StudentDataset,
    indices: &'a [usize],
) -> impl Iterator<Item = &'a StudentRecord> + 'a {
    indices.iter().filter_map(|&i| dataset.records.get(i))
}

// ---------------------------------------------------------------------------
// Numeric summaries
// ---------------------------------------------------------------------------

/// Descriptive statistics of one numeric column, missing values excluded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n − 1); needs at least two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

pub fn describe(values: &[f64]) -> Summary {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return Summary::default();
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = (n > 1).then(|| {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });

    Summary {
        count: n,
        mean: Some(mean),
        std,
        min: sorted.first().copied(),
        q25: Some(quantile(&sorted, 0.25)),
        median: Some(quantile(&sorted, 0.5)),
        q75: Some(quantile(&sorted, 0.75)),
        max: sorted.last().copied(),
    }
}

/// Linear-interpolated quantile of non-empty sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Numeric scores of evaluation `slot` (0-based), missing ones dropped.
pub fn scores(dataset: &StudentDataset, indices: &[usize], slot: usize) -> Vec<f64> {
    visible(dataset, indices)
        .filter_map(|r| r.responses.get(slot)?.score())
        .collect()
}

pub fn mean_score(dataset: &StudentDataset, indices: &[usize], slot: usize) -> Option<f64> {
    describe(&scores(dataset, indices, slot)).mean
}

// ---------------------------------------------------------------------------
// Categorical counts
// ---------------------------------------------------------------------------

/// Sort key placing known ratings in scale order, unknown labels after them.
fn label_order(label: &str) -> (usize, String) {
    let rank = Rating::parse(label)
        .and_then(|r| Rating::ALL.iter().position(|&x| x == r))
        .unwrap_or(Rating::ALL.len());
    (rank, label.to_string())
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    label_order(a).cmp(&label_order(b))
}

/// Count of each canonical rating for `slot`, in scale order, zeros omitted.
pub fn rating_distribution(
    dataset: &StudentDataset,
    indices: &[usize],
    slot: usize,
) -> Vec<(Rating, usize)> {
    let mut counts: BTreeMap<Rating, usize> = BTreeMap::new();
    for rec in visible(dataset, indices) {
        if let Some(rating) = rec.responses.get(slot).and_then(|r| r.rating) {
            *counts.entry(rating).or_default() += 1;
        }
    }
    Rating::ALL
        .iter()
        .filter_map(|r| counts.get(r).map(|&n| (*r, n)))
        .collect()
}

/// Positive / negative observation counts; neutral ones are not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SentimentCounts {
    pub positive: usize,
    pub negative: usize,
}

impl SentimentCounts {
    fn add(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => {}
        }
    }

    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative
    }

    /// Share of positive feedback, `None` when nothing is coded.
    pub fn positive_rate(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.positive as f64 / total as f64)
    }
}

/// Coded observations across all three slots.
pub fn sentiment_counts(dataset: &StudentDataset, indices: &[usize]) -> SentimentCounts {
    let mut counts = SentimentCounts::default();
    for rec in visible(dataset, indices) {
        for obs in &rec.observations {
            counts.add(obs.sentiment);
        }
    }
    counts
}

/// Coded observations per slot.
pub fn sentiment_comparison(
    dataset: &StudentDataset,
    indices: &[usize],
) -> [SentimentCounts; SLOTS] {
    let mut per_slot = [SentimentCounts::default(); SLOTS];
    for rec in visible(dataset, indices) {
        for (slot, obs) in rec.observations.iter().enumerate() {
            per_slot[slot].add(obs.sentiment);
        }
    }
    per_slot
}

/// Response label × sentiment contingency table for one evaluation slot.
pub type CrossTab = Vec<(String, SentimentCounts)>;

/// Pairs `ResN` with `ObservN` for the same slot, dropping neutral
/// observations and blank responses.
pub fn crosstab(dataset: &StudentDataset, indices: &[usize], slot: usize) -> CrossTab {
    let mut table: BTreeMap<String, SentimentCounts> = BTreeMap::new();
    for rec in visible(dataset, indices) {
        let (Some(response), Some(obs)) = (rec.responses.get(slot), rec.observations.get(slot))
        else {
            continue;
        };
        if obs.sentiment == Sentiment::Neutral {
            continue;
        }
        if let Some(label) = response.label() {
            table.entry(label).or_default().add(obs.sentiment);
        }
    }
    let mut rows: CrossTab = table.into_iter().collect();
    rows.sort_by(|a, b| compare_labels(&a.0, &b.0));
    rows
}

/// Counts per response label for each slot: `(label, [res1, res2, res3])`.
pub fn rating_comparison(dataset: &StudentDataset, indices: &[usize]) -> Vec<(String, [usize; SLOTS])> {
    let mut table: BTreeMap<String, [usize; SLOTS]> = BTreeMap::new();
    for rec in visible(dataset, indices) {
        for (slot, response) in rec.responses.iter().enumerate() {
            if let Some(label) = response.label() {
                table.entry(label).or_default()[slot] += 1;
            }
        }
    }
    let mut rows: Vec<_> = table.into_iter().collect();
    rows.sort_by(|a, b| compare_labels(&a.0, &b.0));
    rows
}
