use std::collections::BTreeSet;

use super::stats::visible;
use crate::data::model::{StudentDataset, StudentRecord};

/// Sorted, de-duplicated `Nombre y Email` values among the visible records.
pub fn student_options(dataset: &StudentDataset, indices: &[usize]) -> Vec<String> {
    visible(dataset, indices)
        .map(|r| r.name_email.clone())
        .filter(|n| !n.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// First visible record whose `Nombre y Email` equals `name_email`.
pub fn find_student<'a>(
    dataset: &'a StudentDataset,
    indices: &'a [usize],
    name_email: &str,
) -> Option<&'a StudentRecord> {
    visible(dataset, indices).find(|r| r.name_email == name_email)
}
