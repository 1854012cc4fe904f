use std::collections::BTreeSet;

use super::model::StudentDataset;

// ---------------------------------------------------------------------------
// Filter predicate: program selection plus name search
// ---------------------------------------------------------------------------

/// Sidebar selections.
///
/// An empty `programs` set means "no program constraint" (show all), matching
/// a multiselect the user has cleared. A blank `search` is no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub programs: BTreeSet<String>,
    pub search: String,
}

/// Initialise a [`FilterState`] with every program selected.
pub fn init_filter_state(dataset: &StudentDataset) -> FilterState {
    FilterState {
        programs: dataset.programs.clone(),
        search: String::new(),
    }
}

/// Return indices of records that pass all active filters.
///
/// A record passes when:
/// * no program is selected, or its program is in the selection
/// * the search is blank, or `Nombre y Email` contains it (case-insensitive)
pub fn filtered_indices(dataset: &StudentDataset, filters: &FilterState) -> Vec<usize> {
    let needle = filters.search.trim().to_lowercase();

    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            if !filters.programs.is_empty() && !filters.programs.contains(&rec.program) {
                return false;
            }
            if !needle.is_empty() && !rec.name_email.to_lowercase().contains(&needle) {
                return false;
            }
            true
        })
        .map(|(i, _)| i)
        .collect()
}
