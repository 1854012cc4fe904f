use std::path::Path;

use crate::analysis::students::student_options;
use crate::color::ColorMap;
use crate::config::Config;
use crate::data::filter::{filtered_indices, init_filter_state, FilterState};
use crate::data::loader::load_file;
use crate::data::model::StudentDataset;

// ---------------------------------------------------------------------------
// Tabs of the central panel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Distribution,
    CrossAnalysis,
    Comparison,
    Themes,
    Student,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Overview,
        Tab::Distribution,
        Tab::CrossAnalysis,
        Tab::Comparison,
        Tab::Themes,
        Tab::Student,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "📊 Resumen general",
            Tab::Distribution => "📈 Distribución de respuestas",
            Tab::CrossAnalysis => "🔀 Análisis cruzado",
            Tab::Comparison => "🔄 Comparación de resultados",
            Tab::Themes => "☁ Temas de observaciones",
            Tab::Student => "🧑‍🎓 Casos individuales",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Loaded dataset (None until a workbook loads successfully).
    pub dataset: Option<StudentDataset>,

    /// Sidebar selections.
    pub filters: FilterState,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Colour per program.
    pub program_colors: Option<ColorMap>,

    /// Last load / export error, shown in the UI.
    pub error_message: Option<String>,

    /// Informational status (e.g. after an export).
    pub status_message: Option<String>,

    pub tab: Tab,

    /// Evaluation slot (0-based) analysed in the cross-analysis tab.
    pub cross_slot: usize,

    /// `Nombre y Email` of the student shown in the individual tab.
    pub selected_student: Option<String>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            dataset: None,
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            program_colors: None,
            error_message: None,
            status_message: None,
            tab: Tab::default(),
            cross_slot: 0,
            selected_student: None,
        }
    }

    /// Load the workbook named by the configuration.
    pub fn load_configured(&mut self) {
        let path = self.config.workbook.clone();
        self.load_path(&path);
    }

    /// Re-read the current workbook (or the configured one if none loaded).
    pub fn reload(&mut self) {
        let path = self
            .dataset
            .as_ref()
            .map(|ds| ds.source.clone())
            .unwrap_or_else(|| self.config.workbook.clone());
        self.load_path(&path);
    }

    /// Load a dataset from `path`, keeping the previous one on failure.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path, self.config.sheet.as_deref()) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.error_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset, initialise filters and colours.
    pub fn set_dataset(&mut self, dataset: StudentDataset) {
        self.config.workbook = dataset.source.clone();
        self.filters = init_filter_state(&dataset);
        self.visible_indices = (0..dataset.len()).collect();
        self.program_colors = Some(ColorMap::new(&dataset.programs));
        self.dataset = Some(dataset);
        self.error_message = None;
        self.status_message = None;
        self.sync_selected_student();
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filters);
        }
        self.sync_selected_student();
    }

    /// Keep the selected student among the visible ones, defaulting to the first.
    fn sync_selected_student(&mut self) {
        let Some(ds) = &self.dataset else {
            self.selected_student = None;
            return;
        };
        let options = student_options(ds, &self.visible_indices);
        let still_visible = self
            .selected_student
            .as_ref()
            .is_some_and(|s| options.contains(s));
        if !still_visible {
            self.selected_student = options.into_iter().next();
        }
    }

    /// Toggle a single program in the selection.
    pub fn toggle_program(&mut self, program: &str) {
        if !self.filters.programs.remove(program) {
            self.filters.programs.insert(program.to_string());
        }
        self.refilter();
    }

    /// Select every program.
    pub fn select_all(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters.programs = ds.programs.clone();
            self.refilter();
        }
    }

    /// Clear the program selection (which shows every program).
    pub fn select_none(&mut self) {
        self.filters.programs.clear();
        self.refilter();
    }

    pub fn set_search(&mut self, search: String) {
        self.filters.search = search;
        self.refilter();
    }

    /// Number of loaded records.
    pub fn total(&self) -> usize {
        self.dataset.as_ref().map_or(0, StudentDataset::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::tests::{dataset, record};

    fn state() -> AppState {
        let mut state = AppState::new(Config::default());
        state.set_dataset(dataset(vec![
            record("ING", "Ana", ["BUENO", "", ""], ["", "", ""]),
            record("MED", "Luis", ["BUENO", "", ""], ["", "", ""]),
            record("ING", "Eva", ["BUENO", "", ""], ["", "", ""]),
        ]));
        state
    }

    #[test]
    fn set_dataset_selects_everything() {
        let state = state();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.selected_student.as_deref(), Some("Ana - ana@uni.edu"));
        assert_eq!(state.total(), 3);
    }

    #[test]
    fn toggling_programs_refilters_and_moves_selection() {
        let mut state = state();
        state.toggle_program("ING");
        assert_eq!(state.visible_indices, vec![1]);
        assert_eq!(state.selected_student.as_deref(), Some("Luis - luis@uni.edu"));

        state.toggle_program("ING");
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        // Luis is still visible, so the selection stays.
        assert_eq!(state.selected_student.as_deref(), Some("Luis - luis@uni.edu"));
    }

    #[test]
    fn select_none_shows_all() {
        let mut state = state();
        state.select_none();
        assert!(state.filters.programs.is_empty());
        assert_eq!(state.visible_indices.len(), 3);
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let mut state = state();
        let dir = tempfile::tempdir().unwrap();
        state.load_path(&dir.path().join("nope.xlsx"));
        assert!(state.dataset.is_some());
        assert!(state
            .error_message
            .as_deref()
            .is_some_and(|m| m.contains("file not found")));
    }

    #[test]
    fn failed_initial_load_leaves_no_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(Config {
            workbook: dir.path().join("datos.xlsx"),
            ..Config::default()
        });
        state.load_configured();
        assert!(state.dataset.is_none());
        assert!(state.error_message.is_some());
        assert!(state.visible_indices.is_empty());
    }
}
