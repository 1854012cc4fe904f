use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::config::Config;
use crate::state::{AppState, Tab};
use crate::ui::{panels, tabs};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct StudentDashboardApp {
    pub state: AppState,
}

impl StudentDashboardApp {
    /// Build the app and load the configured workbook once.
    pub fn new(config: Config) -> Self {
        let mut state = AppState::new(config);
        state.load_configured();
        Self { state }
    }
}

impl eframe::App for StudentDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            central_panel(ui, &mut self.state);
        });
    }
}

fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("✨ Panel de análisis de desempeño estudiantil");

    if state.dataset.is_none() {
        ui.add_space(16.0);
        if let Some(msg) = &state.error_message {
            ui.label(RichText::new(msg).color(egui::Color32::RED));
            ui.add_space(8.0);
        }
        ui.label(format!(
            "Abre un archivo para comenzar (Archivo → Abrir…). Ruta configurada: {}",
            state.config.workbook.display()
        ));
        return;
    }

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.title());
        }
    });
    ui.separator();

    let current = state.tab;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match current {
            Tab::CrossAnalysis => tabs::cross_analysis(ui, state),
            Tab::Student => tabs::student(ui, state),
            tab => {
                let Some(ds) = &state.dataset else {
                    return;
                };
                let visible = &state.visible_indices;
                match tab {
                    Tab::Overview => tabs::overview(ui, ds, visible),
                    Tab::Distribution => tabs::distribution(ui, ds, visible),
                    Tab::Comparison => tabs::comparison(ui, ds, visible),
                    Tab::Themes => tabs::themes(ui, ds, visible, state.config.max_words),
                    Tab::CrossAnalysis | Tab::Student => {}
                }
            }
        });
}
