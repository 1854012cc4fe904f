use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::export::export_csv_file;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("⚙ Filtros");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No hay datos cargados.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let programs = dataset.programs.clone();

    ui.strong("Buscar estudiante");
    let mut search = state.filters.search.clone();
    if ui
        .add(egui::TextEdit::singleline(&mut search).hint_text("nombre o email"))
        .changed()
    {
        state.set_search(search);
    }
    ui.separator();

    let n_selected = state.filters.programs.len();
    let header_text = format!("Programa (Prog)  ({n_selected}/{})", programs.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("program_filter")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("Todos").clicked() {
                    state.select_all();
                }
                if ui.small_button("Ninguno").clicked() {
                    state.select_none();
                }
            });
            if state.filters.programs.is_empty() {
                ui.label(RichText::new("Sin selección: se muestran todos.").small().weak());
            }

            ScrollArea::vertical()
                .auto_shrink([false, true])
                .max_height(ui.available_height())
                .show(ui, |ui: &mut Ui| {
                    for program in &programs {
                        let mut text = RichText::new(program);
                        if let Some(cm) = &state.program_colors {
                            text = text.color(cm.color_for(program));
                        }
                        let mut checked = state.filters.programs.contains(program);
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_program(program);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Archivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Recargar").clicked() {
                state.reload();
                ui.close_menu();
            }
            let can_export = state.dataset.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Exportar CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{}: {} estudiantes, {} visibles",
                ds.source.display(),
                state.total(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.error_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        } else if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).weak());
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir datos de estudiantes")
        .add_filter("Archivos compatibles", &["xlsx", "xlsm", "xls", "ods", "csv", "json"])
        .add_filter("Excel", &["xlsx", "xlsm", "xls"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Exportar estudiantes visibles")
        .set_file_name("estudiantes_filtrados.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    let Some(path) = file else {
        return;
    };
    match export_csv_file(dataset, &state.visible_indices, &path) {
        Ok(()) => {
            state.error_message = None;
            state.status_message = Some(format!(
                "{} filas exportadas a {}",
                state.visible_indices.len(),
                path.display()
            ));
        }
        Err(e) => {
            log::error!("Failed to export CSV: {e:#}");
            state.error_message = Some(format!("Error: {e:#}"));
        }
    }
}
