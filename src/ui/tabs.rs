use eframe::egui::{self, RichText, Ui};

use crate::analysis::stats::{
    crosstab, describe, mean_score, rating_comparison, rating_distribution, scores,
    sentiment_comparison, sentiment_counts, visible,
};
use crate::analysis::students::{find_student, student_options};
use crate::analysis::words::word_frequencies;
use crate::color::{generate_palette, rating_color, sentiment_color, series_color};
use crate::data::clean::Sentiment;
use crate::data::loader::{COL_OBSERVATIONS, COL_RESPONSES};
use crate::data::model::{StudentDataset, SLOTS};
use crate::state::AppState;
use crate::ui::widgets::{callout, fmt_opt, metric, warning};
use crate::ui::{plot, tables};

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

pub fn overview(ui: &mut Ui, ds: &StudentDataset, visible_idx: &[usize]) {
    ui.heading("Resumen general");
    ui.label(
        RichText::new(format!(
            "Mostrando datos para {} de {} estudiantes.",
            visible_idx.len(),
            ds.len()
        ))
        .strong(),
    );
    ui.add_space(8.0);
    if ds.is_empty() {
        warning(ui, "El archivo no contiene estudiantes.");
        return;
    }

    let sentiments = sentiment_counts(ds, visible_idx);
    ui.horizontal_wrapped(|ui: &mut Ui| {
        metric(ui, "Promedio Res. 1", &fmt_opt(mean_score(ds, visible_idx, 0)));
        metric(ui, "Promedio Res. 2", &fmt_opt(mean_score(ds, visible_idx, 1)));
        let rate = sentiments
            .positive_rate()
            .map_or_else(|| "–".to_string(), |r| format!("{:.1}%", r * 100.0));
        metric(ui, "Tasa de feedback positivo", &rate);
    });
    ui.add_space(8.0);

    egui::CollapsingHeader::new("Ver tabla de datos completos")
        .id_salt("overview_table")
        .show(ui, |ui: &mut Ui| {
            tables::data_table(ui, "overview_data", ds, visible_idx);
        });
    ui.add_space(8.0);

    ui.strong("Estadísticas de respuestas (escala numérica)");
    let columns: Vec<(String, _)> = COL_RESPONSES
        .iter()
        .enumerate()
        .map(|(slot, col)| (format!("{col}_Num"), describe(&scores(ds, visible_idx, slot))))
        .collect();
    tables::describe_table(ui, "describe_scores", &columns);
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

pub fn distribution(ui: &mut Ui, ds: &StudentDataset, visible_idx: &[usize]) {
    ui.heading("Distribución de respuestas");
    ui.label("Cómo se distribuyen las respuestas categóricas de cada resultado.");
    ui.add_space(8.0);

    ui.columns(SLOTS, |cols: &mut [Ui]| {
        for (slot, ui) in cols.iter_mut().enumerate() {
            ui.strong(COL_RESPONSES[slot]);
            let items: Vec<_> = rating_distribution(ds, visible_idx, slot)
                .into_iter()
                .map(|(rating, n)| (rating.label().to_string(), n, rating_color(rating)))
                .collect();
            if items.is_empty() {
                ui.label(RichText::new("Sin respuestas").weak());
                continue;
            }
            plot::horizontal_bars(ui, &format!("dist_{slot}"), &items, "Cantidad");
        }
    });
}

// ---------------------------------------------------------------------------
// Cross analysis
// ---------------------------------------------------------------------------

pub fn cross_analysis(ui: &mut Ui, state: &mut AppState) {
    let Some(ds) = &state.dataset else {
        return;
    };
    let visible_idx = &state.visible_indices;

    ui.heading("Sentimiento de las observaciones");
    let counts = sentiment_counts(ds, visible_idx);
    ui.horizontal(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            let rows: Vec<(String, usize)> = Sentiment::CODED
                .iter()
                .map(|s| (s.label().to_string(), counts.get(*s)))
                .collect();
            tables::count_table(ui, "sentiment_counts", ("Tipo", "Cantidad"), &rows);
        });
        ui.add_space(24.0);
        if counts.total() > 0 {
            let slices: Vec<_> = Sentiment::CODED
                .iter()
                .map(|s| (s.label().to_string(), counts.get(*s), sentiment_color(*s)))
                .collect();
            plot::pie(ui, &slices, 220.0);
        }
    });
    ui.separator();

    ui.heading("Calificaciones vs. tipo de observación");
    let mut slot = state.cross_slot;
    ui.horizontal(|ui: &mut Ui| {
        for i in 0..SLOTS {
            ui.radio_value(&mut slot, i, format!("Resultados y observaciones {}", i + 1));
        }
    });

    let table = crosstab(ds, visible_idx, slot);
    if table.is_empty() {
        warning(ui, "No hay datos suficientes para el análisis cruzado con los filtros actuales.");
    } else {
        let categories: Vec<String> = table.iter().map(|(label, _)| label.clone()).collect();
        let series: Vec<_> = Sentiment::CODED
            .iter()
            .map(|s| (s.label().to_string(), sentiment_color(*s)))
            .collect();
        let values: Vec<Vec<usize>> = table
            .iter()
            .map(|(_, c)| Sentiment::CODED.iter().map(|s| c.get(*s)).collect())
            .collect();
        plot::grouped_bars(
            ui,
            &format!("crosstab_{slot}"),
            &categories,
            &series,
            &values,
            "Cantidad de observaciones",
        );
    }
    state.cross_slot = slot;
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

pub fn comparison(ui: &mut Ui, ds: &StudentDataset, visible_idx: &[usize]) {
    ui.heading("Comparación entre conjuntos de resultados");

    ui.strong("Distribución de calificaciones por resultado");
    let rows = rating_comparison(ds, visible_idx);
    if rows.is_empty() {
        warning(ui, "No hay calificaciones para los filtros actuales.");
    } else {
        let categories: Vec<String> = rows.iter().map(|(label, _)| label.clone()).collect();
        let series: Vec<_> = COL_RESPONSES
            .iter()
            .enumerate()
            .map(|(i, col)| (col.to_string(), series_color(i)))
            .collect();
        let values: Vec<Vec<usize>> = rows.iter().map(|(_, per_slot)| per_slot.to_vec()).collect();
        plot::grouped_bars(ui, "rating_comparison", &categories, &series, &values, "Cantidad");
    }
    ui.add_space(12.0);

    ui.strong("Sentimiento por conjunto de observación");
    let per_slot = sentiment_comparison(ds, visible_idx);
    if per_slot.iter().all(|c| c.total() == 0) {
        warning(ui, "No hay observaciones codificadas para los filtros actuales.");
    } else {
        let categories: Vec<String> = COL_OBSERVATIONS.iter().map(|c| c.to_string()).collect();
        let series: Vec<_> = Sentiment::CODED
            .iter()
            .map(|s| (s.label().to_string(), sentiment_color(*s)))
            .collect();
        let values: Vec<Vec<usize>> = per_slot
            .iter()
            .map(|c| Sentiment::CODED.iter().map(|s| c.get(*s)).collect())
            .collect();
        plot::grouped_bars(ui, "sentiment_comparison", &categories, &series, &values, "Cantidad");
    }
}

// ---------------------------------------------------------------------------
// Themes (word frequencies)
// ---------------------------------------------------------------------------

pub fn themes(ui: &mut Ui, ds: &StudentDataset, visible_idx: &[usize], max_words: usize) {
    ui.heading("Temas frecuentes en las observaciones");
    ui.label("Términos más frecuentes en las observaciones de los estudiantes seleccionados.");
    ui.add_space(8.0);

    let texts: Vec<String> = visible(ds, visible_idx)
        .map(|r| r.combined_observations())
        .collect();
    let words = word_frequencies(texts.iter().map(String::as_str), max_words);
    let Some(top) = words.first().map(|(_, n)| *n) else {
        warning(ui, "No hay texto de observaciones para generar la nube de palabras.");
        return;
    };

    let palette = generate_palette(words.len().min(12));
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.horizontal_wrapped(|ui: &mut Ui| {
            for (i, (word, count)) in words.iter().enumerate() {
                let size = 12.0 + 36.0 * (*count as f32 / top as f32);
                let color = palette[i % palette.len()];
                ui.label(RichText::new(word).size(size).color(color))
                    .on_hover_text(format!("{count} apariciones"));
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Individual student
// ---------------------------------------------------------------------------

pub fn student(ui: &mut Ui, state: &mut AppState) {
    let Some(ds) = &state.dataset else {
        return;
    };
    let visible_idx = &state.visible_indices;

    ui.heading("Análisis de casos individuales");
    let options = student_options(ds, visible_idx);
    if options.is_empty() {
        warning(ui, "No hay estudiantes para los filtros actuales.");
        return;
    }

    let mut selected = state.selected_student.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("student_select")
        .width(360.0)
        .selected_text(&selected)
        .show_ui(ui, |ui: &mut Ui| {
            for name in &options {
                ui.selectable_value(&mut selected, name.clone(), name);
            }
        });

    if let Some(rec) = find_student(ds, visible_idx, &selected) {
        ui.add_space(8.0);
        ui.label(RichText::new(format!("Estudio de caso: {}", rec.display_name())).heading());
        ui.label(format!("Programa: {}   ·   Clave: {}", rec.program, rec.key));

        ui.add_space(8.0);
        ui.strong("Resultados cuantitativos");
        ui.horizontal_wrapped(|ui: &mut Ui| {
            for (i, response) in rec.responses.iter().enumerate() {
                metric(ui, &format!("Resultado {}", i + 1), &response.to_string());
            }
        });

        ui.add_space(8.0);
        ui.strong("Evidencia cualitativa (observaciones codificadas)");
        for (i, obs) in rec.observations.iter().enumerate() {
            let title = format!("Observación {} ({}):", i + 1, obs.sentiment);
            let body = if obs.text.is_empty() { "—" } else { obs.text.as_str() };
            callout(ui, sentiment_color(obs.sentiment), &title, body);
            ui.add_space(4.0);
        }
    }

    state.selected_student = Some(selected);
}
