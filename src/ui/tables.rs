use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::analysis::stats::Summary;
use crate::data::model::StudentDataset;
use crate::export::{export_headers, export_row};
use crate::ui::widgets::fmt_opt;

/// Scrollable table of the visible records, same columns as the CSV export.
pub fn data_table(ui: &mut Ui, id: &str, dataset: &StudentDataset, indices: &[usize]) {
    let headers = export_headers(dataset);
    let row_height = 20.0;

    ScrollArea::horizontal().id_salt(id).show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .id_salt(id)
            .striped(true)
            .resizable(true)
            .max_scroll_height(360.0)
            .columns(Column::auto().at_least(60.0).clip(true), headers.len())
            .header(row_height, |mut header| {
                for h in &headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(h);
                    });
                }
            })
            .body(|body| {
                body.rows(row_height, indices.len(), |mut row| {
                    let Some(rec) = indices
                        .get(row.index())
                        .and_then(|&i| dataset.records.get(i))
                    else {
                        return;
                    };
                    for cell in export_row(dataset, rec) {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}

/// `describe()`-style table: one column per series, one row per statistic.
pub fn describe_table(ui: &mut Ui, id: &str, columns: &[(String, Summary)]) {
    type Getter = fn(&Summary) -> Option<f64>;
    let stats: [(&str, Getter); 7] = [
        ("mean", |s: &Summary| s.mean),
        ("std", |s: &Summary| s.std),
        ("min", |s: &Summary| s.min),
        ("25%", |s: &Summary| s.q25),
        ("50%", |s: &Summary| s.median),
        ("75%", |s: &Summary| s.q75),
        ("max", |s: &Summary| s.max),
    ];

    egui::Grid::new(id)
        .striped(true)
        .num_columns(columns.len() + 1)
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for (name, _) in columns {
                ui.strong(name);
            }
            ui.end_row();

            ui.label(RichText::new("count").strong());
            for (_, s) in columns {
                ui.label(s.count.to_string());
            }
            ui.end_row();

            for (stat, get) in stats {
                ui.label(RichText::new(stat).strong());
                for (_, s) in columns {
                    ui.label(fmt_opt(get(s)));
                }
                ui.end_row();
            }
        });
}

/// Two-column label / count table.
pub fn count_table(ui: &mut Ui, id: &str, header: (&str, &str), rows: &[(String, usize)]) {
    egui::Grid::new(id)
        .striped(true)
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.strong(header.0);
            ui.strong(header.1);
            ui.end_row();
            for (label, count) in rows {
                ui.label(label);
                ui.label(count.to_string());
                ui.end_row();
            }
        });
}
