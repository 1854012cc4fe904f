use eframe::egui::{self, Color32, RichText, Stroke, Ui};

/// Large value with a caption, in a framed card.
pub fn metric(ui: &mut Ui, label: &str, value: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(160.0);
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(label).small().weak());
            ui.label(RichText::new(value).size(26.0).strong());
        });
    });
}

/// Tinted box with a bold title, used for coded observations and warnings.
pub fn callout(ui: &mut Ui, color: Color32, title: &str, body: &str) {
    egui::Frame::group(ui.style())
        .fill(color.gamma_multiply(0.15))
        .stroke(Stroke::new(1.0, color))
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.horizontal_wrapped(|ui: &mut Ui| {
                ui.label(RichText::new(title).strong().color(color));
                ui.label(body);
            });
        });
}

pub fn warning(ui: &mut Ui, text: &str) {
    callout(ui, Color32::from_rgb(0xd4, 0x8a, 0x00), "⚠", text);
}

/// `2.33` for a value, `–` when there is none.
pub fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "–".to_string(), |v| format!("{v:.2}"))
}
