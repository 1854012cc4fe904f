use std::f32::consts::TAU;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot};

// ---------------------------------------------------------------------------
// Category axes
// ---------------------------------------------------------------------------

/// Label for an axis position: `labels[i]` at integer `i`, blank elsewhere.
fn category_label(labels: &[String], value: f64) -> String {
    let pos = value.round();
    if (value - pos).abs() > 1e-6 || pos < 0.0 {
        return String::new();
    }
    labels.get(pos as usize).cloned().unwrap_or_default()
}

fn category_formatter(
    labels: Vec<String>,
) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String + 'static {
    move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| category_label(&labels, mark.value)
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// One horizontal bar per category, first category at the top.
pub fn horizontal_bars(
    ui: &mut Ui,
    id: &str,
    items: &[(String, usize, Color32)],
    value_label: &str,
) {
    let n = items.len();
    let labels: Vec<String> = items.iter().rev().map(|(l, _, _)| l.clone()).collect();
    let bars: Vec<Bar> = items
        .iter()
        .enumerate()
        .map(|(i, (label, count, color))| {
            Bar::new((n - 1 - i) as f64, *count as f64)
                .name(label)
                .fill(*color)
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(40.0 + 36.0 * n.max(1) as f32)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_grid([true, false])
        .x_axis_label(value_label)
        .y_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

/// A group of vertical bars per category, one coloured series per entry of
/// `series`. `values[c][s]` is the height of series `s` in category `c`.
pub fn grouped_bars(
    ui: &mut Ui,
    id: &str,
    categories: &[String],
    series: &[(String, Color32)],
    values: &[Vec<usize>],
    value_label: &str,
) {
    let k = series.len().max(1) as f64;
    let width = 0.8 / k;

    Plot::new(id)
        .height(320.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_grid([false, true])
        .legend(Legend::default())
        .y_axis_label(value_label)
        .x_axis_formatter(category_formatter(categories.to_vec()))
        .show(ui, |plot_ui| {
            for (s, (name, color)) in series.iter().enumerate() {
                let offset = (s as f64 - (k - 1.0) / 2.0) * width;
                let bars: Vec<Bar> = values
                    .iter()
                    .enumerate()
                    .map(|(c, row)| {
                        let v = row.get(s).copied().unwrap_or(0);
                        Bar::new(c as f64 + offset, v as f64).width(width * 0.95)
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(name).color(*color));
            }
        });
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// Slice angles (radians) for the given values; empty when they sum to zero.
pub fn pie_angles(values: &[usize]) -> Vec<(f32, f32)> {
    let total: usize = values.iter().sum();
    if total == 0 {
        return Vec::new();
    }
    let mut start = -TAU / 4.0;
    values
        .iter()
        .map(|&v| {
            let sweep = TAU * v as f32 / total as f32;
            let slice = (start, start + sweep);
            start += sweep;
            slice
        })
        .collect()
}

/// Pie with percentage labels and a legend underneath.
pub fn pie(ui: &mut Ui, slices: &[(String, usize, Color32)], diameter: f32) {
    let values: Vec<usize> = slices.iter().map(|(_, v, _)| *v).collect();
    let angles = pie_angles(&values);
    let total: usize = values.iter().sum();

    let (response, painter) = ui.allocate_painter(Vec2::splat(diameter), Sense::hover());
    let center = response.rect.center();
    let radius = diameter / 2.0 - 4.0;
    let point = |angle: f32, r: f32| Pos2::new(center.x + r * angle.cos(), center.y + r * angle.sin());

    for ((_, value, color), &(start, end)) in slices.iter().zip(&angles) {
        if *value == 0 {
            continue;
        }
        // Fan of thin triangles so every piece stays convex.
        let steps = ((end - start) / 0.05).ceil().max(1.0) as usize;
        for i in 0..steps {
            let a0 = start + (end - start) * i as f32 / steps as f32;
            let a1 = start + (end - start) * (i + 1) as f32 / steps as f32;
            painter.add(Shape::convex_polygon(
                vec![center, point(a0, radius), point(a1, radius)],
                *color,
                Stroke::NONE,
            ));
        }
        let mid = (start + end) / 2.0;
        let share = *value as f32 / total as f32;
        painter.text(
            point(mid, radius * 0.6),
            Align2::CENTER_CENTER,
            format!("{:.1}%", share * 100.0),
            FontId::proportional(14.0),
            Color32::WHITE,
        );
    }

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (label, value, color) in slices {
            ui.label(egui::RichText::new("■").color(*color));
            ui.label(format!("{label} ({value})"));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pie_angles_cover_full_circle() {
        let angles = pie_angles(&[1, 3]);
        assert_eq!(angles.len(), 2);
        let sweep: f32 = angles.iter().map(|(a, b)| b - a).sum();
        assert!((sweep - TAU).abs() < 1e-4);
        assert!((angles[1].1 - angles[1].0 - 3.0 * TAU / 4.0).abs() < 1e-4);
        assert!((angles[0].1 - angles[1].0).abs() < 1e-6);
    }

    #[test]
    fn pie_angles_empty_when_no_data() {
        assert!(pie_angles(&[0, 0]).is_empty());
        assert!(pie_angles(&[]).is_empty());
    }

    #[test]
    fn category_labels_only_on_integer_marks() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_label(&labels, 1.0), "b");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 5.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }
}
