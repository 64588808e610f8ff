use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::analysis::indices::IndexKind;
use crate::chart::{points_for, IndexBar, ProfilePoint, ProfileVariable};
use crate::color::ColorMap;
use crate::data::profile::AltitudeRow;

const PLOT_HEIGHT: f32 = 350.0;
const ALTITUDE_PLOT_HEIGHT: f32 = 300.0;

// ---------------------------------------------------------------------------
// Temperature & dew point vs pressure
// ---------------------------------------------------------------------------

/// Dual-line profile plot. Pressure is plotted negated so the surface sits at
/// the bottom; the axis labels show the real value.
pub fn profile_plot(ui: &mut Ui, series: &[ProfilePoint], colors: &ColorMap<ProfileVariable>) {
    Plot::new("profile_plot")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Temperature / Dew Point (°C)")
        .y_axis_label("Pressure (hPa)")
        .y_axis_formatter(|mark, _range| format!("{:.0}", -mark.value))
        .label_formatter(|name, value| {
            format!("{name}\n{:.1} °C @ {:.0} hPa", value.x, -value.y)
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for variable in ProfileVariable::ALL {
                let coords: Vec<[f64; 2]> = points_for(series, variable)
                    .map(|p| [p.value, -p.pressure])
                    .collect();
                let color = colors.color_for(&variable);

                plot_ui.line(
                    Line::new(PlotPoints::from(coords.clone()))
                        .name(variable)
                        .color(color)
                        .width(1.5),
                );
                plot_ui.points(Points::new(coords).name(variable).color(color).radius(3.0));
            }
        });
}

// ---------------------------------------------------------------------------
// Index summary bars
// ---------------------------------------------------------------------------

pub fn index_chart(ui: &mut Ui, summary: &[IndexBar]) {
    let colors = ColorMap::new(&IndexKind::ALL);
    let bars: Vec<Bar> = summary
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            Bar::new(i as f64, bar.value)
                .name(bar.index.name())
                .fill(colors.color_for(&bar.index))
        })
        .collect();

    Plot::new("index_chart")
        .height(PLOT_HEIGHT)
        .y_axis_label("Value")
        .x_axis_formatter(|mark, _range| {
            let slot = mark.value.round();
            if (mark.value - slot).abs() > f64::EPSILON || slot < 0.0 {
                return String::new();
            }
            IndexKind::ALL
                .get(slot as usize)
                .map(|kind| kind.name().to_string())
                .unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).width(0.6));
        });
}

// ---------------------------------------------------------------------------
// Altitude vs temperature
// ---------------------------------------------------------------------------

pub fn altitude_plot(ui: &mut Ui, rows: &[AltitudeRow]) {
    let coords: Vec<[f64; 2]> = rows.iter().map(|r| [r.altitude, r.temperature]).collect();

    Plot::new("altitude_plot")
        .height(ALTITUDE_PLOT_HEIGHT)
        .x_axis_label("Altitude")
        .y_axis_label("Temperature (°C)")
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(PlotPoints::from(coords.clone())).width(1.5));
            plot_ui.points(Points::new(coords).radius(3.0));
        });
}
