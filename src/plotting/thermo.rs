//! plotting::thermo — panel grids of thermo series.
//!
//! Purpose
//! -------
//! Compare several simulations quantity by quantity: one panel per thermo
//! label, one line per simulation, all against the same time column.
//!
//! Key behaviors
//! -------------
//! - Panels sit in two columns and `ceil(n / 2)` rows, filled from the
//!   bottom so the last labels line up on the bottom row. With an odd count
//!   the top row holds a single panel, whose legend entries also name the
//!   quantity.
//! - y labels read `"{label} [{unit}]"` with `"def"` for labels missing
//!   from the unit map; the bottom row carries `"Time [{unit}]"`.
//! - The figure is 13 inches wide and `⌊4.5 · rows⌋` inches tall.
use crate::{
    analysis::ThermoData,
    plotting::{
        errors::{PlotError, PlotResult},
        figure::{Figure, Scene, axis_range, font, render, save_target, stroke},
        style::{ImageFormat, PlotStyle},
    },
};
use plotters::{coord::Shift, prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

const PANEL_COLUMNS: usize = 2;
const FIGURE_WIDTH: f64 = 13.0;
const ROW_HEIGHT: f64 = 4.5;

/// Options for [`plot_thermo`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThermoPlot {
    /// Time window `(min, max)`, inclusive; `None` keeps every row.
    pub xlim: Option<(f64, f64)>,
    /// Unit per label, including the time label.
    pub units: HashMap<String, String>,
    pub filename: Option<String>,
    pub save: bool,
    pub format: ImageFormat,
}

impl ThermoPlot {
    fn unit_or<'a>(&'a self, label: &str, fallback: &'a str) -> &'a str {
        self.units.get(label).map_or(fallback, String::as_str)
    }
}

/// Grid slot of one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSlot {
    pub row: usize,
    pub col: usize,
}

/// Rows of the grid and the slot of each of `n_panels` labels, in label
/// order. Row 0 is the top row.
pub fn thermo_layout(n_panels: usize) -> (usize, Vec<PanelSlot>) {
    let rows = n_panels / PANEL_COLUMNS + n_panels % PANEL_COLUMNS;
    let shift = n_panels % PANEL_COLUMNS;
    let slots = (0..n_panels)
        .map(|i| {
            // An odd count leaves the right half of the top row empty.
            let k = if shift == 1 && i > 0 { i + 1 } else { i };
            PanelSlot { row: k / PANEL_COLUMNS, col: k % PANEL_COLUMNS }
        })
        .collect();
    (rows, slots)
}

/// Grid of thermo panels, one line per simulation.
///
/// Parameters
/// ----------
/// - `data`: `&BTreeMap<String, ThermoData>`
///   Thermo tables keyed by simulation name.
/// - `label_t`: `&str`
///   Time column shared by all tables.
/// - `labels`: `&[&str]`
///   Quantities to plot, one panel each.
/// - `sims`: `Option<&[&str]>`
///   Simulations to draw; `None` draws every key of `data`.
/// - `opts`: `&ThermoPlot`
///   Time window, units and saving.
///
/// Errors
/// ------
/// - `PlotError::EmptyFigure` when `labels` or the simulation list is empty.
/// - `PlotError::MissingSeries` for a simulation missing from `data`.
/// - `PlotError::Analysis` for a label missing from a table or an invalid
///   time window.
pub fn plot_thermo(
    data: &BTreeMap<String, ThermoData>, label_t: &str, labels: &[&str], sims: Option<&[&str]>,
    opts: &ThermoPlot, style: &PlotStyle,
) -> PlotResult<Figure> {
    let sims: Vec<&str> = match sims {
        Some(sims) => sims.to_vec(),
        None => data.keys().map(String::as_str).collect(),
    };
    if labels.is_empty() || sims.is_empty() {
        return Err(PlotError::EmptyFigure);
    }

    let mut windows = Vec::with_capacity(sims.len());
    for &sim in &sims {
        let table = data.get(sim).ok_or_else(|| PlotError::MissingSeries { key: sim.into() })?;
        windows.push((sim, table.window(label_t, opts.xlim)?));
    }

    let (rows, slots) = thermo_layout(labels.len());
    let single_top = labels.len() % PANEL_COLUMNS == 1;
    let mut panels = Vec::with_capacity(labels.len());
    for (i, (&label, slot)) in labels.iter().zip(slots).enumerate() {
        let mut lines = Vec::with_capacity(windows.len());
        for (sim, table) in &windows {
            let time = table.get(label_t)?;
            let values = table.get(label)?;
            let points: Vec<(f64, f64)> = time
                .iter()
                .zip(values.iter())
                .filter(|(t, v)| t.is_finite() && v.is_finite())
                .map(|(&t, &v)| (t, v))
                .collect();
            let name =
                if single_top && i == 0 { format!("{sim}, {label}") } else { sim.to_string() };
            lines.push((name, points));
        }
        panels.push(Panel {
            slot,
            y_label: format!("{label} [{}]", opts.unit_or(label, "def")),
            bottom: slot.row + 1 == rows,
            lines,
        });
    }

    let all_times = panels.iter().flat_map(|p| p.lines.iter()).flat_map(|(_, pts)| pts.iter());
    let x_range = axis_range(all_times.map(|&(t, _)| t), opts.xlim, false)?;
    let x_label = format!("Time [{}]", opts.unit_or(label_t, ""));
    tracing::debug!(n_panels = panels.len(), rows, n_sims = sims.len(), "thermo plot");

    let scene = ThermoScene { panels, rows, x_range, x_label };
    let figure_size = (FIGURE_WIDTH, (ROW_HEIGHT * rows as f64).floor());
    let target = save_target(opts.save, opts.filename.as_deref(), opts.format);
    render(&scene, style, figure_size, target)
}

struct Panel {
    slot: PanelSlot,
    y_label: String,
    bottom: bool,
    lines: Vec<(String, Vec<(f64, f64)>)>,
}

struct ThermoScene {
    panels: Vec<Panel>,
    rows: usize,
    x_range: (f64, f64),
    x_label: String,
}

impl Scene for ThermoScene {
    fn draw<DB: DrawingBackend>(
        &self, root: &DrawingArea<DB, Shift>, style: &PlotStyle, scale: f64,
    ) -> PlotResult<()> {
        let areas = root.split_evenly((self.rows, PANEL_COLUMNS));
        let text = RGBColor::from(style.text_color());
        let width = stroke(1.5, scale);
        let grid = RGBColor::from(style.grid_color()).stroke_width(stroke(0.8, scale));
        let legend_len = (20.0 * scale) as i32;

        for panel in &self.panels {
            let Some(area) = areas.get(panel.slot.row * PANEL_COLUMNS + panel.slot.col) else {
                continue;
            };
            let ys = panel.lines.iter().flat_map(|(_, pts)| pts.iter().map(|&(_, v)| v));
            let y_range = axis_range(ys, None, false)?;

            let mut chart = ChartBuilder::on(area)
                .margin((6.0 * scale) as u32)
                .x_label_area_size((28.0 * scale) as u32)
                .y_label_area_size((50.0 * scale) as u32)
                .build_cartesian_2d(self.x_range.0..self.x_range.1, y_range.0..y_range.1)?;
            chart.plotting_area().fill(&RGBColor::from(style.axes_color()))?;

            let mut mesh = chart.configure_mesh();
            mesh.y_desc(panel.y_label.as_str())
                .label_style(font(style, 10.0, scale))
                .axis_desc_style(font(style, 11.0, scale))
                .axis_style(text)
                .bold_line_style(grid)
                .light_line_style(TRANSPARENT);
            if panel.bottom {
                mesh.x_desc(self.x_label.as_str());
            }
            mesh.draw()?;

            for (i, (name, points)) in panel.lines.iter().enumerate() {
                let line = RGBColor::from(style.palette().color(i)).stroke_width(width);
                chart
                    .draw_series(LineSeries::new(points.iter().copied(), line))?
                    .label(name.as_str())
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + legend_len, y)], line)
                    });
            }
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(RGBColor::from(style.axes_color()).mix(0.8))
                .border_style(text)
                .label_font(font(style, 10.0, scale))
                .draw()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn slots(pairs: &[(usize, usize)]) -> Vec<PanelSlot> {
        pairs.iter().map(|&(row, col)| PanelSlot { row, col }).collect()
    }

    #[test]
    // Purpose
    // -------
    // Panels fill the grid from the bottom, leaving the top row with a
    // single panel when the count is odd.
    //
    // Given
    // -----
    // - 1, 3, 4 and 5 labels.
    //
    // Expect
    // ------
    // - Label order reads left to right, top to bottom, and only the top
    //   row may hold a lone panel.
    fn odd_counts_leave_a_single_top_panel() {
        assert_eq!(thermo_layout(1), (1, slots(&[(0, 0)])));
        assert_eq!(thermo_layout(3), (2, slots(&[(0, 0), (1, 0), (1, 1)])));
        assert_eq!(thermo_layout(4), (2, slots(&[(0, 0), (0, 1), (1, 0), (1, 1)])));
        assert_eq!(thermo_layout(5), (3, slots(&[(0, 0), (1, 0), (1, 1), (2, 0), (2, 1)])));
    }

    fn runs() -> BTreeMap<String, ThermoData> {
        let mut a = ThermoData::new();
        a.insert("Time", array![0.0, 1.0, 2.0, 3.0]);
        a.insert("Temp", array![90.0, 91.0, 89.0, 90.0]);
        a.insert("Press", array![1.0, 1.2, 0.9, 1.1]);
        a.insert("TotEng", array![-5.0, -5.1, -5.0, -4.9]);
        let mut b = a.clone();
        b.insert("Temp", array![120.0, 119.0, 121.0, 120.0]);
        BTreeMap::from([("Ar-90K".to_string(), a), ("Ar-120K".to_string(), b)])
    }

    #[test]
    fn panels_carry_units_with_default_and_name_the_lone_quantity() {
        // Arrange
        let opts = ThermoPlot {
            units: HashMap::from([("Temp".into(), "K".into()), ("Time".into(), "ps".into())]),
            ..ThermoPlot::default()
        };

        // Act
        let figure = plot_thermo(
            &runs(),
            "Time",
            &["Temp", "Press", "TotEng"],
            None,
            &opts,
            &PlotStyle::default(),
        )
        .unwrap();

        // Assert
        let svg = figure.svg();
        assert!(svg.contains("Temp [K]"));
        assert!(svg.contains("Press [def]"));
        assert!(svg.contains("Time [ps]"));
        assert!(svg.contains("Ar-90K, Temp"));
        assert_eq!(figure.pixel_size(), crate::plotting::style::pixel_size_for((13.0, 9.0)));
    }

    #[test]
    fn missing_simulation_or_label_is_an_error() {
        let opts = ThermoPlot::default();
        let style = PlotStyle::default();
        let data = runs();

        let sim = plot_thermo(&data, "Time", &["Temp"], Some(&["Ar-300K"][..]), &opts, &style);
        let label = plot_thermo(&data, "Time", &["Volume"], None, &opts, &style);

        assert_eq!(sim.unwrap_err(), PlotError::MissingSeries { key: "Ar-300K".into() });
        assert!(matches!(label, Err(PlotError::Analysis(_))));
    }

    #[test]
    fn time_window_is_saved_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let mut style = PlotStyle::default();
        style.set_output_folder(dir.path());
        let opts = ThermoPlot {
            xlim: Some((1.0, 2.0)),
            filename: Some("thermo".into()),
            save: true,
            ..ThermoPlot::default()
        };

        let figure = plot_thermo(&runs(), "Time", &["Temp", "Press"], None, &opts, &style).unwrap();

        assert_eq!(figure.saved_to(), Some(dir.path().join("thermo.svg").as_path()));
    }
}
