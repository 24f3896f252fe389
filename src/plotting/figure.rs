//! plotting::figure — line plots and the shared render/save pipeline.
//!
//! Purpose
//! -------
//! Draw named `(x, y)` series on one set of axes ([`plot_all`]) and provide
//! the machinery every figure in this module goes through: a [`Scene`] is
//! painted once into an in-memory SVG (returned in [`Figure`]) and, when
//! asked, a second time into `<output_folder>/<filename>.<ext>`.
//!
//! Key behaviors
//! -------------
//! - Series order is the sorted key list by default, or the caller's
//!   explicit key list; a key with no series is [`PlotError::MissingSeries`].
//! - `save = true` without a filename logs a warning and skips the file,
//!   it is not an error.
//! - [`PostProcess`] replaces free-form "call this plotting function"
//!   hooks with a closed set of axis tweaks.
//!
//! Conventions
//! -----------
//! - Sizes given in points are converted with `dpi / 72`, so text and line
//!   widths keep their proportions at any figure size.
//! - Logarithmic axes plot `log10` of the data; samples ≤ 0 are skipped.
use crate::{
    correlation::CorrelationFunction,
    plotting::{
        errors::{PlotError, PlotResult},
        style::{ImageFormat, PlotStyle, dpi_for, pixel_size_for, validate_size},
    },
};
use ndarray::Array1;
use plotters::{coord::Shift, prelude::*};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Axis tweaks applied after the series are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostProcess {
    LogX,
    LogY,
    /// Draw the minor grid in the style's minor-grid colour.
    MinorGrid,
    HideLegend,
}

/// One named curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    name: String,
    x: Array1<f64>,
    y: Array1<f64>,
}

impl Series {
    /// Errors
    /// ------
    /// - `PlotError::SeriesLengthMismatch` if `x` and `y` differ in length.
    pub fn new(name: impl Into<String>, x: Array1<f64>, y: Array1<f64>) -> PlotResult<Self> {
        let name = name.into();
        if x.len() != y.len() {
            let (x_len, y_len) = (x.len(), y.len());
            return Err(PlotError::SeriesLengthMismatch { key: name, x_len, y_len });
        }
        Ok(Series { name, x, y })
    }

    /// The averaged curve of `function` against `time`.
    pub fn from_function(function: &CorrelationFunction, time: Array1<f64>) -> PlotResult<Self> {
        Series::new(function.name(), time, function.average().clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn x(&self) -> &Array1<f64> {
        &self.x
    }

    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }
}

/// Options for [`plot_all`].
///
/// Defaults: sorted keys, automatic limits, no labels, not saved, SVG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePlot {
    /// Sort the key list before drawing.
    pub keys_sorted: bool,
    /// Subset and order of series to draw; `None` draws all.
    pub keys: Option<Vec<String>>,
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    pub x_label: String,
    pub y_label: String,
    pub title: String,
    pub filename: Option<String>,
    pub save: bool,
    pub format: ImageFormat,
    pub post: Vec<PostProcess>,
}

impl Default for LinePlot {
    fn default() -> Self {
        LinePlot {
            keys_sorted: true,
            keys: None,
            xlim: None,
            ylim: None,
            x_label: String::new(),
            y_label: String::new(),
            title: String::new(),
            filename: None,
            save: false,
            format: ImageFormat::default(),
            post: Vec::new(),
        }
    }
}

impl LinePlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_post(mut self, post: PostProcess) -> Self {
        self.post.push(post);
        self
    }

    /// Save to `filename` in `format` once rendered.
    pub fn saved_as(mut self, filename: impl Into<String>, format: ImageFormat) -> Self {
        self.filename = Some(filename.into());
        self.format = format;
        self.save = true;
        self
    }

    fn has(&self, post: PostProcess) -> bool {
        self.post.contains(&post)
    }
}

/// A rendered figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    svg: String,
    saved_to: Option<PathBuf>,
    pixel_size: (u32, u32),
}

impl Figure {
    /// SVG document of the figure.
    pub fn svg(&self) -> &str {
        &self.svg
    }

    /// File written by the call, if any.
    pub fn saved_to(&self) -> Option<&Path> {
        self.saved_to.as_deref()
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        self.pixel_size
    }
}

/// Draw every selected series of `series` on one set of axes.
///
/// Parameters
/// ----------
/// - `series`: `&[Series]`
///   Curves in caller order; names are the lookup keys.
/// - `opts`: `&LinePlot`
///   Key selection, limits, labels, post-processing and saving.
/// - `style`: `&PlotStyle`
///   Theme, palette, figure size and output folder.
///
/// Returns
/// -------
/// [`Figure`] holding the SVG and the saved path when a file was written.
///
/// Errors
/// ------
/// - `PlotError::MissingSeries` for a key with no series.
/// - `PlotError::EmptyFigure` when no key is selected or no finite sample
///   remains to set automatic limits.
/// - `PlotError::InvalidLimits` for reversed or non-finite limits, or
///   limits ≤ 0 on a logarithmic axis.
/// - `PlotError::Render` / `PlotError::Io` from the backend or the file
///   system.
pub fn plot_all(series: &[Series], opts: &LinePlot, style: &PlotStyle) -> PlotResult<Figure> {
    let selected = ordered(series, opts)?;
    let (log_x, log_y) = (opts.has(PostProcess::LogX), opts.has(PostProcess::LogY));
    let lines: Vec<(String, Vec<(f64, f64)>)> = selected
        .iter()
        .map(|s| {
            let points = s
                .x
                .iter()
                .zip(s.y.iter())
                .filter_map(|(&x, &y)| Some((to_axis(x, log_x)?, to_axis(y, log_y)?)))
                .collect();
            (s.name.clone(), points)
        })
        .collect();

    let xs = lines.iter().flat_map(|(_, p)| p.iter().map(|q| q.0));
    let x_range = axis_range(xs, opts.xlim, log_x)?;
    let ys = lines.iter().flat_map(|(_, p)| p.iter().map(|q| q.1));
    let y_range = axis_range(ys, opts.ylim, log_y)?;
    tracing::debug!(n_series = lines.len(), ?x_range, ?y_range, "line plot");

    let scene = LineScene { lines, opts, x_range, y_range };
    let target = save_target(opts.save, opts.filename.as_deref(), opts.format);
    render(&scene, style, style.figure_size(), target)
}

/// Diffusion coefficient against temperature, one curve per system.
///
/// Curves keep the caller's order. Empty labels and title in `opts` are
/// filled with the temperature / `1e-5 cm^2/s` axis names used by
/// `gmx msd` logs; everything else behaves as in [`plot_all`].
pub fn plot_diffusion(
    series: &[Series], opts: &LinePlot, style: &PlotStyle,
) -> PlotResult<Figure> {
    let mut opts = LinePlot { keys_sorted: false, ..opts.clone() };
    if opts.x_label.is_empty() {
        opts.x_label = "Temperature (K)".into();
    }
    if opts.y_label.is_empty() {
        opts.y_label = "Diffusion Coefficient 1e-5 cm^2/s".into();
    }
    if opts.title.is_empty() {
        opts.title = "Diffusion Coef vs Temperature".into();
    }
    plot_all(series, &opts, style)
}

// ---- Shared rendering pipeline ----

/// Something that can paint itself on any `plotters` backend.
pub(crate) trait Scene {
    fn draw<DB: DrawingBackend>(
        &self, root: &DrawingArea<DB, Shift>, style: &PlotStyle, scale: f64,
    ) -> PlotResult<()>;
}

/// Paint `scene` into an SVG string and optionally save it.
pub(crate) fn render<S: Scene>(
    scene: &S, style: &PlotStyle, figure_size: (f64, f64), save: Option<(&str, ImageFormat)>,
) -> PlotResult<Figure> {
    validate_size(figure_size)?;
    let pixel_size = pixel_size_for(figure_size);
    let scale = dpi_for(figure_size) / 72.0;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, pixel_size).into_drawing_area();
        paint(scene, &root, style, scale)?;
    }

    let saved_to = match save {
        Some((filename, format)) => {
            let path = style.save_path(filename, format);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
            }
            match format {
                ImageFormat::Svg => fs::write(&path, &svg).map_err(|e| io_error(&path, e))?,
                ImageFormat::Png => {
                    let root = BitMapBackend::new(&path, pixel_size).into_drawing_area();
                    paint(scene, &root, style, scale)?;
                }
            }
            tracing::info!(path = %path.display(), dpi = dpi_for(figure_size), "figure saved");
            Some(path)
        }
        None => None,
    };
    Ok(Figure { svg, saved_to, pixel_size })
}

/// `Some((filename, format))` when a file should be written.
pub(crate) fn save_target(
    save: bool, filename: Option<&str>, format: ImageFormat,
) -> Option<(&str, ImageFormat)> {
    match (save, filename) {
        (true, Some(name)) => Some((name, format)),
        (true, None) => {
            tracing::warn!("To save, you must specify file name");
            None
        }
        (false, _) => None,
    }
}

/// Text style of `points` size in the style's text colour.
pub(crate) fn font(style: &PlotStyle, points: f64, scale: f64) -> TextStyle<'static> {
    ("sans-serif", points * scale).into_font().color(&RGBColor::from(style.text_color()))
}

/// Pixel width of a `points`-wide line, at least one pixel.
pub(crate) fn stroke(points: f64, scale: f64) -> u32 {
    (points * scale).round().max(1.0) as u32
}

/// Axis interval from explicit limits or padded data extent.
pub(crate) fn axis_range<I>(
    values: I, lim: Option<(f64, f64)>, log: bool,
) -> PlotResult<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    if let Some((min, max)) = lim {
        if !(min.is_finite() && max.is_finite() && min < max) || (log && min <= 0.0) {
            return Err(PlotError::InvalidLimits { min, max });
        }
        return Ok(if log { (min.log10(), max.log10()) } else { (min, max) });
    }
    let (lo, hi) = values
        .into_iter()
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })
        .ok_or(PlotError::EmptyFigure)?;
    let pad = if hi > lo { 0.05 * (hi - lo) } else { (0.05 * lo.abs()).max(0.5) };
    Ok((lo - pad, hi + pad))
}

fn paint<S: Scene, DB: DrawingBackend>(
    scene: &S, root: &DrawingArea<DB, Shift>, style: &PlotStyle, scale: f64,
) -> PlotResult<()> {
    root.fill(&RGBColor::from(style.face_color()))?;
    scene.draw(root, style, scale)?;
    root.present()?;
    Ok(())
}

fn io_error(path: &Path, err: std::io::Error) -> PlotError {
    PlotError::Io { path: path.display().to_string(), message: err.to_string() }
}

// ---- Line plot ----

fn ordered<'a>(series: &'a [Series], opts: &LinePlot) -> PlotResult<Vec<&'a Series>> {
    let mut names: Vec<&str> = match &opts.keys {
        Some(keys) => keys.iter().map(String::as_str).collect(),
        None => series.iter().map(Series::name).collect(),
    };
    if opts.keys_sorted {
        names.sort_unstable();
    }
    if names.is_empty() {
        return Err(PlotError::EmptyFigure);
    }
    names
        .into_iter()
        .map(|name| {
            series
                .iter()
                .find(|s| s.name == name)
                .ok_or_else(|| PlotError::MissingSeries { key: name.to_owned() })
        })
        .collect()
}

fn to_axis(v: f64, log: bool) -> Option<f64> {
    match (log, v.is_finite()) {
        (_, false) => None,
        (true, true) if v <= 0.0 => None,
        (true, true) => Some(v.log10()),
        (false, true) => Some(v),
    }
}

struct LineScene<'a> {
    lines: Vec<(String, Vec<(f64, f64)>)>,
    opts: &'a LinePlot,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Scene for LineScene<'_> {
    fn draw<DB: DrawingBackend>(
        &self, root: &DrawingArea<DB, Shift>, style: &PlotStyle, scale: f64,
    ) -> PlotResult<()> {
        let text = RGBColor::from(style.text_color());
        let width = stroke(1.5, scale);
        let log_label = |v: &f64| format!("{:.1e}", 10f64.powf(*v));

        let mut builder = ChartBuilder::on(root);
        builder
            .margin((8.0 * scale) as u32)
            .x_label_area_size((30.0 * scale) as u32)
            .y_label_area_size((45.0 * scale) as u32);
        if !self.opts.title.is_empty() {
            builder.caption(&self.opts.title, font(style, 14.0, scale));
        }
        let mut chart = builder.build_cartesian_2d(
            self.x_range.0..self.x_range.1,
            self.y_range.0..self.y_range.1,
        )?;
        chart.plotting_area().fill(&RGBColor::from(style.axes_color()))?;

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(self.opts.x_label.as_str())
            .y_desc(self.opts.y_label.as_str())
            .label_style(font(style, 11.0, scale))
            .axis_desc_style(font(style, 12.0, scale))
            .axis_style(text)
            .bold_line_style(RGBColor::from(style.grid_color()).stroke_width(stroke(0.8, scale)));
        if self.opts.has(PostProcess::MinorGrid) {
            mesh.light_line_style(RGBColor::from(style.minor_grid_color()));
        } else {
            mesh.light_line_style(TRANSPARENT);
        }
        if self.opts.has(PostProcess::LogX) {
            mesh.x_label_formatter(&log_label);
        }
        if self.opts.has(PostProcess::LogY) {
            mesh.y_label_formatter(&log_label);
        }
        mesh.draw()?;

        let legend_len = (20.0 * scale) as i32;
        for (i, (name, points)) in self.lines.iter().enumerate() {
            let color = RGBColor::from(style.palette().color(i));
            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(width)))?
                .label(name.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + legend_len, y)], color.stroke_width(width))
                });
        }

        if !self.opts.has(PostProcess::HideLegend) {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(RGBColor::from(style.axes_color()).mix(0.8))
                .border_style(text)
                .label_font(font(style, 11.0, scale))
                .draw()?;
        }
        Ok(())
    }
}
