//! plotting::density — time × position heat maps of density histograms.
//!
//! Each row of the image is one chunk of a
//! [`DensityHistogram`](crate::analysis::DensityHistogram): the x axis runs
//! over `n_bins · d_dist`, the y axis over `n_rows · d_time`, with the
//! first chunk at the bottom. Colours follow a reversed magma ramp from
//! `vmin` to the image maximum; cells below `vmin` are painted in the
//! figure background so empty regions stay blank.
use crate::plotting::{
    errors::{PlotError, PlotResult},
    figure::{Figure, Scene, font, render, save_target},
    style::{ImageFormat, PlotStyle, Rgb},
};
use ndarray::ArrayView2;
use plotters::{coord::Shift, prelude::*};
use serde::{Deserialize, Serialize};

const MAGMA: [Rgb; 9] = [
    Rgb(0x00, 0x00, 0x04),
    Rgb(0x1c, 0x10, 0x44),
    Rgb(0x4f, 0x12, 0x7b),
    Rgb(0x81, 0x25, 0x81),
    Rgb(0xb5, 0x36, 0x7a),
    Rgb(0xe5, 0x50, 0x64),
    Rgb(0xfb, 0x87, 0x61),
    Rgb(0xfe, 0xc2, 0x87),
    Rgb(0xfc, 0xfd, 0xbf),
];

const COLORBAR_STEPS: usize = 128;

/// Options for [`plot_density`] and [`plot_densities`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityPlot {
    pub time_unit: String,
    pub distance_unit: String,
    /// Time covered by one row.
    pub d_time: f64,
    /// Width of one bin.
    pub d_dist: f64,
    /// Lowest coloured value; smaller cells take the background colour.
    pub vmin: f64,
    pub filename: Option<String>,
    pub save: bool,
    pub format: ImageFormat,
}

impl Default for DensityPlot {
    fn default() -> Self {
        DensityPlot {
            time_unit: "Picoseconds".into(),
            distance_unit: "Angstrom".into(),
            d_time: 10.0,
            d_dist: 0.1,
            vmin: 1.0,
            filename: None,
            save: false,
            format: ImageFormat::default(),
        }
    }
}

/// Heat map of one `[n_rows, n_bins]` histogram.
///
/// Errors
/// ------
/// - `PlotError::EmptyFigure` for an image without rows or bins.
/// - `PlotError::InvalidSpacing` for non-positive `d_time` / `d_dist`.
/// - `PlotError::InvalidColorFloor` for a NaN or infinite `vmin`.
/// - `PlotError::Render` / `PlotError::Io` from the backend or the file
///   system.
pub fn plot_density(
    rows: ArrayView2<f64>, opts: &DensityPlot, style: &PlotStyle,
) -> PlotResult<Figure> {
    plot_densities(&[("", rows)], opts, style)
}

/// Stacked heat maps sharing one colour scale, each titled.
///
/// Parameters
/// ----------
/// - `panels`: `&[(&str, ArrayView2<f64>)]`
///   `(title, image)` pairs drawn top to bottom.
/// - `opts`, `style`: as for [`plot_density`].
///
/// Errors
/// ------
/// As [`plot_density`], for any panel.
pub fn plot_densities(
    panels: &[(&str, ArrayView2<f64>)], opts: &DensityPlot, style: &PlotStyle,
) -> PlotResult<Figure> {
    if panels.is_empty() || panels.iter().any(|(_, image)| image.is_empty()) {
        return Err(PlotError::EmptyFigure);
    }
    let (d_time, d_dist) = (opts.d_time, opts.d_dist);
    if !(d_time.is_finite() && d_dist.is_finite() && d_time > 0.0 && d_dist > 0.0) {
        return Err(PlotError::InvalidSpacing { d_time, d_dist });
    }
    if !opts.vmin.is_finite() {
        return Err(PlotError::InvalidColorFloor { vmin: opts.vmin });
    }
    let vmax = panels
        .iter()
        .flat_map(|(_, image)| image.iter().copied())
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    let vmax = if vmax > opts.vmin { vmax } else { opts.vmin + 1.0 };
    tracing::debug!(n_panels = panels.len(), vmin = opts.vmin, vmax, "density plot");

    let scene = DensityScene { panels, opts, vmax };
    let target = save_target(opts.save, opts.filename.as_deref(), opts.format);
    render(&scene, style, style.figure_size(), target)
}

/// Colour of a cell holding `value` on a `[vmin, vmax]` reversed magma
/// scale; `under` below `vmin` (and for NaN).
pub fn cell_color(value: f64, vmin: f64, vmax: f64, under: Rgb) -> Rgb {
    if !(value >= vmin) {
        return under;
    }
    let t = if vmax > vmin { (value - vmin) / (vmax - vmin) } else { 1.0 };
    magma(1.0 - t.min(1.0))
}

fn magma(t: f64) -> Rgb {
    let pos = t.clamp(0.0, 1.0) * (MAGMA.len() - 1) as f64;
    let lower = (pos.floor() as usize).min(MAGMA.len() - 2);
    MAGMA[lower].lerp(MAGMA[lower + 1], pos - lower as f64)
}

struct DensityScene<'a, 'v> {
    panels: &'a [(&'a str, ArrayView2<'v, f64>)],
    opts: &'a DensityPlot,
    vmax: f64,
}

impl DensityScene<'_, '_> {
    fn draw_panel<DB: DrawingBackend>(
        &self, area: &DrawingArea<DB, Shift>, title: &str, image: &ArrayView2<f64>,
        style: &PlotStyle, scale: f64,
    ) -> PlotResult<()> {
        let (n_rows, n_bins) = image.dim();
        let (d_time, d_dist) = (self.opts.d_time, self.opts.d_dist);
        let under = style.face_color();

        let mut builder = ChartBuilder::on(area);
        builder
            .margin((8.0 * scale) as u32)
            .x_label_area_size((30.0 * scale) as u32)
            .y_label_area_size((45.0 * scale) as u32);
        if !title.is_empty() {
            builder.caption(title, font(style, 13.0, scale));
        }
        let mut chart =
            builder.build_cartesian_2d(0.0..n_bins as f64 * d_dist, 0.0..n_rows as f64 * d_time)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(format!("Z-position ({})", self.opts.distance_unit))
            .y_desc(format!("Time ({})", self.opts.time_unit))
            .label_style(font(style, 11.0, scale))
            .axis_desc_style(font(style, 12.0, scale))
            .axis_style(RGBColor::from(style.text_color()))
            .draw()?;

        chart.draw_series(image.indexed_iter().map(|((row, bin), &value)| {
            let color = RGBColor::from(cell_color(value, self.opts.vmin, self.vmax, under));
            let (x0, y0) = (bin as f64 * d_dist, row as f64 * d_time);
            Rectangle::new([(x0, y0), (x0 + d_dist, y0 + d_time)], color.filled())
        }))?;
        Ok(())
    }

    fn draw_colorbar<DB: DrawingBackend>(
        &self, area: &DrawingArea<DB, Shift>, style: &PlotStyle, scale: f64,
    ) -> PlotResult<()> {
        let (vmin, vmax) = (self.opts.vmin, self.vmax);
        let mut chart = ChartBuilder::on(area)
            .margin((8.0 * scale) as u32)
            .x_label_area_size((30.0 * scale) as u32)
            .y_label_area_size((45.0 * scale) as u32)
            .build_cartesian_2d(0.0..1.0, vmin..vmax)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .label_style(font(style, 11.0, scale))
            .axis_style(RGBColor::from(style.text_color()))
            .draw()?;

        let step = (vmax - vmin) / COLORBAR_STEPS as f64;
        chart.draw_series((0..COLORBAR_STEPS).map(|i| {
            let lo = vmin + i as f64 * step;
            let color = RGBColor::from(cell_color(lo + 0.5 * step, vmin, vmax, style.face_color()));
            Rectangle::new([(0.0, lo), (1.0, lo + step)], color.filled())
        }))?;
        Ok(())
    }
}

impl Scene for DensityScene<'_, '_> {
    fn draw<DB: DrawingBackend>(
        &self, root: &DrawingArea<DB, Shift>, style: &PlotStyle, scale: f64,
    ) -> PlotResult<()> {
        let (width, _) = root.dim_in_pixel();
        let (maps, bar) = root.split_horizontally((width as f64 * 0.88) as u32);
        let areas = maps.split_evenly((self.panels.len(), 1));
        for (area, (title, image)) in areas.iter().zip(self.panels) {
            self.draw_panel(area, title, image, style, scale)?;
        }
        self.draw_colorbar(&bar, style, scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    #[test]
    fn cells_below_vmin_take_the_background() {
        let under = Rgb::WHITE;
        assert_eq!(cell_color(0.5, 1.0, 10.0, under), under);
        assert_eq!(cell_color(f64::NAN, 1.0, 10.0, under), under);
        assert_eq!(cell_color(1.0, 1.0, 10.0, under), MAGMA[8]);
        assert_eq!(cell_color(10.0, 1.0, 10.0, under), MAGMA[0]);
        assert_eq!(cell_color(50.0, 1.0, 10.0, under), MAGMA[0]);
    }

    #[test]
    fn ramp_hits_every_anchor() {
        for (i, anchor) in MAGMA.iter().enumerate() {
            assert_eq!(magma(i as f64 / 8.0), *anchor);
        }
    }

    #[test]
    // Purpose
    // -------
    // A density image renders with the position/time axis labels and
    // writes the requested file.
    //
    // Given
    // -----
    // - A 3 × 4 histogram with counts above and below vmin, saved as SVG.
    //
    // Expect
    // ------
    // - Both axis descriptions in the SVG and the file in the output folder.
    fn density_image_is_rendered_and_saved() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut style = PlotStyle::new(crate::plotting::StyleName::Seaborn);
        style.set_output_folder(dir.path());
        let rows = array![[0.0, 2.0, 5.0, 0.0], [0.0, 3.0, 4.0, 0.5], [1.0, 1.0, 8.0, 0.0]];
        let opts = DensityPlot {
            filename: Some("density".into()),
            save: true,
            ..DensityPlot::default()
        };

        // Act
        let figure = plot_density(rows.view(), &opts, &style).unwrap();

        // Assert
        assert!(figure.svg().contains("Z-position (Angstrom)"));
        assert!(figure.svg().contains("Time (Picoseconds)"));
        assert!(dir.path().join("density.svg").exists());
    }

    #[test]
    fn empty_images_and_bad_spacing_are_rejected() {
        let style = PlotStyle::default();
        let empty = Array2::<f64>::zeros((0, 4));
        assert_eq!(
            plot_density(empty.view(), &DensityPlot::default(), &style).unwrap_err(),
            PlotError::EmptyFigure
        );
        let opts = DensityPlot { d_time: 0.0, ..DensityPlot::default() };
        let image = Array2::<f64>::ones((2, 2));
        assert!(matches!(
            plot_density(image.view(), &opts, &style),
            Err(PlotError::InvalidSpacing { .. })
        ));
        let opts = DensityPlot { vmin: f64::NAN, ..DensityPlot::default() };
        assert!(matches!(
            plot_density(image.view(), &opts, &style),
            Err(PlotError::InvalidColorFloor { .. })
        ));
    }

    #[test]
    fn stacked_panels_share_a_title_each() {
        let a = Array2::<f64>::from_elem((2, 3), 2.0);
        let b = Array2::<f64>::from_elem((2, 3), 4.0);
        let figure = plot_densities(
            &[("Ar-90K", a.view()), ("Ar-120K", b.view())],
            &DensityPlot::default(),
            &PlotStyle::default(),
        )
        .unwrap();
        assert!(figure.svg().contains("Ar-90K") && figure.svg().contains("Ar-120K"));
        assert!(figure.saved_to().is_none());
    }
}
