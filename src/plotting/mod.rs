//! plotting — styled figures for analysis results.
//!
//! Purpose
//! -------
//! Turn correlation functions, density histograms and thermo tables into
//! publication-sized figures with a consistent look, rendered through
//! `plotters`.
//!
//! Key behaviors
//! -------------
//! - [`PlotStyle`] is the explicit styling state (theme, palette, figure
//!   size, output folder, minor-grid colour) handed to every call.
//! - [`plot_all`] draws named curves on one set of axes and
//!   [`plot_diffusion`] is its D(T) preset; [`plot_density`] and
//!   [`plot_densities`] draw time × position heat maps; [`plot_thermo`]
//!   lays out one panel per thermo quantity.
//! - Every call returns a [`Figure`] with the SVG document and, when saving
//!   was requested with a filename, the path written.
//!
//! Invariants & assumptions
//! ------------------------
//! - Saved files land at `<output_folder>/<filename>.<ext>` with pixel size
//!   `figure_size · dpi`, `dpi = max(4096 / w, 2160 / h)`.
//! - PNG text needs a `plotters` font backend; enable this crate's `ttf`
//!   feature for it. SVG output carries text without it.
//!
//! Testing notes
//! -------------
//! - Layout and colour logic ([`thermo_layout`], [`density::cell_color`],
//!   [`style::dpi_for`]) are tested directly; rendering tests check the SVG
//!   text and the saved file.

pub mod density;
pub mod errors;
pub mod figure;
pub mod style;
pub mod thermo;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::density::{DensityPlot, plot_densities, plot_density};
pub use self::errors::{PlotError, PlotResult};
pub use self::figure::{Figure, LinePlot, PostProcess, Series, plot_all, plot_diffusion};
pub use self::style::{
    DEFAULT_FIGURE_SIZE, DEFAULT_OUTPUT_FOLDER, ImageFormat, Palette, PlotStyle, Rgb, StyleName,
};
pub use self::thermo::{PanelSlot, ThermoPlot, plot_thermo, thermo_layout};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::density::{DensityPlot, plot_density};
    pub use super::errors::{PlotError, PlotResult};
    pub use super::figure::{LinePlot, PostProcess, Series, plot_all};
    pub use super::style::{ImageFormat, PlotStyle, StyleName};
    pub use super::thermo::{ThermoPlot, plot_thermo};
}
