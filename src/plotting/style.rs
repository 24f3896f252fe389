//! plotting::style — explicit plot-styling state.
//!
//! Purpose
//! -------
//! Hold everything a figure needs to look consistent: the theme, the colour
//! cycle, the figure size in inches, the output folder and the minor-grid
//! colour. A [`PlotStyle`] value is passed to every plotting call; there is
//! no process-wide current style.
//!
//! Key behaviors
//! -------------
//! - [`StyleName`] resolves `"gruvbox"` / `"seaborn"`; any other name is a
//!   [`PlotError::UnknownStyle`].
//! - [`PlotStyle::new`] applies the theme defaults: gruvbox pairs the dark
//!   background with the high-contrast palette and a `#32302f` minor grid,
//!   seaborn pairs a white figure with the `deep` palette and a `#f4f4f8`
//!   minor grid. Both start at 17.5 × 13 inches saving into `figures/`.
//! - [`PlotStyle::dpi`] is `max(4096 / w, 2160 / h)` so saved figures cover
//!   at least a 4K frame in one dimension.
//!
//! Conventions
//! -----------
//! - Colours are [`Rgb`] values serialized as `#rrggbb` strings.
//! - Saved files land at `<output_folder>/<filename>.<ext>`.
use crate::plotting::errors::{PlotError, PlotResult};
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Folder used for saved figures unless changed.
pub const DEFAULT_OUTPUT_FOLDER: &str = "figures";

/// Figure size in inches used by both themes.
pub const DEFAULT_FIGURE_SIZE: (f64, f64) = (17.5, 13.0);

const HIGH_CONTRAST: [&str; 23] = [
    "#3572C6", "#83a83b", "#c44e52", "#a89984", "#8172b2", "#b57614", "#8ec07c", "#ff711a",
    "#d3869b", "#6C7A89", "#77BEDB", "#4168B7", "#27ae60", "#e74c3c", "#ff914d", "#bc89e0",
    "#3498db", "#fabd2f", "#fb4934", "#b16286", "#83a598", "#fe8019", "#b8bb26",
];

const DEEP: [&str; 10] = [
    "#4C72B0", "#DD8452", "#55A868", "#C44E52", "#8172B3", "#937860", "#DA8BC3", "#8C8C8C",
    "#CCB974", "#64B5CD",
];

// ---- Colours ----

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Parse `#rrggbb` (the leading `#` is optional, case-insensitive).
    ///
    /// Errors
    /// ------
    /// - `PlotError::InvalidColor` for any other shape.
    pub fn from_hex(hex: &str) -> PlotResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || PlotError::InvalidColor { color: hex.to_owned() };
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Linear blend towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Rgb {
    type Error = PlotError;

    fn try_from(value: String) -> PlotResult<Self> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

impl From<Rgb> for RGBColor {
    fn from(value: Rgb) -> Self {
        RGBColor(value.0, value.1, value.2)
    }
}

// ---- Palettes ----

/// Named colour cycle; series `i` uses colour `i mod len`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    name: String,
    colors: Vec<Rgb>,
}

impl Palette {
    /// 23-colour cycle tuned for dark backgrounds.
    pub fn high_contrast() -> Self {
        Self::from_table("high-contrast", &HIGH_CONTRAST)
    }

    /// seaborn's default `deep` cycle.
    pub fn deep() -> Self {
        Self::from_table("deep", &DEEP)
    }

    /// Palette from `#rrggbb` strings.
    ///
    /// Errors
    /// ------
    /// - `PlotError::InvalidColor` for a malformed entry.
    /// - `PlotError::UnknownPalette` when `colors` is empty.
    pub fn from_hex(name: &str, colors: &[&str]) -> PlotResult<Self> {
        if colors.is_empty() {
            return Err(PlotError::UnknownPalette { name: name.to_owned() });
        }
        let colors = colors.iter().map(|c| Rgb::from_hex(c)).collect::<PlotResult<Vec<_>>>()?;
        Ok(Palette { name: name.to_owned(), colors })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colour of the `index`-th series, cycling.
    pub fn color(&self, index: usize) -> Rgb {
        self.colors.get(index % self.colors.len().max(1)).copied().unwrap_or(Rgb::WHITE)
    }

    fn from_table(name: &str, table: &[&str]) -> Self {
        let colors = table.iter().filter_map(|c| Rgb::from_hex(c).ok()).collect();
        Palette { name: name.to_owned(), colors }
    }
}

impl TryFrom<&str> for Palette {
    type Error = PlotError;

    fn try_from(name: &str) -> PlotResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "high-contrast" | "gruvbox" => Ok(Palette::high_contrast()),
            "deep" | "seaborn" => Ok(Palette::deep()),
            _ => Err(PlotError::UnknownPalette { name: name.to_owned() }),
        }
    }
}

// ---- Themes ----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleName {
    #[default]
    Gruvbox,
    Seaborn,
}

impl StyleName {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleName::Gruvbox => "gruvbox",
            StyleName::Seaborn => "seaborn",
        }
    }
}

impl fmt::Display for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for StyleName {
    type Error = PlotError;

    fn try_from(name: &str) -> PlotResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "gruvbox" => Ok(StyleName::Gruvbox),
            "seaborn" => Ok(StyleName::Seaborn),
            _ => Err(PlotError::UnknownStyle { name: name.to_owned() }),
        }
    }
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Svg,
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

impl TryFrom<&str> for ImageFormat {
    type Error = PlotError;

    fn try_from(name: &str) -> PlotResult<Self> {
        match name.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "svg" => Ok(ImageFormat::Svg),
            "png" => Ok(ImageFormat::Png),
            _ => Err(PlotError::UnknownFormat { name: name.to_owned() }),
        }
    }
}

// ---- Plot style ----

/// Deserialized values pass the same figure-size check as
/// [`PlotStyle::set_figure_size`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPlotStyle")]
pub struct PlotStyle {
    style: StyleName,
    palette: Palette,
    figure_size: (f64, f64),
    output_folder: PathBuf,
    minor_grid_color: Rgb,
}

#[derive(Deserialize)]
struct RawPlotStyle {
    style: StyleName,
    palette: Palette,
    figure_size: (f64, f64),
    output_folder: PathBuf,
    minor_grid_color: Rgb,
}

impl TryFrom<RawPlotStyle> for PlotStyle {
    type Error = PlotError;

    fn try_from(raw: RawPlotStyle) -> PlotResult<Self> {
        validate_size(raw.figure_size)?;
        let RawPlotStyle { style, palette, figure_size, output_folder, minor_grid_color } = raw;
        Ok(PlotStyle { style, palette, figure_size, output_folder, minor_grid_color })
    }
}

impl PlotStyle {
    /// Theme defaults for `style`.
    pub fn new(style: StyleName) -> Self {
        let (palette, minor) = match style {
            StyleName::Gruvbox => (Palette::high_contrast(), Rgb(0x32, 0x30, 0x2f)),
            StyleName::Seaborn => (Palette::deep(), Rgb(0xf4, 0xf4, 0xf8)),
        };
        PlotStyle {
            style,
            palette,
            figure_size: DEFAULT_FIGURE_SIZE,
            output_folder: PathBuf::from(DEFAULT_OUTPUT_FOLDER),
            minor_grid_color: minor,
        }
    }

    /// Replace the colour cycle, keeping the theme.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn style(&self) -> StyleName {
        self.style
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// `(width, height)` in inches.
    pub fn figure_size(&self) -> (f64, f64) {
        self.figure_size
    }

    /// Errors
    /// ------
    /// - `PlotError::InvalidFigureSize` for a non-positive or non-finite
    ///   dimension.
    pub fn set_figure_size(&mut self, width: f64, height: f64) -> PlotResult<()> {
        validate_size((width, height))?;
        self.figure_size = (width, height);
        Ok(())
    }

    pub fn output_folder(&self) -> &Path {
        &self.output_folder
    }

    pub fn set_output_folder(&mut self, folder: impl Into<PathBuf>) {
        self.output_folder = folder.into();
    }

    pub fn minor_grid_color(&self) -> Rgb {
        self.minor_grid_color
    }

    pub fn set_minor_grid_color(&mut self, color: Rgb) {
        self.minor_grid_color = color;
    }

    /// Figure background; also used for the saved file's edge.
    pub fn face_color(&self) -> Rgb {
        match self.style {
            StyleName::Gruvbox => Rgb(0x28, 0x28, 0x28),
            StyleName::Seaborn => Rgb::WHITE,
        }
    }

    /// Plot-area background.
    pub fn axes_color(&self) -> Rgb {
        match self.style {
            StyleName::Gruvbox => Rgb(0x28, 0x28, 0x28),
            StyleName::Seaborn => Rgb(0xea, 0xea, 0xf2),
        }
    }

    pub fn grid_color(&self) -> Rgb {
        match self.style {
            StyleName::Gruvbox => Rgb(0x3c, 0x38, 0x36),
            StyleName::Seaborn => Rgb::WHITE,
        }
    }

    pub fn text_color(&self) -> Rgb {
        match self.style {
            StyleName::Gruvbox => Rgb(0xeb, 0xdb, 0xb2),
            StyleName::Seaborn => Rgb(0x26, 0x26, 0x26),
        }
    }

    /// Dots per inch for this figure size.
    pub fn dpi(&self) -> f64 {
        dpi_for(self.figure_size)
    }

    /// Pixel dimensions of a saved figure.
    pub fn pixel_size(&self) -> (u32, u32) {
        pixel_size_for(self.figure_size)
    }

    /// `<output_folder>/<filename>.<ext>`.
    pub fn save_path(&self, filename: &str, format: ImageFormat) -> PathBuf {
        self.output_folder.join(format!("{filename}.{}", format.extension()))
    }
}

impl Default for PlotStyle {
    fn default() -> Self {
        PlotStyle::new(StyleName::default())
    }
}

impl TryFrom<&str> for PlotStyle {
    type Error = PlotError;

    fn try_from(name: &str) -> PlotResult<Self> {
        Ok(PlotStyle::new(StyleName::try_from(name)?))
    }
}

/// `max(4096 / w, 2160 / h)` for a `(w, h)` figure in inches.
pub fn dpi_for(figure_size: (f64, f64)) -> f64 {
    let (w, h) = figure_size;
    (4096.0 / w).max(2160.0 / h)
}

/// `figure_size · dpi`, rounded to whole pixels.
pub fn pixel_size_for(figure_size: (f64, f64)) -> (u32, u32) {
    let dpi = dpi_for(figure_size);
    ((figure_size.0 * dpi).round() as u32, (figure_size.1 * dpi).round() as u32)
}

pub(crate) fn validate_size((width, height): (f64, f64)) -> PlotResult<()> {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(PlotError::InvalidFigureSize { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // The default figure saves at the resolution that makes its width
    // exactly 4096 px.
    //
    // Given
    // -----
    // - The default 17.5 × 13 inch figure.
    //
    // Expect
    // ------
    // - dpi = 4096 / 17.5 (the width term dominates) and 4096 × 3043 px.
    fn default_figure_targets_4k_width() {
        // Arrange
        let style = PlotStyle::default();

        // Act
        let dpi = style.dpi();
        let pixels = style.pixel_size();

        // Assert
        assert_relative_eq!(dpi, 4096.0 / 17.5, epsilon = 1e-12);
        assert_eq!(pixels, (4096, 3043));
    }

    #[test]
    fn tall_figures_are_bounded_by_height() {
        assert_relative_eq!(dpi_for((4.0, 10.0)), 1024.0, epsilon = 1e-12);
        assert_relative_eq!(dpi_for((30.0, 5.0)), 432.0, epsilon = 1e-12);
    }

    #[test]
    fn themes_carry_their_defaults() {
        let gruvbox = PlotStyle::try_from("gruvbox").unwrap();
        let seaborn = PlotStyle::try_from("Seaborn").unwrap();

        assert_eq!(gruvbox.palette().len(), 23);
        assert_eq!(gruvbox.palette().color(0).to_hex(), "#3572c6");
        assert_eq!(gruvbox.minor_grid_color().to_hex(), "#32302f");
        assert_eq!(seaborn.face_color(), Rgb::WHITE);
        assert_eq!(seaborn.minor_grid_color().to_hex(), "#f4f4f8");
        assert_eq!(seaborn.output_folder(), Path::new("figures"));
        assert_eq!(seaborn.figure_size(), (17.5, 13.0));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            PlotStyle::try_from("solarized").unwrap_err(),
            PlotError::UnknownStyle { name: "solarized".into() }
        );
        assert!(matches!(Palette::try_from("viridis"), Err(PlotError::UnknownPalette { .. })));
        assert!(matches!(ImageFormat::try_from("pdf"), Err(PlotError::UnknownFormat { .. })));
    }

    #[test]
    fn palette_cycles_past_its_end() {
        let palette = Palette::from_hex("pair", &["#000000", "#ffffff"]).unwrap();
        assert_eq!(palette.color(2), Rgb(0, 0, 0));
        assert_eq!(palette.color(3), Rgb::WHITE);
    }

    #[test]
    fn hex_colours_parse_and_reject_garbage() {
        assert_eq!(Rgb::from_hex("#FE8019").unwrap(), Rgb(0xfe, 0x80, 0x19));
        assert_eq!(Rgb::from_hex("282828").unwrap(), Rgb(0x28, 0x28, 0x28));
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#gg0000").is_err());
        assert!(Rgb::from_hex("+1+2+3").is_err());
        assert!(Rgb::from_hex("#-1ffff").is_err());
    }

    #[test]
    fn setters_validate_and_paths_follow_folder() {
        let mut style = PlotStyle::new(StyleName::Seaborn).with_palette(Palette::high_contrast());
        style.set_output_folder("out/plots");

        assert!(style.set_figure_size(0.0, 3.0).is_err());
        style.set_figure_size(8.0, 6.0).unwrap();

        assert_eq!(style.palette().name(), "high-contrast");
        assert_eq!(style.figure_size(), (8.0, 6.0));
        assert_eq!(style.save_path("msd", ImageFormat::Png), Path::new("out/plots/msd.png"));
    }

    #[test]
    fn style_serializes_colours_as_hex() {
        let json = serde_json::to_value(PlotStyle::default()).unwrap();
        assert_eq!(json["minor_grid_color"], "#32302f");
        assert_eq!(json["style"], "gruvbox");
        let back: PlotStyle = serde_json::from_value(json).unwrap();
        assert_eq!(back, PlotStyle::default());
    }

    #[test]
    // Purpose
    // -------
    // A stored style with a degenerate figure size is rejected on load, the
    // same way `set_figure_size` rejects it.
    fn deserialized_style_checks_figure_size() {
        let mut json = serde_json::to_value(PlotStyle::default()).unwrap();
        json["figure_size"] = serde_json::json!([0.0, 13.0]);

        let err = serde_json::from_value::<PlotStyle>(json).unwrap_err().to_string();

        assert!(err.contains("Figure size must be finite and > 0; got: (0, 13)"), "{err}");
    }
}
