//! Plot model: the already-computed plot description the scene graph is
//! built from. Producers hand it over as JSON; nothing here is derived.

use crate::color::ColorValue;
use crate::error::{SceneError, SceneResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct PlotModel {
    /// Figure width in inches
    pub width: f64,
    /// Figure height in inches
    pub height: f64,
    #[serde(default = "default_dpi")]
    pub dpi: f64,
    #[serde(default)]
    pub axes: Vec<AxesModel>,
}

fn default_dpi() -> f64 {
    80.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct AxesModel {
    /// (x0, y0, w, h) as fractions of the figure, y measured from the bottom
    pub bounds: [f64; 4],
    pub xlim: (f64, f64),
    pub ylim: (f64, f64),
    #[serde(default)]
    pub background: Option<ColorValue>,
    #[serde(default)]
    pub lines: Vec<LineModel>,
    /// Free-standing annotations
    #[serde(default)]
    pub texts: Vec<TextModel>,
    #[serde(default)]
    pub x_label: TextModel,
    #[serde(default)]
    pub y_label: TextModel,
    #[serde(default)]
    pub title: TextModel,
    #[serde(default)]
    pub x_grid: GridAxisModel,
    #[serde(default)]
    pub y_grid: GridAxisModel,
    /// Font size of the first tick label, if the axes has any
    #[serde(default)]
    pub tick_font_size: Option<f64>,
    /// Content the scene graph does not model; only presence is inspected
    #[serde(default)]
    pub unsupported: UnsupportedContent,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineModel {
    pub points: Vec<(f64, f64)>,
    #[serde(default)]
    pub linestyle: Option<String>,
    #[serde(default)]
    pub marker: Option<String>,
    #[serde(default)]
    pub color: Option<ColorValue>,
    #[serde(default)]
    pub linewidth: Option<f64>,
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(default)]
    pub markersize: Option<f64>,
    #[serde(default)]
    pub markerfacecolor: Option<ColorValue>,
    #[serde(default)]
    pub markeredgecolor: Option<ColorValue>,
    #[serde(default)]
    pub markeredgewidth: Option<f64>,
}

/// Coordinate system a text position was given in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextCoordinates {
    #[default]
    Figure,
    Axes,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextModel {
    #[serde(default)]
    pub text: String,
    /// Display position in pixels, origin at the figure's bottom-left
    #[serde(default)]
    pub position: (f64, f64),
    #[serde(default)]
    pub coordinates: TextCoordinates,
    /// Degrees, counter-clockwise
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_font_size")]
    pub fontsize: f64,
    #[serde(default)]
    pub color: Option<ColorValue>,
    #[serde(default)]
    pub horizontal_alignment: HorizontalAlign,
}

fn default_font_size() -> f64 {
    12.0
}

impl Default for TextModel {
    fn default() -> Self {
        Self {
            text: String::new(),
            position: (0.0, 0.0),
            coordinates: TextCoordinates::Figure,
            rotation: 0.0,
            fontsize: default_font_size(),
            color: None,
            horizontal_alignment: HorizontalAlign::Center,
        }
    }
}

/// Major-grid state of one axis
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GridAxisModel {
    #[serde(default)]
    pub enabled: bool,
    /// Style of the first gridline; taken as representative for the axis
    #[serde(default)]
    pub gridline: Option<GridlineModel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GridlineModel {
    #[serde(default)]
    pub color: Option<ColorValue>,
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(default)]
    pub linestyle: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnsupportedContent {
    #[serde(default)]
    pub images: usize,
    #[serde(default)]
    pub collections: usize,
    #[serde(default)]
    pub containers: usize,
    #[serde(default)]
    pub artists: usize,
    #[serde(default)]
    pub patches: usize,
    #[serde(default)]
    pub tables: usize,
    #[serde(default)]
    pub legend: bool,
}

/// Plot content kinds that are reported but never drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Images,
    Collections,
    Containers,
    Artists,
    Patches,
    Tables,
    Legend,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Images => "images",
            ContentKind::Collections => "collections",
            ContentKind::Containers => "containers",
            ContentKind::Artists => "artists",
            ContentKind::Patches => "patches",
            ContentKind::Tables => "tables",
            ContentKind::Legend => "legend",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl UnsupportedContent {
    /// Kinds present on the axes, in a fixed reporting order
    pub fn present(&self) -> Vec<ContentKind> {
        let counted = [
            (ContentKind::Images, self.images),
            (ContentKind::Collections, self.collections),
            (ContentKind::Containers, self.containers),
            (ContentKind::Artists, self.artists),
            (ContentKind::Patches, self.patches),
            (ContentKind::Tables, self.tables),
        ];
        let mut kinds: Vec<ContentKind> = counted
            .into_iter()
            .filter(|(_, n)| *n > 0)
            .map(|(kind, _)| kind)
            .collect();
        if self.legend {
            kinds.push(ContentKind::Legend);
        }
        kinds
    }
}

impl PlotModel {
    pub fn from_json(input: &str) -> SceneResult<Self> {
        let model: PlotModel =
            serde_json::from_str(input).map_err(|e| SceneError::InvalidModel(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    /// Figure size in pixels
    pub fn pixel_size(&self) -> (f64, f64) {
        (self.width * self.dpi, self.height * self.dpi)
    }

    pub fn validate(&self) -> SceneResult<()> {
        let dims_ok = [self.width, self.height, self.dpi]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0);
        if !dims_ok {
            return Err(SceneError::InvalidModel(format!(
                "figure size must be positive (width={}, height={}, dpi={})",
                self.width, self.height, self.dpi
            )));
        }
        for (i, axes) in self.axes.iter().enumerate() {
            if axes.bounds.iter().any(|b| !b.is_finite()) {
                return Err(SceneError::InvalidModel(format!(
                    "axes {} has non-finite bounds {:?}",
                    i + 1,
                    axes.bounds
                )));
            }
            let mut points = axes.lines.iter().flat_map(|l| &l.points);
            if points.any(|(x, y)| !x.is_finite() || !y.is_finite()) {
                return Err(SceneError::InvalidModel(format!(
                    "axes {} has a line with non-finite points",
                    i + 1
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_defaults() {
        let json = r#"{
            "width": 4, "height": 3,
            "axes": [{ "bounds": [0.1, 0.1, 0.8, 0.8], "xlim": [0, 1], "ylim": [0, 1] }]
        }"#;
        let model = PlotModel::from_json(json).unwrap();
        assert_eq!(model.dpi, 80.0);
        assert_eq!(model.pixel_size(), (320.0, 240.0));
        let axes = &model.axes[0];
        assert!(axes.lines.is_empty());
        assert!(axes.title.text.is_empty());
        assert_eq!(axes.title.fontsize, 12.0);
        assert!(!axes.x_grid.enabled);
        assert!(axes.unsupported.present().is_empty());
    }

    #[test]
    fn test_unsupported_present() {
        let content = UnsupportedContent {
            images: 1,
            patches: 3,
            legend: true,
            ..Default::default()
        };
        assert_eq!(
            content.present(),
            vec![ContentKind::Images, ContentKind::Patches, ContentKind::Legend]
        );
    }

    #[test]
    fn test_invalid_figure_size() {
        let json = r#"{ "width": 0, "height": 3 }"#;
        let err = PlotModel::from_json(json).unwrap_err();
        assert!(err.to_string().contains("figure size"));
    }

    #[test]
    fn test_malformed_json() {
        let err = PlotModel::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SceneError::InvalidModel(_)));
    }
}
