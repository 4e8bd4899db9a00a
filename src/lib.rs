// Library exports for zoomgraph

pub mod error;
pub mod model;
pub mod color;
pub mod style;

// Scene graph
pub mod scale;
pub mod zoom;
pub mod ir;
pub mod element;
pub mod axes;
pub mod figure;
pub mod builder;

// Output
pub mod export;
pub mod serialize;

pub use builder::{build_scene, BuildOutput, Diagnostic};
pub use error::{SceneError, SceneResult};
pub use export::{Bundle, Exporter};
pub use figure::{IdIssuer, SceneGraph};
pub use model::PlotModel;
pub use zoom::ZoomTransform;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum OutputFormat {
    /// Standalone HTML fragment with style sheet and d3 scripts
    #[serde(rename = "html")]
    #[default]
    Html,
    /// The bundle as JSON data
    #[serde(rename = "json")]
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportOptions {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_d3_url")]
    pub d3_url: String,
    /// Used when the model gives no background or one that does not parse
    #[serde(default = "default_axes_background")]
    pub axes_background: String,
    /// Used when an axes has no tick labels to take the size from
    #[serde(default = "default_tick_font_size")]
    pub tick_font_size: f64,
    #[serde(default = "default_tick_count")]
    pub tick_count: usize,
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
}

fn default_d3_url() -> String { "https://d3js.org/d3.v3.min.js".to_string() }
fn default_axes_background() -> String { "#FCFCFC".to_string() }
fn default_tick_font_size() -> f64 { 11.0 }
fn default_tick_count() -> usize { 10 }
fn default_id_prefix() -> String { figure::DEFAULT_ID_PREFIX.to_string() }

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Html,
            d3_url: default_d3_url(),
            axes_background: default_axes_background(),
            tick_font_size: default_tick_font_size(),
            tick_count: default_tick_count(),
            id_prefix: default_id_prefix(),
        }
    }
}

impl ExportOptions {
    pub fn from_json(input: &str) -> SceneResult<Self> {
        let options: ExportOptions =
            serde_json::from_str(input).map_err(|e| SceneError::InvalidOptions(e.to_string()))?;
        figure::validate_prefix(&options.id_prefix)?;
        Ok(options)
    }

    /// An id issuer using the configured prefix
    pub fn issuer(&self) -> SceneResult<IdIssuer> {
        IdIssuer::with_prefix(&self.id_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults_from_empty_json() {
        let options = ExportOptions::from_json("{}").unwrap();
        assert_eq!(options.format, OutputFormat::Html);
        assert_eq!(options.d3_url, "https://d3js.org/d3.v3.min.js");
        assert_eq!(options.axes_background, "#FCFCFC");
        assert_eq!(options.tick_font_size, 11.0);
        assert_eq!(options.tick_count, 10);
        assert_eq!(options.id_prefix, "fig");
    }

    #[test]
    fn test_options_override() {
        let json = r#"{"format": "json", "id_prefix": "report", "tick_count": 5}"#;
        let options = ExportOptions::from_json(json).unwrap();
        assert_eq!(options.format, OutputFormat::Json);
        assert_eq!(options.tick_count, 5);
        assert_eq!(options.issuer().unwrap().issue().unwrap().as_str(), "report1");
    }

    #[test]
    fn test_options_reject_bad_prefix() {
        let err = ExportOptions::from_json(r#"{"id_prefix": "my-plot"}"#).unwrap_err();
        assert_eq!(err, SceneError::InvalidIdPrefix("my-plot".to_string()));
    }
}
