use super::Renderable;
use crate::axes::AxesScales;
use crate::builder::Diagnostic;
use crate::color::{hex_or, ColorValue};
use crate::ir::{
    AxesId, DrawSpec, ElementId, Instruction, StyleRule, StyleSpec, StyleTarget, UpdateSpec,
};
use crate::model::LineModel;
use crate::style::{enabled_token, parse_dash, DashArray, MarkerGlyph};

const DEFAULT_COLOR: &str = "#000000";
const DEFAULT_WIDTH: f64 = 1.0;
const DEFAULT_MARKER_SIZE: f64 = 6.0;
const DEFAULT_EDGE_WIDTH: f64 = 1.0;

/// Glyph sizes are area-like; the model gives marker size in points
const GLYPH_SIZE_FACTOR: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
struct MarkerSpec {
    glyph: MarkerGlyph,
    size: f64,
}

/// A polyline with optional per-point markers
#[derive(Debug, Clone)]
pub struct LineElement {
    id: ElementId,
    axes_id: AxesId,
    points: Vec<(f64, f64)>,
    dash: Option<DashArray>,
    marker: Option<MarkerSpec>,
    style: StyleSpec,
}

impl LineElement {
    pub fn new(
        id: ElementId,
        axes_id: AxesId,
        model: &LineModel,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Self {
        let mut fallback = |attribute: &'static str, value: String| {
            log::warn!("line {}: unresolved {}, using {}", id, attribute, value);
            diagnostics.push(Diagnostic::StyleFallback {
                id: id.to_string(),
                attribute,
                fallback: value,
            });
        };

        let dash = enabled_token(model.linestyle.as_deref()).map(|ls| {
            parse_dash(ls).unwrap_or_else(|| {
                fallback("linestyle", "solid".to_string());
                DashArray::solid()
            })
        });

        let marker = enabled_token(model.marker.as_deref()).map(|m| {
            let (glyph, exact) = MarkerGlyph::for_marker(m);
            if !exact {
                log::debug!("line {}: marker '{}' drawn as {}", id, m, glyph.name());
            }
            MarkerSpec {
                glyph,
                size: GLYPH_SIZE_FACTOR * model.markersize.unwrap_or(DEFAULT_MARKER_SIZE),
            }
        });

        // Absent colors take the documented default silently; present but
        // unresolvable ones are reported.
        let mut color_of = |attribute: &'static str, value: Option<&ColorValue>, default: &str| {
            hex_or(value, default).unwrap_or_else(|fb| {
                if value.is_some() {
                    fallback(attribute, fb.clone());
                }
                fb
            })
        };

        let line_color = color_of("color", model.color.as_ref(), DEFAULT_COLOR);
        let alpha = model
            .alpha
            .or_else(|| model.color.as_ref().and_then(ColorValue::alpha))
            .unwrap_or(1.0);

        let mut rules = Vec::new();
        if let Some(dash) = &dash {
            rules.push(
                StyleRule::new(StyleTarget::LinePath {
                    element_id: id.clone(),
                })
                .with("stroke", &line_color)
                .with("stroke-width", model.linewidth.unwrap_or(DEFAULT_WIDTH))
                .with("stroke-dasharray", dash.css())
                .with("fill", "none")
                .with("stroke-opacity", alpha),
            );
        }
        if marker.is_some() {
            let face = color_of("markerfacecolor", model.markerfacecolor.as_ref(), &line_color);
            let edge = color_of("markeredgecolor", model.markeredgecolor.as_ref(), &line_color);
            rules.push(
                StyleRule::new(StyleTarget::LineMarkers {
                    element_id: id.clone(),
                })
                .with("stroke-width", model.markeredgewidth.unwrap_or(DEFAULT_EDGE_WIDTH))
                .with("stroke", edge)
                .with("fill", face)
                .with("fill-opacity", alpha)
                .with("stroke-opacity", alpha),
            );
        }

        LineElement {
            id,
            axes_id,
            points: model.points.clone(),
            dash,
            marker,
            style: StyleSpec { rules },
        }
    }

    pub fn has_line(&self) -> bool {
        self.dash.is_some()
    }

    pub fn has_points(&self) -> bool {
        self.marker.is_some()
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Stroke and marker geometry in pixel space
    fn geometry(&self, scales: &AxesScales) -> Vec<Instruction> {
        let pixels: Vec<(f64, f64)> = self.points.iter().map(|&p| scales.project(p)).collect();
        let mut out = Vec::with_capacity(2);

        if self.has_line() {
            out.push(Instruction::Path {
                element_id: self.id.clone(),
                axes_id: self.axes_id.clone(),
                points: pixels.clone(),
            });
        }
        if let Some(marker) = &self.marker {
            out.push(Instruction::Markers {
                element_id: self.id.clone(),
                axes_id: self.axes_id.clone(),
                glyph: marker.glyph,
                size: marker.size,
                positions: pixels,
            });
        }
        out
    }
}

impl Renderable for LineElement {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn style_sheet(&self) -> &StyleSpec {
        &self.style
    }

    fn initial(&self, scales: &AxesScales) -> DrawSpec {
        let mut instructions = vec![Instruction::Data {
            element_id: self.id.clone(),
            points: self.points.clone(),
        }];
        instructions.extend(self.geometry(scales));
        DrawSpec {
            element_id: self.id.clone(),
            instructions,
        }
    }

    fn update(&self, scales: &AxesScales) -> UpdateSpec {
        UpdateSpec {
            element_id: self.id.clone(),
            instructions: self.geometry(scales),
        }
    }
}
