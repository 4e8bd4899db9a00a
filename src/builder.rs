use crate::axes::{Axes, AxesSetup};
use crate::color::hex_or;
use crate::element::{GridElement, LineElement, RenderElement, TextElement, TextRole};
use crate::error::SceneResult;
use crate::figure::{Figure, IdIssuer, SceneGraph};
use crate::ir::{AxesId, ElementId, FigureId};
use crate::model::{AxesModel, ContentKind, PlotModel};
use crate::ExportOptions;
use serde::Serialize;
use std::fmt;

/// Non-fatal finding from a scene build
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "diagnostic", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Content of a kind the scene graph does not draw; it was left out
    Unsupported { kind: ContentKind, axes_id: AxesId },
    /// Text given in data coordinates; drawn at its export-time position and
    /// not moved by zoom
    DataAnchoredText { element_id: ElementId },
    /// A style value could not be resolved; `fallback` was used instead
    StyleFallback {
        id: String,
        attribute: &'static str,
        fallback: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Unsupported { kind, axes_id } => {
                write!(f, "{}: {} are not supported and were skipped", axes_id, kind)
            }
            Diagnostic::DataAnchoredText { element_id } => {
                write!(
                    f,
                    "{}: data-anchored text is pinned to the figure and will not follow zoom",
                    element_id
                )
            }
            Diagnostic::StyleFallback { id, attribute, fallback } => {
                write!(f, "{}: could not resolve {}, using {}", id, attribute, fallback)
            }
        }
    }
}

/// A built scene and everything noticed while building it
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub scene: SceneGraph,
    pub diagnostics: Vec<Diagnostic>,
}

// =============================================================================
// Scene construction
// =============================================================================

/// Build a scene graph from a plot model in one pass.
///
/// Per axes, elements are ordered lines, annotations, x label, y label,
/// title, then a single grid. Content kinds that are not modelled produce a
/// diagnostic and are left out; the rest of the scene is still built.
pub fn build_scene(
    model: &PlotModel,
    issuer: &IdIssuer,
    options: &ExportOptions,
) -> SceneResult<BuildOutput> {
    model.validate()?;
    let figure_id = issuer.issue()?;
    let figure_size = model.pixel_size();
    let mut diagnostics = Vec::new();

    let axes = model
        .axes
        .iter()
        .enumerate()
        .map(|(i, axes_model)| {
            build_axes(&figure_id, i + 1, axes_model, figure_size, options, &mut diagnostics)
        })
        .collect::<SceneResult<Vec<_>>>()?;

    let figure = Figure {
        id: figure_id,
        width: model.width,
        height: model.height,
        dpi: model.dpi,
        axes,
    };
    let scene = SceneGraph::new(figure);
    log::debug!(
        "built {}: {} axes, {} elements, {} diagnostics",
        scene.figure_id(),
        scene.axes().len(),
        scene.element_count(),
        diagnostics.len()
    );

    Ok(BuildOutput { scene, diagnostics })
}

fn build_axes(
    figure_id: &FigureId,
    index: usize,
    model: &AxesModel,
    figure_size: (f64, f64),
    options: &ExportOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> SceneResult<Axes> {
    let axes_id = AxesId::new(figure_id, index);

    for kind in model.unsupported.present() {
        log::warn!("axes {}: {} are not supported, skipping", axes_id, kind);
        diagnostics.push(Diagnostic::Unsupported {
            kind,
            axes_id: axes_id.clone(),
        });
    }

    let mut elements = Vec::with_capacity(model.lines.len() + model.texts.len() + 4);
    let mut next_id = {
        let axes_id = axes_id.clone();
        let mut n = 0;
        move || {
            n += 1;
            ElementId::new(&axes_id, n)
        }
    };

    for line in &model.lines {
        elements.push(RenderElement::Line(LineElement::new(
            next_id(),
            axes_id.clone(),
            line,
            diagnostics,
        )));
    }

    let figure_height = figure_size.1;
    let texts = model
        .texts
        .iter()
        .map(|t| (t, TextRole::Annotation))
        .chain([
            (&model.x_label, TextRole::XLabel),
            (&model.y_label, TextRole::YLabel),
            (&model.title, TextRole::Title),
        ]);
    for (text, role) in texts {
        elements.push(RenderElement::Text(TextElement::new(
            next_id(),
            text,
            role,
            figure_height,
            diagnostics,
        )));
    }

    elements.push(RenderElement::Grid(GridElement::new(
        next_id(),
        axes_id.clone(),
        &model.x_grid,
        &model.y_grid,
        diagnostics,
    )));

    let background = hex_or(model.background.as_ref(), &options.axes_background)
        .unwrap_or_else(|fb| {
            if model.background.is_some() {
                log::warn!("axes {}: unresolved background, using {}", axes_id, fb);
                diagnostics.push(Diagnostic::StyleFallback {
                    id: axes_id.to_string(),
                    attribute: "background",
                    fallback: fb.clone(),
                });
            }
            fb
        });

    Axes::new(
        AxesSetup {
            id: axes_id,
            figure_id: figure_id.clone(),
            bounds: model.bounds,
            xlim: model.xlim,
            ylim: model.ylim,
            figure_size,
            background,
            tick_font_size: model.tick_font_size.unwrap_or(options.tick_font_size),
            tick_count: options.tick_count,
        },
        elements,
    )
}
