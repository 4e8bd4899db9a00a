use crate::element::{RenderElement, Renderable};
use crate::error::{AxisKind, SceneError, SceneResult};
use crate::ir::{AxesId, DrawSpec, FigureId, Instruction, StyleRule, StyleTarget, Tick, UpdateSpec};
use crate::scale::Scale;
use crate::zoom::ZoomTransform;
use serde::Serialize;

/// The x/y scale pair an axes' elements are drawn against
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxesScales {
    pub x: Scale,
    pub y: Scale,
    /// Approximate number of ticks for axes and gridlines
    pub tick_count: usize,
}

impl AxesScales {
    pub fn width(&self) -> f64 {
        (self.x.range.1 - self.x.range.0).abs()
    }

    pub fn height(&self) -> f64 {
        (self.y.range.0 - self.y.range.1).abs()
    }

    /// Data point to axes pixels
    pub fn project(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (self.x.apply(x), self.y.apply(y))
    }
}

/// Everything needed to place one axes on its figure
#[derive(Debug, Clone)]
pub struct AxesSetup {
    pub id: AxesId,
    pub figure_id: FigureId,
    /// (x0, y0, w, h) figure fractions, y from the bottom
    pub bounds: [f64; 4],
    pub xlim: (f64, f64),
    pub ylim: (f64, f64),
    /// Figure size in pixels
    pub figure_size: (f64, f64),
    pub background: String,
    pub tick_font_size: f64,
    pub tick_count: usize,
}

/// One plotting area: scales, zoom state and an ordered list of elements
#[derive(Debug, Clone)]
pub struct Axes {
    id: AxesId,
    figure_id: FigureId,
    origin: (f64, f64),
    background: String,
    tick_font_size: f64,
    base: AxesScales,
    current: AxesScales,
    zoom: ZoomTransform,
    elements: Vec<RenderElement>,
}

/// Result of one zoom/pan pass over an axes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoomUpdate {
    pub axes_id: AxesId,
    pub transform: ZoomTransform,
    pub scales: AxesScales,
    /// x then y axis redraw
    pub axis: Vec<Instruction>,
    /// One entry per element, in element order
    pub elements: Vec<UpdateSpec>,
}

impl ZoomUpdate {
    /// Axis redraws first, then every element's update
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.axis
            .iter()
            .chain(self.elements.iter().flat_map(|e| e.instructions.iter()))
    }
}

/// Initial draw of an axes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxesDraw {
    /// Frame, then x and y axis
    pub setup: Vec<Instruction>,
    pub elements: Vec<DrawSpec>,
}

impl AxesDraw {
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.setup
            .iter()
            .chain(self.elements.iter().flat_map(|e| e.instructions.iter()))
    }
}

fn checked_domain(axis: AxisKind, domain: (f64, f64)) -> SceneResult<(f64, f64)> {
    if domain.0 > domain.1 {
        return Err(SceneError::InvertedDomain {
            axis,
            min: domain.0,
            max: domain.1,
        });
    }
    Ok(domain)
}

impl Axes {
    pub fn new(setup: AxesSetup, elements: Vec<RenderElement>) -> SceneResult<Self> {
        let (fig_w, fig_h) = setup.figure_size;
        let [x0, y0, w, h] = setup.bounds;
        if setup.bounds.iter().any(|b| !(0.0..=1.0).contains(b)) || x0 + w > 1.0 || y0 + h > 1.0 {
            log::debug!("axes {}: bounds {:?} extend past the figure", setup.id, setup.bounds);
        }

        let width = w * fig_w;
        let height = h * fig_h;
        let x = Scale::new(AxisKind::X, checked_domain(AxisKind::X, setup.xlim)?, (0.0, width))?;
        // Pixel y grows downwards
        let y = Scale::new(AxisKind::Y, checked_domain(AxisKind::Y, setup.ylim)?, (height, 0.0))?;
        let base = AxesScales {
            x,
            y,
            tick_count: setup.tick_count,
        };

        Ok(Axes {
            id: setup.id,
            figure_id: setup.figure_id,
            origin: (x0 * fig_w, (1.0 - y0 - h) * fig_h),
            background: setup.background,
            tick_font_size: setup.tick_font_size,
            base,
            current: base,
            zoom: ZoomTransform::identity(),
            elements,
        })
    }

    pub fn id(&self) -> &AxesId {
        &self.id
    }

    pub fn figure_id(&self) -> &FigureId {
        &self.figure_id
    }

    pub fn elements(&self) -> &[RenderElement] {
        &self.elements
    }

    pub fn zoom(&self) -> &ZoomTransform {
        &self.zoom
    }

    /// Scales as of the last zoom event
    pub fn scales(&self) -> &AxesScales {
        &self.current
    }

    /// Scales before any zoom
    pub fn base_scales(&self) -> &AxesScales {
        &self.base
    }

    /// Axes rules followed by every element's rules, in element order
    pub fn style_sheet(&self) -> Vec<StyleRule> {
        let mut rules = vec![
            StyleRule::new(StyleTarget::AxisLines {
                axes_id: self.id.clone(),
            })
            .with("shape-rendering", "crispEdges")
            .with("stroke", "black")
            .with("fill", "none"),
            StyleRule::new(StyleTarget::AxisText {
                axes_id: self.id.clone(),
            })
            .with("font-family", "sans-serif")
            .with("font-size", format!("{}px", self.tick_font_size))
            .with("fill", "black")
            .with("stroke", "none"),
        ];
        for element in &self.elements {
            rules.extend(element.style_sheet().rules.iter().cloned());
        }
        rules
    }

    pub fn initial(&self) -> AxesDraw {
        let mut setup = vec![Instruction::Frame {
            axes_id: self.id.clone(),
            origin: self.origin,
            size: (self.current.width(), self.current.height()),
            background: self.background.clone(),
        }];
        setup.extend(self.axis_instructions());
        AxesDraw {
            setup,
            elements: self.elements.iter().map(|e| e.initial(&self.current)).collect(),
        }
    }

    /// Apply a new zoom state.
    ///
    /// The transform replaces the previous one (it is relative to the
    /// base scales, not to the last event). Scales are recomputed, the
    /// two axes are redrawn, then every element is updated in order. On error
    /// the previous state is kept.
    pub fn on_zoom(&mut self, transform: ZoomTransform) -> SceneResult<ZoomUpdate> {
        let x = self.base.x.transformed(&transform)?;
        let y = self.base.y.transformed(&transform)?;

        self.zoom = transform;
        self.current = AxesScales {
            x,
            y,
            tick_count: self.base.tick_count,
        };
        log::debug!(
            "axes {}: zoom to translate={:?} scale={}, x={:?} y={:?}",
            self.id,
            transform.translate(),
            transform.scale(),
            x.domain,
            y.domain
        );
        Ok(self.refresh())
    }

    /// Update pass at the current scales without changing zoom state
    pub fn refresh(&self) -> ZoomUpdate {
        ZoomUpdate {
            axes_id: self.id.clone(),
            transform: self.zoom,
            scales: self.current,
            axis: self.axis_instructions(),
            elements: self.elements.iter().map(|e| e.update(&self.current)).collect(),
        }
    }

    fn axis_instructions(&self) -> Vec<Instruction> {
        [self.current.x, self.current.y]
            .into_iter()
            .map(|scale| Instruction::Axis {
                axes_id: self.id.clone(),
                axis: scale.axis,
                ticks: scale
                    .ticks(self.current.tick_count)
                    .into_iter()
                    .map(|value| Tick {
                        value,
                        position: scale.apply(value),
                        label: scale.tick_label(value, self.current.tick_count),
                    })
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Diagnostic;
    use crate::element::{GridElement, LineElement};
    use crate::ir::ElementId;
    use crate::model::{GridAxisModel, LineModel};
    use approx::assert_relative_eq;

    fn setup(xlim: (f64, f64), ylim: (f64, f64)) -> AxesSetup {
        let figure_id = FigureId("fig1".to_string());
        AxesSetup {
            id: AxesId::new(&figure_id, 1),
            figure_id,
            bounds: [0.125, 0.1, 0.775, 0.8],
            xlim,
            ylim,
            figure_size: (640.0, 480.0),
            background: "#fcfcfc".to_string(),
            tick_font_size: 11.0,
            tick_count: 10,
        }
    }

    fn axes_with_line_and_grid() -> Axes {
        let s = setup((0.0, 10.0), (-1.0, 1.0));
        let mut diags: Vec<Diagnostic> = Vec::new();
        let line = LineElement::new(
            ElementId::new(&s.id, 1),
            s.id.clone(),
            &LineModel {
                points: vec![(0.0, 0.0), (5.0, 1.0), (10.0, -1.0)],
                linestyle: Some("-".to_string()),
                ..Default::default()
            },
            &mut diags,
        );
        let enabled = GridAxisModel {
            enabled: true,
            gridline: None,
        };
        let grid_id = ElementId::new(&s.id, 2);
        let grid = GridElement::new(grid_id, s.id.clone(), &enabled, &enabled, &mut diags);
        Axes::new(s, vec![RenderElement::Line(line), RenderElement::Grid(grid)]).unwrap()
    }

    #[test]
    fn test_layout() {
        let axes = axes_with_line_and_grid();
        let draw = axes.initial();
        match &draw.setup[0] {
            Instruction::Frame { origin, size, .. } => {
                assert_relative_eq!(origin.0, 80.0);
                assert_relative_eq!(origin.1, 48.0, epsilon = 1e-9);
                assert_relative_eq!(size.0, 496.0, epsilon = 1e-9);
                assert_relative_eq!(size.1, 384.0, epsilon = 1e-9);
            }
            other => panic!("Expected Frame, got {:?}", other),
        }
        assert_eq!(draw.elements.len(), 2);
        assert_eq!(axes.scales().y.apply(-1.0), axes.scales().height());
    }

    #[test]
    fn test_degenerate_and_inverted_domains() {
        let err = Axes::new(setup((1.0, 1.0), (0.0, 1.0)), vec![]).unwrap_err();
        assert!(matches!(err, SceneError::DegenerateDomain { axis: AxisKind::X, .. }));
        let err = Axes::new(setup((0.0, 1.0), (2.0, 1.0)), vec![]).unwrap_err();
        assert!(matches!(err, SceneError::InvertedDomain { axis: AxisKind::Y, .. }));
    }

    #[test]
    fn test_zoom_orders_axis_before_elements() {
        let mut axes = axes_with_line_and_grid();
        let update = axes.on_zoom(ZoomTransform::new(-50.0, 20.0, 2.0).unwrap()).unwrap();
        let ops: Vec<&str> = update.instructions().map(|i| i.op()).collect();
        assert_eq!(ops, vec!["axis", "axis", "path", "grid_lines", "grid_lines"]);
        assert_eq!(update.elements.len(), 2);
    }

    #[test]
    fn test_zoom_then_inverse_restores_scales() {
        let mut axes = axes_with_line_and_grid();
        let base = *axes.base_scales();
        let t = ZoomTransform::new(33.0, -12.5, 1.75).unwrap();
        axes.on_zoom(t).unwrap();
        assert!(axes.scales().x.domain != base.x.domain);

        axes.on_zoom(t.then(&t.inverse().unwrap()).unwrap()).unwrap();
        for v in [0.0, 2.5, 10.0] {
            assert_relative_eq!(axes.scales().x.apply(v), base.x.apply(v), epsilon = 1e-9);
        }
        for v in [-1.0, 0.3, 1.0] {
            assert_relative_eq!(axes.scales().y.apply(v), base.y.apply(v), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_last_writer_wins() {
        let mut axes = axes_with_line_and_grid();
        axes.on_zoom(ZoomTransform::new(100.0, 0.0, 3.0).unwrap()).unwrap();
        let second = ZoomTransform::new(0.0, 0.0, 2.0).unwrap();
        axes.on_zoom(second).unwrap();
        assert_eq!(axes.zoom(), &second);
        assert_relative_eq!(axes.scales().x.domain.0, 0.0);
        assert_relative_eq!(axes.scales().x.domain.1, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zoom_moves_line_geometry_only() {
        let mut axes = axes_with_line_and_grid();
        let style_before = axes.style_sheet();
        let update = axes.on_zoom(ZoomTransform::new(10.0, 0.0, 1.0).unwrap()).unwrap();
        match &update.elements[0].instructions[0] {
            Instruction::Path { points, .. } => {
                assert_relative_eq!(points[0].0, 10.0, epsilon = 1e-9)
            }
            other => panic!("Expected Path, got {:?}", other),
        }
        assert_eq!(axes.style_sheet(), style_before);
    }
}
