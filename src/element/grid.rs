use super::Renderable;
use crate::axes::AxesScales;
use crate::builder::Diagnostic;
use crate::color::hex_or;
use crate::error::AxisKind;
use crate::ir::{
    AxesId, DrawSpec, ElementId, Instruction, StyleRule, StyleSpec, StyleTarget, UpdateSpec,
};
use crate::model::GridAxisModel;
use crate::style::{enabled_token, parse_dash, DashArray};

const DEFAULT_GRID_COLOR: &str = "#b0b0b0";

/// Major gridlines for both axes of one axes.
///
/// Style is taken from the first gridline of each axis and applied to every
/// gridline on that axis.
#[derive(Debug, Clone)]
pub struct GridElement {
    id: ElementId,
    axes_id: AxesId,
    x_enabled: bool,
    y_enabled: bool,
    style: StyleSpec,
}

impl GridElement {
    pub fn new(
        id: ElementId,
        axes_id: AxesId,
        x: &GridAxisModel,
        y: &GridAxisModel,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Self {
        let mut rules = Vec::new();
        for (axis, model) in [(AxisKind::X, x), (AxisKind::Y, y)] {
            if model.enabled {
                rules.extend(axis_rules(&id, &axes_id, axis, model, diagnostics));
            }
        }
        GridElement {
            id,
            axes_id,
            x_enabled: x.enabled,
            y_enabled: y.enabled,
            style: StyleSpec { rules },
        }
    }

    pub fn x_enabled(&self) -> bool {
        self.x_enabled
    }

    pub fn y_enabled(&self) -> bool {
        self.y_enabled
    }

    fn lines(&self, scales: &AxesScales) -> Vec<Instruction> {
        let mut out = Vec::new();
        if self.x_enabled {
            out.push(self.axis_lines(AxisKind::X, scales));
        }
        if self.y_enabled {
            out.push(self.axis_lines(AxisKind::Y, scales));
        }
        out
    }

    fn axis_lines(&self, axis: AxisKind, scales: &AxesScales) -> Instruction {
        let (scale, length) = match axis {
            AxisKind::X => (&scales.x, scales.height()),
            AxisKind::Y => (&scales.y, scales.width()),
        };
        Instruction::GridLines {
            element_id: self.id.clone(),
            axes_id: self.axes_id.clone(),
            axis,
            positions: scale
                .ticks(scales.tick_count)
                .into_iter()
                .map(|t| scale.apply(t))
                .collect(),
            length,
        }
    }
}

fn axis_rules(
    id: &ElementId,
    axes_id: &AxesId,
    axis: AxisKind,
    model: &GridAxisModel,
    diagnostics: &mut Vec<Diagnostic>,
) -> [StyleRule; 2] {
    let mut fallback = |attribute: &'static str, value: &str| {
        log::warn!("grid {} ({} axis): unresolved {}, using {}", id, axis, attribute, value);
        diagnostics.push(Diagnostic::StyleFallback {
            id: id.to_string(),
            attribute,
            fallback: value.to_string(),
        });
    };

    let line = model.gridline.as_ref();
    let color_value = line.and_then(|l| l.color.as_ref());
    let color = hex_or(color_value, DEFAULT_GRID_COLOR).unwrap_or_else(|fb| {
        if color_value.is_some() {
            fallback("color", &fb);
        }
        fb
    });
    let dash = match enabled_token(line.and_then(|l| l.linestyle.as_deref())) {
        None => DashArray::solid(),
        Some(ls) => parse_dash(ls).unwrap_or_else(|| {
            fallback("linestyle", "solid");
            DashArray::solid()
        }),
    };
    let alpha = line.and_then(|l| l.alpha).unwrap_or(1.0);

    [
        StyleRule::new(StyleTarget::GridTicks {
            axes_id: axes_id.clone(),
            axis,
        })
        .with("stroke", color)
        .with("stroke-dasharray", dash.css())
        .with("stroke-opacity", alpha),
        StyleRule::new(StyleTarget::GridDomain {
            axes_id: axes_id.clone(),
            axis,
        })
        .with("stroke-width", 0),
    ]
}

impl Renderable for GridElement {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn style_sheet(&self) -> &StyleSpec {
        &self.style
    }

    fn initial(&self, scales: &AxesScales) -> DrawSpec {
        DrawSpec {
            element_id: self.id.clone(),
            instructions: self.lines(scales),
        }
    }

    fn update(&self, scales: &AxesScales) -> UpdateSpec {
        UpdateSpec {
            element_id: self.id.clone(),
            instructions: self.lines(scales),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorValue;
    use crate::ir::FigureId;
    use crate::model::GridlineModel;
    use crate::scale::Scale;
    use approx::assert_relative_eq;

    fn scales() -> AxesScales {
        AxesScales {
            x: Scale::new(AxisKind::X, (0.0, 1.0), (0.0, 200.0)).unwrap(),
            y: Scale::new(AxisKind::Y, (0.0, 10.0), (100.0, 0.0)).unwrap(),
            tick_count: 10,
        }
    }

    fn grid(x: GridAxisModel, y: GridAxisModel) -> (GridElement, Vec<Diagnostic>) {
        let axes = AxesId::new(&FigureId("fig1".to_string()), 1);
        let mut diags = Vec::new();
        let g = GridElement::new(ElementId::new(&axes, 1), axes, &x, &y, &mut diags);
        (g, diags)
    }

    #[test]
    fn test_y_only_grid() {
        let (g, diags) = grid(
            GridAxisModel::default(),
            GridAxisModel {
                enabled: true,
                gridline: None,
            },
        );
        assert!(diags.is_empty());
        let draw = g.initial(&scales());
        assert_eq!(draw.instructions.len(), 1);
        match &draw.instructions[0] {
            Instruction::GridLines { axis, positions, length, .. } => {
                assert_eq!(*axis, AxisKind::Y);
                assert_eq!(positions.len(), 11);
                assert_eq!(positions[0], 100.0);
                assert_eq!(*length, 200.0);
            }
            other => panic!("Expected GridLines, got {:?}", other),
        }
        assert!(g.style_sheet().rules.iter().all(|r| matches!(
            r.target,
            StyleTarget::GridTicks { axis: AxisKind::Y, .. }
                | StyleTarget::GridDomain { axis: AxisKind::Y, .. }
        )));
        assert_eq!(g.style_sheet().rules[0].get("stroke"), Some(DEFAULT_GRID_COLOR));
    }

    #[test]
    fn test_disabled_grid_draws_nothing() {
        let (g, _) = grid(GridAxisModel::default(), GridAxisModel::default());
        assert!(g.initial(&scales()).is_empty());
        assert!(g.update(&scales()).is_empty());
        assert!(g.style_sheet().rules.is_empty());
    }

    #[test]
    fn test_representative_style() {
        let styled = GridAxisModel {
            enabled: true,
            gridline: Some(GridlineModel {
                color: Some(ColorValue::Named("#cccccc".to_string())),
                alpha: Some(0.5),
                linestyle: Some(":".to_string()),
            }),
        };
        let (g, _) = grid(styled, GridAxisModel::default());
        let ticks = &g.style_sheet().rules[0];
        assert_eq!(ticks.get("stroke"), Some("#cccccc"));
        assert_eq!(ticks.get("stroke-dasharray"), Some("2,2"));
        assert_eq!(ticks.get("stroke-opacity"), Some("0.5"));
    }

    #[test]
    fn test_update_tracks_new_scale() {
        let (g, _) = grid(
            GridAxisModel {
                enabled: true,
                gridline: None,
            },
            GridAxisModel::default(),
        );
        let mut zoomed = scales();
        zoomed.x = Scale::new(AxisKind::X, (0.0, 0.5), (0.0, 200.0)).unwrap();
        let update = g.update(&zoomed);
        match &update.instructions[0] {
            Instruction::GridLines { positions, .. } => {
                // 0.05 steps over half the domain
                assert_eq!(positions.len(), 11);
                assert_relative_eq!(positions[10], 200.0, epsilon = 1e-9);
            }
            other => panic!("Expected GridLines, got {:?}", other),
        }
    }
}
