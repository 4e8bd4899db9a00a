use super::Renderable;
use crate::axes::AxesScales;
use crate::builder::Diagnostic;
use crate::color::hex_or;
use crate::ir::{
    DrawSpec, ElementId, Instruction, StyleRule, StyleSpec, StyleTarget, TextAnchor, UpdateSpec,
};
use crate::model::{HorizontalAlign, TextCoordinates, TextModel};

const DEFAULT_TEXT_COLOR: &str = "#000000";

/// Where a text element came from on its axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Annotation,
    XLabel,
    YLabel,
    Title,
}

/// Text pinned to the figure.
///
/// The anchor is computed once, in figure pixels measured from the top-left.
/// Zoom and pan never move it.
#[derive(Debug, Clone)]
pub struct TextElement {
    id: ElementId,
    role: TextRole,
    content: String,
    anchor: (f64, f64),
    rotation: f64,
    style: StyleSpec,
}

impl TextElement {
    pub fn new(
        id: ElementId,
        model: &TextModel,
        role: TextRole,
        figure_height: f64,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Self {
        let (mut x, y) = model.position;

        // Y-axis labels sit against the tick labels; shift right by one em
        if role == TextRole::YLabel {
            x += model.fontsize;
        }

        let mut rules = Vec::new();
        if !model.text.is_empty() {
            if model.coordinates == TextCoordinates::Data {
                log::warn!("text {}: data-anchored text will not follow zoom", id);
                diagnostics.push(Diagnostic::DataAnchoredText {
                    element_id: id.clone(),
                });
            }

            let color = hex_or(model.color.as_ref(), DEFAULT_TEXT_COLOR).unwrap_or_else(|fb| {
                if model.color.is_some() {
                    log::warn!("text {}: unresolved color, using {}", id, fb);
                    diagnostics.push(Diagnostic::StyleFallback {
                        id: id.to_string(),
                        attribute: "color",
                        fallback: fb.clone(),
                    });
                }
                fb
            });
            let anchor = match model.horizontal_alignment {
                HorizontalAlign::Left => TextAnchor::Start,
                HorizontalAlign::Center => TextAnchor::Middle,
                HorizontalAlign::Right => TextAnchor::End,
            };
            rules.push(
                StyleRule::new(StyleTarget::Text {
                    element_id: id.clone(),
                })
                .with("font-size", format!("{}px", model.fontsize))
                .with("fill", color)
                .with("text-anchor", anchor.as_str()),
            );
        }

        TextElement {
            id,
            role,
            content: model.text.clone(),
            anchor: (x, figure_height - y),
            // Source rotation is counter-clockwise with y up; the host's is
            // clockwise with y down
            rotation: -model.rotation,
            style: StyleSpec { rules },
        }
    }

    pub fn role(&self) -> TextRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn anchor(&self) -> (f64, f64) {
        self.anchor
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }
}

impl Renderable for TextElement {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn style_sheet(&self) -> &StyleSpec {
        &self.style
    }

    fn initial(&self, _scales: &AxesScales) -> DrawSpec {
        let instructions = if self.content.is_empty() {
            Vec::new()
        } else {
            vec![Instruction::Text {
                element_id: self.id.clone(),
                content: self.content.clone(),
                position: self.anchor,
                rotation: self.rotation,
            }]
        };
        DrawSpec {
            element_id: self.id.clone(),
            instructions,
        }
    }

    fn update(&self, _scales: &AxesScales) -> UpdateSpec {
        UpdateSpec {
            element_id: self.id.clone(),
            instructions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorValue;
    use crate::error::AxisKind;
    use crate::ir::{AxesId, FigureId};
    use crate::scale::Scale;

    fn scales() -> AxesScales {
        AxesScales {
            x: Scale::new(AxisKind::X, (0.0, 1.0), (0.0, 100.0)).unwrap(),
            y: Scale::new(AxisKind::Y, (0.0, 1.0), (100.0, 0.0)).unwrap(),
            tick_count: 10,
        }
    }

    fn text(model: &TextModel, role: TextRole) -> (TextElement, Vec<Diagnostic>) {
        let axes = AxesId::new(&FigureId("fig1".to_string()), 1);
        let mut diags = Vec::new();
        let t = TextElement::new(ElementId::new(&axes, 1), model, role, 480.0, &mut diags);
        (t, diags)
    }

    fn label(content: &str) -> TextModel {
        TextModel {
            text: content.to_string(),
            position: (100.0, 80.0),
            rotation: 90.0,
            fontsize: 14.0,
            color: Some(ColorValue::Named("k".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_text_draws_nothing() {
        let (t, diags) = text(&TextModel::default(), TextRole::Title);
        assert!(t.initial(&scales()).is_empty());
        assert!(t.style_sheet().rules.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_anchor_flip_and_rotation_sign() {
        let (t, _) = text(&label("Title"), TextRole::Title);
        assert_eq!(t.content(), "Title");
        assert_eq!(t.anchor(), (100.0, 400.0));
        assert_eq!(t.rotation(), -90.0);
        let draw = t.initial(&scales());
        assert_eq!(
            draw.instructions,
            vec![Instruction::Text {
                element_id: t.id().clone(),
                content: "Title".to_string(),
                position: (100.0, 400.0),
                rotation: -90.0,
            }]
        );
    }

    #[test]
    fn test_y_label_offset_only_for_y_label() {
        let (y, _) = text(&label("Y"), TextRole::YLabel);
        let (x, _) = text(&label("X"), TextRole::XLabel);
        let (a, _) = text(&label("A"), TextRole::Annotation);
        assert_eq!(y.anchor().0, 114.0);
        assert_eq!(x.anchor().0, 100.0);
        assert_eq!(a.anchor().0, 100.0);
    }

    #[test]
    fn test_data_anchored_text_is_flagged() {
        let mut model = label("peak");
        model.coordinates = TextCoordinates::Data;
        let (t, diags) = text(&model, TextRole::Annotation);
        assert_eq!(
            diags,
            vec![Diagnostic::DataAnchoredText {
                element_id: t.id().clone()
            }]
        );
        assert!(t.update(&scales()).is_empty());
    }

    #[test]
    fn test_text_style_rule() {
        let mut model = label("right");
        model.horizontal_alignment = HorizontalAlign::Right;
        let (t, _) = text(&model, TextRole::Annotation);
        let rule = &t.style_sheet().rules[0];
        assert_eq!(rule.get("font-size"), Some("14px"));
        assert_eq!(rule.get("fill"), Some("#000000"));
        assert_eq!(rule.get("text-anchor"), Some("end"));
    }
}
