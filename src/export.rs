use crate::axes::AxesScales;
use crate::figure::SceneGraph;
use crate::ir::{AxesId, FigureId, Instruction, StyleRule};
use crate::zoom::ZoomTransform;
use crate::ExportOptions;
use serde::Serialize;

/// Update chain for one axes, run by the host on every zoom/pan of it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxesHandler {
    pub axes_id: AxesId,
    /// Scales before any zoom; the host zoom behaviour is relative to these
    pub base_scales: AxesScales,
    /// Zoom state at export; `init` and `instructions` are drawn at it
    pub transform: ZoomTransform,
    /// `base_scales` under `transform`
    pub scales: AxesScales,
    /// Axis redraws first, then element geometry, in element order
    pub instructions: Vec<Instruction>,
}

/// Everything a host needs to mount and drive one figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bundle {
    pub figure_id: FigureId,
    pub width_px: f64,
    pub height_px: f64,
    pub d3_url: String,
    /// Every rule in scene traversal order
    pub style: Vec<StyleRule>,
    /// Initial draw in scene traversal order
    pub init: Vec<Instruction>,
    /// One handler per axes, in axes order
    pub update: Vec<AxesHandler>,
}

impl Bundle {
    pub fn handler(&self, axes_id: &str) -> Option<&AxesHandler> {
        self.update.iter().find(|h| h.axes_id.as_str() == axes_id)
    }
}

pub struct Exporter {
    d3_url: String,
}

impl Exporter {
    pub fn new(options: &ExportOptions) -> Self {
        Exporter {
            d3_url: options.d3_url.clone(),
        }
    }

    /// Walk the scene once, axes in order and elements in order within each
    pub fn export(&self, scene: &SceneGraph) -> Bundle {
        let (width_px, height_px) = scene.figure().size_px();
        let mut style = Vec::new();
        let mut init = Vec::new();
        let mut update = Vec::with_capacity(scene.axes().len());

        for axes in scene.axes() {
            style.extend(axes.style_sheet());
            init.extend(axes.initial().instructions().cloned());
            update.push(AxesHandler {
                axes_id: axes.id().clone(),
                base_scales: *axes.base_scales(),
                transform: *axes.zoom(),
                scales: *axes.scales(),
                instructions: axes.refresh().instructions().cloned().collect(),
            });
        }

        log::debug!(
            "exported {}: {} rules, {} init instructions, {} handlers",
            scene.figure_id(),
            style.len(),
            init.len(),
            update.len()
        );

        Bundle {
            figure_id: scene.figure_id().clone(),
            width_px,
            height_px,
            d3_url: self.d3_url.clone(),
            style,
            init,
            update,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_scene;
    use crate::figure::IdIssuer;
    use crate::model::PlotModel;

    const TWO_AXES: &str = r#"{
        "width": 6, "height": 4, "dpi": 100,
        "axes": [
            { "bounds": [0.1, 0.55, 0.8, 0.4], "xlim": [0, 10], "ylim": [0, 5],
              "lines": [{ "points": [[0, 0], [10, 5]], "linestyle": "-" }],
              "y_grid": { "enabled": true } },
            { "bounds": [0.1, 0.05, 0.8, 0.4], "xlim": [-1, 1], "ylim": [-1, 1],
              "title": { "text": "lower", "position": [300, 180] } }
        ]
    }"#;

    fn bundle() -> Bundle {
        let model = PlotModel::from_json(TWO_AXES).unwrap();
        let options = ExportOptions::default();
        let out = build_scene(&model, &IdIssuer::new(), &options).unwrap();
        Exporter::new(&options).export(&out.scene)
    }

    #[test]
    fn test_bundle_dimensions_and_handlers() {
        let b = bundle();
        assert_eq!((b.width_px, b.height_px), (600.0, 400.0));
        assert_eq!(b.update.len(), 2);
        assert!(b.handler("fig1_2").is_some());
        assert!(b.handler("fig1_3").is_none());
    }

    #[test]
    fn test_init_follows_traversal_order() {
        let b = bundle();
        let frames: Vec<&AxesId> = b
            .init
            .iter()
            .filter_map(|i| match i {
                Instruction::Frame { axes_id, .. } => Some(axes_id),
                _ => None,
            })
            .collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].as_str(), "fig1_1");
        assert_eq!(frames[1].as_str(), "fig1_2");

        let ops: Vec<&str> = b.init.iter().map(|i| i.op()).collect();
        assert_eq!(
            ops,
            vec![
                "frame", "axis", "axis", "data", "path", "grid_lines", // first axes
                "frame", "axis", "axis", "text",
            ]
        );
    }

    #[test]
    fn test_handlers_only_touch_their_axes() {
        let b = bundle();
        for handler in &b.update {
            for instruction in &handler.instructions {
                let owner = match instruction {
                    Instruction::Axis { axes_id, .. }
                    | Instruction::Path { axes_id, .. }
                    | Instruction::Markers { axes_id, .. }
                    | Instruction::GridLines { axes_id, .. } => axes_id,
                    other => panic!("unexpected update instruction {:?}", other),
                };
                assert_eq!(owner, &handler.axes_id);
            }
        }
        // Second axes has only text, so its handler is just the two axes
        assert_eq!(b.update[1].instructions.len(), 2);
    }

    #[test]
    fn test_export_after_zoom_carries_zoom_state() {
        let model = PlotModel::from_json(TWO_AXES).unwrap();
        let options = ExportOptions::default();
        let mut out = build_scene(&model, &IdIssuer::new(), &options).unwrap();
        let t = ZoomTransform::new(-40.0, 10.0, 2.0).unwrap();
        out.scene.dispatch_zoom("fig1_1", t).unwrap();

        let b = Exporter::new(&options).export(&out.scene);
        let zoomed = &b.update[0];
        assert_eq!(zoomed.transform, t);
        assert_eq!(zoomed.scales, *out.scene.axes()[0].scales());
        assert_ne!(zoomed.scales.x.domain, zoomed.base_scales.x.domain);
        assert!(b.update[1].transform.is_identity());

        // Initial path and handler path agree on the zoomed geometry
        let path = |instructions: &[Instruction]| {
            instructions.iter().find_map(|i| match i {
                Instruction::Path { points, .. } => Some(points.clone()),
                _ => None,
            })
        };
        assert_eq!(path(&b.init), path(&zoomed.instructions));
    }
}
