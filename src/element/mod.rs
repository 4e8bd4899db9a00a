//! Renderable elements
//!
//! The closed set of things an axes can draw. Every variant implements the
//! three-step [`Renderable`] contract:
//!
//! - `style_sheet`: static style, computed once at construction
//! - `initial`: the full draw, called once at export
//! - `update`: geometry only, called once per zoom/pan event

pub mod grid;
pub mod line;
pub mod text;

pub use grid::GridElement;
pub use line::LineElement;
pub use text::{TextElement, TextRole};

use crate::axes::AxesScales;
use crate::ir::{DrawSpec, ElementId, StyleSpec, UpdateSpec};

pub trait Renderable {
    fn id(&self) -> &ElementId;
    fn style_sheet(&self) -> &StyleSpec;
    fn initial(&self, scales: &AxesScales) -> DrawSpec;
    fn update(&self, scales: &AxesScales) -> UpdateSpec;
}

#[derive(Debug, Clone)]
pub enum RenderElement {
    Line(LineElement),
    Grid(GridElement),
    Text(TextElement),
}

impl RenderElement {
    fn inner(&self) -> &dyn Renderable {
        match self {
            RenderElement::Line(e) => e,
            RenderElement::Grid(e) => e,
            RenderElement::Text(e) => e,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RenderElement::Line(_) => "line",
            RenderElement::Grid(_) => "grid",
            RenderElement::Text(_) => "text",
        }
    }
}

impl Renderable for RenderElement {
    fn id(&self) -> &ElementId {
        self.inner().id()
    }

    fn style_sheet(&self) -> &StyleSpec {
        self.inner().style_sheet()
    }

    fn initial(&self, scales: &AxesScales) -> DrawSpec {
        self.inner().initial(scales)
    }

    fn update(&self, scales: &AxesScales) -> UpdateSpec {
        self.inner().update(scales)
    }
}
