use crate::error::AxisKind;
use crate::style::MarkerGlyph;
use serde::Serialize;
use std::fmt;

// =============================================================================
// Identifiers
// =============================================================================

/// Process-unique figure id, issued by `figure::IdIssuer`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FigureId(pub(crate) String);

/// `{figure}_{index}`, 1-based within the figure
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AxesId(String);

/// `{axes}_{index}`, 1-based within the axes, in element order
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl AxesId {
    pub fn new(figure: &FigureId, index: usize) -> Self {
        AxesId(format!("{}_{}", figure.0, index))
    }
}

impl ElementId {
    pub fn new(axes: &AxesId, index: usize) -> Self {
        ElementId(format!("{}_{}", axes.0, index))
    }
}

macro_rules! id_common {
    ($($t:ty),*) => {$(
        impl $t {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    )*};
}

id_common!(FigureId, AxesId, ElementId);

// =============================================================================
// Style sheet
// =============================================================================

/// What a style rule applies to; the serializer turns this into a selector
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum StyleTarget {
    /// Axis spine and tick marks
    AxisLines { axes_id: AxesId },
    /// Axis tick labels
    AxisText { axes_id: AxesId },
    GridTicks { axes_id: AxesId, axis: AxisKind },
    /// The grid's own domain path, which is hidden
    GridDomain { axes_id: AxesId, axis: AxisKind },
    LinePath { element_id: ElementId },
    LineMarkers { element_id: ElementId },
    Text { element_id: ElementId },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    pub property: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleRule {
    pub target: StyleTarget,
    pub declarations: Vec<Declaration>,
}

impl StyleRule {
    pub fn new(target: StyleTarget) -> Self {
        StyleRule {
            target,
            declarations: Vec::new(),
        }
    }

    pub fn with(mut self, property: &'static str, value: impl fmt::Display) -> Self {
        self.declarations.push(Declaration {
            property,
            value: value.to_string(),
        });
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|d| d.property == property)
            .map(|d| d.value.as_str())
    }
}

/// Style rules owned by one element, computed once at construction
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyleSpec {
    pub rules: Vec<StyleRule>,
}

// =============================================================================
// Draw / update instructions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub value: f64,
    /// Pixel offset along the axis, relative to the axes origin
    pub position: f64,
    pub label: String,
}

/// A primitive drawing step. Pixel coordinates are relative to the axes
/// origin (top-left) unless stated otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// Axes group, background rectangle and clip region, in figure pixels
    Frame {
        axes_id: AxesId,
        origin: (f64, f64),
        size: (f64, f64),
        background: String,
    },
    /// Axis line with ticks and labels
    Axis {
        axes_id: AxesId,
        axis: AxisKind,
        ticks: Vec<Tick>,
    },
    /// Raw data points an element keeps for host-side recomputation
    Data {
        element_id: ElementId,
        points: Vec<(f64, f64)>,
    },
    /// Stroked polyline
    Path {
        element_id: ElementId,
        axes_id: AxesId,
        points: Vec<(f64, f64)>,
    },
    /// One glyph per position
    Markers {
        element_id: ElementId,
        axes_id: AxesId,
        glyph: MarkerGlyph,
        size: f64,
        positions: Vec<(f64, f64)>,
    },
    /// Major gridlines across the axes, one per tick position
    GridLines {
        element_id: ElementId,
        axes_id: AxesId,
        axis: AxisKind,
        positions: Vec<f64>,
        length: f64,
    },
    /// Figure-anchored text; position in figure pixels from the top-left,
    /// rotation in degrees clockwise about that position
    Text {
        element_id: ElementId,
        content: String,
        position: (f64, f64),
        rotation: f64,
    },
}

impl Instruction {
    pub fn op(&self) -> &'static str {
        match self {
            Instruction::Frame { .. } => "frame",
            Instruction::Axis { .. } => "axis",
            Instruction::Data { .. } => "data",
            Instruction::Path { .. } => "path",
            Instruction::Markers { .. } => "markers",
            Instruction::GridLines { .. } => "grid_lines",
            Instruction::Text { .. } => "text",
        }
    }
}

/// Full draw of one element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawSpec {
    pub element_id: ElementId,
    pub instructions: Vec<Instruction>,
}

/// Geometry-only redraw of one element after a zoom/pan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateSpec {
    pub element_id: ElementId,
    pub instructions: Vec<Instruction>,
}

impl DrawSpec {
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl UpdateSpec {
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
