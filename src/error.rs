use thiserror::Error;

/// Which coordinate axis a scale or transform refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    X,
    Y,
}

impl std::fmt::Display for AxisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AxisKind::X => write!(f, "x"),
            AxisKind::Y => write!(f, "y"),
        }
    }
}

/// Errors raised while building or driving a scene graph
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    /// A scale was requested over an empty domain (`d0 == d1`)
    #[error("degenerate {axis} domain: both ends are {value}")]
    DegenerateDomain { axis: AxisKind, value: f64 },

    #[error("inverted {axis} domain: min {min} is above max {max}")]
    InvertedDomain { axis: AxisKind, min: f64, max: f64 },

    #[error("non-finite {what} for scale: {value}")]
    NonFiniteScale { what: &'static str, value: f64 },

    #[error("invalid zoom transform (translate=({tx}, {ty}), scale={k}): {reason}")]
    InvalidZoom {
        tx: f64,
        ty: f64,
        k: f64,
        reason: &'static str,
    },

    #[error("figure id space exhausted for prefix '{0}'")]
    IdSpaceExhausted(String),

    #[error("invalid id prefix '{0}': expected an ASCII letter, then letters or digits")]
    InvalidIdPrefix(String),

    #[error("no axes with id '{0}' in this figure")]
    UnknownAxes(String),

    #[error("invalid plot model: {0}")]
    InvalidModel(String),

    #[error("invalid export options: {0}")]
    InvalidOptions(String),

    #[error("failed to serialize bundle: {0}")]
    Serialization(String),
}

pub type SceneResult<T> = Result<T, SceneError>;
