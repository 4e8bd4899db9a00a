use crate::axes::{Axes, ZoomUpdate};
use crate::element::Renderable;
use crate::error::{SceneError, SceneResult};
use crate::ir::{AxesId, FigureId};
use crate::zoom::ZoomTransform;
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_ID_PREFIX: &str = "fig";

/// Issues figure ids.
///
/// Ids are `{prefix}{n}` with `n` counting up from 1. The cursor only moves
/// forward, so an id is never handed out twice by the same issuer; share
/// one issuer (by reference, across threads if needed) for every figure
/// that may end up in the same document.
#[derive(Debug)]
pub struct IdIssuer {
    prefix: String,
    next: AtomicU64,
}

impl IdIssuer {
    pub fn new() -> Self {
        IdIssuer {
            prefix: DEFAULT_ID_PREFIX.to_string(),
            next: AtomicU64::new(1),
        }
    }

    /// Issuer with a custom prefix. Bundles produced by separate processes
    /// need distinct prefixes to be combined safely.
    pub fn with_prefix(prefix: &str) -> SceneResult<Self> {
        validate_prefix(prefix)?;
        Ok(IdIssuer {
            prefix: prefix.to_string(),
            next: AtomicU64::new(1),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn issue(&self) -> SceneResult<FigureId> {
        let n = self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
            .map_err(|_| SceneError::IdSpaceExhausted(self.prefix.clone()))?;
        Ok(FigureId(format!("{}{}", self.prefix, n)))
    }
}

impl Default for IdIssuer {
    fn default() -> Self {
        Self::new()
    }
}

/// Prefixes must start with a letter and stay alphanumeric, so that every
/// derived id is a valid CSS class fragment and script identifier and the
/// `_` separator of axes and element ids stays unambiguous.
pub fn validate_prefix(prefix: &str) -> SceneResult<()> {
    let mut chars = prefix.chars();
    let starts_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    if !starts_ok || !chars.all(|c| c.is_ascii_alphanumeric()) {
        return Err(SceneError::InvalidIdPrefix(prefix.to_string()));
    }
    Ok(())
}

/// Root of the scene graph
#[derive(Debug, Clone)]
pub struct Figure {
    pub(crate) id: FigureId,
    /// Inches
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) dpi: f64,
    pub(crate) axes: Vec<Axes>,
}

impl Figure {
    pub fn id(&self) -> &FigureId {
        &self.id
    }

    pub fn size_inches(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    pub fn size_px(&self) -> (f64, f64) {
        (self.width * self.dpi, self.height * self.dpi)
    }

    pub fn axes(&self) -> &[Axes] {
        &self.axes
    }

    /// Axes are independent of each other, so each may be driven from its
    /// own thread through this slice.
    pub fn axes_mut(&mut self) -> &mut [Axes] {
        &mut self.axes
    }
}

/// A built figure tree: Figure -> Axes -> RenderElement
#[derive(Debug, Clone)]
pub struct SceneGraph {
    figure: Figure,
}

impl SceneGraph {
    pub(crate) fn new(figure: Figure) -> Self {
        SceneGraph { figure }
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn figure_id(&self) -> &FigureId {
        &self.figure.id
    }

    pub fn axes(&self) -> &[Axes] {
        &self.figure.axes
    }

    pub fn axes_mut(&mut self) -> &mut [Axes] {
        self.figure.axes_mut()
    }

    pub fn find_axes(&self, axes_id: &str) -> Option<&Axes> {
        self.figure.axes.iter().find(|a| a.id().as_str() == axes_id)
    }

    pub fn element_count(&self) -> usize {
        self.figure.axes.iter().map(|a| a.elements().len()).sum()
    }

    /// Every generated id in the tree, figure first, in traversal order
    pub fn ids(&self) -> Vec<String> {
        let mut ids = vec![self.figure.id.to_string()];
        for axes in &self.figure.axes {
            ids.push(axes.id().to_string());
            ids.extend(axes.elements().iter().map(|e| e.id().to_string()));
        }
        ids
    }

    /// Route a host gesture to the one axes it belongs to
    pub fn dispatch_zoom(
        &mut self,
        axes_id: &str,
        transform: ZoomTransform,
    ) -> SceneResult<ZoomUpdate> {
        let axes = self
            .figure
            .axes
            .iter_mut()
            .find(|a| a.id().as_str() == axes_id)
            .ok_or_else(|| SceneError::UnknownAxes(axes_id.to_string()))?;
        axes.on_zoom(transform)
    }

    pub fn dispatch_zoom_to(
        &mut self,
        axes_id: &AxesId,
        transform: ZoomTransform,
    ) -> SceneResult<ZoomUpdate> {
        self.dispatch_zoom(axes_id.as_str(), transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_issue_is_monotonic() {
        let issuer = IdIssuer::new();
        assert_eq!(issuer.issue().unwrap().as_str(), "fig1");
        assert_eq!(issuer.issue().unwrap().as_str(), "fig2");
        assert_eq!(issuer.issue().unwrap().as_str(), "fig3");
    }

    #[test]
    fn test_prefix_validation() {
        assert!(IdIssuer::with_prefix("plotA").is_ok());
        for bad in ["", "1fig", "my-fig", "fig_", "f ig"] {
            assert_eq!(
                IdIssuer::with_prefix(bad).unwrap_err(),
                SceneError::InvalidIdPrefix(bad.to_string())
            );
        }
    }

    #[test]
    fn test_exhaustion_is_an_error() {
        let issuer = IdIssuer {
            prefix: "fig".to_string(),
            next: AtomicU64::new(u64::MAX),
        };
        assert!(matches!(issuer.issue(), Err(SceneError::IdSpaceExhausted(_))));
        // Still exhausted; the cursor never wraps
        assert!(issuer.issue().is_err());
    }

    #[test]
    fn test_concurrent_issue_is_collision_free() {
        let issuer = Arc::new(IdIssuer::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let issuer = Arc::clone(&issuer);
                thread::spawn(move || (0..250).map(|_| issuer.issue().unwrap()).collect::<Vec<_>>())
            })
            .collect();
        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen.len(), 1000);
    }
}
