use crate::error::{AxisKind, SceneError, SceneResult};
use crate::zoom::ZoomTransform;
use serde::Serialize;

/// Linear mapping from a data domain to a pixel range.
///
/// Endpoints are exact: `apply(d0) == r0` and `apply(d1) == r1` regardless of
/// rounding in between, and `invert` is exact the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scale {
    pub axis: AxisKind,
    pub domain: (f64, f64), // Data min/max
    pub range: (f64, f64),  // Pixel start/end (may be descending)
}

impl Scale {
    pub fn new(axis: AxisKind, domain: (f64, f64), range: (f64, f64)) -> SceneResult<Self> {
        for (what, v) in [
            ("domain", domain.0),
            ("domain", domain.1),
            ("range", range.0),
            ("range", range.1),
        ] {
            if !v.is_finite() {
                return Err(SceneError::NonFiniteScale { what, value: v });
            }
        }
        if domain.0 == domain.1 {
            return Err(SceneError::DegenerateDomain {
                axis,
                value: domain.0,
            });
        }
        Ok(Scale {
            axis,
            domain,
            range,
        })
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if value == d0 {
            r0
        } else if value == d1 {
            r1
        } else {
            r0 + (value - d0) / (d1 - d0) * (r1 - r0)
        }
    }

    /// Pixel back to data value. A zero-width range has no inverse; every
    /// pixel maps to `d0` in that case.
    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if pixel == r0 || r0 == r1 {
            d0
        } else if pixel == r1 {
            d1
        } else {
            d0 + (pixel - r0) / (r1 - r0) * (d1 - d0)
        }
    }

    /// Effective scale under a zoom transform.
    ///
    /// The transform acts in pixel space, so the implied domain is recovered
    /// by pulling both range endpoints back through the transform and then
    /// through this scale. The range is unchanged.
    pub fn transformed(&self, zoom: &ZoomTransform) -> SceneResult<Scale> {
        let (r0, r1) = self.range;
        let d0 = self.invert(zoom.invert_along(self.axis, r0));
        let d1 = self.invert(zoom.invert_along(self.axis, r1));
        Scale::new(self.axis, (d0, d1), self.range)
    }

    /// Tick spacing for roughly `count` ticks: 1, 2 or 5 times a power of ten
    pub fn tick_step(&self, count: usize) -> Option<f64> {
        if count == 0 {
            return None;
        }
        let (lo, hi) = self.extent();
        let span = hi - lo;
        let mut step = 10f64.powf((span / count as f64).log10().floor());
        let err = count as f64 / span * step;

        if err <= 0.15 {
            step *= 10.0;
        } else if err <= 0.35 {
            step *= 5.0;
        } else if err <= 0.75 {
            step *= 2.0;
        }
        (step.is_finite() && step > 0.0).then_some(step)
    }

    /// Tick values inside the domain, ascending
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let Some(step) = self.tick_step(count) else {
            return Vec::new();
        };
        let (lo, hi) = self.extent();
        // Slack absorbs rounding in lo/step and hi/step
        let first = (lo / step - 1e-9).ceil() as i64;
        let last = (hi / step + 1e-9).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }

    /// Format a tick value with the precision implied by the tick step
    pub fn tick_label(&self, value: f64, count: usize) -> String {
        let precision = self
            .tick_step(count)
            .map(|step| (-(step.log10() + 0.01).floor()).max(0.0) as usize)
            .unwrap_or(0);
        let label = format!("{:.*}", precision, value);
        // Avoid "-0" / "-0.0" labels from values that round to zero
        if label.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
            label.trim_start_matches('-').to_string()
        } else {
            label
        }
    }

    fn extent(&self) -> (f64, f64) {
        let (d0, d1) = self.domain;
        if d0 < d1 {
            (d0, d1)
        } else {
            (d1, d0)
        }
    }
}
