use crate::error::{AxisKind, SceneError, SceneResult};
use serde::{Deserialize, Serialize};

/// Current pan/zoom state of one axes: pixel `p` is shown at `k * p + t`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawZoom")]
pub struct ZoomTransform {
    translate: (f64, f64),
    scale: f64,
}

#[derive(Deserialize)]
struct RawZoom {
    translate: (f64, f64),
    scale: f64,
}

impl TryFrom<RawZoom> for ZoomTransform {
    type Error = SceneError;

    fn try_from(raw: RawZoom) -> SceneResult<Self> {
        ZoomTransform::new(raw.translate.0, raw.translate.1, raw.scale)
    }
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ZoomTransform {
    pub fn new(tx: f64, ty: f64, k: f64) -> SceneResult<Self> {
        let invalid = |reason| SceneError::InvalidZoom { tx, ty, k, reason };
        if !(tx.is_finite() && ty.is_finite() && k.is_finite()) {
            return Err(invalid("components must be finite"));
        }
        if k <= 0.0 || !(1.0 / k).is_finite() {
            return Err(invalid("scale factor must be positive and invertible"));
        }
        Ok(ZoomTransform {
            translate: (tx, ty),
            scale: k,
        })
    }

    pub fn identity() -> Self {
        ZoomTransform {
            translate: (0.0, 0.0),
            scale: 1.0,
        }
    }

    pub fn translate(&self) -> (f64, f64) {
        self.translate
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    fn offset(&self, axis: AxisKind) -> f64 {
        match axis {
            AxisKind::X => self.translate.0,
            AxisKind::Y => self.translate.1,
        }
    }

    pub fn apply_along(&self, axis: AxisKind, pixel: f64) -> f64 {
        self.scale * pixel + self.offset(axis)
    }

    pub fn invert_along(&self, axis: AxisKind, pixel: f64) -> f64 {
        (pixel - self.offset(axis)) / self.scale
    }

    pub fn inverse(&self) -> SceneResult<Self> {
        let k = self.scale;
        ZoomTransform::new(-self.translate.0 / k, -self.translate.1 / k, 1.0 / k)
    }

    /// `self` followed by `next`
    pub fn then(&self, next: &ZoomTransform) -> SceneResult<Self> {
        let k = next.scale;
        ZoomTransform::new(
            k * self.translate.0 + next.translate.0,
            k * self.translate.1 + next.translate.1,
            self.scale * k,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::Scale;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_bad_components() {
        assert!(ZoomTransform::new(0.0, 0.0, 0.0).is_err());
        assert!(ZoomTransform::new(0.0, 0.0, -2.0).is_err());
        assert!(ZoomTransform::new(f64::NAN, 0.0, 1.0).is_err());
        assert!(ZoomTransform::new(0.0, 0.0, 1e-320).is_err());
    }

    #[test]
    fn test_then_inverse_is_identity() {
        let t = ZoomTransform::new(37.5, -12.25, 2.5).unwrap();
        let round = t.then(&t.inverse().unwrap()).unwrap();
        assert_relative_eq!(round.scale(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(round.translate().0, 0.0, epsilon = 1e-9);
        assert_relative_eq!(round.translate().1, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_apply_then_invert() {
        let t = ZoomTransform::new(10.0, 20.0, 4.0).unwrap();
        assert_eq!(t.apply_along(AxisKind::X, 5.0), 30.0);
        assert_eq!(t.apply_along(AxisKind::Y, 5.0), 40.0);
        assert_eq!(t.invert_along(AxisKind::Y, 40.0), 5.0);
    }

    #[test]
    fn test_transformed_scale_matches_pixel_composition() {
        let base = Scale::new(AxisKind::X, (0.0, 10.0), (0.0, 400.0)).unwrap();
        let t = ZoomTransform::new(-100.0, 0.0, 2.0).unwrap();
        let zoomed = base.transformed(&t).unwrap();
        for v in [0.0, 1.0, 2.5, 7.0, 10.0] {
            assert_relative_eq!(
                zoomed.apply(v),
                t.apply_along(AxisKind::X, base.apply(v)),
                epsilon = 1e-9
            );
        }
        assert_relative_eq!(zoomed.domain.0, 1.25, epsilon = 1e-12);
        assert_relative_eq!(zoomed.domain.1, 6.25, epsilon = 1e-12);
    }

    #[test]
    fn test_inverse_restores_scale_outputs() {
        let base = Scale::new(AxisKind::Y, (-5.0, 5.0), (300.0, 0.0)).unwrap();
        let t = ZoomTransform::new(13.0, -47.0, 3.7).unwrap();
        let restored = base
            .transformed(&t.then(&t.inverse().unwrap()).unwrap())
            .unwrap();
        for v in [-5.0, -1.3, 0.0, 4.9] {
            assert_relative_eq!(
                restored.apply(v),
                base.apply(v),
                max_relative = 1e-9,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: ZoomTransform =
            serde_json::from_str(r#"{"translate": [1.0, 2.0], "scale": 2.0}"#).unwrap();
        assert_eq!(ok.translate(), (1.0, 2.0));
        let zero_scale = r#"{"translate": [0, 0], "scale": 0}"#;
        assert!(serde_json::from_str::<ZoomTransform>(zero_scale).is_err());
    }
}
