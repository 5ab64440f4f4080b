//! Easing curves for fades.
//!
//! An easing curve maps linear progress in `[0, 1]` onto eased progress,
//! also in `[0, 1]`, with `0 -> 0` and `1 -> 1`.

/// Available easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// No easing.
    Linear,
    /// Quadratic, starts slow.
    EaseIn,
    /// Quadratic, ends slow.
    EaseOut,
    /// Quadratic, slow at both ends.
    #[default]
    EaseInOut,
    /// Cubic, ends slow.
    EaseOutCubic,
    /// Hermite smoothstep `3t² − 2t³`.
    Smoothstep,
}

impl Easing {
    /// Apply the curve to `t`, clamped to `[0, 1]` first.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Interpolate from `start` to `end` along an easing curve.
///
/// ```
/// use horizon_panels_core::animation::{lerp_eased, Easing};
///
/// assert_eq!(lerp_eased(Easing::Linear, 0.0, 4.0, 0.25), 1.0);
/// assert!(lerp_eased(Easing::EaseIn, 0.0, 1.0, 0.5) < 0.5);
/// ```
#[inline]
pub fn lerp_eased(easing: Easing, start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * easing.apply(t)
}
