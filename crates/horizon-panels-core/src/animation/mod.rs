//! Animation support for Horizon Panels.
//!
//! Fades are explicit [`Tween`]s held by an [`Animator`]. Nothing reschedules
//! itself: the host advances the animator once per frame.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use horizon_panels_core::animation::{Animator, Easing, Tween};
//!
//! let mut animator = Animator::new();
//! animator.start("fade", Tween::new(0.0, 1.0, Duration::from_millis(250), Easing::Linear));
//!
//! let frames = animator.advance(Duration::from_millis(125));
//! assert!((frames[0].value - 0.5).abs() < 1e-6);
//! ```

mod animator;
mod easing;

pub use animator::{AnimationFrame, Animator, Tween};
pub use easing::{lerp_eased, Easing};
