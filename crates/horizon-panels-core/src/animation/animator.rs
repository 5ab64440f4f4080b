//! A cooperative animation scheduler.
//!
//! The host calls [`Animator::advance`] once per display frame with the
//! elapsed time. Every active tween is stepped, its new value reported, and
//! completed tweens are dropped. Starting a tween for a key that is already
//! animating replaces the old one; tweens never compose.

use std::time::Duration;

use super::easing::{lerp_eased, Easing};
use crate::logging::targets;

/// A single time-bounded interpolation of one scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Tween {
    /// Create a tween that has not advanced yet.
    pub fn new(from: f32, to: f32, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Current eased value.
    pub fn value(&self) -> f32 {
        lerp_eased(self.easing, self.from, self.to, self.progress())
    }

    /// Target value.
    pub fn target(&self) -> f32 {
        self.to
    }

    /// Whether the tween reached its end.
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn step(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }
}

/// One value update produced by [`Animator::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame<K> {
    /// Which animation produced the value.
    pub key: K,
    /// The new value.
    pub value: f32,
    /// Whether the animation completed on this frame.
    pub finished: bool,
}

/// Holds the set of active tweens, keyed by `K`.
///
/// Frames are reported in the order the tweens were started.
#[derive(Debug, Clone)]
pub struct Animator<K> {
    active: Vec<(K, Tween)>,
}

impl<K> Default for Animator<K> {
    fn default() -> Self {
        Self { active: Vec::new() }
    }
}

impl<K: Copy + PartialEq + std::fmt::Debug> Animator<K> {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a tween for `key`, replacing any tween already running for it.
    ///
    /// Returns the replaced tween, if there was one.
    pub fn start(&mut self, key: K, tween: Tween) -> Option<Tween> {
        let replaced = self.cancel(key);
        tracing::trace!(
            target: targets::ANIMATION,
            ?key,
            replaced = replaced.is_some(),
            "tween started"
        );
        self.active.push((key, tween));
        replaced
    }

    /// Stop the tween for `key` without reporting a final frame.
    pub fn cancel(&mut self, key: K) -> Option<Tween> {
        let index = self.active.iter().position(|(k, _)| *k == key)?;
        Some(self.active.remove(index).1)
    }

    /// The tween currently running for `key`.
    pub fn get(&self, key: K) -> Option<&Tween> {
        self.active.iter().find(|(k, _)| *k == key).map(|(_, t)| t)
    }

    /// Whether a tween is running for `key`.
    pub fn is_animating(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// Number of running tweens.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether nothing is animating.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Advance every tween by `dt` and collect their new values.
    ///
    /// Completed tweens are removed before this returns.
    pub fn advance(&mut self, dt: Duration) -> Vec<AnimationFrame<K>> {
        let mut frames = Vec::with_capacity(self.active.len());
        for (key, tween) in &mut self.active {
            tween.step(dt);
            frames.push(AnimationFrame {
                key: *key,
                value: tween.value(),
                finished: tween.is_finished(),
            });
        }
        self.active.retain(|(_, t)| !t.is_finished());
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_tween_linear_progress() {
        let mut t = Tween::new(0.0, 1.0, ms(100), Easing::Linear);
        t.step(ms(25));
        assert!((t.value() - 0.25).abs() < 1e-6);
        t.step(ms(500));
        assert!(t.is_finished());
        assert_eq!(t.value(), 1.0);
    }

    #[test]
    fn test_fade_out_follows_easing_curve() {
        let mut t = Tween::new(1.0, 0.0, ms(100), Easing::EaseIn);
        t.step(ms(50));
        assert!((t.value() - 0.75).abs() < 1e-6);
        assert_eq!(t.value(), lerp_eased(Easing::EaseIn, 1.0, 0.0, 0.5));
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut animator = Animator::new();
        animator.start(1u32, Tween::new(0.0, 1.0, Duration::ZERO, Easing::Linear));
        let frames = animator.advance(Duration::ZERO);
        assert_eq!(frames.len(), 1);
        assert!(frames[0].finished);
        assert!(animator.is_empty());
    }

    #[test]
    fn test_restart_replaces_instead_of_composing() {
        let mut animator = Animator::new();
        animator.start('a', Tween::new(0.0, 1.0, ms(100), Easing::Linear));
        animator.advance(ms(50));

        let old = animator.start('a', Tween::new(0.5, 0.0, ms(100), Easing::Linear));
        assert!(old.is_some());
        assert_eq!(animator.len(), 1);

        let frames = animator.advance(ms(50));
        assert_eq!(frames.len(), 1);
        assert!((frames[0].value - 0.25).abs() < 1e-6);
        assert!(!frames[0].finished);
    }

    #[test]
    fn test_cancel_suppresses_frames() {
        let mut animator = Animator::new();
        animator.start(7u8, Tween::new(1.0, 0.0, ms(10), Easing::Linear));
        assert!(animator.cancel(7).is_some());
        assert!(animator.advance(ms(20)).is_empty());
        assert!(animator.cancel(7).is_none());
    }

    #[test]
    fn test_finished_reported_once() {
        let mut animator = Animator::new();
        animator.start(0u8, Tween::new(0.0, 1.0, ms(30), Easing::EaseInOut));
        animator.start(1u8, Tween::new(0.0, 1.0, ms(90), Easing::EaseInOut));

        let frames = animator.advance(ms(40));
        assert_eq!(frames.iter().filter(|f| f.finished).count(), 1);
        assert_eq!(frames[0].key, 0);
        assert!(animator.is_animating(1));
        assert!(!animator.is_animating(0));
    }
}
