//! Visibility state and fade transitions.
//!
//! Fades are opacity tweens held by the tree's animator. The host drives
//! them with [`PanelTree::advance_animations`] once per frame. A fade-out
//! started by [`PanelTree::remove_child_animated`] detaches the child when
//! it completes, unless the child was inserted somewhere again first.

use std::time::Duration;

use horizon_panels_core::animation::{Easing, Tween};
use horizon_panels_core::logging::{targets, PerfSpan};
use horizon_panels_core::surface::attributes;
use horizon_panels_core::{AttributeValue, PanelId, TreeError, TreeResult};

use super::PanelTree;

/// Visibility state of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Fully shown.
    #[default]
    Visible,
    /// Fading towards visible.
    FadingIn,
    /// Fading towards hidden.
    FadingOut,
    /// Not drawn and not hit-testable.
    Hidden,
}

impl Visibility {
    /// Whether the panel should be drawn at all.
    pub fn is_drawn(self) -> bool {
        self != Self::Hidden
    }

    /// Whether pointer input may land on the panel.
    pub fn is_interactive(self) -> bool {
        matches!(self, Self::Visible | Self::FadingIn)
    }
}

impl PanelTree {
    /// Visibility state of a panel.
    pub fn visibility(&self, id: PanelId) -> Option<Visibility> {
        self.nodes.get(id).map(|n| n.visibility)
    }

    /// Current opacity of a panel.
    pub fn opacity(&self, id: PanelId) -> Option<f32> {
        self.nodes.get(id).map(|n| n.opacity)
    }

    /// Whether a fade-out is about to detach the panel.
    pub fn is_pending_removal(&self, id: PanelId) -> bool {
        self.pending_removals.contains_key(&id)
    }

    /// Show or hide a panel immediately, cancelling any fade and any
    /// removal scheduled by [`remove_child_animated`](Self::remove_child_animated).
    pub fn set_visible(&mut self, id: PanelId, visible: bool) {
        self.animator.cancel(id);
        self.drop_scheduled_removal(id);
        if visible {
            self.apply_visibility(id, Visibility::Visible, 1.0);
        } else {
            self.apply_visibility(id, Visibility::Hidden, 0.0);
        }
    }

    /// Fade a panel in or out from its current opacity.
    ///
    /// A fade already running for the panel is replaced, never composed,
    /// and a removal scheduled with it is dropped.
    pub fn animate_visibility_to(&mut self, id: PanelId, visible: bool) -> TreeResult<()> {
        let from = self.node(id)?.opacity;
        self.drop_scheduled_removal(id);
        let (state, to) = if visible {
            (Visibility::FadingIn, 1.0)
        } else {
            (Visibility::FadingOut, 0.0)
        };
        let tween = Tween::new(from, to, self.config.fade_duration(), Easing::EaseInOut);
        self.animator.start(id, tween);
        self.apply_visibility(id, state, from);
        tracing::trace!(target: targets::ANIMATION, ?id, visible, "fade started");
        Ok(())
    }

    /// [`insert_child`](Self::insert_child) followed by a fade-in.
    pub fn insert_child_animated(
        &mut self,
        parent: PanelId,
        child: PanelId,
        index: Option<usize>,
    ) -> TreeResult<()> {
        self.insert_child(parent, child, index)?;
        if self.visibility(child) == Some(Visibility::Visible) && !self.animator.is_animating(child)
        {
            if let Some(node) = self.nodes.get_mut(child) {
                node.opacity = 0.0;
            }
        }
        self.animate_visibility_to(child, true)
    }

    /// Fade `child` out and detach it from `parent` once the fade completes.
    ///
    /// Fails if `child` is not one of `parent`'s children. Inserting the
    /// child anywhere before the fade completes cancels the removal.
    pub fn remove_child_animated(&mut self, parent: PanelId, child: PanelId) -> TreeResult<()> {
        self.node(parent)?;
        if !self.children(parent).contains(&child) {
            return Err(TreeError::NotAChild { parent, child });
        }
        self.animate_visibility_to(child, false)?;
        self.pending_removals.insert(child, parent);
        Ok(())
    }

    /// Advance every running fade by `elapsed` and apply the results.
    ///
    /// Completed fade-outs with a pending removal detach their panel. Returns
    /// whether any fade is still running.
    pub fn advance_animations(&mut self, elapsed: Duration) -> bool {
        let _span = PerfSpan::new("advance_animations");
        for frame in self.animator.advance(elapsed) {
            let id = frame.key;
            if !frame.finished {
                if let Some(state) = self.visibility(id) {
                    self.apply_visibility(id, state, frame.value);
                }
                continue;
            }
            if frame.value >= 0.5 {
                self.apply_visibility(id, Visibility::Visible, 1.0);
                continue;
            }
            self.apply_visibility(id, Visibility::Hidden, 0.0);
            if let Some(parent) = self.pending_removals.remove(&id) {
                tracing::debug!(target: targets::ANIMATION, ?id, ?parent, "deferred removal");
                if self.children(parent).contains(&id) {
                    self.detach(id);
                    self.recalculate_layout(parent);
                }
            }
        }
        !self.animator.is_empty()
    }

    fn drop_scheduled_removal(&mut self, id: PanelId) {
        if self.pending_removals.remove(&id).is_some() {
            tracing::debug!(target: targets::ANIMATION, ?id, "scheduled removal dropped");
        }
    }

    pub(crate) fn apply_visibility(&mut self, id: PanelId, state: Visibility, opacity: f32) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.visibility = state;
        node.opacity = opacity;
        let drawable = node.drawable;
        self.surface
            .set_attribute(drawable, attributes::OPACITY, AttributeValue::Number(opacity));
        let shown = if state.is_drawn() { "visible" } else { "hidden" };
        let value = AttributeValue::Text(shown.to_string());
        self.surface.set_attribute(drawable, attributes::VISIBILITY, value);
    }
}

#[cfg(test)]
mod tests {
    use horizon_panels_core::{DrawableKind, Vec2};

    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn setup() -> (PanelTree, PanelId, PanelId) {
        let mut tree = PanelTree::headless(Vec2::new(100.0, 100.0));
        let container = tree.new_container(Vec2::ZERO, Vec2::ZERO);
        tree.insert_child(tree.content(), container, None).unwrap();
        let child = tree.new_leaf(DrawableKind::Rect, Vec2::ZERO, Vec2::ONE);
        (tree, container, child)
    }

    #[test]
    fn test_fade_in_reaches_visible() {
        let (mut tree, container, child) = setup();
        tree.insert_child_animated(container, child, None).unwrap();
        assert_eq!(tree.visibility(child), Some(Visibility::FadingIn));
        assert_eq!(tree.opacity(child), Some(0.0));

        assert!(tree.advance_animations(ms(125)));
        let mid = tree.opacity(child).unwrap();
        assert!(mid > 0.0 && mid < 1.0);

        assert!(!tree.advance_animations(ms(125)));
        assert_eq!(tree.visibility(child), Some(Visibility::Visible));
        assert_eq!(tree.opacity(child), Some(1.0));
    }

    #[test]
    fn test_animated_removal_detaches_after_fade() {
        let (mut tree, container, child) = setup();
        tree.insert_child(container, child, None).unwrap();
        tree.remove_child_animated(container, child).unwrap();

        tree.advance_animations(ms(100));
        assert_eq!(tree.parent(child), Some(container));
        assert!(tree.is_pending_removal(child));

        tree.advance_animations(ms(200));
        assert_eq!(tree.parent(child), None);
        assert_eq!(tree.visibility(child), Some(Visibility::Hidden));
        assert!(!tree.is_pending_removal(child));
    }

    #[test]
    fn test_reinsert_cancels_pending_removal() {
        let (mut tree, container, child) = setup();
        let other = tree.new_container(Vec2::ZERO, Vec2::ZERO);
        tree.insert_child(tree.content(), other, None).unwrap();
        tree.insert_child(container, child, None).unwrap();
        tree.remove_child_animated(container, child).unwrap();
        tree.advance_animations(ms(100));

        tree.insert_child(other, child, None).unwrap();
        assert_eq!(tree.parent(child), Some(other));
        assert!(!tree.children(container).contains(&child));
        assert_eq!(tree.visibility(child), Some(Visibility::Visible));

        tree.advance_animations(ms(500));
        assert_eq!(tree.parent(child), Some(other));
        assert_eq!(tree.visibility(child), Some(Visibility::Visible));
    }

    #[test]
    fn test_reinsert_into_same_container_animated() {
        let (mut tree, container, child) = setup();
        tree.insert_child(container, child, None).unwrap();
        tree.remove_child_animated(container, child).unwrap();
        tree.advance_animations(ms(50));

        tree.insert_child_animated(container, child, Some(0)).unwrap();
        assert_eq!(tree.children(container), &[child]);
        tree.advance_animations(ms(1000));
        assert_eq!(tree.parent(child), Some(container));
        assert_eq!(tree.visibility(child), Some(Visibility::Visible));
    }

    #[test]
    fn test_retrigger_replaces_fade() {
        let (mut tree, container, child) = setup();
        tree.insert_child(container, child, None).unwrap();
        tree.animate_visibility_to(child, false).unwrap();
        tree.advance_animations(ms(125));
        tree.animate_visibility_to(child, true).unwrap();
        assert_eq!(tree.visibility(child), Some(Visibility::FadingIn));

        tree.advance_animations(ms(250));
        assert_eq!(tree.visibility(child), Some(Visibility::Visible));
        assert!(!tree.advance_animations(ms(16)));
    }

    #[test]
    fn test_set_visible_drops_scheduled_removal() {
        let (mut tree, container, child) = setup();
        tree.insert_child(container, child, None).unwrap();
        tree.remove_child_animated(container, child).unwrap();
        tree.advance_animations(ms(100));

        tree.set_visible(child, true);
        assert!(!tree.is_pending_removal(child));
        tree.animate_visibility_to(child, false).unwrap();
        tree.advance_animations(ms(500));
        assert_eq!(tree.parent(child), Some(container));
    }

    #[test]
    fn test_remove_animated_requires_child() {
        let (mut tree, container, child) = setup();
        assert_eq!(
            tree.remove_child_animated(container, child),
            Err(TreeError::NotAChild { parent: container, child })
        );
    }
}
