//! Handler registration, hit testing and the bubbling dispatch loop.
//!
//! # Event Flow
//!
//! 1. **Handler**: the handler registered on the panel for the event's kind
//!    runs first. Returning `true` stops here.
//! 2. **Built-in**: the behavior of the panel's kind (split handles, view
//!    pan/zoom, scrollbar thumbs, default focus navigation).
//! 3. **Bubbling**: unhandled bubbling events continue with the parent until
//!    a panel accepts them or the root is passed.

use std::rc::Rc;

use horizon_panels_core::logging::targets;
use horizon_panels_core::{Affine2, Bounds, PanelId, Vec2};

use super::{DispatchResult, EventHandler, EventKind, PanelEvent};
use crate::panel::{HitPolicy, PanelKind, PanelTree};

type BuiltIn = fn(&mut PanelTree, PanelId, &mut PanelEvent) -> bool;

impl PanelTree {
    // =========================================================================
    // Registration
    // =========================================================================

    /// Install `handler` for events of `kind` on `panel`, replacing any
    /// previous one.
    pub fn register_event(&mut self, panel: PanelId, kind: EventKind, handler: EventHandler) {
        let Some(node) = self.nodes.get_mut(panel) else {
            tracing::warn!(
                target: targets::EVENT,
                ?panel,
                ?kind,
                "handler registered on missing panel"
            );
            return;
        };
        node.handlers.insert(kind, handler);
    }

    /// Remove the handler for `kind` from `panel`.
    pub fn unregister_event(&mut self, panel: PanelId, kind: EventKind) {
        if let Some(node) = self.nodes.get_mut(panel) {
            node.handlers.remove(&kind);
        }
    }

    /// Whether `panel` has a handler for `kind`.
    pub fn has_handler(&self, panel: PanelId, kind: EventKind) -> bool {
        self.nodes
            .get(panel)
            .is_some_and(|n| n.handlers.contains_key(&kind))
    }

    /// Run `handler` when a press on `panel` is released without movement.
    ///
    /// The press itself is accepted so that the panel owns the gesture.
    pub fn register_action_event<F>(&mut self, panel: PanelId, handler: F)
    where
        F: Fn(&mut PanelTree, &mut PanelEvent) -> bool + 'static,
    {
        if !self.has_handler(panel, EventKind::PointerStart) {
            self.register_event(
                panel,
                EventKind::PointerStart,
                Rc::new(|_: &mut PanelTree, _: &mut PanelEvent| true),
            );
        }
        self.register_event(panel, EventKind::Action, Rc::new(handler));
    }

    /// Make `panel` focusable and run `handler` on both
    /// [`EventKind::Focus`] and [`EventKind::Defocus`].
    pub fn register_focus_event<F>(&mut self, panel: PanelId, handler: F)
    where
        F: Fn(&mut PanelTree, &mut PanelEvent) -> bool + 'static,
    {
        let handler: EventHandler = Rc::new(handler);
        self.register_event(panel, EventKind::Focus, handler.clone());
        self.register_event(panel, EventKind::Defocus, handler);
        self.set_focusable(panel, true);
    }

    /// Run `handler` on directional focus navigation passing through
    /// `panel`, ahead of the default policy.
    pub fn register_focus_navigation_event<F>(&mut self, panel: PanelId, handler: F)
    where
        F: Fn(&mut PanelTree, &mut PanelEvent) -> bool + 'static,
    {
        self.register_event(panel, EventKind::FocusNavigation, Rc::new(handler));
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Deliver `event` to `target` and, while it is unhandled and bubbling,
    /// to each ancestor in turn.
    pub fn dispatch_event(&mut self, target: PanelId, event: &mut PanelEvent) -> DispatchResult {
        if !self.contains(target) {
            tracing::warn!(
                target: targets::EVENT,
                ?target,
                kind = ?event.kind,
                "dispatch to missing panel"
            );
            return DispatchResult::PanelNotFound;
        }
        event.target = Some(target);
        event.via_child = None;

        let mut current = Some(target);
        while let Some(id) = current {
            event.current = Some(id);
            if self.deliver(id, event) {
                tracing::trace!(target: targets::EVENT, kind = ?event.kind, ?id, "event accepted");
                return DispatchResult::Accepted(id);
            }
            if !event.bubbles {
                break;
            }
            event.via_child = Some(id);
            current = self.parent(id);
        }
        DispatchResult::Ignored
    }

    /// Hit-test `event.position` and dispatch from the panel found there.
    pub fn dispatch_at(&mut self, event: &mut PanelEvent) -> DispatchResult {
        match self.hit_test(event.position) {
            Some(target) => self.dispatch_event(target, event),
            None => DispatchResult::Ignored,
        }
    }

    /// Deliver `event` to `panel` only, without bubbling.
    pub fn dispatch_to(&mut self, panel: PanelId, event: &mut PanelEvent) -> DispatchResult {
        if !self.contains(panel) {
            tracing::debug!(
                target: targets::EVENT,
                ?panel,
                kind = ?event.kind,
                "gesture owner vanished"
            );
            return DispatchResult::PanelNotFound;
        }
        event.target = Some(panel);
        event.current = Some(panel);
        if self.deliver(panel, event) {
            DispatchResult::Accepted(panel)
        } else {
            DispatchResult::Ignored
        }
    }

    fn deliver(&mut self, id: PanelId, event: &mut PanelEvent) -> bool {
        let handler = self
            .nodes
            .get(id)
            .and_then(|n| n.handlers.get(&event.kind))
            .cloned();
        if let Some(handler) = handler {
            if handler(self, event) {
                return true;
            }
        }
        let pointer = matches!(
            event.kind,
            EventKind::PointerStart | EventKind::PointerMove | EventKind::PointerEnd
        );
        let builtin: Option<BuiltIn> = match self.kind(id) {
            Some(PanelKind::Split(_)) if pointer => Some(Self::split_event),
            Some(PanelKind::View(_)) if pointer || event.kind == EventKind::PointerZoom => {
                Some(Self::view_event)
            }
            Some(PanelKind::Scrollbar(_)) if pointer => Some(Self::scrollbar_event),
            _ if event.kind == EventKind::FocusNavigation => Some(Self::default_navigation),
            _ => None,
        };
        builtin.is_some_and(|f| f(self, id, event))
    }

    // =========================================================================
    // Hit testing
    // =========================================================================

    /// The deepest interactive panel under a window-space point.
    ///
    /// Later children are in front of earlier ones. Views clip their
    /// children to their own bounds. When nothing else is hit the root is.
    pub fn hit_test(&self, window_point: Vec2) -> Option<PanelId> {
        let root = self.root;
        self.hit_test_recursive(root, window_point, Affine2::IDENTITY)
            .or_else(|| self.contains(root).then_some(root))
    }

    fn hit_test_recursive(
        &self,
        id: PanelId,
        window_point: Vec2,
        parent: Affine2,
    ) -> Option<PanelId> {
        let node = self.nodes.get(id)?;
        if !node.visibility.is_interactive() || node.hit_policy == HitPolicy::None {
            return None;
        }
        let transform = parent * self.local_transform(id);
        let local = transform.inverse().transform_point2(window_point);
        let inside = Bounds::from_center_size(Vec2::ZERO, node.size).contains_point(local);
        if matches!(node.kind, PanelKind::View(_)) && !inside {
            return None;
        }

        for &child in node.children.iter().rev() {
            if let Some(hit) = self.hit_test_recursive(child, window_point, transform) {
                return Some(hit);
            }
        }

        (inside && node.hit_policy == HitPolicy::Normal).then_some(id)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use horizon_panels_core::DrawableKind;

    use super::*;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn logging(log: &Log, name: &'static str, accept: bool) -> EventHandler {
        let log = log.clone();
        Rc::new(move |_: &mut PanelTree, _: &mut PanelEvent| {
            log.borrow_mut().push(name);
            accept
        })
    }

    fn nested(tree: &mut PanelTree) -> (PanelId, PanelId) {
        let outer = tree.new_container(Vec2::new(50.0, 50.0), Vec2::splat(80.0));
        let inner = tree.new_leaf(DrawableKind::Rect, Vec2::new(10.0, 0.0), Vec2::splat(20.0));
        tree.insert_child(tree.content(), outer, None).unwrap();
        tree.insert_child(outer, inner, None).unwrap();
        (outer, inner)
    }

    #[test]
    fn test_bubbles_until_accepted() {
        let mut tree = PanelTree::headless(Vec2::splat(100.0));
        let (outer, inner) = nested(&mut tree);
        let log = Log::default();
        tree.register_event(inner, EventKind::Action, logging(&log, "inner", false));
        tree.register_event(outer, EventKind::Action, logging(&log, "outer", true));

        let mut event = PanelEvent::new(EventKind::Action, Vec2::new(60.0, 50.0));
        let result = tree.dispatch_at(&mut event);
        assert_eq!(result, DispatchResult::Accepted(outer));
        assert_eq!(*log.borrow(), ["inner", "outer"]);
        assert_eq!(event.target, Some(inner));
        assert_eq!(event.via_child, Some(inner));
    }

    #[test]
    fn test_non_bubbling_stops_at_target() {
        let mut tree = PanelTree::headless(Vec2::splat(100.0));
        let (outer, inner) = nested(&mut tree);
        let log = Log::default();
        tree.register_event(outer, EventKind::Focus, logging(&log, "outer", true));

        let mut event = PanelEvent::new(EventKind::Focus, Vec2::ZERO);
        assert_eq!(tree.dispatch_event(inner, &mut event), DispatchResult::Ignored);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_dispatch_to_missing_panel() {
        let mut tree = PanelTree::headless(Vec2::splat(100.0));
        let (_, inner) = nested(&mut tree);
        tree.destroy(inner).unwrap();
        let mut event = PanelEvent::new(EventKind::Action, Vec2::ZERO);
        assert_eq!(tree.dispatch_event(inner, &mut event), DispatchResult::PanelNotFound);
    }

    #[test]
    fn test_hit_test_front_to_back_and_policies() {
        let mut tree = PanelTree::headless(Vec2::splat(100.0));
        let (outer, inner) = nested(&mut tree);
        let front = tree.new_leaf(DrawableKind::Rect, Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        tree.insert_child(outer, front, None).unwrap();

        assert_eq!(tree.hit_test(Vec2::new(60.0, 50.0)), Some(front));
        assert_eq!(tree.hit_test(Vec2::new(67.0, 50.0)), Some(inner));
        assert_eq!(tree.hit_test(Vec2::new(20.0, 20.0)), Some(outer));

        tree.set_hit_policy(front, HitPolicy::None);
        assert_eq!(tree.hit_test(Vec2::new(60.0, 50.0)), Some(inner));
        tree.set_hit_policy(outer, HitPolicy::ChildrenOnly);
        assert_eq!(tree.hit_test(Vec2::new(20.0, 20.0)), Some(tree.root()));

        tree.set_visible(inner, false);
        assert_eq!(tree.hit_test(Vec2::new(60.0, 50.0)), Some(tree.root()));
    }

    #[test]
    fn test_action_registration_claims_press() {
        let mut tree = PanelTree::headless(Vec2::splat(100.0));
        let (_, inner) = nested(&mut tree);
        tree.register_action_event(inner, |_, _| true);
        assert!(tree.has_handler(inner, EventKind::PointerStart));

        let mut event = PanelEvent::new(EventKind::PointerStart, Vec2::new(60.0, 50.0));
        assert_eq!(tree.dispatch_at(&mut event), DispatchResult::Accepted(inner));

        tree.unregister_event(inner, EventKind::PointerStart);
        let mut event = PanelEvent::new(EventKind::PointerStart, Vec2::new(60.0, 50.0));
        assert_eq!(tree.dispatch_at(&mut event), DispatchResult::Ignored);
    }
}
