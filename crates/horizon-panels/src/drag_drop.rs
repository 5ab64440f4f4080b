//! Drag and drop between panels.
//!
//! A drag source is registered with [`PanelTree::register_drag_event`]. Once
//! the pointer of a gesture that began on the source has travelled
//! [`drag_threshold`](crate::ToolkitConfig::drag_threshold) pixels, the
//! source's start callback produces a ghost panel. The ghost is moved to the
//! overlay layer and follows the pointer, offset by the grab point.
//!
//! Drop targets are discovered by capability: every move sends a bubbling
//! [`EventKind::MayDrop`] query from the panel under the pointer, and the
//! first panel accepting it becomes the current target. The root drawable's
//! cursor shows whether a drop would be accepted.
//!
//! On release an accepted target receives [`EventKind::Drop`]. Otherwise, or
//! when the drop handler declines, the ghost is discarded and the source
//! returns to its original parent, index and selection.
//!
//! ```
//! use horizon_panels::prelude::*;
//!
//! let mut tree = PanelTree::headless(Vec2::new(200.0, 100.0));
//! let item = tree.new_leaf(DrawableKind::Rect, Vec2::new(20.0, 20.0), Vec2::splat(10.0));
//! let bin = tree.new_container(Vec2::new(150.0, 50.0), Vec2::splat(60.0));
//! tree.append_child(tree.content(), item).unwrap();
//! tree.append_child(tree.content(), bin).unwrap();
//!
//! // The item itself is the ghost.
//! tree.register_drag_event(item, |_tree, source| Some(source));
//! tree.register_drop_event(
//!     bin,
//!     |_tree, _target, _item| true,
//!     |tree, target, item| tree.insert_child(target, item, None).is_ok(),
//! );
//!
//! let mut router = InputRouter::new();
//! let press = InputEvent::PointerDown { position: Vec2::new(20.0, 20.0), shift: false };
//! router.handle_input(&mut tree, press);
//! router.handle_input(&mut tree, InputEvent::PointerMove { position: Vec2::new(150.0, 50.0) });
//! router.handle_input(&mut tree, InputEvent::PointerUp { position: Vec2::new(150.0, 50.0) });
//!
//! assert_eq!(tree.parent(item), Some(bin));
//! ```

use std::rc::Rc;

use horizon_panels_core::logging::targets;
use horizon_panels_core::surface::{attributes, classes, cursors};
use horizon_panels_core::{AttributeValue, PanelId, Vec2};

use crate::event::{EventKind, PanelEvent};
use crate::panel::{HitPolicy, PanelKind, PanelTree};

/// Produces the ghost for a drag of the given source, or `None` to refuse
/// the drag. Returning the source itself lifts it out of its parent.
pub type DragStartFn = Rc<dyn Fn(&mut PanelTree, PanelId) -> Option<PanelId>>;

/// Decides whether a target accepts an item: `(tree, target, item)`.
pub type DropAcceptFn = Rc<dyn Fn(&PanelTree, PanelId, PanelId) -> bool>;

/// Performs a drop: `(tree, target, item)`. Returning `false` rejects it.
pub type DropFn = Rc<dyn Fn(&mut PanelTree, PanelId, PanelId) -> bool>;

/// State of the drag in progress.
#[derive(Debug, Clone)]
pub(crate) struct DragSession {
    pub(crate) source: PanelId,
    pub(crate) ghost: Option<PanelId>,
    pub(crate) ghost_hit_policy: HitPolicy,
    pub(crate) grab_offset: Vec2,
    pub(crate) target: Option<PanelId>,
    pub(crate) origin: Option<(PanelId, usize)>,
    pub(crate) origin_position: Vec2,
    pub(crate) weight: f32,
    pub(crate) was_selected: bool,
}

impl PanelTree {
    /// Make `panel` a drag source. `start` is called once per drag to
    /// produce the ghost.
    pub fn register_drag_event<F>(&mut self, panel: PanelId, start: F)
    where
        F: Fn(&mut PanelTree, PanelId) -> Option<PanelId> + 'static,
    {
        let start: DragStartFn = Rc::new(start);
        self.register_event(
            panel,
            EventKind::PointerStart,
            Rc::new(|_: &mut PanelTree, _: &mut PanelEvent| true),
        );
        self.register_event(
            panel,
            EventKind::PointerMove,
            Rc::new(move |tree: &mut PanelTree, event: &mut PanelEvent| {
                if !tree.is_dragging() {
                    if event.delta().length() < tree.config.drag_threshold {
                        return true;
                    }
                    if !tree.begin_drag(panel, event.start_position, &start) {
                        return false;
                    }
                }
                tree.drag_to(event.position);
                true
            }),
        );
        self.register_event(
            panel,
            EventKind::PointerEnd,
            Rc::new(move |tree: &mut PanelTree, event: &mut PanelEvent| {
                if tree.drag.as_ref().is_some_and(|d| d.source == panel) {
                    tree.finish_drag(event.position);
                }
                true
            }),
        );
    }

    /// Make `panel` a drop target. `accepts` answers drop queries during the
    /// drag; `on_drop` runs on release over the panel.
    pub fn register_drop_event<A, D>(&mut self, panel: PanelId, accepts: A, on_drop: D)
    where
        A: Fn(&PanelTree, PanelId, PanelId) -> bool + 'static,
        D: Fn(&mut PanelTree, PanelId, PanelId) -> bool + 'static,
    {
        let accepts: DropAcceptFn = Rc::new(accepts);
        let on_drop: DropFn = Rc::new(on_drop);
        self.register_event(
            panel,
            EventKind::MayDrop,
            Rc::new(move |tree: &mut PanelTree, event: &mut PanelEvent| {
                event.item.is_some_and(|item| accepts(tree, panel, item))
            }),
        );
        self.register_event(
            panel,
            EventKind::Drop,
            Rc::new(move |tree: &mut PanelTree, event: &mut PanelEvent| {
                event.item.is_some_and(|item| on_drop(tree, panel, item))
            }),
        );
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Panel that currently accepts the dragged item.
    pub fn drag_target(&self) -> Option<PanelId> {
        self.drag.as_ref().and_then(|d| d.target)
    }

    /// Ghost of the drag in progress.
    pub fn drag_ghost(&self) -> Option<PanelId> {
        self.drag.as_ref().and_then(|d| d.ghost)
    }

    fn begin_drag(&mut self, source: PanelId, pointer: Vec2, start: &DragStartFn) -> bool {
        let origin = self.parent(source).zip(self.index_of(source));
        let origin_position = self.position(source).unwrap_or(Vec2::ZERO);
        let weight = self.relative_size(source).unwrap_or(0.0);
        let was_selected = self.is_selected(source);
        let grab_offset = pointer - self.map_to_window(source, Vec2::ZERO);

        let Some(ghost) = start(self, source) else {
            tracing::debug!(target: targets::DRAG, ?source, "drag refused");
            return false;
        };
        if !self.contains(ghost) || ghost == self.root {
            tracing::warn!(target: targets::DRAG, ?source, ?ghost, "invalid drag ghost");
            return false;
        }
        if let Some(parent) = self.detach(ghost) {
            self.recalculate_layout(parent);
        }
        let overlays = self.overlays;
        let len = self.children(overlays).len();
        self.attach(overlays, ghost, len);
        let ghost_hit_policy = self.hit_policy(ghost).unwrap_or_default();
        self.set_hit_policy(ghost, HitPolicy::None);
        self.set_selected(source, false);
        if let Some(drawable) = self.drawable(source) {
            self.surface.set_class(drawable, classes::DRAGGING, true);
        }

        self.drag = Some(DragSession {
            source,
            ghost: Some(ghost),
            ghost_hit_policy,
            grab_offset,
            target: None,
            origin,
            origin_position,
            weight,
            was_selected,
        });
        tracing::debug!(target: targets::DRAG, ?source, ?ghost, "drag started");
        true
    }

    fn drag_to(&mut self, pointer: Vec2) {
        let Some(session) = self.drag.as_ref() else {
            return;
        };
        let (source, ghost, grab_offset) = (session.source, session.ghost, session.grab_offset);
        if let Some(ghost) = ghost {
            let _ = self.set_position(ghost, pointer - grab_offset);
        }

        let mut query = PanelEvent::new(EventKind::MayDrop, pointer);
        query.item = Some(source);
        let target = self.dispatch_at(&mut query).accepted_by();
        let Some(session) = self.drag.as_mut() else {
            return;
        };
        if session.target != target {
            tracing::trace!(target: targets::DRAG, ?target, "drop target changed");
            session.target = target;
        }
        self.set_cursor(if target.is_some() { cursors::COPY } else { cursors::NO_DROP });
    }

    fn finish_drag(&mut self, pointer: Vec2) {
        self.drag_to(pointer);
        let Some(session) = self.drag.take() else {
            return;
        };
        self.release_ghost(&session);

        let dropped = session.target.is_some_and(|target| {
            let mut drop = PanelEvent::new(EventKind::Drop, pointer);
            drop.item = Some(session.source);
            drop.bubbles = false;
            self.dispatch_to(target, &mut drop).was_handled()
        });
        if dropped {
            tracing::debug!(
                target: targets::DRAG,
                source = ?session.source,
                target = ?session.target,
                "dropped"
            );
            self.set_selected(session.source, session.was_selected);
        } else {
            self.restore_origin(&session);
        }
        self.end_drag_feedback(session.source);
    }

    /// Cancel the drag in progress: discard the ghost and put the source
    /// back where it came from.
    pub fn abort_drag(&mut self) {
        let Some(session) = self.drag.take() else {
            return;
        };
        tracing::debug!(target: targets::DRAG, source = ?session.source, "drag aborted");
        self.release_ghost(&session);
        self.restore_origin(&session);
        self.end_drag_feedback(session.source);
    }

    fn release_ghost(&mut self, session: &DragSession) {
        let Some(ghost) = session.ghost else {
            return;
        };
        self.set_hit_policy(ghost, session.ghost_hit_policy);
        if ghost == session.source {
            self.detach(ghost);
        } else {
            let _ = self.destroy(ghost);
        }
    }

    fn restore_origin(&mut self, session: &DragSession) {
        let source = session.source;
        if let Some((parent, index)) = session.origin {
            if self.parent(source).is_none() && self.contains(parent) {
                let _ = self.set_position(source, session.origin_position);
                let index = index.min(self.children(parent).len());
                if self.insert_child(parent, source, Some(index)).is_ok() {
                    if matches!(self.kind(parent), Some(PanelKind::Split(_))) {
                        self.assign_split_weight(parent, source, session.weight);
                    }
                    self.recalculate_layout(parent);
                }
            }
        }
        self.set_selected(source, session.was_selected);
    }

    fn end_drag_feedback(&mut self, source: PanelId) {
        if let Some(drawable) = self.drawable(source) {
            self.surface.set_class(drawable, classes::DRAGGING, false);
        }
        self.set_cursor(cursors::DEFAULT);
    }

    fn set_cursor(&mut self, cursor: &str) {
        if let Some(drawable) = self.drawable(self.root) {
            let value = AttributeValue::Text(cursor.to_string());
            self.surface.set_attribute(drawable, attributes::CURSOR, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use horizon_panels_core::{DrawableKind, HeadlessSurface};

    use super::*;
    use crate::event::{InputEvent, InputRouter};

    fn press(position: Vec2) -> InputEvent {
        InputEvent::PointerDown { position, shift: false }
    }

    fn move_to(position: Vec2) -> InputEvent {
        InputEvent::PointerMove { position }
    }

    fn release(position: Vec2) -> InputEvent {
        InputEvent::PointerUp { position }
    }

    struct Scene {
        tree: PanelTree,
        item: PanelId,
        home: PanelId,
        bin: PanelId,
    }

    /// `home` on the left holding `item` between two siblings, `bin` on the
    /// right.
    fn scene() -> Scene {
        let mut tree = PanelTree::headless(Vec2::new(300.0, 100.0));
        let home = tree.new_container(Vec2::new(50.0, 50.0), Vec2::splat(100.0));
        let bin = tree.new_container(Vec2::new(250.0, 50.0), Vec2::splat(100.0));
        tree.append_child(tree.content(), home).unwrap();
        tree.append_child(tree.content(), bin).unwrap();
        let before = tree.new_leaf(DrawableKind::Rect, Vec2::new(-40.0, 0.0), Vec2::splat(5.0));
        let item = tree.new_leaf(DrawableKind::Rect, Vec2::ZERO, Vec2::splat(10.0));
        let after = tree.new_leaf(DrawableKind::Rect, Vec2::new(40.0, 0.0), Vec2::splat(5.0));
        for panel in [before, item, after] {
            tree.insert_child(home, panel, None).unwrap();
        }
        Scene { tree, item, home, bin }
    }

    fn cursor(tree: &PanelTree) -> Option<String> {
        let surface = tree.surface_as::<HeadlessSurface>()?;
        let drawable = tree.drawable(tree.root())?;
        surface
            .attribute(drawable, attributes::CURSOR)
            .and_then(|v| v.as_text())
            .map(str::to_string)
    }

    fn accept_into(tree: &mut PanelTree, bin: PanelId) {
        tree.register_drop_event(
            bin,
            |_, _, _| true,
            |tree, target, item| tree.insert_child(target, item, None).is_ok(),
        );
    }

    #[test]
    fn test_lifted_source_follows_pointer_and_drops() {
        let Scene { mut tree, item, bin, .. } = scene();
        tree.register_drag_event(item, |_, source| Some(source));
        accept_into(&mut tree, bin);

        let mut router = InputRouter::new();
        // Grab 3 px right of the item's center.
        router.handle_input(&mut tree, press(Vec2::new(53.0, 50.0)));
        router.handle_input(&mut tree, move_to(Vec2::new(120.0, 60.0)));
        assert!(tree.is_dragging());
        assert_eq!(tree.parent(item), Some(tree.overlays()));
        assert_eq!(tree.position(item), Some(Vec2::new(117.0, 60.0)));
        assert_eq!(tree.drag_target(), None);
        assert_eq!(cursor(&tree).as_deref(), Some(cursors::NO_DROP));

        router.handle_input(&mut tree, move_to(Vec2::new(250.0, 50.0)));
        assert_eq!(tree.drag_target(), Some(bin));
        assert_eq!(cursor(&tree).as_deref(), Some(cursors::COPY));

        router.handle_input(&mut tree, release(Vec2::new(250.0, 50.0)));
        assert!(!tree.is_dragging());
        assert_eq!(tree.parent(item), Some(bin));
        assert_eq!(cursor(&tree).as_deref(), Some(cursors::DEFAULT));
        assert_eq!(tree.hit_policy(item), Some(HitPolicy::Normal));
    }

    #[test]
    fn test_release_without_target_restores_origin() {
        let Scene { mut tree, item, home, .. } = scene();
        tree.set_selected(item, true);
        tree.register_drag_event(item, |_, source| Some(source));

        let mut router = InputRouter::new();
        router.handle_input(&mut tree, press(Vec2::new(50.0, 50.0)));
        router.handle_input(&mut tree, move_to(Vec2::new(150.0, 50.0)));
        assert!(!tree.is_selected(item));
        router.handle_input(&mut tree, release(Vec2::new(150.0, 50.0)));

        assert_eq!(tree.parent(item), Some(home));
        assert_eq!(tree.index_of(item), Some(1));
        assert_eq!(tree.position(item), Some(Vec2::ZERO));
        assert!(tree.is_selected(item));
    }

    #[test]
    fn test_proxy_ghost_is_discarded() {
        let Scene { mut tree, item, home, bin } = scene();
        let dropped = Rc::new(std::cell::Cell::new(None));
        let slot = dropped.clone();
        tree.register_drag_event(item, |tree, _| {
            Some(tree.new_leaf(DrawableKind::Rect, Vec2::ZERO, Vec2::splat(4.0)))
        });
        tree.register_drop_event(bin, |_, _, _| true, move |_, _, item| {
            slot.set(Some(item));
            true
        });

        let mut router = InputRouter::new();
        router.handle_input(&mut tree, press(Vec2::new(50.0, 50.0)));
        router.handle_input(&mut tree, move_to(Vec2::new(240.0, 50.0)));
        let ghost = tree.drag_ghost().unwrap();
        assert_eq!(tree.parent(item), Some(home));
        router.handle_input(&mut tree, release(Vec2::new(240.0, 50.0)));

        assert!(!tree.contains(ghost));
        assert_eq!(dropped.get(), Some(item));
        assert_eq!(tree.parent(item), Some(home));
    }

    #[test]
    fn test_declining_target_is_not_remembered() {
        let Scene { mut tree, item, bin, .. } = scene();
        tree.register_drag_event(item, |_, source| Some(source));
        tree.register_drop_event(bin, |_, _, _| false, |_, _, _| true);

        let mut router = InputRouter::new();
        router.handle_input(&mut tree, press(Vec2::new(50.0, 50.0)));
        router.handle_input(&mut tree, move_to(Vec2::new(250.0, 50.0)));
        assert_eq!(tree.drag_target(), None);
        router.handle_input(&mut tree, release(Vec2::new(250.0, 50.0)));
        assert_ne!(tree.parent(item), Some(bin));
    }

    #[test]
    fn test_threshold_delays_drag() {
        let Scene { mut tree, item, .. } = scene();
        tree.config.drag_threshold = 10.0;
        tree.register_drag_event(item, |_, source| Some(source));

        let mut router = InputRouter::new();
        router.handle_input(&mut tree, press(Vec2::new(50.0, 50.0)));
        router.handle_input(&mut tree, move_to(Vec2::new(55.0, 50.0)));
        assert!(!tree.is_dragging());
        router.handle_input(&mut tree, move_to(Vec2::new(65.0, 50.0)));
        assert!(tree.is_dragging());
    }

    #[test]
    fn test_new_gesture_aborts_stale_drag() {
        let Scene { mut tree, item, home, .. } = scene();
        tree.register_drag_event(item, |_, source| Some(source));

        let mut router = InputRouter::new();
        router.handle_input(&mut tree, press(Vec2::new(50.0, 50.0)));
        router.handle_input(&mut tree, move_to(Vec2::new(150.0, 50.0)));
        // The release was lost; a fresh press replaces the gesture.
        router.handle_input(&mut tree, press(Vec2::new(5.0, 5.0)));

        assert!(!tree.is_dragging());
        assert_eq!(tree.parent(item), Some(home));
    }
}
