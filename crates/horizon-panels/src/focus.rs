//! Focus tracking and navigation.
//!
//! Each tree has at most one focused panel. A focus change sends
//! [`EventKind::Defocus`] to the panel losing focus before the new panel is
//! recorded and receives [`EventKind::Focus`]. Focus events go to their
//! target only.
//!
//! # Tab Order
//!
//! Tab order is the depth-first pre-order of the focusable panels that are
//! attached under the root and drawn, the same order in which they are
//! painted. Stepping past either end wraps around.
//!
//! # Directional Navigation
//!
//! Arrow keys and enter/escape bubble a [`EventKind::FocusNavigation`] event
//! up from the focused panel. Unless a registered handler takes it first,
//! each panel on the way applies the default policy:
//!
//! - `In` on the focused container focuses its middle child.
//! - `Out` on the focused panel focuses its nearest focusable ancestor.
//! - A direction along a tiling or split container's axis moves to the
//!   adjacent child of that container, when there is one.

use horizon_panels_core::logging::targets;
use horizon_panels_core::surface::classes;
use horizon_panels_core::{Axis, PanelId, TreeResult, Vec2};

use crate::event::{DispatchResult, EventKind, NavigationDirection, PanelEvent};
use crate::panel::{PanelKind, PanelTree};

impl PanelTree {
    /// The focused panel.
    pub fn focused(&self) -> Option<PanelId> {
        self.focused
    }

    /// Whether the panel takes part in tab order and directional navigation.
    pub fn is_focusable(&self, id: PanelId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.focusable)
    }

    /// Include the panel in or exclude it from tab order.
    pub fn set_focusable(&mut self, id: PanelId, focusable: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.focusable = focusable;
        }
    }

    /// Move focus to `id`.
    ///
    /// The previously focused panel receives exactly one `Defocus` before
    /// `id` receives `Focus`. Focusing the focused panel again does nothing.
    pub fn focus(&mut self, id: PanelId) -> TreeResult<()> {
        self.node(id)?;
        if self.focused == Some(id) {
            return Ok(());
        }
        self.defocus();
        // A defocus handler may have destroyed the panel.
        self.node(id)?;

        self.focused = Some(id);
        if let Some(drawable) = self.drawable(id) {
            self.surface.set_class(drawable, classes::FOCUSED, true);
        }
        tracing::debug!(target: targets::FOCUS, ?id, "focus");
        let position = self.map_to_window(id, Vec2::ZERO);
        let mut event = PanelEvent::new(EventKind::Focus, position);
        self.dispatch_event(id, &mut event);
        Ok(())
    }

    /// Clear focus, sending `Defocus` to the panel that had it.
    pub fn defocus(&mut self) {
        let Some(previous) = self.focused.take() else {
            return;
        };
        if let Some(drawable) = self.drawable(previous) {
            self.surface.set_class(drawable, classes::FOCUSED, false);
        }
        tracing::debug!(target: targets::FOCUS, ?previous, "defocus");
        let position = self.map_to_window(previous, Vec2::ZERO);
        let mut event = PanelEvent::new(EventKind::Defocus, position);
        self.dispatch_event(previous, &mut event);
    }

    /// Focusable, drawn panels under the root in pre-order.
    pub fn tab_order(&self) -> Vec<PanelId> {
        let mut order = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if !node.visibility.is_drawn() {
                continue;
            }
            if node.focusable {
                order.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        order
    }

    /// Focus the next panel in tab order. Returns the newly focused panel.
    pub fn focus_next(&mut self) -> Option<PanelId> {
        self.step_tab_order(1)
    }

    /// Focus the previous panel in tab order. Returns the newly focused
    /// panel.
    pub fn focus_previous(&mut self) -> Option<PanelId> {
        self.step_tab_order(-1)
    }

    fn step_tab_order(&mut self, step: isize) -> Option<PanelId> {
        let order = self.tab_order();
        if order.is_empty() {
            return None;
        }
        let len = order.len() as isize;
        let current = self
            .focused
            .and_then(|f| order.iter().position(|&id| id == f));
        let index = match current {
            Some(i) => (i as isize + step).rem_euclid(len),
            None if step > 0 => 0,
            None => len - 1,
        };
        let next = order[index as usize];
        self.focus(next).ok()?;
        Some(next)
    }

    /// Send a directional navigation event from the focused panel.
    ///
    /// Without a focused panel the first panel in tab order is focused.
    pub fn navigate_focus(&mut self, direction: NavigationDirection) -> DispatchResult {
        let Some(focused) = self.focused else {
            return self
                .focus_next()
                .map_or(DispatchResult::Ignored, DispatchResult::Accepted);
        };
        let position = self.map_to_window(focused, Vec2::ZERO);
        let mut event = PanelEvent::new(EventKind::FocusNavigation, position);
        event.direction = Some(direction);
        let result = self.dispatch_event(focused, &mut event);
        tracing::trace!(target: targets::FOCUS, ?direction, ?result, "navigation");
        result
    }

    /// Default navigation policy, run after a panel's own handler declined.
    pub(crate) fn default_navigation(&mut self, id: PanelId, event: &mut PanelEvent) -> bool {
        let Some(direction) = event.direction else {
            return false;
        };
        let at_target = event.target == Some(id);
        match direction {
            NavigationDirection::In if at_target => {
                let children = self.children(id);
                let middle = children.get(children.len() / 2).copied();
                middle.is_some_and(|m| self.focus(m).is_ok())
            }
            NavigationDirection::Out if at_target => {
                let mut current = self.parent(id);
                while let Some(ancestor) = current {
                    if self.is_focusable(ancestor) {
                        return self.focus(ancestor).is_ok();
                    }
                    current = self.parent(ancestor);
                }
                false
            }
            NavigationDirection::In | NavigationDirection::Out => false,
            _ => self.step_sibling(id, event.via_child, direction),
        }
    }

    fn step_sibling(
        &mut self,
        container: PanelId,
        via_child: Option<PanelId>,
        direction: NavigationDirection,
    ) -> bool {
        let Some(child) = via_child else {
            return false;
        };
        let axis = match self.kind(container) {
            Some(PanelKind::Tiling(layout)) => layout.axis,
            Some(PanelKind::Split(layout)) => layout.axis,
            _ => return false,
        };
        let step: isize = match (axis, direction) {
            (Axis::Horizontal, NavigationDirection::Left)
            | (Axis::Vertical, NavigationDirection::Up) => -1,
            (Axis::Horizontal, NavigationDirection::Right)
            | (Axis::Vertical, NavigationDirection::Down) => 1,
            _ => return false,
        };
        let Some(index) = self.index_of(child) else {
            return false;
        };
        let Some(target) = index
            .checked_add_signed(step)
            .and_then(|i| self.children(container).get(i).copied())
        else {
            return false;
        };
        self.focus(target).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use horizon_panels_core::{DrawableKind, HeadlessSurface};

    use super::*;
    use crate::event::{InputEvent, InputRouter, Key};
    use crate::layout::TilingLayout;

    type Log = Rc<RefCell<Vec<(PanelId, EventKind)>>>;

    fn focusable(tree: &mut PanelTree, parent: PanelId, log: &Log) -> PanelId {
        let id = tree.new_leaf(DrawableKind::Rect, Vec2::ZERO, Vec2::splat(10.0));
        tree.insert_child(parent, id, None).unwrap();
        let log = log.clone();
        tree.register_focus_event(id, move |_, event| {
            log.borrow_mut().push((id, event.kind));
            true
        });
        id
    }

    fn row(tree: &mut PanelTree, log: &Log, count: usize) -> (PanelId, Vec<PanelId>) {
        let layout = TilingLayout::new(Axis::Horizontal);
        let row = tree.new_tiling(layout, Vec2::splat(50.0), Vec2::ZERO);
        tree.insert_child(tree.content(), row, None).unwrap();
        let items = (0..count).map(|_| focusable(tree, row, log)).collect();
        tree.recalculate_layout(row);
        (row, items)
    }

    #[test]
    fn test_focus_sends_one_defocus_first() {
        let mut tree = PanelTree::headless(Vec2::splat(100.0));
        let log = Log::default();
        let (_, items) = row(&mut tree, &log, 2);

        tree.focus(items[0]).unwrap();
        tree.focus(items[0]).unwrap();
        tree.focus(items[1]).unwrap();
        assert_eq!(
            *log.borrow(),
            [
                (items[0], EventKind::Focus),
                (items[0], EventKind::Defocus),
                (items[1], EventKind::Focus),
            ]
        );
        assert_eq!(tree.focused(), Some(items[1]));

        let surface = tree.surface_as::<HeadlessSurface>().unwrap();
        assert!(surface.has_class(tree.drawable(items[1]).unwrap(), classes::FOCUSED));
        assert!(!surface.has_class(tree.drawable(items[0]).unwrap(), classes::FOCUSED));
    }

    #[test]
    fn test_destroy_releases_focus() {
        let mut tree = PanelTree::headless(Vec2::splat(100.0));
        let log = Log::default();
        let (row, items) = row(&mut tree, &log, 2);
        tree.focus(items[1]).unwrap();
        tree.destroy(row).unwrap();
        assert_eq!(tree.focused(), None);
        assert_eq!(log.borrow().last(), Some(&(items[1], EventKind::Defocus)));
    }

    #[test]
    fn test_tab_order_wraps_and_skips_hidden() {
        let mut tree = PanelTree::headless(Vec2::splat(100.0));
        let log = Log::default();
        let (_, items) = row(&mut tree, &log, 3);
        tree.set_visible(items[1], false);

        assert_eq!(tree.tab_order(), [items[0], items[2]]);
        assert_eq!(tree.focus_next(), Some(items[0]));
        assert_eq!(tree.focus_next(), Some(items[2]));
        assert_eq!(tree.focus_next(), Some(items[0]));
        assert_eq!(tree.focus_previous(), Some(items[2]));
    }

    #[test]
    fn test_arrows_step_along_tiling_axis() {
        let mut tree = PanelTree::headless(Vec2::splat(100.0));
        let log = Log::default();
        let (_, items) = row(&mut tree, &log, 3);
        tree.focus(items[1]).unwrap();

        let mut router = InputRouter::new();
        let key = |key| InputEvent::KeyDown { key, shift: false };
        router.handle_input(&mut tree, key(Key::ArrowRight));
        assert_eq!(tree.focused(), Some(items[2]));
        let result = router.handle_input(&mut tree, key(Key::ArrowRight));
        assert_eq!(result, DispatchResult::Ignored);
        assert_eq!(tree.focused(), Some(items[2]));
        router.handle_input(&mut tree, key(Key::ArrowDown));
        assert_eq!(tree.focused(), Some(items[2]));
        router.handle_input(&mut tree, key(Key::ArrowLeft));
        assert_eq!(tree.focused(), Some(items[1]));
    }

    #[test]
    fn test_in_and_out() {
        let mut tree = PanelTree::headless(Vec2::splat(100.0));
        let log = Log::default();
        let (row, items) = row(&mut tree, &log, 3);
        tree.register_focus_event(row, |_, _| true);
        tree.focus(row).unwrap();

        assert!(tree.navigate_focus(NavigationDirection::In).was_handled());
        assert_eq!(tree.focused(), Some(items[1]));
        assert!(tree.navigate_focus(NavigationDirection::Out).was_handled());
        assert_eq!(tree.focused(), Some(row));
    }

    #[test]
    fn test_custom_navigation_handler_overrides() {
        let mut tree = PanelTree::headless(Vec2::splat(100.0));
        let log = Log::default();
        let (row, items) = row(&mut tree, &log, 3);
        let first = items[0];
        tree.register_focus_navigation_event(row, move |tree, event| {
            if event.direction == Some(NavigationDirection::Right) {
                return tree.focus(first).is_ok();
            }
            false
        });
        tree.focus(items[1]).unwrap();
        tree.navigate_focus(NavigationDirection::Right);
        assert_eq!(tree.focused(), Some(first));
    }
}
