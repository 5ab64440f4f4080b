//! Root layers: application content, overlays and the modal backdrop.
//!
//! The root owns two full-window containers. `content` holds the
//! application; `overlays` holds popovers, drag ghosts and a backdrop that
//! is shown while an overlay is open. An action on the backdrop closes every
//! overlay.

use std::rc::Rc;

use horizon_panels_core::logging::targets;
use horizon_panels_core::surface::classes;
use horizon_panels_core::{DrawableKind, PanelId, TreeResult, Vec2};

use super::{HitPolicy, PanelKind, PanelTree};
use crate::event::{EventKind, PanelEvent};

impl PanelTree {
    pub(super) fn build_root_layers(&mut self, size: Vec2) {
        let root = self.create_panel(PanelKind::Root, DrawableKind::Root, Vec2::ZERO, size);
        if let Some(node) = self.nodes.get_mut(root) {
            node.root = Some(root);
            node.name = "root".to_string();
        }
        self.root = root;

        let content = self.new_container(Vec2::ZERO, size);
        let overlays = self.new_container(Vec2::ZERO, size);
        let backdrop = self.new_leaf(DrawableKind::Rect, size * 0.5, size);
        self.set_name(content, "content");
        self.set_name(overlays, "overlays");
        self.set_name(backdrop, "backdrop");
        self.set_hit_policy(content, HitPolicy::ChildrenOnly);
        self.set_hit_policy(overlays, HitPolicy::ChildrenOnly);
        self.surface.set_class(self.nodes[backdrop].drawable, classes::BACKDROP, true);

        self.attach(root, content, 0);
        self.attach(root, overlays, 1);
        self.attach(overlays, backdrop, 0);
        self.content = content;
        self.overlays = overlays;
        self.backdrop = backdrop;
        self.set_visible(backdrop, false);

        self.register_event(
            backdrop,
            EventKind::PointerStart,
            Rc::new(|_: &mut PanelTree, _: &mut PanelEvent| true),
        );
        self.register_event(
            backdrop,
            EventKind::Action,
            Rc::new(|tree: &mut PanelTree, _: &mut PanelEvent| {
                let on_close = tree.overlay_close.take();
                tree.close_all_overlays();
                if let Some(on_close) = on_close {
                    on_close(tree);
                }
                true
            }),
        );
    }

    /// The root panel.
    pub fn root(&self) -> PanelId {
        self.root
    }

    /// Container for application panels.
    pub fn content(&self) -> PanelId {
        self.content
    }

    /// Container for overlays and drag ghosts, drawn above the content.
    pub fn overlays(&self) -> PanelId {
        self.overlays
    }

    /// Whether any overlay is open.
    pub fn has_open_overlays(&self) -> bool {
        self.visibility(self.backdrop)
            .is_some_and(|v| v.is_drawn())
    }

    /// Resize the window: the root and both layers take the new size.
    pub fn resize(&mut self, size: Vec2) {
        if let Some(node) = self.nodes.get_mut(self.root) {
            node.size = size;
        }
        self.update_size(self.root);
        tracing::debug!(target: targets::TREE, width = size.x, height = size.y, "root resized");
    }

    /// Show `overlay` above the content behind a modal backdrop.
    ///
    /// Acting on the backdrop closes all overlays and then runs `on_close`.
    pub fn open_overlay(
        &mut self,
        overlay: PanelId,
        on_close: Option<Rc<dyn Fn(&mut PanelTree)>>,
    ) -> TreeResult<()> {
        let overlays = self.overlays;
        self.insert_child(overlays, overlay, None)?;
        self.overlay_close = on_close;
        self.set_visible(self.backdrop, true);
        Ok(())
    }

    /// Remove every overlay and hide the backdrop.
    pub fn close_all_overlays(&mut self) {
        let backdrop = self.backdrop;
        let open: Vec<PanelId> = self
            .children(self.overlays)
            .iter()
            .copied()
            .filter(|&c| c != backdrop && self.drag.as_ref().is_none_or(|d| d.ghost != Some(c)))
            .collect();
        for overlay in open {
            self.detach(overlay);
        }
        self.set_visible(backdrop, false);
        self.overlay_close = None;
    }

    /// Lay out the root layers for the root's size.
    pub(crate) fn layout_root(&mut self, root: PanelId) {
        let size = self.size(root).unwrap_or(Vec2::ZERO);
        for layer in [self.content, self.overlays] {
            if let Some(node) = self.nodes.get_mut(layer) {
                node.position = Vec2::ZERO;
                node.size = size;
            }
            self.update_size(layer);
        }
        let backdrop = self.backdrop;
        if let Some(node) = self.nodes.get_mut(backdrop) {
            node.position = size * 0.5;
            node.size = size;
        }
        self.sync_position(backdrop);
        self.update_size(backdrop);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use horizon_panels_core::{DrawableKind, Vec2};

    use super::*;
    use crate::event::PanelEvent;

    #[test]
    fn test_root_layers() {
        let tree = PanelTree::headless(Vec2::new(320.0, 240.0));
        let root = tree.root();
        assert_eq!(tree.children(root), &[tree.content(), tree.overlays()]);
        assert_eq!(tree.root_of(tree.content()), Some(root));
        assert_eq!(tree.root_of(root), Some(root));
        assert!(!tree.has_open_overlays());
    }

    #[test]
    fn test_resize_sizes_layers() {
        let mut tree = PanelTree::headless(Vec2::new(320.0, 240.0));
        tree.resize(Vec2::new(640.0, 480.0));
        assert_eq!(tree.size(tree.content()), Some(Vec2::new(640.0, 480.0)));
        assert_eq!(tree.size(tree.overlays()), Some(Vec2::new(640.0, 480.0)));
    }

    #[test]
    fn test_backdrop_action_closes_overlays() {
        let mut tree = PanelTree::headless(Vec2::new(200.0, 200.0));
        let popover = tree.new_leaf(DrawableKind::Rect, Vec2::new(20.0, 20.0), Vec2::splat(10.0));
        let closed = Rc::new(Cell::new(false));
        let flag = closed.clone();
        tree.open_overlay(popover, Some(Rc::new(move |_: &mut PanelTree| flag.set(true))))
            .unwrap();
        assert!(tree.has_open_overlays());
        assert_eq!(tree.parent(popover), Some(tree.overlays()));

        // Away from the popover the backdrop is hit.
        let hit = tree.hit_test(Vec2::new(150.0, 150.0));
        assert_ne!(hit, Some(popover));
        let mut event = PanelEvent::new(EventKind::Action, Vec2::new(150.0, 150.0));
        tree.dispatch_at(&mut event);

        assert!(closed.get());
        assert!(!tree.has_open_overlays());
        assert_eq!(tree.parent(popover), None);
    }

    #[test]
    fn test_popover_hit_above_backdrop() {
        let mut tree = PanelTree::headless(Vec2::new(200.0, 200.0));
        let popover = tree.new_leaf(DrawableKind::Rect, Vec2::new(20.0, 20.0), Vec2::splat(10.0));
        tree.open_overlay(popover, None).unwrap();
        assert_eq!(tree.hit_test(Vec2::new(22.0, 18.0)), Some(popover));
        tree.close_all_overlays();
        assert_eq!(tree.hit_test(Vec2::new(22.0, 18.0)), Some(tree.root()));
    }
}
