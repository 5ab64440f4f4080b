//! Ownership changes: insert, remove, background, destroy.
//!
//! Every operation validates completely before touching anything, so a
//! failed call leaves the tree exactly as it was.

use horizon_panels_core::logging::targets;
use horizon_panels_core::{PanelId, TreeError, TreeResult};

use super::{PanelKind, PanelTree, Visibility};

impl PanelTree {
    /// Insert `child` into `parent` at `index`, or append when `index` is
    /// `None`.
    ///
    /// Fails if the child is already owned by a container (including
    /// `parent` itself), if the index lies outside `[0, len]`, or if the
    /// insertion would create a cycle. A child that is fading out towards a
    /// pending removal has that removal cancelled first and counts as
    /// unowned.
    ///
    /// Layout is not recomputed; call
    /// [`recalculate_layout`](Self::recalculate_layout) afterwards, or use
    /// [`append_child`](Self::append_child).
    #[tracing::instrument(skip(self), target = "horizon_panels::tree", level = "debug")]
    pub fn insert_child(
        &mut self,
        parent: PanelId,
        child: PanelId,
        index: Option<usize>,
    ) -> TreeResult<()> {
        let parent_node = self.node(parent)?;
        if !parent_node.kind.is_container() {
            return Err(TreeError::NotAContainer(parent));
        }
        let len = parent_node.children.len();
        let child_node = self.node(child)?;
        if child == self.root {
            return Err(TreeError::RootImmutable);
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(TreeError::CircularParentage);
        }

        let pending = self.pending_removals.contains_key(&child);
        let available = match child_node.parent {
            Some(current) if !pending => {
                return Err(TreeError::AlreadyParented { child, current });
            }
            Some(current) if current == parent => len - 1,
            _ => len,
        };
        let index = index.unwrap_or(available);
        if index > available {
            return Err(TreeError::IndexOutOfRange {
                index,
                len: available,
            });
        }

        if pending {
            self.cancel_pending_removal(child, parent);
        }
        self.attach(parent, child, index);
        if matches!(self.kind(parent), Some(PanelKind::Split(_))) {
            let count = self.children(parent).len() as f32;
            self.assign_split_weight(parent, child, 1.0 / count);
        }
        Ok(())
    }

    /// Append `child` to `parent` and lay the parent out.
    pub fn append_child(&mut self, parent: PanelId, child: PanelId) -> TreeResult<()> {
        self.insert_child(parent, child, None)?;
        self.recalculate_layout(parent);
        Ok(())
    }

    /// Detach `child` from `parent` and lay the parent out.
    ///
    /// Fails if `child` is not one of `parent`'s children. A pending animated
    /// removal of the child is completed immediately.
    #[tracing::instrument(skip(self), target = "horizon_panels::tree", level = "debug")]
    pub fn remove_child(&mut self, parent: PanelId, child: PanelId) -> TreeResult<()> {
        self.node(parent)?;
        if !self.children(parent).contains(&child) {
            return Err(TreeError::NotAChild { parent, child });
        }
        if self.pending_removals.remove(&child).is_some() {
            self.animator.cancel(child);
            self.apply_visibility(child, Visibility::Hidden, 0.0);
        }
        self.detach(child);
        self.recalculate_layout(parent);
        Ok(())
    }

    /// Install `background` behind all children of `container`, or clear it
    /// with `None`. The previous background is detached.
    ///
    /// The background is sized to the container whenever the container's
    /// size is pushed.
    pub fn set_background(
        &mut self,
        container: PanelId,
        background: Option<PanelId>,
    ) -> TreeResult<()> {
        if !self.node(container)?.kind.is_container() {
            return Err(TreeError::NotAContainer(container));
        }
        if let Some(bg) = background {
            let bg_node = self.node(bg)?;
            if bg == self.root {
                return Err(TreeError::RootImmutable);
            }
            if let Some(current) = bg_node.parent {
                return Err(TreeError::AlreadyParented { child: bg, current });
            }
            if bg == container || self.is_ancestor(bg, container) {
                return Err(TreeError::CircularParentage);
            }
        }

        if let Some(old) = self.background(container) {
            self.detach(old);
        }
        let Some(bg) = background else {
            return Ok(());
        };

        let container_drawable = self.node(container)?.drawable;
        let before = self
            .children(container)
            .first()
            .and_then(|&c| self.drawable(c));
        let root = self.root_of(container);
        if let Some(node) = self.nodes.get_mut(container) {
            node.background = Some(bg);
        }
        if let Some(node) = self.nodes.get_mut(bg) {
            node.parent = Some(container);
        }
        self.set_root_recursive(bg, root);
        if let Some(bg_drawable) = self.drawable(bg) {
            self.surface.insert_child(container_drawable, bg_drawable, before);
        }
        self.sync_size(container);
        Ok(())
    }

    /// Detach and free a panel with its whole subtree and drawables.
    ///
    /// Focus inside the subtree is released through
    /// [`defocus`](Self::defocus) first.
    #[tracing::instrument(skip(self), target = "horizon_panels::tree", level = "debug")]
    pub fn destroy(&mut self, id: PanelId) -> TreeResult<()> {
        self.node(id)?;
        if id == self.root {
            return Err(TreeError::RootImmutable);
        }
        if let Some(focused) = self.focused {
            if focused == id || self.is_ancestor(id, focused) {
                self.defocus();
            }
        }
        // A defocus handler may have destroyed the panel already.
        if !self.contains(id) {
            return Ok(());
        }
        if let Some(parent) = self.detach(id) {
            self.recalculate_layout(parent);
        }

        let mut stack = vec![id];
        let mut freed = 0usize;
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.remove(current) else {
                continue;
            };
            stack.extend(node.children.iter().copied());
            stack.extend(node.background);
            self.animator.cancel(current);
            self.pending_removals.remove(&current);
            self.surface.destroy(node.drawable);
            freed += 1;
        }
        tracing::debug!(target: targets::TREE, ?id, freed, "subtree destroyed");
        Ok(())
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// Link a validated child into `parent` at `index`.
    pub(crate) fn attach(&mut self, parent: PanelId, child: PanelId, index: usize) {
        let Some(parent_node) = self.nodes.get(parent) else {
            return;
        };
        let parent_drawable = parent_node.drawable;
        let root = parent_node.root;
        let before = parent_node
            .children
            .get(index)
            .and_then(|&c| self.nodes.get(c))
            .map(|n| n.drawable);
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.insert(index, child);
        }
        let Some(child_node) = self.nodes.get_mut(child) else {
            return;
        };
        child_node.parent = Some(parent);
        let child_drawable = child_node.drawable;
        self.set_root_recursive(child, root);
        self.surface.insert_child(parent_drawable, child_drawable, before);
        self.sync_position(child);
    }

    /// Unlink a panel from its owner. Returns the former owner.
    ///
    /// Does not lay the owner out.
    pub(crate) fn detach(&mut self, child: PanelId) -> Option<PanelId> {
        let parent = self.nodes.get(child)?.parent?;
        let child_drawable = self.nodes.get(child)?.drawable;
        let parent_drawable = self.nodes.get(parent)?.drawable;
        if let Some(node) = self.nodes.get_mut(parent) {
            if node.background == Some(child) {
                node.background = None;
            } else {
                node.children.retain(|&c| c != child);
            }
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
        self.set_root_recursive(child, None);
        self.surface.remove_child(parent_drawable, child_drawable);
        if matches!(self.kind(parent), Some(PanelKind::Split(_))) {
            self.normalize_relative_sizes(parent);
        }
        tracing::trace!(target: targets::TREE, ?child, ?parent, "detached");
        Some(parent)
    }

    /// Stop a fade-out and drop its scheduled removal, then detach the child
    /// so it can be re-attached elsewhere. The old owner is laid out unless
    /// it is `next_parent`.
    pub(crate) fn cancel_pending_removal(&mut self, child: PanelId, next_parent: PanelId) {
        if self.pending_removals.remove(&child).is_none() {
            return;
        }
        self.animator.cancel(child);
        self.apply_visibility(child, Visibility::Visible, 1.0);
        tracing::debug!(target: targets::TREE, ?child, "pending removal cancelled");
        if let Some(old) = self.detach(child) {
            if old != next_parent {
                self.recalculate_layout(old);
            }
        }
    }

    pub(crate) fn set_root_recursive(&mut self, id: PanelId, root: Option<PanelId>) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get_mut(current) else {
                continue;
            };
            node.root = root;
            stack.extend(node.children.iter().copied());
            stack.extend(node.background);
        }
    }
}
