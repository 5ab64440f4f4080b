//! Weighted split view with split and merge gestures.
//!
//! Every pane carries a relative weight, and the weights of one split view
//! sum to one after every structural change. The extent left after spacing
//! and padding is distributed by weight.
//!
//! Dragging the gap between two panes moves their shared boundary. Starting
//! the drag close to one of the cross-axis edges first inserts a new empty
//! pane at the boundary, which the drag then grows. Releasing with a pane
//! smaller than [`merge_size_threshold`](crate::ToolkitConfig::merge_size_threshold)
//! merges it into its neighbor; a split view left with a single pane is
//! replaced by that pane in its parent.

use std::fmt;
use std::rc::Rc;

use horizon_panels_core::logging::targets;
use horizon_panels_core::{Axis, DrawableKind, PanelId, TreeError, TreeResult, Vec2};

use crate::event::{EventKind, PanelEvent};
use crate::panel::{PanelKind, PanelTree};

/// Creates the panel inserted by a split gesture.
pub type PaneFactory = Rc<dyn Fn(&mut PanelTree) -> PanelId>;

/// Configuration of a split view.
#[derive(Clone)]
pub struct SplitLayout {
    /// Axis along which panes are arranged.
    pub axis: Axis,
    /// Gap between panes; also the drag handle.
    pub spacing: f32,
    /// Inner padding on each side.
    pub padding: Vec2,
    /// Creates panes for split gestures. Without a factory only boundary
    /// moves and merges are possible.
    pub pane_factory: Option<PaneFactory>,
}

impl fmt::Debug for SplitLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitLayout")
            .field("axis", &self.axis)
            .field("spacing", &self.spacing)
            .field("padding", &self.padding)
            .field("pane_factory", &self.pane_factory.is_some())
            .finish()
    }
}

impl SplitLayout {
    /// A split along `axis` without spacing, padding or pane factory.
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            spacing: 0.0,
            padding: Vec2::ZERO,
            pane_factory: None,
        }
    }

    /// Set the gap between panes.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the padding.
    pub fn with_padding(mut self, padding: Vec2) -> Self {
        self.padding = padding;
        self
    }

    /// Enable split gestures with a pane factory.
    pub fn with_pane_factory(
        mut self,
        factory: impl Fn(&mut PanelTree) -> PanelId + 'static,
    ) -> Self {
        self.pane_factory = Some(Rc::new(factory));
        self
    }
}

/// What a drag starting at a handle does.
///
/// Boundary `b` lies in front of pane `b`; boundary `0` is the front edge of
/// the first pane and boundary `n` the back edge of the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitHandle {
    /// Move the boundary between panes `b - 1` and `b`.
    Move(usize),
    /// Insert a pane at `b` that grows into the following pane.
    InsertBefore(usize),
    /// Insert a pane at `b` that grows into the preceding pane.
    InsertAfter(usize),
}

/// Geometry captured when a boundary drag starts.
#[derive(Debug, Clone, Copy)]
struct SplitDrag {
    boundary: usize,
    origin: f32,
    prev_extent: f32,
    next_extent: f32,
    prev_position: f32,
    next_position: f32,
    weight_sum: f32,
    extent_sum: f32,
}

struct SplitGeometry {
    axis: Axis,
    spacing: f32,
    padding: Vec2,
    size: Vec2,
}

impl SplitGeometry {
    fn available(&self, panes: usize) -> f32 {
        let gaps = self.spacing * panes.saturating_sub(1) as f32;
        (self.axis.get(self.size) - gaps - 2.0 * self.axis.get(self.padding)).max(0.0)
    }
}

impl PanelTree {
    /// Create a split view.
    pub fn new_split_view(&mut self, layout: SplitLayout, position: Vec2, size: Vec2) -> PanelId {
        self.create_panel(PanelKind::Split(layout), DrawableKind::Group, position, size)
    }

    /// Install or clear the pane factory of a split view.
    pub fn set_pane_factory(
        &mut self,
        split: PanelId,
        factory: Option<PaneFactory>,
    ) -> TreeResult<()> {
        match self.kind_mut(split) {
            Some(PanelKind::Split(layout)) => {
                layout.pane_factory = factory;
                Ok(())
            }
            Some(_) => Err(TreeError::NotAContainer(split)),
            None => Err(TreeError::InvalidPanelId(split)),
        }
    }

    /// Weights of the panes, in child order.
    pub fn split_weights(&self, split: PanelId) -> Vec<f32> {
        self.children(split)
            .iter()
            .filter_map(|&c| self.relative_size(c))
            .collect()
    }

    /// Replace all pane weights, normalize them and lay the panes out.
    pub fn set_split_weights(&mut self, split: PanelId, weights: &[f32]) -> TreeResult<()> {
        if !matches!(self.node(split)?.kind, PanelKind::Split(_)) {
            return Err(TreeError::NotAContainer(split));
        }
        let children = self.children(split).to_vec();
        if weights.len() != children.len() {
            return Err(TreeError::IndexOutOfRange {
                index: weights.len(),
                len: children.len(),
            });
        }
        for (&child, &weight) in children.iter().zip(weights) {
            if let Some(node) = self.nodes.get_mut(child) {
                node.relative_size = weight;
            }
        }
        self.normalize_relative_sizes(split);
        self.layout_split(split);
        Ok(())
    }

    /// Rescale the pane weights of a split view so they sum to one.
    ///
    /// Negative weights count as zero. If nothing is left, the panes share
    /// equally.
    pub fn normalize_relative_sizes(&mut self, split: PanelId) {
        let children = self.children(split).to_vec();
        if children.is_empty() {
            return;
        }
        let sum: f32 = children
            .iter()
            .filter_map(|&c| self.relative_size(c))
            .map(|w| w.max(0.0))
            .sum();
        let equal = 1.0 / children.len() as f32;
        for child in children {
            if let Some(node) = self.nodes.get_mut(child) {
                node.relative_size = if sum > 0.0 {
                    node.relative_size.max(0.0) / sum
                } else {
                    equal
                };
            }
        }
    }

    /// Give `child` the weight `weight` and scale the other panes so they
    /// share the rest in their current proportions.
    pub(crate) fn assign_split_weight(&mut self, split: PanelId, child: PanelId, weight: f32) {
        let weight = weight.clamp(0.0, 1.0);
        let others: Vec<PanelId> = self
            .children(split)
            .iter()
            .copied()
            .filter(|&c| c != child)
            .collect();
        let others_sum: f32 = others
            .iter()
            .filter_map(|&c| self.relative_size(c))
            .map(|w| w.max(0.0))
            .sum();
        let equal = 1.0 / others.len().max(1) as f32;
        for other in others {
            if let Some(node) = self.nodes.get_mut(other) {
                let share = if others_sum > 0.0 {
                    node.relative_size.max(0.0) / others_sum
                } else {
                    equal
                };
                node.relative_size = share * (1.0 - weight);
            }
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.relative_size = weight;
        }
        self.normalize_relative_sizes(split);
    }

    fn split_geometry(&self, split: PanelId) -> Option<SplitGeometry> {
        let node = self.nodes.get(split)?;
        let PanelKind::Split(layout) = &node.kind else {
            return None;
        };
        Some(SplitGeometry {
            axis: layout.axis,
            spacing: layout.spacing,
            padding: layout.padding,
            size: node.size,
        })
    }

    pub(crate) fn layout_split(&mut self, id: PanelId) {
        let Some(geometry) = self.split_geometry(id) else {
            return;
        };
        let axis = geometry.axis;
        let cross = axis.cross();
        let children = self.children(id).to_vec();
        let available = geometry.available(children.len());
        let across = (cross.get(geometry.size) - 2.0 * cross.get(geometry.padding)).max(0.0);
        let mut offset = -axis.get(geometry.size) * 0.5 + axis.get(geometry.padding);

        for child in children {
            let extent = available * self.relative_size(child).unwrap_or(0.0);
            let position = axis.compose(offset + extent * 0.5, 0.0);
            self.place_child(child, position, axis.compose(extent, across));
            offset += extent + geometry.spacing;
        }
    }

    /// Coordinates of the pane boundaries along the split axis, in the split
    /// view's local space. Inner boundaries lie in the middle of the gaps.
    pub fn split_boundaries(&self, split: PanelId) -> Vec<f32> {
        let Some(geometry) = self.split_geometry(split) else {
            return Vec::new();
        };
        let axis = geometry.axis;
        let edges: Vec<(f32, f32)> = self
            .children(split)
            .iter()
            .filter_map(|&c| self.get_bounds(c))
            .map(|b| (axis.get(b.min), axis.get(b.max)))
            .collect();
        let (Some(first), Some(last)) = (edges.first(), edges.last()) else {
            return Vec::new();
        };
        let mut boundaries = Vec::with_capacity(edges.len() + 1);
        boundaries.push(first.0);
        boundaries.extend(edges.windows(2).map(|w| (w[0].1 + w[1].0) * 0.5));
        boundaries.push(last.1);
        boundaries
    }

    /// Classify a point in the split view's local space as a drag handle.
    pub fn split_handle_at(&self, split: PanelId, local: Vec2) -> Option<SplitHandle> {
        let geometry = self.split_geometry(split)?;
        let has_factory = matches!(
            self.kind(split),
            Some(PanelKind::Split(layout)) if layout.pane_factory.is_some()
        );
        let axis = geometry.axis;
        let cross = axis.cross();
        let panes = self.children(split).len();
        let band = self.config.split_handle_size;
        let reach = geometry.spacing.max(band) * 0.5;

        let along = axis.get(local);
        let (boundary, distance) = self
            .split_boundaries(split)
            .into_iter()
            .map(|c| (along - c).abs())
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        if distance > reach {
            return None;
        }

        let half_cross = cross.get(geometry.size) * 0.5;
        let across = cross.get(local);
        if has_factory && across <= -half_cross + band && boundary < panes {
            return Some(SplitHandle::InsertBefore(boundary));
        }
        if has_factory && across >= half_cross - band && boundary > 0 {
            return Some(SplitHandle::InsertAfter(boundary));
        }
        (boundary > 0 && boundary < panes).then_some(SplitHandle::Move(boundary))
    }

    /// Merge pane `merged` into its sibling `survivor`.
    ///
    /// The survivor gains the merged extent plus one spacing; all other panes
    /// keep their extent. A split view left with one pane is replaced by it.
    pub fn merge_split_pane(
        &mut self,
        split: PanelId,
        survivor: PanelId,
        merged: PanelId,
    ) -> TreeResult<()> {
        let geometry = self
            .split_geometry(split)
            .ok_or(TreeError::NotAContainer(split))?;
        for pane in [survivor, merged] {
            if !self.children(split).contains(&pane) {
                return Err(TreeError::NotAChild { parent: split, child: pane });
            }
        }
        let axis = geometry.axis;
        let children = self.children(split).to_vec();
        let merged_extent = self.size(merged).map_or(0.0, |s| axis.get(s));
        let extents: Vec<(PanelId, f32)> = children
            .iter()
            .filter(|&&c| c != merged)
            .map(|&c| {
                let mut extent = self.size(c).map_or(0.0, |s| axis.get(s));
                if c == survivor {
                    extent += merged_extent + geometry.spacing;
                }
                (c, extent)
            })
            .collect();
        let available = geometry.available(extents.len());

        self.detach(merged);
        if available > 0.0 {
            for &(child, extent) in &extents {
                if let Some(node) = self.nodes.get_mut(child) {
                    node.relative_size = extent / available;
                }
            }
            self.normalize_relative_sizes(split);
        }
        self.destroy(merged)?;
        tracing::debug!(target: targets::LAYOUT, ?split, ?merged, ?survivor, "split pane merged");

        if extents.len() == 1 {
            self.collapse_split(split);
        } else {
            self.layout_split(split);
        }
        Ok(())
    }

    /// Replace a single-pane split view by its pane.
    fn collapse_split(&mut self, split: PanelId) {
        let &[only] = self.children(split) else {
            return;
        };
        let Some(parent) = self.parent(split) else {
            self.layout_split(split);
            return;
        };
        let Some(index) = self.index_of(split) else {
            return;
        };
        let (Some(position), Some(size), Some(weight)) =
            (self.position(split), self.size(split), self.relative_size(split))
        else {
            return;
        };

        self.detach(only);
        self.detach(split);
        if self.insert_child(parent, only, Some(index)).is_err() {
            return;
        }
        if matches!(self.kind(parent), Some(PanelKind::Split(_))) {
            self.assign_split_weight(parent, only, weight);
        }
        self.place_child(only, position, size);
        let _ = self.destroy(split);
        self.recalculate_layout(parent);
        tracing::debug!(target: targets::LAYOUT, ?split, ?only, "split view collapsed");
    }

    fn insert_split_pane(&mut self, split: PanelId, index: usize) -> Option<PanelId> {
        let factory = match self.kind(split) {
            Some(PanelKind::Split(layout)) => layout.pane_factory.clone()?,
            _ => return None,
        };
        let pane = factory(self);
        if let Err(error) = self.insert_child(split, pane, Some(index)) {
            tracing::warn!(
                target: targets::LAYOUT,
                ?split,
                %error,
                "pane factory returned an unusable panel"
            );
            return None;
        }
        self.assign_split_weight(split, pane, 0.0);
        self.layout_split(split);
        tracing::debug!(target: targets::LAYOUT, ?split, ?pane, index, "split pane inserted");
        Some(pane)
    }

    fn capture_split_drag(
        &self,
        split: PanelId,
        boundary: usize,
        origin: f32,
    ) -> Option<SplitDrag> {
        let axis = self.split_geometry(split)?.axis;
        let children = self.children(split);
        let prev = *children.get(boundary.checked_sub(1)?)?;
        let next = *children.get(boundary)?;
        let prev_extent = axis.get(self.size(prev)?);
        let next_extent = axis.get(self.size(next)?);
        Some(SplitDrag {
            boundary,
            origin,
            prev_extent,
            next_extent,
            prev_position: axis.get(self.position(prev)?),
            next_position: axis.get(self.position(next)?),
            weight_sum: self.relative_size(prev)? + self.relative_size(next)?,
            extent_sum: prev_extent + next_extent,
        })
    }

    fn drag_split_boundary(&mut self, split: PanelId, drag: &SplitDrag, along: f32) {
        let Some(geometry) = self.split_geometry(split) else {
            return;
        };
        let axis = geometry.axis;
        let children = self.children(split);
        let (Some(&prev), Some(&next)) =
            (children.get(drag.boundary - 1), children.get(drag.boundary))
        else {
            return;
        };
        let diff = (along - drag.origin).clamp(-drag.prev_extent, drag.next_extent);
        let prev_extent = drag.prev_extent + diff;
        let next_extent = drag.next_extent - diff;
        let prev_weight = if drag.extent_sum > 0.0 {
            drag.weight_sum * prev_extent / drag.extent_sum
        } else {
            drag.weight_sum * 0.5
        };

        for (pane, extent, center, weight) in [
            (prev, prev_extent, drag.prev_position, prev_weight),
            (next, next_extent, drag.next_position, drag.weight_sum - prev_weight),
        ] {
            let (Some(mut position), Some(mut size)) = (self.position(pane), self.size(pane)) else {
                continue;
            };
            axis.set(&mut position, center + diff * 0.5);
            axis.set(&mut size, extent);
            if let Some(node) = self.nodes.get_mut(pane) {
                node.relative_size = weight;
            }
            self.place_child(pane, position, size);
        }
    }

    fn release_split_boundary(&mut self, split: PanelId, drag: &SplitDrag) {
        let Some(axis) = self.split_geometry(split).map(|g| g.axis) else {
            return;
        };
        let children = self.children(split);
        let (Some(&prev), Some(&next)) =
            (children.get(drag.boundary - 1), children.get(drag.boundary))
        else {
            return;
        };
        let prev_extent = self.size(prev).map_or(0.0, |s| axis.get(s));
        let next_extent = self.size(next).map_or(0.0, |s| axis.get(s));
        let (survivor, merged, smaller) = if prev_extent <= next_extent {
            (next, prev, prev_extent)
        } else {
            (prev, next, next_extent)
        };
        if smaller < self.config.merge_size_threshold {
            let _ = self.merge_split_pane(split, survivor, merged);
        }
    }

    /// Built-in pointer behavior of split views.
    pub(crate) fn split_event(&mut self, split: PanelId, event: &mut PanelEvent) -> bool {
        let Some(axis) = self.split_geometry(split).map(|g| g.axis) else {
            return false;
        };
        let local = self.map_to_local(split, event.position);
        match event.kind {
            EventKind::PointerStart => {
                let Some(handle) = self.split_handle_at(split, local) else {
                    return false;
                };
                let boundary = match handle {
                    SplitHandle::Move(b) => b,
                    SplitHandle::InsertBefore(b) => match self.insert_split_pane(split, b) {
                        Some(_) => b + 1,
                        None => return false,
                    },
                    SplitHandle::InsertAfter(b) => match self.insert_split_pane(split, b) {
                        Some(_) => b,
                        None => return false,
                    },
                };
                let Some(drag) = self.capture_split_drag(split, boundary, axis.get(local)) else {
                    return false;
                };
                tracing::trace!(target: targets::LAYOUT, ?split, ?handle, "split drag started");
                event.set_scratch(drag);
                true
            }
            EventKind::PointerMove | EventKind::PointerEnd => {
                let Some(drag) = event.scratch::<SplitDrag>().copied() else {
                    return false;
                };
                self.drag_split_boundary(split, &drag, axis.get(local));
                if event.kind == EventKind::PointerEnd {
                    self.release_split_boundary(split, &drag);
                }
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use horizon_panels_core::DrawableKind;

    use super::*;
    use crate::event::{InputEvent, InputRouter};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn pane(tree: &mut PanelTree) -> PanelId {
        tree.new_leaf(DrawableKind::Rect, Vec2::ZERO, Vec2::ZERO)
    }

    /// A horizontal split of size 200x100 centered at window (100, 50).
    fn split_with(
        tree: &mut PanelTree,
        layout: SplitLayout,
        panes: usize,
    ) -> (PanelId, Vec<PanelId>) {
        let split = tree.new_split_view(layout, Vec2::new(100.0, 50.0), Vec2::new(200.0, 100.0));
        tree.insert_child(tree.content(), split, None).unwrap();
        let panes = (0..panes)
            .map(|_| {
                let p = pane(tree);
                tree.insert_child(split, p, None).unwrap();
                p
            })
            .collect();
        tree.recalculate_layout(split);
        (split, panes)
    }

    fn drag(tree: &mut PanelTree, from: Vec2, to: Vec2) {
        let mut router = InputRouter::new();
        router.handle_input(tree, InputEvent::PointerDown { position: from, shift: false });
        router.handle_input(tree, InputEvent::PointerMove { position: to });
        router.handle_input(tree, InputEvent::PointerUp { position: to });
    }

    #[test]
    fn test_weights_sum_to_one_after_changes() {
        let mut tree = PanelTree::headless(Vec2::new(400.0, 400.0));
        let (split, panes) = split_with(&mut tree, SplitLayout::new(Axis::Horizontal), 3);
        let sum: f32 = tree.split_weights(split).iter().sum();
        assert!(approx(sum, 1.0));
        for w in tree.split_weights(split) {
            assert!(approx(w, 1.0 / 3.0));
        }

        tree.remove_child(split, panes[1]).unwrap();
        let weights = tree.split_weights(split);
        assert!(approx(weights[0], 0.5) && approx(weights[1], 0.5));

        tree.set_split_weights(split, &[3.0, 1.0]).unwrap();
        assert_eq!(tree.split_weights(split), vec![0.75, 0.25]);
        assert_eq!(
            tree.set_split_weights(split, &[1.0]),
            Err(TreeError::IndexOutOfRange { index: 1, len: 2 })
        );
    }

    #[test]
    fn test_layout_distributes_by_weight() {
        let mut tree = PanelTree::headless(Vec2::new(400.0, 400.0));
        let layout = SplitLayout::new(Axis::Horizontal).with_spacing(10.0);
        let (split, panes) = split_with(&mut tree, layout, 2);
        tree.set_split_weights(split, &[0.25, 0.75]).unwrap();

        // 200 - 10 spacing = 190 shared by weight.
        assert!(approx(tree.size(panes[0]).unwrap().x, 47.5));
        assert!(approx(tree.size(panes[1]).unwrap().x, 142.5));
        assert_eq!(tree.size(panes[0]).unwrap().y, 100.0);
        assert!(approx(tree.position(panes[0]).unwrap().x, -76.25));
        assert!(approx(tree.position(panes[1]).unwrap().x, 28.75));

        let boundaries = tree.split_boundaries(split);
        assert_eq!(boundaries.len(), 3);
        assert!(approx(boundaries[1], -47.5));
    }

    #[test]
    fn test_handle_classification() {
        let mut tree = PanelTree::headless(Vec2::new(400.0, 400.0));
        let layout = SplitLayout::new(Axis::Horizontal).with_pane_factory(|tree: &mut PanelTree| {
            tree.new_leaf(DrawableKind::Rect, Vec2::ZERO, Vec2::ZERO)
        });
        let (split, _) = split_with(&mut tree, layout, 2);

        assert_eq!(tree.split_handle_at(split, Vec2::new(0.0, 0.0)), Some(SplitHandle::Move(1)));
        assert_eq!(
            tree.split_handle_at(split, Vec2::new(1.0, -48.0)),
            Some(SplitHandle::InsertBefore(1))
        );
        assert_eq!(
            tree.split_handle_at(split, Vec2::new(-1.0, 48.0)),
            Some(SplitHandle::InsertAfter(1))
        );
        assert_eq!(tree.split_handle_at(split, Vec2::new(50.0, 0.0)), None);

        // Extreme boundaries only allow insertion towards an existing pane.
        assert_eq!(
            tree.split_handle_at(split, Vec2::new(-100.0, -48.0)),
            Some(SplitHandle::InsertBefore(0))
        );
        assert_eq!(tree.split_handle_at(split, Vec2::new(-100.0, 48.0)), None);
        assert_eq!(tree.split_handle_at(split, Vec2::new(100.0, -48.0)), None);
        assert_eq!(tree.split_handle_at(split, Vec2::new(-100.0, 0.0)), None);
    }

    #[test]
    fn test_drag_moves_boundary_and_preserves_weight_sum() {
        let mut tree = PanelTree::headless(Vec2::new(400.0, 400.0));
        let (split, panes) = split_with(&mut tree, SplitLayout::new(Axis::Horizontal), 2);

        drag(&mut tree, Vec2::new(100.0, 50.0), Vec2::new(130.0, 50.0));
        assert!(approx(tree.size(panes[0]).unwrap().x, 130.0));
        assert!(approx(tree.size(panes[1]).unwrap().x, 70.0));
        assert!(approx(tree.position(panes[0]).unwrap().x, -35.0));
        assert!(approx(tree.position(panes[1]).unwrap().x, 65.0));
        let weights = tree.split_weights(split);
        assert!(approx(weights[0], 0.65));
        assert!(approx(weights[0] + weights[1], 1.0));
    }

    #[test]
    fn test_drag_is_clamped_to_neighbor_extent() {
        let mut tree = PanelTree::headless(Vec2::new(400.0, 400.0));
        let (split, panes) = split_with(&mut tree, SplitLayout::new(Axis::Horizontal), 3);
        tree.config.merge_size_threshold = 0.0;
        let boundary = tree.split_boundaries(split)[1];
        let from = tree.map_to_window(split, Vec2::new(boundary, 0.0));

        drag(&mut tree, from, from + Vec2::new(500.0, 0.0));
        assert!(approx(tree.size(panes[1]).unwrap().x, 0.0));
        assert!(approx(tree.size(panes[0]).unwrap().x, 400.0 / 3.0));
        assert!(approx(tree.size(panes[2]).unwrap().x, 200.0 / 3.0));
    }

    #[test]
    fn test_merge_donates_extent_and_spacing() {
        let mut tree = PanelTree::headless(Vec2::new(400.0, 400.0));
        let layout = SplitLayout::new(Axis::Horizontal).with_spacing(10.0);
        let split = tree.new_split_view(layout, Vec2::new(150.0, 50.0), Vec2::new(220.0, 100.0));
        tree.insert_child(tree.content(), split, None).unwrap();
        let panes: Vec<PanelId> = (0..3)
            .map(|_| {
                let p = pane(&mut tree);
                tree.insert_child(split, p, None).unwrap();
                p
            })
            .collect();
        tree.set_split_weights(split, &[0.5, 0.45, 0.05]).unwrap();
        assert!(approx(tree.size(panes[2]).unwrap().x, 10.0));

        tree.merge_split_pane(split, panes[1], panes[2]).unwrap();
        assert!(!tree.contains(panes[2]));
        assert!(approx(tree.size(panes[0]).unwrap().x, 100.0));
        assert!(approx(tree.size(panes[1]).unwrap().x, 110.0));
        let sum: f32 = tree.split_weights(split).iter().sum();
        assert!(approx(sum, 1.0));
    }

    #[test]
    fn test_release_below_threshold_merges_and_collapses() {
        let mut tree = PanelTree::headless(Vec2::new(400.0, 400.0));
        let (split, panes) = split_with(&mut tree, SplitLayout::new(Axis::Horizontal), 2);
        let content = tree.content();

        // Leaves pane 1 at 5 px, under the default threshold of 16.
        drag(&mut tree, Vec2::new(100.0, 50.0), Vec2::new(195.0, 50.0));
        assert!(!tree.contains(split));
        assert!(!tree.contains(panes[1]));
        assert_eq!(tree.parent(panes[0]), Some(content));
        assert_eq!(tree.position(panes[0]), Some(Vec2::new(100.0, 50.0)));
        assert_eq!(tree.size(panes[0]), Some(Vec2::new(200.0, 100.0)));
    }

    #[test]
    fn test_insert_gesture_creates_pane() {
        let mut tree = PanelTree::headless(Vec2::new(400.0, 400.0));
        let layout = SplitLayout::new(Axis::Horizontal).with_pane_factory(|tree: &mut PanelTree| {
            tree.new_leaf(DrawableKind::Rect, Vec2::ZERO, Vec2::ZERO)
        });
        let (split, panes) = split_with(&mut tree, layout, 2);

        // Near the top edge at the inner boundary: the new pane grows into
        // the following pane.
        drag(&mut tree, Vec2::new(100.0, 3.0), Vec2::new(140.0, 3.0));
        let children = tree.children(split).to_vec();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0], panes[0]);
        assert_eq!(children[2], panes[1]);
        assert!(approx(tree.size(children[1]).unwrap().x, 40.0));
        assert!(approx(tree.size(panes[1]).unwrap().x, 60.0));
        let sum: f32 = tree.split_weights(split).iter().sum();
        assert!(approx(sum, 1.0));
    }

    #[test]
    fn test_nested_split_collapse_keeps_weight() {
        let mut tree = PanelTree::headless(Vec2::new(400.0, 400.0));
        let (outer, outer_panes) = split_with(&mut tree, SplitLayout::new(Axis::Vertical), 1);
        let inner = tree.new_split_view(SplitLayout::new(Axis::Horizontal), Vec2::ZERO, Vec2::ZERO);
        tree.insert_child(outer, inner, None).unwrap();
        tree.set_split_weights(outer, &[0.4, 0.6]).unwrap();
        let a = pane(&mut tree);
        let b = pane(&mut tree);
        tree.insert_child(inner, a, None).unwrap();
        tree.insert_child(inner, b, None).unwrap();
        tree.recalculate_layout(inner);

        tree.merge_split_pane(inner, a, b).unwrap();
        assert!(!tree.contains(inner));
        assert_eq!(tree.children(outer), &[outer_panes[0], a]);
        let weights = tree.split_weights(outer);
        assert!(approx(weights[0], 0.4));
        assert!(approx(weights[1], 0.6));
    }
}
