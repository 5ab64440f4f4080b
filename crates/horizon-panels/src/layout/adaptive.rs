//! Containers sized to fit their children.

use horizon_panels_core::{Bounds, PanelId, Vec2};

use crate::panel::{PanelKind, PanelTree};

/// Configuration of an adaptive-size container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AdaptiveLayout {
    /// Space kept around the children on each side.
    pub padding: Vec2,
}

impl PanelTree {
    /// Union the children's bounds, grow by the padding, take that as the
    /// container size and re-center the children on the local origin.
    pub(crate) fn layout_adaptive(&mut self, id: PanelId) {
        let Some(PanelKind::Adaptive(layout)) = self.kind(id) else {
            return;
        };
        let padding = layout.padding;
        let children = self.children(id).to_vec();
        let union = children
            .iter()
            .filter_map(|&c| self.get_bounds(c))
            .reduce(|a, b| a.union(&b))
            .unwrap_or(Bounds::from_center_size(Vec2::ZERO, Vec2::ZERO));
        let bounds = union.expanded(padding);
        let shift = bounds.center();

        if shift != Vec2::ZERO {
            for child in children {
                if let Some(node) = self.nodes.get_mut(child) {
                    node.position -= shift;
                }
                self.sync_position(child);
            }
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.size = bounds.size();
        }
        self.sync_size(id);
    }
}

#[cfg(test)]
mod tests {
    use horizon_panels_core::DrawableKind;

    use super::*;

    #[test]
    fn test_fits_children_and_recenters() {
        let mut tree = PanelTree::headless(Vec2::new(200.0, 200.0));
        let container = tree.new_adaptive(Vec2::new(2.0, 1.0), Vec2::ZERO);
        let a = tree.new_leaf(DrawableKind::Rect, Vec2::new(10.0, 0.0), Vec2::new(4.0, 4.0));
        let b = tree.new_leaf(DrawableKind::Rect, Vec2::new(20.0, 10.0), Vec2::new(4.0, 4.0));
        tree.insert_child(container, a, None).unwrap();
        tree.insert_child(container, b, None).unwrap();
        tree.recalculate_layout(container);

        // Union is [8,-2]..[22,12], padded to [6,-3]..[24,13].
        assert_eq!(tree.size(container), Some(Vec2::new(18.0, 16.0)));
        assert_eq!(tree.position(a), Some(Vec2::new(-5.0, -5.0)));
        assert_eq!(tree.position(b), Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_background_excluded_and_sized() {
        let mut tree = PanelTree::headless(Vec2::new(200.0, 200.0));
        let container = tree.new_adaptive(Vec2::ZERO, Vec2::ZERO);
        let a = tree.new_leaf(DrawableKind::Rect, Vec2::ZERO, Vec2::new(6.0, 2.0));
        let bg = tree.new_leaf(DrawableKind::Rect, Vec2::ZERO, Vec2::new(100.0, 100.0));
        tree.insert_child(container, a, None).unwrap();
        tree.set_background(container, Some(bg)).unwrap();
        tree.recalculate_layout(container);

        assert_eq!(tree.size(container), Some(Vec2::new(6.0, 2.0)));
        assert_eq!(tree.size(bg), Some(Vec2::new(6.0, 2.0)));
    }

    #[test]
    fn test_empty_is_padding_only() {
        let mut tree = PanelTree::headless(Vec2::new(200.0, 200.0));
        let container = tree.new_adaptive(Vec2::new(3.0, 3.0), Vec2::ZERO);
        tree.recalculate_layout(container);
        assert_eq!(tree.size(container), Some(Vec2::new(6.0, 6.0)));
    }
}
