//! Layout policies.
//!
//! Each container kind carries its policy state inside [`PanelKind`]. A
//! layout pass positions and sizes the direct children of one container.
//! Children whose size changed are laid out in turn, but a pass never
//! touches the container's ancestors.
//!
//! | Kind | Size flows |
//! |------|------------|
//! | [`TilingLayout`] with [`AxisSizing::ShrinkToFit`] | children → container |
//! | [`TilingLayout`] otherwise | container → stretched children |
//! | [`AdaptiveLayout`] | children → container |
//! | [`SplitLayout`] | container → children |
//! | [`ViewState`] | container → scrollbars |

mod adaptive;
mod split;
mod tiling;
mod view;

use horizon_panels_core::logging::{targets, PerfSpan};
use horizon_panels_core::{PanelId, Vec2};

use crate::panel::{PanelKind, PanelTree};

pub use adaptive::AdaptiveLayout;
pub use split::{PaneFactory, SplitHandle, SplitLayout};
pub use tiling::{AxisSizing, CrossAlignment, TilingLayout};
pub use view::{ScrollbarPolicy, ScrollbarState, ViewState};

type LayoutPass = fn(&mut PanelTree, PanelId);

impl PanelTree {
    /// Lay out the direct children of a container according to its kind.
    ///
    /// Plain containers and leaves are left alone.
    pub fn recalculate_layout(&mut self, id: PanelId) {
        let pass: LayoutPass = match self.kind(id) {
            Some(PanelKind::Root) => Self::layout_root,
            Some(PanelKind::Tiling(_)) => Self::layout_tiling,
            Some(PanelKind::Adaptive(_)) => Self::layout_adaptive,
            Some(PanelKind::Split(_)) => Self::layout_split,
            Some(PanelKind::View(_)) => Self::layout_view,
            _ => return,
        };
        let _span = PerfSpan::new("recalculate_layout");
        tracing::trace!(target: targets::LAYOUT, ?id, "layout pass");
        pass(self, id);
    }

    /// Push a panel's size to its drawable and background, then lay out the
    /// children of containers whose size is imposed from outside.
    pub fn update_size(&mut self, id: PanelId) {
        self.sync_size(id);
        let imposed = matches!(
            self.kind(id),
            Some(PanelKind::Root | PanelKind::Tiling(_) | PanelKind::Split(_) | PanelKind::View(_))
        );
        if imposed {
            self.recalculate_layout(id);
        }
    }

    /// Set position and size of a child during a layout pass, pushing only
    /// what changed.
    pub(crate) fn place_child(&mut self, child: PanelId, position: Vec2, size: Vec2) {
        let Some(node) = self.nodes.get_mut(child) else {
            return;
        };
        let moved = node.position != position;
        let resized = node.size != size;
        node.position = position;
        node.size = size;
        if moved {
            self.sync_position(child);
        }
        if resized {
            self.update_size(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use horizon_panels_core::{Axis, DrawableKind};

    use super::*;

    #[test]
    fn test_plain_container_is_not_laid_out() {
        let mut tree = PanelTree::headless(Vec2::new(100.0, 100.0));
        let container = tree.new_container(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let a = tree.new_leaf(DrawableKind::Rect, Vec2::new(3.0, 4.0), Vec2::ONE);
        tree.insert_child(container, a, None).unwrap();
        tree.recalculate_layout(container);
        assert_eq!(tree.position(a), Some(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn test_update_size_lays_out_imposed_containers() {
        let mut tree = PanelTree::headless(Vec2::new(100.0, 100.0));
        let layout = TilingLayout::new(Axis::Horizontal).with_sizing(AxisSizing::AlignFront);
        let row = tree.new_tiling(layout, Vec2::ZERO, Vec2::new(100.0, 10.0));
        let a = tree.new_leaf(DrawableKind::Rect, Vec2::ZERO, Vec2::new(10.0, 10.0));
        tree.insert_child(row, a, None).unwrap();

        tree.set_size(row, Vec2::new(40.0, 10.0)).unwrap();
        assert_eq!(tree.position(a), Some(Vec2::new(-15.0, 0.0)));
    }
}
