//! One-axis flex layout.
//!
//! Children are placed one after another along the layout axis, separated by
//! `spacing`. Along the cross axis they are aligned within the largest child
//! (or within the container when its cross size stays fixed).

use horizon_panels_core::{Axis, PanelId, Vec2};

use crate::panel::{PanelKind, PanelTree};

/// How the extent along the layout axis is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisSizing {
    /// The container takes the summed extent of its children.
    #[default]
    ShrinkToFit,
    /// Children are packed at the front of a fixed-size container.
    AlignFront,
    /// Children are centered in a fixed-size container.
    AlignCenter,
    /// Children are packed at the back of a fixed-size container.
    AlignBack,
    /// The child at this index absorbs the free extent of a fixed-size
    /// container. Negative indices count from the end.
    Stretch(isize),
}

/// Placement of children along the cross axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrossAlignment {
    /// Offset as a fraction of the free cross extent, from `-0.5` (front) to
    /// `0.5` (back).
    Offset(f32),
    /// Every child takes the full cross extent.
    Stretch,
}

impl Default for CrossAlignment {
    fn default() -> Self {
        Self::Offset(0.0)
    }
}

/// Configuration of a tiling container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilingLayout {
    /// Layout axis.
    pub axis: Axis,
    /// Sizing mode along the axis.
    pub size_along_axis: AxisSizing,
    /// Keep the container's cross size instead of fitting the largest child.
    pub other_axis_size_stays: bool,
    /// Cross-axis placement.
    pub other_axis_alignment: CrossAlignment,
    /// Gap between consecutive children.
    pub spacing: f32,
    /// Inner padding on each side.
    pub padding: Vec2,
}

impl TilingLayout {
    /// A shrink-to-fit layout along `axis` with no spacing or padding.
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            size_along_axis: AxisSizing::default(),
            other_axis_size_stays: false,
            other_axis_alignment: CrossAlignment::default(),
            spacing: 0.0,
            padding: Vec2::ZERO,
        }
    }

    /// Set the sizing mode.
    pub fn with_sizing(mut self, sizing: AxisSizing) -> Self {
        self.size_along_axis = sizing;
        self
    }

    /// Set the cross-axis placement.
    pub fn with_alignment(mut self, alignment: CrossAlignment) -> Self {
        self.other_axis_alignment = alignment;
        self
    }

    /// Keep the container's cross size.
    pub fn with_fixed_cross_size(mut self, stays: bool) -> Self {
        self.other_axis_size_stays = stays;
        self
    }

    /// Set the gap between children.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the padding.
    pub fn with_padding(mut self, padding: Vec2) -> Self {
        self.padding = padding;
        self
    }
}

fn resolve_index(index: isize, len: usize) -> Option<usize> {
    let resolved = if index < 0 {
        len.checked_sub(index.unsigned_abs())?
    } else {
        index.unsigned_abs()
    };
    (resolved < len).then_some(resolved)
}

impl PanelTree {
    pub(crate) fn layout_tiling(&mut self, id: PanelId) {
        let Some(PanelKind::Tiling(layout)) = self.kind(id) else {
            return;
        };
        let layout = *layout;
        let axis = layout.axis;
        let cross = axis.cross();
        let own = self.size(id).unwrap_or(Vec2::ZERO);
        let pad_along = axis.get(layout.padding);
        let pad_across = cross.get(layout.padding);

        let children = self.children(id).to_vec();
        let mut extents: Vec<Vec2> = children
            .iter()
            .map(|&c| self.size(c).unwrap_or(Vec2::ZERO))
            .collect();
        let gaps = layout.spacing * children.len().saturating_sub(1) as f32;
        let mut summed = extents.iter().map(|&e| axis.get(e)).sum::<f32>() + gaps;

        if let AxisSizing::Stretch(index) = layout.size_along_axis {
            if let Some(i) = resolve_index(index, children.len()) {
                let available = axis.get(own) - 2.0 * pad_along;
                let current = axis.get(extents[i]);
                let stretched = (current + available - summed).max(0.0);
                axis.set(&mut extents[i], stretched);
                summed += stretched - current;
            }
        }

        let max_cross = if layout.other_axis_size_stays {
            (cross.get(own) - 2.0 * pad_across).max(0.0)
        } else {
            extents.iter().map(|&e| cross.get(e)).fold(0.0, f32::max)
        };

        let half = axis.get(own) * 0.5;
        let mut offset = match layout.size_along_axis {
            AxisSizing::ShrinkToFit | AxisSizing::AlignCenter | AxisSizing::Stretch(_) => {
                -summed * 0.5
            }
            AxisSizing::AlignFront => -(half - pad_along),
            AxisSizing::AlignBack => half - pad_along - summed,
        };

        for (&child, mut extent) in children.iter().zip(extents) {
            let along = offset + axis.get(extent) * 0.5;
            let across = match layout.other_axis_alignment {
                CrossAlignment::Offset(alignment) => (max_cross - cross.get(extent)) * alignment,
                CrossAlignment::Stretch => {
                    cross.set(&mut extent, max_cross);
                    0.0
                }
            };
            offset += axis.get(extent) + layout.spacing;
            self.place_child(child, axis.compose(along, across), extent);
        }

        if layout.size_along_axis == AxisSizing::ShrinkToFit {
            let across = if layout.other_axis_size_stays {
                cross.get(own)
            } else {
                max_cross + 2.0 * pad_across
            };
            if let Some(node) = self.nodes.get_mut(id) {
                node.size = axis.compose(summed + 2.0 * pad_along, across);
            }
            self.sync_size(id);
        }
    }
}
