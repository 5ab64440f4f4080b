//! The panel tree.
//!
//! A [`PanelTree`] owns every panel in an arena keyed by [`PanelId`]. A
//! container owns the ordered sequence of its children; `parent` and `root`
//! are plain back-references. Each panel mirrors its geometry onto one
//! drawable of the tree's [`Surface`], and the surface's child order is kept
//! in lockstep with the ownership order.
//!
//! Positions are panel centers in the parent's coordinate space. The root's
//! own coordinate space is the window space: origin at the top-left corner,
//! y pointing down.
//!
//! # Example
//!
//! ```
//! use horizon_panels::prelude::*;
//!
//! let mut tree = PanelTree::headless(Vec2::new(800.0, 600.0));
//! let layout = TilingLayout::new(Axis::Horizontal);
//! let row = tree.new_tiling(layout, Vec2::new(400.0, 300.0), Vec2::ZERO);
//! tree.append_child(tree.content(), row).unwrap();
//!
//! for width in [10.0, 20.0, 30.0] {
//!     let leaf = tree.new_leaf(DrawableKind::Rect, Vec2::ZERO, Vec2::new(width, 10.0));
//!     tree.insert_child(row, leaf, None).unwrap();
//! }
//! tree.recalculate_layout(row);
//!
//! assert_eq!(tree.size(row), Some(Vec2::new(60.0, 10.0)));
//! ```

mod debug;
mod root;
mod structure;
mod visibility;

use std::collections::HashMap;
use std::rc::Rc;

use slotmap::SlotMap;

use horizon_panels_core::animation::Animator;
use horizon_panels_core::logging::targets;
use horizon_panels_core::surface::{attributes, classes};
use horizon_panels_core::{
    Affine2, AttributeValue, Bounds, DrawableHandle, DrawableKind, HeadlessSurface, PanelId,
    Surface, TreeError, TreeResult, Vec2,
};

use crate::config::{ConfigResult, ToolkitConfig};
use crate::drag_drop::DragSession;
use crate::event::{EventHandler, EventKind};
use crate::layout::{AdaptiveLayout, ScrollbarState, SplitLayout, TilingLayout, ViewState};

pub use visibility::Visibility;

/// Callback run when the overlay backdrop closes the overlays.
pub type OverlayCloseFn = Rc<dyn Fn(&mut PanelTree)>;

/// Which part of a panel takes part in hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitPolicy {
    /// The panel and its children can be hit.
    #[default]
    Normal,
    /// Only the children can be hit; empty areas fall through.
    ChildrenOnly,
    /// Neither the panel nor its children can be hit.
    None,
}

/// The role of a panel, including the state of its layout policy.
#[derive(Debug, Clone)]
pub enum PanelKind {
    /// A drawable leaf with no children.
    Leaf,
    /// A container that never moves its children.
    Container,
    /// The root of a tree.
    Root,
    /// One-axis flex layout.
    Tiling(TilingLayout),
    /// Container sized to the union of its children's bounds.
    Adaptive(AdaptiveLayout),
    /// Weighted, resizable split with split/merge gestures.
    Split(SplitLayout),
    /// Pan/zoom view over a content container.
    View(ViewState),
    /// Draggable scrollbar thumb of a view.
    Scrollbar(ScrollbarState),
}

impl PanelKind {
    /// Whether panels of this kind own children.
    pub fn is_container(&self) -> bool {
        !matches!(self, Self::Leaf | Self::Scrollbar(_))
    }

    /// Short name for logs and tree dumps.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Leaf => "Leaf",
            Self::Container => "Container",
            Self::Root => "Root",
            Self::Tiling(_) => "Tiling",
            Self::Adaptive(_) => "Adaptive",
            Self::Split(_) => "Split",
            Self::View(view) if view.scrollbars.is_some() => "ScrollView",
            Self::View(_) => "InfiniteView",
            Self::Scrollbar(_) => "Scrollbar",
        }
    }
}

pub(crate) struct PanelNode {
    pub(crate) name: String,
    pub(crate) kind: PanelKind,
    pub(crate) position: Vec2,
    pub(crate) size: Vec2,
    /// Split-view weight; meaningless outside a split view.
    pub(crate) relative_size: f32,
    pub(crate) selected: bool,
    pub(crate) visibility: Visibility,
    pub(crate) opacity: f32,
    pub(crate) drawable: DrawableHandle,
    pub(crate) parent: Option<PanelId>,
    pub(crate) root: Option<PanelId>,
    pub(crate) children: Vec<PanelId>,
    pub(crate) background: Option<PanelId>,
    pub(crate) handlers: HashMap<EventKind, EventHandler>,
    pub(crate) focusable: bool,
    pub(crate) hit_policy: HitPolicy,
}

impl PanelNode {
    fn new(kind: PanelKind, drawable: DrawableHandle, position: Vec2, size: Vec2) -> Self {
        Self {
            name: String::new(),
            kind,
            position,
            size,
            relative_size: 0.0,
            selected: false,
            visibility: Visibility::Visible,
            opacity: 1.0,
            drawable,
            parent: None,
            root: None,
            children: Vec::new(),
            background: None,
            handlers: HashMap::new(),
            focusable: false,
            hit_policy: HitPolicy::Normal,
        }
    }
}

/// A tree of panels rendered onto one surface.
///
/// The tree is single-threaded: handlers are reference-counted closures that
/// receive the tree mutably while an event is dispatched.
pub struct PanelTree {
    pub(crate) nodes: SlotMap<PanelId, PanelNode>,
    pub(crate) surface: Box<dyn Surface>,
    pub(crate) config: ToolkitConfig,
    pub(crate) root: PanelId,
    pub(crate) content: PanelId,
    pub(crate) overlays: PanelId,
    pub(crate) backdrop: PanelId,
    pub(crate) overlay_close: Option<OverlayCloseFn>,
    pub(crate) focused: Option<PanelId>,
    pub(crate) animator: Animator<PanelId>,
    /// Children fading out, mapped to the container they leave.
    pub(crate) pending_removals: HashMap<PanelId, PanelId>,
    pub(crate) drag: Option<DragSession>,
}

static_assertions::assert_not_impl_any!(PanelTree: Send, Sync);

impl std::fmt::Debug for PanelTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelTree")
            .field("panels", &self.nodes.len())
            .field("root", &self.root)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

impl PanelTree {
    /// Create a tree of the given window size on a surface.
    ///
    /// An invalid `config` is replaced by the defaults.
    pub fn new(surface: Box<dyn Surface>, size: Vec2, config: ToolkitConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(error) => {
                tracing::warn!(target: targets::CONFIG, %error, "invalid config, using defaults");
                ToolkitConfig::default()
            }
        };
        let mut tree = Self {
            nodes: SlotMap::with_key(),
            surface,
            config,
            root: PanelId::default(),
            content: PanelId::default(),
            overlays: PanelId::default(),
            backdrop: PanelId::default(),
            overlay_close: None,
            focused: None,
            animator: Animator::new(),
            pending_removals: HashMap::new(),
            drag: None,
        };
        tree.build_root_layers(size);
        tree
    }

    /// Create a tree on a [`HeadlessSurface`] with the default config.
    pub fn headless(size: Vec2) -> Self {
        Self::new(Box::new(HeadlessSurface::new()), size, ToolkitConfig::default())
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create a detached panel.
    pub fn create_panel(
        &mut self,
        kind: PanelKind,
        drawable: DrawableKind,
        position: Vec2,
        size: Vec2,
    ) -> PanelId {
        let handle = self.surface.create(drawable);
        tracing::trace!(target: targets::TREE, kind = kind.name(), "panel created");
        let id = self.nodes.insert(PanelNode::new(kind, handle, position, size));
        self.sync_position(id);
        self.sync_size(id);
        id
    }

    /// Create a leaf panel drawing one primitive.
    pub fn new_leaf(&mut self, drawable: DrawableKind, position: Vec2, size: Vec2) -> PanelId {
        self.create_panel(PanelKind::Leaf, drawable, position, size)
    }

    /// Create a text leaf sized from its drawable; call [`measure`](Self::measure)
    /// after the text changes.
    pub fn new_label(&mut self, position: Vec2) -> PanelId {
        let id = self.new_leaf(DrawableKind::Text, position, Vec2::ZERO);
        let _ = self.measure(id);
        id
    }

    /// Create a plain container.
    pub fn new_container(&mut self, position: Vec2, size: Vec2) -> PanelId {
        self.create_panel(PanelKind::Container, DrawableKind::Group, position, size)
    }

    /// Create a tiling container.
    pub fn new_tiling(&mut self, layout: TilingLayout, position: Vec2, size: Vec2) -> PanelId {
        self.create_panel(PanelKind::Tiling(layout), DrawableKind::Group, position, size)
    }

    /// Create a container that fits its children plus `padding` on every side.
    pub fn new_adaptive(&mut self, padding: Vec2, position: Vec2) -> PanelId {
        self.create_panel(
            PanelKind::Adaptive(AdaptiveLayout { padding }),
            DrawableKind::Group,
            position,
            Vec2::ZERO,
        )
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The tree's configuration.
    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    /// Replace the configuration. An invalid config is rejected and the
    /// current one kept.
    pub fn set_config(&mut self, config: ToolkitConfig) -> ConfigResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// The surface the tree renders to.
    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    /// Mutable access to the surface.
    pub fn surface_mut(&mut self) -> &mut dyn Surface {
        self.surface.as_mut()
    }

    /// The surface as its concrete type.
    pub fn surface_as<T: Surface>(&self) -> Option<&T> {
        self.surface.as_any().downcast_ref::<T>()
    }

    /// The surface as its concrete type, mutably.
    pub fn surface_as_mut<T: Surface>(&mut self) -> Option<&mut T> {
        self.surface.as_any_mut().downcast_mut::<T>()
    }

    /// Whether the id resolves to a live panel.
    pub fn contains(&self, id: PanelId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live panels, including the root layers.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no panels (never true once constructed).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Kind and layout state of a panel.
    pub fn kind(&self, id: PanelId) -> Option<&PanelKind> {
        self.nodes.get(id).map(|n| &n.kind)
    }

    pub(crate) fn kind_mut(&mut self, id: PanelId) -> Option<&mut PanelKind> {
        self.nodes.get_mut(id).map(|n| &mut n.kind)
    }

    /// Whether the panel owns children.
    pub fn is_container(&self, id: PanelId) -> bool {
        self.kind(id).is_some_and(PanelKind::is_container)
    }

    /// Owning container, if attached.
    pub fn parent(&self, id: PanelId) -> Option<PanelId> {
        self.nodes.get(id)?.parent
    }

    /// Root of the tree the panel is attached to.
    pub fn root_of(&self, id: PanelId) -> Option<PanelId> {
        self.nodes.get(id)?.root
    }

    /// Children in ownership (and render) order.
    pub fn children(&self, id: PanelId) -> &[PanelId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Index of `child` within its parent's children.
    pub fn index_of(&self, child: PanelId) -> Option<usize> {
        let parent = self.parent(child)?;
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Background panel of a container.
    pub fn background(&self, id: PanelId) -> Option<PanelId> {
        self.nodes.get(id)?.background
    }

    /// Center position in the parent's space.
    pub fn position(&self, id: PanelId) -> Option<Vec2> {
        self.nodes.get(id).map(|n| n.position)
    }

    /// Width and height.
    pub fn size(&self, id: PanelId) -> Option<Vec2> {
        self.nodes.get(id).map(|n| n.size)
    }

    /// Split-view weight of a pane.
    pub fn relative_size(&self, id: PanelId) -> Option<f32> {
        self.nodes.get(id).map(|n| n.relative_size)
    }

    /// Drawable handle of a panel.
    pub fn drawable(&self, id: PanelId) -> Option<DrawableHandle> {
        self.nodes.get(id).map(|n| n.drawable)
    }

    /// Debug name.
    pub fn name(&self, id: PanelId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.name.as_str())
    }

    /// Set the debug name.
    pub fn set_name(&mut self, id: PanelId, name: impl Into<String>) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.name = name.into();
        }
    }

    /// Hit-testing behavior of a panel.
    pub fn hit_policy(&self, id: PanelId) -> Option<HitPolicy> {
        self.nodes.get(id).map(|n| n.hit_policy)
    }

    /// Change the hit-testing behavior of a panel.
    pub fn set_hit_policy(&mut self, id: PanelId, policy: HitPolicy) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.hit_policy = policy;
        }
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: PanelId, id: PanelId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    /// Panels of the subtree rooted at `id` in depth-first pre-order,
    /// backgrounds excluded.
    pub fn descendants(&self, id: PanelId) -> Vec<PanelId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// The rectangle `[position - size/2, position + size/2]` in the parent's
    /// space.
    pub fn get_bounds(&self, id: PanelId) -> Option<Bounds> {
        self.nodes
            .get(id)
            .map(|n| Bounds::from_center_size(n.position, n.size))
    }

    /// Move a panel.
    pub fn set_position(&mut self, id: PanelId, position: Vec2) -> TreeResult<()> {
        self.node_mut(id)?.position = position;
        self.sync_position(id);
        Ok(())
    }

    /// Resize a panel and lay out its children for the new size.
    pub fn set_size(&mut self, id: PanelId, size: Vec2) -> TreeResult<()> {
        self.node_mut(id)?.size = size;
        self.update_size(id);
        Ok(())
    }

    /// Place a panel on the rectangle spanned by two arbitrary corners.
    pub fn set_bounds(&mut self, id: PanelId, a: Vec2, b: Vec2) -> TreeResult<()> {
        let bounds = Bounds::from_corners(a, b);
        let node = self.node_mut(id)?;
        node.position = bounds.center();
        node.size = bounds.size();
        self.sync_position(id);
        self.update_size(id);
        Ok(())
    }

    /// Size a panel to its drawable's bounding box.
    pub fn measure(&mut self, id: PanelId) -> TreeResult<Vec2> {
        let drawable = self.node(id)?.drawable;
        let size = self.surface.bounding_box(drawable);
        self.node_mut(id)?.size = size;
        self.update_size(id);
        Ok(size)
    }

    /// Transform from the panel's local space to its parent's space.
    pub fn local_transform(&self, id: PanelId) -> Affine2 {
        let Some(node) = self.nodes.get(id) else {
            return Affine2::IDENTITY;
        };
        if let Some(PanelKind::View(view)) = node.parent.and_then(|p| self.kind(p)) {
            if view.content == id {
                return view.content_transform();
            }
        }
        Affine2::from_translation(node.position)
    }

    /// Transform from the panel's local space to window space.
    pub fn window_transform(&self, id: PanelId) -> Affine2 {
        let mut transform = Affine2::IDENTITY;
        let mut current = Some(id);
        while let Some(c) = current {
            transform = self.local_transform(c) * transform;
            current = self.parent(c);
        }
        transform
    }

    /// Map a window-space point into the panel's local space.
    pub fn map_to_local(&self, id: PanelId, point: Vec2) -> Vec2 {
        self.window_transform(id).inverse().transform_point2(point)
    }

    /// Map a point of the panel's local space into window space.
    pub fn map_to_window(&self, id: PanelId, point: Vec2) -> Vec2 {
        self.window_transform(id).transform_point2(point)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Whether the panel is selected.
    pub fn is_selected(&self, id: PanelId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.selected)
    }

    /// Select or deselect a panel.
    pub fn set_selected(&mut self, id: PanelId, selected: bool) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.selected == selected {
            return;
        }
        node.selected = selected;
        let drawable = node.drawable;
        self.surface.set_class(drawable, classes::SELECTED, selected);
    }

    /// Select every descendant of `container` whose bounds lie fully inside
    /// the rectangle `[min, max]`, given in the container's space.
    ///
    /// With `toggle` each match flips its selection instead.
    pub fn select_children_inside(
        &mut self,
        container: PanelId,
        min: Vec2,
        max: Vec2,
        toggle: bool,
    ) -> TreeResult<()> {
        let children = self.node(container)?.children.clone();
        let rect = Bounds::from_corners(min, max);
        for child in children {
            self.select_inside(child, rect, toggle);
        }
        Ok(())
    }

    fn select_inside(&mut self, id: PanelId, rect: Bounds, toggle: bool) {
        let Some(size) = self.size(id) else {
            return;
        };
        let transform = self.local_transform(id);
        let bounds = Bounds::from_center_size(Vec2::ZERO, size).transformed(&transform);
        if rect.contains_bounds(&bounds) {
            let selected = if toggle { !self.is_selected(id) } else { true };
            self.set_selected(id, selected);
        }
        let local = rect.transformed(&transform.inverse());
        for child in self.children(id).to_vec() {
            self.select_inside(child, local, toggle);
        }
    }

    /// Direct children that are selected.
    pub fn selected_children(&self, container: PanelId) -> Vec<PanelId> {
        self.children(container)
            .iter()
            .copied()
            .filter(|&c| self.is_selected(c))
            .collect()
    }

    /// Select or deselect every descendant of `container`.
    pub fn set_all_children_selected(&mut self, container: PanelId, selected: bool) {
        for child in self.children(container).to_vec() {
            self.set_selected(child, selected);
            self.set_all_children_selected(child, selected);
        }
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    pub(crate) fn node(&self, id: PanelId) -> TreeResult<&PanelNode> {
        self.nodes.get(id).ok_or(TreeError::InvalidPanelId(id))
    }

    pub(crate) fn node_mut(&mut self, id: PanelId) -> TreeResult<&mut PanelNode> {
        self.nodes.get_mut(id).ok_or(TreeError::InvalidPanelId(id))
    }

    /// Push the local transform to the drawable.
    pub(crate) fn sync_position(&mut self, id: PanelId) {
        let transform = self.local_transform(id);
        if let Some(node) = self.nodes.get(id) {
            let value = AttributeValue::Transform(transform);
            self.surface.set_attribute(node.drawable, attributes::TRANSFORM, value);
        }
    }

    /// Push the size to the drawable and stretch the background to match.
    pub(crate) fn sync_size(&mut self, id: PanelId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let size = node.size.max(Vec2::ZERO);
        let drawable = node.drawable;
        let background = node.background;
        self.surface
            .set_attribute(drawable, attributes::WIDTH, AttributeValue::Number(size.x));
        self.surface
            .set_attribute(drawable, attributes::HEIGHT, AttributeValue::Number(size.y));
        if let Some(bg) = background {
            if let Some(bg_node) = self.nodes.get_mut(bg) {
                bg_node.position = Vec2::ZERO;
                bg_node.size = size;
            }
            self.sync_position(bg);
            self.update_size(bg);
        }
    }
}
