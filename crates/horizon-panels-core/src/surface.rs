//! The drawable surface contract.
//!
//! Panels never draw themselves. Each panel owns one drawable on an external
//! 2-D vector surface and pushes geometry and state to it through the
//! [`Surface`] trait. The surface keeps its own child order per drawable,
//! which the panel tree keeps in lockstep with its ownership order.
//!
//! [`HeadlessSurface`] is an in-memory implementation that records everything
//! it is told. It backs tests and hosts that do not render.

use std::any::Any;
use std::collections::{BTreeSet, HashMap};

use slotmap::SlotMap;

use crate::geometry::{Affine2, Bounds, Vec2};
use crate::id::DrawableHandle;

/// Attribute names written by the panel tree.
pub mod attributes {
    /// Local transform of the drawable relative to its parent
    /// ([`Transform`](super::AttributeValue::Transform)).
    pub const TRANSFORM: &str = "transform";
    /// Width of the drawable.
    pub const WIDTH: &str = "width";
    /// Height of the drawable.
    pub const HEIGHT: &str = "height";
    /// Opacity in `[0, 1]`.
    pub const OPACITY: &str = "opacity";
    /// Pointer cursor shown while hovering the drawable.
    pub const CURSOR: &str = "cursor";
    /// `"visible"` or `"hidden"`.
    pub const VISIBILITY: &str = "visibility";
    /// Clip rectangle in the drawable's local space ([`Rect`](super::AttributeValue::Rect)).
    /// Children are not drawn outside it.
    pub const CLIP: &str = "clip";
}

/// State-flag classes toggled by the panel tree.
pub mod classes {
    /// The panel is selected.
    pub const SELECTED: &str = "selected";
    /// The panel holds keyboard focus.
    pub const FOCUSED: &str = "focused";
    /// The panel is the origin of an in-flight drag.
    pub const DRAGGING: &str = "dragging";
    /// A gesture is currently active on the panel.
    pub const ACTIVE: &str = "active";
    /// The panel is a modal backdrop.
    pub const BACKDROP: &str = "backdrop";
}

/// Cursor names used for drag-and-drop affordances.
pub mod cursors {
    /// Drop is accepted at the current position.
    pub const COPY: &str = "copy";
    /// Drop is rejected at the current position.
    pub const NO_DROP: &str = "no-drop";
    /// Default cursor.
    pub const DEFAULT: &str = "default";
}

/// The kind of primitive a drawable represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawableKind {
    /// A grouping node with no visuals of its own.
    Group,
    /// The top-level drawable of a tree.
    Root,
    /// Rectangle.
    Rect,
    /// Circle.
    Circle,
    /// Text run.
    Text,
    /// Vector path.
    Path,
    /// Raster image.
    Image,
    /// Foreign content, such as an editable text field.
    Embedded,
}

/// A value assigned to a drawable attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Scalar value.
    Number(f32),
    /// String value.
    Text(String),
    /// Affine transform.
    Transform(Affine2),
    /// Axis-aligned rectangle.
    Rect(Bounds),
}

impl AttributeValue {
    /// The scalar value, if this is a number.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The transform, if this is a transform.
    pub fn as_transform(&self) -> Option<Affine2> {
        match self {
            Self::Transform(t) => Some(*t),
            _ => None,
        }
    }

    /// The rectangle, if this is one.
    pub fn as_rect(&self) -> Option<Bounds> {
        match self {
            Self::Rect(r) => Some(*r),
            _ => None,
        }
    }
}

impl From<f32> for AttributeValue {
    fn from(value: f32) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Affine2> for AttributeValue {
    fn from(value: Affine2) -> Self {
        Self::Transform(value)
    }
}

impl From<Bounds> for AttributeValue {
    fn from(value: Bounds) -> Self {
        Self::Rect(value)
    }
}

/// A 2-D vector surface that owns drawables on behalf of panels.
///
/// Handles that do not resolve are ignored by every method.
pub trait Surface: Any {
    /// Create a detached drawable.
    fn create(&mut self, kind: DrawableKind) -> DrawableHandle;

    /// Destroy a drawable and unlink it from its parent.
    fn destroy(&mut self, handle: DrawableHandle);

    /// Assign an attribute value.
    fn set_attribute(&mut self, handle: DrawableHandle, name: &str, value: AttributeValue);

    /// Size of the drawable's rendered content.
    fn bounding_box(&self, handle: DrawableHandle) -> Vec2;

    /// Link `child` under `parent`, before `before` or at the end.
    ///
    /// A child already linked elsewhere is moved.
    fn insert_child(
        &mut self,
        parent: DrawableHandle,
        child: DrawableHandle,
        before: Option<DrawableHandle>,
    );

    /// Unlink `child` from `parent`.
    fn remove_child(&mut self, parent: DrawableHandle, child: DrawableHandle);

    /// Add or remove a state class.
    fn set_class(&mut self, handle: DrawableHandle, class: &str, enabled: bool);

    /// Downcast support.
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[derive(Debug)]
struct HeadlessDrawable {
    kind: DrawableKind,
    attributes: HashMap<String, AttributeValue>,
    classes: BTreeSet<String>,
    children: Vec<DrawableHandle>,
    parent: Option<DrawableHandle>,
    intrinsic_size: Option<Vec2>,
}

/// A surface that keeps drawables in memory without rendering them.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    drawables: SlotMap<DrawableHandle, HeadlessDrawable>,
}

impl HeadlessSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live drawables.
    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    /// Whether no drawables are alive.
    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    /// Whether the handle resolves.
    pub fn contains(&self, handle: DrawableHandle) -> bool {
        self.drawables.contains_key(handle)
    }

    /// Kind of a drawable.
    pub fn kind(&self, handle: DrawableHandle) -> Option<DrawableKind> {
        self.drawables.get(handle).map(|d| d.kind)
    }

    /// Current value of an attribute.
    pub fn attribute(&self, handle: DrawableHandle, name: &str) -> Option<&AttributeValue> {
        self.drawables.get(handle)?.attributes.get(name)
    }

    /// Whether a class is set.
    pub fn has_class(&self, handle: DrawableHandle, class: &str) -> bool {
        self.drawables
            .get(handle)
            .is_some_and(|d| d.classes.contains(class))
    }

    /// Children in render order.
    pub fn children(&self, handle: DrawableHandle) -> &[DrawableHandle] {
        self.drawables
            .get(handle)
            .map(|d| d.children.as_slice())
            .unwrap_or(&[])
    }

    /// Parent drawable, if linked.
    pub fn parent(&self, handle: DrawableHandle) -> Option<DrawableHandle> {
        self.drawables.get(handle)?.parent
    }

    /// Set the size reported by [`Surface::bounding_box`], simulating content
    /// such as a text run.
    pub fn set_intrinsic_size(&mut self, handle: DrawableHandle, size: Vec2) {
        if let Some(d) = self.drawables.get_mut(handle) {
            d.intrinsic_size = Some(size);
        }
    }

    fn unlink(&mut self, child: DrawableHandle) {
        let Some(parent) = self.drawables.get_mut(child).and_then(|d| d.parent.take()) else {
            return;
        };
        if let Some(p) = self.drawables.get_mut(parent) {
            p.children.retain(|&c| c != child);
        }
    }
}

impl Surface for HeadlessSurface {
    fn create(&mut self, kind: DrawableKind) -> DrawableHandle {
        let handle = self.drawables.insert(HeadlessDrawable {
            kind,
            attributes: HashMap::new(),
            classes: BTreeSet::new(),
            children: Vec::new(),
            parent: None,
            intrinsic_size: None,
        });
        tracing::trace!(target: "horizon_panels_core::surface", ?handle, ?kind, "drawable created");
        handle
    }

    fn destroy(&mut self, handle: DrawableHandle) {
        self.unlink(handle);
        if let Some(d) = self.drawables.remove(handle) {
            for child in d.children {
                if let Some(c) = self.drawables.get_mut(child) {
                    c.parent = None;
                }
            }
        }
    }

    fn set_attribute(&mut self, handle: DrawableHandle, name: &str, value: AttributeValue) {
        if let Some(d) = self.drawables.get_mut(handle) {
            d.attributes.insert(name.to_string(), value);
        }
    }

    fn bounding_box(&self, handle: DrawableHandle) -> Vec2 {
        let Some(d) = self.drawables.get(handle) else {
            return Vec2::ZERO;
        };
        if let Some(size) = d.intrinsic_size {
            return size;
        }
        let dim = |name: &str| {
            d.attributes
                .get(name)
                .and_then(AttributeValue::as_number)
                .unwrap_or(0.0)
        };
        Vec2::new(dim(attributes::WIDTH), dim(attributes::HEIGHT))
    }

    fn insert_child(
        &mut self,
        parent: DrawableHandle,
        child: DrawableHandle,
        before: Option<DrawableHandle>,
    ) {
        if parent == child
            || !self.drawables.contains_key(parent)
            || !self.drawables.contains_key(child)
        {
            return;
        }
        self.unlink(child);
        if let Some(p) = self.drawables.get_mut(parent) {
            let index = before
                .and_then(|b| p.children.iter().position(|&c| c == b))
                .unwrap_or(p.children.len());
            p.children.insert(index, child);
        }
        if let Some(c) = self.drawables.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn remove_child(&mut self, parent: DrawableHandle, child: DrawableHandle) {
        if self.drawables.get(child).and_then(|d| d.parent) == Some(parent) {
            self.unlink(child);
        }
    }

    fn set_class(&mut self, handle: DrawableHandle, class: &str, enabled: bool) {
        if let Some(d) = self.drawables.get_mut(handle) {
            if enabled {
                d.classes.insert(class.to_string());
            } else {
                d.classes.remove(class);
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
