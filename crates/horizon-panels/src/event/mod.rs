//! Panel events, handlers and dispatch.
//!
//! Raw host input is unified into gestures by [`GestureUnifier`] and routed
//! through the tree by [`InputRouter`]. Every delivery ends up in
//! [`PanelTree::dispatch_event`](crate::PanelTree::dispatch_event): the
//! target's registered handler runs first, then the built-in behavior of the
//! target's kind, and bubbling events continue with the parent until one of
//! them returns `true`.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use horizon_panels::prelude::*;
//!
//! let mut tree = PanelTree::headless(Vec2::new(200.0, 200.0));
//! let button = tree.new_leaf(DrawableKind::Rect, Vec2::new(50.0, 50.0), Vec2::new(40.0, 20.0));
//! tree.append_child(tree.content(), button).unwrap();
//!
//! let clicks = Rc::new(Cell::new(0));
//! let counter = clicks.clone();
//! tree.register_action_event(button, move |_tree, _event| {
//!     counter.set(counter.get() + 1);
//!     true
//! });
//!
//! let mut router = InputRouter::new();
//! let press = InputEvent::PointerDown { position: Vec2::new(50.0, 50.0), shift: false };
//! router.handle_input(&mut tree, press);
//! router.handle_input(&mut tree, InputEvent::PointerUp { position: Vec2::new(50.0, 50.0) });
//! assert_eq!(clicks.get(), 1);
//! ```

mod dispatch;
mod gesture;
mod router;

use std::any::Any;
use std::rc::Rc;

use horizon_panels_core::{PanelId, Vec2};

use crate::panel::PanelTree;

pub use gesture::{Gesture, GestureUnifier, InputEvent, Key, Touch};
pub use router::InputRouter;

/// Handler invoked with the tree and the event being dispatched.
///
/// Returning `true` stops propagation.
pub type EventHandler = Rc<dyn Fn(&mut PanelTree, &mut PanelEvent) -> bool>;

/// Type tag of a panel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A pointer went down.
    PointerStart,
    /// The pointer of an active gesture moved.
    PointerMove,
    /// The active gesture ended (release, leave or cancel).
    PointerEnd,
    /// Wheel or pinch zoom around a position.
    PointerZoom,
    /// A press released without movement.
    Action,
    /// The panel received focus.
    Focus,
    /// The panel lost focus.
    Defocus,
    /// Directional focus movement.
    FocusNavigation,
    /// A drag asks whether the panel accepts the dragged item.
    MayDrop,
    /// The dragged item was dropped onto the panel.
    Drop,
}

impl EventKind {
    /// Whether events of this kind walk up the ancestors by default.
    pub fn bubbles(self) -> bool {
        !matches!(self, Self::Focus | Self::Defocus)
    }
}

/// Direction of a focus navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationDirection {
    /// Towards smaller y.
    Up,
    /// Towards larger y.
    Down,
    /// Towards smaller x.
    Left,
    /// Towards larger x.
    Right,
    /// Into the focused container.
    In,
    /// Out to the enclosing focusable container.
    Out,
}

/// Result of dispatching an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    /// The panel that returned `true`.
    Accepted(PanelId),
    /// No panel on the path handled the event.
    Ignored,
    /// The target panel does not exist.
    PanelNotFound,
}

impl DispatchResult {
    /// Whether a panel handled the event.
    pub fn was_handled(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The panel that handled the event.
    pub fn accepted_by(&self) -> Option<PanelId> {
        match self {
            Self::Accepted(id) => Some(*id),
            _ => None,
        }
    }
}

/// An event travelling through the panel tree.
///
/// Positions are in window space; use
/// [`PanelTree::map_to_local`](crate::PanelTree::map_to_local) for panel
/// coordinates. The scratch slot carries state from a gesture's start to its
/// moves and end.
pub struct PanelEvent {
    /// Type tag.
    pub kind: EventKind,
    /// Panel the event was originally delivered to.
    pub target: Option<PanelId>,
    /// Panel currently handling the event.
    pub current: Option<PanelId>,
    /// Child of `current` the event bubbled up from.
    pub via_child: Option<PanelId>,
    /// Current pointer position.
    pub position: Vec2,
    /// Pointer position at the start of the gesture.
    pub start_position: Vec2,
    /// Whether the event continues to the parent when unhandled.
    pub bubbles: bool,
    /// Shift held, or a multi-touch gesture.
    pub modifier: bool,
    /// Zoom factor of a [`EventKind::PointerZoom`] event.
    pub zoom_factor: f32,
    /// Direction of a [`EventKind::FocusNavigation`] event.
    pub direction: Option<NavigationDirection>,
    /// Dragged panel of [`EventKind::MayDrop`] and [`EventKind::Drop`].
    pub item: Option<PanelId>,
    scratch: Option<Box<dyn Any>>,
}

impl std::fmt::Debug for PanelEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelEvent")
            .field("kind", &self.kind)
            .field("target", &self.target)
            .field("current", &self.current)
            .field("position", &self.position)
            .field("modifier", &self.modifier)
            .field("has_scratch", &self.scratch.is_some())
            .finish_non_exhaustive()
    }
}

impl PanelEvent {
    /// Create an event at a window position.
    pub fn new(kind: EventKind, position: Vec2) -> Self {
        Self {
            kind,
            target: None,
            current: None,
            via_child: None,
            position,
            start_position: position,
            bubbles: kind.bubbles(),
            modifier: false,
            zoom_factor: 1.0,
            direction: None,
            item: None,
            scratch: None,
        }
    }

    /// Set the modifier flag.
    pub fn with_modifier(mut self, modifier: bool) -> Self {
        self.modifier = modifier;
        self
    }

    /// Set the start position of the gesture.
    pub fn with_start(mut self, start: Vec2) -> Self {
        self.start_position = start;
        self
    }

    /// Pointer travel since the gesture started.
    pub fn delta(&self) -> Vec2 {
        self.position - self.start_position
    }

    /// Gesture scratch state, if it has type `T`.
    pub fn scratch<T: 'static>(&self) -> Option<&T> {
        self.scratch.as_ref()?.downcast_ref()
    }

    /// Mutable gesture scratch state, if it has type `T`.
    pub fn scratch_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.scratch.as_mut()?.downcast_mut()
    }

    /// Replace the gesture scratch state.
    pub fn set_scratch<T: 'static>(&mut self, value: T) {
        self.scratch = Some(Box::new(value));
    }

    pub(crate) fn take_scratch(&mut self) -> Option<Box<dyn Any>> {
        self.scratch.take()
    }

    pub(crate) fn restore_scratch(&mut self, scratch: Option<Box<dyn Any>>) {
        self.scratch = scratch;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Grab(f32);

    #[test]
    fn test_focus_events_do_not_bubble() {
        assert!(!PanelEvent::new(EventKind::Focus, Vec2::ZERO).bubbles);
        assert!(!PanelEvent::new(EventKind::Defocus, Vec2::ZERO).bubbles);
        assert!(PanelEvent::new(EventKind::MayDrop, Vec2::ZERO).bubbles);
    }

    #[test]
    fn test_scratch_is_typed() {
        let mut event = PanelEvent::new(EventKind::PointerStart, Vec2::ZERO);
        event.set_scratch(Grab(2.0));
        assert_eq!(event.scratch::<Grab>(), Some(&Grab(2.0)));
        assert!(event.scratch::<u32>().is_none());
        if let Some(grab) = event.scratch_mut::<Grab>() {
            grab.0 = 3.0;
        }
        let taken = event.take_scratch();
        assert!(event.scratch::<Grab>().is_none());
        event.restore_scratch(taken);
        assert_eq!(event.scratch::<Grab>(), Some(&Grab(3.0)));
    }

    #[test]
    fn test_delta() {
        let event = PanelEvent::new(EventKind::PointerMove, Vec2::new(5.0, 7.0))
            .with_start(Vec2::new(1.0, 1.0));
        assert_eq!(event.delta(), Vec2::new(4.0, 6.0));
        assert_eq!(DispatchResult::Ignored.accepted_by(), None);
    }
}
