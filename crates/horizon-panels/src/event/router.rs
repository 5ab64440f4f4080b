//! Routing of gestures into the panel tree.
//!
//! The panel that accepts a gesture's `PointerStart` owns the gesture: its
//! moves and its end are delivered to that panel only, together with the
//! scratch state the panel stored on the start event. A press released
//! without movement additionally sends a bubbling `Action` to the panel
//! under the pointer.

use std::any::Any;

use horizon_panels_core::logging::targets;
use horizon_panels_core::{PanelId, Vec2};

use super::gesture::{Gesture, GestureUnifier, InputEvent};
use super::{DispatchResult, EventKind, PanelEvent};
use crate::panel::PanelTree;

struct ActiveGesture {
    owner: Option<PanelId>,
    start: Vec2,
    modifier: bool,
    scratch: Option<Box<dyn Any>>,
}

/// Feeds host input through a [`GestureUnifier`] and dispatches the
/// resulting gestures.
#[derive(Default)]
pub struct InputRouter {
    unifier: GestureUnifier,
    active: Option<ActiveGesture>,
}

impl std::fmt::Debug for InputRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputRouter")
            .field("unifier", &self.unifier)
            .field("owner", &self.active.as_ref().and_then(|a| a.owner))
            .finish()
    }
}

impl InputRouter {
    /// A router with no gesture in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Panel owning the current pointer gesture.
    pub fn gesture_owner(&self) -> Option<PanelId> {
        self.active.as_ref().and_then(|a| a.owner)
    }

    /// Process one host input event. Returns the result of the last gesture
    /// it produced.
    pub fn handle_input(&mut self, tree: &mut PanelTree, input: InputEvent) -> DispatchResult {
        let gestures = self.unifier.process(&input, tree.config());
        let mut result = DispatchResult::Ignored;
        for gesture in gestures {
            result = self.handle_gesture(tree, gesture);
        }
        result
    }

    /// Dispatch one gesture.
    pub fn handle_gesture(&mut self, tree: &mut PanelTree, gesture: Gesture) -> DispatchResult {
        match gesture {
            Gesture::Start { position, modifier } => {
                if self.active.take().is_some() {
                    tracing::debug!(target: targets::GESTURE, "stale gesture replaced");
                    tree.abort_drag();
                }
                let mut event =
                    PanelEvent::new(EventKind::PointerStart, position).with_modifier(modifier);
                let result = tree.dispatch_at(&mut event);
                self.active = Some(ActiveGesture {
                    owner: result.accepted_by(),
                    start: position,
                    modifier,
                    scratch: event.take_scratch(),
                });
                result
            }
            Gesture::Move { position } => self.deliver(tree, EventKind::PointerMove, position),
            Gesture::End { position, moved } => {
                let result = self.deliver(tree, EventKind::PointerEnd, position);
                let modifier = self.active.take().is_some_and(|a| a.modifier);
                if moved {
                    return result;
                }
                let mut action =
                    PanelEvent::new(EventKind::Action, position).with_modifier(modifier);
                tree.dispatch_at(&mut action)
            }
            Gesture::Abandon => {
                tree.abort_drag();
                let position = self.active.as_ref().map_or(Vec2::ZERO, |a| a.start);
                let result = self.deliver(tree, EventKind::PointerEnd, position);
                self.active = None;
                result
            }
            Gesture::Zoom { factor, center } => {
                let mut event = PanelEvent::new(EventKind::PointerZoom, center);
                event.zoom_factor = factor;
                tree.dispatch_at(&mut event)
            }
            Gesture::Navigate(direction) => tree.navigate_focus(direction),
            Gesture::Tab { backwards } => {
                let focused = if backwards {
                    tree.focus_previous()
                } else {
                    tree.focus_next()
                };
                focused.map_or(DispatchResult::Ignored, DispatchResult::Accepted)
            }
            Gesture::Resize(size) => {
                tree.resize(size);
                DispatchResult::Accepted(tree.root())
            }
        }
    }

    fn deliver(&mut self, tree: &mut PanelTree, kind: EventKind, position: Vec2) -> DispatchResult {
        let Some(active) = self.active.as_mut() else {
            return DispatchResult::Ignored;
        };
        let Some(owner) = active.owner else {
            return DispatchResult::Ignored;
        };
        let mut event = PanelEvent::new(kind, position)
            .with_start(active.start)
            .with_modifier(active.modifier);
        event.restore_scratch(active.scratch.take());
        let result = tree.dispatch_to(owner, &mut event);
        active.scratch = event.take_scratch();
        result
    }
}
