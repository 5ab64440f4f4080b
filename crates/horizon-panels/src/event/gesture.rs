//! Normalization of raw host input into gestures.
//!
//! Mouse, touch and wheel input collapse into one stream of [`Gesture`]s:
//! a pointer gesture is a `Start`, any number of `Move`s and an `End`.
//! Leave and cancel end the gesture like a release does.
//!
//! Two touches that start further apart than
//! [`zoom_threshold`](crate::ToolkitConfig::zoom_threshold) switch the
//! gesture into zoom mode for its lifetime: their moves become `Zoom`
//! gestures and no pointer gesture is produced. Closer touches start a
//! pointer gesture with the modifier set.
//!
//! Once a touch has been seen, mouse input is ignored; touch hosts deliver
//! emulated mouse events after the touch ones.

use horizon_panels_core::logging::targets;
use horizon_panels_core::Vec2;

use super::NavigationDirection;
use crate::config::ToolkitConfig;

/// One touch point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    /// Host identifier, stable for the touch's lifetime.
    pub id: u64,
    /// Window-space position.
    pub position: Vec2,
}

impl Touch {
    /// A touch point.
    pub fn new(id: u64, position: Vec2) -> Self {
        Self { id, position }
    }
}

/// Keys the toolkit reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
    Tab,
    /// Any other key.
    Other,
}

/// Raw input as delivered by the host, in window space.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A mouse button went down.
    PointerDown { position: Vec2, shift: bool },
    /// The mouse moved.
    PointerMove { position: Vec2 },
    /// The mouse button was released.
    PointerUp { position: Vec2 },
    /// The mouse left the window.
    PointerLeave,
    /// Touches began; `touches` lists every active touch.
    TouchStart { touches: Vec<Touch> },
    /// Touches moved; `touches` lists every active touch.
    TouchMove { touches: Vec<Touch> },
    /// Touches ended; `touches` lists the remaining ones, `changed` the
    /// identifiers that ended.
    TouchEnd { touches: Vec<Touch>, changed: Vec<u64> },
    /// The host cancelled all touches.
    TouchCancel,
    /// Wheel scrolled by `delta_y` over `position`.
    Wheel { position: Vec2, delta_y: f32 },
    /// A key was pressed.
    KeyDown { key: Key, shift: bool },
    /// The window was resized.
    Resize { size: Vec2 },
}

/// A normalized gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// A pointer gesture started.
    Start { position: Vec2, modifier: bool },
    /// The pointer of the active gesture moved.
    Move { position: Vec2 },
    /// The active gesture ended; `moved` tells whether the pointer left the
    /// action slop at any point.
    End { position: Vec2, moved: bool },
    /// Zoom by `factor` around `center`.
    Zoom { factor: f32, center: Vec2 },
    /// The active gesture turned into something else and must be dropped
    /// without an action.
    Abandon,
    /// Directional focus navigation.
    Navigate(NavigationDirection),
    /// Tab-order focus step.
    Tab { backwards: bool },
    /// The window was resized.
    Resize(Vec2),
}

/// Stateful converter from [`InputEvent`] to [`Gesture`].
///
/// Touch devices also synthesize mouse events for every tap. To avoid
/// handling each tap twice, the first touch event switches the unifier to
/// touch-only input: from then on pointer down, move, up and leave events
/// are ignored for the life of the unifier. Wheel and key input are not
/// affected. A host that mixes a real mouse with a touch screen should feed
/// each device through its own unifier.
#[derive(Debug, Default)]
pub struct GestureUnifier {
    active: bool,
    start: Vec2,
    last: Vec2,
    moved: bool,
    primary_touch: Option<u64>,
    zoom_distance: Option<f32>,
    touch_seen: bool,
}

fn pinch(touches: &[Touch]) -> Option<(f32, Vec2)> {
    match touches {
        [a, b] => Some((a.position.distance(b.position), (a.position + b.position) * 0.5)),
        _ => None,
    }
}

impl GestureUnifier {
    /// A unifier with no active gesture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a pointer gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the current touch gesture is a pinch zoom.
    pub fn is_zooming(&self) -> bool {
        self.zoom_distance.is_some()
    }

    /// Convert one input event into the gestures it produces.
    pub fn process(&mut self, input: &InputEvent, config: &ToolkitConfig) -> Vec<Gesture> {
        match input {
            InputEvent::PointerDown { position, shift } => {
                if self.touch_seen {
                    return Vec::new();
                }
                self.begin(*position, *shift)
            }
            InputEvent::PointerMove { position } => {
                if self.touch_seen {
                    return Vec::new();
                }
                self.move_to(*position, config)
            }
            InputEvent::PointerUp { position } => {
                if self.touch_seen {
                    return Vec::new();
                }
                self.finish(Some(*position))
            }
            InputEvent::PointerLeave => {
                if self.touch_seen {
                    return Vec::new();
                }
                self.finish(None)
            }
            InputEvent::TouchStart { touches } => self.touch_start(touches, config),
            InputEvent::TouchMove { touches } => self.touch_move(touches, config),
            InputEvent::TouchEnd { touches, changed } => {
                let primary_ended = self.primary_touch.is_none_or(|id| changed.contains(&id));
                if !touches.is_empty() && !primary_ended {
                    return Vec::new();
                }
                self.primary_touch = None;
                if self.zoom_distance.take().is_some() {
                    return Vec::new();
                }
                self.finish(None)
            }
            InputEvent::TouchCancel => {
                self.primary_touch = None;
                if self.zoom_distance.take().is_some() {
                    return Vec::new();
                }
                self.finish(None)
            }
            InputEvent::Wheel { position, delta_y } => {
                let factor = (delta_y * config.wheel_zoom_rate).exp2();
                vec![Gesture::Zoom {
                    factor,
                    center: *position,
                }]
            }
            InputEvent::KeyDown { key, shift } => {
                let gesture = match key {
                    Key::ArrowUp => Gesture::Navigate(NavigationDirection::Up),
                    Key::ArrowDown => Gesture::Navigate(NavigationDirection::Down),
                    Key::ArrowLeft => Gesture::Navigate(NavigationDirection::Left),
                    Key::ArrowRight => Gesture::Navigate(NavigationDirection::Right),
                    Key::Enter => Gesture::Navigate(NavigationDirection::In),
                    Key::Escape => Gesture::Navigate(NavigationDirection::Out),
                    Key::Tab => Gesture::Tab { backwards: *shift },
                    Key::Other => return Vec::new(),
                };
                vec![gesture]
            }
            InputEvent::Resize { size } => vec![Gesture::Resize(*size)],
        }
    }

    fn begin(&mut self, position: Vec2, modifier: bool) -> Vec<Gesture> {
        let mut out = Vec::with_capacity(2);
        if self.active {
            out.push(Gesture::Abandon);
        }
        self.active = true;
        self.start = position;
        self.last = position;
        self.moved = false;
        tracing::trace!(target: targets::GESTURE, ?position, modifier, "gesture start");
        out.push(Gesture::Start { position, modifier });
        out
    }

    fn move_to(&mut self, position: Vec2, config: &ToolkitConfig) -> Vec<Gesture> {
        if !self.active {
            return Vec::new();
        }
        self.last = position;
        if position.distance(self.start) > config.action_slop {
            self.moved = true;
        }
        vec![Gesture::Move { position }]
    }

    fn finish(&mut self, position: Option<Vec2>) -> Vec<Gesture> {
        if !self.active {
            return Vec::new();
        }
        self.active = false;
        let position = position.unwrap_or(self.last);
        tracing::trace!(target: targets::GESTURE, ?position, moved = self.moved, "gesture end");
        vec![Gesture::End {
            position,
            moved: self.moved,
        }]
    }

    fn touch_start(&mut self, touches: &[Touch], config: &ToolkitConfig) -> Vec<Gesture> {
        self.touch_seen = true;
        let Some(first) = touches.first() else {
            return Vec::new();
        };
        self.primary_touch = Some(first.id);
        self.zoom_distance = None;
        if let Some((distance, _)) = pinch(touches) {
            if distance >= config.zoom_threshold {
                self.zoom_distance = Some(distance);
                tracing::debug!(target: targets::GESTURE, distance, "pinch zoom");
                if self.active {
                    self.active = false;
                    return vec![Gesture::Abandon];
                }
                return Vec::new();
            }
        }
        self.begin(first.position, touches.len() == 2)
    }

    fn touch_move(&mut self, touches: &[Touch], config: &ToolkitConfig) -> Vec<Gesture> {
        if let Some(last) = self.zoom_distance {
            let Some((distance, center)) = pinch(touches) else {
                return Vec::new();
            };
            if distance <= 0.0 || last <= 0.0 {
                return Vec::new();
            }
            self.zoom_distance = Some(distance);
            return vec![Gesture::Zoom {
                factor: distance / last,
                center,
            }];
        }
        let primary = touches
            .iter()
            .find(|t| Some(t.id) == self.primary_touch)
            .or(touches.first());
        match primary {
            Some(touch) => self.move_to(touch.position, config),
            None => Vec::new(),
        }
    }
}
