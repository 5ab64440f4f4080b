//! Pan and zoom views.
//!
//! A view owns a content container drawn under a uniform scale and a
//! translation. Dragging pans the content; dragging with the modifier draws a
//! marquee that selects the content panels it covers. Wheel and pinch zoom
//! keep the point under the pointer fixed.
//!
//! The translation is clamped per axis to `±max(0, (content·scale −
//! viewport)/2)`, so content larger than the viewport can never be panned
//! past its edges and smaller content stays centered.
//!
//! A view clips its children to its own rectangle.
//!
//! A scroll view adds one scrollbar per axis. Thumb length and position
//! follow the viewport/content ratio and the translation; dragging a thumb
//! pans the content.

use horizon_panels_core::logging::targets;
use horizon_panels_core::surface::{attributes, classes};
use horizon_panels_core::{
    Affine2, AttributeValue, Axis, Bounds, DrawableKind, PanelId, TreeError, TreeResult, Vec2,
};

use crate::event::{EventKind, PanelEvent};
use crate::panel::{HitPolicy, PanelKind, PanelTree};

/// When a scrollbar is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollbarPolicy {
    /// Always shown.
    Always,
    /// Shown while the content overflows the viewport on that axis.
    #[default]
    Overflow,
    /// Shown while the content is being panned.
    OnlyWhileMoving,
    /// Never shown.
    Never,
}

/// Pan/zoom state of a view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub(crate) content: PanelId,
    pub(crate) scale: f32,
    pub(crate) translation: Vec2,
    pub(crate) scrollbars: Option<[PanelId; 2]>,
    pub(crate) scrollbar_policy: [ScrollbarPolicy; 2],
    pub(crate) moving: bool,
}

impl ViewState {
    /// The content container.
    pub fn content(&self) -> PanelId {
        self.content
    }

    /// Current scale.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Current translation of the content center.
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    /// Scrollbar visibility policy per axis, horizontal first.
    pub fn scrollbar_policy(&self) -> [ScrollbarPolicy; 2] {
        self.scrollbar_policy
    }

    /// Transform from content space to the view's local space.
    pub fn content_transform(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(Vec2::splat(self.scale), 0.0, self.translation)
    }
}

/// Axis and owner of a scrollbar panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollbarState {
    pub(crate) view: PanelId,
    pub(crate) axis: Axis,
}

impl ScrollbarState {
    /// The view the scrollbar scrolls.
    pub fn view(&self) -> PanelId {
        self.view
    }

    /// Axis the scrollbar scrolls along.
    pub fn axis(&self) -> Axis {
        self.axis
    }
}

/// Scratch state of a pointer gesture on a view.
#[derive(Debug, Clone, Copy)]
enum ViewGesture {
    Pan { origin: Vec2, translation: Vec2 },
    Marquee { origin: Vec2, rect: PanelId },
}

/// Scratch state of a scrollbar drag.
#[derive(Debug, Clone, Copy)]
struct ThumbDrag {
    origin: f32,
    translation: f32,
}

fn max_translation(viewport: Vec2, content: Vec2, scale: f32) -> Vec2 {
    ((content * scale - viewport) * 0.5).max(Vec2::ZERO)
}

impl PanelTree {
    /// Create an unbounded-looking pan/zoom view without scrollbars.
    pub fn new_infinite_view(&mut self, position: Vec2, size: Vec2, content_size: Vec2) -> PanelId {
        self.create_view(position, size, content_size, None)
    }

    /// Create a pan/zoom view with scrollbars governed by `policy`
    /// (horizontal first).
    pub fn new_scroll_view(
        &mut self,
        position: Vec2,
        size: Vec2,
        content_size: Vec2,
        policy: [ScrollbarPolicy; 2],
    ) -> PanelId {
        self.create_view(position, size, content_size, Some(policy))
    }

    fn create_view(
        &mut self,
        position: Vec2,
        size: Vec2,
        content_size: Vec2,
        policy: Option<[ScrollbarPolicy; 2]>,
    ) -> PanelId {
        let content = self.new_container(Vec2::ZERO, content_size);
        self.set_name(content, "view content");
        let state = ViewState {
            content,
            scale: 1.0,
            translation: Vec2::ZERO,
            scrollbars: None,
            scrollbar_policy: policy.unwrap_or([ScrollbarPolicy::Never; 2]),
            moving: false,
        };
        let view = self.create_panel(PanelKind::View(state), DrawableKind::Group, position, size);
        self.attach(view, content, 0);

        if policy.is_some() {
            let mut bars = [PanelId::default(); 2];
            for (slot, axis) in bars.iter_mut().zip([Axis::Horizontal, Axis::Vertical]) {
                let bar = self.create_panel(
                    PanelKind::Scrollbar(ScrollbarState { view, axis }),
                    DrawableKind::Rect,
                    Vec2::ZERO,
                    Vec2::ZERO,
                );
                self.set_name(bar, "scrollbar");
                let len = self.children(view).len();
                self.attach(view, bar, len);
                *slot = bar;
            }
            if let Some(PanelKind::View(state)) = self.kind_mut(view) {
                state.scrollbars = Some(bars);
            }
        }
        self.layout_view(view);
        view
    }

    fn view_state(&self, view: PanelId) -> Option<&ViewState> {
        match self.kind(view) {
            Some(PanelKind::View(state)) => Some(state),
            _ => None,
        }
    }

    /// Content container of a view.
    pub fn view_content(&self, view: PanelId) -> Option<PanelId> {
        self.view_state(view).map(|s| s.content)
    }

    /// Scale of a view.
    pub fn view_scale(&self, view: PanelId) -> Option<f32> {
        self.view_state(view).map(|s| s.scale)
    }

    /// Translation of a view's content.
    pub fn view_translation(&self, view: PanelId) -> Option<Vec2> {
        self.view_state(view).map(|s| s.translation)
    }

    /// Scrollbar panels of a scroll view, horizontal first.
    pub fn view_scrollbars(&self, view: PanelId) -> Option<[PanelId; 2]> {
        self.view_state(view)?.scrollbars
    }

    /// Set scale and translation, clamping both.
    pub fn set_view_transform(
        &mut self,
        view: PanelId,
        scale: f32,
        translation: Vec2,
    ) -> TreeResult<()> {
        let (min_scale, max_scale) = (self.config.min_scale, self.config.max_scale);
        match self.kind_mut(view) {
            Some(PanelKind::View(state)) => {
                state.scale = scale.clamp(min_scale, max_scale);
                state.translation = translation;
            }
            Some(_) => return Err(TreeError::NotAContainer(view)),
            None => return Err(TreeError::InvalidPanelId(view)),
        }
        self.layout_view(view);
        Ok(())
    }

    /// Pan a view by `delta` in its local space.
    pub fn pan_view(&mut self, view: PanelId, delta: Vec2) -> TreeResult<()> {
        let state = self.view_state(view).ok_or(TreeError::InvalidPanelId(view))?;
        let (scale, translation) = (state.scale, state.translation);
        self.set_view_transform(view, scale, translation + delta)
    }

    /// Zoom a view by `factor` around a point in window space.
    ///
    /// The factor is bounded by [`max_zoom_step`](crate::ToolkitConfig::max_zoom_step)
    /// and the resulting scale by the configured scale range.
    pub fn zoom_view(&mut self, view: PanelId, factor: f32, anchor: Vec2) -> TreeResult<()> {
        let state = self.view_state(view).ok_or(TreeError::InvalidPanelId(view))?;
        let (scale, translation) = (state.scale, state.translation);
        let step = self.config.max_zoom_step;
        let factor = factor.clamp(1.0 / step, step);
        let new_scale = (scale * factor).clamp(self.config.min_scale, self.config.max_scale);
        let applied = new_scale / scale;
        let point = self.map_to_local(view, anchor);
        let new_translation = point - (point - translation) * applied;
        tracing::trace!(target: targets::LAYOUT, ?view, new_scale, "zoom");
        self.set_view_transform(view, new_scale, new_translation)
    }

    pub(crate) fn layout_view(&mut self, view: PanelId) {
        let Some(state) = self.view_state(view) else {
            return;
        };
        let content = state.content;
        let viewport = self.size(view).unwrap_or(Vec2::ZERO);
        let content_size = self.size(content).unwrap_or(Vec2::ZERO);
        let limit = max_translation(viewport, content_size, state.scale);
        let clamped = state.translation.clamp(-limit, limit);
        if let Some(PanelKind::View(state)) = self.kind_mut(view) {
            state.translation = clamped;
        }
        if let Some(drawable) = self.drawable(view) {
            let clip = Bounds::from_center_size(Vec2::ZERO, viewport);
            self.surface.set_attribute(drawable, attributes::CLIP, AttributeValue::Rect(clip));
        }
        self.sync_position(content);
        self.layout_scrollbars(view);
    }

    fn layout_scrollbars(&mut self, view: PanelId) {
        let Some(state) = self.view_state(view) else {
            return;
        };
        let Some(bars) = state.scrollbars else {
            return;
        };
        let (scale, translation, policy, moving) =
            (state.scale, state.translation, state.scrollbar_policy, state.moving);
        let viewport = self.size(view).unwrap_or(Vec2::ZERO);
        let raw = self.size(state.content).unwrap_or(Vec2::ZERO);
        let content = raw * scale;
        let limit = max_translation(viewport, raw, scale);
        let thickness = self.config.scrollbar_thickness;
        let min_length = self.config.min_scrollbar_length;

        let axes = [Axis::Horizontal, Axis::Vertical];
        for ((bar, axis), policy) in bars.into_iter().zip(axes).zip(policy) {
            let cross = axis.cross();
            let port = axis.get(viewport);
            let extent = axis.get(content);
            let overflow = extent > port;
            let ratio = if extent > 0.0 { (port / extent).min(1.0) } else { 1.0 };
            let length = (port * ratio).max(min_length).min(port);
            let track = port - length;
            let max_t = axis.get(limit);
            let along = if max_t > 0.0 {
                -axis.get(translation) / max_t * track * 0.5
            } else {
                0.0
            };
            let across = cross.get(viewport) * 0.5 - thickness * 0.5;
            self.place_child(bar, axis.compose(along, across), axis.compose(length, thickness));

            let shown = match policy {
                ScrollbarPolicy::Always => true,
                ScrollbarPolicy::Overflow => overflow,
                ScrollbarPolicy::OnlyWhileMoving => moving,
                ScrollbarPolicy::Never => false,
            };
            if self.visibility(bar).is_some_and(|v| v.is_drawn()) != shown {
                self.set_visible(bar, shown);
            }
        }
    }

    fn set_view_moving(&mut self, view: PanelId, moving: bool) {
        if let Some(PanelKind::View(state)) = self.kind_mut(view) {
            if state.moving == moving {
                return;
            }
            state.moving = moving;
        }
        if let Some(drawable) = self.drawable(view) {
            self.surface.set_class(drawable, classes::ACTIVE, moving);
        }
        self.layout_scrollbars(view);
    }

    /// Built-in pointer behavior of views.
    pub(crate) fn view_event(&mut self, view: PanelId, event: &mut PanelEvent) -> bool {
        match event.kind {
            EventKind::PointerZoom => {
                self.zoom_view(view, event.zoom_factor, event.position).is_ok()
            }
            EventKind::PointerStart => {
                let local = self.map_to_local(view, event.position);
                if event.modifier {
                    let rect = self.new_leaf(DrawableKind::Rect, local, Vec2::ZERO);
                    self.set_name(rect, "marquee");
                    self.set_hit_policy(rect, HitPolicy::None);
                    let len = self.children(view).len();
                    self.attach(view, rect, len);
                    event.set_scratch(ViewGesture::Marquee { origin: local, rect });
                } else {
                    let Some(state) = self.view_state(view) else {
                        return false;
                    };
                    let translation = state.translation;
                    self.set_view_moving(view, true);
                    event.set_scratch(ViewGesture::Pan { origin: local, translation });
                }
                true
            }
            EventKind::PointerMove | EventKind::PointerEnd => {
                let Some(gesture) = event.scratch::<ViewGesture>().copied() else {
                    return false;
                };
                let local = self.map_to_local(view, event.position);
                let end = event.kind == EventKind::PointerEnd;
                match gesture {
                    ViewGesture::Pan { origin, translation } => {
                        let scale = self.view_scale(view).unwrap_or(1.0);
                        let panned = translation + (local - origin);
                        let _ = self.set_view_transform(view, scale, panned);
                        if end {
                            self.set_view_moving(view, false);
                        }
                    }
                    ViewGesture::Marquee { origin, rect } => {
                        let _ = self.set_bounds(rect, origin, local);
                        if end {
                            self.finish_marquee(view, origin, local);
                            let _ = self.destroy(rect);
                        }
                    }
                }
                true
            }
            _ => false,
        }
    }

    fn finish_marquee(&mut self, view: PanelId, a: Vec2, b: Vec2) {
        let Some(state) = self.view_state(view) else {
            return;
        };
        let content = state.content;
        let inverse = state.content_transform().inverse();
        let (a, b) = (inverse.transform_point2(a), inverse.transform_point2(b));
        let toggle = self.config.marquee_toggles;
        let _ = self.select_children_inside(content, a.min(b), a.max(b), toggle);
        tracing::debug!(target: targets::LAYOUT, ?view, "marquee selection");
    }

    /// Built-in pointer behavior of scrollbar thumbs.
    pub(crate) fn scrollbar_event(&mut self, bar: PanelId, event: &mut PanelEvent) -> bool {
        let Some(&PanelKind::Scrollbar(ScrollbarState { view, axis })) = self.kind(bar) else {
            return false;
        };
        let along = axis.get(self.map_to_local(view, event.position));
        match event.kind {
            EventKind::PointerStart => {
                let Some(translation) = self.view_translation(view) else {
                    return false;
                };
                self.set_view_moving(view, true);
                event.set_scratch(ThumbDrag {
                    origin: along,
                    translation: axis.get(translation),
                });
                true
            }
            EventKind::PointerMove | EventKind::PointerEnd => {
                let Some(drag) = event.scratch::<ThumbDrag>().copied() else {
                    return false;
                };
                let (Some(state), Some(viewport), Some(thumb)) =
                    (self.view_state(view), self.size(view), self.size(bar))
                else {
                    return false;
                };
                let content = self.size(state.content).unwrap_or(Vec2::ZERO);
                let (scale, mut translation) = (state.scale, state.translation);
                let max_t = axis.get(max_translation(viewport, content, scale));
                let track = axis.get(viewport) - axis.get(thumb);
                if track > 0.0 {
                    let delta = along - drag.origin;
                    axis.set(&mut translation, drag.translation - delta * 2.0 * max_t / track);
                    let _ = self.set_view_transform(view, scale, translation);
                }
                if event.kind == EventKind::PointerEnd {
                    self.set_view_moving(view, false);
                }
                true
            }
            _ => false,
        }
    }
}
