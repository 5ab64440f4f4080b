//! Horizon Panels - a retained-mode panel toolkit.
//!
//! Panels form an ownership tree held by a [`PanelTree`]. Containers lay out
//! their children with one of several policies (tiling, adaptive size,
//! weighted split views, pan/zoom views), and raw pointer, touch, wheel and
//! key input is unified into gestures that bubble through the tree.
//!
//! Rendering goes through the [`Surface`] trait; the tree mirrors every
//! panel onto one drawable and keeps the drawable order in step with the
//! ownership order. [`HeadlessSurface`] keeps everything in memory.
//!
//! # Example
//!
//! ```
//! use horizon_panels::prelude::*;
//!
//! let mut tree = PanelTree::headless(Vec2::new(400.0, 300.0));
//! let layout = SplitLayout::new(Axis::Horizontal);
//! let split = tree.new_split_view(layout, Vec2::new(200.0, 150.0), Vec2::new(400.0, 300.0));
//! tree.append_child(tree.content(), split).unwrap();
//!
//! for _ in 0..2 {
//!     let pane = tree.new_container(Vec2::ZERO, Vec2::ZERO);
//!     tree.append_child(split, pane).unwrap();
//! }
//! assert_eq!(tree.split_weights(split), [0.5, 0.5]);
//!
//! // Drag the boundary 50 px to the right.
//! let mut router = InputRouter::new();
//! let press = InputEvent::PointerDown { position: Vec2::new(200.0, 150.0), shift: false };
//! router.handle_input(&mut tree, press);
//! router.handle_input(&mut tree, InputEvent::PointerMove { position: Vec2::new(250.0, 150.0) });
//! router.handle_input(&mut tree, InputEvent::PointerUp { position: Vec2::new(250.0, 150.0) });
//! assert_eq!(tree.split_weights(split), [0.625, 0.375]);
//! ```

pub mod config;
pub mod drag_drop;
pub mod event;
mod focus;
pub mod layout;
pub mod panel;
pub mod prelude;

pub use config::{ConfigError, ConfigResult, ToolkitConfig};
pub use drag_drop::{DragStartFn, DropAcceptFn, DropFn};
pub use event::{
    DispatchResult, EventHandler, EventKind, Gesture, GestureUnifier, InputEvent, InputRouter, Key,
    NavigationDirection, PanelEvent, Touch,
};
pub use layout::{
    AdaptiveLayout, AxisSizing, CrossAlignment, PaneFactory, ScrollbarPolicy, ScrollbarState,
    SplitHandle, SplitLayout, TilingLayout, ViewState,
};
pub use panel::{HitPolicy, OverlayCloseFn, PanelKind, PanelTree, Visibility};

pub use horizon_panels_core::animation::{Animator, Easing, Tween};
pub use horizon_panels_core::logging::{TreeFormatOptions, TreeStyle};
pub use horizon_panels_core::{
    Affine2, AttributeValue, Axis, Bounds, DrawableHandle, DrawableKind, HeadlessSurface, PanelId,
    Surface, TreeError, TreeResult, Vec2,
};
