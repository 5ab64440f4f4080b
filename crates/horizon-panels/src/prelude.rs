//! Prelude module for Horizon Panels.
//!
//! ```
//! use horizon_panels::prelude::*;
//! ```
//!
//! This provides access to:
//! - The tree and panel roles (`PanelTree`, `PanelKind`, `HitPolicy`)
//! - Layout policies (`TilingLayout`, `SplitLayout`, `ScrollbarPolicy`, ...)
//! - Input and events (`InputRouter`, `InputEvent`, `PanelEvent`, ...)
//! - Geometry and drawables (`Vec2`, `Axis`, `Bounds`, `DrawableKind`)

// ============================================================================
// Tree
// ============================================================================

pub use crate::panel::{HitPolicy, PanelKind, PanelTree, Visibility};
pub use crate::config::ToolkitConfig;

// ============================================================================
// Layout
// ============================================================================

pub use crate::layout::{
    AdaptiveLayout, AxisSizing, CrossAlignment, ScrollbarPolicy, SplitHandle, SplitLayout,
    TilingLayout,
};

// ============================================================================
// Events
// ============================================================================

pub use crate::event::{
    DispatchResult, EventKind, InputEvent, InputRouter, Key, NavigationDirection, PanelEvent,
    Touch,
};

// ============================================================================
// Core
// ============================================================================

pub use horizon_panels_core::{
    Axis, Bounds, DrawableKind, HeadlessSurface, PanelId, Surface, TreeError, TreeResult, Vec2,
};
