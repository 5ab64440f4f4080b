//! Core systems for Horizon Panels.
//!
//! This crate provides the foundations the panel toolkit is built on:
//!
//! - **Ids**: generational arena keys for panels and drawables
//! - **Geometry**: center/size bounds and layout axes on top of `glam`
//! - **Surface**: the drawable contract panels render through, plus a
//!   headless in-memory implementation
//! - **Animation**: easing curves and a per-frame tween scheduler
//! - **Logging**: tracing targets and tree-dump formatting
//!
//! # Surface Example
//!
//! ```
//! use horizon_panels_core::{DrawableKind, HeadlessSurface, Surface};
//!
//! let mut surface = HeadlessSurface::new();
//! let group = surface.create(DrawableKind::Group);
//! let rect = surface.create(DrawableKind::Rect);
//! surface.insert_child(group, rect, None);
//!
//! assert_eq!(surface.children(group), &[rect]);
//! ```

pub mod animation;
mod error;
pub mod geometry;
mod id;
pub mod logging;
pub mod surface;

pub use error::{TreeError, TreeResult};
pub use geometry::{Affine2, Axis, Bounds, Vec2};
pub use id::{DrawableHandle, PanelId};
pub use surface::{AttributeValue, DrawableKind, HeadlessSurface, Surface};
