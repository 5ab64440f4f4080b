//! Error types for Horizon Panels.
//!
//! Structural tree operations either succeed completely or fail without
//! mutating anything; the failure reason is one of the [`TreeError`] variants.

use thiserror::Error;

use crate::id::PanelId;

/// Errors produced by structural panel-tree operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The panel id does not resolve (never existed or was destroyed).
    #[error("invalid panel id {0:?}")]
    InvalidPanelId(PanelId),
    /// The panel is already owned by a container.
    #[error("panel {child:?} already belongs to container {current:?}")]
    AlreadyParented {
        /// The panel that was to be inserted.
        child: PanelId,
        /// Its current owner.
        current: PanelId,
    },
    /// The panel is not a child of the given container.
    #[error("panel {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The container that was asked to remove the panel.
        parent: PanelId,
        /// The panel that was not found.
        child: PanelId,
    },
    /// Insertion index outside `[0, len]`.
    #[error("index {index} out of range for container with {len} children")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current number of children.
        len: usize,
    },
    /// The target panel cannot own children.
    #[error("panel {0:?} is not a container")]
    NotAContainer(PanelId),
    /// The insertion would make a panel its own ancestor.
    #[error("inserting the panel would create a parent cycle")]
    CircularParentage,
    /// The root panel cannot be reparented or removed.
    #[error("the root panel cannot be reparented")]
    RootImmutable,
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

static_assertions::assert_impl_all!(TreeError: Send, Sync, std::error::Error);
