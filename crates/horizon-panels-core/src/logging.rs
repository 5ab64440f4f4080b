//! Logging and debugging facilities for Horizon Panels.
//!
//! This module provides:
//! - Target names for filtering `tracing` output by subsystem
//! - Options and prefix rendering for panel tree dumps
//! - A span guard for timing layout passes and animation frames
//!
//! # Tracing Integration
//!
//! Horizon Panels logs through the `tracing` crate but never installs a
//! subscriber. Hosts install one themselves:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_panels::layout=trace")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Panel ownership and structural changes.
    pub const TREE: &str = "horizon_panels::tree";
    /// Layout algorithms.
    pub const LAYOUT: &str = "horizon_panels::layout";
    /// Event dispatch and bubbling.
    pub const EVENT: &str = "horizon_panels::event";
    /// Gesture unification of raw input.
    pub const GESTURE: &str = "horizon_panels::gesture";
    /// Focus transitions and navigation.
    pub const FOCUS: &str = "horizon_panels::focus";
    /// Drag-and-drop.
    pub const DRAG: &str = "horizon_panels::drag";
    /// Visibility fades.
    pub const ANIMATION: &str = "horizon_panels::animation";
    /// Configuration loading.
    pub const CONFIG: &str = "horizon_panels::config";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Indentation with a dash per level.
    Compact,
}

/// Configuration for panel tree dumps.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show panel ids.
    pub show_ids: bool,
    /// Whether to show panel kinds.
    pub show_kinds: bool,
    /// Whether to show position and size.
    pub show_geometry: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_kinds: true,
            show_geometry: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Options that include geometry.
    pub fn detailed() -> Self {
        Self {
            show_geometry: true,
            ..Default::default()
        }
    }

    /// Names only.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_kinds: false,
            show_geometry: false,
            ..Default::default()
        }
    }

    /// Build the line prefix for a node at `depth`.
    ///
    /// `ancestors_last[i]` says whether the ancestor at depth `i` was the last
    /// of its siblings; the entry for the dump's root is ignored. The slice
    /// length is the node's depth.
    pub fn prefix(&self, ancestors_last: &[bool], is_last: bool) -> String {
        let depth = ancestors_last.len();
        let mut prefix = String::new();
        if self.style == TreeStyle::Compact {
            for _ in 0..depth {
                prefix.push_str("- ");
            }
            return prefix;
        }
        let (branch, tee, corner) = match self.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            _ => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
        };
        if depth == 0 {
            return prefix;
        }
        for &last in &ancestors_last[1..] {
            prefix.push_str(if last { " " } else { branch });
            for _ in 0..self.indent_size {
                prefix.push(' ');
            }
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a span named after the operation.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::trace_span!(target: "horizon_panels::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_root_is_empty() {
        let options = TreeFormatOptions::default();
        assert_eq!(options.prefix(&[], true), "");
    }

    #[test]
    fn test_prefix_ascii() {
        let options = TreeFormatOptions {
            style: TreeStyle::Ascii,
            ..Default::default()
        };
        assert_eq!(options.prefix(&[true], false), "+-- ");
        assert_eq!(options.prefix(&[true], true), "`-- ");
        assert_eq!(options.prefix(&[true, false], true), "|  `-- ");
        assert_eq!(options.prefix(&[true, true], true), "   `-- ");
    }

    #[test]
    fn test_prefix_compact() {
        let options = TreeFormatOptions {
            style: TreeStyle::Compact,
            ..Default::default()
        };
        assert_eq!(options.prefix(&[true, true], false), "- - ");
    }

    #[test]
    fn test_perf_span() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let _span = PerfSpan::new("test_operation");
    }
}
