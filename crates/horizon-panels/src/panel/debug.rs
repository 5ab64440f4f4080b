//! Human-readable dumps of the panel tree.

use std::fmt::{self, Write};

use horizon_panels_core::logging::TreeFormatOptions;
use horizon_panels_core::{PanelId, TreeResult};

use super::{PanelTree, Visibility};

impl PanelTree {
    /// Format the whole tree from the root.
    pub fn format_tree(&self, options: &TreeFormatOptions) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "Panel Tree ({} panels):", self.nodes.len());
        let mut ancestors = Vec::new();
        self.format_into(self.root, options, &mut ancestors, true, &mut output);
        output
    }

    /// Format the subtree rooted at `id`.
    pub fn format_subtree(&self, id: PanelId, options: &TreeFormatOptions) -> TreeResult<String> {
        self.node(id)?;
        let mut output = String::new();
        let mut ancestors = Vec::new();
        self.format_into(id, options, &mut ancestors, true, &mut output);
        Ok(output)
    }

    fn format_into(
        &self,
        id: PanelId,
        options: &TreeFormatOptions,
        ancestors: &mut Vec<bool>,
        is_last: bool,
        output: &mut String,
    ) {
        let depth = ancestors.len();
        if options.max_depth.is_some_and(|max| depth > max) {
            return;
        }
        let Some(node) = self.nodes.get(id) else {
            return;
        };

        output.push_str(&options.prefix(ancestors, is_last));
        output.push_str(if node.name.is_empty() {
            "(unnamed)"
        } else {
            &node.name
        });
        if options.show_ids {
            let _ = write!(output, " [{id:?}]");
        }
        if options.show_kinds {
            let _ = write!(output, " ({})", node.kind.name());
        }
        if options.show_geometry {
            let _ = write!(
                output,
                " @({:.1}, {:.1}) {:.1}x{:.1}",
                node.position.x, node.position.y, node.size.x, node.size.y
            );
        }
        if node.visibility != Visibility::Visible {
            let _ = write!(output, " <{:?}>", node.visibility);
        }
        if node.selected {
            output.push_str(" *");
        }
        output.push('\n');

        ancestors.push(is_last);
        let count = node.children.len();
        for (i, &child) in node.children.iter().enumerate() {
            self.format_into(child, options, ancestors, i + 1 == count, output);
        }
        ancestors.pop();
    }
}

/// Displays the tree with the default dump options.
impl fmt::Display for PanelTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_tree(&TreeFormatOptions::default()))
    }
}
