//! Tree renderings
//!
//! Two textual views of a [`DependencyTree`]:
//!
//! Indented (`render` / `print_tree`): one node per line, pre-order, each line
//! indented by four spaces per level, non-root lines prefixed with `└─ `:
//!
//!     root | divisa_3
//!         └─ nsubj | Gallia_0
//!         └─ cop | est_1
//!
//! Treeviz (`to_treeviz_str`): the same walk drawn with proper branch
//! connectors, two columns per level, for terminal inspection:
//!
//!     └─ root: divisa_3
//!       ├─ nsubj: Gallia_0
//!       └─ cop: est_1

use crate::tree::builder::DependencyTree;
use crate::tree::form::Form;

const INDENT_WIDTH: usize = 4;
const EDGE: &str = "└─ ";

impl DependencyTree {
    /// The indented rendering, one line per node, each ending in a newline.
    ///
    /// With `show_all_features` every node shows its full feature bundle,
    /// otherwise only `string_id` and the POS.
    pub fn render(&self, show_all_features: bool) -> String {
        let mut result = String::new();
        for (depth, node) in self.walk() {
            let edge = if depth > 0 { EDGE } else { "" };
            let label = if show_all_features {
                node.full_str(false)
            } else {
                node.to_string()
            };
            result.push_str(&format!(
                "{}{}{} | {}\n",
                " ".repeat(INDENT_WIDTH * depth),
                edge,
                node.relation,
                label
            ));
        }
        result
    }

    /// Write [`render`](Self::render) to stdout.
    pub fn print_tree(&self, show_all_features: bool) {
        print!("{}", self.render(show_all_features));
    }
}

pub fn to_treeviz_str(tree: &DependencyTree) -> String {
    let mut result = String::new();
    // (node, prefix drawn before its connector, whether it is the last sibling)
    let mut stack: Vec<(&Form, String, bool)> = vec![(tree.root(), String::new(), true)];
    while let Some((form, prefix, is_last)) = stack.pop() {
        let connector = if is_last { "└─" } else { "├─" };
        result.push_str(&format!("{}{} {}: {}\n", prefix, connector, form.relation, form));

        let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        let children = form.children();
        for (i, child) in children.iter().enumerate().rev() {
            stack.push((child, new_prefix.clone(), i == children.len() - 1));
        }
    }
    result
}
