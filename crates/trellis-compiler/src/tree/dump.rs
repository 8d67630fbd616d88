//! Indented textual dump of a syntax tree, for tests and debugging.

use indexmap::IndexMap;
use trellis_bytecode::StateId;

use super::{NodeId, NodeKind, SyntaxTree};

pub fn dump(tree: &SyntaxTree) -> String {
    dump_annotated(tree, &IndexMap::new())
}

/// Dump with published preview indices appended to the nodes that have one.
pub fn dump_annotated(tree: &SyntaxTree, previews: &IndexMap<NodeId, StateId>) -> String {
    let mut out = String::new();
    write_node(&mut out, tree, previews, tree.root(), 0);
    out
}

fn write_node(
    out: &mut String,
    tree: &SyntaxTree,
    previews: &IndexMap<NodeId, StateId>,
    id: NodeId,
    depth: usize,
) {
    let node = tree.node(id);
    out.push_str(&"  ".repeat(depth));
    out.push_str(&label(&node.kind, &node.text));
    if let Some(preview) = previews.get(&id) {
        out.push_str(&format!(" preview={preview}"));
    }
    out.push('\n');
    for child in node.kind.children() {
        write_node(out, tree, previews, child, depth + 1);
    }
}

fn label(kind: &NodeKind, text: &str) -> String {
    match kind {
        NodeKind::Group { zero_width, .. } => {
            let mut s = "Group".to_string();
            if *zero_width {
                s.push_str(" zero-width");
            }
            s
        }
        NodeKind::Alternation { b_node, .. } => {
            let mut s = "Alternation".to_string();
            if *b_node {
                s.push_str(" b-node");
            }
            s
        }
        NodeKind::Repeat {
            min, max, disjoint, ..
        } => {
            let mut s = match max {
                Some(max) => format!("Repeat {{{min},{max}}}"),
                None => format!("Repeat {{{min},}}"),
            };
            if *disjoint {
                s.push_str(" disjoint");
            }
            s
        }
        NodeKind::ClassReference { target } => format!("ClassReference {target} \"{text}\""),
        NodeKind::CompiledClass { index } => format!("CompiledClass {index} \"{text}\""),
        NodeKind::CharClassLeaf(class) => format!("CharClassLeaf {class} \"{text}\""),
        other => format!("{} \"{text}\"", other.name()),
    }
}
