//! Publish phase: writes a compiled pattern's classes into the machine.
//!
//! Leaves go through the registry, so a class already in the machine is
//! reused rather than written again. The optimizer then runs over the
//! published tree.

use indexmap::IndexMap;
use trellis_bytecode::{Machine, StateId};
use trellis_core::{Colors, Encoding};

use crate::diagnostics::Diagnostics;
use crate::optimize::Optimizer;
use crate::registry::Registry;
use crate::rewrite::CompiledPattern;
use crate::tree::{self, NodeId, NodeKind, SyntaxTree};
use crate::{InternalError, OptimizerConfig, Result};

/// A pattern whose classes and hints live in the machine.
#[derive(Debug, Clone)]
pub struct PublishedPattern {
    tree: SyntaxTree,
    encoding: Encoding,
    root_preview: Option<StateId>,
    previews: IndexMap<NodeId, StateId>,
    auxiliary: IndexMap<String, StateId>,
    diagnostics: Diagnostics,
}

impl PublishedPattern {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Bytes per anchor step under the pattern's encoding.
    pub fn stride(&self) -> usize {
        self.encoding.stride()
    }

    /// Look-ahead class for the start of the whole pattern.
    pub fn root_preview(&self) -> Option<StateId> {
        self.root_preview
    }

    pub fn preview(&self, node: NodeId) -> Option<StateId> {
        self.previews.get(&node).copied()
    }

    pub fn previews(&self) -> &IndexMap<NodeId, StateId> {
        &self.previews
    }

    pub fn auxiliary(&self) -> &IndexMap<String, StateId> {
        &self.auxiliary
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Header, auxiliary table and annotated tree.
    pub fn dump(&self, colors: Colors) -> String {
        let c = &colors;
        let mut out = String::new();

        out.push_str(&format!("{}[pattern]{}\n", c.blue, c.reset));
        out.push_str(&format!("encoding = {}\n", self.encoding));
        out.push_str(&format!("stride = {}\n", self.stride()));
        let root = match self.root_preview {
            Some(index) => index.to_string(),
            None => format!("{}none{}", c.dim, c.reset),
        };
        out.push_str(&format!("root_preview = {root}\n"));

        if !self.auxiliary.is_empty() {
            out.push_str(&format!("\n{}[auxiliary]{}\n", c.blue, c.reset));
            for (name, index) in &self.auxiliary {
                out.push_str(&format!("{}{name}{} = {index}\n", c.green, c.reset));
            }
        }

        out.push_str(&format!("\n{}[tree]{}\n", c.blue, c.reset));
        out.push_str(&tree::dump_annotated(&self.tree, &self.previews));
        out
    }
}

pub(crate) fn publish<M: Machine>(
    compiled: &CompiledPattern,
    machine: &mut M,
    registry: &mut Registry,
    config: OptimizerConfig,
) -> Result<PublishedPattern> {
    let mut tree = compiled.tree.clone();
    let mut diagnostics = compiled.diagnostics.clone();
    let encoding = compiled.encoding;
    let before = machine.next_free_state();

    for id in tree.preorder() {
        publish_leaf(&mut tree, id, compiled.ignore_case, machine, registry)?;
    }

    for id in tree.preorder() {
        let NodeKind::ClassReference { target } = *tree.kind(id) else {
            continue;
        };
        publish_leaf(&mut tree, target, compiled.ignore_case, machine, registry)?;
        match *tree.kind(target) {
            NodeKind::CompiledClass { index } => {
                tree.set_kind(id, NodeKind::CompiledClass { index });
            }
            _ => {
                return Err(unexpected(&tree, target));
            }
        }
    }

    let mut auxiliary = IndexMap::new();
    for (name, &id) in &compiled.auxiliary {
        let NodeKind::CharClassLeaf(class) = tree.kind(id) else {
            return Err(unexpected(&tree, id));
        };
        let index = registry.lookup_or_publish(machine, name, class)?;
        auxiliary.insert(name.clone(), index);
    }

    for id in tree.preorder() {
        match tree.kind(id) {
            NodeKind::Group { .. }
            | NodeKind::Alternation { .. }
            | NodeKind::Repeat { .. }
            | NodeKind::Anchor(_)
            | NodeKind::CompiledClass { .. } => {}
            _ => return Err(unexpected(&tree, id)),
        }
    }
    log::debug!(
        "published {} states for {} ({} auxiliary)",
        machine.next_free_state() - before,
        encoding,
        auxiliary.len()
    );

    let hints = Optimizer::new(
        &mut tree,
        encoding,
        compiled.ignore_case,
        registry,
        machine,
        config,
        &mut diagnostics,
    )
    .run()?;

    Ok(PublishedPattern {
        tree,
        encoding,
        root_preview: hints.root_preview,
        previews: hints.previews,
        auxiliary,
        diagnostics,
    })
}

/// Publish `id` if it is still a leaf, turning it into `CompiledClass`.
fn publish_leaf<M: Machine>(
    tree: &mut SyntaxTree,
    id: NodeId,
    ignore_case: bool,
    machine: &mut M,
    registry: &mut Registry,
) -> Result<()> {
    let NodeKind::CharClassLeaf(class) = tree.kind(id) else {
        return Ok(());
    };
    let key = Registry::key(&tree.node(id).text, ignore_case);
    let index = registry.lookup_or_publish(machine, &key, class)?;
    tree.set_kind(id, NodeKind::CompiledClass { index });
    Ok(())
}

fn unexpected(tree: &SyntaxTree, id: NodeId) -> crate::Error {
    let node = tree.node(id);
    InternalError::UnexpectedNode {
        kind: node.kind.name(),
        span: node.span,
    }
    .into()
}
