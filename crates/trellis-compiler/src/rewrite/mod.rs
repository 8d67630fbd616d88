//! Tree rewriter: turns a parsed pattern into a publish-ready tree.
//!
//! Stages run in a fixed order, each in its own module:
//! 1. `dot` - `.` becomes a property
//! 2. `minimize` - duplicate classes become references
//! 3. `leaves` - literals and properties become character classes
//! 4. `collapse` - class unions and relations merge into single leaves
//! 5. `void` - unmatchable subtrees are pruned or rejected
//! 6. `anchors` - auxiliary classes for assertions, then multi-line downgrade
//! 7. `lookahead` - every node learns what follows it
//!
//! Nothing here writes to the machine, so a rewrite can be discarded freely.

mod anchors;
mod collapse;
mod dot;
mod leaves;
mod lookahead;
mod minimize;
mod void;


use std::collections::HashMap;

use indexmap::IndexMap;
use trellis_core::Encoding;

use crate::diagnostics::Diagnostics;
use crate::properties::{PropertyCache, PropertySource};
use crate::registry::Registry;
use crate::tree::{NodeId, SyntaxTree};
use crate::{CompileOptions, Result};

/// Output of the rewriter, ready to publish.
///
/// After a successful rewrite the reachable tree holds only `Group`,
/// `Alternation`, `Repeat`, `Anchor`, `ClassReference`, `CompiledClass`
/// and `CharClassLeaf` nodes.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub(crate) tree: SyntaxTree,
    pub(crate) encoding: Encoding,
    pub(crate) ignore_case: bool,
    pub(crate) auxiliary: IndexMap<String, NodeId>,
    pub(crate) diagnostics: Diagnostics,
}

impl CompiledPattern {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Auxiliary class leaves by name. They live in the arena but are not
    /// reachable from the root.
    pub fn auxiliary(&self) -> &IndexMap<String, NodeId> {
        &self.auxiliary
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

pub(crate) struct Rewriter<'a, P> {
    tree: SyntaxTree,
    encoding: Encoding,
    options: &'a CompileOptions,
    properties: &'a mut PropertyCache<P>,
    registry: &'a Registry,
    diagnostics: Diagnostics,
    /// Call-scoped dedup of top-level classes, keyed like the registry.
    class_refs: HashMap<String, NodeId>,
    auxiliary: IndexMap<String, NodeId>,
    /// Dots that must exclude newlines.
    dot_newlines: Vec<NodeId>,
}

impl<'a, P: PropertySource> Rewriter<'a, P> {
    pub(crate) fn new(
        tree: SyntaxTree,
        encoding: Encoding,
        options: &'a CompileOptions,
        properties: &'a mut PropertyCache<P>,
        registry: &'a Registry,
    ) -> Self {
        Self {
            tree,
            encoding,
            options,
            properties,
            registry,
            diagnostics: Diagnostics::new(),
            class_refs: HashMap::new(),
            auxiliary: IndexMap::new(),
            dot_newlines: Vec::new(),
        }
    }

    pub(crate) fn run(mut self) -> Result<CompiledPattern> {
        log::debug!(
            "rewriting {} nodes under {}",
            self.tree.len(),
            self.encoding
        );
        self.normalize_dots();
        self.minimize()?;
        self.resolve_leaves();
        self.collapse()?;
        self.check_void()?;
        self.load_auxiliary()?;
        self.downgrade_anchors();
        self.link_look_ahead();
        log::debug!(
            "rewrite done: {} auxiliary classes, {} diagnostics",
            self.auxiliary.len(),
            self.diagnostics.len()
        );

        Ok(CompiledPattern {
            tree: self.tree,
            encoding: self.encoding,
            ignore_case: self.options.ignore_case,
            auxiliary: self.auxiliary,
            diagnostics: self.diagnostics,
        })
    }

    /// Registry key for a node's canonical text under the current flags.
    fn class_key(&self, id: NodeId) -> String {
        Registry::key(&self.tree.node(id).text, self.options.ignore_case)
    }
}
