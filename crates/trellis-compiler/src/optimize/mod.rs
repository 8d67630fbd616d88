//! Matching-time hints computed over a published tree.
//!
//! - `disjoint` - marks optional loops whose exit never competes with the loop body
//! - `preview` - bounded look-ahead classes for the pattern root and alternations
//! - `btree` - splits wide alternations into balanced dispatch nodes
//!
//! Every hint is optional. When the machine lacks room for a preview the hint
//! is skipped with a warning and matching stays correct.

mod btree;
mod disjoint;
mod preview;

#[cfg(test)]
mod optimize_tests;

use std::collections::HashMap;

use indexmap::IndexMap;
use trellis_bytecode::{Machine, Publish, StateId};
use trellis_core::{CharacterClass, Encoding};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::registry::Registry;
use crate::tree::{NodeId, SyntaxTree};
use crate::{InternalError, OptimizerConfig, Result};

pub(crate) use preview::Preview;

pub(crate) struct Optimizer<'a, M> {
    tree: &'a mut SyntaxTree,
    encoding: Encoding,
    ignore_case: bool,
    registry: &'a Registry,
    machine: &'a mut M,
    config: OptimizerConfig,
    diagnostics: &'a mut Diagnostics,
    /// Previews computed while building dispatch trees, reused bottom-up.
    cache: HashMap<NodeId, Preview>,
    previews: IndexMap<NodeId, StateId>,
}

/// Hints produced by one optimizer run.
#[derive(Debug, Default)]
pub(crate) struct Hints {
    pub(crate) root_preview: Option<StateId>,
    pub(crate) previews: IndexMap<NodeId, StateId>,
}

impl<'a, M: Machine> Optimizer<'a, M> {
    pub(crate) fn new(
        tree: &'a mut SyntaxTree,
        encoding: Encoding,
        ignore_case: bool,
        registry: &'a Registry,
        machine: &'a mut M,
        config: OptimizerConfig,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            tree,
            encoding,
            ignore_case,
            registry,
            machine,
            config,
            diagnostics,
            cache: HashMap::new(),
            previews: IndexMap::new(),
        }
    }

    pub(crate) fn run(mut self) -> Result<Hints> {
        self.mark_disjoint_repeats();

        let root = self.tree.root();
        let root_preview = match self.scan(root, self.config.root_scan_length) {
            Some(scan) => self.publish_preview(root, scan)?,
            None => None,
        };
        log::debug!("root preview: {root_preview:?}");

        self.build_alt_trees()?;
        log::debug!("published {} alternation previews", self.previews.len());

        Ok(Hints {
            root_preview,
            previews: self.previews,
        })
    }

    /// Fold a scan into one byte automaton and publish it if it fits.
    fn publish_preview(
        &mut self,
        node: NodeId,
        scan: Vec<CharacterClass>,
    ) -> Result<Option<StateId>> {
        let mut classes = scan.iter();
        let Some(first) = classes.next() else {
            return Ok(None);
        };
        let graph = first
            .to_graph()
            .and_then(|first| {
                classes.try_fold(first, |graph, class| graph.append_sequence(&class.to_graph()?))
            })
            .map_err(InternalError::from)?;

        // A preview never takes the last free state.
        let required = graph.state_size();
        let available = self.machine.remaining();
        if required >= available {
            self.diagnostics
                .report(DiagnosticKind::PreviewSkipped, self.tree.node(node).span)
                .message(format!("{required} states required, {available} available"))
                .emit();
            return Ok(None);
        }

        let index = graph
            .publish_to(&mut *self.machine)
            .map_err(InternalError::AllocationAfterCheck)?;
        Ok(Some(index))
    }
}
