use crate::diagnostics::DiagnosticKind;
use crate::properties::PropertySource;
use crate::tree::{NodeId, NodeKind};
use crate::{Error, InternalError, Result};

use super::Rewriter;

impl<P: PropertySource> Rewriter<'_, P> {
    /// Reject a pattern that can never match and prune void alternatives.
    pub(super) fn check_void(&mut self) -> Result<()> {
        let root = self.tree.root();
        if self.is_void(root)? {
            return Err(Error::VoidPattern {
                encoding: self.encoding,
                span: self.tree.node(root).span,
            });
        }
        Ok(())
    }

    /// Groups and repeats are void if any child is; alternations only if
    /// every branch is. Void branches of a live alternation are removed.
    fn is_void(&mut self, id: NodeId) -> Result<bool> {
        let node = self.tree.node(id);
        let span = node.span;
        match node.kind.clone() {
            NodeKind::CompiledClass { .. } | NodeKind::Anchor(_) => Ok(false),
            NodeKind::ClassReference { target } => self.is_void(target),
            NodeKind::CharClassLeaf(class) => Ok(class.is_empty()),
            NodeKind::Group { children, .. } => {
                let mut void = false;
                for child in children {
                    void |= self.is_void(child)?;
                }
                if void {
                    self.diagnostics
                        .report(DiagnosticKind::VoidGroup, span)
                        .emit();
                }
                Ok(void)
            }
            NodeKind::Repeat { body, .. } => {
                let void = self.is_void(body)?;
                if void {
                    self.diagnostics
                        .report(DiagnosticKind::VoidGroup, span)
                        .emit();
                }
                Ok(void)
            }
            NodeKind::Alternation { children, b_node } => {
                let mut live = Vec::with_capacity(children.len());
                let mut dead = Vec::new();
                for child in children {
                    if self.is_void(child)? {
                        dead.push(child);
                    } else {
                        live.push(child);
                    }
                }
                if live.is_empty() {
                    self.diagnostics
                        .report(DiagnosticKind::VoidAlternation, span)
                        .emit();
                    return Ok(true);
                }
                for child in dead {
                    let branch = self.tree.node(child);
                    let (branch_span, text) = (branch.span, branch.text.clone());
                    self.diagnostics
                        .report(DiagnosticKind::VoidBranch, branch_span)
                        .message(text)
                        .related_to("in this alternation", span)
                        .emit();
                }
                self.tree.set_kind(
                    id,
                    NodeKind::Alternation {
                        children: live,
                        b_node,
                    },
                );
                Ok(false)
            }
            kind => Err(InternalError::UnexpectedNode {
                kind: kind.name(),
                span,
            }
            .into()),
        }
    }
}
