use trellis_core::CharacterClass;

use crate::properties::PropertySource;
use crate::tree::{NodeId, NodeKind, Relation};
use crate::{InternalError, Result};

use super::Rewriter;

impl<P: PropertySource> Rewriter<'_, P> {
    /// Merge class unions and relations into single leaves, innermost first.
    pub(super) fn collapse(&mut self) -> Result<()> {
        let mut pending: Vec<NodeId> = self
            .tree
            .preorder()
            .into_iter()
            .filter(|&id| {
                matches!(
                    self.tree.kind(id),
                    NodeKind::ClassUnion { .. } | NodeKind::ClassRelation { .. }
                )
            })
            .collect();

        while !pending.is_empty() {
            let Some(pos) = pending.iter().position(|&id| self.is_mergeable(id)) else {
                return Err(InternalError::StalledMerge {
                    pending: pending.len(),
                }
                .into());
            };
            let id = pending.remove(pos);
            let merged = self.merge(id);
            self.tree.set_kind(id, NodeKind::CharClassLeaf(merged));
        }
        Ok(())
    }

    fn is_mergeable(&self, id: NodeId) -> bool {
        self.tree
            .children(id)
            .into_iter()
            .all(|child| matches!(self.tree.kind(child), NodeKind::CharClassLeaf(_)))
    }

    fn leaf(&self, id: NodeId) -> CharacterClass {
        match self.tree.kind(id) {
            NodeKind::CharClassLeaf(class) => class.clone(),
            _ => CharacterClass::empty(self.encoding),
        }
    }

    fn merge(&self, id: NodeId) -> CharacterClass {
        match self.tree.kind(id) {
            NodeKind::ClassUnion { children, negate } => {
                let mut class = CharacterClass::empty(self.encoding);
                for &child in children {
                    class.union(&self.leaf(child));
                }
                if *negate {
                    class.invert();
                }
                class
            }
            NodeKind::ClassRelation {
                relation,
                left,
                right,
            } => {
                let mut class = self.leaf(*left);
                let right = self.leaf(*right);
                match relation {
                    Relation::And => class.intersect(&right),
                    Relation::Diff => class.difference(&right),
                }
                class
            }
            _ => self.leaf(id),
        }
    }
}
