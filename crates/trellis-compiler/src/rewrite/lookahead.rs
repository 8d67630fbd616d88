use crate::properties::PropertySource;
use crate::tree::{NodeId, NodeKind};

use super::Rewriter;

impl<P: PropertySource> Rewriter<'_, P> {
    /// Point every node at the node matched right after it.
    pub(super) fn link_look_ahead(&mut self) {
        let root = self.tree.root();
        self.link(root, None);
    }

    fn link(&mut self, id: NodeId, follow: Option<NodeId>) {
        self.tree.node_mut(id).look_ahead = follow;
        match self.tree.kind(id).clone() {
            NodeKind::Group { children, .. } => {
                for (i, &child) in children.iter().enumerate() {
                    let next = children.get(i + 1).copied().or(follow);
                    self.link(child, next);
                }
            }
            // Branches share the alternation's follower, never each other.
            NodeKind::Alternation { children, .. } => {
                for child in children {
                    self.link(child, follow);
                }
            }
            NodeKind::Repeat { body, .. } => self.link(body, follow),
            _ => {}
        }
    }
}
