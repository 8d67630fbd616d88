use trellis_bytecode::Machine;

use crate::Result;
use crate::tree::{Node, NodeId, NodeKind};

use super::Optimizer;

impl<M: Machine> Optimizer<'_, M> {
    /// Give every alternation a preview and split wide ones into dispatch nodes.
    pub(super) fn build_alt_trees(&mut self) -> Result<()> {
        let alternations: Vec<NodeId> = self
            .tree
            .preorder()
            .into_iter()
            .filter(|&id| matches!(self.tree.kind(id), NodeKind::Alternation { .. }))
            .collect();
        for alt in alternations {
            self.build_alt_tree(alt)?;
        }
        Ok(())
    }

    fn build_alt_tree(&mut self, alt: NodeId) -> Result<()> {
        let NodeKind::Alternation { children, b_node } = self.tree.kind(alt).clone() else {
            return Ok(());
        };
        if b_node || self.previews.contains_key(&alt) {
            return Ok(());
        }

        let length = self.config.btree_scan_length;
        for &child in &children {
            let preview = self.preview(child, length);
            self.cache.insert(child, preview);
        }

        let span = self.config.btree_span.max(2);
        let threshold = self.config.btree_threshold().max(span);
        if children.len() > threshold {
            let mut children = self.sorted(children);
            while children.len() > threshold {
                children = children
                    .chunks(span)
                    .map(|chunk| self.dispatch_node(alt, chunk))
                    .collect();
            }
            log::debug!("split alternation {alt} into {} dispatch nodes", children.len());
            self.tree.set_kind(
                alt,
                NodeKind::Alternation {
                    children,
                    b_node: false,
                },
            );
        }

        if let Some(scan) = self.scan(alt, length)
            && let Some(index) = self.publish_preview(alt, scan)?
        {
            self.previews.insert(alt, index);
        }

        for id in self.tree.preorder_from(alt) {
            let Some(preview) = self.cache.remove(&id) else {
                continue;
            };
            if id == alt || self.previews.contains_key(&id) {
                continue;
            }
            if let Some(scan) = preview.scan()
                && let Some(index) = self.publish_preview(id, scan)?
            {
                self.previews.insert(id, index);
            }
        }
        Ok(())
    }

    /// Branches ordered by canonical text, case-blind when matching is.
    fn sorted(&self, mut children: Vec<NodeId>) -> Vec<NodeId> {
        let key = |id: &NodeId| {
            let text = &self.tree.node(*id).text;
            if self.ignore_case {
                text.to_lowercase()
            } else {
                text.clone()
            }
        };
        children.sort_by_cached_key(key);
        children
    }

    /// Wrap `chunk` in a synthetic alternation that follows what `parent` follows.
    fn dispatch_node(&mut self, parent: NodeId, chunk: &[NodeId]) -> NodeId {
        let texts: Vec<&str> = chunk
            .iter()
            .map(|&id| self.tree.node(id).text.as_str())
            .collect();
        let text = format!("(?:{})", texts.join("|"));
        let span = chunk
            .iter()
            .map(|&id| self.tree.node(id).span)
            .reduce(|a, b| a.cover(b))
            .unwrap_or(self.tree.node(parent).span);
        let look_ahead = self.tree.node(parent).look_ahead;

        let id = self.tree.push(Node {
            kind: NodeKind::Alternation {
                children: chunk.to_vec(),
                b_node: true,
            },
            span,
            text,
            look_ahead,
        });
        let preview = self.preview(id, self.config.btree_scan_length);
        self.cache.insert(id, preview);
        id
    }
}
