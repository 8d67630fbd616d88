use trellis_bytecode::StateId;

use crate::Result;
use crate::properties::PropertySource;
use crate::tree::{NodeId, NodeKind};

use super::Rewriter;

impl<P: PropertySource> Rewriter<'_, P> {
    /// Deduplicate top-level classes.
    ///
    /// A class already published for this encoding becomes `CompiledClass`;
    /// a repeat of a class seen earlier in this pattern becomes a reference
    /// to the first occurrence.
    pub(super) fn minimize(&mut self) -> Result<()> {
        let mut classes = self.top_level_classes();
        classes.sort_unstable();

        for id in classes {
            let key = self.class_key(id);
            if let Some(index) = self.registry.get(self.encoding, &key) {
                self.compiled(id, index);
            } else if let Some(&target) = self.class_refs.get(&key) {
                self.tree.make_reference(id, target)?;
            } else {
                self.class_refs.insert(key, id);
            }
        }
        Ok(())
    }

    /// Class unions not nested inside another class expression.
    fn top_level_classes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.tree.root()];
        while let Some(id) = stack.pop() {
            match self.tree.kind(id) {
                NodeKind::ClassUnion { .. } => out.push(id),
                NodeKind::ClassRelation { .. } => {}
                kind => stack.extend(kind.children()),
            }
        }
        out
    }

    fn compiled(&mut self, id: NodeId, index: StateId) {
        self.tree.set_kind(id, NodeKind::CompiledClass { index });
    }
}
