use trellis_bytecode::Machine;
use trellis_core::CharacterClass;

use crate::tree::{NodeId, NodeKind};

use super::Optimizer;

impl<M: Machine> Optimizer<'_, M> {
    /// Mark repeats whose single-character body never overlaps the first
    /// character of what follows, so the loop exit needs no extra test.
    pub(super) fn mark_disjoint_repeats(&mut self) {
        for id in self.tree.preorder() {
            let NodeKind::Repeat { body, .. } = *self.tree.kind(id) else {
                continue;
            };
            let Some(body_class) = self.single_char_class(body) else {
                continue;
            };
            let Some(follow) = self.tree.node(id).look_ahead else {
                continue;
            };
            // Assertions have no characters to compare against.
            if matches!(
                self.tree.kind(follow),
                NodeKind::Anchor(_)
                    | NodeKind::Group {
                        zero_width: true,
                        ..
                    }
            ) {
                continue;
            }
            let Some(scan) = self.scan(follow, 1) else {
                continue;
            };
            if body_class.is_disjoint(&scan[0]) {
                log::debug!("repeat {id} is disjoint from {follow}");
                if let NodeKind::Repeat { disjoint, .. } = &mut self.tree.node_mut(id).kind {
                    *disjoint = true;
                }
            }
        }
    }

    /// The class matched by a node that always consumes exactly one character.
    fn single_char_class(&self, id: NodeId) -> Option<CharacterClass> {
        match self.tree.kind(id) {
            NodeKind::CompiledClass { index } => {
                self.registry.class(self.encoding, *index).cloned()
            }
            NodeKind::CharClassLeaf(class) => Some(class.clone()),
            NodeKind::ClassReference { target } => self.single_char_class(*target),
            NodeKind::Alternation { children, .. } if !children.is_empty() => {
                let mut union = CharacterClass::empty(self.encoding);
                for &child in children {
                    union.union(&self.single_char_class(child)?);
                }
                Some(union)
            }
            NodeKind::Group {
                children,
                zero_width: false,
            } if children.len() == 1 => self.single_char_class(children[0]),
            _ => None,
        }
    }
}
