use crate::properties::PropertySource;
use crate::tree::{NodeKind, property_text};

use super::Rewriter;

impl<P: PropertySource> Rewriter<'_, P> {
    /// Replace every `.` with the `any` or `dot_any` property.
    pub(super) fn normalize_dots(&mut self) {
        for id in self.tree.preorder() {
            let NodeKind::Dot { negate } = *self.tree.kind(id) else {
                continue;
            };
            let value = if self.options.dot_all { "any" } else { "dot_any" };
            if !self.options.dot_all {
                self.dot_newlines.push(id);
            }
            let node = self.tree.node_mut(id);
            node.text = property_text("", value, negate);
            node.kind = NodeKind::Property {
                name: String::new(),
                value: value.to_string(),
                negate,
            };
        }
    }
}
