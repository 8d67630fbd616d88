use trellis_core::CharacterClass;

use crate::diagnostics::DiagnosticKind;
use crate::properties::PropertySource;
use crate::tree::NodeKind;

use super::Rewriter;

impl<P: PropertySource> Rewriter<'_, P> {
    /// Resolve literals and properties to character classes.
    ///
    /// Empty results are kept and reported; void detection decides what
    /// they mean for the enclosing structure.
    pub(super) fn resolve_leaves(&mut self) {
        let encoding = self.encoding;
        for id in self.tree.preorder() {
            let class = match self.tree.kind(id).clone() {
                NodeKind::Literal { first, last } if first == last => {
                    CharacterClass::from_char(encoding, first, self.options.ignore_case)
                }
                NodeKind::Literal { first, last } => {
                    CharacterClass::from_range(encoding, first, last)
                }
                NodeKind::ByteLiteral { first, last } => {
                    CharacterClass::from_byte_range(encoding, first, last)
                }
                NodeKind::Property {
                    name,
                    value,
                    negate,
                } => match self.properties.get(encoding, &name, &value) {
                    Some(mut class) => {
                        if negate {
                            class.invert();
                        }
                        class
                    }
                    None => {
                        let span = self.tree.node(id).span;
                        let text = self.tree.node(id).text.clone();
                        self.diagnostics
                            .report(DiagnosticKind::MissingProperty, span)
                            .message(text)
                            .emit();
                        CharacterClass::empty(encoding)
                    }
                },
                _ => continue,
            };

            if class.is_empty() {
                let node = self.tree.node(id);
                let (span, text) = (node.span, node.text.clone());
                self.diagnostics
                    .report(DiagnosticKind::VoidLeaf, span)
                    .message(text)
                    .emit();
            }
            self.tree.set_kind(id, NodeKind::CharClassLeaf(class));
        }
    }
}
