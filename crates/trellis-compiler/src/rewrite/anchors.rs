//! Auxiliary classes required by zero-width assertions.

use trellis_core::CharacterClass;

use crate::properties::PropertySource;
use crate::tree::{AnchorKind, Node, NodeKind, property_text};
use crate::{AuxTrigger, Error, Result, Span};

/// One auxiliary class: the union of `values` of `property`.
struct AuxClass {
    property: &'static str,
    values: &'static [&'static str],
    /// A missing or empty value is skipped instead of failing the compile.
    silent: bool,
}

impl AuxClass {
    const fn extra(value: &'static [&'static str]) -> Self {
        Self {
            property: "",
            values: value,
            silent: false,
        }
    }

    const fn gcb(values: &'static [&'static str], silent: bool) -> Self {
        Self {
            property: "grapheme_cluster_break",
            values,
            silent,
        }
    }

    fn name(&self) -> String {
        property_text(self.property, &self.values.join("|"), false)
    }
}

const WORD: &[AuxClass] = &[AuxClass::extra(&["word"]), AuxClass::extra(&["not_word"])];

const NEWLINE: &[AuxClass] = &[AuxClass::extra(&["newline"])];

const GRAPHEME: &[AuxClass] = &[
    AuxClass::gcb(&["cr"], false),
    AuxClass::gcb(&["lf"], false),
    AuxClass::gcb(&["control", "cr", "lf"], false),
    AuxClass::gcb(&["l"], false),
    AuxClass::gcb(&["l", "v", "lv", "lvt"], false),
    AuxClass::gcb(&["lv", "v"], false),
    AuxClass::gcb(&["v", "t"], false),
    AuxClass::gcb(&["lvt", "t"], false),
    AuxClass::gcb(&["t"], false),
    AuxClass::gcb(&["regional_indicator"], false),
    AuxClass::gcb(&["extend"], false),
    AuxClass::gcb(&["spacingmark"], false),
    AuxClass::gcb(&["prepend"], true),
    AuxClass::extra(&["any"]),
];

fn requirements(kind: AnchorKind) -> &'static [AuxClass] {
    match kind {
        AnchorKind::WordBoundary | AnchorKind::NotWordBoundary => WORD,
        AnchorKind::TextStart | AnchorKind::TextEnd => NEWLINE,
        AnchorKind::GraphemeBoundary => GRAPHEME,
        AnchorKind::BufferStart | AnchorKind::BufferEnd => &[],
    }
}

impl<P: PropertySource> super::Rewriter<'_, P> {
    /// Without multi-line mode, text anchors match only at buffer edges.
    /// Runs after the auxiliary load, so their newline class is still published.
    pub(super) fn downgrade_anchors(&mut self) {
        if self.options.multi_line {
            return;
        }
        for id in self.tree.preorder() {
            let NodeKind::Anchor(kind) = *self.tree.kind(id) else {
                continue;
            };
            let lowered = match kind {
                AnchorKind::TextStart => AnchorKind::BufferStart,
                AnchorKind::TextEnd => AnchorKind::BufferEnd,
                _ => continue,
            };
            self.tree.set_kind(id, NodeKind::Anchor(lowered));
        }
    }

    /// Load every class the pattern's anchors and dots need but do not spell out.
    pub(super) fn load_auxiliary(&mut self) -> Result<()> {
        for id in self.tree.preorder() {
            if let NodeKind::Anchor(kind) = *self.tree.kind(id) {
                let span = self.tree.node(id).span;
                for aux in requirements(kind) {
                    self.load(aux, AuxTrigger::Anchor(kind), span)?;
                }
            }
        }
        for id in std::mem::take(&mut self.dot_newlines) {
            let span = self.tree.node(id).span;
            for aux in NEWLINE {
                self.load(aux, AuxTrigger::Dot, span)?;
            }
        }
        Ok(())
    }

    fn load(&mut self, aux: &AuxClass, trigger: AuxTrigger, span: Span) -> Result<()> {
        let name = aux.name();
        if self.auxiliary.contains_key(&name) {
            return Ok(());
        }

        let mut class = CharacterClass::empty(self.encoding);
        for value in aux.values {
            match self.properties.get(self.encoding, aux.property, value) {
                Some(found) if !found.is_empty() => class.union(&found),
                _ if aux.silent => log::debug!("skipped empty auxiliary value {value} of {name}"),
                _ => {
                    return Err(Error::MissingAuxiliary {
                        trigger,
                        class: name,
                        encoding: self.encoding,
                        span,
                    });
                }
            }
        }

        log::debug!("loaded auxiliary class {name} for {trigger}");
        let id = self.tree.push(Node {
            kind: NodeKind::CharClassLeaf(class),
            span,
            text: name.clone(),
            look_ahead: None,
        });
        self.auxiliary.insert(name, id);
        Ok(())
    }
}
