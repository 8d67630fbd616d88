//! Bottom-up construction of a [`SyntaxTree`].
//!
//! Children are always allocated before their parent, so node ids grow
//! towards the root. Each node records its canonical text as it is built.

use super::{AnchorKind, Node, NodeId, NodeKind, Relation, SyntaxTree};
use crate::Span;

#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
    source: Option<String>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the pattern source so diagnostics can point into it.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn literal(&mut self, c: char, span: Span) -> NodeId {
        self.range(c, c, span)
    }

    pub fn range(&mut self, first: char, last: char, span: Span) -> NodeId {
        let text = if first == last {
            char_text(first)
        } else {
            format!("{}-{}", char_text(first), char_text(last))
        };
        self.push(NodeKind::Literal { first, last }, span, text)
    }

    pub fn byte(&mut self, byte: u8, span: Span) -> NodeId {
        self.byte_range(byte, byte, span)
    }

    pub fn byte_range(&mut self, first: u8, last: u8, span: Span) -> NodeId {
        let text = if first == last {
            format!("\\x{first:02x}")
        } else {
            format!("\\x{first:02x}-\\x{last:02x}")
        };
        self.push(NodeKind::ByteLiteral { first, last }, span, text)
    }

    /// A named property. An empty `name` selects a built-in extra such as `word`.
    pub fn property(&mut self, name: &str, value: &str, negate: bool, span: Span) -> NodeId {
        let kind = NodeKind::Property {
            name: name.to_string(),
            value: value.to_string(),
            negate,
        };
        self.push(kind, span, property_text(name, value, negate))
    }

    pub fn dot(&mut self, negate: bool, span: Span) -> NodeId {
        let text = if negate { "[^.]" } else { "." };
        self.push(NodeKind::Dot { negate }, span, text.to_string())
    }

    pub fn class_union(&mut self, children: Vec<NodeId>, negate: bool, span: Span) -> NodeId {
        let mut parts: Vec<&str> = children.iter().map(|&c| self.text(c)).collect();
        parts.sort_unstable();
        parts.dedup();
        let text = format!("[{}{}]", if negate { "^" } else { "" }, parts.concat());
        self.push(NodeKind::ClassUnion { children, negate }, span, text)
    }

    pub fn class_relation(
        &mut self,
        relation: Relation,
        left: NodeId,
        right: NodeId,
        span: Span,
    ) -> NodeId {
        let op = match relation {
            Relation::And => "&&",
            Relation::Diff => "--",
        };
        let text = format!("[{}{op}{}]", self.text(left), self.text(right));
        let kind = NodeKind::ClassRelation {
            relation,
            left,
            right,
        };
        self.push(kind, span, text)
    }

    /// A sequence of nodes matched one after another.
    pub fn group(&mut self, children: Vec<NodeId>, span: Span) -> NodeId {
        let text = self.concat(&children);
        let kind = NodeKind::Group {
            children,
            zero_width: false,
        };
        self.push(kind, span, text)
    }

    /// A look-ahead body: matched, but consumes nothing.
    pub fn zero_width_group(&mut self, children: Vec<NodeId>, span: Span) -> NodeId {
        let text = format!("(?={})", self.concat(&children));
        let kind = NodeKind::Group {
            children,
            zero_width: true,
        };
        self.push(kind, span, text)
    }

    pub fn alternation(&mut self, children: Vec<NodeId>, span: Span) -> NodeId {
        let branches: Vec<&str> = children.iter().map(|&c| self.text(c)).collect();
        let text = format!("(?:{})", branches.join("|"));
        let kind = NodeKind::Alternation {
            children,
            b_node: false,
        };
        self.push(kind, span, text)
    }

    /// `body{min,max}`; `max` of `None` is unbounded. Bounds are swapped if given reversed.
    pub fn repeat(&mut self, body: NodeId, min: u32, max: Option<u32>, span: Span) -> NodeId {
        let (min, max) = match max {
            Some(max) if max < min => (max, Some(min)),
            _ => (min, max),
        };
        let text = repeat_text(self.text(body), min, max);
        let kind = NodeKind::Repeat {
            body,
            min,
            max,
            disjoint: false,
        };
        self.push(kind, span, text)
    }

    pub fn anchor(&mut self, kind: AnchorKind, span: Span) -> NodeId {
        self.push(NodeKind::Anchor(kind), span, kind.text().to_string())
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    /// Finish the tree with `root` as its entry point.
    pub fn build(self, root: NodeId) -> SyntaxTree {
        debug_assert!(root.index() < self.nodes.len(), "root {root} not allocated");
        SyntaxTree {
            nodes: self.nodes,
            root,
            source: self.source,
        }
    }

    fn text(&self, id: NodeId) -> &str {
        &self.nodes[id.index()].text
    }

    fn concat(&self, children: &[NodeId]) -> String {
        children.iter().map(|&c| self.text(c)).collect()
    }

    fn push(&mut self, kind: NodeKind, span: Span, text: String) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            span,
            text,
            look_ahead: None,
        });
        id
    }
}

/// Canonical spelling of one character.
fn char_text(c: char) -> String {
    if c.is_ascii_alphanumeric() || c == '_' {
        c.to_string()
    } else {
        format!("\\x{{{:x}}}", c as u32)
    }
}

/// `{name=value}`, with `^` after the brace when negated.
pub(crate) fn property_text(name: &str, value: &str, negate: bool) -> String {
    format!("{{{}{name}={value}}}", if negate { "^" } else { "" })
}

fn repeat_text(body: &str, min: u32, max: Option<u32>) -> String {
    match max {
        Some(max) if max == min => format!("(?:{body}){{{min}}}"),
        Some(max) => format!("(?:{body}){{{min},{max}}}"),
        None => format!("(?:{body}){{{min},}}"),
    }
}
