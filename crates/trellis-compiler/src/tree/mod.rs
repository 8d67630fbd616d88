//! Arena-allocated regex syntax tree.
//!
//! Nodes are addressed by [`NodeId`] and only ever appended, so an id handed
//! out earlier is always smaller than one handed out later. Rewrites replace
//! a node's kind in place; nodes that drop out of the tree stay in the arena
//! and are simply no longer reachable from the root.

mod builder;
mod dump;


use std::fmt;

use trellis_bytecode::StateId;
use trellis_core::CharacterClass;

use crate::{InternalError, Span};

pub use builder::TreeBuilder;
pub(crate) use builder::property_text;
pub use dump::{dump, dump_annotated};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Zero-width assertions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AnchorKind {
    TextStart,
    TextEnd,
    BufferStart,
    BufferEnd,
    WordBoundary,
    NotWordBoundary,
    GraphemeBoundary,
}

impl AnchorKind {
    pub fn text(self) -> &'static str {
        match self {
            Self::TextStart => "^",
            Self::TextEnd => "$",
            Self::BufferStart => r"\A",
            Self::BufferEnd => r"\z",
            Self::WordBoundary => r"\b",
            Self::NotWordBoundary => r"\B",
            Self::GraphemeBoundary => r"\b{g}",
        }
    }
}

impl fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TextStart => "text start",
            Self::TextEnd => "text end",
            Self::BufferStart => "buffer start",
            Self::BufferEnd => "buffer end",
            Self::WordBoundary => "word boundary",
            Self::NotWordBoundary => "not word boundary",
            Self::GraphemeBoundary => "grapheme boundary",
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Relation {
    /// `left && right`
    And,
    /// `left -- right`
    Diff,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Literal {
        first: char,
        last: char,
    },
    /// Raw bytes, independent of the encoding's characters.
    ByteLiteral {
        first: u8,
        last: u8,
    },
    /// Named property; an empty `name` selects the built-in extras (`any`, `word`, ...).
    Property {
        name: String,
        value: String,
        negate: bool,
    },
    Dot {
        negate: bool,
    },
    ClassUnion {
        children: Vec<NodeId>,
        negate: bool,
    },
    ClassRelation {
        relation: Relation,
        left: NodeId,
        right: NodeId,
    },
    Group {
        children: Vec<NodeId>,
        /// Look-around body: matched but not consumed.
        zero_width: bool,
    },
    Alternation {
        children: Vec<NodeId>,
        /// Synthetic dispatch node inserted by the optimizer.
        b_node: bool,
    },
    Repeat {
        body: NodeId,
        min: u32,
        max: Option<u32>,
        disjoint: bool,
    },
    Anchor(AnchorKind),
    ClassReference {
        target: NodeId,
    },
    CompiledClass {
        index: StateId,
    },
    CharClassLeaf(CharacterClass),
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Literal { .. } => "Literal",
            Self::ByteLiteral { .. } => "ByteLiteral",
            Self::Property { .. } => "Property",
            Self::Dot { .. } => "Dot",
            Self::ClassUnion { .. } => "ClassUnion",
            Self::ClassRelation { .. } => "ClassRelation",
            Self::Group { .. } => "Group",
            Self::Alternation { .. } => "Alternation",
            Self::Repeat { .. } => "Repeat",
            Self::Anchor(_) => "Anchor",
            Self::ClassReference { .. } => "ClassReference",
            Self::CompiledClass { .. } => "CompiledClass",
            Self::CharClassLeaf(_) => "CharClassLeaf",
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Self::ClassUnion { children, .. }
            | Self::Group { children, .. }
            | Self::Alternation { children, .. } => children.clone(),
            Self::ClassRelation { left, right, .. } => vec![*left, *right],
            Self::Repeat { body, .. } => vec![*body],
            _ => Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    /// Canonical pattern text, used as the class dedup key.
    pub text: String,
    /// The node matched immediately after this one, once linked.
    pub look_ahead: Option<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: NodeId,
    source: Option<String>,
}

impl SyntaxTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Total nodes in the arena, reachable or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).children()
    }

    /// Replace a node's kind, keeping its span and text.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.index()].kind = kind;
    }

    /// Append a node to the arena.
    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Reachable nodes in pre-order from `start`.
    pub fn preorder_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).into_iter().rev());
        }
        out
    }

    pub fn preorder(&self) -> Vec<NodeId> {
        self.preorder_from(self.root)
    }

    /// Turn `node` into a reference to `target`.
    ///
    /// The target must have been allocated before `node`, which keeps
    /// references acyclic.
    pub fn make_reference(&mut self, node: NodeId, target: NodeId) -> Result<(), InternalError> {
        if target >= node {
            return Err(InternalError::ForwardReference {
                from: node,
                to: target,
            });
        }
        self.set_kind(node, NodeKind::ClassReference { target });
        Ok(())
    }
}
