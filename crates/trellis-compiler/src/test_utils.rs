//! Test utilities: a compact fixture parser and pipeline shortcuts.
//!
//! The fixture parser understands just enough regex syntax to write pipeline
//! tests as patterns. It panics on malformed input.

use trellis_bytecode::StateTable;

use crate::tree::{AnchorKind, NodeId, NodeKind, Relation, SyntaxTree, TreeBuilder};
use crate::{BuiltinProperties, CompileOptions, Compiler, PublishedPattern, Result, Span};

/// Parse a fixture pattern. The root is always a `Group`.
pub fn parse(pattern: &str) -> SyntaxTree {
    let mut parser = FixtureParser {
        chars: pattern.char_indices().collect(),
        pos: 0,
        len: pattern.len(),
        builder: TreeBuilder::new().source(pattern),
    };
    let start = parser.offset();
    let mut branches = vec![parser.sequence()];
    while parser.eat('|') {
        branches.push(parser.sequence());
    }
    assert!(parser.at_end(), "unexpected `{:?}` in {pattern:?}", parser.peek());
    let span = parser.span_from(start);
    let root = match branches[..] {
        [only] if is_plain_group(&parser.builder, only) => only,
        [only] => parser.builder.group(vec![only], span),
        _ => {
            let alt = parser.builder.alternation(branches, span);
            parser.builder.group(vec![alt], span)
        }
    };
    parser.builder.build(root)
}

/// A compiler over a fresh, default-sized state table.
pub fn compiler() -> Compiler<StateTable, BuiltinProperties> {
    Compiler::builder(StateTable::new(), BuiltinProperties).build()
}

/// Compile and publish a fixture pattern under `encoding`.
pub fn publish(pattern: &str, encoding: &str) -> Result<PublishedPattern> {
    compile_with(pattern, CompileOptions::new().encoding(encoding))
}

pub fn compile_with(pattern: &str, options: CompileOptions) -> Result<PublishedPattern> {
    compiler().compile_and_publish(&parse(pattern), &options)
}

fn is_plain_group(builder: &TreeBuilder, id: NodeId) -> bool {
    matches!(
        builder.kind(id),
        NodeKind::Group {
            zero_width: false,
            ..
        }
    )
}

struct FixtureParser {
    chars: Vec<(usize, char)>,
    pos: usize,
    len: usize,
    builder: TreeBuilder,
}

impl FixtureParser {
    /// Atoms up to `|`, `)` or the end. A lone atom is returned unwrapped.
    fn sequence(&mut self) -> NodeId {
        let start = self.offset();
        let mut items = Vec::new();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            let atom = self.atom();
            let atom = self.quantifier(atom);
            items.push(atom);
        }
        if items.len() == 1 {
            return items[0];
        }
        let span = self.span_from(start);
        self.builder.group(items, span)
    }

    fn atom(&mut self) -> NodeId {
        let start = self.offset();
        let c = self.bump();
        match c {
            '(' => self.group(start),
            '[' => self.class(start),
            '.' => {
                let span = self.span_from(start);
                self.builder.dot(false, span)
            }
            '^' => {
                let span = self.span_from(start);
                self.builder.anchor(AnchorKind::TextStart, span)
            }
            '$' => {
                let span = self.span_from(start);
                self.builder.anchor(AnchorKind::TextEnd, span)
            }
            '\\' => self.escape(start, false),
            c => {
                let span = self.span_from(start);
                self.builder.literal(c, span)
            }
        }
    }

    fn group(&mut self, start: u32) -> NodeId {
        let zero_width = if self.eat('?') {
            match self.bump() {
                ':' => false,
                '=' => true,
                other => panic!("unsupported group flag `{other}`"),
            }
        } else {
            false
        };
        let mut branches = vec![self.sequence()];
        while self.eat('|') {
            branches.push(self.sequence());
        }
        assert!(self.eat(')'), "unclosed group");
        let span = self.span_from(start);
        let inner = if branches.len() == 1 {
            branches[0]
        } else {
            self.builder.alternation(branches, span)
        };
        if zero_width {
            self.builder.zero_width_group(vec![inner], span)
        } else {
            inner
        }
    }

    /// Bracketed class; `[` already consumed.
    fn class(&mut self, start: u32) -> NodeId {
        let negate = self.eat('^');
        let mut items = self.class_items();
        loop {
            let relation = if self.eat_str("&&") {
                Relation::And
            } else if self.eat_str("--") {
                Relation::Diff
            } else {
                break;
            };
            let left = self.class_operand(items, start);
            let right_items = self.class_items();
            let right = self.class_operand(right_items, start);
            let span = self.span_from(start);
            items = vec![self.builder.class_relation(relation, left, right, span)];
        }
        assert!(self.eat(']'), "unclosed class");
        let span = self.span_from(start);
        self.builder.class_union(items, negate, span)
    }

    fn class_operand(&mut self, items: Vec<NodeId>, start: u32) -> NodeId {
        if items.len() == 1 {
            return items[0];
        }
        let span = self.span_from(start);
        self.builder.class_union(items, false, span)
    }

    fn class_items(&mut self) -> Vec<NodeId> {
        let mut items = Vec::new();
        loop {
            if self.at_str("&&") || self.at_str("--") {
                break;
            }
            let start = self.offset();
            let c = match self.peek() {
                Some(']') if !items.is_empty() => break,
                Some(c) => c,
                None => panic!("unclosed class"),
            };
            self.bump();
            let item = match c {
                '[' => self.class(start),
                '\\' => self.escape(start, true),
                c if self.at('-') && !self.at_str("--") && self.peek_nth(1) != Some(']') => {
                    self.bump();
                    let last = match self.bump() {
                        '\\' => self.escaped_char(),
                        last => last,
                    };
                    let span = self.span_from(start);
                    self.builder.range(c, last, span)
                }
                c => {
                    let span = self.span_from(start);
                    self.builder.literal(c, span)
                }
            };
            items.push(item);
        }
        items
    }

    /// Escape body; `\` already consumed.
    fn escape(&mut self, start: u32, in_class: bool) -> NodeId {
        let c = self.bump();
        let anchor = match c {
            'b' if !in_class && self.eat_str("{g}") => Some(AnchorKind::GraphemeBoundary),
            'b' if !in_class => Some(AnchorKind::WordBoundary),
            'B' if !in_class => Some(AnchorKind::NotWordBoundary),
            'A' if !in_class => Some(AnchorKind::BufferStart),
            'z' if !in_class => Some(AnchorKind::BufferEnd),
            _ => None,
        };
        if let Some(kind) = anchor {
            let span = self.span_from(start);
            return self.builder.anchor(kind, span);
        }
        let extra = match c {
            'd' | 'D' => Some("digit"),
            'w' | 'W' => Some("word"),
            's' | 'S' => Some("space"),
            _ => None,
        };
        if let Some(value) = extra {
            let span = self.span_from(start);
            return self
                .builder
                .property("", value, c.is_ascii_uppercase(), span);
        }
        match c {
            'p' | 'P' => {
                assert!(self.eat('{'), "expected `{{` after \\{c}");
                let mut body = String::new();
                while !self.eat('}') {
                    body.push(self.bump());
                }
                let (name, value) = body.split_once('=').unwrap_or(("", &body));
                let span = self.span_from(start);
                self.builder.property(name, value, c == 'P', span)
            }
            'x' if self.eat('{') => {
                let mut hex = String::new();
                while !self.eat('}') {
                    hex.push(self.bump());
                }
                let code = u32::from_str_radix(&hex, 16).expect("hex escape");
                let ch = char::from_u32(code).expect("valid scalar");
                let span = self.span_from(start);
                self.builder.literal(ch, span)
            }
            'x' => {
                let hex: String = [self.bump(), self.bump()].iter().collect();
                let byte = u8::from_str_radix(&hex, 16).expect("byte escape");
                let span = self.span_from(start);
                self.builder.byte(byte, span)
            }
            c => {
                let ch = simple_escape(c);
                let span = self.span_from(start);
                self.builder.literal(ch, span)
            }
        }
    }

    fn escaped_char(&mut self) -> char {
        simple_escape(self.bump())
    }

    fn quantifier(&mut self, atom: NodeId) -> NodeId {
        let start = self.offset();
        let (min, max) = match self.peek() {
            Some('*') => (0, None),
            Some('+') => (1, None),
            Some('?') => (0, Some(1)),
            Some('{') if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.bump();
                let min = self.number();
                let max = if self.eat(',') {
                    if self.at('}') { None } else { Some(self.number()) }
                } else {
                    Some(min)
                };
                assert!(self.eat('}'), "unclosed repeat");
                let span = self.span_from(start);
                return self.builder.repeat(atom, min, max, span);
            }
            _ => return atom,
        };
        self.bump();
        let span = self.span_from(start);
        self.builder.repeat(atom, min, max, span)
    }

    fn number(&mut self) -> u32 {
        let mut n = 0u32;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            self.bump();
            n = n * 10 + d;
        }
        n
    }

    fn peek(&self) -> Option<char> {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).map(|&(_, c)| c)
    }

    fn at(&self, c: char) -> bool {
        self.peek() == Some(c)
    }

    fn at_str(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| self.peek_nth(i) == Some(c))
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn bump(&mut self) -> char {
        let c = self.peek().expect("unexpected end of pattern");
        self.pos += 1;
        c
    }

    fn eat(&mut self, c: char) -> bool {
        if self.at(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, s: &str) -> bool {
        if self.at_str(s) {
            self.pos += s.chars().count();
            true
        } else {
            false
        }
    }

    fn offset(&self) -> u32 {
        self.chars
            .get(self.pos)
            .map_or(self.len, |&(offset, _)| offset) as u32
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.offset())
    }
}

fn simple_escape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        'f' => '\x0c',
        'v' => '\x0b',
        '0' => '\0',
        c => c,
    }
}
