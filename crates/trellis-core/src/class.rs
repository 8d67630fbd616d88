//! Character classes: sets of characters and raw bytes under one encoding.

use std::fmt;

use regex_syntax::hir::{ClassBytes, ClassBytesRange, ClassUnicode, ClassUnicodeRange};

use crate::encoding::{ByteSequence, Encoding};
use crate::graph::{ClassGraph, GraphError};

/// A set of characters (and, for byte-oriented patterns, raw bytes) in one encoding.
///
/// The universe of a class is the encoding's character space. Raw bytes only
/// enter through explicit byte literals and never through complement, so a
/// negated class matches whole characters only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterClass {
    encoding: Encoding,
    chars: ClassUnicode,
    bytes: ClassBytes,
}

impl CharacterClass {
    pub fn empty(encoding: Encoding) -> Self {
        Self {
            encoding,
            chars: ClassUnicode::empty(),
            bytes: ClassBytes::empty(),
        }
    }

    /// Every character the encoding can represent.
    pub fn full(encoding: Encoding) -> Self {
        Self {
            encoding,
            chars: encoding.char_space(),
            bytes: ClassBytes::empty(),
        }
    }

    /// A single character, case folded when `ignore_case` is set.
    pub fn from_char(encoding: Encoding, c: char, ignore_case: bool) -> Self {
        let mut chars = ClassUnicode::new([ClassUnicodeRange::new(c, c)]);
        if ignore_case {
            // Only fails without Unicode case tables; the literal then matches itself.
            let _ = chars.try_case_fold_simple();
        }
        Self::from_unicode(encoding, chars)
    }

    /// An inclusive character range. Ranges are never case folded.
    pub fn from_range(encoding: Encoding, first: char, last: char) -> Self {
        let mut class = Self::empty(encoding);
        class.add_range(first, last);
        class
    }

    /// An inclusive byte range, independent of character semantics.
    pub fn from_byte_range(encoding: Encoding, first: u8, last: u8) -> Self {
        let mut class = Self::empty(encoding);
        class.add_byte_range(first, last);
        class
    }

    /// Clip an arbitrary Unicode class to the encoding.
    pub fn from_unicode(encoding: Encoding, mut chars: ClassUnicode) -> Self {
        chars.intersect(&encoding.char_space());
        Self {
            encoding,
            chars,
            bytes: ClassBytes::empty(),
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn chars(&self) -> &ClassUnicode {
        &self.chars
    }

    pub fn raw_bytes(&self) -> &ClassBytes {
        &self.bytes
    }

    pub fn add_range(&mut self, first: char, last: char) {
        let (lo, hi) = if first <= last { (first, last) } else { (last, first) };
        let mut range = ClassUnicode::new([ClassUnicodeRange::new(lo, hi)]);
        range.intersect(&self.encoding.char_space());
        self.chars.union(&range);
    }

    /// Add bytes `first..=last`. Bytes that are characters in this encoding
    /// join the character set; the rest are kept as raw bytes.
    pub fn add_byte_range(&mut self, first: u8, last: u8) {
        let (lo, hi) = if first <= last { (first, last) } else { (last, first) };
        let mut raw = ClassBytes::new([ClassBytesRange::new(lo, hi)]);
        raw.intersect(&self.encoding.raw_byte_space());
        self.bytes.union(&raw);

        let chars: Vec<ClassUnicodeRange> = (lo..=hi)
            .filter_map(|b| self.encoding.byte_char(b))
            .map(|c| ClassUnicodeRange::new(c, c))
            .collect();
        self.chars.union(&ClassUnicode::new(chars));
    }

    pub fn union(&mut self, other: &CharacterClass) {
        self.ensure_same_encoding(other);
        self.chars.union(&other.chars);
        self.bytes.union(&other.bytes);
    }

    pub fn intersect(&mut self, other: &CharacterClass) {
        self.ensure_same_encoding(other);
        self.chars.intersect(&other.chars);
        self.bytes.intersect(&other.bytes);
    }

    pub fn difference(&mut self, other: &CharacterClass) {
        self.ensure_same_encoding(other);
        self.chars.difference(&other.chars);
        self.bytes.difference(&other.bytes);
    }

    /// Complement within the encoding's character space. Raw bytes are dropped.
    pub fn invert(&mut self) {
        let mut chars = self.encoding.char_space();
        chars.difference(&self.chars);
        self.chars = chars;
        self.bytes = ClassBytes::empty();
    }

    pub fn is_empty(&self) -> bool {
        self.chars.ranges().is_empty() && self.bytes.ranges().is_empty()
    }

    pub fn is_disjoint(&self, other: &CharacterClass) -> bool {
        let mut both = self.clone();
        both.intersect(other);
        both.is_empty()
    }

    pub fn contains_char(&self, c: char) -> bool {
        self.chars
            .ranges()
            .iter()
            .any(|r| r.start() <= c && c <= r.end())
    }

    /// Whether a lone byte is a member, either as the character it denotes or raw.
    pub fn contains_byte(&self, byte: u8) -> bool {
        match self.encoding.byte_char(byte) {
            Some(c) => self.contains_char(c),
            None => self
                .bytes
                .ranges()
                .iter()
                .any(|r| r.start() <= byte && byte <= r.end()),
        }
    }

    /// Every byte sequence matching one member.
    pub fn byte_sequences(&self) -> Vec<ByteSequence> {
        let mut out = Vec::new();
        for r in self.chars.ranges() {
            self.encoding.byte_sequences(r.start(), r.end(), &mut out);
        }
        for r in self.bytes.ranges() {
            out.push(vec![(r.start(), r.end())]);
        }
        out
    }

    /// Lower to a minimised byte automaton.
    pub fn to_graph(&self) -> Result<ClassGraph, GraphError> {
        ClassGraph::from_sequences(&self.byte_sequences())
    }
}

/// Bracketed ranges, e.g. `[a-c\x{e9}\x80]`.
impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for r in self.chars.ranges() {
            write_char(f, r.start())?;
            if r.start() != r.end() {
                f.write_str("-")?;
                write_char(f, r.end())?;
            }
        }
        for r in self.bytes.ranges() {
            write!(f, "\\x{:02x}", r.start())?;
            if r.start() != r.end() {
                write!(f, "-\\x{:02x}", r.end())?;
            }
        }
        f.write_str("]")
    }
}

fn write_char(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    if c.is_ascii_alphanumeric() {
        write!(f, "{c}")
    } else {
        write!(f, "\\x{{{:x}}}", c as u32)
    }
}
