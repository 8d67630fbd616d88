//! Property lookup: resolves `{name=value}` references to character classes.
//!
//! The compiler never reads property data itself; it asks a [`PropertySource`]
//! through a [`PropertyCache`] owned by the compiler, so tests can supply a
//! deterministic stub.

use std::collections::HashMap;

use regex_syntax::ParserBuilder;
use regex_syntax::hir::{Class, ClassUnicode, ClassUnicodeRange, Hir, HirKind};
use trellis_core::{CharacterClass, Encoding};

/// Lookup service for named character classes.
pub trait PropertySource {
    /// Resolve `property=value` under `encoding`. An empty `property` names a
    /// built-in extra (`any`, `word`, `newline`, ...). `None` means unknown.
    fn lookup(&self, encoding: Encoding, property: &str, value: &str) -> Option<CharacterClass>;
}

impl<P: PropertySource + ?Sized> PropertySource for &P {
    fn lookup(&self, encoding: Encoding, property: &str, value: &str) -> Option<CharacterClass> {
        (**self).lookup(encoding, property, value)
    }
}

/// Extras that have a `not_` complement.
const NEGATABLE: &[&str] = &["word", "digit", "blank", "space"];

/// Unicode data compiled into `regex-syntax`, plus the built-in extras.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinProperties;

impl BuiltinProperties {
    fn extra(encoding: Encoding, value: &str) -> Option<CharacterClass> {
        if let Some(base) = value.strip_prefix("not_")
            && NEGATABLE.contains(&base)
        {
            let mut class = Self::extra(encoding, base)?;
            class.invert();
            return Some(class);
        }
        let pattern = match value {
            "any" => {
                let all = ClassUnicode::new([ClassUnicodeRange::new('\0', char::MAX)]);
                return Some(CharacterClass::from_unicode(encoding, all));
            }
            "dot_any" => {
                let mut class = Self::extra(encoding, "any")?;
                class.difference(&Self::extra(encoding, "newline")?);
                return Some(class);
            }
            "newline" => r"[\n\x0B\x0C\r\x{85}\x{2028}\x{2029}]",
            "word" => r"\w",
            "digit" => r"\d",
            "space" => r"\s",
            "blank" => r"[\t\p{Zs}]",
            "ascii" => r"[\x00-\x7F]",
            "alnum" => r"[\p{Alphabetic}\p{Nd}]",
            "xdigit" => r"[0-9A-Fa-f]",
            "assigned" => r"\P{Cn}",
            _ => return None,
        };
        parse_class(pattern).map(|chars| CharacterClass::from_unicode(encoding, chars))
    }
}

impl PropertySource for BuiltinProperties {
    fn lookup(&self, encoding: Encoding, property: &str, value: &str) -> Option<CharacterClass> {
        if property.is_empty()
            && let Some(class) = Self::extra(encoding, value)
        {
            return Some(class);
        }
        if !is_identifier(property) || !is_identifier(value) || value.is_empty() {
            return None;
        }
        let pattern = if property.is_empty() {
            format!(r"\p{{{value}}}")
        } else {
            format!(r"\p{{{property}={value}}}")
        };
        parse_class(&pattern).map(|chars| CharacterClass::from_unicode(encoding, chars))
    }
}

fn is_identifier(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' ' | '.'))
}

fn parse_class(pattern: &str) -> Option<ClassUnicode> {
    let hir = ParserBuilder::new()
        .unicode(true)
        .build()
        .parse(pattern)
        .ok()?;
    hir_class(&hir)
}

/// Single-member classes come back from the parser as literals.
fn hir_class(hir: &Hir) -> Option<ClassUnicode> {
    match hir.kind() {
        HirKind::Class(Class::Unicode(class)) => Some(class.clone()),
        HirKind::Literal(lit) => {
            let text = std::str::from_utf8(&lit.0).ok()?;
            let mut chars = text.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            Some(ClassUnicode::new([ClassUnicodeRange::new(c, c)]))
        }
        _ => None,
    }
}

type CacheKey = (Encoding, String, String);

/// Memoising front for a [`PropertySource`]. Misses are cached too.
#[derive(Debug, Clone, Default)]
pub struct PropertyCache<P> {
    source: P,
    entries: HashMap<CacheKey, Option<CharacterClass>>,
}

impl<P: PropertySource> PropertyCache<P> {
    pub fn new(source: P) -> Self {
        Self {
            source,
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, encoding: Encoding, property: &str, value: &str) -> Option<CharacterClass> {
        let key = (encoding, property.to_string(), value.to_string());
        if let Some(hit) = self.entries.get(&key) {
            return hit.clone();
        }
        let found = self.source.lookup(encoding, property, value);
        self.entries.insert(key, found.clone());
        found
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    /// Cached lookups, hits and misses alike.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
