//! Character encodings understood by the class compiler.
//!
//! An encoding decides three things for a character class:
//! - which code points are representable (the character space)
//! - which single bytes stand on their own without being a character (raw bytes)
//! - how a run of code points becomes byte-range sequences for the automaton

use std::fmt;
use std::str::FromStr;

use regex_syntax::hir::{ClassBytes, ClassBytesRange, ClassUnicode, ClassUnicodeRange};
use regex_syntax::utf8::Utf8Sequences;

/// A sequence of inclusive byte ranges matching one encoded character.
pub type ByteSequence = Vec<(u8, u8)>;

const SURROGATE_LO: u32 = 0xd800;
const SURROGATE_HI: u32 = 0xdfff;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    Ascii,
    Latin1,
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl Encoding {
    pub const ALL: [Encoding; 7] = [
        Encoding::Ascii,
        Encoding::Latin1,
        Encoding::Utf8,
        Encoding::Utf16Le,
        Encoding::Utf16Be,
        Encoding::Utf32Le,
        Encoding::Utf32Be,
    ];

    /// Look up an encoding by name.
    ///
    /// Names are compared case-insensitively with `-` and spaces treated as `_`,
    /// so `UTF-8`, `utf8` and `utf_8` all resolve to [`Encoding::Utf8`].
    pub fn from_name(name: &str) -> Option<Self> {
        let norm = normalise_name(name);
        let enc = match norm.as_str() {
            "ascii" | "us_ascii" | "646" => Self::Ascii,
            "latin_1" | "latin1" | "iso_8859_1" | "iso8859_1" | "l1" => Self::Latin1,
            "utf_8" | "utf8" => Self::Utf8,
            "utf_16_le" | "utf16le" | "utf_16le" => Self::Utf16Le,
            "utf_16_be" | "utf16be" | "utf_16be" => Self::Utf16Be,
            "utf_32_le" | "utf32le" | "utf_32le" => Self::Utf32Le,
            "utf_32_be" | "utf32be" | "utf_32be" => Self::Utf32Be,
            _ => return None,
        };
        Some(enc)
    }

    /// Canonical (normalised) name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Latin1 => "latin_1",
            Self::Utf8 => "utf_8",
            Self::Utf16Le => "utf_16_le",
            Self::Utf16Be => "utf_16_be",
            Self::Utf32Le => "utf_32_le",
            Self::Utf32Be => "utf_32_be",
        }
    }

    /// Minimum distance in bytes between two character boundaries.
    pub fn stride(self) -> usize {
        match self {
            Self::Ascii | Self::Latin1 | Self::Utf8 => 1,
            Self::Utf16Le | Self::Utf16Be => 2,
            Self::Utf32Le | Self::Utf32Be => 4,
        }
    }

    /// Highest representable code point.
    pub fn max_char(self) -> char {
        match self {
            Self::Ascii => '\x7f',
            Self::Latin1 => '\u{ff}',
            _ => char::MAX,
        }
    }

    /// Every code point the encoding can represent.
    pub fn char_space(self) -> ClassUnicode {
        ClassUnicode::new([ClassUnicodeRange::new('\0', self.max_char())])
    }

    /// Single bytes that are not characters by themselves.
    pub fn raw_byte_space(self) -> ClassBytes {
        match self {
            Self::Latin1 => ClassBytes::empty(),
            Self::Ascii | Self::Utf8 => ClassBytes::new([ClassBytesRange::new(0x80, 0xff)]),
            _ => ClassBytes::new([ClassBytesRange::new(0x00, 0xff)]),
        }
    }

    /// The character a lone byte denotes, if it denotes one.
    pub fn byte_char(self, byte: u8) -> Option<char> {
        match self {
            Self::Latin1 => Some(char::from(byte)),
            Self::Ascii | Self::Utf8 if byte < 0x80 => Some(char::from(byte)),
            _ => None,
        }
    }

    /// Encode one character, or `None` if it is outside the character space.
    pub fn encode_char(self, c: char) -> Option<Vec<u8>> {
        if c > self.max_char() {
            return None;
        }
        let bytes = match self {
            Self::Ascii | Self::Latin1 => vec![c as u32 as u8],
            Self::Utf8 => c.encode_utf8(&mut [0; 4]).as_bytes().to_vec(),
            Self::Utf16Le => {
                let mut buf = [0u16; 2];
                c.encode_utf16(&mut buf)
                    .iter()
                    .flat_map(|u| u.to_le_bytes())
                    .collect()
            }
            Self::Utf16Be => {
                let mut buf = [0u16; 2];
                c.encode_utf16(&mut buf)
                    .iter()
                    .flat_map(|u| u.to_be_bytes())
                    .collect()
            }
            Self::Utf32Le => (c as u32).to_le_bytes().to_vec(),
            Self::Utf32Be => (c as u32).to_be_bytes().to_vec(),
        };
        Some(bytes)
    }

    /// Append the byte-range sequences encoding every character in `lo..=hi`.
    ///
    /// The range must already lie inside [`Encoding::char_space`].
    pub fn byte_sequences(self, lo: char, hi: char, out: &mut Vec<ByteSequence>) {
        match self {
            Self::Ascii | Self::Latin1 => out.push(vec![(lo as u32 as u8, hi as u32 as u8)]),
            Self::Utf8 => {
                for seq in Utf8Sequences::new(lo, hi) {
                    out.push(seq.as_slice().iter().map(|r| (r.start, r.end)).collect());
                }
            }
            Self::Utf16Le | Self::Utf16Be => {
                let little = self == Self::Utf16Le;
                for (a, b) in split_surrogates(lo as u32, hi as u32) {
                    utf16_sequences(a, b, little, out);
                }
            }
            Self::Utf32Le | Self::Utf32Be => {
                let little = self == Self::Utf32Le;
                for (a, b) in split_surrogates(lo as u32, hi as u32) {
                    let start = out.len();
                    split_fixed(a, b, 4, &mut Vec::new(), out);
                    if little {
                        out[start..].iter_mut().for_each(|seq| seq.reverse());
                    }
                }
            }
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEncoding(pub String);

impl fmt::Display for UnknownEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown encoding: {}", self.0)
    }
}

impl std::error::Error for UnknownEncoding {}

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownEncoding(s.to_string()))
    }
}

/// Lowercase, trim, and map `-`/space to `_`.
pub fn normalise_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Split a code point range into pieces that avoid the surrogate block.
fn split_surrogates(lo: u32, hi: u32) -> Vec<(u32, u32)> {
    if hi < SURROGATE_LO || lo > SURROGATE_HI {
        return vec![(lo, hi)];
    }
    let mut parts = Vec::with_capacity(2);
    if lo < SURROGATE_LO {
        parts.push((lo, SURROGATE_LO - 1));
    }
    if hi > SURROGATE_HI {
        parts.push((SURROGATE_HI + 1, hi));
    }
    parts
}

fn utf16_sequences(lo: u32, hi: u32, little: bool, out: &mut Vec<ByteSequence>) {
    let start = out.len();

    if lo <= 0xffff {
        split_fixed(lo, hi.min(0xffff), 2, &mut Vec::new(), out);
    }

    if hi >= 0x1_0000 {
        let lo = lo.max(0x1_0000) - 0x1_0000;
        let hi = hi - 0x1_0000;
        let (lead_lo, lead_hi) = (lo >> 10, hi >> 10);
        let (trail_lo, trail_hi) = (lo & 0x3ff, hi & 0x3ff);

        if lead_lo == lead_hi {
            surrogate_pairs(lead_lo, lead_lo, trail_lo, trail_hi, out);
        } else {
            let mut first_full = lead_lo;
            if trail_lo != 0 {
                surrogate_pairs(lead_lo, lead_lo, trail_lo, 0x3ff, out);
                first_full += 1;
            }
            let mut last_full = lead_hi;
            if trail_hi != 0x3ff {
                last_full -= 1;
            }
            if first_full <= last_full {
                surrogate_pairs(first_full, last_full, 0, 0x3ff, out);
            }
            if trail_hi != 0x3ff {
                surrogate_pairs(lead_hi, lead_hi, 0, trail_hi, out);
            }
        }
    }

    if little {
        // Each 16-bit unit is two bytes; swap within every unit.
        for seq in &mut out[start..] {
            for unit in seq.chunks_mut(2) {
                unit.swap(0, 1);
            }
        }
    }
}

/// Big-endian sequences for every pair `(0xd800 + lead, 0xdc00 + trail)`.
fn surrogate_pairs(
    lead_lo: u32,
    lead_hi: u32,
    trail_lo: u32,
    trail_hi: u32,
    out: &mut Vec<ByteSequence>,
) {
    let mut leads = Vec::new();
    split_fixed(0xd800 + lead_lo, 0xd800 + lead_hi, 2, &mut Vec::new(), &mut leads);
    let mut trails = Vec::new();
    split_fixed(0xdc00 + trail_lo, 0xdc00 + trail_hi, 2, &mut Vec::new(), &mut trails);

    for lead in &leads {
        for trail in &trails {
            let mut seq = lead.clone();
            seq.extend_from_slice(trail);
            out.push(seq);
        }
    }
}

/// Split the numeric range `lo..=hi` of `width`-byte big-endian values into
/// sequences of byte ranges.
fn split_fixed(lo: u32, hi: u32, width: u32, prefix: &mut ByteSequence, out: &mut Vec<ByteSequence>) {
    if width == 1 {
        prefix.push((lo as u8, hi as u8));
        out.push(prefix.clone());
        prefix.pop();
        return;
    }

    let shift = 8 * (width - 1);
    let mask = (1u32 << shift) - 1;
    let (lo_top, hi_top) = (lo >> shift, hi >> shift);

    let mut descend = |top_lo: u32, top_hi: u32, rest_lo: u32, rest_hi: u32, prefix: &mut ByteSequence| {
        prefix.push((top_lo as u8, top_hi as u8));
        split_fixed(rest_lo, rest_hi, width - 1, prefix, out);
        prefix.pop();
    };

    if lo_top == hi_top {
        descend(lo_top, lo_top, lo & mask, hi & mask, prefix);
        return;
    }

    let mut first_full = lo_top;
    if lo & mask != 0 {
        descend(lo_top, lo_top, lo & mask, mask, prefix);
        first_full += 1;
    }
    let tail_partial = hi & mask != mask;
    let last_full = if tail_partial { hi_top - 1 } else { hi_top };
    if first_full <= last_full {
        descend(first_full, last_full, 0, mask, prefix);
    }
    if tail_partial {
        descend(hi_top, hi_top, 0, hi & mask, prefix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepts(seqs: &[ByteSequence], bytes: &[u8]) -> bool {
        seqs.iter().any(|seq| {
            seq.len() == bytes.len()
                && seq.iter().zip(bytes).all(|(&(lo, hi), &b)| lo <= b && b <= hi)
        })
    }

    fn sequences(enc: Encoding, lo: char, hi: char) -> Vec<ByteSequence> {
        let mut out = Vec::new();
        enc.byte_sequences(lo, hi, &mut out);
        out
    }

    #[test]
    fn names_are_normalised() {
        assert_eq!(Encoding::from_name("UTF-8"), Some(Encoding::Utf8));
        assert_eq!(Encoding::from_name(" utf 16 le "), Some(Encoding::Utf16Le));
        assert_eq!(Encoding::from_name("Latin-1"), Some(Encoding::Latin1));
        assert_eq!(Encoding::from_name("ebcdic"), None);
        assert_eq!("utf_32_be".parse::<Encoding>(), Ok(Encoding::Utf32Be));
    }

    #[test]
    fn name_roundtrip() {
        for enc in Encoding::ALL {
            assert_eq!(Encoding::from_name(enc.name()), Some(enc));
        }
    }

    #[test]
    fn stride_follows_code_unit() {
        assert_eq!(Encoding::Utf8.stride(), 1);
        assert_eq!(Encoding::Utf16Be.stride(), 2);
        assert_eq!(Encoding::Utf32Le.stride(), 4);
    }

    #[test]
    fn byte_chars() {
        assert_eq!(Encoding::Latin1.byte_char(0xe9), Some('é'));
        assert_eq!(Encoding::Ascii.byte_char(0xe9), None);
        assert_eq!(Encoding::Utf8.byte_char(b'a'), Some('a'));
        assert_eq!(Encoding::Utf16Le.byte_char(b'a'), None);
    }

    #[test]
    fn fixed_width_split_covers_range_exactly() {
        let mut out = Vec::new();
        split_fixed(0x00f0, 0x0310, 2, &mut Vec::new(), &mut out);

        for v in 0u32..0x0400 {
            let bytes = [(v >> 8) as u8, v as u8];
            assert_eq!(accepts(&out, &bytes), (0x00f0..=0x0310).contains(&v), "{v:#x}");
        }
    }

    #[test]
    fn utf16_sequences_match_encoder() {
        for enc in [Encoding::Utf16Le, Encoding::Utf16Be] {
            let seqs = sequences(enc, '\u{d000}', '\u{10400}');
            for c in ['\u{d000}', '\u{d7ff}', '\u{e000}', '\u{ffff}', '\u{10000}', '\u{103ff}', '\u{10400}'] {
                let bytes = enc.encode_char(c).unwrap();
                assert!(accepts(&seqs, &bytes), "{enc} {c:?}");
            }
            let outside = enc.encode_char('\u{10401}').unwrap();
            assert!(!accepts(&seqs, &outside));
        }
    }

    #[test]
    fn utf32_sequences_match_encoder() {
        for enc in [Encoding::Utf32Le, Encoding::Utf32Be] {
            let seqs = sequences(enc, 'a', '\u{1f600}');
            assert!(accepts(&seqs, &enc.encode_char('a').unwrap()));
            assert!(accepts(&seqs, &enc.encode_char('\u{1f600}').unwrap()));
            assert!(!accepts(&seqs, &enc.encode_char('`').unwrap()));
        }
    }

    #[test]
    fn utf8_sequences_match_encoder() {
        let seqs = sequences(Encoding::Utf8, 'é', '€');
        assert!(accepts(&seqs, "é".as_bytes()));
        assert!(accepts(&seqs, "€".as_bytes()));
        assert!(!accepts(&seqs, b"e"));
    }
}
