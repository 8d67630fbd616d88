use crate::{CharacterClass, Encoding};

fn abc(enc: Encoding) -> CharacterClass {
    CharacterClass::from_range(enc, 'a', 'c')
}

fn universe(enc: Encoding) -> Vec<u32> {
    // A sample of code points plus every lone byte.
    let mut points: Vec<u32> = (0..0x180).collect();
    points.extend([0x2028, 0xd7ff, 0xe000, 0xffff, 0x1_0000, 0x10_ffff]);
    points.retain(|&p| char::from_u32(p).is_some_and(|c| c <= enc.max_char()));
    points
}

#[test]
fn set_algebra_laws() {
    for enc in Encoding::ALL {
        let a = abc(enc);
        let b = CharacterClass::from_range(enc, 'b', 'z');

        let mut union = a.clone();
        union.union(&b);
        let mut inter = a.clone();
        inter.intersect(&b);
        let mut diff = a.clone();
        diff.difference(&b);
        let mut inv = a.clone();
        inv.invert();

        for p in universe(enc) {
            let c = char::from_u32(p).unwrap();
            let (in_a, in_b) = (a.contains_char(c), b.contains_char(c));
            assert_eq!(union.contains_char(c), in_a || in_b, "{enc} {c:?}");
            assert_eq!(inter.contains_char(c), in_a && in_b, "{enc} {c:?}");
            assert_eq!(diff.contains_char(c), in_a && !in_b, "{enc} {c:?}");
            assert_eq!(inv.contains_char(c), !in_a, "{enc} {c:?}");
        }
    }
}

#[test]
fn invert_is_involution() {
    for enc in Encoding::ALL {
        let mut class = abc(enc);
        let original = class.clone();

        class.invert();
        assert_ne!(class, original);
        class.invert();
        assert_eq!(class, original);
    }
}

#[test]
fn invert_stays_inside_encoding() {
    let mut class = CharacterClass::empty(Encoding::Ascii);
    class.invert();

    assert!(class.contains_char('\x7f'));
    assert!(!class.contains_char('\u{80}'));
    assert!(!class.contains_byte(0x80));
    assert_eq!(class, CharacterClass::full(Encoding::Ascii));
}

#[test]
fn invert_drops_raw_bytes() {
    let mut class = abc(Encoding::Utf8);
    class.add_byte_range(0x80, 0x85);
    class.invert();

    assert!(class.raw_bytes().ranges().is_empty());
    assert!(!class.contains_char('a'));
    assert!(class.contains_char('d'));
}

#[test]
fn negated_class_matches_whole_characters_only() {
    for (enc, member, other) in [
        (Encoding::Utf16Le, vec![0x61, 0x00], vec![0x62, 0x00]),
        (Encoding::Utf8, vec![0x61], vec![0xc3, 0xa9]),
        (Encoding::Utf32Be, vec![0, 0, 0, 0x61], vec![0, 0, 0, 0x62]),
    ] {
        let mut class = CharacterClass::from_char(enc, 'a', false);
        class.invert();
        let graph = class.to_graph().unwrap();

        assert_eq!(graph.shortest_match(&member), None, "{enc}");
        assert_eq!(graph.shortest_match(&other), Some(other.len()), "{enc}");
        for byte in 0..=255u8 {
            if enc.byte_char(byte).is_none() {
                assert!(!graph.matches(&[byte]), "{enc} {byte:02x}");
            }
        }
    }
}

#[test]
fn single_char_folds_case() {
    let folded = CharacterClass::from_char(Encoding::Utf8, 'k', true);
    assert!(folded.contains_char('k'));
    assert!(folded.contains_char('K'));
    assert!(folded.contains_char('\u{212a}'));

    let plain = CharacterClass::from_char(Encoding::Utf8, 'k', false);
    assert!(!plain.contains_char('K'));
}

#[test]
fn ranges_are_not_folded() {
    let range = CharacterClass::from_range(Encoding::Utf8, 'a', 'c');
    assert!(!range.contains_char('A'));
}

#[test]
fn folding_is_clipped_to_encoding() {
    let folded = CharacterClass::from_char(Encoding::Ascii, 'k', true);
    assert!(folded.contains_char('K'));
    assert!(!folded.contains_char('\u{212a}'));
}

#[test]
fn reversed_range_is_normalised() {
    assert_eq!(
        CharacterClass::from_range(Encoding::Utf8, 'z', 'x'),
        CharacterClass::from_range(Encoding::Utf8, 'x', 'z'),
    );
}

#[test]
fn out_of_encoding_char_is_empty() {
    assert!(CharacterClass::from_char(Encoding::Latin1, '€', false).is_empty());
    assert!(!CharacterClass::from_char(Encoding::Latin1, 'é', false).is_empty());
}

#[test]
fn byte_ranges_split_into_chars_and_raw() {
    let class = CharacterClass::from_byte_range(Encoding::Utf8, 0x7e, 0x81);

    assert!(class.contains_char('~'));
    assert!(class.contains_char('\x7f'));
    assert!(class.contains_byte(0x80));
    assert!(!class.contains_char('\u{80}'));
    assert_eq!(class.to_string(), r"[\x{7e}-\x{7f}\x80-\x81]");

    let latin = CharacterClass::from_byte_range(Encoding::Latin1, 0xe9, 0xe9);
    assert!(latin.contains_char('é'));
    assert!(latin.raw_bytes().ranges().is_empty());
}

#[test]
fn byte_literal_equals_char_literal_when_byte_is_char() {
    let from_byte = CharacterClass::from_byte_range(Encoding::Utf8, b'a', b'a');
    let from_char = CharacterClass::from_char(Encoding::Utf8, 'a', false);
    assert_eq!(from_byte, from_char);
}

#[test]
fn graph_matches_encoded_members() {
    for enc in Encoding::ALL {
        let mut class = CharacterClass::from_range(enc, 'a', 'c');
        if enc.max_char() > '\u{ff}' {
            class.add_range('\u{e9}', '\u{20ac}');
        }
        let graph = class.to_graph().unwrap();

        for c in ['a', 'b', 'c', 'é', '€', 'd', '\u{20ad}'] {
            let Some(bytes) = enc.encode_char(c) else {
                continue;
            };
            assert_eq!(graph.matches(&bytes), class.contains_char(c), "{enc} {c:?}");
        }
    }
}

#[test]
fn empty_class_still_needs_a_state() {
    let class = CharacterClass::empty(Encoding::Utf8);
    assert!(class.is_empty());
    assert_eq!(class.to_graph().unwrap().state_size(), 1);
}

#[test]
fn disjointness() {
    let a = abc(Encoding::Ascii);
    let z = CharacterClass::from_char(Encoding::Ascii, 'z', false);
    assert!(a.is_disjoint(&z));
    assert!(!a.is_disjoint(&CharacterClass::from_char(Encoding::Ascii, 'A', true)));
}

#[test]
#[should_panic(expected = "across encodings")]
fn mixing_encodings_panics() {
    let mut a = abc(Encoding::Utf8);
    a.union(&abc(Encoding::Latin1));
}
