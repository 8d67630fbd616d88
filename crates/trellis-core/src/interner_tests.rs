use crate::{Interner, Symbol};

#[test]
fn intern_deduplicates_pattern_text() {
    let mut interner = Interner::new();

    let a = interner.intern("[a-c]");
    let b = interner.intern("[a-c]");
    let c = interner.intern("(?i)[a-c]");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.len(), 2);
}

#[test]
fn get_does_not_intern() {
    let mut interner = Interner::new();
    assert_eq!(interner.get("{=word}"), None);
    assert!(interner.is_empty());

    let sym = interner.intern("{=word}");
    assert_eq!(interner.get("{=word}"), Some(sym));
    assert_eq!(interner.resolve(sym), "{=word}");
}

#[test]
fn symbols_follow_insertion_order() {
    let mut interner = Interner::new();

    let z = interner.intern("z");
    let a = interner.intern("a");

    assert!(z < a);
    let items: Vec<_> = interner.iter().collect();
    assert_eq!(items, vec![(z, "z"), (a, "a")]);
}

#[test]
fn try_resolve_rejects_foreign_symbol() {
    let interner = Interner::new();
    assert_eq!(interner.try_resolve(Symbol::from_raw(7)), None);
}
