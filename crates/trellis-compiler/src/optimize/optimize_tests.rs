use trellis_bytecode::{Machine, StateTable};
use trellis_core::{CharacterClass, Encoding};

use crate::test_utils::{compiler, parse};
use crate::tree::{NodeId, NodeKind, SyntaxTree};
use crate::{
    BuiltinProperties, CompileOptions, Compiler, DiagnosticKind, OptimizerConfig,
    PublishedPattern,
};

use super::Preview;

const NATO: [&str; 20] = [
    "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india", "juliett",
    "kilo", "lima", "mike", "november", "oscar", "papa", "quebec", "romeo", "sierra", "tango",
];

fn publish_with(
    compiler: &mut Compiler<StateTable, BuiltinProperties>,
    pattern: &str,
    encoding: &str,
) -> PublishedPattern {
    compiler
        .compile_and_publish(&parse(pattern), &CompileOptions::new().encoding(encoding))
        .unwrap()
}

fn repeat_is_disjoint(pattern: &str) -> bool {
    let published = publish_with(&mut compiler(), pattern, "ascii");
    let tree = published.tree();
    let repeat = tree
        .preorder()
        .into_iter()
        .find(|&id| matches!(tree.kind(id), NodeKind::Repeat { .. }))
        .unwrap();
    matches!(tree.kind(repeat), NodeKind::Repeat { disjoint: true, .. })
}

fn alternation_children(tree: &SyntaxTree, id: NodeId) -> (Vec<NodeId>, bool) {
    match tree.kind(id) {
        NodeKind::Alternation { children, b_node } => (children.clone(), *b_node),
        other => panic!("expected alternation, got {}", other.name()),
    }
}

fn class(chars: &str) -> Option<CharacterClass> {
    let mut class = CharacterClass::empty(Encoding::Ascii);
    for c in chars.chars() {
        class.add_range(c, c);
    }
    Some(class)
}

#[test]
fn join_fills_every_offset_in_window() {
    let mut dest = Preview::new(4);
    let src = Preview {
        long: 2,
        valid: 2,
        classes: vec![class("a"), class("b"), None, None],
        blocked: false,
    };

    dest.join(&src, 1, 2);

    assert_eq!(dest.classes[0], None);
    assert_eq!(dest.classes[1], class("a"));
    assert_eq!(dest.classes[2], class("ab"));
    assert_eq!(dest.classes[3], class("b"));
}

#[test]
fn scan_keeps_only_certain_positions() {
    let preview = Preview {
        long: 3,
        valid: 2,
        classes: vec![class("a"), class("b"), class("c")],
        blocked: false,
    };
    assert_eq!(preview.scan(), Some(vec![class("a").unwrap(), class("b").unwrap()]));

    let empty_start = Preview {
        valid: 2,
        classes: vec![class(""), class("b"), None],
        ..preview.clone()
    };
    assert_eq!(empty_start.scan(), None);

    let nothing_certain = Preview { valid: 0, ..preview };
    assert_eq!(nothing_certain.scan(), None);
}

#[test]
fn root_preview_accepts_every_match_prefix() {
    let mut compiler = compiler();
    let published = publish_with(&mut compiler, "ab(?:c|d)", "ascii");
    let root = published.root_preview().unwrap();
    let table = compiler.machine();

    assert_eq!(table.probe(root, b"abc"), Some(3));
    assert_eq!(table.probe(root, b"abdxyz"), Some(3));
    assert_eq!(table.probe(root, b"abe"), None);
    assert_eq!(table.probe(root, b"xbc"), None);
}

#[test]
fn optional_repeat_widens_preview() {
    let mut compiler = compiler();
    let published = publish_with(&mut compiler, "x*y", "ascii");
    let root = published.root_preview().unwrap();
    let table = compiler.machine();

    assert_eq!(table.probe(root, b"y"), Some(1));
    assert_eq!(table.probe(root, b"xxxy"), Some(1));
    assert_eq!(table.probe(root, b"z"), None);
}

#[test]
fn anchor_blocks_preview() {
    let mut compiler = compiler();
    let published = publish_with(&mut compiler, r"a\bbc", "ascii");
    let root = published.root_preview().unwrap();
    assert_eq!(compiler.machine().probe(root, b"ab"), Some(1));

    let leading = publish_with(&mut compiler, "^abc", "ascii");
    assert_eq!(leading.root_preview(), None);
}

#[test]
fn zero_width_group_adds_no_length() {
    let mut compiler = compiler();
    let published = publish_with(&mut compiler, "(?=ab)a", "ascii");
    let root = published.root_preview().unwrap();
    let table = compiler.machine();

    assert_eq!(table.probe(root, b"a"), Some(1));
    assert_eq!(table.probe(root, b"b"), None);
}

#[test]
fn utf16_preview_spans_code_units() {
    let mut compiler = compiler();
    let published = publish_with(&mut compiler, "éa", "utf_16_le");
    let root = published.root_preview().unwrap();

    assert_eq!(published.stride(), 2);
    assert_eq!(
        compiler.machine().probe(root, &[0xe9, 0x00, 0x61, 0x00]),
        Some(4)
    );
}

#[test]
fn disjoint_repeat_before_distinct_class() {
    assert!(repeat_is_disjoint("(?:x|y){0,3}z"));
    assert!(!repeat_is_disjoint("(?:x|y){0,3}y"));
    assert!(repeat_is_disjoint("[a-c]*[d-f]"));
    assert!(!repeat_is_disjoint("[a-c]*[c-f]"));
}

#[test]
fn disjoint_needs_a_follower_with_characters() {
    assert!(!repeat_is_disjoint("a*"));
    assert!(!repeat_is_disjoint("a*$"));
    assert!(!repeat_is_disjoint("a*(?=b)"));
    assert!(!repeat_is_disjoint("a*b?"));
}

#[test]
fn disjoint_needs_single_character_body() {
    assert!(!repeat_is_disjoint("(?:ab)*c"));
    assert!(repeat_is_disjoint("(?:[ab])*c"));
}

#[test]
fn wide_alternation_becomes_dispatch_tree() {
    let pattern = NATO.join("|");
    let published = publish_with(&mut compiler(), &pattern, "ascii");
    let tree = published.tree();
    let alt = tree.children(tree.root())[0];

    let (nodes, b_node) = alternation_children(tree, alt);
    assert!(!b_node);
    assert_eq!(nodes.len(), 5);

    let mut words = Vec::new();
    for node in nodes {
        let (branches, b_node) = alternation_children(tree, node);
        assert!(b_node);
        assert_eq!(branches.len(), 4);
        assert_eq!(tree.node(node).look_ahead, tree.node(alt).look_ahead);
        assert!(published.preview(node).is_some());
        words.extend(branches.into_iter().map(|b| tree.node(b).text.clone()));
    }
    assert_eq!(words, NATO);

    assert!(published.preview(alt).is_some());
    assert_eq!(published.previews().len(), 1 + 5 + 20);
}

#[test]
fn dispatch_tree_sorts_branches() {
    let published = publish_with(&mut compiler(), "d|a|g|c|f|b|e", "ascii");
    let tree = published.tree();
    let alt = tree.children(tree.root())[0];
    let (nodes, _) = alternation_children(tree, alt);

    let texts: Vec<&str> = nodes.iter().map(|&n| tree.node(n).text.as_str()).collect();
    assert_eq!(texts, vec!["(?:a|b|c|d)", "(?:e|f|g)"]);
}

#[test]
fn narrow_alternation_is_left_alone() {
    let published = publish_with(&mut compiler(), "a|b|c|d|e|f", "ascii");
    let tree = published.tree();
    let alt = tree.children(tree.root())[0];
    let (nodes, _) = alternation_children(tree, alt);

    assert_eq!(nodes.len(), 6);
    assert!(nodes
        .iter()
        .all(|&n| matches!(tree.kind(n), NodeKind::CompiledClass { .. })));
}

#[test]
fn custom_span_changes_fan_out() {
    let config = OptimizerConfig {
        btree_span: 8,
        ..OptimizerConfig::default()
    };
    let mut compiler = Compiler::builder(StateTable::new(), BuiltinProperties)
        .optimizer(config)
        .build();
    let published = publish_with(&mut compiler, &NATO.join("|"), "ascii");
    let tree = published.tree();
    let alt = tree.children(tree.root())[0];

    let (nodes, _) = alternation_children(tree, alt);
    assert_eq!(nodes.len(), 3);
}

#[test]
fn preview_skipped_when_machine_is_nearly_full() {
    let mut compiler = Compiler::builder(StateTable::with_capacity(4), BuiltinProperties).build();
    let published = publish_with(&mut compiler, "abc", "ascii");

    assert_eq!(published.root_preview(), None);
    assert_eq!(
        published.diagnostics().kinds(),
        vec![DiagnosticKind::PreviewSkipped]
    );
    assert_eq!(
        published.diagnostics().iter().next().unwrap().message(),
        "look-ahead preview skipped: 3 states required, 1 available"
    );
    assert_eq!(compiler.machine().writes(), 3);
}

#[test]
fn preview_never_fills_the_last_states() {
    // Three classes leave exactly three free states: still not enough.
    let mut exact = Compiler::builder(StateTable::with_capacity(6), BuiltinProperties).build();
    let published = publish_with(&mut exact, "abc", "ascii");

    assert_eq!(published.root_preview(), None);
    assert_eq!(
        published.diagnostics().iter().next().unwrap().message(),
        "look-ahead preview skipped: 3 states required, 3 available"
    );
    assert_eq!(exact.machine().remaining(), 3);

    let mut roomy = Compiler::builder(StateTable::with_capacity(7), BuiltinProperties).build();
    let published = publish_with(&mut roomy, "abc", "ascii");

    assert!(published.root_preview().is_some());
    assert_eq!(published.diagnostics().len(), 0);
    assert_eq!(roomy.machine().remaining(), 1);
}
