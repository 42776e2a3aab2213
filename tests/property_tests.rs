//! Property-based tests for trueno-atomspace
//!
//! Verifies dedup and round-trip invariants hold for arbitrary atomspaces

use proptest::prelude::*;
use trueno_atomspace::{load, serialize, AtomSpace, AtomType, Handle, RenderStyle, TextCodec};

const NODE_TYPES: [AtomType; 3] = [
    AtomType::ConceptNode,
    AtomType::PredicateNode,
    AtomType::NumberNode,
];

const LINK_TYPES: [AtomType; 5] = [
    AtomType::ListLink,
    AtomType::MemberLink,
    AtomType::InheritanceLink,
    AtomType::EvaluationLink,
    AtomType::SetLink,
];

/// Node specs: (type index, name); names include characters that need escaping
fn prop_nodes() -> impl Strategy<Value = Vec<(usize, String)>> {
    prop::collection::vec((0..NODE_TYPES.len(), "[a-c \"\\\\\n;()]{0,6}"), 1..30)
}

/// Link specs: (type index, child picks); picks index into atoms built so far
fn prop_links() -> impl Strategy<Value = Vec<(usize, Vec<usize>)>> {
    prop::collection::vec(
        (0..LINK_TYPES.len(), prop::collection::vec(any::<usize>(), 0..4)),
        0..40,
    )
}

/// Chain steps: (type index, whether the previous atom appears twice)
fn prop_chain() -> impl Strategy<Value = Vec<(usize, bool)>> {
    prop::collection::vec((0..LINK_TYPES.len(), any::<bool>()), 1..600)
}

fn build_space(nodes: &[(usize, String)], links: &[(usize, Vec<usize>)]) -> AtomSpace {
    let mut space = AtomSpace::new();
    let mut built: Vec<Handle> = Vec::new();

    for (t, name) in nodes {
        built.push(space.add_node(NODE_TYPES[*t], name.clone()).unwrap());
    }
    for (t, picks) in links {
        let outgoing: Vec<Handle> = picks.iter().map(|p| built[p % built.len()]).collect();
        built.push(space.add_link(LINK_TYPES[*t], outgoing).unwrap());
    }

    space
}

// Property: load(serialize(S)) has the same size as S
proptest! {
    #[test]
    fn prop_roundtrip_preserves_size(nodes in prop_nodes(), links in prop_links()) {
        let space = build_space(&nodes, &links);

        let text = serialize(&space).unwrap();
        let mut loaded = AtomSpace::new();
        load(&text, &mut loaded).unwrap();

        prop_assert_eq!(loaded.size(), space.size());

        // Same atoms in the same order
        prop_assert_eq!(serialize(&loaded).unwrap(), text);
    }
}

// Property: chains of any depth (past the nesting limit included) round-trip
// with short lines
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_deep_chain_roundtrip(steps in prop_chain()) {
        let mut space = AtomSpace::new();
        let mut top = space.add_node(AtomType::ConceptNode, "root").unwrap();
        for (t, twice) in &steps {
            let outgoing = if *twice { vec![top, top] } else { vec![top] };
            top = space.add_link(LINK_TYPES[*t], outgoing).unwrap();
        }

        let text = serialize(&space).unwrap();
        prop_assert!(text.lines().all(|line| line.len() < 48));

        let mut loaded = AtomSpace::new();
        load(&text, &mut loaded).unwrap();
        prop_assert_eq!(loaded.size(), space.size());
        prop_assert_eq!(serialize(&loaded).unwrap(), text);
    }
}

// Property: re-adding any existing atom never changes size
proptest! {
    #[test]
    fn prop_add_is_idempotent(nodes in prop_nodes(), links in prop_links()) {
        let mut space = build_space(&nodes, &links);
        let size = space.size();

        let snapshot: Vec<_> = space.iter().map(|(h, atom)| (h, atom.clone())).collect();
        for (handle, atom) in snapshot {
            let again = match atom.name() {
                Some(name) => space.add_node(atom.atom_type(), name).unwrap(),
                None => space.add_link(atom.atom_type(), atom.outgoing().to_vec()).unwrap(),
            };
            prop_assert_eq!(again, handle);
        }

        prop_assert_eq!(space.size(), size);
    }
}

// Property: duplicated text loads to the same size as the original
proptest! {
    #[test]
    fn prop_duplicate_text_dedups(nodes in prop_nodes(), links in prop_links()) {
        let space = build_space(&nodes, &links);
        let text = serialize(&space).unwrap();
        let doubled = format!("{text}{text}");

        let mut loaded = AtomSpace::new();
        let summary = load(&doubled, &mut loaded).unwrap();

        prop_assert_eq!(loaded.size(), space.size());
        prop_assert_eq!(summary.expressions, 2 * space.size());
    }
}

// Property: indented and compact renderings load to the same atomspace
proptest! {
    #[test]
    fn prop_styles_agree(nodes in prop_nodes(), links in prop_links()) {
        let space = build_space(&nodes, &links);

        let indented = TextCodec::new().with_style(RenderStyle::Indented);
        let text = indented.serialize(&space).unwrap();

        let mut loaded = AtomSpace::new();
        indented.load(&text, &mut loaded).unwrap();

        prop_assert_eq!(serialize(&loaded).unwrap(), serialize(&space).unwrap());
    }
}

// Property: file roundtrip preserves size
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_file_roundtrip(nodes in prop_nodes(), links in prop_links()) {
        let space = build_space(&nodes, &links);

        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("prop_space.scm");

            let codec = TextCodec::new();
            codec.write_file(&space, &path).await.unwrap();

            let mut loaded = AtomSpace::new();
            codec.load_file(&path, &mut loaded).await.unwrap();

            prop_assert_eq!(loaded.size(), space.size());
            Ok(())
        })?;
    }
}
