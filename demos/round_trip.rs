//! Bulk round-trip: generate atoms, write them as text, load them back
//!
//! Run with: RUST_LOG=debug cargo run --example round_trip

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use trueno_atomspace::{AtomSpace, AtomType, TextCodec};

const TARGET_ATOMS: usize = 100_000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("🦀 trueno-atomspace round-trip\n");

    // 1. Generate atoms
    println!("📊 Generating {TARGET_ATOMS} atoms...");
    let mut space = AtomSpace::with_capacity(TARGET_ATOMS);
    let predicate = space.add_node(AtomType::PredicateNode, "predicate0")?;
    let concepts = (0..1000)
        .map(|i| space.add_node(AtomType::ConceptNode, format!("concept{i}")))
        .collect::<Result<Vec<_>, _>>()?;
    let link_types = [
        AtomType::ListLink,
        AtomType::InheritanceLink,
        AtomType::MemberLink,
    ];

    let mut rng_state = 12345_u64; // Simple LCG for reproducibility
    let mut next = |bound: usize| {
        rng_state = rng_state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        usize::try_from(rng_state >> 33).unwrap_or(0) % bound
    };

    while space.size() < TARGET_ATOMS {
        let c1 = concepts[next(concepts.len())];
        let c2 = concepts[next(concepts.len())];
        if c1 == c2 {
            continue;
        }
        let link_type = link_types[next(link_types.len())];
        let arg = space.add_link(link_type, vec![c1, c2])?;
        space.add_link(AtomType::EvaluationLink, vec![predicate, arg])?;
    }
    println!("  ✅ {} atoms\n", space.size());

    // 2. Write
    println!("💾 Writing text...");
    let path = std::env::temp_dir().join("trueno_atomspace_round_trip.scm");
    let codec = TextCodec::new();
    let bytes = codec
        .write_file(&space, &path)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    println!("  ✅ {bytes} bytes → {}\n", path.display());

    // 3. Load into a fresh atomspace
    println!("📂 Loading...");
    let mut loaded = AtomSpace::new();
    let summary = codec.load_file(&path, &mut loaded).await?;
    println!(
        "  ✅ {} expressions, {} atoms read, {} added",
        summary.expressions, summary.atoms_read, summary.added
    );

    assert_eq!(loaded.size(), space.size());

    println!("\n✨ Round-trip complete!");

    Ok(())
}
