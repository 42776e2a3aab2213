//! Small knowledge base loaded from hand-written text
//!
//! Run with: cargo run --example knowledge_base

use tracing_subscriber::EnvFilter;
use trueno_atomspace::{AtomSpace, AtomType, RenderStyle, TextCodec};

const KNOWLEDGE: &str = r#"
; Taxonomy
(define animal (ConceptNode "animal"))
(define cat (ConceptNode "cat"))
(define dog (ConceptNode "dog"))

(InheritanceLink cat animal)
(InheritanceLink dog animal)

; Facts about individuals
(MemberLink (ConceptNode "tom") cat)
(EvaluationLink
  (PredicateNode "chases")
  (ListLink (ConceptNode "tom") (ConceptNode "jerry")))
"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("🦀 trueno-atomspace knowledge base\n");

    let mut space = AtomSpace::new();
    let codec = TextCodec::new().with_style(RenderStyle::Indented);
    let summary = codec.load(KNOWLEDGE, &mut space)?;
    println!(
        "📂 Loaded {} expressions → {} atoms\n",
        summary.expressions,
        space.size()
    );

    // What points at "animal"?
    if let Some(animal) = space.find_node(AtomType::ConceptNode, "animal") {
        println!("🔍 Links containing (ConceptNode \"animal\"):");
        for &link in space.incoming(animal)? {
            println!("{}", codec.render(&space, link)?);
        }
    }

    println!("\n📜 Evaluations:");
    for eval in space.atoms_of_type(AtomType::EvaluationLink) {
        println!("{}", codec.render(&space, eval)?);
    }

    println!("\n✨ Example complete!");

    Ok(())
}
