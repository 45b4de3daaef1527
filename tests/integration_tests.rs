//! End-to-end checks across `natded-logic` and `natded-rules`.
//!
//! Run with: cargo test --test integration_tests

use natded_logic::Expression;
use natded_rules::{
    build_rulebook, Justification, Proof, ProofBuilder, RuleKey, Rulebook, RulebookConfig, Side,
    StepCheck, Verdict, VerifyError,
};
use tempfile::tempdir;

fn atom(name: &str) -> Expression {
    Expression::atom(name)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Single-step scenarios
// ============================================================================

#[test]
fn test_modus_tollens_from_premises() {
    let mut b = ProofBuilder::new();
    b.premise(Expression::implies(atom("P"), atom("Q")));
    b.premise(Expression::not(atom("Q")));
    b.step(Expression::not(atom("P")));
    let proof = b.build();

    let verdict = build_rulebook()
        .verify(&RuleKey::from("mt"), &proof, 3, &Justification::new().line(1).line(2))
        .expect("verify");
    assert_eq!(verdict, Verdict::Valid);
}

#[test]
fn test_and_elim_honours_the_side() {
    let mut b = ProofBuilder::new();
    b.premise(Expression::and(atom("P"), atom("Q")));
    b.step(atom("Q"));
    let proof = b.build();
    let book = build_rulebook();

    let right = book
        .verify(&RuleKey::elim("and"), &proof, 2, &Justification::new().line(1).side(Side::Right))
        .expect("verify");
    assert_eq!(right, Verdict::Valid);

    let left = book
        .verify(&RuleKey::elim("and"), &proof, 2, &Justification::new().line(1).side(Side::Left))
        .expect("verify");
    assert!(matches!(left, Verdict::Invalid(_)), "left={left:?}");
}

#[test]
fn test_forall_elim_with_constant() {
    let mut b = ProofBuilder::new();
    b.premise(Expression::forall("x", Expression::pred("P", &["x"])));
    b.step(Expression::pred("P", &["c"]));
    let proof = b.build();

    let verdict = build_rulebook()
        .verify(
            &RuleKey::elim("forall"),
            &proof,
            2,
            &Justification::new().line(1).substitution(atom("c"), "x"),
        )
        .expect("verify");
    assert_eq!(verdict, Verdict::Valid);
}

#[test]
fn test_or_intro_without_side_is_structural() {
    let mut b = ProofBuilder::new();
    b.premise(atom("P"));
    b.step(Expression::or(atom("P"), atom("Q")));
    let proof = b.build();

    let verdict = build_rulebook()
        .verify(&RuleKey::intro("or"), &proof, 2, &Justification::new().line(1))
        .expect("verify");
    assert!(matches!(verdict, Verdict::StructuralError(_)), "verdict={verdict:?}");
}

#[test]
fn test_pbc_discharges_negated_assumption() {
    let build = |conclusion: Expression| {
        let mut b = ProofBuilder::new();
        b.assume(Expression::not(atom("P")));
        b.step(atom("_|_"));
        b.close();
        b.step(conclusion);
        b.build()
    };
    let book = build_rulebook();
    let j = Justification::new().range(1, 2);

    let ok = book.verify(&RuleKey::from("pbc"), &build(atom("P")), 3, &j);
    assert_eq!(ok, Ok(Verdict::Valid));

    let wrong = book
        .verify(&RuleKey::from("pbc"), &build(Expression::not(atom("P"))), 3, &j)
        .expect("verify");
    assert!(matches!(wrong, Verdict::Invalid(_)), "wrong={wrong:?}");
}

#[test]
fn test_unknown_rule_is_an_error() {
    let mut b = ProofBuilder::new();
    b.premise(atom("P"));
    let out = build_rulebook().verify(&RuleKey::from("cut"), &b.build(), 1, &Justification::new());
    assert_eq!(out, Err(VerifyError::UnknownRule("cut".to_string())));
}

// ============================================================================
// Whole proofs
// ============================================================================

/// ∀x.(P(x) → Q(x)), ∃x.P(x) ⊢ ∃x.Q(x)
///
///  1  ∀x.(P(x) → Q(x))     premise
///  2  ∃x.P(x)              premise
///  3  | x0  P(x0)          assumption
///  4  |     P(x0) → Q(x0)  ∀-elim 1 [x0/x]
///  5  |     Q(x0)          →-elim 4, 3
///  6  |     ∃x.Q(x)        ∃-intro 5 [x/x0]
///  7  ∃x.Q(x)              ∃-elim 2, 3-6 [x0/x]
fn syllogism() -> (Proof, Vec<StepCheck>) {
    let p = |v: &str| Expression::pred("P", &[v]);
    let q = |v: &str| Expression::pred("Q", &[v]);

    let mut b = ProofBuilder::new();
    b.premise(Expression::forall(
        "x",
        Expression::paren(Expression::implies(p("x"), q("x"))),
    ));
    b.premise(Expression::exists("x", p("x")));
    b.assume_fresh("x0", p("x0"));
    b.step(Expression::implies(p("x0"), q("x0")));
    b.step(q("x0"));
    b.step(Expression::exists("x", q("x")));
    b.close();
    b.step(Expression::exists("x", q("x")));

    let checks = vec![
        StepCheck::new(1, "premise", Justification::new()),
        StepCheck::new(2, "premise", Justification::new()),
        StepCheck::new(3, "assumption", Justification::new()),
        StepCheck::new(
            4,
            "a.-elim",
            Justification::new().line(1).substitution(atom("x0"), "x"),
        ),
        StepCheck::new(5, "->-elim", Justification::new().line(4).line(3)),
        StepCheck::new(
            6,
            "e.-intro",
            Justification::new().line(5).substitution(atom("x"), "x0"),
        ),
        StepCheck::new(
            7,
            "e.-elim",
            Justification::new()
                .line(2)
                .range(3, 6)
                .substitution(atom("x0"), "x"),
        ),
    ];
    (b.build(), checks)
}

#[test]
fn test_full_proof_verifies_in_parallel() {
    init_tracing();
    let (proof, checks) = syllogism();
    let reports = build_rulebook().verify_all(&proof, &checks);

    assert_eq!(reports.len(), checks.len());
    for (report, check) in reports.iter().zip(&checks) {
        assert_eq!(report.step, check.step);
        assert!(report.is_valid(), "step {}: {:?}", report.step, report.outcome);
    }
}

#[test]
fn test_full_proof_flags_only_the_broken_step() {
    let (proof, mut checks) = syllogism();
    checks[4] = StepCheck::new(5, "->-elim", Justification::new().line(3).line(4));
    let reports = build_rulebook().verify_all(&proof, &checks);

    let failed: Vec<usize> = reports.iter().filter(|r| !r.is_valid()).map(|r| r.step).collect();
    assert_eq!(failed, vec![5]);
}

#[test]
fn test_proof_and_checks_load_from_json() {
    let proof_json = r#"[
        {"sentence": {"tag": "binary", "op": "and",
                      "left": {"tag": "atom", "name": "P"},
                      "right": {"tag": "atom", "name": "Q"}}},
        {"sentence": {"tag": "atom", "name": "P"}}
    ]"#;
    let checks_json = r#"[
        {"step": 1, "rule": {"name": "premise"}},
        {"step": 2, "rule": {"name": "and", "role": "elim"},
         "justification": {"side": "left", "references": [1]}}
    ]"#;
    let proof: Proof = serde_json::from_str(proof_json).expect("proof");
    let checks: Vec<StepCheck> = serde_json::from_str(checks_json).expect("checks");

    let reports = build_rulebook().verify_all(&proof, &checks);
    assert!(reports.iter().all(|r| r.is_valid()), "reports={reports:?}");

    let verdict = serde_json::to_value(reports[1].outcome.as_ref().expect("verdict")).expect("json");
    assert_eq!(verdict, serde_json::json!({"verdict": "valid"}));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_file_changes_contradiction_symbols() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("rulebook.json");
    std::fs::write(&path, r#"{"contradiction_symbols": ["⊥"]}"#).expect("write config");

    let config = RulebookConfig::load(&path).expect("load");
    let book = Rulebook::with_config(config);

    let mut b = ProofBuilder::new();
    b.premise(atom("⊥"));
    b.step(atom("P"));
    b.premise(atom("_|_"));
    b.step(atom("P"));
    let proof = b.build();

    let custom = book.verify(&RuleKey::elim("contra"), &proof, 2, &Justification::new().line(1));
    assert_eq!(custom, Ok(Verdict::Valid));
    let default_symbol = book
        .verify(&RuleKey::elim("contra"), &proof, 4, &Justification::new().line(3))
        .expect("verify");
    assert!(matches!(default_symbol, Verdict::Invalid(_)));
}

#[test]
fn test_config_load_reports_the_path() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"contradiction_symbols": []}"#).expect("write config");

    let err = RulebookConfig::load(&path).expect_err("empty symbol list");
    let rendered = format!("{err:#}");
    assert!(rendered.contains("broken.json"), "err={rendered}");
    assert!(rendered.contains("at least one symbol"), "err={rendered}");
}

#[test]
fn test_rules_are_introspectable() {
    let book = build_rulebook();
    let names: Vec<&str> = book.rules().map(|r| r.display_name()).collect();
    assert_eq!(names.len(), 15);
    assert!(names.contains(&"MT"), "names={names:?}");
    assert_eq!(book.lookup("exists").map(|r| r.key()), Some("e."));
    assert_eq!(book.lookup("equality").map(|r| r.key()), Some("="));
}
