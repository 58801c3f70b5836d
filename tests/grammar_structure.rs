//! Structural inspection of resolved trees: singleton collapsing and the
//! documented shape of the complex sample rule.

use abnf::abnf::node::Node;
use abnf::abnf::testing::COMPLEX_GRAMMAR;
use abnf::compile;

#[test]
fn singleton_rules_collapse_to_bare_references() {
    let grammar = compile("r = rule1\nrule1 = \"a\"\n", None).unwrap();
    let rule1 = grammar.rule_id("rule1").unwrap();
    // a bare reference node, not a one-element Or/And wrapper
    assert_eq!(grammar.rule("r").unwrap().node, Node::Rule(rule1));
}

#[test]
fn singleton_alternative_with_many_elements_collapses_to_and_only() {
    let grammar = compile("r = a b\na = \"x\"\nb = \"y\"\n", None).unwrap();
    let a = grammar.rule_id("a").unwrap();
    let b = grammar.rule_id("b").unwrap();
    assert_eq!(
        grammar.rule("r").unwrap().node,
        Node::And(vec![Node::Rule(a), Node::Rule(b)])
    );
}

#[test]
fn complex_rule_resolves_to_the_documented_shape() {
    let grammar = compile(COMPLEX_GRAMMAR, None).unwrap();
    let id = |name: &str| grammar.rule_id(name).unwrap();

    let expected = Node::Or(vec![
        // rule1 rule2
        Node::And(vec![Node::Rule(id("rule1")), Node::Rule(id("rule2"))]),
        // *rule2
        Node::Repeat {
            min: 0,
            max: None,
            inner: Box::new(Node::Rule(id("rule2"))),
        },
        // [rule4-1 rule4-2 / rule4-3] (rule5 / rule6)
        Node::And(vec![
            Node::Optional(Box::new(Node::Or(vec![
                Node::And(vec![Node::Rule(id("rule4-1")), Node::Rule(id("rule4-2"))]),
                Node::Rule(id("rule4-3")),
            ]))),
            Node::Or(vec![Node::Rule(id("rule5")), Node::Rule(id("rule6"))]),
        ]),
        // 2*5([rule7] (rule8 / rule9) rule10)
        Node::Repeat {
            min: 2,
            max: Some(5),
            inner: Box::new(Node::And(vec![
                Node::Optional(Box::new(Node::Rule(id("rule7")))),
                Node::Or(vec![Node::Rule(id("rule8")), Node::Rule(id("rule9"))]),
                Node::Rule(id("rule10")),
            ])),
        },
    ]);

    assert_eq!(grammar.rule("complex").unwrap().node, expected);
}

#[test]
fn complex_rule_matches_under_first_match_semantics() {
    let grammar = compile(COMPLEX_GRAMMAR, None).unwrap();
    // rule1 rule2
    assert_eq!(grammar.test("ab"), Some(2));
    // *rule2
    assert_eq!(grammar.test("bbb"), Some(3));
    // *rule2 is nullable, so once rule1 fails it wins with length 0 and
    // the later alternatives are never consulted
    assert_eq!(grammar.test("cdf"), Some(0));
}

#[test]
fn later_alternatives_match_when_earlier_ones_are_not_nullable() {
    // The complex rule's 3rd and 4th alternative shapes, reachable
    let grammar = compile(
        "\
r = rule1 rule2 / [rule4-1 rule4-2 / rule4-3] (rule5 / rule6) / 2*5([rule7] (rule8 / rule9) rule10)
rule1 = \"a\"
rule2 = \"b\"
rule4-1 = \"c\"
rule4-2 = \"d\"
rule4-3 = \"e\"
rule5 = \"f\"
rule6 = \"g\"
rule7 = \"h\"
rule8 = \"i\"
rule9 = \"j\"
rule10 = \"k\"
",
        None,
    )
    .unwrap();
    // [rule4-1 rule4-2 / rule4-3] (rule5 / rule6)
    assert_eq!(grammar.test("cdf"), Some(3));
    assert_eq!(grammar.test("eg"), Some(2));
    assert_eq!(grammar.test("f"), Some(1)); // optional skipped
    // 2*5(...): at least two repetitions of h? (i/j) k
    assert_eq!(grammar.test("hikjk"), Some(5));
    assert_eq!(grammar.test("ik"), None);
}

#[test]
fn rule_listing_keeps_definition_order() {
    let grammar = compile(COMPLEX_GRAMMAR, None).unwrap();
    let names: Vec<String> = grammar
        .rule_infos()
        .into_iter()
        .map(|info| info.name)
        .collect();
    insta::assert_debug_snapshot!(names, @r###"
    [
        "complex",
        "rule1",
        "rule2",
        "rule4-1",
        "rule4-2",
        "rule4-3",
        "rule5",
        "rule6",
        "rule7",
        "rule8",
        "rule9",
        "rule10",
    ]
    "###);
}
