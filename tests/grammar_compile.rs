//! Compilation-level tests: degenerate grammars, undefined rules,
//! continuation handling, and entry selection.

use abnf::abnf::testing::{CONTINUED_GRAMMAR, INLINE_GRAMMAR};
use abnf::{compile, CompileError};

#[test]
fn grammars_with_fewer_than_three_tokens_fail() {
    for degenerate in ["", "   \n\t", "; only a comment\n", "name", "name ="] {
        let err = compile(degenerate, None).unwrap_err();
        assert!(
            matches!(err, CompileError::Syntax(_)),
            "expected syntax error for {:?}, got {:?}",
            degenerate,
            err
        );
    }
}

#[test]
fn undefined_reference_fails_naming_the_identifier() {
    let err = compile("top = head tail\nhead = \"h\"\n", None).unwrap_err();
    let CompileError::UndefinedRule { name, line, column } = err else {
        panic!("expected undefined rule error");
    };
    assert_eq!(name, "tail");
    assert_eq!((line, column), (0, 11));
}

#[test]
fn continued_alternatives_resolve_like_inline_ones() {
    let continued = compile(CONTINUED_GRAMMAR, None).unwrap();
    let inline = compile(INLINE_GRAMMAR, None).unwrap();
    assert_eq!(
        continued.rule("rule").unwrap().node,
        inline.rule("rule").unwrap().node
    );

    for input in ["x", "y", "z"] {
        assert_eq!(continued.test(input), Some(1), "input {:?}", input);
    }
    assert_eq!(continued.test("w"), None);
}

#[test]
fn continuation_without_prior_definition_fails() {
    let err = compile("a = \"x\"\nb =/ \"y\"\n", None).unwrap_err();
    let CompileError::Syntax(err) = err else {
        panic!("expected syntax error");
    };
    assert!(err.message.contains("'b'"));
}

#[test]
fn unterminated_groups_fail_with_expected_bracket() {
    let err = compile("r = (\"a\" / \"b\"\n", None).unwrap_err();
    assert!(err.to_string().ends_with("expected ')'"));

    let err = compile("r = 1*[\"a\"\n", None).unwrap_err();
    assert!(err.to_string().ends_with("expected ']'"));
}

#[test]
fn entry_defaults_to_first_rule_and_can_be_overridden() {
    let grammar = "first = \"1\"\nsecond = \"2\"\n";

    let default = compile(grammar, None).unwrap();
    assert_eq!(default.entry_name(), "first");

    let chosen = compile(grammar, Some("second")).unwrap();
    assert_eq!(chosen.entry_name(), "second");
    assert_eq!(chosen.test("2"), Some(1));

    let missing = compile(grammar, Some("third")).unwrap_err();
    assert!(matches!(missing, CompileError::UndefinedRule { ref name, .. } if name == "third"));
}

#[test]
fn comments_never_reach_rule_bodies() {
    let grammar = "\
; a grammar of two rules
r = a ; trailing words = / ( that must not lex
a = \"x\"
";
    let compiled = compile(grammar, None).unwrap();
    assert_eq!(compiled.test("x"), Some(1));
}

#[test]
fn rule_names_match_case_insensitively_across_definitions() {
    let grammar = "Top = PART part\nPART = \"p\"\n";
    let compiled = compile(grammar, None).unwrap();
    assert_eq!(compiled.test("pp"), Some(2));
}
