//! Loop hint normalization tests
use crate::ast::{Attr, IdentLoc, NodeRef, ParsedAttr, SourceId, SourceLoc};
use crate::diagnostic::DiagKind;
use crate::lang_options::LangOptions;
use crate::semantic::{HintOption, LoopHintAttr, LoopHintSpelling};
use crate::test_utils::AttrTestBed;

fn single_hint(bed: &mut AttrTestBed, stmt: NodeRef, attr: ParsedAttr) -> Option<LoopHintAttr> {
    match bed.process_one(stmt, &attr)? {
        Attr::LoopHint(hint) => Some(hint),
        other => panic!("expected loop hint, got {:?}", other),
    }
}

/// One valid `#pragma clang loop` spelling per option, with the value it lowers to
fn valid_hints(bed: &mut AttrTestBed) -> Vec<(ParsedAttr, HintOption, i64)> {
    vec![
        (bed.clang_loop_keyword("vectorize", "enable"), HintOption::Vectorize, 1),
        (bed.clang_loop_int("vectorize_width", 8), HintOption::VectorizeWidth, 8),
        (bed.clang_loop_keyword("interleave", "disable"), HintOption::Interleave, 0),
        (bed.clang_loop_int("interleave_count", 2), HintOption::InterleaveCount, 2),
        (bed.clang_loop_keyword("unroll", "full"), HintOption::Unroll, 1),
        (bed.clang_loop_int("unroll_count", 4), HintOption::UnrollCount, 4),
    ]
}

#[test]
fn lowers_every_option_on_a_for_loop() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.for_stmt();

    for (attr, option, value) in valid_hints(&mut bed) {
        let range = attr.range;
        let hint = single_hint(&mut bed, stmt, attr).expect("hint should be accepted");
        assert_eq!(hint.option, option);
        assert_eq!(hint.value, value);
        assert_eq!(hint.spelling, LoopHintSpelling::ClangLoop);
        assert_eq!(hint.range, range);
    }
    assert!(bed.diagnostics().is_empty());
}

#[test]
fn accepts_every_loop_kind() {
    let mut bed = AttrTestBed::new();
    let loops = [bed.do_stmt(), bed.for_stmt(), bed.for_range_stmt(), bed.while_stmt()];

    for stmt in loops {
        let attr = bed.clang_loop_int("vectorize_width", 4);
        assert!(single_hint(&mut bed, stmt, attr).is_some());
    }
    assert!(bed.diagnostics().is_empty());
}

#[test]
fn rejects_every_option_on_non_loop() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.expr_stmt();

    let hints = valid_hints(&mut bed);
    let count = hints.len();
    for (attr, _, _) in hints {
        assert!(single_hint(&mut bed, stmt, attr).is_none());
    }

    assert_eq!(bed.diag_kinds(), vec![DiagKind::PragmaLoopPrecedesNonloop; count]);
    assert!(
        bed.messages()
            .iter()
            .all(|m| m == "expected a for, while, or do-while loop to follow '#pragma clang loop'")
    );
    let stmt_span = bed.ast.get_span(stmt);
    assert!(bed.diagnostics().iter().all(|d| d.location == stmt_span));
}

#[test]
fn misplaced_keyword_pragmas_name_themselves() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.compound_stmt(vec![]);
    let unroll = bed.pragma_unroll();
    let nounroll = bed.pragma_nounroll();

    bed.process(stmt, &[unroll, nounroll]);

    assert_eq!(
        bed.messages(),
        vec![
            "expected a for, while, or do-while loop to follow '#pragma unroll'".to_string(),
            "expected a for, while, or do-while loop to follow '#pragma nounroll'".to_string(),
        ]
    );
}

#[test]
fn pragma_unroll_means_full_unroll() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.while_stmt();
    let attr = bed.pragma_unroll();

    let hint = single_hint(&mut bed, stmt, attr).unwrap();
    assert_eq!(hint.option, HintOption::Unroll);
    assert_eq!(hint.spelling, LoopHintSpelling::Unroll);
    assert_eq!(hint.value, 1);
}

#[test]
fn pragma_nounroll_disables_unrolling() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.do_stmt();
    let attr = bed.pragma_nounroll();

    let hint = single_hint(&mut bed, stmt, attr).unwrap();
    assert_eq!(hint.option, HintOption::Unroll);
    assert_eq!(hint.spelling, LoopHintSpelling::NoUnroll);
    assert_eq!(hint.value, 0);
}

#[test]
fn keyword_pragmas_ignore_value_expression() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.for_stmt();
    let range = bed.span("#pragma nounroll");
    let pragma = bed.ident("nounroll");
    let bogus = bed.call_expr("f");
    let attr = ParsedAttr::loop_hint(range, pragma, Some(pragma), None, Some(bogus));

    let hint = single_hint(&mut bed, stmt, attr).unwrap();
    assert_eq!(hint.value, 0);
    assert!(bed.diagnostics().is_empty());
}

#[test]
fn pragma_unroll_with_count() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.for_stmt();
    let attr = bed.pragma_unroll_count(4);

    let hint = single_hint(&mut bed, stmt, attr).unwrap();
    assert_eq!(hint.option, HintOption::UnrollCount);
    assert_eq!(hint.spelling, LoopHintSpelling::Unroll);
    assert_eq!(hint.value, 4);
    assert_eq!(hint.diagnostic_name(), "#pragma unroll(4)");
}

#[test]
fn pragma_unroll_with_zero_count_is_invalid() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.for_stmt();
    let attr = bed.pragma_unroll_count(0);

    assert!(single_hint(&mut bed, stmt, attr).is_none());
    assert_eq!(bed.diag_kinds(), vec![DiagKind::PragmaLoopInvalidValue]);
}

#[test]
fn wrong_true_keyword_is_rejected() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.for_stmt();
    let vectorize_full = bed.clang_loop_keyword("vectorize", "full");
    let unroll_enable = bed.clang_loop_keyword("unroll", "enable");

    assert!(single_hint(&mut bed, stmt, vectorize_full).is_none());
    assert!(single_hint(&mut bed, stmt, unroll_enable).is_none());

    assert_eq!(
        bed.messages(),
        vec![
            "invalid argument; expected 'enable' or 'disable'".to_string(),
            "invalid argument; expected 'full' or 'disable'".to_string(),
        ]
    );
}

#[test]
fn invalid_keyword_points_at_value() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.for_stmt();
    let attr = bed.clang_loop_keyword("interleave", "sometimes");

    assert!(single_hint(&mut bed, stmt, attr).is_none());

    let sm = bed.source_manager();
    let location = bed.diagnostics()[0].location;
    assert_eq!(sm.get_source_text(location), Some("sometimes"));
}

#[test]
fn missing_keyword_is_rejected() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.for_stmt();
    let attr = bed.clang_loop_bare("interleave");

    assert!(single_hint(&mut bed, stmt, attr).is_none());
    assert_eq!(bed.diag_kinds(), vec![DiagKind::PragmaLoopInvalidKeyword]);

    let sm = bed.source_manager();
    assert_eq!(sm.get_source_text(bed.diagnostics()[0].location), Some("interleave"));
}

/// An identifier located past the 16 MiB a packed span can address
fn far_ident(name: &str) -> IdentLoc {
    IdentLoc::new(name, SourceLoc::new(SourceId::new(2), 17 * 1024 * 1024 - 10))
}

#[test]
fn far_value_identifier_reports_at_attribute() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.for_stmt();
    let range = bed.span("#pragma clang loop interleave(sometimes)");
    let pragma = bed.ident("loop");
    let option = bed.ident("interleave");
    let attr = ParsedAttr::loop_hint(range, pragma, Some(option), Some(far_ident("sometimes")), None);

    let result = bed.process(stmt, &[attr]);

    assert_eq!(result, stmt);
    assert_eq!(bed.diag_kinds(), vec![DiagKind::PragmaLoopInvalidKeyword]);
    assert_eq!(bed.diagnostics()[0].location, range);
}

#[test]
fn far_option_identifier_reports_at_attribute() {
    let mut bed = AttrTestBed::new();
    bed.lang_opts = LangOptions::pedantic();
    let stmt = bed.while_stmt();
    let range = bed.span("#pragma clang loop vectorise(enable)");
    let pragma = bed.ident("loop");
    let value = bed.ident("enable");
    let attr = ParsedAttr::loop_hint(range, pragma, Some(far_ident("vectorise")), Some(value), None);

    assert_eq!(bed.process(stmt, &[attr]), stmt);
    assert_eq!(bed.diag_kinds(), vec![DiagKind::PragmaLoopInvalidOption]);
    assert_eq!(bed.diagnostics()[0].location, range);
}

#[test]
fn disable_works_for_every_enable_option() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.for_stmt();

    for option in ["vectorize", "interleave", "unroll"] {
        let attr = bed.clang_loop_keyword(option, "disable");
        let hint = single_hint(&mut bed, stmt, attr).unwrap();
        assert_eq!(hint.value, 0);
        assert_eq!(hint.value_string(), "(disable)");
    }
}

#[test]
fn numeric_value_must_be_positive() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.for_stmt();

    let zero = bed.clang_loop_int("vectorize_width", 0);
    let negative = bed.clang_loop_int("interleave_count", -2);
    let one = bed.clang_loop_int("unroll_count", 1);

    assert!(single_hint(&mut bed, stmt, zero).is_none());
    assert!(single_hint(&mut bed, stmt, negative).is_none());
    assert_eq!(single_hint(&mut bed, stmt, one).map(|h| h.value), Some(1));

    assert_eq!(
        bed.diag_kinds(),
        vec![DiagKind::PragmaLoopInvalidValue, DiagKind::PragmaLoopInvalidValue]
    );
    assert_eq!(
        bed.messages()[0],
        "invalid argument; expected a positive integer value"
    );
}

#[test]
fn numeric_value_has_no_upper_bound() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.for_stmt();
    let attr = bed.clang_loop_int("vectorize_width", 1 << 40);

    assert_eq!(single_hint(&mut bed, stmt, attr).map(|h| h.value), Some(1 << 40));
}

#[test]
fn numeric_value_must_be_constant() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.for_stmt();

    let call = bed.call_expr("width");
    let by_call = bed.clang_loop_value("vectorize_width", call);
    let var = bed.name_expr("n");
    let by_variable = bed.clang_loop_value("unroll_count", var);
    let missing = bed.clang_loop_bare("interleave_count");

    assert!(single_hint(&mut bed, stmt, by_call).is_none());
    assert!(single_hint(&mut bed, stmt, by_variable).is_none());
    assert!(single_hint(&mut bed, stmt, missing).is_none());

    assert_eq!(bed.diag_kinds(), vec![DiagKind::PragmaLoopInvalidValue; 3]);

    let sm = bed.source_manager();
    assert_eq!(sm.get_source_text(bed.diagnostics()[0].location), Some("width()"));
    assert_eq!(sm.get_source_text(bed.diagnostics()[1].location), Some("n"));
}

#[test]
fn numeric_value_may_use_enumerators_and_arithmetic() {
    let mut bed = AttrTestBed::new();
    bed.scope.declare_enum_constant("LANES", 4);
    let stmt = bed.for_stmt();

    let lanes = bed.name_expr("LANES");
    let two = bed.int(2);
    let product = bed.ast.push_node(
        crate::ast::NodeKind::BinaryOp(crate::ast::BinaryOp::Mul, lanes, two),
        crate::ast::SourceSpan::empty(),
    );
    let attr = bed.clang_loop_value("vectorize_width", product);

    assert_eq!(single_hint(&mut bed, stmt, attr).map(|h| h.value), Some(8));
    assert!(bed.diagnostics().is_empty());
}

#[test]
fn unknown_option_falls_back_to_vectorize() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.for_stmt();
    let attr = bed.clang_loop_keyword("vectorise", "enable");

    let hint = single_hint(&mut bed, stmt, attr).unwrap();
    assert_eq!(hint.option, HintOption::Vectorize);
    assert_eq!(hint.value, 1);
    assert!(bed.diagnostics().is_empty());
}

#[test]
fn strict_mode_rejects_unknown_option() {
    let mut bed = AttrTestBed::new();
    bed.lang_opts = LangOptions::pedantic();
    let stmt = bed.for_stmt();
    let attr = bed.clang_loop_keyword("vectorise", "enable");
    let known = bed.clang_loop_keyword("vectorize", "enable");

    assert!(single_hint(&mut bed, stmt, attr).is_none());
    assert!(single_hint(&mut bed, stmt, known).is_some());

    assert_eq!(bed.diag_kinds(), vec![DiagKind::PragmaLoopInvalidOption]);
    assert!(bed.messages()[0].starts_with("invalid option 'vectorise'; expected vectorize, vectorize_width"));
}

#[test]
fn serialized_hint_snapshot() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.while_stmt();
    let attr = bed.clang_loop_int("interleave_count", 4);
    let hint = single_hint(&mut bed, stmt, attr).unwrap();

    insta::assert_yaml_snapshot!(&hint, @r"
    option: InterleaveCount
    spelling: ClangLoop
    value: 4
    ");
}
