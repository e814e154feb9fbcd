//! Loop hint compatibility tests
use crate::ast::{Attr, FallThroughAttr, SourceSpan};
use crate::diagnostic::{DiagKind, DiagnosticEngine};
use crate::semantic::{HintOption, LoopHintAttr, LoopHintSpelling, check_for_incompatible_attributes};
use crate::test_utils::AttrTestBed;

fn clang_loop(option: HintOption, value: i64) -> Attr {
    Attr::LoopHint(LoopHintAttr::new(
        option,
        LoopHintSpelling::ClangLoop,
        value,
        SourceSpan::empty(),
    ))
}

fn check(attrs: &[Attr]) -> DiagnosticEngine {
    let mut diag = DiagnosticEngine::new();
    check_for_incompatible_attributes(&mut diag, attrs);
    diag
}

fn kinds(diag: &DiagnosticEngine) -> Vec<DiagKind> {
    diag.diagnostics().iter().map(|d| d.kind).collect()
}

#[test]
fn duplicate_enable_hints_are_reported_once_and_kept() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.for_stmt();
    let enable = bed.clang_loop_keyword("vectorize", "enable");
    let disable = bed.clang_loop_keyword("vectorize", "disable");

    let result = bed.process(stmt, &[enable, disable]);

    assert_eq!(bed.diag_kinds(), vec![DiagKind::PragmaLoopDuplicate]);
    assert_eq!(
        bed.messages(),
        vec!["duplicate directives 'vectorize(enable)' and 'vectorize(disable)'".to_string()]
    );
    let attrs = bed.attrs_of(result);
    assert_eq!(attrs.len(), 2);
    assert_eq!(attrs[0].as_loop_hint().map(|h| h.value), Some(1));
    assert_eq!(attrs[1].as_loop_hint().map(|h| h.value), Some(0));
}

#[test]
fn duplicate_is_reported_at_the_later_hint() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.while_stmt();
    let first = bed.clang_loop_int("unroll_count", 2);
    let second = bed.clang_loop_int("unroll_count", 8);
    let second_range = second.range;

    bed.process(stmt, &[first, second]);

    assert_eq!(bed.diag_kinds(), vec![DiagKind::PragmaLoopDuplicate]);
    assert_eq!(bed.diagnostics()[0].location, second_range);
    assert_eq!(
        bed.messages()[0],
        "duplicate directives 'unroll_count(2)' and 'unroll_count(8)'"
    );
}

#[test]
fn disable_conflicts_with_numeric_hint() {
    let diag = check(&[
        clang_loop(HintOption::Vectorize, 0),
        clang_loop(HintOption::VectorizeWidth, 8),
    ]);
    assert_eq!(kinds(&diag), vec![DiagKind::PragmaLoopIncompatible]);
    assert_eq!(
        diag.diagnostics()[0].message,
        "incompatible directives 'vectorize(disable)' and 'vectorize_width(8)'"
    );
}

#[test]
fn conflict_is_independent_of_order() {
    let diag = check(&[
        clang_loop(HintOption::InterleaveCount, 2),
        clang_loop(HintOption::Interleave, 0),
    ]);
    assert_eq!(kinds(&diag), vec![DiagKind::PragmaLoopIncompatible]);
    assert_eq!(
        diag.diagnostics()[0].message,
        "incompatible directives 'interleave(disable)' and 'interleave_count(2)'"
    );
}

#[test]
fn enable_is_compatible_with_numeric_hint() {
    let vectorize = check(&[
        clang_loop(HintOption::Vectorize, 1),
        clang_loop(HintOption::VectorizeWidth, 8),
    ]);
    assert!(vectorize.diagnostics().is_empty());

    let interleave = check(&[
        clang_loop(HintOption::Interleave, 1),
        clang_loop(HintOption::InterleaveCount, 4),
    ]);
    assert!(interleave.diagnostics().is_empty());
}

#[test]
fn full_unroll_conflicts_with_unroll_count() {
    let full = check(&[
        clang_loop(HintOption::Unroll, 1),
        clang_loop(HintOption::UnrollCount, 4),
    ]);
    assert_eq!(kinds(&full), vec![DiagKind::PragmaLoopIncompatible]);
    assert_eq!(
        full.diagnostics()[0].message,
        "incompatible directives 'unroll(full)' and 'unroll_count(4)'"
    );

    let disabled = check(&[
        clang_loop(HintOption::Unroll, 0),
        clang_loop(HintOption::UnrollCount, 4),
    ]);
    assert_eq!(kinds(&disabled), vec![DiagKind::PragmaLoopIncompatible]);
}

#[test]
fn categories_do_not_interact() {
    let diag = check(&[
        clang_loop(HintOption::Vectorize, 0),
        clang_loop(HintOption::InterleaveCount, 4),
        clang_loop(HintOption::Interleave, 1),
        clang_loop(HintOption::UnrollCount, 2),
        clang_loop(HintOption::VectorizeWidth, 1),
    ]);
    // only the last hint completes a vectorize disable/numeric pair
    assert_eq!(kinds(&diag), vec![DiagKind::PragmaLoopIncompatible]);
}

#[test]
fn checking_continues_after_a_conflict() {
    let diag = check(&[
        clang_loop(HintOption::Vectorize, 0),
        clang_loop(HintOption::VectorizeWidth, 8),
        clang_loop(HintOption::VectorizeWidth, 4),
    ]);
    assert_eq!(
        kinds(&diag),
        vec![
            DiagKind::PragmaLoopIncompatible,
            DiagKind::PragmaLoopDuplicate,
            DiagKind::PragmaLoopIncompatible,
        ]
    );
    assert_eq!(
        diag.diagnostics()[2].message,
        "incompatible directives 'vectorize(disable)' and 'vectorize_width(4)'"
    );
}

#[test]
fn keyword_pragmas_use_pragma_names() {
    let mut bed = AttrTestBed::new();
    let stmt = bed.for_stmt();
    let unroll = bed.pragma_unroll();
    let count = bed.pragma_unroll_count(4);
    let nounroll = bed.pragma_nounroll();

    let result = bed.process(stmt, &[unroll, count, nounroll]);

    assert_eq!(
        bed.messages(),
        vec![
            "incompatible directives '#pragma unroll' and '#pragma unroll(4)'".to_string(),
            "duplicate directives '#pragma unroll' and '#pragma nounroll'".to_string(),
            "incompatible directives '#pragma nounroll' and '#pragma unroll(4)'".to_string(),
        ]
    );
    assert_eq!(bed.attrs_of(result).len(), 3);
}

#[test]
fn fallthrough_annotations_are_skipped() {
    let diag = check(&[
        Attr::FallThrough(FallThroughAttr {
            range: SourceSpan::empty(),
        }),
        clang_loop(HintOption::Unroll, 1),
        Attr::FallThrough(FallThroughAttr {
            range: SourceSpan::empty(),
        }),
    ]);
    assert!(diag.diagnostics().is_empty());
}
