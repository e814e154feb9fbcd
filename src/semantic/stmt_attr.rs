//! Statement attribute processing.
//!
//! Every attribute in a statement's attribute list is routed by kind to its
//! handler, which either produces an [`Attr`] or reports a diagnostic and drops
//! the attribute. Once the list is done, the surviving loop hints are checked
//! against each other, and a non-empty result wraps the statement in an
//! [`AttributedStmt`] node.

use hashbrown::HashMap;
use log::debug;
use thin_vec::ThinVec;

use crate::ast::{
    Ast, Attr, AttributedStmt, FallThroughAttr, IdentLoc, NameId, NodeKind, NodeRef, ParsedAttr, ParsedAttrKind,
    SourceSpan, StmtClass,
};
use crate::diagnostic::{Diagnostic, DiagnosticSink, FixItHint, StmtAttrDiagnostic};
use crate::lang_options::LangOptions;
use crate::semantic::const_eval::{ConstEvalCtx, eval_const_expr};
use crate::semantic::loop_hint::{HintCategory, HintFamily, HintOption, LoopHintAttr, LoopHintSpelling};
use crate::semantic::scope::{FunctionScope, SwitchContext};

/// Loop hint argument slots, as filled in by the pragma handlers
const PRAGMA_NAME_ARG: usize = 0;
const OPTION_ARG: usize = 1;
const VALUE_IDENT_ARG: usize = 2;
const VALUE_EXPR_ARG: usize = 3;

/// Validates and lowers the attribute list of a single statement
pub struct StmtAttrProcessor<'a> {
    ast: &'a mut Ast,
    diag: &'a mut dyn DiagnosticSink,
    switch_ctx: &'a dyn SwitchContext,
    constants: Option<&'a HashMap<NameId, i64>>,
    lang_opts: LangOptions,
}

impl<'a> StmtAttrProcessor<'a> {
    pub fn new(ast: &'a mut Ast, diag: &'a mut dyn DiagnosticSink, switch_ctx: &'a dyn SwitchContext) -> Self {
        StmtAttrProcessor {
            ast,
            diag,
            switch_ctx,
            constants: None,
            lang_opts: LangOptions::default(),
        }
    }

    /// Processor for a statement inside the function described by `scope`
    pub fn for_function(ast: &'a mut Ast, diag: &'a mut dyn DiagnosticSink, scope: &'a FunctionScope) -> Self {
        Self::new(ast, diag, scope).with_constants(scope.enum_constants())
    }

    pub fn with_constants(mut self, constants: &'a HashMap<NameId, i64>) -> Self {
        self.constants = Some(constants);
        self
    }

    pub fn with_lang_options(mut self, lang_opts: LangOptions) -> Self {
        self.lang_opts = lang_opts;
        self
    }

    /// Process the attribute list attached to `stmt`. `range` covers the attribute list.
    ///
    /// Returns `stmt` itself when no annotation survives, otherwise a new
    /// `AttributedStatement` node wrapping it.
    pub fn process_stmt_attributes(&mut self, stmt: NodeRef, attr_list: &[ParsedAttr], range: SourceSpan) -> NodeRef {
        let mut attrs = ThinVec::with_capacity(attr_list.len());
        for attr in attr_list {
            if let Some(processed) = self.process_stmt_attribute(stmt, attr, range) {
                attrs.push(processed);
            }
        }

        check_for_incompatible_attributes(&mut *self.diag, &attrs);

        let Some(attributed) = AttributedStmt::new(attrs, stmt) else {
            debug!("process_stmt_attributes: no annotation survived, keeping statement {:?}", stmt);
            return stmt;
        };

        debug!(
            "process_stmt_attributes: wrapping statement {:?} with {} annotation(s)",
            stmt,
            attributed.attrs().len()
        );
        let span = range.merge(self.ast.get_span(stmt));
        self.ast.push_node(NodeKind::AttributedStatement(attributed), span)
    }

    /// Route a single attribute to its handler
    pub fn process_stmt_attribute(&mut self, stmt: NodeRef, attr: &ParsedAttr, range: SourceSpan) -> Option<Attr> {
        debug!("process_stmt_attribute: '{}' ({:?})", attr.name, attr.kind);
        match attr.kind {
            ParsedAttrKind::Unknown => {
                let error = if attr.is_declspec() {
                    StmtAttrDiagnostic::MsAttributeIgnored {
                        name: attr.name,
                        location: attr.range,
                    }
                } else {
                    StmtAttrDiagnostic::UnknownAttributeIgnored {
                        name: attr.name,
                        location: attr.range,
                    }
                };
                self.report(error);
                None
            }
            ParsedAttrKind::FallThrough => self.handle_fallthrough_attr(stmt, attr, range),
            ParsedAttrKind::LoopHint => self.handle_loop_hint_attr(stmt, attr),
            ParsedAttrKind::Decl(_) => {
                // A known attribute that is not a statement attribute belongs on a declaration
                self.report(StmtAttrDiagnostic::AttributeInvalidOnStmt {
                    name: attr.name,
                    location: attr.range,
                    stmt: self.ast.get_span(stmt),
                });
                None
            }
        }
    }

    fn handle_fallthrough_attr(&mut self, stmt: NodeRef, attr: &ParsedAttr, range: SourceSpan) -> Option<Attr> {
        let stmt_class = self.ast.stmt_class(stmt);
        if stmt_class != StmtClass::Null {
            let mut diagnostic: Diagnostic = StmtAttrDiagnostic::FallthroughWrongTarget {
                location: attr.range,
                stmt: self.ast.get_span(stmt),
            }
            .into();
            if stmt_class == StmtClass::SwitchCase {
                diagnostic = diagnostic
                    .with_hint("did you forget ';'?")
                    .with_fix_it(FixItHint::insertion(range.end(), ";"));
            }
            self.diag.emit(diagnostic);
            return None;
        }

        if !self.switch_ctx.is_case_context_open() {
            self.report(StmtAttrDiagnostic::FallthroughOutsideSwitch { location: attr.range });
            return None;
        }

        Some(Attr::FallThrough(FallThroughAttr { range: attr.range }))
    }

    fn handle_loop_hint_attr(&mut self, stmt: NodeRef, attr: &ParsedAttr) -> Option<Attr> {
        let pragma_name = attr.arg_as_ident(PRAGMA_NAME_ARG);
        let pragma_text = pragma_name.map_or("", |ident| ident.name.as_str());
        let option_ident = attr.arg_as_ident(OPTION_ARG);
        let value_ident = attr.arg_as_ident(VALUE_IDENT_ARG);
        let value_expr = attr.arg_as_expr(VALUE_EXPR_ARG);

        if !self.ast.stmt_class(stmt).is_loop() {
            self.report(StmtAttrDiagnostic::PragmaLoopPrecedesNonloop {
                pragma: LoopHintSpelling::pragma_text(pragma_text),
                location: self.ast.get_span(stmt),
            });
            return None;
        }

        let (option, spelling) = match pragma_text {
            "unroll" => {
                let option = if value_ident.is_some() {
                    HintOption::UnrollCount
                } else {
                    HintOption::Unroll
                };
                (option, LoopHintSpelling::Unroll)
            }
            "nounroll" => (HintOption::Unroll, LoopHintSpelling::NoUnroll),
            _ => (self.resolve_option(attr, option_ident)?, LoopHintSpelling::ClangLoop),
        };

        let value = match (option, spelling) {
            (HintOption::Unroll, LoopHintSpelling::Unroll) => 1,
            (HintOption::Unroll, LoopHintSpelling::NoUnroll) => 0,
            (option, _) if option.family() == HintFamily::Enable => {
                let true_keyword = option.true_keyword();
                match value_ident {
                    Some(ident) if ident.is("disable") => 0,
                    Some(ident) if ident.is(true_keyword) => 1,
                    _ => {
                        let location = self.value_location(attr, option_ident, value_ident, value_expr);
                        self.report(StmtAttrDiagnostic::PragmaLoopInvalidKeyword { true_keyword, location });
                        return None;
                    }
                }
            }
            _ => {
                let evaluated = value_expr.and_then(|expr| {
                    let mut ctx = ConstEvalCtx::new(&*self.ast);
                    if let Some(constants) = self.constants {
                        ctx = ctx.with_constants(constants);
                    }
                    eval_const_expr(&ctx, expr)
                });
                match evaluated {
                    Some(value) if value >= 1 => value,
                    _ => {
                        let location = self.value_location(attr, option_ident, value_ident, value_expr);
                        self.report(StmtAttrDiagnostic::PragmaLoopInvalidValue { location });
                        return None;
                    }
                }
            }
        };

        let hint = LoopHintAttr::new(option, spelling, value, attr.range);
        debug!("handle_loop_hint_attr: produced {}", hint.diagnostic_name());
        Some(Attr::LoopHint(hint))
    }

    /// Option named by a `#pragma clang loop` hint. Unrecognized names are read as
    /// `vectorize` unless strict option checking is enabled.
    fn resolve_option(&mut self, attr: &ParsedAttr, option_ident: Option<IdentLoc>) -> Option<HintOption> {
        if let Some(option) = option_ident.and_then(|ident| HintOption::from_name(ident.name.as_str())) {
            return Some(option);
        }

        if !self.lang_opts.strict_loop_hint_options {
            return Some(HintOption::Vectorize);
        }

        let (option, location) = match option_ident {
            Some(ident) => (ident.name.as_str().to_string(), ident_span(ident).unwrap_or(attr.range)),
            None => ("(missing)".to_string(), attr.range),
        };
        self.report(StmtAttrDiagnostic::PragmaLoopInvalidOption { option, location });
        None
    }

    /// Where a bad hint value is reported: the value identifier, else the value
    /// expression, else the option name, else the whole attribute.
    /// An identifier whose location cannot be spanned falls back to the attribute.
    fn value_location(
        &self,
        attr: &ParsedAttr,
        option_ident: Option<IdentLoc>,
        value_ident: Option<IdentLoc>,
        value_expr: Option<NodeRef>,
    ) -> SourceSpan {
        if let Some(ident) = value_ident {
            return ident_span(ident).unwrap_or(attr.range);
        }
        if let Some(expr) = value_expr {
            return self.ast.get_span(expr);
        }
        option_ident.and_then(ident_span).unwrap_or(attr.range)
    }

    fn report(&mut self, error: StmtAttrDiagnostic) {
        self.diag.emit(error.into());
    }
}

fn ident_span(ident: IdentLoc) -> Option<SourceSpan> {
    SourceSpan::try_new_with_length(ident.loc.source_id(), ident.loc.offset(), ident.name.as_str().len() as u32)
}

/// Hints seen so far for one category
#[derive(Debug, Default, Clone, Copy)]
struct CategoryState<'h> {
    enable: Option<&'h LoopHintAttr>,
    numeric: Option<&'h LoopHintAttr>,
}

/// Report duplicate and mutually exclusive loop hints.
///
/// The same family may appear only once per category. A disable hint cannot be
/// combined with a numeric hint of its category, and for unroll the numeric form
/// also conflicts with `unroll(full)`. Nothing is removed from `attrs`.
pub fn check_for_incompatible_attributes(diag: &mut dyn DiagnosticSink, attrs: &[Attr]) {
    let mut states = [CategoryState::default(); 3];

    for hint in attrs.iter().filter_map(Attr::as_loop_hint) {
        let category = hint.category();
        let state = &mut states[category as usize];

        let slot = match hint.family() {
            HintFamily::Enable => &mut state.enable,
            HintFamily::Numeric => &mut state.numeric,
        };
        if let Some(prev) = slot.replace(hint) {
            diag.emit(
                StmtAttrDiagnostic::PragmaLoopDuplicate {
                    first: prev.diagnostic_name(),
                    second: hint.diagnostic_name(),
                    location: hint.range,
                }
                .into(),
            );
        }

        if let (Some(enable), Some(numeric)) = (state.enable, state.numeric)
            && (category == HintCategory::Unroll || enable.value == 0)
        {
            diag.emit(
                StmtAttrDiagnostic::PragmaLoopIncompatible {
                    first: enable.diagnostic_name(),
                    second: numeric.diagnostic_name(),
                    location: hint.range,
                }
                .into(),
            );
        }
    }
}
