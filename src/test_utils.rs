//! Fixture for exercising statement attribute processing without a parser.
//!
//! [`AttrTestBed`] builds statements, expressions and raw attributes the way the
//! parser would hand them over, giving each one a distinct span in a synthetic
//! source buffer so diagnostics can be located and formatted.

use crate::ast::{
    Ast, Attr, AttrSyntax, ForRangeStmt, ForStmt, IdentLoc, NodeKind, NodeRef, ParsedAttr, SourceId, SourceLoc,
    SourceSpan, WhileStmt,
};
use crate::diagnostic::{DiagKind, Diagnostic, DiagnosticEngine};
use crate::lang_options::LangOptions;
use crate::semantic::{FunctionScope, StmtAttrProcessor};
use crate::source_manager::SourceManager;

pub struct AttrTestBed {
    pub ast: Ast,
    pub diag: DiagnosticEngine,
    pub scope: FunctionScope,
    pub lang_opts: LangOptions,
    text: String,
}

impl Default for AttrTestBed {
    fn default() -> Self {
        Self::new()
    }
}

impl AttrTestBed {
    pub fn new() -> Self {
        AttrTestBed {
            ast: Ast::new(),
            diag: DiagnosticEngine::new(),
            scope: FunctionScope::new(),
            lang_opts: LangOptions::default(),
            text: String::new(),
        }
    }

    /// Source id of the synthetic buffer; the first buffer a fresh `SourceManager` hands out
    fn source_id() -> SourceId {
        SourceId::new(2)
    }

    /// Append `text` to the synthetic buffer and return its span
    pub fn span(&mut self, text: &str) -> SourceSpan {
        let offset = self.text.len() as u32;
        self.text.push_str(text);
        self.text.push('\n');
        SourceSpan::new_with_length(Self::source_id(), offset, text.len() as u32)
    }

    pub fn ident(&mut self, name: &str) -> IdentLoc {
        let span = self.span(name);
        IdentLoc::new(name, span.start())
    }

    /// A `SourceManager` holding everything spelled so far
    pub fn source_manager(&self) -> SourceManager {
        let mut sm = SourceManager::new();
        sm.add_buffer(self.text.clone().into_bytes(), "test.c");
        sm
    }

    fn node(&mut self, kind: NodeKind, text: &str) -> NodeRef {
        let span = self.span(text);
        self.ast.push_node(kind, span)
    }

    // --- Expressions ---

    pub fn int(&mut self, value: i64) -> NodeRef {
        self.node(NodeKind::LiteralInt(value), &value.to_string())
    }

    pub fn name_expr(&mut self, name: &str) -> NodeRef {
        self.node(NodeKind::Ident(name.into()), name)
    }

    pub fn call_expr(&mut self, callee: &str) -> NodeRef {
        let callee_ref = self.name_expr(callee);
        self.node(NodeKind::FunctionCall(callee_ref, vec![]), &format!("{}()", callee))
    }

    // --- Statements ---

    pub fn empty_stmt(&mut self) -> NodeRef {
        self.node(NodeKind::EmptyStatement, ";")
    }

    pub fn expr_stmt(&mut self) -> NodeRef {
        let expr = self.int(0);
        self.node(NodeKind::ExpressionStatement(Some(expr)), "0;")
    }

    pub fn case_stmt(&mut self, value: i64) -> NodeRef {
        let expr = self.int(value);
        let body = self.empty_stmt();
        self.node(NodeKind::Case(expr, body), &format!("case {}: ;", value))
    }

    pub fn default_stmt(&mut self) -> NodeRef {
        let body = self.empty_stmt();
        self.node(NodeKind::Default(body), "default: ;")
    }

    pub fn compound_stmt(&mut self, items: Vec<NodeRef>) -> NodeRef {
        self.node(NodeKind::CompoundStatement(items), "{ }")
    }

    pub fn for_stmt(&mut self) -> NodeRef {
        let body = self.empty_stmt();
        self.node(
            NodeKind::For(ForStmt {
                init: None,
                condition: None,
                increment: None,
                body,
            }),
            "for (;;) ;",
        )
    }

    pub fn for_range_stmt(&mut self) -> NodeRef {
        let loop_var = self.name_expr("x");
        let range = self.name_expr("xs");
        let body = self.empty_stmt();
        self.node(NodeKind::ForRange(ForRangeStmt { loop_var, range, body }), "for (x : xs) ;")
    }

    pub fn while_stmt(&mut self) -> NodeRef {
        let condition = self.int(1);
        let body = self.empty_stmt();
        self.node(NodeKind::While(WhileStmt { condition, body }), "while (1) ;")
    }

    pub fn do_stmt(&mut self) -> NodeRef {
        let body = self.empty_stmt();
        let condition = self.int(0);
        self.node(NodeKind::DoWhile(body, condition), "do ; while (0);")
    }

    /// Enter the body of a new `switch`
    pub fn open_switch(&mut self) -> NodeRef {
        let condition = self.name_expr("c");
        let body = self.compound_stmt(vec![]);
        let switch = self.node(NodeKind::Switch(condition, body), "switch (c) { }");
        self.scope.push_switch(switch);
        switch
    }

    // --- Attributes ---

    pub fn attr(&mut self, name: &str) -> ParsedAttr {
        let range = self.span(&format!("[[{}]]", name));
        ParsedAttr::new(None, name, AttrSyntax::Bracket, range)
    }

    pub fn declspec(&mut self, name: &str) -> ParsedAttr {
        let range = self.span(&format!("__declspec({})", name));
        ParsedAttr::new(None, name, AttrSyntax::Declspec, range)
    }

    pub fn fallthrough(&mut self) -> ParsedAttr {
        self.attr("fallthrough")
    }

    /// `#pragma clang loop option(keyword)`
    pub fn clang_loop_keyword(&mut self, option: &str, keyword: &str) -> ParsedAttr {
        let range = self.span(&format!("#pragma clang loop {}({})", option, keyword));
        let pragma = self.ident("loop");
        let option = self.ident(option);
        let value = self.ident(keyword);
        ParsedAttr::loop_hint(range, pragma, Some(option), Some(value), None)
    }

    /// `#pragma clang loop option(expr)`
    pub fn clang_loop_value(&mut self, option: &str, value_expr: NodeRef) -> ParsedAttr {
        let range = self.span(&format!("#pragma clang loop {}(...)", option));
        let pragma = self.ident("loop");
        let option = self.ident(option);
        ParsedAttr::loop_hint(range, pragma, Some(option), None, Some(value_expr))
    }

    /// `#pragma clang loop option(N)` with an integer literal
    pub fn clang_loop_int(&mut self, option: &str, value: i64) -> ParsedAttr {
        let expr = self.int(value);
        self.clang_loop_value(option, expr)
    }

    /// `#pragma clang loop option` with no argument at all
    pub fn clang_loop_bare(&mut self, option: &str) -> ParsedAttr {
        let range = self.span(&format!("#pragma clang loop {}", option));
        let pragma = self.ident("loop");
        let option = self.ident(option);
        ParsedAttr::loop_hint(range, pragma, Some(option), None, None)
    }

    /// `#pragma unroll`
    pub fn pragma_unroll(&mut self) -> ParsedAttr {
        let range = self.span("#pragma unroll");
        let pragma = self.ident("unroll");
        ParsedAttr::loop_hint(range, pragma, Some(pragma), None, None)
    }

    /// `#pragma unroll N`
    pub fn pragma_unroll_count(&mut self, count: i64) -> ParsedAttr {
        let range = self.span(&format!("#pragma unroll {}", count));
        let pragma = self.ident("unroll");
        let value = self.ident(&count.to_string());
        let expr = self.int(count);
        ParsedAttr::loop_hint(range, pragma, Some(pragma), Some(value), Some(expr))
    }

    /// `#pragma nounroll`
    pub fn pragma_nounroll(&mut self) -> ParsedAttr {
        let range = self.span("#pragma nounroll");
        let pragma = self.ident("nounroll");
        ParsedAttr::loop_hint(range, pragma, Some(pragma), None, None)
    }

    // --- Processing ---

    /// Run attribute processing for `stmt` the way statement analysis would
    pub fn process(&mut self, stmt: NodeRef, attrs: &[ParsedAttr]) -> NodeRef {
        let range = attrs
            .iter()
            .map(|attr| attr.range)
            .reduce(SourceSpan::merge)
            .unwrap_or_else(|| self.ast.get_span(stmt));
        StmtAttrProcessor::for_function(&mut self.ast, &mut self.diag, &self.scope)
            .with_lang_options(self.lang_opts)
            .process_stmt_attributes(stmt, attrs, range)
    }

    /// Process a single attribute and return its annotation, if any
    pub fn process_one(&mut self, stmt: NodeRef, attr: &ParsedAttr) -> Option<Attr> {
        StmtAttrProcessor::for_function(&mut self.ast, &mut self.diag, &self.scope)
            .with_lang_options(self.lang_opts)
            .process_stmt_attribute(stmt, attr, attr.range)
    }

    /// Annotations of an attributed statement; empty for any other node
    pub fn attrs_of(&self, node: NodeRef) -> Vec<Attr> {
        match self.ast.get_kind(node) {
            NodeKind::AttributedStatement(attributed) => attributed.attrs().to_vec(),
            _ => Vec::new(),
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diag.diagnostics()
    }

    pub fn diag_kinds(&self) -> Vec<DiagKind> {
        self.diag.diagnostics().iter().map(|d| d.kind).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.diag.diagnostics().iter().map(|d| d.message.clone()).collect()
    }

    pub fn loc_of(&self, node: NodeRef) -> SourceLoc {
        self.ast.get_span(node).start()
    }
}
