//! Attributes attached to statements.
//!
//! [`ParsedAttr`] is what the parser hands over: a recognized kind, the spelled
//! name, its source range and a positional argument list. [`Attr`] is the
//! validated annotation produced by semantic analysis, and [`AttributedStmt`]
//! binds a non-empty list of them to the statement they precede.

use serde::Serialize;
use thin_vec::ThinVec;

use crate::ast::{NameId, NodeRef, SourceLoc, SourceSpan};
use crate::semantic::LoopHintAttr;

/// Attributes that are only meaningful on declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeclAttrKind {
    Aligned,
    AlwaysInline,
    Cold,
    Deprecated,
    Hot,
    MaybeUnused,
    NoDiscard,
    NoInline,
    NoReturn,
    Packed,
    Section,
    Unused,
    Used,
    Visibility,
    Weak,
}

/// Recognized attribute kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParsedAttrKind {
    Unknown,
    FallThrough,
    /// Produced by `#pragma clang loop`, `#pragma unroll` and `#pragma nounroll`
    LoopHint,
    Decl(DeclAttrKind),
}

impl ParsedAttrKind {
    /// Resolve a spelled attribute name, optionally scoped (`clang::fallthrough`).
    /// Names wrapped in double underscores (`__packed__`) are normalized first.
    pub fn from_name(scope: Option<&str>, name: &str) -> Self {
        if let Some(scope) = scope
            && !matches!(scope, "gnu" | "clang" | "__gnu__" | "__clang__")
        {
            return ParsedAttrKind::Unknown;
        }

        let name = name
            .strip_prefix("__")
            .and_then(|n| n.strip_suffix("__"))
            .filter(|n| !n.is_empty())
            .unwrap_or(name);

        match name {
            "fallthrough" => ParsedAttrKind::FallThrough,
            "aligned" => ParsedAttrKind::Decl(DeclAttrKind::Aligned),
            "always_inline" => ParsedAttrKind::Decl(DeclAttrKind::AlwaysInline),
            "cold" => ParsedAttrKind::Decl(DeclAttrKind::Cold),
            "deprecated" => ParsedAttrKind::Decl(DeclAttrKind::Deprecated),
            "hot" => ParsedAttrKind::Decl(DeclAttrKind::Hot),
            "maybe_unused" => ParsedAttrKind::Decl(DeclAttrKind::MaybeUnused),
            "nodiscard" | "warn_unused_result" => ParsedAttrKind::Decl(DeclAttrKind::NoDiscard),
            "noinline" => ParsedAttrKind::Decl(DeclAttrKind::NoInline),
            "noreturn" => ParsedAttrKind::Decl(DeclAttrKind::NoReturn),
            "packed" => ParsedAttrKind::Decl(DeclAttrKind::Packed),
            "section" => ParsedAttrKind::Decl(DeclAttrKind::Section),
            "unused" => ParsedAttrKind::Decl(DeclAttrKind::Unused),
            "used" => ParsedAttrKind::Decl(DeclAttrKind::Used),
            "visibility" => ParsedAttrKind::Decl(DeclAttrKind::Visibility),
            "weak" => ParsedAttrKind::Decl(DeclAttrKind::Weak),
            _ => ParsedAttrKind::Unknown,
        }
    }
}

/// Surface syntax an attribute was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttrSyntax {
    /// `[[name]]` / `[[scope::name]]`
    Bracket,
    /// `__declspec(name)`
    Declspec,
    /// Synthesized from a `#pragma`
    Pragma,
}

/// An identifier argument with its location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentLoc {
    pub name: NameId,
    pub loc: SourceLoc,
}

impl IdentLoc {
    pub fn new(name: impl Into<NameId>, loc: SourceLoc) -> Self {
        IdentLoc { name: name.into(), loc }
    }

    pub fn is(&self, text: &str) -> bool {
        self.name.as_str() == text
    }
}

/// One positional attribute argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrArg {
    Ident(IdentLoc),
    Expr(NodeRef),
    Absent,
}

/// A raw attribute as delivered by the parser. Read-only to semantic analysis.
#[derive(Debug, Clone)]
pub struct ParsedAttr {
    pub kind: ParsedAttrKind,
    pub name: NameId,
    pub range: SourceSpan,
    pub syntax: AttrSyntax,
    pub args: ThinVec<AttrArg>,
}

impl ParsedAttr {
    /// Build an attribute from its spelling, resolving the kind from the name
    pub fn new(scope: Option<&str>, name: &str, syntax: AttrSyntax, range: SourceSpan) -> Self {
        ParsedAttr {
            kind: ParsedAttrKind::from_name(scope, name),
            name: NameId::from(name),
            range,
            syntax,
            args: ThinVec::new(),
        }
    }

    /// Build the four-slot loop hint attribute the pragma handlers produce:
    /// pragma name, option name, value identifier, value expression.
    pub fn loop_hint(
        range: SourceSpan,
        pragma_name: IdentLoc,
        option: Option<IdentLoc>,
        value: Option<IdentLoc>,
        value_expr: Option<NodeRef>,
    ) -> Self {
        let mut args = ThinVec::with_capacity(4);
        args.push(AttrArg::Ident(pragma_name));
        args.push(option.map_or(AttrArg::Absent, AttrArg::Ident));
        args.push(value.map_or(AttrArg::Absent, AttrArg::Ident));
        args.push(value_expr.map_or(AttrArg::Absent, AttrArg::Expr));

        ParsedAttr {
            kind: ParsedAttrKind::LoopHint,
            name: NameId::from("loop"),
            range,
            syntax: AttrSyntax::Pragma,
            args,
        }
    }

    /// Whether the attribute was spelled through `__declspec`
    pub fn is_declspec(&self) -> bool {
        self.syntax == AttrSyntax::Declspec
    }

    pub fn arg_as_ident(&self, index: usize) -> Option<IdentLoc> {
        match self.args.get(index) {
            Some(AttrArg::Ident(ident)) => Some(*ident),
            _ => None,
        }
    }

    pub fn arg_as_expr(&self, index: usize) -> Option<NodeRef> {
        match self.args.get(index) {
            Some(AttrArg::Expr(expr)) => Some(*expr),
            _ => None,
        }
    }
}

/// Marker asserting intentional fallthrough into the next switch label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FallThroughAttr {
    #[serde(skip_serializing)]
    pub range: SourceSpan,
}

/// A validated statement annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Attr {
    FallThrough(FallThroughAttr),
    LoopHint(LoopHintAttr),
}

impl Attr {
    pub fn as_loop_hint(&self) -> Option<&LoopHintAttr> {
        match self {
            Attr::LoopHint(hint) => Some(hint),
            Attr::FallThrough(_) => None,
        }
    }
}

/// A statement wrapped with the annotations of its attribute list.
/// Never empty: [`AttributedStmt::new`] refuses an empty annotation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributedStmt {
    attrs: ThinVec<Attr>,
    sub_stmt: NodeRef,
}

impl AttributedStmt {
    pub fn new(attrs: ThinVec<Attr>, sub_stmt: NodeRef) -> Option<Self> {
        if attrs.is_empty() {
            return None;
        }
        Some(AttributedStmt { attrs, sub_stmt })
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    pub fn sub_stmt(&self) -> NodeRef {
        self.sub_stmt
    }
}
