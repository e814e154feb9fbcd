//! AST Node definitions and statement classification.
//!
//! Statements keep the C11 shapes of the parser (plus the range-based `for` that
//! loop hints may also precede); expressions are limited to what an integer
//! constant expression can contain, with calls kept so non-constant values can
//! be represented.

use serde::Serialize;

use crate::ast::{AttributedStmt, NameId, NodeRef};

#[derive(Debug, Clone, Serialize)]
pub enum NodeKind {
    // --- Literals ---
    LiteralInt(i64),
    LiteralChar(u8),

    // --- Expressions ---
    Ident(#[serde(serialize_with = "crate::ast::serialize_name")] NameId),
    UnaryOp(UnaryOp, NodeRef),
    BinaryOp(BinaryOp, NodeRef, NodeRef),
    TernaryOp(NodeRef, NodeRef, NodeRef),
    FunctionCall(NodeRef /* func */, Vec<NodeRef> /* args */),

    // --- Statements ---
    CompoundStatement(Vec<NodeRef> /* block items */),
    If(IfStmt),
    While(WhileStmt),
    DoWhile(NodeRef /* body */, NodeRef /* condition */),
    For(ForStmt),
    ForRange(ForRangeStmt),

    Return(Option<NodeRef>),
    Break,
    Continue,
    Goto(#[serde(serialize_with = "crate::ast::serialize_name")] NameId),
    Label(
        #[serde(serialize_with = "crate::ast::serialize_name")] NameId,
        NodeRef, /* statement */
    ),

    Switch(NodeRef /* condition */, NodeRef /* body statement */),
    Case(NodeRef /* const_expr */, NodeRef /* statement */),
    CaseRange(
        NodeRef, /* start_expr */
        NodeRef, /* end_expr */
        NodeRef, /* statement */
    ),
    Default(NodeRef /* statement */),

    ExpressionStatement(Option<NodeRef> /* expression */), // Expression followed by ';'
    EmptyStatement,                                        // ';'

    /// A statement together with the annotations its attribute list produced
    AttributedStatement(AttributedStmt),
}

#[derive(Debug, Clone, Serialize)]
pub struct IfStmt {
    pub condition: NodeRef,
    pub then_branch: NodeRef,
    pub else_branch: Option<NodeRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WhileStmt {
    pub condition: NodeRef,
    pub body: NodeRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForStmt {
    pub init: Option<NodeRef>,
    pub condition: Option<NodeRef>,
    pub increment: Option<NodeRef>,
    pub body: NodeRef,
}

/// `for (decl : range) body`
#[derive(Debug, Clone, Serialize)]
pub struct ForRangeStmt {
    pub loop_var: NodeRef,
    pub range: NodeRef,
    pub body: NodeRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Plus,
    Minus,
    BitNot,
    LogicNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    LShift,
    RShift,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    LogicAnd,
    LogicOr,
}

/// Loop statement kinds a loop hint may precede
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoopKind {
    Do,
    For,
    ForRange,
    While,
}

/// Syntactic class of a statement, as far as attribute processing cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtClass {
    /// The empty statement `;`
    Null,
    /// `case`, `case a ... b` and `default` labels
    SwitchCase,
    Loop(LoopKind),
    Other,
}

impl StmtClass {
    pub fn is_loop(self) -> bool {
        matches!(self, StmtClass::Loop(_))
    }
}

impl NodeKind {
    pub fn stmt_class(&self) -> StmtClass {
        match self {
            NodeKind::EmptyStatement => StmtClass::Null,
            NodeKind::Case(..) | NodeKind::CaseRange(..) | NodeKind::Default(_) => StmtClass::SwitchCase,
            NodeKind::DoWhile(..) => StmtClass::Loop(LoopKind::Do),
            NodeKind::For(_) => StmtClass::Loop(LoopKind::For),
            NodeKind::ForRange(_) => StmtClass::Loop(LoopKind::ForRange),
            NodeKind::While(_) => StmtClass::Loop(LoopKind::While),
            _ => StmtClass::Other,
        }
    }
}
