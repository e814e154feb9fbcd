//! AST Dumper module
//!
//! Renders statements as an indented tree, with the annotations of an
//! attributed statement listed ahead of the statement they apply to.

use std::fmt::Write;

use crate::ast::{Ast, Attr, NodeKind, NodeRef};

/// Dumper for AST
pub struct AstDumper;

impl AstDumper {
    /// Dump the statement tree rooted at `node` to a string
    pub fn dump_stmt(ast: &Ast, node: NodeRef) -> String {
        let mut out = String::new();
        Self::dump_node(ast, node, 0, &mut out);
        out
    }

    fn dump_node(ast: &Ast, node: NodeRef, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let kind = ast.get_kind(node);
        let _ = writeln!(out, "{}{}", indent, Self::label(kind));

        match kind {
            NodeKind::AttributedStatement(attributed) => {
                for attr in attributed.attrs() {
                    let _ = writeln!(out, "{}  {}", indent, Self::attr_label(attr));
                }
                Self::dump_node(ast, attributed.sub_stmt(), depth + 1, out);
            }
            NodeKind::CompoundStatement(items) => {
                for item in items {
                    Self::dump_node(ast, *item, depth + 1, out);
                }
            }
            NodeKind::If(data) => {
                Self::dump_node(ast, data.then_branch, depth + 1, out);
                if let Some(else_branch) = data.else_branch {
                    Self::dump_node(ast, else_branch, depth + 1, out);
                }
            }
            NodeKind::While(data) => Self::dump_node(ast, data.body, depth + 1, out),
            NodeKind::DoWhile(body, _) => Self::dump_node(ast, *body, depth + 1, out),
            NodeKind::For(data) => Self::dump_node(ast, data.body, depth + 1, out),
            NodeKind::ForRange(data) => Self::dump_node(ast, data.body, depth + 1, out),
            NodeKind::Switch(_, body)
            | NodeKind::Case(_, body)
            | NodeKind::CaseRange(_, _, body)
            | NodeKind::Default(body)
            | NodeKind::Label(_, body) => Self::dump_node(ast, *body, depth + 1, out),
            _ => {}
        }
    }

    fn label(kind: &NodeKind) -> String {
        match kind {
            NodeKind::LiteralInt(val) => format!("LiteralInt({})", val),
            NodeKind::LiteralChar(val) => format!("LiteralChar({})", val),
            NodeKind::Ident(name) => format!("Ident({})", name),
            NodeKind::UnaryOp(op, _) => format!("UnaryOp({:?})", op),
            NodeKind::BinaryOp(op, _, _) => format!("BinaryOp({:?})", op),
            NodeKind::TernaryOp(..) => "TernaryOp".to_string(),
            NodeKind::FunctionCall(..) => "FunctionCall".to_string(),
            NodeKind::CompoundStatement(_) => "CompoundStatement".to_string(),
            NodeKind::If(_) => "If".to_string(),
            NodeKind::While(_) => "While".to_string(),
            NodeKind::DoWhile(..) => "DoWhile".to_string(),
            NodeKind::For(_) => "For".to_string(),
            NodeKind::ForRange(_) => "ForRange".to_string(),
            NodeKind::Return(_) => "Return".to_string(),
            NodeKind::Break => "Break".to_string(),
            NodeKind::Continue => "Continue".to_string(),
            NodeKind::Goto(label) => format!("Goto({})", label),
            NodeKind::Label(label, _) => format!("Label({})", label),
            NodeKind::Switch(..) => "Switch".to_string(),
            NodeKind::Case(..) => "Case".to_string(),
            NodeKind::CaseRange(..) => "CaseRange".to_string(),
            NodeKind::Default(_) => "Default".to_string(),
            NodeKind::ExpressionStatement(_) => "ExpressionStatement".to_string(),
            NodeKind::EmptyStatement => "EmptyStatement".to_string(),
            NodeKind::AttributedStatement(_) => "AttributedStatement".to_string(),
        }
    }

    fn attr_label(attr: &Attr) -> String {
        match attr {
            Attr::FallThrough(_) => "FallThroughAttr".to_string(),
            Attr::LoopHint(hint) => format!("LoopHintAttr {}", hint.print_pretty_pragma()),
        }
    }
}
