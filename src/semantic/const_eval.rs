//! Constant expression evaluation
//!
//! Evaluates the integer constant expressions loop hint values are written in
//! (`vectorize_width(4 * 2)`, `#pragma unroll N` with `N` an enumerator).

use hashbrown::HashMap;

use crate::ast::{Ast, BinaryOp, NameId, NodeKind, NodeRef, UnaryOp};

/// Context for constant expression evaluation
pub struct ConstEvalCtx<'a> {
    pub ast: &'a Ast,
    /// Enumerator values visible at the point of evaluation
    pub constants: Option<&'a HashMap<NameId, i64>>,
}

impl<'a> ConstEvalCtx<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        ConstEvalCtx { ast, constants: None }
    }

    pub fn with_constants(mut self, constants: &'a HashMap<NameId, i64>) -> Self {
        self.constants = Some(constants);
        self
    }
}

/// Evaluate a constant expression node to an i64 value.
/// `None` means the expression is not an integer constant expression.
pub fn eval_const_expr(ctx: &ConstEvalCtx, expr_node_ref: NodeRef) -> Option<i64> {
    match ctx.ast.get_kind(expr_node_ref) {
        NodeKind::LiteralInt(val) => Some(*val),
        NodeKind::LiteralChar(val) => Some(*val as i64),
        NodeKind::Ident(name) => ctx.constants?.get(name).copied(),
        NodeKind::BinaryOp(op, left_ref, right_ref) => {
            let left_val = eval_const_expr(ctx, *left_ref)?;

            // Short-circuiting logic
            match op {
                BinaryOp::LogicAnd => {
                    if left_val == 0 {
                        return Some(0);
                    }
                    let right_val = eval_const_expr(ctx, *right_ref)?;
                    return Some((right_val != 0) as i64);
                }
                BinaryOp::LogicOr => {
                    if left_val != 0 {
                        return Some(1);
                    }
                    let right_val = eval_const_expr(ctx, *right_ref)?;
                    return Some((right_val != 0) as i64);
                }
                _ => {}
            }

            let right_val = eval_const_expr(ctx, *right_ref)?;
            match op {
                BinaryOp::Add => Some(left_val.wrapping_add(right_val)),
                BinaryOp::Sub => Some(left_val.wrapping_sub(right_val)),
                BinaryOp::Mul => Some(left_val.wrapping_mul(right_val)),
                BinaryOp::Div => (right_val != 0).then(|| left_val.wrapping_div(right_val)),
                BinaryOp::Mod => (right_val != 0).then(|| left_val.wrapping_rem(right_val)),
                BinaryOp::Equal => Some((left_val == right_val) as i64),
                BinaryOp::NotEqual => Some((left_val != right_val) as i64),
                BinaryOp::Less => Some((left_val < right_val) as i64),
                BinaryOp::LessEqual => Some((left_val <= right_val) as i64),
                BinaryOp::Greater => Some((left_val > right_val) as i64),
                BinaryOp::GreaterEqual => Some((left_val >= right_val) as i64),
                BinaryOp::BitOr => Some(left_val | right_val),
                BinaryOp::BitAnd => Some(left_val & right_val),
                BinaryOp::BitXor => Some(left_val ^ right_val),
                BinaryOp::LShift => Some(left_val.wrapping_shl(right_val as u32)),
                BinaryOp::RShift => Some(left_val.wrapping_shr(right_val as u32)),
                BinaryOp::LogicAnd | BinaryOp::LogicOr => None, // handled above
            }
        }
        NodeKind::UnaryOp(op, operand_ref) => {
            let operand_val = eval_const_expr(ctx, *operand_ref)?;
            match op {
                UnaryOp::LogicNot => Some((operand_val == 0) as i64),
                UnaryOp::Plus => Some(operand_val),
                UnaryOp::Minus => Some(operand_val.wrapping_neg()),
                UnaryOp::BitNot => Some(!operand_val),
            }
        }
        NodeKind::TernaryOp(cond, then_ref, else_ref) => {
            if eval_const_expr(ctx, *cond)? != 0 {
                eval_const_expr(ctx, *then_ref)
            } else {
                eval_const_expr(ctx, *else_ref)
            }
        }
        _ => None,
    }
}
