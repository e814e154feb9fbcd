//! Semantic analysis of statement attributes.
//!
//! This module validates attributes attached to statements and lowers them to
//! annotations:
//! - `[[fallthrough]]` on an empty statement directly preceding a switch label
//! - loop hints (`#pragma clang loop`, `#pragma unroll`, `#pragma nounroll`)
//!   normalized to one option/value model and checked for compatibility

pub mod const_eval;
pub mod loop_hint;
pub mod scope;
pub mod stmt_attr;

#[cfg(test)]
mod tests_hint_compat;
#[cfg(test)]
mod tests_loop_hint;

// Re-export key types for public API
pub use const_eval::{ConstEvalCtx, eval_const_expr};
pub use loop_hint::{HintCategory, HintFamily, HintOption, LoopHintAttr, LoopHintSpelling};
pub use scope::{FunctionScope, SwitchContext};
pub use stmt_attr::{StmtAttrProcessor, check_for_incompatible_attributes};
