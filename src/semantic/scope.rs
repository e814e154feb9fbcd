//! Per-function state consulted while processing statement attributes.

use hashbrown::HashMap;

use crate::ast::{NameId, NodeRef};

/// Answers whether a `case`/`default` label may currently appear,
/// i.e. whether analysis is inside the body of some `switch`.
pub trait SwitchContext {
    fn is_case_context_open(&self) -> bool;
}

/// Scope information for the function body being analyzed
#[derive(Debug, Default, Clone)]
pub struct FunctionScope {
    /// Enclosing `switch` statements, innermost last
    switch_stack: Vec<NodeRef>,
    /// Enumerator values visible in the function
    enum_constants: HashMap<NameId, i64>,
}

impl FunctionScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_switch(&mut self, switch_stmt: NodeRef) {
        self.switch_stack.push(switch_stmt);
    }

    pub fn pop_switch(&mut self) -> Option<NodeRef> {
        self.switch_stack.pop()
    }

    pub fn innermost_switch(&self) -> Option<NodeRef> {
        self.switch_stack.last().copied()
    }

    pub fn declare_enum_constant(&mut self, name: impl Into<NameId>, value: i64) {
        self.enum_constants.insert(name.into(), value);
    }

    pub fn enum_constants(&self) -> &HashMap<NameId, i64> {
        &self.enum_constants
    }
}

impl SwitchContext for FunctionScope {
    fn is_case_context_open(&self) -> bool {
        !self.switch_stack.is_empty()
    }
}

impl SwitchContext for bool {
    fn is_case_context_open(&self) -> bool {
        *self
    }
}
