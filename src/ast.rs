//! Abstract Syntax Tree (AST) for statement attribute processing.
//!
//! The AST is a flattened storage system: nodes live in contiguous vectors and
//! refer to their children through index-based [`NodeRef`]s. Only the statement
//! kinds that attribute processing needs to tell apart, and the integer
//! expression subset that loop hint values are written in, are modelled.
//!
//! - [`nodes`]: node definitions and statement classification
//! - [`attr`]: raw attributes coming from the parser and the semantic annotations produced from them
//! - [`dumper`]: textual dump of statements and their annotations

use std::num::NonZeroU32;

/// Represents an interned string using symbol_table crate.
/// Alias for GlobalSymbol from symbol_table crate with global feature.
pub type NameId = symbol_table::GlobalSymbol;

pub use crate::source_manager::{SourceId, SourceLoc, SourceSpan};

pub mod attr;
pub mod dumper;
pub mod nodes;

pub use attr::*;
pub use nodes::*;

/// The flattened AST storage.
#[derive(Clone, Default)]
pub struct Ast {
    pub kinds: Vec<NodeKind>,
    pub spans: Vec<SourceSpan>,
}

impl Ast {
    /// Create a new empty AST
    pub fn new() -> Self {
        Ast::default()
    }

    /// Add a node to the AST and return its reference
    pub fn push_node(&mut self, kind: NodeKind, span: SourceSpan) -> NodeRef {
        let index = self.kinds.len() as u32 + 1; // Start from 1 for NonZeroU32
        self.kinds.push(kind);
        self.spans.push(span);
        NodeRef::new(index).expect("NodeRef overflow")
    }

    /// Get node kind by reference
    pub fn get_kind(&self, node_ref: NodeRef) -> &NodeKind {
        &self.kinds[node_ref.index()]
    }

    /// Get node span by reference
    pub fn get_span(&self, node_ref: NodeRef) -> SourceSpan {
        self.spans[node_ref.index()]
    }

    /// Syntactic class of a statement node
    pub fn stmt_class(&self, node_ref: NodeRef) -> StmtClass {
        self.get_kind(node_ref).stmt_class()
    }

    /// Number of nodes stored
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Node reference type for referencing child nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct NodeRef(NonZeroU32);

impl NodeRef {
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn index(self) -> usize {
        (self.get() - 1) as usize
    }
}

/// Serialize an interned name as its text
pub(crate) fn serialize_name<S: serde::Serializer>(name: &NameId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(name.as_str())
}
