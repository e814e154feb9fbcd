//! Statement attribute validation and loop hint lowering for a C front end.
pub mod ast;
/// Contains the diagnostic engine and the statement attribute diagnostics.
pub mod diagnostic;
/// Contains the language options.
pub mod lang_options;
/// Contains the semantic analysis of statement attributes.
pub mod semantic;
pub mod source_manager;

pub mod test_utils;
