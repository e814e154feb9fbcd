use crate::source_manager::{SourceLoc, SourceManager, SourceSpan};
use symbol_table::GlobalSymbol as Symbol;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

/// Every diagnostic statement attribute processing can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagKind {
    UnknownAttributeIgnored,
    MsAttributeIgnored,
    AttributeInvalidOnStmt,
    FallthroughWrongTarget,
    FallthroughOutsideSwitch,
    PragmaLoopPrecedesNonloop,
    PragmaLoopInvalidKeyword,
    PragmaLoopInvalidValue,
    PragmaLoopInvalidOption,
    PragmaLoopDuplicate,
    PragmaLoopIncompatible,
}

/// Suggested source edit: insert `text` at `location`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixItHint {
    pub location: SourceLoc,
    pub insertion: String,
}

impl FixItHint {
    pub fn insertion(location: SourceLoc, text: &str) -> Self {
        FixItHint {
            location,
            insertion: text.to_string(),
        }
    }
}

/// Individual diagnostic with rich context
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub kind: DiagKind,
    pub message: String,
    pub location: SourceSpan,
    pub hints: Vec<String>,       // Suggestions for fixing
    pub fix_its: Vec<FixItHint>,  // Machine-applicable edits
    pub related: Vec<SourceSpan>, // Related locations
}

impl Diagnostic {
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn with_fix_it(mut self, fix_it: FixItHint) -> Self {
        self.fix_its.push(fix_it);
        self
    }
}

/// Channel diagnostics are reported through. Nothing is returned to the caller.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Diagnostics produced while validating statement attributes
#[derive(Debug, Clone, thiserror::Error)]
pub enum StmtAttrDiagnostic {
    #[error("unknown attribute '{name}' ignored")]
    UnknownAttributeIgnored { name: Symbol, location: SourceSpan },
    #[error("__declspec attribute '{name}' is not supported")]
    MsAttributeIgnored { name: Symbol, location: SourceSpan },
    #[error("'{name}' attribute cannot be applied to a statement")]
    AttributeInvalidOnStmt {
        name: Symbol,
        location: SourceSpan,
        stmt: SourceSpan,
    },
    #[error("fallthrough annotation does not directly precede switch label")]
    FallthroughWrongTarget { location: SourceSpan, stmt: SourceSpan },
    #[error("fallthrough annotation is outside switch statement")]
    FallthroughOutsideSwitch { location: SourceSpan },
    #[error("expected a for, while, or do-while loop to follow '{pragma}'")]
    PragmaLoopPrecedesNonloop { pragma: &'static str, location: SourceSpan },
    #[error("invalid argument; expected '{true_keyword}' or 'disable'")]
    PragmaLoopInvalidKeyword {
        true_keyword: &'static str,
        location: SourceSpan,
    },
    #[error("invalid argument; expected a positive integer value")]
    PragmaLoopInvalidValue { location: SourceSpan },
    #[error(
        "invalid option '{option}'; expected vectorize, vectorize_width, interleave, interleave_count, unroll, or unroll_count"
    )]
    PragmaLoopInvalidOption { option: String, location: SourceSpan },
    #[error("duplicate directives '{first}' and '{second}'")]
    PragmaLoopDuplicate {
        first: String,
        second: String,
        location: SourceSpan,
    },
    #[error("incompatible directives '{first}' and '{second}'")]
    PragmaLoopIncompatible {
        first: String,
        second: String,
        location: SourceSpan,
    },
}

impl StmtAttrDiagnostic {
    pub fn kind(&self) -> DiagKind {
        match self {
            StmtAttrDiagnostic::UnknownAttributeIgnored { .. } => DiagKind::UnknownAttributeIgnored,
            StmtAttrDiagnostic::MsAttributeIgnored { .. } => DiagKind::MsAttributeIgnored,
            StmtAttrDiagnostic::AttributeInvalidOnStmt { .. } => DiagKind::AttributeInvalidOnStmt,
            StmtAttrDiagnostic::FallthroughWrongTarget { .. } => DiagKind::FallthroughWrongTarget,
            StmtAttrDiagnostic::FallthroughOutsideSwitch { .. } => DiagKind::FallthroughOutsideSwitch,
            StmtAttrDiagnostic::PragmaLoopPrecedesNonloop { .. } => DiagKind::PragmaLoopPrecedesNonloop,
            StmtAttrDiagnostic::PragmaLoopInvalidKeyword { .. } => DiagKind::PragmaLoopInvalidKeyword,
            StmtAttrDiagnostic::PragmaLoopInvalidValue { .. } => DiagKind::PragmaLoopInvalidValue,
            StmtAttrDiagnostic::PragmaLoopInvalidOption { .. } => DiagKind::PragmaLoopInvalidOption,
            StmtAttrDiagnostic::PragmaLoopDuplicate { .. } => DiagKind::PragmaLoopDuplicate,
            StmtAttrDiagnostic::PragmaLoopIncompatible { .. } => DiagKind::PragmaLoopIncompatible,
        }
    }

    pub fn level(&self) -> DiagnosticLevel {
        match self {
            StmtAttrDiagnostic::UnknownAttributeIgnored { .. } | StmtAttrDiagnostic::MsAttributeIgnored { .. } => {
                DiagnosticLevel::Warning
            }
            _ => DiagnosticLevel::Error,
        }
    }

    pub fn location(&self) -> SourceSpan {
        match self {
            StmtAttrDiagnostic::UnknownAttributeIgnored { location, .. } => *location,
            StmtAttrDiagnostic::MsAttributeIgnored { location, .. } => *location,
            StmtAttrDiagnostic::AttributeInvalidOnStmt { location, .. } => *location,
            StmtAttrDiagnostic::FallthroughWrongTarget { location, .. } => *location,
            StmtAttrDiagnostic::FallthroughOutsideSwitch { location } => *location,
            StmtAttrDiagnostic::PragmaLoopPrecedesNonloop { location, .. } => *location,
            StmtAttrDiagnostic::PragmaLoopInvalidKeyword { location, .. } => *location,
            StmtAttrDiagnostic::PragmaLoopInvalidValue { location } => *location,
            StmtAttrDiagnostic::PragmaLoopInvalidOption { location, .. } => *location,
            StmtAttrDiagnostic::PragmaLoopDuplicate { location, .. } => *location,
            StmtAttrDiagnostic::PragmaLoopIncompatible { location, .. } => *location,
        }
    }

    /// Secondary location the diagnostic points at, if any
    fn related(&self) -> Option<SourceSpan> {
        match self {
            StmtAttrDiagnostic::AttributeInvalidOnStmt { stmt, .. }
            | StmtAttrDiagnostic::FallthroughWrongTarget { stmt, .. } => Some(*stmt),
            _ => None,
        }
    }
}

impl From<StmtAttrDiagnostic> for Diagnostic {
    fn from(error: StmtAttrDiagnostic) -> Self {
        Diagnostic {
            level: error.level(),
            kind: error.kind(),
            message: error.to_string(),
            location: error.location(),
            hints: Vec::new(),
            fix_its: Vec::new(),
            related: error.related().into_iter().collect(),
        }
    }
}

/// Diagnostic engine collecting reported errors and warnings
pub struct DiagnosticEngine {
    pub diagnostics: Vec<Diagnostic>,
    pub warnings_as_errors: bool,
    pub disable_all_warnings: bool,
}

impl Default for DiagnosticEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticEngine {
    pub fn new() -> Self {
        DiagnosticEngine {
            diagnostics: Vec::new(),
            warnings_as_errors: false,
            disable_all_warnings: false,
        }
    }

    /// Build from `-W` style flags: `error` promotes warnings, `no-warnings` drops them
    pub fn from_warnings(warnings: &[String]) -> Self {
        let warnings_as_errors = warnings.iter().any(|w| w == "error");
        let disable_all_warnings = warnings.iter().any(|w| w == "no-warnings");
        Self {
            diagnostics: Vec::new(),
            warnings_as_errors,
            disable_all_warnings,
        }
    }

    pub fn report(&mut self, error: StmtAttrDiagnostic) {
        self.emit(error.into());
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == DiagnosticLevel::Error)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of collected diagnostics of the given kind
    pub fn count(&self, kind: DiagKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }
}

impl DiagnosticSink for DiagnosticEngine {
    fn emit(&mut self, mut diagnostic: Diagnostic) {
        if diagnostic.level == DiagnosticLevel::Warning {
            if self.disable_all_warnings {
                return;
            }
            if self.warnings_as_errors {
                diagnostic.level = DiagnosticLevel::Error;
            }
        }
        self.diagnostics.push(diagnostic);
    }
}

/// Configurable diagnostic formatter
pub struct ErrorFormatter {
    pub show_source: bool,
    pub show_hints: bool,
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        ErrorFormatter {
            show_source: true,
            show_hints: true,
        }
    }
}

impl ErrorFormatter {
    /// Format a single diagnostic with its source context
    pub fn format_diagnostic(&self, diag: &Diagnostic, source_manager: &SourceManager) -> String {
        let level_str = match diag.level {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warning => "warning",
        };

        let mut result = format!("{}: {}", level_str, diag.message);

        if let Some((line, col, filename)) = source_manager.get_presumed_location(diag.location.start()) {
            result.push_str(&format!(" at {}:{}:{}", filename, line, col));
        }

        if self.show_hints {
            for hint in &diag.hints {
                result.push_str(&format!("\n  hint: {}", hint));
            }
            for fix_it in &diag.fix_its {
                match source_manager.get_line_column(fix_it.location) {
                    Some((line, col)) => {
                        result.push_str(&format!("\n  fix-it: insert '{}' at {}:{}", fix_it.insertion, line, col))
                    }
                    None => result.push_str(&format!("\n  fix-it: insert '{}'", fix_it.insertion)),
                }
            }
        }

        if self.show_source
            && let Some(source_text) = source_manager.get_source_text(diag.location)
        {
            result.push_str(&format!("\n  |\n  | {}\n  |", source_text.replace('\n', "\n  | ")));
        }

        result
    }

    /// Format multiple diagnostics
    pub fn format_diagnostics(&self, diagnostics: &[Diagnostic], source_manager: &SourceManager) -> String {
        diagnostics
            .iter()
            .map(|diag| self.format_diagnostic(diag, source_manager))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
