//! Loop hint annotations.
//!
//! There are three categories of loop hints: vectorize, interleave and unroll.
//! Each comes in an enable/disable form and a numeric form, which gives the six
//! [`HintOption`] values. For unroll, a nonzero enable-form value means full
//! unrolling rather than enabling the transformation.

use serde::Serialize;

use crate::ast::SourceSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HintOption {
    Vectorize,
    VectorizeWidth,
    Interleave,
    InterleaveCount,
    Unroll,
    UnrollCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HintCategory {
    Vectorize,
    Interleave,
    Unroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HintFamily {
    /// `vectorize(enable)`, `unroll(full)`, ...
    Enable,
    /// `vectorize_width(8)`, `unroll_count(4)`, ...
    Numeric,
}

/// Category and family of every option, indexed by `HintOption as usize`
const OPTION_TABLE: [(HintCategory, HintFamily); 6] = [
    (HintCategory::Vectorize, HintFamily::Enable),
    (HintCategory::Vectorize, HintFamily::Numeric),
    (HintCategory::Interleave, HintFamily::Enable),
    (HintCategory::Interleave, HintFamily::Numeric),
    (HintCategory::Unroll, HintFamily::Enable),
    (HintCategory::Unroll, HintFamily::Numeric),
];

impl HintOption {
    pub const ALL: [HintOption; 6] = [
        HintOption::Vectorize,
        HintOption::VectorizeWidth,
        HintOption::Interleave,
        HintOption::InterleaveCount,
        HintOption::Unroll,
        HintOption::UnrollCount,
    ];

    pub fn category(self) -> HintCategory {
        OPTION_TABLE[self as usize].0
    }

    pub fn family(self) -> HintFamily {
        OPTION_TABLE[self as usize].1
    }

    pub fn is_numeric(self) -> bool {
        self.family() == HintFamily::Numeric
    }

    /// Option for a `#pragma clang loop` option name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "vectorize" => Some(HintOption::Vectorize),
            "vectorize_width" => Some(HintOption::VectorizeWidth),
            "interleave" => Some(HintOption::Interleave),
            "interleave_count" => Some(HintOption::InterleaveCount),
            "unroll" => Some(HintOption::Unroll),
            "unroll_count" => Some(HintOption::UnrollCount),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HintOption::Vectorize => "vectorize",
            HintOption::VectorizeWidth => "vectorize_width",
            HintOption::Interleave => "interleave",
            HintOption::InterleaveCount => "interleave_count",
            HintOption::Unroll => "unroll",
            HintOption::UnrollCount => "unroll_count",
        }
    }

    /// Keyword meaning "on" for the enable form: `full` for unroll, `enable` otherwise
    pub fn true_keyword(self) -> &'static str {
        match self.category() {
            HintCategory::Unroll => "full",
            HintCategory::Vectorize | HintCategory::Interleave => "enable",
        }
    }
}

/// Surface syntax a loop hint was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LoopHintSpelling {
    /// `#pragma clang loop option(value)`
    ClangLoop,
    /// `#pragma unroll` / `#pragma unroll N`
    Unroll,
    /// `#pragma nounroll`
    NoUnroll,
}

impl LoopHintSpelling {
    /// Pragma text used when the pragma is misplaced
    pub fn pragma_text(pragma_name: &str) -> &'static str {
        match pragma_name {
            "unroll" => "#pragma unroll",
            "nounroll" => "#pragma nounroll",
            _ => "#pragma clang loop",
        }
    }
}

/// A normalized loop hint. Value is 0/1 for the enable family and at least 1 for numeric options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoopHintAttr {
    pub option: HintOption,
    pub spelling: LoopHintSpelling,
    pub value: i64,
    #[serde(skip_serializing)]
    pub range: SourceSpan,
}

impl LoopHintAttr {
    pub fn new(option: HintOption, spelling: LoopHintSpelling, value: i64, range: SourceSpan) -> Self {
        LoopHintAttr {
            option,
            spelling,
            value,
            range,
        }
    }

    pub fn category(&self) -> HintCategory {
        self.option.category()
    }

    pub fn family(&self) -> HintFamily {
        self.option.family()
    }

    /// `(8)`, `(full)`, `(enable)` or `(disable)`
    pub fn value_string(&self) -> String {
        if self.option.is_numeric() {
            format!("({})", self.value)
        } else if self.value == 0 {
            "(disable)".to_string()
        } else {
            format!("({})", self.option.true_keyword())
        }
    }

    /// Name used when the hint appears in a diagnostic
    pub fn diagnostic_name(&self) -> String {
        match self.spelling {
            LoopHintSpelling::Unroll if self.option == HintOption::Unroll => "#pragma unroll".to_string(),
            LoopHintSpelling::Unroll => format!("#pragma unroll{}", self.value_string()),
            LoopHintSpelling::NoUnroll => "#pragma nounroll".to_string(),
            LoopHintSpelling::ClangLoop => format!("{}{}", self.option.name(), self.value_string()),
        }
    }

    /// The pragma that reproduces this hint
    pub fn print_pretty_pragma(&self) -> String {
        match self.spelling {
            LoopHintSpelling::NoUnroll => "#pragma nounroll".to_string(),
            LoopHintSpelling::Unroll if self.option == HintOption::Unroll => "#pragma unroll".to_string(),
            LoopHintSpelling::Unroll => format!("#pragma unroll{}", self.value_string()),
            LoopHintSpelling::ClangLoop => {
                format!("#pragma clang loop {}{}", self.option.name(), self.value_string())
            }
        }
    }
}
