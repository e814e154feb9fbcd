/// Language options affecting attribute processing
#[derive(Copy, Clone, Debug, Default)]
pub struct LangOptions {
    /// Reject `#pragma clang loop` options that are not one of the six known names
    /// instead of treating them as `vectorize`.
    pub strict_loop_hint_options: bool,
}

impl LangOptions {
    pub fn pedantic() -> Self {
        LangOptions {
            strict_loop_hint_options: true,
        }
    }
}
