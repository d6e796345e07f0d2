//! Command representation.

/// One unit of interactive source text submitted for evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Raw source text to evaluate.
    pub source_text: String,
    /// Suppress the intermediate `status: working` frame.
    pub silent: bool,
}

impl Command {
    /// Create a new command with the given source text.
    pub fn new(source_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            silent: false,
        }
    }

    /// Set whether intermediate status frames are suppressed.
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }
}
