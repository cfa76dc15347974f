//! # Diagnostics
//!
//! Problems in the expression text are never fatal. Each one is recorded as
//! a [`Diagnostic`] in a [`Diagnostics`] sink, which doubles as the error
//! counter shared by every parse that uses the same context.
//!
//! `Diagnostic` derives [`thiserror::Error`]; its `Display` is the complete
//! diagnostic line:
//!
//! ```rust
//! # use lexgen_expr::Diagnostic;
//! let d = Diagnostic::UnexpectedEndOfText { line: 3 };
//! assert_eq!(d.to_string(), "Error at line 3: an unexpected end of text.");
//! ```
use thiserror::Error;

/// A single diagnostic produced while scanning or parsing an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("Error at line {line}: the action {name} is not defined.")]
    UndefinedAction { line: usize, name: String },

    #[error("Error at line {line}: the identifier {name} is not an action.")]
    NotAnAction { line: usize, name: String },

    #[error("Error at line {line}: an opening curly brace is expected.")]
    OpeningCurlyBraceExpected { line: usize },

    #[error(
        "Error at line {line}: a character, a character class, or an opening parenthesis are expected."
    )]
    CharOrCharClassExpected { line: usize },

    #[error("Error at line {line}: an operator | or closing brace are expected.")]
    OrOperatorOrBraceExpected { line: usize },

    #[error("Error at line {line}: an unexpected action.")]
    UnexpectedAction { line: usize },

    #[error("Error at line {line}: an unexpected postfix operator.")]
    UnexpectedPostfixOperator { line: usize },

    #[error("Error at line {line}: an unexpected end of text.")]
    UnexpectedEndOfText { line: usize },

    #[error("Error at line {line}: an unexpected opening brace.")]
    UnexpectedOpeningBrace { line: usize },

    #[error("Error at line {line}: an operator | or closing parenthesis are expected.")]
    OrOperatorOrRoundBracketExpected { line: usize },

    #[error("Error at line {line}: an identifier is expected after $.")]
    ActionNameExpected { line: usize },

    #[error("Error at line {line}: a character is expected after \\.")]
    DanglingEscape { line: usize },

    #[error("Error at line {line}: the character class is not closed.")]
    UnterminatedCharClass { line: usize },
}

impl Diagnostic {
    /// Source line the diagnostic refers to.
    pub fn line(&self) -> usize {
        match self {
            Diagnostic::UndefinedAction { line, .. }
            | Diagnostic::NotAnAction { line, .. }
            | Diagnostic::OpeningCurlyBraceExpected { line }
            | Diagnostic::CharOrCharClassExpected { line }
            | Diagnostic::OrOperatorOrBraceExpected { line }
            | Diagnostic::UnexpectedAction { line }
            | Diagnostic::UnexpectedPostfixOperator { line }
            | Diagnostic::UnexpectedEndOfText { line }
            | Diagnostic::UnexpectedOpeningBrace { line }
            | Diagnostic::OrOperatorOrRoundBracketExpected { line }
            | Diagnostic::ActionNameExpected { line }
            | Diagnostic::DanglingEscape { line }
            | Diagnostic::UnterminatedCharClass { line } => *line,
        }
    }
}

/// Diagnostic sink and error counter.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    reported: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            reported: Vec::new(),
        }
    }

    /// Records a diagnostic and increments the error count.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        log::debug!("{}", diagnostic);
        self.reported.push(diagnostic);
    }

    /// Number of errors reported so far. Never decreases.
    pub fn error_count(&self) -> usize {
        self.reported.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.reported.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.reported.iter()
    }
}
