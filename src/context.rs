//! Shared state threaded through the scanner and the parser.
use crate::{CharClassTable, Diagnostics, IdKind, SymTab};

/// Context shared by every expression of one lexer description.
///
/// The scanner interns identifiers and character classes into it; the parser
/// only queries the registry and reports diagnostics.
#[derive(Debug, Default)]
pub struct ExprContext {
    pub symtab: SymTab,
    pub classes: CharClassTable,
    pub diagnostics: Diagnostics,
}

impl ExprContext {
    pub fn new() -> Self {
        Self {
            symtab: SymTab::new(),
            classes: CharClassTable::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Declares `name` as an action and returns its registry index.
    pub fn declare_action(&mut self, name: &str) -> usize {
        self.symtab.declare(name, IdKind::ActionName)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.error_count()
    }
}
