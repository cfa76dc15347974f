//! # symtab
//!
//! The identifier registry shared between the expression scanner, the
//! declaration pass of the generator and the expression parser.
//!
//! Each unique identifier receives a stable, non-zero index in insertion
//! order. Index `0` is reserved and means "no identifier", which is what an
//! instruction's `action_name` holds when no action is attached. An
//! identifier may additionally be classified with an [`IdKind`] once it has
//! been declared.
//!
//! ## Example
//! ```rust
//! # use lexgen_expr::{IdKind, SymTab};
//! let mut st = SymTab::new();
//! let i = st.intern("emit_number");
//! assert_eq!(i, 1);
//! assert_eq!(st.kind(i), None);
//! st.declare("emit_number", IdKind::ActionName);
//! assert_eq!(st.kind(i), Some(IdKind::ActionName));
//! assert_eq!(st.name(i).unwrap(), "emit_number");
//! ```

use indexmap::IndexMap;
use smartstring::alias::String;
use thiserror::Error;

/// Errors that can occur when operating on a [`SymTab`].
#[derive(Debug, Error)]
pub enum SymTabError {
    /// Attempted to access an invalid index (out of bounds or reserved).
    #[error("invalid symbol index {index} (table length {len})")]
    InvalidIndex {
        /// The index that was requested.
        index: usize,
        /// The number of slots in the table, including the reserved one.
        len: usize,
    },
}

/// Classification of a declared identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    /// The identifier names a user callback that may follow a
    /// sub-expression as `$name`.
    ActionName,
    /// The identifier names a regular sub-expression.
    RegexpName,
    /// The identifier is a keyword of the lexer description language.
    Keyword,
}

/// Identifier registry mapping text to stable indices and optional kinds.
#[derive(Debug)]
pub struct SymTab {
    tab: IndexMap<String, Option<IdKind>>,
}

impl Default for SymTab {
    fn default() -> Self {
        Self::new()
    }
}

impl SymTab {
    /// Creates a registry holding only the reserved slot `0`.
    pub fn new() -> Self {
        let mut tab = IndexMap::new();
        tab.insert(String::new(), None);
        Self { tab }
    }

    /// Returns the number of identifiers interned so far.
    ///
    /// # Example
    /// ```rust
    /// # use lexgen_expr::SymTab;
    /// let mut symtab = SymTab::new();
    /// assert_eq!(symtab.len(), 0);
    /// symtab.intern("foo");
    /// symtab.intern("bar");
    /// symtab.intern("foo");
    /// assert_eq!(symtab.len(), 2);
    /// ```
    pub fn len(&self) -> usize {
        self.tab.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts the given name if it doesn't exist and returns its index.
    ///
    /// An existing identifier keeps both its index and its kind.
    pub fn intern(&mut self, name: impl AsRef<str>) -> usize {
        let name = name.as_ref();
        if let Some(index) = self.tab.get_index_of(name) {
            return index;
        }
        let (index, _) = self.tab.insert_full(String::from(name), None);
        index
    }

    /// Interns `name` and classifies it as `kind`, returning its index.
    pub fn declare(&mut self, name: impl AsRef<str>, kind: IdKind) -> usize {
        let index = self.intern(name);
        self.tab[index] = Some(kind);
        index
    }

    /// Classifies an already interned identifier.
    ///
    /// Returns [`Err`] if `index` is reserved or out of bounds.
    pub fn set_kind(&mut self, index: usize, kind: IdKind) -> Result<(), SymTabError> {
        let len = self.tab.len();
        if index == 0 {
            return Err(SymTabError::InvalidIndex { index, len });
        }
        let (_, slot) = self
            .tab
            .get_index_mut(index)
            .ok_or(SymTabError::InvalidIndex { index, len })?;
        *slot = Some(kind);
        Ok(())
    }

    /// Returns the kind of the identifier at `index`.
    ///
    /// `None` means the identifier is unknown or has not been declared.
    pub fn kind(&self, index: usize) -> Option<IdKind> {
        self.tab.get_index(index).and_then(|(_, kind)| *kind)
    }

    /// Returns the text of the identifier at `index`.
    pub fn name(&self, index: usize) -> Result<&str, SymTabError> {
        match self.tab.get_index(index) {
            Some((name, _)) if index != 0 => Ok(name.as_str()),
            _ => Err(SymTabError::InvalidIndex {
                index,
                len: self.tab.len(),
            }),
        }
    }

    /// Returns the index of `name`, if it has been interned.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.tab.get_index_of(name).filter(|&i| i != 0)
    }
}
