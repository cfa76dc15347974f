//! # Expression Tokens
//!
//! This module defines the lexemes delivered to the expression parser:
//!
//! - [`LexemeCode`]: the scanner-level category of a lexeme,
//! - [`LexemeValue`]: the payload carried by a lexeme (a character, a
//!   character-class index, or an action-name index),
//! - [`ExprToken`]: a lexeme paired with its source line.
//!
//! Several lexeme codes collapse to the same grammar terminal; the mapping is
//! [`LexemeCode::token_id`].
use crate::parser::parser_data::TokenID;

/// Scanner-level category of an expression lexeme.
///
/// The order of variants is the order of the mapping table used by
/// [`LexemeCode::token_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LexemeCode {
    /// End of text.
    Nothing = 0,
    /// A lexeme the scanner could not classify.
    UnknownLexeme = 1,
    /// `$name`
    Action = 2,
    /// `(`
    OpenRoundBracket = 3,
    /// `)`
    ClosedRoundBracket = 4,
    /// `|`
    Or = 5,
    /// `*`
    KleeneClosure = 6,
    /// `+`
    PositiveClosure = 7,
    /// `?`
    OptionalMember = 8,
    /// A literal character.
    Character = 9,
    /// `{`
    BeginExpression = 10,
    /// `}`
    EndExpression = 11,
    /// `[^...]`
    ClassComplement = 12,
    /// `[...]`
    CharacterClass = 13,
}

impl LexemeCode {
    const TERMINALS: [TokenID; 14] = [
        TokenID::End,    // Nothing
        TokenID::End,    // UnknownLexeme
        TokenID::Action, // Action
        TokenID::LParen, // OpenRoundBracket
        TokenID::RParen, // ClosedRoundBracket
        TokenID::Or,     // Or
        TokenID::Closure,
        TokenID::Closure,
        TokenID::Closure,
        TokenID::Atom, // Character
        TokenID::LBrace,
        TokenID::RBrace,
        TokenID::Atom, // ClassComplement
        TokenID::Atom, // CharacterClass
    ];

    /// Returns the grammar terminal this lexeme is read as.
    #[inline]
    pub fn token_id(self) -> TokenID {
        Self::TERMINALS[self as usize]
    }
}

/// The payload carried by an [`ExprToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeValue {
    /// No associated data (operators, brackets, end of text).
    None,

    /// A literal character.
    Char(char),

    /// Index into the character-class table (for both classes and their
    /// complements).
    CharClass(usize),

    /// Index of the action name in the identifier registry.
    Action(usize),
}

/// A lexeme of the expression sub-language together with its source line.
///
/// The code and the payload always agree: characters, classes and actions
/// are built with [`ExprToken::char`], [`ExprToken::class`],
/// [`ExprToken::class_complement`] and [`ExprToken::action`], every other
/// lexeme with [`ExprToken::operator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprToken {
    pub(crate) code: LexemeCode,
    pub(crate) value: LexemeValue,
    pub(crate) line_no: usize,
}

impl ExprToken {
    pub(crate) fn new(code: LexemeCode, value: LexemeValue, line_no: usize) -> Self {
        Self {
            code,
            value,
            line_no,
        }
    }

    pub(crate) fn bare(code: LexemeCode, line_no: usize) -> Self {
        Self::new(code, LexemeValue::None, line_no)
    }

    /// A token without payload, or `None` if `code` needs one.
    ///
    /// ```rust
    /// # use lexgen_expr::{ExprToken, LexemeCode};
    /// assert!(ExprToken::operator(LexemeCode::Or, 1).is_some());
    /// assert!(ExprToken::operator(LexemeCode::Character, 1).is_none());
    /// ```
    pub fn operator(code: LexemeCode, line_no: usize) -> Option<Self> {
        match code {
            LexemeCode::Action
            | LexemeCode::Character
            | LexemeCode::CharacterClass
            | LexemeCode::ClassComplement => None,
            code => Some(Self::bare(code, line_no)),
        }
    }

    /// The lexeme category.
    pub fn code(&self) -> LexemeCode {
        self.code
    }

    /// Associated payload, if the category has one.
    pub fn value(&self) -> LexemeValue {
        self.value
    }

    /// 1-based line number in the source text.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    pub fn end(line_no: usize) -> Self {
        Self::bare(LexemeCode::Nothing, line_no)
    }

    pub fn char(c: char, line_no: usize) -> Self {
        Self::new(LexemeCode::Character, LexemeValue::Char(c), line_no)
    }

    pub fn class(index: usize, line_no: usize) -> Self {
        Self::new(LexemeCode::CharacterClass, LexemeValue::CharClass(index), line_no)
    }

    pub fn class_complement(index: usize, line_no: usize) -> Self {
        Self::new(LexemeCode::ClassComplement, LexemeValue::CharClass(index), line_no)
    }

    pub fn action(index: usize, line_no: usize) -> Self {
        Self::new(LexemeCode::Action, LexemeValue::Action(index), line_no)
    }

    /// Returns the grammar terminal of this token.
    #[inline]
    pub fn token_id(&self) -> TokenID {
        self.code.token_id()
    }

    pub fn is_end(&self) -> bool {
        self.token_id() == TokenID::End
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexeme_codes_map_to_terminals() {
        assert_eq!(LexemeCode::Nothing.token_id(), TokenID::End);
        assert_eq!(LexemeCode::UnknownLexeme.token_id(), TokenID::End);
        assert_eq!(LexemeCode::Action.token_id(), TokenID::Action);
        assert_eq!(LexemeCode::OpenRoundBracket.token_id(), TokenID::LParen);
        assert_eq!(LexemeCode::ClosedRoundBracket.token_id(), TokenID::RParen);
        assert_eq!(LexemeCode::Or.token_id(), TokenID::Or);
        assert_eq!(LexemeCode::BeginExpression.token_id(), TokenID::LBrace);
        assert_eq!(LexemeCode::EndExpression.token_id(), TokenID::RBrace);
    }

    #[test]
    fn closures_share_one_terminal() {
        for code in [
            LexemeCode::KleeneClosure,
            LexemeCode::PositiveClosure,
            LexemeCode::OptionalMember,
        ] {
            assert_eq!(code.token_id(), TokenID::Closure);
        }
    }

    #[test]
    fn atoms_share_one_terminal() {
        assert_eq!(ExprToken::char('x', 1).token_id(), TokenID::Atom);
        assert_eq!(ExprToken::class(0, 1).token_id(), TokenID::Atom);
        assert_eq!(ExprToken::class_complement(3, 1).token_id(), TokenID::Atom);
    }

    #[test]
    fn constructors_fill_payload() {
        let t = ExprToken::action(7, 4);
        assert_eq!(t.code, LexemeCode::Action);
        assert_eq!(t.value, LexemeValue::Action(7));
        assert_eq!(t.line_no, 4);

        let LexemeValue::Char(c) = ExprToken::char('q', 2).value else {
            panic!("Expected a character token");
        };
        assert_eq!(c, 'q');
    }

    #[test]
    fn operator_rejects_payload_codes() {
        for code in [
            LexemeCode::Action,
            LexemeCode::Character,
            LexemeCode::CharacterClass,
            LexemeCode::ClassComplement,
        ] {
            assert_eq!(ExprToken::operator(code, 1), None);
        }
        let star = ExprToken::operator(LexemeCode::KleeneClosure, 3).unwrap();
        assert_eq!(star.code(), LexemeCode::KleeneClosure);
        assert_eq!(star.value(), LexemeValue::None);
        assert_eq!(star.line_no(), 3);
    }

    #[test]
    fn end_tokens_are_recognised() {
        assert!(ExprToken::end(9).is_end());
        assert!(ExprToken::bare(LexemeCode::UnknownLexeme, 1).is_end());
        assert!(!ExprToken::bare(LexemeCode::EndExpression, 1).is_end());
    }
}
