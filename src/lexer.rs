//! # Token Sources
//!
//! The parser pulls lexemes through the [`TokenSource`] trait, which adds a
//! one-token push-back to plain iteration. Two sources are provided:
//!
//! - [`TokenVec`]: replays a prepared sequence of [`ExprToken`]s,
//! - [`ExprLexer`]: scans the textual expression sub-language.
//!
//! Both keep yielding an end-of-text token once their input is exhausted.
use crate::{Diagnostic, ExprContext, ExprToken, LexemeCode};
use smartstring::alias::String;
use std::iter::FusedIterator;

/// A stream of expression lexemes with one token of push-back.
pub trait TokenSource {
    /// Returns the next token, or the pushed-back one if [`unread`] was called.
    ///
    /// [`unread`]: TokenSource::unread
    fn next_token(&mut self, ctx: &mut ExprContext) -> ExprToken;

    /// Pushes the most recently returned token back into the stream.
    ///
    /// At most one token is pending at a time.
    fn unread(&mut self);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LexerStats {
    pub chars: usize,
    pub tokens: usize,
    pub unreads: usize,
}

/// A [`TokenSource`] over an already scanned token sequence.
#[derive(Debug, Clone)]
pub struct TokenVec {
    tokens: Vec<ExprToken>,
    pos: usize,
    end_line: usize,
}

impl TokenVec {
    pub fn new(tokens: Vec<ExprToken>) -> Self {
        let end_line = tokens.last().map_or(1, |t| t.line_no);
        Self {
            tokens,
            pos: 0,
            end_line,
        }
    }
}

impl From<Vec<ExprToken>> for TokenVec {
    fn from(tokens: Vec<ExprToken>) -> Self {
        Self::new(tokens)
    }
}

impl TokenSource for TokenVec {
    fn next_token(&mut self, _ctx: &mut ExprContext) -> ExprToken {
        let token = match self.tokens.get(self.pos) {
            Some(t) => *t,
            None => ExprToken::end(self.end_line),
        };
        self.pos += 1;
        token
    }

    fn unread(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }
}

/// Scanner for the textual expression sub-language.
///
/// ```text
/// {  }  (  )  |  *  +  ?       operators
/// $name                        action name
/// \c                           escaped character (\n \t \r \0 translate)
/// [a-z_]  [^0-9]               character class and its complement
/// anything else                literal character; whitespace is skipped
/// ```
pub struct ExprLexer<I>
where
    I: FusedIterator<Item = char>,
{
    input: I,
    unread_chars: Vec<char>,
    line_no: usize,
    last: Option<ExprToken>,
    pending: Option<ExprToken>,
    stats: LexerStats,
}

impl<I> ExprLexer<I>
where
    I: FusedIterator<Item = char>,
{
    pub fn new(input: I) -> Self {
        Self {
            input,
            unread_chars: Vec::new(),
            line_no: 1,
            last: None,
            pending: None,
            stats: LexerStats::default(),
        }
    }

    pub fn stats(&self) -> LexerStats {
        self.stats
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.unread_chars.pop().or_else(|| {
            let c = self.input.next();
            if c.is_some() {
                self.stats.chars += 1;
            }
            c
        })?;
        if c == '\n' {
            self.line_no += 1;
        }
        Some(c)
    }

    fn unread_char(&mut self, c: char) {
        if c == '\n' {
            self.line_no -= 1;
        }
        self.unread_chars.push(c);
    }

    fn peek_char(&mut self) -> Option<char> {
        let c = self.next_char()?;
        self.unread_char(c);
        Some(c)
    }

    fn scan(&mut self, ctx: &mut ExprContext) -> ExprToken {
        loop {
            let Some(c) = self.next_char() else {
                return ExprToken::end(self.line_no);
            };
            let line = self.line_no;
            let code = match c {
                c if c.is_whitespace() => continue,
                '{' => LexemeCode::BeginExpression,
                '}' => LexemeCode::EndExpression,
                '(' => LexemeCode::OpenRoundBracket,
                ')' => LexemeCode::ClosedRoundBracket,
                '|' => LexemeCode::Or,
                '*' => LexemeCode::KleeneClosure,
                '+' => LexemeCode::PositiveClosure,
                '?' => LexemeCode::OptionalMember,
                '$' => match self.scan_ident() {
                    Some(name) => {
                        let index = ctx.symtab.intern(&name);
                        return ExprToken::action(index, line);
                    }
                    None => {
                        ctx.diagnostics
                            .report(Diagnostic::ActionNameExpected { line });
                        continue;
                    }
                },
                '\\' => match self.scan_escape() {
                    Some(c) => return ExprToken::char(c, line),
                    None => {
                        ctx.diagnostics.report(Diagnostic::DanglingEscape { line });
                        continue;
                    }
                },
                '[' => return self.scan_class(ctx, line),
                c => return ExprToken::char(c, line),
            };
            return ExprToken::bare(code, line);
        }
    }

    fn scan_ident(&mut self) -> Option<String> {
        let mut name = String::new();
        while let Some(c) = self.next_char() {
            let accept = if name.is_empty() {
                c.is_ascii_alphabetic() || c == '_'
            } else {
                c.is_ascii_alphanumeric() || c == '_'
            };
            if !accept {
                self.unread_char(c);
                break;
            }
            name.push(c);
        }
        (!name.is_empty()).then_some(name)
    }

    fn scan_escape(&mut self) -> Option<char> {
        let c = self.next_char()?;
        Some(match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            c => c,
        })
    }

    fn scan_class(&mut self, ctx: &mut ExprContext, line: usize) -> ExprToken {
        let complement = if self.peek_char() == Some('^') {
            self.next_char();
            true
        } else {
            false
        };
        let mut ranges = Vec::new();
        let mut closed = false;
        while let Some(c) = self.next_char() {
            let lo = match c {
                ']' => {
                    closed = true;
                    break;
                }
                '\\' => match self.scan_escape() {
                    Some(c) => c,
                    None => break,
                },
                c => c,
            };
            let mut hi = lo;
            if self.peek_char() == Some('-') {
                self.next_char();
                match self.next_char() {
                    Some(']') => {
                        // trailing '-' is literal
                        self.unread_char(']');
                        ranges.push(('-', '-'));
                    }
                    None => ranges.push(('-', '-')),
                    Some('\\') => hi = self.scan_escape().unwrap_or(lo),
                    Some(c) => hi = c,
                }
            }
            ranges.push((lo, hi));
        }
        if !closed {
            ctx.diagnostics
                .report(Diagnostic::UnterminatedCharClass { line });
        }
        let index = ctx.classes.insert(ranges);
        if complement {
            ExprToken::class_complement(index, line)
        } else {
            ExprToken::class(index, line)
        }
    }
}

impl<I> TokenSource for ExprLexer<I>
where
    I: FusedIterator<Item = char>,
{
    fn next_token(&mut self, ctx: &mut ExprContext) -> ExprToken {
        let token = match self.pending.take() {
            Some(t) => t,
            None => {
                let t = self.scan(ctx);
                self.stats.tokens += 1;
                log::trace!("SCANNED: {:?}", t);
                t
            }
        };
        self.last = Some(token);
        token
    }

    fn unread(&mut self) {
        if let Some(t) = self.last.take() {
            self.stats.unreads += 1;
            self.pending = Some(t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IdKind, LexemeValue};

    fn scan_all(text: &str, ctx: &mut ExprContext) -> Vec<ExprToken> {
        let mut lexer = ExprLexer::new(text.chars());
        let mut out = Vec::new();
        loop {
            let t = lexer.next_token(ctx);
            if t.is_end() {
                break;
            }
            out.push(t);
        }
        out
    }

    fn codes(tokens: &[ExprToken]) -> Vec<LexemeCode> {
        tokens.iter().map(|t| t.code).collect()
    }

    #[test]
    fn scans_operators_and_literals() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut ctx = ExprContext::new();
        let toks = scan_all("{ a|(b c)*+? }", &mut ctx);
        assert_eq!(
            codes(&toks),
            vec![
                LexemeCode::BeginExpression,
                LexemeCode::Character,
                LexemeCode::Or,
                LexemeCode::OpenRoundBracket,
                LexemeCode::Character,
                LexemeCode::Character,
                LexemeCode::ClosedRoundBracket,
                LexemeCode::KleeneClosure,
                LexemeCode::PositiveClosure,
                LexemeCode::OptionalMember,
                LexemeCode::EndExpression,
            ]
        );
        assert_eq!(toks[4].value, LexemeValue::Char('b'));
        assert!(!ctx.diagnostics.has_errors());
    }

    #[test]
    fn escapes_make_literals() {
        let mut ctx = ExprContext::new();
        let toks = scan_all(r"\{\|\n\\", &mut ctx);
        let chars: Vec<_> = toks.iter().map(|t| t.value).collect();
        assert_eq!(
            chars,
            vec![
                LexemeValue::Char('{'),
                LexemeValue::Char('|'),
                LexemeValue::Char('\n'),
                LexemeValue::Char('\\'),
            ]
        );
    }

    #[test]
    fn action_names_are_interned() {
        let mut ctx = ExprContext::new();
        let declared = ctx.declare_action("emit");
        let toks = scan_all("a$emit b$other_1", &mut ctx);
        assert_eq!(toks[1], ExprToken::action(declared, 1));
        let other = ctx.symtab.index_of("other_1").unwrap();
        assert_eq!(toks[3], ExprToken::action(other, 1));
        assert_eq!(ctx.symtab.kind(other), None);
        assert_eq!(ctx.symtab.kind(declared), Some(IdKind::ActionName));
    }

    #[test]
    fn dollar_without_name_is_reported_and_skipped() {
        let mut ctx = ExprContext::new();
        let toks = scan_all("a$ b", &mut ctx);
        assert_eq!(codes(&toks), vec![LexemeCode::Character, LexemeCode::Character]);
        assert_eq!(
            ctx.diagnostics.iter().collect::<Vec<_>>(),
            vec![&Diagnostic::ActionNameExpected { line: 1 }]
        );
    }

    #[test]
    fn classes_and_complements() {
        let mut ctx = ExprContext::new();
        let toks = scan_all("[a-z_][^0-9][_a-z]", &mut ctx);
        let LexemeValue::CharClass(first) = toks[0].value else {
            panic!("Expected a class token");
        };
        assert_eq!(toks[0].code, LexemeCode::CharacterClass);
        assert_eq!(toks[1].code, LexemeCode::ClassComplement);
        assert_eq!(toks[2].value, LexemeValue::CharClass(first));
        assert!(ctx.classes.contains(first, 'q'));
        assert!(ctx.classes.contains(first, '_'));
        assert!(!ctx.classes.contains(first, '5'));
        assert_eq!(ctx.classes.len(), 2);
    }

    #[test]
    fn trailing_dash_in_class_is_literal() {
        let mut ctx = ExprContext::new();
        let toks = scan_all("[+-]", &mut ctx);
        let LexemeValue::CharClass(i) = toks[0].value else {
            panic!("Expected a class token");
        };
        assert!(ctx.classes.contains(i, '+'));
        assert!(ctx.classes.contains(i, '-'));
        assert!(!ctx.classes.contains(i, ','));
    }

    #[test]
    fn unterminated_class_is_reported() {
        let mut ctx = ExprContext::new();
        let toks = scan_all("[abc", &mut ctx);
        assert_eq!(toks.len(), 1);
        assert_eq!(
            ctx.diagnostics.iter().collect::<Vec<_>>(),
            vec![&Diagnostic::UnterminatedCharClass { line: 1 }]
        );
    }

    #[test]
    fn lines_are_counted() {
        let mut ctx = ExprContext::new();
        let toks = scan_all("{a\n|\n\nb}", &mut ctx);
        let lines: Vec<usize> = toks.iter().map(|t| t.line_no).collect();
        assert_eq!(lines, vec![1, 1, 2, 4, 4]);
    }

    #[test]
    fn unread_returns_the_same_token() {
        let mut ctx = ExprContext::new();
        let mut lexer = ExprLexer::new("ab".chars());
        let a = lexer.next_token(&mut ctx);
        lexer.unread();
        assert_eq!(lexer.next_token(&mut ctx), a);
        let b = lexer.next_token(&mut ctx);
        assert_eq!(b.value, LexemeValue::Char('b'));
        assert!(lexer.next_token(&mut ctx).is_end());
        assert!(lexer.next_token(&mut ctx).is_end());
        assert_eq!(lexer.stats().unreads, 1);
        assert_eq!(lexer.stats().chars, 2);
    }

    #[test]
    fn token_vec_replays_and_ends() {
        let mut ctx = ExprContext::new();
        let mut src = TokenVec::new(vec![ExprToken::char('x', 2)]);
        let x = src.next_token(&mut ctx);
        src.unread();
        assert_eq!(src.next_token(&mut ctx), x);
        let end = src.next_token(&mut ctx);
        assert!(end.is_end());
        assert_eq!(end.line_no, 2);
        src.unread();
        assert!(src.next_token(&mut ctx).is_end());
    }
}
