//! Per-state error recovery.
//!
//! Every state of the automaton has exactly one handler. A handler never
//! fails: it returns the diagnostic to report, if any, and a synthesized
//! [`Step`] the driver applies as if the table had produced it.
use super::parser_data::{ProdID, StateID, TokenID};
use crate::{Diagnostic, ExprToken, LexemeCode};

/// A driver step, either looked up in the table or synthesized by a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Step {
    /// Push `token` and enter `state`, then read a new lookahead. With
    /// `push_back` the current lookahead is unread first, so it is read
    /// again; otherwise it is dropped.
    Shift {
        token: ExprToken,
        state: StateID,
        push_back: bool,
    },
    /// Reduce and keep the lookahead.
    Reduce(ProdID),
    /// Reduce, drop the lookahead and read the next one.
    ReduceWithoutBack(ProdID),
    Accept,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    ExpectOpenBrace,
    Accept,
    ExpectAtom,
    ExpectOrOrBrace,
    /// Misses where the state can only reduce; the token is usually kept.
    ReduceKeeping,
    /// Misses after a complete `G`.
    ReduceAfterOperand,
    /// Misses after an atom or a group.
    ReduceAfterAtom,
    ForcedFinal,
    ExpectOrOrParen,
}

#[rustfmt::skip]
const HANDLERS: [Handler; StateID::COUNT] = [
    Handler::ExpectOpenBrace,    // 0
    Handler::Accept,             // 1
    Handler::ExpectAtom,         // 2
    Handler::ExpectOrOrBrace,    // 3
    Handler::ReduceKeeping,      // 4
    Handler::ReduceKeeping,      // 5
    Handler::ReduceAfterOperand, // 6
    Handler::ReduceAfterAtom,    // 7
    Handler::ReduceAfterAtom,    // 8
    Handler::ExpectAtom,         // 9
    Handler::ExpectAtom,         // 10
    Handler::ForcedFinal,        // 11
    Handler::ReduceKeeping,      // 12
    Handler::ReduceKeeping,      // 13
    Handler::ReduceAfterOperand, // 14
    Handler::ExpectOrOrParen,    // 15
    Handler::ReduceKeeping,      // 16
    Handler::ReduceAfterAtom,    // 17
];

/// The rule a state falls back to when it cannot shift.
#[rustfmt::skip]
const REDUCE_RULES: [Option<ProdID>; StateID::COUNT] = [
    None,               // 0
    None,               // 1
    None,               // 2
    None,               // 3
    Some(ProdID::T2),   // 4
    Some(ProdID::E2),   // 5
    Some(ProdID::F2),   // 6
    Some(ProdID::G2),   // 7
    Some(ProdID::H1),   // 8
    None,               // 9
    None,               // 10
    Some(ProdID::S),    // 11
    Some(ProdID::E1),   // 12
    Some(ProdID::F1),   // 13
    Some(ProdID::G1),   // 14
    None,               // 15
    Some(ProdID::T1),   // 16
    Some(ProdID::H2),   // 17
];

const STATE_OPEN: StateID = StateID(2);
const STATE_ATOM: StateID = StateID(8);
const STATE_ALT: StateID = StateID(10);
const STATE_CLOSED: StateID = StateID(11);
const STATE_GROUP: StateID = StateID(17);

fn reduce_rule(state: StateID) -> ProdID {
    match REDUCE_RULES[usize::from(state)] {
        Some(prod_id) => prod_id,
        None => unreachable!("state {state:?} has no fallback reduction"),
    }
}

/// Resolves a table miss in `state` on `lookahead`.
///
/// Panics on a miss no handler covers; that means the table is malformed.
pub(super) fn recover(state: StateID, lookahead: &ExprToken) -> (Option<Diagnostic>, Step) {
    let line = lookahead.line_no;
    let token_id = lookahead.token_id();
    let handler = HANDLERS[usize::from(state)];
    log::debug!("Recover {:?} in {:?} on {:?}", handler, state, token_id);

    match handler {
        Handler::ExpectOpenBrace => (
            Some(Diagnostic::OpeningCurlyBraceExpected { line }),
            Step::Shift {
                token: ExprToken::bare(LexemeCode::BeginExpression, line),
                state: STATE_OPEN,
                push_back: token_id != TokenID::RParen,
            },
        ),

        Handler::Accept => (None, Step::Accept),

        Handler::ExpectAtom => (
            Some(Diagnostic::CharOrCharClassExpected { line }),
            Step::Shift {
                token: ExprToken::char('a', line),
                state: STATE_ATOM,
                push_back: true,
            },
        ),

        Handler::ExpectOrOrBrace => {
            let step = match token_id {
                TokenID::End => Step::Shift {
                    token: ExprToken::bare(LexemeCode::EndExpression, line),
                    state: STATE_CLOSED,
                    push_back: true,
                },
                TokenID::RParen | TokenID::LBrace => insert_or(line, false),
                _ => insert_or(line, true),
            };
            (Some(Diagnostic::OrOperatorOrBraceExpected { line }), step)
        }

        Handler::ExpectOrOrParen => {
            let step = match token_id {
                TokenID::RBrace | TokenID::End => Step::Shift {
                    token: ExprToken::bare(LexemeCode::ClosedRoundBracket, line),
                    state: STATE_GROUP,
                    push_back: true,
                },
                TokenID::LBrace => insert_or(line, false),
                _ => insert_or(line, true),
            };
            (Some(Diagnostic::OrOperatorOrRoundBracketExpected { line }), step)
        }

        Handler::ReduceKeeping => {
            let rule = reduce_rule(state);
            match token_id {
                TokenID::Action => (Some(Diagnostic::UnexpectedAction { line }), Step::Reduce(rule)),
                TokenID::Closure => (
                    Some(Diagnostic::UnexpectedPostfixOperator { line }),
                    Step::Reduce(rule),
                ),
                TokenID::End => (Some(Diagnostic::UnexpectedEndOfText { line }), Step::Reduce(rule)),
                TokenID::LBrace => (
                    Some(Diagnostic::UnexpectedOpeningBrace { line }),
                    Step::ReduceWithoutBack(rule),
                ),
                _ => unreachable!("no recovery in {state:?} on {token_id:?}"),
            }
        }

        Handler::ReduceAfterOperand => {
            let diagnostic = match token_id {
                TokenID::Action => Diagnostic::UnexpectedAction { line },
                TokenID::LBrace => Diagnostic::UnexpectedOpeningBrace { line },
                TokenID::End => Diagnostic::UnexpectedEndOfText { line },
                _ => unreachable!("no recovery in {state:?} on {token_id:?}"),
            };
            (Some(diagnostic), Step::ReduceWithoutBack(reduce_rule(state)))
        }

        Handler::ReduceAfterAtom => {
            let diagnostic = match token_id {
                TokenID::LBrace => Diagnostic::UnexpectedOpeningBrace { line },
                _ => Diagnostic::UnexpectedEndOfText { line },
            };
            (Some(diagnostic), Step::ReduceWithoutBack(reduce_rule(state)))
        }

        Handler::ForcedFinal => (None, Step::Reduce(reduce_rule(state))),
    }
}

fn insert_or(line: usize, push_back: bool) -> Step {
    Step::Shift {
        token: ExprToken::bare(LexemeCode::Or, line),
        state: STATE_ALT,
        push_back,
    }
}
