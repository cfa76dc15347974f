//! SLR(1) tables for the expression grammar.
//!
//! ```text
//! (0)  Start -> S
//! (1)  S -> { T }        p T q
//! (2)  T -> T | E        T b E
//! (3)  T -> E
//! (4)  E -> E F
//! (5)  E -> F
//! (6)  F -> G c          c is one of ? * +
//! (7)  F -> G
//! (8)  G -> H $action    H a
//! (9)  G -> H
//! (10) H -> d            d is a character or a (complemented) class
//! (11) H -> ( T )
//! ```
//!
//! States are numbered so that each one matches its error handler in
//! [`super::recovery`]:
//!
//! ```text
//!  0  Start -> . S                  9  H -> ( . T )
//!  1  Start -> S .                 10  T -> T b . E
//!  2  S -> p . T q                 11  S -> p T q .
//!  3  S -> p T . q,  T -> T . b E  12  E -> E F .
//!  4  T -> E .,  E -> E . F        13  F -> G c .
//!  5  E -> F .                     14  G -> H a .
//!  6  F -> G . c,  F -> G .        15  H -> ( T . ),  T -> T . b E
//!  7  G -> H . a,  G -> H .        16  T -> T b E .,  E -> E . F
//!  8  H -> d .                     17  H -> ( T ) .
//! ```

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateID(pub(crate) u8);

impl StateID {
    pub const COUNT: usize = 18;
    pub const START: StateID = StateID(0);
}

impl From<StateID> for usize {
    fn from(s: StateID) -> Self {
        s.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ProdID {
    Start = 0,
    S = 1,
    T1 = 2,
    T2 = 3,
    E1 = 4,
    E2 = 5,
    F1 = 6,
    F2 = 7,
    G1 = 8,
    G2 = 9,
    H1 = 10,
    H2 = 11,
}

impl From<ProdID> for usize {
    fn from(p: ProdID) -> Self {
        p as usize
    }
}

impl ProdID {
    pub const COUNT: usize = 12;

    pub const ALL: [ProdID; ProdID::COUNT] = [
        ProdID::Start,
        ProdID::S,
        ProdID::T1,
        ProdID::T2,
        ProdID::E1,
        ProdID::E2,
        ProdID::F1,
        ProdID::F2,
        ProdID::G1,
        ProdID::G2,
        ProdID::H1,
        ProdID::H2,
    ];

    pub const LABELS: &'static [&'static str] = &[
        "Start -> S",   // 0
        "S -> { T }",   // 1
        "T -> T | E",   // 2
        "T -> E",       // 3
        "E -> E F",     // 4
        "E -> F",       // 5
        "F -> G c",     // 6
        "F -> G",       // 7
        "G -> H $a",    // 8
        "G -> H",       // 9
        "H -> d",       // 10
        "H -> ( T )",   // 11
    ];

    pub const LHS_TOKENS: &'static [TokenID] = &[
        TokenID::Start, // 0
        TokenID::S,     // 1
        TokenID::T,     // 2
        TokenID::T,     // 3
        TokenID::E,     // 4
        TokenID::E,     // 5
        TokenID::F,     // 6
        TokenID::F,     // 7
        TokenID::G,     // 8
        TokenID::G,     // 9
        TokenID::H,     // 10
        TokenID::H,     // 11
    ];

    pub const RHS_TOKENS: &'static [&'static [TokenID]] = &[
        &[TokenID::S],
        &[TokenID::LBrace, TokenID::T, TokenID::RBrace],
        &[TokenID::T, TokenID::Or, TokenID::E],
        &[TokenID::E],
        &[TokenID::E, TokenID::F],
        &[TokenID::F],
        &[TokenID::G, TokenID::Closure],
        &[TokenID::G],
        &[TokenID::H, TokenID::Action],
        &[TokenID::H],
        &[TokenID::Atom],
        &[TokenID::LParen, TokenID::T, TokenID::RParen],
    ];

    pub fn label(&self) -> &'static str {
        ProdID::LABELS[usize::from(*self)]
    }

    pub fn lhs_token_id(&self) -> TokenID {
        ProdID::LHS_TOKENS[usize::from(*self)]
    }

    /// Length of the right-hand side.
    pub fn size(&self) -> usize {
        ProdID::RHS_TOKENS[usize::from(*self)].len()
    }
}

/// Grammar symbols: nonterminals first, then terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenID {
    // Nonterminals:
    Start = 0,
    S = 1,
    T = 2,
    E = 3,
    F = 4,
    G = 5,
    H = 6,

    // Terminals:
    /// End of text.
    End = 7,
    /// `$name` (a)
    Action = 8,
    /// `|` (b)
    Or = 9,
    /// `?`, `*` or `+` (c)
    Closure = 10,
    /// character or character class (d)
    Atom = 11,
    LParen = 12,
    RParen = 13,
    /// `{` (p)
    LBrace = 14,
    /// `}` (q)
    RBrace = 15,
}

impl From<TokenID> for usize {
    fn from(t: TokenID) -> Self {
        t as usize
    }
}

impl TokenID {
    pub const COUNT_NONTERMINALS: usize = 7;
    pub const COUNT_TERMINALS: usize = 9;
    pub const COUNT: usize = 16;

    pub const TERMINALS: [TokenID; TokenID::COUNT_TERMINALS] = [
        TokenID::End,
        TokenID::Action,
        TokenID::Or,
        TokenID::Closure,
        TokenID::Atom,
        TokenID::LParen,
        TokenID::RParen,
        TokenID::LBrace,
        TokenID::RBrace,
    ];

    pub fn is_terminal(&self) -> bool {
        usize::from(*self) >= TokenID::COUNT_NONTERMINALS
    }
}

/// An entry of the ACTION/GOTO table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserAction {
    Error,
    Accept,
    Shift(StateID),
    Reduce(ProdID),
    Goto(StateID),
}

pub struct ParData;

const fn s(n: u8) -> ParserAction {
    ParserAction::Shift(StateID(n))
}

const fn g(n: u8) -> ParserAction {
    ParserAction::Goto(StateID(n))
}

const fn r(p: ProdID) -> ParserAction {
    ParserAction::Reduce(p)
}

const X: ParserAction = ParserAction::Error;
const ACC: ParserAction = ParserAction::Accept;

#[rustfmt::skip]
static TABLE: [[ParserAction; TokenID::COUNT]; StateID::COUNT] = [
    //  Start S     T      E      F      G      H      End          a      b             c             d             (             )             {      }
    /* 0 */  [X, g(1), X,     X,     X,     X,     X,     X,           X,     X,            X,            X,            X,            X,            s(2),  X],
    /* 1 */  [X, X,    X,     X,     X,     X,     X,     ACC,         X,     X,            X,            X,            X,            X,            X,     X],
    /* 2 */  [X, X,    g(3),  g(4),  g(5),  g(6),  g(7),  X,           X,     X,            X,            s(8),         s(9),         X,            X,     X],
    /* 3 */  [X, X,    X,     X,     X,     X,     X,     X,           X,     s(10),        X,            X,            X,            X,            X,     s(11)],
    /* 4 */  [X, X,    X,     X,     g(12), g(6),  g(7),  X,           X,     r(ProdID::T2), X,           s(8),         s(9),         r(ProdID::T2), X,    r(ProdID::T2)],
    /* 5 */  [X, X,    X,     X,     X,     X,     X,     X,           X,     r(ProdID::E2), X,           r(ProdID::E2), r(ProdID::E2), r(ProdID::E2), X,   r(ProdID::E2)],
    /* 6 */  [X, X,    X,     X,     X,     X,     X,     X,           X,     r(ProdID::F2), s(13),       r(ProdID::F2), r(ProdID::F2), r(ProdID::F2), X,   r(ProdID::F2)],
    /* 7 */  [X, X,    X,     X,     X,     X,     X,     X,           s(14), r(ProdID::G2), r(ProdID::G2), r(ProdID::G2), r(ProdID::G2), r(ProdID::G2), X, r(ProdID::G2)],
    /* 8 */  [X, X,    X,     X,     X,     X,     X,     X,   r(ProdID::H1), r(ProdID::H1), r(ProdID::H1), r(ProdID::H1), r(ProdID::H1), r(ProdID::H1), X, r(ProdID::H1)],
    /* 9 */  [X, X,    g(15), g(4),  g(5),  g(6),  g(7),  X,           X,     X,            X,            s(8),         s(9),         X,            X,     X],
    /* 10 */ [X, X,    X,     g(16), g(5),  g(6),  g(7),  X,           X,     X,            X,            s(8),         s(9),         X,            X,     X],
    /* 11 */ [X, X,    X,     X,     X,     X,     X,     r(ProdID::S), X,    X,            X,            X,            X,            X,            X,     X],
    /* 12 */ [X, X,    X,     X,     X,     X,     X,     X,           X,     r(ProdID::E1), X,           r(ProdID::E1), r(ProdID::E1), r(ProdID::E1), X,   r(ProdID::E1)],
    /* 13 */ [X, X,    X,     X,     X,     X,     X,     X,           X,     r(ProdID::F1), X,           r(ProdID::F1), r(ProdID::F1), r(ProdID::F1), X,   r(ProdID::F1)],
    /* 14 */ [X, X,    X,     X,     X,     X,     X,     X,           X,     r(ProdID::G1), r(ProdID::G1), r(ProdID::G1), r(ProdID::G1), r(ProdID::G1), X, r(ProdID::G1)],
    /* 15 */ [X, X,    X,     X,     X,     X,     X,     X,           X,     s(10),        X,            X,            X,            s(17),        X,     X],
    /* 16 */ [X, X,    X,     X,     g(12), g(6),  g(7),  X,           X,     r(ProdID::T1), X,           s(8),         s(9),         r(ProdID::T1), X,    r(ProdID::T1)],
    /* 17 */ [X, X,    X,     X,     X,     X,     X,     X,   r(ProdID::H2), r(ProdID::H2), r(ProdID::H2), r(ProdID::H2), r(ProdID::H2), r(ProdID::H2), X, r(ProdID::H2)],
];

impl ParData {
    pub fn start_state() -> StateID {
        StateID::START
    }

    pub fn lookup(state_id: StateID, token_id: TokenID) -> ParserAction {
        TABLE[usize::from(state_id)][usize::from(token_id)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn states() -> impl Iterator<Item = StateID> {
        (0..StateID::COUNT as u8).map(StateID)
    }

    fn first_of(sym: TokenID) -> BTreeSet<usize> {
        if sym.is_terminal() {
            return BTreeSet::from([usize::from(sym)]);
        }
        let mut out = BTreeSet::new();
        for p in ProdID::ALL {
            let rhs = ProdID::RHS_TOKENS[usize::from(p)];
            if p.lhs_token_id() == sym && rhs[0] != sym {
                out.extend(first_of(rhs[0]));
            }
        }
        out
    }

    /// FOLLOW sets by fixed-point iteration; no production is nullable.
    fn follow_sets() -> Vec<BTreeSet<usize>> {
        let mut follow = vec![BTreeSet::new(); TokenID::COUNT];
        follow[usize::from(TokenID::Start)].insert(usize::from(TokenID::End));
        let mut changed = true;
        while changed {
            changed = false;
            for p in ProdID::ALL {
                let lhs = usize::from(p.lhs_token_id());
                let rhs = ProdID::RHS_TOKENS[usize::from(p)];
                for (i, sym) in rhs.iter().enumerate() {
                    if sym.is_terminal() {
                        continue;
                    }
                    let add: BTreeSet<usize> = match rhs.get(i + 1) {
                        Some(next) => first_of(*next),
                        None => follow[lhs].clone(),
                    };
                    let target = &mut follow[usize::from(*sym)];
                    let before = target.len();
                    target.extend(add);
                    changed |= target.len() != before;
                }
            }
        }
        follow
    }

    #[test]
    fn sizes_match_rules() {
        assert_eq!(ProdID::LABELS.len(), ProdID::COUNT);
        assert_eq!(ProdID::LHS_TOKENS.len(), ProdID::COUNT);
        assert_eq!(ProdID::S.size(), 3);
        assert_eq!(ProdID::T1.size(), 3);
        assert_eq!(ProdID::E1.size(), 2);
        assert_eq!(ProdID::H1.size(), 1);
        assert_eq!(ProdID::H2.size(), 3);
        assert_eq!(ProdID::G1.label(), "G -> H $a");
    }

    #[test]
    fn reductions_happen_exactly_on_follow_sets() {
        let follow = follow_sets();
        for state in states() {
            let mut reduce: Vec<ProdID> = TokenID::TERMINALS
                .iter()
                .filter_map(|&t| match ParData::lookup(state, t) {
                    ParserAction::Reduce(p) => Some(p),
                    _ => None,
                })
                .collect();
            reduce.dedup();
            assert!(reduce.len() <= 1, "reduce/reduce conflict in {state:?}");
            for p in reduce {
                for &t in &TokenID::TERMINALS {
                    let in_follow = follow[usize::from(p.lhs_token_id())].contains(&usize::from(t));
                    match ParData::lookup(state, t) {
                        ParserAction::Reduce(q) => {
                            assert_eq!(q, p);
                            assert!(in_follow, "{state:?} reduces {p:?} on {t:?}");
                        }
                        ParserAction::Shift(_) => {
                            assert!(!in_follow, "shift/reduce conflict in {state:?} on {t:?}")
                        }
                        _ => assert!(!in_follow, "{state:?} misses {p:?} on {t:?}"),
                    }
                }
            }
        }
    }

    #[test]
    fn terminal_columns_hold_no_goto_and_nonterminal_columns_only_goto() {
        for state in states() {
            for t in 0..TokenID::COUNT {
                let action = TABLE[usize::from(state)][t];
                if t < TokenID::COUNT_NONTERMINALS {
                    assert!(matches!(action, ParserAction::Goto(_) | ParserAction::Error));
                } else {
                    assert!(!matches!(action, ParserAction::Goto(_)));
                }
            }
        }
    }

    #[test]
    fn shifts_enter_states_whose_kernel_follows_that_symbol() {
        // every state is entered on exactly one symbol
        let mut entry: Vec<Option<usize>> = vec![None; StateID::COUNT];
        entry[0] = Some(usize::MAX);
        for state in states() {
            for t in 0..TokenID::COUNT {
                if let ParserAction::Shift(n) | ParserAction::Goto(n) = TABLE[usize::from(state)][t] {
                    let slot = &mut entry[usize::from(n)];
                    assert!(slot.is_none() || *slot == Some(t), "state {n:?} entered on two symbols");
                    *slot = Some(t);
                }
            }
        }
        assert!(entry.iter().all(Option::is_some));
        assert_eq!(entry[8], Some(usize::from(TokenID::Atom)));
        assert_eq!(entry[10], Some(usize::from(TokenID::Or)));
        assert_eq!(entry[11], Some(usize::from(TokenID::RBrace)));
        assert_eq!(entry[14], Some(usize::from(TokenID::Action)));
        assert_eq!(entry[17], Some(usize::from(TokenID::RParen)));
    }

    #[test]
    fn accepts_only_after_start_symbol() {
        for state in states() {
            for &t in &TokenID::TERMINALS {
                let accept = ParData::lookup(state, t) == ParserAction::Accept;
                assert_eq!(accept, state == StateID(1) && t == TokenID::End);
            }
        }
    }
}
