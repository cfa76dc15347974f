//! # Expression Parser
//!
//! [`ExprParser`] is a table-driven SLR(1) parser for one braced regular
//! expression (`{ ... }`). Reductions compile the expression straight into an
//! [`InstructionBuffer`]: each nonterminal's attribute is the [`IndexRange`]
//! of the instructions emitted while recognizing it.
//!
//! Malformed input never aborts a parse. A miss in the ACTION table is
//! handed to the recovery handler of the current state (see
//! [`recovery`]), which reports a [`Diagnostic`] and synthesizes a step that
//! keeps the automaton moving until it accepts. One diagnostic is reported
//! per offending lookahead; follow-up recoveries stay silent until a real
//! token has been shifted. This keeps `{a` at a single diagnostic, so the
//! error counter grows by one per reported diagnostic rather than one per
//! recovery; [`ParserStats::recoveries`] counts every recovery.
//! Diagnostics carry the line of the lookahead token.
//!
//! ## Example
//! ```rust
//! # use lexgen_expr::{ExprContext, ExprLexer, ExprParser, InstructionKind};
//! let mut ctx = ExprContext::new();
//! let mut parser = ExprParser::new(ExprLexer::new("{a|b*}".chars()));
//! let range = parser.parse(&mut ctx);
//! assert_eq!((range.begin, range.end), (0, 3));
//! assert_eq!(parser.buffer()[3].kind, InstructionKind::Or { first: 0, second: 2 });
//! assert_eq!(ctx.error_count(), 0);
//! ```
pub mod parser_data;
mod recovery;

use crate::{
    Diagnostic, ExprContext, ExprToken, IdKind, IndexRange, Instruction, InstructionBuffer,
    InstructionKind, LexemeCode, LexemeValue, TokenSource,
};
use parser_data::{ParData, ParserAction, ProdID, StateID};
use recovery::Step;
use smartstring::alias::String;

/// Counters accumulated over every expression parsed by one parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserStats {
    pub tokens: usize,
    pub shifts: usize,
    pub reductions: usize,
    pub recoveries: usize,
}

/// Attribute of a parse-stack entry.
#[derive(Debug, Clone, Copy)]
enum Attrib {
    /// A shifted terminal.
    Lexeme(ExprToken),
    /// A reduced nonterminal.
    Indices(IndexRange),
}

impl Attrib {
    fn indices(&self) -> IndexRange {
        match self {
            Attrib::Indices(range) => *range,
            Attrib::Lexeme(token) => unreachable!("expected an index range, found {:?}", token),
        }
    }

    fn lexeme(&self) -> &ExprToken {
        match self {
            Attrib::Lexeme(token) => token,
            Attrib::Indices(range) => unreachable!("expected a lexeme, found {:?}", range),
        }
    }
}

/// SLR(1) driver compiling braced expressions into an instruction buffer.
pub struct ExprParser<L>
where
    L: TokenSource,
{
    lexer: L,
    buffer: InstructionBuffer,
    states: Vec<StateID>,
    attribs: Vec<Attrib>,
    quiet: bool,
    stats: ParserStats,
}

impl<L> ExprParser<L>
where
    L: TokenSource,
{
    pub fn new(lexer: L) -> Self {
        Self {
            lexer,
            buffer: InstructionBuffer::new(),
            states: Vec::new(),
            attribs: Vec::new(),
            quiet: false,
            stats: ParserStats::default(),
        }
    }

    /// Parses one expression and returns the range of its instructions.
    ///
    /// Always reaches acceptance; an empty stream yields the recovered
    /// expression `{a}` together with its diagnostic.
    pub fn parse(&mut self, ctx: &mut ExprContext) -> IndexRange {
        let token = self.next_token(ctx);
        self.run(ctx, token)
    }

    /// Parses the next expression, or returns `None` at end of text.
    pub fn try_next(&mut self, ctx: &mut ExprContext) -> Option<IndexRange> {
        let token = self.next_token(ctx);
        if token.is_end() {
            return None;
        }
        Some(self.run(ctx, token))
    }

    pub fn buffer(&self) -> &InstructionBuffer {
        &self.buffer
    }

    pub fn into_buffer(self) -> InstructionBuffer {
        self.buffer
    }

    pub fn stats(&self) -> ParserStats {
        self.stats
    }

    fn next_token(&mut self, ctx: &mut ExprContext) -> ExprToken {
        self.stats.tokens += 1;
        self.lexer.next_token(ctx)
    }

    fn run(&mut self, ctx: &mut ExprContext, mut token: ExprToken) -> IndexRange {
        self.states.clear();
        self.attribs.clear();
        self.quiet = false;
        let mut state = ParData::start_state();
        self.states.push(state);
        if log::log_enabled!(log::Level::Trace) {
            self.dump_state(&token);
        }
        loop {
            let step = match ParData::lookup(state, token.token_id()) {
                ParserAction::Shift(new_state) => {
                    self.quiet = false;
                    Step::Shift {
                        token,
                        state: new_state,
                        push_back: false,
                    }
                }
                ParserAction::Reduce(prod_id) => Step::Reduce(prod_id),
                ParserAction::Accept => Step::Accept,
                ParserAction::Error => {
                    let (diagnostic, step) = recovery::recover(state, &token);
                    self.stats.recoveries += 1;
                    if let Some(diagnostic) = diagnostic {
                        self.report_recovery(ctx, diagnostic);
                    }
                    step
                }
                ParserAction::Goto(_) => unreachable!("goto on terminal {:?}", token),
            };

            match step {
                Step::Shift {
                    token: shifted,
                    state: new_state,
                    push_back,
                } => {
                    log::trace!("Shift {:?}", new_state);
                    self.attribs.push(Attrib::Lexeme(shifted));
                    state = new_state;
                    self.states.push(state);
                    if push_back {
                        self.lexer.unread();
                    }
                    token = self.next_token(ctx);
                    self.stats.shifts += 1;
                }

                Step::Reduce(prod_id) | Step::ReduceWithoutBack(prod_id) => {
                    log::trace!("Reduce {:?}({})", prod_id, usize::from(prod_id));
                    self.reduce(ctx, prod_id, &token);
                    state = self.states[self.states.len() - 1];
                    let ParserAction::Goto(new_state) = ParData::lookup(state, prod_id.lhs_token_id())
                    else {
                        panic!("no goto on {:?} in {:?}", prod_id.lhs_token_id(), state);
                    };
                    state = new_state;
                    self.states.push(state);
                    self.stats.reductions += 1;
                    if let Step::ReduceWithoutBack(_) = step {
                        log::trace!("Drop {:?}", token);
                        token = self.next_token(ctx);
                    }
                }

                Step::Accept => {
                    log::trace!("Accept");
                    assert!(self.attribs.len() == 1);
                    if !token.is_end() {
                        self.lexer.unread();
                    }
                    let range = self.attribs[0].indices();
                    self.attribs.clear();
                    return range;
                }
            }

            if log::log_enabled!(log::Level::Trace) {
                self.dump_state(&token);
            }
        }
    }

    fn report_recovery(&mut self, ctx: &mut ExprContext, diagnostic: Diagnostic) {
        if self.quiet {
            log::debug!("suppressed: {}", diagnostic);
            return;
        }
        self.quiet = true;
        ctx.diagnostics.report(diagnostic);
    }

    /// Pops the rule body and pushes the attribute of its left-hand side.
    ///
    /// Panics if the stack holds fewer entries than the rule body.
    fn reduce(&mut self, ctx: &mut ExprContext, prod_id: ProdID, lookahead: &ExprToken) {
        let n = prod_id.size();
        assert!(
            self.attribs.len() >= n && self.states.len() > n,
            "stack too short to reduce {}",
            prod_id.label()
        );
        self.states.truncate(self.states.len() - n);
        let body = self.attribs.split_off(self.attribs.len() - n);

        let range = match prod_id {
            ProdID::Start => unreachable!("the start rule is never reduced"),

            ProdID::S | ProdID::H2 => body[1].indices(),

            ProdID::T1 => {
                let (t, e) = (body[0].indices(), body[2].indices());
                let i = self.emit(InstructionKind::Or {
                    first: t.end,
                    second: e.end,
                });
                IndexRange::new(t.begin, i)
            }

            ProdID::E1 => {
                let (e, f) = (body[0].indices(), body[1].indices());
                let i = self.emit(InstructionKind::Concat {
                    first: e.end,
                    second: f.end,
                });
                IndexRange::new(e.begin, i)
            }

            ProdID::F1 => {
                let g = body[0].indices();
                let op = body[1].lexeme();
                let kind = match op.code {
                    LexemeCode::KleeneClosure => InstructionKind::Kleene { first: g.end },
                    LexemeCode::PositiveClosure => InstructionKind::Positive { first: g.end },
                    LexemeCode::OptionalMember => InstructionKind::Optional { first: g.end },
                    code => unreachable!("{:?} is not a postfix operator", code),
                };
                IndexRange::new(g.begin, self.emit(kind))
            }

            ProdID::G1 => {
                let h = body[0].indices();
                self.attach_action(ctx, h, body[1].lexeme(), lookahead.line_no);
                h
            }

            ProdID::T2 | ProdID::E2 | ProdID::F2 | ProdID::G2 => body[0].indices(),

            ProdID::H1 => {
                let d = body[0].lexeme();
                let kind = match (d.code, d.value) {
                    (LexemeCode::Character, LexemeValue::Char(c)) => InstructionKind::Char(c),
                    (LexemeCode::CharacterClass, LexemeValue::CharClass(i)) => {
                        InstructionKind::CharClass(i)
                    }
                    (LexemeCode::ClassComplement, LexemeValue::CharClass(i)) => {
                        InstructionKind::CharClassComplement(i)
                    }
                    _ => unreachable!("{:?} is not an atom", d),
                };
                let i = self.emit(kind);
                IndexRange::new(i, i)
            }
        };

        self.attribs.push(Attrib::Indices(range));
    }

    fn emit(&mut self, kind: InstructionKind) -> usize {
        let i = self.buffer.push(Instruction::new(kind));
        log::trace!("Emit {}: {}", i, kind);
        i
    }

    /// Diagnostics are reported at `line`, the line of the lookahead.
    fn attach_action(
        &mut self,
        ctx: &mut ExprContext,
        range: IndexRange,
        action: &ExprToken,
        line: usize,
    ) {
        let LexemeValue::Action(index) = action.value else {
            unreachable!("action lexeme without a name: {:?}", action);
        };
        let kind = ctx.symtab.kind(index);
        if kind == Some(IdKind::ActionName) {
            self.buffer.set_action_name(range, index);
            return;
        }
        let name = match ctx.symtab.name(index) {
            Ok(name) => name.to_string(),
            Err(_) => format!("#{index}"),
        };
        ctx.diagnostics.report(match kind {
            None => Diagnostic::UndefinedAction { line, name },
            Some(_) => Diagnostic::NotAnAction { line, name },
        });
    }

    fn dump_state(&self, incoming: &ExprToken) {
        let mut output = String::new();
        for (i, state) in self.states.iter().enumerate() {
            let symbol = match self.attribs.get(i) {
                Some(Attrib::Lexeme(t)) => format!("{:?}", t.code),
                Some(Attrib::Indices(r)) => format!("[{}, {}]", r.begin, r.end),
                None => format!("{:?}", incoming.code),
            };
            output.push_str(&format!(
                "<{}>  {}{}  ",
                state.0,
                if i == self.states.len() - 1 { "<-  " } else { "" },
                symbol,
            ));
        }
        log::trace!("{}", output);
    }
}
