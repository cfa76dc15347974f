//! # Instruction Buffer
//!
//! Regular expressions are compiled into a linear sequence of
//! [`Instruction`]s. The sequence is a post-order encoding of the expression
//! tree: every operand an instruction refers to has a smaller index than the
//! instruction itself, so a consumer can walk the buffer front to back and
//! always find operands already built.
//!
//! The buffer is append-only. The single permitted mutation after emission is
//! back-patching the action name onto a contiguous, fully emitted range
//! ([`InstructionBuffer::set_action_name`]).
//!
//! ## Example
//! ```rust
//! # use lexgen_expr::{Instruction, InstructionBuffer, InstructionKind};
//! let mut buf = InstructionBuffer::new();
//! let a = buf.push(Instruction::new(InstructionKind::Char('a')));
//! let b = buf.push(Instruction::new(InstructionKind::Char('b')));
//! let or = buf.push(Instruction::new(InstructionKind::Or { first: a, second: b }));
//! assert_eq!(or, 2);
//! assert_eq!(buf[or].operands(), vec![0, 1]);
//! ```

use std::fmt;
use std::ops::Index;

/// Instruction opcode together with its operands.
///
/// Binary and unary operators refer to earlier instructions by buffer index;
/// leaves carry their payload directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    /// Alternation of `first` and `second`.
    Or { first: usize, second: usize },
    /// Concatenation of `first` followed by `second`.
    Concat { first: usize, second: usize },
    /// Zero or more repetitions of `first`.
    Kleene { first: usize },
    /// One or more repetitions of `first`.
    Positive { first: usize },
    /// Zero or one occurrence of `first`.
    Optional { first: usize },
    /// A literal character.
    Char(char),
    /// Any character of the class with the given index.
    CharClass(usize),
    /// Any character not in the class with the given index.
    CharClassComplement(usize),
    /// Alternation over a flattened operand run (produced by later passes).
    Multior { first: usize, second: usize },
    /// Concatenation over a flattened operand run (produced by later passes).
    Multiconcat { first: usize, second: usize },
    /// Reference to a named regular sub-expression.
    RegexpName(usize),
    Unknown,
}

/// One compiled instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// Registry index of the attached action name, `0` if none.
    pub action_name: usize,
    pub kind: InstructionKind,
}

impl Instruction {
    /// Creates an instruction with no action attached.
    pub fn new(kind: InstructionKind) -> Self {
        Self {
            action_name: 0,
            kind,
        }
    }

    /// Returns the buffer indices this instruction refers to.
    pub fn operands(&self) -> Vec<usize> {
        match self.kind {
            InstructionKind::Or { first, second }
            | InstructionKind::Concat { first, second }
            | InstructionKind::Multior { first, second }
            | InstructionKind::Multiconcat { first, second } => vec![first, second],
            InstructionKind::Kleene { first }
            | InstructionKind::Positive { first }
            | InstructionKind::Optional { first } => vec![first],
            InstructionKind::Char(_)
            | InstructionKind::CharClass(_)
            | InstructionKind::CharClassComplement(_)
            | InstructionKind::RegexpName(_)
            | InstructionKind::Unknown => Vec::new(),
        }
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstructionKind::Or { first, second } => write!(f, "Or({first}, {second})"),
            InstructionKind::Concat { first, second } => write!(f, "Concat({first}, {second})"),
            InstructionKind::Kleene { first } => write!(f, "Kleene({first})"),
            InstructionKind::Positive { first } => write!(f, "Positive({first})"),
            InstructionKind::Optional { first } => write!(f, "Optional({first})"),
            InstructionKind::Char(c) => write!(f, "Char({c:?})"),
            InstructionKind::CharClass(i) => write!(f, "CharClass({i})"),
            InstructionKind::CharClassComplement(i) => write!(f, "CharClassComplement({i})"),
            InstructionKind::Multior { first, second } => write!(f, "Multior({first}, {second})"),
            InstructionKind::Multiconcat { first, second } => {
                write!(f, "Multiconcat({first}, {second})")
            }
            InstructionKind::RegexpName(i) => write!(f, "RegexpName({i})"),
            InstructionKind::Unknown => write!(f, "Unknown"),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if self.action_name != 0 {
            write!(f, " ${}", self.action_name)?;
        }
        Ok(())
    }
}

/// An inclusive range `[begin, end]` of buffer indices.
///
/// This is the attribute of every nonterminal of the expression grammar: the
/// instructions emitted while reducing it. `end` is the root of the
/// sub-expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub begin: usize,
    pub end: usize,
}

impl IndexRange {
    pub const fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.begin <= index && index <= self.end
    }
}

/// The growable, append-only instruction sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionBuffer {
    buf: Vec<Instruction>,
}

impl InstructionBuffer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Appends an instruction and returns its index.
    ///
    /// Panics if the instruction refers to an operand that is not already in
    /// the buffer.
    pub fn push(&mut self, instruction: Instruction) -> usize {
        let index = self.buf.len();
        assert!(
            instruction.operands().iter().all(|&op| op < index),
            "instruction {instruction} at {index} refers forward"
        );
        self.buf.push(instruction);
        index
    }

    /// Attaches `action_name` to every instruction in `range`.
    pub fn set_action_name(&mut self, range: IndexRange, action_name: usize) {
        for instruction in &mut self.buf[range.begin..=range.end] {
            instruction.action_name = action_name;
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.buf.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.buf.iter()
    }
}

impl Index<usize> for InstructionBuffer {
    type Output = Instruction;

    fn index(&self, index: usize) -> &Instruction {
        &self.buf[index]
    }
}

impl<'a> IntoIterator for &'a InstructionBuffer {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter()
    }
}

impl fmt::Display for InstructionBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, instruction) in self.buf.iter().enumerate() {
            writeln!(f, "{i}: {instruction}")?;
        }
        Ok(())
    }
}
