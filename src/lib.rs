//! Copyright (c) 2025 The lexgen-expr Authors.
//!
//! Released under the terms of the GNU Lesser General Public License, version 3.0
//! or (at your option) any later version (LGPL-3.0-or-later).
//!
//! # lexgen-expr
//!
//! The regular-expression front end of a lexer generator. Each lexer rule is
//! written as a braced expression such as `{[a-z_][a-z0-9_]*$ident}`; this
//! crate parses it with an SLR(1) automaton and compiles it directly into a
//! linear, post-order [`InstructionBuffer`] for the NFA builder downstream.
//!
//! Parsing is error tolerant: malformed input produces [`Diagnostic`]s and a
//! best-effort buffer, never an aborted parse.
//!
//! ## Overview
//!
//! - [`lexer`]: the [`TokenSource`] trait and the [`ExprLexer`] scanner,
//! - [`parser`]: the [`ExprParser`] driver, its tables and error recovery,
//! - [`instruction`]: the compiled [`Instruction`] set,
//! - [`symtab`], [`char_class`]: registries for identifiers and classes,
//! - [`diag`]: diagnostics and the shared error counter.
//!
//! ## Example
//!
//! ```rust
//! use lexgen_expr::{ExprContext, ExprLexer, ExprParser, InstructionKind};
//!
//! let mut ctx = ExprContext::new();
//! let number = ctx.declare_action("number");
//!
//! let mut parser = ExprParser::new(ExprLexer::new("{([0-9]+)$number}".chars()));
//! let range = parser.parse(&mut ctx);
//! let buffer = parser.into_buffer();
//!
//! assert_eq!(ctx.error_count(), 0);
//! assert_eq!(buffer[range.end].kind, InstructionKind::Positive { first: 0 });
//! assert!(buffer.iter().all(|i| i.action_name == number));
//! ```
pub mod char_class;
pub mod context;
pub mod diag;
pub mod instruction;
pub mod lexer;
pub mod parser;
pub mod symtab;
pub mod token;

pub use char_class::{CharClassTable, CharRange};
pub use context::ExprContext;
pub use diag::{Diagnostic, Diagnostics};
pub use instruction::{IndexRange, Instruction, InstructionBuffer, InstructionKind};
pub use lexer::{ExprLexer, LexerStats, TokenSource, TokenVec};
pub use parser::parser_data::TokenID;
pub use parser::{ExprParser, ParserStats};
pub use symtab::{IdKind, SymTab, SymTabError};
pub use token::{ExprToken, LexemeCode, LexemeValue};
