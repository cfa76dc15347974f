//! Command-line interface for lexgen-expr
//!
//! Parses every braced expression in a file into one shared instruction
//! buffer and prints the buffer together with any diagnostics.
//!
//! ```text
//! lexgen-expr parse --input rules.txt --action ident --action number
//! ```
//!
//! Exit status is `0` on success, `2` if the input cannot be processed and
//! `3` if syntax errors were reported.

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use lexgen_expr::{ExprContext, ExprLexer, ExprParser, IdKind};
use std::process::ExitCode;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parses expressions
    Parse {
        /// Input file with braced expressions
        #[arg(short, long)]
        input: String,

        /// Declares an action name (repeatable)
        #[arg(short, long = "action")]
        actions: Vec<String>,

        /// Declares a regular-expression name (repeatable)
        #[arg(short, long = "regexp-name")]
        regexp_names: Vec<String>,
    },
}

fn parse_file(path: &str, actions: &[String], regexp_names: &[String]) -> Result<bool> {
    let text = std::fs::read_to_string(path).with_context(|| format!("can't read {:?}", path))?;

    let mut ctx = ExprContext::new();
    for name in actions {
        ctx.declare_action(name);
    }
    for name in regexp_names {
        ctx.symtab.declare(name, IdKind::RegexpName);
    }

    let mut parser = ExprParser::new(ExprLexer::new(text.chars()));
    let mut n = 0;
    while let Some(range) = parser.try_next(&mut ctx) {
        println!("expression {}: [{}, {}]", n, range.begin, range.end);
        n += 1;
    }
    log::info!("{:?}", parser.stats());

    print!("{}", parser.buffer());
    for diagnostic in ctx.diagnostics.iter() {
        eprintln!("{}", diagnostic);
    }
    Ok(!ctx.diagnostics.has_errors())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Parse {
            input,
            actions,
            regexp_names,
        } => match parse_file(&input, &actions, &regexp_names) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::from(3),
            Err(e) => {
                eprintln!("error: {:#}", e);
                ExitCode::from(2)
            }
        },
    }
}
