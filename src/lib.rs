//! A tiny interactive shell.
//!
//! One input line goes through a fixed pipeline: [`lexer`] splits it into
//! words honouring quotes and backslashes, [`redirection`] splits off an
//! optional `>`/`>>`/`2>`... target, [`io_adapters`] opens the output sinks,
//! and the [`Interpreter`] runs either a builtin from the [`builtin`]
//! registry or an executable found on `PATH` by [`external`].
//!
//! The read loop itself is [`Interpreter::repl`], built on rustyline.

pub mod builtin;
pub mod cli;
pub mod command;
mod completion;
pub mod env;
pub mod error;
pub mod external;
pub mod io_adapters;
mod interpreter;
pub mod lexer;
pub mod logging;
pub mod redirection;
#[cfg(test)]
mod test_support;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;
