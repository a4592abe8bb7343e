use crate::builtin::BuiltinRegistry;
use crate::command::{CommandInvocation, Dispatch};
use crate::completion::ShellHelper;
use crate::env::Environment;
use crate::error::ShellError;
use crate::external::ExternalCommand;
use crate::io_adapters::Streams;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Editor, Result};
use std::io::Write;
use tracing::debug;

/// A minimal shell that dispatches input lines to builtins or external
/// programs.
///
/// The interpreter owns an [`Environment`] and an immutable
/// [`BuiltinRegistry`]. Each call to [`Interpreter::execute_line`] is one
/// complete dispatch cycle: tokenize, split off the redirection, set up the
/// streams, run the command and release the streams.
///
/// Example
/// ```
/// use tinysh::Interpreter;
/// let mut sh = Interpreter::default();
/// sh.execute_line("echo hello world");
/// assert!(!sh.should_exit());
/// ```
pub struct Interpreter {
    env: Environment,
    builtins: BuiltinRegistry,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of builtins.
    pub fn new(builtins: BuiltinRegistry, env: Environment) -> Self {
        Self { env, builtins }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn builtins(&self) -> &BuiltinRegistry {
        &self.builtins
    }

    /// Whether `exit` has been run.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Run one input line, writing to the shell's own streams unless the line
    /// redirects one of them.
    pub fn execute_line(&mut self, line: &str) -> Dispatch {
        let Some(invocation) = CommandInvocation::parse(line) else {
            debug!(line, "nothing to run");
            return Dispatch::Empty;
        };
        let streams = Streams::setup(invocation.redirection.as_ref());
        self.execute_invocation(&invocation, streams)
    }

    /// Run a parsed command against `streams` and release them afterwards.
    ///
    /// Failures are written to the stderr sink; nothing escapes the cycle.
    pub fn execute_invocation(
        &mut self,
        invocation: &CommandInvocation,
        mut streams: Streams,
    ) -> Dispatch {
        let outcome = self.dispatch(invocation, &mut streams);
        streams.release();
        debug!(name = %invocation.name, ?outcome, "dispatch finished");
        outcome
    }

    fn dispatch(&mut self, invocation: &CommandInvocation, streams: &mut Streams) -> Dispatch {
        let name = invocation.name.as_str();

        if let Some(builtin) = self.builtins.get(name) {
            debug!(name, "builtin dispatch");
            let res = builtin.execute(&invocation.args, streams, &mut self.env, &self.builtins);
            if let Err(e) = &res {
                report(streams, e);
            }
            return Dispatch::Builtin {
                failed: res.is_err(),
            };
        }

        if let Some(cmd) = ExternalCommand::find(&self.env, name, &invocation.args) {
            debug!(name, "external dispatch");
            return match cmd.execute(streams, &self.env) {
                Ok(status) => Dispatch::External {
                    status: Some(status),
                },
                Err(e) => {
                    report(streams, &e);
                    Dispatch::External { status: None }
                }
            };
        }

        report(streams, &ShellError::CommandNotFound(name.to_string()));
        Dispatch::NotFound
    }

    /// Read-Eval-Print Loop on top of rustyline.
    ///
    /// Stops after `exit` or end of input. Ctrl-C drops the current line.
    pub fn repl(&mut self, prompt: &str) -> Result<()> {
        let mut rl: Editor<ShellHelper, DefaultHistory> = Editor::new()?;
        rl.set_helper(Some(ShellHelper::new(self.builtins.names())));

        while !self.should_exit() {
            match rl.readline(prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line)?;
                    }
                    self.execute_line(line);
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the standard builtins over the process
    /// environment.
    fn default() -> Self {
        Self::new(BuiltinRegistry::default(), Environment::new())
    }
}

fn report(streams: &mut Streams, err: &ShellError) {
    if let Err(e) = writeln!(streams.stderr(), "{err}") {
        debug!(error = %e, "could not report error");
    }
}
