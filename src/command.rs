use crate::lexer;
use crate::redirection::{self, RedirectionSpec};
use std::process::ExitStatus;

/// One parsed input line: the command name, its arguments and at most one
/// redirection. Lives for exactly one dispatch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub name: String,
    pub args: Vec<String>,
    pub redirection: Option<RedirectionSpec>,
}

impl CommandInvocation {
    /// Tokenize `line` and split off its redirection.
    ///
    /// Returns `None` when there is no command to run, which includes a line
    /// holding nothing but a redirection.
    pub fn parse(line: &str) -> Option<Self> {
        let (mut tokens, redirection) = redirection::extract(lexer::tokenize(line));
        if tokens.is_empty() {
            return None;
        }
        let name = tokens.remove(0);
        Some(Self {
            name,
            args: tokens,
            redirection,
        })
    }
}

/// Which branch a dispatch cycle took.
#[derive(Debug)]
pub enum Dispatch {
    /// Nothing to run.
    Empty,
    /// A builtin ran; `failed` tells whether it reported an error.
    Builtin { failed: bool },
    /// An external program ran. `status` is `None` if it could not be launched.
    External { status: Option<ExitStatus> },
    /// Neither a builtin nor an executable on the search path.
    NotFound,
}
