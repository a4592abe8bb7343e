use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::external;
use crate::io_adapters::Streams;
use std::collections::HashMap;
use std::env as stdenv;
use std::io::Write;
use tracing::debug;

/// Built-in commands known to the shell at compile time.
///
/// Builtins run in-process. They write to the cycle's streams and return
/// failures to the dispatcher instead of printing them.
pub trait BuiltinCommand {
    /// Canonical name of the command, e.g. "echo" or "cd".
    fn name(&self) -> &'static str;

    /// Executes the command with the arguments that followed its name.
    fn execute(
        &self,
        args: &[String],
        streams: &mut Streams,
        env: &mut Environment,
        builtins: &BuiltinRegistry,
    ) -> Result<()>;
}

/// Immutable name-to-builtin table, built once at startup.
pub struct BuiltinRegistry {
    commands: HashMap<&'static str, Box<dyn BuiltinCommand>>,
}

impl BuiltinRegistry {
    pub fn new(commands: Vec<Box<dyn BuiltinCommand>>) -> Self {
        let commands = commands.into_iter().map(|cmd| (cmd.name(), cmd)).collect();
        Self { commands }
    }

    pub fn get(&self, name: &str) -> Option<&dyn BuiltinCommand> {
        self.commands.get(name).map(|cmd| cmd.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for BuiltinRegistry {
    /// The standard builtins: `exit`, `echo`, `type`, `pwd`, `cd`.
    fn default() -> Self {
        Self::new(vec![
            Box::new(Exit),
            Box::new(Echo),
            Box::new(Type),
            Box::new(Pwd),
            Box::new(Cd),
        ])
    }
}

/// Exit shell process. Arguments are ignored and the status is always 0.
pub struct Exit;

impl BuiltinCommand for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn execute(
        &self,
        _args: &[String],
        _streams: &mut Streams,
        env: &mut Environment,
        _builtins: &BuiltinRegistry,
    ) -> Result<()> {
        env.should_exit = true;
        Ok(())
    }
}

/// Write the arguments to standard output, separated by spaces.
pub struct Echo;

impl BuiltinCommand for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn execute(
        &self,
        args: &[String],
        streams: &mut Streams,
        _env: &mut Environment,
        _builtins: &BuiltinRegistry,
    ) -> Result<()> {
        writeln!(streams.stdout(), "{}", args.join(" "))?;
        Ok(())
    }
}

/// Print the current working directory to standard output.
pub struct Pwd;

impl BuiltinCommand for Pwd {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn execute(
        &self,
        _args: &[String],
        streams: &mut Streams,
        _env: &mut Environment,
        _builtins: &BuiltinRegistry,
    ) -> Result<()> {
        let dir = stdenv::current_dir()?;
        writeln!(streams.stdout(), "{}", dir.display())?;
        Ok(())
    }
}

/// Change the current working directory.
///
/// A lone `~` stands for `$HOME`. Without arguments nothing happens.
pub struct Cd;

impl BuiltinCommand for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn execute(
        &self,
        args: &[String],
        _streams: &mut Streams,
        env: &mut Environment,
        _builtins: &BuiltinRegistry,
    ) -> Result<()> {
        let Some(target) = args.first() else {
            return Ok(());
        };
        let target = if target == "~" {
            env.home().unwrap_or_default()
        } else {
            target.clone()
        };

        stdenv::set_current_dir(&target).map_err(|e| {
            debug!(dir = %target, error = %e, "chdir failed");
            ShellError::PathNotFound(target.clone())
        })
    }
}

/// Tell whether a name is a builtin or which executable it resolves to.
pub struct Type;

impl BuiltinCommand for Type {
    fn name(&self) -> &'static str {
        "type"
    }

    fn execute(
        &self,
        args: &[String],
        streams: &mut Streams,
        env: &mut Environment,
        builtins: &BuiltinRegistry,
    ) -> Result<()> {
        let Some(name) = args.first() else {
            return Ok(());
        };

        if builtins.contains(name) {
            writeln!(streams.stdout(), "{name} is a shell builtin")?;
            return Ok(());
        }
        match external::resolve(env, name) {
            Some(path) => {
                writeln!(streams.stdout(), "{name} is {}", path.display())?;
                Ok(())
            }
            None => Err(ShellError::NotFound(name.clone())),
        }
    }
}
