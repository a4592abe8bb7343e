use std::collections::HashMap;
use std::env as stdenv;
use std::ffi::OsString;

/// User-level view of the process environment used by the interpreter.
///
/// The environment contains:
/// - `vars`: overrides layered on top of the process environment. They win
///   over process variables on lookup and are passed to executed commands.
/// - `should_exit`: set by `exit`; the read loop stops once the current
///   dispatch cycle has finished.
///
/// Lookups that miss `vars` read the live process environment, so changes to
/// it between dispatches are observed.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Key-value overrides (e.g., PATH, HOME). The shell itself never sets
    /// them; they let an embedding program or a test give the interpreter
    /// its own search path or home directory without touching the process
    /// environment.
    pub vars: HashMap<String, String>,
    /// When set to true, indicates that the interactive loop should exit.
    pub should_exit: bool,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of an environment variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to `std::env::var`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    /// Set or override an environment variable in `self.vars`.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// The raw search path, if any.
    pub fn search_path(&self) -> Option<OsString> {
        match self.vars.get("PATH") {
            Some(path) => Some(OsString::from(path)),
            None => stdenv::var_os("PATH"),
        }
    }

    /// The home directory used for `~` expansion.
    pub fn home(&self) -> Option<String> {
        self.get_var("HOME")
    }
}
