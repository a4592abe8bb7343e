use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::io_adapters::{ChildWiring, Streams};
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, warn};

/// An executable found on the search path, ready to be spawned.
pub struct ExternalCommand {
    name: String,
    path: PathBuf,
    args: Vec<String>,
}

impl ExternalCommand {
    pub fn new(name: impl Into<String>, path: PathBuf, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            path,
            args,
        }
    }

    /// Resolve `name` against the environment's search path.
    pub fn find(env: &Environment, name: &str, args: &[String]) -> Option<Self> {
        let path = resolve(env, name)?;
        Some(Self::new(name, path, args.to_vec()))
    }

    /// Run the program to completion.
    ///
    /// The child sees `name` as its argv[0], inherits the shell's stdin and
    /// writes to the given streams. Only a failure to start the child is an
    /// error; its exit status is returned as-is.
    pub fn execute(self, streams: &mut Streams, env: &Environment) -> Result<ExitStatus> {
        let mut cmd = Command::new(&self.path);
        cmd.args(&self.args)
            .stdin(Stdio::inherit())
            .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        set_arg0(&mut cmd, &self.name);

        let stdout = streams.stdout().wiring()?;
        let stderr = streams.stderr().wiring()?;
        let capture_stdout = matches!(stdout, ChildWiring::Capture);
        let capture_stderr = matches!(stderr, ChildWiring::Capture);
        cmd.stdout(into_stdio(stdout)).stderr(into_stdio(stderr));

        debug!(name = %self.name, path = %self.path.display(), args = ?self.args, "spawning");
        let child = cmd.spawn().map_err(|e| {
            warn!(name = %self.name, error = %e, "launch failed");
            ShellError::LaunchFailure(e)
        })?;

        let output = child.wait_with_output()?;
        if capture_stdout {
            streams.stdout().write_all(&output.stdout)?;
        }
        if capture_stderr {
            streams.stderr().write_all(&output.stderr)?;
        }
        if !output.status.success() {
            debug!(name = %self.name, status = %output.status, "child exited unsuccessfully");
        }
        Ok(output.status)
    }
}

fn into_stdio(wiring: ChildWiring) -> Stdio {
    match wiring {
        ChildWiring::Direct(stdio) => stdio,
        ChildWiring::Capture => Stdio::piped(),
    }
}

#[cfg(unix)]
fn set_arg0(cmd: &mut Command, name: &str) {
    use std::os::unix::process::CommandExt;
    cmd.arg0(name);
}

#[cfg(not(unix))]
fn set_arg0(_cmd: &mut Command, _name: &str) {}

/// Find `name` in the environment's search path.
///
/// Returns `None` when there is no search path or no match. This is
/// recomputed on every call.
pub fn resolve(env: &Environment, name: &str) -> Option<PathBuf> {
    let search_paths = env.search_path()?;
    find_in_path(&search_paths, OsStr::new(name))
}

/// Return the first `dir/cmd` over `search_paths` that is an executable file.
///
/// Directories are tried in order, so earlier entries take precedence.
/// `cmd` is always appended below the directory, even when it starts with a
/// separator, and empty entries are skipped so every match is rooted in a
/// listed directory.
pub fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    let relative: PathBuf = Path::new(cmd)
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    if relative.as_os_str().is_empty() {
        return None;
    }
    std::env::split_paths(search_paths)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(&relative))
        .find(|path| is_executable_file(path))
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(path) {
        Ok(meta) => !meta.is_dir() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|meta| !meta.is_dir())
}
