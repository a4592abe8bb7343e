//! Writable sinks shared by builtins and spawned processes.
//!
//! A sink is something a builtin can `write!` to and that can also be wired
//! into a child process. [`Streams`] owns the pair of sinks for one dispatch
//! cycle; dropping it (or calling [`Streams::release`]) closes any file that
//! was opened for a redirection.

use crate::error::ShellError;
use crate::redirection::{OutputStream, RedirectionSpec, WriteMode};
use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::{self, Result as IoResult, Write};
use std::process::Stdio;
use std::rc::Rc;
use tracing::{debug, warn};

/// How a sink is connected to a child process.
pub enum ChildWiring {
    /// Hand the child this OS-level handle.
    Direct(Stdio),
    /// Pipe the child's output back and write it into the sink afterwards.
    Capture,
}

/// Abstraction over a writable output stream that can also be wired into a
/// spawned process.
pub trait OutputSink: Write {
    /// Produce the wiring for a child's stdout or stderr.
    fn wiring(&self) -> IoResult<ChildWiring>;
}

/// The shell's own standard output.
pub struct InheritedStdout;

impl Write for InheritedStdout {
    fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        io::stdout().write(buf)
    }

    fn flush(&mut self) -> IoResult<()> {
        io::stdout().flush()
    }
}

impl OutputSink for InheritedStdout {
    fn wiring(&self) -> IoResult<ChildWiring> {
        Ok(ChildWiring::Direct(Stdio::inherit()))
    }
}

/// The shell's own standard error.
pub struct InheritedStderr;

impl Write for InheritedStderr {
    fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        io::stderr().write(buf)
    }

    fn flush(&mut self) -> IoResult<()> {
        io::stderr().flush()
    }
}

impl OutputSink for InheritedStderr {
    fn wiring(&self) -> IoResult<ChildWiring> {
        Ok(ChildWiring::Direct(Stdio::inherit()))
    }
}

/// A file opened as a redirection target.
pub struct RedirectFile {
    file: File,
}

impl RedirectFile {
    /// Open `spec.target` for writing, creating it with `rw-r--r--` if needed.
    pub fn open(spec: &RedirectionSpec) -> Result<Self, ShellError> {
        let mut options = OpenOptions::new();
        options.write(true).create(true);
        match spec.mode {
            WriteMode::Truncate => options.truncate(true),
            WriteMode::Append => options.append(true),
        };
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        let file = options
            .open(&spec.target)
            .map_err(|source| ShellError::RedirectionOpen {
                path: spec.target.clone(),
                source,
            })?;
        Ok(Self { file })
    }
}

impl Write for RedirectFile {
    fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> IoResult<()> {
        self.file.flush()
    }
}

impl OutputSink for RedirectFile {
    fn wiring(&self) -> IoResult<ChildWiring> {
        Ok(ChildWiring::Direct(Stdio::from(self.file.try_clone()?)))
    }
}

/// Memory-backed writer for capturing output, mostly from tests.
#[derive(Default)]
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    /// Public constructor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: create writer and return (writer, rc_handle).
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let mw = MemWriter::new();
        let rc = mw.buf.clone();
        (mw, rc)
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

impl OutputSink for MemWriter {
    fn wiring(&self) -> IoResult<ChildWiring> {
        Ok(ChildWiring::Capture)
    }
}

/// The stdout/stderr pair used for one dispatch cycle.
pub struct Streams {
    stdout: Box<dyn OutputSink>,
    stderr: Box<dyn OutputSink>,
}

impl Streams {
    pub fn new(stdout: Box<dyn OutputSink>, stderr: Box<dyn OutputSink>) -> Self {
        Self { stdout, stderr }
    }

    /// The shell's own standard output and error.
    pub fn inherited() -> Self {
        Self::new(Box::new(InheritedStdout), Box::new(InheritedStderr))
    }

    /// Build the streams for a command, applying `redirection` if present.
    ///
    /// If the target cannot be opened the problem is reported on the shell's
    /// real standard error and the command runs with the default streams.
    pub fn setup(redirection: Option<&RedirectionSpec>) -> Self {
        let mut streams = Self::inherited();
        let Some(spec) = redirection else {
            return streams;
        };

        match RedirectFile::open(spec) {
            Ok(file) => {
                debug!(path = %spec.target.display(), stream = ?spec.stream, mode = ?spec.mode, "redirection opened");
                match spec.stream {
                    OutputStream::Stdout => streams.stdout = Box::new(file),
                    OutputStream::Stderr => streams.stderr = Box::new(file),
                }
            }
            Err(e) => {
                warn!(error = %e, "redirection ignored");
                if let Err(write_err) = writeln!(io::stderr(), "{e}") {
                    debug!(error = %write_err, "could not report redirection failure");
                }
            }
        }
        streams
    }

    pub fn stdout(&mut self) -> &mut dyn OutputSink {
        self.stdout.as_mut()
    }

    pub fn stderr(&mut self) -> &mut dyn OutputSink {
        self.stderr.as_mut()
    }

    /// Flush both sinks and close whatever was opened for this cycle.
    pub fn release(mut self) {
        if let Err(e) = self.stdout.flush() {
            debug!(error = %e, "flushing stdout failed");
        }
        if let Err(e) = self.stderr.flush() {
            debug!(error = %e, "flushing stderr failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn spec(target: std::path::PathBuf, stream: OutputStream, mode: WriteMode) -> RedirectionSpec {
        RedirectionSpec {
            target,
            stream,
            mode,
        }
    }

    #[test]
    fn test_mem_writer_collects_bytes() {
        let (mut w, handle) = MemWriter::with_handle();
        write!(w, "hello ").unwrap();
        writeln!(w, "world").unwrap();
        assert_eq!(handle.borrow().as_slice(), b"hello world\n");
        assert!(matches!(w.wiring().unwrap(), ChildWiring::Capture));
    }

    #[test]
    fn test_truncate_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let s = spec(path.clone(), OutputStream::Stdout, WriteMode::Truncate);

        for line in ["first", "second"] {
            let mut f = RedirectFile::open(&s).unwrap();
            writeln!(f, "{line}").unwrap();
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");
    }

    #[test]
    fn test_append_preserves_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let s = spec(path.clone(), OutputStream::Stdout, WriteMode::Append);

        for line in ["first", "second"] {
            let mut f = RedirectFile::open(&s).unwrap();
            writeln!(f, "{line}").unwrap();
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_gets_rw_r_r() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fresh.txt");
        RedirectFile::open(&spec(path.clone(), OutputStream::Stdout, WriteMode::Truncate))
            .unwrap();

        // the process umask can only clear bits
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode & !0o644, 0);
        assert_ne!(mode & 0o600, 0);
    }

    #[test]
    fn test_open_failure_is_redirection_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        let err = RedirectFile::open(&spec(path, OutputStream::Stderr, WriteMode::Append))
            .err()
            .expect("open should fail");
        assert_eq!(err.category(), "RedirectionOpenFailure");
    }

    #[test]
    fn test_setup_without_redirection_is_inherited() {
        let mut streams = Streams::setup(None);
        assert!(matches!(
            streams.stdout().wiring().unwrap(),
            ChildWiring::Direct(_)
        ));
        streams.release();
    }

    #[test]
    fn test_setup_failure_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        let streams = Streams::setup(Some(&spec(
            path.clone(),
            OutputStream::Stdout,
            WriteMode::Truncate,
        )));
        streams.release();
        assert!(!path.exists());
    }

    #[test]
    fn test_setup_replaces_selected_stream() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("err.txt");
        let mut streams = Streams::setup(Some(&spec(
            path.clone(),
            OutputStream::Stderr,
            WriteMode::Truncate,
        )));
        writeln!(streams.stderr(), "oops").unwrap();
        streams.release();
        assert_eq!(fs::read_to_string(&path).unwrap(), "oops\n");
    }
}
