//! Output redirection operators (`>`, `1>`, `2>`, `>>`, `1>>`, `2>>`).

use std::path::PathBuf;

/// Which of the two output streams a redirection replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// How an existing redirection target is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// `>`: the file is truncated (or created).
    Truncate,
    /// `>>`: writes go to the end of the file (which is created if missing).
    Append,
}

/// A single parsed redirection, consumed once by stream setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectionSpec {
    pub target: PathBuf,
    pub stream: OutputStream,
    pub mode: WriteMode,
}

impl RedirectionSpec {
    /// Interprets `op` as a redirection operator targeting `target`.
    ///
    /// Returns `None` if `op` is not one of the recognised operators.
    pub fn from_operator(op: &str, target: impl Into<PathBuf>) -> Option<Self> {
        if !matches!(op, ">" | "1>" | "2>" | ">>" | "1>>" | "2>>") {
            return None;
        }
        let stream = if op.starts_with('2') {
            OutputStream::Stderr
        } else {
            OutputStream::Stdout
        };
        let mode = if op.contains(">>") {
            WriteMode::Append
        } else {
            WriteMode::Truncate
        };
        Some(Self {
            target: target.into(),
            stream,
            mode,
        })
    }
}

/// Splits `tokens` at the first redirection operator that has a target.
///
/// Tokens before the operator are the command; the token right after it is
/// the target and anything past the target is dropped. An operator in last
/// position has no target and stays a plain argument.
pub fn extract(mut tokens: Vec<String>) -> (Vec<String>, Option<RedirectionSpec>) {
    let split = tokens.iter().enumerate().find_map(|(i, token)| {
        let target = tokens.get(i + 1)?;
        RedirectionSpec::from_operator(token, target).map(|spec| (i, spec))
    });

    match split {
        Some((i, spec)) => {
            tokens.truncate(i);
            (tokens, Some(spec))
        }
        None => (tokens, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_operator_returns_tokens_unchanged() {
        let (cmd, spec) = extract(words(&["echo", "a", "b"]));
        assert_eq!(cmd, words(&["echo", "a", "b"]));
        assert_eq!(spec, None);
    }

    #[test]
    fn test_operator_table() {
        let cases = [
            (">", OutputStream::Stdout, WriteMode::Truncate),
            ("1>", OutputStream::Stdout, WriteMode::Truncate),
            ("2>", OutputStream::Stderr, WriteMode::Truncate),
            (">>", OutputStream::Stdout, WriteMode::Append),
            ("1>>", OutputStream::Stdout, WriteMode::Append),
            ("2>>", OutputStream::Stderr, WriteMode::Append),
        ];
        for (op, stream, mode) in cases {
            let (cmd, spec) = extract(words(&["ls", op, "out.txt"]));
            assert_eq!(cmd, words(&["ls"]), "operator {op}");
            assert_eq!(
                spec,
                Some(RedirectionSpec {
                    target: PathBuf::from("out.txt"),
                    stream,
                    mode,
                }),
                "operator {op}"
            );
        }
    }

    #[test]
    fn test_tokens_after_target_are_dropped() {
        let (cmd, spec) = extract(tokenize("echo hi > out.txt extra"));
        assert_eq!(cmd, words(&["echo", "hi"]));
        assert_eq!(spec.map(|s| s.target), Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn test_first_operator_wins() {
        let (cmd, spec) = extract(tokenize("echo hi 2> err.txt > out.txt"));
        assert_eq!(cmd, words(&["echo", "hi"]));
        let spec = spec.expect("redirection expected");
        assert_eq!(spec.target, PathBuf::from("err.txt"));
        assert_eq!(spec.stream, OutputStream::Stderr);
    }

    #[test]
    fn test_trailing_operator_stays_literal() {
        let (cmd, spec) = extract(words(&["echo", "hi", ">"]));
        assert_eq!(cmd, words(&["echo", "hi", ">"]));
        assert_eq!(spec, None);
    }

    #[test]
    fn test_operator_lookalikes_are_arguments() {
        let (cmd, spec) = extract(words(&["echo", "3>", "x", ">>>", "y", "&>", "z"]));
        assert_eq!(cmd.len(), 7);
        assert_eq!(spec, None);
    }

    #[test]
    fn test_redirection_without_command() {
        let (cmd, spec) = extract(words(&[">", "out.txt"]));
        assert!(cmd.is_empty());
        assert!(spec.is_some());
    }
}
