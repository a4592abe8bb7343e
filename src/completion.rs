//! TAB completion of builtin names for the rustyline editor.

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper, Result};

/// Editor helper that completes the command word to a builtin name.
pub struct ShellHelper {
    builtins: Vec<&'static str>,
}

impl ShellHelper {
    pub fn new(builtins: Vec<&'static str>) -> Self {
        Self { builtins }
    }

    /// Completion for the text left of the cursor.
    ///
    /// Only the first word is completed, and only when exactly one builtin
    /// matches. The replacement ends with a space so the user can go on
    /// typing arguments.
    fn candidates(&self, before_cursor: &str) -> (usize, Vec<Pair>) {
        let start = before_cursor.len() - before_cursor.trim_start().len();
        let partial = &before_cursor[start..];
        if partial.contains([' ', '\t']) {
            return (start, Vec::new());
        }

        let mut matches = self.builtins.iter().filter(|name| name.starts_with(partial));
        match (matches.next(), matches.next()) {
            (Some(name), None) => (start, vec![Pair {
                display: name.to_string(),
                replacement: format!("{name} "),
            }]),
            _ => (start, Vec::new()),
        }
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(&line[..pos]))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::BuiltinRegistry;

    fn helper() -> ShellHelper {
        ShellHelper::new(BuiltinRegistry::default().names())
    }

    fn replacements(before_cursor: &str) -> Vec<String> {
        helper()
            .candidates(before_cursor)
            .1
            .into_iter()
            .map(|p| p.replacement)
            .collect()
    }

    #[test]
    fn unique_prefix_completes_with_space() {
        assert_eq!(replacements("ech"), vec!["echo "]);
        assert_eq!(replacements("ex"), vec!["exit "]);
        assert_eq!(replacements("ty"), vec!["type "]);
    }

    #[test]
    fn ambiguous_or_unknown_prefix_is_left_alone() {
        assert!(replacements("e").is_empty());
        assert!(replacements("").is_empty());
        assert!(replacements("zz").is_empty());
    }

    #[test]
    fn full_name_still_gets_space() {
        assert_eq!(replacements("pwd"), vec!["pwd "]);
    }

    #[test]
    fn arguments_are_not_completed() {
        assert!(replacements("echo ec").is_empty());
    }

    #[test]
    fn leading_whitespace_is_skipped() {
        let (start, pairs) = helper().candidates("  ech");
        assert_eq!(start, 2);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].display, "echo");
    }
}
