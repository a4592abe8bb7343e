//! Lexical analysis of one input line into an argument vector.
//!
//! Quoting follows the POSIX rules closely enough for interactive use:
//! single quotes keep everything literal, double quotes honour a small set of
//! backslash escapes, and an unquoted backslash escapes any next character.
//! Quotes left open at the end of the line are closed implicitly.

/// Characters a backslash may escape inside double quotes.
const DOUBLE_QUOTE_ESCAPES: &[char] = &['$', '`', '"', '\\', '\n'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Unquoted,
    SingleQuote,
    DoubleQuote,
}

struct LexingFSM {
    input: Vec<char>,
    pos: usize,
    state: LexingState,
    buffer: String,
    tokens: Vec<String>,
}

impl LexingFSM {
    fn new(line: &str) -> Self {
        LexingFSM {
            input: line.chars().collect(),
            pos: 0,
            state: LexingState::Unquoted,
            buffer: String::new(),
            tokens: Vec::new(),
        }
    }

    /// Runs the machine to the end of the input and returns the tokens.
    ///
    /// An open quote at the end of input is not an error: whatever was
    /// collected so far becomes the last token.
    fn make_tokens(mut self) -> Vec<String> {
        while let Some(ch) = self.read_char() {
            match self.state {
                LexingState::Unquoted => self.handle_unquoted(ch),
                LexingState::SingleQuote => self.handle_single_quote(ch),
                LexingState::DoubleQuote => self.handle_double_quote(ch),
            }
        }

        self.finish_token();
        self.tokens
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn handle_unquoted(&mut self, ch: char) {
        match ch {
            '\\' => match self.read_char() {
                Some(escaped) => self.buffer.push(escaped),
                None => self.buffer.push('\\'),
            },
            '\'' => self.state = LexingState::SingleQuote,
            '"' => self.state = LexingState::DoubleQuote,
            ' ' | '\t' => self.finish_token(),
            c => self.buffer.push(c),
        }
    }

    fn handle_single_quote(&mut self, ch: char) {
        match ch {
            '\'' => self.state = LexingState::Unquoted,
            c => self.buffer.push(c),
        }
    }

    fn handle_double_quote(&mut self, ch: char) {
        match ch {
            '"' => self.state = LexingState::Unquoted,
            '\\' => match self.peek_char() {
                Some(next) if DOUBLE_QUOTE_ESCAPES.contains(&next) => {
                    self.read_char();
                    self.buffer.push(next);
                }
                _ => self.buffer.push('\\'),
            },
            c => self.buffer.push(c),
        }
    }

    fn finish_token(&mut self) {
        if !self.buffer.is_empty() {
            self.tokens.push(std::mem::take(&mut self.buffer));
        }
    }
}

/// Splits a raw input line into tokens.
///
/// Empty and whitespace-only input produce no tokens. Runs of spaces and tabs
/// count as a single separator.
pub fn tokenize(line: &str) -> Vec<String> {
    LexingFSM::new(line).make_tokens()
}
