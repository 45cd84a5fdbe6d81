use tracing::trace;

/// How the token under the cursor is to be handled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Token {
    /// A literal `--`; everything after it is a value.
    Escape,
    /// An argument for the open option or the next anonymous option.
    Value(String),
    /// `--name`, possibly with an `=value` still attached.
    Long(String),
    /// `-abc`, to be split into one token per character.
    Bundle,
    /// `-x`. Holds `None` for a lone `-`.
    Short(Option<char>),
}

/// Transient state of one parse: the token buffer, which may be split and
/// spliced in place, the cursor into it, the escape flag, and the option
/// still waiting for its argument.
#[derive(Debug)]
pub(crate) struct ParseState {
    tokens: Vec<String>,
    cursor: usize,
    escaped: bool,
    open: Option<usize>,
}

impl ParseState {
    pub fn new(tokens: Vec<String>) -> ParseState {
        ParseState { tokens, cursor: 0, escaped: false, open: None }
    }

    /// Classify the token under the cursor, `None` once all are consumed.
    pub fn current(&self) -> Option<Token> {
        let token = self.tokens.get(self.cursor)?;
        let token = if self.escaped || !token.starts_with('-') {
            Token::Value(token.clone())
        } else if token == "--" {
            Token::Escape
        } else if token.starts_with("--") {
            Token::Long(token.clone())
        } else if token.chars().count() > 2 {
            Token::Bundle
        } else {
            Token::Short(token.chars().nth(1))
        };
        Some(token)
    }

    pub fn advance(&mut self) {
        self.cursor += 1;
    }

    pub fn escape(&mut self) {
        self.escaped = true;
    }

    pub fn open(&self) -> Option<usize> {
        self.open
    }

    pub fn set_open(&mut self, index: Option<usize>) {
        self.open = index;
    }

    /// Cut the current token at byte offset `at` (an `=`) and insert the
    /// remainder after it as a token of its own. The cursor stays put.
    pub fn split_current(&mut self, at: usize) {
        let token = &mut self.tokens[self.cursor];
        let value = token[at + 1..].to_string();
        token.truncate(at);
        trace!(option = %token, value = %value, "split long option");
        self.tokens.insert(self.cursor + 1, value);
    }

    /// Replace the current `-abc` token with `-a`, `-b`, `-c`. The cursor stays put.
    pub fn expand_current(&mut self) {
        let bundle = self.tokens[self.cursor].clone();
        let expanded: Vec<String> = bundle.chars().skip(1).map(|c| format!("-{}", c)).collect();
        trace!(bundle = %bundle, count = expanded.len(), "expanded short options");
        self.tokens.splice(self.cursor..=self.cursor, expanded);
    }
}
