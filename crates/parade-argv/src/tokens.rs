//! The consumable token stream over a raw argument vector.
//!
//! Tokens are dequeued explicitly as they are claimed, rather than mutating
//! a shared array in place. Everything after the first `--` is raw
//! positional data: it never matches commands or parameters and is
//! consumable as an argument even when dash-prefixed.

/// How a token may participate in resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An ordinary token: may match a command or parameter.
    Plain,
    /// A value attached with `=`; bindable as an argument, never matched.
    Value,
    /// Data after the `--` marker; also terminates command scanning.
    Raw,
}

/// One argument-vector entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    text: String,
    kind: TokenKind,
}

impl Token {
    fn new(text: String, kind: TokenKind) -> Self {
        Self { text, kind }
    }

    /// The token text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The token's role in resolution.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Whether this token is plain positional data regardless of its text.
    pub fn is_literal(&self) -> bool {
        self.kind != TokenKind::Plain
    }

    /// Whether this token can be matched as a parameter.
    pub(crate) fn is_dash(&self) -> bool {
        self.kind == TokenKind::Plain && self.text.starts_with('-')
    }

    pub(crate) fn into_text(self) -> String {
        self.text
    }
}

/// An ordered, consumable sequence of tokens.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Builds a stream from raw argument strings.
    ///
    /// The first `--` is consumed as the end-of-flags marker; every token
    /// after it is raw data.
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = Vec::new();
        let mut seen_marker = false;
        for arg in argv {
            let arg = arg.into();
            if !seen_marker && arg == "--" {
                seen_marker = true;
                continue;
            }
            let kind = if seen_marker {
                TokenKind::Raw
            } else {
                TokenKind::Plain
            };
            tokens.push(Token::new(arg, kind));
        }
        Self { tokens }
    }

    /// Rewrites special syntax into plain parseable tokens.
    ///
    /// `--key=value` and `-k=value` split once into `key`, `value` (the
    /// value becomes a [`TokenKind::Value`] token). A single-dash token with
    /// more than one trailing character is a cluster of combined short
    /// flags: it splits into one `-c` token per character, with repeated
    /// characters inside the cluster collapsed. Raw tokens pass through
    /// untouched. A second pass is a no-op.
    pub fn expand(&mut self) {
        let mut out = Vec::with_capacity(self.tokens.len());
        for token in self.tokens.drain(..) {
            if token.kind != TokenKind::Plain || !token.text.starts_with('-') {
                out.push(token);
                continue;
            }
            if let Some((key, value)) = token.text.split_once('=') {
                out.push(Token::new(key.to_string(), TokenKind::Plain));
                out.push(Token::new(value.to_string(), TokenKind::Value));
                continue;
            }
            if !token.text.starts_with("--") && token.text.chars().skip(1).take(2).count() > 1 {
                let mut seen = Vec::new();
                for c in token.text[1..].chars() {
                    if seen.contains(&c) {
                        continue;
                    }
                    seen.push(c);
                    out.push(Token::new(format!("-{c}"), TokenKind::Plain));
                }
                continue;
            }
            out.push(token);
        }
        self.tokens = out;
    }

    /// The token at a position.
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Dequeues the token at a position.
    pub fn remove(&mut self, index: usize) -> Token {
        self.tokens.remove(index)
    }

    /// The remaining tokens.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The number of remaining tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the stream has been fully consumed.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The remaining token texts, in order. Mostly useful in tests.
    pub fn texts(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.text()).collect()
    }
}
