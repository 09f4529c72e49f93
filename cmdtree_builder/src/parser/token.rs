use crate::parser::ParseError;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// A quoted string (ex: `"Ada Lovelace"`).
    String,
    /// An option (ex: `--output`, `-o`, `--output=out.txt`).
    Flag,
    /// A bare literal (ex: `build`, `42`, `-7`).
    Etc,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::String => write!(f, "string"),
            TokenKind::Flag => write!(f, "option"),
            TokenKind::Etc => write!(f, "literal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    /// The token exactly as it appears in the input.
    pub(crate) text: String,
    /// The token's value: the text without its quotes.
    pub(crate) value: String,
    /// The byte offset of the token in the input.
    pub(crate) offset: usize,
}

/// Strip the matching quotes around `text`, if it is quoted.
pub(crate) fn unquote(text: &str) -> Option<&str> {
    let mut chars = text.chars();

    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if is_quote(open) && open == close => Some(&text[1..text.len() - 1]),
        _ => None,
    }
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Splits a command line into tokens, one at a time.
///
/// Tokens are separated by whitespace.
/// A token starting with a quote runs to the matching quote (whitespace included).
/// A token starting with `-` is an option, unless the `-` is immediately followed by a digit or `.` (a negative number).
#[derive(Debug)]
pub(crate) struct Tokenizer<'i> {
    input: &'i str,
    cursor: usize,
}

impl<'i> Tokenizer<'i> {
    pub(crate) fn new(input: &'i str) -> Self {
        Self { input, cursor: 0 }
    }

    pub(crate) fn input(&self) -> &'i str {
        self.input
    }

    fn rest(&self) -> &'i str {
        &self.input[self.cursor..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.cursor += rest.len() - rest.trim_start().len();
    }

    /// Whether only whitespace remains.
    pub(crate) fn is_end(&mut self) -> bool {
        self.skip_whitespace();
        self.cursor >= self.input.len()
    }

    /// Read the next token, where `expected` describes what the caller is looking for (for error messages).
    pub(crate) fn read_next(&mut self, expected: &str) -> Result<Token, ParseError> {
        if self.is_end() {
            return Err(ParseError::EndOfInput {
                expected: expected.to_string(),
                offset: self.input.len(),
            });
        }

        let offset = self.cursor;
        let rest = self.rest();
        let mut chars = rest.chars();
        let first = chars
            .next()
            .expect("internal error - a token must have a first character");

        let kind = if is_quote(first) {
            TokenKind::String
        } else if first == '-' && !matches!(chars.next(), Some(c) if c.is_ascii_digit() || c == '.') {
            TokenKind::Flag
        } else {
            TokenKind::Etc
        };

        let length = match kind {
            TokenKind::String => self.quoted_length(offset, first)?,
            TokenKind::Flag => self.option_length(offset)?,
            TokenKind::Etc => rest.find(char::is_whitespace).unwrap_or(rest.len()),
        };

        let text = &rest[..length];
        let value = match kind {
            TokenKind::String => unquote(text).expect("internal error - string token must be quoted"),
            _ => text,
        };
        self.cursor += length;

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Read {kind} token '{text}' at {offset}.");
        }

        Ok(Token {
            kind,
            text: text.to_string(),
            value: value.to_string(),
            offset,
        })
    }

    // The length of a quoted string starting at `start`, including both quotes.
    fn quoted_length(&self, start: usize, quote: char) -> Result<usize, ParseError> {
        let inner = &self.input[start + quote.len_utf8()..];

        match inner.find(quote) {
            Some(index) => Ok(index + 2 * quote.len_utf8()),
            None => Err(ParseError::EndOfInput {
                expected: format!("closing {quote}"),
                offset: self.input.len(),
            }),
        }
    }

    // The length of an option starting at `start`.
    // An inline value may be quoted (ex: `--name="Ada Lovelace"`).
    fn option_length(&self, start: usize) -> Result<usize, ParseError> {
        let rest = &self.input[start..];
        let word = rest.find(char::is_whitespace).unwrap_or(rest.len());

        match rest[..word].find('=') {
            Some(equals) => match rest[equals + 1..].chars().next() {
                Some(quote) if is_quote(quote) => {
                    Ok(equals + 1 + self.quoted_length(start + equals + 1, quote)?)
                }
                _ => Ok(word),
            },
            None => Ok(word),
        }
    }
}
