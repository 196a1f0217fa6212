use crate::token::{SourceRegion, TokenKind};
use crate::value::Type;
use std::{fmt::Display, io, path::PathBuf};

/// Everything that can go wrong in a document, from a stray character to a
/// reference to a key that was never assigned.
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum Kind {
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
    #[error("expected whitespace or punctuation before {0:?}")]
    MissingSeparator(char),
    #[error("leading zeros are not allowed")]
    LeadingZeros,
    #[error("expected a digit")]
    ExpectedDigit,
    #[error("unclosed string")]
    UnclosedString,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("unexpected {found}; expected {}", list(.expected))]
    UnexpectedToken {
        found: TokenKind,
        expected: Vec<TokenKind>,
    },
    #[error("unexpected {0}; expected a value")]
    ExpectedValue(TokenKind),
    #[error("unclosed array")]
    UnclosedArray,
    #[error("unclosed object")]
    UnclosedObject,
    #[error("key path traverses a non-object: `{0}` is not an object")]
    NotAnObject(String),
    #[error("field `{0}` does not exist")]
    UndefinedKey(String),
    #[error("collections nested deeper than {0} levels")]
    TooDeep(usize),
    #[error("integer literal `{0}` is out of range")]
    IntegerOutOfRange(String),
    #[error("float literal `{0}` is not a finite number")]
    InvalidFloat(String),
}

impl Kind {
    /// Whether the error was raised while scanning characters rather than
    /// while interpreting tokens.
    pub fn is_lexical(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedCharacter(_)
                | Self::MissingSeparator(_)
                | Self::LeadingZeros
                | Self::ExpectedDigit
                | Self::UnclosedString
                | Self::UnexpectedEndOfInput
        )
    }
}

fn list(expected: &[TokenKind]) -> String {
    let mut names = expected.iter().map(|kind| kind.with_article());

    let mut message = names.next().unwrap_or_default().to_string();
    let rest: Vec<_> = names.collect();

    for (index, name) in rest.iter().enumerate() {
        message.push_str(if index == rest.len() - 1 { " or " } else { ", " });
        message.push_str(name);
    }

    message
}

/// A lexical or syntactic error located in a named source.
#[derive(Debug, PartialEq, Clone)]
pub struct ParseError {
    pub origin: String,
    pub region: SourceRegion,
    pub kind: Kind,
}

impl ParseError {
    pub fn new(origin: impl Into<String>, region: SourceRegion, kind: Kind) -> Self {
        Self {
            origin: origin.into(),
            region,
            kind,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "in {}: {} (line {}, column {})",
            self.origin, self.kind, self.region.begin.line, self.region.begin.col
        )
    }
}

impl std::error::Error for ParseError {}

/// A value was asked for a type or shape it does not hold.
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum ValueError {
    #[error("value is undefined; expected {expected}")]
    Undefined { expected: &'static str },
    #[error("value is of type {found}; expected {expected}")]
    Mismatch { expected: &'static str, found: Type },
    #[error("{value} does not fit in {expected}")]
    OutOfRange { value: String, expected: &'static str },
    #[error("key `{0}` does not exist")]
    MissingKey(String),
    #[error("index {index} is out of bounds for an array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("{0}")]
    Custom(String),
}

impl serde::de::Error for ValueError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The caller handed the parser a token stream the lexer could never
    /// produce.
    #[error("malformed token stream: {0}")]
    MalformedTokens(&'static str),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Value(#[from] ValueError),
}

impl Error {
    /// The located error, when the failure comes from the document itself.
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}
