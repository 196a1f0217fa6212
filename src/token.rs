use std::fmt::Display;

/// A 1-based line and column. Columns count characters, not bytes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// The position one column to the right, used to span single characters.
    pub fn next_col(self) -> Self {
        Self {
            line: self.line,
            col: self.col + 1,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, col: 1 }
    }
}

/// Span covered by a token or an error. `end` is exclusive.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct SourceRegion {
    pub begin: Position,
    pub end: Position,
}

impl SourceRegion {
    pub fn new(begin: Position, end: Position) -> Self {
        Self { begin, end }
    }

    pub fn char_at(position: Position) -> Self {
        Self::new(position, position.next_col())
    }

    pub fn point(position: Position) -> Self {
        Self::new(position, position)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    Equal,
    Semicolon,
    Comma,
    Dot,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Identifier,
    Integer,
    Boolean,
    Float,
    String,
    LineBreak,
    EndOfInput,
}

impl TokenKind {
    /// Kinds that carry a lexeme.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::Identifier | Self::Integer | Self::Boolean | Self::Float | Self::String
        )
    }

    /// Name used after "unexpected".
    pub fn describe(self) -> &'static str {
        match self {
            Self::Equal => "'='",
            Self::Semicolon => "';'",
            Self::Comma => "','",
            Self::Dot => "'.'",
            Self::LeftBracket => "'['",
            Self::RightBracket => "']'",
            Self::LeftBrace => "'{'",
            Self::RightBrace => "'}'",
            Self::Identifier => "key",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Float => "float",
            Self::String => "string",
            Self::LineBreak => "end of line",
            Self::EndOfInput => "end of input",
        }
    }

    /// Name used after "expected".
    pub fn with_article(self) -> &'static str {
        match self {
            Self::Identifier => "a key",
            Self::Integer => "an integer",
            Self::Boolean => "a boolean",
            Self::Float => "a float",
            Self::String => "a string",
            Self::LineBreak => "an end of line",
            Self::EndOfInput => "an end of input",
            punctuation => punctuation.describe(),
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub region: SourceRegion,
    pub lexeme: Option<String>,
}

impl Token {
    /// A structural token. Never carries a lexeme.
    pub fn punct(kind: TokenKind, region: SourceRegion) -> Self {
        debug_assert!(!kind.is_literal(), "{kind} must carry a lexeme");

        Self {
            kind,
            region,
            lexeme: None,
        }
    }

    /// An identifier or literal token with its decoded text.
    pub fn literal(kind: TokenKind, lexeme: impl Into<String>, region: SourceRegion) -> Self {
        debug_assert!(kind.is_literal(), "{kind} cannot carry a lexeme");

        Self {
            kind,
            region,
            lexeme: Some(lexeme.into()),
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
