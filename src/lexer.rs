use crate::error::{Kind, ParseError};
use crate::input::Input;
use crate::token::{Position, SourceRegion, Token, TokenKind};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_while},
    character::complete::{anychar, char, one_of, satisfy},
    combinator::{opt, recognize, value},
    error::{ErrorKind, ParseError as NomParseError},
    sequence::pair,
    Err, IResult,
};

/// A scanning failure before the origin name is attached.
#[derive(Debug)]
pub struct LexError {
    region: SourceRegion,
    kind: Kind,
}

impl LexError {
    fn at(position: Position, kind: Kind) -> Self {
        Self {
            region: SourceRegion::char_at(position),
            kind,
        }
    }
}

impl<'a> NomParseError<Input<'a>> for LexError {
    fn from_error_kind(input: Input<'a>, _kind: ErrorKind) -> Self {
        let kind = match input.peek() {
            Some(c) => Kind::UnexpectedCharacter(c),
            None => Kind::UnexpectedEndOfInput,
        };

        Self::at(input.position(), kind)
    }

    fn append(_input: Input<'a>, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

type LexResult<'a, O> = IResult<Input<'a>, O, LexError>;

fn failure<'a, O>(position: Position, kind: Kind) -> LexResult<'a, O> {
    Err(Err::Failure(LexError::at(position, kind)))
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\x0B' | '\x0C')
}

fn is_decimal(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_hex(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn is_octal(c: char) -> bool {
    matches!(c, '0'..='7')
}

fn is_binary(c: char) -> bool {
    matches!(c, '0' | '1')
}

const RADIX_PREFIXES: [(&str, fn(char) -> bool); 3] =
    [("0x", is_hex), ("0o", is_octal), ("0b", is_binary)];

/// Characters that open an identifier, a number or a string.
fn starts_long_token(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-' | '"' | '\'' | '`')
}

fn space(i: Input) -> LexResult<Input> {
    take_while(is_space)(i)
}

fn comment(i: Input) -> LexResult<Input> {
    recognize(pair(char('#'), take_till(|c: char| c == '\n')))(i)
}

fn identifier(i: Input) -> LexResult<Input> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
    ))(i)
}

/// Digits of one alphabet with `_` separators, which are dropped. At least
/// one digit is required.
fn digits<'a>(is_digit: fn(char) -> bool) -> impl FnMut(Input<'a>) -> LexResult<'a, String> {
    move |i: Input<'a>| {
        let (i, raw) = take_while(move |c: char| is_digit(c) || c == '_')(i)?;

        let digits: String = raw.fragment().chars().filter(|&c| c != '_').collect();

        match (digits.is_empty(), i.is_empty()) {
            (true, true) => return failure(i.position(), Kind::UnexpectedEndOfInput),
            (true, false) => return failure(i.position(), Kind::ExpectedDigit),
            _ => {}
        }

        Ok((i, digits))
    }
}

fn whole_part(i: Input) -> LexResult<String> {
    if i.peek() == Some('0') && i.peek_second().is_some_and(|c| is_decimal(c) || c == '_') {
        let (rest, _) = anychar(i)?;

        return failure(rest.position(), Kind::LeadingZeros);
    }

    digits(is_decimal)(i)
}

fn number(i: Input) -> LexResult<Token> {
    let begin = i.position();

    let (mut i, sign) = opt(one_of("+-"))(i)?;

    if sign.is_none() {
        for (prefix, is_digit) in RADIX_PREFIXES {
            if let Ok((rest, _)) = tag::<_, _, LexError>(prefix)(i) {
                let (rest, digits) = digits(is_digit)(rest)?;
                let region = SourceRegion::new(begin, rest.position());

                return Ok((
                    rest,
                    Token::literal(TokenKind::Integer, format!("{prefix}{digits}"), region),
                ));
            }
        }
    }

    let mut lexeme = String::new();
    if sign == Some('-') {
        lexeme.push('-');
    }

    let (rest, whole) = whole_part(i)?;
    lexeme.push_str(&whole);
    i = rest;

    let mut kind = TokenKind::Integer;

    let (rest, dot) = opt(char('.'))(i)?;
    if dot.is_some() {
        let (rest, fraction) = digits(is_decimal)(rest)?;
        lexeme.push('.');
        lexeme.push_str(&fraction);
        kind = TokenKind::Float;
        i = rest;
    }

    let (rest, exponent) = opt(char('e'))(i)?;
    if exponent.is_some() {
        let (rest, sign) = opt(one_of("+-"))(rest)?;
        let (rest, power) = digits(is_decimal)(rest)?;

        lexeme.push('e');
        lexeme.extend(sign);
        lexeme.push_str(&power);
        kind = TokenKind::Float;
        i = rest;
    }

    let region = SourceRegion::new(begin, i.position());

    Ok((i, Token::literal(kind, lexeme, region)))
}

/// A string delimited by `quote`. `\n`, `\r` and `\t` are control characters,
/// any other escaped character stands for itself.
fn quoted<'a>(quote: char) -> impl FnMut(Input<'a>) -> LexResult<'a, String> {
    move |i: Input<'a>| {
        let begin = i.position();
        let unclosed = |_| Err::Failure(LexError::at(begin, Kind::UnclosedString));

        let (mut i, _) = char(quote)(i)?;
        let mut text = String::new();

        loop {
            let (rest, c) = anychar::<_, LexError>(i).map_err(unclosed)?;
            i = rest;

            match c {
                c if c == quote => return Ok((i, text)),
                '\\' => {
                    let (rest, escaped) = anychar::<_, LexError>(i).map_err(unclosed)?;
                    i = rest;

                    text.push(match escaped {
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        other => other,
                    });
                }
                c => text.push(c),
            }
        }
    }
}

fn punctuation(i: Input) -> LexResult<TokenKind> {
    alt((
        value(TokenKind::Equal, char('=')),
        value(TokenKind::Semicolon, char(';')),
        value(TokenKind::Comma, char(',')),
        value(TokenKind::Dot, char('.')),
        value(TokenKind::LeftBracket, char('[')),
        value(TokenKind::RightBracket, char(']')),
        value(TokenKind::LeftBrace, char('{')),
        value(TokenKind::RightBrace, char('}')),
        value(TokenKind::LineBreak, pair(char('\n'), opt(char('\r')))),
    ))(i)
}

struct Lexer<'o> {
    origin: &'o str,
    /// Cleared after an identifier, number or string so that two of them can
    /// never touch. Whitespace and punctuation set it again.
    long_tokens: bool,
}

impl<'o> Lexer<'o> {
    fn new(origin: &'o str) -> Self {
        Self {
            origin,
            long_tokens: true,
        }
    }

    fn run(&mut self, source: &str) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        let start = Input::new(source);
        let mut i = self
            .skip_trivia(start)
            .map_err(|e| self.error(e, start.position()))?;

        while !i.is_empty() {
            let (rest, token) = self.token(i).map_err(|e| self.error(e, i.position()))?;
            tokens.push(token);

            i = self
                .skip_trivia(rest)
                .map_err(|e| self.error(e, rest.position()))?;
        }

        tokens.push(Token::punct(
            TokenKind::EndOfInput,
            SourceRegion::point(i.position()),
        ));

        Ok(tokens)
    }

    /// Skips horizontal whitespace and comments. Line breaks are tokens.
    fn skip_trivia<'a>(&mut self, i: Input<'a>) -> Result<Input<'a>, Err<LexError>> {
        let (mut i, spaces) = space(i)?;
        self.long_tokens |= !spaces.is_empty();

        while let Ok((rest, _)) = comment(i) {
            let (rest, spaces) = space(rest)?;
            self.long_tokens |= !spaces.is_empty();
            i = rest;
        }

        Ok(i)
    }

    fn token<'a>(&mut self, i: Input<'a>) -> LexResult<'a, Token> {
        let begin = i.position();

        if let Some(c) = i.peek().filter(|&c| starts_long_token(c)) {
            if !self.long_tokens {
                return failure(begin, Kind::MissingSeparator(c));
            }

            self.long_tokens = false;

            return match c {
                '"' | '\'' => {
                    let (rest, text) = quoted(c)(i)?;
                    let region = SourceRegion::new(begin, rest.position());

                    Ok((rest, Token::literal(TokenKind::String, text, region)))
                }
                '`' => {
                    let (rest, text) = quoted(c)(i)?;
                    let region = SourceRegion::new(begin, rest.position());

                    Ok((rest, Token::literal(TokenKind::Identifier, text, region)))
                }
                c if c.is_ascii_digit() || c == '+' || c == '-' => number(i),
                _ => {
                    let (rest, name) = identifier(i)?;
                    let region = SourceRegion::new(begin, rest.position());

                    let kind = match name.fragment() {
                        "true" | "false" => TokenKind::Boolean,
                        _ => TokenKind::Identifier,
                    };

                    Ok((rest, Token::literal(kind, name.fragment(), region)))
                }
            };
        }

        let (rest, kind) = punctuation(i)?;
        self.long_tokens = true;

        Ok((rest, Token::punct(kind, SourceRegion::new(begin, rest.position()))))
    }

    fn error(&self, e: Err<LexError>, position: Position) -> ParseError {
        match e {
            Err::Error(e) | Err::Failure(e) => ParseError::new(self.origin, e.region, e.kind),
            Err::Incomplete(_) => ParseError::new(
                self.origin,
                SourceRegion::point(position),
                Kind::UnexpectedEndOfInput,
            ),
        }
    }
}

/// Scans `source` into tokens, always terminated by a single
/// [`TokenKind::EndOfInput`] placed one past the last character.
pub fn lex(source: &str, origin: &str) -> Result<Vec<Token>, ParseError> {
    let tokens = Lexer::new(origin).run(source)?;

    tracing::debug!(origin, tokens = tokens.len(), "lexed source");

    Ok(tokens)
}
