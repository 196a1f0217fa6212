use crate::error::{Error, Kind, ParseError};
use crate::token::{Token, TokenKind};
use crate::value::{Array, Object, Value};

pub type Result<T> = std::result::Result<T, Error>;

/// Arrays and objects nested deeper than this are rejected.
pub const MAX_DEPTH: usize = 64;

struct Parser<'t> {
    tokens: &'t [Token],
    at: usize,
    origin: &'t str,
    root: Object,
    depth: usize,
}

fn dotted(path: &[&Token]) -> String {
    path.iter()
        .map(|token| token.lexeme.as_deref().unwrap_or_default())
        .collect::<Vec<_>>()
        .join(".")
}

impl<'t> Parser<'t> {
    fn current(&self) -> &'t Token {
        let tokens = self.tokens;
        &tokens[self.at]
    }

    fn at_end(&self) -> bool {
        self.current().is(TokenKind::EndOfInput)
    }

    /// Moves past the current token. The final end of input is never passed.
    fn eat(&mut self) -> &'t Token {
        let token = self.current();

        if self.at + 1 < self.tokens.len() {
            self.at += 1;
        }

        token
    }

    fn error(&self, token: &Token, kind: Kind) -> Error {
        Error::Parse(ParseError::new(self.origin, token.region, kind))
    }

    fn expect(&mut self, expected: &[TokenKind]) -> Result<&'t Token> {
        let token = self.eat();

        if expected.contains(&token.kind) {
            return Ok(token);
        }

        Err(self.error(
            token,
            Kind::UnexpectedToken {
                found: token.kind,
                expected: expected.to_vec(),
            },
        ))
    }

    fn skip_line_breaks(&mut self) {
        while self.current().is(TokenKind::LineBreak) {
            self.eat();
        }
    }

    fn lexeme<'a>(&self, token: &'a Token) -> Result<&'a str> {
        token
            .lexeme
            .as_deref()
            .ok_or(Error::MalformedTokens("literal token without a lexeme"))
    }

    fn key_path(&mut self) -> Result<Vec<&'t Token>> {
        let mut path = vec![self.expect(&[TokenKind::Identifier])?];

        while self.current().is(TokenKind::Dot) {
            self.eat();
            path.push(self.expect(&[TokenKind::Identifier])?);
        }

        for segment in &path {
            self.lexeme(segment)?;
        }

        Ok(path)
    }

    /// Rejects a path that would have to pass through an existing non-object.
    fn check_writable(&self, target: &Object, path: &[&'t Token]) -> Result<()> {
        let mut object = target;

        for (depth, segment) in path[..path.len() - 1].iter().enumerate() {
            match object.get(self.lexeme(segment)?) {
                None | Some(Value::Undefined) => return Ok(()),
                Some(Value::Object(inner)) => object = inner,
                Some(_) => {
                    return Err(self.error(segment, Kind::NotAnObject(dotted(&path[..=depth]))))
                }
            }
        }

        Ok(())
    }

    /// The slot a key path names, creating missing objects on the way.
    fn slot<'o>(&self, target: &'o mut Object, path: &[&'t Token]) -> Result<&'o mut Value> {
        let (last, parents) = path
            .split_last()
            .ok_or(Error::MalformedTokens("empty key path"))?;

        let mut object = target;

        for (depth, segment) in parents.iter().enumerate() {
            let entry = object.entry(self.lexeme(segment)?.to_string()).or_default();

            object = entry
                .as_object_mut()
                .map_err(|_| self.error(segment, Kind::NotAnObject(dotted(&path[..=depth]))))?;
        }

        Ok(object.entry(self.lexeme(last)?.to_string()).or_default())
    }

    /// Copies the value a key path names. Nothing is created.
    fn lookup(&self, path: &[&'t Token]) -> Result<Value> {
        let mut object = &self.root;
        let mut found: Option<&Value> = None;

        for (depth, segment) in path.iter().enumerate() {
            if let Some(parent) = found {
                object = match parent {
                    Value::Object(inner) => inner,
                    _ => {
                        return Err(
                            self.error(segment, Kind::NotAnObject(dotted(&path[..depth])))
                        )
                    }
                };
            }

            found = Some(object.get(self.lexeme(segment)?).ok_or_else(|| {
                self.error(segment, Kind::UndefinedKey(dotted(&path[..=depth])))
            })?);
        }

        found
            .cloned()
            .ok_or(Error::MalformedTokens("empty key path"))
    }

    fn integer(&self, token: &'t Token) -> Result<Value> {
        let lexeme = self.lexeme(token)?;
        let out_of_range = |_| self.error(token, Kind::IntegerOutOfRange(lexeme.to_string()));

        if lexeme.starts_with('-') {
            return lexeme.parse().map(Value::Int).map_err(out_of_range);
        }

        let radix = match lexeme.get(..2) {
            Some("0x") => 16,
            Some("0o") => 8,
            Some("0b") => 2,
            _ => return lexeme.parse().map(Value::UInt).map_err(out_of_range),
        };

        u64::from_str_radix(&lexeme[2..], radix)
            .map(Value::UInt)
            .map_err(out_of_range)
    }

    fn value(&mut self) -> Result<Value> {
        let token = self.current();

        match token.kind {
            TokenKind::LeftBracket => self.nested(Self::array).map(Value::Array),
            TokenKind::LeftBrace => self.nested(Self::object).map(Value::Object),
            TokenKind::Identifier => {
                let path = self.key_path()?;
                self.lookup(&path)
            }
            TokenKind::Integer => {
                self.eat();
                self.integer(token)
            }
            TokenKind::Boolean => {
                self.eat();
                Ok(Value::Bool(self.lexeme(token)? == "true"))
            }
            TokenKind::Float => {
                self.eat();
                let lexeme = self.lexeme(token)?;

                match lexeme.parse::<f64>() {
                    Ok(n) if n.is_finite() => Ok(Value::Float(n)),
                    _ => Err(self.error(token, Kind::InvalidFloat(lexeme.to_string()))),
                }
            }
            TokenKind::String => {
                self.eat();
                Ok(Value::String(self.lexeme(token)?.to_string()))
            }
            kind => Err(self.error(token, Kind::ExpectedValue(kind))),
        }
    }

    /// Runs `parse` on the collection opening at the current token, one level deeper.
    fn nested<T>(&mut self, parse: fn(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth == MAX_DEPTH {
            return Err(self.error(self.current(), Kind::TooDeep(MAX_DEPTH)));
        }

        self.depth += 1;
        let parsed = parse(self);
        self.depth -= 1;

        parsed
    }

    fn array(&mut self) -> Result<Array> {
        let open = self.expect(&[TokenKind::LeftBracket])?;
        let mut array = Array::new();

        loop {
            self.skip_line_breaks();

            if self.at_end() {
                return Err(self.error(open, Kind::UnclosedArray));
            }

            if self.current().is(TokenKind::RightBracket) {
                break;
            }

            array.push(self.value()?);

            if self.current().is(TokenKind::RightBracket) {
                break;
            }

            if self.at_end() {
                return Err(self.error(open, Kind::UnclosedArray));
            }

            self.expect(&[TokenKind::LineBreak, TokenKind::Comma])?;
        }

        self.eat();

        Ok(array)
    }

    fn object(&mut self) -> Result<Object> {
        let open = self.expect(&[TokenKind::LeftBrace])?;
        let mut object = Object::new();

        loop {
            self.skip_line_breaks();

            if self.at_end() {
                return Err(self.error(open, Kind::UnclosedObject));
            }

            if self.current().is(TokenKind::RightBrace) {
                break;
            }

            self.assignment(Some(&mut object))?;

            if self.current().is(TokenKind::RightBrace) {
                break;
            }

            if self.at_end() {
                return Err(self.error(open, Kind::UnclosedObject));
            }

            self.expect(&[TokenKind::LineBreak, TokenKind::Comma])?;
        }

        self.eat();

        Ok(object)
    }

    /// `key.path = value` into `target`, or into the document root when
    /// `target` is `None`. References on the right always resolve from the
    /// root.
    fn assignment(&mut self, mut target: Option<&mut Object>) -> Result<()> {
        let path = self.key_path()?;
        self.check_writable(target.as_deref().unwrap_or(&self.root), &path)?;

        self.expect(&[TokenKind::Equal])?;
        let value = self.value()?;

        match target.as_deref_mut() {
            Some(object) => *self.slot(object, &path)? = value,
            None => {
                let mut root = std::mem::take(&mut self.root);
                let assigned = self.slot(&mut root, &path).map(|slot| *slot = value);
                self.root = root;
                assigned?;

                tracing::trace!(key = %dotted(&path), "assigned");
            }
        }

        Ok(())
    }

    fn document(&mut self) -> Result<usize> {
        let mut statements = 0;

        self.skip_line_breaks();

        while !self.at_end() {
            if self.current().is(TokenKind::Semicolon) {
                self.eat();
                self.skip_line_breaks();

                continue;
            }

            self.assignment(None)?;
            statements += 1;

            if self.at_end() {
                break;
            }

            self.expect(&[
                TokenKind::LineBreak,
                TokenKind::Semicolon,
                TokenKind::EndOfInput,
            ])?;

            self.skip_line_breaks();
        }

        Ok(statements)
    }
}

/// Builds the tree a token stream describes, starting from `bindings`.
///
/// `tokens` must end with exactly one [`TokenKind::EndOfInput`], as produced
/// by [`crate::lexer::lex`]; anything else is reported as
/// [`Error::MalformedTokens`].
pub fn parse_tokens(tokens: &[Token], origin: &str, bindings: Object) -> Result<Object> {
    match tokens.last() {
        Some(last) if last.is(TokenKind::EndOfInput) => {}
        _ => return Err(Error::MalformedTokens("expected an end of input at the end")),
    }

    let mut parser = Parser {
        tokens,
        at: 0,
        origin,
        root: bindings,
        depth: 0,
    };

    let statements = parser.document()?;

    tracing::debug!(origin, statements, "parsed document");

    Ok(parser.root)
}
