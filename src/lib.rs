#![forbid(unsafe_code)]
#![warn(clippy::all)]
//! This crate compiles a small configuration language into a tree of dynamically typed values.
//!
//! ## The language
//!
//! A document is a list of assignments separated by line breaks or semicolons. Keys can be
//! dotted paths, which create the intermediate objects, and a key path on the right of `=`
//! copies a value that was assigned before:
//!
//! ```text
//! # comments run to the end of the line
//! name = "demo"
//! port = 8080
//! server.host = "0.0.0.0"
//! server.opts = [1, 2, 3]
//! mirror = { host = server.host, port = 0x1F90 }
//! ```
//!
//! ## How to use it ?
//!
//! ```rust
//! use lumen::{parse, Object};
//!
//! let tree = parse("server.port = 8080", "inline", Object::new()).unwrap();
//!
//! let port: u16 = tree["server"].get("port").unwrap().extract().unwrap();
//!
//! assert_eq!(port, 8080);
//! ```
//!
//! Values the program already knows can be handed to the document before it is parsed:
//!
//! ```rust
//! use lumen::{parse, Object, Value};
//!
//! let mut bindings = Object::new();
//! bindings.insert("home".to_string(), Value::from("/home/demo"));
//!
//! let tree = parse("cache = home", "inline", bindings).unwrap();
//!
//! assert_eq!(tree["cache"], "/home/demo");
//! ```
//!
//! ## Errors
//!
//! Parsing stops at the first problem. The error knows where it happened and renders as
//! `in {origin}: {description} (line {line}, column {column})`.

extern crate bytecount;
extern crate memchr;
extern crate nom;
extern crate serde;

mod de;
mod input;
mod ser;

pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod value;

pub use error::{Error, Kind, ParseError, ValueError};
pub use token::{Position, SourceRegion, Token, TokenKind};
pub use value::{Array, Object, Type, Value};

use std::{fs, path::Path};

/// Parses `source` on top of `bindings`. `origin` names the source in errors.
pub fn parse(source: &str, origin: &str, bindings: Object) -> Result<Object, Error> {
    let tokens = lexer::lex(source, origin)?;

    parser::parse_tokens(&tokens, origin, bindings)
}

/// Reads the whole file and parses it, using the path as the origin.
pub fn parse_file(path: impl AsRef<Path>, bindings: Object) -> Result<Object, Error> {
    let path = path.as_ref();

    let source = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse(&source, &path.display().to_string(), bindings)
}
