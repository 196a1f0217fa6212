use lumen::{
    lexer::lex,
    parse, parse_file,
    parser::{parse_tokens, MAX_DEPTH},
    Error, Kind, Object, ParseError, Position, SourceRegion, Token, TokenKind, Value,
};

fn tree(source: &str) -> Object {
    parse(source, "test", Object::new()).unwrap()
}

fn parse_error(source: &str) -> ParseError {
    match parse(source, "test", Object::new()) {
        Err(Error::Parse(e)) => e,
        other => panic!("expected a parse error, got {:?}", other),
    }
}

fn located(source: &str) -> (Kind, Position) {
    let e = parse_error(source);

    (e.kind, e.region.begin)
}

mod scalars {
    use super::*;

    #[test]
    fn every_literal_kind() {
        let tree = tree(
            "unsigned = 5\nsigned = -5\nfloat = 1.5\nexp = 2e3\nyes = true\nno = false\ntext = 'hi'",
        );

        assert_eq!(tree["unsigned"], Value::UInt(5));
        assert_eq!(tree["signed"], Value::Int(-5));
        assert_eq!(tree["float"], Value::Float(1.5));
        assert_eq!(tree["exp"], Value::Float(2000.0));
        assert_eq!(tree["yes"], Value::Bool(true));
        assert_eq!(tree["no"], Value::Bool(false));
        assert_eq!(tree["text"], Value::String("hi".to_string()));
    }

    #[test]
    fn radix_literals_are_unsigned() {
        let tree = tree("hex = 0x1F; oct = 0o17; bin = 0b101; big = 0xFFFF_FFFF_FFFF_FFFF");

        assert_eq!(tree["hex"], Value::UInt(31));
        assert_eq!(tree["oct"], Value::UInt(15));
        assert_eq!(tree["bin"], Value::UInt(5));
        assert_eq!(tree["big"], Value::UInt(u64::MAX));
    }

    #[test]
    fn plus_sign_stays_unsigned() {
        assert_eq!(tree("n = +7")["n"], Value::UInt(7));
        assert_eq!(tree("n = -0")["n"], Value::Int(0));
    }

    #[test]
    fn integers_out_of_range() {
        assert_eq!(
            located("n = 18446744073709551616"),
            (
                Kind::IntegerOutOfRange("18446744073709551616".to_string()),
                Position::new(1, 5)
            )
        );
        assert_eq!(
            located("n = -9223372036854775809").0,
            Kind::IntegerOutOfRange("-9223372036854775809".to_string())
        );
        assert_eq!(
            located("n = 0x1_0000_0000_0000_0000").0,
            Kind::IntegerOutOfRange("0x10000000000000000".to_string())
        );
    }

    #[test]
    fn extremes_fit() {
        let tree = tree("max = 18446744073709551615\nmin = -9223372036854775808");

        assert_eq!(tree["max"], Value::UInt(u64::MAX));
        assert_eq!(tree["min"], Value::Int(i64::MIN));
    }

    #[test]
    fn floats_must_be_finite() {
        assert_eq!(tree("z = 0e5")["z"], Value::Float(0.0));
        assert_eq!(tree("big = 1.5e300")["big"], Value::Float(1.5e300));

        assert_eq!(
            located("a = 1e400"),
            (Kind::InvalidFloat("1e400".to_string()), Position::new(1, 5))
        );
        assert_eq!(
            parse_error("a = -2.5e999").to_string(),
            "in test: float literal `-2.5e999` is not a finite number (line 1, column 5)"
        );
    }

    #[test]
    fn string_escapes_survive_parsing() {
        let tree = tree(r#"a = "a\nb"; q = "\q""#);

        assert_eq!(tree["a"], "a\nb");
        assert_eq!(tree["q"], "q");
    }
}

mod key_paths {
    use super::*;

    #[test]
    fn dotted_assignment_creates_objects() {
        let tree = tree("a.b.c = 1");

        let c = tree["a"].get("b").unwrap().get("c").unwrap();

        assert_eq!(c.extract::<u64>().unwrap(), 1);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn dotted_assignment_reuses_objects() {
        let tree = tree("a.b = 1\na.c = 2\na.d.e = 3");

        let a = tree["a"].as_object().unwrap();

        assert_eq!(a.len(), 3);
        assert_eq!(a["b"], 1u64);
        assert_eq!(a["d"].get("e").unwrap(), &Value::UInt(3));
    }

    #[test]
    fn reassignment_replaces() {
        let tree = tree("a.b = 1\na = 'flat'");

        assert_eq!(tree["a"], "flat");
    }

    #[test]
    fn path_through_a_scalar_fails() {
        assert_eq!(
            located("a = 1\na.b = 2"),
            (Kind::NotAnObject("a".to_string()), Position::new(2, 1))
        );
        assert_eq!(
            located("a.b = 1\na.b.c.d = 2"),
            (Kind::NotAnObject("a.b".to_string()), Position::new(2, 3))
        );
    }

    #[test]
    fn backtick_keys() {
        let tree = tree("`my key`.`sub.key` = 1\ncopy = `my key`.`sub.key`");

        assert_eq!(tree["my key"].get("sub.key").unwrap(), &Value::UInt(1));
        assert_eq!(tree["copy"], 1u64);
    }
}

mod references {
    use super::*;

    #[test]
    fn references_are_copies() {
        let tree = tree("a = 1\nb = a\na = 2");

        assert_eq!(tree["a"], 2u64);
        assert_eq!(tree["b"], 1u64);
    }

    #[test]
    fn whole_objects_are_copied() {
        let tree = tree("a.x = 1\nb = a\na.y = 2");

        assert_eq!(tree["b"].as_object().unwrap().len(), 1);
        assert_eq!(tree["a"].as_object().unwrap().len(), 2);
    }

    #[test]
    fn undefined_reference() {
        let e = parse_error("b = a");

        assert_eq!(e.kind, Kind::UndefinedKey("a".to_string()));
        assert_eq!(e.region.begin, Position::new(1, 5));
        assert_eq!(e.to_string(), "in test: field `a` does not exist (line 1, column 5)");
    }

    #[test]
    fn undefined_nested_reference_names_the_path() {
        assert_eq!(
            located("a = {}\nb = a.c"),
            (Kind::UndefinedKey("a.c".to_string()), Position::new(2, 7))
        );
    }

    #[test]
    fn reference_through_a_scalar() {
        assert_eq!(
            located("a = 1\nb = a.c"),
            (Kind::NotAnObject("a".to_string()), Position::new(2, 7))
        );
    }

    #[test]
    fn self_reference_is_undefined() {
        assert_eq!(located("x = x").0, Kind::UndefinedKey("x".to_string()));
    }

    #[test]
    fn references_inside_objects_resolve_from_the_root() {
        let tree = tree("host = 'h'\nmirror = { host = host, port = 1 }");

        assert_eq!(tree["mirror"].get("host").unwrap(), "h");
    }
}

mod collections {
    use super::*;

    fn three() -> Value {
        Value::Array(vec![Value::UInt(1), Value::UInt(2), Value::UInt(3)])
    }

    #[test]
    fn separators_are_interchangeable() {
        assert_eq!(tree("k = [1, 2\n3]")["k"], three());
        assert_eq!(tree("k = [\n1\n2\n3\n]")["k"], three());
        assert_eq!(tree("k = [\n\n1,\n2,\n3\n\n]")["k"], three());
    }

    #[test]
    fn empty_collections() {
        let tree = tree("a = []\no = {}\nb = [\n]");

        assert_eq!(tree["a"], Value::Array(vec![]));
        assert_eq!(tree["o"], Value::Object(Object::new()));
        assert_eq!(tree["b"], Value::Array(vec![]));
    }

    #[test]
    fn nested_collections() {
        let tree = tree("k = [[1], {a = 'x'\nb.c = true}, 'end']");

        let k = tree["k"].as_array().unwrap();

        assert_eq!(k.len(), 3);
        assert_eq!(k[0], Value::Array(vec![Value::UInt(1)]));
        assert_eq!(k[1].get("a").unwrap(), "x");
        assert_eq!(k[1].get("b").unwrap().get("c").unwrap(), &Value::Bool(true));
        assert_eq!(k[2], "end");
    }

    #[test]
    fn trailing_separators_are_accepted() {
        assert_eq!(tree("k = [1, 2, 3,]")["k"], three());
        assert_eq!(tree("k = [1,\n2,\n3,\n]")["k"], three());
        assert_eq!(tree("k = [1,]")["k"], Value::Array(vec![Value::UInt(1)]));

        let tree = tree("o = {a = 1, b = 2,}");
        assert_eq!(tree["o"].as_object().unwrap().len(), 2);
    }

    #[test]
    fn a_lone_separator_is_not_an_element() {
        assert_eq!(
            located("k = [,]").0,
            Kind::ExpectedValue(TokenKind::Comma)
        );
    }

    fn arrays(depth: usize) -> String {
        format!("k = {}{}", "[".repeat(depth), "]".repeat(depth))
    }

    fn objects(depth: usize) -> String {
        format!("k = {}1{}", "{a = ".repeat(depth), "}".repeat(depth))
    }

    #[test]
    fn nesting_up_to_the_limit() {
        let tree = tree(&arrays(MAX_DEPTH));

        let mut inner = &tree["k"];
        for _ in 1..MAX_DEPTH {
            inner = inner.at(0).unwrap();
        }
        assert_eq!(inner, &Value::Array(vec![]));

        assert!(parse(&objects(MAX_DEPTH), "test", Object::new()).is_ok());
    }

    #[test]
    fn nesting_beyond_the_limit() {
        // The first bracket is at column 5
        assert_eq!(
            located(&arrays(MAX_DEPTH + 1)),
            (Kind::TooDeep(MAX_DEPTH), Position::new(1, 5 + MAX_DEPTH))
        );
        assert_eq!(located(&arrays(50_000)).0, Kind::TooDeep(MAX_DEPTH));
        assert_eq!(located(&objects(MAX_DEPTH + 1)).0, Kind::TooDeep(MAX_DEPTH));

        let e = parse_error(&arrays(MAX_DEPTH + 1));
        assert_eq!(
            e.to_string(),
            format!(
                "in test: collections nested deeper than {MAX_DEPTH} levels (line 1, column {})",
                5 + MAX_DEPTH
            )
        );
    }

    #[test]
    fn unclosed_array() {
        assert_eq!(
            located("k = [1, 2"),
            (Kind::UnclosedArray, Position::new(1, 5))
        );
        assert_eq!(located("k = [1, 2\n").0, Kind::UnclosedArray);
        assert_eq!(located("k = [").0, Kind::UnclosedArray);
    }

    #[test]
    fn unclosed_object() {
        assert_eq!(
            located("\nk = {a = 1,\n"),
            (Kind::UnclosedObject, Position::new(2, 5))
        );
    }

    #[test]
    fn elements_need_separators() {
        assert_eq!(
            located("k = [1 2]"),
            (
                Kind::UnexpectedToken {
                    found: TokenKind::Integer,
                    expected: vec![TokenKind::LineBreak, TokenKind::Comma],
                },
                Position::new(1, 8)
            )
        );
    }

    #[test]
    fn object_members_are_assignments() {
        assert_eq!(
            located("k = {1}").0,
            Kind::UnexpectedToken {
                found: TokenKind::Integer,
                expected: vec![TokenKind::Identifier],
            }
        );
    }
}

mod statements {
    use super::*;

    #[test]
    fn separators_and_empty_statements() {
        let tree = tree(";\n\na = 1;;b = 2;\n;\n\nc = 3\n");

        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn empty_document() {
        assert!(tree("").is_empty());
        assert!(tree("# only a comment\n\n").is_empty());
    }

    #[test]
    fn statements_must_be_separated() {
        let e = parse_error("a = 1 b = 2");

        assert_eq!(e.region.begin, Position::new(1, 7));
        assert_eq!(
            e.to_string(),
            "in test: unexpected key; expected an end of line, ';' or an end of input (line 1, column 7)"
        );
    }

    #[test]
    fn missing_value() {
        assert_eq!(
            located("x ="),
            (Kind::ExpectedValue(TokenKind::EndOfInput), Position::new(1, 4))
        );
        assert_eq!(
            parse_error("x = ]").to_string(),
            "in test: unexpected ']'; expected a value (line 1, column 5)"
        );
    }

    #[test]
    fn missing_key() {
        assert_eq!(
            parse_error("= 1").to_string(),
            "in test: unexpected '='; expected a key (line 1, column 1)"
        );
        assert_eq!(
            located("a. = 1").0,
            Kind::UnexpectedToken {
                found: TokenKind::Equal,
                expected: vec![TokenKind::Identifier],
            }
        );
    }

    #[test]
    fn lexical_errors_pass_through() {
        let e = parse_error("n = 007");

        assert_eq!(e.kind, Kind::LeadingZeros);
        assert!(e.kind.is_lexical());
    }

    #[test]
    fn end_to_end() {
        let source = r#"
name = "demo"
port = 8080
server.host = "0.0.0.0"
server.opts = [1, 2, 3]
"#;

        let mut server = Object::new();
        server.insert("host".to_string(), Value::from("0.0.0.0"));
        server.insert("opts".to_string(), Value::from(vec![1u64, 2, 3]));

        let mut expected = Object::new();
        expected.insert("name".to_string(), Value::from("demo"));
        expected.insert("port".to_string(), Value::UInt(8080));
        expected.insert("server".to_string(), Value::Object(server));

        assert_eq!(tree(source), expected);
    }

    #[test]
    fn parsing_is_idempotent() {
        let source = "a.b = [1, {c = -2.5}]\nd = a.b\ne = 'x'";
        let bindings: Object = [("pre".to_string(), Value::from(true))].into_iter().collect();

        assert_eq!(
            parse(source, "test", bindings.clone()).unwrap(),
            parse(source, "test", bindings).unwrap()
        );
    }
}

mod bindings {
    use super::*;

    fn predefined() -> Object {
        let mut bindings = Object::new();
        bindings.insert("home".to_string(), Value::from("/home/demo"));
        bindings.insert("limits".to_string(), [("cpu", 4u64)].into_iter().collect());
        bindings.insert("hole".to_string(), Value::Undefined);

        bindings
    }

    #[test]
    fn bindings_are_visible_and_kept() {
        let tree = parse("cache = home\ncpu = limits.cpu", "test", predefined()).unwrap();

        assert_eq!(tree["cache"], "/home/demo");
        assert_eq!(tree["cpu"], 4u64);
        assert_eq!(tree["home"], "/home/demo");
    }

    #[test]
    fn bindings_can_be_extended_or_overridden() {
        let tree = parse("limits.mem = 8\nhome = '/tmp'", "test", predefined()).unwrap();

        assert_eq!(tree["limits"].as_object().unwrap().len(), 2);
        assert_eq!(tree["home"], "/tmp");
    }

    #[test]
    fn undefined_binding_becomes_an_object() {
        let tree = parse("hole.x = 1", "test", predefined()).unwrap();

        assert_eq!(tree["hole"].get("x").unwrap(), &Value::UInt(1));
    }

    #[test]
    fn scalar_binding_blocks_paths() {
        let e = parse("home.x = 1", "test", predefined()).unwrap_err();

        assert_eq!(
            e.as_parse_error().map(|e| &e.kind),
            Some(&Kind::NotAnObject("home".to_string()))
        );
    }
}

mod token_streams {
    use super::*;

    #[test]
    fn lexed_tokens_can_be_parsed_directly() {
        let tokens = lex("a = 1", "direct").unwrap();

        assert_eq!(
            parse_tokens(&tokens, "direct", Object::new()).unwrap()["a"],
            1u64
        );
    }

    #[test]
    fn missing_end_of_input_is_malformed() {
        let mut tokens = lex("a = 1", "test").unwrap();
        tokens.pop();

        assert!(matches!(
            parse_tokens(&tokens, "test", Object::new()),
            Err(Error::MalformedTokens(_))
        ));
        assert!(matches!(
            parse_tokens(&[], "test", Object::new()),
            Err(Error::MalformedTokens(_))
        ));
    }

    #[test]
    fn literal_without_lexeme_is_malformed() {
        let region = SourceRegion::point(Position::default());
        let tokens = vec![
            Token {
                kind: TokenKind::Identifier,
                region,
                lexeme: None,
            },
            Token::punct(TokenKind::EndOfInput, region),
        ];

        let e = parse_tokens(&tokens, "test", Object::new()).unwrap_err();

        assert!(matches!(e, Error::MalformedTokens(_)));
        assert!(e.as_parse_error().is_none());
    }
}

mod files {
    use super::*;
    use std::{env, fs, process};

    #[test]
    fn parse_file_uses_the_path_as_origin() {
        let path = env::temp_dir().join(format!("lumen-test-{}.lm", process::id()));
        fs::write(&path, "ok = true\nbroken = nope\n").unwrap();

        let e = parse_file(&path, Object::new()).unwrap_err();
        fs::remove_file(&path).unwrap();

        let e = e.as_parse_error().unwrap();
        assert_eq!(e.origin, path.display().to_string());
        assert_eq!(e.region.begin, Position::new(2, 10));
    }

    #[test]
    fn missing_file() {
        let e = parse_file("/definitely/not/here.lm", Object::new()).unwrap_err();

        assert!(matches!(e, Error::Io { .. }));
        assert!(e.to_string().starts_with("failed to read /definitely/not/here.lm"));
    }
}
