use anyhow::Result;
use canonsexpr::parse::{decode_transport, parse, parse_canonical, parse_exact,
                        parse_with, ParseError, RadixFault};
use canonsexpr::settings::{Settings, CANONICAL_SETTINGS, DEFAULT_SETTINGS};
use canonsexpr::value::{atom, hinted, Atom, Value};

fn list(vals: Vec<Value>) -> Value {
    Value::List(vals)
}

#[track_caller]
fn assert_packed(input: &str, expected: &[u8]) {
    let (v, rest) = parse(input.as_bytes())
        .unwrap_or_else(|e| panic!("could not parse {:?}: {}", input, e));
    assert!(rest.is_empty(), "remaining input after {:?}: {:?}", input, rest);
    assert_eq!(v.to_canonical(), expected,
               "canonical form of {:?}: {:?}", input,
               String::from_utf8_lossy(&v.to_canonical()));
}

#[track_caller]
fn parse_err(input: &[u8]) -> ParseError {
    match parse(input) {
        Ok((v, rest)) => panic!("parsing {:?} should have failed, got {} and {:?}",
                                String::from_utf8_lossy(input), v, rest),
        Err(e) => e.err,
    }
}

#[test]
fn parse_table() {
    assert_packed("()", b"()");
    assert_packed("([text]test)", b"([4:text]4:test)");
    assert_packed("(4:test3:foo(baz))", b"(4:test3:foo(3:baz))");
    assert_packed("testing", b"7:testing");
    assert_packed("\"testing-foo bar\"", b"15:testing-foo bar");
    assert_packed("(\"testing-foo bar\")", b"(15:testing-foo bar)");
    assert_packed("(testing-foo\" bar\")", b"(11:testing-foo4: bar)");
    assert_packed(
        "([foo/bar]#7a # [\"quux beam\"]bar ([jim]|Zm9vYmFy YmF6|)\"foo bar\\r\"{Zm9vYmFyYmF6})",
        b"([7:foo/bar]1:z[9:quux beam]3:bar([3:jim]9:foobarbaz)8:foo bar\r9:foobarbaz)");
}

#[test]
fn empty_list() -> Result<()> {
    let (v, rest) = parse(b"()")?;
    assert_eq!(v, list(vec![]));
    assert!(v.is_list());
    assert!(rest.is_empty());
    Ok(())
}

#[test]
fn remainder_is_returned() -> Result<()> {
    let (v, rest) = parse(b"3:foo3:bar")?;
    assert_eq!(v, atom("foo"));
    assert_eq!(rest, b"3:bar");
    let (v, rest) = parse(b"  (a b) tail")?;
    assert_eq!(v, list(vec![atom("a"), atom("b")]));
    assert_eq!(rest, b" tail");
    Ok(())
}

#[test]
fn atom_pack() {
    assert_eq!(atom("This is a test").to_canonical(), b"14:This is a test");
    assert_eq!(list(vec![atom("This is a test")]).to_canonical(),
               b"(14:This is a test)");
    assert_eq!(atom("foo").to_canonical(), b"3:foo");
    assert_eq!(hinted("text/plain", "bar").to_canonical(), b"[10:text/plain]3:bar");
}

#[test]
fn list_pack() -> Result<()> {
    let l = list(vec![atom("foo"),
                      list(vec![hinted("text/plain", "bar baz"),
                                hinted("\n", "")])]);
    assert_eq!(l.to_canonical(), b"(3:foo([10:text/plain]7:bar baz[1:\n]0:))");
    let (read_back, _) = parse(l.to_string().as_bytes())?;
    assert_eq!(read_back, l);
    Ok(())
}

#[test]
fn advanced_form() -> Result<()> {
    let mut foo = Atom::new("foo");
    assert_eq!(foo.to_string(), "foo");
    foo.value = b"bar baz".to_vec();
    assert_eq!(foo.to_string(), "\"bar baz\"");
    foo.value = b"bar\nbaz".to_vec();
    assert_eq!(foo.to_string(), "\"bar\\nbaz\"");
    foo.value = vec![0, 1, 2, 3];
    assert_eq!(foo.to_string(), "|AAECAw==|");

    let l = list(vec![atom("foo"),
                      list(vec![hinted("text/plain", "bar baz"),
                                hinted(vec![1, 2, 3], "")])]);
    assert_eq!(l.to_string(), "(foo ([text/plain]\"bar baz\" [|AQID|]\"\"))");
    assert_eq!(l.to_advanced(), l.to_string());
    let (read_back, _) = parse(l.to_string().as_bytes())?;
    assert_eq!(read_back, l);
    Ok(())
}

#[test]
fn advanced_form_avoids_ambiguous_tokens() -> Result<()> {
    for s in ["123", "1abc", ":x", "a b", "", "\"", "\\", "'", "a\tb\x0b"] {
        let v = atom(s);
        let printed = v.to_string();
        let (read_back, rest) = parse(printed.as_bytes())?;
        assert_eq!(read_back, v, "{:?} printed as {}", s, v);
        assert!(rest.is_empty());
    }
    assert_eq!(atom("123").to_string(), "\"123\"");
    assert_eq!(atom(":x").to_string(), "\":x\"");
    assert_eq!(atom("a:b").to_string(), "a:b");
    Ok(())
}

#[test]
fn transport() -> Result<()> {
    let l = list(vec![atom("foo"), atom("bar"), hinted("bin", "baz quux")]);
    let t = l.to_transport();
    assert_eq!(t, "{KDM6Zm9vMzpiYXJbMzpiaW5dODpiYXogcXV1eCk=}");
    let (direct, rest) = parse(t.as_bytes())?;
    assert!(rest.is_empty());
    let (packed, _) = parse(b"(3:foo3:bar[3:bin]8:baz quux)")?;
    assert_eq!(direct, packed);
    assert_eq!(direct, l);
    let canonical = decode_transport(t.as_bytes())?;
    assert_eq!(canonical, b"(3:foo3:bar[3:bin]8:baz quux)");
    assert_eq!(parse_canonical(&canonical)?, l);
    Ok(())
}

#[test]
fn transport_errors() {
    assert!(matches!(parse_err(b"{KDM6Zm9v"), ParseError::UnterminatedString('}')));
    // "3:foo3:bar": one value plus trailing bytes
    assert!(matches!(parse_err(b"{Mzpmb28zOmJhcg==}"), ParseError::TrailingBytes(5)));
    // "(3:foo": unterminated list inside
    assert!(matches!(parse_err(b"{KDM6Zm9v}"), ParseError::UnterminatedList));
    assert!(matches!(decode_transport(b"KDM6Zm9v").unwrap_err().err,
                     ParseError::UnexpectedCharacter(b'K')));
    assert!(matches!(decode_transport(b"{KCk=} ").unwrap_err().err,
                     ParseError::TrailingBytes(1)));
}

#[test]
fn unterminated_list() {
    assert!(matches!(parse_err(b"((a)"), ParseError::UnterminatedList));
    assert!(matches!(parse_err(b"("), ParseError::UnterminatedList));
    assert!(matches!(parse_err(b"(a b "), ParseError::UnterminatedList));
}

#[test]
fn unterminated_list_position() {
    let e = parse(b"(a\n (b)").unwrap_err();
    assert!(matches!(e.err, ParseError::UnterminatedList));
    assert_eq!(e.pos.offset, 0);
    assert_eq!(e.to_string(),
               "premature EOF while expecting closing character ')' for list starting @1.0");
}

#[test]
fn string_errors() {
    assert!(matches!(parse_err(b":abc"), ParseError::UnspecifiedLength));
    assert!(matches!(parse_err(b"7:foobar"), ParseError::UnterminatedString(':')));
    assert!(matches!(parse_err(b"2#616263#"),
                     ParseError::LengthMismatch { explicit: 2, actual: 3 }));
    assert!(matches!(parse_err(b"4\"abc\""),
                     ParseError::LengthMismatch { explicit: 4, actual: 3 }));
    assert!(matches!(parse_err(b"2abc"),
                     ParseError::LengthMismatch { explicit: 2, actual: 3 }));
    assert!(matches!(parse_err(b"#6x#"),
                     ParseError::InvalidRadixDigit('#', RadixFault::Digit(b'x'))));
    assert!(matches!(parse_err(b"|Y2Jh!|"),
                     ParseError::InvalidRadixDigit('|', RadixFault::Digit(b'!'))));
    assert!(matches!(parse_err(b"\"a\\qb\""), ParseError::UnrecognizedEscape(b'q')));
    assert!(matches!(parse_err(b"\"abc"), ParseError::UnterminatedString('"')));
    assert!(matches!(parse_err(b"[abc"), ParseError::UnterminatedString('[')));
    assert!(matches!(parse_err(b"[abc)def"), ParseError::UnexpectedCharacter(b')')));
    assert!(matches!(parse_err(b"12"), ParseError::UnexpectedEof));
}

#[test]
fn unexpected_character() {
    let e = parse(b"(a \x01)").unwrap_err();
    assert!(matches!(e.err, ParseError::UnexpectedCharacter(1)));
    assert_eq!(e.pos.offset, 3);
    assert_eq!(e.to_string(), "unexpected character '\\x01' @1.3");
    assert!(matches!(parse_err(b")"), ParseError::UnexpectedCharacter(b')')));
    assert!(matches!(parse_err(b"[a][b]c"), ParseError::UnexpectedCharacter(b'[')));
    assert!(matches!(parse_err(b""), ParseError::UnexpectedEof));
    assert!(matches!(parse_err(b"  \n"), ParseError::UnexpectedEof));
}

#[test]
fn nesting_limit() -> Result<()> {
    let settings = Settings { depth_fuel: 3, ..DEFAULT_SETTINGS };
    let (v, _) = parse_with(b"(((a)))", &settings)?;
    assert_eq!(v, list(vec![list(vec![list(vec![atom("a")])])]));
    let e = parse_with(b"((((a))))", &settings).unwrap_err();
    assert!(matches!(e.err, ParseError::NestingTooDeep));
    assert_eq!(e.pos.offset, 3);

    // Transport payloads count as a level, too
    let e = parse_with(b"(({KCk=}))", &settings).unwrap_err();
    assert!(matches!(e.err, ParseError::NestingTooDeep));

    // Way past the default limit: an error, not a stack overflow
    let deep = [vec![b'('; 100_000], vec![b')'; 100_000]].concat();
    assert!(matches!(parse_err(&deep), ParseError::NestingTooDeep));
    Ok(())
}

#[test]
fn canonical_only() -> Result<()> {
    let v = parse_canonical(b"(3:foo[4:text]3:bar())")?;
    assert_eq!(v, list(vec![atom("foo"), hinted("text", "bar"), list(vec![])]));
    for (input, check) in [
        (&b"(3:foo 3:bar)"[..], "space"),
        (b"foo", "token"),
        (b"#616263#", "hex"),
        (b"{KCk=}", "transport"),
        (b"03:foo", "leading zero"),
        (b"[0:]3:foo", "empty hint"),
        (b"3:foo3:bar", "trailing"),
        (b"(3:foo", "unterminated"),
    ] {
        assert!(parse_canonical(input).is_err(), "{} accepted", check);
    }
    assert!(matches!(parse_canonical(b"03:foo").unwrap_err().err,
                     ParseError::NonCanonical(_)));
    assert!(matches!(parse_canonical(b"3:foo3:bar").unwrap_err().err,
                     ParseError::TrailingBytes(5)));
    // The same, non-strict, gives the first value
    let (v, rest) = parse_with(b"3:foo3:bar", &CANONICAL_SETTINGS)?;
    assert_eq!(v, atom("foo"));
    assert_eq!(rest, b"3:bar");
    Ok(())
}

#[test]
fn exact() -> Result<()> {
    assert_eq!(parse_exact(b" (a b)\n", &DEFAULT_SETTINGS)?,
               list(vec![atom("a"), atom("b")]));
    assert!(matches!(parse_exact(b"(a b) c", &DEFAULT_SETTINGS).unwrap_err().err,
                     ParseError::TrailingBytes(1)));
    Ok(())
}

#[test]
fn binary_atoms() -> Result<()> {
    let bin: Vec<u8> = (0..=255).collect();
    let v = hinted(vec![0xff, 0x00], bin.clone());
    let mut canonical = b"[2:\xff\x00]256:".to_vec();
    canonical.extend_from_slice(&bin);
    assert_eq!(v.to_canonical(), canonical);
    assert_eq!(parse_canonical(&canonical)?, v);
    assert_eq!(parse(v.to_string().as_bytes())?.0, v);
    Ok(())
}

#[test]
fn is_list() -> Result<()> {
    let (s, _) = parse(b"(abc efg-hijk )")?;
    assert!(s.is_list());
    assert!(!s.is_atom());
    assert_eq!(s.as_list().map(|l| l.len()), Some(2));
    let (s, _) = parse(b"abc")?;
    assert!(!s.is_list());
    assert_eq!(s.as_atom(), Some(&Atom::new("abc")));
    Ok(())
}
