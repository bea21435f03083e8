// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Translating bytes to values. The parser dispatches on the first
//! byte of a value to read a list, an atom or a transport-encoded
//! value; the individual string forms are read by the scanners in
//! [scan](../scan/index.html). This module has the entry points for
//! in-memory data; see [read](../read/index.html) for streams.

use crate::buffered_bytes::{ByteSource, SliceSource};
use crate::pos::Pos;
use crate::scan::{is_token_char, read_base64, read_decimal, read_hex,
                  read_quoted, read_raw, read_token, skip_whitespace,
                  starts_simple_string};
use crate::settings::{Format, Settings, ADVANCED_FORMAT, CANONICAL_SETTINGS,
                      DEFAULT_SETTINGS};
use crate::value::{Atom, Value};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use tracing::trace;

fn show_byte(b: &u8) -> String {
    b.escape_ascii().to_string()
}

/// What's wrong in a hexadecimal, base64 or transport run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadixFault {
    Digit(u8),
    /// An odd number of hex digits
    OddLength,
    /// Base64 data with missing or misplaced `=`
    Padding,
}

impl Display for RadixFault {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            RadixFault::Digit(b) => write!(f, "character '{}'", show_byte(b)),
            RadixFault::OddLength => f.write_str("odd number of digits"),
            RadixFault::Padding => f.write_str("padding"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error ({0}) after")]
    IO(std::io::Error),
    #[error("unexpected character '{}'", show_byte(.0))]
    UnexpectedCharacter(u8),
    #[error("unexpected EOF")]
    UnexpectedEof,
    #[error("premature EOF while expecting closing character ')' for list starting")]
    UnterminatedList,
    #[error("unexpected EOF in string introduced by '{0}' starting")]
    UnterminatedString(char),
    #[error("raw string without length prefix")]
    UnspecifiedLength,
    #[error("length prefix {explicit} does not match the actual length {actual} of string starting")]
    LengthMismatch { explicit: usize, actual: usize },
    #[error("length prefix too large")]
    LengthOverflow,
    #[error("invalid {1} in string introduced by '{0}'")]
    InvalidRadixDigit(char, RadixFault),
    #[error("invalid escaped character '{}'", show_byte(.0))]
    UnrecognizedEscape(u8),
    #[error("nesting too deep")]
    NestingTooDeep,
    #[error("{0} trailing byte(s) after value")]
    TrailingBytes(usize),
    #[error("non-canonical encoding ({0})")]
    NonCanonical(&'static str),
}

#[derive(Error, Debug)]
#[error("{err} {pos}")]
pub struct ParseErrorWithPos {
    pub err: ParseError,
    pub pos: Pos
}

impl ParseError {
    pub fn at(self, p: Pos) -> ParseErrorWithPos {
        ParseErrorWithPos {
            err: self,
            pos: p
        }
    }
}

trait At<T> {
    fn at(self, p: Pos) -> Result<T, ParseErrorWithPos>;
}

impl<T> At<T> for Result<T, ParseError> {
    fn at(self, p: Pos) -> Result<T, ParseErrorWithPos> {
        match self {
            Err(e) => Err(e.at(p)),
            Ok(v) => Ok(v)
        }
    }
}

fn check_length(explicit: Option<usize>, actual: usize)
                -> Result<(), ParseError> {
    match explicit {
        Some(explicit) if explicit != actual =>
            Err(ParseError::LengthMismatch { explicit, actual }),
        _ => Ok(())
    }
}

// Fuel for the content of a list or transport payload opened at pos.
fn nested(depth_fuel: u32, pos: Pos) -> Result<u32, ParseErrorWithPos> {
    depth_fuel.checked_sub(1)
        .ok_or_else(|| ParseError::NestingTooDeep.at(pos))
}

// An optional decimal length followed by one of the string forms.
fn parse_simple_string(
    src: &mut impl ByteSource,
    format: &Format,
) -> Result<Vec<u8>, ParseErrorWithPos> {
    let startpos = src.pos();
    let length = read_decimal(src, format)?;
    let pos = src.pos();
    let s = match src.peek()? {
        None => return Err(ParseError::UnexpectedEof.at(pos)),
        Some(b':') => {
            src.advance(b':');
            let len = length.ok_or_else(
                || ParseError::UnspecifiedLength.at(pos))?;
            return read_raw(src, len, pos)
        }
        Some(b'#') if format.advanced => {
            src.advance(b'#');
            read_hex(src, format, pos)?
        }
        Some(b'|') if format.advanced => {
            src.advance(b'|');
            read_base64(src, format, pos, b'|')?
        }
        Some(b'"') if format.advanced => {
            src.advance(b'"');
            read_quoted(src, pos)?
        }
        Some(b) if format.advanced && is_token_char(b) => read_token(src)?,
        Some(b) => return Err(ParseError::UnexpectedCharacter(b).at(pos))
    };
    check_length(length, s.len()).at(startpos)?;
    Ok(s)
}

fn parse_atom(
    src: &mut impl ByteSource,
    format: &Format,
) -> Result<Atom, ParseErrorWithPos> {
    let startpos = src.pos();
    let display_hint =
        if src.peek()? == Some(b'[') {
            src.advance(b'[');
            let hint = parse_simple_string(src, format)?;
            let pos = src.pos();
            match src.next()? {
                Some(b']') => {}
                Some(b) => return Err(ParseError::UnexpectedCharacter(b).at(pos)),
                None => return Err(ParseError::UnterminatedString('[').at(startpos)),
            }
            if format.strict_canonical && hint.is_empty() {
                return Err(ParseError::NonCanonical("empty display hint")
                           .at(startpos))
            }
            Some(hint)
        } else {
            None
        };
    let value = parse_simple_string(src, format)?;
    Ok(Atom { display_hint, value })
}

// After the opening paren at startpos.
fn parse_list(
    src: &mut impl ByteSource,
    format: &Format,
    startpos: Pos,
    depth_fuel: u32,
) -> Result<Vec<Value>, ParseErrorWithPos> {
    let mut v = Vec::new();
    loop {
        if format.advanced {
            skip_whitespace(src)?;
        }
        match src.peek()? {
            None => return Err(ParseError::UnterminatedList.at(startpos)),
            Some(b')') => {
                src.advance(b')');
                return Ok(v)
            }
            Some(_) => v.push(parse_value(src, format, depth_fuel)?),
        }
    }
}

// After the opening brace at startpos. Errors inside the payload are
// reported at the brace.
fn parse_transport(
    src: &mut impl ByteSource,
    format: &Format,
    startpos: Pos,
    depth_fuel: u32,
) -> Result<Value, ParseErrorWithPos> {
    let payload = read_base64(src, format, startpos, b'}')?;
    trace!(len = payload.len(), "decoded transport payload");
    let mut inner = SliceSource::new(&payload);
    let v = parse_value(&mut inner, format, depth_fuel)
        .map_err(|e| e.err.at(startpos))?;
    let rest = inner.rest().len();
    if rest > 0 {
        return Err(ParseError::TrailingBytes(rest).at(startpos))
    }
    Ok(v)
}

fn parse_value(
    src: &mut impl ByteSource,
    format: &Format,
    depth_fuel: u32,
) -> Result<Value, ParseErrorWithPos> {
    let pos = src.pos();
    match src.peek()? {
        None => Err(ParseError::UnexpectedEof.at(pos)),
        Some(b'(') => {
            let fuel = nested(depth_fuel, pos)?;
            src.advance(b'(');
            parse_list(src, format, pos, fuel).map(Value::List)
        }
        Some(b'{') if format.transport => {
            let fuel = nested(depth_fuel, pos)?;
            src.advance(b'{');
            parse_transport(src, format, pos, fuel)
        }
        Some(b) if b == b'[' || starts_simple_string(format, b) =>
            parse_atom(src, format).map(Value::Atom),
        Some(b) => Err(ParseError::UnexpectedCharacter(b).at(pos)),
    }
}

/// Read the next value from `src`, consuming exactly the bytes
/// belonging to it (plus preceding whitespace in the advanced
/// format). Returns `Ok(None)` if `src` is exhausted before a value
/// starts.
pub fn parse_next(
    src: &mut impl ByteSource,
    settings: &Settings,
) -> Result<Option<Value>, ParseErrorWithPos> {
    if settings.format.advanced {
        skip_whitespace(src)?;
    }
    if src.peek()?.is_none() {
        return Ok(None)
    }
    parse_value(src, settings.format, settings.depth_fuel).map(Some)
}

/// Parse the first value in `bytes` (in any of the encodings), and
/// return it together with the bytes following it.
pub fn parse(bytes: &[u8]) -> Result<(Value, &[u8]), ParseErrorWithPos> {
    parse_with(bytes, &DEFAULT_SETTINGS)
}

pub fn parse_with<'b>(
    bytes: &'b [u8],
    settings: &Settings,
) -> Result<(Value, &'b [u8]), ParseErrorWithPos> {
    let mut src = SliceSource::new(bytes);
    match parse_next(&mut src, settings)? {
        Some(v) => Ok((v, src.rest())),
        None => Err(ParseError::UnexpectedEof.at(src.pos())),
    }
}

/// Parse `bytes` as exactly one value; anything but whitespace (in
/// the advanced format) after it is an error.
pub fn parse_exact(
    bytes: &[u8],
    settings: &Settings,
) -> Result<Value, ParseErrorWithPos> {
    let mut src = SliceSource::new(bytes);
    let v = parse_next(&mut src, settings)?
        .ok_or_else(|| ParseError::UnexpectedEof.at(src.pos()))?;
    if settings.format.advanced {
        skip_whitespace(&mut src)?;
    }
    let rest = src.rest().len();
    if rest > 0 {
        return Err(ParseError::TrailingBytes(rest).at(src.pos()))
    }
    Ok(v)
}

/// Parse `bytes` as the canonical encoding of exactly one value.
/// Succeeds only if `bytes` is what `Value::to_canonical` gives for
/// the result, i.e. the input can't have been tampered with in ways
/// that leave the value the same.
pub fn parse_canonical(bytes: &[u8]) -> Result<Value, ParseErrorWithPos> {
    parse_exact(bytes, &CANONICAL_SETTINGS)
}

/// Unwrap the transport encoding: `{`, base64, `}`, giving the
/// (canonical) encoding of the value inside.
pub fn decode_transport(bytes: &[u8]) -> Result<Vec<u8>, ParseErrorWithPos> {
    let mut src = SliceSource::new(bytes);
    let startpos = src.pos();
    match src.next()? {
        Some(b'{') => {}
        Some(b) => return Err(ParseError::UnexpectedCharacter(b).at(startpos)),
        None => return Err(ParseError::UnexpectedEof.at(startpos)),
    }
    let payload = read_base64(&mut src, &ADVANCED_FORMAT, startpos, b'}')?;
    let rest = src.rest().len();
    if rest > 0 {
        return Err(ParseError::TrailingBytes(rest).at(src.pos()))
    }
    Ok(payload)
}
