// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The primitive scanners, each reading one form of simple string
//! (after its opening delimiter, if it has one), and the byte classes
//! shared with the encoders.

use crate::buffered_bytes::ByteSource;
use crate::parse::{ParseError, ParseErrorWithPos, RadixFault};
use crate::pos::Pos;
use crate::settings::Format;
use base64::{Engine, engine::general_purpose::STANDARD};

pub fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"-./_:*+=".contains(&b)
}

pub fn is_base64_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'='
}

pub fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

fn parse_hexdigit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None
    }
}

fn parse_octaldigit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'7' => Some(b - b'0'),
        _ => None
    }
}

/// Whether `b` can be the first byte of a simple string (a display
/// hint starts with `[` instead).
pub fn starts_simple_string(format: &Format, b: u8) -> bool {
    b.is_ascii_digit()
        || (format.advanced
            && (b == b'#' || b == b'|' || b == b'"' || is_token_char(b)))
}

pub fn skip_whitespace(
    src: &mut impl ByteSource
) -> Result<(), ParseErrorWithPos> {
    while let Some(b) = src.peek()? {
        if ! is_whitespace(b) {
            break;
        }
        src.advance(b);
    }
    Ok(())
}

/// Returns `None` if there is no digit at the current position.
pub fn read_decimal(
    src: &mut impl ByteSource,
    format: &Format,
) -> Result<Option<usize>, ParseErrorWithPos> {
    let startpos = src.pos();
    let mut n: Option<usize> = None;
    while let Some(b) = src.peek()? {
        if ! b.is_ascii_digit() {
            break;
        }
        if format.strict_canonical && n == Some(0) {
            return Err(ParseError::NonCanonical("leading zero in length")
                       .at(startpos))
        }
        let d = (b - b'0') as usize;
        let m = n.unwrap_or(0)
            .checked_mul(10)
            .and_then(|m| m.checked_add(d))
            .ok_or_else(|| ParseError::LengthOverflow.at(startpos))?;
        n = Some(m);
        src.advance(b);
    }
    Ok(n)
}

/// `len` bytes verbatim; `startpos` is the position of the colon.
pub fn read_raw(
    src: &mut impl ByteSource,
    len: usize,
    startpos: Pos,
) -> Result<Vec<u8>, ParseErrorWithPos> {
    let mut out = Vec::new();
    if src.take_exact(len, &mut out)? < len {
        return Err(ParseError::UnterminatedString(':').at(startpos))
    }
    Ok(out)
}

// Collect the digits up to and including `delimiter`, which is
// dropped.
fn read_radix_run(
    src: &mut impl ByteSource,
    format: &Format,
    startpos: Pos,
    delimiter: u8,
    accepted: fn(u8) -> bool,
) -> Result<Vec<u8>, ParseErrorWithPos> {
    let mut digits = Vec::new();
    loop {
        let pos = src.pos();
        match src.next()? {
            None => return Err(ParseError::UnterminatedString(delimiter as char)
                               .at(startpos)),
            Some(b) if b == delimiter => return Ok(digits),
            Some(b) if accepted(b) => digits.push(b),
            Some(b) if format.whitespace_in_radix && is_whitespace(b) => {}
            Some(b) => return Err(
                ParseError::InvalidRadixDigit(delimiter as char,
                                              RadixFault::Digit(b))
                    .at(pos)),
        }
    }
}

/// Hexadecimal digits up to the closing `#`; `startpos` is the
/// position of the opening `#`.
pub fn read_hex(
    src: &mut impl ByteSource,
    format: &Format,
    startpos: Pos,
) -> Result<Vec<u8>, ParseErrorWithPos> {
    let digits = read_radix_run(src, format, startpos, b'#', is_hex_digit)?;
    // The digits are checked already, so only the count can be wrong.
    hex::decode(&digits).map_err(
        |_| ParseError::InvalidRadixDigit('#', RadixFault::OddLength)
            .at(startpos))
}

/// Base64 up to `delimiter` (`|` for strings, `}` for transport
/// encoding); `startpos` is the position of the opening delimiter.
pub fn read_base64(
    src: &mut impl ByteSource,
    format: &Format,
    startpos: Pos,
    delimiter: u8,
) -> Result<Vec<u8>, ParseErrorWithPos> {
    let digits = read_radix_run(src, format, startpos, delimiter,
                                is_base64_char)?;
    STANDARD.decode(&digits).map_err(
        |_| ParseError::InvalidRadixDigit(delimiter as char,
                                          RadixFault::Padding)
            .at(startpos))
}

/// A quoted string up to the closing `"`; `startpos` is the position
/// of the opening `"`.
pub fn read_quoted(
    src: &mut impl ByteSource,
    startpos: Pos,
) -> Result<Vec<u8>, ParseErrorWithPos> {
    let mut out = Vec::new();
    loop {
        match src.next()? {
            None => return Err(ParseError::UnterminatedString('"').at(startpos)),
            Some(b'"') => return Ok(out),
            Some(b'\\') => read_escape(src, startpos, &mut out)?,
            Some(b) => out.push(b),
        }
    }
}

// After a backslash.
fn read_escape(
    src: &mut impl ByteSource,
    startpos: Pos,
    out: &mut Vec<u8>,
) -> Result<(), ParseErrorWithPos> {
    let eof = || ParseError::UnterminatedString('"').at(startpos);
    let pos = src.pos();
    let c = src.next()?.ok_or_else(eof)?;
    let b = match c {
        b'b' => b'\x08',
        b't' => b'\t',
        b'v' => b'\x0B',
        b'n' => b'\n',
        b'f' => b'\x0C',
        b'r' => b'\r',
        b'"' | b'\'' | b'\\' => c,
        b'\n' | b'\r' => {
            // Line continuation; CR LF and LF CR count as one line
            // break.
            let other = if c == b'\n' { b'\r' } else { b'\n' };
            if src.peek()? == Some(other) {
                src.advance(other);
            }
            return Ok(())
        }
        b'x' => {
            let mut n = 0;
            for _ in 0..2 {
                let d = src.next()?.ok_or_else(eof)?;
                let v = parse_hexdigit(d)
                    .ok_or_else(|| ParseError::UnrecognizedEscape(c).at(pos))?;
                n = n * 16 + v;
            }
            n
        }
        b'0'..=b'7' => {
            let mut n = u32::from(c - b'0');
            for _ in 0..2 {
                let d = src.next()?.ok_or_else(eof)?;
                let v = parse_octaldigit(d)
                    .ok_or_else(|| ParseError::UnrecognizedEscape(c).at(pos))?;
                n = n * 8 + u32::from(v);
            }
            u8::try_from(n)
                .map_err(|_| ParseError::UnrecognizedEscape(c).at(pos))?
        }
        _ => return Err(ParseError::UnrecognizedEscape(c).at(pos))
    };
    out.push(b);
    Ok(())
}

/// A bare token, ending at the first byte that can't be part of it.
pub fn read_token(
    src: &mut impl ByteSource,
) -> Result<Vec<u8>, ParseErrorWithPos> {
    let mut out = Vec::new();
    while let Some(b) = src.peek()? {
        if ! is_token_char(b) {
            break;
        }
        out.push(b);
        src.advance(b);
    }
    Ok(out)
}
