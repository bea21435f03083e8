// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Get bytes and their positions from a slice or from anything
//! implementing `BufRead`.

//! The parser needs one byte of lookahead (tokens and length
//! prefixes end at the first byte that does not belong to them), but
//! must not consume that byte: when reading from a stream, the bytes
//! after a value belong to whoever reads next. `BufRead` gives us
//! that for free via `fill_buf`, thus no pushback buffer is kept
//! here.

use crate::parse::{ParseError, ParseErrorWithPos};
use crate::pos::Pos;
use std::io::{BufRead, ErrorKind};

pub trait ByteSource {
    /// The next byte, without consuming it. `None` at end of input.
    fn peek(&mut self) -> Result<Option<u8>, ParseErrorWithPos>;

    /// Consume `b`, which must be the byte that `peek` just returned.
    fn advance(&mut self, b: u8);

    /// Position of the byte `peek` would return.
    fn pos(&self) -> Pos;

    /// Append up to `n` bytes to `out`, stopping early only at end
    /// of input. Returns the number of bytes appended. `n` may come
    /// from untrusted input, thus implementations must not reserve
    /// it up front.
    fn take_exact(&mut self, n: usize, out: &mut Vec<u8>)
                  -> Result<usize, ParseErrorWithPos>;

    fn next(&mut self) -> Result<Option<u8>, ParseErrorWithPos> {
        let b = self.peek()?;
        if let Some(b) = b {
            self.advance(b);
        }
        Ok(b)
    }
}


#[derive(Debug)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    pos: Pos,
}

impl<'a> SliceSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        SliceSource { bytes, pos: Pos::default() }
    }

    /// The bytes not consumed yet.
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos.offset..]
    }
}

impl<'a> ByteSource for SliceSource<'a> {
    fn peek(&mut self) -> Result<Option<u8>, ParseErrorWithPos> {
        Ok(self.bytes.get(self.pos.offset).copied())
    }

    fn advance(&mut self, b: u8) {
        self.pos = self.pos.advance(b);
    }

    fn pos(&self) -> Pos {
        self.pos
    }

    fn take_exact(&mut self, n: usize, out: &mut Vec<u8>)
                  -> Result<usize, ParseErrorWithPos> {
        let rest = self.rest();
        let taken = &rest[..n.min(rest.len())];
        out.extend_from_slice(taken);
        for &b in taken {
            self.pos = self.pos.advance(b);
        }
        Ok(taken.len())
    }
}


#[derive(Debug)]
pub struct BufferedBytes<R> {
    inner: R,
    pos: Pos,
}

impl<R: BufRead> BufferedBytes<R> {
    pub fn new(inner: R) -> Self {
        BufferedBytes { inner, pos: Pos::default() }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

// Looping on Interrupted and returning the buffer from inside the
// loop doesn't pass the borrow checker, hence the second fill_buf,
// which only hands out data that is already buffered. An empty fill
// is end of stream and must not lead to another read.
fn fill<R: BufRead>(inner: &mut R, pos: Pos)
                    -> Result<&[u8], ParseErrorWithPos> {
    loop {
        match inner.fill_buf() {
            Ok(buf) if buf.is_empty() => return Ok(&[]),
            Ok(_) => break,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ParseError::IO(e).at(pos)),
        }
    }
    inner.fill_buf().map_err(|e| ParseError::IO(e).at(pos))
}

impl<R: BufRead> ByteSource for BufferedBytes<R> {
    fn peek(&mut self) -> Result<Option<u8>, ParseErrorWithPos> {
        Ok(fill(&mut self.inner, self.pos)?.first().copied())
    }

    fn advance(&mut self, b: u8) {
        self.inner.consume(1);
        self.pos = self.pos.advance(b);
    }

    fn pos(&self) -> Pos {
        self.pos
    }

    fn take_exact(&mut self, n: usize, out: &mut Vec<u8>)
                  -> Result<usize, ParseErrorWithPos> {
        let mut taken = 0;
        while taken < n {
            let buf = fill(&mut self.inner, self.pos)?;
            if buf.is_empty() {
                break;
            }
            let len = buf.len().min(n - taken);
            out.extend_from_slice(&buf[..len]);
            let mut pos = self.pos;
            for &b in &buf[..len] {
                pos = pos.advance(b);
            }
            self.pos = pos;
            self.inner.consume(len);
            taken += len;
        }
        Ok(taken)
    }
}
