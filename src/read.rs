// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Reading values from streams, one at a time, and writing them.

use crate::buffered_bytes::{BufferedBytes, ByteSource};
use crate::parse::{parse_next, ParseError, ParseErrorWithPos};
use crate::pos::Pos;
use crate::settings::{Settings, DEFAULT_SETTINGS};
use crate::value::Value;
use crate::write::Encoding;
use genawaiter::rc::Gen;
use std::io::{BufRead, BufReader, Read, Write};
use tracing::{debug, trace};

/// Reads values from a `BufRead` without consuming any bytes past
/// the end of the value just read, thus the underlying reader can be
/// handed on (`into_inner`) to read whatever follows. Blocking, and
/// timeouts if wanted, are up to the reader.
#[derive(Debug)]
pub struct Reader<'t, R> {
    bytes: BufferedBytes<R>,
    settings: Settings<'t>,
}

impl<R: BufRead> Reader<'static, R> {
    pub fn new(fh: R) -> Self {
        Reader::with_settings(fh, DEFAULT_SETTINGS)
    }
}

impl<'t, R: BufRead> Reader<'t, R> {
    pub fn with_settings(fh: R, settings: Settings<'t>) -> Self {
        Reader { bytes: BufferedBytes::new(fh), settings }
    }

    /// The next value, or `Ok(None)` if the stream ended (after
    /// optional whitespace, in the advanced format) instead.
    pub fn read_value(&mut self) -> Result<Option<Value>, ParseErrorWithPos> {
        let startpos = self.bytes.pos();
        match parse_next(&mut self.bytes, &self.settings) {
            Ok(v) => {
                if v.is_some() {
                    trace!(offset = startpos.offset,
                           len = self.bytes.pos().offset - startpos.offset,
                           "read value");
                }
                Ok(v)
            }
            Err(e) => {
                debug!(error = %e, "read failed");
                Err(e)
            }
        }
    }

    /// Whether the stream is exhausted, i.e. the value just read was
    /// the last thing in it. Whitespace is not skipped.
    pub fn at_eof(&mut self) -> Result<bool, ParseErrorWithPos> {
        Ok(self.bytes.peek()?.is_none())
    }

    /// Position of the next unread byte.
    pub fn pos(&self) -> Pos {
        self.bytes.pos()
    }

    pub fn into_inner(self) -> R {
        self.bytes.into_inner()
    }
}

/// Read exactly one value from `fh`, which must not be at its end.
pub fn read(fh: impl BufRead) -> Result<Value, ParseErrorWithPos> {
    let mut reader = Reader::new(fh);
    match reader.read_value()? {
        Some(v) => Ok(v),
        None => Err(ParseError::UnexpectedEof.at(reader.pos())),
    }
}

/// All values in `fh`, lazily; the iteration ends after the first
/// error.
pub fn values<'t, R: BufRead + 't>(
    fh: R,
    settings: Settings<'t>,
) -> impl Iterator<Item = Result<Value, ParseErrorWithPos>> + 't
{
    Gen::new(|co| async move {
        let mut reader = Reader::with_settings(fh, settings);
        loop {
            match reader.read_value() {
                Ok(Some(v)) => co.yield_(Ok(v)).await,
                Ok(None) => return,
                Err(e) => {
                    co.yield_(Err(e)).await;
                    return;
                }
            }
        }
    }).into_iter()
}

pub fn read_all(
    fh: impl Read,
) -> Result<Vec<Value>, ParseErrorWithPos>
{
    values(BufReader::new(fh), DEFAULT_SETTINGS).collect()
}

/// Canonical values are simply concatenated, advanced ones separated
/// by an empty line, transport encoded ones each put on a line.
pub fn write_all<'t>(
    out: impl Write,
    vals: impl IntoIterator<Item = &'t Value>,
    encoding: Encoding,
) -> Result<(), std::io::Error> {
    let mut out = out; // for `File`
    let mut seen_item = false;
    for v in vals.into_iter() {
        match encoding {
            Encoding::Canonical => out.write_all(&v.to_canonical())?,
            Encoding::Advanced =>
                write!(out, "{}{}\n", if seen_item {"\n"} else {""}, v)?,
            Encoding::Transport => writeln!(out, "{}", v.to_transport())?,
        }
        seen_item = true;
    }
    out.flush()
}
