// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Serializing values. The canonical form (length-prefixed raw
//! bytes, no whitespace) is the unique encoding of a value and what
//! signatures should be computed over. The advanced form is for
//! humans, it's what `Display` gives. The transport form is the
//! canonical form in base64, in braces, for text-only channels. The
//! parser accepts all three.

use crate::scan::is_token_char;
use crate::value::{Atom, Value};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Canonical,
    Advanced,
    Transport,
}

fn write_raw(out: &mut Vec<u8>, s: &[u8]) {
    out.extend_from_slice(s.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(s);
}

impl Atom {
    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        let hint = self.hint();
        if ! hint.is_empty() {
            out.push(b'[');
            write_raw(out, hint);
            out.push(b']');
        }
        write_raw(out, &self.value);
    }

    pub fn to_canonical(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_canonical(&mut out);
        out
    }
}

impl Value {
    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        match self {
            Value::Atom(a) => a.write_canonical(out),
            Value::List(v) => {
                out.push(b'(');
                for item in v {
                    item.write_canonical(out);
                }
                out.push(b')');
            }
        }
    }

    pub fn to_canonical(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_canonical(&mut out);
        out
    }

    pub fn to_advanced(&self) -> String {
        self.to_string()
    }

    pub fn to_transport(&self) -> String {
        format!("{{{}}}", STANDARD.encode(self.to_canonical()))
    }

    pub fn encode(&self, encoding: Encoding) -> Vec<u8> {
        match encoding {
            Encoding::Canonical => self.to_canonical(),
            Encoding::Advanced => self.to_advanced().into_bytes(),
            Encoding::Transport => self.to_transport().into_bytes(),
        }
    }
}

// A digit would be read as a length prefix, a colon as a raw string
// without one.
fn is_token(s: &[u8]) -> bool {
    match s.first() {
        None => false,
        Some(b) if b.is_ascii_digit() || *b == b':' => false,
        Some(_) => s.iter().all(|b| is_token_char(*b))
    }
}

fn quoted_escape(b: u8) -> Option<char> {
    match b {
        b'\x08' => Some('b'),
        b'\t' => Some('t'),
        b'\x0B' => Some('v'),
        b'\n' => Some('n'),
        b'\x0C' => Some('f'),
        b'\r' => Some('r'),
        b'"' => Some('"'),
        b'\\' => Some('\\'),
        _ => None
    }
}

fn is_quotable(s: &[u8]) -> bool {
    s.iter().all(|b| (b' '..=b'~').contains(b) || quoted_escape(*b).is_some())
}

/// Write `s` in the most readable form that reads back as the same
/// bytes: as a token, quoted, or in base64.
pub fn fmt_simple_string(f: &mut impl Write, s: &[u8])
                         -> Result<(), std::fmt::Error> {
    if is_token(s) {
        for b in s {
            f.write_char(*b as char)?;
        }
        Ok(())
    } else if is_quotable(s) {
        f.write_char('"')?;
        for b in s {
            if let Some(c) = quoted_escape(*b) {
                f.write_char('\\')?;
                f.write_char(c)?;
            } else {
                f.write_char(*b as char)?;
            }
        }
        f.write_char('"')
    } else {
        f.write_fmt(format_args!("|{}|", STANDARD.encode(s)))
    }
}
