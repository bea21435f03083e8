// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This is a parser and formatter for Rivest-style canonical
//! S-Expressions, the data format used by SPKI/SDSI: atoms are
//! arbitrary byte strings (with an optional "display hint"), lists
//! nest them. The goals:
//!
//! * Unforgeable serialization: `Value::to_canonical` gives the one
//!   and only canonical encoding of a value, and
//!   `parse::parse_canonical` accepts nothing else, so signatures can
//!   be computed over it.
//!
//! * Read everything the format allows: the advanced (human
//!   readable) syntax with tokens, quoted strings, hexadecimal and
//!   base64 strings, and the `{...}` transport encoding, via
//!   `parse::parse` for in-memory data and `read::Reader` for
//!   streams (which consumes exactly the bytes of each value).
//!
//! * Input is untrusted: every malformed input gives an error with
//!   precise location information, never a panic; nesting depth is
//!   limited (`settings::Settings::depth_fuel`).
//!
//! * Write the advanced form for humans (`Display`) and the
//!   transport form for text-only channels, both of which read back
//!   as equal values.
//!
//! ```
//! use canonsexpr::parse::parse;
//! use canonsexpr::value::{atom, hinted, Value};
//!
//! let (v, rest) = parse(b"([text]test \"a b\")").unwrap();
//! assert!(rest.is_empty());
//! assert_eq!(v, Value::List(vec![hinted("text", "test"), atom("a b")]));
//! assert_eq!(v.to_canonical(), b"([4:text]4:test3:a b)");
//! assert_eq!(v.to_string(), "([text]test \"a b\")");
//! ```

pub mod buffered_bytes;
pub mod debug;
pub mod parse;
pub mod pos;
pub mod read;
pub mod scan;
pub mod settings;
pub mod value;
pub mod write;
