// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runtime data types representing an S-expression value.

//! An [Atom](Atom) is an (optionally hinted) byte string, a
//! [Value](Value) is either an atom or a list of values. The types
//! own all of their data, thus `clone` gives a fully independent
//! copy. Display formats values in the advanced (human readable)
//! form, see [write](../write/index.html) for the others.

use crate::write::fmt_simple_string;
use std::fmt::Write;
use std::hash::{Hash, Hasher};

/// A byte string with an optional display hint (e.g. a MIME type)
/// telling how to interpret it. Neither is required to be text.
///
/// A missing hint and an empty one are the same thing: they compare
/// equal, hash the same and are encoded the same way (not at all).
#[derive(Debug, Clone, Default)]
pub struct Atom {
    pub display_hint: Option<Vec<u8>>,
    pub value: Vec<u8>,
}

impl Atom {
    pub fn new(value: impl Into<Vec<u8>>) -> Atom {
        Atom { display_hint: None, value: value.into() }
    }

    pub fn with_hint(hint: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Atom {
        Atom { display_hint: Some(hint.into()), value: value.into() }
    }

    /// The display hint, empty if there is none.
    pub fn hint(&self) -> &[u8] {
        self.display_hint.as_deref().unwrap_or(&[])
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Atom) -> bool {
        self.value == other.value && self.hint() == other.hint()
    }
}

impl Eq for Atom {}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hint().hash(state);
        self.value.hash(state);
    }
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        let hint = self.hint();
        if ! hint.is_empty() {
            f.write_char('[')?;
            fmt_simple_string(f, hint)?;
            f.write_char(']')?;
        }
        fmt_simple_string(f, &self.value)
    }
}

/// An atom never equals a list, not even a list holding just that
/// atom.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Atom(Atom),
    List(Vec<Value>),
}

impl Value {
    /// True for all lists, including the empty one.
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Value::Atom(_))
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Value::Atom(a) => Some(a),
            Value::List(_) => None
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::Atom(_) => None,
            Value::List(v) => Some(v)
        }
    }
}

impl From<Atom> for Value {
    fn from(a: Atom) -> Value {
        Value::Atom(a)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Value {
        Value::List(v)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match self {
            Value::Atom(a) => {
                a.fmt(f)
            }
            Value::List(v) => {
                f.write_char('(')?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        f.write_char(' ')?;
                    }
                    item.fmt(f)?;
                }
                f.write_char(')')
            }
        }
    }
}

/// Easily create an atom without display hint
pub fn atom(value: impl Into<Vec<u8>>) -> Value {
    Value::Atom(Atom::new(value))
}

/// Easily create an atom with a display hint
pub fn hinted(hint: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Value {
    Value::Atom(Atom::with_hint(hint, value))
}
