// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Utilities for debugging the canonsexpr library

use crate::value::{atom, Atom, Value};

fn tagged(tag: &str, rest: impl Iterator<Item=Value>) -> Value {
    let mut vals : Vec<Value> = Vec::new();
    vals.push(atom(tag));
    vals.extend(rest);
    Value::List(vals)
}

impl Value {
    /// Turn the in-memory representation into a tree that shows it
    /// explicitly: `(list ...)`, `(atom value)`, `(atom value (hint
    /// h))`. Unlike the encoders, this shows a present but empty
    /// display hint as `(hint "")`.
    pub fn dump(&self) -> Value {
        match self {
            Value::Atom(Atom { display_hint, value }) => {
                let hint = display_hint.as_ref().map(
                    |h| tagged("hint", std::iter::once(atom(h.clone()))));
                tagged("atom",
                       std::iter::once(atom(value.clone())).chain(hint))
            }
            Value::List(vals) => {
                tagged("list", vals.iter().map(|v| v.dump()))
            }
        }
    }
}
