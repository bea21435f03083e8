// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::cmp::Eq;

/// Location of a byte in the input. `offset` counts bytes from the
/// start of the input. Both line and col are zero based; Emacs uses
/// 1-based line numbering, so line is incremented by 1 in Display.
/// Lines are counted by LF bytes only, col counts bytes (the data
/// is not necessarily text).

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl Pos {
    /// The position following byte `b` located at `self`.
    pub fn advance(self, b: u8) -> Pos {
        if b == b'\n' {
            Pos { offset: self.offset + 1,
                  line: self.line.saturating_add(1),
                  col: 0 }
        } else {
            Pos { offset: self.offset + 1,
                  line: self.line,
                  col: self.col.saturating_add(1) }
        }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        // This, when prefixed with a Debug style path string, is
        // following the Emacs convention for location information.
        f.write_fmt(format_args!("@{}.{}", u64::from(self.line) + 1, self.col))
    }
}
