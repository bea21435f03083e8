// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Settings for reading (parsing) data.

#[derive(Debug)]
pub struct Format {
    /// Accept tokens, quoted strings, hexadecimal and base64 strings,
    /// and whitespace between list items and before a value.
    pub advanced: bool,
    /// Accept `{...}` (base64 of an encoded value) wherever a value
    /// may start.
    pub transport: bool,
    /// Skip whitespace inside `#..#`, `|..|` and `{..}` runs.
    pub whitespace_in_radix: bool,
    /// Refuse everything that could not have been produced by the
    /// canonical encoder: leading zeros in lengths, empty display
    /// hints.
    pub strict_canonical: bool,
}

pub const ADVANCED_FORMAT : Format = Format {
    advanced: true,
    transport: true,
    whitespace_in_radix: true,
    strict_canonical: false,
};

pub const CANONICAL_FORMAT : Format = Format {
    advanced: false,
    transport: false,
    whitespace_in_radix: false,
    strict_canonical: true,
};

/// The limit with default thread stack sizes on Linux is well above
/// this.
pub const DEFAULT_DEPTH_FUEL : u32 = 500;

#[derive(Debug, Clone, Copy)]
pub struct Settings<'t> {
    pub format: &'t Format,
    /// How many levels of lists (and transport payloads) may be
    /// nested before giving up with `ParseError::NestingTooDeep`.
    pub depth_fuel: u32,
}

pub const DEFAULT_SETTINGS : Settings<'static> = Settings {
    format: &ADVANCED_FORMAT,
    depth_fuel: DEFAULT_DEPTH_FUEL,
};

pub const CANONICAL_SETTINGS : Settings<'static> = Settings {
    format: &CANONICAL_FORMAT,
    depth_fuel: DEFAULT_DEPTH_FUEL,
};
