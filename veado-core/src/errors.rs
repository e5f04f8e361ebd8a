// Veado
// Copyright (c) 2026 The Project Veado Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the common error type.

use std::error;
use std::fmt;
use std::io;
use std::result;

/// `Error` provides an enumeration of all possible errors reported by Veado.
///
/// Decoding is a pure function of the input bytes, so no error is ever retried internally; the
/// first structural failure aborts the whole decode.
#[derive(Debug)]
pub enum Error {
    /// An IO error occured while reading the byte source.
    IoError(io::Error),
    /// The stream does not begin with the Veado stream marker. Carries the bytes found instead.
    BadMagic([u8; 9]),
    /// The byte source ended before a field could be fully read.
    TruncatedInput(&'static str),
    /// The bytes remaining at a chunk boundary cannot hold a chunk envelope, or a declared chunk
    /// body length exceeds them.
    TruncatedChunk {
        /// Byte offset of the offending envelope.
        pos: u64,
    },
    /// A variable-length integer was missing its terminating byte.
    MalformedVarint(&'static str),
    /// A variable-length integer exceeded 64 bits of accumulated magnitude.
    VarintOverflow(&'static str),
    /// A read would cross the bound of the enclosing chunk or record span.
    OutOfBounds(&'static str),
    /// A chunk body decoder consumed more bytes than the envelope declared.
    OverconsumedChunk {
        /// The 4-character chunk kind tag.
        tag: [u8; 4],
        /// The declared body length.
        len: u32,
        /// The number of bytes the body decoder actually consumed.
        consumed: u64,
    },
    /// A span-filled sequence ended with a partial trailing element.
    MalformedElement(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::IoError(ref err) => err.fmt(f),
            Error::BadMagic(found) => {
                write!(f, "not a veado stream: bad magic {:02x?}", found)
            }
            Error::TruncatedInput(desc) => {
                write!(f, "truncated input: {}", desc)
            }
            Error::TruncatedChunk { pos } => {
                write!(f, "truncated chunk at byte {}", pos)
            }
            Error::MalformedVarint(desc) => {
                write!(f, "malformed varint: {}", desc)
            }
            Error::VarintOverflow(desc) => {
                write!(f, "varint overflow: {}", desc)
            }
            Error::OutOfBounds(desc) => {
                write!(f, "out of bounds: {}", desc)
            }
            Error::OverconsumedChunk { tag, len, consumed } => {
                write!(
                    f,
                    "chunk {} overconsumed: read {} of {} declared bytes",
                    String::from_utf8_lossy(&tag),
                    consumed,
                    len
                )
            }
            Error::MalformedElement(desc) => {
                write!(f, "malformed element: {}", desc)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Convenience function to create a bad magic error.
pub fn bad_magic_error<T>(found: [u8; 9]) -> Result<T> {
    Err(Error::BadMagic(found))
}

/// Convenience function to create a truncated input error.
pub fn truncated_input_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::TruncatedInput(desc))
}

/// Convenience function to create a truncated chunk error.
pub fn truncated_chunk_error<T>(pos: u64) -> Result<T> {
    Err(Error::TruncatedChunk { pos })
}

/// Convenience function to create a malformed varint error.
pub fn malformed_varint_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::MalformedVarint(desc))
}

/// Convenience function to create a varint overflow error.
pub fn varint_overflow_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::VarintOverflow(desc))
}

/// Convenience function to create an out of bounds error.
pub fn out_of_bounds_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::OutOfBounds(desc))
}

/// Convenience function to create an overconsumed chunk error.
pub fn overconsumed_chunk_error<T>(tag: [u8; 4], len: u32, consumed: u64) -> Result<T> {
    Err(Error::OverconsumedChunk { tag, len, consumed })
}

/// Convenience function to create a malformed element error.
pub fn malformed_element_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::MalformedElement(desc))
}
