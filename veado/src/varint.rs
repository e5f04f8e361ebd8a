// Veado
// Copyright (c) 2026 The Project Veado Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Variable-length primitives shared by all Veado records: unsigned base-128 integers and
//! length-prefixed strings.

use veado_core::errors::{
    malformed_varint_error, truncated_input_error, varint_overflow_error, Error, Result,
};
use veado_core::io::{FiniteStream, ReadBytes};

/// Reads a single unsigned variable-length integer from the stream and returns it or an error.
///
/// The encoding is little-endian base-128: seven data bits per byte, least-significant group
/// first, high bit set on every byte except the last. At most ten bytes may contribute, and the
/// tenth may only carry the top bit of a 64-bit value.
pub fn read_uvarint<B: ReadBytes>(reader: &mut B) -> Result<u64> {
    let mut value = 0u64;

    for i in 0..10 {
        let byte = match reader.read_byte() {
            Ok(byte) => byte,
            // The span or source ending mid-varint means the terminating byte never arrived.
            Err(Error::TruncatedInput(_)) | Err(Error::OutOfBounds(_)) => {
                return malformed_varint_error("missing terminating byte");
            }
            Err(err) => return Err(err),
        };

        if i == 9 && byte > 0x01 {
            return varint_overflow_error("more than 64 bits of magnitude");
        }

        value |= u64::from(byte & 0x7f) << (7 * i);

        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }

    varint_overflow_error("continuation past ten bytes")
}

/// Reads a length-prefixed string from the stream and returns it or an error.
///
/// The byte length is a uvarint; a length of zero is a valid, empty string. The bytes are
/// interpreted as UTF-8 with lossy replacement of invalid sequences.
pub fn read_string<B: ReadBytes + FiniteStream>(reader: &mut B) -> Result<String> {
    let len = read_uvarint(reader)?;

    // Validate the untrusted length against the span before allocating.
    if len > reader.bytes_available() {
        return truncated_input_error("string length exceeds remaining bytes");
    }

    let buf = reader.read_boxed_slice_exact(len as usize)?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use veado_core::errors::Error;
    use veado_core::io::BufReader;

    use super::{read_string, read_uvarint};

    #[test]
    fn unsigned_varint_parsing() {
        assert_eq!(read_uvarint(&mut BufReader::new(&[0x00])).unwrap(), 0);
        assert_eq!(read_uvarint(&mut BufReader::new(&[0x01])).unwrap(), 1);
        assert_eq!(read_uvarint(&mut BufReader::new(&[0x7f])).unwrap(), 127);
        assert_eq!(read_uvarint(&mut BufReader::new(&[0x80, 0x01])).unwrap(), 128);
        assert_eq!(read_uvarint(&mut BufReader::new(&[0xac, 0x02])).unwrap(), 300);
        assert_eq!(
            read_uvarint(&mut BufReader::new(&[0xff, 0xff, 0xff, 0xff, 0x0f])).unwrap(),
            u64::from(u32::MAX)
        );
        assert_eq!(
            read_uvarint(&mut BufReader::new(&[
                0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01
            ]))
            .unwrap(),
            u64::MAX
        );
    }

    #[test]
    fn unsigned_varint_only_consumes_its_own_bytes() {
        let mut reader = BufReader::new(&[0xac, 0x02, 0x7b]);
        assert_eq!(read_uvarint(&mut reader).unwrap(), 300);
        assert_eq!(read_uvarint(&mut reader).unwrap(), 123);
    }

    #[test]
    fn unterminated_varint_is_malformed() {
        let err = read_uvarint(&mut BufReader::new(&[0x80])).unwrap_err();
        assert!(matches!(err, Error::MalformedVarint(_)));

        let err = read_uvarint(&mut BufReader::new(&[])).unwrap_err();
        assert!(matches!(err, Error::MalformedVarint(_)));
    }

    #[test]
    fn oversized_varint_overflows() {
        // Tenth byte carries more than the top bit of a 64-bit value.
        let err = read_uvarint(&mut BufReader::new(&[
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x02,
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::VarintOverflow(_)));

        // Continuation bit still set on the tenth byte.
        let err = read_uvarint(&mut BufReader::new(&[
            0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x00,
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::VarintOverflow(_)));
    }

    #[test]
    fn string_parsing() {
        let mut reader = BufReader::new(&[0x05, b'v', b'e', b'a', b'd', b'o']);
        assert_eq!(read_string(&mut reader).unwrap(), "veado");

        // A zero length is a valid, empty string.
        let mut reader = BufReader::new(&[0x00]);
        assert_eq!(read_string(&mut reader).unwrap(), "");
    }

    #[test]
    fn string_length_is_validated_before_reading() {
        let err = read_string(&mut BufReader::new(&[0x05, b'v'])).unwrap_err();
        assert!(matches!(err, Error::TruncatedInput(_)));
    }
}
