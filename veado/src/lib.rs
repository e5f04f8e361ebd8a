// Veado
// Copyright (c) 2026 The Project Veado Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoder for the Veado talking-avatar puppet container.
//!
//! A Veado stream is a 9-byte marker followed by a flat sequence of self-describing chunks. Each
//! chunk carries a numeric id, a 4-character kind tag, and a length-bounded body; the body is
//! decoded according to the tag, and unrecognized kinds are carried as opaque bytes so newer
//! files remain readable by older readers.
//!
//! [`Veado::read`] decodes a complete stream from any [`ReadBytes`] + [`FiniteStream`] source
//! into an ordered chunk tree. [`Veado::read_from`] adapts any [`std::io::Read`] by reading it
//! to exhaustion first. Decoding is a single linear pass without backtracking; the first
//! structural error aborts the decode.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

use std::io::Read;

use log::{debug, error};

use veado_core::errors::{
    bad_magic_error, overconsumed_chunk_error, truncated_chunk_error, Result,
};
use veado_core::io::{BufReader, FiniteStream, ReadBytes, ScopedStream};

mod chunks;
mod varint;

pub use chunks::{
    AnimationChunk, AnimationFrame, AssetChunk, AssetEntry, AssetMetadata, BitmapChunk, Chunk,
    ChunkBody, Effect, EffectFlags, ListChunk, MetaChunk, ParseChunk, ShortcutMode, Signal,
    StateChunk, StateFlags, ThumbnailChunk,
};
pub use varint::{read_string, read_uvarint};

pub use veado_core as core;

/// Every Veado stream begins with this marker.
pub const VEADO_STREAM_MARKER: [u8; 9] = *b"VEADOMINI";

/// Size of a chunk envelope: id (4), kind tag (4), body length (4).
const CHUNK_HEADER_LEN: u64 = 12;

/// A fully decoded Veado document.
#[derive(Debug, Clone, PartialEq)]
pub struct Veado {
    /// Chunks in stream order.
    pub chunks: Vec<Chunk>,
}

impl Veado {
    /// Decodes a complete Veado stream from a finite byte source.
    pub fn read<B: ReadBytes + FiniteStream>(reader: &mut B) -> Result<Veado> {
        let mut magic = [0u8; 9];
        reader.read_buf_exact(&mut magic)?;

        if magic != VEADO_STREAM_MARKER {
            return bad_magic_error(magic);
        }

        let mut chunks = Vec::new();

        // Zero bytes remaining at a chunk boundary is a clean end of stream.
        while reader.bytes_available() > 0 {
            let pos = reader.pos();

            if reader.bytes_available() < CHUNK_HEADER_LEN {
                return truncated_chunk_error(pos);
            }

            let id = reader.read_u32()?;
            let tag = reader.read_quad_bytes()?;
            let len = reader.read_u32()?;

            // len is untrusted input; the declared body must fit the remaining bytes.
            if u64::from(len) > reader.bytes_available() {
                return truncated_chunk_error(pos);
            }

            debug!(
                "chunk {}: id={}, tag={}, len={}",
                chunks.len(),
                id,
                String::from_utf8_lossy(&tag),
                len
            );

            let mut body_reader = ScopedStream::new(&mut *reader, u64::from(len));

            let body = match ChunkBody::read(&mut body_reader, tag, len) {
                Ok(body) => body,
                Err(err) => {
                    error!(
                        "chunk {} ({}) at byte {}: {}",
                        chunks.len(),
                        String::from_utf8_lossy(&tag),
                        pos,
                        err
                    );
                    return Err(err);
                }
            };

            let consumed = body_reader.bytes_read();

            if consumed > u64::from(len) {
                return overconsumed_chunk_error(tag, len, consumed);
            }

            // Bytes the body decoder did not consume are discarded, landing the cursor on the
            // next envelope.
            body_reader.ignore()?;

            chunks.push(Chunk { id, tag, len, body });
        }

        Ok(Veado { chunks })
    }

    /// Reads a byte source to exhaustion and decodes it as a Veado stream.
    pub fn read_from<R: Read>(mut src: R) -> Result<Veado> {
        let mut buf = Vec::new();
        src.read_to_end(&mut buf)?;

        Veado::read(&mut BufReader::new(&buf))
    }
}
