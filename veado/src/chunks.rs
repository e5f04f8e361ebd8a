// Veado
// Copyright (c) 2026 The Project Veado Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Chunk schema of the Veado container.
//!
//! Every structured chunk kind implements [`ParseChunk`] and consumes its fields in wire order.
//! Fields that are conditional on an earlier flag, count, or sentinel are decoded with an
//! explicit branch on the referenced value.

use std::fmt;

use veado_core::errors::{malformed_element_error, out_of_bounds_error, Error, Result};
use veado_core::io::{FiniteStream, ReadBytes};

use bitflags::bitflags;
use log::info;

use crate::varint::{read_string, read_uvarint};

/// Common trait implemented for all structured chunk bodies.
pub trait ParseChunk: Sized {
    fn parse<B: ReadBytes + FiniteStream>(reader: &mut B, tag: [u8; 4], len: u32) -> Result<Self>;
}

bitflags! {
    /// Per-effect behaviour flags. Bits outside the defined set are retained.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EffectFlags: u8 {
        /// The effect is enabled.
        const ACTIVE = 0x01;
        /// The effect takes its parameters from a named preset.
        const USE_PRESET = 0x02;
        /// The effect takes its parameters from another chunk.
        const USE_PRESET_CHUNK = 0x04;
    }
}

bitflags! {
    /// Rendering and sequencing flags of an animation state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StateFlags: u32 {
        /// Render without smoothing.
        const PIXELATED = 0x1;
        /// The state blinks.
        const BLINK = 0x2;
        /// The puppet starts in this state.
        const START = 0x4;
    }
}

/// How a state's keyboard shortcut triggers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutMode {
    /// Activate when the shortcut is pressed.
    Press,
    /// Activate when the shortcut is released.
    Release,
    /// Stay active while the shortcut is held.
    WhilePressed,
    /// A mode code this reader does not know, carried verbatim.
    Other([u8; 4]),
}

impl ShortcutMode {
    fn from_tag(tag: [u8; 4]) -> ShortcutMode {
        match &tag {
            b"PRES" => ShortcutMode::Press,
            b"RLSE" => ShortcutMode::Release,
            b"PRED" => ShortcutMode::WhilePressed,
            _ => ShortcutMode::Other(tag),
        }
    }
}

/// A single effect attached to an animation state.
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub id: String,
    pub flags: EffectFlags,
    /// Chunk holding the effect's preset. Present iff `USE_PRESET_CHUNK` is set.
    pub chunk_id: Option<u32>,
    /// Named preset. Present iff `USE_PRESET` is set.
    pub preset_id: Option<String>,
    /// Effect parameter values.
    pub values: Vec<f64>,
}

impl Effect {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B) -> Result<Effect> {
        let id = read_string(reader)?;
        let flags = EffectFlags::from_bits_retain(reader.read_u8()?);

        // The flag byte gates which of the two preset references follow it.
        let chunk_id = if flags.contains(EffectFlags::USE_PRESET_CHUNK) {
            Some(reader.read_u32()?)
        }
        else {
            None
        };

        let preset_id = if flags.contains(EffectFlags::USE_PRESET) {
            Some(read_string(reader)?)
        }
        else {
            None
        };

        let num_values = read_uvarint(reader)?;

        // num_values is untrusted input; a value needs eight bytes.
        if num_values > reader.bytes_available() / 8 {
            return out_of_bounds_error("effect: value count exceeds enclosing span");
        }

        let mut values = Vec::with_capacity(num_values as usize);

        for _ in 0..num_values {
            values.push(reader.read_f64()?);
        }

        Ok(Effect { id, flags, chunk_id, preset_id, values })
    }
}

/// Reads a count-prefixed effect collection.
fn read_effects<B: ReadBytes + FiniteStream>(reader: &mut B) -> Result<Vec<Effect>> {
    let num_effects = read_uvarint(reader)?;

    // An effect is at least an id length, a flag byte, and a value count.
    if num_effects > reader.bytes_available() / 3 {
        return out_of_bounds_error("effect: count exceeds enclosing span");
    }

    let mut effects = Vec::with_capacity(num_effects as usize);

    for _ in 0..num_effects {
        effects.push(Effect::read(reader)?);
    }

    Ok(effects)
}

/// An event-routing pair: where a signal comes from and what it is called.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub source: String,
    pub name: String,
}

impl Signal {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B) -> Result<Signal> {
        let source = read_string(reader)?;
        let name = read_string(reader)?;
        Ok(Signal { source, name })
    }
}

/// Authorship information (`META`).
#[derive(Debug, Clone, PartialEq)]
pub struct MetaChunk {
    /// Name of the software that produced the file.
    pub software: String,
    pub credits: String,
    pub description: String,
}

impl ParseChunk for MetaChunk {
    fn parse<B: ReadBytes + FiniteStream>(reader: &mut B, _: [u8; 4], _: u32) -> Result<MetaChunk> {
        let software = read_string(reader)?;
        let credits = read_string(reader)?;
        let description = read_string(reader)?;

        Ok(MetaChunk { software, credits, description })
    }
}

/// A list of chunk-id cross-references (`MLST`), filling the chunk body.
#[derive(Debug, Clone, PartialEq)]
pub struct ListChunk {
    pub chunk_ids: Vec<u32>,
}

impl ParseChunk for ListChunk {
    fn parse<B: ReadBytes + FiniteStream>(reader: &mut B, _: [u8; 4], _: u32) -> Result<ListChunk> {
        let available = reader.bytes_available();

        if available % 4 != 0 {
            return malformed_element_error("mlst: trailing partial chunk id");
        }

        let mut chunk_ids = Vec::with_capacity((available / 4) as usize);

        while reader.bytes_available() > 0 {
            chunk_ids.push(reader.read_u32()?);
        }

        Ok(ListChunk { chunk_ids })
    }
}

/// A named animation state (`MSTA`).
///
/// Eight chunk references select the image shown for every combination of mouth position and
/// blink phase, at thumbnail and full size.
#[derive(Debug, Clone, PartialEq)]
pub struct StateChunk {
    pub name: String,
    pub flags: StateFlags,
    pub thumb_closed_mouth: u32,
    pub thumb_open_mouth: u32,
    pub thumb_blinking_closed_mouth: u32,
    pub thumb_blinking_open_mouth: u32,
    pub closed_mouth: u32,
    pub open_mouth: u32,
    pub blinking_closed_mouth: u32,
    pub blinking_open_mouth: u32,
    /// Blink hold time in seconds.
    pub blink_duration: f64,
    pub min_blink_interval: f64,
    pub max_blink_interval: f64,
    pub closed_mouth_effects: Vec<Effect>,
    pub open_mouth_effects: Vec<Effect>,
    /// Effects fired when the mouth opens.
    pub on_open_mouth_effects: Vec<Effect>,
    /// Effects fired when the mouth closes.
    pub on_close_mouth_effects: Vec<Effect>,
    pub signals: Vec<Signal>,
    pub shortcut_mode: ShortcutMode,
}

impl ParseChunk for StateChunk {
    fn parse<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        _: [u8; 4],
        _: u32,
    ) -> Result<StateChunk> {
        let name = read_string(reader)?;
        let flags = StateFlags::from_bits_retain(reader.read_u32()?);

        let thumb_closed_mouth = reader.read_u32()?;
        let thumb_open_mouth = reader.read_u32()?;
        let thumb_blinking_closed_mouth = reader.read_u32()?;
        let thumb_blinking_open_mouth = reader.read_u32()?;
        let closed_mouth = reader.read_u32()?;
        let open_mouth = reader.read_u32()?;
        let blinking_closed_mouth = reader.read_u32()?;
        let blinking_open_mouth = reader.read_u32()?;

        let blink_duration = reader.read_f64()?;
        let min_blink_interval = reader.read_f64()?;
        let max_blink_interval = reader.read_f64()?;

        let closed_mouth_effects = read_effects(reader)?;
        let open_mouth_effects = read_effects(reader)?;
        let on_open_mouth_effects = read_effects(reader)?;
        let on_close_mouth_effects = read_effects(reader)?;

        let num_signals = read_uvarint(reader)?;

        // A signal is at least two string lengths.
        if num_signals > reader.bytes_available() / 2 {
            return out_of_bounds_error("msta: signal count exceeds enclosing span");
        }

        let mut signals = Vec::with_capacity(num_signals as usize);

        for _ in 0..num_signals {
            signals.push(Signal::read(reader)?);
        }

        let shortcut_mode = ShortcutMode::from_tag(reader.read_quad_bytes()?);

        Ok(StateChunk {
            name,
            flags,
            thumb_closed_mouth,
            thumb_open_mouth,
            thumb_blinking_closed_mouth,
            thumb_blinking_open_mouth,
            closed_mouth,
            open_mouth,
            blinking_closed_mouth,
            blinking_open_mouth,
            blink_duration,
            min_blink_interval,
            max_blink_interval,
            closed_mouth_effects,
            open_mouth_effects,
            on_open_mouth_effects,
            on_close_mouth_effects,
            signals,
            shortcut_mode,
        })
    }
}

/// One metadata blob attached to an asset entry, keyed by a 4-character code.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetMetadata {
    pub kind: [u8; 4],
    pub data: Box<[u8]>,
}

impl AssetMetadata {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B) -> Result<AssetMetadata> {
        let kind = reader.read_quad_bytes()?;
        let len = read_uvarint(reader)?;

        if len > reader.bytes_available() {
            return out_of_bounds_error("asfd: metadata length exceeds enclosing span");
        }

        let data = reader.read_boxed_slice_exact(len as usize)?;

        Ok(AssetMetadata { kind, data })
    }
}

/// A named link from the puppet to an asset chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetEntry {
    pub name: String,
    pub chunk_id: u32,
    pub metadata: Vec<AssetMetadata>,
}

impl AssetEntry {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B) -> Result<AssetEntry> {
        let name = read_string(reader)?;
        let chunk_id = reader.read_u32()?;

        let num_metadata = read_uvarint(reader)?;

        // A metadata blob is at least a kind code and a length.
        if num_metadata > reader.bytes_available() / 5 {
            return out_of_bounds_error("asfd: metadata count exceeds enclosing span");
        }

        let mut metadata = Vec::with_capacity(num_metadata as usize);

        for _ in 0..num_metadata {
            metadata.push(AssetMetadata::read(reader)?);
        }

        Ok(AssetEntry { name, chunk_id, metadata })
    }
}

/// Asset links (`ASFD`), filling the chunk body.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetChunk {
    pub root: [u8; 4],
    pub entries: Vec<AssetEntry>,
}

impl ParseChunk for AssetChunk {
    fn parse<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        _: [u8; 4],
        _: u32,
    ) -> Result<AssetChunk> {
        let root = reader.read_quad_bytes()?;

        let mut entries = Vec::new();

        while reader.bytes_available() > 0 {
            match AssetEntry::read(reader) {
                Ok(entry) => entries.push(entry),
                // A truncation inside the trailing entry means it straddles the chunk bound.
                Err(Error::OutOfBounds(_))
                | Err(Error::TruncatedInput(_))
                | Err(Error::MalformedVarint(_)) => {
                    return malformed_element_error("asfd: partial entry at end of chunk");
                }
                Err(err) => return Err(err),
            }
        }

        Ok(AssetChunk { root, entries })
    }
}

/// An opaque thumbnail image payload (`THMB`), filling the chunk body.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailChunk {
    pub data: Box<[u8]>,
}

impl ParseChunk for ThumbnailChunk {
    fn parse<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        _: [u8; 4],
        _: u32,
    ) -> Result<ThumbnailChunk> {
        let data = reader.read_boxed_slice_exact(reader.bytes_available() as usize)?;
        Ok(ThumbnailChunk { data })
    }
}

/// One frame of an animated image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    /// Chunk holding the frame's image data.
    pub chunk_id: u32,
    pub offset_x: i32,
    pub offset_y: i32,
    /// Display time in seconds.
    pub duration: f64,
}

impl AnimationFrame {
    fn read<B: ReadBytes>(reader: &mut B) -> Result<AnimationFrame> {
        let chunk_id = reader.read_u32()?;
        let offset_x = reader.read_i32()?;
        let offset_y = reader.read_i32()?;
        let duration = reader.read_f64()?;

        Ok(AnimationFrame { chunk_id, offset_x, offset_y, duration })
    }
}

/// A frame animation (`AIMG`).
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationChunk {
    pub width: u32,
    pub height: u32,
    /// Playback repeat count. A single-frame image is not animated and carries none.
    pub num_loops: Option<u64>,
    pub frames: Vec<AnimationFrame>,
}

impl ParseChunk for AnimationChunk {
    fn parse<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        _: [u8; 4],
        _: u32,
    ) -> Result<AnimationChunk> {
        let width = reader.read_u32()?;
        let height = reader.read_u32()?;

        let num_frames = read_uvarint(reader)?;

        // Loop semantics only exist when there is more than one frame.
        let num_loops = if num_frames > 1 { Some(read_uvarint(reader)?) } else { None };

        // A frame is a chunk id, two offsets, and a duration.
        if num_frames > reader.bytes_available() / 16 {
            return out_of_bounds_error("aimg: frame count exceeds enclosing span");
        }

        let mut frames = Vec::with_capacity(num_frames as usize);

        for _ in 0..num_frames {
            frames.push(AnimationFrame::read(reader)?);
        }

        Ok(AnimationChunk { width, height, num_loops, frames })
    }
}

/// Channel counts at or above this value mark the channel as absent.
const CHANNEL_ABSENT: u32 = 0xffff_ff00;

/// Indexed color-channel image data (`ABMP`).
///
/// A channel whose count is at or above the absence sentinel carries no element bytes and
/// decodes to an empty sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapChunk {
    pub width: u32,
    pub height: u32,
    pub format: [u8; 4],
    pub num_alphas: u32,
    pub num_reds: u32,
    pub num_greens: u32,
    pub num_blues: u32,
    pub alphas: Vec<u32>,
    pub reds: Vec<u32>,
    pub greens: Vec<u32>,
    pub blues: Vec<u32>,
}

fn read_channel<B: ReadBytes + FiniteStream>(reader: &mut B, count: u32) -> Result<Vec<u32>> {
    if count >= CHANNEL_ABSENT {
        return Ok(Vec::new());
    }

    if u64::from(count) > reader.bytes_available() / 4 {
        return out_of_bounds_error("abmp: channel count exceeds enclosing span");
    }

    let mut channel = Vec::with_capacity(count as usize);

    for _ in 0..count {
        channel.push(reader.read_u32()?);
    }

    Ok(channel)
}

impl ParseChunk for BitmapChunk {
    fn parse<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        _: [u8; 4],
        _: u32,
    ) -> Result<BitmapChunk> {
        let width = reader.read_u32()?;
        let height = reader.read_u32()?;
        let format = reader.read_quad_bytes()?;

        // All four counts precede the channel sequences.
        let num_alphas = reader.read_u32()?;
        let num_reds = reader.read_u32()?;
        let num_greens = reader.read_u32()?;
        let num_blues = reader.read_u32()?;

        let alphas = read_channel(reader, num_alphas)?;
        let reds = read_channel(reader, num_reds)?;
        let greens = read_channel(reader, num_greens)?;
        let blues = read_channel(reader, num_blues)?;

        Ok(BitmapChunk {
            width,
            height,
            format,
            num_alphas,
            num_reds,
            num_greens,
            num_blues,
            alphas,
            reds,
            greens,
            blues,
        })
    }
}

/// A single envelope-framed record of a Veado stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Numeric chunk id, referenced by other chunks.
    pub id: u32,
    /// The 4-character chunk kind tag.
    pub tag: [u8; 4],
    /// Declared body length in bytes.
    pub len: u32,
    pub body: ChunkBody,
}

/// The decoded body of a chunk, selected solely by the envelope tag.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkBody {
    Meta(MetaChunk),
    List(ListChunk),
    State(StateChunk),
    Asset(AssetChunk),
    Thumbnail(ThumbnailChunk),
    Animation(AnimationChunk),
    Bitmap(BitmapChunk),
    /// A chunk kind this reader does not know, carried opaquely.
    Unknown(Box<[u8]>),
}

impl ChunkBody {
    /// Decodes the chunk body matching `tag` from a reader scoped to the declared body length.
    pub(crate) fn read<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        tag: [u8; 4],
        len: u32,
    ) -> Result<ChunkBody> {
        let body = match &tag {
            b"META" => ChunkBody::Meta(MetaChunk::parse(reader, tag, len)?),
            b"MLST" => ChunkBody::List(ListChunk::parse(reader, tag, len)?),
            b"MSTA" => ChunkBody::State(StateChunk::parse(reader, tag, len)?),
            b"ASFD" => ChunkBody::Asset(AssetChunk::parse(reader, tag, len)?),
            b"THMB" => ChunkBody::Thumbnail(ThumbnailChunk::parse(reader, tag, len)?),
            b"AIMG" => ChunkBody::Animation(AnimationChunk::parse(reader, tag, len)?),
            b"ABMP" => ChunkBody::Bitmap(BitmapChunk::parse(reader, tag, len)?),
            _ => {
                // Unrecognized chunk kinds are carried, not rejected.
                info!("unknown chunk: tag={}, len={}", String::from_utf8_lossy(&tag), len);

                ChunkBody::Unknown(reader.read_boxed_slice_exact(reader.bytes_available() as usize)?)
            }
        };

        Ok(body)
    }
}

impl fmt::Display for ChunkBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkBody::Meta(_) => write!(f, "meta"),
            ChunkBody::List(_) => write!(f, "chunk list"),
            ChunkBody::State(state) => write!(f, "state \"{}\"", state.name),
            ChunkBody::Asset(asset) => write!(f, "{} asset entries", asset.entries.len()),
            ChunkBody::Thumbnail(thumb) => write!(f, "{} byte thumbnail", thumb.data.len()),
            ChunkBody::Animation(anim) => {
                write!(f, "{}x{} animation, {} frames", anim.width, anim.height, anim.frames.len())
            }
            ChunkBody::Bitmap(bitmap) => write!(f, "{}x{} bitmap", bitmap.width, bitmap.height),
            ChunkBody::Unknown(data) => write!(f, "{} opaque bytes", data.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use veado_core::errors::Error;
    use veado_core::io::{BufReader, FiniteStream};

    use super::*;

    fn uvarint(mut value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            let mut byte = (value & 0x7f) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            out.push(byte);
            if value == 0 {
                return out;
            }
        }
    }

    fn string(text: &str) -> Vec<u8> {
        let mut out = uvarint(text.len() as u64);
        out.extend_from_slice(text.as_bytes());
        out
    }

    #[test]
    fn effect_flags_gate_both_preset_fields() {
        // USE_PRESET | USE_PRESET_CHUNK: the chunk reference precedes the preset name.
        let mut body = string("shake");
        body.push(0x06);
        body.extend_from_slice(&7u32.to_le_bytes());
        body.extend_from_slice(&string("wobble"));
        body.extend_from_slice(&uvarint(2));
        body.extend_from_slice(&1.5f64.to_le_bytes());
        body.extend_from_slice(&0.25f64.to_le_bytes());

        let effect = Effect::read(&mut BufReader::new(&body)).unwrap();

        assert_eq!(effect.id, "shake");
        assert_eq!(effect.chunk_id, Some(7));
        assert_eq!(effect.preset_id.as_deref(), Some("wobble"));
        assert_eq!(effect.values, vec![1.5, 0.25]);
    }

    #[test]
    fn effect_flags_gate_neither_preset_field() {
        let mut body = string("shake");
        body.push(0x01);
        body.extend_from_slice(&uvarint(0));

        let mut reader = BufReader::new(&body);
        let effect = Effect::read(&mut reader).unwrap();

        assert_eq!(effect.flags, EffectFlags::ACTIVE);
        assert_eq!(effect.chunk_id, None);
        assert_eq!(effect.preset_id, None);
        assert!(effect.values.is_empty());
        assert_eq!(reader.bytes_available(), 0);
    }

    #[test]
    fn effect_value_count_is_validated() {
        let mut body = string("shake");
        body.push(0x00);
        body.extend_from_slice(&uvarint(1 << 40));

        let err = Effect::read(&mut BufReader::new(&body)).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds(_)));
    }

    #[test]
    fn list_fills_the_body() {
        let mut body = Vec::new();
        for id in [3u32, 5, 8] {
            body.extend_from_slice(&id.to_le_bytes());
        }

        let list = ListChunk::parse(&mut BufReader::new(&body), *b"MLST", 12).unwrap();
        assert_eq!(list.chunk_ids, vec![3, 5, 8]);
    }

    #[test]
    fn list_rejects_a_partial_trailing_id() {
        let body = [1, 0, 0, 0, 2, 0];
        let err = ListChunk::parse(&mut BufReader::new(&body), *b"MLST", 6).unwrap_err();
        assert!(matches!(err, Error::MalformedElement(_)));
    }

    #[test]
    fn single_frame_animation_has_no_loop_count() {
        let mut body = Vec::new();
        body.extend_from_slice(&32u32.to_le_bytes());
        body.extend_from_slice(&24u32.to_le_bytes());
        body.extend_from_slice(&uvarint(1));
        body.extend_from_slice(&9u32.to_le_bytes());
        body.extend_from_slice(&(-4i32).to_le_bytes());
        body.extend_from_slice(&6i32.to_le_bytes());
        body.extend_from_slice(&0.1f64.to_le_bytes());

        let mut reader = BufReader::new(&body);
        let anim = AnimationChunk::parse(&mut reader, *b"AIMG", body.len() as u32).unwrap();

        assert_eq!(anim.num_loops, None);
        assert_eq!(
            anim.frames,
            vec![AnimationFrame { chunk_id: 9, offset_x: -4, offset_y: 6, duration: 0.1 }]
        );
        assert_eq!(reader.bytes_available(), 0);
    }

    #[test]
    fn multi_frame_animation_reads_a_loop_count() {
        let mut body = Vec::new();
        body.extend_from_slice(&32u32.to_le_bytes());
        body.extend_from_slice(&24u32.to_le_bytes());
        body.extend_from_slice(&uvarint(3));
        body.extend_from_slice(&uvarint(300));
        for id in [1u32, 2, 3] {
            body.extend_from_slice(&id.to_le_bytes());
            body.extend_from_slice(&0i32.to_le_bytes());
            body.extend_from_slice(&0i32.to_le_bytes());
            body.extend_from_slice(&0.2f64.to_le_bytes());
        }

        let anim = AnimationChunk::parse(&mut BufReader::new(&body), *b"AIMG", 0).unwrap();

        assert_eq!(anim.num_loops, Some(300));
        assert_eq!(anim.frames.len(), 3);
        assert_eq!(anim.frames[2].chunk_id, 3);
    }

    #[test]
    fn sentinel_channel_counts_consume_no_bytes() {
        let mut body = Vec::new();
        body.extend_from_slice(&2u32.to_le_bytes());
        body.extend_from_slice(&2u32.to_le_bytes());
        body.extend_from_slice(b"IDX8");
        body.extend_from_slice(&0xffff_ffffu32.to_le_bytes());
        body.extend_from_slice(&2u32.to_le_bytes());
        body.extend_from_slice(&0xffff_ff00u32.to_le_bytes());
        body.extend_from_slice(&0u32.to_le_bytes());
        // Only the red channel carries elements.
        body.extend_from_slice(&0xaau32.to_le_bytes());
        body.extend_from_slice(&0xbbu32.to_le_bytes());

        let mut reader = BufReader::new(&body);
        let bitmap = BitmapChunk::parse(&mut reader, *b"ABMP", body.len() as u32).unwrap();

        assert_eq!(bitmap.num_alphas, 0xffff_ffff);
        assert!(bitmap.alphas.is_empty());
        assert_eq!(bitmap.reds, vec![0xaa, 0xbb]);
        assert!(bitmap.greens.is_empty());
        assert!(bitmap.blues.is_empty());
        assert_eq!(reader.bytes_available(), 0);
    }

    #[test]
    fn asset_entries_fill_the_body() {
        let mut body = Vec::new();
        body.extend_from_slice(b"SNDS");
        // Entry with one metadata blob.
        body.extend_from_slice(&string("bark"));
        body.extend_from_slice(&21u32.to_le_bytes());
        body.extend_from_slice(&uvarint(1));
        body.extend_from_slice(b"WAVE");
        body.extend_from_slice(&uvarint(3));
        body.extend_from_slice(&[0xde, 0xad, 0xbe]);
        // Entry with none.
        body.extend_from_slice(&string("howl"));
        body.extend_from_slice(&22u32.to_le_bytes());
        body.extend_from_slice(&uvarint(0));

        let asset = AssetChunk::parse(&mut BufReader::new(&body), *b"ASFD", 0).unwrap();

        assert_eq!(asset.root, *b"SNDS");
        assert_eq!(asset.entries.len(), 2);
        assert_eq!(asset.entries[0].name, "bark");
        assert_eq!(asset.entries[0].metadata[0].kind, *b"WAVE");
        assert_eq!(&asset.entries[0].metadata[0].data[..], &[0xde, 0xad, 0xbe]);
        assert_eq!(asset.entries[1].chunk_id, 22);
        assert!(asset.entries[1].metadata.is_empty());
    }

    #[test]
    fn partial_trailing_asset_entry_is_malformed() {
        let mut body = Vec::new();
        body.extend_from_slice(b"SNDS");
        body.extend_from_slice(&string("bark"));
        // The chunk id is cut off after two bytes.
        body.extend_from_slice(&[21, 0]);

        let err = AssetChunk::parse(&mut BufReader::new(&body), *b"ASFD", 0).unwrap_err();
        assert!(matches!(err, Error::MalformedElement(_)));
    }

    #[test]
    fn state_fields_decode_in_wire_order() {
        let mut body = string("talking");
        body.extend_from_slice(&0x5u32.to_le_bytes());
        for chunk_ref in 1u32..=8 {
            body.extend_from_slice(&chunk_ref.to_le_bytes());
        }
        body.extend_from_slice(&0.2f64.to_le_bytes());
        body.extend_from_slice(&1.0f64.to_le_bytes());
        body.extend_from_slice(&4.0f64.to_le_bytes());
        // Empty closed/open collections, one effect on each transition.
        body.extend_from_slice(&uvarint(0));
        body.extend_from_slice(&uvarint(0));
        for _ in 0..2 {
            body.extend_from_slice(&uvarint(1));
            body.extend_from_slice(&string("fade"));
            body.push(0x01);
            body.extend_from_slice(&uvarint(1));
            body.extend_from_slice(&0.5f64.to_le_bytes());
        }
        body.extend_from_slice(&uvarint(1));
        body.extend_from_slice(&string("mic"));
        body.extend_from_slice(&string("talk"));
        body.extend_from_slice(b"PRES");

        let mut reader = BufReader::new(&body);
        let state = StateChunk::parse(&mut reader, *b"MSTA", body.len() as u32).unwrap();

        assert_eq!(state.name, "talking");
        assert_eq!(state.flags, StateFlags::PIXELATED | StateFlags::START);
        assert_eq!(state.thumb_closed_mouth, 1);
        assert_eq!(state.blinking_open_mouth, 8);
        assert_eq!(state.blink_duration, 0.2);
        assert_eq!(state.max_blink_interval, 4.0);
        assert!(state.closed_mouth_effects.is_empty());
        assert_eq!(state.on_open_mouth_effects[0].id, "fade");
        assert_eq!(state.on_close_mouth_effects[0].values, vec![0.5]);
        assert_eq!(state.signals[0].source, "mic");
        assert_eq!(state.signals[0].name, "talk");
        assert_eq!(state.shortcut_mode, ShortcutMode::Press);
        assert_eq!(reader.bytes_available(), 0);
    }

    #[test]
    fn unknown_shortcut_mode_is_carried() {
        assert_eq!(ShortcutMode::from_tag(*b"TOGL"), ShortcutMode::Other(*b"TOGL"));
    }
}
