// Veado
// Copyright (c) 2026 The Project Veado Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

use std::fs::File;

use clap::{Arg, Command};
use log::error;

use veado::core::errors::Result;
use veado::{Chunk, ChunkBody, Veado};

fn main() {
    pretty_env_logger::init();

    let args = Command::new("Veado Dump")
        .version("1.0")
        .about("Decode and inspect Veado puppet files")
        .arg(Arg::new("INPUT").help("The input file path").required(true).index(1))
        .get_matches();

    let path = args.value_of("INPUT").unwrap();

    let code = match run(path) {
        Ok(()) => 0,
        Err(err) => {
            error!("{}: {}", path, err);
            1
        }
    };

    std::process::exit(code);
}

fn run(path: &str) -> Result<()> {
    let file = File::open(path)?;
    let puppet = Veado::read_from(file)?;

    println!("{}: {} chunk(s)", path, puppet.chunks.len());

    for (index, chunk) in puppet.chunks.iter().enumerate() {
        print_chunk(index, chunk);
    }

    Ok(())
}

fn fourcc(tag: &[u8; 4]) -> String {
    String::from_utf8_lossy(tag).into_owned()
}

fn print_chunk(index: usize, chunk: &Chunk) {
    println!("[{:>3}] id={} tag={} len={}", index, chunk.id, fourcc(&chunk.tag), chunk.len);

    match &chunk.body {
        ChunkBody::Meta(meta) => {
            println!("      software:    {}", meta.software);
            println!("      credits:     {}", meta.credits);
            println!("      description: {}", meta.description);
        }
        ChunkBody::List(list) => {
            println!("      chunk ids:   {:?}", list.chunk_ids);
        }
        ChunkBody::State(state) => {
            println!("      name:        {}", state.name);
            println!("      flags:       {:?}", state.flags);
            println!(
                "      blink:       {}s every {}s..{}s",
                state.blink_duration, state.min_blink_interval, state.max_blink_interval
            );
            println!(
                "      effects:     {} closed, {} open, {} on-open, {} on-close",
                state.closed_mouth_effects.len(),
                state.open_mouth_effects.len(),
                state.on_open_mouth_effects.len(),
                state.on_close_mouth_effects.len()
            );
            println!("      signals:     {}", state.signals.len());
            println!("      shortcut:    {:?}", state.shortcut_mode);
        }
        ChunkBody::Asset(asset) => {
            println!("      root:        {}", fourcc(&asset.root));
            for entry in &asset.entries {
                println!(
                    "      entry:       {} -> chunk {} ({} metadata)",
                    entry.name,
                    entry.chunk_id,
                    entry.metadata.len()
                );
            }
        }
        ChunkBody::Thumbnail(thumb) => {
            println!("      {} byte thumbnail", thumb.data.len());
        }
        ChunkBody::Animation(anim) => {
            println!(
                "      {}x{}, {} frame(s), loops={:?}",
                anim.width,
                anim.height,
                anim.frames.len(),
                anim.num_loops
            );
        }
        ChunkBody::Bitmap(bitmap) => {
            println!(
                "      {}x{} {}, a/r/g/b = {}/{}/{}/{} indices",
                bitmap.width,
                bitmap.height,
                fourcc(&bitmap.format),
                bitmap.alphas.len(),
                bitmap.reds.len(),
                bitmap.greens.len(),
                bitmap.blues.len()
            );
        }
        ChunkBody::Unknown(data) => {
            println!("      {} opaque byte(s)", data.len());
        }
    }
}
