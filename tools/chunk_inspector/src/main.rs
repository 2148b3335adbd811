use std::collections::BTreeMap;
use std::env;
use std::path::Path;

use tessera_persist::chunk_file::ChunkFiles;
use tessera_shared::block::BlockId;
use tessera_shared::chunk::ChunkData;
use tessera_shared::coords::{BlockIndex, CHUNK_HEIGHT_I32, CHUNK_WIDTH_I32};

fn main() {
    let Some(path) = env::args().nth(1) else {
        eprintln!("Usage: chunk_inspector <path/to/x_z.chunk>");
        std::process::exit(2);
    };

    if let Err(err) = run(Path::new(&path)) {
        eprintln!("chunk_inspector error: {err}");
        std::process::exit(1);
    }
}

fn run(path: &Path) -> Result<(), String> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| format!("{} has no file name", path.display()))?;
    let pos = ChunkFiles::parse_file_name(name)
        .ok_or_else(|| format!("{name} is not named like x_z.{}", ChunkFiles::EXTENSION))?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let files = ChunkFiles::open(dir)
        .map_err(|err| format!("failed to open {}: {err}", dir.display()))?;
    let chunk = files
        .load(pos)
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?
        .ok_or_else(|| format!("{} is missing or truncated", path.display()))?;

    println!("Chunk: {}", path.display());
    println!("Origin: ({}, {})", pos.x, pos.z);

    println!("Layers:");
    for y in 0..CHUNK_HEIGHT_I32 {
        let census = layer_census(&chunk, y);
        if census.len() == 1 && census.contains_key(&BlockId::AIR) {
            continue;
        }
        let summary: Vec<String> = census
            .iter()
            .map(|(block, count)| format!("{} x{count}", block_label(*block)))
            .collect();
        println!("  y={y:>2}: {}", summary.join(", "));
    }

    println!("Totals:");
    let mut totals = BTreeMap::new();
    for block in chunk.blocks.iter() {
        *totals.entry(*block).or_insert(0usize) += 1;
    }
    for (block, count) in totals {
        println!("  {:<12} {count}", block_label(block));
    }

    Ok(())
}

fn layer_census(chunk: &ChunkData, y: i32) -> BTreeMap<BlockId, usize> {
    let mut census = BTreeMap::new();
    for z in 0..CHUNK_WIDTH_I32 {
        for x in 0..CHUNK_WIDTH_I32 {
            if let Some(block) = chunk.get(BlockIndex::new(x, y, z)) {
                *census.entry(block).or_insert(0) += 1;
            }
        }
    }
    census
}

fn block_label(block: BlockId) -> String {
    match block.name() {
        Some(name) => name.to_owned(),
        None => format!("unknown(0x{:02x})", block.0),
    }
}
