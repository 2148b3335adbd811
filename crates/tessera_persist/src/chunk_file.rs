use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tessera_shared::chunk::ChunkData;
use tessera_shared::coords::{ChunkPos, CHUNK_VOLUME};
use tracing::debug;

/// Directory of headerless chunk files, one per chunk origin, named `x_z.chunk`.
/// Each file holds `CHUNK_VOLUME` block bytes in `BlockIndex` order.
#[derive(Debug, Clone)]
pub struct ChunkFiles {
    dir: PathBuf,
}

impl ChunkFiles {
    pub const EXTENSION: &'static str = "chunk";

    pub fn open(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn file_name(pos: ChunkPos) -> String {
        format!("{}_{}.{}", pos.x, pos.z, Self::EXTENSION)
    }

    pub fn parse_file_name(name: &str) -> Option<ChunkPos> {
        let stem = name.strip_suffix(Self::EXTENSION)?.strip_suffix('.')?;
        let (x, z) = stem.split_once('_')?;
        Some(ChunkPos::new(x.parse().ok()?, z.parse().ok()?))
    }

    pub fn chunk_path(&self, pos: ChunkPos) -> PathBuf {
        self.dir.join(Self::file_name(pos))
    }

    /// Reads a stored chunk. A missing or truncated file is `Ok(None)`; bytes
    /// past the first `CHUNK_VOLUME` are ignored.
    pub fn load(&self, pos: ChunkPos) -> io::Result<Option<ChunkData>> {
        let path = self.chunk_path(pos);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };

        if bytes.len() < CHUNK_VOLUME {
            debug!(
                "Ignoring truncated chunk file {} ({} of {} bytes)",
                path.display(),
                bytes.len(),
                CHUNK_VOLUME
            );
            return Ok(None);
        }

        Ok(ChunkData::from_bytes(&bytes[..CHUNK_VOLUME]))
    }

    pub fn save(&self, pos: ChunkPos, chunk: &ChunkData) -> io::Result<()> {
        fs::write(self.chunk_path(pos), chunk.as_bytes())
    }

    /// Origins of every chunk file in the directory, sorted by (x, z).
    pub fn stored_positions(&self) -> io::Result<Vec<ChunkPos>> {
        let mut positions = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if let Some(pos) = entry.file_name().to_str().and_then(Self::parse_file_name) {
                positions.push(pos);
            }
        }
        positions.sort_by_key(|pos| (pos.x, pos.z));
        Ok(positions)
    }
}
