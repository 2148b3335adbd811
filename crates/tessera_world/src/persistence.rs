use std::io;
use std::path::Path;

use tessera_persist::chunk_file::ChunkFiles;
use tessera_shared::chunk::ChunkData;
use tessera_shared::coords::ChunkPos;
use tessera_shared::worldgen::StrataGenerator;
use tracing::{debug, warn};

/// Generate-or-load policy for chunk voxels.
///
/// Without a backing directory every chunk is generated fresh and nothing is
/// written, which is what tests and throwaway worlds want.
#[derive(Debug, Clone)]
pub struct ChunkSource {
    files: Option<ChunkFiles>,
    generator: StrataGenerator,
}

impl ChunkSource {
    pub fn new(files: Option<ChunkFiles>, generator: StrataGenerator) -> Self {
        Self { files, generator }
    }

    pub fn in_memory(generator: StrataGenerator) -> Self {
        Self::new(None, generator)
    }

    pub fn open(dir: impl AsRef<Path>, generator: StrataGenerator) -> io::Result<Self> {
        Ok(Self::new(Some(ChunkFiles::open(dir)?), generator))
    }

    pub fn files(&self) -> Option<&ChunkFiles> {
        self.files.as_ref()
    }

    pub fn load(&self, pos: ChunkPos) -> Option<ChunkData> {
        let files = self.files.as_ref()?;
        match files.load(pos) {
            Ok(chunk) => chunk,
            Err(err) => {
                warn!("Failed to load chunk {:?}: {}", pos, err);
                None
            }
        }
    }

    /// Stored voxels when a complete file exists, otherwise freshly generated
    /// terrain, which is persisted before it is returned.
    pub fn generate_or_load(&self, pos: ChunkPos) -> ChunkData {
        if let Some(chunk) = self.load(pos) {
            debug!("Loaded chunk {:?}", pos);
            return chunk;
        }

        let generated = self.generator.generate_chunk(pos);
        debug!("Generated chunk {:?}", pos);
        self.save(pos, &generated);
        generated
    }

    /// Writes the chunk if a directory is attached. Failures are logged and
    /// reported as `false`; the chunk will simply be regenerated next time.
    pub fn save(&self, pos: ChunkPos, chunk: &ChunkData) -> bool {
        let Some(files) = self.files.as_ref() else {
            return false;
        };

        match files.save(pos, chunk) {
            Ok(()) => true,
            Err(err) => {
                warn!("Failed to save chunk {:?}: {}", pos, err);
                false
            }
        }
    }
}
