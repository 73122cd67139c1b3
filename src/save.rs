use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use glam::IVec3;
use tracing::debug;

use crate::constants::CHUNK_FILE_EXTENSION;
use crate::core::block::BlockType;
use crate::core::chunk::{BlockGrid, Chunk};
use crate::error::PersistenceError;

const MAGIC_HEADER: &[u8; 4] = b"VXCK";
const VERSION: u32 = 1;
// magic + version + payload length
const HEADER_LEN: usize = 4 + 4 + 8;

/// On-disk payload: block codes in (z, y, x) storage order.
#[derive(Serialize, Deserialize)]
pub struct SavedChunk {
    pub origin: [i32; 3],
    pub edge: u32,
    pub blocks: Vec<u8>,
}

/// Serializes a chunk's blocks into a complete record (header plus payload).
pub fn encode_chunk(chunk: &Chunk) -> Result<Vec<u8>, PersistenceError> {
    let saved = SavedChunk {
        origin: chunk.origin().to_array(),
        edge: chunk.size() as u32,
        blocks: chunk.grid().as_slice().iter().map(|b| b.code()).collect(),
    };
    let data = bincode::serialize(&saved)?;

    let mut record = Vec::with_capacity(HEADER_LEN + data.len());
    record.extend_from_slice(MAGIC_HEADER);
    record.extend_from_slice(&VERSION.to_le_bytes());
    record.extend_from_slice(&(data.len() as u64).to_le_bytes());
    record.extend_from_slice(&data);
    Ok(record)
}

/// Parses a record and checks it describes a chunk of edge `size`.
pub fn decode_blocks(bytes: &[u8], size: usize) -> Result<BlockGrid, PersistenceError> {
    if bytes.len() < HEADER_LEN {
        if !bytes.starts_with(&MAGIC_HEADER[..bytes.len().min(4)]) {
            return Err(PersistenceError::BadMagic);
        }
        return Err(PersistenceError::Truncated {
            declared: HEADER_LEN as u64,
            found: bytes.len() as u64,
        });
    }

    let (magic, rest) = bytes.split_at(4);
    if magic != MAGIC_HEADER {
        return Err(PersistenceError::BadMagic);
    }

    let (version_bytes, rest) = rest.split_at(4);
    let version = u32::from_le_bytes([
        version_bytes[0],
        version_bytes[1],
        version_bytes[2],
        version_bytes[3],
    ]);
    if version != VERSION {
        return Err(PersistenceError::UnsupportedVersion(version));
    }

    let (len_bytes, payload) = rest.split_at(8);
    let mut declared = [0u8; 8];
    declared.copy_from_slice(len_bytes);
    let declared = u64::from_le_bytes(declared);
    if declared != payload.len() as u64 {
        return Err(PersistenceError::Truncated {
            declared,
            found: payload.len() as u64,
        });
    }

    let saved: SavedChunk = bincode::deserialize(payload)?;
    if saved.edge as usize != size {
        return Err(PersistenceError::EdgeMismatch {
            expected: size,
            found: saved.edge as usize,
        });
    }

    let expected = size * size * size;
    let found = saved.blocks.len();
    if found != expected {
        return Err(PersistenceError::BlockCount { expected, found });
    }

    let blocks = saved
        .blocks
        .into_iter()
        .map(|code| BlockType::from_code(code).ok_or(PersistenceError::UnknownBlock(code)))
        .collect::<Result<Vec<_>, _>>()?;

    BlockGrid::from_blocks(size, blocks).ok_or(PersistenceError::BlockCount { expected, found })
}

/// A directory of per-chunk record files, keyed by chunk origin.
#[derive(Clone, Debug)]
pub struct ChunkStore {
    dir: PathBuf,
}

impl ChunkStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ChunkStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, origin: IVec3) -> PathBuf {
        self.dir.join(format!(
            "chunk_{}_{}_{}.{}",
            origin.x, origin.y, origin.z, CHUNK_FILE_EXTENSION
        ))
    }

    /// Writes the chunk's record, replacing any previous one.
    pub fn save(&self, chunk: &Chunk) -> Result<PathBuf, PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(chunk.origin());
        let record = encode_chunk(chunk)?;

        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&record)?;
        writer.flush()?;

        debug!(path = %path.display(), bytes = record.len(), "saved chunk");
        Ok(path)
    }

    /// Reads the record for the chunk at `origin`; `Ok(None)` when none was saved.
    pub fn load(&self, origin: IVec3, size: usize) -> Result<Option<BlockGrid>, PersistenceError> {
        let path = self.path_for(origin);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let grid = decode_blocks(&bytes, size)?;
        debug!(path = %path.display(), "restored chunk");
        Ok(Some(grid))
    }
}
