//! Error types for configuration and chunk persistence.
//!
//! Generation and meshing have no error type: both are total once the
//! settings have been validated. Out-of-range lookups return `None`.

use std::path::PathBuf;

use thiserror::Error;

use crate::utils::settings::WorldExtent;

/// Rejected world configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Chunks must contain at least one block.
    #[error("chunk size must be positive")]
    ZeroChunkSize,

    /// Chunk edge does not fit the world coordinate space.
    #[error("chunk size {0} is too large")]
    ChunkSizeTooLarge(usize),

    /// Block coordinates of the far world corner would overflow `i32`.
    #[error("world of {extent:?} chunks with edge {chunk_size} does not fit i32 block coordinates")]
    WorldTooLarge {
        extent: WorldExtent,
        chunk_size: usize,
    },

    /// A noise layer was configured without octaves.
    #[error("noise layer `{0}` needs at least one octave")]
    ZeroOctaves(&'static str),

    /// A threshold or frequency is NaN or infinite.
    #[error("noise layer `{0}` has a non-finite parameter")]
    NonFinite(&'static str),

    /// The configuration file could not be read.
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`WorldSettings`](crate::WorldSettings).
    #[error("cannot parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failure while storing or restoring a chunk record.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("chunk storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("chunk payload encoding failed: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("not a chunk record (bad magic header)")]
    BadMagic,

    #[error("unsupported chunk record version {0}")]
    UnsupportedVersion(u32),

    /// Header length disagrees with the bytes actually present.
    #[error("chunk record truncated: header declares {declared} bytes, found {found}")]
    Truncated { declared: u64, found: u64 },

    /// Element count is not `edge³`.
    #[error("chunk record holds {found} blocks, expected {expected}")]
    BlockCount { expected: usize, found: usize },

    /// Record was written for a different chunk size.
    #[error("chunk record edge is {found}, expected {expected}")]
    EdgeMismatch { expected: usize, found: usize },

    #[error("unknown block code {0}")]
    UnknownBlock(u8),
}
