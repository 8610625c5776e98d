//! Chunked file reading for multipart uploads.
//!
//! A file is split into fixed-size blocks that are handed to the upload
//! orchestrator one at a time, in byte order.

mod chunked;
mod types;
mod validation;

pub use chunked::ChunkReader;
pub use types::Chunk;
pub use validation::validate_upload_file;

/// Default chunk size: 64 MiB.
///
/// Every chunk becomes one part of the multipart upload, so this also bounds
/// the memory held per in-flight PUT.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid path: {0}")]
    InvalidPath(String),
}
