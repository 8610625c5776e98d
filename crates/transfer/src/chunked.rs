use std::io::{ErrorKind, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::types::Chunk;
use crate::{DEFAULT_CHUNK_SIZE, TransferError};

// ---------------------------------------------------------------------------
// ChunkReader
// ---------------------------------------------------------------------------

/// Reads a file front to back in fixed-size chunks.
///
/// Every chunk except the last is exactly `chunk_size` bytes. The reader is
/// forward-only: once it has returned `None` or an error it stays exhausted,
/// and reading the file again means opening a new reader.
///
/// The SHA-256 of everything read so far is kept as the chunks go by, so the
/// file digest is available after the last chunk without a second pass.
pub struct ChunkReader {
    file: std::fs::File,
    chunk_size: usize,
    offset: u64,
    file_size: u64,
    hasher: Sha256,
    done: bool,
}

impl ChunkReader {
    /// Opens `path` for chunked reading.
    ///
    /// If `chunk_size` is 0, [`DEFAULT_CHUNK_SIZE`] (64 MiB) is used.
    pub fn new(path: &Path, chunk_size: usize) -> Result<Self, TransferError> {
        let file = std::fs::File::open(path)?;
        let file_size = file.metadata()?.len();
        let chunk_size = if chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            chunk_size
        };
        Ok(Self {
            file,
            chunk_size,
            offset: 0,
            file_size,
            hasher: Sha256::new(),
            done: false,
        })
    }

    /// Reads the next chunk. Returns `None` at EOF.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>, TransferError> {
        if self.done {
            return Ok(None);
        }

        let remaining = self.file_size.saturating_sub(self.offset);
        let want = usize::try_from(remaining)
            .unwrap_or(usize::MAX)
            .min(self.chunk_size);
        let mut buf = vec![0u8; want];
        let filled = match fill(&mut self.file, &mut buf) {
            Ok(n) => n,
            Err(e) => {
                self.done = true;
                return Err(e.into());
            }
        };
        if filled == 0 {
            self.done = true;
            return Ok(None);
        }
        buf.truncate(filled);
        self.hasher.update(&buf);

        self.offset += filled as u64;
        if filled < self.chunk_size || self.offset >= self.file_size {
            self.done = true;
        }
        Ok(Some(Chunk { data: buf }))
    }

    /// Hex-encoded SHA-256 of the bytes returned so far.
    ///
    /// Once the reader is exhausted this is the digest of the whole file.
    pub fn digest(&self) -> String {
        hex::encode(self.hasher.clone().finalize())
    }

    /// Bytes remaining to read.
    pub fn remaining(&self) -> u64 {
        self.file_size.saturating_sub(self.offset)
    }

    /// Number of chunks the file splits into, `ceil(file_size / chunk_size)`.
    pub fn chunk_count(&self) -> u64 {
        self.file_size.div_ceil(self.chunk_size as u64)
    }
}

impl Iterator for ChunkReader {
    type Item = Result<Chunk, TransferError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}

/// Reads until `buf` is full or EOF, retrying interrupted and short reads.
fn fill(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
