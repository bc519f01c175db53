//! File read strategies for the static handler.
//!
//! Four interchangeable ways to load a file into memory, selected by
//! configuration. All strategies produce byte-identical output for the same
//! file and fail the same way: a file over the configured ceiling is
//! rejected before any read, and I/O failures surface as `ReadError::Io`.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadStrategy {
    /// Async buffered read through `tokio::fs`.
    Buffered,
    /// Blocking chunked read on a worker thread, chunks shipped over a
    /// channel and reassembled.
    Channel,
    /// Blocking read into one exactly-sized preallocated buffer.
    Direct,
    /// Memory-mapped read, copied out to an owned buffer.
    Mmap,
}

#[derive(Debug)]
pub enum ReadError {
    /// The file exceeds the configured size ceiling.
    TooLarge { size: u64, limit: u64 },
    Io(std::io::Error),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::TooLarge { size, limit } => {
                write!(f, "file size {} exceeds the limit of {} bytes", size, limit)
            }
            ReadError::Io(e) => write!(f, "file read failed: {}", e),
        }
    }
}

impl std::error::Error for ReadError {}

impl From<std::io::Error> for ReadError {
    fn from(e: std::io::Error) -> Self {
        ReadError::Io(e)
    }
}

fn join_error(e: tokio::task::JoinError) -> ReadError {
    ReadError::Io(std::io::Error::other(e))
}

/// Reads the whole file with the given strategy.
///
/// The size ceiling is enforced up front from metadata, so no strategy ever
/// allocates for an oversized file.
pub async fn read_all(
    path: &Path,
    strategy: ReadStrategy,
    max_size: u64,
) -> Result<Vec<u8>, ReadError> {
    let meta = tokio::fs::metadata(path).await?;
    if meta.len() > max_size {
        return Err(ReadError::TooLarge {
            size: meta.len(),
            limit: max_size,
        });
    }

    match strategy {
        ReadStrategy::Buffered => read_buffered(path, meta.len() as usize).await,
        ReadStrategy::Channel => read_channel(path.to_path_buf()).await,
        ReadStrategy::Direct => read_direct(path.to_path_buf()).await,
        ReadStrategy::Mmap => read_mmap(path.to_path_buf()).await,
    }
}

async fn read_buffered(path: &Path, size_hint: usize) -> Result<Vec<u8>, ReadError> {
    let file = tokio::fs::File::open(path).await?;
    let mut reader = tokio::io::BufReader::new(file);
    let mut out = Vec::with_capacity(size_hint);
    reader.read_to_end(&mut out).await?;
    Ok(out)
}

async fn read_channel(path: PathBuf) -> Result<Vec<u8>, ReadError> {
    let (tx, mut rx) = mpsc::channel::<std::io::Result<Vec<u8>>>(16);

    let producer = tokio::task::spawn_blocking(move || {
        let mut file = match std::fs::File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                let _ = tx.blocking_send(Err(e));
                return;
            }
        };
        let mut chunk = vec![0u8; CHUNK_SIZE];
        loop {
            match file.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    // Receiver gone means the consumer bailed; stop reading.
                    if tx.blocking_send(Ok(chunk[..n].to_vec())).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(Err(e));
                    break;
                }
            }
        }
    });

    let mut out = Vec::new();
    while let Some(chunk) = rx.recv().await {
        out.extend_from_slice(&chunk?);
    }

    producer.await.map_err(join_error)?;
    Ok(out)
}

async fn read_direct(path: PathBuf) -> Result<Vec<u8>, ReadError> {
    tokio::task::spawn_blocking(move || {
        let mut file = std::fs::File::open(&path)?;
        let len = file.metadata()?.len() as usize;
        let mut buf = vec![0u8; len];
        file.read_exact(&mut buf)?;
        Ok(buf)
    })
    .await
    .map_err(join_error)?
}

async fn read_mmap(path: PathBuf) -> Result<Vec<u8>, ReadError> {
    tokio::task::spawn_blocking(move || {
        let file = std::fs::File::open(&path)?;
        // Mapping a zero-length file is an error on most platforms.
        if file.metadata()?.len() == 0 {
            return Ok(Vec::new());
        }
        // SAFETY: the mapping is read-only and copied out before the file
        // handle is dropped; concurrent truncation of served files is not
        // supported.
        let map = unsafe { memmap2::Mmap::map(&file)? };
        Ok(map.to_vec())
    })
    .await
    .map_err(join_error)?
}
