//! Raw DEFLATE compression (RFC 1951)
//!
//! No zlib or gzip header and no length prefix: the stream ends at its own
//! final-block marker, which is all an independent inflater needs.

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use zkpaste_core::{PasteError, PasteResult};

/// Lossless byte-stream compression applied before encryption.
///
/// Law: `decompress(compress(x)) == x` for every `x`, including empty.
pub trait Compressor {
    fn compress(&self, data: &[u8]) -> PasteResult<Vec<u8>>;
    fn decompress(&self, data: &[u8]) -> PasteResult<Vec<u8>>;
}

/// Headerless DEFLATE via flate2.
#[derive(Debug, Clone, Copy)]
pub struct RawDeflate {
    level: u32,
}

impl RawDeflate {
    /// Compression level 0-9 (clamped).
    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(9),
        }
    }
}

impl Default for RawDeflate {
    fn default() -> Self {
        Self::new(6)
    }
}

impl Compressor for RawDeflate {
    fn compress(&self, data: &[u8]) -> PasteResult<Vec<u8>> {
        let mut deflater = Compress::new(Compression::new(self.level), false);
        let mut out = Vec::with_capacity(data.len() / 2 + 64);

        loop {
            if out.len() == out.capacity() {
                out.reserve(out.capacity().max(64));
            }
            let consumed = deflater.total_in() as usize;
            let before = out.len();
            let status = deflater
                .compress_vec(&data[consumed..], &mut out, FlushCompress::Finish)
                .map_err(|e| PasteError::Compression(format!("deflate failed: {e}")))?;
            if status == Status::StreamEnd {
                break;
            }
            let stalled = deflater.total_in() as usize == consumed && out.len() == before;
            if stalled && out.len() < out.capacity() {
                return Err(PasteError::Compression("deflate made no progress".into()));
            }
        }

        Ok(out)
    }

    fn decompress(&self, data: &[u8]) -> PasteResult<Vec<u8>> {
        let mut inflater = Decompress::new(false);
        let mut out = Vec::with_capacity(data.len().saturating_mul(3) + 64);

        loop {
            if out.len() == out.capacity() {
                out.reserve(out.capacity().max(64));
            }
            let consumed = inflater.total_in() as usize;
            let before = out.len();
            let status = inflater
                .decompress_vec(&data[consumed..], &mut out, FlushDecompress::Finish)
                .map_err(|e| PasteError::Compression(format!("corrupt deflate stream: {e}")))?;
            if status == Status::StreamEnd {
                break;
            }
            // Input exhausted (or unusable) without reaching the final block
            let stalled = inflater.total_in() as usize == consumed && out.len() == before;
            if stalled && out.len() < out.capacity() {
                return Err(PasteError::Compression(format!(
                    "truncated deflate stream: end marker missing after {} bytes",
                    data.len()
                )));
            }
        }

        let consumed = inflater.total_in() as usize;
        if consumed != data.len() {
            return Err(PasteError::Compression(format!(
                "{} trailing bytes after end of deflate stream",
                data.len() - consumed
            )));
        }

        Ok(out)
    }
}
