//! Gzip path for persisted MIDI artifacts.
//!
//! Large or low-quality recordings are stored compressed; readers sniff the
//! gzip magic so both stored forms decode through one entry point.

use std::io::{self, Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

/// Gzip stream magic.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Compression is applied when the encoded file exceeds this size.
pub const COMPRESS_SIZE_THRESHOLD: usize = 1024;

/// ... or when the artifact's quality falls below this value.
pub const COMPRESS_QUALITY_THRESHOLD: f64 = 0.8;

/// Whether an encoded buffer of `len` bytes at `quality` should be stored
/// gzip-compressed.
pub fn should_compress(len: usize, quality: f64) -> bool {
    len > COMPRESS_SIZE_THRESHOLD || quality < COMPRESS_QUALITY_THRESHOLD
}

/// Gzip-compresses a buffer.
pub fn compress(bytes: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()
}

/// Decompresses a gzip buffer.
pub fn decompress(bytes: &[u8]) -> io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

/// Returns the plain bytes, decompressing first when the buffer carries the
/// gzip magic.
pub fn read_maybe_gzip(bytes: &[u8]) -> io::Result<Vec<u8>> {
    if bytes.len() >= 2 && bytes[0..2] == GZIP_MAGIC {
        decompress(bytes)
    } else {
        Ok(bytes.to_vec())
    }
}
