//! Transient output artifact
//!
//! Encoders write into an `OutputArtifact`; finalizing it yields a
//! read-once `EncodedOutput` carrying the declared content type and byte
//! length. Small outputs stay in memory, large ones spill to an anonymous
//! temporary file that is deleted on drop, so release is guaranteed on
//! every path including early error returns.

use std::io::{Read, Seek, SeekFrom, Write};

use tempfile::SpooledTempFile;

use crate::constants::{ARTIFACT_SPOOL_THRESHOLD, CONTENT_SNIFF_LEN};

use super::error::ImageError;
use super::format::sniff_content_type;

/// Byte sink for the encoder stage
pub struct OutputArtifact {
    file: SpooledTempFile,
}

impl OutputArtifact {
    pub fn new() -> Self {
        Self {
            file: SpooledTempFile::new(ARTIFACT_SPOOL_THRESHOLD),
        }
    }

    /// Seal the artifact: record its length and sniff the content type from
    /// the bytes that were actually written.
    pub fn finalize(mut self) -> Result<EncodedOutput, ImageError> {
        let len = self.file.seek(SeekFrom::End(0))?;
        self.file.seek(SeekFrom::Start(0))?;

        let mut head = [0u8; CONTENT_SNIFF_LEN];
        let filled = read_head(&mut self.file, &mut head)?;
        let content_type = sniff_content_type(&head[..filled]);

        self.file.seek(SeekFrom::Start(0))?;

        Ok(EncodedOutput {
            file: self.file,
            content_type,
            len,
        })
    }
}

impl Default for OutputArtifact {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for OutputArtifact {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

/// Finalized encode result: bytes, declared MIME type, declared length
#[derive(Debug)]
pub struct EncodedOutput {
    file: SpooledTempFile,
    content_type: &'static str,
    len: u64,
}

impl EncodedOutput {
    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read the artifact out in full. Consuming it releases the backing
    /// storage; the artifact can be read exactly once.
    pub fn into_bytes(mut self) -> Result<Vec<u8>, ImageError> {
        let mut buf = Vec::with_capacity(self.len as usize);
        self.file.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

fn read_head(reader: &mut impl Read, buf: &mut [u8]) -> Result<usize, ImageError> {
    let mut filled = 0;
    loop {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 || filled + n == buf.len() {
            return Ok(filled + n);
        }
        filled += n;
    }
}
