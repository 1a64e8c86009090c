//! Reader for the snappy framing format as written by S2 encoders.
//!
//! S2 streams open with an `S2sTwO` stream identifier instead of `sNaPpY`; the chunk layout is
//! the same. Chunk bodies are decoded with `snap`'s raw block decoder, so blocks written in
//! snappy-compatible mode decode, while blocks using S2-only encodings (repeat offsets) fail
//! with a descriptive `InvalidData` error.

use std::io::{self, Read};

const SNAPPY_IDENTIFIER: &[u8] = b"sNaPpY";
const S2_IDENTIFIER: &[u8] = b"S2sTwO";

const CHUNK_COMPRESSED: u8 = 0x00;
const CHUNK_UNCOMPRESSED: u8 = 0x01;
const CHUNK_STREAM_IDENTIFIER: u8 = 0xff;

const CASTAGNOLI: crc::Crc<u32> = crc::Crc::<u32>::new(&crc::CRC_32_ISCSI);

/// Checksum stored in each data chunk: CRC-32C of the uncompressed bytes, masked.
pub(crate) fn masked_crc32c(data: &[u8]) -> u32 {
    CASTAGNOLI
        .checksum(data)
        .rotate_right(15)
        .wrapping_add(0xa282_ead8)
}

fn invalid(message: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}

/// Streams the decoded bytes of a framed S2 (or snappy) source.
pub(crate) struct S2FrameReader<R> {
    inner: R,
    decoder: snap::raw::Decoder,
    buf: Vec<u8>,
    pos: usize,
    seen_identifier: bool,
}

impl<R: Read> S2FrameReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            decoder: snap::raw::Decoder::new(),
            buf: Vec::new(),
            pos: 0,
            seen_identifier: false,
        }
    }

    /// Chunk type and body length, or `None` at a clean end of stream.
    fn read_header(&mut self) -> io::Result<Option<(u8, usize)>> {
        let mut header = [0u8; 4];
        let mut filled = 0;
        while filled < header.len() {
            match self.inner.read(&mut header[filled..]) {
                Ok(0) if filled == 0 => return Ok(None),
                Ok(0) => return Err(invalid("s2: truncated chunk header")),
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        let len = usize::from(header[1])
            | usize::from(header[2]) << 8
            | usize::from(header[3]) << 16;
        Ok(Some((header[0], len)))
    }

    fn read_body(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut body = vec![0u8; len];
        self.inner.read_exact(&mut body).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                invalid("s2: truncated chunk body")
            } else {
                e
            }
        })?;
        Ok(body)
    }

    /// Decode chunks until some data is buffered. Returns `false` at end of stream.
    fn fill(&mut self) -> io::Result<bool> {
        loop {
            let Some((kind, len)) = self.read_header()? else {
                return Ok(false);
            };
            let body = self.read_body(len)?;

            if kind == CHUNK_STREAM_IDENTIFIER {
                if body != S2_IDENTIFIER && body != SNAPPY_IDENTIFIER {
                    return Err(invalid("s2: unrecognized stream identifier"));
                }
                self.seen_identifier = true;
                continue;
            }
            if !self.seen_identifier {
                return Err(invalid("s2: stream does not start with a stream identifier"));
            }

            let data = match kind {
                CHUNK_COMPRESSED | CHUNK_UNCOMPRESSED => {
                    if body.len() < 4 {
                        return Err(invalid("s2: data chunk shorter than its checksum"));
                    }
                    let expected = u32::from_le_bytes([body[0], body[1], body[2], body[3]]);
                    let data = if kind == CHUNK_COMPRESSED {
                        self.decoder.decompress_vec(&body[4..]).map_err(|e| {
                            invalid(format!(
                                "s2: block is not snappy-compatible (S2-only encodings are \
                                 unsupported): {e}"
                            ))
                        })?
                    } else {
                        body[4..].to_vec()
                    };
                    if masked_crc32c(&data) != expected {
                        return Err(invalid("s2: checksum mismatch"));
                    }
                    data
                }
                0x02..=0x7f => {
                    return Err(invalid(format!(
                        "s2: unskippable chunk type {kind:#04x} is not supported"
                    )));
                }
                // Padding, S2 index chunks and other skippable chunks.
                _ => continue,
            };

            if !data.is_empty() {
                self.buf = data;
                self.pos = 0;
                return Ok(true);
            }
        }
    }
}

impl<R: Read> Read for S2FrameReader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        if self.pos >= self.buf.len() && !self.fill()? {
            return Ok(0);
        }
        let n = out.len().min(self.buf.len() - self.pos);
        out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
