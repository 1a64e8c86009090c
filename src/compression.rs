//! Decompression adapter.
//!
//! Wraps a raw byte source with the decoder for a [`Compression`] codec and yields a plain
//! [`Read`]. Codec algorithms come from their crates:
//!
//! - gzip / zlib via `flate2`
//! - bzip2 via `bzip2`
//! - xz via `xz2`
//! - zstd via `zstd`
//! - snappy via `snap` (framed format)
//! - s2 via a frame reader over `snap`'s raw block decoder (snappy-compatible blocks only)
//! - lz4 via `lz4_flex` (frame format)
//!
//! Dropping the returned reader releases the decoder and the underlying source.

use std::io::{BufReader, Read};

use crate::error::{ProcessError, ProcessResult};
use crate::types::Compression;

mod framed;

use framed::S2FrameReader;

/// Wrap `reader` with the decompressor for `codec`.
///
/// [`Compression::None`] returns the reader unchanged (boxed). Decoding errors surface lazily
/// from `read` calls on the returned reader.
pub fn decompress_reader<'a, R: Read + 'a>(
    reader: R,
    codec: Compression,
) -> std::io::Result<Box<dyn Read + 'a>> {
    let reader: Box<dyn Read + 'a> = match codec {
        Compression::None => Box::new(reader),
        Compression::Gzip => Box::new(flate2::read::MultiGzDecoder::new(reader)),
        Compression::Zlib => Box::new(flate2::read::ZlibDecoder::new(reader)),
        Compression::Bzip2 => Box::new(bzip2::read::MultiBzDecoder::new(reader)),
        Compression::Xz => Box::new(xz2::read::XzDecoder::new_multi_decoder(reader)),
        Compression::Zstd => Box::new(zstd::stream::read::Decoder::new(reader)?),
        Compression::Snappy => Box::new(snap::read::FrameDecoder::new(reader)),
        Compression::S2 => Box::new(S2FrameReader::new(reader)),
        Compression::Lz4 => Box::new(lz4_flex::frame::FrameDecoder::new(BufReader::new(reader))),
    };
    Ok(reader)
}

/// Read the whole source through the decoder for `codec`.
///
/// Input is materialized in full. An empty raw source is [`ProcessError::EmptyInput`]; any
/// decoder failure (corrupt or truncated stream) is [`ProcessError::Compression`].
pub fn read_all<R: Read>(mut reader: R, codec: Compression) -> ProcessResult<Vec<u8>> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    if raw.is_empty() {
        return Err(ProcessError::EmptyInput);
    }
    if codec == Compression::None {
        return Ok(raw);
    }

    let wrap_err = |source: std::io::Error| ProcessError::Compression { codec, source };
    let mut decoder = decompress_reader(raw.as_slice(), codec).map_err(wrap_err)?;
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(wrap_err)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const PAYLOAD: &[u8] = b"id,name\n1,Ada\n2,Grace\n";

    fn round_trip(codec: Compression, compressed: Vec<u8>) {
        let out = read_all(compressed.as_slice(), codec).unwrap();
        assert_eq!(out, PAYLOAD, "codec {codec}");
    }

    #[test]
    fn plain_input_passes_through() {
        round_trip(Compression::None, PAYLOAD.to_vec());
    }

    #[test]
    fn gzip_and_zlib() {
        let mut gz = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        gz.write_all(PAYLOAD).unwrap();
        round_trip(Compression::Gzip, gz.finish().unwrap());

        let mut zl = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        zl.write_all(PAYLOAD).unwrap();
        round_trip(Compression::Zlib, zl.finish().unwrap());
    }

    #[test]
    fn bzip2_and_xz() {
        let mut bz = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
        bz.write_all(PAYLOAD).unwrap();
        round_trip(Compression::Bzip2, bz.finish().unwrap());

        let mut xz = xz2::write::XzEncoder::new(Vec::new(), 6);
        xz.write_all(PAYLOAD).unwrap();
        round_trip(Compression::Xz, xz.finish().unwrap());
    }

    #[test]
    fn zstd_snappy_lz4() {
        round_trip(Compression::Zstd, zstd::encode_all(PAYLOAD, 0).unwrap());

        let mut sn = snap::write::FrameEncoder::new(Vec::new());
        sn.write_all(PAYLOAD).unwrap();
        let framed = sn.into_inner().unwrap_or_else(|_| panic!("snappy flush failed"));
        round_trip(Compression::Snappy, framed);

        let mut lz = lz4_flex::frame::FrameEncoder::new(Vec::new());
        lz.write_all(PAYLOAD).unwrap();
        round_trip(Compression::Lz4, lz.finish().unwrap());
    }

    #[test]
    fn empty_source_is_empty_input() {
        let err = read_all(&b""[..], Compression::Gzip).unwrap_err();
        assert!(matches!(err, ProcessError::EmptyInput));
    }

    #[test]
    fn corrupt_stream_is_compression_error() {
        let err = read_all(&b"definitely not gzip"[..], Compression::Gzip).unwrap_err();
        assert!(matches!(
            err,
            ProcessError::Compression {
                codec: Compression::Gzip,
                ..
            }
        ));
    }
}
