//! Detection and handling of zlib/gzip compressed tiles.

use crate::types::Blob;
use anyhow::{Context, Result};
use flate2::bufread::{GzDecoder, GzEncoder, ZlibDecoder, ZlibEncoder};
use std::io::Read;

/// Whether the data starts with a zlib header (`0x78` followed by a known level byte).
pub fn is_zlib(data: &[u8]) -> bool {
	data.len() > 2 && data[0] == 0x78 && matches!(data[1], 0x9C | 0x01 | 0xDA | 0x5E)
}

/// Whether the data starts with the gzip magic bytes.
pub fn is_gzip(data: &[u8]) -> bool {
	data.len() > 2 && data[0] == 0x1F && data[1] == 0x8B
}

/// Decompresses gzip or zlib data. Anything else is returned unchanged.
pub fn decompress(blob: &Blob) -> Result<Blob> {
	let data = blob.as_slice();
	let mut result: Vec<u8> = Vec::new();
	if is_gzip(data) {
		GzDecoder::new(data)
			.read_to_end(&mut result)
			.context("Failed to decompress gzip data")?;
	} else if is_zlib(data) {
		ZlibDecoder::new(data)
			.read_to_end(&mut result)
			.context("Failed to decompress zlib data")?;
	} else {
		return Ok(blob.clone());
	}
	Ok(Blob::from(result))
}

/// Compresses data using gzip
pub fn compress_gzip(blob: &Blob) -> Result<Blob> {
	let mut result: Vec<u8> = Vec::new();
	GzEncoder::new(blob.as_slice(), flate2::Compression::default())
		.read_to_end(&mut result)
		.context("Failed to compress gzip data")?;
	Ok(Blob::from(result))
}

/// Compresses data using zlib
pub fn compress_zlib(blob: &Blob) -> Result<Blob> {
	let mut result: Vec<u8> = Vec::new();
	ZlibEncoder::new(blob.as_slice(), flate2::Compression::default())
		.read_to_end(&mut result)
		.context("Failed to compress zlib data")?;
	Ok(Blob::from(result))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn sample() -> Blob {
		Blob::from((0..2000u32).map(|i| (i * 7 % 251) as u8).collect::<Vec<u8>>())
	}

	#[rstest]
	#[case(&[0x78, 0x9C, 0x00], true, false)]
	#[case(&[0x78, 0xDA, 0x00], true, false)]
	#[case(&[0x78, 0x02, 0x00], false, false)]
	#[case(&[0x1F, 0x8B, 0x08], false, true)]
	#[case(&[0x1F, 0x8B], false, false)]
	#[case(&[0x1A, 0x03, 0x0A], false, false)]
	fn magic_bytes(#[case] data: &[u8], #[case] zlib: bool, #[case] gzip: bool) {
		assert_eq!(is_zlib(data), zlib);
		assert_eq!(is_gzip(data), gzip);
	}

	#[test]
	fn gzip() -> Result<()> {
		let compressed = compress_gzip(&sample())?;
		assert!(is_gzip(compressed.as_slice()));
		assert_eq!(decompress(&compressed)?, sample());
		Ok(())
	}

	#[test]
	fn zlib() -> Result<()> {
		let compressed = compress_zlib(&sample())?;
		assert!(is_zlib(compressed.as_slice()));
		assert_eq!(decompress(&compressed)?, sample());
		Ok(())
	}

	#[test]
	fn uncompressed_data_passes_through() -> Result<()> {
		let blob = Blob::from(vec![0x1A, 0x03, 0x0A, 0x01, 0x61]);
		assert_eq!(decompress(&blob)?, blob);
		Ok(())
	}

	#[test]
	fn broken_stream_is_an_error() {
		let blob = Blob::from(vec![0x1F, 0x8B, 0x08, 0x00, 0x01]);
		assert!(decompress(&blob).is_err());
	}
}
