//! This module provides [`PbfReader`], a protobuf reader over a borrowed byte slice.
//!
//! # Overview
//!
//! Vector tiles are protobuf messages. The reader decodes the primitives needed by
//! the tile schema: varints, zigzag varints, field keys, length-delimited sub
//! messages, packed `uint32` arrays, strings, raw bytes and little-endian floats.
//! Every framing problem (truncated varint, length beyond the buffer, unknown wire
//! type) is reported as an error.
//!
//! # Examples
//!
//! ```rust
//! use versatiles_mvt::pbf::PbfReader;
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let mut reader = PbfReader::new(&[0x1A, 0x02, 0x08, 0x01]);
//!     assert_eq!(reader.read_pbf_key()?, (3, 2));
//!     let mut sub = reader.get_pbf_sub_reader()?;
//!     assert_eq!(sub.read_pbf_key()?, (1, 0));
//!     assert_eq!(sub.read_varint()?, 1);
//!     assert!(!reader.has_remaining());
//!     Ok(())
//! }
//! ```

use crate::types::Blob;
use anyhow::{Context, Result, bail, ensure};
use byteorder::{LE, ReadBytesExt};
use std::io::Cursor;

pub struct PbfReader<'a> {
	cursor: Cursor<&'a [u8]>,
	len: u64,
}

impl<'a> PbfReader<'a> {
	#[must_use]
	pub fn new(slice: &'a [u8]) -> PbfReader<'a> {
		PbfReader {
			len: slice.len() as u64,
			cursor: Cursor::new(slice),
		}
	}

	#[must_use]
	pub fn len(&self) -> u64 {
		self.len
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	#[must_use]
	pub fn position(&self) -> u64 {
		self.cursor.position()
	}

	#[must_use]
	pub fn remaining(&self) -> u64 {
		self.len - self.position()
	}

	#[must_use]
	pub fn has_remaining(&self) -> bool {
		self.remaining() > 0
	}

	pub fn read_varint(&mut self) -> Result<u64> {
		let mut value = 0;
		let mut shift = 0;
		loop {
			let byte = self.cursor.read_u8().context("Unexpected end of buffer in varint")?;
			value |= (u64::from(byte) & 0x7F) << shift;
			if byte & 0x80 == 0 {
				break;
			}
			shift += 7;
			if shift >= 70 {
				bail!("Varint too long");
			}
		}
		Ok(value)
	}

	pub fn read_svarint(&mut self) -> Result<i64> {
		let sint_value = self.read_varint()? as i64;
		Ok((sint_value >> 1) ^ -(sint_value & 1))
	}

	pub fn read_f32(&mut self) -> Result<f32> {
		Ok(self.cursor.read_f32::<LE>()?)
	}

	pub fn read_f64(&mut self) -> Result<f64> {
		Ok(self.cursor.read_f64::<LE>()?)
	}

	/// Reads a field key and splits it into `(field_number, wire_type)`.
	pub fn read_pbf_key(&mut self) -> Result<(u32, u8)> {
		let value = self.read_varint().context("Failed to read varint for PBF key")?;
		Ok(((value >> 3) as u32, (value & 0x07) as u8))
	}

	/// Consumes `length` bytes and returns them as a borrowed slice.
	pub fn read_slice(&mut self, length: u64) -> Result<&'a [u8]> {
		let start = self.position();
		ensure!(
			length <= self.remaining(),
			"Requested length ({length}) exceeds remaining data ({})",
			self.remaining()
		);
		let end = start + length;
		let data: &'a [u8] = *self.cursor.get_ref();
		self.cursor.set_position(end);
		Ok(&data[start as usize..end as usize])
	}

	pub fn read_pbf_slice(&mut self) -> Result<&'a [u8]> {
		let length = self.read_varint().context("Failed to read varint for length")?;
		self.read_slice(length)
	}

	pub fn get_pbf_sub_reader(&mut self) -> Result<PbfReader<'a>> {
		Ok(PbfReader::new(
			self.read_pbf_slice().context("Failed to get PBF sub-reader")?,
		))
	}

	pub fn read_pbf_packed_uint32(&mut self) -> Result<Vec<u32>> {
		let mut reader = self
			.get_pbf_sub_reader()
			.context("Failed to get PBF sub-reader for packed uint32")?;
		let mut values = Vec::new();
		while reader.has_remaining() {
			let value = reader
				.read_varint()
				.context("Failed to read varint for packed uint32")?;
			values.push(u32::try_from(value).context("Packed value does not fit into uint32")?);
		}
		Ok(values)
	}

	pub fn read_pbf_string(&mut self) -> Result<String> {
		let slice = self.read_pbf_slice().context("Failed to read PBF string")?;
		Ok(String::from_utf8(slice.to_vec())?)
	}

	pub fn read_pbf_blob(&mut self) -> Result<Blob> {
		Ok(Blob::from(self.read_pbf_slice().context("Failed to read PBF blob")?))
	}

	/// Skips the value of a field whose key has already been read.
	pub fn skip(&mut self, wire_type: u8) -> Result<()> {
		match wire_type {
			0 => {
				self.read_varint()?;
			}
			1 => {
				self.read_slice(8)?;
			}
			2 => {
				self.read_pbf_slice()?;
			}
			5 => {
				self.read_slice(4)?;
			}
			w => bail!("Unsupported wire type ({w})"),
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(&[0x00], 0)]
	#[case(&[0x01], 1)]
	#[case(&[0xAC, 0x02], 300)]
	#[case(&[0xFF, 0xFF, 0xFF, 0xFF, 0x0F], 0xFFFF_FFFF)]
	fn read_varint(#[case] data: &[u8], #[case] expected: u64) -> Result<()> {
		let mut reader = PbfReader::new(data);
		assert_eq!(reader.read_varint()?, expected);
		assert!(!reader.has_remaining());
		Ok(())
	}

	#[rstest]
	#[case(&[0x96, 0x01], 75)]
	#[case(&[0x95, 0x01], -75)]
	#[case(&[0x01], -1)]
	#[case(&[0x02], 1)]
	fn read_svarint(#[case] data: &[u8], #[case] expected: i64) -> Result<()> {
		assert_eq!(PbfReader::new(data).read_svarint()?, expected);
		Ok(())
	}

	#[test]
	fn truncated_varint_is_an_error() {
		assert!(PbfReader::new(&[0x80, 0x80]).read_varint().is_err());
	}

	#[test]
	fn overlong_varint_is_an_error() {
		assert!(PbfReader::new(&[0xFF; 11]).read_varint().is_err());
	}

	#[test]
	fn sub_reader_beyond_buffer_is_an_error() {
		let mut reader = PbfReader::new(&[0x05, 0x01, 0x02]);
		assert!(reader.get_pbf_sub_reader().is_err());
	}

	#[test]
	fn read_packed_uint32() -> Result<()> {
		let mut reader = PbfReader::new(&[0x04, 0x09, 0x00, 0xAC, 0x02]);
		assert_eq!(reader.read_pbf_packed_uint32()?, vec![9, 0, 300]);
		Ok(())
	}

	#[test]
	fn read_string() -> Result<()> {
		let mut reader = PbfReader::new(&[0x05, b'h', b'e', b'l', b'l', b'o']);
		assert_eq!(reader.read_pbf_string()?, "hello");
		Ok(())
	}

	#[rstest]
	#[case(0, &[0xAC, 0x02, 0x2A])]
	#[case(1, &[1, 2, 3, 4, 5, 6, 7, 8, 0x2A])]
	#[case(2, &[0x02, 0xFF, 0xFF, 0x2A])]
	#[case(5, &[1, 2, 3, 4, 0x2A])]
	fn skip_known_wire_types(#[case] wire_type: u8, #[case] data: &[u8]) -> Result<()> {
		let mut reader = PbfReader::new(data);
		reader.skip(wire_type)?;
		assert_eq!(reader.read_varint()?, 0x2A);
		Ok(())
	}

	#[test]
	fn skip_group_wire_type_is_an_error() {
		assert!(PbfReader::new(&[0x00]).skip(3).is_err());
	}
}
