//! This module provides [`PbfWriter`], which appends protobuf primitives to an in-memory buffer.
//!
//! # Examples
//!
//! ```rust
//! use versatiles_mvt::pbf::PbfWriter;
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let mut writer = PbfWriter::new();
//!     writer.write_varint(1025)?;
//!     assert_eq!(writer.into_blob().into_vec(), vec![0b10000001, 0b00001000]);
//!     Ok(())
//! }
//! ```

use crate::types::Blob;
use anyhow::{Context, Result};
use byteorder::{LE, WriteBytesExt};
use std::io::Write;

#[derive(Default)]
pub struct PbfWriter {
	data: Vec<u8>,
}

impl PbfWriter {
	#[must_use]
	pub fn new() -> PbfWriter {
		PbfWriter { data: Vec::new() }
	}

	#[must_use]
	pub fn into_blob(self) -> Blob {
		Blob::from(self.data)
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	pub fn write_varint(&mut self, mut value: u64) -> Result<()> {
		while value >= 0x80 {
			self.data.write_all(&[((value & 0x7F) as u8) | 0x80])?;
			value >>= 7;
		}
		self.data.write_all(&[value as u8])?;
		Ok(())
	}

	pub fn write_svarint(&mut self, value: i64) -> Result<()> {
		self.write_varint(((value << 1) ^ (value >> 63)) as u64)
	}

	pub fn write_f32(&mut self, value: f32) -> Result<()> {
		Ok(self.data.write_f32::<LE>(value)?)
	}

	pub fn write_f64(&mut self, value: f64) -> Result<()> {
		Ok(self.data.write_f64::<LE>(value)?)
	}

	pub fn write_slice(&mut self, buf: &[u8]) -> Result<()> {
		self.data.write_all(buf)?;
		Ok(())
	}

	pub fn write_pbf_key(&mut self, field_number: u32, wire_type: u8) -> Result<()> {
		self
			.write_varint((u64::from(field_number) << 3) | u64::from(wire_type))
			.context("Failed to write PBF key")
	}

	pub fn write_pbf_packed_uint32(&mut self, data: &[u32]) -> Result<()> {
		let mut writer = PbfWriter::new();
		for &value in data {
			writer
				.write_varint(u64::from(value))
				.context("Failed to write varint for packed uint32")?;
		}
		self
			.write_pbf_blob(&writer.into_blob())
			.context("Failed to write packed uint32 blob")
	}

	pub fn write_pbf_slice(&mut self, buf: &[u8]) -> Result<()> {
		self
			.write_varint(buf.len() as u64)
			.context("Failed to write varint for length")?;
		self.write_slice(buf).context("Failed to write PBF bytes")
	}

	pub fn write_pbf_blob(&mut self, blob: &Blob) -> Result<()> {
		self.write_pbf_slice(blob.as_slice())
	}

	pub fn write_pbf_string(&mut self, text: &str) -> Result<()> {
		self.write_pbf_slice(text.as_bytes())
	}
}
