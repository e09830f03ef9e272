use crate::{
	pbf::{PbfReader, PbfWriter},
	types::Blob,
};
use anyhow::{Context, Result, anyhow};
use log::trace;
use std::{
	cmp::Ordering,
	fmt::Debug,
	hash::{Hash, Hasher},
};

/// A typed property value, one variant per field of the `Value` message.
#[derive(Clone, PartialEq)]
pub enum GeoValue {
	String(String),
	Float(f32),
	Double(f64),
	Int(i64),
	UInt(u64),
	SInt(i64),
	Bool(bool),
}

impl GeoValue {
	/// Reads a `Value` message. If several value fields are present the last one wins.
	pub fn read(reader: &mut PbfReader<'_>) -> Result<GeoValue> {
		use GeoValue::*;
		let mut value: Option<GeoValue> = None;

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => value = Some(String(reader.read_pbf_string().context("Failed to read string value")?)),
				(2, 5) => value = Some(Float(reader.read_f32().context("Failed to read f32 value")?)),
				(3, 1) => value = Some(Double(reader.read_f64().context("Failed to read f64 value")?)),
				(4, 0) => value = Some(Int(reader.read_varint().context("Failed to read int value")? as i64)),
				(5, 0) => value = Some(UInt(reader.read_varint().context("Failed to read uint value")?)),
				(6, 0) => value = Some(SInt(reader.read_svarint().context("Failed to read sint value")?)),
				(7, 0) => value = Some(Bool(reader.read_varint().context("Failed to read bool value")? != 0)),
				(f, w) => {
					trace!("skipping unknown value field {f} (wire type {w})");
					reader.skip(w).context("Failed to skip unknown value field")?;
				}
			}
		}

		value.ok_or_else(|| anyhow!("No value found")).context("Failed to read GeoValue")
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = PbfWriter::new();

		match self {
			GeoValue::String(s) => {
				writer.write_pbf_key(1, 2).context("Failed to write PBF key for string value")?;
				writer.write_pbf_string(s).context("Failed to write string value")?;
			}
			GeoValue::Float(f) => {
				writer.write_pbf_key(2, 5).context("Failed to write PBF key for float value")?;
				writer.write_f32(*f).context("Failed to write float value")?;
			}
			GeoValue::Double(f) => {
				writer.write_pbf_key(3, 1).context("Failed to write PBF key for double value")?;
				writer.write_f64(*f).context("Failed to write double value")?;
			}
			GeoValue::Int(i) => {
				writer.write_pbf_key(4, 0).context("Failed to write PBF key for int value")?;
				writer.write_varint(*i as u64).context("Failed to write int value")?;
			}
			GeoValue::UInt(u) => {
				writer.write_pbf_key(5, 0).context("Failed to write PBF key for uint value")?;
				writer.write_varint(*u).context("Failed to write uint value")?;
			}
			GeoValue::SInt(s) => {
				writer.write_pbf_key(6, 0).context("Failed to write PBF key for sint value")?;
				writer.write_svarint(*s).context("Failed to write sint value")?;
			}
			GeoValue::Bool(b) => {
				writer.write_pbf_key(7, 0).context("Failed to write PBF key for bool value")?;
				writer.write_varint(u64::from(*b)).context("Failed to write bool value")?;
			}
		}

		Ok(writer.into_blob())
	}

	fn variant_order(&self) -> u8 {
		match self {
			GeoValue::String(_) => 0,
			GeoValue::Float(_) => 1,
			GeoValue::Double(_) => 2,
			GeoValue::Int(_) => 3,
			GeoValue::UInt(_) => 4,
			GeoValue::SInt(_) => 5,
			GeoValue::Bool(_) => 6,
		}
	}
}

impl Debug for GeoValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::String(v) => f.debug_tuple("String").field(v).finish(),
			Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
			Self::Double(v) => f.debug_tuple("Double").field(v).finish(),
			Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
			Self::UInt(v) => f.debug_tuple("UInt").field(v).finish(),
			Self::SInt(v) => f.debug_tuple("SInt").field(v).finish(),
			Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
		}
	}
}

impl From<&str> for GeoValue {
	fn from(value: &str) -> Self {
		GeoValue::String(value.to_string())
	}
}

impl From<String> for GeoValue {
	fn from(value: String) -> Self {
		GeoValue::String(value)
	}
}

impl From<i64> for GeoValue {
	fn from(value: i64) -> Self {
		if value < 0 { GeoValue::SInt(value) } else { GeoValue::UInt(value as u64) }
	}
}

impl From<u64> for GeoValue {
	fn from(value: u64) -> Self {
		GeoValue::UInt(value)
	}
}

impl From<f32> for GeoValue {
	fn from(value: f32) -> Self {
		GeoValue::Float(value)
	}
}

impl From<f64> for GeoValue {
	fn from(value: f64) -> Self {
		GeoValue::Double(value)
	}
}

impl From<bool> for GeoValue {
	fn from(value: bool) -> Self {
		GeoValue::Bool(value)
	}
}

// floats compare by bit pattern so values can be used as table keys
impl Eq for GeoValue {}

impl Hash for GeoValue {
	fn hash<H: Hasher>(&self, state: &mut H) {
		core::mem::discriminant(self).hash(state);
		match self {
			GeoValue::String(v) => v.hash(state),
			GeoValue::Float(v) => v.to_bits().hash(state),
			GeoValue::Double(v) => v.to_bits().hash(state),
			GeoValue::Int(v) | GeoValue::SInt(v) => v.hash(state),
			GeoValue::UInt(v) => v.hash(state),
			GeoValue::Bool(v) => v.hash(state),
		}
	}
}

impl PartialOrd for GeoValue {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for GeoValue {
	fn cmp(&self, other: &Self) -> Ordering {
		use GeoValue::*;
		match (self, other) {
			(String(a), String(b)) => a.cmp(b),
			(Float(a), Float(b)) => a.total_cmp(b),
			(Double(a), Double(b)) => a.total_cmp(b),
			(Int(a), Int(b)) | (SInt(a), SInt(b)) => a.cmp(b),
			(UInt(a), UInt(b)) => a.cmp(b),
			(Bool(a), Bool(b)) => a.cmp(b),
			_ => self.variant_order().cmp(&other.variant_order()),
		}
	}
}
