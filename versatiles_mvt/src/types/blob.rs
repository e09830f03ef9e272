//! This module provides the [`Blob`] struct, a thin wrapper around [`Vec<u8>`] used for
//! encoded tiles, layers and compressed buffers.
//!
//! # Examples
//!
//! ```rust
//! use versatiles_mvt::Blob;
//!
//! let blob = Blob::from(vec![0x1A, 0x00]);
//! assert_eq!(blob.len(), 2);
//! assert_eq!(blob.as_hex(), "1a 00");
//! ```

use std::fmt::Debug;

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob(Vec<u8>);

impl Blob {
	#[must_use]
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		self.0.as_ref()
	}

	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	#[must_use]
	pub fn as_hex(&self) -> String {
		self
			.0
			.iter()
			.map(|byte| format!("{byte:02x}"))
			.collect::<Vec<_>>()
			.join(" ")
	}

	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn extend_from_slice(&mut self, data: &[u8]) {
		self.0.extend_from_slice(data);
	}
}

impl From<Vec<u8>> for Blob {
	fn from(item: Vec<u8>) -> Self {
		Blob(item)
	}
}

impl From<&[u8]> for Blob {
	fn from(item: &[u8]) -> Self {
		Blob(item.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(item: &str) -> Self {
		Blob(item.as_bytes().to_vec())
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.0.len() <= 32 {
			write!(f, "Blob({}): {}", self.0.len(), self.as_hex())
		} else {
			write!(f, "Blob({}): {} ...", self.0.len(), Blob::from(&self.0[..32]).as_hex())
		}
	}
}
