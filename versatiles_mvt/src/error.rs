//! Typed errors for the two fatal failure classes of the codec.
//!
//! Everything else is reported through [`anyhow::Error`] with context, the way the
//! rest of the crate does. Validity findings are data, see [`crate::validity`].

use thiserror::Error;

/// A command stream that is malformed under the active decoding rules.
///
/// Always fatal to the feature being decoded.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DecodeError {
	#[error("MoveTo with a repeat count of {0} is only allowed for multi points")]
	MultiMoveTo(u32),
	#[error("more than one {0} block in a single part")]
	RepeatedCommandBlock(&'static str),
	#[error("command {0} with a repeat count of zero")]
	ZeroLengthCommand(u32),
	#[error("unknown command id {0}")]
	UnknownCommand(u32),
	#[error("consecutive ClosePath commands")]
	ConsecutiveClosePath,
	#[error("{0} before the first MoveTo")]
	CommandBeforeMoveTo(&'static str),
	#[error("{0} is not allowed in {1} geometries")]
	CommandNotAllowed(&'static str, &'static str),
	#[error("ring has fewer than 3 distinct points")]
	RingTooShort,
	#[error("line has fewer than 2 distinct points")]
	LineTooShort,
	#[error("ring has zero area")]
	ZeroAreaRing,
	#[error("first ring of a polygon has interior winding")]
	WrongWinding,
	#[error("command stream ended inside the parameters of a command")]
	TruncatedParameters,
	#[error("scale must be finite and non-zero, got ({0}, {1})")]
	InvalidScale(f64, f64),
	#[error("geometry type {0} cannot be decoded")]
	UnknownGeometryType(u64),
}

/// A coordinate that would reach the union engine outside its safe range.
///
/// The transform stage rejects such coordinates, so this is a contract breach
/// somewhere upstream rather than bad input data.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("coordinate ({x}, {y}) exceeds the safe range of ±{limit}")]
pub struct OverflowError {
	pub x: i64,
	pub y: i64,
	pub limit: i64,
}
