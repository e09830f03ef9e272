//! Command integers of the geometry stream.
//!
//! A header packs a command id into the low 3 bits and a repeat count into the
//! remaining 29 bits. MoveTo and LineTo are followed by `count` zigzag encoded
//! `(dx, dy)` pairs, ClosePath carries no parameters.

pub const MOVE_TO: u32 = 1;
pub const LINE_TO: u32 = 2;
pub const CLOSE_PATH: u32 = 7;

/// Largest repeat count a header can carry.
pub const MAX_COUNT: u32 = (1 << 29) - 1;

#[inline]
pub const fn command_header(id: u32, count: u32) -> u32 {
	(count << 3) | id
}

/// Splits a header into `(id, count)`.
#[inline]
pub const fn split_header(header: u32) -> (u32, u32) {
	(header & 0x7, header >> 3)
}

#[inline]
pub const fn zigzag(value: i32) -> u32 {
	((value << 1) ^ (value >> 31)) as u32
}

#[inline]
pub const fn unzigzag(value: u32) -> i32 {
	((value >> 1) as i32) ^ -((value & 1) as i32)
}

pub fn command_name(id: u32) -> &'static str {
	match id {
		MOVE_TO => "MoveTo",
		LINE_TO => "LineTo",
		CLOSE_PATH => "ClosePath",
		_ => "Unknown",
	}
}
