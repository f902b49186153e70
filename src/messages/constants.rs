//! Definitions of constants.

/// The schema tag for the current [`crate::toss::TossSnapshot`] encoding.
pub const SCHEMA_VERSION: u32 = 0;

/// The maximum length, in bytes, of a decoded protocol message.
///
/// Used to reject obviously-malformed length prefixes before allocating,
/// rather than trusting an attacker-controlled `u32` length verbatim.
pub const MAX_PROTOCOL_MESSAGE_LEN: usize = 2 * 1024 * 1024;

/// The maximum number of entries a decoded map-valued field (a
/// `Commitment`'s `shares`, or a `SharesMap` level) may carry.
///
/// Bounds preallocation the same way [`MAX_PROTOCOL_MESSAGE_LEN`] bounds a
/// single byte string, for the same reason: an attacker should not be able
/// to force a large allocation from a four-byte length prefix alone.
pub const MAX_MAP_ENTRIES: usize = 1 << 20;
