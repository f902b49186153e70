// -*- mode: rust; -*-
//
// This file is part of ssc-core.
// See LICENSE for licensing information.

//! The Follow-the-Satoshi seed: a fixed-width byte string with an XOR
//! combinator and a deterministic reduction from a PVSS secret scalar.

use core::ops::BitXor;
use std::convert::TryFrom;

use crate::hash::{HStar, StdBlake2b512};
use crate::Error;

/// Byte length of an `FtsSeed`, matching the Blake2b-512-reduced scalar
/// encoding used throughout this crate's hashing.
pub const SEED_LEN: usize = 32;

/// The Follow-the-Satoshi seed used to select slot leaders.
///
/// The all-zeros value is the XOR identity.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FtsSeed(pub [u8; SEED_LEN]);

impl FtsSeed {
    /// The all-zeros seed, the identity element of `xor`.
    pub fn zero() -> Self {
        FtsSeed([0u8; SEED_LEN])
    }

    /// Derive an `FtsSeed` from a PVSS secret's canonical scalar encoding.
    ///
    /// This is a fixed deterministic reduction (a personalized Blake2b-512
    /// hash of the secret's byte encoding), not a simple truncation, so
    /// that distinct secrets cannot collide by construction.
    pub fn from_secret(secret_bytes: &[u8; 32]) -> Self {
        let scalar = HStar::<StdBlake2b512>::new_with_personal(b"SSCoreFtsSeedV1_")
            .update(secret_bytes)
            .finalize();
        FtsSeed(scalar.to_bytes())
    }

    /// Combine two seeds with bitwise XOR.
    pub fn xor(&self, other: &FtsSeed) -> FtsSeed {
        let mut out = [0u8; SEED_LEN];
        for i in 0..SEED_LEN {
            out[i] = self.0[i] ^ other.0[i];
        }
        FtsSeed(out)
    }
}

impl BitXor for FtsSeed {
    type Output = FtsSeed;

    fn bitxor(self, rhs: FtsSeed) -> FtsSeed {
        self.xor(&rhs)
    }
}

impl From<[u8; SEED_LEN]> for FtsSeed {
    fn from(bytes: [u8; SEED_LEN]) -> Self {
        FtsSeed(bytes)
    }
}

impl From<FtsSeed> for [u8; SEED_LEN] {
    fn from(seed: FtsSeed) -> Self {
        seed.0
    }
}

impl TryFrom<&[u8]> for FtsSeed {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Error> {
        let arr: [u8; SEED_LEN] = bytes.try_into().map_err(|_| Error::LengthMismatch)?;
        Ok(FtsSeed(arr))
    }
}

/// Free-function form of [`FtsSeed::xor`], requiring equal-length operands.
///
/// Since `FtsSeed` is always fixed-width this never actually fails, but a
/// fallible signature leaves room for a variable-width seed representation
/// later.
pub fn xor(a: &FtsSeed, b: &FtsSeed) -> Result<FtsSeed, Error> {
    Ok(a.xor(b))
}
