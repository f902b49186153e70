// -*- mode: rust; -*-
//
// This file is part of ssc-core.
// See LICENSE for licensing information.

//! Identity and indexing types shared across the protocol: stakeholder and
//! VSS public keys, epoch/slot indices, and the stake-oracle vocabulary
//! type.

use std::collections::BTreeMap;
use std::convert::TryFrom;

use crate::Error;

macro_rules! fixed_bytes_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub [u8; 32]);

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                $name(bytes)
            }
        }

        impl From<$name> for [u8; 32] {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = Error;

            fn try_from(bytes: &[u8]) -> Result<Self, Error> {
                let arr: [u8; 32] = bytes.try_into().map_err(|_| Error::MalformedMessage)?;
                Ok($name(arr))
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

fixed_bytes_newtype!(
    Pk,
    "A stakeholder's public signing key, in compressed (map-key) form.\n\nMirrors the `VerificationKeyBytes`/`VerificationKey` split in this crate's\ncrypto adapter: `Pk` is the cheap, `Hash`/`Ord`-able refinement of\n`[u8; 32]` used as an accumulator map key, while\n[`crate::crypto::signature::VerificationKey`] holds the decompressed\ncurve point actually used to verify a signature."
);
fixed_bytes_newtype!(
    Vpk,
    "A public key of the verifiable secret sharing scheme, in compressed\nform. See [`Pk`] for the rationale behind keeping a separate compressed\nrefinement type."
);

impl TryFrom<Pk> for crate::crypto::signature::VerificationKey {
    type Error = Error;

    fn try_from(pk: Pk) -> Result<Self, Error> {
        crate::crypto::signature::VerificationKey::try_from(pk.0)
    }
}

impl From<crate::crypto::signature::VerificationKey> for Pk {
    fn from(vk: crate::crypto::signature::VerificationKey) -> Self {
        Pk(vk.into())
    }
}

impl TryFrom<Vpk> for crate::crypto::signature::VerificationKey {
    type Error = Error;

    fn try_from(vpk: Vpk) -> Result<Self, Error> {
        crate::crypto::signature::VerificationKey::try_from(vpk.0)
    }
}

impl From<crate::crypto::signature::VerificationKey> for Vpk {
    fn from(vk: crate::crypto::signature::VerificationKey) -> Self {
        Vpk(vk.into())
    }
}

/// A non-negative epoch counter.
pub type EpochIndex = u64;

/// A non-negative slot-within-epoch counter, in `[0, 6*k)`.
pub type LocalSlotIndex = u64;

/// A fully qualified position in the chain: `(epoch, local slot)`.
#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotId {
    /// The epoch this slot belongs to.
    pub epoch: EpochIndex,
    /// The slot's index within the epoch.
    pub slot: LocalSlotIndex,
}

impl SlotId {
    /// Build a `SlotId` from its components.
    pub fn new(epoch: EpochIndex, slot: LocalSlotIndex) -> Self {
        SlotId { epoch, slot }
    }
}

/// Read-only stake-weight vocabulary shared with the (external) stake
/// oracle. The core never computes this; it only consumes it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StakeSet(pub BTreeMap<Pk, u64>);

impl StakeSet {
    /// An empty stake set.
    pub fn new() -> Self {
        StakeSet(BTreeMap::new())
    }

    /// Whether `pk` is present in this stake set (i.e. is a "richman").
    pub fn contains(&self, pk: &Pk) -> bool {
        self.0.contains_key(pk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pk_round_trips_through_bytes() {
        let bytes = [7u8; 32];
        let pk = Pk::from(bytes);
        let back: [u8; 32] = pk.into();
        assert_eq!(bytes, back);
    }

    #[test]
    fn stake_set_membership() {
        let mut set = StakeSet::new();
        let pk = Pk::from([1u8; 32]);
        set.0.insert(pk, 100);
        assert!(set.contains(&pk));
        assert!(!set.contains(&Pk::from([2u8; 32])));
    }
}
