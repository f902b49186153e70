#![deny(missing_docs)]

//! A library implementation of Shared Seed Computation: the PVSS-based
//! multi-party protocol that derives each epoch's verifiable
//! Follow-the-Satoshi random seed from a three-phase exchange of
//! commitments, openings and (when a participant goes missing) recovered
//! shares.
//!
//! - [`seed`] -- the `FtsSeed` algebra: a fixed-width seed value and
//!   its commutative, associative XOR combinator.
//! - [`messages`] -- the protocol's wire types together with their
//!   construction and verification predicates.
//! - [`crypto`] -- the adapter boundary between the protocol core and
//!   the concrete RedJubjub signature scheme and Jubjub-curve PVSS scheme.
//! - [`phase`] -- the per-epoch phase scheduler.
//! - [`toss`] -- the mutable per-epoch accumulator that the scheduler
//!   drives and the final seed is reduced from.
//! - [`ids`] -- shared identity and indexing types (public keys, epoch and
//!   slot indices, the stake-oracle vocabulary).
//! - [`codec`] -- the canonical binary encoding every signed or hashed
//!   message uses.
//! - [`error`] -- this crate's error taxonomy.
//! - [`batch`] -- batch verification of commitment signatures.

#[cfg(not(feature = "blake2b_simd"))]
compile_error!(
    "ssc-core requires the `blake2b_simd` feature: the PVSS Chaum-Pedersen \
     challenge and the FtsSeed reduction both hash with it, and there is no \
     sound fallback to hash with instead."
);

/// Batch verification of commitment signatures.
pub mod batch;
/// The canonical binary encoding every signed or hashed message uses.
pub mod codec;
/// The adapter boundary between the protocol core and its concrete
/// signature and PVSS schemes.
pub mod crypto;
mod error;
mod hash;
/// Shared identity and indexing types.
pub mod ids;
/// The protocol's wire types, together with their construction and
/// verification predicates.
pub mod messages;
/// The per-epoch phase scheduler.
pub mod phase;
/// The `FtsSeed` algebra.
pub mod seed;
/// The mutable per-epoch accumulator the scheduler drives.
pub mod toss;

pub use error::Error;
pub use ids::{EpochIndex, LocalSlotIndex, Pk, SlotId, StakeSet, Vpk};
pub use phase::{Phase, PhaseConfig};
pub use seed::FtsSeed;

#[cfg(feature = "blake2b_simd")]
pub use hash::StdBlake2b512;

/// Crate-wide configuration: the one knob a deployment needs to pick to
/// run the protocol, namely the phase scheduler's per-phase slot width.
///
/// `SscConfig` is deliberately thin; everything else the protocol needs
/// (the concrete [`crypto::SignatureScheme`]/[`crypto::PvssScheme`], the
/// [`toss::StakeOracle`]) is supplied by the integrator as a trait
/// implementation rather than a config value, since those choices are
/// compile-time, not deployment-time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SscConfig {
    /// The phase scheduler's configuration.
    pub phase: PhaseConfig,
}

impl SscConfig {
    /// Build a config for a phase width of `k` slots.
    pub fn new(k: u64) -> Self {
        SscConfig {
            phase: PhaseConfig::new(k),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssc_config_exposes_epoch_slot_count() {
        let config = SscConfig::new(3);
        assert_eq!(config.phase.epoch_slots(), 18);
    }
}
