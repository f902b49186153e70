// -*- mode: rust; -*-
//
// This file is part of ssc-core.
// See LICENSE for licensing information.

//! The phase scheduler: maps a local slot index onto one of the three
//! MPC phases, with an idle gap after each one.
//!
//! A window of `6*k` slots per epoch is carved into six equal bands:
//! commitment, idle, opening, idle, shares, idle. The idle bands give the
//! network time to propagate one phase's messages before the next phase
//! starts admitting any, bounding an adversary's ability to withhold and
//! replace a message at the last moment. Rejecting a message whose slot
//! falls outside its phase's band is left to the block-validation layer;
//! this module only answers the three yes/no queries that layer needs.

use crate::ids::{LocalSlotIndex, SlotId};

/// The protocol-wide security parameter: the number of slots allotted to
/// each of the three phases (and, symmetrically, to each idle gap).
///
/// Threaded as an immutable configuration value rather than baked in as a
/// compile-time constant, so the same scheduler code can be exercised at
/// multiple `k` in tests.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseConfig {
    k: u64,
}

/// One of the three MPC phases, or the idle gap following it.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Commitments are accepted.
    Commitment,
    /// Openings are accepted.
    Opening,
    /// Decrypted shares are accepted.
    Shares,
    /// No protocol messages are accepted.
    Idle,
}

impl PhaseConfig {
    /// Build a phase configuration from the protocol constant `k`.
    pub fn new(k: u64) -> Self {
        PhaseConfig { k }
    }

    /// The configured security parameter.
    pub fn k(&self) -> u64 {
        self.k
    }

    /// The total number of slots in one epoch, `6*k`.
    pub fn epoch_slots(&self) -> u64 {
        6 * self.k
    }

    /// Which phase (or idle gap) slot `s` falls in.
    pub fn phase_of(&self, s: LocalSlotIndex) -> Phase {
        let band = if self.k == 0 { 0 } else { (s / self.k) % 6 };
        match band {
            0 => Phase::Commitment,
            2 => Phase::Opening,
            4 => Phase::Shares,
            _ => Phase::Idle,
        }
    }

    /// True iff slot `s` is in the commitment phase's band, `[0, k)`.
    pub fn is_commitment_phase(&self, s: LocalSlotIndex) -> bool {
        matches!(self.phase_of(s), Phase::Commitment)
    }

    /// True iff slot `s` is in the opening phase's band, `[2k, 3k)`.
    pub fn is_opening_phase(&self, s: LocalSlotIndex) -> bool {
        matches!(self.phase_of(s), Phase::Opening)
    }

    /// True iff slot `s` is in the shares phase's band, `[4k, 5k)`.
    pub fn is_shares_phase(&self, s: LocalSlotIndex) -> bool {
        matches!(self.phase_of(s), Phase::Shares)
    }

    /// Convenience wrapper over [`PhaseConfig::is_commitment_phase`] taking
    /// a full [`SlotId`].
    pub fn is_commitment_slot(&self, slot: &SlotId) -> bool {
        self.is_commitment_phase(slot.slot)
    }

    /// Convenience wrapper over [`PhaseConfig::is_opening_phase`] taking a
    /// full [`SlotId`].
    pub fn is_opening_slot(&self, slot: &SlotId) -> bool {
        self.is_opening_phase(slot.slot)
    }

    /// Convenience wrapper over [`PhaseConfig::is_shares_phase`] taking a
    /// full [`SlotId`].
    pub fn is_shares_slot(&self, slot: &SlotId) -> bool {
        self.is_shares_phase(slot.slot)
    }
}
