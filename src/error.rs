// -*- mode: rust; -*-
//
// This file is part of ssc-core.
// See LICENSE for licensing information.

#[cfg(feature = "std")]
use thiserror::Error;

/// An error produced by the shared seed computation core.
///
/// Every fallible entry point returns one of these kinds; disposition is
/// always "reject, leave state unchanged" -- recovery is the driver's
/// responsibility, not the core's.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum Error {
    /// Decoding or a structural invariant failed.
    #[cfg_attr(feature = "std", error("malformed message"))]
    MalformedMessage,
    /// A signature did not verify.
    #[cfg_attr(feature = "std", error("bad signature"))]
    BadSignature,
    /// One or more encrypted shares failed `verify_enc_share`.
    #[cfg_attr(feature = "std", error("bad commitment"))]
    BadCommitment,
    /// The opened secret does not match the commitment's proof.
    #[cfg_attr(feature = "std", error("bad opening"))]
    BadOpening,
    /// The signer is not in `richmen` or has no valid certificate.
    #[cfg_attr(feature = "std", error("unknown participant"))]
    UnknownParticipant,
    /// The message was received for a phase outside its slot range.
    #[cfg_attr(feature = "std", error("wrong phase"))]
    WrongPhase,
    /// The participant already has an entry for this phase.
    #[cfg_attr(feature = "std", error("duplicate submission"))]
    Duplicate,
    /// The requested threshold is out of range for the participant set.
    #[cfg_attr(feature = "std", error("bad threshold"))]
    BadThreshold,
    /// The VSS key list passed to construction contained a duplicate.
    #[cfg_attr(feature = "std", error("duplicate vss key"))]
    DuplicateVssKey,
    /// The RNG refused to produce randomness.
    #[cfg_attr(feature = "std", error("rng failure"))]
    RngFailure,
    /// A fixed-length precondition (XOR operands, fixed-width decode) failed.
    #[cfg_attr(feature = "std", error("length mismatch"))]
    LengthMismatch,
}

impl From<reddsa::Error> for Error {
    fn from(e: reddsa::Error) -> Self {
        match e {
            reddsa::Error::MalformedSigningKey => Error::MalformedMessage,
            reddsa::Error::MalformedVerificationKey => Error::MalformedMessage,
            reddsa::Error::InvalidSignature => Error::BadSignature,
        }
    }
}
