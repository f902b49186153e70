// -*- mode: rust; -*-
//
// This file is part of ssc-core.
// See LICENSE for licensing information.

//! Batch verification of [`SignedCommitment`](crate::messages::SignedCommitment)
//! signatures.
//!
//! Batch verification asks whether *all* signatures in some set are valid,
//! rather than asking whether *each* of them is valid. This allows sharing
//! computations among all signature verifications, performing less work
//! overall at the cost of higher latency (the entire batch must complete),
//! complexity of caller code (which must assemble a batch across
//! commitments), and loss of the ability to pinpoint which signer's
//! commitment was bad -- callers that need to know which signature failed
//! should fall back to [`Item::verify_single`] per item.

use rand_core::{CryptoRng, RngCore};
use reddsa::sapling::SpendAuth;

use crate::crypto::signature::VerificationKey;
use crate::ids::EpochIndex;
use crate::messages::SignedCommitment;
use crate::Error;

/// A batch verification item: one stakeholder's claimed signature over one
/// epoch's commitment.
///
/// This struct exists to allow batch processing to be decoupled from the
/// lifetime of the signed commitment, which is useful when assembling a
/// batch across commitments gathered at different times.
#[derive(Clone, Debug)]
pub struct Item(reddsa::batch::Item<SpendAuth, SpendAuth>);

impl Item {
    /// Build a batch item for `sc`'s signature, as purportedly signed by
    /// `vk` over `epoch`.
    pub fn new(vk: VerificationKey, epoch: EpochIndex, sc: &SignedCommitment) -> Self {
        let transcript = crate::messages::commitment_signing_transcript(epoch, &sc.commitment);
        let vk_bytes: reddsa::VerificationKeyBytes<SpendAuth> = vk.0.into();
        Self(reddsa::batch::Item::from_spendauth(
            vk_bytes,
            sc.signature.0,
            transcript,
        ))
    }

    /// Perform non-batched verification of this `Item`.
    ///
    /// Useful for isolating the culprit after a batch fails: reverify each
    /// queued item individually with this method.
    pub fn verify_single(self) -> Result<(), Error> {
        self.0.verify_single().map_err(Error::from)
    }
}

/// A batch verification context.
#[derive(Default)]
pub struct Verifier(reddsa::batch::Verifier<SpendAuth, SpendAuth>);

impl Verifier {
    /// Construct a new batch verifier.
    pub fn new() -> Verifier {
        Verifier::default()
    }

    /// Queue an item for verification.
    pub fn queue(&mut self, item: Item) {
        self.0.queue(item.0);
    }

    /// Perform batch verification, returning `Ok(())` if every queued
    /// signature was valid and `Err` otherwise.
    pub fn verify<R: RngCore + CryptoRng>(self, rng: R) -> Result<(), Error> {
        self.0.verify(rng).map_err(Error::from)
    }
}
