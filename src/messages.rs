// -*- mode: rust; -*-
//
// This file is part of ssc-core.
// See LICENSE for licensing information.

//! Protocol message types: the immutable value types exchanged during
//! the three-phase MPC -- [`Commitment`], [`SignedCommitment`], [`Opening`],
//! [`Share`], and [`VssCertificate`] -- plus their construction and
//! verification.
//!
//! Each type has exactly one canonical binary encoding, defined in
//! [`serialize`]; re-encoding a decoded message always yields identical
//! bytes. Construction lives in [`construct`]; the verification predicates
//! of section 4.5 live in [`validate`].

use std::collections::BTreeMap;

use rand_core::{CryptoRng, RngCore};

use crate::crypto::pvss::{EncShare, Extra, Proof, Secret};
use crate::crypto::signature::{RedJubjubSignature, Signature, SigningKey, VerificationKey};
use crate::crypto::SignatureScheme;
use crate::ids::{EpochIndex, Vpk};

pub mod constants;
mod construct;
mod serialize;
#[cfg(test)]
mod tests;
mod validate;

pub use construct::{gen_commitment_and_opening, mk_signed_commitment};
pub(crate) use serialize::commitment_signing_transcript;
pub use validate::{
    verify_certificate, verify_commitment, verify_commitment_signature, verify_opening,
    verify_signed_commitment, SignedCommitmentVerdict,
};

/// `SharesMap`: `shares[decryptor][original]` is the [`Share`] that
/// `decryptor` has decrypted of `original`'s commitment.
pub type SharesMap = BTreeMap<crate::ids::Pk, BTreeMap<crate::ids::Pk, Share>>;

/// The recipient-to-encrypted-share mapping carried inside a [`Commitment`].
pub type CommitmentShares = BTreeMap<Vpk, EncShare>;

/// `C = (extra, proof, shares)`: the PVSS auxiliary payload, a proof that
/// `extra` and `shares` correspond to a well-defined secret, and the
/// per-recipient encrypted shares.
///
/// The domain of `shares` enumerates the intended recipients of the
/// secret; invariant 3 of the data model (every `SharesMap` outer key's
/// inner keys are a subset of `dom(commitments)`) is enforced by the Toss
/// state, not by `Commitment` itself.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Commitment {
    /// The PVSS auxiliary payload (polynomial commitments).
    pub extra: Extra,
    /// Proof that `extra` and `shares` correspond to some well-defined secret.
    pub proof: Proof,
    /// `VPK -> EncShare`, one entry per intended recipient.
    pub shares: CommitmentShares,
}

/// `SC = (C, sigma)` where `sigma = Sign(sk, (E, C))`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignedCommitment {
    /// The commitment being vouched for.
    pub commitment: Commitment,
    /// The signer's signature over `(epoch, commitment)`.
    pub signature: Signature,
}

/// A secret scalar that, combined with a [`Commitment`], reconstructs the
/// signer's seed contribution.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Opening {
    /// The dealer's revealed secret.
    pub secret: Secret,
}

/// A decrypted share of some other stakeholder's secret: the canonical
/// byte form of a recovered [`crate::crypto::pvss::DhSecret`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Share(pub [u8; 32]);

/// A VSS public key signed by a stakeholder's signing key, carrying an
/// expiry epoch after which it is no longer valid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VssCertificate {
    /// The VSS public key being certified.
    pub vss_key: VerificationKey,
    /// The last epoch at which this certificate is considered valid.
    pub expiry_epoch: EpochIndex,
    /// The issuing stakeholder's signature over `(vss_key, expiry_epoch)`.
    pub signature: Signature,
}

impl VssCertificate {
    /// Build and sign a fresh certificate for `vss_key`, expiring after
    /// `expiry_epoch`.
    pub fn new<R: RngCore + CryptoRng>(
        rng: &mut R,
        sk: &SigningKey,
        vss_key: VerificationKey,
        expiry_epoch: EpochIndex,
    ) -> Self {
        let transcript = serialize::certificate_transcript(&vss_key, expiry_epoch);
        let signature = RedJubjubSignature::sign(rng, sk, &transcript);
        VssCertificate {
            vss_key,
            expiry_epoch,
            signature,
        }
    }

    /// The signer this certificate is addressed as belonging to, recovered
    /// from `sk`'s matching verification key; callers typically already
    /// know the issuer (it is the `commitments`/`certificates` map key) and
    /// use [`validate::verify_certificate`] instead of this helper.
    pub fn issued_by(&self, issuer: &VerificationKey) -> bool {
        RedJubjubSignature::verify(
            issuer,
            &serialize::certificate_transcript(&self.vss_key, self.expiry_epoch),
            &self.signature,
        )
        .is_ok()
    }
}
