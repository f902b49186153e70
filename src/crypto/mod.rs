// -*- mode: rust; -*-
//
// This file is part of ssc-core.
// See LICENSE for licensing information.

//! The crypto adapter: the single trust boundary between the protocol
//! core and the underlying signature/PVSS primitives.
//!
//! The core depends only on the two traits below. `RedJubjubSignature` and
//! `JubjubPvss` are this crate's one concrete instantiation of each; a
//! downstream integrator may substitute their own as long as the contracts
//! hold.

pub mod pvss;
pub mod signature;

pub use pvss::{DhSecret, EncShare, Extra, JubjubPvss, PvssSecretHandle};
pub use signature::{RedJubjubSignature, Signature, SigningKey, VerificationKey};

use rand_core::{CryptoRng, RngCore};

use crate::Error;

/// Standard signature contract: deterministic verification, explicit RNG
/// for signing.
pub trait SignatureScheme {
    /// A signing (secret) key.
    type SigningKey;
    /// A verification (public) key.
    type VerificationKey;
    /// A signature over an arbitrary message.
    type Signature;

    /// Derive the verification key for a signing key.
    fn verification_key(sk: &Self::SigningKey) -> Self::VerificationKey;

    /// Sign `msg` with `sk`.
    fn sign<R: RngCore + CryptoRng>(
        rng: &mut R,
        sk: &Self::SigningKey,
        msg: &[u8],
    ) -> Self::Signature;

    /// Verify `sig` over `msg` against `vk`.
    fn verify(vk: &Self::VerificationKey, msg: &[u8], sig: &Self::Signature) -> Result<(), Error>;
}

/// The opaque PVSS operations the core treats as a black box.
///
/// `t` is always required to satisfy `1 <= t <= vpks.len()`; implementations
/// must reject out-of-range thresholds with `Error::BadThreshold` and
/// duplicate keys with `Error::DuplicateVssKey`.
pub trait PvssScheme {
    /// The PVSS auxiliary payload (polynomial commitments).
    type Extra;
    /// The dealer's committed secret, opened at the Opening phase.
    type Secret;
    /// Proof that `Extra` and `Secret` correspond to one another.
    type Proof;
    /// A single recipient's encrypted share.
    type EncShare;
    /// A VSS public key.
    type Vpk;
    /// A group-element representation of a recovered secret (see
    /// `secret_to_dh_secret`/`get_dh_secret`).
    type DhSecret;

    /// Generate a fresh shared secret for the given threshold and
    /// recipient set. `shares[i]` is decryptable by `vpks[i]`.
    fn gen_shared_secret<R: RngCore + CryptoRng>(
        rng: &mut R,
        t: u32,
        vpks: &[Self::Vpk],
    ) -> Result<(Self::Extra, Self::Secret, Self::Proof, Vec<Self::EncShare>), Error>;

    /// True iff `enc_share` is a well-formed share for `vpk` under `extra`.
    fn verify_enc_share(extra: &Self::Extra, vpk: &Self::Vpk, enc_share: &Self::EncShare) -> bool;

    /// True iff `secret` is the committed secret of `(extra, proof)`.
    fn verify_secret_proof(extra: &Self::Extra, secret: &Self::Secret, proof: &Self::Proof)
        -> bool;

    /// Recover a secret's DH-secret representation from `threshold` decrypted
    /// shares (each tagged with its 1-based recipient index).
    fn recover(threshold: u32, shares: &[(u32, Self::DhSecret)]) -> Result<Self::DhSecret, Error>;

    /// Reduce an opened secret to its canonical DH-secret (group element)
    /// representation, the form `FtsSeed::from_secret` actually consumes.
    fn secret_to_dh_secret(secret: &Self::Secret) -> Self::DhSecret;

    /// Canonical byte extraction for a DH secret.
    fn get_dh_secret(dh: &Self::DhSecret) -> [u8; 32];
}
