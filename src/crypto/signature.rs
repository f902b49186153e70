// -*- mode: rust; -*-
//
// This file is part of ssc-core.
// See LICENSE for licensing information.

//! A thin RedJubjub-backed `SignatureScheme`, following the
//! `SigningKey`/`VerificationKey`/`Signature` wrapper pattern used
//! throughout this crate, monomorphized to `reddsa::sapling::SpendAuth`
//! since the protocol needs only one signature type, not RedDSA's
//! Binding/SpendAuth duality.

use std::convert::TryFrom;

use rand_core::{CryptoRng, RngCore};
use reddsa::sapling::SpendAuth;

use crate::Error;

/// A stakeholder signing key.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SigningKeyHelper"))]
#[cfg_attr(feature = "serde", serde(into = "SigningKeyHelper"))]
pub struct SigningKey(pub(crate) reddsa::SigningKey<SpendAuth>);

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct SigningKeyHelper([u8; 32]);

impl TryFrom<SigningKeyHelper> for SigningKey {
    type Error = Error;

    fn try_from(helper: SigningKeyHelper) -> Result<Self, Error> {
        Ok(SigningKey(reddsa::SigningKey::try_from(helper.0)?))
    }
}

impl From<SigningKey> for SigningKeyHelper {
    fn from(sk: SigningKey) -> Self {
        SigningKeyHelper(sk.0.into())
    }
}

impl SigningKey {
    /// Generate a new signing key.
    pub fn new<R: RngCore + CryptoRng>(rng: &mut R) -> SigningKey {
        SigningKey(reddsa::SigningKey::new(rng))
    }

    /// Sign `msg` with this key.
    pub fn sign<R: RngCore + CryptoRng>(&self, rng: &mut R, msg: &[u8]) -> Signature {
        Signature(self.0.sign(rng, msg))
    }
}

impl TryFrom<[u8; 32]> for SigningKey {
    type Error = Error;

    fn try_from(bytes: [u8; 32]) -> Result<Self, Error> {
        Ok(SigningKey(reddsa::SigningKey::try_from(bytes)?))
    }
}

impl From<SigningKey> for [u8; 32] {
    fn from(sk: SigningKey) -> [u8; 32] {
        sk.0.into()
    }
}

/// A stakeholder verification (public) key, the `PK`/`VPK`-adjacent bytes
/// of the data model once decompressed for verification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "VerificationKeyHelper"))]
#[cfg_attr(feature = "serde", serde(into = "VerificationKeyHelper"))]
pub struct VerificationKey(pub(crate) reddsa::VerificationKey<SpendAuth>);

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct VerificationKeyHelper([u8; 32]);

impl TryFrom<VerificationKeyHelper> for VerificationKey {
    type Error = Error;

    fn try_from(helper: VerificationKeyHelper) -> Result<Self, Error> {
        helper.0.try_into()
    }
}

impl From<VerificationKey> for VerificationKeyHelper {
    fn from(vk: VerificationKey) -> Self {
        VerificationKeyHelper(vk.0.into())
    }
}

impl<'a> From<&'a SigningKey> for VerificationKey {
    fn from(sk: &'a SigningKey) -> VerificationKey {
        VerificationKey(reddsa::VerificationKey::from(&sk.0))
    }
}

impl TryFrom<[u8; 32]> for VerificationKey {
    type Error = Error;

    fn try_from(bytes: [u8; 32]) -> Result<Self, Error> {
        Ok(VerificationKey(reddsa::VerificationKey::try_from(bytes)?))
    }
}

impl From<VerificationKey> for [u8; 32] {
    fn from(vk: VerificationKey) -> [u8; 32] {
        vk.0.into()
    }
}

impl VerificationKey {
    /// Verify a purported `signature` over `msg`.
    pub fn verify(&self, msg: &[u8], signature: &Signature) -> Result<(), Error> {
        self.0.verify(msg, &signature.0).map_err(Error::from)
    }
}

/// A RedJubjub signature over a protocol message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signature(pub(crate) reddsa::Signature<SpendAuth>);

impl From<[u8; 64]> for Signature {
    fn from(bytes: [u8; 64]) -> Signature {
        Signature(reddsa::Signature::from(bytes))
    }
}

impl From<Signature> for [u8; 64] {
    fn from(sig: Signature) -> [u8; 64] {
        sig.0.into()
    }
}

/// The `SignatureScheme` marker type backing this crate's concrete
/// `SigningKey`/`VerificationKey`/`Signature`.
pub struct RedJubjubSignature;

impl super::SignatureScheme for RedJubjubSignature {
    type SigningKey = SigningKey;
    type VerificationKey = VerificationKey;
    type Signature = Signature;

    fn verification_key(sk: &SigningKey) -> VerificationKey {
        VerificationKey::from(sk)
    }

    fn sign<R: RngCore + CryptoRng>(rng: &mut R, sk: &SigningKey, msg: &[u8]) -> Signature {
        sk.sign(rng, msg)
    }

    fn verify(vk: &VerificationKey, msg: &[u8], sig: &Signature) -> Result<(), Error> {
        vk.verify(msg, sig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn sign_then_verify_round_trips() {
        let mut rng = thread_rng();
        let sk = SigningKey::new(&mut rng);
        let vk = VerificationKey::from(&sk);
        let msg = b"epoch 7 commitment";
        let sig = sk.sign(&mut rng, msg);
        assert!(vk.verify(msg, &sig).is_ok());
    }

    #[test]
    fn verify_rejects_tampered_message() {
        let mut rng = thread_rng();
        let sk = SigningKey::new(&mut rng);
        let vk = VerificationKey::from(&sk);
        let sig = sk.sign(&mut rng, b"epoch 7 commitment");
        assert!(vk.verify(b"epoch 8 commitment", &sig).is_err());
    }
}
