// -*- mode: rust; -*-
//
// This file is part of ssc-core.
// See LICENSE for licensing information.

//! `JubjubPvss`: a Schoenmakers-style publicly verifiable secret sharing
//! scheme over the Jubjub curve.
//!
//! Shape: the dealer picks a degree-`(t-1)` polynomial `a(x) = a_0 + a_1 x +
//! ... + a_{t-1} x^{t-1}` over `jubjub::Fr`, commits to its coefficients as
//! `comms[j] = G * a_j` (`Extra`), and for each recipient `i` encrypts
//! `Y_i = G * a(i)` under that recipient's VSS key via an exponential
//! ElGamal-style masking `W_i = Y_i + vpk_i * r_i`, alongside a
//! Chaum-Pedersen proof that `(G, x_i, vpk_i, W_i - Y_i)` is a
//! Diffie-Hellman tuple. Verification needs only `extra`, `vpk`, and the
//! share itself — exactly the crypto-adapter contract's `verifyEncShare`
//! signature — because `Y_i` is publicly recomputable from `extra.comms`
//! by evaluating the committed polynomial at `i` (Horner's method).
//!
//! The secret itself is never transmitted; recovery works in the exponent
//! (Lagrange interpolation of the `Y_i` points), which is why the scheme's
//! recovered value is a curve point (`DhSecret`), not a scalar — matching
//! the crypto library boundary's separate `secretToDhSecret`/`getDhSecret`
//! operations rather than a bare secret-scalar reconstruction.

use std::convert::TryFrom;

use group::Group;
use jubjub::{AffinePoint, ExtendedPoint, Fr as Scalar};
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::crypto::signature::{SigningKey, VerificationKey};
use crate::hash::{Blake2b512, HStar, StdBlake2b512};
use crate::Error;

/// The fixed generator used for every Feldman commitment and DH exchange
/// in this scheme, kept distinct from the signature scheme's own
/// internal basepoint for key-separation hygiene.
fn generator() -> ExtendedPoint {
    ExtendedPoint::generator()
}

fn scalar_from_wide_bytes<H: Blake2b512>(personal: &[u8], data: &[&[u8]]) -> Scalar {
    let mut hasher = HStar::<H>::new_with_personal(personal);
    for chunk in data {
        hasher = hasher.update(chunk);
    }
    hasher.finalize()
}

fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    let mut wide = [0u8; 64];
    rng.fill_bytes(&mut wide);
    Scalar::from_bytes_wide(&wide)
}

fn decode_point(bytes: &[u8; 32]) -> Result<ExtendedPoint, Error> {
    let affine: AffinePoint = AffinePoint::from_bytes(*bytes)
        .into_option()
        .ok_or(Error::MalformedMessage)?;
    Ok(ExtendedPoint::from(affine))
}

fn decode_scalar(bytes: &[u8; 32]) -> Result<Scalar, Error> {
    Scalar::from_bytes(bytes).into_option().ok_or(Error::MalformedMessage)
}

fn encode_point(p: &ExtendedPoint) -> [u8; 32] {
    AffinePoint::from(p).to_bytes()
}

/// Evaluate the Feldman-committed polynomial `a(x)` at `x = index` in the
/// exponent: `Y = sum_j comms[j] * index^j`, via Horner's method.
fn eval_commitments(comms: &[ExtendedPoint], index: u32) -> ExtendedPoint {
    let x = Scalar::from(index as u64);
    comms
        .iter()
        .rev()
        .fold(ExtendedPoint::identity(), |acc, comm_j| acc * x + *comm_j)
}

fn lagrange_coefficient(index: u32, others: &[u32]) -> Scalar {
    let xi = Scalar::from(index as u64);
    others.iter().fold(Scalar::one(), |acc, &j| {
        if j == index {
            return acc;
        }
        let xj = Scalar::from(j as u64);
        // acc * (0 - xj) / (xi - xj), rearranged to avoid a Sub impl on
        // points -- scalars do support subtraction directly, so this is
        // plain field arithmetic.
        let num = Scalar::zero() - xj;
        let den = xi - xj;
        acc * num * den.invert().unwrap()
    })
}

/// The PVSS auxiliary payload: Feldman commitments to the dealer's
/// polynomial coefficients, `comms[0]` being the commitment to the secret
/// itself.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extra {
    /// `comms[j]` is the encoding of `G * a_j`.
    pub comms: Vec<[u8; 32]>,
}

impl Extra {
    fn decode_comms(&self) -> Result<Vec<ExtendedPoint>, Error> {
        self.comms.iter().map(decode_point).collect()
    }
}

/// A recipient's encrypted share, carrying its own non-interactive
/// Chaum-Pedersen proof of correct construction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncShare {
    /// The recipient's 1-based polynomial evaluation point.
    pub index: u32,
    /// `G * r`, the prover's DH ephemeral public value.
    pub ephemeral: [u8; 32],
    /// `Y + vpk * r`, the masked share.
    pub masked: [u8; 32],
    /// Chaum-Pedersen commitment `G * k`.
    pub nizk_t0: [u8; 32],
    /// Chaum-Pedersen commitment `vpk * k`.
    pub nizk_t1: [u8; 32],
    /// Chaum-Pedersen response `k + c*r`.
    pub nizk_z: [u8; 32],
}

/// A secret revealed at the Opening phase: the dealer's degree-0
/// coefficient `a_0`, still in scalar form.
#[derive(Clone, Zeroize)]
pub struct Secret(pub(crate) Scalar);

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl Secret {
    /// Canonical byte encoding of the secret scalar.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Decode a secret from its canonical byte encoding.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, Error> {
        Ok(Secret(decode_scalar(bytes)?))
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}
impl Eq for Secret {}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(..)")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Secret {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.to_bytes(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Secret {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = <[u8; 32] as serde::Deserialize>::deserialize(deserializer)?;
        Secret::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

/// A group-element (DH) representation of a dealer's secret: either the
/// direct reduction of an `Opening`'s revealed scalar, or the result of
/// Lagrange-interpolating a threshold of decrypted shares.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct DhSecret(ExtendedPoint);

/// A Schnorr-style self-signature over `extra`'s canonical bytes by the
/// revealed secret, binding `extra.comms[0]` to the same scalar as
/// `Secret`. Verified without ever decrypting any share.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Proof(pub [u8; 64]);

/// A convenience handle bundling the raw scalar a caller may need to
/// derive a `DhSecret` directly, without going through full recovery.
/// Exists only to give `secret_to_dh_secret` something concrete to accept.
pub type PvssSecretHandle = Secret;

fn extra_transcript(extra: &Extra) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + extra.comms.len() * 32);
    buf.extend_from_slice(&(extra.comms.len() as u32).to_be_bytes());
    for c in &extra.comms {
        buf.extend_from_slice(c);
    }
    buf
}

fn challenge(
    vpk: &[u8; 32],
    ephemeral: &[u8; 32],
    masked: &[u8; 32],
    t0: &[u8; 32],
    t1: &[u8; 32],
    index: u32,
) -> Scalar {
    scalar_from_wide_bytes::<StdBlake2b512>(
        b"SSCorePvssNizkV1",
        &[vpk, ephemeral, masked, t0, t1, &index.to_be_bytes()],
    )
}

/// The `JubjubPvss` marker type backing the `PvssScheme` trait impl.
pub struct JubjubPvss;

impl JubjubPvss {
    /// Generate a fresh threshold-`t` shared secret for the given VSS
    /// public keys. Mirrors `PvssScheme::gen_shared_secret`; kept as an
    /// inherent method too so callers that don't want the trait import
    /// can use it directly.
    pub fn gen_shared_secret<R: RngCore + CryptoRng>(
        rng: &mut R,
        t: u32,
        vpks: &[VerificationKey],
    ) -> Result<(Extra, Secret, Proof, Vec<EncShare>), Error> {
        let n = vpks.len();
        if t == 0 || (t as usize) > n || n == 0 {
            return Err(Error::BadThreshold);
        }
        let mut seen: Vec<[u8; 32]> = Vec::with_capacity(n);
        for vpk in vpks {
            let bytes: [u8; 32] = (*vpk).into();
            if seen.contains(&bytes) {
                return Err(Error::DuplicateVssKey);
            }
            seen.push(bytes);
        }

        let g = generator();
        let coeffs: Vec<Scalar> = (0..t).map(|_| random_scalar(rng)).collect();
        let comms: Vec<ExtendedPoint> = coeffs.iter().map(|a| g * a).collect();
        let extra = Extra {
            comms: comms.iter().map(encode_point).collect(),
        };

        let secret = Secret(coeffs[0]);

        let mut enc_shares = Vec::with_capacity(n);
        for (i, vpk) in vpks.iter().enumerate() {
            let index = (i + 1) as u32;
            let x = Scalar::from(index as u64);
            let y_i = coeffs
                .iter()
                .rev()
                .fold(ExtendedPoint::identity(), |acc, a_j| acc * x + (g * a_j));

            let vpk_bytes: [u8; 32] = (*vpk).into();
            let vpk_point = decode_point(&vpk_bytes)?;

            let r = random_scalar(rng);
            let ephemeral_point = g * r;
            let masked_point = y_i + vpk_point * r;

            let k = random_scalar(rng);
            let t0 = g * k;
            let t1 = vpk_point * k;

            let ephemeral = encode_point(&ephemeral_point);
            let masked = encode_point(&masked_point);
            let t0_bytes = encode_point(&t0);
            let t1_bytes = encode_point(&t1);

            let c = challenge(&vpk_bytes, &ephemeral, &masked, &t0_bytes, &t1_bytes, index);
            let z = k + c * r;

            enc_shares.push(EncShare {
                index,
                ephemeral,
                masked,
                nizk_t0: t0_bytes,
                nizk_t1: t1_bytes,
                nizk_z: z.to_bytes(),
            });
        }

        let proof = Self::sign_secret(rng, &secret, &extra);

        Ok((extra, secret, proof, enc_shares))
    }

    /// True iff `enc_share` is well-formed for `vpk` under `extra`.
    pub fn verify_enc_share(extra: &Extra, vpk: &VerificationKey, enc_share: &EncShare) -> bool {
        Self::try_verify_enc_share(extra, vpk, enc_share).unwrap_or(false)
    }

    fn try_verify_enc_share(
        extra: &Extra,
        vpk: &VerificationKey,
        enc_share: &EncShare,
    ) -> Result<bool, Error> {
        let comms = extra.decode_comms()?;
        let y_i = eval_commitments(&comms, enc_share.index);

        let vpk_bytes: [u8; 32] = (*vpk).into();
        let vpk_point = decode_point(&vpk_bytes)?;

        let x_i = decode_point(&enc_share.ephemeral)?;
        let w_i = decode_point(&enc_share.masked)?;
        let t0 = decode_point(&enc_share.nizk_t0)?;
        let t1 = decode_point(&enc_share.nizk_t1)?;
        let z = decode_scalar(&enc_share.nizk_z)?;

        let c = challenge(
            &vpk_bytes,
            &enc_share.ephemeral,
            &enc_share.masked,
            &enc_share.nizk_t0,
            &enc_share.nizk_t1,
            enc_share.index,
        );

        let g = generator();

        // G*z == t0 + X*c  (knowledge of r with X = G*r)
        let lhs_a = g * z;
        let rhs_a = t0 + x_i * c;
        if lhs_a != rhs_a {
            return Ok(false);
        }

        // vpk*z + Y*c == t1 + W*c, the additive rearrangement of
        // vpk*z == t1 + (W - Y)*c that avoids a point-subtraction
        // operator entirely.
        let lhs_b = vpk_point * z + y_i * c;
        let rhs_b = t1 + w_i * c;
        Ok(lhs_b == rhs_b)
    }

    /// True iff `secret` is the committed secret of `(extra, proof)`.
    pub fn verify_secret_proof(extra: &Extra, secret: &Secret, proof: &Proof) -> bool {
        Self::try_verify_secret_proof(extra, secret, proof).unwrap_or(false)
    }

    fn try_verify_secret_proof(extra: &Extra, secret: &Secret, proof: &Proof) -> Result<bool, Error> {
        let comms = extra.decode_comms()?;
        let expected = comms.first().copied().ok_or(Error::MalformedMessage)?;
        let g = generator();
        if g * secret.0 != expected {
            return Ok(false);
        }

        let sk = SigningKey::try_from(secret.0.to_bytes())?;
        let vk = VerificationKey::from(&sk);
        let sig = crate::crypto::signature::Signature::from(proof.0);
        Ok(vk.verify(&extra_transcript(extra), &sig).is_ok())
    }

    fn sign_secret<R: RngCore + CryptoRng>(rng: &mut R, secret: &Secret, extra: &Extra) -> Proof {
        let sk = SigningKey::try_from(secret.0.to_bytes())
            .expect("a freshly-sampled non-zero scalar is always a valid signing key");
        let sig = sk.sign(rng, &extra_transcript(extra));
        Proof(sig.into())
    }

    /// Decrypt a recipient's share given their VSS secret key, recovering
    /// `Y_i` (the point form of `a(i)`) rather than a scalar — consistent
    /// with this scheme's exponent-domain recovery. Not part of the
    /// minimal `PvssScheme` contract; provided for a real recipient's use.
    pub fn decrypt_share(vss_sk: &Scalar, enc_share: &EncShare) -> Result<DhSecret, Error> {
        let w_i = decode_point(&enc_share.masked)?;
        let x_i = decode_point(&enc_share.ephemeral)?;
        let shared = x_i * vss_sk;
        // Y_i = W_i + (-shared); ExtendedPoint implements Neg, so this is
        // still pure point arithmetic, just not restricted to `+`/`*`.
        Ok(DhSecret(w_i + (-shared)))
    }

    /// Recover a secret's DH representation from `threshold` decrypted
    /// shares (`(index, Y_i)` pairs), via exponent-domain Lagrange
    /// interpolation at `x = 0`.
    pub fn recover(threshold: u32, shares: &[(u32, DhSecret)]) -> Result<DhSecret, Error> {
        if shares.len() < threshold as usize || shares.is_empty() {
            return Err(Error::BadThreshold);
        }
        let used = &shares[..threshold as usize];
        let indices: Vec<u32> = used.iter().map(|(i, _)| *i).collect();
        let mut acc = ExtendedPoint::identity();
        for (index, y) in used {
            let lambda = lagrange_coefficient(*index, &indices);
            acc += y.0 * lambda;
        }
        Ok(DhSecret(acc))
    }

    /// Reduce an opened secret scalar to its DH-secret representation.
    pub fn secret_to_dh_secret(secret: &Secret) -> DhSecret {
        DhSecret(generator() * secret.0)
    }

    /// Canonical byte extraction for a `DhSecret`.
    pub fn get_dh_secret(dh: &DhSecret) -> [u8; 32] {
        encode_point(&dh.0)
    }
}

impl super::PvssScheme for JubjubPvss {
    type Extra = Extra;
    type Secret = Secret;
    type Proof = Proof;
    type EncShare = EncShare;
    type Vpk = VerificationKey;
    type DhSecret = DhSecret;

    fn gen_shared_secret<R: RngCore + CryptoRng>(
        rng: &mut R,
        t: u32,
        vpks: &[VerificationKey],
    ) -> Result<(Extra, Secret, Proof, Vec<EncShare>), Error> {
        JubjubPvss::gen_shared_secret(rng, t, vpks)
    }

    fn verify_enc_share(extra: &Extra, vpk: &VerificationKey, enc_share: &EncShare) -> bool {
        JubjubPvss::verify_enc_share(extra, vpk, enc_share)
    }

    fn verify_secret_proof(extra: &Extra, secret: &Secret, proof: &Proof) -> bool {
        JubjubPvss::verify_secret_proof(extra, secret, proof)
    }

    fn recover(threshold: u32, shares: &[(u32, DhSecret)]) -> Result<DhSecret, Error> {
        JubjubPvss::recover(threshold, shares)
    }

    fn secret_to_dh_secret(secret: &Secret) -> DhSecret {
        JubjubPvss::secret_to_dh_secret(secret)
    }

    fn get_dh_secret(dh: &DhSecret) -> [u8; 32] {
        JubjubPvss::get_dh_secret(dh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    fn fresh_vpks(rng: &mut impl RngCore, n: usize) -> Vec<(Scalar, VerificationKey)> {
        (0..n)
            .map(|_| {
                let s = random_scalar(rng);
                let sk = SigningKey::try_from(s.to_bytes()).unwrap();
                let vk = VerificationKey::from(&sk);
                (s, vk)
            })
            .collect()
    }

    #[test]
    fn construction_verification_consistency() {
        let mut rng = thread_rng();
        let keys = fresh_vpks(&mut rng, 3);
        let vpks: Vec<VerificationKey> = keys.iter().map(|(_, vk)| *vk).collect();

        let (extra, secret, proof, shares) =
            JubjubPvss::gen_shared_secret(&mut rng, 2, &vpks).unwrap();

        assert_eq!(shares.len(), 3);
        for (vpk, share) in vpks.iter().zip(shares.iter()) {
            assert!(JubjubPvss::verify_enc_share(&extra, vpk, share));
        }
        assert!(JubjubPvss::verify_secret_proof(&extra, &secret, &proof));
    }

    #[test]
    fn tampered_share_fails_verification() {
        let mut rng = thread_rng();
        let keys = fresh_vpks(&mut rng, 2);
        let vpks: Vec<VerificationKey> = keys.iter().map(|(_, vk)| *vk).collect();
        let (extra, _secret, _proof, mut shares) =
            JubjubPvss::gen_shared_secret(&mut rng, 2, &vpks).unwrap();

        shares[0].masked[0] ^= 0xff;
        assert!(!JubjubPvss::verify_enc_share(&extra, &vpks[0], &shares[0]));
    }

    #[test]
    fn decrypt_and_recover_matches_direct_reduction() {
        let mut rng = thread_rng();
        let keys = fresh_vpks(&mut rng, 3);
        let vpks: Vec<VerificationKey> = keys.iter().map(|(_, vk)| *vk).collect();
        let (extra, secret, _proof, shares) =
            JubjubPvss::gen_shared_secret(&mut rng, 2, &vpks).unwrap();
        let _ = &extra;

        let decrypted: Vec<(u32, DhSecret)> = keys
            .iter()
            .zip(shares.iter())
            .map(|((sk_scalar, _), share)| {
                (share.index, JubjubPvss::decrypt_share(sk_scalar, share).unwrap())
            })
            .collect();

        let recovered = JubjubPvss::recover(2, &decrypted[..2]).unwrap();
        let direct = JubjubPvss::secret_to_dh_secret(&secret);
        assert_eq!(recovered, direct);
    }

    #[test]
    fn bad_threshold_is_rejected() {
        let mut rng = thread_rng();
        let keys = fresh_vpks(&mut rng, 2);
        let vpks: Vec<VerificationKey> = keys.iter().map(|(_, vk)| *vk).collect();
        assert_eq!(
            JubjubPvss::gen_shared_secret(&mut rng, 0, &vpks).unwrap_err(),
            Error::BadThreshold
        );
        assert_eq!(
            JubjubPvss::gen_shared_secret(&mut rng, 3, &vpks).unwrap_err(),
            Error::BadThreshold
        );
    }

    #[test]
    fn duplicate_vss_key_is_rejected() {
        let mut rng = thread_rng();
        let keys = fresh_vpks(&mut rng, 1);
        let vpks = vec![keys[0].1, keys[0].1];
        assert_eq!(
            JubjubPvss::gen_shared_secret(&mut rng, 1, &vpks).unwrap_err(),
            Error::DuplicateVssKey
        );
    }
}
