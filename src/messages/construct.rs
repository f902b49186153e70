//! Message construction.
//!
//! `gen_commitment_and_opening` and `mk_signed_commitment` are the only two
//! functions in this crate that touch the PVSS/signature RNG; both take it
//! as an explicit parameter rather than an ambient source.

use rand_core::{CryptoRng, RngCore};

use super::{serialize, Commitment, CommitmentShares, Opening, SignedCommitment};
use crate::crypto::pvss::JubjubPvss;
use crate::crypto::signature::{RedJubjubSignature, Signature, SigningKey, VerificationKey};
use crate::crypto::{PvssScheme, SignatureScheme};
use crate::ids::EpochIndex;
use crate::Error;

/// Generate a fresh `(Commitment, Opening)` pair for threshold `t` over the
/// given VSS keys.
///
/// Preconditions (enforced by the underlying [`JubjubPvss::gen_shared_secret`]):
/// `1 <= t <= vss_keys.len()` and `vss_keys` contains no duplicates.
/// Each `vpk_i` is paired with `share_i` in insertion order to build the
/// commitment's `shares` map.
pub fn gen_commitment_and_opening<R: RngCore + CryptoRng>(
    rng: &mut R,
    t: u32,
    vss_keys: &[VerificationKey],
) -> Result<(Commitment, Opening), Error> {
    let (extra, secret, proof, enc_shares) = JubjubPvss::gen_shared_secret(rng, t, vss_keys)?;

    let shares: CommitmentShares = vss_keys
        .iter()
        .copied()
        .map(Into::into)
        .zip(enc_shares)
        .collect();

    let commitment = Commitment {
        extra,
        proof,
        shares,
    };
    let opening = Opening { secret };

    Ok((commitment, opening))
}

/// Sign `commitment` as of `epoch`, returning `(C, Sign(sk, (E, C)))`.
pub fn mk_signed_commitment<R: RngCore + CryptoRng>(
    rng: &mut R,
    sk: &SigningKey,
    epoch: EpochIndex,
    commitment: Commitment,
) -> SignedCommitment {
    let transcript = serialize::commitment_signing_transcript(epoch, &commitment);
    let signature: Signature = RedJubjubSignature::sign(rng, sk, &transcript);
    SignedCommitment {
        commitment,
        signature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    fn fresh_vpk<R: RngCore + CryptoRng>(rng: &mut R) -> VerificationKey {
        let sk = SigningKey::new(rng);
        VerificationKey::from(&sk)
    }

    /// Construction-verification consistency across a fresh key set.
    #[test]
    fn three_keys_threshold_two() {
        let mut rng = thread_rng();
        let vss_keys: Vec<VerificationKey> = (0..3).map(|_| fresh_vpk(&mut rng)).collect();

        let (commitment, opening) = gen_commitment_and_opening(&mut rng, 2, &vss_keys).unwrap();

        assert_eq!(commitment.shares.len(), 3);
        for vpk in &vss_keys {
            let key: crate::ids::Vpk = (*vpk).into();
            assert!(commitment.shares.contains_key(&key));
        }
        assert!(super::super::verify_commitment(&commitment));
        assert!(super::super::verify_opening(&commitment, &opening));
    }

    /// Two independent constructions over the same key set differ.
    #[test]
    fn independent_constructions_differ() {
        let mut rng = thread_rng();
        let vss_keys: Vec<VerificationKey> = (0..2).map(|_| fresh_vpk(&mut rng)).collect();

        let (c1, o1) = gen_commitment_and_opening(&mut rng, 2, &vss_keys).unwrap();
        let (c2, o2) = gen_commitment_and_opening(&mut rng, 2, &vss_keys).unwrap();

        assert_ne!(c1, c2);
        assert_ne!(o1, o2);
    }

    /// Signature round-trip, and rejection once the epoch is wrong.
    #[test]
    fn signature_round_trips_and_rejects_wrong_epoch() {
        let mut rng = thread_rng();
        let vss_keys: Vec<VerificationKey> = (0..2).map(|_| fresh_vpk(&mut rng)).collect();
        let (commitment, _opening) = gen_commitment_and_opening(&mut rng, 2, &vss_keys).unwrap();

        let sk = SigningKey::new(&mut rng);
        let vk = VerificationKey::from(&sk);
        let sc = mk_signed_commitment(&mut rng, &sk, 7, commitment);

        assert!(super::super::verify_commitment_signature(&vk, 7, &sc));
        assert!(!super::super::verify_commitment_signature(&vk, 8, &sc));
    }
}
