//! Message verification: pure, total predicates over the message
//! types of the parent module.
//!
//! `verify_signed_commitment` evaluates both of its checks unconditionally
//! (never short-circuits) so that the returned [`SignedCommitmentVerdict`]
//! enumerates every violation a tampered or malformed message triggers,
//! since diagnostic value outweighs the trivial extra work on an
//! already-failing message.

use super::{serialize, Commitment, Opening, SignedCommitment, VssCertificate};
use crate::crypto::pvss::JubjubPvss;
use crate::crypto::signature::{RedJubjubSignature, VerificationKey};
use crate::crypto::{PvssScheme, SignatureScheme};
use crate::ids::EpochIndex;

/// `verifyCommitment(C)`: true iff every encrypted share in `C.shares` is
/// well-formed for its recipient under `C.extra`.
pub fn verify_commitment(commitment: &Commitment) -> bool {
    commitment.shares.iter().all(|(vpk_bytes, enc_share)| {
        match VerificationKey::try_from(*vpk_bytes) {
            Ok(vpk) => JubjubPvss::verify_enc_share(&commitment.extra, &vpk, enc_share),
            Err(_) => false,
        }
    })
}

/// `verifyCommitmentSignature(pk, E, SC)`: true iff `SC.signature` verifies
/// over `(E, SC.commitment)` under `pk`.
pub fn verify_commitment_signature(
    pk: &VerificationKey,
    epoch: EpochIndex,
    sc: &SignedCommitment,
) -> bool {
    let transcript = serialize::commitment_signing_transcript(epoch, &sc.commitment);
    RedJubjubSignature::verify(pk, &transcript, &sc.signature).is_ok()
}

/// The structured outcome of [`verify_signed_commitment`], enumerating the
/// specific failure(s) rather than collapsing to a single boolean.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct SignedCommitmentVerdict {
    /// `verify_commitment_signature` failed.
    pub bad_signature: bool,
    /// `verify_commitment` failed.
    pub bad_commitment: bool,
}

impl SignedCommitmentVerdict {
    /// True iff neither check failed.
    pub fn is_ok(&self) -> bool {
        !self.bad_signature && !self.bad_commitment
    }
}

/// `verifySignedCommitment(pk, E, SC)`: runs both
/// [`verify_commitment_signature`] and [`verify_commitment`], without
/// short-circuiting, and reports which (if either) failed.
pub fn verify_signed_commitment(
    pk: &VerificationKey,
    epoch: EpochIndex,
    sc: &SignedCommitment,
) -> SignedCommitmentVerdict {
    let bad_signature = !verify_commitment_signature(pk, epoch, sc);
    let bad_commitment = !verify_commitment(&sc.commitment);
    SignedCommitmentVerdict {
        bad_signature,
        bad_commitment,
    }
}

/// `verifyOpening(C, O)`: true iff `O.secret` is the committed secret of
/// `(C.extra, C.proof)`.
pub fn verify_opening(commitment: &Commitment, opening: &Opening) -> bool {
    JubjubPvss::verify_secret_proof(&commitment.extra, &opening.secret, &commitment.proof)
}

/// `verifyCertificate(cert, E)`: true iff `cert`'s signature is valid for
/// `issuer` and `cert.expiry_epoch >= E`.
pub fn verify_certificate(
    issuer: &VerificationKey,
    cert: &VssCertificate,
    epoch: EpochIndex,
) -> bool {
    cert.expiry_epoch >= epoch && cert.issued_by(issuer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::signature::SigningKey;
    use crate::messages::{gen_commitment_and_opening, mk_signed_commitment};
    use rand::thread_rng;

    #[test]
    fn certificate_rejects_expired_epoch() {
        let mut rng = thread_rng();
        let issuer_sk = SigningKey::new(&mut rng);
        let issuer_vk = VerificationKey::from(&issuer_sk);
        let vss_sk = SigningKey::new(&mut rng);
        let vss_vk = VerificationKey::from(&vss_sk);

        let cert = VssCertificate::new(&mut rng, &issuer_sk, vss_vk, 10);

        assert!(verify_certificate(&issuer_vk, &cert, 5));
        assert!(verify_certificate(&issuer_vk, &cert, 10));
        assert!(!verify_certificate(&issuer_vk, &cert, 11));
    }

    /// A single-bit flip in a signed commitment is caught by at
    /// least one of the two checks.
    #[test]
    fn tampering_is_detected() {
        let mut rng = thread_rng();
        let vss_keys: Vec<VerificationKey> = (0..3)
            .map(|_| VerificationKey::from(&SigningKey::new(&mut rng)))
            .collect();
        let (commitment, _opening) = gen_commitment_and_opening(&mut rng, 2, &vss_keys).unwrap();

        let sk = SigningKey::new(&mut rng);
        let vk = VerificationKey::from(&sk);
        let mut sc = mk_signed_commitment(&mut rng, &sk, 3, commitment);

        let (_, enc_share) = sc.commitment.shares.iter_mut().next().unwrap();
        enc_share.masked[0] ^= 0x01;

        let verdict = verify_signed_commitment(&vk, 3, &sc);
        assert!(!verdict.is_ok());
    }
}
