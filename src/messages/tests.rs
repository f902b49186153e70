//! End-to-end message-module tests spanning construction, verification and
//! encoding together (module-local unit tests for the narrower per-function
//! invariants live alongside each function in `construct`/`validate`/
//! `serialize`).

use rand::thread_rng;

use super::*;
use crate::crypto::signature::{SigningKey, VerificationKey};

/// A matching `(Commitment, Opening)` pair, put under the same
/// stakeholder, verifies cleanly end to end: sign, serialize, deserialize,
/// and both verification predicates still hold on the decoded copy.
#[test]
fn full_round_trip_construct_sign_encode_verify() {
    let mut rng = thread_rng();
    let vss_keys: Vec<VerificationKey> = (0..4)
        .map(|_| VerificationKey::from(&SigningKey::new(&mut rng)))
        .collect();

    let (commitment, opening) = gen_commitment_and_opening(&mut rng, 3, &vss_keys).unwrap();
    let sk = SigningKey::new(&mut rng);
    let vk = VerificationKey::from(&sk);
    let sc = mk_signed_commitment(&mut rng, &sk, 100, commitment);

    let encoded = crate::codec::Codec::encode(&sc);
    let decoded: SignedCommitment = crate::codec::Codec::decode(&encoded).unwrap();

    let verdict = verify_signed_commitment(&vk, 100, &decoded);
    assert!(verdict.is_ok());
    assert!(verify_opening(&decoded.commitment, &opening));
}

/// A signed commitment round-trips through both a self-describing
/// (`serde_json`) and a compact (`bincode`) serde format, independently of
/// this module's own hand-rolled `Codec` encoding.
#[cfg(feature = "serde")]
#[test]
fn signed_commitment_round_trips_through_serde_formats() {
    let mut rng = thread_rng();
    let vss_keys: Vec<VerificationKey> = (0..3)
        .map(|_| VerificationKey::from(&SigningKey::new(&mut rng)))
        .collect();
    let (commitment, _opening) = gen_commitment_and_opening(&mut rng, 2, &vss_keys).unwrap();
    let sk = SigningKey::new(&mut rng);
    let sc = mk_signed_commitment(&mut rng, &sk, 11, commitment);

    let json = serde_json::to_string(&sc).unwrap();
    let from_json: SignedCommitment = serde_json::from_str(&json).unwrap();
    assert_eq!(sc, from_json);

    let packed = bincode::serialize(&sc).unwrap();
    let from_bincode: SignedCommitment = bincode::deserialize(&packed).unwrap();
    assert_eq!(sc, from_bincode);
}

#[test]
fn wrong_signer_fails_signature_check_only() {
    let mut rng = thread_rng();
    let vss_keys: Vec<VerificationKey> = (0..2)
        .map(|_| VerificationKey::from(&SigningKey::new(&mut rng)))
        .collect();
    let (commitment, _opening) = gen_commitment_and_opening(&mut rng, 2, &vss_keys).unwrap();

    let sk = SigningKey::new(&mut rng);
    let sc = mk_signed_commitment(&mut rng, &sk, 1, commitment);

    let impostor_vk = VerificationKey::from(&SigningKey::new(&mut rng));
    let verdict = verify_signed_commitment(&impostor_vk, 1, &sc);
    assert!(verdict.bad_signature);
    assert!(!verdict.bad_commitment);
}
