use std::convert::TryFrom;

use proptest::prelude::*;
use rand::thread_rng;
use rand_chacha::ChaChaRng;
use rand_core::SeedableRng;

use ssc_core::codec::Codec;
use ssc_core::crypto::signature::{SigningKey, VerificationKey};
use ssc_core::messages::{
    gen_commitment_and_opening, mk_signed_commitment, verify_commitment, verify_opening,
    verify_signed_commitment, Commitment, SignedCommitment,
};
use ssc_core::phase::PhaseConfig;
use ssc_core::seed::FtsSeed;

fn fresh_vpks<R: rand_core::RngCore + rand_core::CryptoRng>(
    rng: &mut R,
    n: usize,
) -> Vec<VerificationKey> {
    (0..n)
        .map(|_| VerificationKey::from(&SigningKey::new(rng)))
        .collect()
}

fn fresh_signed_commitment(
    rng_seed: u64,
    n: usize,
    t: u32,
    epoch: u64,
) -> (VerificationKey, SignedCommitment, Commitment) {
    let mut rng = ChaChaRng::seed_from_u64(rng_seed);
    let vss_keys = fresh_vpks(&mut rng, n);
    let (commitment, _opening) = gen_commitment_and_opening(&mut rng, t, &vss_keys).unwrap();
    let sk = SigningKey::new(&mut rng);
    let vk = VerificationKey::from(&sk);
    let sc = mk_signed_commitment(&mut rng, &sk, epoch, commitment.clone());
    (vk, sc, commitment)
}

proptest! {
    /// A freshly constructed commitment and its matching
    /// opening always verify against one another, for any valid
    /// `(n, t)` pair.
    #[test]
    fn construction_verification_consistency(
        n in 1usize..8,
        t_offset in 0u32..8,
        rng_seed in any::<u64>(),
    ) {
        let t = 1 + (t_offset % n as u32);
        let mut rng = ChaChaRng::seed_from_u64(rng_seed);
        let vss_keys = fresh_vpks(&mut rng, n);
        let (commitment, opening) = gen_commitment_and_opening(&mut rng, t, &vss_keys).unwrap();

        prop_assert!(verify_commitment(&commitment));
        prop_assert!(verify_opening(&commitment, &opening));
    }

    /// A signature verifies under its own signer and epoch,
    /// and fails under any other epoch.
    #[test]
    fn signature_round_trips_and_epoch_is_bound(
        n in 1usize..6,
        epoch in 0u64..1000,
        wrong_epoch_delta in 1u64..50,
        rng_seed in any::<u64>(),
    ) {
        let (vk, sc, _commitment) = fresh_signed_commitment(rng_seed, n, 1, epoch);

        prop_assert!(verify_signed_commitment(&vk, epoch, &sc).is_ok());
        let wrong_epoch = epoch.wrapping_add(wrong_epoch_delta);
        prop_assume!(wrong_epoch != epoch);
        prop_assert!(!verify_signed_commitment(&vk, wrong_epoch, &sc).is_ok());
    }

    /// `FtsSeed::xor` is commutative, associative, and has the
    /// all-zero seed as identity, for any three byte strings.
    #[test]
    fn seed_xor_is_an_abelian_group_under_xor(
        a in prop::array::uniform32(any::<u8>()),
        b in prop::array::uniform32(any::<u8>()),
        c in prop::array::uniform32(any::<u8>()),
    ) {
        let (a, b, c) = (FtsSeed(a), FtsSeed(b), FtsSeed(c));

        prop_assert_eq!(a.xor(&b), b.xor(&a));
        prop_assert_eq!(a.xor(&b).xor(&c), a.xor(&b.xor(&c)));
        prop_assert_eq!(a.xor(&FtsSeed::zero()), a);
        prop_assert_eq!(a.xor(&a), FtsSeed::zero());
    }

    /// For any `k` and any slot, at most one of the three
    /// phase predicates holds.
    #[test]
    fn phases_never_overlap(k in 1u64..20, slot in 0u64..200) {
        let cfg = PhaseConfig::new(k);
        let flags = [
            cfg.is_commitment_phase(slot),
            cfg.is_opening_phase(slot),
            cfg.is_shares_phase(slot),
        ];
        prop_assert!(flags.iter().filter(|b| **b).count() <= 1);
    }

    /// Encoding a signed commitment and decoding it back
    /// always reproduces the original value, for arbitrary `(n, t)`.
    #[test]
    fn signed_commitment_encoding_round_trips(
        n in 1usize..6,
        t_offset in 0u32..6,
        epoch in any::<u64>(),
        rng_seed in any::<u64>(),
    ) {
        let t = 1 + (t_offset % n as u32);
        let (_vk, sc, _commitment) = fresh_signed_commitment(rng_seed, n, t, epoch);

        let bytes = sc.encode();
        let decoded = SignedCommitment::decode(&bytes).unwrap();
        prop_assert_eq!(&decoded, &sc);
        prop_assert_eq!(decoded.encode(), bytes);
    }

    /// Flipping any single byte of an encoded signed
    /// commitment either fails to decode or, once decoded, fails
    /// verification -- a bit flip is never silently accepted.
    #[test]
    fn tampering_a_single_byte_is_always_detected(
        n in 1usize..5,
        epoch in 0u64..1000,
        rng_seed in any::<u64>(),
        flip_index in 0usize..4096,
        flip_bit in 0u8..8,
    ) {
        let (vk, sc, _commitment) = fresh_signed_commitment(rng_seed, n, 1, epoch);
        let mut bytes = sc.encode();
        let idx = flip_index % bytes.len();
        bytes[idx] ^= 1 << flip_bit;

        match SignedCommitment::decode(&bytes) {
            Err(_) => {}
            Ok(decoded) => {
                prop_assert!(!verify_signed_commitment(&vk, epoch, &decoded).is_ok());
            }
        }
    }
}

/// Not a property test: confirms the harness-level RNG path (`thread_rng`,
/// used by every non-proptest test in this crate) produces independent
/// commitments, exercised once here since the proptest strategies above
/// all go through a seeded `ChaChaRng` instead.
#[test]
fn thread_rng_constructions_are_independent() {
    let mut rng = thread_rng();
    let vss_keys = fresh_vpks(&mut rng, 3);
    let (c1, _) = gen_commitment_and_opening(&mut rng, 2, &vss_keys).unwrap();
    let (c2, _) = gen_commitment_and_opening(&mut rng, 2, &vss_keys).unwrap();
    assert_ne!(c1, c2);
    let _ = VerificationKey::try_from([0u8; 32]);
}
