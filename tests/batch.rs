use rand::thread_rng;

use ssc_core::batch;
use ssc_core::crypto::signature::{SigningKey, VerificationKey};
use ssc_core::messages::{gen_commitment_and_opening, mk_signed_commitment};

#[test]
fn batch_verify_many_signed_commitments() {
    let mut rng = thread_rng();
    let mut verifier = batch::Verifier::new();

    for epoch in 0..32 {
        let vss_keys: Vec<VerificationKey> = (0..3)
            .map(|_| VerificationKey::from(&SigningKey::new(&mut rng)))
            .collect();
        let (commitment, _opening) = gen_commitment_and_opening(&mut rng, 2, &vss_keys).unwrap();
        let sk = SigningKey::new(&mut rng);
        let vk = VerificationKey::from(&sk);
        let sc = mk_signed_commitment(&mut rng, &sk, epoch, commitment);
        verifier.queue(batch::Item::new(vk, epoch, &sc));
    }

    assert!(verifier.verify(thread_rng()).is_ok());
}
