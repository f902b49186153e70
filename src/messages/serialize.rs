//! Canonical binary encoding for protocol messages.
//!
//! Fields are encoded in the order declared in the data model; variable-
//! length fields (`Extra.comms`, a `Commitment`'s `shares`) are prefixed
//! with a big-endian `u32` length. [`Codec::decode`] rejects both
//! malformed lengths and trailing bytes, so the round-trip law holds
//! exactly: decoding and re-encoding a message always reproduces its
//! original bytes.

use std::convert::TryFrom;

use super::constants::MAX_MAP_ENTRIES;
use super::{Commitment, Opening, Share, SignedCommitment, VssCertificate};
use crate::codec::{put_bytes, put_fixed, put_u32, put_u64, Codec, Cursor};
use crate::crypto::pvss::{EncShare, Extra, Proof, Secret};
use crate::crypto::signature::{Signature, VerificationKey};
use crate::ids::{EpochIndex, Vpk};
use crate::Error;

/// The transcript signed by `mk_signed_commitment`: `(epoch, commitment)`.
pub(crate) fn commitment_signing_transcript(epoch: EpochIndex, commitment: &Commitment) -> Vec<u8> {
    let mut buf = Vec::new();
    put_u64(&mut buf, epoch);
    buf.extend_from_slice(&commitment.encode());
    buf
}

/// The transcript signed over a [`VssCertificate`]: `(vss_key, expiry_epoch)`.
pub(super) fn certificate_transcript(vss_key: &VerificationKey, expiry_epoch: EpochIndex) -> Vec<u8> {
    let mut buf = Vec::new();
    let vk_bytes: [u8; 32] = (*vss_key).into();
    put_fixed(&mut buf, &vk_bytes);
    put_u64(&mut buf, expiry_epoch);
    buf
}

fn encode_enc_share(buf: &mut Vec<u8>, share: &EncShare) {
    put_u32(buf, share.index);
    put_fixed(buf, &share.ephemeral);
    put_fixed(buf, &share.masked);
    put_fixed(buf, &share.nizk_t0);
    put_fixed(buf, &share.nizk_t1);
    put_fixed(buf, &share.nizk_z);
}

fn decode_enc_share(cur: &mut Cursor<'_>) -> Result<EncShare, Error> {
    Ok(EncShare {
        index: cur.take_u32()?,
        ephemeral: cur.take_array::<32>()?,
        masked: cur.take_array::<32>()?,
        nizk_t0: cur.take_array::<32>()?,
        nizk_t1: cur.take_array::<32>()?,
        nizk_z: cur.take_array::<32>()?,
    })
}

impl Codec for Extra {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        put_u32(&mut buf, self.comms.len() as u32);
        for comm in &self.comms {
            put_fixed(&mut buf, comm);
        }
        buf
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let mut cur = Cursor::new(bytes);
        let n = cur.take_u32()? as usize;
        if n > MAX_MAP_ENTRIES {
            return Err(Error::MalformedMessage);
        }
        let mut comms = Vec::with_capacity(n);
        for _ in 0..n {
            comms.push(cur.take_array::<32>()?);
        }
        cur.finish()?;
        Ok(Extra { comms })
    }
}

impl Codec for Commitment {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        put_bytes(&mut buf, &self.extra.encode());
        put_fixed(&mut buf, &self.proof.0);
        put_u32(&mut buf, self.shares.len() as u32);
        for (vpk, enc_share) in &self.shares {
            put_fixed(&mut buf, vpk.as_ref());
            encode_enc_share(&mut buf, enc_share);
        }
        buf
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let mut cur = Cursor::new(bytes);
        let extra_bytes = cur.take_bytes()?;
        let extra = Extra::decode(extra_bytes)?;
        let proof = Proof(cur.take_array::<64>()?);
        let n = cur.take_u32()? as usize;
        if n > MAX_MAP_ENTRIES {
            return Err(Error::MalformedMessage);
        }
        let mut shares = super::CommitmentShares::new();
        for _ in 0..n {
            let vpk = Vpk(cur.take_array::<32>()?);
            let enc_share = decode_enc_share(&mut cur)?;
            if shares.insert(vpk, enc_share).is_some() {
                return Err(Error::MalformedMessage);
            }
        }
        cur.finish()?;
        Ok(Commitment {
            extra,
            proof,
            shares,
        })
    }
}

impl Codec for SignedCommitment {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        put_bytes(&mut buf, &self.commitment.encode());
        let sig_bytes: [u8; 64] = self.signature.into();
        put_fixed(&mut buf, &sig_bytes);
        buf
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let mut cur = Cursor::new(bytes);
        let commitment = Commitment::decode(cur.take_bytes()?)?;
        let signature = Signature::from(cur.take_array::<64>()?);
        cur.finish()?;
        Ok(SignedCommitment {
            commitment,
            signature,
        })
    }
}

impl Codec for Opening {
    fn encode(&self) -> Vec<u8> {
        self.secret.to_bytes().to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let mut cur = Cursor::new(bytes);
        let secret = Secret::from_bytes(&cur.take_array::<32>()?)?;
        cur.finish()?;
        Ok(Opening { secret })
    }
}

impl Codec for Share {
    fn encode(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let mut cur = Cursor::new(bytes);
        let inner = cur.take_array::<32>()?;
        cur.finish()?;
        Ok(Share(inner))
    }
}

impl Codec for VssCertificate {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let vk_bytes: [u8; 32] = self.vss_key.into();
        put_fixed(&mut buf, &vk_bytes);
        put_u64(&mut buf, self.expiry_epoch);
        let sig_bytes: [u8; 64] = self.signature.into();
        put_fixed(&mut buf, &sig_bytes);
        buf
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let mut cur = Cursor::new(bytes);
        let vk_bytes = cur.take_array::<32>()?;
        let vss_key = VerificationKey::try_from(vk_bytes)?;
        let expiry_epoch = cur.take_u64()?;
        let signature = Signature::from(cur.take_array::<64>()?);
        cur.finish()?;
        Ok(VssCertificate {
            vss_key,
            expiry_epoch,
            signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::signature::SigningKey;
    use crate::messages::{gen_commitment_and_opening, mk_signed_commitment};
    use rand::thread_rng;

    /// Encoding round-trips for every message type.
    #[test]
    fn signed_commitment_round_trips() {
        let mut rng = thread_rng();
        let vss_keys: Vec<VerificationKey> = (0..3)
            .map(|_| VerificationKey::from(&SigningKey::new(&mut rng)))
            .collect();
        let (commitment, opening) = gen_commitment_and_opening(&mut rng, 2, &vss_keys).unwrap();

        let sk = SigningKey::new(&mut rng);
        let sc = mk_signed_commitment(&mut rng, &sk, 42, commitment);

        let bytes = sc.encode();
        let decoded = SignedCommitment::decode(&bytes).unwrap();
        assert_eq!(sc, decoded);
        assert_eq!(decoded.encode(), bytes);

        let opening_bytes = opening.encode();
        let decoded_opening = Opening::decode(&opening_bytes).unwrap();
        assert_eq!(opening, decoded_opening);
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        let mut rng = thread_rng();
        let vss_keys: Vec<VerificationKey> = (0..2)
            .map(|_| VerificationKey::from(&SigningKey::new(&mut rng)))
            .collect();
        let (commitment, _opening) = gen_commitment_and_opening(&mut rng, 1, &vss_keys).unwrap();

        let mut bytes = commitment.encode();
        bytes.push(0xff);
        assert!(Commitment::decode(&bytes).is_err());
    }

    #[test]
    fn certificate_round_trips() {
        let mut rng = thread_rng();
        let issuer_sk = SigningKey::new(&mut rng);
        let vss_vk = VerificationKey::from(&SigningKey::new(&mut rng));
        let cert = VssCertificate::new(&mut rng, &issuer_sk, vss_vk, 5);
        let bytes = cert.encode();
        let decoded = VssCertificate::decode(&bytes).unwrap();
        assert_eq!(cert, decoded);
    }
}
