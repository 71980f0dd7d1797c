//! Group parameters (component A): the safe prime N, generator g, and the
//! derived asymmetry factor k = H(PAD(N) || PAD(g)).
//!
//! The teacher hardcodes its own (N, g) as WoW-specific constants inside
//! `SRP6::new()` and never derives a real k (it multiplies the verifier by
//! the fixed literal `3`, the SRP-3 asymmetry constant the design's k
//! replaces). Here k is the general SRP-6a k = H(PAD(N) || PAD(g)),
//! precomputed once at group construction instead of recomputed inside
//! every ephemeral-key derivation — the exact inefficiency the design
//! notes call out in the source material.

use num_bigint::BigUint;

use crate::bignum::{byte_len, pad};
use crate::error::SrpError;
use crate::primitives::hash;

/// RFC 5054 Appendix A 2048-bit group (the same modulus as the RFC 3526
/// 2048-bit MODP Group 14), g = 2.
const RFC5054_2048_N_HEX: &str = concat!(
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD1",
    "29024E088A67CC74020BBEA63B139B22514A08798E3404DD",
    "EF9519B3CD3A431B302B0A6DF25F14374FE1356D6D51C245",
    "E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED",
    "EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3D",
    "C2007CB8A163BF0598DA48361C55D39A69163FA8FD24CF5F",
    "83655D23DCA3AD961C62F356208552BB9ED529077096966D",
    "670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B",
    "E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9",
    "DE2BCBF6955817183995497CEA956AE515D2261898FA0510",
    "15728E5A8AACAA68FFFFFFFFFFFFFFFF",
);

const MIN_GROUP_BITS: u64 = 2048;

/// The immutable (N, g, k) triple shared read-only across every session in
/// a process.
#[derive(Debug, Clone)]
pub struct GroupParams {
    n: BigUint,
    g: BigUint,
    k: BigUint,
    byte_len: usize,
}

impl GroupParams {
    /// The RFC 5054 Appendix A 2048-bit group with g = 2.
    pub fn rfc5054_2048() -> Self {
        let n = BigUint::parse_bytes(RFC5054_2048_N_HEX.as_bytes(), 16)
            .expect("built-in group constant is valid hex");
        Self::from_parts(n, BigUint::from(2u32)).expect("built-in group meets the size floor")
    }

    /// Build a caller-supplied group. `n` MUST be at least 2048 bits, per
    /// the MUST on caller-supplied groups.
    pub fn new(n: BigUint, g: BigUint) -> Result<Self, SrpError> {
        Self::from_parts(n, g)
    }

    fn from_parts(n: BigUint, g: BigUint) -> Result<Self, SrpError> {
        if n.bits() < MIN_GROUP_BITS {
            return Err(SrpError::GroupTooSmall);
        }
        let byte_len = byte_len(&n);
        let k = derive_k(&n, &g, byte_len);
        Ok(GroupParams { n, g, k, byte_len })
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn g(&self) -> &BigUint {
        &self.g
    }

    pub fn k(&self) -> &BigUint {
        &self.k
    }

    /// `ceil(bits(N) / 8)`: the fixed width every PAD in this group uses.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// PAD(value): left-pad value's big-endian encoding to this group's
    /// byte length.
    pub fn pad(&self, value: &BigUint) -> Vec<u8> {
        pad(value, self.byte_len)
    }
}

impl Default for GroupParams {
    fn default() -> Self {
        Self::rfc5054_2048()
    }
}

fn derive_k(n: &BigUint, g: &BigUint, byte_len: usize) -> BigUint {
    let mut h = hash::new();
    hash::update(&mut h, &pad(n, byte_len));
    hash::update(&mut h, &pad(g, byte_len));
    BigUint::from_bytes_be(&hash::finish(h))
}
