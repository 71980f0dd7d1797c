//! SRP session (component C): the per-exchange state and the arithmetic
//! that moves it forward. Split into a client half (`client`) and a server
//! half (`server`) sharing the derivations in this module.
//!
//! The distilled design describes one `Session` struct with fields used
//! asymmetrically by either side. The teacher already resolves exactly
//! this ambiguity for its own (server-only) use case: `SRP6` in
//! `auth/srp6.rs` carries `b`/`big_b`/`v` and never retains a client
//! private exponent at all. Completing the picture here means a second,
//! client-side session type with the fields the client side actually
//! needs (`a`, `big_a`, a transiently-held password) instead of one struct
//! where half the fields are always unused depending on which side holds
//! it.

pub mod client;
pub mod server;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;
use zeroize::ZeroizeOnDrop;

use crate::bignum::is_zero_mod;
use crate::error::SrpError;
use crate::group::GroupParams;
use crate::primitives::{hash, KdfParams};

pub use client::{ClientPhase, ClientSession};
pub use server::{ServerPhase, ServerSession, UserRecord};

/// A session key, proof, or scrambling parameter — 32 bytes, the SHA-256
/// digest width.
pub type Digest32 = [u8; 32];

/// `x = integer(kdf(s, p))`, shared by `derive_verifier` and both halves'
/// premaster-secret derivation.
fn derive_x(salt: &[u8], password: &[u8], kdf_params: &KdfParams) -> Result<BigUint, SrpError> {
    let bytes = crate::primitives::kdf(salt, password, kdf_params)?;
    Ok(BigUint::from_bytes_be(&bytes))
}

/// `v = g^x mod N` for enrollment, driven by the identity, salt, and
/// password. `I` does not otherwise enter the computation in this
/// deployment (see the design's resolution of the salt/password-ordering
/// open question) but is accepted here to keep the enrollment call site
/// symmetric with `UserRecord`, and so a future switch to the RFC-5054
/// `x = H(s, H(I ":" p))` form only touches this one function.
pub fn derive_verifier(
    group: &GroupParams,
    _identity: &[u8],
    salt: &[u8],
    password: &[u8],
) -> Result<BigUint, SrpError> {
    let kdf_params = KdfParams::default();
    let x = derive_x(salt, password, &kdf_params)?;
    Ok(group.g().modpow(&x, group.n()))
}

/// u = H(PAD(A) || PAD(B)). Invariant 2: the caller must treat u = 0 as a
/// validation failure.
fn compute_u(group: &GroupParams, big_a: &BigUint, big_b: &BigUint) -> BigUint {
    let mut h = hash::new();
    hash::update(&mut h, &group.pad(big_a));
    hash::update(&mut h, &group.pad(big_b));
    BigUint::from_bytes_be(&hash::finish(h))
}

/// K = H(S).
fn compute_session_key(group: &GroupParams, s: &BigUint) -> Digest32 {
    let mut h = hash::new();
    hash::update(&mut h, &group.pad(s));
    hash::finish(h)
}

/// M1 = H(H(N) XOR H(g) || H(I) || s || A || B || K).
fn compute_m1(
    group: &GroupParams,
    identity: &[u8],
    salt: &[u8],
    big_a: &BigUint,
    big_b: &BigUint,
    session_key: &Digest32,
) -> Digest32 {
    let h_n = hash::once(&group.pad(group.n()));
    let h_g = hash::once(&group.pad(group.g()));
    let mut xored = [0u8; 32];
    for i in 0..32 {
        xored[i] = h_n[i] ^ h_g[i];
    }
    let h_i = hash::once(identity);

    let mut h = hash::new();
    hash::update(&mut h, &xored);
    hash::update(&mut h, &h_i);
    hash::update(&mut h, salt);
    hash::update(&mut h, &group.pad(big_a));
    hash::update(&mut h, &group.pad(big_b));
    hash::update(&mut h, session_key);
    hash::finish(h)
}

/// M2 = H(A || M1 || K).
fn compute_m2(group: &GroupParams, big_a: &BigUint, m1: &Digest32, session_key: &Digest32) -> Digest32 {
    let mut h = hash::new();
    hash::update(&mut h, &group.pad(big_a));
    hash::update(&mut h, m1);
    hash::update(&mut h, session_key);
    hash::finish(h)
}

/// Client-side premaster secret: S = (B - k*g^x)^(a + u*x) mod N, with the
/// subtraction performed mod N (invariant: add N before reducing if the
/// naive subtraction would go negative — `BigUint` has no negative values,
/// so this is `((B + N) - (k*g^x mod N)) mod N`).
fn client_premaster_secret(
    group: &GroupParams,
    big_b: &BigUint,
    a: &BigUint,
    u: &BigUint,
    x: &BigUint,
) -> BigUint {
    let n = group.n();
    let k_gx = (group.k() * group.g().modpow(x, n)).mod_floor(n);
    let base = if big_b >= &k_gx {
        (big_b - &k_gx).mod_floor(n)
    } else {
        ((big_b + n) - &k_gx).mod_floor(n)
    };
    let exponent = a + u * x;
    base.modpow(&exponent, n)
}

/// Server-side premaster secret: S = (A * v^u)^b mod N.
fn server_premaster_secret(group: &GroupParams, big_a: &BigUint, v: &BigUint, u: &BigUint, b: &BigUint) -> BigUint {
    let n = group.n();
    let a_vu = (big_a * v.modpow(u, n)).mod_floor(n);
    a_vu.modpow(b, n)
}

/// Invariant 1: A and B must be nonzero mod N on receipt.
fn validate_public_value(value: &BigUint, group: &GroupParams) -> Result<(), SrpError> {
    if value.is_zero() || is_zero_mod(value, group.n()) {
        return Err(SrpError::InvalidPublicValue);
    }
    Ok(())
}

/// Invariant 2: u must be nonzero.
fn validate_u(u: &BigUint) -> Result<(), SrpError> {
    if u.is_zero() {
        return Err(SrpError::InvalidPublicValue);
    }
    Ok(())
}

/// A password held only transiently (invariant 6), zeroized on drop. The
/// teacher never needs this — its server-only session never retains the
/// password at all — so this is grounded on the `zeroize` dependency a
/// sibling SRP-using example in this corpus carries for exactly this
/// purpose (password/session-key material in an auth module).
///
/// `num-bigint`'s `BigUint` has no `Zeroize` impl, so `a`, `b`, and `x`
/// themselves are not wiped on drop; only the password bytes and the
/// derived session key (`Digest32`, a plain byte array we control) are.
#[derive(ZeroizeOnDrop)]
pub(crate) struct Secret(Vec<u8>);

impl Secret {
    fn new(bytes: Vec<u8>) -> Self {
        Secret(bytes)
    }

    fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Clone for Secret {
    fn clone(&self) -> Self {
        Secret(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_verifier_is_idempotent() {
        let group = GroupParams::default();
        let v1 = derive_verifier(&group, b"root", b"salt", b"1234").unwrap();
        let v2 = derive_verifier(&group, b"root", b"salt", b"1234").unwrap();
        assert_eq!(v1, v2);
    }

    #[test]
    fn derive_verifier_is_sensitive_to_password() {
        let group = GroupParams::default();
        let v1 = derive_verifier(&group, b"root", b"salt", b"1234").unwrap();
        let v2 = derive_verifier(&group, b"root", b"salt", b"wrong").unwrap();
        assert_ne!(v1, v2);
    }
}
