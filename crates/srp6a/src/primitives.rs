//! Primitives (component B): hash, password KDF, CSPRNG, constant-time
//! compare. Each is pure apart from the CSPRNG, matching the design.
//!
//! The teacher wraps SHA-1/MD5 behind small `Sha1Hash`/`Md5Hash` structs
//! with an `update`/`finalize`/`get_digest` shape (`auth/crypto_hash.rs`).
//! This module keeps that incremental-update shape but swaps the concrete
//! hash for SHA-256 (`hash`), replaces the ad-hoc derived-key scheme with a
//! real password KDF (`kdf`, scrypt), and adds the two primitives the
//! teacher's WoW-specific SRP6 never needed because its threat model
//! didn't require them on the wire: a CSPRNG that can report failure, and
//! byte-wise constant-time comparison for the mutual proofs.

use rand_core::{OsRng, RngCore};
use subtle::ConstantTimeEq;

use crate::error::SrpError;

pub const DIGEST_LEN: usize = 32;

/// Incremental SHA-256, mirroring the teacher's `Sha1Hash` update/finalize
/// shape but over the `sha2` crate.
pub mod hash {
    use super::DIGEST_LEN;
    use sha2::{Digest, Sha256};

    pub fn new() -> Sha256 {
        Sha256::new()
    }

    /// Feed more bytes in. A free function rather than relying on callers
    /// to import the `Digest` trait themselves.
    pub fn update(hasher: &mut Sha256, data: &[u8]) {
        Digest::update(hasher, data);
    }

    pub fn finish(hasher: Sha256) -> [u8; DIGEST_LEN] {
        let out = hasher.finalize();
        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&out);
        digest
    }

    /// One-shot hash of a single byte slice.
    pub fn once(data: &[u8]) -> [u8; DIGEST_LEN] {
        let mut h = new();
        update(&mut h, data);
        finish(h)
    }
}

/// scrypt(N=16384, r=8, p=1, L=64) password KDF parameters fixed per the
/// design. Changing these invalidates every stored verifier, same as
/// changing the hash function.
pub struct KdfParams {
    log2_n: u8,
    r: u32,
    p: u32,
    output_len: usize,
}

impl KdfParams {
    pub const DEFAULT: KdfParams = KdfParams {
        log2_n: 14, // 2^14 = 16384
        r: 8,
        p: 1,
        output_len: 64,
    };
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Derive `x_bytes` from (salt, password). Per the open question in the
/// design, this deployment adopts the RFC-5054-flavored ordering — the
/// salt as the scrypt salt parameter, the password as the scrypt input —
/// rather than the source's `kdf(s ++ p)` concatenation, since there is no
/// pre-existing verifier store to stay bug-for-bug compatible with.
pub fn kdf(salt: &[u8], password: &[u8], params: &KdfParams) -> Result<Vec<u8>, SrpError> {
    let scrypt_params = scrypt::Params::new(params.log2_n, params.r, params.p, params.output_len)
        .map_err(|_| SrpError::InsufficientEntropy)?;
    let mut out = vec![0u8; params.output_len];
    scrypt::scrypt(password, salt, &scrypt_params, &mut out)
        .map_err(|_| SrpError::InsufficientEntropy)?;
    Ok(out)
}

/// Sample a uniformly random exponent in `[1, n)` with at least 256 bits of
/// entropy, redrawing on a zero draw. Fails with `InsufficientEntropy` if
/// the OS RNG reports failure, per the design's fault-injection contract —
/// the teacher's `BigNumber::set_rand` (`rand::thread_rng().gen_biguint`)
/// cannot fail this way, since `thread_rng` never surfaces RNG errors.
pub fn random_exponent(byte_len: usize) -> Result<num_bigint::BigUint, SrpError> {
    use num_bigint::BigUint;
    use num_traits::Zero;

    let draw_len = byte_len.max(32);
    loop {
        let mut buf = vec![0u8; draw_len];
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|_| SrpError::InsufficientEntropy)?;
        let candidate = BigUint::from_bytes_be(&buf);
        if !candidate.is_zero() {
            return Ok(candidate);
        }
    }
}

/// Byte-wise comparison that does not short-circuit on the first
/// differing byte, via `subtle`'s constant-time equality.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
