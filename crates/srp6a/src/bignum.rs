//! Fixed-width big-endian big integer helpers.
//!
//! The teacher's own `BigNumber` wrapper stores values in little-endian
//! order to match a WoW-specific wire format and lets callers ask for an
//! unpadded byte array. SRP-6a interop depends on the opposite convention:
//! every integer that enters a hash (N, g, A, B, S, ...) must be encoded as
//! an unsigned big-endian byte string padded to the modulus's byte length
//! (`PAD` in the design). Skipping that padding is a classic SRP bug that
//! produces sessions that interoperate with nothing but themselves — see
//! the open question on PAD in the design notes.
//!
//! This module keeps the teacher's "thin wrapper over a BigUint" shape but
//! switches the byte convention and bakes PAD into the conversions so
//! callers can't accidentally skip it.

use num_bigint::BigUint;
use num_traits::Zero;

/// Big-endian byte length a group's modulus determines (`ceil(bits(N) / 8)`).
pub fn byte_len(modulus: &BigUint) -> usize {
    modulus.bits().div_ceil(8) as usize
}

/// Encode `value` as an unsigned big-endian byte string, left-padded with
/// zero bytes to exactly `width` bytes. Panics if `value` does not fit,
/// since every caller in this crate derives `width` from the modulus that
/// bounds `value` and a value that doesn't fit indicates a logic error
/// upstream, not a runtime condition to recover from.
pub fn pad(value: &BigUint, width: usize) -> Vec<u8> {
    let be = value.to_bytes_be();
    assert!(be.len() <= width, "value does not fit in {width} bytes");
    let mut out = vec![0u8; width - be.len()];
    out.extend_from_slice(&be);
    out
}

/// Decode an unsigned big-endian byte string into a `BigUint`.
pub fn unpad(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// `true` if `value mod modulus == 0`, the "invalid public value" check
/// invariant 1 requires for both A and B on receipt.
pub fn is_zero_mod(value: &BigUint, modulus: &BigUint) -> bool {
    (value % modulus).is_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_left_pads_to_width() {
        let v = BigUint::from(0x01020304u32);
        let padded = pad(&v, 8);
        assert_eq!(padded, vec![0, 0, 0, 0, 0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn pad_roundtrips_through_unpad() {
        let v = BigUint::from(123456789u64);
        let padded = pad(&v, 32);
        assert_eq!(unpad(&padded), v);
    }

    #[test]
    fn zero_mod_detects_multiples() {
        let modulus = BigUint::from(97u32);
        let value = &modulus * BigUint::from(4u32);
        assert!(is_zero_mod(&value, &modulus));
        assert!(!is_zero_mod(&BigUint::from(5u32), &modulus));
    }
}
