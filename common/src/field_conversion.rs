//! Conversions between arkworks field elements, 32-byte big-endian words and the decimal
//! strings EVM tooling expects.

use alloy_primitives::U256;
use ark_ff::{BigInteger, PrimeField};

use crate::constants::FIELD_ELEMENT_BYTES;

/// Big-endian bytes of the canonical representative, left-padded to 32 bytes.
pub fn ark_to_be_bytes<F: PrimeField>(f: &F) -> [u8; FIELD_ELEMENT_BYTES] {
    let bytes = f.into_bigint().to_bytes_be();
    let mut out = [0u8; FIELD_ELEMENT_BYTES];
    out[FIELD_ELEMENT_BYTES - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Inverse of [`ark_to_be_bytes`]. `None` unless `bytes` is strictly below the modulus.
pub fn be_bytes_to_ark<F: PrimeField>(bytes: &[u8; FIELD_ELEMENT_BYTES]) -> Option<F> {
    let f = F::from_be_bytes_mod_order(bytes);
    (ark_to_be_bytes(&f) == *bytes).then_some(f)
}

pub fn be_bytes_to_decimal(bytes: &[u8; FIELD_ELEMENT_BYTES]) -> String {
    U256::from_be_slice(bytes).to_string()
}

/// Parses a base-10 string of ASCII digits into a 32-byte big-endian word.
pub fn decimal_to_be_bytes(s: &str) -> Option<[u8; FIELD_ELEMENT_BYTES]> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(s, 10)
        .ok()
        .map(|word| word.to_be_bytes::<FIELD_ELEMENT_BYTES>())
}

pub fn ark_to_decimal<F: PrimeField>(f: &F) -> String {
    be_bytes_to_decimal(&ark_to_be_bytes(f))
}

/// `None` for malformed input and for values not below the modulus.
pub fn decimal_to_ark<F: PrimeField>(s: &str) -> Option<F> {
    decimal_to_be_bytes(s).and_then(|bytes| be_bytes_to_ark(&bytes))
}
