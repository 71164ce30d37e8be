use sampling::source::Source;

use crate::{Ciphertext, DecryptionKey, Error, Result, SecretKey};

/// Largest width of an encoded integer.
pub const MAX_WIDTH: usize = 64;

/// Returns the number of bits needed to write `value`, zero for zero.
pub fn bit_length(value: u64) -> usize {
    (u64::BITS - value.leading_zeros()) as usize
}

fn check_value(value: u64, width: usize) -> Result<()> {
    if width == 0 || width > MAX_WIDTH {
        return Err(Error::InvalidWidth(width));
    }
    if bit_length(value) > width {
        return Err(Error::ValueOverflow { value, width });
    }
    Ok(())
}

/// Encrypts the `width` low bits of `value`, least significant first.
pub fn binary_encrypt(
    sk: &SecretKey,
    value: u64,
    width: usize,
    precision: usize,
    source_xa: &mut Source,
    source_xe: &mut Source,
) -> Result<Vec<Ciphertext>> {
    check_value(value, width)?;
    (0..width)
        .map(|i| Ciphertext::encrypt_sk(sk, (value >> i) & 1 == 1, precision, source_xa, source_xe))
        .collect()
}

/// Encodes a public `value` over `width` bits, least significant first,
/// with clones of `zero` and `one` as bits.
pub fn binary_encode(value: u64, width: usize, zero: &Ciphertext, one: &Ciphertext) -> Result<Vec<Ciphertext>> {
    check_value(value, width)?;
    Ok((0..width)
        .map(|i| if (value >> i) & 1 == 1 { one.clone() } else { zero.clone() })
        .collect())
}

/// Decrypts a least-significant-first sequence of encrypted bits.
pub fn binary_decrypt<K: DecryptionKey>(key: &K, bits: &[Ciphertext]) -> Result<u64> {
    if bits.len() > MAX_WIDTH {
        return Err(Error::InvalidWidth(bits.len()));
    }
    bits.iter()
        .enumerate()
        .try_fold(0u64, |acc, (i, ct)| -> Result<u64> { Ok(acc | ((key.decrypt(ct)? as u64) << i)) })
}
