// RSA Decryption
// Private-key decryption via the Chinese Remainder Theorem

use super::bigint::from_bytes;
use super::encrypt::left_pad;
use super::keygen::RsaPrivateKey;
use super::padding::unpad_pkcs1_v15;
use crate::error::{Error, Result};

/// Decrypt a ciphertext using an RSA private key.
///
/// Every failure mode -- wrong ciphertext length, value out of range,
/// invalid padding after exponentiation, ciphertext from an unrelated
/// key -- surfaces as the same generic [`Error::Decryption`].
pub fn decrypt_bytes(ciphertext: &[u8], private_key: &RsaPrivateKey) -> Result<Vec<u8>> {
    let key_size = private_key.size_bytes();
    if ciphertext.len() != key_size {
        return Err(Error::Decryption);
    }

    let c = from_bytes(ciphertext);
    if c >= private_key.n {
        return Err(Error::Decryption);
    }

    // m = c^d mod n, computed mod p and mod q
    let m = private_key.crt_pow(&c);

    // Restore the leading zero bytes the integer conversion dropped
    let block = left_pad(&m.to_bytes_be(), key_size);

    unpad_pkcs1_v15(&block).ok_or(Error::Decryption)
}
