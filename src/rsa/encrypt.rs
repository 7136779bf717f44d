// RSA Encryption
// Public-key encryption with PKCS#1 v1.5 padding

use super::bigint::{from_bytes, mod_pow};
use super::keygen::RsaPublicKey;
use super::padding::pad_pkcs1_v15;
use crate::error::Result;

/// Encrypt bytes using an RSA public key.
///
/// The plaintext is bounded by `key.max_plaintext_len()`; the size check
/// runs before any modular arithmetic. The ciphertext is always exactly
/// `key.size_bytes()` long.
pub fn encrypt_bytes(plaintext: &[u8], public_key: &RsaPublicKey) -> Result<Vec<u8>> {
    let key_size = public_key.size_bytes();

    // Fail fast on oversized input, then pad to the full block
    let block = pad_pkcs1_v15(plaintext, key_size)?;

    // c = m^e mod n
    let m = from_bytes(&block);
    let c = mod_pow(&m, &public_key.e, &public_key.n);

    Ok(left_pad(&c.to_bytes_be(), key_size))
}

/// Left-pad a big-endian value with zeros to a fixed width
pub(crate) fn left_pad(bytes: &[u8], width: usize) -> Vec<u8> {
    let mut out = vec![0u8; width];
    let start = width.saturating_sub(bytes.len());
    out[start..].copy_from_slice(&bytes[bytes.len().saturating_sub(width)..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::rsa::keygen::generate_keypair;

    #[test]
    fn test_encrypt_bytes() {
        let keypair = generate_keypair(512, 65537).unwrap();
        let message = b"Hello, RSA!";

        let ciphertext = encrypt_bytes(message, &keypair.public_key).unwrap();
        assert_eq!(ciphertext.len(), 64); // 512 bits = 64 bytes
        assert_ne!(&ciphertext[..message.len()], message);
    }

    #[test]
    fn test_encrypt_is_randomized() {
        // Fresh padding bytes per call, so identical plaintexts differ
        let keypair = generate_keypair(512, 65537).unwrap();
        let a = encrypt_bytes(b"same input", &keypair.public_key).unwrap();
        let b = encrypt_bytes(b"same input", &keypair.public_key).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_encrypt_size_boundary() {
        let keypair = generate_keypair(512, 65537).unwrap();
        let max = keypair.public_key.max_plaintext_len();
        assert_eq!(max, 53);

        assert!(encrypt_bytes(&vec![1u8; max], &keypair.public_key).is_ok());
        assert!(matches!(
            encrypt_bytes(&vec![1u8; max + 1], &keypair.public_key),
            Err(Error::PlaintextTooLarge { .. })
        ));
    }

    #[test]
    fn test_encrypt_empty() {
        let keypair = generate_keypair(512, 65537).unwrap();
        let ciphertext = encrypt_bytes(b"", &keypair.public_key).unwrap();
        assert_eq!(ciphertext.len(), 64);
    }

    #[test]
    fn test_left_pad() {
        assert_eq!(left_pad(&[1, 2], 4), vec![0, 0, 1, 2]);
        assert_eq!(left_pad(&[1, 2, 3, 4], 4), vec![1, 2, 3, 4]);
        assert_eq!(left_pad(&[], 2), vec![0, 0]);
    }
}
