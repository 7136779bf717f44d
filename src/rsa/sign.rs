// RSA Signatures
// SHA-1 digest, EMSA-PKCS1-v1_5 encoding, private-key exponentiation

use sha1::{Digest, Sha1};

use super::bigint::{from_bytes, mod_pow};
use super::encrypt::left_pad;
use super::keygen::{RsaPrivateKey, RsaPublicKey};
use super::padding::emsa_pkcs1_v15_sha1;
use crate::error::Result;

fn sha1_digest(content: &[u8]) -> [u8; 20] {
    // A fresh context per call; nothing carries over between signatures
    let mut hasher = Sha1::new();
    hasher.update(content);
    hasher.finalize().into()
}

/// Sign `content` with an RSA private key.
///
/// The content is hashed with SHA-1, wrapped in the PKCS#1 v1.5
/// DigestInfo envelope and exponentiated with the private key. The
/// signature is always exactly `key.size_bytes()` long.
pub fn sign(content: &[u8], private_key: &RsaPrivateKey) -> Result<Vec<u8>> {
    let key_size = private_key.size_bytes();

    let digest = sha1_digest(content);
    let em = emsa_pkcs1_v15_sha1(&digest, key_size)?;

    // s = em^d mod n
    let m = from_bytes(&em);
    let s = private_key.crt_pow(&m);

    Ok(left_pad(&s.to_bytes_be(), key_size))
}

/// Verify a SHA-1 RSA signature over `content`.
///
/// Recomputes the digest, applies the public exponent to the signature
/// and compares against the expected encoded message byte for byte.
/// Any mismatch -- including a structurally invalid signature -- is a
/// `false` return, never an error.
pub fn verify(content: &[u8], signature: &[u8], public_key: &RsaPublicKey) -> bool {
    let key_size = public_key.size_bytes();
    if signature.len() != key_size {
        return false;
    }

    let s = from_bytes(signature);
    if s >= public_key.n {
        return false;
    }

    let em = left_pad(
        &mod_pow(&s, &public_key.e, &public_key.n).to_bytes_be(),
        key_size,
    );

    let digest = sha1_digest(content);
    match emsa_pkcs1_v15_sha1(&digest, key_size) {
        Ok(expected) => em == expected,
        Err(_) => false,
    }
}
