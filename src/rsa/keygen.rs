// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use log::debug;

use super::bigint::{from_u64, gcd, mod_inverse, mod_pow, random_prime, RsaBigInt};
use crate::error::{Error, Result};

/// Default modulus size in bits
pub const DEFAULT_KEY_BITS: u32 = 2048;

/// Default public exponent. The system this crate replaces shipped with
/// e = 3; 65537 is the safer convention and 3 stays available through
/// [`generate_keypair`] for output-compatible key material.
pub const DEFAULT_PUBLIC_EXPONENT: u64 = 65537;

/// Miller-Rabin rounds per prime candidate, for a composite probability
/// of at most 4^-25
pub const PRIME_CERTAINTY_ROUNDS: u32 = 25;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: RsaBigInt, // Modulus
    pub e: RsaBigInt, // Public exponent
}

/// RSA Private Key
///
/// Carries the CRT parameters precomputed at generation time; decryption
/// and signing exponentiate mod p and mod q instead of mod n.
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub n: RsaBigInt,     // Modulus (same as public)
    pub e: RsaBigInt,     // Public exponent (kept for re-encoding)
    pub d: RsaBigInt,     // Private exponent
    pub p: RsaBigInt,     // First prime factor, p > q
    pub q: RsaBigInt,     // Second prime factor
    pub d_p: RsaBigInt,   // d mod (p-1)
    pub d_q: RsaBigInt,   // d mod (q-1)
    pub q_inv: RsaBigInt, // q^(-1) mod p
}

// Keep prime factors and exponents out of debug output
impl std::fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("bits", &self.n.bits())
            .finish_non_exhaustive()
    }
}

/// RSA Key Pair (both public and private keys)
///
/// Immutable once generated; the two halves share the same modulus.
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
}

impl RsaPublicKey {
    /// Bit length of the modulus
    pub fn bit_length(&self) -> u32 {
        self.n.bits() as u32
    }

    /// Modulus size in whole bytes; ciphertexts and signatures are
    /// exactly this long
    pub fn size_bytes(&self) -> usize {
        ((self.n.bits() as usize) + 7) / 8
    }

    /// Largest plaintext PKCS#1 v1.5 block padding can carry
    pub fn max_plaintext_len(&self) -> usize {
        self.size_bytes().saturating_sub(11)
    }

    /// Encrypt a message using this public key
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        super::encrypt::encrypt_bytes(plaintext, self)
    }

    /// Verify a SHA-1 RSA signature over `content`
    pub fn verify(&self, content: &[u8], signature: &[u8]) -> bool {
        super::sign::verify(content, signature, self)
    }

    /// Parse a base64 SubjectPublicKeyInfo string
    pub fn from_encoded(text: &str) -> Result<Self> {
        super::encoding::decode_public_key(text)
    }

    /// Encode as base64 over DER SubjectPublicKeyInfo
    pub fn to_encoded(&self) -> String {
        super::encoding::encode_public_key(self)
    }
}

impl RsaPrivateKey {
    /// Bit length of the modulus
    pub fn bit_length(&self) -> u32 {
        self.n.bits() as u32
    }

    /// Modulus size in whole bytes
    pub fn size_bytes(&self) -> usize {
        ((self.n.bits() as usize) + 7) / 8
    }

    /// Decrypt a ciphertext using this private key
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        super::decrypt::decrypt_bytes(ciphertext, self)
    }

    /// Produce a SHA-1 RSA signature over `content`
    pub fn sign(&self, content: &[u8]) -> Result<Vec<u8>> {
        super::sign::sign(content, self)
    }

    /// Parse a base64 PKCS#8 PrivateKeyInfo string
    pub fn from_encoded(text: &str) -> Result<Self> {
        super::encoding::decode_private_key(text)
    }

    /// Encode as base64 over DER PKCS#8 PrivateKeyInfo
    pub fn to_encoded(&self) -> String {
        super::encoding::encode_private_key(self)
    }

    /// Private-key exponentiation of `m` via the Chinese Remainder
    /// Theorem. `m` must be in [0, n).
    pub(crate) fn crt_pow(&self, m: &RsaBigInt) -> RsaBigInt {
        // m1 = m^d_p mod p, m2 = m^d_q mod q
        let m1 = mod_pow(m, &self.d_p, &self.p);
        let m2 = mod_pow(m, &self.d_q, &self.q);

        // h = (m1 - m2) * q_inv mod p, lifting m2 into p's residue ring
        let diff = if m1 >= m2 {
            &m1 - &m2
        } else {
            &m1 + &self.p - &m2
        };
        let h = (diff * &self.q_inv) % &self.p;

        // result = m2 + q * h
        m2 + &self.q * h
    }
}

impl RsaKeyPair {
    /// Bit length of the key
    pub fn bit_length(&self) -> u32 {
        self.public_key.bit_length()
    }

    /// Render both halves in their portable base64 text form
    pub fn to_encoded(&self) -> super::encoding::EncodedKeyPair {
        super::encoding::EncodedKeyPair {
            public_key: self.public_key.to_encoded(),
            private_key: self.private_key.to_encoded(),
        }
    }
}

/// Generate RSA key pair with specified bit length
/// bit_length: Size of the modulus in bits (2048, 3072, 4096, ...)
/// e: Public exponent (common values: 3, 17, 65537)
///
/// Every generated prime passes [`PRIME_CERTAINTY_ROUNDS`] Miller-Rabin
/// rounds and is selected so that e is invertible mod (p-1)(q-1).
pub fn generate_keypair(bit_length: u32, e: u64) -> Result<RsaKeyPair> {
    if bit_length < 512 {
        return Err(Error::KeyGeneration(
            "bit length must be at least 512".to_string(),
        ));
    }
    if bit_length % 2 != 0 {
        return Err(Error::KeyGeneration(
            "bit length must be even (p and q get equal halves)".to_string(),
        ));
    }
    if e < 3 || e % 2 == 0 {
        return Err(Error::KeyGeneration(format!(
            "public exponent must be an odd number >= 3, got {}",
            e
        )));
    }

    let e = from_u64(e);
    let half_bits = bit_length / 2;
    let one = from_u64(1);

    // Each prime must keep e invertible mod (p-1); retry until it does
    let next_prime = |other: Option<&RsaBigInt>| -> RsaBigInt {
        loop {
            let candidate = random_prime(half_bits, PRIME_CERTAINTY_ROUNDS);
            if gcd(&e, &(&candidate - 1u8)) != one {
                continue;
            }
            if other == Some(&candidate) {
                continue;
            }
            return candidate;
        }
    };

    let p = next_prime(None);
    let q = next_prime(Some(&p));

    // p > q, required by the q_inv convention
    let (p, q) = if p < q { (q, p) } else { (p, q) };

    let n = &p * &q;
    let phi_n = (&p - 1u8) * (&q - 1u8);

    // d = e^(-1) mod φ(n); the prime selection above guarantees this exists
    let d = mod_inverse(&e, &phi_n)
        .ok_or_else(|| Error::KeyGeneration("public exponent not invertible mod φ(n)".to_string()))?;

    let d_p = &d % (&p - 1u8);
    let d_q = &d % (&q - 1u8);
    let q_inv = mod_inverse(&q, &p)
        .ok_or_else(|| Error::KeyGeneration("failed to compute q^(-1) mod p".to_string()))?;

    debug!("generated {}-bit RSA modulus", n.bits());

    let public_key = RsaPublicKey { n: n.clone(), e: e.clone() };
    let private_key = RsaPrivateKey {
        n,
        e,
        d,
        p,
        q,
        d_p,
        d_q,
        q_inv,
    };

    Ok(RsaKeyPair {
        public_key,
        private_key,
    })
}

/// Generate RSA key pair with default settings (2048 bits, e=65537)
pub fn generate_default_keypair() -> Result<RsaKeyPair> {
    generate_keypair(DEFAULT_KEY_BITS, DEFAULT_PUBLIC_EXPONENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_generation() {
        let keypair = generate_keypair(512, 65537).unwrap();
        assert_eq!(keypair.bit_length(), 512);
        assert_eq!(keypair.public_key.size_bytes(), 64);
        assert!(keypair.private_key.d > from_u64(0));
    }

    #[test]
    fn test_key_generation_rejects_bad_params() {
        assert!(matches!(
            generate_keypair(256, 65537),
            Err(Error::KeyGeneration(_))
        ));
        assert!(matches!(
            generate_keypair(513, 65537),
            Err(Error::KeyGeneration(_))
        ));
        assert!(matches!(
            generate_keypair(512, 4),
            Err(Error::KeyGeneration(_))
        ));
    }

    #[test]
    fn test_key_properties() {
        let keypair = generate_keypair(512, 17).unwrap();

        // n = p * q
        assert_eq!(
            keypair.private_key.n,
            &keypair.private_key.p * &keypair.private_key.q
        );
        assert!(keypair.private_key.p > keypair.private_key.q);

        // e * d ≡ 1 (mod φ(n))
        let phi_n = (&keypair.private_key.p - 1u8) * (&keypair.private_key.q - 1u8);
        let product = &keypair.public_key.e * &keypair.private_key.d;
        assert_eq!(product % &phi_n, from_u64(1));
    }

    #[test]
    fn test_legacy_exponent_three() {
        // e = 3 is what the system being replaced used
        let keypair = generate_keypair(512, 3).unwrap();
        assert_eq!(keypair.public_key.e, from_u64(3));

        let phi_n = (&keypair.private_key.p - 1u8) * (&keypair.private_key.q - 1u8);
        let product = &keypair.public_key.e * &keypair.private_key.d;
        assert_eq!(product % &phi_n, from_u64(1));
    }

    #[test]
    fn test_keypairs_are_distinct() {
        let a = generate_keypair(512, 65537).unwrap();
        let b = generate_keypair(512, 65537).unwrap();
        assert_ne!(a.public_key.n, b.public_key.n);
    }

    #[test]
    fn test_crt_pow_matches_plain_exponentiation() {
        let keypair = generate_keypair(512, 65537).unwrap();
        let priv_key = &keypair.private_key;
        let m = from_u64(0x1234_5678_9abc_def0);

        let plain = super::super::bigint::mod_pow(&m, &priv_key.d, &priv_key.n);
        assert_eq!(priv_key.crt_pow(&m), plain);
    }

    #[test]
    fn test_private_key_debug_hides_material() {
        let keypair = generate_keypair(512, 65537).unwrap();
        let rendered = format!("{:?}", keypair.private_key);
        assert!(!rendered.contains(&keypair.private_key.d.to_string()));
    }
}
