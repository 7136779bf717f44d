// RSA Module - Main module file
// Exports key generation, encoding, encryption/decryption and signatures

pub mod bigint;
pub mod der;
pub mod decrypt;
pub mod encoding;
pub mod encrypt;
pub mod keygen;
pub mod padding;
pub mod sign;

pub use decrypt::decrypt_bytes;
pub use encoding::{decode_private_key, decode_public_key, encode_private_key, encode_public_key, EncodedKeyPair};
pub use encrypt::encrypt_bytes;
pub use keygen::{
    generate_default_keypair, generate_keypair, RsaKeyPair, RsaPrivateKey, RsaPublicKey,
    DEFAULT_KEY_BITS, DEFAULT_PUBLIC_EXPONENT, PRIME_CERTAINTY_ROUNDS,
};
pub use sign::{sign, verify};
