//! RSA key management, PKCS#1 v1.5 encryption and SHA-1 signing.
//!
//! Key pairs are generated over `num-bigint` arithmetic and carried in
//! standard portable form: base64 text over DER `SubjectPublicKeyInfo`
//! (public) and PKCS#8 `PrivateKeyInfo` (private), interoperable with any
//! tooling that reads those structures.
//!
//! Every operation is a pure function over its inputs. Keys are immutable
//! once built and safe to share across threads; each call constructs and
//! discards its own digest and padding state.
//!
//! ```no_run
//! use rsakit::{generate_default_keypair, decode_public_key};
//!
//! let keypair = generate_default_keypair()?;
//! let encoded = keypair.to_encoded();
//!
//! let public = decode_public_key(&encoded.public_key)?;
//! let ciphertext = public.encrypt(b"hello")?;
//! let plaintext = keypair.private_key.decrypt(&ciphertext)?;
//! assert_eq!(plaintext, b"hello");
//! # Ok::<(), rsakit::Error>(())
//! ```
//!
//! SHA-1 and PKCS#1 v1.5 are retained for compatibility with the system
//! this crate replaces; neither is a recommendation for new designs.

pub mod error;
pub mod rsa;

pub use error::{Error, Result};
pub use rsa::{
    decode_private_key, decode_public_key, decrypt_bytes, encode_private_key, encode_public_key,
    encrypt_bytes, generate_default_keypair, generate_keypair, sign, verify, EncodedKeyPair,
    RsaKeyPair, RsaPrivateKey, RsaPublicKey,
};
