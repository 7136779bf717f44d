// Error taxonomy for RSA operations
// Distinguishes bad input (format/size, caller's fault) from operational
// failure (generation/decryption)

use thiserror::Error;

/// Errors surfaced by key generation, key decoding and the cipher engine.
///
/// Signature verification mismatches are NOT represented here; `verify`
/// returns `false` for any mismatch or malformed signature.
#[derive(Debug, Error)]
pub enum Error {
    /// Key pair creation failed: invalid parameters or an arithmetic
    /// failure while deriving the private exponent.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// An encoded key string could not be parsed: bad base64, malformed
    /// DER, or a blob of the wrong key kind.
    #[error("invalid key encoding: {0}")]
    KeyFormat(String),

    /// Plaintext exceeds the PKCS#1 v1.5 capacity for the key size.
    /// Raised before any modular arithmetic runs.
    #[error("plaintext too large: at most {max} bytes for this key, got {actual}")]
    PlaintextTooLarge { max: usize, actual: usize },

    /// Decryption failed. Deliberately carries no detail: the caller must
    /// not be able to tell a length mismatch from an invalid padding byte.
    #[error("decryption failed")]
    Decryption,
}

pub type Result<T> = std::result::Result<T, Error>;
