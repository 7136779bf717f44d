// PKCS#1 v1.5 Padding
// Block padding for encryption and EMSA-PKCS1-v1_5 encoding for signatures

use rand::{thread_rng, Rng};

use crate::error::{Error, Result};

/// Fixed overhead of an encryption block: 0x00 0x02, at least eight
/// padding bytes, and the 0x00 separator
pub const ENCRYPTION_OVERHEAD: usize = 11;

const MIN_PAD_LEN: usize = 8;

// DER DigestInfo header for SHA-1:
// SEQUENCE { SEQUENCE { OID 1.3.14.3.2.26, NULL }, OCTET STRING (20 bytes) }
pub(crate) const SHA1_DIGEST_INFO: [u8; 15] = [
    0x30, 0x21, 0x30, 0x09, 0x06, 0x05, 0x2b, 0x0e, 0x03, 0x02, 0x1a, 0x05, 0x00, 0x04, 0x14,
];

/// PKCS#1 v1.5 padding for encryption
/// Produces `key_size` bytes: 0x00 || 0x02 || PS || 0x00 || data, where PS
/// is at least eight random non-zero bytes
pub fn pad_pkcs1_v15(data: &[u8], key_size: usize) -> Result<Vec<u8>> {
    if key_size < ENCRYPTION_OVERHEAD || data.len() > key_size - ENCRYPTION_OVERHEAD {
        return Err(Error::PlaintextTooLarge {
            max: key_size.saturating_sub(ENCRYPTION_OVERHEAD),
            actual: data.len(),
        });
    }

    let ps_len = key_size - data.len() - 3;

    let mut rng = thread_rng();
    let mut block = Vec::with_capacity(key_size);
    block.push(0x00);
    block.push(0x02);
    for _ in 0..ps_len {
        block.push(rng.gen_range(1..=u8::MAX));
    }
    block.push(0x00);
    block.extend_from_slice(data);

    Ok(block)
}

/// Remove PKCS#1 v1.5 encryption padding from a full-length block.
///
/// Returns None for any structural defect; the caller maps that to a
/// single generic decryption error so the reason never leaks.
pub fn unpad_pkcs1_v15(block: &[u8]) -> Option<Vec<u8>> {
    if block.len() < ENCRYPTION_OVERHEAD {
        return None;
    }
    if block[0] != 0x00 || block[1] != 0x02 {
        return None;
    }

    let separator = block[2..].iter().position(|&b| b == 0x00)? + 2;
    if separator < 2 + MIN_PAD_LEN {
        return None;
    }

    Some(block[separator + 1..].to_vec())
}

/// EMSA-PKCS1-v1_5 encoding of a SHA-1 digest
/// Produces `key_size` bytes: 0x00 || 0x01 || 0xFF.. || 0x00 || DigestInfo
pub fn emsa_pkcs1_v15_sha1(digest: &[u8; 20], key_size: usize) -> Result<Vec<u8>> {
    let t_len = SHA1_DIGEST_INFO.len() + digest.len();
    if key_size < t_len + ENCRYPTION_OVERHEAD {
        return Err(Error::KeyFormat(format!(
            "modulus too small for a SHA-1 signature: {} bytes",
            key_size
        )));
    }

    let ps_len = key_size - t_len - 3;
    let mut block = Vec::with_capacity(key_size);
    block.push(0x00);
    block.push(0x01);
    block.extend(std::iter::repeat(0xFF).take(ps_len));
    block.push(0x00);
    block.extend_from_slice(&SHA1_DIGEST_INFO);
    block.extend_from_slice(digest);

    Ok(block)
}
