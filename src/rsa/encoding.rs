// Key Encoding
// SubjectPublicKeyInfo / PKCS#8 PrivateKeyInfo in DER, carried as base64
// text. Any standard RSA tooling that reads these structures can consume
// the output.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use num_bigint::BigUint;
use num_traits::Zero;

use super::der::{self, Reader, TAG_BIT_STRING, TAG_OCTET_STRING, TAG_OID, TAG_SEQUENCE};
use super::keygen::{RsaPrivateKey, RsaPublicKey};
use crate::error::{Error, Result};

// rsaEncryption, OID 1.2.840.113549.1.1.1
const OID_RSA_ENCRYPTION: [u8; 9] = [0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01];

/// A key pair in its portable text form: base64 over DER
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedKeyPair {
    pub public_key: String,
    pub private_key: String,
}

// AlgorithmIdentifier: SEQUENCE { OID rsaEncryption, NULL }
fn algorithm_identifier() -> Vec<u8> {
    let mut content = der::encode_tlv(TAG_OID, &OID_RSA_ENCRYPTION);
    content.extend_from_slice(&der::encode_null());
    der::encode_tlv(TAG_SEQUENCE, &content)
}

fn read_algorithm_identifier(reader: &mut Reader<'_>) -> Result<()> {
    let mut alg = Reader::new(reader.read(TAG_SEQUENCE)?);
    let oid = alg.read(TAG_OID)?;
    if oid != OID_RSA_ENCRYPTION {
        return Err(Error::KeyFormat("key algorithm is not rsaEncryption".to_string()));
    }
    alg.read_null()?;
    alg.finish()
}

/// Encode a public key as base64 over DER SubjectPublicKeyInfo
pub fn encode_public_key(key: &RsaPublicKey) -> String {
    // RSAPublicKey ::= SEQUENCE { modulus, publicExponent }
    let mut rsa_key = der::encode_uint(&key.n);
    rsa_key.extend_from_slice(&der::encode_uint(&key.e));
    let rsa_key = der::encode_tlv(TAG_SEQUENCE, &rsa_key);

    // BIT STRING with zero unused bits wrapping the RSAPublicKey
    let mut bit_string = Vec::with_capacity(rsa_key.len() + 1);
    bit_string.push(0x00);
    bit_string.extend_from_slice(&rsa_key);

    let mut spki = algorithm_identifier();
    spki.extend_from_slice(&der::encode_tlv(TAG_BIT_STRING, &bit_string));
    BASE64.encode(der::encode_tlv(TAG_SEQUENCE, &spki))
}

/// Encode a private key as base64 over DER PKCS#8 PrivateKeyInfo
pub fn encode_private_key(key: &RsaPrivateKey) -> String {
    // RSAPrivateKey ::= SEQUENCE { version = 0, n, e, d, p, q, dP, dQ, qInv }
    let mut rsa_key = der::encode_uint(&BigUint::zero());
    for field in [
        &key.n, &key.e, &key.d, &key.p, &key.q, &key.d_p, &key.d_q, &key.q_inv,
    ] {
        rsa_key.extend_from_slice(&der::encode_uint(field));
    }
    let rsa_key = der::encode_tlv(TAG_SEQUENCE, &rsa_key);

    // PrivateKeyInfo ::= SEQUENCE { version = 0, algorithm, privateKey }
    let mut info = der::encode_uint(&BigUint::zero());
    info.extend_from_slice(&algorithm_identifier());
    info.extend_from_slice(&der::encode_tlv(TAG_OCTET_STRING, &rsa_key));
    BASE64.encode(der::encode_tlv(TAG_SEQUENCE, &info))
}

// Whitespace and line breaks in the text form are insignificant
fn decode_base64(text: &str) -> Result<Vec<u8>> {
    let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped.is_empty() {
        return Err(Error::KeyFormat("empty key string".to_string()));
    }
    BASE64
        .decode(stripped)
        .map_err(|e| Error::KeyFormat(format!("invalid base64: {}", e)))
}

/// Decode a base64 SubjectPublicKeyInfo string into a public key.
///
/// Rejects bad base64, malformed DER, private-key blobs and non-RSA
/// algorithms with [`Error::KeyFormat`].
pub fn decode_public_key(text: &str) -> Result<RsaPublicKey> {
    let bytes = decode_base64(text)?;

    let mut outer = Reader::new(&bytes);
    let mut spki = Reader::new(outer.read(TAG_SEQUENCE)?);
    outer.finish()?;

    read_algorithm_identifier(&mut spki)?;

    let bit_string = spki.read(TAG_BIT_STRING)?;
    spki.finish()?;
    match bit_string.first() {
        Some(&0x00) => {}
        _ => return Err(Error::KeyFormat("malformed public key BIT STRING".to_string())),
    }

    let mut key = Reader::new(&bit_string[1..]);
    let mut rsa_key = Reader::new(key.read(TAG_SEQUENCE)?);
    key.finish()?;

    let n = rsa_key.read_uint()?;
    let e = rsa_key.read_uint()?;
    rsa_key.finish()?;

    if n.is_zero() || e < BigUint::from(3u8) {
        return Err(Error::KeyFormat("implausible RSA parameters".to_string()));
    }
    Ok(RsaPublicKey { n, e })
}

/// Decode a base64 PKCS#8 PrivateKeyInfo string into a private key.
///
/// The CRT parameters are taken from the encoding; the factorization is
/// cross-checked against the modulus so a corrupted blob cannot yield a
/// quietly wrong key.
pub fn decode_private_key(text: &str) -> Result<RsaPrivateKey> {
    let bytes = decode_base64(text)?;

    let mut outer = Reader::new(&bytes);
    let mut info = Reader::new(outer.read(TAG_SEQUENCE)?);
    outer.finish()?;

    info.read_uint_expect(0)?;
    read_algorithm_identifier(&mut info)?;
    let private_key_octets = info.read(TAG_OCTET_STRING)?;
    info.finish()?;

    let mut inner = Reader::new(private_key_octets);
    let mut rsa_key = Reader::new(inner.read(TAG_SEQUENCE)?);
    inner.finish()?;

    rsa_key.read_uint_expect(0)?;
    let n = rsa_key.read_uint()?;
    let e = rsa_key.read_uint()?;
    let d = rsa_key.read_uint()?;
    let p = rsa_key.read_uint()?;
    let q = rsa_key.read_uint()?;
    let d_p = rsa_key.read_uint()?;
    let d_q = rsa_key.read_uint()?;
    let q_inv = rsa_key.read_uint()?;
    rsa_key.finish()?;

    if &p * &q != n {
        return Err(Error::KeyFormat("inconsistent private key: p*q != n".to_string()));
    }

    Ok(RsaPrivateKey {
        n,
        e,
        d,
        p,
        q,
        d_p,
        d_q,
        q_inv,
    })
}
