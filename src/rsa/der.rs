// Minimal ASN.1 DER reader/writer
// Covers the handful of types key encoding needs: SEQUENCE, INTEGER,
// BIT STRING, OCTET STRING, OBJECT IDENTIFIER and NULL

use num_bigint::BigUint;

use crate::error::{Error, Result};

pub const TAG_INTEGER: u8 = 0x02;
pub const TAG_BIT_STRING: u8 = 0x03;
pub const TAG_OCTET_STRING: u8 = 0x04;
pub const TAG_NULL: u8 = 0x05;
pub const TAG_OID: u8 = 0x06;
pub const TAG_SEQUENCE: u8 = 0x30;

/// Serialize one tag-length-value element
pub fn encode_tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() + 4);
    out.push(tag);
    encode_length(&mut out, content.len());
    out.extend_from_slice(content);
    out
}

// DER length octets: short form below 128, otherwise a length-of-length
// byte followed by big-endian length bytes without leading zeros
fn encode_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }

    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    out.push(0x80 | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
}

/// Serialize a non-negative INTEGER with minimal content octets; a
/// leading zero is inserted when the top bit would read as a sign
pub fn encode_uint(n: &BigUint) -> Vec<u8> {
    let bytes = n.to_bytes_be();
    let mut content = Vec::with_capacity(bytes.len() + 1);
    if bytes[0] & 0x80 != 0 {
        content.push(0x00);
    }
    content.extend_from_slice(&bytes);
    encode_tlv(TAG_INTEGER, &content)
}

/// Serialize NULL
pub fn encode_null() -> Vec<u8> {
    vec![TAG_NULL, 0x00]
}

/// Sequential reader over a DER byte slice
pub struct Reader<'a> {
    input: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Reader { input }
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Read the next element, requiring `expected_tag`; returns its
    /// content octets
    pub fn read(&mut self, expected_tag: u8) -> Result<&'a [u8]> {
        let (tag, content, rest) = split_tlv(self.input)?;
        if tag != expected_tag {
            return Err(Error::KeyFormat(format!(
                "expected DER tag 0x{:02x}, found 0x{:02x}",
                expected_tag, tag
            )));
        }
        self.input = rest;
        Ok(content)
    }

    /// Read a non-negative INTEGER
    pub fn read_uint(&mut self) -> Result<BigUint> {
        let content = self.read(TAG_INTEGER)?;
        if content.is_empty() {
            return Err(Error::KeyFormat("empty INTEGER".to_string()));
        }
        if content[0] & 0x80 != 0 {
            return Err(Error::KeyFormat("negative INTEGER in key material".to_string()));
        }
        // Minimal encoding: a zero pad byte is only valid as a sign octet
        if content.len() > 1 && content[0] == 0x00 && content[1] & 0x80 == 0 {
            return Err(Error::KeyFormat("non-minimal INTEGER encoding".to_string()));
        }
        Ok(BigUint::from_bytes_be(content))
    }

    /// Read an INTEGER and require a specific small value
    pub fn read_uint_expect(&mut self, expected: u64) -> Result<()> {
        let value = self.read_uint()?;
        if value != BigUint::from(expected) {
            return Err(Error::KeyFormat(format!(
                "unexpected version/INTEGER value, wanted {}",
                expected
            )));
        }
        Ok(())
    }

    /// Consume a NULL element
    pub fn read_null(&mut self) -> Result<()> {
        let content = self.read(TAG_NULL)?;
        if !content.is_empty() {
            return Err(Error::KeyFormat("NULL with content octets".to_string()));
        }
        Ok(())
    }

    /// Reject trailing bytes after the last expected element
    pub fn finish(&self) -> Result<()> {
        if !self.input.is_empty() {
            return Err(Error::KeyFormat(format!(
                "{} trailing bytes after DER structure",
                self.input.len()
            )));
        }
        Ok(())
    }
}

// Split one TLV off the front of `input`
fn split_tlv(input: &[u8]) -> Result<(u8, &[u8], &[u8])> {
    if input.len() < 2 {
        return Err(Error::KeyFormat("truncated DER element".to_string()));
    }
    let tag = input[0];
    let first = input[1];

    let (len, header) = if first < 0x80 {
        (first as usize, 2)
    } else {
        let len_bytes = (first & 0x7f) as usize;
        if len_bytes == 0 {
            return Err(Error::KeyFormat("indefinite length is not DER".to_string()));
        }
        if len_bytes > 4 || input.len() < 2 + len_bytes {
            return Err(Error::KeyFormat("unsupported DER length".to_string()));
        }
        let mut len = 0usize;
        for &b in &input[2..2 + len_bytes] {
            len = (len << 8) | b as usize;
        }
        if len < 0x80 || input[2] == 0 {
            return Err(Error::KeyFormat("non-minimal DER length".to_string()));
        }
        (len, 2 + len_bytes)
    };

    if input.len() < header + len {
        return Err(Error::KeyFormat("DER element longer than input".to_string()));
    }
    let content = &input[header..header + len];
    let rest = &input[header + len..];
    Ok((tag, content, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use num_traits::Zero;

    #[test]
    fn test_short_and_long_lengths() {
        let short = encode_tlv(TAG_OCTET_STRING, &[0xAB; 0x7F]);
        assert_eq!(&short[..2], &[TAG_OCTET_STRING, 0x7F]);

        let long = encode_tlv(TAG_OCTET_STRING, &[0xAB; 0x80]);
        assert_eq!(&long[..3], &[TAG_OCTET_STRING, 0x81, 0x80]);

        let longer = encode_tlv(TAG_OCTET_STRING, &[0xAB; 0x1234]);
        assert_eq!(&longer[..4], &[TAG_OCTET_STRING, 0x82, 0x12, 0x34]);
    }

    #[test]
    fn test_uint_sign_octet() {
        // 127 fits without a pad byte, 128 needs one
        assert_eq!(encode_uint(&BigUint::from(127u8)), vec![0x02, 0x01, 0x7F]);
        assert_eq!(encode_uint(&BigUint::from(128u8)), vec![0x02, 0x02, 0x00, 0x80]);
    }

    #[test]
    fn test_uint_roundtrip() {
        let value = BigUint::parse_bytes(b"123456789012345678901234567890", 10).unwrap();
        let encoded = encode_uint(&value);
        let mut reader = Reader::new(&encoded);
        assert_eq!(reader.read_uint().unwrap(), value);
        reader.finish().unwrap();
    }

    #[test]
    fn test_reader_rejects_wrong_tag() {
        let encoded = encode_uint(&BigUint::from(5u8));
        let mut reader = Reader::new(&encoded);
        assert!(reader.read(TAG_SEQUENCE).is_err());
    }

    #[test]
    fn test_reader_rejects_truncated_input() {
        let mut encoded = encode_tlv(TAG_OCTET_STRING, &[1, 2, 3, 4]);
        encoded.truncate(4);
        let mut reader = Reader::new(&encoded);
        assert!(reader.read(TAG_OCTET_STRING).is_err());
    }

    #[test]
    fn test_reader_rejects_trailing_bytes() {
        let mut encoded = encode_null();
        encoded.push(0xFF);
        let mut reader = Reader::new(&encoded);
        reader.read_null().unwrap();
        assert!(reader.finish().is_err());
    }

    #[test]
    fn test_reader_rejects_negative_integer() {
        let encoded = vec![0x02, 0x01, 0x80]; // INTEGER -128
        let mut reader = Reader::new(&encoded);
        assert!(reader.read_uint().is_err());
    }

    #[test]
    fn test_reader_rejects_non_minimal_integer() {
        let encoded = vec![0x02, 0x02, 0x00, 0x05]; // should be 02 01 05
        let mut reader = Reader::new(&encoded);
        assert!(reader.read_uint().is_err());
    }

    #[test]
    fn test_reader_rejects_indefinite_length() {
        let encoded = vec![TAG_SEQUENCE, 0x80, 0x00, 0x00];
        let mut reader = Reader::new(&encoded);
        assert!(reader.read(TAG_SEQUENCE).is_err());
    }

    #[test]
    fn test_zero_integer() {
        let encoded = encode_uint(&BigUint::zero());
        assert_eq!(encoded, vec![0x02, 0x01, 0x00]);
        let mut reader = Reader::new(&encoded);
        assert!(reader.read_uint().unwrap().is_zero());
    }
}
