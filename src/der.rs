//! A minimal, hand-rolled ASN.1 DER encoder/decoder for the four TLV shapes
//! key serialization needs: `SEQUENCE`, `OCTET STRING`, `BIT STRING`, and
//! `INTEGER`. No repository in the retrieval pack depends on a DER/PEM
//! crate; `original_source/alshehhi`'s own `key.py` builds the same four
//! shapes by hand through `Crypto.Util.asn1`'s thin `DerSequence` /
//! `DerOctetString` / `DerBitString` wrappers, so this module mirrors that
//! approach directly rather than reaching for an unneeded dependency.

use crate::error::{ensure, Error, Result};

const TAG_INTEGER: u8 = 0x02;
const TAG_BIT_STRING: u8 = 0x03;
const TAG_OCTET_STRING: u8 = 0x04;
const TAG_SEQUENCE: u8 = 0x30;

fn encode_length(len: usize) -> Vec<u8> {
    if len < 0x80 {
        vec![len as u8]
    } else {
        let mut bytes = Vec::new();
        let mut n = len;
        while n > 0 {
            bytes.push((n & 0xff) as u8);
            n >>= 8;
        }
        bytes.reverse();
        let mut out = vec![0x80 | bytes.len() as u8];
        out.extend(bytes);
        out
    }
}

fn encode_tlv(tag: u8, value: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend(encode_length(value.len()));
    out.extend_from_slice(value);
    out
}

/// Encodes a non-negative integer in minimal two's-complement big-endian
/// form, per DER's `INTEGER` encoding rules.
pub(crate) fn encode_integer(value: u64) -> Vec<u8> {
    let mut bytes = value.to_be_bytes().to_vec();
    while bytes.len() > 1 && bytes[0] == 0 && bytes[1] & 0x80 == 0 {
        bytes.remove(0);
    }
    if bytes[0] & 0x80 != 0 {
        bytes.insert(0, 0x00);
    }
    encode_tlv(TAG_INTEGER, &bytes)
}

pub(crate) fn encode_octet_string(bytes: &[u8]) -> Vec<u8> {
    encode_tlv(TAG_OCTET_STRING, bytes)
}

/// Encodes `bytes` as a `BIT STRING` with zero unused trailing bits (every
/// bit string this crate emits is a byte-aligned field encoding).
pub(crate) fn encode_bit_string(bytes: &[u8]) -> Vec<u8> {
    let mut value = vec![0x00];
    value.extend_from_slice(bytes);
    encode_tlv(TAG_BIT_STRING, &value)
}

pub(crate) fn encode_sequence(fields: &[Vec<u8>]) -> Vec<u8> {
    let body: Vec<u8> = fields.iter().flatten().copied().collect();
    encode_tlv(TAG_SEQUENCE, &body)
}

/// One decoded TLV: its tag, and the raw value bytes.
struct Tlv<'a> {
    tag: u8,
    value: &'a [u8],
}

fn read_tlv(input: &[u8]) -> Result<(Tlv<'_>, &[u8])> {
    ensure!(input.len() >= 2, Error::SerializationError("truncated DER TLV header"));
    let tag = input[0];
    let (len, header_len) = if input[1] & 0x80 == 0 {
        (input[1] as usize, 2usize)
    } else {
        let n_bytes = (input[1] & 0x7f) as usize;
        ensure!(n_bytes > 0 && n_bytes <= 8, Error::SerializationError("unsupported DER length encoding"));
        ensure!(input.len() >= 2 + n_bytes, Error::SerializationError("truncated DER length"));
        let mut len = 0usize;
        for &b in &input[2..2 + n_bytes] {
            len = (len << 8) | b as usize;
        }
        (len, 2 + n_bytes)
    };
    ensure!(input.len() >= header_len + len, Error::SerializationError("truncated DER value"));
    let value = &input[header_len..header_len + len];
    Ok((Tlv { tag, value }, &input[header_len + len..]))
}

/// Decodes a `SEQUENCE`, returning its raw (still-encoded) member TLVs.
pub(crate) fn decode_sequence(input: &[u8]) -> Result<Vec<&[u8]>> {
    let (outer, rest) = read_tlv(input)?;
    ensure!(outer.tag == TAG_SEQUENCE, Error::SerializationError("expected a DER SEQUENCE"));
    ensure!(rest.is_empty(), Error::SerializationError("trailing bytes after DER SEQUENCE"));
    let mut items = Vec::new();
    let mut cursor = outer.value;
    while !cursor.is_empty() {
        let (tlv, rest) = read_tlv(cursor)?;
        // Re-slice from the original start of this TLV so callers receive a
        // self-contained re-decodable item, not just its value.
        let consumed = cursor.len() - rest.len();
        items.push(&cursor[..consumed]);
        let _ = tlv;
        cursor = rest;
    }
    Ok(items)
}

pub(crate) fn decode_octet_string(input: &[u8]) -> Result<&[u8]> {
    let (tlv, rest) = read_tlv(input)?;
    ensure!(tlv.tag == TAG_OCTET_STRING, Error::SerializationError("expected a DER OCTET STRING"));
    ensure!(rest.is_empty(), Error::SerializationError("trailing bytes after DER OCTET STRING"));
    Ok(tlv.value)
}

pub(crate) fn decode_bit_string(input: &[u8]) -> Result<&[u8]> {
    let (tlv, rest) = read_tlv(input)?;
    ensure!(tlv.tag == TAG_BIT_STRING, Error::SerializationError("expected a DER BIT STRING"));
    ensure!(rest.is_empty(), Error::SerializationError("trailing bytes after DER BIT STRING"));
    ensure!(!tlv.value.is_empty(), Error::SerializationError("empty DER BIT STRING"));
    ensure!(tlv.value[0] == 0x00, Error::SerializationError("unexpected unused bits in DER BIT STRING"));
    Ok(&tlv.value[1..])
}

pub(crate) fn decode_integer(input: &[u8]) -> Result<u64> {
    let (tlv, rest) = read_tlv(input)?;
    ensure!(tlv.tag == TAG_INTEGER, Error::SerializationError("expected a DER INTEGER"));
    ensure!(rest.is_empty(), Error::SerializationError("trailing bytes after DER INTEGER"));
    ensure!(
        !tlv.value.is_empty() && tlv.value.len() <= 8,
        Error::SerializationError("DER INTEGER out of supported range")
    );
    let mut value = 0u64;
    for &b in tlv.value {
        value = (value << 8) | u64::from(b);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octet_string_round_trips() {
        let encoded = encode_octet_string(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(decode_octet_string(&encoded).unwrap(), &[0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn octet_string_tlv_matches_a_known_answer() {
        let encoded = encode_octet_string(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(encoded, hex::decode("0404deadbeef").unwrap());
    }

    #[test]
    fn bit_string_round_trips() {
        let encoded = encode_bit_string(&[1, 2, 3]);
        assert_eq!(decode_bit_string(&encoded).unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn integer_round_trips_including_high_bit_values() {
        for v in [0u64, 1, 127, 128, 255, 256, 65535, 70000] {
            let encoded = encode_integer(v);
            assert_eq!(decode_integer(&encoded).unwrap(), v);
        }
    }

    #[test]
    fn sequence_round_trips_member_order() {
        let a = encode_octet_string(b"abc");
        let b = encode_integer(42);
        let seq = encode_sequence(&[a.clone(), b.clone()]);
        let items = decode_sequence(&seq).unwrap();
        assert_eq!(items, vec![a.as_slice(), b.as_slice()]);
    }

    #[test]
    fn truncated_input_is_serialization_error() {
        assert!(decode_octet_string(&[0x04, 0x05, 0x01]).is_err());
    }
}
