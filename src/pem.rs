//! PEM armor (`-----BEGIN ...-----`/`-----END ...-----`, base64-wrapped DER)
//! for the two key types, matching `original_source/alshehhi/key.py`'s use
//! of `Crypto.IO.PEM`. As with [`crate::der`], no repository in the
//! retrieval pack depends on a PEM/base64 crate, so this is a small
//! self-contained implementation of RFC 7468's framing and RFC 4648's
//! base64 alphabet rather than an added dependency.

use crate::error::{ensure, Error, Result};

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const LINE_WIDTH: usize = 64;

fn base64_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);
    for chunk in data.chunks(3) {
        let b0 = chunk[0];
        let b1 = *chunk.get(1).unwrap_or(&0);
        let b2 = *chunk.get(2).unwrap_or(&0);
        let triple = (u32::from(b0) << 16) | (u32::from(b1) << 8) | u32::from(b2);
        out.push(ALPHABET[(triple >> 18 & 0x3f) as usize] as char);
        out.push(ALPHABET[(triple >> 12 & 0x3f) as usize] as char);
        out.push(if chunk.len() > 1 { ALPHABET[(triple >> 6 & 0x3f) as usize] as char } else { '=' });
        out.push(if chunk.len() > 2 { ALPHABET[(triple & 0x3f) as usize] as char } else { '=' });
    }
    out
}

fn base64_decode(text: &str) -> Result<Vec<u8>> {
    let clean: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if clean.is_empty() {
        return Ok(Vec::new());
    }
    ensure!(
        clean.len() % 4 == 0,
        Error::SerializationError("base64 payload length is not a multiple of four")
    );
    let mut out = Vec::with_capacity(clean.len() / 4 * 3);
    for chunk in clean.chunks(4) {
        let vals: Vec<u32> = chunk
            .iter()
            .map(|&b| {
                if b == b'=' {
                    Ok(0)
                } else {
                    ALPHABET
                        .iter()
                        .position(|&a| a == b)
                        .map(|p| p as u32)
                        .ok_or(Error::SerializationError("invalid base64 character"))
                }
            })
            .collect::<Result<_>>()?;
        let pad = chunk.iter().filter(|&&b| b == b'=').count();
        let triple = (vals[0] << 18) | (vals[1] << 12) | (vals[2] << 6) | vals[3];
        out.push((triple >> 16) as u8);
        if pad < 2 {
            out.push((triple >> 8) as u8);
        }
        if pad < 1 {
            out.push(triple as u8);
        }
    }
    Ok(out)
}

/// Wraps `der` as `-----BEGIN {label}-----`-framed, 64-column base64.
#[must_use]
pub(crate) fn encode(der: &[u8], label: &str) -> String {
    let body = base64_encode(der);
    let mut out = format!("-----BEGIN {label}-----\n");
    for line in body.as_bytes().chunks(LINE_WIDTH) {
        out.push_str(std::str::from_utf8(line).expect("base64 output is ASCII"));
        out.push('\n');
    }
    out.push_str(&format!("-----END {label}-----\n"));
    out
}

/// Unwraps a PEM document, returning its label and decoded DER bytes.
pub(crate) fn decode(pem: &str) -> Result<(String, Vec<u8>)> {
    let begin = "-----BEGIN ";
    let start = pem.find(begin).ok_or(Error::SerializationError("missing PEM BEGIN marker"))?;
    let after_begin = &pem[start + begin.len()..];
    let label_end = after_begin.find("-----").ok_or(Error::SerializationError("malformed PEM BEGIN marker"))?;
    let label = after_begin[..label_end].to_string();
    let end_marker = format!("-----END {label}-----");
    let body_start = start + begin.len() + label_end + "-----".len();
    let end = pem[body_start..].find(&end_marker).ok_or(Error::SerializationError("missing matching PEM END marker"))?;
    let body = &pem[body_start..body_start + end];
    Ok((label, base64_decode(body)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pem_round_trips_arbitrary_bytes() {
        let der = (0u8..=255).collect::<Vec<_>>();
        let armored = encode(&der, "PRIVATE KEY");
        let (label, decoded) = decode(&armored).unwrap();
        assert_eq!(label, "PRIVATE KEY");
        assert_eq!(decoded, der);
    }

    #[test]
    fn pem_round_trips_short_input() {
        for der in [vec![], vec![0x42], vec![0x01, 0x02]] {
            let armored = encode(&der, "PUBLIC KEY");
            let (label, decoded) = decode(&armored).unwrap();
            assert_eq!(label, "PUBLIC KEY");
            assert_eq!(decoded, der);
        }
    }

    #[test]
    fn wrong_marker_is_rejected_by_caller() {
        let armored = encode(&[1, 2, 3], "PUBLIC KEY");
        let (label, _) = decode(&armored).unwrap();
        assert_ne!(label, "PRIVATE KEY");
    }

    #[test]
    fn missing_markers_is_serialization_error() {
        assert!(decode("not a pem document").is_err());
    }

    #[test]
    fn base64_body_matches_a_known_answer() {
        let der = hex_literal::hex!("000102030405060708090a0b0c0d0e0f");
        let armored = encode(&der, "PUBLIC KEY");
        assert!(armored.contains("AAECAwQFBgcICQoLDA0ODw==\n"));
        let (label, decoded) = decode(&armored).unwrap();
        assert_eq!(label, "PUBLIC KEY");
        assert_eq!(decoded, der);
    }
}
