//! Recognized security levels and the `(m, n, k, λ)` quadruples that select
//! every downstream size in the scheme (field degree, code length/dimension,
//! subspace dimension). See spec §3 for the table this mirrors.

use crate::error::{Error, Result};
use core::fmt;

/// A recognized security level. Each level fixes a `Params` quadruple and a
/// hash/XOF pair (see [`crate::oracle`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SecurityLevel {
    /// Category-1-equivalent parameters: `(m=64, n=58, k=28, λ=3)`.
    L128,
    /// Category-3-equivalent parameters: `(m=96, n=62, k=32, λ=3)`.
    L192,
    /// Category-5-equivalent parameters: `(m=128, n=64, k=28, λ=3)`.
    L256,
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = match self {
            SecurityLevel::L128 => 128,
            SecurityLevel::L192 => 192,
            SecurityLevel::L256 => 256,
        };
        write!(f, "{n}")
    }
}

impl SecurityLevel {
    /// Recovers a level from its numeric name (128/192/256), as used by the
    /// external hash/XOF oracle constructors in spec §6.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            128 => Ok(SecurityLevel::L128),
            192 => Ok(SecurityLevel::L192),
            256 => Ok(SecurityLevel::L256),
            _ => Err(Error::ParameterError("unsupported security level")),
        }
    }

    /// Recovers a level from a serialized `(m, n, k, λ)` quadruple, by
    /// matching it against the three recognized levels' tables. A
    /// deserialized key whose parameters do not match one of these exactly
    /// was not produced by this crate.
    pub fn from_params(m: u32, n: u32, k: u32, lambda: u32) -> Result<Self> {
        let candidate = Params { m, n, k, lambda };
        [SecurityLevel::L128, SecurityLevel::L192, SecurityLevel::L256]
            .into_iter()
            .find(|level| level.params() == candidate)
            .ok_or(Error::SerializationError("parameter quadruple does not match a recognized security level"))
    }

    /// The `(m, n, k, λ)` quadruple for this level.
    #[must_use]
    pub fn params(self) -> Params {
        match self {
            SecurityLevel::L128 => Params { m: 64, n: 58, k: 28, lambda: 3 },
            SecurityLevel::L192 => Params { m: 96, n: 62, k: 32, lambda: 3 },
            SecurityLevel::L256 => Params { m: 128, n: 64, k: 28, lambda: 3 },
        }
    }
}

/// The four integers that parameterize every component of the scheme.
/// `k ≤ n ≤ m` and `2λ ≤ n − k` are invariants enforced at construction of
/// any [`SecurityLevel`]; a hand-built `Params` is only reachable in tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Params {
    /// Degree of the extension field `F_{2^m}`.
    pub m: u32,
    /// Gabidulin code length.
    pub n: u32,
    /// Gabidulin code dimension.
    pub k: u32,
    /// Dimension of the `F_2`-subspace the column scrambler's entries lie in.
    pub lambda: u32,
}

impl Params {
    /// Rank-decoding radius `t = ⌊(n − k) / (2λ)⌋` (spec §4.4/§4.6).
    #[must_use]
    pub fn decoding_radius(self) -> u32 {
        (self.n - self.k) / (2 * self.lambda)
    }

    /// Plaintext length in bytes, `⌊m·k/8⌋ − digest_size`, for a hash of the
    /// given digest size (spec §3).
    pub fn plaintext_len(self, digest_size: usize) -> Result<usize> {
        let full = (self.m as usize * self.k as usize) / 8;
        full.checked_sub(digest_size)
            .filter(|&len| len > 0)
            .ok_or(Error::ParameterError("digest too large for (m, k): L_pt <= 0"))
    }

    /// Ciphertext length in bytes, `⌊m·n/8⌋` (spec §3).
    #[must_use]
    pub fn ciphertext_len(self) -> usize {
        (self.m as usize * self.n as usize) / 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_spec() {
        assert_eq!(SecurityLevel::L128.params(), Params { m: 64, n: 58, k: 28, lambda: 3 });
        assert_eq!(SecurityLevel::L192.params(), Params { m: 96, n: 62, k: 32, lambda: 3 });
        assert_eq!(SecurityLevel::L256.params(), Params { m: 128, n: 64, k: 28, lambda: 3 });
    }

    #[test]
    fn invariants_hold_for_every_level() {
        for level in [SecurityLevel::L128, SecurityLevel::L192, SecurityLevel::L256] {
            let p = level.params();
            assert!(p.k <= p.n);
            assert!(p.n <= p.m);
            assert!(2 * p.lambda <= p.n - p.k);
        }
    }

    #[test]
    fn from_params_recovers_the_matching_level() {
        assert_eq!(SecurityLevel::from_params(64, 58, 28, 3), Ok(SecurityLevel::L128));
        assert_eq!(SecurityLevel::from_params(96, 62, 32, 3), Ok(SecurityLevel::L192));
        assert!(SecurityLevel::from_params(64, 58, 28, 4).is_err());
    }

    #[test]
    fn unknown_level_is_parameter_error() {
        assert_eq!(SecurityLevel::from_bits(64), Err(Error::ParameterError("unsupported security level")));
        assert_eq!(SecurityLevel::from_bits(128), Ok(SecurityLevel::L128));
    }
}
