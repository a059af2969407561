//! Crate-wide error taxonomy. Four distinct kinds, matching the four failure
//! surfaces of the scheme: bad parameters, a field element that cannot be
//! encoded, a byte string or word that cannot be decoded, and a malformed
//! serialized key.

use thiserror::Error;

/// The error type returned by every fallible operation in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An unsupported security level, or a sampler called with inconsistent
    /// sizes (`λ > m`, `r > min(m, n)`, ...).
    #[error("invalid parameter: {0}")]
    ParameterError(&'static str),

    /// A field element outside characteristic two was handed to an encoder
    /// (in this crate this can only happen through a logic error, since all
    /// element constructors enforce characteristic two).
    #[error("encoding error: {0}")]
    EncodingError(&'static str),

    /// A byte string does not parse as a well-formed element/vector/matrix,
    /// a codeword could not be decoded to within the Gabidulin decoding
    /// radius, or the IND-CCA re-encryption check failed. These three
    /// internally distinct failures are deliberately collapsed into one
    /// variant (see [`crate::cipher`]) to avoid a decryption oracle.
    #[error("decoding error: {0}")]
    DecodingError(&'static str),

    /// A DER/PEM structure is malformed, carries the wrong PEM marker, or
    /// declares a field whose length is inconsistent with `(m, n, k)`.
    #[error("serialization error: {0}")]
    SerializationError(&'static str),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// If the condition is not met, return the given error. Borrowed from the
/// `anyhow` crate's `ensure!`, as is, and kept available crate-wide.
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($err);
        }
    };
}

pub(crate) use ensure;
