use core::fmt;

use crate::crypto::hash::HashAlgorithm;

/// This crate reports handshake-secrets failures using this type.
///
/// Every variant is fatal to the current handshake attempt: there is no
/// transient-error class here, because there is no IO.  The surrounding
/// connection layer may retry the whole handshake from scratch.
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// Memory could not be obtained for the transcript buffer or a
    /// digest clone.  The handshake must abort; the transcript cannot
    /// be partially updated.
    AllocationFailure,

    /// A MAC was requested for a hash algorithm whose digest state was
    /// never frozen for this handshake.  This is a caller bug, not a
    /// peer-triggerable condition.
    DigestUnavailable(HashAlgorithm),

    /// The key expansion counter exceeded its ceiling: the cipher suite
    /// demanded more key material than the SSLv3 construction supports.
    /// This indicates a programming invariant violation, not peer input.
    InternalError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailure => write!(f, "cannot allocate handshake secret storage"),
            Self::DigestUnavailable(alg) => {
                write!(f, "no frozen digest state for {:?}", alg)
            }
            Self::InternalError => write!(f, "key expansion exceeded the SSLv3 ceiling"),
        }
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl std::error::Error for Error {}
