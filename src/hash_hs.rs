use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::crypto::hash::{Context, HashAlgorithm, Output};
use crate::crypto::provider;
use crate::error::Error;
use crate::log::trace;

/// Early stage buffering of handshake bytes.
///
/// Until the active hash algorithms are known we just buffer the raw
/// handshake messages, in wire order.  A new handshake session starts
/// from a fresh, empty buffer; dropping the previous one discards all
/// prior transcript state.
pub struct HandshakeHashBuffer {
    buffer: Vec<u8>,
    retain_transcript: bool,
}

impl HandshakeHashBuffer {
    /// Start an empty transcript.
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            retain_transcript: false,
        }
    }

    /// Keep a full copy of the transcript bytes after freezing, for
    /// callers that need to re-derive digests later.
    pub fn set_retain_transcript(&mut self) {
        self.retain_transcript = true;
    }

    /// Record a handshake message's raw bytes.
    ///
    /// Fails only if storage cannot be grown, which is fatal to the
    /// handshake: the transcript is never partially updated.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.buffer
            .try_reserve(bytes.len())
            .map_err(|_| Error::AllocationFailure)?;
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    /// We now know which algorithms the MACs will use: freeze the
    /// transcript into one incremental digest state per enabled
    /// algorithm, each seeded with everything recorded so far.
    ///
    /// Later bytes are hashed incrementally into every frozen state;
    /// the buffered bytes themselves are discarded unless
    /// [`Self::set_retain_transcript()`] was called.
    pub fn start_hash(self, algorithms: &[HashAlgorithm]) -> HandshakeHash {
        trace!(
            "freezing {} transcript bytes into {} digest state(s)",
            self.buffer.len(),
            algorithms.len()
        );

        let mut md5 = None;
        let mut sha1 = None;
        for alg in algorithms {
            let mut ctx = provider::from_algorithm(*alg).start();
            ctx.update(&self.buffer);
            match alg {
                HashAlgorithm::MD5 => md5 = Some(ctx),
                HashAlgorithm::SHA1 => sha1 = Some(ctx),
            }
        }

        HandshakeHash {
            md5,
            sha1,
            retained: match self.retain_transcript {
                true => Some(self.buffer),
                false => None,
            },
        }
    }
}

/// This deals with keeping a running hash of the handshake transcript.
/// This is computed by buffering initially.  Once the active algorithms
/// are known we switch to incremental hashing, with one digest state
/// per algorithm.
///
/// MAC computations never consume these states directly: they fork a
/// copy first, so the same transcript prefix can back both the client
/// and server Finished MACs.
pub struct HandshakeHash {
    md5: Option<Box<dyn Context>>,
    sha1: Option<Box<dyn Context>>,

    /// raw transcript copy, kept only on request.
    retained: Option<Vec<u8>>,
}

impl HandshakeHash {
    /// Record further handshake bytes into every frozen digest state.
    ///
    /// Already-forked states are unaffected: a fork is an independent
    /// copy of the transcript prefix it was taken at.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if let Some(ctx) = &mut self.md5 {
            ctx.update(bytes);
        }
        if let Some(ctx) = &mut self.sha1 {
            ctx.update(bytes);
        }

        if let Some(buffer) = &mut self.retained {
            buffer
                .try_reserve(bytes.len())
                .map_err(|_| Error::AllocationFailure)?;
            buffer.extend_from_slice(bytes);
        }

        Ok(())
    }

    /// We decided not to keep the raw transcript after all, so discard it.
    pub fn abandon_retained_transcript(&mut self) {
        self.retained = None;
    }

    /// Fork the digest state for `alg`, leaving the cached state intact.
    ///
    /// The returned context can be extended and finalized freely without
    /// disturbing this transcript.
    pub fn fork(&self, alg: HashAlgorithm) -> Result<Box<dyn Context>, Error> {
        self.context_for(alg)
            .map(|ctx| ctx.fork())
            .ok_or(Error::DigestUnavailable(alg))
    }

    /// Get the current transcript hash under `alg`.
    pub fn current_hash(&self, alg: HashAlgorithm) -> Result<Output, Error> {
        self.context_for(alg)
            .map(|ctx| ctx.fork_finish())
            .ok_or(Error::DigestUnavailable(alg))
    }

    /// Whether a digest state for `alg` was frozen for this handshake.
    pub fn has_algorithm(&self, alg: HashAlgorithm) -> bool {
        self.context_for(alg).is_some()
    }

    /// Takes this object's buffer containing all handshake bytes so far.
    /// This method only works once, and only if
    /// [`HandshakeHashBuffer::set_retain_transcript()`] was called.
    pub fn take_transcript(&mut self) -> Option<Vec<u8>> {
        self.retained.take()
    }

    fn context_for(&self, alg: HashAlgorithm) -> Option<&dyn Context> {
        match alg {
            HashAlgorithm::MD5 => self.md5.as_deref(),
            HashAlgorithm::SHA1 => self.sha1.as_deref(),
        }
    }
}
