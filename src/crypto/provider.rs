//! Built-in hash implementations, backed by the RustCrypto digest crates.

use alloc::boxed::Box;

use md5::Digest;

use super::hash;

/// The MD5 hash function.
pub static MD5: Md5Hash = Md5Hash;

/// The SHA-1 hash function.
pub static SHA1: Sha1Hash = Sha1Hash;

/// Look up the implementation for `alg`.
pub fn from_algorithm(alg: hash::HashAlgorithm) -> &'static dyn hash::Hash {
    match alg {
        hash::HashAlgorithm::MD5 => &MD5,
        hash::HashAlgorithm::SHA1 => &SHA1,
    }
}

/// MD5 via the `md-5` crate.
pub struct Md5Hash;

impl hash::Hash for Md5Hash {
    fn start(&self) -> Box<dyn hash::Context> {
        Box::new(Md5Context(md5::Md5::new()))
    }

    fn hash(&self, data: &[u8]) -> hash::Output {
        hash::Output::new(&md5::Md5::digest(data)[..])
    }

    fn output_len(&self) -> usize {
        16
    }

    fn algorithm(&self) -> hash::HashAlgorithm {
        hash::HashAlgorithm::MD5
    }
}

struct Md5Context(md5::Md5);

impl hash::Context for Md5Context {
    fn fork_finish(&self) -> hash::Output {
        hash::Output::new(&self.0.clone().finalize()[..])
    }

    fn fork(&self) -> Box<dyn hash::Context> {
        Box::new(Self(self.0.clone()))
    }

    fn finish(self: Box<Self>) -> hash::Output {
        hash::Output::new(&self.0.finalize()[..])
    }

    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }
}

/// SHA-1 via the `sha1` crate.
pub struct Sha1Hash;

impl hash::Hash for Sha1Hash {
    fn start(&self) -> Box<dyn hash::Context> {
        Box::new(Sha1Context(sha1::Sha1::new()))
    }

    fn hash(&self, data: &[u8]) -> hash::Output {
        hash::Output::new(&sha1::Sha1::digest(data)[..])
    }

    fn output_len(&self) -> usize {
        20
    }

    fn algorithm(&self) -> hash::HashAlgorithm {
        hash::HashAlgorithm::SHA1
    }
}

struct Sha1Context(sha1::Sha1);

impl hash::Context for Sha1Context {
    fn fork_finish(&self) -> hash::Output {
        hash::Output::new(&self.0.clone().finalize()[..])
    }

    fn fork(&self) -> Box<dyn hash::Context> {
        Box::new(Self(self.0.clone()))
    }

    fn finish(self: Box<Self>) -> hash::Output {
        hash::Output::new(&self.0.finalize()[..])
    }

    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }
}

#[cfg(test)]
mod tests {
    use super::{MD5, SHA1};
    use crate::crypto::hash::Hash;

    #[test]
    fn one_shot_matches_incremental() {
        let providers: [&dyn Hash; 2] = [&MD5, &SHA1];
        for provider in providers {
            let mut ctx = provider.start();
            ctx.update(b"hello ");
            ctx.update(b"world");
            assert_eq!(
                ctx.finish().as_ref(),
                provider.hash(b"hello world").as_ref()
            );
        }
    }

    #[test]
    fn fork_is_independent() {
        let mut ctx = SHA1.start();
        ctx.update(b"hello");
        let mut fork = ctx.fork();
        fork.update(b" world");
        // the fork saw extra input; the parent result is unchanged
        assert_eq!(ctx.fork_finish().as_ref(), SHA1.hash(b"hello").as_ref());
        assert_eq!(fork.finish().as_ref(), SHA1.hash(b"hello world").as_ref());
    }

    #[test]
    fn fork_finish_twice_agrees() {
        let mut ctx = MD5.start();
        ctx.update(b"abc");
        let first = ctx.fork_finish();
        let second = ctx.fork_finish();
        assert_eq!(first.as_ref(), second.as_ref());
    }
}
