use crate::crypto::hash::Hash;
use crate::crypto::provider;
use crate::error::Error;

/// Ceiling on the counter-prefix length, and therefore on how many
/// 16-byte blocks this construction can label: the prefix for block `i`
/// is `i` copies of one counter byte, so block 17 has nowhere to go.
/// This bounds the output at 256 bytes.  It is an inherited protocol
/// limit, not a tunable.
pub(super) const MAX_PREFIX_COPIES: usize = 16;

const MD5_OUTPUT_LEN: usize = 16;

/// SSLv3 key expansion: fill `out` from `secret` and the seeds.
///
/// Block `i` (1-based) is `MD5(secret || SHA1(prefix_i || secret ||
/// seed1 || seed2))` where `prefix_i` is `i` copies of the `i`th
/// counter byte, counting `'A'`, `'B'`, ...  The final block is
/// truncated to fit.
pub(super) fn expand(
    out: &mut [u8],
    secret: &[u8],
    _label: &[u8], // `label` is ignored for SSLv3, unlike the TLS PRFs.
    seed1: &[u8],
    seed2: &[u8],
) -> Result<(), Error> {
    let mut counter = b'A';
    let mut prefix = [0u8; MAX_PREFIX_COPIES];

    for (i, chunk) in out.chunks_mut(MD5_OUTPUT_LEN).enumerate() {
        let copies = i + 1;
        if copies > MAX_PREFIX_COPIES {
            // the ciphersuite wants more key material than this
            // construction can label
            return Err(Error::InternalError);
        }

        prefix[..copies].fill(counter);
        counter += 1;

        let mut sha1 = provider::SHA1.start();
        sha1.update(&prefix[..copies]);
        sha1.update(secret);
        if !seed1.is_empty() {
            sha1.update(seed1);
        }
        if !seed2.is_empty() {
            sha1.update(seed2);
        }
        // `Output` zeroes on drop, so the scratch digest does not
        // survive this iteration.
        let smd = sha1.finish();

        let mut md5 = provider::MD5.start();
        md5.update(secret);
        md5.update(smd.as_ref());
        let block = md5.finish();

        chunk.copy_from_slice(&block.as_ref()[..chunk.len()]);
    }

    Ok(())
}
