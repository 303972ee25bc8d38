//! The SSLv3 handshake MAC and key schedule.

use alloc::vec::Vec;
use core::fmt;

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::crypto::hash::{HashAlgorithm, Output};
use crate::crypto::provider;
use crate::error::Error;
use crate::hash_hs::HandshakeHash;
use crate::log::debug;

mod prf;

/// The length of the master secret.
pub const MASTER_SECRET_LEN: usize = 48;

/// The length of each hello random.
pub const RANDOM_LEN: usize = 32;

/// The length of the dual-hash Finished MAC: MD5 output then SHA-1 output.
pub const FINISHED_MAC_LEN: usize = 16 + 20;

const SSL3_PAD1: [u8; 48] = [0x36; 48];
const SSL3_PAD2: [u8; 48] = [0x5c; 48];

/// Which side of the connection a Finished MAC is computed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// A client initiates the connection.
    Client,
    /// A server waits for a client to connect.
    Server,
}

impl Side {
    /// The sender label mixed into this side's Finished MAC.
    ///
    /// The label is what stops a peer reflecting our own Finished MAC
    /// back at us.
    pub fn finished_label(&self) -> &'static [u8] {
        match self {
            Self::Client => b"CLNT",
            Self::Server => b"SRVR",
        }
    }
}

/// The client and server hello randoms, used as key expansion seed
/// material.  These are public values.
#[derive(Clone, Copy, Debug)]
pub struct ConnectionRandoms {
    /// The client's random.
    pub client: [u8; RANDOM_LEN],
    /// The server's random.
    pub server: [u8; RANDOM_LEN],
}

impl ConnectionRandoms {
    /// Bundle the two hello randoms.
    pub fn new(client: [u8; RANDOM_LEN], server: [u8; RANDOM_LEN]) -> Self {
        Self { client, server }
    }
}

/// SSLv3 per-connection keying material.
///
/// Owns the master secret for one handshake; the secret is zeroed when
/// this object is dropped and is never handed back out.  One of these
/// exists per connection and is only touched by the thread driving that
/// connection's handshake.
pub struct Ssl3Secrets {
    randoms: ConnectionRandoms,
    master_secret: Zeroizing<[u8; MASTER_SECRET_LEN]>,
}

impl Ssl3Secrets {
    /// Build secrets from an established master secret and the hello
    /// randoms.  The caller should zero its own copy of the secret.
    pub fn new(master_secret: &[u8; MASTER_SECRET_LEN], randoms: ConnectionRandoms) -> Self {
        Self {
            randoms,
            master_secret: Zeroizing::new(*master_secret),
        }
    }

    /// Compute the 36-byte Finished MAC for `side` over the frozen
    /// transcript: the MD5 MAC followed by the SHA-1 MAC, in wire order.
    ///
    /// Requires both algorithms to have been frozen in `transcript`;
    /// failing that is a caller bug reported as
    /// [`Error::DigestUnavailable`].  No partial MAC is ever returned.
    pub fn finished_mac(
        &self,
        transcript: &HandshakeHash,
        side: Side,
    ) -> Result<FinishedMac, Error> {
        let sender = side.finished_label();
        let md5 = self.handshake_mac(transcript, HashAlgorithm::MD5, Some(sender))?;
        let sha1 = self.handshake_mac(transcript, HashAlgorithm::SHA1, Some(sender))?;

        let mut bytes = Zeroizing::new([0u8; FINISHED_MAC_LEN]);
        bytes[..16].copy_from_slice(md5.as_ref());
        bytes[16..].copy_from_slice(sha1.as_ref());
        Ok(FinishedMac { bytes })
    }

    /// Compute the certificate-verify MAC under `alg`: the same pad1/pad2
    /// construction as the Finished MAC, with a zero-length sender label.
    pub fn cert_verify_mac(
        &self,
        transcript: &HandshakeHash,
        alg: HashAlgorithm,
    ) -> Result<Output, Error> {
        self.handshake_mac(transcript, alg, None)
    }

    /// The legacy pad1/pad2 MAC over the transcript digest:
    ///
    /// `hash(secret || pad2 || hash(transcript || sender || secret || pad1))`
    ///
    /// with both pads truncated to `(48 / n) * n` bytes for an `n`-byte
    /// digest.  The transcript digest is folded in by forking the cached
    /// incremental state, never by re-hashing the transcript.
    fn handshake_mac(
        &self,
        transcript: &HandshakeHash,
        alg: HashAlgorithm,
        sender: Option<&'static [u8]>,
    ) -> Result<Output, Error> {
        let mut inner = transcript.fork(alg)?;

        let npad = (48 / alg.output_len()) * alg.output_len();
        if let Some(sender) = sender {
            inner.update(sender);
        }
        inner.update(self.master_secret.as_ref());
        inner.update(&SSL3_PAD1[..npad]);
        let inner_digest = inner.finish();

        let mut outer = provider::from_algorithm(alg).start();
        outer.update(self.master_secret.as_ref());
        outer.update(&SSL3_PAD2[..npad]);
        outer.update(inner_digest.as_ref());
        Ok(outer.finish())
    }

    /// Derive the full key block for `layout` from the master secret and
    /// the hello randoms.  This runs once per handshake.
    pub fn make_key_block(&self, layout: KeyBlockLayout) -> Result<KeyBlock, Error> {
        let len = layout.key_block_len();
        debug!("deriving {len} byte key block");

        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(len)
            .map_err(|_| Error::AllocationFailure)?;
        bytes.resize(len, 0);
        let mut bytes = Zeroizing::new(bytes);

        // nb. the server random comes first in key expansion.
        prf::expand(
            &mut bytes,
            self.master_secret.as_ref(),
            b"",
            &self.randoms.server,
            &self.randoms.client,
        )?;

        Ok(KeyBlock { bytes, layout })
    }
}

/// A Finished-message MAC: 16 bytes of MD5 MAC then 20 bytes of SHA-1
/// MAC.  Zeroed on drop.
pub struct FinishedMac {
    bytes: Zeroizing<[u8; FINISHED_MAC_LEN]>,
}

impl FinishedMac {
    /// Compare against the peer's claimed MAC, in constant time with
    /// respect to the secret-dependent bytes.
    pub fn verify(&self, peer: &[u8]) -> bool {
        ConstantTimeEq::ct_eq(&self.bytes[..], peer).into()
    }
}

impl AsRef<[u8]> for FinishedMac {
    fn as_ref(&self) -> &[u8] {
        &self.bytes[..]
    }
}

impl fmt::Debug for FinishedMac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // deliberately not the value
        f.write_str("FinishedMac")
    }
}

/// How the negotiated cipher suite shapes the key block.  All sizes are
/// per direction, in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyBlockLayout {
    /// MAC secret length.
    pub mac_key_len: usize,
    /// Bulk encryption key length.
    pub enc_key_len: usize,
    /// IV length; zero for stream ciphers.
    pub fixed_iv_len: usize,
}

impl KeyBlockLayout {
    /// Total derived length: both directions of MAC secret, key and IV.
    pub fn key_block_len(&self) -> usize {
        (self.mac_key_len + self.enc_key_len + self.fixed_iv_len) * 2
    }
}

/// The derived key block.  The backing storage is zeroed on drop; the
/// record layer should copy the slices it needs and drop this promptly.
pub struct KeyBlock {
    bytes: Zeroizing<Vec<u8>>,
    layout: KeyBlockLayout,
}

impl KeyBlock {
    /// Partition the key block into its six directional pieces.
    pub fn split(&self) -> KeyBlockSlices<'_> {
        let layout = &self.layout;
        let (client_mac_secret, rest) = self.bytes.split_at(layout.mac_key_len);
        let (server_mac_secret, rest) = rest.split_at(layout.mac_key_len);
        let (client_write_key, rest) = rest.split_at(layout.enc_key_len);
        let (server_write_key, rest) = rest.split_at(layout.enc_key_len);
        let (client_write_iv, rest) = rest.split_at(layout.fixed_iv_len);
        let (server_write_iv, _) = rest.split_at(layout.fixed_iv_len);

        KeyBlockSlices {
            client_mac_secret,
            server_mac_secret,
            client_write_key,
            server_write_key,
            client_write_iv,
            server_write_iv,
        }
    }

    /// The layout this block was derived for.
    pub fn layout(&self) -> KeyBlockLayout {
        self.layout
    }
}

/// Views into a [`KeyBlock`], in derivation order.
pub struct KeyBlockSlices<'a> {
    /// Client-to-server MAC secret.
    pub client_mac_secret: &'a [u8],
    /// Server-to-client MAC secret.
    pub server_mac_secret: &'a [u8],
    /// Client-to-server encryption key.
    pub client_write_key: &'a [u8],
    /// Server-to-client encryption key.
    pub server_write_key: &'a [u8],
    /// Client-to-server IV.
    pub client_write_iv: &'a [u8],
    /// Server-to-client IV.
    pub server_write_iv: &'a [u8],
}

#[cfg(test)]
mod tests {
    use super::{ConnectionRandoms, KeyBlockLayout, Side, Ssl3Secrets, FINISHED_MAC_LEN};
    use crate::crypto::hash::HashAlgorithm;
    use crate::error::Error;
    use crate::hash_hs::{HandshakeHash, HandshakeHashBuffer};

    const BOTH: &[HashAlgorithm] = &[HashAlgorithm::MD5, HashAlgorithm::SHA1];

    fn secrets() -> Ssl3Secrets {
        Ssl3Secrets::new(
            &[0x0b; 48],
            ConnectionRandoms::new([0; 32], [0; 32]),
        )
    }

    fn transcript(bytes: &[u8]) -> HandshakeHash {
        let mut hhb = HandshakeHashBuffer::new();
        hhb.append(bytes).unwrap();
        hhb.start_hash(BOTH)
    }

    // Pad-truncation boundary vectors: secret = 48 x 0x0b, sender label
    // "CLNT", empty transcript.  npad is 48 for MD5 and 40 for SHA-1.
    #[test]
    fn client_finished_known_answer() {
        let mac = secrets()
            .finished_mac(&transcript(b""), Side::Client)
            .unwrap();
        assert_eq!(mac.as_ref().len(), FINISHED_MAC_LEN);
        assert_eq!(
            mac.as_ref()[..16],
            [
                0xae, 0xc1, 0x31, 0xac, 0xa5, 0xbc, 0xa3, 0x8b, 0x71, 0xac, 0x63, 0x61, 0xbe,
                0x14, 0x14, 0x9a
            ][..]
        );
        assert_eq!(
            mac.as_ref()[16..],
            [
                0x69, 0x77, 0x79, 0xe2, 0xe8, 0xfc, 0xb4, 0xea, 0xbb, 0x47, 0x00, 0xd8, 0x05,
                0x04, 0x56, 0x09, 0xfe, 0x3a, 0xfe, 0x1f
            ][..]
        );
    }

    #[test]
    fn server_finished_known_answer() {
        let mac = secrets()
            .finished_mac(&transcript(b""), Side::Server)
            .unwrap();
        assert_eq!(
            mac.as_ref()[..16],
            [
                0x1c, 0x21, 0x06, 0x73, 0x82, 0x52, 0x7b, 0xcd, 0x18, 0x2c, 0xd6, 0xf5, 0xce,
                0xed, 0x85, 0xe5
            ][..]
        );
        assert_eq!(
            mac.as_ref()[16..],
            [
                0x74, 0x31, 0xb1, 0x17, 0x1d, 0x23, 0xad, 0x81, 0x66, 0x14, 0xd4, 0x1b, 0xfa,
                0x0d, 0xaa, 0x98, 0x36, 0x22, 0x8f, 0xd6
            ][..]
        );
    }

    #[test]
    fn sender_label_changes_the_mac() {
        let secrets = secrets();
        let transcript = transcript(b"");
        let client = secrets
            .finished_mac(&transcript, Side::Client)
            .unwrap();
        let server = secrets
            .finished_mac(&transcript, Side::Server)
            .unwrap();
        assert!(!client.verify(server.as_ref()));
    }

    #[test]
    fn finished_mac_is_deterministic() {
        let secrets = secrets();
        let transcript = transcript(b"hello world");
        let first = secrets
            .finished_mac(&transcript, Side::Client)
            .unwrap();
        let second = secrets
            .finished_mac(&transcript, Side::Client)
            .unwrap();
        assert_eq!(first.as_ref(), second.as_ref());
        assert!(first.verify(second.as_ref()));
        assert_eq!(
            first.as_ref()[..16],
            [
                0x3f, 0x67, 0xe7, 0xc9, 0xb4, 0x56, 0x7d, 0xc3, 0x42, 0x96, 0xf2, 0x3c, 0xcf,
                0x95, 0x7c, 0xa2
            ][..]
        );
        assert_eq!(
            first.as_ref()[16..],
            [
                0xe1, 0xa3, 0xd4, 0xc9, 0x53, 0x2a, 0xf9, 0x1c, 0x04, 0xfe, 0x0e, 0x29, 0x49,
                0x24, 0xa0, 0x1e, 0xac, 0x21, 0x60, 0x3e
            ][..]
        );
    }

    #[test]
    fn cert_verify_mac_omits_sender_label() {
        let secrets = secrets();
        let transcript = transcript(b"hello world");
        let md5 = secrets
            .cert_verify_mac(&transcript, HashAlgorithm::MD5)
            .unwrap();
        let sha1 = secrets
            .cert_verify_mac(&transcript, HashAlgorithm::SHA1)
            .unwrap();
        assert_eq!(
            md5.as_ref(),
            [
                0x9c, 0xe9, 0x5d, 0x6e, 0x9f, 0x66, 0x2f, 0x21, 0x53, 0x4c, 0x0b, 0x3b, 0x9e,
                0x06, 0x6f, 0x56
            ]
        );
        assert_eq!(
            sha1.as_ref(),
            [
                0x52, 0x31, 0x6f, 0x70, 0x2f, 0xa1, 0x5b, 0x27, 0xc9, 0x83, 0xee, 0xe3, 0xe4,
                0x9f, 0xb2, 0xfe, 0x52, 0x16, 0x06, 0x86
            ]
        );

        // distinct from the Finished MAC over the same state
        let finished = secrets
            .finished_mac(&transcript, Side::Client)
            .unwrap();
        assert_ne!(finished.as_ref()[..16], *md5.as_ref());
    }

    #[test]
    fn missing_digest_is_a_caller_bug() {
        let secrets = secrets();
        let sha1_only = HandshakeHashBuffer::new().start_hash(&[HashAlgorithm::SHA1]);
        assert_eq!(
            secrets
                .finished_mac(&sha1_only, Side::Client)
                .err(),
            Some(Error::DigestUnavailable(HashAlgorithm::MD5))
        );
    }

    #[test]
    fn key_block_partition() {
        // 3DES-EDE-CBC-SHA shaped layout
        let layout = KeyBlockLayout {
            mac_key_len: 20,
            enc_key_len: 24,
            fixed_iv_len: 8,
        };
        assert_eq!(layout.key_block_len(), 104);

        let block = secrets().make_key_block(layout).unwrap();
        let slices = block.split();
        assert_eq!(slices.client_mac_secret.len(), 20);
        assert_eq!(slices.server_mac_secret.len(), 20);
        assert_eq!(slices.client_write_key.len(), 24);
        assert_eq!(slices.server_write_key.len(), 24);
        assert_eq!(slices.client_write_iv.len(), 8);
        assert_eq!(slices.server_write_iv.len(), 8);
        assert_ne!(slices.client_write_key, slices.server_write_key);
    }

    #[test]
    fn oversized_key_block_is_refused() {
        let layout = KeyBlockLayout {
            mac_key_len: 64,
            enc_key_len: 64,
            fixed_iv_len: 64,
        };
        assert!(layout.key_block_len() > 256);
        assert_eq!(
            secrets().make_key_block(layout).err(),
            Some(Error::InternalError)
        );
    }

    #[test]
    fn verify_rejects_wrong_length() {
        let mac = secrets()
            .finished_mac(&transcript(b""), Side::Client)
            .unwrap();
        assert!(!mac.verify(&mac.as_ref()[..35]));
        assert!(!mac.verify(b""));
    }
}
