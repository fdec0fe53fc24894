//! Thin adapter over NIST P-256 ECDSA and ECDH, shaped to match a
//! constrained-node ECC driver's surface: key generation, public-key
//! validation and SEC1 compression, message-hash signing/verification, and
//! shared-secret derivation.
//!
//! All public and private keys here are *raw* big-endian coordinate
//! bytes — a public key is `x || y` (64 bytes, no SEC1 type tag), and a
//! private key is the 32-byte scalar — matching how the reference driver
//! hands keys across its API. Internally this adapter re-attaches and
//! strips the SEC1 tag byte `p256` expects.
//!
//! The original driver runs these operations as cooperative protothreads
//! because signing/verification can take tens of milliseconds on an
//! 8-bit MCU and must not block the radio duty cycle. On the hosts this
//! crate targets that constraint doesn't apply, so every operation here
//! is a plain, synchronous, fallible call; callers that do need to avoid
//! blocking a reactor should run these behind their own task spawn.

use std::sync::{Mutex, MutexGuard};

use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use p256::{ecdh, EncodedPoint, PublicKey, SecretKey};
use rand_core::CryptoRngCore;
use thiserror::Error;

/// Length in bytes of a raw (untagged) P-256 public key: `x || y`.
pub const PUBLIC_KEY_LEN: usize = 64;
/// Length in bytes of a SEC1-compressed public key: tag byte + `x`.
pub const COMPRESSED_PUBLIC_KEY_LEN: usize = 33;
/// Length in bytes of a P-256 private scalar.
pub const PRIVATE_KEY_LEN: usize = 32;
/// Length in bytes of an ECDSA signature: `r || s`.
pub const SIGNATURE_LEN: usize = 64;
/// Length in bytes of an ECDH shared secret (the peer's affine x-coordinate).
pub const SHARED_SECRET_LEN: usize = 32;

/// Failure of an ECC operation. Driver-specific error codes in the
/// reference API collapse to these three cases.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EccError {
    /// A key, signature, or shared point did not decode to a valid curve
    /// element (off-curve, wrong length, or the point at infinity).
    #[error("ecc: invalid key or point encoding")]
    InvalidEncoding,
    /// Signature verification failed — the hash, signature, and public key
    /// are not a consistent triple.
    #[error("ecc: signature verification failed")]
    VerificationFailed,
    /// The driver-level signing operation failed (e.g. a hazard from
    /// invalid scalar material); never the caller's fault alone.
    #[error("ecc: signing operation failed")]
    SigningFailed,
}

fn public_key_from_raw(raw: &[u8; PUBLIC_KEY_LEN]) -> Result<PublicKey, EccError> {
    let mut tagged = [0u8; 1 + PUBLIC_KEY_LEN];
    tagged[0] = 0x04;
    tagged[1..].copy_from_slice(raw);
    let point = EncodedPoint::from_bytes(tagged).map_err(|_| EccError::InvalidEncoding)?;
    Option::from(PublicKey::from_encoded_point(&point)).ok_or(EccError::InvalidEncoding)
}

fn raw_from_public_key(key: &PublicKey) -> [u8; PUBLIC_KEY_LEN] {
    let encoded = key.to_encoded_point(false);
    let mut raw = [0u8; PUBLIC_KEY_LEN];
    raw.copy_from_slice(&encoded.as_bytes()[1..]);
    raw
}

/// Generates a fresh private/public key pair.
pub fn generate_key_pair(
    rng: &mut impl CryptoRngCore,
) -> ([u8; PRIVATE_KEY_LEN], [u8; PUBLIC_KEY_LEN]) {
    let secret = SecretKey::random(rng);
    let mut private_key = [0u8; PRIVATE_KEY_LEN];
    private_key.copy_from_slice(&secret.to_bytes());
    let public_key = raw_from_public_key(&secret.public_key());
    (private_key, public_key)
}

/// Validates that `public_key` decodes to a point on the curve (and isn't
/// the point at infinity).
pub fn validate_public_key(public_key: &[u8; PUBLIC_KEY_LEN]) -> Result<(), EccError> {
    public_key_from_raw(public_key).map(|_| ())
}

/// Compresses an uncompressed (raw `x || y`) public key per SEC 1.
pub fn compress_public_key(
    public_key: &[u8; PUBLIC_KEY_LEN],
) -> Result<[u8; COMPRESSED_PUBLIC_KEY_LEN], EccError> {
    let key = public_key_from_raw(public_key)?;
    let compressed = key.to_encoded_point(true);
    let mut out = [0u8; COMPRESSED_PUBLIC_KEY_LEN];
    out.copy_from_slice(compressed.as_bytes());
    Ok(out)
}

/// Decompresses a SEC1-compressed public key back to raw `x || y`.
pub fn decompress_public_key(
    compressed_public_key: &[u8; COMPRESSED_PUBLIC_KEY_LEN],
) -> Result<[u8; PUBLIC_KEY_LEN], EccError> {
    let point = EncodedPoint::from_bytes(compressed_public_key).map_err(|_| EccError::InvalidEncoding)?;
    let key: PublicKey =
        Option::from(PublicKey::from_encoded_point(&point)).ok_or(EccError::InvalidEncoding)?;
    Ok(raw_from_public_key(&key))
}

/// Signs a 32-byte message hash, returning a 64-byte `r || s` signature.
///
/// `message_hash` must already be the digest of the message (this is an
/// ECDSA primitive, not a hash-then-sign convenience wrapper) — callers
/// pick their own hash function upstream.
pub fn sign(
    message_hash: &[u8; 32],
    private_key: &[u8; PRIVATE_KEY_LEN],
) -> Result<[u8; SIGNATURE_LEN], EccError> {
    let secret = SecretKey::from_slice(private_key).map_err(|_| EccError::InvalidEncoding)?;
    let signing_key = SigningKey::from(secret);
    let signature: Signature = signing_key
        .sign_prehash(message_hash)
        .map_err(|_| EccError::SigningFailed)?;
    let mut out = [0u8; SIGNATURE_LEN];
    out.copy_from_slice(&signature.to_bytes());
    Ok(out)
}

/// Verifies a 64-byte `r || s` signature over a 32-byte message hash.
pub fn verify(
    signature: &[u8; SIGNATURE_LEN],
    message_hash: &[u8; 32],
    public_key: &[u8; PUBLIC_KEY_LEN],
) -> Result<(), EccError> {
    let key = public_key_from_raw(public_key)?;
    let verifying_key =
        VerifyingKey::from(&key);
    let sig = Signature::from_slice(signature).map_err(|_| EccError::InvalidEncoding)?;
    verifying_key
        .verify_prehash(message_hash, &sig)
        .map_err(|_| EccError::VerificationFailed)
}

/// Derives an ECDH shared secret from the peer's public key and our
/// private key.
///
/// Returns the shared point's raw x-coordinate. Per the reference API's
/// own note: derive symmetric key material from this via a KDF, never
/// use it directly as a key.
pub fn generate_shared_secret(
    public_key: &[u8; PUBLIC_KEY_LEN],
    private_key: &[u8; PRIVATE_KEY_LEN],
) -> Result<[u8; SHARED_SECRET_LEN], EccError> {
    let peer = public_key_from_raw(public_key)?;
    let secret = SecretKey::from_slice(private_key).map_err(|_| EccError::InvalidEncoding)?;
    let shared = ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
    let mut out = [0u8; SHARED_SECRET_LEN];
    out.copy_from_slice(shared.raw_secret_bytes());
    Ok(out)
}

/// Serializes access to the curve engine, the way the reference driver
/// guards its single hardware accelerator with a `process_mutex_t` that
/// callers must lock before `ecc_enable()`.
///
/// A software P-256 implementation has no exclusive hardware resource to
/// protect, so this buys nothing for correctness here — it exists so a
/// caller migrating from the hardware-backed driver keeps the same
/// call shape (`lock()` before use, drop to release) if this adapter is
/// later swapped for one that does serialize real accelerator access.
#[derive(Default)]
pub struct EccEngine {
    mutex: Mutex<()>,
}

impl EccEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the engine for exclusive use, returning a session with every
    /// operation this module exposes. Blocks if another caller currently
    /// holds the lock.
    pub fn lock(&self) -> EccSession<'_> {
        let guard = self.mutex.lock().unwrap_or_else(|poison| poison.into_inner());
        EccSession { _guard: guard }
    }
}

/// An exclusive curve-engine session. Every method forwards to the
/// corresponding free function in this crate; the session exists only to
/// hold the lock for the operation's duration.
pub struct EccSession<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl EccSession<'_> {
    pub fn generate_key_pair(
        &self,
        rng: &mut impl CryptoRngCore,
    ) -> ([u8; PRIVATE_KEY_LEN], [u8; PUBLIC_KEY_LEN]) {
        generate_key_pair(rng)
    }

    pub fn validate_public_key(&self, public_key: &[u8; PUBLIC_KEY_LEN]) -> Result<(), EccError> {
        validate_public_key(public_key)
    }

    pub fn compress_public_key(
        &self,
        public_key: &[u8; PUBLIC_KEY_LEN],
    ) -> Result<[u8; COMPRESSED_PUBLIC_KEY_LEN], EccError> {
        compress_public_key(public_key)
    }

    pub fn decompress_public_key(
        &self,
        compressed_public_key: &[u8; COMPRESSED_PUBLIC_KEY_LEN],
    ) -> Result<[u8; PUBLIC_KEY_LEN], EccError> {
        decompress_public_key(compressed_public_key)
    }

    pub fn sign(
        &self,
        message_hash: &[u8; 32],
        private_key: &[u8; PRIVATE_KEY_LEN],
    ) -> Result<[u8; SIGNATURE_LEN], EccError> {
        sign(message_hash, private_key)
    }

    pub fn verify(
        &self,
        signature: &[u8; SIGNATURE_LEN],
        message_hash: &[u8; 32],
        public_key: &[u8; PUBLIC_KEY_LEN],
    ) -> Result<(), EccError> {
        verify(signature, message_hash, public_key)
    }

    pub fn generate_shared_secret(
        &self,
        public_key: &[u8; PUBLIC_KEY_LEN],
        private_key: &[u8; PRIVATE_KEY_LEN],
    ) -> Result<[u8; SHARED_SECRET_LEN], EccError> {
        generate_shared_secret(public_key, private_key)
    }
}
