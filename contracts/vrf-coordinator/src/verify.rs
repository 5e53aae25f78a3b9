use drand_verify::Pubkey;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// drand quicknet public key (G2, 96 bytes), hex encoded.
/// Scheme: bls-unchained-g1-rfc9380
pub const QUICKNET_PK_HEX: &str = "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a";

#[derive(Error, Debug, PartialEq)]
pub enum VerifyError {
    #[error("invalid pubkey length (expected 96 bytes, got {0})")]
    InvalidPubkeyLength(usize),

    #[error("invalid pubkey (failed to parse G2 point)")]
    InvalidPubkey,

    #[error("verification failed: {0}")]
    Malformed(String),

    #[error("signature does not match round {round}")]
    BadSignature { round: u64 },
}

/// Beacon randomness is sha256 of the round signature.
pub fn beacon_randomness(signature: &[u8]) -> [u8; 32] {
    Sha256::digest(signature).into()
}

/// Check a quicknet beacon signature for `round` and return its randomness.
///
/// Quicknet is unchained, so the previous signature is always empty.
pub fn verify_quicknet_beacon(
    pubkey_bytes: &[u8],
    round: u64,
    signature: &[u8],
) -> Result<[u8; 32], VerifyError> {
    let pk_fixed: [u8; 96] = pubkey_bytes
        .try_into()
        .map_err(|_| VerifyError::InvalidPubkeyLength(pubkey_bytes.len()))?;

    let pk = drand_verify::G2PubkeyRfc::from_fixed(pk_fixed)
        .map_err(|_| VerifyError::InvalidPubkey)?;

    let valid = pk
        .verify(round, &[], signature)
        .map_err(|e| VerifyError::Malformed(format!("{:?}", e)))?;
    if !valid {
        return Err(VerifyError::BadSignature { round });
    }

    Ok(beacon_randomness(signature))
}
