//! Signing digests for Sui intent messages.
//!
//! A Sui signature never covers raw BCS bytes; it covers the blake2b-256
//! hash of `[scope, version, app_id] || bcs_bytes`. Passkey assertions use
//! that hash as the WebAuthn challenge.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use sui_sdk_types as sui;

type Blake2b256 = Blake2b<U32>;

pub const SCOPE_TRANSACTION_DATA: u8 = 0;
pub const SCOPE_PERSONAL_MESSAGE: u8 = 3;

const INTENT_VERSION: u8 = 0;
const APP_ID_SUI: u8 = 0;

pub fn signing_digest(scope: u8, bcs_bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update([scope, INTENT_VERSION, APP_ID_SUI]);
    hasher.update(bcs_bytes);
    hasher.finalize().into()
}

/// Digest a transaction signs over.
pub fn transaction_signing_digest(tx: &sui::Transaction) -> Result<[u8; 32], bcs::Error> {
    let bytes = bcs::to_bytes(tx)?;
    Ok(signing_digest(SCOPE_TRANSACTION_DATA, &bytes))
}

/// Digest a personal message signs over. The message is BCS-wrapped as a
/// byte vector before hashing.
pub fn personal_message_signing_digest(message: &[u8]) -> Result<[u8; 32], bcs::Error> {
    let bytes = bcs::to_bytes(&message.to_vec())?;
    Ok(signing_digest(SCOPE_PERSONAL_MESSAGE, &bytes))
}
