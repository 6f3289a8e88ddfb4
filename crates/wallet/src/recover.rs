//! Public key recovery from authentication assertions.
//!
//! A WebAuthn assertion does not reveal which public key produced it; an
//! ECDSA signature is consistent with up to four candidate keys. Signing
//! two distinct challenges and intersecting the candidate sets narrows
//! that to the true key in practice. The intersection is never allowed to
//! silently resolve: anything other than a singleton is an explicit error,
//! which callers may retry after narrowing candidates with on-chain data.

use ecdsa::RecoveryId;
use p256::ecdsa::VerifyingKey;
use sui_sdk_types as sui;
use tracing::debug;

use crate::error::{RecoveryError, WalletError};
use crate::passkey::{secp256r1_public_key, sign_personal_message, PasskeyAssertion, PasskeyProvider};

/// All public keys whose signature over this assertion's payload would be
/// valid. At most four.
pub fn candidates_from_assertion(assertion: &PasskeyAssertion) -> Vec<sui::Secp256r1PublicKey> {
    let payload = assertion.signed_payload();
    let mut candidates = Vec::new();
    for id in 0u8..4 {
        let Some(recovery_id) = RecoveryId::from_byte(id) else {
            continue;
        };
        if let Ok(vk) = VerifyingKey::recover_from_msg(&payload, &assertion.signature, recovery_id) {
            let candidate = secp256r1_public_key(&vk);
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }
    debug!("Recovered {} candidate keys from assertion", candidates.len());
    candidates
}

pub fn intersect_candidates(
    a: &[sui::Secp256r1PublicKey],
    b: &[sui::Secp256r1PublicKey],
) -> Vec<sui::Secp256r1PublicKey> {
    a.iter().filter(|k| b.contains(k)).cloned().collect()
}

/// Collapse a candidate set to the one true key, or say why it can't.
pub fn resolve_unique(
    mut candidates: Vec<sui::Secp256r1PublicKey>,
) -> Result<sui::Secp256r1PublicKey, RecoveryError> {
    match candidates.len() {
        0 => Err(RecoveryError::NoCandidate),
        1 => Ok(candidates.remove(0)),
        n => Err(RecoveryError::Ambiguous(n)),
    }
}

/// Candidate keys consistent with assertions over both challenge messages.
pub fn intersection_from_challenges(
    provider: &mut dyn PasskeyProvider,
    message_a: &[u8],
    message_b: &[u8],
) -> Result<Vec<sui::Secp256r1PublicKey>, WalletError> {
    if message_a == message_b {
        return Err(RecoveryError::IdenticalChallenges.into());
    }
    let assertion_a = sign_personal_message(provider, message_a)?;
    let assertion_b = sign_personal_message(provider, message_b)?;
    let candidates_a = candidates_from_assertion(&assertion_a);
    let candidates_b = candidates_from_assertion(&assertion_b);
    Ok(intersect_candidates(&candidates_a, &candidates_b))
}

/// Two-challenge recovery: sign both messages, intersect, demand a
/// singleton.
pub fn recover_public_key(
    provider: &mut dyn PasskeyProvider,
    message_a: &[u8],
    message_b: &[u8],
) -> Result<sui::Secp256r1PublicKey, WalletError> {
    let intersection = intersection_from_challenges(provider, message_a, message_b)?;
    Ok(resolve_unique(intersection).map_err(WalletError::from)?)
}
