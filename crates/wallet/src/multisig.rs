//! 2-of-2 multisig: a passkey member plus the fixed Ed25519 member.
//!
//! Member order is load-bearing: the aggregated signature must list
//! partials in committee member order, so combination rejects partials
//! that do not line up with the member they claim to be.

use sui_sdk_types as sui;
use tracing::debug;

use crate::error::MultisigError;

pub const MULTISIG_THRESHOLD: u16 = 2;
pub const MEMBER_WEIGHT: u8 = 1;

/// Both members signed.
const FULL_BITMAP: u16 = 0b0000_0011;

/// Committee of [passkey, ed25519], weight 1 each, threshold 2.
pub fn build_committee(
    passkey_public_key: &sui::Secp256r1PublicKey,
    secondary_public_key: &sui::Ed25519PublicKey,
) -> sui::MultisigCommittee {
    let members = vec![
        sui::MultisigMember::new(
            sui::MultisigMemberPublicKey::Passkey(sui::PasskeyPublicKey::new(
                passkey_public_key.clone(),
            )),
            MEMBER_WEIGHT,
        ),
        sui::MultisigMember::new(
            sui::MultisigMemberPublicKey::Ed25519(secondary_public_key.clone()),
            MEMBER_WEIGHT,
        ),
    ];
    sui::MultisigCommittee::new(members, MULTISIG_THRESHOLD)
}

pub fn multisig_address(committee: &sui::MultisigCommittee) -> sui::Address {
    committee.derive_address()
}

/// Combine the two partial signatures into one aggregated signature, in
/// committee member order. Each partial is checked against the member at
/// its position before aggregation.
pub fn combine(
    committee: &sui::MultisigCommittee,
    passkey_public_key: &sui::Secp256r1PublicKey,
    passkey_partial: sui::PasskeyAuthenticator,
    secondary_public_key: &sui::Ed25519PublicKey,
    secondary_partial: sui::Ed25519Signature,
) -> Result<sui::UserSignature, MultisigError> {
    let members = committee.members();
    if members.len() != 2 {
        return Err(MultisigError::WrongCommittee(members.len()));
    }

    let expected_first = sui::MultisigMemberPublicKey::Passkey(sui::PasskeyPublicKey::new(
        passkey_public_key.clone(),
    ));
    if members[0].public_key() != &expected_first {
        return Err(MultisigError::MemberMismatch { index: 0 });
    }

    let expected_second = sui::MultisigMemberPublicKey::Ed25519(secondary_public_key.clone());
    if members[1].public_key() != &expected_second {
        return Err(MultisigError::MemberMismatch { index: 1 });
    }

    let signatures = vec![
        sui::MultisigMemberSignature::Passkey(passkey_partial),
        sui::MultisigMemberSignature::Ed25519(secondary_partial),
    ];
    debug!("Combining 2 partial signatures, bitmap={:#06b}", FULL_BITMAP);

    let aggregated =
        sui::MultisigAggregatedSignature::new(committee.clone(), signatures, FULL_BITMAP);
    Ok(sui::UserSignature::Multisig(aggregated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SecondaryKey;
    use crate::passkey::{PasskeyProvider, PasskeyProviderOptions, SoftwareAuthenticator};

    const TEST_KEY: &str = "suiprivkey1qqg9ex8p8e8fdz2ex5r0muptts3e4zctv8eahdxcrl5vne73szs365yfhkp";

    fn member_keys() -> (sui::Secp256r1PublicKey, sui::Ed25519PublicKey) {
        let mut auth =
            SoftwareAuthenticator::ephemeral(PasskeyProviderOptions::new("Test RP", "localhost"));
        let passkey_pk = auth.create_credential().unwrap();
        let secondary = SecondaryKey::from_suiprivkey(TEST_KEY).unwrap();
        (passkey_pk, secondary.public_key())
    }

    #[test]
    fn committee_has_two_weight_one_members_and_threshold_two() {
        let (passkey_pk, secondary_pk) = member_keys();
        let committee = build_committee(&passkey_pk, &secondary_pk);

        assert_eq!(committee.members().len(), 2);
        assert_eq!(committee.threshold(), MULTISIG_THRESHOLD);
        assert!(committee.members().iter().all(|m| m.weight() == MEMBER_WEIGHT));
    }

    #[test]
    fn multisig_address_differs_from_member_addresses() {
        let (passkey_pk, secondary_pk) = member_keys();
        let committee = build_committee(&passkey_pk, &secondary_pk);
        let address = multisig_address(&committee);

        assert_ne!(address, crate::passkey::passkey_address(&passkey_pk));
        assert_ne!(address, secondary_pk.derive_address());
    }

    #[test]
    fn member_order_changes_the_address() {
        let (passkey_pk, secondary_pk) = member_keys();
        let committee = build_committee(&passkey_pk, &secondary_pk);

        let swapped = sui::MultisigCommittee::new(
            vec![
                sui::MultisigMember::new(
                    sui::MultisigMemberPublicKey::Ed25519(secondary_pk.clone()),
                    MEMBER_WEIGHT,
                ),
                sui::MultisigMember::new(
                    sui::MultisigMemberPublicKey::Passkey(sui::PasskeyPublicKey::new(
                        passkey_pk.clone(),
                    )),
                    MEMBER_WEIGHT,
                ),
            ],
            MULTISIG_THRESHOLD,
        );

        assert_ne!(multisig_address(&committee), multisig_address(&swapped));
    }

    #[test]
    fn combine_rejects_a_partial_from_a_foreign_credential() {
        let (passkey_pk, secondary_pk) = member_keys();
        let committee = build_committee(&passkey_pk, &secondary_pk);

        // Partial produced by a different passkey credential, passed off as
        // the first member.
        let mut other_auth =
            SoftwareAuthenticator::ephemeral(PasskeyProviderOptions::new("Test RP", "localhost"));
        let other_passkey_pk = other_auth.create_credential().unwrap();
        let assertion = other_auth.get_assertion(&[5u8; 32]).unwrap();
        let partial =
            crate::passkey::authenticator_from_assertion(&assertion, &other_passkey_pk).unwrap();

        let placeholder_sig = sui::Ed25519Signature::new([0u8; 64]);
        let err = combine(
            &committee,
            &other_passkey_pk,
            partial,
            &secondary_pk,
            placeholder_sig,
        )
        .unwrap_err();
        assert!(matches!(err, MultisigError::MemberMismatch { index: 0 }));
    }

    #[test]
    fn combine_accepts_partials_in_member_order() {
        let mut auth =
            SoftwareAuthenticator::ephemeral(PasskeyProviderOptions::new("Test RP", "localhost"));
        let passkey_pk = auth.create_credential().unwrap();
        let secondary = SecondaryKey::from_suiprivkey(TEST_KEY).unwrap();
        let secondary_pk = secondary.public_key();
        let committee = build_committee(&passkey_pk, &secondary_pk);

        let assertion = auth.get_assertion(&[9u8; 32]).unwrap();
        let partial =
            crate::passkey::authenticator_from_assertion(&assertion, &passkey_pk).unwrap();
        let placeholder_sig = sui::Ed25519Signature::new([1u8; 64]);

        let combined = combine(&committee, &passkey_pk, partial, &secondary_pk, placeholder_sig)
            .unwrap();
        assert!(matches!(combined, sui::UserSignature::Multisig(_)));
    }
}
