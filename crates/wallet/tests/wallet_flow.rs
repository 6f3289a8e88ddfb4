//! End-to-end wallet flows that stay off the network: create, persist,
//! reload, recover, draft signing and multisig combination.

use sui_sdk_types as sui;

use wallet::multisig;
use wallet::passkey::{
    self, PasskeyProvider, PasskeyProviderOptions, SoftwareAuthenticator,
};
use wallet::recover;
use wallet::session::{Draft, SentReceipt, Session, SignedDraft, SingleWallet, TxLifecycle};
use wallet::store::{PersistedWallet, WalletStore, SCHEMA_VERSION};
use wallet::SecondaryKey;

const SECONDARY_SUIPRIVKEY: &str =
    "suiprivkey1qqg9ex8p8e8fdz2ex5r0muptts3e4zctv8eahdxcrl5vne73szs365yfhkp";

fn new_provider() -> SoftwareAuthenticator {
    SoftwareAuthenticator::ephemeral(PasskeyProviderOptions::new("Sui Passkey Wallet", "localhost"))
}

/// Empty transaction with placeholder gas data; enough to sign.
fn draft_transaction(sender: sui::Address) -> sui::Transaction {
    sui::Transaction {
        kind: sui::TransactionKind::ProgrammableTransaction(sui::ProgrammableTransaction {
            inputs: vec![],
            commands: vec![],
        }),
        sender,
        gas_payment: sui::GasPayment {
            objects: vec![],
            owner: sender,
            price: 1_000,
            budget: 2_000_000,
        },
        expiration: sui::TransactionExpiration::None,
    }
}

#[test]
fn single_wallet_persist_then_reload_reconstructs_the_address() {
    let dir = tempfile::tempdir().unwrap();
    let store = WalletStore::new(dir.path());

    let mut provider = new_provider();
    let public_key = provider.create_credential().unwrap();
    let address = passkey::passkey_address(&public_key);

    store
        .save(&PersistedWallet::new(
            public_key.inner().to_vec(),
            address.to_string(),
            false,
        ))
        .unwrap();

    // Fresh session: rebuild from the persisted record alone.
    let record = store.load().unwrap().expect("record present");
    assert_eq!(record.version, SCHEMA_VERSION);
    assert!(!record.is_multisig);

    let mut key_bytes = [0u8; 33];
    key_bytes.copy_from_slice(&record.public_key);
    let restored_key = sui::Secp256r1PublicKey::new(key_bytes);
    let restored_address = passkey::passkey_address(&restored_key);

    assert_eq!(restored_address, address);
    assert_eq!(restored_address.to_string(), record.address);
}

#[test]
fn multisig_persist_then_reload_reconstructs_the_same_committee_address() {
    let dir = tempfile::tempdir().unwrap();
    let store = WalletStore::new(dir.path());

    let mut provider = new_provider();
    let passkey_pk = provider.create_credential().unwrap();
    let secondary = SecondaryKey::from_suiprivkey(SECONDARY_SUIPRIVKEY).unwrap();

    let committee = multisig::build_committee(&passkey_pk, &secondary.public_key());
    let address = multisig::multisig_address(&committee);

    store
        .save(&PersistedWallet::new(
            passkey_pk.inner().to_vec(),
            address.to_string(),
            true,
        ))
        .unwrap();

    let record = store.load().unwrap().unwrap();
    assert!(record.is_multisig);

    // Reload path: recovered passkey key + the fixed secondary rebuild the
    // exact same multisig address.
    let mut key_bytes = [0u8; 33];
    key_bytes.copy_from_slice(&record.public_key);
    let restored_key = sui::Secp256r1PublicKey::new(key_bytes);
    let restored_committee = multisig::build_committee(&restored_key, &secondary.public_key());

    assert_eq!(multisig::multisig_address(&restored_committee), address);
    assert_eq!(address.to_string(), record.address);
}

#[test]
fn recovered_key_matches_the_created_credential() {
    let mut provider = new_provider();
    let created = provider.create_credential().unwrap();

    let recovered = recover::recover_public_key(
        &mut provider,
        b"passkey wallet recovery challenge one",
        b"passkey wallet recovery challenge two",
    )
    .unwrap();

    assert_eq!(recovered, created);
    assert_eq!(
        passkey::passkey_address(&recovered),
        passkey::passkey_address(&created)
    );
}

#[test]
fn single_wallet_signs_a_draft_with_a_passkey_user_signature() {
    let mut provider = new_provider();
    let public_key = provider.create_credential().unwrap();
    let address = passkey::passkey_address(&public_key);

    let session = Session::Single(SingleWallet {
        passkey_public_key: public_key.clone(),
        address,
    });
    assert_eq!(session.address(), Some(address));

    let tx = draft_transaction(address);
    let signature = passkey::sign_transaction(&mut provider, &public_key, &tx).unwrap();
    assert!(matches!(signature, sui::UserSignature::Passkey(_)));
}

#[test]
fn multisig_wallet_combines_both_partials_over_the_same_draft() {
    let mut provider = new_provider();
    let passkey_pk = provider.create_credential().unwrap();
    let secondary = SecondaryKey::from_suiprivkey(SECONDARY_SUIPRIVKEY).unwrap();
    let secondary_pk = secondary.public_key();

    let committee = multisig::build_committee(&passkey_pk, &secondary_pk);
    let address = multisig::multisig_address(&committee);
    let tx = draft_transaction(address);

    let passkey_partial =
        passkey::sign_transaction_partial(&mut provider, &passkey_pk, &tx).unwrap();
    let secondary_partial = secondary.sign_transaction(&tx).unwrap();

    let combined = multisig::combine(
        &committee,
        &passkey_pk,
        passkey_partial,
        &secondary_pk,
        secondary_partial,
    )
    .unwrap();
    assert!(matches!(combined, sui::UserSignature::Multisig(_)));

    // The combined signature serializes with the multisig scheme flag.
    let bytes = combined.to_bytes();
    assert_eq!(bytes[0], 0x03);
}

#[test]
fn lifecycle_walks_draft_sign_send_with_a_real_signature() {
    let mut provider = new_provider();
    let public_key = provider.create_credential().unwrap();
    let address = passkey::passkey_address(&public_key);

    // Idle: nothing to sign, nothing to send.
    let mut lifecycle = TxLifecycle::default();
    assert!(lifecycle.draft().is_none());
    assert!(lifecycle.signed().is_none());

    lifecycle.set_draft(Draft {
        tx: draft_transaction(address),
        bytes: vec![1],
        base64: "draft".to_string(),
    });
    let draft = lifecycle.draft().expect("draft present").clone();
    assert!(lifecycle.signed().is_none());

    let signature = passkey::sign_transaction(&mut provider, &public_key, &draft.tx).unwrap();
    lifecycle.set_signed(SignedDraft {
        draft,
        signature,
        signature_base64: "sig".to_string(),
    });
    // A signed draft can still be re-signed.
    assert!(lifecycle.draft().is_some());
    assert!(lifecycle.signed().is_some());

    lifecycle.set_sent(SentReceipt {
        digest: "digest".to_string(),
        explorer_url: "url".to_string(),
    });
    assert!(lifecycle.receipt().is_some());
    assert!(lifecycle.draft().is_none());
    assert!(lifecycle.signed().is_none());

    // Re-drafting discards the receipt.
    lifecycle.set_draft(Draft {
        tx: draft_transaction(address),
        bytes: vec![2],
        base64: "draft-2".to_string(),
    });
    assert!(lifecycle.receipt().is_none());
    assert_eq!(lifecycle.draft().unwrap().bytes, vec![2]);
}
