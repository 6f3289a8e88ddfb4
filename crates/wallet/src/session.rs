//! Typed session and transaction lifecycle state.
//!
//! The session is a tagged union rather than a cluster of nullable fields,
//! and the transaction lifecycle only hands out a draft to sign or a signed
//! draft to send, so "sign without a draft" and "send without a signature"
//! cannot be expressed.

use sui_sdk_types as sui;

#[derive(Debug, Clone)]
pub struct SingleWallet {
    pub passkey_public_key: sui::Secp256r1PublicKey,
    pub address: sui::Address,
}

#[derive(Debug, Clone)]
pub struct MultisigWallet {
    pub passkey_public_key: sui::Secp256r1PublicKey,
    pub secondary_public_key: sui::Ed25519PublicKey,
    pub committee: sui::MultisigCommittee,
    pub address: sui::Address,
}

#[derive(Debug, Clone)]
pub enum Session {
    Uninitialized,
    Single(SingleWallet),
    Multisig(MultisigWallet),
}

impl Session {
    pub fn address(&self) -> Option<sui::Address> {
        match self {
            Session::Uninitialized => None,
            Session::Single(w) => Some(w.address),
            Session::Multisig(w) => Some(w.address),
        }
    }

    pub fn passkey_public_key(&self) -> Option<&sui::Secp256r1PublicKey> {
        match self {
            Session::Uninitialized => None,
            Session::Single(w) => Some(&w.passkey_public_key),
            Session::Multisig(w) => Some(&w.passkey_public_key),
        }
    }

    pub fn is_multisig(&self) -> bool {
        matches!(self, Session::Multisig(_))
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Session::Uninitialized => "no wallet",
            Session::Single(_) => "single passkey wallet",
            Session::Multisig(_) => "2-of-2 multisig wallet",
        }
    }
}

/// An unsigned serialized transaction.
#[derive(Debug, Clone)]
pub struct Draft {
    pub tx: sui::Transaction,
    pub bytes: Vec<u8>,
    pub base64: String,
}

/// A draft plus the signature that covers exactly those bytes.
#[derive(Debug, Clone)]
pub struct SignedDraft {
    pub draft: Draft,
    pub signature: sui::UserSignature,
    pub signature_base64: String,
}

/// Result of a submitted transaction.
#[derive(Debug, Clone)]
pub struct SentReceipt {
    pub digest: String,
    pub explorer_url: String,
}

#[derive(Debug, Clone, Default)]
pub enum TxLifecycle {
    #[default]
    Idle,
    Drafted(Draft),
    Signed(SignedDraft),
    Sent(SentReceipt),
}

impl TxLifecycle {
    /// A new draft discards any forward state (signature, receipt).
    pub fn set_draft(&mut self, draft: Draft) {
        *self = TxLifecycle::Drafted(draft);
    }

    /// Draft available for signing. A signed draft can be re-signed.
    pub fn draft(&self) -> Option<&Draft> {
        match self {
            TxLifecycle::Drafted(d) => Some(d),
            TxLifecycle::Signed(s) => Some(&s.draft),
            _ => None,
        }
    }

    pub fn set_signed(&mut self, signed: SignedDraft) {
        *self = TxLifecycle::Signed(signed);
    }

    pub fn signed(&self) -> Option<&SignedDraft> {
        match self {
            TxLifecycle::Signed(s) => Some(s),
            _ => None,
        }
    }

    pub fn set_sent(&mut self, receipt: SentReceipt) {
        *self = TxLifecycle::Sent(receipt);
    }

    pub fn receipt(&self) -> Option<&SentReceipt> {
        match self {
            TxLifecycle::Sent(r) => Some(r),
            _ => None,
        }
    }

    /// Clear everything, e.g. when the active wallet changes.
    pub fn reset(&mut self) {
        *self = TxLifecycle::Idle;
    }
}


/// Empty transaction with placeholder gas data, enough for tests that only
/// need something signable.
#[cfg(test)]
pub(crate) fn test_transaction() -> sui::Transaction {
    sui::Transaction {
        kind: sui::TransactionKind::ProgrammableTransaction(sui::ProgrammableTransaction {
            inputs: vec![],
            commands: vec![],
        }),
        sender: sui::Address::ZERO,
        gas_payment: sui::GasPayment {
            objects: vec![],
            owner: sui::Address::ZERO,
            price: 1_000,
            budget: 2_000_000,
        },
        expiration: sui::TransactionExpiration::None,
    }
}
