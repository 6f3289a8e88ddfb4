use thiserror::Error;

use crate::store::SCHEMA_VERSION;

/// Wallet errors
#[derive(Error, Debug)]
pub enum WalletError {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Recovery(#[from] RecoveryError),

    #[error(transparent)]
    Multisig(#[from] MultisigError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl From<bcs::Error> for WalletError {
    fn from(err: bcs::Error) -> Self {
        WalletError::Encoding(err.to_string())
    }
}

/// Failures talking to the passkey provider: the user declined, the
/// platform has no authenticator, or an assertion could not be produced.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("No passkey credential present; create or load a wallet first")]
    NoCredential,

    #[error("Credential creation failed: {0}")]
    Creation(String),

    #[error("Assertion failed: {0}")]
    Assertion(String),
}

/// Failures of the two-challenge public key recovery flow.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecoveryError {
    #[error("recovery challenge messages must differ")]
    IdenticalChallenges,

    #[error("no candidate public key is consistent with both challenge signatures")]
    NoCandidate,

    #[error("recovery is ambiguous: {0} candidate keys remain after intersecting both challenge sets")]
    Ambiguous(usize),
}

#[derive(Error, Debug)]
pub enum MultisigError {
    #[error("multisig committee must have exactly 2 members, got {0}")]
    WrongCommittee(usize),

    #[error("partial signature at position {index} does not match the committee member at that position")]
    MemberMismatch { index: usize },
}

#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Failed to decode private key: {0}")]
    Decode(String),

    #[error("unsupported key scheme flag; only ed25519 supported")]
    UnsupportedScheme,

    #[error("Signing failed: {0}")]
    Signing(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Wallet store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Wallet record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported wallet record version {0}; expected {SCHEMA_VERSION}")]
    UnsupportedVersion(u32),
}
