// Module declarations
pub mod error;
pub mod intent;
pub mod keys;
pub mod multisig;
pub mod passkey;
pub mod recover;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use error::{CredentialError, KeyError, MultisigError, RecoveryError, StoreError, WalletError};
pub use keys::SecondaryKey;
pub use passkey::{
    AuthenticatorAttachment, PasskeyAssertion, PasskeyProvider, PasskeyProviderOptions,
    SoftwareAuthenticator,
};
pub use session::{Draft, MultisigWallet, SentReceipt, Session, SignedDraft, SingleWallet, TxLifecycle};
pub use store::{PersistedWallet, WalletStore, SCHEMA_VERSION};
