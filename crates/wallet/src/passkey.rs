//! Passkey (WebAuthn) provider interface and a software authenticator.
//!
//! The wallet only ever talks to [`PasskeyProvider`]: create a credential,
//! ask for an assertion over a challenge. A browser build would back this
//! with the platform authenticator; here the shipped implementation is a
//! software authenticator holding a secp256r1 key, producing the same
//! assertion shape a platform passkey would (authenticator data, collected
//! client data JSON, low-S ECDSA signature).

use base64ct::{Base64UrlUnpadded, Encoding};
use p256::ecdsa::signature::Signer as _;
use p256::ecdsa::{Signature as P256Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::path::PathBuf;
use sui_sdk_types as sui;
use tracing::{debug, info};

use crate::error::CredentialError;
use crate::intent::{personal_message_signing_digest, transaction_signing_digest};

/// Flags: user present (0x01) and user verified (0x04).
const AUTHENTICATOR_FLAGS: u8 = 0x05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthenticatorAttachment {
    Platform,
    CrossPlatform,
}

impl AuthenticatorAttachment {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthenticatorAttachment::Platform => "platform",
            AuthenticatorAttachment::CrossPlatform => "cross-platform",
        }
    }
}

/// Relying-party parameters for credential creation and assertions.
#[derive(Debug, Clone)]
pub struct PasskeyProviderOptions {
    pub rp_name: String,
    pub rp_id: String,
    pub origin: String,
    pub attachment: AuthenticatorAttachment,
}

impl PasskeyProviderOptions {
    pub fn new(rp_name: &str, rp_id: &str) -> Self {
        Self {
            rp_name: rp_name.to_string(),
            rp_id: rp_id.to_string(),
            origin: format!("https://{}", rp_id),
            attachment: AuthenticatorAttachment::Platform,
        }
    }

    /// Relying party from `PASSKEY_RP_ID`, defaulting to `localhost`.
    pub fn from_env() -> Self {
        let rp_id = std::env::var("PASSKEY_RP_ID").unwrap_or_else(|_| "localhost".to_string());
        Self::new("Sui Passkey Wallet", &rp_id)
    }
}

/// One WebAuthn authentication assertion. The public key is deliberately
/// absent: assertions do not carry it, which is why wallet recovery exists.
#[derive(Debug, Clone)]
pub struct PasskeyAssertion {
    pub authenticator_data: Vec<u8>,
    pub client_data_json: String,
    pub signature: P256Signature,
}

impl PasskeyAssertion {
    /// The byte string the authenticator actually signed:
    /// `authenticator_data || sha256(client_data_json)`.
    pub fn signed_payload(&self) -> Vec<u8> {
        let cdj_hash = Sha256::digest(self.client_data_json.as_bytes());
        let mut payload = Vec::with_capacity(self.authenticator_data.len() + 32);
        payload.extend_from_slice(&self.authenticator_data);
        payload.extend_from_slice(&cdj_hash);
        payload
    }
}

/// External passkey provider: credential creation and assertion.
pub trait PasskeyProvider {
    /// Create a fresh credential and return its secp256r1 public key.
    fn create_credential(&mut self) -> Result<sui::Secp256r1PublicKey, CredentialError>;

    /// Public key of the resident credential, if one exists.
    fn public_key(&self) -> Option<sui::Secp256r1PublicKey>;

    /// Produce an assertion over a 32-byte challenge.
    fn get_assertion(&mut self, challenge: &[u8; 32]) -> Result<PasskeyAssertion, CredentialError>;
}

#[derive(Serialize, Deserialize)]
struct StoredCredential {
    rp_id: String,
    attachment: AuthenticatorAttachment,
    secret_key: String,
    sign_count: u32,
}

/// In-process authenticator with an optional backing file, standing in for
/// the platform authenticator's resident credential.
pub struct SoftwareAuthenticator {
    options: PasskeyProviderOptions,
    credential: Option<SigningKey>,
    sign_count: u32,
    backing: Option<PathBuf>,
}

impl SoftwareAuthenticator {
    /// Credential lives only as long as the process.
    pub fn ephemeral(options: PasskeyProviderOptions) -> Self {
        Self {
            options,
            credential: None,
            sign_count: 0,
            backing: None,
        }
    }

    /// Credential persisted to `path`, loaded back if present, so a wallet
    /// can be recovered across runs the way a platform passkey survives a
    /// page reload.
    pub fn with_backing_file(
        options: PasskeyProviderOptions,
        path: PathBuf,
    ) -> Result<Self, CredentialError> {
        let mut authenticator = Self {
            options,
            credential: None,
            sign_count: 0,
            backing: Some(path.clone()),
        };
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| CredentialError::Creation(e.to_string()))?;
            let stored: StoredCredential = serde_json::from_str(&contents)
                .map_err(|e| CredentialError::Creation(e.to_string()))?;
            if stored.rp_id == authenticator.options.rp_id {
                let sk_bytes = hex::decode(&stored.secret_key)
                    .map_err(|e| CredentialError::Creation(e.to_string()))?;
                let sk = SigningKey::from_slice(&sk_bytes)
                    .map_err(|e| CredentialError::Creation(e.to_string()))?;
                authenticator.credential = Some(sk);
                authenticator.sign_count = stored.sign_count;
                // Attachment is a property of the credential, not the caller.
                authenticator.options.attachment = stored.attachment;
                debug!(
                    "Loaded resident {} credential for rp_id={}",
                    stored.attachment.as_str(),
                    stored.rp_id
                );
            }
        }
        Ok(authenticator)
    }

    fn persist(&self) -> Result<(), CredentialError> {
        let (Some(path), Some(sk)) = (&self.backing, &self.credential) else {
            return Ok(());
        };
        let stored = StoredCredential {
            rp_id: self.options.rp_id.clone(),
            attachment: self.options.attachment,
            secret_key: hex::encode(sk.to_bytes()),
            sign_count: self.sign_count,
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| CredentialError::Creation(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CredentialError::Creation(e.to_string()))?;
        }
        std::fs::write(path, json).map_err(|e| CredentialError::Creation(e.to_string()))?;
        Ok(())
    }

    fn authenticator_data(&self) -> Vec<u8> {
        let rp_id_hash = Sha256::digest(self.options.rp_id.as_bytes());
        let mut data = Vec::with_capacity(37);
        data.extend_from_slice(&rp_id_hash);
        data.push(AUTHENTICATOR_FLAGS);
        data.extend_from_slice(&self.sign_count.to_be_bytes());
        data
    }

    fn client_data_json(&self, challenge: &[u8; 32]) -> String {
        serde_json::json!({
            "type": "webauthn.get",
            "challenge": Base64UrlUnpadded::encode_string(challenge),
            "origin": self.options.origin,
            "crossOrigin": false,
        })
        .to_string()
    }
}

impl PasskeyProvider for SoftwareAuthenticator {
    fn create_credential(&mut self) -> Result<sui::Secp256r1PublicKey, CredentialError> {
        let sk = SigningKey::random(&mut OsRng);
        let public_key = secp256r1_public_key(sk.verifying_key());
        self.credential = Some(sk);
        self.sign_count = 0;
        self.persist()?;
        info!(
            "Created {} passkey credential for rp_id={}",
            self.options.attachment.as_str(),
            self.options.rp_id
        );
        Ok(public_key)
    }

    fn public_key(&self) -> Option<sui::Secp256r1PublicKey> {
        self.credential
            .as_ref()
            .map(|sk| secp256r1_public_key(sk.verifying_key()))
    }

    fn get_assertion(&mut self, challenge: &[u8; 32]) -> Result<PasskeyAssertion, CredentialError> {
        let sk = self.credential.as_ref().ok_or(CredentialError::NoCredential)?;

        self.sign_count += 1;
        let authenticator_data = self.authenticator_data();
        let client_data_json = self.client_data_json(challenge);

        let cdj_hash = Sha256::digest(client_data_json.as_bytes());
        let mut payload = Vec::with_capacity(authenticator_data.len() + 32);
        payload.extend_from_slice(&authenticator_data);
        payload.extend_from_slice(&cdj_hash);

        let signature: P256Signature = sk.sign(&payload);
        let signature = signature.normalize_s().unwrap_or(signature);

        self.persist()?;
        Ok(PasskeyAssertion {
            authenticator_data,
            client_data_json,
            signature,
        })
    }
}

/// Compress a p256 verifying key into the SDK's 33-byte public key type.
pub fn secp256r1_public_key(vk: &VerifyingKey) -> sui::Secp256r1PublicKey {
    let point = vk.to_encoded_point(true);
    let mut bytes = [0u8; 33];
    bytes.copy_from_slice(point.as_bytes());
    sui::Secp256r1PublicKey::new(bytes)
}

/// Derive the single-wallet address for a passkey public key (flag 0x06).
pub fn passkey_address(public_key: &sui::Secp256r1PublicKey) -> sui::Address {
    sui::PasskeyPublicKey::new(public_key.clone()).derive_address()
}

/// Wrap a raw assertion and the credential's public key into the SDK's
/// passkey authenticator, ready for submission or multisig aggregation.
pub fn authenticator_from_assertion(
    assertion: &PasskeyAssertion,
    public_key: &sui::Secp256r1PublicKey,
) -> Result<sui::PasskeyAuthenticator, CredentialError> {
    let mut sig_bytes = [0u8; 64];
    sig_bytes.copy_from_slice(&assertion.signature.to_bytes());
    let simple = sui::SimpleSignature::Secp256r1 {
        signature: sui::Secp256r1Signature::new(sig_bytes),
        public_key: public_key.clone(),
    };
    sui::PasskeyAuthenticator::new(
        assertion.authenticator_data.clone(),
        assertion.client_data_json.clone(),
        simple,
    )
    .ok_or_else(|| CredentialError::Assertion("assertion rejected by authenticator encoder".into()))
}

/// Sign a transaction with the passkey and wrap it as a chain-submittable
/// user signature.
pub fn sign_transaction(
    provider: &mut dyn PasskeyProvider,
    public_key: &sui::Secp256r1PublicKey,
    tx: &sui::Transaction,
) -> Result<sui::UserSignature, crate::error::WalletError> {
    let authenticator = sign_transaction_partial(provider, public_key, tx)?;
    // Same assertion either way; only the envelope differs.
    Ok(sui::UserSignature::Passkey(authenticator))
}

/// Sign a transaction with the passkey, keeping the bare authenticator for
/// use as a multisig partial signature.
pub fn sign_transaction_partial(
    provider: &mut dyn PasskeyProvider,
    public_key: &sui::Secp256r1PublicKey,
    tx: &sui::Transaction,
) -> Result<sui::PasskeyAuthenticator, crate::error::WalletError> {
    let digest = transaction_signing_digest(tx)?;
    let assertion = provider.get_assertion(&digest)?;
    Ok(authenticator_from_assertion(&assertion, public_key)?)
}

/// Assertion over a personal message; recovery signs two of these.
pub fn sign_personal_message(
    provider: &mut dyn PasskeyProvider,
    message: &[u8],
) -> Result<PasskeyAssertion, crate::error::WalletError> {
    let digest = personal_message_signing_digest(message)?;
    Ok(provider.get_assertion(&digest)?)
}
