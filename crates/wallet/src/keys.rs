//! The fixed secondary Ed25519 key used as the second multisig member.

use sui_crypto::ed25519::Ed25519PrivateKey;
use sui_crypto::SuiSigner;
use sui_sdk_types as sui;

use crate::error::KeyError;

#[derive(Debug)]
pub struct SecondaryKey {
    key: Ed25519PrivateKey,
}

impl SecondaryKey {
    /// Decode a bech32 `suiprivkey` string (`flag || 32-byte secret`).
    pub fn from_suiprivkey(encoded: &str) -> Result<Self, KeyError> {
        let (hrp, data, _variant) =
            bech32::decode(encoded).map_err(|e| KeyError::Decode(e.to_string()))?;
        if hrp != "suiprivkey" {
            return Err(KeyError::Decode("invalid bech32 hrp".to_string()));
        }
        let bytes: Vec<u8> = <Vec<u8> as bech32::FromBase32>::from_base32(&data)
            .map_err(|e| KeyError::Decode(e.to_string()))?;
        if bytes.len() != 33 {
            return Err(KeyError::Decode(
                "bech32 payload must be 33 bytes (flag || key)".to_string(),
            ));
        }
        if bytes[0] != 0x00 {
            return Err(KeyError::UnsupportedScheme);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes[1..]);
        Ok(Self {
            key: Ed25519PrivateKey::new(arr),
        })
    }

    pub fn public_key(&self) -> sui::Ed25519PublicKey {
        self.key.public_key()
    }

    /// Sign a transaction and return the bare Ed25519 signature for use as
    /// a multisig partial.
    pub fn sign_transaction(&self, tx: &sui::Transaction) -> Result<sui::Ed25519Signature, KeyError> {
        let user_sig = self
            .key
            .sign_transaction(tx)
            .map_err(|e| KeyError::Signing(e.to_string()))?;
        match user_sig {
            sui::UserSignature::Simple(sui::SimpleSignature::Ed25519 { signature, .. }) => {
                Ok(signature)
            }
            _ => Err(KeyError::Signing(
                "ed25519 signer produced a non-ed25519 signature".to_string(),
            )),
        }
    }
}
