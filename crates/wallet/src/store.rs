//! Single-slot persisted wallet record.
//!
//! One JSON file holding `{ version, public_key, address, is_multisig }`,
//! last-write-wins. The schema version field lets the format migrate later.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::StoreError;

pub const SCHEMA_VERSION: u32 = 1;

const WALLET_FILE: &str = "wallet.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedWallet {
    pub version: u32,
    pub public_key: Vec<u8>,
    pub address: String,
    pub is_multisig: bool,
}

impl PersistedWallet {
    pub fn new(public_key: Vec<u8>, address: String, is_multisig: bool) -> Self {
        Self {
            version: SCHEMA_VERSION,
            public_key,
            address,
            is_multisig,
        }
    }
}

pub struct WalletStore {
    path: PathBuf,
}

impl WalletStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            path: dir.as_ref().join(WALLET_FILE),
        }
    }

    /// Store under `PASSKEY_WALLET_DIR`, or `~/.sui-passkey-wallet`.
    pub fn from_env() -> Self {
        let dir = std::env::var("PASSKEY_WALLET_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".sui-passkey-wallet")
            });
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Overwrite the slot with this record.
    pub fn save(&self, record: &PersistedWallet) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, json)?;
        info!("Persisted wallet record for {} to {:?}", record.address, self.path);
        Ok(())
    }

    /// Read the slot. `None` when no wallet was ever persisted.
    pub fn load(&self) -> Result<Option<PersistedWallet>, StoreError> {
        if !self.path.exists() {
            debug!("No wallet record at {:?}", self.path);
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let record: PersistedWallet = serde_json::from_str(&contents)?;
        if record.version != SCHEMA_VERSION {
            return Err(StoreError::UnsupportedVersion(record.version));
        }
        Ok(Some(record))
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
