//! Wallet controller: sequences UI intents into SDK and chain calls and
//! owns the session state. One command runs at a time; each either moves
//! the session/lifecycle forward or leaves it exactly as it was.

use anyhow::{bail, Context, Result};
use sui_sdk_types as sdk;
use tracing::{info, warn};

use sui::{balance, chain, client::Network, faucet, get_client, tx};
use wallet::error::RecoveryError;
use wallet::multisig;
use wallet::passkey::{self, PasskeyProvider, SoftwareAuthenticator};
use wallet::recover;
use wallet::session::{
    Draft, MultisigWallet, SentReceipt, Session, SignedDraft, SingleWallet, TxLifecycle,
};
use wallet::store::{PersistedWallet, WalletStore};
use wallet::SecondaryKey;

/// Fixed gas placeholders for the empty draft; not configurable.
const GAS_PRICE: u64 = 1_000;
const GAS_BUDGET: u64 = 2_000_000;

/// Two distinct challenges for public key recovery.
const RECOVERY_CHALLENGE_A: &[u8] = b"passkey wallet recovery challenge one";
const RECOVERY_CHALLENGE_B: &[u8] = b"passkey wallet recovery challenge two";

/// The fixed second multisig member. A throwaway devnet key; every wallet
/// pairs its passkey with this same secondary keypair.
const SECONDARY_SUIPRIVKEY: &str =
    "suiprivkey1qqg9ex8p8e8fdz2ex5r0muptts3e4zctv8eahdxcrl5vne73szs365yfhkp";

pub struct WalletApp {
    network: Network,
    provider: SoftwareAuthenticator,
    secondary: SecondaryKey,
    store: WalletStore,
    session: Session,
    lifecycle: TxLifecycle,
    balance: Option<u64>,
}

impl WalletApp {
    pub fn new() -> Result<Self> {
        let network = Network::from_env();
        let store = WalletStore::from_env();
        let credential_path = store.dir().join("credential.json");
        let provider = SoftwareAuthenticator::with_backing_file(
            wallet::PasskeyProviderOptions::from_env(),
            credential_path,
        )?;
        let secondary = SecondaryKey::from_suiprivkey(SECONDARY_SUIPRIVKEY)?;

        let app = Self {
            network,
            provider,
            secondary,
            store,
            session: Session::Uninitialized,
            lifecycle: TxLifecycle::default(),
            balance: None,
        };
        app.report_persisted_record();
        Ok(app)
    }

    fn report_persisted_record(&self) {
        match self.store.load() {
            Ok(Some(record)) => info!(
                "Persisted wallet found: address={} multisig={}. Use load-wallet or load-multisig to restore it.",
                record.address, record.is_multisig
            ),
            Ok(None) => info!("No persisted wallet; create one to get started."),
            Err(e) => warn!("Could not read persisted wallet record: {}", e),
        }
    }

    pub async fn create_wallet(&mut self) -> Result<()> {
        let public_key = match self.provider.create_credential() {
            Ok(pk) => pk,
            Err(e) => {
                // Credential refusal leaves the session untouched.
                warn!("Error creating wallet: {}", e);
                return Ok(());
            }
        };
        let address = passkey::passkey_address(&public_key);
        info!("Wallet created with address: {}", address);

        self.persist(&public_key, &address, false)?;
        self.session = Session::Single(SingleWallet {
            passkey_public_key: public_key,
            address,
        });
        self.lifecycle.reset();
        self.fetch_balance().await;
        Ok(())
    }

    pub async fn load_wallet(&mut self) -> Result<()> {
        let public_key = self.recover_passkey(false).await?;
        let address = passkey::passkey_address(&public_key);
        info!("Wallet loaded with address: {}", address);

        self.persist(&public_key, &address, false)?;
        self.session = Session::Single(SingleWallet {
            passkey_public_key: public_key,
            address,
        });
        self.lifecycle.reset();
        self.fetch_balance().await;
        Ok(())
    }

    pub async fn create_multisig(&mut self) -> Result<()> {
        let public_key = match self.provider.create_credential() {
            Ok(pk) => pk,
            Err(e) => {
                warn!("Error creating multisig wallet: {}", e);
                return Ok(());
            }
        };
        self.init_multisig_session(public_key).await
    }

    pub async fn load_multisig(&mut self) -> Result<()> {
        let public_key = self.recover_passkey(true).await?;
        self.init_multisig_session(public_key).await
    }

    async fn init_multisig_session(&mut self, public_key: sdk::Secp256r1PublicKey) -> Result<()> {
        let secondary_public_key = self.secondary.public_key();
        let committee = multisig::build_committee(&public_key, &secondary_public_key);
        let address = multisig::multisig_address(&committee);
        info!("Multisig wallet ready with address: {}", address);

        self.persist(&public_key, &address, true)?;
        self.session = Session::Multisig(MultisigWallet {
            passkey_public_key: public_key,
            secondary_public_key,
            committee,
            address,
        });
        self.lifecycle.reset();
        self.fetch_balance().await;
        Ok(())
    }

    /// Two-challenge recovery, with on-chain ownership as a tie-breaker
    /// when the intersection is still ambiguous.
    async fn recover_passkey(&mut self, multisig: bool) -> Result<sdk::Secp256r1PublicKey> {
        let candidates = recover::intersection_from_challenges(
            &mut self.provider,
            RECOVERY_CHALLENGE_A,
            RECOVERY_CHALLENGE_B,
        )?;

        match recover::resolve_unique(candidates.clone()) {
            Ok(pk) => Ok(pk),
            Err(RecoveryError::Ambiguous(n)) => {
                warn!(
                    "{} candidate keys after two challenges; narrowing by on-chain ownership",
                    n
                );
                let narrowed = self.narrow_by_ownership(candidates, multisig).await?;
                Ok(resolve_after_narrowing(n, narrowed)?)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Keep only candidates whose derived address owns at least one object.
    /// A heuristic: it assumes the true wallet has been funded and the
    /// phantom candidates have not. Funds sit at the committee address when
    /// a multisig wallet is being restored, so the candidate is probed at
    /// whichever address it would actually control.
    async fn narrow_by_ownership(
        &self,
        candidates: Vec<sdk::Secp256r1PublicKey>,
        multisig: bool,
    ) -> Result<Vec<sdk::Secp256r1PublicKey>> {
        let secondary_public_key = self.secondary.public_key();
        let mut client = get_client(self.network);
        let mut narrowed = Vec::new();
        for candidate in candidates {
            let address = candidate_address(&candidate, &secondary_public_key, multisig);
            let owned = chain::count_owned_objects(&mut client, address).await?;
            if owned > 0 {
                narrowed.push(candidate);
            }
        }
        Ok(narrowed)
    }

    fn persist(
        &self,
        public_key: &sdk::Secp256r1PublicKey,
        address: &sdk::Address,
        is_multisig: bool,
    ) -> Result<()> {
        let record = PersistedWallet::new(
            public_key.inner().to_vec(),
            address.to_string(),
            is_multisig,
        );
        self.store.save(&record)?;
        Ok(())
    }

    /// Balance refresh after address changes and sends. Failures are
    /// logged, never fatal: a stale balance readout must not wedge the
    /// wallet.
    pub async fn fetch_balance(&mut self) {
        let Some(address) = self.session.address() else {
            return;
        };
        let mut client = get_client(self.network);
        match balance::get_balance(&mut client, address).await {
            Ok(raw) => {
                self.balance = Some(raw);
                info!("Balance: {} SUI", balance::format_sui(raw));
            }
            Err(e) => warn!("Error fetching balance: {}", e),
        }
    }

    pub async fn request_faucet(&mut self) -> Result<()> {
        let Some(address) = self.session.address() else {
            bail!("no wallet; create or load one first");
        };
        faucet::request_faucet(self.network, address).await?;
        info!("Faucet request sent");
        self.fetch_balance().await;
        Ok(())
    }

    pub async fn create_transaction(&mut self) -> Result<()> {
        let Some(address) = self.session.address() else {
            bail!("no wallet; create or load one first");
        };
        let mut client = get_client(self.network);
        let draft = tx::build_draft(&mut client, address, GAS_PRICE, GAS_BUDGET).await?;
        info!("Transaction bytes created: {}", draft.base64);

        self.lifecycle.set_draft(Draft {
            tx: draft.tx,
            bytes: draft.bytes,
            base64: draft.base64,
        });
        Ok(())
    }

    pub async fn sign_transaction(&mut self) -> Result<()> {
        let Some(draft) = self.lifecycle.draft().cloned() else {
            bail!("no transaction draft; run create-tx first");
        };

        let signature = match &self.session {
            Session::Uninitialized => bail!("no wallet; create or load one first"),
            Session::Single(w) => {
                let passkey_public_key = w.passkey_public_key.clone();
                passkey::sign_transaction(&mut self.provider, &passkey_public_key, &draft.tx)?
            }
            Session::Multisig(w) => {
                let w = w.clone();
                let passkey_partial = passkey::sign_transaction_partial(
                    &mut self.provider,
                    &w.passkey_public_key,
                    &draft.tx,
                )?;
                let secondary_partial = self.secondary.sign_transaction(&draft.tx)?;
                multisig::combine(
                    &w.committee,
                    &w.passkey_public_key,
                    passkey_partial,
                    &w.secondary_public_key,
                    secondary_partial,
                )?
            }
        };

        let signature_base64 = signature.to_base64();
        info!("Signature: {}", signature_base64);
        self.lifecycle.set_signed(SignedDraft {
            draft,
            signature,
            signature_base64,
        });
        Ok(())
    }

    pub async fn send_transaction(&mut self) -> Result<()> {
        let Some(signed) = self.lifecycle.signed().cloned() else {
            bail!("no signed transaction; run sign-tx first");
        };

        let mut client = get_client(self.network);
        let result = tx::execute(&mut client, signed.draft.tx, signed.signature)
            .await
            .context("Error sending transaction")?;

        let explorer_url = self.network.explorer_tx_url(&result.digest);
        info!("Transaction digest: {}", result.digest);
        info!("Explorer: {}", explorer_url);

        self.lifecycle.set_sent(SentReceipt {
            digest: result.digest,
            explorer_url,
        });
        self.fetch_balance().await;
        Ok(())
    }

    pub fn status(&self) {
        info!("Network: {}", self.network.as_str());
        info!("Session: {}", self.session.describe());
        if let Some(address) = self.session.address() {
            info!("Address: {}", address);
        }
        match self.balance {
            Some(raw) => info!("Balance: {} SUI", balance::format_sui(raw)),
            None => info!("Balance: not fetched"),
        }
        match &self.lifecycle {
            TxLifecycle::Idle => info!("Transaction: none"),
            TxLifecycle::Drafted(d) => info!("Transaction drafted: {}", d.base64),
            TxLifecycle::Signed(s) => {
                info!("Transaction signed: {}", s.draft.base64);
                info!("Signature: {}", s.signature_base64);
            }
            TxLifecycle::Sent(r) => {
                info!("Transaction sent: {}", r.digest);
                info!("Explorer: {}", r.explorer_url);
            }
        }
    }
}

/// Address a recovery candidate would control: its bare passkey address, or
/// the 2-of-2 committee address it forms with the fixed secondary key.
fn candidate_address(
    candidate: &sdk::Secp256r1PublicKey,
    secondary_public_key: &sdk::Ed25519PublicKey,
    multisig: bool,
) -> sdk::Address {
    if multisig {
        multisig::multisig_address(&multisig::build_committee(candidate, secondary_public_key))
    } else {
        passkey::passkey_address(candidate)
    }
}

/// Narrowing that empties the set proves nothing about which candidate is
/// real; the original ambiguity is reported instead of a bogus
/// no-candidate error.
fn resolve_after_narrowing(
    ambiguous_count: usize,
    narrowed: Vec<sdk::Secp256r1PublicKey>,
) -> Result<sdk::Secp256r1PublicKey, RecoveryError> {
    match recover::resolve_unique(narrowed) {
        Err(RecoveryError::NoCandidate) => Err(RecoveryError::Ambiguous(ambiguous_count)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet::passkey::{PasskeyProviderOptions, SoftwareAuthenticator};

    fn member_keys() -> (sdk::Secp256r1PublicKey, sdk::Ed25519PublicKey) {
        let mut auth =
            SoftwareAuthenticator::ephemeral(PasskeyProviderOptions::new("Test RP", "localhost"));
        let passkey_pk = auth.create_credential().unwrap();
        let secondary = SecondaryKey::from_suiprivkey(SECONDARY_SUIPRIVKEY).unwrap();
        (passkey_pk, secondary.public_key())
    }

    #[test]
    fn multisig_candidates_are_probed_at_their_committee_address() {
        let (passkey_pk, secondary_pk) = member_keys();

        let single = candidate_address(&passkey_pk, &secondary_pk, false);
        let multi = candidate_address(&passkey_pk, &secondary_pk, true);

        assert_eq!(single, passkey::passkey_address(&passkey_pk));
        assert_eq!(
            multi,
            multisig::multisig_address(&multisig::build_committee(&passkey_pk, &secondary_pk))
        );
        assert_ne!(single, multi);
    }

    #[test]
    fn empty_narrowing_reports_the_original_ambiguity() {
        let (pk_1, _) = member_keys();
        let (pk_2, _) = member_keys();

        assert_eq!(
            resolve_after_narrowing(2, vec![]).unwrap_err(),
            RecoveryError::Ambiguous(2)
        );
        assert_eq!(resolve_after_narrowing(2, vec![pk_1.clone()]).unwrap(), pk_1);
        assert_eq!(
            resolve_after_narrowing(3, vec![pk_1, pk_2]).unwrap_err(),
            RecoveryError::Ambiguous(2)
        );
    }
}
