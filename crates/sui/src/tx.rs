use anyhow::{Context, Result};
use base64ct::Encoding;
use sui_rpc::client::v2::Client as GrpcClient;
use sui_rpc::field::FieldMask;
use sui_rpc::proto::sui::rpc::v2 as proto;
use sui_sdk_types as sui;
use tracing::{debug, info};

use crate::chain::{get_reference_gas_price, pick_gas_object};

/// A built but unsigned transaction together with its serialized forms.
#[derive(Debug, Clone)]
pub struct DraftBytes {
    pub tx: sui::Transaction,
    pub bytes: Vec<u8>,
    pub base64: String,
}

/// Outcome of a successfully executed transaction.
#[derive(Debug, Clone)]
pub struct ExecuteResult {
    pub digest: String,
}

/// Build an unsigned transaction for the sender: no commands, just sender,
/// gas price, gas budget and a discovered gas coin.
pub async fn build_draft(
    client: &mut GrpcClient,
    sender: sui::Address,
    gas_price: u64,
    gas_budget: u64,
) -> Result<DraftBytes> {
    let mut tb = sui_transaction_builder::TransactionBuilder::new();
    tb.set_sender(sender);
    tb.set_gas_budget(gas_budget);

    // The fixed price is validated against the network default before use.
    let reference_price = get_reference_gas_price(client).await?;
    debug!("Reference gas price: {}, draft price: {}", reference_price, gas_price);
    tb.set_gas_price(gas_price);

    let gas_ref = pick_gas_object(client, sender).await?;
    let gas_input = sui_transaction_builder::unresolved::Input::owned(
        *gas_ref.object_id(),
        gas_ref.version(),
        *gas_ref.digest(),
    );
    tb.add_gas_objects(vec![gas_input]);
    debug!("Gas object added: {:?}", gas_ref);

    let tx = tb.finish()?;
    let bytes = bcs::to_bytes(&tx).context("Failed to serialize transaction")?;
    let base64 = base64ct::Base64::encode_string(&bytes);
    info!("Transaction draft built for {}: {} bytes", sender, bytes.len());

    Ok(DraftBytes { tx, bytes, base64 })
}

/// Execute a signed transaction and return its digest. Effects are requested
/// so failures carry the on-chain error description.
pub async fn execute(
    client: &mut GrpcClient,
    tx: sui::Transaction,
    signature: sui::UserSignature,
) -> Result<ExecuteResult> {
    let mut exec = client.execution_client();
    let mut req = proto::ExecuteTransactionRequest::default();
    req.transaction = Some(tx.into());
    req.signatures = vec![signature.into()];
    req.read_mask = Some(FieldMask {
        paths: vec!["finality".into(), "transaction".into()],
    });

    debug!("Sending ExecuteTransaction...");
    let resp = exec.execute_transaction(req).await?;
    let resp_inner = resp.into_inner();

    if resp_inner.finality.is_none() {
        return Err(anyhow::anyhow!("Transaction did not achieve finality"));
    }

    let executed = resp_inner
        .transaction
        .ok_or_else(|| anyhow::anyhow!("no transaction in response"))?;

    if let Some(effects) = &executed.effects {
        if let Some(status) = &effects.status {
            if !status.success.unwrap_or(false) {
                let description = status
                    .error
                    .as_ref()
                    .and_then(|e| e.description.clone())
                    .unwrap_or_else(|| "Unknown error".to_string());
                return Err(anyhow::anyhow!("Transaction failed: {}", description));
            }
        }
    }

    let digest = executed
        .digest
        .context("Failed to get transaction digest")?;
    info!("Transaction executed on blockchain: {}", digest);

    Ok(ExecuteResult { digest })
}
