use anyhow::Result;
use serde::Deserialize;
use sui_sdk_types as sui;
use tracing::{debug, info};

use crate::client::Network;

#[derive(Debug, Deserialize)]
struct FaucetResponse {
    #[serde(default)]
    error: Option<String>,
}

/// Request test tokens for an address from the network faucet.
pub async fn request_faucet(network: Network, recipient: sui::Address) -> Result<()> {
    let url = network
        .faucet_url()
        .ok_or_else(|| anyhow::anyhow!("no faucet available for {}", network.as_str()))?;

    let payload = serde_json::json!({
        "FixedAmountRequest": {
            "recipient": recipient.to_string(),
        }
    });

    debug!("Requesting faucet tokens from {} for {}", url, recipient);
    let client = reqwest::Client::new();
    let response = client
        .post(url)
        .header("Content-Type", "application/json")
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!("faucet request failed: {} {}", status, body));
    }

    // Some faucet deployments report failures inside a 200 body.
    if let Ok(parsed) = response.json::<FaucetResponse>().await {
        if let Some(error) = parsed.error {
            return Err(anyhow::anyhow!("faucet request rejected: {}", error));
        }
    }

    info!("Faucet request sent for {}", recipient);
    Ok(())
}
