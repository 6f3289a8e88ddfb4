use anyhow::Result;
use std::sync::OnceLock;
use sui_rpc::client::v2::Client as GrpcClient;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Devnet,
    Testnet,
    Mainnet,
}

impl Network {
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "devnet" => Ok(Network::Devnet),
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            _ => Err(anyhow::anyhow!(
                "Unknown network: {}. Please use 'devnet', 'testnet', or 'mainnet'.",
                s
            )),
        }
    }

    /// Read `SUI_CHAIN`, falling back to devnet.
    pub fn from_env() -> Self {
        match std::env::var("SUI_CHAIN") {
            Ok(chain) => Network::from_str(&chain).unwrap_or(Network::Devnet),
            Err(_) => Network::Devnet,
        }
    }

    pub fn rpc_url(&self) -> &'static str {
        match self {
            Network::Devnet => DEVNET_RPC_URL,
            Network::Testnet => TESTNET_RPC_URL,
            Network::Mainnet => MAINNET_RPC_URL,
        }
    }

    /// Faucet endpoint for the network. Mainnet has no faucet.
    pub fn faucet_url(&self) -> Option<&'static str> {
        match self {
            Network::Devnet => Some("https://faucet.devnet.sui.io/gas"),
            Network::Testnet => Some("https://faucet.testnet.sui.io/gas"),
            Network::Mainnet => None,
        }
    }

    /// Block explorer link for a transaction digest.
    pub fn explorer_tx_url(&self, digest: &str) -> String {
        format!("https://suiscan.xyz/{}/tx/{}", self.as_str(), digest)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        }
    }
}

static DEVNET_CLIENT: OnceLock<GrpcClient> = OnceLock::new();
static TESTNET_CLIENT: OnceLock<GrpcClient> = OnceLock::new();
static MAINNET_CLIENT: OnceLock<GrpcClient> = OnceLock::new();

const DEVNET_RPC_URL: &str = "https://fullnode.devnet.sui.io:443";
const TESTNET_RPC_URL: &str = "https://fullnode.testnet.sui.io:443";
const MAINNET_RPC_URL: &str = "https://fullnode.mainnet.sui.io:443";

/// Get a cached gRPC client for the given network (cloned for mutable use)
pub fn get_client(network: Network) -> GrpcClient {
    let client = match network {
        Network::Devnet => DEVNET_CLIENT.get_or_init(|| {
            GrpcClient::new(DEVNET_RPC_URL.to_string()).expect("Failed to create devnet client")
        }),
        Network::Testnet => TESTNET_CLIENT.get_or_init(|| {
            GrpcClient::new(TESTNET_RPC_URL.to_string()).expect("Failed to create testnet client")
        }),
        Network::Mainnet => MAINNET_CLIENT.get_or_init(|| {
            GrpcClient::new(MAINNET_RPC_URL.to_string()).expect("Failed to create mainnet client")
        }),
    };
    debug!("Using cached client for {}", network.as_str());
    client.clone()
}

/// Get a cached gRPC client for the given network string (cloned for mutable use)
pub fn get_client_by_str(network: &str) -> Result<GrpcClient> {
    let network = Network::from_str(network)?;
    Ok(get_client(network))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_from_str_accepts_known_chains() {
        assert_eq!(Network::from_str("devnet").unwrap(), Network::Devnet);
        assert_eq!(Network::from_str("Testnet").unwrap(), Network::Testnet);
        assert_eq!(Network::from_str("MAINNET").unwrap(), Network::Mainnet);
        assert!(Network::from_str("localnet").is_err());
    }

    #[test]
    fn explorer_link_points_at_suiscan() {
        let url = Network::Devnet.explorer_tx_url("abc123");
        assert_eq!(url, "https://suiscan.xyz/devnet/tx/abc123");
    }

    #[test]
    fn mainnet_has_no_faucet() {
        assert!(Network::Mainnet.faucet_url().is_none());
        assert!(Network::Devnet.faucet_url().is_some());
    }
}
