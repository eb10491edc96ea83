//! Network definitions for supported loyalty program deployments.
//!
//! This module defines the EVM networks the gateway can read from, their
//! chain IDs, and the public JSON-RPC endpoints used when no explicit
//! `RPC_URL_*` override is configured.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Supported EVM networks hosting loyalty program contracts.
#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Network {
    /// Kadena Chainweb EVM testnet, chain 20 (chain ID 5920).
    #[serde(rename = "chainweb-evm-testnet")]
    ChainwebEvmTestnet,
    /// Arbitrum Sepolia testnet (chain ID 421614).
    #[serde(rename = "arbitrum-sepolia")]
    ArbitrumSepolia,
    /// Arbitrum One mainnet (chain ID 42161).
    #[serde(rename = "arbitrum")]
    Arbitrum,
}

impl Default for Network {
    /// Network assumed when a request omits the `network` parameter; the
    /// reference loyalty deployments live on Chainweb EVM testnet.
    fn default() -> Self {
        Network::ChainwebEvmTestnet
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::ChainwebEvmTestnet => write!(f, "chainweb-evm-testnet"),
            Network::ArbitrumSepolia => write!(f, "arbitrum-sepolia"),
            Network::Arbitrum => write!(f, "arbitrum"),
        }
    }
}

/// Error returned when parsing an unrecognized network name.
#[derive(Debug, thiserror::Error)]
#[error("unknown network: {0}")]
pub struct UnknownNetwork(String);

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chainweb-evm-testnet" => Ok(Network::ChainwebEvmTestnet),
            "arbitrum-sepolia" => Ok(Network::ArbitrumSepolia),
            "arbitrum" => Ok(Network::Arbitrum),
            other => Err(UnknownNetwork(other.to_string())),
        }
    }
}

impl Network {
    /// Return all known [`Network`] variants.
    pub fn variants() -> &'static [Network] {
        &[
            Network::ChainwebEvmTestnet,
            Network::ArbitrumSepolia,
            Network::Arbitrum,
        ]
    }

    /// EIP-155 chain ID of the network.
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::ChainwebEvmTestnet => 5920,
            Network::ArbitrumSepolia => 421614,
            Network::Arbitrum => 42161,
        }
    }

    /// Public JSON-RPC endpoint used when no `RPC_URL_*` override is set.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::ChainwebEvmTestnet => {
                "https://evm-testnet.chainweb.com/chainweb/0.0/evm-testnet/chain/20/evm/rpc"
            }
            Network::ArbitrumSepolia => "https://sepolia-rollup.arbitrum.io/rpc",
            Network::Arbitrum => "https://arb1.arbitrum.io/rpc",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_name_round_trip() {
        for network in Network::variants() {
            let name = network.to_string();
            let parsed: Network = name.parse().expect("known name parses");
            assert_eq!(parsed, *network);
        }
    }

    #[test]
    fn unknown_network_name_is_rejected() {
        assert!("base-sepolia".parse::<Network>().is_err());
    }

    #[test]
    fn serde_names_match_display() {
        let json = serde_json::to_string(&Network::ChainwebEvmTestnet).unwrap();
        assert_eq!(json, "\"chainweb-evm-testnet\"");
    }
}
