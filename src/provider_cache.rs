//! Per-network JSON-RPC provider cache.
//!
//! Providers are read-only: the gateway never signs or submits transactions,
//! so no wallet or signer configuration is involved. Each supported network
//! gets one provider, connected to either an `RPC_URL_*` environment override
//! or the network's well-known public endpoint.
//!
//! Environment variables used:
//! - `RPC_URL_CHAINWEB_EVM_TESTNET`
//! - `RPC_URL_ARBITRUM_SEPOLIA`
//! - `RPC_URL_ARBITRUM`
//!
//! Example usage:
//! ```ignore
//! let provider_cache = ProviderCache::from_env()?;
//! let provider = provider_cache.by_network(Network::ArbitrumSepolia);
//! ```

use alloy_primitives::Address;
use alloy_provider::RootProvider;
use alloy_rpc_client::ClientBuilder;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::env;
use url::Url;

use crate::chain::{ChainSource, LoyaltySource};
use crate::network::Network;

const ENV_RPC_CHAINWEB_EVM_TESTNET: &str = "RPC_URL_CHAINWEB_EVM_TESTNET";
const ENV_RPC_ARBITRUM_SEPOLIA: &str = "RPC_URL_ARBITRUM_SEPOLIA";
const ENV_RPC_ARBITRUM: &str = "RPC_URL_ARBITRUM";

/// A cache of pre-initialized read-only providers keyed by network.
#[derive(Clone)]
pub struct ProviderCache {
    providers: HashMap<Network, RootProvider>,
}

/// A generic map of provider instances [`ProviderMap::Value`] keyed by network.
pub trait ProviderMap {
    type Value;

    /// Returns the provider for the specified network, if configured.
    fn by_network<N: Borrow<Network>>(&self, network: N) -> Option<&Self::Value>;
}

/// Per-request resolution of a network and contract address into a
/// [`LoyaltySource`].
///
/// The gateway is generic over this trait so tests can substitute a fake
/// source instead of a live RPC connection.
pub trait SourceMap {
    type Source: LoyaltySource;

    /// Returns a source bound to `contract` on `network`, or `None` if the
    /// network has no configured provider.
    fn source(&self, network: Network, contract: Address) -> Option<Self::Source>;

    /// Networks this map can serve, in declaration order.
    fn networks(&self) -> Vec<Network>;
}

impl<'a> IntoIterator for &'a ProviderCache {
    type Item = (&'a Network, &'a RootProvider);
    type IntoIter = std::collections::hash_map::Iter<'a, Network, RootProvider>;

    fn into_iter(self) -> Self::IntoIter {
        self.providers.iter()
    }
}

impl ProviderCache {
    /// Constructs a new [`ProviderCache`] from environment variables.
    ///
    /// Every supported network is connected using its `RPC_URL_*` override
    /// when set, falling back to the network's public endpoint otherwise. A
    /// network whose URL fails to parse is skipped with a warning rather than
    /// aborting startup.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let mut providers = HashMap::new();
        for network in Network::variants() {
            let env_var = match network {
                Network::ChainwebEvmTestnet => ENV_RPC_CHAINWEB_EVM_TESTNET,
                Network::ArbitrumSepolia => ENV_RPC_ARBITRUM_SEPOLIA,
                Network::Arbitrum => ENV_RPC_ARBITRUM,
            };
            let raw_url =
                env::var(env_var).unwrap_or_else(|_| network.default_rpc_url().to_string());
            let rpc_url: Url = match raw_url.parse() {
                Ok(url) => url,
                Err(err) => {
                    tracing::warn!("Invalid RPC URL for {} ({}): {} (skipped)", network, raw_url, err);
                    continue;
                }
            };
            let client = ClientBuilder::default().http(rpc_url.clone());
            providers.insert(*network, RootProvider::new(client));
            tracing::info!("Initialized provider for {} at {}", network, rpc_url);
        }
        Ok(Self { providers })
    }
}

impl ProviderMap for ProviderCache {
    type Value = RootProvider;
    fn by_network<N: Borrow<Network>>(&self, network: N) -> Option<&RootProvider> {
        self.providers.get(network.borrow())
    }
}

impl SourceMap for ProviderCache {
    type Source = ChainSource<RootProvider>;

    fn source(&self, network: Network, contract: Address) -> Option<Self::Source> {
        let provider = self.by_network(network)?;
        Some(ChainSource::new(contract, provider.clone()))
    }

    fn networks(&self) -> Vec<Network> {
        Network::variants()
            .iter()
            .filter(|network| self.providers.contains_key(network))
            .copied()
            .collect()
    }
}
