//! Token, network and contract registries
//!
//! A [`Registry`] is built once (from the built-in Avalanche tables or from a
//! JSON document) and shared behind an `Arc`. It is never mutated after
//! construction.
//!
//! Unknown chain ids follow one policy everywhere: the strict lookups
//! ([`Registry::network`], [`Registry::contracts`]) return
//! [`Error::UnsupportedChain`], while the `_or_default` lookups fall back to
//! the default (test) network and log a warning.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    address::{is_valid_address, ZERO_ADDRESS, ZERO_ADDRESS_SHORT},
    units::{NATIVE_DECIMALS, STABLECOIN_DECIMALS},
    Error, Result,
};

/// Avalanche Fuji testnet
pub const FUJI_CHAIN_ID: u64 = 43113;

/// Avalanche C-Chain mainnet
pub const AVALANCHE_CHAIN_ID: u64 = 43114;

/// Token metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    /// Token contract address (zero address for the native asset)
    pub address: String,
    pub symbol: String,
    pub name: String,
    /// 18 for AVAX, 6 for the stablecoins
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl TokenInfo {
    pub fn is_native(&self) -> bool {
        is_native_address(&self.address)
    }
}

/// Native currency descriptor of a network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Per-chain RPC and explorer metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub explorer_url: String,
    pub native_currency: NativeCurrency,
}

impl NetworkConfig {
    /// Chain id in the `0x`-hex form wallets expect (`0xa869` for Fuji).
    pub fn hex_chain_id(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }

    pub fn explorer_address_url(&self, address: &str) -> String {
        format!("{}/address/{}", self.explorer_url, address)
    }

    pub fn explorer_tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url, tx_hash)
    }
}

/// Deployed AvaxPay contracts on one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAddresses {
    pub processor: String,
    pub subscription_manager: String,
    /// ERC-20 token addresses keyed by symbol
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
}

/// A network together with its deployed contracts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEntry {
    #[serde(flatten)]
    pub config: NetworkConfig,
    pub contracts: ContractAddresses,
}

/// On-disk / wire form of a registry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryDocument {
    default_chain_id: u64,
    networks: Vec<NetworkEntry>,
    tokens: Vec<TokenInfo>,
}

/// Immutable lookup tables for tokens, networks and contracts
#[derive(Debug, Clone)]
pub struct Registry {
    default_chain_id: u64,
    networks: BTreeMap<u64, NetworkEntry>,
    tokens: Vec<TokenInfo>,
}

pub(crate) fn is_native_address(address: &str) -> bool {
    address.eq_ignore_ascii_case(ZERO_ADDRESS) || address == ZERO_ADDRESS_SHORT
}

impl Registry {
    /// Build a registry, checking that the default network is present and
    /// every address is well formed.
    pub fn new(
        default_chain_id: u64,
        networks: impl IntoIterator<Item = NetworkEntry>,
        tokens: Vec<TokenInfo>,
    ) -> Result<Self> {
        let networks: BTreeMap<u64, NetworkEntry> = networks
            .into_iter()
            .map(|entry| (entry.config.chain_id, entry))
            .collect();

        if !networks.contains_key(&default_chain_id) {
            return Err(Error::InvalidRegistry(format!(
                "default chain {} has no network entry",
                default_chain_id
            )));
        }

        for entry in networks.values() {
            let contracts = &entry.contracts;
            let addresses = [&contracts.processor, &contracts.subscription_manager]
                .into_iter()
                .chain(contracts.tokens.values());
            for address in addresses {
                if !is_valid_address(address) {
                    return Err(Error::InvalidRegistry(format!(
                        "chain {}: invalid contract address {}",
                        entry.config.chain_id, address
                    )));
                }
            }
        }

        for token in &tokens {
            if !is_valid_address(&token.address) {
                return Err(Error::InvalidRegistry(format!(
                    "token {}: invalid address {}",
                    token.symbol, token.address
                )));
            }
        }

        Ok(Self {
            default_chain_id,
            networks,
            tokens,
        })
    }

    /// Built-in tables: Fuji (default) and the Avalanche C-Chain.
    pub fn avalanche() -> Self {
        let native = NativeCurrency {
            name: "Avalanche".to_string(),
            symbol: "AVAX".to_string(),
            decimals: NATIVE_DECIMALS,
        };

        let fuji = NetworkEntry {
            config: NetworkConfig {
                chain_id: FUJI_CHAIN_ID,
                name: "Avalanche Fuji Testnet".to_string(),
                rpc_url: "https://api.avax-test.network/ext/bc/C/rpc".to_string(),
                explorer_url: "https://testnet.snowtrace.io".to_string(),
                native_currency: native.clone(),
            },
            contracts: ContractAddresses {
                processor: "0x28a5dB9905a59376a40cA91c025B4F3A00Abd4FA".to_string(),
                subscription_manager: "0x7469CEC4eF717b2265963f663ABc049Ab15f4FeA".to_string(),
                tokens: BTreeMap::from([
                    (
                        "USDC".to_string(),
                        "0xCAEBa7a92950c55fECCA2568DE953E172815b3a7".to_string(),
                    ),
                    (
                        "USDT".to_string(),
                        "0xECa66Dd77eD582e22C238a18d52D283460fFa8a0".to_string(),
                    ),
                ]),
            },
        };

        // Processor contracts are not deployed on mainnet yet.
        let mainnet = NetworkEntry {
            config: NetworkConfig {
                chain_id: AVALANCHE_CHAIN_ID,
                name: "Avalanche C-Chain".to_string(),
                rpc_url: "https://api.avax.network/ext/bc/C/rpc".to_string(),
                explorer_url: "https://snowtrace.io".to_string(),
                native_currency: native,
            },
            contracts: ContractAddresses {
                processor: ZERO_ADDRESS.to_string(),
                subscription_manager: ZERO_ADDRESS.to_string(),
                tokens: BTreeMap::from([
                    (
                        "USDC".to_string(),
                        "0xB97EF9Ef8734C71904D8002F8b6Bc66Dd9c48a6E".to_string(),
                    ),
                    (
                        "USDT".to_string(),
                        "0x9702230A8Ea53601f5cD2dc00fDBc13d4dF4A8c7".to_string(),
                    ),
                ]),
            },
        };

        let tokens = vec![
            TokenInfo {
                address: ZERO_ADDRESS.to_string(),
                symbol: "AVAX".to_string(),
                name: "Avalanche".to_string(),
                decimals: NATIVE_DECIMALS,
                icon: Some("https://cryptologos.cc/logos/avalanche-avax-logo.png".to_string()),
            },
            TokenInfo {
                address: fuji.contracts.tokens["USDC"].clone(),
                symbol: "USDC".to_string(),
                name: "USD Coin (Mock)".to_string(),
                decimals: STABLECOIN_DECIMALS,
                icon: Some("https://cryptologos.cc/logos/usd-coin-usdc-logo.png".to_string()),
            },
            TokenInfo {
                address: fuji.contracts.tokens["USDT"].clone(),
                symbol: "USDT".to_string(),
                name: "Tether USD (Mock)".to_string(),
                decimals: STABLECOIN_DECIMALS,
                icon: Some("https://cryptologos.cc/logos/tether-usdt-logo.png".to_string()),
            },
        ];

        let mut networks = BTreeMap::new();
        networks.insert(FUJI_CHAIN_ID, fuji);
        networks.insert(AVALANCHE_CHAIN_ID, mainnet);

        Self {
            default_chain_id: FUJI_CHAIN_ID,
            networks,
            tokens,
        }
    }

    /// Load an alternate registry from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: RegistryDocument = serde_json::from_str(json)?;
        Self::new(doc.default_chain_id, doc.networks, doc.tokens)
    }

    /// Serialize the registry back to its JSON document form.
    pub fn to_json(&self) -> Result<String> {
        let doc = RegistryDocument {
            default_chain_id: self.default_chain_id,
            networks: self.networks.values().cloned().collect(),
            tokens: self.tokens.clone(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Switch the default network to another registered chain.
    pub fn with_default_chain_id(mut self, chain_id: u64) -> Result<Self> {
        if !self.networks.contains_key(&chain_id) {
            return Err(Error::UnsupportedChain(chain_id));
        }
        self.default_chain_id = chain_id;
        Ok(self)
    }

    pub fn default_chain_id(&self) -> u64 {
        self.default_chain_id
    }

    pub fn default_network(&self) -> &NetworkConfig {
        &self.default_entry().config
    }

    fn default_entry(&self) -> &NetworkEntry {
        // Presence of the default entry is checked at construction.
        &self.networks[&self.default_chain_id]
    }

    pub fn is_supported_chain(&self, chain_id: u64) -> bool {
        self.networks.contains_key(&chain_id)
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.networks.keys().copied()
    }

    pub fn tokens(&self) -> &[TokenInfo] {
        &self.tokens
    }

    fn entry(&self, chain_id: u64) -> Result<&NetworkEntry> {
        self.networks
            .get(&chain_id)
            .ok_or(Error::UnsupportedChain(chain_id))
    }

    fn entry_or_default(&self, chain_id: u64) -> &NetworkEntry {
        match self.networks.get(&chain_id) {
            Some(entry) => entry,
            None => {
                tracing::warn!(
                    chain_id,
                    default_chain_id = self.default_chain_id,
                    "unsupported chain, falling back to default network"
                );
                self.default_entry()
            }
        }
    }

    /// Network metadata, or [`Error::UnsupportedChain`].
    pub fn network(&self, chain_id: u64) -> Result<&NetworkConfig> {
        self.entry(chain_id).map(|entry| &entry.config)
    }

    /// Network metadata, falling back to the default network.
    pub fn network_or_default(&self, chain_id: u64) -> &NetworkConfig {
        &self.entry_or_default(chain_id).config
    }

    /// Deployed contracts, or [`Error::UnsupportedChain`].
    pub fn contracts(&self, chain_id: u64) -> Result<&ContractAddresses> {
        self.entry(chain_id).map(|entry| &entry.contracts)
    }

    /// Deployed contracts, falling back to the default network.
    pub fn contracts_or_default(&self, chain_id: u64) -> &ContractAddresses {
        &self.entry_or_default(chain_id).contracts
    }

    pub fn processor_address(&self, chain_id: u64) -> Result<&str> {
        self.contracts(chain_id).map(|c| c.processor.as_str())
    }

    pub fn subscription_manager_address(&self, chain_id: u64) -> Result<&str> {
        self.contracts(chain_id)
            .map(|c| c.subscription_manager.as_str())
    }

    /// Display name of a chain, `"Unknown Network"` if not registered.
    pub fn chain_name(&self, chain_id: u64) -> &str {
        self.networks
            .get(&chain_id)
            .map(|entry| entry.config.name.as_str())
            .unwrap_or("Unknown Network")
    }

    pub fn explorer_address_url(&self, chain_id: u64, address: &str) -> Option<String> {
        self.network(chain_id)
            .ok()
            .map(|network| network.explorer_address_url(address))
    }

    pub fn explorer_tx_url(&self, chain_id: u64, tx_hash: &str) -> Option<String> {
        self.network(chain_id)
            .ok()
            .map(|network| network.explorer_tx_url(tx_hash))
    }

    /// Token by symbol, case-insensitive.
    pub fn token_by_symbol(&self, symbol: &str) -> Option<&TokenInfo> {
        self.tokens
            .iter()
            .find(|token| token.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Token by contract address, case-insensitive.
    pub fn token_by_address(&self, address: &str) -> Option<&TokenInfo> {
        self.tokens
            .iter()
            .find(|token| token.address.eq_ignore_ascii_case(address))
    }

    /// Resolve a token given either its symbol or its address.
    pub fn resolve_token(&self, token: &str) -> Option<&TokenInfo> {
        if token.starts_with("0x") {
            if is_native_address(token) {
                return self.native_token();
            }
            self.token_by_address(token)
        } else {
            self.token_by_symbol(token)
        }
    }

    /// The registry's native-asset token entry, if it lists one.
    pub fn native_token(&self) -> Option<&TokenInfo> {
        self.tokens.iter().find(|token| token.is_native())
    }

    /// Whether `token` denotes the native asset.
    ///
    /// Accepts the zero address, the short `0x0` form, or the default
    /// network's native currency symbol (case-insensitive).
    pub fn is_native_token(&self, token: &str) -> bool {
        is_native_address(token)
            || token.eq_ignore_ascii_case(&self.default_network().native_currency.symbol)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::avalanche()
    }
}
