//! Run configuration for the build & deploy steps

use std::path::PathBuf;

use clap::ValueEnum;

use crate::constants::{
    DEFAULT_ACCOUNT_NAME, DEFAULT_CARGO_BIN, DEFAULT_NEAR_BIN, DEFAULT_OUT_DIR, STRIP_RUSTFLAGS,
};

/// The NEAR network targeted by a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Network {
    #[default]
    Testnet,
    Mainnet,
    Betanet,
    Local,
}

impl Network {
    /// Value of `NEAR_ENV` understood by the near CLI
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
            Network::Betanet => "betanet",
            Network::Local => "local",
        }
    }

    /// Namespace of top-level accounts on this network
    pub fn default_factory(&self) -> &'static str {
        match self {
            Network::Testnet => "testnet",
            Network::Mainnet => "near",
            Network::Betanet => "betanet",
            Network::Local => "local",
        }
    }

    /// Public JSON-RPC endpoint
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Network::Testnet => "https://rpc.testnet.near.org",
            Network::Mainnet => "https://rpc.mainnet.near.org",
            Network::Betanet => "https://rpc.betanet.near.org",
            Network::Local => "http://localhost:3030",
        }
    }
}

/// Everything the deployment step needs to know about where it deploys
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub network: Network,
    factory: Option<String>,
    base_account: Option<String>,
    rpc_url: Option<String>,
    /// Binary invoked for account creation & deployment
    pub near_bin: String,
    /// Directory holding the compiled artifacts
    pub out_dir: PathBuf,
    /// Balance given to each created account, the CLI default when unset
    pub initial_balance: Option<String>,
}

impl DeployConfig {
    pub fn new(network: Network) -> Self {
        DeployConfig {
            network,
            factory: None,
            base_account: None,
            rpc_url: None,
            near_bin: DEFAULT_NEAR_BIN.to_string(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            initial_balance: None,
        }
    }

    pub fn with_factory(mut self, factory: Option<String>) -> Self {
        self.factory = factory;
        self
    }

    pub fn with_base_account(mut self, base_account: Option<String>) -> Self {
        self.base_account = base_account;
        self
    }

    pub fn with_rpc_url(mut self, rpc_url: Option<String>) -> Self {
        self.rpc_url = rpc_url;
        self
    }

    pub fn factory(&self) -> &str {
        self.factory
            .as_deref()
            .unwrap_or_else(|| self.network.default_factory())
    }

    /// The account every role account is derived from, and the master account creating them.
    /// Falls back to `croncat.<factory>` when not overridden.
    pub fn base_account(&self) -> String {
        match &self.base_account {
            Some(account) => account.clone(),
            None => format!("{}.{}", DEFAULT_ACCOUNT_NAME, self.factory()),
        }
    }

    pub fn rpc_url(&self) -> &str {
        self.rpc_url
            .as_deref()
            .unwrap_or_else(|| self.network.rpc_url())
    }
}

/// Everything the build step needs
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Root of the contracts cargo workspace
    pub contracts_dir: PathBuf,
    /// Directory the artifacts are copied into
    pub out_dir: PathBuf,
    /// Strip symbol names from the artifacts
    pub strip: bool,
    pub cargo_bin: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            contracts_dir: PathBuf::from("."),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            strip: false,
            cargo_bin: DEFAULT_CARGO_BIN.to_string(),
        }
    }
}

impl BuildConfig {
    /// `RUSTFLAGS` handed to the compiler
    pub fn rustflags(&self) -> &'static str {
        if self.strip {
            STRIP_RUSTFLAGS
        } else {
            ""
        }
    }
}
