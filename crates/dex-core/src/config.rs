//! Configuration types for the Balloon DEX

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DECIMALS, DEV_DEPLOYER, DEV_FRONTEND_ACCOUNT};
use crate::{ether, Address, Chain, Error, Result, U256};

/// Swap fee as a fraction of the input kept by the pool.
///
/// The pool keeps `denominator - numerator` parts per `denominator` of every
/// swap input (997/1000 is a 0.3% fee).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    pub numerator: u64,
    pub denominator: u64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            numerator: 997,
            denominator: 1000,
        }
    }
}

impl FeeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.denominator == 0 {
            return Err(Error::Config("fee denominator must be non-zero".into()));
        }
        if self.numerator == 0 || self.numerator > self.denominator {
            return Err(Error::Config(format!(
                "fee numerator must be in 1..={}, got {}",
                self.denominator, self.numerator
            )));
        }
        Ok(())
    }

    /// Fee in basis points, rounded down
    pub fn fee_bps(&self) -> u64 {
        if self.denominator == 0 {
            return 0;
        }
        (self.denominator - self.numerator.min(self.denominator)) * 10_000 / self.denominator
    }
}

/// Token metadata and genesis supply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    #[serde(default = "default_token_name")]
    pub name: String,

    #[serde(default = "default_token_symbol")]
    pub symbol: String,

    #[serde(default = "default_decimals")]
    pub decimals: u8,

    /// Minted to the deployer when the token is deployed
    #[serde(default = "default_initial_supply")]
    pub initial_supply: U256,
}

fn default_token_name() -> String {
    "Balloons".to_string()
}

fn default_token_symbol() -> String {
    "BAL".to_string()
}

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

fn default_initial_supply() -> U256 {
    ether(1000)
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: default_token_name(),
            symbol: default_token_symbol(),
            decimals: default_decimals(),
            initial_supply: default_initial_supply(),
        }
    }
}

/// A token transfer from the deployer performed during provisioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airdrop {
    pub to: Address,
    pub amount: U256,
}

/// An account holding base currency at genesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundedAccount {
    pub address: Address,
    pub balance: U256,
}

/// Deployment and one-time pool initialisation parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Account that deploys both contracts and seeds the pool
    #[serde(default = "default_deployer")]
    pub deployer: Address,

    /// Base currency allocated to the deployer at genesis
    #[serde(default = "default_deployer_balance")]
    pub deployer_balance: U256,

    #[serde(default)]
    pub token: TokenConfig,

    #[serde(default = "default_airdrops")]
    pub airdrops: Vec<Airdrop>,

    /// Allowance the deployer grants the pool before `init`
    #[serde(default = "default_dex_allowance")]
    pub dex_allowance: U256,

    /// Tokens pulled into the pool by `init`
    #[serde(default = "default_init_amount")]
    pub init_tokens: U256,

    /// Base currency attached to `init`
    #[serde(default = "default_init_amount")]
    pub init_value: U256,
}

fn default_deployer() -> Address {
    DEV_DEPLOYER
}

fn default_deployer_balance() -> U256 {
    ether(10_000)
}

fn default_airdrops() -> Vec<Airdrop> {
    vec![Airdrop {
        to: DEV_FRONTEND_ACCOUNT,
        amount: ether(10),
    }]
}

fn default_dex_allowance() -> U256 {
    ether(100)
}

fn default_init_amount() -> U256 {
    ether(5)
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            deployer: default_deployer(),
            deployer_balance: default_deployer_balance(),
            token: TokenConfig::default(),
            airdrops: default_airdrops(),
            dex_allowance: default_dex_allowance(),
            init_tokens: default_init_amount(),
            init_value: default_init_amount(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chain the devnet reports
    #[serde(default = "default_chain")]
    pub chain: Chain,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    #[serde(default)]
    pub fee: FeeConfig,

    #[serde(default)]
    pub deployment: DeploymentConfig,

    /// Additional accounts funded with base currency at genesis
    #[serde(default = "default_accounts")]
    pub accounts: Vec<FundedAccount>,
}

fn default_chain() -> Chain {
    Chain::Localhost
}

fn default_api_port() -> u16 {
    8545
}

fn default_accounts() -> Vec<FundedAccount> {
    vec![FundedAccount {
        address: DEV_FRONTEND_ACCOUNT,
        balance: ether(100),
    }]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chain: default_chain(),
            api_port: default_api_port(),
            fee: FeeConfig::default(),
            deployment: DeploymentConfig::default(),
            accounts: default_accounts(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AppConfig =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.fee.validate()?;
        if self.deployment.deployer == Address::ZERO {
            return Err(Error::Config("deployer must not be the zero address".into()));
        }
        if self.deployment.init_value.is_zero() {
            return Err(Error::Config("init_value must be non-zero".into()));
        }
        Ok(())
    }
}
