//! Devnet provisioning
//!
//! Reproduces the standard deployment: fund accounts, deploy the token and the
//! pool at their CREATE addresses, airdrop tokens, approve the pool and seed
//! it with `init`.

use std::collections::BTreeMap;

use dex_core::{Address, AppConfig, CallContext, Chain, Error, Result};
use ledger::{Balloons, EtherBank, TokenLedger};
use serde::{Deserialize, Serialize};

use crate::constants::{contracts, nonces};
use crate::pool::Dex;

/// Pool engine over the in-memory ledgers
pub type DevnetDex = Dex<Balloons, EtherBank>;

/// Record of a finished deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub chain_id: u64,
    pub chain: Chain,
    pub deployer: Address,
    /// Contract name -> address
    pub contracts: BTreeMap<String, Address>,
}

impl Deployment {
    pub fn address_of(&self, contract: &str) -> Option<Address> {
        self.contracts.get(contract).copied()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// Build a ready-to-use devnet from `config`.
pub fn provision(config: &AppConfig) -> Result<(DevnetDex, Deployment)> {
    config.validate()?;
    let plan = &config.deployment;
    let deployer = plan.deployer;

    let mut bank = EtherBank::new();
    bank.fund(deployer, plan.deployer_balance)?;
    for account in &config.accounts {
        bank.fund(account.address, account.balance)?;
    }

    let token_address = deployer.create(nonces::TOKEN);
    let dex_address = deployer.create(nonces::DEX);
    tracing::info!("Deploying {} at {}", contracts::TOKEN, token_address);
    tracing::info!("Deploying {} at {}", contracts::DEX, dex_address);

    let mut token = Balloons::deploy(token_address, deployer, &plan.token);
    for airdrop in &plan.airdrops {
        token.transfer(deployer, airdrop.to, airdrop.amount)?;
        tracing::info!("Airdropped {} {} to {}", airdrop.amount, token.symbol(), airdrop.to);
    }
    token.approve(deployer, dex_address, plan.dex_allowance)?;

    let mut dex = Dex::new(dex_address, token, bank, config.fee)?;
    dex.init(
        CallContext::with_value(deployer, plan.init_value),
        plan.init_tokens,
    )?;

    let deployment = Deployment {
        chain_id: config.chain.chain_id(),
        chain: config.chain,
        deployer,
        contracts: BTreeMap::from([
            (contracts::TOKEN.to_string(), token_address),
            (contracts::DEX.to_string(), dex_address),
        ]),
    };
    tracing::info!(
        "Provisioned {} (chain id {}): {}",
        deployment.chain,
        deployment.chain_id,
        dex.pool_state()
    );

    Ok((dex, deployment))
}
