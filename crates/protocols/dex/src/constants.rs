//! DEX Constants
//!
//! Contract names and deployment nonces used by provisioning.

/// Names under which contracts appear in the deployment record
pub mod contracts {
    /// Fungible token paired against the base currency
    pub const TOKEN: &str = "Balloons";

    /// Pool engine
    pub const DEX: &str = "DEX";
}

/// Deployer nonces consumed by each contract creation.
///
/// Contract addresses follow the CREATE rule: `keccak(rlp([deployer, nonce]))[12..]`.
pub mod nonces {
    pub const TOKEN: u64 = 0;
    pub const DEX: u64 = 1;
}
