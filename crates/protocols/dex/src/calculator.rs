//! DEX Calculator
//!
//! Pool math using the constant product formula (x * y = k). All arithmetic is
//! checked `U256` with floor division.

use dex_core::{DexError, FeeConfig, U256};

/// Basis points in one whole
const BPS: u64 = 10_000;

fn mul(a: U256, b: U256) -> Result<U256, DexError> {
    a.checked_mul(b).ok_or(DexError::Overflow)
}

fn add(a: U256, b: U256) -> Result<U256, DexError> {
    a.checked_add(b).ok_or(DexError::Overflow)
}

/// Output amount for a swap of `x_input` against reserves `(x_reserves, y_reserves)`
///
/// Formula: y_output = (x_input * fee_num * y_reserves) / (x_reserves * fee_denom + x_input * fee_num)
///
/// A zero input quotes zero regardless of reserves; otherwise an empty
/// reserve fails with `NotEnoughLiquidity`.
pub fn price(
    x_input: U256,
    x_reserves: U256,
    y_reserves: U256,
    fee: &FeeConfig,
) -> Result<U256, DexError> {
    if x_input.is_zero() {
        return Ok(U256::ZERO);
    }
    if x_reserves.is_zero() || y_reserves.is_zero() {
        return Err(DexError::NotEnoughLiquidity);
    }

    let x_input_with_fee = mul(x_input, U256::from(fee.numerator))?;
    let numerator = mul(x_input_with_fee, y_reserves)?;
    let denominator = add(
        mul(x_reserves, U256::from(fee.denominator))?,
        x_input_with_fee,
    )?;

    if denominator.is_zero() {
        return Err(DexError::NotEnoughLiquidity);
    }

    Ok(numerator / denominator)
}

/// Token amount and shares produced by depositing `eth_input`.
///
/// Returns (token_deposit, liquidity_minted).
/// token_deposit = eth_input * token_reserve / eth_reserve
/// liquidity_minted = eth_input * total_liquidity / eth_reserve
pub fn deposit_amounts(
    eth_input: U256,
    eth_reserve: U256,
    token_reserve: U256,
    total_liquidity: U256,
) -> Result<(U256, U256), DexError> {
    if eth_reserve.is_zero() {
        return Err(DexError::NotEnoughLiquidity);
    }
    let token_deposit = mul(eth_input, token_reserve)? / eth_reserve;
    let liquidity_minted = mul(eth_input, total_liquidity)? / eth_reserve;
    Ok((token_deposit, liquidity_minted))
}

/// Share of the reserves paid out for burning `amount` shares.
///
/// Returns (eth_payout, token_payout).
/// eth_payout = amount * eth_reserve / total_liquidity
/// token_payout = amount * token_reserve / total_liquidity
pub fn redeem_amounts(
    amount: U256,
    eth_reserve: U256,
    token_reserve: U256,
    total_liquidity: U256,
) -> Result<(U256, U256), DexError> {
    if total_liquidity.is_zero() || amount > total_liquidity {
        return Err(DexError::NotEnoughLiquidity);
    }
    let eth_payout = mul(amount, eth_reserve)? / total_liquidity;
    let token_payout = mul(amount, token_reserve)? / total_liquidity;
    Ok((eth_payout, token_payout))
}

/// Part of `x_input` retained by the pool as fee, in input units (floor)
pub fn fee_amount(x_input: U256, fee: &FeeConfig) -> Result<U256, DexError> {
    if fee.denominator == 0 {
        return Ok(U256::ZERO);
    }
    let kept = fee.denominator.saturating_sub(fee.numerator);
    Ok(mul(x_input, U256::from(kept))? / U256::from(fee.denominator))
}

/// Price impact in basis points: how far the execution price falls short of
/// the spot price `y_reserves / x_reserves`.
pub fn price_impact_bps(
    x_input: U256,
    x_reserves: U256,
    y_reserves: U256,
    y_output: U256,
) -> Result<u64, DexError> {
    if x_input.is_zero() || x_reserves.is_zero() {
        return Ok(0);
    }

    let spot_output = mul(x_input, y_reserves)? / x_reserves;
    if spot_output.is_zero() || y_output >= spot_output {
        return Ok(0);
    }

    let shortfall = mul(spot_output - y_output, U256::from(BPS))? / spot_output;
    Ok(u64::try_from(shortfall).unwrap_or(BPS))
}
