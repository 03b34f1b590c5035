//! Read-only previews against the current reserves

use dex_core::{DexError, U256};
use ledger::{NativeLedger, TokenLedger};

use crate::calculator;
use crate::pool::Dex;
use crate::state::{DepositQuote, SwapDirection, SwapQuote};

impl<T: TokenLedger, N: NativeLedger> Dex<T, N> {
    /// What `eth_to_token` would pay for `eth_input` right now
    pub fn quote_eth_to_token(&self, eth_input: U256) -> Result<SwapQuote, DexError> {
        let state = self.pool_state();
        self.quote(
            SwapDirection::EthToToken,
            eth_input,
            state.eth_reserve,
            state.token_reserve,
        )
    }

    /// What `token_to_eth` would pay for `token_input` right now
    pub fn quote_token_to_eth(&self, token_input: U256) -> Result<SwapQuote, DexError> {
        let state = self.pool_state();
        self.quote(
            SwapDirection::TokenToEth,
            token_input,
            state.token_reserve,
            state.eth_reserve,
        )
    }

    /// Tokens and shares a deposit of `eth_input` would involve.
    ///
    /// Fails with `NotEnoughLiquidity` before `init`.
    pub fn deposit_requirement(&self, eth_input: U256) -> Result<DepositQuote, DexError> {
        let state = self.pool_state();
        let (token_deposit, liquidity_minted) = calculator::deposit_amounts(
            eth_input,
            state.eth_reserve,
            state.token_reserve,
            state.total_liquidity,
        )?;
        Ok(DepositQuote {
            eth_input,
            token_deposit,
            liquidity_minted,
        })
    }

    fn quote(
        &self,
        direction: SwapDirection,
        input: U256,
        input_reserve: U256,
        output_reserve: U256,
    ) -> Result<SwapQuote, DexError> {
        let fee = self.fee();
        let output = calculator::price(input, input_reserve, output_reserve, &fee)?;
        Ok(SwapQuote {
            direction,
            input,
            output,
            fee_amount: calculator::fee_amount(input, &fee)?,
            price_impact_bps: calculator::price_impact_bps(
                input,
                input_reserve,
                output_reserve,
                output,
            )?,
        })
    }
}
