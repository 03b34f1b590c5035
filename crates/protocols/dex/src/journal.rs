//! Ledger movements performed during one pool call, kept so a failing call
//! can be unwound.

use dex_core::{Address, U256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Movement {
    Eth {
        from: Address,
        to: Address,
        amount: U256,
    },
    Token {
        from: Address,
        to: Address,
        amount: U256,
    },
}

#[derive(Debug, Default)]
pub(crate) struct Journal {
    movements: Vec<Movement>,
}

impl Journal {
    pub(crate) fn record(&mut self, movement: Movement) {
        self.movements.push(movement);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    /// Movements newest first, ready to be reversed
    pub(crate) fn drain_reversed(&mut self) -> impl Iterator<Item = Movement> + '_ {
        self.movements.drain(..).rev()
    }
}
