//! Balance computation
//!
//! Balances are never stored: they are derived on every read by folding
//! over the movement log. The fold is commutative, so insertion order does
//! not affect the result; what matters is that every appended movement is
//! included exactly once.

use crate::store::traits::MovementStore;
use crate::types::{AccountId, CardId};
use rust_decimal::Decimal;

/// Balance of an account: the sum of its signed movements
///
/// No side effects. Reflects every movement appended before the call.
pub fn balance(movements: &impl MovementStore, account: AccountId) -> Decimal {
    movements
        .movements_for(account)
        .iter()
        .map(|m| m.amount)
        .sum()
}

/// Total of a card's unsettled charges
///
/// Available credit is `limit - outstanding_charges`; settled charges no
/// longer count against the limit.
pub fn outstanding_charges(movements: &impl MovementStore, card: CardId) -> Decimal {
    movements
        .credit_movements_for(card)
        .iter()
        .filter(|m| !m.settled)
        .map(|m| m.amount)
        .sum()
}
