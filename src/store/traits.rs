//! Storage-collaborator traits
//!
//! The core consumes persistence through these narrow traits and nothing
//! else: lookups, appends, and the single sanctioned settled-flag flip.
//! Handles are passed explicitly into account and card operations instead
//! of living in process-wide state, so alternative backends can be swapped
//! in without touching the business logic.

use crate::core::account::Account;
use crate::core::card::Card;
use crate::types::{AccountId, CardId, Client, CreditMovement, Movement};
use rust_decimal::Decimal;

/// Lookup of clients by tax id
pub trait ClientDirectory {
    /// Find a client by tax id
    fn find_client(&self, nif: &str) -> Option<&Client>;
}

/// Lookup of finalized accounts by id
pub trait AccountDirectory {
    /// Find an account by id
    ///
    /// Only accounts that have been finalized are visible here.
    fn find_account(&self, id: AccountId) -> Option<&Account>;
}

/// Append-only record of ledger entries per account and card
///
/// The store assigns creation order (`seq`) on append. Reads must observe
/// every previously appended movement (read-your-writes); the balance fold
/// itself is order-independent.
pub trait MovementStore {
    /// Append an account movement, assigning its creation order
    fn append(&mut self, movement: Movement);

    /// All movements recorded for the given account
    fn movements_for(&self, account: AccountId) -> Vec<&Movement>;

    /// Append a credit-card charge, assigning its creation order
    fn append_credit(&mut self, movement: CreditMovement);

    /// All charges recorded for the given card, settled or not
    fn credit_movements_for(&self, card: CardId) -> Vec<&CreditMovement>;

    /// Mark every unsettled charge of the card as settled
    ///
    /// Returns the total of the charges settled by this call. This is the
    /// only mutation of stored records the core performs; each charge
    /// flips at most once because already-settled charges are skipped.
    fn settle_credit_movements(&mut self, card: CardId) -> Decimal;
}

/// Persistence of account records
pub trait AccountStore {
    /// Persist an account, making it visible to [`AccountDirectory`] lookup
    fn persist_account(&mut self, account: &Account);
}

/// Persistence of issued cards
pub trait CardStore {
    /// Allocate the id for a card about to be issued
    fn next_card_id(&mut self) -> CardId;

    /// Persist a card variant, inserting or replacing by id
    ///
    /// Called at issuance and again whenever the card's stored state
    /// changes (block, PIN change), so the registry tracks the live card.
    fn persist_card(&mut self, card: Card);
}
