//! Core business logic
//!
//! # Components
//!
//! - `ledger` - Balance derivation over the movement log
//! - `account` - Account lifecycle, movements, transfers, card issuance
//! - `card` - Shared PIN/lockout capability and the card sum type
//! - `debit_card` - Immediate-settlement card
//! - `credit_card` - Deferred-settlement card with online-purchase flow

pub mod account;
pub mod card;
pub mod credit_card;
pub mod debit_card;
pub mod ledger;

pub use account::{transfer_fee, Account};
pub use card::{Card, PinLock, MAX_FAILED_ATTEMPTS};
pub use credit_card::CreditCard;
pub use debit_card::DebitCard;
