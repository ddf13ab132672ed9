//! Bank Ledger Engine Library
//! # Overview
//!
//! This library provides the core of a small retail bank: accounts with an
//! append-only movement ledger, derived balances, transfers with fees, and
//! debit/credit cards with PIN lockout and deferred settlement.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Client, Movement, errors)
//! - [`store`] - Storage-collaborator traits and the in-memory backend
//! - [`core`] - Business logic components:
//!   - [`core::ledger`] - Balance derivation over the movement log
//!   - [`core::account`] - Account lifecycle, movements, transfers, card issuance
//!   - [`core::card`] - PIN verification and lockout, shared by both variants
//!   - [`core::debit_card`] - Immediate settlement against the account
//!   - [`core::credit_card`] - Deferred settlement against a credit limit
//!
//! # Ledger model
//!
//! Balances are never stored. Every account operation appends a signed
//! [`types::Movement`] and every balance read folds over the log, so the
//! log is the single source of truth and the full history is auditable.
//!
//! Credit cards keep their own charge log ([`types::CreditMovement`]);
//! charges stay unsettled, reducing available credit, until liquidation
//! settles them all and posts their total as one forced debit on the
//! linked account.

// Module declarations
pub mod core;
pub mod store;
pub mod types;

pub use crate::core::{Account, Card, CreditCard, DebitCard, PinLock};
pub use store::MemoryBank;
pub use types::{AccountId, BankError, CardId, Client, CreditMovement, Movement, PendingPurchase};
