//! Types module
//!
//! Contains core data structures used throughout the crate.
//! This module organizes types into logical submodules:
//! - `client`: Client identity
//! - `movement`: Ledger entries and the pending-purchase slot
//! - `error`: Error types for the bank ledger engine

pub mod client;
pub mod error;
pub mod movement;

pub use client::Client;
pub use error::BankError;
pub use movement::{CreditMovement, Movement, PendingPurchase};

/// Account identifier
pub type AccountId = u64;

/// Card identifier, shared by both card variants
pub type CardId = u64;
