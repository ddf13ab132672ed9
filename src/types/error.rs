//! Error types for the bank ledger engine
//!
//! This module defines all error types that can occur while operating on
//! accounts and cards. Every variant represents a business-rule violation
//! reported synchronously to the caller of the triggering operation; there
//! are no transient faults and no retry semantics.
//!
//! # Error Categories
//!
//! - **Amount errors**: non-positive amounts, insufficient funds or credit
//! - **Account errors**: invalid transfer destination, finalization rules
//! - **Authorization errors**: unknown clients, non-titular card requests
//! - **Card errors**: blocked cards, wrong PINs, unknown purchase tokens

use crate::types::{AccountId, CardId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the bank ledger engine
///
/// This enum represents all possible errors that can occur during account
/// and card operations. Each variant includes relevant context to help
/// diagnose and resolve the issue.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BankError {
    /// Amount is zero or negative
    ///
    /// Deposits, withdrawals, purchases and transfers all require a
    /// strictly positive amount.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Insufficient balance or available credit for the operation
    ///
    /// The operation is rejected and no movement is recorded.
    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Balance (or available credit) at the time of the request
        available: Decimal,
        /// Requested amount
        requested: Decimal,
    },

    /// The target account is the acting account itself or cannot be
    /// resolved
    ///
    /// Raised by transfers and by credit-card settlement when the linked
    /// account is not resolvable.
    #[error("Invalid destination account {account}")]
    InvalidDestination {
        /// The rejected destination account id
        account: AccountId,
    },

    /// Titulars can no longer be added to a finalized account
    #[error("Account {account} is already finalized")]
    AlreadyFinalized {
        /// The finalized account id
        account: AccountId,
    },

    /// An account cannot be finalized without at least one titular
    #[error("Account {account} has no titulars")]
    NoTitulars {
        /// The account id missing titulars
        account: AccountId,
    },

    /// The client id does not resolve to a known client
    #[error("Client {nif} not found")]
    ClientNotFound {
        /// The unresolved tax id
        nif: String,
    },

    /// The client is not a titular of the account
    ///
    /// Cards are issued only to clients that are titulars of the linked
    /// account at issuance time.
    #[error("Client {nif} is not authorized on account {account}")]
    ClientNotAuthorized {
        /// Tax id of the rejected client
        nif: String,
        /// The account the card was requested against
        account: AccountId,
    },

    /// The card is blocked after too many failed PIN attempts
    ///
    /// Blocked is a terminal state; every subsequent operation on the
    /// card reports this error.
    #[error("Card {card} is blocked")]
    CardBlocked {
        /// The blocked card id
        card: CardId,
    },

    /// The supplied PIN does not match the card PIN
    #[error("Wrong PIN for card {card}")]
    WrongPin {
        /// The card the PIN was supplied for
        card: CardId,
    },

    /// No pending online purchase matches the supplied token
    ///
    /// Raised when the token was never issued, was already consumed, or
    /// was overwritten by a newer authorization.
    #[error("No pending purchase matches token {token:04}")]
    UnknownToken {
        /// The unmatched confirmation token
        token: u16,
    },
}

// Helper functions for creating common errors

impl BankError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        BankError::InvalidAmount { amount }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(available: Decimal, requested: Decimal) -> Self {
        BankError::InsufficientFunds {
            available,
            requested,
        }
    }

    /// Create an InvalidDestination error
    pub fn invalid_destination(account: AccountId) -> Self {
        BankError::InvalidDestination { account }
    }

    /// Create an AlreadyFinalized error
    pub fn already_finalized(account: AccountId) -> Self {
        BankError::AlreadyFinalized { account }
    }

    /// Create a NoTitulars error
    pub fn no_titulars(account: AccountId) -> Self {
        BankError::NoTitulars { account }
    }

    /// Create a ClientNotFound error
    pub fn client_not_found(nif: &str) -> Self {
        BankError::ClientNotFound {
            nif: nif.to_string(),
        }
    }

    /// Create a ClientNotAuthorized error
    pub fn client_not_authorized(nif: &str, account: AccountId) -> Self {
        BankError::ClientNotAuthorized {
            nif: nif.to_string(),
            account,
        }
    }

    /// Create a CardBlocked error
    pub fn card_blocked(card: CardId) -> Self {
        BankError::CardBlocked { card }
    }

    /// Create a WrongPin error
    pub fn wrong_pin(card: CardId) -> Self {
        BankError::WrongPin { card }
    }

    /// Create an UnknownToken error
    pub fn unknown_token(token: u16) -> Self {
        BankError::UnknownToken { token }
    }
}
