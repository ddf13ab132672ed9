//! Shared card capability: PIN verification and lockout
//!
//! Both card variants embed a [`PinLock`] instead of inheriting from a
//! common base: the capability is composed in, and variant selection
//! happens through the [`Card`] sum type at the call site.
//!
//! # Lockout state machine
//!
//! `Active --(3 consecutive wrong PINs)--> Blocked`. Blocked is terminal;
//! there is no unblock operation in this core.

use crate::core::credit_card::CreditCard;
use crate::core::debit_card::DebitCard;
use crate::store::traits::CardStore;
use crate::types::{AccountId, BankError, CardId};
use rand::Rng;
use tracing::warn;

/// Consecutive failed PIN attempts that block a card
pub const MAX_FAILED_ATTEMPTS: u8 = 3;

/// Concept for cash withdrawn with a card
pub const CONCEPT_CASH_WITHDRAWAL: &str = "cash withdrawal";
/// Concept for the fixed fee on a credit-card cash withdrawal
pub const CONCEPT_CASH_WITHDRAWAL_FEE: &str = "cash withdrawal fee";
/// Concept for an in-store card purchase
pub const CONCEPT_PURCHASE: &str = "card purchase";
/// Concept for a confirmed online purchase
pub const CONCEPT_ONLINE_PURCHASE: &str = "online purchase";

/// PIN secret plus lockout state, embedded by both card variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinLock {
    /// 4-digit numeric secret (0000-9999)
    pin: u16,

    /// Whether the card accepts operations; `false` means blocked
    active: bool,

    /// Consecutive failed attempts since the last successful verification
    failed_attempts: u8,
}

impl PinLock {
    /// Create a lock with the given PIN, active and with no failed attempts
    pub fn new(pin: u16) -> Self {
        PinLock {
            pin,
            active: true,
            failed_attempts: 0,
        }
    }

    /// Create a lock with a random 4-digit PIN
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::new(rng.gen_range(0..10_000))
    }

    /// Verify a supplied PIN
    ///
    /// On a match, resets the failed-attempt counter. On a mismatch,
    /// increments it; the attempt that reaches the threshold blocks the
    /// card as a side effect of the failing call.
    ///
    /// # Errors
    ///
    /// - [`BankError::CardBlocked`] if the card is already blocked
    /// - [`BankError::WrongPin`] if the supplied PIN does not match
    pub fn verify(&mut self, card: CardId, supplied: u16) -> Result<(), BankError> {
        if !self.active {
            return Err(BankError::card_blocked(card));
        }
        if supplied != self.pin {
            self.failed_attempts += 1;
            if self.failed_attempts >= MAX_FAILED_ATTEMPTS {
                self.active = false;
                warn!(card, "card blocked after {MAX_FAILED_ATTEMPTS} failed PIN attempts");
            }
            return Err(BankError::wrong_pin(card));
        }
        self.failed_attempts = 0;
        Ok(())
    }

    /// Replace the PIN after proving knowledge of the current one
    ///
    /// Does not touch the failed-attempt counter or the active flag.
    ///
    /// # Errors
    ///
    /// Returns [`BankError::WrongPin`] if `old` does not match.
    pub fn change(&mut self, card: CardId, old: u16, new: u16) -> Result<(), BankError> {
        if old != self.pin {
            return Err(BankError::wrong_pin(card));
        }
        self.pin = new;
        Ok(())
    }

    /// Current PIN
    pub fn pin(&self) -> u16 {
        self.pin
    }

    /// Whether the card still accepts operations
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// An issued card, selected by variant
///
/// Used at the persistence seam and wherever code needs to operate on a
/// card without caring which variant it is.
#[derive(Debug, Clone, PartialEq)]
pub enum Card {
    /// Immediate settlement against the linked account
    Debit(DebitCard),
    /// Deferred settlement against a credit limit
    Credit(CreditCard),
}

impl Card {
    /// Card identifier
    pub fn id(&self) -> CardId {
        match self {
            Card::Debit(card) => card.id(),
            Card::Credit(card) => card.id(),
        }
    }

    /// Linked account
    pub fn account(&self) -> AccountId {
        match self {
            Card::Debit(card) => card.account(),
            Card::Credit(card) => card.account(),
        }
    }

    /// Tax id of the titular the card was issued to
    pub fn holder(&self) -> &str {
        match self {
            Card::Debit(card) => card.holder(),
            Card::Credit(card) => card.holder(),
        }
    }

    /// Whether the card is still active
    pub fn is_active(&self) -> bool {
        match self {
            Card::Debit(card) => card.is_active(),
            Card::Credit(card) => card.is_active(),
        }
    }

    /// Verify a supplied PIN, variant-independently
    ///
    /// The attempt that blocks the card re-persists it, so the stored
    /// copy reflects the block.
    ///
    /// # Errors
    ///
    /// Same contract as [`PinLock::verify`].
    pub fn verify_pin(&mut self, cards: &mut impl CardStore, pin: u16) -> Result<(), BankError> {
        match self {
            Card::Debit(card) => card.verify_pin(cards, pin),
            Card::Credit(card) => card.verify_pin(cards, pin),
        }
    }

    /// Change the PIN, variant-independently
    ///
    /// A successful change re-persists the card.
    ///
    /// # Errors
    ///
    /// Same contract as [`PinLock::change`].
    pub fn change_pin(
        &mut self,
        cards: &mut impl CardStore,
        old: u16,
        new: u16,
    ) -> Result<(), BankError> {
        match self {
            Card::Debit(card) => card.change_pin(cards, old, new),
            Card::Credit(card) => card.change_pin(cards, old, new),
        }
    }
}
