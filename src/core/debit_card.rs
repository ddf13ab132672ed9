//! Debit card: immediate settlement against the linked account
//!
//! Every authorized operation posts a signed movement directly to the
//! linked account; there is no deferred phase. The three public operations
//! are behaviorally identical and exist for interface symmetry with the
//! credit-card variant.

use crate::core::card::{
    Card, PinLock, CONCEPT_CASH_WITHDRAWAL, CONCEPT_ONLINE_PURCHASE, CONCEPT_PURCHASE,
};
use crate::core::ledger;
use crate::store::traits::{CardStore, MovementStore};
use crate::types::{AccountId, BankError, CardId, Movement};
use rust_decimal::Decimal;

/// A debit card linked to an account
#[derive(Debug, Clone, PartialEq)]
pub struct DebitCard {
    id: CardId,
    account: AccountId,
    holder: String,
    lock: PinLock,
}

impl DebitCard {
    /// Construct an issued debit card
    ///
    /// Only reachable through [`crate::core::account::Account::issue_debit_card`],
    /// which enforces the titular check.
    pub(crate) fn new(id: CardId, account: AccountId, holder: &str, lock: PinLock) -> Self {
        DebitCard {
            id,
            account,
            holder: holder.to_string(),
            lock,
        }
    }

    /// Card identifier
    pub fn id(&self) -> CardId {
        self.id
    }

    /// Linked account
    pub fn account(&self) -> AccountId {
        self.account
    }

    /// Tax id of the titular the card was issued to
    pub fn holder(&self) -> &str {
        &self.holder
    }

    /// Current PIN
    pub fn pin(&self) -> u16 {
        self.lock.pin()
    }

    /// Whether the card is still active
    pub fn is_active(&self) -> bool {
        self.lock.is_active()
    }

    /// Verify a supplied PIN (see [`PinLock::verify`])
    ///
    /// The attempt that blocks the card re-persists it, so the stored
    /// copy reflects the block.
    ///
    /// # Errors
    ///
    /// [`BankError::CardBlocked`] or [`BankError::WrongPin`].
    pub fn verify_pin(&mut self, cards: &mut impl CardStore, pin: u16) -> Result<(), BankError> {
        let was_active = self.lock.is_active();
        let result = self.lock.verify(self.id, pin);
        if was_active && !self.lock.is_active() {
            cards.persist_card(Card::Debit(self.clone()));
        }
        result
    }

    /// Change the PIN (see [`PinLock::change`])
    ///
    /// A successful change re-persists the card.
    ///
    /// # Errors
    ///
    /// [`BankError::WrongPin`] if `old` does not match.
    pub fn change_pin(
        &mut self,
        cards: &mut impl CardStore,
        old: u16,
        new: u16,
    ) -> Result<(), BankError> {
        self.lock.change(self.id, old, new)?;
        cards.persist_card(Card::Debit(self.clone()));
        Ok(())
    }

    /// Withdraw cash from the linked account
    ///
    /// # Errors
    ///
    /// - [`BankError::CardBlocked`] / [`BankError::WrongPin`]
    /// - [`BankError::InvalidAmount`] if `amount <= 0`
    /// - [`BankError::InsufficientFunds`] if `amount` exceeds the balance
    pub fn withdraw<B>(&mut self, bank: &mut B, pin: u16, amount: Decimal) -> Result<(), BankError>
    where
        B: MovementStore + CardStore,
    {
        self.charge(bank, pin, amount, CONCEPT_CASH_WITHDRAWAL)
    }

    /// Pay at a point of sale
    ///
    /// # Errors
    ///
    /// Same contract as [`DebitCard::withdraw`].
    pub fn purchase<B>(&mut self, bank: &mut B, pin: u16, amount: Decimal) -> Result<(), BankError>
    where
        B: MovementStore + CardStore,
    {
        self.charge(bank, pin, amount, CONCEPT_PURCHASE)
    }

    /// Pay online
    ///
    /// Debit cards settle immediately, so there is no authorize/confirm
    /// phase: this behaves exactly like [`DebitCard::purchase`].
    ///
    /// # Errors
    ///
    /// Same contract as [`DebitCard::withdraw`].
    pub fn online_purchase<B>(
        &mut self,
        bank: &mut B,
        pin: u16,
        amount: Decimal,
    ) -> Result<(), BankError>
    where
        B: MovementStore + CardStore,
    {
        self.charge(bank, pin, amount, CONCEPT_ONLINE_PURCHASE)
    }

    fn charge<B>(
        &mut self,
        bank: &mut B,
        pin: u16,
        amount: Decimal,
        concept: &str,
    ) -> Result<(), BankError>
    where
        B: MovementStore + CardStore,
    {
        self.verify_pin(bank, pin)?;
        if amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(amount));
        }
        let balance = ledger::balance(bank, self.account);
        if amount > balance {
            return Err(BankError::insufficient_funds(balance, amount));
        }
        bank.append(Movement::new(self.account, -amount, concept));
        Ok(())
    }
}
