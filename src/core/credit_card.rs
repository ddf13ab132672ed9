//! Credit card: deferred settlement against a credit limit
//!
//! Charges accumulate as unsettled credit movements and reduce available
//! credit without touching the linked account. Periodic liquidation settles
//! every outstanding charge and posts their total as a single forced debit
//! to the account, restoring available credit to the limit.
//!
//! Online purchases are two-phase: an authorization holds the amount and a
//! one-time token in the card's single pending-purchase slot (no movement
//! is posted), and a matching confirmation posts the charge.

use crate::core::card::{
    Card, PinLock, CONCEPT_CASH_WITHDRAWAL, CONCEPT_CASH_WITHDRAWAL_FEE, CONCEPT_ONLINE_PURCHASE,
    CONCEPT_PURCHASE,
};
use crate::core::ledger;
use crate::store::traits::{AccountDirectory, CardStore, MovementStore};
use crate::types::{AccountId, BankError, CardId, CreditMovement, PendingPurchase};
use rand::Rng;
use rust_decimal::Decimal;
use tracing::debug;

/// Concept for the forced debit posted by liquidation
pub const CONCEPT_SETTLEMENT: &str = "credit card settlement";

/// Fixed fee charged on every credit-card cash withdrawal
fn default_withdrawal_fee() -> Decimal {
    Decimal::from(3)
}

/// A credit card linked to an account
///
/// Exclusively owns its pending-purchase slot; its charge history lives in
/// the movement store and available credit is recomputed from it on every
/// read.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditCard {
    id: CardId,
    account: AccountId,
    holder: String,
    lock: PinLock,

    /// Credit limit granted at issuance
    limit: Decimal,

    /// Fixed fee added to every cash withdrawal
    withdrawal_fee: Decimal,

    /// At most one authorized-but-unconfirmed online purchase
    pending: Option<PendingPurchase>,
}

impl CreditCard {
    /// Construct an issued credit card
    ///
    /// Only reachable through
    /// [`crate::core::account::Account::issue_credit_card`], which
    /// enforces the titular check.
    pub(crate) fn new(
        id: CardId,
        account: AccountId,
        holder: &str,
        lock: PinLock,
        limit: Decimal,
    ) -> Self {
        CreditCard {
            id,
            account,
            holder: holder.to_string(),
            lock,
            limit,
            withdrawal_fee: default_withdrawal_fee(),
            pending: None,
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

    /// Credit limit granted at issuance
    pub fn limit(&self) -> Decimal {
        self.limit
    }

    /// Fixed fee added to every cash withdrawal
    pub fn withdrawal_fee(&self) -> Decimal {
        self.withdrawal_fee
    }

    /// The authorized-but-unconfirmed online purchase, if any
    pub fn pending_purchase(&self) -> Option<&PendingPurchase> {
        self.pending.as_ref()
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
            cards.persist_card(Card::Credit(self.clone()));
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
        cards.persist_card(Card::Credit(self.clone()));
        Ok(())
    }

    /// Available credit: the limit minus all unsettled charges
    ///
    /// Recomputed from the stored movements on every call, never cached.
    pub fn available_credit(&self, movements: &impl MovementStore) -> Decimal {
        self.limit - ledger::outstanding_charges(movements, self.id)
    }

    /// Withdraw cash on credit
    ///
    /// Posts two unsettled charges: the amount and the fixed withdrawal
    /// fee. The fee is not part of the credit check, so available credit
    /// can dip below zero by at most the fee.
    ///
    /// # Errors
    ///
    /// - [`BankError::CardBlocked`] / [`BankError::WrongPin`]
    /// - [`BankError::InsufficientFunds`] if `amount` exceeds available credit
    /// - [`BankError::InvalidAmount`] if `amount <= 0`
    pub fn withdraw<B>(&mut self, bank: &mut B, pin: u16, amount: Decimal) -> Result<(), BankError>
    where
        B: MovementStore + CardStore,
    {
        self.authorize(bank, pin, amount)?;
        bank.append_credit(CreditMovement::new(self.id, amount, CONCEPT_CASH_WITHDRAWAL));
        bank.append_credit(CreditMovement::new(
            self.id,
            self.withdrawal_fee,
            CONCEPT_CASH_WITHDRAWAL_FEE,
        ));
        Ok(())
    }

    /// Pay at a point of sale on credit
    ///
    /// Posts one unsettled charge; no fee.
    ///
    /// # Errors
    ///
    /// Same contract as [`CreditCard::withdraw`].
    pub fn purchase<B>(&mut self, bank: &mut B, pin: u16, amount: Decimal) -> Result<(), BankError>
    where
        B: MovementStore + CardStore,
    {
        self.authorize(bank, pin, amount)?;
        bank.append_credit(CreditMovement::new(self.id, amount, CONCEPT_PURCHASE));
        Ok(())
    }

    /// Authorize an online purchase, returning its confirmation token
    ///
    /// Holds the amount and a freshly generated 4-digit token in the
    /// card's pending-purchase slot, overwriting any previous unconfirmed
    /// authorization. No movement is posted and available credit is
    /// unaffected until the purchase is confirmed.
    ///
    /// # Errors
    ///
    /// Same contract as [`CreditCard::withdraw`].
    pub fn authorize_online_purchase<B>(
        &mut self,
        bank: &mut B,
        pin: u16,
        amount: Decimal,
    ) -> Result<u16, BankError>
    where
        B: MovementStore + CardStore,
    {
        self.authorize(bank, pin, amount)?;
        let token = rand::thread_rng().gen_range(0..10_000);
        if self.pending.is_some() {
            debug!(card = self.id, "overwriting unconfirmed online purchase");
        }
        self.pending = Some(PendingPurchase { amount, token });
        Ok(token)
    }

    /// Confirm a previously authorized online purchase
    ///
    /// On a token match, posts one unsettled charge for the authorized
    /// amount and clears the pending slot, consuming the token.
    ///
    /// # Errors
    ///
    /// Returns [`BankError::UnknownToken`] if no purchase is pending or
    /// the token does not match; nothing is posted in that case.
    pub fn confirm_online_purchase(
        &mut self,
        movements: &mut impl MovementStore,
        token: u16,
    ) -> Result<(), BankError> {
        match self.pending {
            Some(purchase) if purchase.token == token => {
                movements.append_credit(CreditMovement::new(
                    self.id,
                    purchase.amount,
                    CONCEPT_ONLINE_PURCHASE,
                ));
                self.pending = None;
                Ok(())
            }
            _ => Err(BankError::unknown_token(token)),
        }
    }

    /// Settle all outstanding charges against the linked account
    ///
    /// Resolves the linked account, marks every unsettled charge as
    /// settled and posts their total as a single forced debit on it.
    /// Afterwards available credit is back at the limit. With nothing
    /// unsettled this is a no-op: no zero-amount debit is posted.
    ///
    /// # Errors
    ///
    /// Returns [`BankError::InvalidDestination`] if the linked account
    /// cannot be resolved; no charge is settled in that case.
    pub fn liquidate<B>(&self, bank: &mut B) -> Result<(), BankError>
    where
        B: MovementStore + AccountDirectory,
    {
        let account = bank
            .find_account(self.account)
            .cloned()
            .ok_or_else(|| BankError::invalid_destination(self.account))?;
        let total = bank.settle_credit_movements(self.id);
        if total.is_zero() {
            debug!(card = self.id, "liquidation skipped, no unsettled charges");
            return Ok(());
        }
        account.forced_withdraw(bank, total, CONCEPT_SETTLEMENT);
        debug!(card = self.id, %total, "credit card liquidated");
        Ok(())
    }

    /// Shared PIN + credit checks, in the order the operations apply them
    fn authorize<B>(&mut self, bank: &mut B, pin: u16, amount: Decimal) -> Result<(), BankError>
    where
        B: MovementStore + CardStore,
    {
        self.verify_pin(bank, pin)?;
        let available = self.available_credit(bank);
        if amount > available {
            return Err(BankError::insufficient_funds(available, amount));
        }
        if amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(amount));
        }
        Ok(())
    }
}
