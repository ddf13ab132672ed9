//! Account operations
//!
//! This module provides the [`Account`] entity: titular management,
//! finalization, deposits and withdrawals, the transfer protocol, and card
//! issuance. An account never stores a balance; every read derives it from
//! the movement log (see [`crate::core::ledger`]).
//!
//! Storage collaborators are passed explicitly into each operation, so the
//! account logic has no dependency on any concrete backend.

use crate::core::card::{Card, PinLock};
use crate::core::credit_card::CreditCard;
use crate::core::debit_card::DebitCard;
use crate::core::ledger;
use crate::store::traits::{AccountDirectory, AccountStore, CardStore, ClientDirectory, MovementStore};
use crate::types::{AccountId, BankError, Client, Movement};
use rust_decimal::Decimal;
use tracing::debug;

/// Default concept for cash deposits
pub const CONCEPT_DEPOSIT: &str = "cash deposit";
/// Default concept for cash withdrawals
pub const CONCEPT_WITHDRAWAL: &str = "cash withdrawal";
/// Concept for the principal leg of an outgoing transfer
pub const CONCEPT_TRANSFER_OUT: &str = "outgoing transfer";
/// Concept for the fee leg of an outgoing transfer
pub const CONCEPT_TRANSFER_FEE: &str = "transfer fee";
/// Concept for the credit leg on the destination account
pub const CONCEPT_TRANSFER_IN: &str = "incoming transfer";

/// Fee charged on an outgoing transfer: 1% of the amount, 1.50 minimum
pub fn transfer_fee(amount: Decimal) -> Decimal {
    (amount / Decimal::ONE_HUNDRED).max(Decimal::new(150, 2))
}

/// A bank account
///
/// Owns its ordered list of titulars and is the sole writer of its
/// movements. Once finalized, the titular list is frozen and the account
/// becomes visible to directory lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Account identifier
    id: AccountId,

    /// Clients authorized to act on the account and to receive cards
    ///
    /// Duplicates are allowed; the authorization check is membership-based.
    titulars: Vec<Client>,

    /// Once set, titulars can no longer be added
    finalized: bool,
}

impl Account {
    /// Create a new, not-yet-finalized account with no titulars
    pub fn new(id: AccountId) -> Self {
        Account {
            id,
            titulars: Vec::new(),
            finalized: false,
        }
    }

    /// Account identifier
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Titulars of the account, in insertion order
    pub fn titulars(&self) -> &[Client] {
        &self.titulars
    }

    /// Whether the account has been finalized
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Add a client to the titular list
    ///
    /// # Errors
    ///
    /// Returns [`BankError::AlreadyFinalized`] if the account has been
    /// finalized.
    pub fn add_titular(&mut self, client: Client) -> Result<(), BankError> {
        if self.finalized {
            return Err(BankError::already_finalized(self.id));
        }
        self.titulars.push(client);
        Ok(())
    }

    /// Finalize the account, freezing its titular list
    ///
    /// Irreversible. Persists the account, making it visible to
    /// [`AccountDirectory`] lookup (and therefore a valid transfer
    /// destination).
    ///
    /// # Errors
    ///
    /// Returns [`BankError::NoTitulars`] if no titular has been added.
    pub fn finalize(&mut self, accounts: &mut impl AccountStore) -> Result<(), BankError> {
        if self.titulars.is_empty() {
            return Err(BankError::no_titulars(self.id));
        }
        self.finalized = true;
        accounts.persist_account(self);
        Ok(())
    }

    /// Current balance, derived from the movement log
    pub fn balance(&self, movements: &impl MovementStore) -> Decimal {
        ledger::balance(movements, self.id)
    }

    /// Credit the account
    ///
    /// # Errors
    ///
    /// Returns [`BankError::InvalidAmount`] if `amount <= 0`.
    pub fn deposit(
        &self,
        movements: &mut impl MovementStore,
        amount: Decimal,
        concept: &str,
    ) -> Result<(), BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(amount));
        }
        movements.append(Movement::new(self.id, amount, concept));
        Ok(())
    }

    /// Debit the account, enforcing the funds check
    ///
    /// # Errors
    ///
    /// - [`BankError::InvalidAmount`] if `amount <= 0`
    /// - [`BankError::InsufficientFunds`] if `amount` exceeds the balance
    pub fn withdraw(
        &self,
        movements: &mut impl MovementStore,
        amount: Decimal,
        concept: &str,
    ) -> Result<(), BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(amount));
        }
        let balance = self.balance(movements);
        if amount > balance {
            return Err(BankError::insufficient_funds(balance, amount));
        }
        movements.append(Movement::new(self.id, -amount, concept));
        Ok(())
    }

    /// Debit the account unconditionally
    ///
    /// Bypasses the funds check; the balance may go negative. Used by
    /// credit-card settlement, where the debit represents a debt being
    /// called in.
    pub fn forced_withdraw(
        &self,
        movements: &mut impl MovementStore,
        amount: Decimal,
        concept: &str,
    ) {
        movements.append(Movement::new(self.id, -amount, concept));
    }

    /// Transfer `amount` to another account, charging the sender a fee
    ///
    /// Performs, in order: withdraw the principal, withdraw the fee
    /// (see [`transfer_fee`]), resolve the destination, credit the
    /// destination. The legs are sequential and not compensated: a failure
    /// after the principal debit leaves that debit in place. Callers that
    /// need atomicity across the legs must provide their own transactional
    /// boundary.
    ///
    /// # Errors
    ///
    /// - [`BankError::InvalidDestination`] if `destination` is this
    ///   account or cannot be resolved
    /// - [`BankError::InvalidAmount`] / [`BankError::InsufficientFunds`]
    ///   from the individual withdraw legs
    pub fn transfer<B>(
        &self,
        bank: &mut B,
        destination: AccountId,
        amount: Decimal,
        concept: &str,
    ) -> Result<(), BankError>
    where
        B: MovementStore + AccountDirectory,
    {
        if destination == self.id {
            return Err(BankError::invalid_destination(destination));
        }
        self.withdraw(bank, amount, CONCEPT_TRANSFER_OUT)?;
        self.withdraw(bank, transfer_fee(amount), CONCEPT_TRANSFER_FEE)?;
        let receiver = bank
            .find_account(destination)
            .cloned()
            .ok_or_else(|| BankError::invalid_destination(destination))?;
        receiver.deposit(bank, amount, CONCEPT_TRANSFER_IN)?;
        debug!(from = self.id, to = destination, %amount, concept, "transfer completed");
        Ok(())
    }

    /// Issue a debit card for one of this account's titulars
    ///
    /// The card is created with a random 4-digit PIN, persisted through
    /// the card store, and returned to the caller.
    ///
    /// # Errors
    ///
    /// - [`BankError::ClientNotFound`] if `nif` does not resolve
    /// - [`BankError::ClientNotAuthorized`] if the client is not a titular
    pub fn issue_debit_card<B>(&self, bank: &mut B, nif: &str) -> Result<DebitCard, BankError>
    where
        B: ClientDirectory + CardStore,
    {
        let holder = self.authorized_titular(bank, nif)?;
        let card = DebitCard::new(
            bank.next_card_id(),
            self.id,
            &holder.nif,
            PinLock::random(&mut rand::thread_rng()),
        );
        bank.persist_card(Card::Debit(card.clone()));
        Ok(card)
    }

    /// Issue a credit card with the given credit limit for a titular
    ///
    /// # Errors
    ///
    /// Same contract as [`Account::issue_debit_card`].
    pub fn issue_credit_card<B>(
        &self,
        bank: &mut B,
        nif: &str,
        limit: Decimal,
    ) -> Result<CreditCard, BankError>
    where
        B: ClientDirectory + CardStore,
    {
        let holder = self.authorized_titular(bank, nif)?;
        let card = CreditCard::new(
            bank.next_card_id(),
            self.id,
            &holder.nif,
            PinLock::random(&mut rand::thread_rng()),
            limit,
        );
        bank.persist_card(Card::Credit(card.clone()));
        Ok(card)
    }

    /// Resolve a client and check it is a titular of this account
    fn authorized_titular(
        &self,
        clients: &impl ClientDirectory,
        nif: &str,
    ) -> Result<Client, BankError> {
        let client = clients
            .find_client(nif)
            .cloned()
            .ok_or_else(|| BankError::client_not_found(nif))?;
        if !self.titulars.iter().any(|t| t.nif == client.nif) {
            return Err(BankError::client_not_authorized(nif, self.id));
        }
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryBank;
    use rstest::rstest;

    fn sample_client() -> Client {
        Client::new("12345X", "Pepe", "Pérez")
    }

    fn finalized_account(bank: &mut MemoryBank, id: AccountId) -> Account {
        let client = sample_client();
        bank.register_client(client.clone());
        let mut account = Account::new(id);
        account.add_titular(client).unwrap();
        account.finalize(bank).unwrap();
        account
    }

    #[test]
    fn test_add_titular_on_finalized_account_fails() {
        let mut bank = MemoryBank::new();
        let mut account = finalized_account(&mut bank, 1);

        let result = account.add_titular(Client::new("98765F", "Ana", "López"));
        assert_eq!(result, Err(BankError::already_finalized(1)));
        assert_eq!(account.titulars().len(), 1);
    }

    #[test]
    fn test_duplicate_titulars_are_allowed() {
        let mut account = Account::new(1);
        account.add_titular(sample_client()).unwrap();
        account.add_titular(sample_client()).unwrap();
        assert_eq!(account.titulars().len(), 2);
    }

    #[test]
    fn test_finalize_without_titulars_fails() {
        let mut bank = MemoryBank::new();
        let mut account = Account::new(1);

        let result = account.finalize(&mut bank);
        assert_eq!(result, Err(BankError::no_titulars(1)));
        assert!(!account.is_finalized());
    }

    #[test]
    fn test_finalize_makes_account_visible_to_lookup() {
        use crate::store::traits::AccountDirectory;

        let mut bank = MemoryBank::new();
        let account = finalized_account(&mut bank, 1);

        assert!(account.is_finalized());
        assert_eq!(bank.find_account(1), Some(&account));
    }

    #[test]
    fn test_deposit_and_withdraw_drive_the_balance() {
        let mut bank = MemoryBank::new();
        let account = finalized_account(&mut bank, 1);

        account
            .deposit(&mut bank, Decimal::new(100000, 2), CONCEPT_DEPOSIT)
            .unwrap();
        account
            .withdraw(&mut bank, Decimal::new(20000, 2), CONCEPT_WITHDRAWAL)
            .unwrap();

        assert_eq!(account.balance(&bank), Decimal::new(80000, 2));
    }

    #[rstest]
    #[case::zero(Decimal::ZERO)]
    #[case::negative(Decimal::new(-100, 2))]
    fn test_deposit_rejects_non_positive_amounts(#[case] amount: Decimal) {
        let mut bank = MemoryBank::new();
        let account = finalized_account(&mut bank, 1);

        let result = account.deposit(&mut bank, amount, CONCEPT_DEPOSIT);
        assert_eq!(result, Err(BankError::invalid_amount(amount)));
        assert_eq!(account.balance(&bank), Decimal::ZERO);
    }

    #[rstest]
    #[case::zero(Decimal::ZERO)]
    #[case::negative(Decimal::new(-100, 2))]
    fn test_withdraw_rejects_non_positive_amounts(#[case] amount: Decimal) {
        let mut bank = MemoryBank::new();
        let account = finalized_account(&mut bank, 1);
        account
            .deposit(&mut bank, Decimal::new(100000, 2), CONCEPT_DEPOSIT)
            .unwrap();

        let result = account.withdraw(&mut bank, amount, CONCEPT_WITHDRAWAL);
        assert_eq!(result, Err(BankError::invalid_amount(amount)));
        assert_eq!(account.balance(&bank), Decimal::new(100000, 2));
    }

    #[test]
    fn test_withdraw_beyond_balance_fails() {
        let mut bank = MemoryBank::new();
        let account = finalized_account(&mut bank, 1);
        account
            .deposit(&mut bank, Decimal::new(100000, 2), CONCEPT_DEPOSIT)
            .unwrap();

        let result = account.withdraw(&mut bank, Decimal::new(200000, 2), CONCEPT_WITHDRAWAL);
        assert_eq!(
            result,
            Err(BankError::insufficient_funds(
                Decimal::new(100000, 2),
                Decimal::new(200000, 2)
            ))
        );
        assert_eq!(account.balance(&bank), Decimal::new(100000, 2));
    }

    #[test]
    fn test_forced_withdraw_ignores_the_funds_check() {
        let mut bank = MemoryBank::new();
        let account = finalized_account(&mut bank, 1);
        account
            .deposit(&mut bank, Decimal::new(10000, 2), CONCEPT_DEPOSIT)
            .unwrap();

        account.forced_withdraw(&mut bank, Decimal::new(25000, 2), "credit card settlement");

        assert_eq!(account.balance(&bank), Decimal::new(-15000, 2));
    }

    #[rstest]
    #[case::percentage_above_minimum(Decimal::new(100000, 2), Decimal::new(1000, 2))]
    #[case::minimum_applies(Decimal::new(10000, 2), Decimal::new(150, 2))]
    #[case::boundary(Decimal::new(15000, 2), Decimal::new(150, 2))]
    fn test_transfer_fee(#[case] amount: Decimal, #[case] expected: Decimal) {
        assert_eq!(transfer_fee(amount), expected);
    }

    #[test]
    fn test_transfer_moves_amount_and_charges_fee() {
        let mut bank = MemoryBank::new();
        let source = finalized_account(&mut bank, 1);

        bank.register_client(Client::new("98765F", "Ana", "López"));
        let mut destination = Account::new(2);
        destination
            .add_titular(Client::new("98765F", "Ana", "López"))
            .unwrap();
        destination.finalize(&mut bank).unwrap();

        source
            .deposit(&mut bank, Decimal::new(100000, 2), CONCEPT_DEPOSIT)
            .unwrap();
        source
            .transfer(&mut bank, 2, Decimal::new(50000, 2), "rent")
            .unwrap();

        // 1000.00 - 500.00 - max(1% of 500.00, 1.50) = 495.00
        assert_eq!(source.balance(&bank), Decimal::new(49500, 2));
        assert_eq!(destination.balance(&bank), Decimal::new(50000, 2));
    }

    #[test]
    fn test_transfer_to_self_fails_regardless_of_balance() {
        let mut bank = MemoryBank::new();
        let account = finalized_account(&mut bank, 1);
        account
            .deposit(&mut bank, Decimal::new(100000, 2), CONCEPT_DEPOSIT)
            .unwrap();

        let result = account.transfer(&mut bank, 1, Decimal::new(10000, 2), "self");
        assert_eq!(result, Err(BankError::invalid_destination(1)));
        assert_eq!(account.balance(&bank), Decimal::new(100000, 2));
    }

    #[test]
    fn test_transfer_to_unknown_destination_leaves_debits_in_place() {
        let mut bank = MemoryBank::new();
        let source = finalized_account(&mut bank, 1);
        source
            .deposit(&mut bank, Decimal::new(100000, 2), CONCEPT_DEPOSIT)
            .unwrap();

        let result = source.transfer(&mut bank, 99, Decimal::new(50000, 2), "void");
        assert_eq!(result, Err(BankError::invalid_destination(99)));

        // Both debit legs ran before the destination was resolved and are
        // not compensated
        assert_eq!(source.balance(&bank), Decimal::new(49500, 2));
    }

    #[test]
    fn test_transfer_fee_leg_failure_keeps_principal_debit() {
        let mut bank = MemoryBank::new();
        let source = finalized_account(&mut bank, 1);

        bank.register_client(Client::new("98765F", "Ana", "López"));
        let mut destination = Account::new(2);
        destination
            .add_titular(Client::new("98765F", "Ana", "López"))
            .unwrap();
        destination.finalize(&mut bank).unwrap();

        // Exactly enough for the principal but not for the fee
        source
            .deposit(&mut bank, Decimal::new(50000, 2), CONCEPT_DEPOSIT)
            .unwrap();
        let result = source.transfer(&mut bank, 2, Decimal::new(50000, 2), "tight");

        assert!(matches!(result, Err(BankError::InsufficientFunds { .. })));
        // Principal debited, fee leg rejected, destination untouched
        assert_eq!(source.balance(&bank), Decimal::ZERO);
        assert_eq!(destination.balance(&bank), Decimal::ZERO);
    }

    #[test]
    fn test_issue_debit_card_for_titular() {
        let mut bank = MemoryBank::new();
        let account = finalized_account(&mut bank, 1);

        let card = account.issue_debit_card(&mut bank, "12345X").unwrap();

        assert_eq!(card.account(), 1);
        assert_eq!(card.holder(), "12345X");
        assert!(card.is_active());
        assert!(bank.card(card.id()).is_some());
    }

    #[test]
    fn test_issue_credit_card_for_titular() {
        let mut bank = MemoryBank::new();
        let account = finalized_account(&mut bank, 1);

        let card = account
            .issue_credit_card(&mut bank, "12345X", Decimal::new(100000, 2))
            .unwrap();

        assert_eq!(card.limit(), Decimal::new(100000, 2));
        assert_eq!(card.available_credit(&bank), Decimal::new(100000, 2));
        assert!(bank.card(card.id()).is_some());
    }

    #[test]
    fn test_issue_card_for_unknown_client_fails() {
        let mut bank = MemoryBank::new();
        let account = finalized_account(&mut bank, 1);

        let result = account.issue_debit_card(&mut bank, "00000A");
        assert_eq!(result.unwrap_err(), BankError::client_not_found("00000A"));
    }

    #[test]
    fn test_issue_card_for_non_titular_fails() {
        let mut bank = MemoryBank::new();
        let account = finalized_account(&mut bank, 1);
        bank.register_client(Client::new("5678", "Pepe", "Pepito"));

        let result = account.issue_debit_card(&mut bank, "5678");
        assert_eq!(
            result.unwrap_err(),
            BankError::client_not_authorized("5678", 1)
        );

        let result = account.issue_credit_card(&mut bank, "5678", Decimal::new(100000, 2));
        assert_eq!(
            result.unwrap_err(),
            BankError::client_not_authorized("5678", 1)
        );
    }

    #[test]
    fn test_issued_cards_get_distinct_ids() {
        let mut bank = MemoryBank::new();
        let account = finalized_account(&mut bank, 1);

        let debit = account.issue_debit_card(&mut bank, "12345X").unwrap();
        let credit = account
            .issue_credit_card(&mut bank, "12345X", Decimal::new(100000, 2))
            .unwrap();

        assert_ne!(debit.id(), credit.id());
    }
}
