//! End-to-end scenario tests
//!
//! These tests drive the full account and card lifecycle through the
//! public API against the in-memory backend, the way a branch session
//! would: register clients, open and finalize accounts, move money, issue
//! cards and operate them, and settle credit-card debt.

#[cfg(test)]
mod tests {
    use bank_ledger_engine::core::account::{CONCEPT_DEPOSIT, CONCEPT_WITHDRAWAL};
    use bank_ledger_engine::store::MovementStore;
    use bank_ledger_engine::{Account, BankError, Client, MemoryBank};
    use rust_decimal::Decimal;

    /// Open a finalized single-titular account and register its client
    fn open_account(bank: &mut MemoryBank, id: u64, nif: &str) -> Account {
        let client = Client::new(nif, "Pepe", "Pérez");
        bank.register_client(client.clone());
        let mut account = Account::new(id);
        account.add_titular(client).unwrap();
        account.finalize(bank).unwrap();
        account
    }

    fn money(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn test_account_and_credit_card_lifecycle() {
        let mut bank = MemoryBank::new();
        let account = open_account(&mut bank, 1, "12345X");

        account.deposit(&mut bank, money(100000), CONCEPT_DEPOSIT).unwrap();
        account
            .withdraw(&mut bank, money(20000), CONCEPT_WITHDRAWAL)
            .unwrap();
        assert_eq!(account.balance(&bank), money(80000));

        let mut card = account
            .issue_credit_card(&mut bank, "12345X", money(100000))
            .unwrap();
        let pin = card.pin();

        card.purchase(&mut bank, pin, money(30000)).unwrap();
        assert_eq!(card.available_credit(&bank), money(70000));
        // Charges are deferred: the account has not moved yet
        assert_eq!(account.balance(&bank), money(80000));

        card.liquidate(&mut bank).unwrap();
        assert_eq!(card.available_credit(&bank), money(100000));
        assert_eq!(account.balance(&bank), money(50000));
    }

    #[test]
    fn test_transfer_between_two_accounts() {
        let mut bank = MemoryBank::new();
        let sender = open_account(&mut bank, 1, "12345X");
        let receiver = open_account(&mut bank, 2, "98765F");

        sender.deposit(&mut bank, money(100000), CONCEPT_DEPOSIT).unwrap();
        sender
            .transfer(&mut bank, 2, money(10000), "rent")
            .unwrap();

        // Sender pays the principal plus the 1.50 minimum fee
        assert_eq!(sender.balance(&bank), money(89850));
        assert_eq!(receiver.balance(&bank), money(10000));

        // Three movements on the sender side (deposit, principal, fee),
        // one on the receiver side
        assert_eq!(bank.movements_for(1).len(), 3);
        assert_eq!(bank.movements_for(2).len(), 1);
    }

    #[test]
    fn test_debit_card_spends_account_funds_directly() {
        let mut bank = MemoryBank::new();
        let account = open_account(&mut bank, 1, "12345X");
        account.deposit(&mut bank, money(50000), CONCEPT_DEPOSIT).unwrap();

        let mut card = account.issue_debit_card(&mut bank, "12345X").unwrap();
        let pin = card.pin();

        card.purchase(&mut bank, pin, money(12500)).unwrap();
        card.withdraw(&mut bank, pin, money(10000)).unwrap();
        assert_eq!(account.balance(&bank), money(27500));

        // The account balance is the hard limit
        let result = card.online_purchase(&mut bank, pin, money(30000));
        assert_eq!(
            result,
            Err(BankError::insufficient_funds(money(27500), money(30000)))
        );
    }

    #[test]
    fn test_online_purchase_two_phase_flow() {
        let mut bank = MemoryBank::new();
        let account = open_account(&mut bank, 1, "12345X");

        let mut card = account
            .issue_credit_card(&mut bank, "12345X", money(100000))
            .unwrap();
        let pin = card.pin();

        let token = card
            .authorize_online_purchase(&mut bank, pin, money(40000))
            .unwrap();
        // Authorized but unconfirmed: nothing charged yet
        assert_eq!(card.available_credit(&bank), money(100000));

        card.confirm_online_purchase(&mut bank, token).unwrap();
        assert_eq!(card.available_credit(&bank), money(60000));

        // The token is single-use
        assert_eq!(
            card.confirm_online_purchase(&mut bank, token),
            Err(BankError::unknown_token(token))
        );

        card.liquidate(&mut bank).unwrap();
        assert_eq!(card.available_credit(&bank), money(100000));
        assert_eq!(account.balance(&bank), money(-40000));
    }

    #[test]
    fn test_blocked_card_stays_blocked_across_operations() {
        let mut bank = MemoryBank::new();
        let account = open_account(&mut bank, 1, "12345X");
        account.deposit(&mut bank, money(100000), CONCEPT_DEPOSIT).unwrap();

        let mut card = account.issue_debit_card(&mut bank, "12345X").unwrap();
        let pin = card.pin();
        let wrong = (pin + 1) % 10_000;

        for _ in 0..3 {
            card.withdraw(&mut bank, wrong, money(1000)).unwrap_err();
        }
        assert!(!card.is_active());
        // The card registry tracks the block
        assert!(!bank.card(card.id()).unwrap().is_active());

        // Every operation now reports CardBlocked, even with the right PIN
        let id = card.id();
        assert_eq!(
            card.withdraw(&mut bank, pin, money(1000)),
            Err(BankError::card_blocked(id))
        );
        assert_eq!(
            card.purchase(&mut bank, pin, money(1000)),
            Err(BankError::card_blocked(id))
        );
        assert_eq!(account.balance(&bank), money(100000));
    }

    #[test]
    fn test_issuance_requires_a_registered_titular() {
        let mut bank = MemoryBank::new();
        let account = open_account(&mut bank, 1, "12345X");
        bank.register_client(Client::new("98765F", "Ana", "López"));

        assert_eq!(
            account.issue_debit_card(&mut bank, "00000A").unwrap_err(),
            BankError::client_not_found("00000A")
        );
        assert_eq!(
            account.issue_debit_card(&mut bank, "98765F").unwrap_err(),
            BankError::client_not_authorized("98765F", 1)
        );
    }

    #[test]
    fn test_issued_cards_are_retrievable_from_the_store() {
        let mut bank = MemoryBank::new();
        let account = open_account(&mut bank, 1, "12345X");

        let debit = account.issue_debit_card(&mut bank, "12345X").unwrap();
        let credit = account
            .issue_credit_card(&mut bank, "12345X", money(100000))
            .unwrap();

        assert_ne!(debit.id(), credit.id());
        let stored = bank.card(credit.id()).unwrap();
        assert_eq!(stored.account(), 1);
        assert_eq!(stored.holder(), "12345X");
    }
}
