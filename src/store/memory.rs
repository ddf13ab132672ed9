//! In-memory storage backend
//!
//! This module provides [`MemoryBank`], a HashMap/Vec-backed implementation
//! of every storage-collaborator trait. It is the backend used by the test
//! suite and a reasonable starting point for embedding applications that
//! bring their own persistence later.
//!
//! Movements are held in insertion order in plain vectors; the bank assigns
//! a monotonically increasing sequence number on append so the history
//! stays auditable.

use crate::core::account::Account;
use crate::core::card::Card;
use crate::store::traits::{
    AccountDirectory, AccountStore, CardStore, ClientDirectory, MovementStore,
};
use crate::types::{AccountId, CardId, Client, CreditMovement, Movement};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// In-memory implementation of all storage collaborators
///
/// Owns clients, finalized accounts, issued cards and both movement logs.
/// All state lives in process memory; nothing survives a restart.
pub struct MemoryBank {
    /// Registered clients by tax id
    clients: HashMap<String, Client>,

    /// Finalized accounts by id
    accounts: HashMap<AccountId, Account>,

    /// Issued cards by id
    cards: HashMap<CardId, Card>,

    /// Account movement log, in insertion order
    movements: Vec<Movement>,

    /// Credit-card charge log, in insertion order
    credit_movements: Vec<CreditMovement>,

    /// Next movement sequence number
    next_seq: u64,

    /// Last allocated card id
    last_card_id: CardId,
}

impl MemoryBank {
    /// Create an empty bank
    pub fn new() -> Self {
        MemoryBank {
            clients: HashMap::new(),
            accounts: HashMap::new(),
            cards: HashMap::new(),
            movements: Vec::new(),
            credit_movements: Vec::new(),
            next_seq: 0,
            last_card_id: 0,
        }
    }

    /// Register a client, making it resolvable by tax id
    pub fn register_client(&mut self, client: Client) {
        self.clients.insert(client.nif.clone(), client);
    }

    /// Look up an issued card by id
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    fn assign_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

impl Default for MemoryBank {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientDirectory for MemoryBank {
    fn find_client(&self, nif: &str) -> Option<&Client> {
        self.clients.get(nif)
    }
}

impl AccountDirectory for MemoryBank {
    fn find_account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }
}

impl MovementStore for MemoryBank {
    fn append(&mut self, mut movement: Movement) {
        movement.seq = self.assign_seq();
        self.movements.push(movement);
    }

    fn movements_for(&self, account: AccountId) -> Vec<&Movement> {
        self.movements
            .iter()
            .filter(|m| m.account == account)
            .collect()
    }

    fn append_credit(&mut self, mut movement: CreditMovement) {
        movement.seq = self.assign_seq();
        self.credit_movements.push(movement);
    }

    fn credit_movements_for(&self, card: CardId) -> Vec<&CreditMovement> {
        self.credit_movements
            .iter()
            .filter(|m| m.card == card)
            .collect()
    }

    fn settle_credit_movements(&mut self, card: CardId) -> Decimal {
        let mut total = Decimal::ZERO;
        for movement in &mut self.credit_movements {
            if movement.card == card && !movement.settled {
                total += movement.amount;
                movement.settled = true;
            }
        }
        total
    }
}

impl AccountStore for MemoryBank {
    fn persist_account(&mut self, account: &Account) {
        self.accounts.insert(account.id(), account.clone());
    }
}

impl CardStore for MemoryBank {
    fn next_card_id(&mut self) -> CardId {
        self.last_card_id += 1;
        self.last_card_id
    }

    fn persist_card(&mut self, card: Card) {
        self.cards.insert(card.id(), card);
    }
}
