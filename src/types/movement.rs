//! Ledger movement types for the bank ledger engine
//!
//! Movements are the single source of truth for balances: an account's
//! balance and a credit card's available credit are always recomputed by
//! folding over the stored movements, never cached (see [`crate::core::ledger`]).
//!
//! Account movements are immutable once appended. Credit movements admit
//! exactly one mutation over their lifetime: the `settled` flag flips from
//! `false` to `true` during liquidation.

use crate::types::{AccountId, CardId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One immutable signed ledger entry attributed to an account
///
/// Positive amounts are credits, negative amounts are debits.
/// `Balance(account) = Σ signed amounts` of all its movements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// The account this movement belongs to
    pub account: AccountId,

    /// Signed amount (positive = credit, negative = debit)
    pub amount: Decimal,

    /// Free-text concept describing the movement
    pub concept: String,

    /// Creation order, assigned by the movement store on append
    ///
    /// Order does not affect the balance (the fold is commutative) but
    /// preserves an auditable history.
    pub seq: u64,
}

impl Movement {
    /// Create a movement pending insertion
    ///
    /// The sequence number is assigned by the store when the movement is
    /// appended; the value set here is a placeholder.
    pub fn new(account: AccountId, amount: Decimal, concept: &str) -> Self {
        Movement {
            account,
            amount,
            concept: concept.to_string(),
            seq: 0,
        }
    }
}

/// One charge recorded against a credit card
///
/// Charges are recorded positive and reduce available credit while
/// unsettled. Liquidation flips `settled` exactly once and converts the
/// settled total into a single forced debit on the linked account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditMovement {
    /// The credit card this charge belongs to
    pub card: CardId,

    /// Charge amount (recorded positive)
    pub amount: Decimal,

    /// Free-text concept describing the charge
    pub concept: String,

    /// Whether this charge has been settled against the linked account
    ///
    /// Created `false`; flips to `true` exactly once, during liquidation.
    pub settled: bool,

    /// Creation order, assigned by the movement store on append
    pub seq: u64,
}

impl CreditMovement {
    /// Create an unsettled charge pending insertion
    pub fn new(card: CardId, amount: Decimal, concept: &str) -> Self {
        CreditMovement {
            card,
            amount,
            concept: concept.to_string(),
            settled: false,
            seq: 0,
        }
    }
}

/// An authorized-but-unconfirmed online purchase held by a credit card
///
/// Created by an online-purchase authorization, consumed by a matching
/// confirmation. A card holds at most one at a time; a newer authorization
/// overwrites any unconfirmed prior one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingPurchase {
    /// The authorized amount
    pub amount: Decimal,

    /// One-time 4-digit confirmation token
    pub token: u16,
}
