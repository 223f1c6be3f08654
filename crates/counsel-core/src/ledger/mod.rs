//! Credit ledger: admission control over client balances
//!
//! The balance check and decrement are indivisible (a single guarded
//! UPDATE on the shared connection), so concurrent reservations for one
//! owner can never jointly overdraw.

use crate::db::Database;
use crate::error::{CounselError, Result};
use std::sync::{Arc, Mutex};

/// Proof of a successful reservation; required for refunds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub id: i64,
    pub owner_id: i64,
    pub amount: i64,
}

/// Tracks non-negative credit balances and debits them atomically.
///
/// Only client-role requesters go through the ledger; the orchestrator
/// never calls [`CreditLedger::reserve`] for experts or admins.
pub struct CreditLedger {
    db: Arc<Mutex<Database>>,
}

impl CreditLedger {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    /// Atomically debit `amount` credits from an owner.
    ///
    /// Fails with `InvalidAmount` for non-positive amounts (caller error),
    /// `AccountNotFound` for unknown owners, and `InsufficientCredit` when
    /// the balance cannot cover the amount; the balance is untouched in
    /// every failure case.
    pub fn reserve(&self, owner_id: i64, amount: i64) -> Result<Receipt> {
        if amount <= 0 {
            return Err(CounselError::InvalidAmount(amount));
        }

        let db = self.db.lock().expect("database lock poisoned");
        match db.debit_if_sufficient(owner_id, amount)? {
            Some(receipt_id) => {
                tracing::debug!("reserved {} credits for owner {}", amount, owner_id);
                Ok(Receipt {
                    id: receipt_id,
                    owner_id,
                    amount,
                })
            }
            None => {
                // Distinguish a missing account from an exhausted one.
                let available = db.balance(owner_id)?;
                Err(CounselError::InsufficientCredit {
                    owner_id,
                    needed: amount,
                    available,
                })
            }
        }
    }

    /// Reverse a reservation. Idempotent per receipt: the balance moves at
    /// most once no matter how often the same receipt is refunded.
    pub fn refund(&self, receipt: &Receipt) -> Result<bool> {
        let db = self.db.lock().expect("database lock poisoned");
        let refunded = db.refund_receipt(receipt.id)?;
        if refunded {
            tracing::debug!(
                "refunded {} credits to owner {}",
                receipt.amount,
                receipt.owner_id
            );
        }
        Ok(refunded)
    }

    /// Add credits to an owner (external billing entry point)
    pub fn top_up(&self, owner_id: i64, amount: i64) -> Result<i64> {
        if amount <= 0 {
            return Err(CounselError::InvalidAmount(amount));
        }
        let db = self.db.lock().expect("database lock poisoned");
        db.top_up(owner_id, amount)
    }

    /// Current balance for an owner
    pub fn balance(&self, owner_id: i64) -> Result<i64> {
        let db = self.db.lock().expect("database lock poisoned");
        db.balance(owner_id)
    }
}
