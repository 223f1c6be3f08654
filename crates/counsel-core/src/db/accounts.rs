//! Account and credit receipt operations

use super::Database;
use crate::error::{CounselError, Result};
use chrono::Utc;
use rusqlite::params;

/// Requester role, decides whether the credit ledger applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Client,
    Expert,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Expert => "expert",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "client" => Ok(Role::Client),
            "expert" => Ok(Role::Expert),
            "admin" => Ok(Role::Admin),
            other => Err(CounselError::InvalidInput(format!(
                "unknown role: {}",
                other
            ))),
        }
    }

    /// Only client-role requesters are subject to credit debiting
    pub fn pays_credits(&self) -> bool {
        matches!(self, Role::Client)
    }
}

/// Account record from database
#[derive(Debug, Clone)]
pub struct Account {
    pub owner_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
    pub balance: i64,
    pub created_at: String,
}

impl Database {
    /// Create a new account, returning its owner id
    pub fn create_account(
        &self,
        name: &str,
        email: Option<&str>,
        role: Role,
        balance: i64,
    ) -> Result<i64> {
        if balance < 0 {
            return Err(CounselError::InvalidAmount(balance));
        }
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO accounts (name, email, role, balance, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![name, email, role.as_str(), balance, now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get account by owner id
    pub fn get_account(&self, owner_id: i64) -> Result<Account> {
        let result = self.conn.query_row(
            "SELECT owner_id, name, email, role, balance, created_at
             FROM accounts WHERE owner_id = ?1",
            params![owner_id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, String>(5)?,
                ))
            },
        );

        match result {
            Ok((owner_id, name, email, role, balance, created_at)) => Ok(Account {
                owner_id,
                name,
                email,
                role: Role::parse(&role)?,
                balance,
                created_at,
            }),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(CounselError::AccountNotFound(owner_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List all accounts
    pub fn list_accounts(&self) -> Result<Vec<Account>> {
        let mut stmt = self.conn.prepare(
            "SELECT owner_id, name, email, role, balance, created_at
             FROM accounts ORDER BY owner_id",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(owner_id, name, email, role, balance, created_at)| {
                Ok(Account {
                    owner_id,
                    name,
                    email,
                    role: Role::parse(&role)?,
                    balance,
                    created_at,
                })
            })
            .collect()
    }

    /// Current balance for an owner
    pub fn balance(&self, owner_id: i64) -> Result<i64> {
        let result = self.conn.query_row(
            "SELECT balance FROM accounts WHERE owner_id = ?1",
            params![owner_id],
            |row| row.get(0),
        );

        match result {
            Ok(balance) => Ok(balance),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(CounselError::AccountNotFound(owner_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Atomically debit `amount` from an owner's balance if sufficient.
    ///
    /// The guard `balance >= amount` lives inside the UPDATE, so the check
    /// and the decrement are a single indivisible statement. Returns the
    /// receipt row id on success, `None` when the balance was insufficient.
    pub fn debit_if_sufficient(&self, owner_id: i64, amount: i64) -> Result<Option<i64>> {
        let now = Utc::now().to_rfc3339();

        self.conn.execute("BEGIN IMMEDIATE", [])?;
        let result = (|| {
            let rows = self.conn.execute(
                "UPDATE accounts SET balance = balance - ?1
                 WHERE owner_id = ?2 AND balance >= ?1",
                params![amount, owner_id],
            )?;
            if rows == 0 {
                return Ok(None);
            }
            self.conn.execute(
                "INSERT INTO credit_receipts (owner_id, amount, created_at)
                 VALUES (?1, ?2, ?3)",
                params![owner_id, amount, now],
            )?;
            Ok(Some(self.conn.last_insert_rowid()))
        })();

        if result.is_ok() {
            self.conn.execute("COMMIT", [])?;
        } else {
            let _ = self.conn.execute("ROLLBACK", []);
        }
        result
    }

    /// Refund a reservation, idempotent per receipt.
    ///
    /// The receipt's `refunded` flag is flipped and the balance credited in
    /// one transaction; a second call with the same receipt returns false
    /// without touching the balance.
    pub fn refund_receipt(&self, receipt_id: i64) -> Result<bool> {
        self.conn.execute("BEGIN IMMEDIATE", [])?;
        let result = (|| {
            let rows = self.conn.execute(
                "UPDATE credit_receipts SET refunded = 1
                 WHERE id = ?1 AND refunded = 0",
                params![receipt_id],
            )?;
            if rows == 0 {
                return Ok(false);
            }
            self.conn.execute(
                "UPDATE accounts SET balance = balance + (
                     SELECT amount FROM credit_receipts WHERE id = ?1
                 )
                 WHERE owner_id = (
                     SELECT owner_id FROM credit_receipts WHERE id = ?1
                 )",
                params![receipt_id],
            )?;
            Ok(true)
        })();

        if result.is_ok() {
            self.conn.execute("COMMIT", [])?;
        } else {
            let _ = self.conn.execute("ROLLBACK", []);
        }
        result
    }

    /// Add credits to an owner's balance (external billing entry point)
    pub fn top_up(&self, owner_id: i64, amount: i64) -> Result<i64> {
        let rows = self.conn.execute(
            "UPDATE accounts SET balance = balance + ?1 WHERE owner_id = ?2",
            params![amount, owner_id],
        )?;
        if rows == 0 {
            return Err(CounselError::AccountNotFound(owner_id));
        }
        self.balance(owner_id)
    }
}
