use crate::error::Rejection;
use crate::model::{Account, AccountRecord, Amount, Pin, Username};
use crate::Result;
use anyhow::bail;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// A loan is granted when some movement is at least this percentage of the requested amount.
const LOAN_COVER_PERCENT: Decimal = Decimal::TEN;

/// The in-memory list of accounts. Usernames are unique within a bank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bank {
    accounts: Vec<Account>,
}

impl Bank {
    /// Creates a bank holding `accounts` in the given order.
    ///
    /// # Errors
    /// Returns an error if two owners derive the same username.
    pub fn new(accounts: impl IntoIterator<Item = Account>) -> Result<Self> {
        let accounts: Vec<Account> = accounts.into_iter().collect();
        let mut seen = BTreeSet::new();
        for account in &accounts {
            let username = account.username();
            if !seen.insert(username.clone()) {
                bail!(
                    "The username '{username}' of '{}' is already taken by another account",
                    account.owner()
                );
            }
        }
        debug!("Opened a bank with {} accounts", accounts.len());
        Ok(Self { accounts })
    }

    /// Validates each record and creates a bank from them.
    pub fn from_records(records: impl IntoIterator<Item = AccountRecord>) -> Result<Self> {
        let accounts = records
            .into_iter()
            .map(Account::new)
            .collect::<Result<Vec<_>>>()?;
        Self::new(accounts)
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Converts every account back into its file representation.
    pub fn to_records(&self) -> Vec<AccountRecord> {
        self.accounts.iter().map(Account::to_record).collect()
    }

    /// Finds the account with exactly this username.
    pub fn find(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.username() == *username)
    }

    fn position(&self, username: &str) -> Option<usize> {
        self.accounts.iter().position(|a| a.username() == *username)
    }

    /// Returns the account if `username` exists and `pin` is its PIN.
    pub fn authenticate(&self, username: &str, pin: Pin) -> Result<&Account, Rejection> {
        self.find(username)
            .filter(|a| a.pin_matches(pin))
            .ok_or(Rejection::InvalidCredentials)
    }

    /// Moves `amount` from the account `from` to the account `to`.
    ///
    /// The sender gets a withdrawal and the receiver gets a deposit of the same size, so the sum
    /// of both accounts' movements does not change.
    pub fn transfer(
        &mut self,
        from: &Username,
        to: &str,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), Rejection> {
        let sender_ix = self
            .position(from.as_str())
            .ok_or(Rejection::NotLoggedIn)?;
        if !amount.is_positive() {
            return Err(Rejection::NonPositiveAmount);
        }
        let receiver_ix = self.position(to).ok_or(Rejection::UnknownReceiver)?;
        if receiver_ix == sender_ix {
            return Err(Rejection::SelfTransfer);
        }
        if self.accounts[sender_ix].balance() < amount {
            return Err(Rejection::InsufficientFunds);
        }

        self.accounts[sender_ix].push_movement(-amount, now);
        self.accounts[receiver_ix].push_movement(amount, now);
        trace!("Transferred {amount} from {from} to {to}");
        Ok(())
    }

    /// Grants a loan of `amount` to `username` if some movement covers 10% of it.
    pub fn request_loan(
        &mut self,
        username: &Username,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), Rejection> {
        let ix = self
            .position(username.as_str())
            .ok_or(Rejection::NotLoggedIn)?;
        if !amount.is_positive() {
            return Err(Rejection::NonPositiveAmount);
        }
        let account = &mut self.accounts[ix];
        if !account.has_movement_of_at_least(amount, LOAN_COVER_PERCENT) {
            return Err(Rejection::LoanNotCovered);
        }
        account.push_movement(amount, now);
        trace!("Granted a loan of {amount} to {username}");
        Ok(())
    }

    /// Removes the account `current` when `username` and `pin` both match it.
    pub fn close(
        &mut self,
        current: &Username,
        username: &str,
        pin: Pin,
    ) -> Result<Account, Rejection> {
        let ix = self
            .position(current.as_str())
            .ok_or(Rejection::NotLoggedIn)?;
        if *current != *username || !self.accounts[ix].pin_matches(pin) {
            return Err(Rejection::CloseMismatch);
        }
        Ok(self.accounts.remove(ix))
    }
}
