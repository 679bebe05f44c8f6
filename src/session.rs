//! The state of one person using the dashboard.
//!
//! A `Session` is passed explicitly to every handler. It remembers who is logged in (at most one
//! account at a time) and whether the movement list is shown sorted. It never expires.

use crate::error::Rejection;
use crate::model::{Account, Amount, Bank, Pin, Username};
use chrono::{DateTime, Utc};
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    current: Option<Username>,
    sorted: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The username of the logged-in account, if any.
    pub fn current(&self) -> Option<&Username> {
        self.current.as_ref()
    }

    /// Looks up the logged-in account in `bank`.
    pub fn account<'a>(&self, bank: &'a Bank) -> Option<&'a Account> {
        self.current().and_then(|u| bank.find(u.as_str()))
    }

    /// Whether movements should be listed in ascending order of amount.
    pub fn sorted(&self) -> bool {
        self.sorted
    }

    fn require_login(&self) -> Result<&Username, Rejection> {
        self.current.as_ref().ok_or(Rejection::NotLoggedIn)
    }

    /// Logs in as `username` if `pin` is that account's PIN.
    ///
    /// A failed attempt leaves the existing session as it was. A successful one replaces it and
    /// turns sorting off.
    pub fn login(&mut self, bank: &Bank, username: &str, pin: &str) -> Result<(), Rejection> {
        let pin = parse_pin(pin)?;
        let account = bank.authenticate(username, pin)?;
        info!("Welcome back, {}", account.first_name());
        self.current = Some(account.username());
        self.sorted = false;
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), Rejection> {
        let username = self.current.take().ok_or(Rejection::NotLoggedIn)?;
        debug!("Logged out {username}");
        self.sorted = false;
        Ok(())
    }

    /// Sends `amount` from the logged-in account to the account named `to`.
    pub fn transfer(
        &self,
        bank: &mut Bank,
        to: &str,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), Rejection> {
        let from = self.require_login()?;
        bank.transfer(from, to, amount, now)
    }

    /// Asks for a loan of `amount` on the logged-in account.
    pub fn request_loan(
        &self,
        bank: &mut Bank,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), Rejection> {
        let username = self.require_login()?;
        bank.request_loan(username, amount, now)
    }

    /// Closes the logged-in account if `username` and `pin` confirm it, then logs out.
    pub fn close(&mut self, bank: &mut Bank, username: &str, pin: &str) -> Result<Account, Rejection> {
        let current = self.require_login()?;
        let pin = parse_pin(pin)?;
        let closed = bank.close(current, username, pin)?;
        self.current = None;
        self.sorted = false;
        Ok(closed)
    }

    /// Flips between original and ascending order. Returns the new setting.
    pub fn toggle_sort(&mut self) -> Result<bool, Rejection> {
        self.require_login()?;
        self.sorted = !self.sorted;
        Ok(self.sorted)
    }
}

fn parse_pin(pin: &str) -> Result<Pin, Rejection> {
    Pin::from_str(pin).map_err(|_| Rejection::InvalidPin)
}
