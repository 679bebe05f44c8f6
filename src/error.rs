use std::fmt::{Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The reason a bank or session operation was turned down.
///
/// A rejection is an expected outcome, not a failure of the program: the dashboard stays as it
/// was and the reason is reported back to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The operation needs a logged-in account and there is none.
    NotLoggedIn,
    /// No account has the username, or the PIN does not match it.
    InvalidCredentials,
    /// The PIN input is not a number.
    InvalidPin,
    /// Transfers and loans must be for an amount greater than zero.
    NonPositiveAmount,
    /// No account has the receiving username.
    UnknownReceiver,
    /// The receiving account is the sender's own account.
    SelfTransfer,
    /// The sender's balance does not cover the transfer.
    InsufficientFunds,
    /// No existing movement is at least 10% of the requested loan.
    LoanNotCovered,
    /// The username or PIN given to close the account does not match the logged-in account.
    CloseMismatch,
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Rejection::NotLoggedIn => "nobody is logged in",
            Rejection::InvalidCredentials => "wrong username or PIN",
            Rejection::InvalidPin => "the PIN must be a number",
            Rejection::NonPositiveAmount => "the amount must be greater than zero",
            Rejection::UnknownReceiver => "there is no account with that username",
            Rejection::SelfTransfer => "you cannot transfer money to your own account",
            Rejection::InsufficientFunds => "your balance does not cover that amount",
            Rejection::LoanNotCovered => {
                "a loan needs at least one deposit of 10% of the requested amount"
            }
            Rejection::CloseMismatch => "the username and PIN do not match your account",
        };
        f.write_str(s)
    }
}

impl std::error::Error for Rejection {}
