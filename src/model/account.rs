use crate::model::{Amount, Currency, Locale};
use crate::Result;
use anyhow::ensure;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// The lowercase initials of an account owner's name, used to log in and to address transfers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Username(String);

impl Username {
    /// Derives the username from an owner's full name: `"Steven Thomas Williams"` -> `"stw"`.
    pub fn from_owner(owner: &str) -> Self {
        Self(
            owner
                .split_whitespace()
                .filter_map(|name| name.chars().next())
                .flat_map(char::to_lowercase)
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Username {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// A numeric credential. It is compared by equality and never printed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pin(u32);

impl Pin {
    pub const fn new(pin: u32) -> Self {
        Self(pin)
    }
}

impl Debug for Pin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Pin(****)")
    }
}

impl FromStr for Pin {
    type Err = std::num::ParseIntError;

    /// Whole numbers written with a zero fraction, like `1111.0`, are accepted.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let whole = match s.split_once('.') {
            Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
            _ => s,
        };
        whole.parse().map(Pin)
    }
}

/// A single signed transaction amount, with the time it happened on accounts that track dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Movement {
    amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<DateTime<Utc>>,
}

impl Movement {
    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.date
    }

    pub fn is_deposit(&self) -> bool {
        self.amount.is_positive()
    }
}

/// Totals shown under the movement list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Sum of all deposits.
    pub deposits: Amount,
    /// Sum of all withdrawals, as a positive number.
    pub withdrawals: Amount,
    /// Interest earned on deposits, ignoring any deposit that would earn less than 1.
    pub interest: Amount,
}

/// The serialization format of an account in a fixture file.
///
/// Example:
/// ```json
/// {
///   "owner": "Jessica Davis",
///   "movements": [5000, 3400, -150],
///   "interest_rate": 1.5,
///   "pin": 2222,
///   "movement_dates": ["2019-11-01T13:15:33.035Z", "2019-11-30T09:48:16.867Z", "2019-12-25T06:04:23.907Z"],
///   "currency": "USD",
///   "locale": "en-US"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub owner: String,
    pub movements: Vec<Amount>,
    #[serde(with = "crate::model::amount::number")]
    pub interest_rate: Decimal,
    pub pin: Pin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_dates: Option<Vec<DateTime<Utc>>>,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub locale: Locale,
}

/// A mock bank account.
///
/// The username, balance and summary are computed from the owner and the movements every time
/// they are asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    owner: String,
    movements: Vec<Movement>,
    interest_rate: Decimal,
    pin: Pin,
    currency: Currency,
    locale: Locale,
    /// When true, every movement has a date.
    dated: bool,
}

impl Account {
    /// Builds an account from its file representation.
    ///
    /// # Errors
    /// - The owner name is blank.
    /// - `movement_dates` is present but its length differs from `movements`.
    pub fn new(record: AccountRecord) -> Result<Self> {
        ensure!(
            !record.owner.trim().is_empty(),
            "An account owner name cannot be blank"
        );
        let dated = record.movement_dates.is_some();
        let movements = match record.movement_dates {
            None => record
                .movements
                .into_iter()
                .map(|amount| Movement { amount, date: None })
                .collect(),
            Some(dates) => {
                ensure!(
                    dates.len() == record.movements.len(),
                    "Account '{}' has {} movements but {} movement dates",
                    record.owner,
                    record.movements.len(),
                    dates.len()
                );
                record
                    .movements
                    .into_iter()
                    .zip(dates)
                    .map(|(amount, date)| Movement {
                        amount,
                        date: Some(date),
                    })
                    .collect()
            }
        };
        Ok(Self {
            owner: record.owner,
            movements,
            interest_rate: record.interest_rate,
            pin: record.pin,
            currency: record.currency,
            locale: record.locale,
            dated,
        })
    }

    /// Converts the account back into its file representation.
    pub fn to_record(&self) -> AccountRecord {
        AccountRecord {
            owner: self.owner.clone(),
            movements: self.movements.iter().map(Movement::amount).collect(),
            interest_rate: self.interest_rate,
            pin: self.pin,
            movement_dates: self
                .dated
                .then(|| self.movements.iter().filter_map(Movement::date).collect()),
            currency: self.currency,
            locale: self.locale,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The first word of the owner's name, for greetings.
    pub fn first_name(&self) -> &str {
        self.owner.split_whitespace().next().unwrap_or_default()
    }

    pub fn username(&self) -> Username {
        Username::from_owner(&self.owner)
    }

    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn interest_rate(&self) -> Decimal {
        self.interest_rate
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn is_dated(&self) -> bool {
        self.dated
    }

    pub(crate) fn pin_matches(&self, pin: Pin) -> bool {
        self.pin == pin
    }

    /// Sum of all movements.
    pub fn balance(&self) -> Amount {
        self.movements.iter().map(Movement::amount).sum()
    }

    pub fn summary(&self) -> Summary {
        let deposits: Amount = self.amounts().filter(Amount::is_positive).sum();
        let withdrawals = self
            .amounts()
            .filter(Amount::is_negative)
            .sum::<Amount>()
            .abs();
        let one = Decimal::ONE;
        let interest: Amount = self
            .amounts()
            .filter(Amount::is_positive)
            .map(|deposit| deposit.value() * self.interest_rate / Decimal::ONE_HUNDRED)
            .filter(|interest| *interest >= one)
            .map(Amount::new)
            .sum();
        Summary {
            deposits,
            withdrawals,
            interest,
        }
    }

    /// True if any single movement is at least `share` percent of `amount`.
    pub(crate) fn has_movement_of_at_least(&self, amount: Amount, share: Decimal) -> bool {
        let threshold = amount.value() * share / Decimal::ONE_HUNDRED;
        self.amounts().any(|m| m.value() >= threshold)
    }

    /// Appends a movement, stamping it with `now` when the account tracks dates.
    pub(crate) fn push_movement(&mut self, amount: Amount, now: DateTime<Utc>) {
        self.movements.push(Movement {
            amount,
            date: self.dated.then_some(now),
        });
    }

    fn amounts(&self) -> impl Iterator<Item = Amount> + '_ {
        self.movements.iter().map(Movement::amount)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(owner: &str, movements: &[i64], rate: &str, pin: u32) -> AccountRecord {
        AccountRecord {
            owner: owner.to_string(),
            movements: movements.iter().copied().map(Amount::from).collect(),
            interest_rate: Decimal::from_str(rate).unwrap(),
            pin: Pin::new(pin),
            movement_dates: None,
            currency: Currency::Eur,
            locale: Locale::PtPt,
        }
    }

    fn account(movements: &[i64], rate: &str) -> Account {
        Account::new(record("Steven Thomas Williams", movements, rate, 3333)).unwrap()
    }

    #[test]
    fn test_username_from_owner() {
        assert_eq!(Username::from_owner("Jonas Schmedtmann").as_str(), "js");
        assert_eq!(Username::from_owner("Steven Thomas Williams").as_str(), "stw");
        assert_eq!(Username::from_owner("  Sarah   Smith ").as_str(), "ss");
        assert_eq!(Username::from_owner("Émile Zola").as_str(), "éz");
    }

    #[test]
    fn test_balance_is_sum_of_movements() {
        let a = account(&[200, -200, 340, -300], "0.7");
        assert_eq!(a.balance(), Amount::from(40));
    }

    #[test]
    fn test_balance_of_empty_account_is_zero() {
        let a = account(&[], "1");
        assert_eq!(a.balance(), Amount::ZERO);
        assert_eq!(a.summary().interest, Amount::ZERO);
    }

    #[test]
    fn test_summary() {
        let a = account(&[200, 450, -400, 3000, -650, -130, 70, 1300], "1.2");
        let s = a.summary();
        assert_eq!(s.deposits, Amount::from(5020));
        assert_eq!(s.withdrawals, Amount::from(1180));
        // 2.4 + 5.4 + 36 + 15.6; 70 * 1.2% = 0.84 is dropped
        assert_eq!(s.interest.value(), Decimal::from_str("59.4").unwrap());
    }

    #[test]
    fn test_interest_of_exactly_one_is_kept() {
        let a = account(&[100, 99], "1");
        assert_eq!(a.summary().interest, Amount::from(1));
    }

    #[test]
    fn test_blank_owner_is_rejected() {
        assert!(Account::new(record("   ", &[1], "1", 1)).is_err());
    }

    #[test]
    fn test_dates_must_match_movements() {
        let mut r = record("Jessica Davis", &[5000, 3400], "1.5", 2222);
        r.movement_dates = Some(vec![Utc::now()]);
        let err = Account::new(r).unwrap_err().to_string();
        assert!(err.contains("2 movements but 1 movement dates"), "{err}");
    }

    #[test]
    fn test_dated_account_stamps_new_movements() {
        let mut r = record("Jessica Davis", &[5000], "1.5", 2222);
        r.movement_dates = Some(vec![Utc::now()]);
        let mut a = Account::new(r).unwrap();
        let now = Utc::now();
        a.push_movement(Amount::from(-30), now);
        assert_eq!(a.movements().len(), 2);
        assert_eq!(a.movements()[1].date(), Some(now));
        assert!(a.movements().iter().all(|m| m.date().is_some()));
    }

    #[test]
    fn test_undated_account_stays_undated() {
        let mut a = account(&[5000], "1.5");
        a.push_movement(Amount::from(10), Utc::now());
        assert!(a.movements().iter().all(|m| m.date().is_none()));
        assert_eq!(a.to_record().movement_dates, None);
    }

    #[test]
    fn test_first_name() {
        assert_eq!(account(&[], "1").first_name(), "Steven");
    }

    #[test]
    fn test_pin_parse_and_debug() {
        assert_eq!(Pin::from_str(" 1111 ").unwrap(), Pin::new(1111));
        assert!(Pin::from_str("11a1").is_err());
        assert_eq!(Pin::from_str("1111.0").unwrap(), Pin::new(1111));
        assert_eq!(Pin::from_str("1111.").unwrap(), Pin::new(1111));
        assert!(Pin::from_str("1111.5").is_err());
        assert!(Pin::from_str(".0").is_err());
        assert_eq!(format!("{:?}", Pin::new(1111)), "Pin(****)");
    }

    #[test]
    fn test_record_round_trip_keeps_dates() {
        let mut r = record("Jessica Davis", &[5000, -150], "1.5", 2222);
        r.movement_dates = Some(vec![Utc::now(), Utc::now()]);
        let a = Account::new(r.clone()).unwrap();
        assert_eq!(a.to_record(), r);
    }
}
