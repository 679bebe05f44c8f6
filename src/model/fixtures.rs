//! The built-in demo accounts.

use crate::model::{AccountRecord, Amount, Bank, Currency, Locale, Pin};
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Selects one of the built-in account sets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fixtures {
    /// Four undated accounts held in euros.
    Basic,
    /// The same four owners with dated movements and their own currency and locale.
    #[default]
    Dated,
}

serde_plain::derive_display_from_serialize!(Fixtures);
serde_plain::derive_fromstr_from_deserialize!(Fixtures);

impl Fixtures {
    pub fn records(&self) -> Result<Vec<AccountRecord>> {
        match self {
            Fixtures::Basic => basic(),
            Fixtures::Dated => dated(),
        }
    }

    pub fn bank(&self) -> Result<Bank> {
        Bank::from_records(self.records()?)
    }
}

struct Fixture<'a> {
    owner: &'a str,
    movements: &'a [&'a str],
    interest_rate: &'a str,
    pin: u32,
    dates: Option<&'a [&'a str]>,
    currency: Currency,
    locale: Locale,
}

impl Fixture<'_> {
    fn record(&self) -> Result<AccountRecord> {
        let movements = self
            .movements
            .iter()
            .map(|m| Amount::from_str(m))
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context(|| format!("Bad fixture movement for {}", self.owner))?;
        let movement_dates = match self.dates {
            None => None,
            Some(dates) => Some(
                dates
                    .iter()
                    .map(|d| DateTime::parse_from_rfc3339(d).map(|d| d.with_timezone(&Utc)))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .with_context(|| format!("Bad fixture date for {}", self.owner))?,
            ),
        };
        Ok(AccountRecord {
            owner: self.owner.to_string(),
            movements,
            interest_rate: Decimal::from_str(self.interest_rate)?,
            pin: Pin::new(self.pin),
            movement_dates,
            currency: self.currency,
            locale: self.locale,
        })
    }
}

const JS: &str = "Jonas Schmedtmann";
const JD: &str = "Jessica Davis";
const STW: &str = "Steven Thomas Williams";
const SS: &str = "Sarah Smith";

fn basic() -> Result<Vec<AccountRecord>> {
    let euro = |owner: &'static str,
                movements: &'static [&'static str],
                interest_rate: &'static str,
                pin: u32| Fixture {
        owner,
        movements,
        interest_rate,
        pin,
        dates: None,
        currency: Currency::Eur,
        locale: Locale::PtPt,
    };
    [
        euro(
            JS,
            &["200", "450", "-400", "3000", "-650", "-130", "70", "1300"],
            "1.2",
            1111,
        ),
        euro(
            JD,
            &["5000", "3400", "-150", "-790", "-3210", "-1000", "8500", "-30"],
            "1.5",
            2222,
        ),
        euro(
            STW,
            &["200", "-200", "340", "-300", "-20", "50", "400", "-460"],
            "0.7",
            3333,
        ),
        euro(SS, &["430", "1000", "700", "50", "90"], "1", 4444),
    ]
    .iter()
    .map(Fixture::record)
    .collect()
}

fn dated() -> Result<Vec<AccountRecord>> {
    [
        Fixture {
            owner: JS,
            movements: &[
                "200", "455.23", "-306.5", "25000", "-642.21", "-133.9", "79.97", "1300",
            ],
            interest_rate: "1.2",
            pin: 1111,
            dates: Some(&[
                "2019-11-18T21:31:17.178Z",
                "2019-12-23T07:42:02.383Z",
                "2020-01-28T09:15:04.904Z",
                "2020-04-01T10:17:24.185Z",
                "2020-05-08T14:11:59.604Z",
                "2020-05-27T17:01:17.194Z",
                "2020-07-11T23:36:17.929Z",
                "2020-07-12T10:51:36.790Z",
            ]),
            currency: Currency::Eur,
            locale: Locale::PtPt,
        },
        Fixture {
            owner: JD,
            movements: &[
                "5000", "3400", "-150", "-790", "-3210", "-1000", "8500", "-30",
            ],
            interest_rate: "1.5",
            pin: 2222,
            dates: Some(&[
                "2019-11-01T13:15:33.035Z",
                "2019-11-30T09:48:16.867Z",
                "2019-12-25T06:04:23.907Z",
                "2020-01-25T14:18:46.235Z",
                "2020-02-05T16:33:06.386Z",
                "2020-04-10T14:43:26.374Z",
                "2020-06-25T18:49:59.371Z",
                "2020-07-26T12:01:20.894Z",
            ]),
            currency: Currency::Usd,
            locale: Locale::EnUs,
        },
        Fixture {
            owner: STW,
            movements: &["200", "-200", "340", "-300", "-20", "50", "400", "-460"],
            interest_rate: "0.7",
            pin: 3333,
            dates: Some(&[
                "2019-10-02T08:12:41.120Z",
                "2019-11-14T17:45:03.512Z",
                "2020-01-03T11:20:55.004Z",
                "2020-02-19T15:02:18.771Z",
                "2020-03-30T09:31:27.356Z",
                "2020-05-06T19:58:40.090Z",
                "2020-06-17T12:10:09.645Z",
                "2020-07-21T07:27:33.218Z",
            ]),
            currency: Currency::Gbp,
            locale: Locale::EnGb,
        },
        Fixture {
            owner: SS,
            movements: &["430", "1000", "700", "50", "90"],
            interest_rate: "1",
            pin: 4444,
            dates: Some(&[
                "2020-02-11T10:04:12.300Z",
                "2020-03-24T13:41:56.827Z",
                "2020-05-15T16:09:31.461Z",
                "2020-06-29T08:53:47.992Z",
                "2020-07-30T20:15:02.154Z",
            ]),
            currency: Currency::Eur,
            locale: Locale::DeDe,
        },
    ]
    .iter()
    .map(Fixture::record)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_fixtures() {
        let bank = Fixtures::Basic.bank().unwrap();
        let usernames: Vec<String> = bank
            .accounts()
            .iter()
            .map(|a| a.username().to_string())
            .collect();
        assert_eq!(usernames, vec!["js", "jd", "stw", "ss"]);
        assert!(bank.accounts().iter().all(|a| !a.is_dated()));
        assert_eq!(bank.find("jd").unwrap().balance(), Amount::from(11720));
    }

    #[test]
    fn test_dated_fixtures() {
        let bank = Fixtures::Dated.bank().unwrap();
        assert_eq!(bank.accounts().len(), 4);
        assert!(bank.accounts().iter().all(|a| a.is_dated()));
        let js = bank.find("js").unwrap();
        assert_eq!(js.balance().value(), Decimal::from_str("25952.59").unwrap());
        assert_eq!(bank.find("jd").unwrap().currency(), Currency::Usd);
    }

    #[test]
    fn test_bank_gives_back_its_records() {
        let records = Fixtures::Dated.records().unwrap();
        let bank = Bank::from_records(records.clone()).unwrap();
        assert_eq!(bank.to_records(), records);
    }

    #[test]
    fn test_fixtures_strings() {
        assert_eq!(Fixtures::from_str("basic").unwrap(), Fixtures::Basic);
        assert_eq!(Fixtures::Dated.to_string(), "dated");
    }
}
