//! Locale and currency tags, and the formatting rules that go with them.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The currencies an account can be held in.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
}

serde_plain::derive_display_from_serialize!(Currency);
serde_plain::derive_fromstr_from_deserialize!(Currency);

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Usd => "$",
            Currency::Gbp => "£",
        }
    }
}

/// A BCP 47 language tag for the handful of locales the dashboard knows how to format.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Locale {
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "en-GB")]
    EnGb,
    #[serde(rename = "de-DE")]
    DeDe,
    #[default]
    #[serde(rename = "pt-PT")]
    PtPt,
}

serde_plain::derive_display_from_serialize!(Locale);
serde_plain::derive_fromstr_from_deserialize!(Locale);

impl Locale {
    fn group_separator(&self) -> char {
        match self {
            Locale::EnUs | Locale::EnGb => ',',
            Locale::DeDe => '.',
            Locale::PtPt => ' ',
        }
    }

    fn decimal_separator(&self) -> char {
        match self {
            Locale::EnUs | Locale::EnGb => '.',
            Locale::DeDe | Locale::PtPt => ',',
        }
    }

    fn symbol_first(&self) -> bool {
        matches!(self, Locale::EnUs | Locale::EnGb)
    }

    fn date_pattern(&self) -> &'static str {
        match self {
            Locale::EnUs => "%m/%d/%Y",
            Locale::EnGb | Locale::PtPt => "%d/%m/%Y",
            Locale::DeDe => "%d.%m.%Y",
        }
    }

    /// Formats `value` as money in `currency` with two fraction digits.
    ///
    /// # Examples
    /// ```
    /// # use bankist::model::{Currency, Locale};
    /// # use rust_decimal::Decimal;
    /// let v = Decimal::new(-123456, 2);
    /// assert_eq!(Locale::EnUs.format_money(v, Currency::Usd), "-$1,234.56");
    /// assert_eq!(Locale::DeDe.format_money(v, Currency::Eur), "-1.234,56 €");
    /// ```
    pub fn format_money(&self, value: Decimal, currency: Currency) -> String {
        let rounded = value.round_dp(2);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let grouped = format_num::format_num!(",.2", rounded.abs().to_f64().unwrap_or_default());
        let digits: String = grouped
            .chars()
            .map(|c| match c {
                ',' => self.group_separator(),
                '.' => self.decimal_separator(),
                other => other,
            })
            .collect();
        let symbol = currency.symbol();
        if self.symbol_first() {
            format!("{sign}{symbol}{digits}")
        } else {
            format!("{sign}{digits} {symbol}")
        }
    }

    /// Formats a calendar date in the locale's day, month and year order.
    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(self.date_pattern()).to_string()
    }

    /// Formats a date followed by a 24-hour clock time, e.g. `18/10/2026, 14:05`.
    pub fn format_date_time(&self, at: NaiveDateTime) -> String {
        format!("{}, {}", self.format_date(at.date()), at.format("%H:%M"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_money_prefix_symbol() {
        let v = Decimal::from(25000);
        assert_eq!(Locale::EnUs.format_money(v, Currency::Usd), "$25,000.00");
        assert_eq!(Locale::EnGb.format_money(v, Currency::Gbp), "£25,000.00");
    }

    #[test]
    fn test_format_money_suffix_symbol() {
        let v = Decimal::from_str("455.23").unwrap();
        assert_eq!(Locale::PtPt.format_money(v, Currency::Eur), "455,23 €");
        let big = Decimal::from_str("1300.5").unwrap();
        assert_eq!(Locale::DeDe.format_money(big, Currency::Eur), "1.300,50 €");
        assert_eq!(Locale::PtPt.format_money(big, Currency::Eur), "1 300,50 €");
    }

    #[test]
    fn test_format_money_negative_and_zero() {
        let v = Decimal::from(-400);
        assert_eq!(Locale::EnUs.format_money(v, Currency::Eur), "-€400.00");
        assert_eq!(Locale::PtPt.format_money(v, Currency::Eur), "-400,00 €");
        assert_eq!(
            Locale::EnUs.format_money(Decimal::ZERO, Currency::Usd),
            "$0.00"
        );
    }

    #[test]
    fn test_format_date() {
        let d = NaiveDate::from_ymd_opt(2020, 7, 12).unwrap();
        assert_eq!(Locale::EnUs.format_date(d), "07/12/2020");
        assert_eq!(Locale::PtPt.format_date(d), "12/07/2020");
        assert_eq!(Locale::DeDe.format_date(d), "12.07.2020");
    }

    #[test]
    fn test_format_date_time() {
        let at = NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(14, 5, 59)
            .unwrap();
        assert_eq!(Locale::EnGb.format_date_time(at), "18/10/2026, 14:05");
    }

    #[test]
    fn test_locale_and_currency_strings() {
        assert_eq!(Locale::from_str("en-US").unwrap(), Locale::EnUs);
        assert_eq!(Locale::DeDe.to_string(), "de-DE");
        assert_eq!(Currency::from_str("GBP").unwrap(), Currency::Gbp);
        assert_eq!(Currency::Usd.to_string(), "USD");
        assert!(Locale::from_str("fr-FR").is_err());
    }
}
