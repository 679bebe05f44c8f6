//! Builds the view of the logged-in account: greeting, movement list, balance and summary.

use crate::model::{Account, Amount, Bank, Locale, Movement};
use crate::session::Session;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::{Display, Formatter};

const LOGGED_OUT: &str = "Log in to get started";

/// Movements newer than this many days are labelled relative to today.
const RELATIVE_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Deposit,
    Withdrawal,
}

serde_plain::derive_display_from_serialize!(MovementType);

/// One line of the movement list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// 1-based position in the list as shown, before reversing.
    pub index: usize,
    pub r#type: MovementType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub value: String,
}

/// Everything the account panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Panel {
    /// The current date and time, as of which the balance is shown.
    pub date: String,
    /// Newest first.
    pub rows: Vec<Row>,
    pub balance: String,
    pub deposits: String,
    pub withdrawals: String,
    pub interest: String,
}

/// The rendered dashboard. The panel is absent while nobody is logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub welcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel: Option<Panel>,
}

impl Dashboard {
    /// Renders the dashboard for whoever `session` has logged in, as seen at `now`.
    pub fn new(bank: &Bank, session: &Session, now: DateTime<Utc>) -> Self {
        match session.account(bank) {
            None => Self {
                welcome: LOGGED_OUT.to_string(),
                panel: None,
            },
            Some(account) => Self {
                welcome: format!("Welcome back, {}", account.first_name()),
                panel: Some(Panel::new(account, session.sorted(), now)),
            },
        }
    }
}

impl Panel {
    fn new(account: &Account, sorted: bool, now: DateTime<Utc>) -> Self {
        let locale = account.locale();
        let money = |amount: Amount| {
            locale.format_money(amount.value(), account.currency())
        };

        let mut movements: Vec<&Movement> = account.movements().iter().collect();
        if sorted {
            // stable, so equal amounts keep their original order
            movements.sort_by_key(|m| m.amount());
        }
        let rows = movements
            .into_iter()
            .enumerate()
            .map(|(ix, m)| Row {
                index: ix + 1,
                r#type: if m.is_deposit() {
                    MovementType::Deposit
                } else {
                    MovementType::Withdrawal
                },
                date: m.date().map(|d| date_label(d, now, locale)),
                value: money(m.amount()),
            })
            .rev()
            .collect();

        let summary = account.summary();
        Self {
            date: locale.format_date_time(now.naive_utc()),
            rows,
            balance: money(account.balance()),
            deposits: money(summary.deposits),
            withdrawals: money(summary.withdrawals),
            interest: money(summary.interest),
        }
    }
}

/// Labels a movement date relative to `now`: `Today`, `Yesterday`, `N days ago`, or the date.
pub fn date_label(date: DateTime<Utc>, now: DateTime<Utc>, locale: Locale) -> String {
    // a date after `now` counts as today
    let hours = (now - date).num_hours().max(0);
    // round to the nearest whole day
    let days = (hours + 12) / 24;
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d if d <= RELATIVE_DAYS => format!("{d} days ago"),
        _ => locale.format_date(date.date_naive()),
    }
}

impl Display for Dashboard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.welcome)?;
        let Some(panel) = &self.panel else {
            return Ok(());
        };
        writeln!(f)?;
        writeln!(f, "Current balance  {:>20}", panel.balance)?;
        writeln!(f, "As of {}", panel.date)?;
        writeln!(f)?;
        for row in &panel.rows {
            let label = format!("{} {}", row.index, row.r#type);
            writeln!(
                f,
                "  {label:<16}{:<14}{:>20}",
                row.date.as_deref().unwrap_or_default(),
                row.value
            )?;
        }
        writeln!(f)?;
        write!(
            f,
            "In {}   Out {}   Interest {}",
            panel.deposits, panel.withdrawals, panel.interest
        )
    }
}
