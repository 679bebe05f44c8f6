use crate::commands::Out;
use crate::model::Bank;
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// An account as shown in the account list. PINs are never listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountEntry {
    pub username: String,
    pub owner: String,
    pub currency: String,
    pub locale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Listing(pub Vec<AccountEntry>);

impl From<&Bank> for Listing {
    fn from(bank: &Bank) -> Self {
        Listing(
            bank.accounts()
                .iter()
                .map(|a| AccountEntry {
                    username: a.username().to_string(),
                    owner: a.owner().to_string(),
                    currency: a.currency().to_string(),
                    locale: a.locale().to_string(),
                })
                .collect(),
        )
    }
}

impl Display for Listing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (ix, e) in self.0.iter().enumerate() {
            if ix > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{:<6}{:<26}{} {}",
                e.username, e.owner, e.currency, e.locale
            )?;
        }
        Ok(())
    }
}

/// Lists the accounts a session starts with.
pub async fn accounts(config: &Config) -> Result<Out<Listing>> {
    let bank = config.bank().await?;
    let listing = Listing::from(&bank);
    let count = listing.0.len();
    let message = format!("{count} account{}", if count == 1 { "" } else { "s" });
    Ok(Out::new(message, listing))
}
