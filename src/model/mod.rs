//! Types that represent the core data model, such as `Account` and `Bank`.
pub(crate) mod account;
mod amount;
mod bank;
mod fixtures;
mod locale;

pub use account::{Account, AccountRecord, Movement, Pin, Summary, Username};
pub use amount::{Amount, AmountError};
pub use bank::Bank;
pub use fixtures::Fixtures;
pub use locale::{Currency, Locale};
