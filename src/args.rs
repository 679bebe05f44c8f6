//! These structs provide the CLI interface for the bankist CLI, and the grammar of the actions
//! typed into an interactive session.

use crate::model::{Amount, Fixtures};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// bankist: a mock bank account dashboard.
///
/// Log in to one of the demo accounts, look at its movements, balance and interest, transfer
/// money to the other accounts, ask for a loan or close the account. All data lives in memory
/// and is reset every time the program starts.
///
/// Demo logins: js/1111, jd/2222, stw/3333, ss/4444.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[command(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the bankist home directory with a config file and an editable accounts file.
    ///
    /// The accounts file is only ever read. Edit it to change the accounts every session
    /// starts with.
    Init(InitArgs),
    /// List the owner and username of every account.
    Accounts,
    /// Log in once and print the dashboard of that account.
    Summary(SummaryArgs),
    /// Start an interactive session. Type `help` to see the available actions.
    ///
    /// Actions are read one per line from stdin, or from a script file.
    Session(SessionArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the bankist configuration is held. Defaults to ~/bankist
    #[arg(long, env = "BANKIST_HOME", default_value_t = default_bankist_home())]
    bankist_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, bankist_home: PathBuf) -> Self {
        Self {
            log_level,
            bankist_home: bankist_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn bankist_home(&self) -> &DisplayPath {
        &self.bankist_home
    }
}

/// (Not shown): Args for the `bankist init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Which built-in accounts to write to the accounts file: "basic" or "dated"
    #[arg(long, default_value_t = Fixtures::Dated)]
    fixtures: Fixtures,
}

impl InitArgs {
    pub fn new(fixtures: Fixtures) -> Self {
        Self { fixtures }
    }

    pub fn fixtures(&self) -> Fixtures {
        self.fixtures
    }
}

/// (Not shown): Args for the `bankist summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    /// The username, i.e. the lowercase initials of the account owner.
    #[arg(long)]
    user: String,

    /// The account PIN.
    #[arg(long)]
    pin: String,

    /// List movements in ascending order of amount.
    #[arg(long)]
    sort: bool,
}

impl SummaryArgs {
    pub fn new(user: impl Into<String>, pin: impl Into<String>, sort: bool) -> Self {
        Self {
            user: user.into(),
            pin: pin.into(),
            sort,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn pin(&self) -> &str {
        &self.pin
    }

    pub fn sort(&self) -> bool {
        self.sort
    }
}

/// (Not shown): Args for the `bankist session` command.
#[derive(Debug, Parser, Clone)]
pub struct SessionArgs {
    /// A file of actions, one per line. When absent, actions are read from stdin.
    #[arg(long)]
    script: Option<PathBuf>,
}

impl SessionArgs {
    pub fn new(script: Option<PathBuf>) -> Self {
        Self { script }
    }

    pub fn script(&self) -> Option<&Path> {
        self.script.as_deref()
    }
}

/// One line typed into an interactive session.
#[derive(Debug, Parser, Clone)]
#[command(
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true,
    name = "action"
)]
pub struct ActionLine {
    #[command(subcommand)]
    action: Action,
}

impl ActionLine {
    /// Parses a line of whitespace-separated words into an `Action`.
    ///
    /// On failure the returned `clap::Error` renders either a usage error or, for `help`, the
    /// list of actions.
    pub fn parse_line(line: &str) -> Result<Action, clap::Error> {
        Self::try_parse_from(line.split_whitespace()).map(|a| a.action)
    }
}

/// The things a user can do in a session.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Log in: `login js 1111`
    Login { user: String, pin: String },
    /// Send money to another account: `transfer jd 100`
    Transfer {
        to: String,
        #[arg(allow_hyphen_values = true)]
        amount: Amount,
    },
    /// Ask for a loan: `loan 1000`
    Loan {
        #[arg(allow_hyphen_values = true)]
        amount: Amount,
    },
    /// Close the logged-in account: `close js 1111`
    Close { user: String, pin: String },
    /// Toggle between original order and ascending order of amount.
    Sort,
    /// Log out.
    Logout,
    /// Print the dashboard again.
    Show,
    /// End the session.
    #[command(alias = "exit")]
    Quit,
}

fn default_bankist_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("bankist"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --bankist-home or BANKIST_HOME. Falling back to ./bankist",
            );
            PathBuf::from("bankist")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_parse_cli() {
        let args = Args::try_parse_from([
            "bankist",
            "--log-level",
            "debug",
            "--bankist-home",
            "/tmp/bk",
            "summary",
            "--user",
            "js",
            "--pin",
            "1111",
            "--sort",
        ])
        .unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        assert_eq!(args.common().bankist_home().path(), Path::new("/tmp/bk"));
        match args.command() {
            Command::Summary(s) => {
                assert_eq!(s.user(), "js");
                assert_eq!(s.pin(), "1111");
                assert!(s.sort());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_init_fixtures() {
        let args =
            Args::try_parse_from(["bankist", "init", "--fixtures", "basic"]).unwrap();
        match args.command() {
            Command::Init(i) => assert_eq!(i.fixtures(), Fixtures::Basic),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!(
            ActionLine::parse_line("login js 1111").unwrap(),
            Action::Login {
                user: "js".into(),
                pin: "1111".into()
            }
        );
        assert_eq!(
            ActionLine::parse_line("  transfer   jd 1,000.50 ").unwrap(),
            Action::Transfer {
                to: "jd".into(),
                amount: Amount::from_str("1000.50").unwrap()
            }
        );
        assert_eq!(
            ActionLine::parse_line("loan -5").unwrap(),
            Action::Loan {
                amount: Amount::from(-5)
            }
        );
        assert_eq!(ActionLine::parse_line("exit").unwrap(), Action::Quit);
        assert_eq!(ActionLine::parse_line("sort").unwrap(), Action::Sort);
    }

    #[test]
    fn test_parse_bad_actions() {
        assert!(ActionLine::parse_line("transfer jd lots").is_err());
        assert!(ActionLine::parse_line("login js").is_err());
        assert!(ActionLine::parse_line("dance").is_err());
        assert!(ActionLine::parse_line("transfer jd --100").is_err());
        let help = ActionLine::parse_line("help").unwrap_err();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);
    }
}
