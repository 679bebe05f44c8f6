//! The interactive session: one action per line in, a fresh dashboard out after every change.

use crate::args::{Action, ActionLine, SessionArgs};
use crate::commands::Out;
use crate::dashboard::Dashboard;
use crate::error::Rejection;
use crate::model::Bank;
use crate::session::Session;
use crate::{Config, Result};
use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::error::ErrorKind;
use serde::Serialize;
use std::io::IsTerminal;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

/// Counts of what happened during a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    /// Actions that changed the bank or the session.
    pub accepted: usize,
    /// Actions that were understood but turned down.
    pub rejected: usize,
    /// Lines that could not be parsed.
    pub invalid: usize,
}

/// What a successfully applied action asks the front end to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The bank or the session changed. The message describes how.
    Changed(String),
    /// Nothing changed but the dashboard should be printed.
    Show,
    /// The session is over.
    Quit,
}

/// Applies one action to `bank` and `session` as of `now`.
pub fn apply(
    bank: &mut Bank,
    session: &mut Session,
    action: &Action,
    now: DateTime<Utc>,
) -> std::result::Result<Outcome, Rejection> {
    let outcome = match action {
        Action::Login { user, pin } => {
            session.login(bank, user, pin)?;
            Outcome::Changed(format!("Logged in as {user}"))
        }
        Action::Transfer { to, amount } => {
            session.transfer(bank, to, *amount, now)?;
            Outcome::Changed(format!("Transferred {amount} to {to}"))
        }
        Action::Loan { amount } => {
            session.request_loan(bank, *amount, now)?;
            Outcome::Changed(format!("Loan of {amount} approved"))
        }
        Action::Close { user, pin } => {
            let closed = session.close(bank, user, pin)?;
            Outcome::Changed(format!("Closed the account of {}", closed.owner()))
        }
        Action::Sort => {
            let message = if session.toggle_sort()? {
                "Movements sorted by amount"
            } else {
                "Movements in original order"
            };
            Outcome::Changed(message.to_string())
        }
        Action::Logout => {
            session.logout()?;
            Outcome::Changed("Logged out".to_string())
        }
        Action::Show => Outcome::Show,
        Action::Quit => Outcome::Quit,
    };
    Ok(outcome)
}

/// Reads actions from `input` until it ends or the user quits, writing every message and
/// dashboard to `output`. `clock` supplies the time each action happens at.
pub async fn run<R, W, C>(
    bank: &mut Bank,
    session: &mut Session,
    mut input: R,
    output: &mut W,
    clock: C,
    prompt: bool,
) -> Result<SessionReport>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    C: Fn() -> DateTime<Utc>,
{
    let mut report = SessionReport::default();
    let mut buf = Vec::new();
    write(output, &Dashboard::new(bank, session, clock()).to_string()).await?;
    loop {
        if prompt {
            output.write_all(b"> ").await?;
            output.flush().await?;
        }
        buf.clear();
        let read = input
            .read_until(b'\n', &mut buf)
            .await
            .context("Unable to read an action")?;
        if read == 0 {
            break;
        }
        let Ok(line) = std::str::from_utf8(&buf) else {
            report.invalid += 1;
            warn!("Skipping a line that is not valid UTF-8");
            write(output, "error: the line is not valid UTF-8").await?;
            continue;
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let action = match ActionLine::parse_line(line) {
            Ok(action) => action,
            Err(e) => {
                if e.kind() != ErrorKind::DisplayHelp {
                    report.invalid += 1;
                }
                write(output, e.render().to_string().trim_end()).await?;
                continue;
            }
        };

        debug!("Applying {action:?}");
        let now = clock();
        match apply(bank, session, &action, now) {
            Ok(Outcome::Quit) => break,
            Ok(Outcome::Show) => {
                write(output, &Dashboard::new(bank, session, now).to_string()).await?;
            }
            Ok(Outcome::Changed(message)) => {
                report.accepted += 1;
                write(output, &message).await?;
                write(output, &Dashboard::new(bank, session, now).to_string()).await?;
            }
            Err(rejection) => {
                report.rejected += 1;
                warn!("'{line}' was rejected: {rejection}");
                write(output, &format!("Rejected: {rejection}")).await?;
            }
        }
    }
    Ok(report)
}

async fn write<W>(output: &mut W, text: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

/// Runs an interactive session against a fresh bank, reading from the script in `args` or from
/// stdin, and writing to stdout.
pub async fn session(config: &Config, args: &SessionArgs) -> Result<Out<SessionReport>> {
    let mut bank = config.bank().await?;
    let mut session = Session::new();
    let mut stdout = tokio::io::stdout();

    let report = match args.script() {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Unable to open the script {}", path.display()))?;
            run(
                &mut bank,
                &mut session,
                BufReader::new(file),
                &mut stdout,
                Utc::now,
                false,
            )
            .await?
        }
        None => {
            let prompt = std::io::stdin().is_terminal();
            run(
                &mut bank,
                &mut session,
                BufReader::new(tokio::io::stdin()),
                &mut stdout,
                Utc::now,
                prompt,
            )
            .await?
        }
    };

    let message = format!(
        "Session ended: {} accepted, {} rejected, {} invalid",
        report.accepted, report.rejected, report.invalid
    );
    Ok(Out::new(message, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Fixtures};
    use crate::test::TestEnv;
    use chrono::TimeZone;

    fn clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
    }

    async fn run_script(bank: &mut Bank, script: &str) -> (SessionReport, String) {
        let mut session = Session::new();
        let mut output: Vec<u8> = Vec::new();
        let report = run(bank, &mut session, script.as_bytes(), &mut output, clock, false)
            .await
            .unwrap();
        (report, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_apply_transfer() {
        let mut bank = Fixtures::Basic.bank().unwrap();
        let mut session = Session::new();
        let login = Action::Login {
            user: "js".into(),
            pin: "1111".into(),
        };
        apply(&mut bank, &mut session, &login, clock()).unwrap();
        let transfer = Action::Transfer {
            to: "jd".into(),
            amount: Amount::from(40),
        };
        let outcome = apply(&mut bank, &mut session, &transfer, clock()).unwrap();
        assert_eq!(outcome, Outcome::Changed("Transferred 40 to jd".into()));
        assert_eq!(bank.find("js").unwrap().balance(), Amount::from(3800));
    }

    #[test]
    fn test_apply_rejection_changes_nothing() {
        let mut bank = Fixtures::Basic.bank().unwrap();
        let mut session = Session::new();
        let transfer = Action::Transfer {
            to: "jd".into(),
            amount: Amount::from(40),
        };
        let err = apply(&mut bank, &mut session, &transfer, clock()).unwrap_err();
        assert_eq!(err, Rejection::NotLoggedIn);
        assert_eq!(bank, Fixtures::Basic.bank().unwrap());
    }

    #[tokio::test]
    async fn test_run_script() {
        let mut bank = Fixtures::Basic.bank().unwrap();
        let script = "\
            # a comment\n\
            login js 1111\n\
            \n\
            transfer jd 100\n\
            transfer js 100\n\
            transfer jd 1000000\n\
            loan 1000\n\
            sort\n\
            dance\n\
            quit\n\
            login jd 2222\n";
        let (report, text) = run_script(&mut bank, script).await;
        assert_eq!(
            report,
            SessionReport {
                accepted: 4,
                rejected: 2,
                invalid: 1
            }
        );
        assert!(text.starts_with("Log in to get started\n"));
        assert!(text.contains("Welcome back, Jonas"));
        assert!(text.contains("Rejected: you cannot transfer money to your own account"));
        assert!(text.contains("Rejected: your balance does not cover that amount"));
        assert!(text.contains("Loan of 1000 approved"));
        // the line after quit is never read
        assert!(!text.contains("Welcome back, Jessica"));

        assert_eq!(bank.find("js").unwrap().balance(), Amount::from(4740));
        assert_eq!(bank.find("jd").unwrap().balance(), Amount::from(11820));
    }

    #[tokio::test]
    async fn test_run_skips_bad_bytes() {
        let mut bank = Fixtures::Basic.bank().unwrap();
        let mut session = Session::new();
        let mut output: Vec<u8> = Vec::new();
        let script: &[u8] = b"login js 1111\n\xff\n transfer jd 100\n";
        let report = run(&mut bank, &mut session, script, &mut output, clock, false)
            .await
            .unwrap();
        assert_eq!(
            report,
            SessionReport {
                accepted: 2,
                rejected: 0,
                invalid: 1
            }
        );
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("not valid UTF-8"));
        assert_eq!(bank.find("js").unwrap().balance(), Amount::from(3740));
    }

    #[tokio::test]
    async fn test_run_close_account() {
        let mut bank = Fixtures::Basic.bank().unwrap();
        let script = "login ss 4444\nclose ss 0000\nclose ss 4444\nlogin ss 4444\n";
        let (report, text) = run_script(&mut bank, script).await;
        assert_eq!(report.accepted, 2);
        assert_eq!(report.rejected, 2);
        assert!(text.contains("Closed the account of Sarah Smith"));
        assert!(text.contains("Rejected: wrong username or PIN"));
        assert!(text.trim_end().ends_with("Rejected: wrong username or PIN"));
        assert_eq!(bank.accounts().len(), 3);
    }

    #[tokio::test]
    async fn test_run_help_is_not_invalid() {
        let mut bank = Fixtures::Basic.bank().unwrap();
        let (report, text) = run_script(&mut bank, "help\n").await;
        assert_eq!(report, SessionReport::default());
        assert!(text.contains("transfer"));
        assert!(text.contains("loan"));
    }

    #[tokio::test]
    async fn test_session_from_script() {
        let env = TestEnv::new().await;
        let script = env.write_script("login stw 3333\nloan 2000\nlogout\n").await;
        let out = session(env.config(), &SessionArgs::new(Some(script)))
            .await
            .unwrap();
        assert_eq!(
            out.structure(),
            Some(&SessionReport {
                accepted: 3,
                rejected: 0,
                invalid: 0
            })
        );
        assert!(out.message().contains("3 accepted"));
    }

    #[tokio::test]
    async fn test_session_missing_script() {
        let env = TestEnv::new().await;
        let missing = env.config().root().join("missing.txt");
        let err = session(env.config(), &SessionArgs::new(Some(missing)))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unable to open the script"));
    }
}
