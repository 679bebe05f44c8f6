use crate::args::SummaryArgs;
use crate::commands::Out;
use crate::dashboard::Dashboard;
use crate::session::Session;
use crate::{Config, Result};
use anyhow::Context;
use chrono::{DateTime, Utc};

/// Logs in once with `args` and renders that account's dashboard as of `now`.
///
/// # Errors
/// - Returns an error if the accounts cannot be loaded.
/// - Returns an error if the username or PIN is wrong.
pub async fn summary(
    config: &Config,
    args: &SummaryArgs,
    now: DateTime<Utc>,
) -> Result<Out<Dashboard>> {
    let bank = config.bank().await?;
    let mut session = Session::new();
    session
        .login(&bank, args.user(), args.pin())
        .with_context(|| format!("Unable to log in as '{}'", args.user()))?;
    if args.sort() {
        session.toggle_sort()?;
    }
    let dashboard = Dashboard::new(&bank, &session, now);
    Ok(Out::new(dashboard.welcome.clone(), dashboard))
}
