//! Command parsing and execution.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use devorbit_core::api::is_handled;
use devorbit_core::models::{GithubDailyStat, SyncMode, SyncParams};
use devorbit_core::router::{RouteName, DASHBOARD_PATH, LOGIN_PATH, SETTINGS_PATH};
use devorbit_core::AuthFlow;

use crate::app::App;

#[derive(Parser, Debug)]
#[command(name = "devorbit", version, about = "GitHub login and activity stats for DevOrbit")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the GitHub authorization URL
    Login,
    /// Finish login with the code GitHub returned
    Callback {
        /// The `code` value, or the whole URL you were redirected to
        #[arg(value_name = "CODE_OR_URL", value_parser = parse_code)]
        code: String,
    },
    /// Show the signed-in user
    #[command(name = "whoami")]
    WhoAmI,
    /// Sign out and forget the stored session
    Logout,
    /// Navigate to an app route and show where you land
    Open {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Backend health and daily activity
    Dashboard(DateRange),
    /// Daily GitHub activity
    Stats(DateRange),
    /// Pull fresh data from GitHub
    Sync {
        #[command(flatten)]
        range: DateRange,
        /// standard (last 90 days) or deep (any range)
        #[arg(long, value_parser = parse_mode)]
        mode: Option<SyncMode>,
    },
    /// Check the backend is reachable
    Health,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    /// First day, YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,
    /// Last day, YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", s))
}

fn parse_mode(s: &str) -> Result<SyncMode, String> {
    s.parse()
}

fn parse_code(s: &str) -> Result<String, String> {
    AuthFlow::extract_code(s).ok_or_else(|| format!("no authorization code found in '{}'", s))
}

pub async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Login => login(app).await?,
        Command::Callback { code } => callback(app, &code).await?,
        Command::WhoAmI => whoami(app)?,
        Command::Logout => {
            let location = app.auth.logout()?;
            println!("Signed out. Now at {}", location);
        }
        Command::Open { path } => {
            let location = app.open(&path)?;
            println!("{}", location);
        }
        Command::Dashboard(range) => dashboard(app, range.from, range.to).await?,
        Command::Stats(range) => stats(app, range.from, range.to).await?,
        Command::Sync { range, mode } => {
            let params = SyncParams {
                from_date: range.from,
                to_date: range.to,
                mode,
            };
            sync(app, &params).await?
        }
        Command::Health => {
            let health = app.api.health().await?;
            println!("{}", health);
        }
    }
    Ok(())
}

/// Move to a protected page; false if the gate sent us to login instead
fn enter(app: &App, path: &str) -> Result<bool> {
    let location = app.open(path)?;
    if location.route == RouteName::Login {
        println!("Not signed in. Run `devorbit login` first.");
        return Ok(false);
    }
    Ok(true)
}

/// Report an API failure, staying quiet about ones already dealt with
fn report(app: &App, err: anyhow::Error) -> Result<()> {
    if is_handled(&err) {
        debug!(location = %app.router.current(), "Request rejected, session cleared");
        println!("Your session has expired and you have been signed out. Run `devorbit login`.");
        return Ok(());
    }
    Err(err)
}

async fn login(app: &App) -> Result<()> {
    let location = app.open(LOGIN_PATH)?;
    if location.route != RouteName::Login {
        if let Some(user) = app.session.user() {
            println!("Already signed in as {}.", user.display_name());
        }
        return Ok(());
    }

    let url = app.auth.begin_login().await?;
    println!("Open this URL in your browser to sign in with GitHub:\n\n  {}\n", url);
    println!("Then run `devorbit callback <url-you-were-redirected-to>`.");
    Ok(())
}

async fn callback(app: &App, code: &str) -> Result<()> {
    let user = app.auth.complete_login(code).await?;
    println!("Signed in as {}. Now at {}", user.display_name(), app.router.current());
    Ok(())
}

fn whoami(app: &App) -> Result<()> {
    if !enter(app, SETTINGS_PATH)? {
        return Ok(());
    }
    if let Some(user) = app.session.user() {
        println!("{} (id {}, GitHub id {})", user.display_name(), user.id, user.github_id);
        if let Some(ref avatar) = user.avatar_url {
            println!("Avatar:   {}", avatar);
        }
        println!("Member since {}", user.created_at.format("%Y-%m-%d"));
    }
    println!("Backend:  {}", app.config.api_base_url());
    println!("Storage:  {:?}", app.config.storage);
    Ok(())
}

fn print_stats(stats: &[GithubDailyStat]) {
    if stats.is_empty() {
        println!("No activity recorded for this range.");
        return;
    }
    println!("{:<12} {:>7} {:>5} {:>6} {:>6}", "Date", "Commits", "PRs", "Issues", "Stars");
    for day in stats {
        println!(
            "{:<12} {:>7} {:>5} {:>6} {:>+6}",
            day.date.format("%Y-%m-%d"),
            day.commit_count,
            day.pr_count,
            day.issue_count,
            day.star_delta
        );
    }
    let total: i64 = stats.iter().map(GithubDailyStat::total_activity).sum();
    println!("\n{} days, {} contributions", stats.len(), total);
}

async fn stats(app: &App, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    if !enter(app, DASHBOARD_PATH)? {
        return Ok(());
    }
    match app.api.daily_stats(from, to).await {
        Ok(resp) => {
            print_stats(&resp.data);
            Ok(())
        }
        Err(e) => report(app, e),
    }
}

async fn dashboard(app: &App, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    if !enter(app, DASHBOARD_PATH)? {
        return Ok(());
    }

    let (health, stats) = futures::join!(app.api.health(), app.api.daily_stats(from, to));

    match health {
        Ok(status) => println!("Backend: {}", status),
        Err(e) => println!("Backend: unavailable ({:#})", e),
    }
    match stats {
        Ok(resp) => {
            print_stats(&resp.data);
            Ok(())
        }
        Err(e) => report(app, e),
    }
}

async fn sync(app: &App, params: &SyncParams) -> Result<()> {
    if !enter(app, DASHBOARD_PATH)? {
        return Ok(());
    }
    println!("Syncing ({})...", params.mode.unwrap_or_default().as_str());
    match app.api.sync_github(params).await {
        Ok(resp) => {
            println!("{}", resp.message);
            println!("Repositories: {}", resp.repos_count);
            println!("Days updated: {}", resp.stats_updated);
            if let Some(range) = resp.date_range {
                println!("Range:        {}", range);
            }
            Ok(())
        }
        Err(e) => report(app, e),
    }
}
