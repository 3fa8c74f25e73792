//! Subcommand definitions and the shared state they run against.

mod auth;
mod courses;
mod dashboard;
mod projects;
mod route;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Subcommand;
use serde::Serialize;

use learnpath_core::{
    ApiClient, Config, Confirm, CredentialStore, GuardDecision, Navigator, Route, SessionContext,
};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account and sign in
    Register(auth::RegisterArgs),
    /// Sign out and forget stored credentials
    Logout,
    /// Show who is signed in
    Whoami,
    /// View or edit your profile
    #[command(subcommand)]
    Profile(auth::ProfileCommand),
    /// Dashboard for your role
    Dashboard,
    /// Admin totals and recent courses and projects
    AdminDashboard,
    #[command(subcommand)]
    Courses(courses::CourseCommand),
    #[command(subcommand)]
    Projects(projects::ProjectCommand),
    /// Check whether a view is reachable with the current session
    Route {
        /// View path, e.g. /admin/dashboard
        path: String,
    },
}

pub async fn run(ctx: &mut Context, command: Command) -> Result<()> {
    match command {
        Command::Login { email } => auth::login(ctx, email).await,
        Command::Register(args) => auth::register(ctx, args).await,
        Command::Logout => auth::logout(ctx).await,
        Command::Whoami => auth::whoami(ctx),
        Command::Profile(cmd) => auth::profile(ctx, cmd).await,
        Command::Dashboard => dashboard::show(ctx).await,
        Command::AdminDashboard => dashboard::show_admin(ctx).await,
        Command::Courses(cmd) => courses::run(ctx, cmd).await,
        Command::Projects(cmd) => projects::run(ctx, cmd).await,
        Command::Route { path } => route::check(ctx, &path),
    }
}

/// Everything a command needs: config and the restored session.
pub struct Context {
    pub config: Config,
    pub session: SessionContext,
}

impl Context {
    pub fn new(config: Config, base_url: &str, ephemeral: bool) -> Result<Self> {
        let store = CredentialStore::new(config.credential_backend(ephemeral)?);
        let client = ApiClient::new(base_url, store, Arc::new(TerminalNavigator))?;
        let session = SessionContext::new(client);
        session.initialize();
        Ok(Self { config, session })
    }

    pub fn client(&self) -> &ApiClient {
        self.session.client()
    }

    /// Fail with the redirect target if the session may not open `route`.
    pub fn require(&self, route: Route) -> Result<()> {
        match route.check(&self.session.state()) {
            GuardDecision::Allow => Ok(()),
            GuardDecision::Redirect(target) => {
                bail!("{} is not available, redirected to {}", route, target)
            }
            GuardDecision::Pending => bail!("session is still loading"),
        }
    }

    /// Fail unless an admin is signed in. Checked before any request.
    pub fn require_admin(&self, action: &str) -> Result<()> {
        if !self.session.is_admin() {
            bail!("only administrators can {}", action);
        }
        Ok(())
    }

    /// Fail unless a learner is signed in. Checked before any request.
    pub fn require_learner(&self, action: &str) -> Result<()> {
        if !self.session.is_learner() {
            bail!("only learners can {}", action);
        }
        Ok(())
    }
}

/// Reports library navigation requests on the terminal.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn redirect(&self, route: Route) {
        match route {
            Route::Login => eprintln!("Session expired. Run `learnpath login` to sign in again."),
            other => eprintln!("Redirected to {}", other),
        }
    }
}

/// Yes/no prompt on stdin; `assume_yes` answers for the user.
pub struct StdinConfirm {
    pub assume_yes: bool,
}

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{} [y/N] ", prompt);
        let _ = io::stderr().flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Read one trimmed line from stdin after printing `label`.
pub fn prompt(label: &str) -> Result<String> {
    eprint!("{}", label);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the server's message for a write that returns only an envelope.
pub fn print_message(message: Option<&str>, fallback: &str) {
    println!("{}", message.filter(|m| !m.is_empty()).unwrap_or(fallback));
}
