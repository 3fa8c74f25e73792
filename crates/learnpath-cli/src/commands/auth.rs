//! Sign in, registration, sign out and profile commands.

use anyhow::{bail, Result};
use clap::{Args, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use tracing::warn;

use learnpath_core::models::{Role, UserProfile};
use learnpath_core::Route;

use super::{print_json, prompt, Context};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    Learner,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => Role::Admin,
            RoleArg::Learner => Role::Learner,
        }
    }
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    email: Option<String>,
    #[arg(long, value_enum, default_value = "learner")]
    role: RoleArg,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Fetch the profile from the server
    Show,
    /// Change profile fields
    Update {
        #[arg(long)]
        email: Option<String>,
    },
}

pub async fn login(ctx: &mut Context, email: Option<String>) -> Result<()> {
    let email = match email.or_else(|| ctx.config.last_email.clone()) {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = rpassword::prompt_password("Password: ")?;

    let payload = ctx.session.login(&email, &password).await?;
    remember_email(ctx, email);

    print_signed_in(&payload.user);
    println!("Home: {}", ctx.session.state().home_route());
    Ok(())
}

pub async fn register(ctx: &mut Context, args: RegisterArgs) -> Result<()> {
    let email = match args.email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = rpassword::prompt_password("Password: ")?;
    let confirmation = rpassword::prompt_password("Confirm password: ")?;

    let payload = ctx
        .session
        .register(&email, &password, &confirmation, args.role.into())
        .await?;
    remember_email(ctx, email);

    print_signed_in(&payload.user);
    Ok(())
}

pub async fn logout(ctx: &Context) -> Result<()> {
    if !ctx.session.is_authenticated() {
        println!("Not signed in");
        return Ok(());
    }
    ctx.session.logout().await;
    println!("Signed out");
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<()> {
    match ctx.session.user() {
        Some(user) => print_signed_in(&user),
        None => println!("Not signed in"),
    }
    Ok(())
}

pub async fn profile(ctx: &Context, command: ProfileCommand) -> Result<()> {
    ctx.require(Route::Profile)?;

    let profile = match command {
        ProfileCommand::Show => ctx.session.refresh_profile().await?,
        ProfileCommand::Update { email } => {
            let mut changes = Map::new();
            if let Some(email) = email {
                changes.insert("email".to_string(), Value::String(email));
            }
            if changes.is_empty() {
                bail!("nothing to update");
            }
            ctx.session.update_profile(&changes).await?
        }
    };
    print_json(&profile)
}

fn remember_email(ctx: &mut Context, email: String) {
    ctx.config.last_email = Some(email);
    if let Err(e) = ctx.config.save() {
        warn!(error = %e, "Failed to save config");
    }
}

fn print_signed_in(user: &UserProfile) {
    println!("Signed in as {} ({})", user.email, user.user_type);
    if let Some(count) = user.enrolled_courses_count() {
        println!("Enrolled courses: {}", count);
    }
}
