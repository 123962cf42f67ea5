use dialoguer::Password;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rmgd_core::{Action, Role, View};
use rmgd_lib::IdentityProvider;

use crate::CliError;
use crate::context::Context;

const ENV_PASSWORD: &str = "RMGD_PASSWORD";

/// Flag, then `RMGD_PASSWORD`, then a hidden prompt. New passwords are
/// typed twice.
fn resolve_password(given: Option<String>, confirm: bool) -> Result<String, CliError> {
    pick_password(given, std::env::var(ENV_PASSWORD).ok(), || {
        read_hidden_password(confirm)
    })
}

fn pick_password(
    given: Option<String>,
    env: Option<String>,
    prompt: impl FnOnce() -> Result<String, CliError>,
) -> Result<String, CliError> {
    if let Some(password) = given {
        return Ok(password);
    }
    match env {
        Some(password) if !password.is_empty() => Ok(password),
        _ => prompt(),
    }
}

/// Reads without echoing to the terminal.
fn read_hidden_password(confirm: bool) -> Result<String, CliError> {
    let mut prompt = Password::new().with_prompt("  Password");
    if confirm {
        prompt = prompt.with_confirmation("  Password (again)", "Passwords do not match");
    }
    prompt
        .interact()
        .map_err(|e| CliError::other(format!("Failed to read password: {e}")))
}

pub(crate) fn run_login(ctx: &Context, username: &str, password: Option<String>) -> Result<(), CliError> {
    let password = resolve_password(password, false)?;
    let actor = ctx.identity().login(username, &password)?;
    log::info!(
        "Signed in as {} ({})",
        actor.username.if_supports_color(Stdout, |t| t.bold()),
        actor.role.if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}

pub(crate) fn run_logout(ctx: &Context) -> Result<(), CliError> {
    ctx.identity().logout()?;
    log::info!("Signed out.");
    Ok(())
}

pub(crate) fn run_whoami(ctx: &Context) -> Result<(), CliError> {
    let Some(actor) = ctx.current_actor()? else {
        log::info!("Not signed in.");
        return Ok(());
    };
    let caps = actor.capabilities();
    log::info!(
        "{} ({})",
        actor.username.if_supports_color(Stdout, |t| t.bold()),
        actor.role.if_supports_color(Stdout, |t| t.cyan()),
    );
    let views: Vec<&str> = caps.views().iter().map(|v| v.label()).collect();
    let actions: Vec<&str> = caps.actions().iter().map(|a| a.as_str()).collect();
    log::info!("  Views:   {}", views.join(", "));
    log::info!("  Actions: {}", actions.join(", "));
    log::info!(
        "  Session: {}",
        ctx.identity().session_file().display().if_supports_color(Stdout, |t| t.dimmed()),
    );
    Ok(())
}

/// Create an account. Anyone may create the first one, which becomes admin.
pub(crate) fn run_user_add(
    ctx: &Context,
    username: &str,
    role: Role,
    password: Option<String>,
) -> Result<(), CliError> {
    let identity = ctx.identity();
    if !identity.needs_bootstrap()? {
        ctx.require_action(Action::ManageUsers)?;
    }
    let password = resolve_password(password, true)?;
    let created = identity.add_user(username, &password, role)?;
    log::info!(
        "{} {} ({})",
        "Created account".if_supports_color(Stdout, |t| t.green()),
        created.username.if_supports_color(Stdout, |t| t.bold()),
        created.role,
    );
    Ok(())
}

pub(crate) fn run_user_list(ctx: &Context) -> Result<(), CliError> {
    let me = ctx.require_view(View::Users)?;
    let users = ctx.identity().list_users()?;
    log::info!(
        "{} {}",
        "Accounts".if_supports_color(Stdout, |t| t.bold()),
        format!("({})", users.len()).if_supports_color(Stdout, |t| t.dimmed()),
    );
    for user in &users {
        let marker = if user.username == me.username { "*" } else { " " };
        log::info!("  {} {:<24} {}", marker, user.username, user.role);
    }
    Ok(())
}

pub(crate) fn run_user_remove(ctx: &Context, username: &str) -> Result<(), CliError> {
    let me = ctx.require_action(Action::ManageUsers)?;
    if me.username == username {
        return Err(CliError::other("You cannot remove your own account"));
    }
    ctx.identity().remove_user(username)?;
    log::info!("Removed account {}", username);
    Ok(())
}

pub(crate) fn run_user_role(ctx: &Context, username: &str, role: Role) -> Result<(), CliError> {
    ctx.require_action(Action::ManageUsers)?;
    ctx.identity().set_role(username, role)?;
    log::info!("{} is now {}", username, role.if_supports_color(Stdout, |t| t.cyan()));
    Ok(())
}
