use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rmgd_core::{RecordKind, View};

use crate::CliError;
use crate::context::Context;

/// Command that opens each view.
fn view_command(view: View) -> &'static str {
    match view {
        View::Overview => "rmgd overview",
        View::Games => "rmgd list games",
        View::Devices => "rmgd list devices",
        View::Analytics => "rmgd stats <kind>",
        View::Reports => "rmgd report <kind> -o <file.csv>",
        View::MySubmissions => "rmgd list <kind> --mine",
        View::Review => "rmgd review <kind>",
        View::Users => "rmgd user list",
        View::Settings => "rmgd config show",
    }
}

/// Show the navigation available to the signed-in role.
pub(crate) fn run_nav(ctx: &Context) -> Result<(), CliError> {
    let Some(actor) = ctx.current_actor()? else {
        if ctx.identity().needs_bootstrap()? {
            log::info!("No accounts yet. Create the first admin with:");
            log::info!("  rmgd user add <username>");
        } else {
            log::info!("Not signed in. Run 'rmgd login <username>'.");
        }
        return Ok(());
    };
    let caps = actor.capabilities();

    log::info!(
        "Signed in as {} ({})",
        actor.username.if_supports_color(Stdout, |t| t.bold()),
        actor.role.if_supports_color(Stdout, |t| t.cyan()),
    );
    crate::log_blank();

    log::info!("{}", "Views".if_supports_color(Stdout, |t| t.bold()));
    for view in caps.views() {
        log::info!(
            "  {:<16} {}",
            view.label(),
            view_command(*view).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    let actions: Vec<&str> = caps.actions().iter().map(|a| a.as_str()).collect();
    log::info!(
        "{} {}",
        "Actions:".if_supports_color(Stdout, |t| t.bold()),
        actions.join(", "),
    );

    for kind in RecordKind::all() {
        log::info!(
            "{} categories: {}",
            kind.display_name(),
            kind.suggested_categories().join(", "),
        );
    }
    Ok(())
}
