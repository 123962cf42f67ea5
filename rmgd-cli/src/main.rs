//! rmgd CLI
//!
//! Command-line dashboard for the Retro Mobile Gaming Database.

mod cli_types;
mod commands;
mod context;
mod error;

use std::io::Write;

use clap::Parser;
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rmgd_lib::{Settings, SettingsOverrides};

use cli_types::{Cli, Commands, ConfigAction, UserAction};
use context::Context;
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Print an empty line through the logger so `--quiet` suppresses it too.
pub(crate) fn log_blank() {
    log::info!("");
}

/// Install the logger. Info lines are printed bare, as normal command output.
///
/// `RUST_LOG` overrides the level chosen by `--quiet`/`--verbose`.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_env("RUST_LOG")
        .target(env_logger::Target::Stdout)
        .format(move |buf, record| match record.level() {
            Level::Error => writeln!(
                buf,
                "{} {}",
                "error:".if_supports_color(Stdout, |t| t.red()),
                record.args()
            ),
            Level::Warn => writeln!(
                buf,
                "{} {}",
                "warning:".if_supports_color(Stdout, |t| t.yellow()),
                record.args()
            ),
            Level::Info if !verbose => writeln!(buf, "{}", record.args()),
            level => writeln!(
                buf,
                "{} {:<5} {}",
                chrono::Local::now()
                    .format("%H:%M:%S%.3f")
                    .if_supports_color(Stdout, |t| t.dimmed()),
                level,
                record.args()
            ),
        });
    // A second logger can only exist in tests.
    let _ = builder.try_init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let overrides = SettingsOverrides {
        database: cli.db,
        api_url: cli.api_url,
    };

    // Settings commands work without opening the database they point at.
    let command = match cli.command {
        Commands::Config { action } => {
            return match action {
                ConfigAction::Show => commands::config::run_config_show(&overrides),
                ConfigAction::Path => commands::config::run_config_path(),
                ConfigAction::Set { key, value } => commands::config::run_config_set(&key, &value),
            };
        }
        other => other,
    };

    let ctx = Context::open(Settings::load(overrides)?)?;

    match command {
        Commands::Nav => commands::nav::run_nav(&ctx),
        Commands::Overview => commands::overview::run_overview(&ctx),
        Commands::List {
            kind,
            filters,
            limit,
        } => commands::list::run_list(&ctx, kind, &filters, limit),
        Commands::Stats { kind } => commands::overview::run_stats(&ctx, kind),
        Commands::Report {
            kind,
            filters,
            output,
            aggregates,
        } => commands::report::run_report(&ctx, kind, &filters, &output, aggregates),
        Commands::Add { kind, fields } => commands::records::run_add(&ctx, kind, &fields),
        Commands::Edit { kind, id, fields } => {
            commands::records::run_edit(&ctx, kind, &id, &fields)
        }
        Commands::Delete { kind, id, yes } => commands::records::run_delete(&ctx, kind, &id, yes),
        Commands::Review { kind, id, status } => match (id, status) {
            (None, _) => commands::list::run_review_queue(&ctx, kind),
            (Some(id), Some(status)) => commands::records::run_review(&ctx, kind, &id, status),
            (Some(_), None) => Err(CliError::other(
                "Give a status, e.g. 'rmgd review games <id> approved'",
            )),
        },
        Commands::Import { kind, file } => commands::import::run_import(&ctx, kind, &file),
        Commands::Upload { kind, id, file } => commands::images::run_upload(&ctx, kind, &id, &file),
        Commands::RemoveImage { kind, id, url } => {
            commands::images::run_remove_image(&ctx, kind, &id, &url)
        }
        Commands::Login { username, password } => {
            commands::users::run_login(&ctx, &username, password)
        }
        Commands::Logout => commands::users::run_logout(&ctx),
        Commands::Whoami => commands::users::run_whoami(&ctx),
        Commands::User { action } => match action {
            UserAction::Add {
                username,
                role,
                password,
            } => commands::users::run_user_add(&ctx, &username, role, password),
            UserAction::List => commands::users::run_user_list(&ctx),
            UserAction::Remove { username } => commands::users::run_user_remove(&ctx, &username),
            UserAction::Role { username, role } => {
                commands::users::run_user_role(&ctx, &username, role)
            }
        },
        Commands::Config { .. } => Ok(()),
    }
}
