#![forbid(unsafe_code)]

mod broadcast;
mod cli;
mod color;
mod config;
mod constants;
mod fence;
mod fence_window;
mod logging;
mod notice;
mod options;
mod shortcut;
mod style;
mod x11_utils;

use anyhow::Context;
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::{info, warn};
use x11rb::connection::Connection;

use broadcast::BroadcastReport;
use cli::{Cli, Commands, OptionEdits, OptionsCommand, ShortcutCommand};
use color::Tint;
use config::{ConfigStore, GlobalSettings};
use fence::FenceRegistry;
use fence_window::{open_fences, X11Fence};
use logging::LogGate;
use notice::Notice;
use options::OptionsSession;
use shortcut::{IconUpdate, ShortcutEditSession};
use x11_utils::CachedAtoms;

/// Run `f` over the open fence windows. Without a reachable X display the
/// slice is empty and propagation is skipped.
fn with_open_fences<T>(f: impl FnOnce(&mut [X11Fence<'_>]) -> T) -> T {
    let (conn, screen_num) = match x11rb::connect(None) {
        Ok(connected) => connected,
        Err(e) => {
            warn!(error = %e, "No X display reachable, skipping fence propagation");
            return f(&mut []);
        }
    };
    let screen = &conn.setup().roots[screen_num];
    info!(screen = screen_num, "Connected to X11");

    let atoms = match CachedAtoms::new(&conn) {
        Ok(atoms) => atoms,
        Err(e) => {
            warn!(error = ?e, "Failed to intern atoms, skipping fence propagation");
            return f(&mut []);
        }
    };
    let mut fences = open_fences(&conn, screen, &atoms).unwrap_or_else(|e| {
        warn!(error = ?e, "Failed to enumerate fence windows, skipping fence propagation");
        Vec::new()
    });
    f(&mut fences)
}

fn print_report(report: BroadcastReport) {
    println!(
        "Restyled {} fence(s): {} from their own record, {} with global style, {} failed",
        report.total(),
        report.styled,
        report.fallback,
        report.failed
    );
}

fn show_options(settings: &GlobalSettings) -> Result<(), Notice> {
    let json = serde_json::to_string_pretty(settings)
        .context("Failed to serialize options")
        .map_err(|e| Notice::from_error("Could not show options", &e))?;
    println!("{json}");
    Ok(())
}

fn set_options(
    edits: OptionEdits,
    dir: &Path,
    store: &ConfigStore,
    settings: &mut GlobalSettings,
    gate: &LogGate,
) -> Result<(), Notice> {
    let mut session = OptionsSession::open(settings);
    if let Some(snap) = edits.snap {
        session.edit(|s| s.snap_enabled = snap);
    }
    if let Some(tint) = edits.tint.and_then(Tint::new) {
        session.edit(|s| s.tint_value = tint);
    }
    if let Some(color) = edits.color {
        session.edit(|s| s.selected_color = color);
    }
    if let Some(log) = edits.log {
        session.edit(|s| s.log_enabled = log);
    }
    if let Some(single_click) = edits.single_click {
        session.edit(|s| s.single_click_to_launch = single_click);
    }
    if let Some(effect) = edits.launch_effect {
        session.edit(|s| s.launch_effect = effect);
    }

    if !session.is_dirty() {
        session.cancel();
        println!("No options given, nothing changed");
        return Ok(());
    }

    // Turning logging on records the change itself; turning it off stops after it
    if session.pending().log_enabled {
        gate.set_enabled(true);
    }
    let records = FenceRegistry::load_or_empty(&dir.join(constants::config::FENCES_FILENAME));
    let result = with_open_fences(|fences| session.commit(store, settings, &records, fences));
    gate.set_enabled(settings.log_enabled);

    print_report(result?);
    Ok(())
}

fn apply(dir: &Path, settings: &GlobalSettings) {
    let records = FenceRegistry::load_or_empty(&dir.join(constants::config::FENCES_FILENAME));
    let report = with_open_fences(|fences| broadcast::apply_to_all_open_fences(settings, &records, fences));
    print_report(report);
}

fn run_shortcut(command: ShortcutCommand) -> Result<(), Notice> {
    let notice = |e: shortcut::ShortcutError| Notice::new("Could not update shortcut", e.to_string());

    match command {
        ShortcutCommand::Show { path } => {
            let session = ShortcutEditSession::<shortcut::DesktopEntry>::open(path).map_err(notice)?;
            println!("Shortcut: {}", session.shortcut().display());
            println!("Name: {}", session.name());
            println!("Icon: {}", session.icon());
        }
        ShortcutCommand::Edit { path, icon, name } => {
            let mut session = ShortcutEditSession::<shortcut::DesktopEntry>::open(path).map_err(notice)?;
            if let Some(icon) = icon {
                session.browse(icon);
            }
            if let Some(name) = name {
                session.set_name(name);
            }
            let saved = session.save().map_err(notice)?;
            if saved.icon == IconUpdate::Unchanged {
                println!("Icon unchanged: {}", session.icon());
            }
            println!("Name: {}", saved.display_name);
        }
        ShortcutCommand::RestoreDefault { path } => {
            let mut session = ShortcutEditSession::<shortcut::DesktopEntry>::open(path).map_err(notice)?;
            let outcome = session.restore_default().map_err(notice)?;
            if !outcome.icon_restored {
                println!("Target not found, icon left unchanged");
            }
            println!("Name: {}", outcome.display_name);
            println!("Icon: {}", outcome.icon);
        }
        ShortcutCommand::Rename { path, name } => {
            let mut session = ShortcutEditSession::<shortcut::DesktopEntry>::open(path).map_err(notice)?;
            session.set_name(name);
            let saved = session.save().map_err(notice)?;
            println!("Name: {}", saved.display_name);
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Notice> {
    let dir = cli.dir.unwrap_or_else(config::install_dir);

    // Subscriber first so load warnings reach stderr; the file gate opens once settings are known
    let gate = logging::init(&dir, false).map_err(|e| Notice::from_error("Could not start logging", &e))?;
    let store = ConfigStore::new(&dir);
    let mut settings = store.load();
    gate.set_enabled(settings.log_enabled);
    info!(dir = %dir.display(), settings = %store.path().display(), "desk-fences started");

    match cli.command {
        Commands::Options(OptionsCommand::Show) => show_options(&settings),
        Commands::Options(OptionsCommand::Set(edits)) => set_options(edits, &dir, &store, &mut settings, &gate),
        Commands::Apply => {
            apply(&dir, &settings);
            Ok(())
        }
        Commands::Shortcut(command) => run_shortcut(command),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(notice) => {
            eprintln!("{notice}");
            ExitCode::FAILURE
        }
    }
}
