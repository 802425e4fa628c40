mod cli;
mod config;
mod errors;
mod logging;
mod projection;

use std::env;

use clap::Parser;
use color_eyre::{Result, eyre::WrapErr};
use imsort_core::{MoveOutcome, Resolution, Session, SessionError, SessionState};
use imsort_ui::{
    View,
    app::{Action, StatusLevel, Ui},
    keymap::KeyMap,
};
use ratatui::DefaultTerminal;
use tracing::{debug, info};

use crate::{cli::Cli, config::Config, projection::session_to_view};

fn main() -> Result<()> {
    errors::init()?;
    logging::init()?;

    let cli = Cli::parse();
    let config = Config::new()?;
    let keymap = config.keymap()?;

    let root = match cli.dir {
        Some(dir) => dir,
        None => env::current_dir()?,
    };
    let mut session =
        Session::open(&root).wrap_err_with(|| format!("unable to open {}", root.display()))?;

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut session, &keymap);
    ratatui::restore();
    info!("exiting with {} moves left to undo", session.undo_depth());
    result
}

fn run(terminal: &mut DefaultTerminal, session: &mut Session, keymap: &KeyMap) -> Result<()> {
    let mut ui = Ui::new()?;
    ui.clamp_folder_selection(session.folders().len());

    let mut view_cache = View::default();
    let mut should_rebuild_view = true;

    loop {
        if should_rebuild_view {
            view_cache = session_to_view(session);
            should_rebuild_view = false;
        }
        ui.draw(terminal, &view_cache)?;

        if let Some(action) = ui.handle_input(keymap)? {
            debug!("{action:?}");
            if action == Action::Quit {
                break;
            }
            apply(action, session, &mut ui);
            ui.clamp_folder_selection(session.folders().len());
            should_rebuild_view = true;
        }
    }

    Ok(())
}

fn apply(action: Action, session: &mut Session, ui: &mut Ui) {
    match action {
        Action::Quit => {}
        Action::PreviousImage => session.retreat(),
        Action::NextImage => session.advance(),
        Action::MoveToFolder(folder_index) => move_to_folder(folder_index, None, session, ui),
        Action::Resolve {
            folder_index,
            choice,
        } => move_to_folder(
            folder_index,
            Some(projection::resolution(choice)),
            session,
            ui,
        ),
        Action::CreateFolder(name) => match session.create_folder(&name) {
            Ok(_) => ui.notify(
                StatusLevel::Info,
                format!("Created folder: {}", name.trim()),
            ),
            Err(e) => report(ui, &e),
        },
        Action::Undo => match session.undo_last() {
            Ok(record) => {
                let name = record.moved_from.file_name().unwrap_or_default();
                ui.notify(
                    StatusLevel::Info,
                    format!("Undone: {}", name.to_string_lossy()),
                );
            }
            Err(e) => report(ui, &e),
        },
        Action::Rescan => {
            ui.preview.clear();
            match session.rescan() {
                Ok(()) => ui.notify(
                    StatusLevel::Info,
                    format!("Found {} images", session.images().len()),
                ),
                Err(e) => report(ui, &e),
            }
        }
    }
}

fn move_to_folder(
    folder_index: usize,
    resolution: Option<Resolution>,
    session: &mut Session,
    ui: &mut Ui,
) {
    match session.move_current(folder_index, resolution) {
        Ok(MoveOutcome::Moved(record)) => {
            if session.state() == SessionState::Completed {
                ui.notify(StatusLevel::Info, "All images classified!");
            } else {
                let name = record.moved_from.file_name().unwrap_or_default();
                let folder = &session.folders()[folder_index];
                ui.notify(
                    StatusLevel::Info,
                    format!("Moved {} to {folder}", name.to_string_lossy()),
                );
            }
        }
        Ok(MoveOutcome::Skipped(name)) => ui.notify(StatusLevel::Info, format!("Skipped {name}")),
        Ok(MoveOutcome::Cancelled) => ui.status = None,
        Err(SessionError::DestinationExists { .. }) => {
            let file = session.current_image().unwrap_or_default().to_string();
            let folder = session.folders()[folder_index].clone();
            ui.ask_collision(folder_index, file, folder);
        }
        Err(e) => report(ui, &e),
    }
}

fn report(ui: &mut Ui, error: &SessionError) {
    let level = match error {
        SessionError::FileSystem { .. } => StatusLevel::Error,
        SessionError::NothingToUndo => StatusLevel::Info,
        _ => StatusLevel::Warning,
    };
    ui.notify(level, error.to_string());
}
