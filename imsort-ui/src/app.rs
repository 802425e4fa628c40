use color_eyre::{Result, eyre::Error};
use ratatui::{
    DefaultTerminal,
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    widgets::ListState,
};

use crate::{
    View,
    keymap::{Command, KeyMap},
    preview::PreviewCache,
};

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    NewFolder(String),
    /// Waiting for the user to decide what happens to an occupied destination.
    ConfirmCollision {
        folder_index: usize,
        file: String,
        folder: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Overwrite,
    Skip,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    PreviousImage,
    NextImage,
    MoveToFolder(usize),
    Resolve { folder_index: usize, choice: Choice },
    CreateFolder(String),
    Undo,
    Rescan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub level: StatusLevel,
    pub text: String,
}

#[derive(Debug)]
pub struct Ui {
    pub folder_state: ListState,
    pub input_mode: InputMode,
    pub status: Option<Status>,
    pub preview: PreviewCache,
}

impl Ui {
    pub fn new() -> Result<Self, Error> {
        let mut ui = Self {
            folder_state: ListState::default(),
            input_mode: InputMode::default(),
            status: None,
            preview: PreviewCache::default(),
        };
        ui.folder_state.select(Some(0));
        Ok(ui)
    }

    pub fn draw(&mut self, terminal: &mut DefaultTerminal, view: &View) -> Result<()> {
        terminal.draw(|frame| {
            crate::ui::render(self, view, frame.area(), frame.buffer_mut());
        })?;
        Ok(())
    }

    pub fn handle_input(&mut self, keymap: &KeyMap) -> Result<Option<Action>> {
        if let Event::Key(key) = event::read()? {
            return Ok(self.handle_key(key, keymap));
        }
        Ok(None)
    }

    pub fn notify(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.status = Some(Status {
            level,
            text: text.into(),
        });
    }

    /// Switches to the overwrite / skip / cancel prompt for a move.
    pub fn ask_collision(&mut self, folder_index: usize, file: String, folder: String) {
        self.input_mode = InputMode::ConfirmCollision {
            folder_index,
            file,
            folder,
        };
    }

    /// Keeps the folder selection inside a list of `count` folders.
    pub fn clamp_folder_selection(&mut self, count: usize) {
        let selected = match (self.folder_state.selected(), count) {
            (_, 0) => None,
            (Some(i), _) => Some(i.min(count - 1)),
            (None, _) => Some(0),
        };
        self.folder_state.select(selected);
    }

    pub fn handle_key(&mut self, key: KeyEvent, keymap: &KeyMap) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        match &mut self.input_mode {
            InputMode::Normal => self.handle_command(keymap.command_for(&key)?),
            InputMode::NewFolder(name) => match key.code {
                KeyCode::Esc => {
                    self.input_mode = InputMode::Normal;
                    None
                }
                KeyCode::Enter => {
                    let name = std::mem::take(name);
                    self.input_mode = InputMode::Normal;
                    Some(Action::CreateFolder(name))
                }
                KeyCode::Backspace => {
                    name.pop();
                    None
                }
                KeyCode::Char(c)
                    if !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                {
                    name.push(c);
                    None
                }
                _ => None,
            },
            InputMode::ConfirmCollision { folder_index, .. } => {
                let folder_index = *folder_index;
                let choice = match key.code {
                    KeyCode::Char('o') | KeyCode::Char('y') => Choice::Overwrite,
                    KeyCode::Char('s') | KeyCode::Char('n') => Choice::Skip,
                    KeyCode::Char('c') | KeyCode::Esc => Choice::Cancel,
                    _ => return None,
                };
                self.input_mode = InputMode::Normal;
                Some(Action::Resolve {
                    folder_index,
                    choice,
                })
            }
        }
    }

    fn handle_command(&mut self, command: Command) -> Option<Action> {
        if let Some(shortcut) = command.folder_shortcut() {
            return Some(Action::MoveToFolder(shortcut - 1));
        }

        match command {
            Command::Quit => Some(Action::Quit),
            Command::PreviousImage => Some(Action::PreviousImage),
            Command::NextImage => Some(Action::NextImage),
            Command::SelectPreviousFolder => {
                self.folder_state.select_previous();
                None
            }
            Command::SelectNextFolder => {
                self.folder_state.select_next();
                None
            }
            Command::MoveToSelected => match self.folder_state.selected() {
                Some(index) => Some(Action::MoveToFolder(index)),
                None => {
                    self.notify(StatusLevel::Warning, "Select a target folder first");
                    None
                }
            },
            Command::NewFolder => {
                self.input_mode = InputMode::NewFolder(String::new());
                None
            }
            Command::Undo => Some(Action::Undo),
            Command::Rescan => Some(Action::Rescan),
            _ => None,
        }
    }
}
