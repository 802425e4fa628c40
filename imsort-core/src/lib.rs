//! Core of imsort: the classifier session that moves images from a working
//! directory into its sub-folders and keeps an undo history of those moves.

mod error;
pub mod scan;
mod session;

pub use error::{Result, SessionError};
pub use session::{
    MoveOutcome, Resolution, SHORTCUT_COUNT, Session, SessionState, UndoRecord, shortcut_for,
};
