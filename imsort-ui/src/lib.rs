pub mod app;
pub mod keymap;
pub mod preview;
pub mod ui;

use std::path::PathBuf;

/// Everything the renderer needs to know about the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub image: Option<ImageItem>,
    pub folders: Vec<FolderItem>,
    pub undo_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageItem {
    pub name: String,
    pub path: PathBuf,
    /// 1-based
    pub position: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderItem {
    pub name: String,
    pub shortcut: Option<usize>,
}
