use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::{
    error::{Result, SessionError},
    scan,
};

/// Number of folders reachable through the numeric shortcuts.
pub const SHORTCUT_COUNT: usize = 9;

/// How to proceed when the destination of a move is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Overwrite,
    Skip,
    Cancel,
}

/// A completed move that [`Session::undo_last`] can reverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoRecord {
    pub moved_to: PathBuf,
    pub moved_from: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved(UndoRecord),
    /// The image was dropped from the sequence without touching the disk.
    Skipped(String),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Browsing,
    Completed,
}

/// Holds the images still waiting to be classified, the folders they can be
/// moved into and the undo history.
///
/// Both sequences are caches of the working directory. Moves and skips update
/// the image sequence in place; everything else rescans.
#[derive(Debug)]
pub struct Session {
    root: PathBuf,
    images: Vec<String>,
    cursor: usize,
    folders: Vec<String>,
    undo_stack: Vec<UndoRecord>,
}

impl Session {
    /// Opens a session on `root` and scans it for images and folders.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let mut session = Self {
            root: root.into(),
            images: Vec::new(),
            cursor: 0,
            folders: Vec::new(),
            undo_stack: Vec::new(),
        };
        session.rescan()?;
        info!(
            "opened {} with {} images and {} folders",
            session.root.display(),
            session.images.len(),
            session.folders.len()
        );
        Ok(session)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn folders(&self) -> &[String] {
        &self.folders
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Rebuilds the image sequence from disk and puts the cursor on the first image.
    pub fn list_images(&mut self) -> Result<&[String]> {
        self.images =
            scan::scan_images(&self.root).map_err(|e| SessionError::fs("read", &self.root, e))?;
        self.cursor = 0;
        Ok(&self.images)
    }

    /// Rebuilds the folder sequence from disk, oldest folder first.
    pub fn list_folders(&mut self) -> Result<&[String]> {
        self.folders =
            scan::scan_folders(&self.root).map_err(|e| SessionError::fs("read", &self.root, e))?;
        Ok(&self.folders)
    }

    pub fn rescan(&mut self) -> Result<()> {
        self.list_images()?;
        self.list_folders()?;
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        if self.images.is_empty() {
            SessionState::Completed
        } else {
            SessionState::Browsing
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        (!self.images.is_empty()).then_some(self.cursor)
    }

    /// 1-based position of the current image and the number of images.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.cursor().map(|cursor| (cursor + 1, self.images.len()))
    }

    pub fn current_image(&self) -> Option<&str> {
        self.images.get(self.cursor).map(String::as_str)
    }

    pub fn current_path(&self) -> Option<PathBuf> {
        self.current_image().map(|name| self.root.join(name))
    }

    pub fn advance(&mut self) {
        if self.cursor + 1 < self.images.len() {
            self.cursor += 1;
        }
    }

    pub fn retreat(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Where the current image would land when moved into the folder at `folder_index`.
    pub fn destination_for(&self, folder_index: usize) -> Result<PathBuf> {
        let image = self.current_image().ok_or(SessionError::NoImages)?;
        let folder = self
            .folders
            .get(folder_index)
            .ok_or(SessionError::InvalidFolder {
                index: folder_index,
                count: self.folders.len(),
            })?;
        Ok(self.root.join(folder).join(image))
    }

    /// Creates a folder directly under the working directory.
    pub fn create_folder(&mut self, name: &str) -> Result<PathBuf> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyFolderName);
        }
        if name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(SessionError::InvalidFolderName(name.to_string()));
        }

        let path = self.root.join(name);
        if fs::symlink_metadata(&path).is_ok() {
            return Err(SessionError::AlreadyExists(name.to_string()));
        }
        fs::create_dir(&path).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => SessionError::AlreadyExists(name.to_string()),
            _ => SessionError::fs("create", &path, e),
        })?;
        info!("created folder {}", path.display());

        self.list_folders()?;
        Ok(path)
    }

    /// Moves the current image into the folder at `folder_index`.
    ///
    /// When the destination is taken, `resolution` decides what happens. Without
    /// one the call fails with [`SessionError::DestinationExists`] and nothing
    /// changes, so the caller can ask and call again.
    pub fn move_current(
        &mut self,
        folder_index: usize,
        resolution: Option<Resolution>,
    ) -> Result<MoveOutcome> {
        let destination = self.destination_for(folder_index)?;
        let source = self.root.join(&self.images[self.cursor]);

        if fs::symlink_metadata(&destination).is_ok() {
            match resolution {
                None => return Err(SessionError::DestinationExists { path: destination }),
                Some(Resolution::Cancel) => {
                    debug!("move of {} cancelled", source.display());
                    return Ok(MoveOutcome::Cancelled);
                }
                Some(Resolution::Skip) => {
                    let name = self.remove_current();
                    info!("skipped {name}");
                    return Ok(MoveOutcome::Skipped(name));
                }
                Some(Resolution::Overwrite) => {
                    info!("overwriting {}", destination.display());
                }
            }
        }

        move_file(&source, &destination).map_err(|e| SessionError::fs("move", &source, e))?;
        info!("moved {} to {}", source.display(), destination.display());

        let record = UndoRecord {
            moved_to: destination,
            moved_from: source,
        };
        self.undo_stack.push(record.clone());
        self.remove_current();
        Ok(MoveOutcome::Moved(record))
    }

    /// Moves the most recently moved image back and selects it again.
    ///
    /// The record is consumed even when moving the file back fails.
    pub fn undo_last(&mut self) -> Result<UndoRecord> {
        let record = self.undo_stack.pop().ok_or(SessionError::NothingToUndo)?;

        if let Err(e) = move_file(&record.moved_to, &record.moved_from) {
            warn!(
                "undo of {} failed, record dropped: {e}",
                record.moved_from.display()
            );
            return Err(SessionError::fs("restore", &record.moved_to, e));
        }
        info!(
            "restored {} from {}",
            record.moved_from.display(),
            record.moved_to.display()
        );

        let previous = self.cursor;
        self.list_images()?;

        let restored = record.moved_from.file_name().and_then(|name| name.to_str());
        self.cursor = restored
            .and_then(|name| self.images.iter().position(|image| image == name))
            .unwrap_or_else(|| previous.min(self.images.len().saturating_sub(1)));

        Ok(record)
    }

    fn remove_current(&mut self) -> String {
        let name = self.images.remove(self.cursor);
        if self.cursor >= self.images.len() {
            self.cursor = self.images.len().saturating_sub(1);
        }
        if self.images.is_empty() {
            info!("all images classified");
        }
        name
    }
}

/// Shortcut number (1-9) bound to the folder at `folder_index`.
pub fn shortcut_for(folder_index: usize) -> Option<usize> {
    (folder_index < SHORTCUT_COUNT).then_some(folder_index + 1)
}

/// Renames `from` to `to`, copying across filesystems when a rename is not possible.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!("{} crosses devices, copying", from.display());
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        result => result,
    }
}

#[cfg(test)]
mod tests {
    use std::{fs::File, io::Write, thread, time::Duration};

    use pretty_assertions::assert_eq;
    use tempfile::{TempDir, tempdir};

    use super::*;

    /// Working directory with `a.png, b.jpg, c.txt` and folders `cats`, `dogs`.
    fn pets_dir() -> TempDir {
        let dir = tempdir().unwrap();
        for name in ["a.png", "b.jpg", "c.txt"] {
            File::create(dir.path().join(name)).unwrap();
        }
        fs::create_dir(dir.path().join("cats")).unwrap();
        thread::sleep(Duration::from_millis(20));
        fs::create_dir(dir.path().join("dogs")).unwrap();
        dir
    }

    fn write(path: &Path, content: &str) {
        File::create(path)
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
    }

    #[test]
    fn test_open_lists_images_and_folders() {
        let dir = pets_dir();
        let session = Session::open(dir.path()).unwrap();

        assert_eq!(session.images(), ["a.png", "b.jpg"]);
        assert_eq!(session.folders(), ["cats", "dogs"]);
        assert_eq!(session.current_image(), Some("a.png"));
        assert_eq!(session.position(), Some((1, 2)));
        assert_eq!(session.state(), SessionState::Browsing);
    }

    #[test]
    fn test_open_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let err = Session::open(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, SessionError::FileSystem { .. }));
    }

    #[test]
    fn test_open_without_images_is_completed() {
        let dir = tempdir().unwrap();
        let session = Session::open(dir.path()).unwrap();

        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.current_image(), None);
        assert_eq!(session.cursor(), None);
        assert_eq!(session.position(), None);
    }

    #[test]
    fn test_advance_and_retreat_clamp() {
        let dir = pets_dir();
        let mut session = Session::open(dir.path()).unwrap();

        session.retreat();
        assert_eq!(session.cursor(), Some(0));
        session.advance();
        session.advance();
        session.advance();
        assert_eq!(session.cursor(), Some(1));
        assert_eq!(session.current_image(), Some("b.jpg"));
        session.retreat();
        assert_eq!(session.current_image(), Some("a.png"));
    }

    #[test]
    fn test_move_then_undo() {
        let dir = pets_dir();
        let root = dir.path();
        let mut session = Session::open(root).unwrap();

        let outcome = session.move_current(1, None).unwrap();
        let record = UndoRecord {
            moved_to: root.join("dogs").join("a.png"),
            moved_from: root.join("a.png"),
        };
        assert_eq!(outcome, MoveOutcome::Moved(record.clone()));
        assert!(root.join("dogs/a.png").exists());
        assert!(!root.join("a.png").exists());
        assert_eq!(session.images(), ["b.jpg"]);
        assert_eq!(session.current_image(), Some("b.jpg"));
        assert_eq!(session.undo_depth(), 1);

        assert_eq!(session.undo_last().unwrap(), record);
        assert!(root.join("a.png").exists());
        assert_eq!(session.images(), ["a.png", "b.jpg"]);
        assert_eq!(session.current_image(), Some("a.png"));
        assert_eq!(session.undo_depth(), 0);
    }

    #[test]
    fn test_undo_selects_restored_image() {
        let dir = pets_dir();
        let mut session = Session::open(dir.path()).unwrap();

        session.advance();
        session.move_current(0, None).unwrap();
        assert_eq!(session.current_image(), Some("a.png"));

        session.undo_last().unwrap();
        assert_eq!(session.current_image(), Some("b.jpg"));
        assert_eq!(session.cursor(), Some(1));
    }

    #[test]
    fn test_undo_is_last_in_first_out() {
        let dir = pets_dir();
        let root = dir.path();
        let mut session = Session::open(root).unwrap();

        session.move_current(0, None).unwrap();
        session.move_current(1, None).unwrap();
        assert_eq!(session.undo_depth(), 2);

        let last = session.undo_last().unwrap();
        assert_eq!(last.moved_to, root.join("dogs/b.jpg"));
        let first = session.undo_last().unwrap();
        assert_eq!(first.moved_to, root.join("cats/a.png"));
        assert!(matches!(
            session.undo_last(),
            Err(SessionError::NothingToUndo)
        ));
    }

    #[test]
    fn test_undo_falls_back_to_previous_cursor() {
        let dir = pets_dir();
        let root = dir.path();
        let mut session = Session::open(root).unwrap();

        session.move_current(0, None).unwrap();
        // the restored name no longer qualifies once it comes back as a text file
        fs::rename(root.join("cats/a.png"), root.join("cats/a.txt")).unwrap();
        let mut record = session.undo_stack.pop().unwrap();
        record.moved_to = root.join("cats/a.txt");
        record.moved_from = root.join("a.txt");
        session.undo_stack.push(record);

        session.undo_last().unwrap();
        assert_eq!(session.images(), ["b.jpg"]);
        assert_eq!(session.cursor(), Some(0));
    }

    #[test]
    fn test_failed_undo_drops_record() {
        let dir = pets_dir();
        let root = dir.path();
        let mut session = Session::open(root).unwrap();

        session.move_current(0, None).unwrap();
        fs::remove_file(root.join("cats/a.png")).unwrap();

        let err = session.undo_last().unwrap_err();
        assert!(matches!(err, SessionError::FileSystem { .. }));
        assert_eq!(session.undo_depth(), 0);
        assert_eq!(session.images(), ["b.jpg"]);
    }

    #[test]
    fn test_nothing_to_undo() {
        let dir = pets_dir();
        let mut session = Session::open(dir.path()).unwrap();
        assert!(matches!(
            session.undo_last(),
            Err(SessionError::NothingToUndo)
        ));
    }

    #[test]
    fn test_moving_last_image_completes() {
        let dir = pets_dir();
        let mut session = Session::open(dir.path()).unwrap();

        session.advance();
        session.move_current(0, None).unwrap();
        assert_eq!(session.current_image(), Some("a.png"));
        session.move_current(0, None).unwrap();

        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.current_image(), None);
        assert_eq!(session.cursor(), None);
        assert!(matches!(
            session.move_current(0, None),
            Err(SessionError::NoImages)
        ));

        session.undo_last().unwrap();
        assert_eq!(session.state(), SessionState::Browsing);
        assert_eq!(session.current_image(), Some("a.png"));
    }

    #[test]
    fn test_moving_last_in_sequence_steps_back() {
        let dir = pets_dir();
        let mut session = Session::open(dir.path()).unwrap();

        session.advance();
        session.move_current(0, None).unwrap();
        assert_eq!(session.cursor(), Some(0));
        assert_eq!(session.current_image(), Some("a.png"));
    }

    #[test]
    fn test_move_to_invalid_folder() {
        let dir = pets_dir();
        let mut session = Session::open(dir.path()).unwrap();

        let err = session.move_current(2, None).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidFolder { index: 2, count: 2 }
        ));
        assert_eq!(session.images(), ["a.png", "b.jpg"]);
    }

    #[test]
    fn test_collision_requires_resolution() {
        let dir = pets_dir();
        let root = dir.path();
        write(&root.join("cats/a.png"), "old");
        let mut session = Session::open(root).unwrap();

        let err = session.move_current(0, None).unwrap_err();
        assert!(matches!(err, SessionError::DestinationExists { path } if path == root.join("cats/a.png")));
        assert_eq!(session.images(), ["a.png", "b.jpg"]);
        assert_eq!(session.undo_depth(), 0);
    }

    #[test]
    fn test_collision_cancel_changes_nothing() {
        let dir = pets_dir();
        let root = dir.path();
        write(&root.join("cats/a.png"), "old");
        let mut session = Session::open(root).unwrap();

        let outcome = session
            .move_current(0, Some(Resolution::Cancel))
            .unwrap();
        assert_eq!(outcome, MoveOutcome::Cancelled);
        assert_eq!(session.images(), ["a.png", "b.jpg"]);
        assert_eq!(session.current_image(), Some("a.png"));
        assert!(root.join("a.png").exists());
        assert_eq!(session.undo_depth(), 0);
    }

    #[test]
    fn test_collision_skip_drops_image_from_sequence() {
        let dir = pets_dir();
        let root = dir.path();
        write(&root.join("cats/a.png"), "old");
        let mut session = Session::open(root).unwrap();

        let outcome = session.move_current(0, Some(Resolution::Skip)).unwrap();
        assert_eq!(outcome, MoveOutcome::Skipped("a.png".to_string()));
        assert_eq!(session.images(), ["b.jpg"]);
        assert_eq!(session.current_image(), Some("b.jpg"));
        assert!(root.join("a.png").exists());
        assert_eq!(fs::read_to_string(root.join("cats/a.png")).unwrap(), "old");
        assert_eq!(session.undo_depth(), 0);

        // the skipped image is back after a rescan
        session.list_images().unwrap();
        assert_eq!(session.images(), ["a.png", "b.jpg"]);
    }

    #[test]
    fn test_collision_overwrite_replaces_destination() {
        let dir = pets_dir();
        let root = dir.path();
        write(&root.join("a.png"), "new");
        write(&root.join("cats/a.png"), "old");
        let mut session = Session::open(root).unwrap();

        let outcome = session
            .move_current(0, Some(Resolution::Overwrite))
            .unwrap();
        assert!(matches!(outcome, MoveOutcome::Moved(_)));
        assert_eq!(fs::read_to_string(root.join("cats/a.png")).unwrap(), "new");
        assert!(!root.join("a.png").exists());
        assert_eq!(session.undo_depth(), 1);
    }

    #[test]
    fn test_resolution_ignored_without_collision() {
        let dir = pets_dir();
        let mut session = Session::open(dir.path()).unwrap();

        let outcome = session.move_current(0, Some(Resolution::Skip)).unwrap();
        assert!(matches!(outcome, MoveOutcome::Moved(_)));
    }

    #[test]
    fn test_failed_move_leaves_state_unchanged() {
        let dir = pets_dir();
        let root = dir.path();
        let mut session = Session::open(root).unwrap();
        fs::remove_file(root.join("a.png")).unwrap();

        let err = session.move_current(0, None).unwrap_err();
        assert!(matches!(err, SessionError::FileSystem { .. }));
        assert_eq!(session.images(), ["a.png", "b.jpg"]);
        assert_eq!(session.undo_depth(), 0);
    }

    #[test]
    fn test_create_folder() {
        let dir = pets_dir();
        let mut session = Session::open(dir.path()).unwrap();
        thread::sleep(Duration::from_millis(20));

        let path = session.create_folder("  birds ").unwrap();
        assert_eq!(path, dir.path().join("birds"));
        assert!(path.is_dir());
        assert_eq!(session.folders().last().map(String::as_str), Some("birds"));
        assert_eq!(session.current_image(), Some("a.png"));
    }

    #[test]
    fn test_create_folder_validation() {
        let dir = pets_dir();
        let mut session = Session::open(dir.path()).unwrap();

        assert!(matches!(
            session.create_folder(""),
            Err(SessionError::EmptyFolderName)
        ));
        assert!(matches!(
            session.create_folder("   "),
            Err(SessionError::EmptyFolderName)
        ));
        assert!(matches!(
            session.create_folder("cats"),
            Err(SessionError::AlreadyExists(name)) if name == "cats"
        ));
        assert!(matches!(
            session.create_folder("c.txt"),
            Err(SessionError::AlreadyExists(_))
        ));
        for name in ["..", ".", "a/b", "a\\b"] {
            let err = session.create_folder(name).unwrap_err();
            assert!(err.is_validation(), "{name} should be rejected");
        }
        assert_eq!(session.folders(), ["cats", "dogs"]);
    }

    #[test]
    fn test_shortcut_for() {
        assert_eq!(shortcut_for(0), Some(1));
        assert_eq!(shortcut_for(8), Some(9));
        assert_eq!(shortcut_for(9), None);
    }
}
