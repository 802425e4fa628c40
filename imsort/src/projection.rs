use imsort_core::{Resolution, Session, shortcut_for};
use imsort_ui::{FolderItem, ImageItem, View, app::Choice};

pub fn session_to_view(session: &Session) -> View {
    let image = session
        .current_path()
        .zip(session.current_image())
        .zip(session.position())
        .map(|((path, name), (position, total))| ImageItem {
            name: name.to_string(),
            path,
            position,
            total,
        });

    let folders = session
        .folders()
        .iter()
        .enumerate()
        .map(|(index, name)| FolderItem {
            name: name.clone(),
            shortcut: shortcut_for(index),
        })
        .collect();

    View {
        image,
        folders,
        undo_depth: session.undo_depth(),
    }
}

pub fn resolution(choice: Choice) -> Resolution {
    match choice {
        Choice::Overwrite => Resolution::Overwrite,
        Choice::Skip => Resolution::Skip,
        Choice::Cancel => Resolution::Cancel,
    }
}
