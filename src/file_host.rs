// File open/save delegation. The editor session never touches paths or
// dialogs itself; it goes through a host that owns the current-file
// handle. The native host drives FLTK's file chooser and the filesystem.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fltk::dialog;
use thiserror::Error;

/// Errors from file operations, reduced to what the UI can react to.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FileError {
    #[error("file not found")]
    NotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("no file is currently opened")]
    NoOpenFile,
    #[error("file operation failed")]
    Io,
}

impl From<std::io::Error> for FileError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::NotFound => FileError::NotFound,
            ErrorKind::PermissionDenied => FileError::PermissionDenied,
            _ => FileError::Io,
        }
    }
}

/// A file picked by the user, ready to edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedFile {
    pub filename: String,
    pub content: String,
}

/// Host shell owning file dialogs and the current-file handle.
///
/// Dialog cancellation is `Ok(None)`, never an error.
pub trait FileHost {
    /// Let the user pick a file, read it, and make it current.
    fn open_file(&mut self) -> Result<Option<OpenedFile>, FileError>;

    /// Write to the current file without a dialog.
    fn save_current(&mut self, content: &str) -> Result<(), FileError>;

    /// Let the user pick a destination, write to it, and make it current.
    /// Returns the chosen filename.
    fn save_as(&mut self, content: &str, suggested_name: &str)
        -> Result<Option<String>, FileError>;

    /// Forget the current file.
    fn clear_current(&mut self);

    /// Filename of the current file, if any.
    fn current_filename(&self) -> Option<String>;
}

/// Display name for a path, used in the title and status bar.
pub fn filename_from_path(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("Untitled")
        .to_string()
}

/// FLTK-backed host: native file chooser plus direct filesystem access.
#[derive(Default)]
pub struct NativeFileHost {
    current: Option<PathBuf>,
}

impl NativeFileHost {
    pub fn new() -> Self {
        NativeFileHost { current: None }
    }

    /// Open a known path without a dialog, e.g. from the command line.
    pub fn open_path(&mut self, path: &Path) -> Result<OpenedFile, FileError> {
        let content = fs::read_to_string(path).inspect_err(|err| {
            tracing::warn!(path = %path.display(), %err, "failed to read file");
        })?;
        let filename = filename_from_path(path);
        self.current = Some(path.to_path_buf());
        Ok(OpenedFile { filename, content })
    }

    fn pick_open_path(&self) -> Option<PathBuf> {
        let mut chooser = dialog::NativeFileChooser::new(dialog::NativeFileChooserType::BrowseFile);
        chooser.set_title("Open File");
        chooser.set_filter("Markdown\t*.{md,markdown,txt}\nAll Files\t*");
        chooser.show();
        let path = chooser.filename();
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    }

    fn pick_save_path(&self, suggested_name: &str) -> Option<PathBuf> {
        let mut chooser =
            dialog::NativeFileChooser::new(dialog::NativeFileChooserType::BrowseSaveFile);
        chooser.set_title("Save File");
        chooser.set_filter("Markdown\t*.md\nText\t*.txt\nAll Files\t*");
        chooser.set_preset_file(suggested_name);
        chooser.show();
        let path = chooser.filename();
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    }
}

impl FileHost for NativeFileHost {
    fn open_file(&mut self) -> Result<Option<OpenedFile>, FileError> {
        let Some(path) = self.pick_open_path() else {
            return Ok(None);
        };
        let content = fs::read_to_string(&path).inspect_err(|err| {
            tracing::warn!(path = %path.display(), %err, "failed to read file");
        })?;
        let filename = filename_from_path(&path);
        self.current = Some(path);
        Ok(Some(OpenedFile { filename, content }))
    }

    fn save_current(&mut self, content: &str) -> Result<(), FileError> {
        let path = self.current.clone().ok_or(FileError::NoOpenFile)?;
        fs::write(&path, content).inspect_err(|err| {
            tracing::warn!(path = %path.display(), %err, "failed to save file");
        })?;
        Ok(())
    }

    fn save_as(
        &mut self,
        content: &str,
        suggested_name: &str,
    ) -> Result<Option<String>, FileError> {
        let Some(path) = self.pick_save_path(suggested_name) else {
            return Ok(None);
        };
        fs::write(&path, content).inspect_err(|err| {
            tracing::warn!(path = %path.display(), %err, "failed to save file");
        })?;
        let filename = filename_from_path(&path);
        self.current = Some(path);
        Ok(Some(filename))
    }

    fn clear_current(&mut self) {
        self.current = None;
    }

    fn current_filename(&self) -> Option<String> {
        self.current.as_deref().map(filename_from_path)
    }
}
