// Editor session state: the document being edited plus the derived values
// the status bar and preview consume. File I/O is delegated to a FileHost.

use crate::file_host::{FileError, FileHost};
use crate::{markdown, stats};

const UNTITLED: &str = "Untitled";

/// State for one open document.
pub struct EditorSession {
    content: String,
    filename: String,
    has_open_file: bool,
    dirty: bool,
    show_preview: bool,
}

impl EditorSession {
    pub fn new() -> Self {
        EditorSession {
            content: String::new(),
            filename: UNTITLED.to_string(),
            has_open_file: false,
            dirty: false,
            show_preview: false,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn has_open_file(&self) -> bool {
        self.has_open_file
    }

    pub fn show_preview(&self) -> bool {
        self.show_preview
    }

    pub fn word_count(&self) -> usize {
        stats::count_words(&self.content)
    }

    pub fn char_count(&self) -> usize {
        stats::count_chars(&self.content)
    }

    pub fn preview_html(&self) -> String {
        markdown::to_html(&self.content)
    }

    /// Status bar text, e.g. "12 words · 68 chars".
    pub fn counts_label(&self) -> String {
        format!("{} words · {} chars", self.word_count(), self.char_count())
    }

    /// Window title: filename plus a dirty marker.
    pub fn title(&self) -> String {
        if self.dirty {
            format!("{} •", self.filename)
        } else {
            self.filename.clone()
        }
    }

    /// Typed input replaced the content.
    pub fn update_content(&mut self, next: &str) {
        self.content.clear();
        self.content.push_str(next);
        self.dirty = true;
    }

    pub fn toggle_preview(&mut self) {
        self.show_preview = !self.show_preview;
    }

    /// Returns true when a file was actually opened (dialog not cancelled).
    pub fn open(&mut self, host: &mut dyn FileHost) -> Result<bool, FileError> {
        let Some(opened) = host.open_file()? else {
            return Ok(false);
        };
        self.adopt_opened(opened);
        Ok(true)
    }

    /// Take over a file the host already opened (e.g. a CLI argument).
    pub fn adopt_opened(&mut self, opened: crate::file_host::OpenedFile) {
        self.content = opened.content;
        self.filename = opened.filename;
        self.has_open_file = true;
        self.dirty = false;
    }

    /// Save to the current file, or fall through to save-as when there is
    /// none yet. Returns true when content hit the disk.
    pub fn save(&mut self, host: &mut dyn FileHost) -> Result<bool, FileError> {
        if !self.has_open_file {
            return self.save_as(host);
        }
        host.save_current(&self.content)?;
        self.dirty = false;
        Ok(true)
    }

    pub fn save_as(&mut self, host: &mut dyn FileHost) -> Result<bool, FileError> {
        let suggested = if self.filename.ends_with(".md") {
            self.filename.clone()
        } else {
            format!("{}.md", self.filename)
        };
        let Some(filename) = host.save_as(&self.content, &suggested)? else {
            return Ok(false);
        };
        self.filename = filename;
        self.has_open_file = true;
        self.dirty = false;
        Ok(true)
    }

    pub fn new_file(&mut self, host: &mut dyn FileHost) {
        self.content.clear();
        self.filename = UNTITLED.to_string();
        self.has_open_file = false;
        self.dirty = false;
        host.clear_current();
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}
