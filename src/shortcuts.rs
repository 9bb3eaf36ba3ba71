// Keyboard shortcut dispatch: a pure mapping from key combination to
// editor action, so the bindings are testable without a toolkit event.

/// Editor-level actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    NewFile,
    OpenFile,
    SaveFile,
    SaveFileAs,
    TogglePreview,
}

/// A pressed key with its modifiers. `command` is Ctrl on Linux/Windows
/// and Cmd on macOS; the caller normalizes that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCombo {
    pub command: bool,
    pub shift: bool,
    pub key: char,
}

/// Characters worth checking against the bindings; used by toolkit
/// handlers to decide which key was pressed.
pub const BOUND_KEYS: [char; 4] = ['n', 'o', 's', 'p'];

/// Map a combination to its action, if any. All bindings require the
/// command modifier; Shift+S turns save into save-as.
pub fn action_for(combo: KeyCombo) -> Option<EditorAction> {
    if !combo.command {
        return None;
    }
    match (combo.shift, combo.key.to_ascii_lowercase()) {
        (true, 's') => Some(EditorAction::SaveFileAs),
        (false, 's') => Some(EditorAction::SaveFile),
        (false, 'n') => Some(EditorAction::NewFile),
        (false, 'o') => Some(EditorAction::OpenFile),
        (false, 'p') => Some(EditorAction::TogglePreview),
        _ => None,
    }
}
