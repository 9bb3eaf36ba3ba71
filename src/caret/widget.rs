// Host widget contract. The estimator never sees pixel geometry from the
// widget itself, only logical state plus resolved style values.

use crate::caret::style::StyleProperty;

/// The multiline text-input widget whose caret is being located.
///
/// Implementations wrap a real toolkit widget (see `fltk_editor`) or a
/// test double. All offsets are byte offsets into the UTF-8 content.
pub trait TextWidget {
    /// Full text content of the widget.
    fn content(&self) -> String;

    /// Start of the current selection, or the insert position when nothing
    /// is selected.
    fn selection_start(&self) -> usize;

    /// Vertical scroll offset of the content, in pixels.
    fn scroll_top(&self) -> f64;

    /// Horizontal scroll offset of the content, in pixels.
    fn scroll_left(&self) -> f64;

    /// Height of the visible content area, in pixels.
    fn client_height(&self) -> f64;

    /// Whether the widget currently lives in a shown window. Detached
    /// widgets cannot resolve styles and get default geometry.
    fn is_attached(&self) -> bool;

    /// Resolved value for one style property, or None when the widget
    /// cannot answer (typically: not attached).
    fn computed_style(&self, property: StyleProperty) -> Option<String>;
}
