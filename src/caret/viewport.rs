// Viewport correction: content-relative coordinates to scrolled,
// widget-relative ones.

use crate::caret::locator::CaretCoordinates;
use crate::caret::widget::TextWidget;

/// Caret coordinates relative to the widget's visible (scrolled) viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleCaretCoordinates {
    pub top: f64,
    pub left: f64,
    pub height: f64,
    pub visible: bool,
}

/// Subtract the current scroll offsets and judge visibility.
///
/// Visibility is decided on the caret's top edge only: a caret whose top
/// sits inside the visible band counts as visible even when its lower end
/// pokes past the bottom edge. Checking both edges makes the indicator
/// flicker at scroll boundaries.
pub fn to_visible(widget: &dyn TextWidget, coords: CaretCoordinates) -> VisibleCaretCoordinates {
    let top = coords.top - widget.scroll_top();
    let left = coords.left - widget.scroll_left();
    let visible = top >= 0.0 && top <= widget.client_height();
    VisibleCaretCoordinates {
        top,
        left,
        height: coords.height,
        visible,
    }
}
