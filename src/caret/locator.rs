// Caret locator: style capture + surface measurement, one call per
// recomputation. Nothing here is cached; content and caret index can
// change on every keystroke.

use crate::caret::style::StyleSnapshot;
use crate::caret::surface::{shared_surface, SharedSurface, TextMetrics};
use crate::caret::viewport::{to_visible, VisibleCaretCoordinates};
use crate::caret::widget::TextWidget;

// A caret at end-of-content has no trailing text to measure, so a single
// visible glyph stands in. A regular character keeps the same wrap point a
// real caret would have; an empty run can collapse to zero height in some
// layout engines.
const END_OF_CONTENT_MARKER: &str = ".";

/// Caret geometry relative to the widget's content origin, in pixels.
/// `top`/`left` are non-negative and `height` is strictly positive; a
/// zero-height indicator would be invisible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaretCoordinates {
    pub top: f64,
    pub left: f64,
    pub height: f64,
}

/// Computes caret coordinates for a widget by replicating its layout on a
/// measurement surface.
///
/// By default the locator borrows the process-shared surface; tests and
/// multi-editor hosts can inject their own with [`CaretLocator::with_surface`].
pub struct CaretLocator<M: TextMetrics> {
    surface: SharedSurface,
    metrics: M,
}

impl<M: TextMetrics> CaretLocator<M> {
    pub fn new(metrics: M) -> Self {
        Self::with_surface(shared_surface(), metrics)
    }

    pub fn with_surface(surface: SharedSurface, metrics: M) -> Self {
        CaretLocator { surface, metrics }
    }

    /// Raw caret coordinates for `index`, or for the widget's current
    /// selection start when `index` is None. Out-of-range indices are
    /// clamped to the content; this is a contract, not an error.
    pub fn locate(&mut self, widget: &dyn TextWidget, index: Option<usize>) -> CaretCoordinates {
        let content = widget.content();
        let index = clamp_index(&content, index.unwrap_or_else(|| widget.selection_start()));

        let snapshot = StyleSnapshot::capture(widget);

        let offset = {
            let mut surface = self.surface.borrow_mut();
            surface.apply_style(&snapshot);
            surface.set_content(&content[..index]);
            if index < content.len() {
                surface.set_marker(&content[index..]);
            } else {
                surface.set_marker(END_OF_CONTENT_MARKER);
            }
            let offset = surface.marker_offset(&mut self.metrics);
            surface.clear();
            offset
        };

        CaretCoordinates {
            top: (offset.top + snapshot.border_top_width()).max(0.0),
            left: (offset.left + snapshot.border_left_width()).max(0.0),
            height: snapshot.line_height(),
        }
    }

    /// Viewport-corrected coordinates with a visibility flag. The primary
    /// entry point for indicator rendering.
    pub fn locate_visible(
        &mut self,
        widget: &dyn TextWidget,
        index: Option<usize>,
    ) -> VisibleCaretCoordinates {
        to_visible(widget, self.locate(widget, index))
    }
}

/// Clamp to `[0, content.len()]` and down to a character boundary.
fn clamp_index(content: &str, index: usize) -> usize {
    let mut index = index.min(content.len());
    while index > 0 && !content.is_char_boundary(index) {
        index -= 1;
    }
    index
}
