// Caret position estimation.
//
// The host text widget only exposes logical state (content, selection
// offset, scroll offset), never pixel geometry. These modules rebuild the
// geometry by replaying the widget's text layout on an off-screen
// measurement surface and reading back where a marker lands.

pub mod indicator;
pub mod locator;
pub mod style;
pub mod surface;
pub mod viewport;
pub mod widget;

pub use indicator::{CaretEvent, CaretIndicatorController, IndicatorState};
pub use locator::{CaretCoordinates, CaretLocator};
pub use style::{StyleProperty, StyleSnapshot};
pub use surface::{shared_surface, FontSpec, MeasurementSurface, SharedSurface, TextMetrics};
pub use viewport::{to_visible, VisibleCaretCoordinates};
pub use widget::TextWidget;
