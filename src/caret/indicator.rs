// Interaction layer: decides when caret geometry is recomputed and what
// the visual indicator should show.

use crate::caret::locator::{CaretCoordinates, CaretLocator};
use crate::caret::surface::TextMetrics;
use crate::caret::viewport::{to_visible, VisibleCaretCoordinates};
use crate::caret::widget::TextWidget;

/// Widget interactions that can move the caret or the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretEvent {
    /// Typed input changed the content.
    ContentChanged,
    /// Pointer click/drag, arrow keys, or a programmatic selection change.
    SelectionChanged,
    /// The widget's content scrolled; content and caret index unchanged.
    Scrolled,
    FocusGained,
    FocusLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusState {
    Unfocused,
    FocusedValid,
    /// Focused, but the last computation predates a style change the host
    /// told us about. Cured by the next content/selection recomputation.
    FocusedStale,
}

/// What the indicator widget should render right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorState {
    pub top: f64,
    pub left: f64,
    pub height: f64,
    /// Caret position lies inside the visible viewport band.
    pub visible: bool,
    /// The widget holds input focus.
    pub focused: bool,
}

impl IndicatorState {
    /// The indicator is drawn only for a focused widget whose caret is in
    /// view.
    pub fn should_draw(&self) -> bool {
        self.focused && self.visible
    }

    fn hidden(focused: bool) -> Self {
        IndicatorState {
            top: 0.0,
            left: 0.0,
            height: 0.0,
            visible: false,
            focused,
        }
    }
}

/// Event-driven recomputation of the caret indicator.
///
/// Content and selection changes re-run the full estimate. Scrolls reuse
/// the last raw coordinates and only re-apply the viewport correction,
/// since neither content nor caret index moved. Recomputation also runs
/// while unfocused so the value is ready the instant focus arrives; the
/// indicator is just not drawn then.
pub struct CaretIndicatorController<M: TextMetrics> {
    locator: CaretLocator<M>,
    focus: FocusState,
    raw: Option<CaretCoordinates>,
    coords: Option<VisibleCaretCoordinates>,
}

impl<M: TextMetrics> CaretIndicatorController<M> {
    pub fn new(locator: CaretLocator<M>) -> Self {
        CaretIndicatorController {
            locator,
            focus: FocusState::Unfocused,
            raw: None,
            coords: None,
        }
    }

    /// Feed one widget event through the state machine and get the
    /// resulting indicator state.
    pub fn handle_event(&mut self, widget: &dyn TextWidget, event: CaretEvent) -> IndicatorState {
        match event {
            CaretEvent::ContentChanged | CaretEvent::SelectionChanged => {
                self.recompute(widget);
                if self.focus != FocusState::Unfocused {
                    self.focus = FocusState::FocusedValid;
                }
            }
            CaretEvent::Scrolled => match self.raw {
                Some(raw) => self.coords = Some(to_visible(widget, raw)),
                None => self.recompute(widget),
            },
            CaretEvent::FocusGained => {
                if self.coords.is_none() {
                    self.recompute(widget);
                }
                self.focus = FocusState::FocusedValid;
            }
            CaretEvent::FocusLost => {
                // keep the coordinates, hide the indicator
                self.focus = FocusState::Unfocused;
            }
        }
        self.indicator()
    }

    /// Host hook for style-only changes (font, zoom, theme): no widget
    /// event fires for those, so the cached geometry is marked stale and
    /// dropped. The next qualifying event, or `refresh`, recomputes.
    pub fn mark_style_stale(&mut self) {
        self.raw = None;
        if self.focus != FocusState::Unfocused {
            self.focus = FocusState::FocusedStale;
        }
    }

    /// Force a full recomputation outside the event set.
    pub fn refresh(&mut self, widget: &dyn TextWidget) -> IndicatorState {
        self.recompute(widget);
        if self.focus != FocusState::Unfocused {
            self.focus = FocusState::FocusedValid;
        }
        self.indicator()
    }

    /// Current indicator state without recomputing anything.
    pub fn indicator(&self) -> IndicatorState {
        let focused = self.focus != FocusState::Unfocused;
        match self.coords {
            Some(coords) => IndicatorState {
                top: coords.top,
                left: coords.left,
                height: coords.height,
                visible: coords.visible,
                focused,
            },
            None => IndicatorState::hidden(focused),
        }
    }

    fn recompute(&mut self, widget: &dyn TextWidget) {
        let raw = self.locator.locate(widget, None);
        self.raw = Some(raw);
        self.coords = Some(to_visible(widget, raw));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caret::style::StyleProperty;
    use crate::caret::surface::{FontSpec, MeasurementSurface};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct MonoMetrics;

    impl TextMetrics for MonoMetrics {
        fn advance_width(&mut self, text: &str, _font: &FontSpec) -> f64 {
            text.chars().count() as f64 * 8.0
        }
    }

    struct FakeWidget {
        content: String,
        selection_start: usize,
        scroll_top: f64,
        client_height: f64,
    }

    impl FakeWidget {
        fn new(content: &str, selection_start: usize) -> Self {
            FakeWidget {
                content: content.to_string(),
                selection_start,
                scroll_top: 0.0,
                client_height: 100.0,
            }
        }
    }

    impl TextWidget for FakeWidget {
        fn content(&self) -> String {
            self.content.clone()
        }
        fn selection_start(&self) -> usize {
            self.selection_start
        }
        fn scroll_top(&self) -> f64 {
            self.scroll_top
        }
        fn scroll_left(&self) -> f64 {
            0.0
        }
        fn client_height(&self) -> f64 {
            self.client_height
        }
        fn is_attached(&self) -> bool {
            true
        }
        fn computed_style(&self, property: StyleProperty) -> Option<String> {
            Some(match property {
                StyleProperty::LineHeight => "20px".to_string(),
                _ => property.default_value().to_string(),
            })
        }
    }

    fn controller() -> CaretIndicatorController<MonoMetrics> {
        let surface = Rc::new(RefCell::new(MeasurementSurface::new()));
        CaretIndicatorController::new(CaretLocator::with_surface(surface, MonoMetrics))
    }

    #[test]
    fn starts_unfocused_and_hidden() {
        let state = controller().indicator();
        assert!(!state.focused);
        assert!(!state.visible);
        assert!(!state.should_draw());
    }

    #[test]
    fn content_change_while_unfocused_computes_but_does_not_draw() {
        let mut controller = controller();
        let widget = FakeWidget::new("hi", 2);
        let state = controller.handle_event(&widget, CaretEvent::ContentChanged);
        assert!(!state.focused);
        assert!(state.visible);
        assert!(!state.should_draw());
        assert_eq!(state.left, 16.0);
    }

    #[test]
    fn focus_gain_reuses_warm_coordinates() {
        let mut controller = controller();
        let widget = FakeWidget::new("hi", 2);
        controller.handle_event(&widget, CaretEvent::ContentChanged);
        let computed = controller.indicator();
        let state = controller.handle_event(&widget, CaretEvent::FocusGained);
        assert!(state.focused);
        assert!(state.should_draw());
        assert_eq!(state.left, computed.left);
    }

    #[test]
    fn focus_gain_with_no_history_recomputes() {
        let mut controller = controller();
        let widget = FakeWidget::new("abcd", 4);
        let state = controller.handle_event(&widget, CaretEvent::FocusGained);
        assert!(state.focused);
        assert_eq!(state.left, 32.0);
    }

    #[test]
    fn focus_loss_retains_coordinates_but_hides() {
        let mut controller = controller();
        let widget = FakeWidget::new("hi", 2);
        controller.handle_event(&widget, CaretEvent::FocusGained);
        let state = controller.handle_event(&widget, CaretEvent::FocusLost);
        assert!(!state.focused);
        assert!(!state.should_draw());
        assert_eq!(state.left, 16.0);
    }

    #[test]
    fn selection_change_moves_the_indicator() {
        let mut controller = controller();
        let mut widget = FakeWidget::new("hello", 0);
        controller.handle_event(&widget, CaretEvent::FocusGained);
        widget.selection_start = 3;
        let state = controller.handle_event(&widget, CaretEvent::SelectionChanged);
        assert_eq!(state.left, 24.0);
    }

    #[test]
    fn scroll_only_reapplies_the_viewport_correction() {
        let mut controller = controller();
        let mut widget = FakeWidget::new("a\nb\nc\nd\ne\nf", 10);
        controller.handle_event(&widget, CaretEvent::FocusGained);
        let before = controller.indicator();
        assert_eq!(before.top, 100.0);
        assert!(before.visible);

        widget.scroll_top = 120.0;
        let state = controller.handle_event(&widget, CaretEvent::Scrolled);
        assert_eq!(state.top, -20.0);
        assert!(!state.visible);
        assert!(state.focused);
    }

    #[test]
    fn style_stale_is_cured_by_the_next_selection_event() {
        let mut controller = controller();
        let widget = FakeWidget::new("hi", 2);
        controller.handle_event(&widget, CaretEvent::FocusGained);
        controller.mark_style_stale();
        // still focused and drawable while stale
        assert!(controller.indicator().focused);
        let state = controller.handle_event(&widget, CaretEvent::SelectionChanged);
        assert!(state.focused);
        assert_eq!(state.left, 16.0);
    }

    #[test]
    fn refresh_recomputes_outside_the_event_set() {
        let mut controller = controller();
        let mut widget = FakeWidget::new("hi", 2);
        controller.handle_event(&widget, CaretEvent::FocusGained);
        widget.selection_start = 0;
        let state = controller.refresh(&widget);
        assert_eq!(state.left, 0.0);
    }
}
