// FLTK integration for the caret estimator: the editor pane wraps a
// TextEditor widget, answers the TextWidget contract with synthesized
// resolved-style values, and renders the custom caret indicator as an
// overlay frame.

use fltk::{prelude::*, *};

use crate::caret::{FontSpec, IndicatorState, StyleProperty, TextMetrics, TextWidget};
use crate::theme::{rgb, Theme};

// Fl_Text_Display text area margins.
const TOP_MARGIN: i32 = 1;
const LEFT_MARGIN: i32 = 3;

const CARET_WIDTH: i32 = 2;

fn fl_color(color: u32) -> enums::Color {
    let (r, g, b) = rgb(color);
    enums::Color::from_rgb(r, g, b)
}

/// Measurement backend over FLTK's font machinery.
pub struct FltkTextMetrics;

impl TextMetrics for FltkTextMetrics {
    fn advance_width(&mut self, text: &str, font: &FontSpec) -> f64 {
        draw::set_font(map_font(font), font.size.round() as i32);
        draw::width(text) as f64
    }
}

fn map_font(spec: &FontSpec) -> enums::Font {
    let family = spec.family.to_ascii_lowercase();
    let mono = family.contains("courier") || family.contains("mono");
    match (mono, spec.bold, spec.italic) {
        (true, false, false) => enums::Font::Courier,
        (true, true, false) => enums::Font::CourierBold,
        (true, false, true) => enums::Font::CourierItalic,
        (true, true, true) => enums::Font::CourierBoldItalic,
        (false, false, false) => enums::Font::Helvetica,
        (false, true, false) => enums::Font::HelveticaBold,
        (false, false, true) => enums::Font::HelveticaItalic,
        (false, true, true) => enums::Font::HelveticaBoldItalic,
    }
}

/// The editing widget plus its caret indicator overlay.
pub struct EditorPane {
    editor: text::TextEditor,
    buffer: text::TextBuffer,
    caret_overlay: frame::Frame,
    font_size: i32,
}

impl EditorPane {
    pub fn new(x: i32, y: i32, w: i32, h: i32, theme: &Theme) -> Self {
        let mut buffer = text::TextBuffer::default();
        buffer.set_text("");
        let mut editor = text::TextEditor::new(x, y, w, h, None);
        editor.set_buffer(buffer.clone());
        editor.set_frame(enums::FrameType::FlatBox);
        editor.wrap_mode(text::WrapMode::AtBounds, 0);
        editor.set_text_font(enums::Font::Courier);

        let mut caret_overlay = frame::Frame::new(x, y, CARET_WIDTH, theme.line_height, None);
        caret_overlay.set_frame(enums::FrameType::FlatBox);
        caret_overlay.hide();

        let mut pane = EditorPane {
            editor,
            buffer,
            caret_overlay,
            font_size: theme.font_size as i32,
        };
        pane.apply_theme(theme);
        pane
    }

    pub fn apply_theme(&mut self, theme: &Theme) {
        self.font_size = theme.font_size as i32;
        self.editor.set_color(fl_color(theme.background_color));
        self.editor.set_text_color(fl_color(theme.text_color));
        self.editor.set_text_size(self.font_size);
        self.editor
            .set_selection_color(fl_color(theme.selection_color));
        // the custom overlay is the caret; blend the native one away
        self.editor
            .set_cursor_color(fl_color(theme.background_color));
        self.caret_overlay.set_color(fl_color(theme.caret_color));
        self.editor.redraw();
    }

    pub fn set_content(&mut self, content: &str) {
        self.buffer.set_text(content);
    }

    pub fn content_text(&self) -> String {
        self.buffer.text()
    }

    pub fn widget(&self) -> text::TextEditor {
        self.editor.clone()
    }

    pub fn show(&mut self) {
        self.editor.show();
    }

    pub fn hide(&mut self) {
        self.editor.hide();
        self.caret_overlay.hide();
    }

    pub fn resize(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.editor.resize(x, y, w, h);
        // stale until the next recomputation
        self.caret_overlay.hide();
    }

    pub fn take_focus(&mut self) {
        self.editor.take_focus().ok();
    }

    /// Move the overlay to the freshly computed indicator state.
    pub fn sync_indicator(&mut self, state: &IndicatorState) {
        if state.should_draw() && self.editor.visible() {
            let x = self.editor.x() + state.left.round() as i32;
            let y = self.editor.y() + state.top.round() as i32;
            let height = (state.height.round() as i32).max(1);
            self.caret_overlay.resize(x, y, CARET_WIDTH, height);
            self.caret_overlay.show();
        } else {
            self.caret_overlay.hide();
        }
        self.editor.redraw();
    }

    fn line_height_px(&self) -> i32 {
        draw::set_font(enums::Font::Courier, self.font_size);
        draw::height()
    }
}

impl TextWidget for EditorPane {
    fn content(&self) -> String {
        self.buffer.text()
    }

    fn selection_start(&self) -> usize {
        self.buffer
            .selection_position()
            .map(|(start, _)| start as usize)
            .unwrap_or_else(|| self.editor.insert_position() as usize)
    }

    fn scroll_top(&self) -> f64 {
        // FLTK tracks the top visible line, 1-based
        let top_line = (self.editor.scroll_row() - 1).max(0);
        (top_line * self.line_height_px()) as f64
    }

    fn scroll_left(&self) -> f64 {
        // wrap-at-bounds mode never scrolls horizontally
        0.0
    }

    fn client_height(&self) -> f64 {
        (self.editor.h() - 2 * TOP_MARGIN) as f64
    }

    fn is_attached(&self) -> bool {
        self.editor.window().is_some()
    }

    fn computed_style(&self, property: StyleProperty) -> Option<String> {
        if !self.is_attached() {
            return None;
        }
        Some(match property {
            StyleProperty::Width => format!("{}px", self.editor.w()),
            StyleProperty::BoxSizing => "border-box".to_string(),
            // FlatBox draws no border
            StyleProperty::PaddingTop | StyleProperty::PaddingBottom => {
                format!("{TOP_MARGIN}px")
            }
            StyleProperty::PaddingLeft | StyleProperty::PaddingRight => {
                format!("{LEFT_MARGIN}px")
            }
            StyleProperty::FontSize => format!("{}px", self.font_size),
            StyleProperty::LineHeight => format!("{}px", self.line_height_px()),
            StyleProperty::FontFamily => "Courier".to_string(),
            _ => property.default_value().to_string(),
        })
    }
}
