// Measurement surface: an off-screen layout scratchpad that replicates the
// text flow of a widget so marker offsets can be read back as caret
// coordinates. One surface is shared per thread and reused across calls;
// content is overwritten, never reallocated wholesale.

use std::cell::RefCell;
use std::rc::Rc;

use unicode_segmentation::UnicodeSegmentation;

use crate::caret::style::{StyleSnapshot, TabStop, TextAlign, TextTransform};

// Wrap comparisons carry accumulated float error from per-grapheme sums.
const WRAP_SLACK: f64 = 1e-3;

/// Font parameters handed to the metrics backend.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

/// Host measurement capability: advance width of a text run in a font.
///
/// The surface replicates line breaking itself; this trait is the only
/// thing it needs from the toolkit. `&mut` because toolkit backends set
/// global font state before measuring.
pub trait TextMetrics {
    fn advance_width(&mut self, text: &str, font: &FontSpec) -> f64;
}

/// Marker position in the surface's local coordinate space, relative to
/// the border edge (padding included, borders not).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceOffset {
    pub top: f64,
    pub left: f64,
}

/// One wrapped visual line: a byte range of the laid-out text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineBox {
    start: usize,
    end: usize,
    /// Line ends at a newline character (which sits at `end`).
    hard_break: bool,
    /// First visual line of its paragraph; text-indent applies here.
    first_in_paragraph: bool,
}

/// The reusable measurement scratchpad.
///
/// Discipline per measurement: apply style, set content and marker,
/// read the marker offset, clear. `clear` keeps the surface alive but
/// drops the text so no state leaks into the next call.
#[derive(Debug)]
pub struct MeasurementSurface {
    style: StyleSnapshot,
    content: String,
    marker: String,
}

pub type SharedSurface = Rc<RefCell<MeasurementSurface>>;

thread_local! {
    static SHARED: SharedSurface = Rc::new(RefCell::new(MeasurementSurface::new()));
}

/// The process-shared surface, created lazily on first use and kept for
/// the lifetime of the thread.
pub fn shared_surface() -> SharedSurface {
    SHARED.with(Rc::clone)
}

impl MeasurementSurface {
    pub fn new() -> Self {
        MeasurementSurface {
            style: StyleSnapshot::detached(),
            content: String::new(),
            marker: String::new(),
        }
    }

    /// Copy every captured property onto the surface so its layout matches
    /// the source widget for font metrics, box model and text flow.
    pub fn apply_style(&mut self, snapshot: &StyleSnapshot) {
        self.style = snapshot.clone();
    }

    /// Text up to the caret index.
    pub fn set_content(&mut self, prefix: &str) {
        self.content.clear();
        self.content.push_str(prefix);
    }

    /// Text following the caret index, or a placeholder glyph at
    /// end-of-content. Must never be empty for a measurement.
    pub fn set_marker(&mut self, text: &str) {
        self.marker.clear();
        self.marker.push_str(text);
    }

    /// Drop text state between measurements.
    pub fn clear(&mut self) {
        self.content.clear();
        self.marker.clear();
    }

    pub fn is_clear(&self) -> bool {
        self.content.is_empty() && self.marker.is_empty()
    }

    /// Lay out content + marker as one pre-wrap flow and report where the
    /// marker's first glyph lands.
    pub fn marker_offset(&self, metrics: &mut dyn TextMetrics) -> SurfaceOffset {
        let text: String = [self.content.as_str(), self.marker.as_str()].concat();
        let marker_at = self.content.len();
        let snapshot = &self.style;

        let font = snapshot.font_spec();
        let params = LayoutParams::resolve(snapshot, &font, metrics);
        let wrap_width = snapshot.content_width();
        let indent = snapshot.text_indent();

        let lines = break_lines(&text, &params, wrap_width, indent, metrics);

        // The marker belongs to the first line whose extent (including a
        // trailing newline) reaches past it; a caret sitting on a newline
        // stays at the end of that line, a caret at a soft wrap moves to
        // the start of the next.
        let mut line_index = lines.len().saturating_sub(1);
        for (i, line) in lines.iter().enumerate() {
            let boundary = line.end + usize::from(line.hard_break);
            if marker_at < boundary {
                line_index = i;
                break;
            }
        }
        let line = &lines[line_index];
        let upto = marker_at.clamp(line.start, line.end);

        let line_start_x = if line.first_in_paragraph { indent } else { 0.0 };
        let mut pen = Pen::new(line_start_x);
        pen.advance_run(&text[line.start..upto], &params, metrics);
        let x = pen.x;

        let shift = match (snapshot.text_align(), wrap_width) {
            (TextAlign::Left, _) | (_, None) => 0.0,
            (align, Some(width)) => {
                let mut full = Pen::new(line_start_x);
                full.advance_run(&text[line.start..line.end], &params, metrics);
                let slack = (width - full.x).max(0.0);
                match align {
                    TextAlign::Center => slack / 2.0,
                    _ => slack,
                }
            }
        };

        SurfaceOffset {
            top: snapshot.padding_top() + line_index as f64 * snapshot.line_height(),
            left: snapshot.padding_left() + x + shift,
        }
    }
}

impl Default for MeasurementSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-measurement layout constants resolved once from the snapshot.
struct LayoutParams<'a> {
    font: &'a FontSpec,
    letter_spacing: f64,
    word_spacing: f64,
    tab_px: f64,
    transform: TextTransform,
}

impl<'a> LayoutParams<'a> {
    fn resolve(
        snapshot: &StyleSnapshot,
        font: &'a FontSpec,
        metrics: &mut dyn TextMetrics,
    ) -> Self {
        let space_width = metrics.advance_width(" ", font).max(1.0);
        let tab_px = match snapshot.tab_stop() {
            TabStop::Columns(columns) => columns * space_width,
            TabStop::Px(px) => px,
        };
        LayoutParams {
            font,
            letter_spacing: snapshot.letter_spacing(),
            word_spacing: snapshot.word_spacing(),
            tab_px: tab_px.max(1.0),
            transform: snapshot.text_transform(),
        }
    }
}

/// Pen position while walking graphemes along a line.
#[derive(Debug, Clone, Copy)]
struct Pen {
    x: f64,
    at_word_start: bool,
}

impl Pen {
    fn new(x: f64) -> Self {
        Pen {
            x,
            at_word_start: true,
        }
    }

    fn advance(&mut self, grapheme: &str, params: &LayoutParams, metrics: &mut dyn TextMetrics) {
        if grapheme == "\t" {
            // advance to the next tab stop
            self.x = ((self.x / params.tab_px).floor() + 1.0) * params.tab_px;
            self.at_word_start = true;
            return;
        }
        let shaped = params.transform.apply(grapheme, self.at_word_start);
        self.at_word_start = !grapheme.chars().any(char::is_alphanumeric);
        let mut advance = metrics.advance_width(&shaped, params.font);
        advance += params.letter_spacing;
        if grapheme == " " {
            advance += params.word_spacing;
        }
        self.x += advance;
    }

    fn advance_run(&mut self, run: &str, params: &LayoutParams, metrics: &mut dyn TextMetrics) {
        for grapheme in run.graphemes(true) {
            self.advance(grapheme, params, metrics);
        }
    }
}

/// Split the full text into visual lines: hard breaks at newlines, greedy
/// soft wrapping at whitespace, and break-word inside runs wider than the
/// content box. Always yields at least one line.
fn break_lines(
    text: &str,
    params: &LayoutParams,
    wrap_width: Option<f64>,
    indent: f64,
    metrics: &mut dyn TextMetrics,
) -> Vec<LineBox> {
    let mut lines = Vec::new();
    let mut paragraph_start = 0;
    loop {
        let newline = text[paragraph_start..]
            .find('\n')
            .map(|i| paragraph_start + i);
        let paragraph_end = newline.unwrap_or(text.len());
        break_paragraph(
            text,
            paragraph_start,
            paragraph_end,
            params,
            wrap_width,
            indent,
            metrics,
            &mut lines,
        );
        let Some(newline_at) = newline else {
            break;
        };
        if let Some(last) = lines.last_mut() {
            debug_assert_eq!(last.end, newline_at);
            last.hard_break = true;
        }
        paragraph_start = newline_at + 1;
        if paragraph_start == text.len() {
            // trailing newline ends in an empty final line
            lines.push(LineBox {
                start: paragraph_start,
                end: paragraph_start,
                hard_break: false,
                first_in_paragraph: true,
            });
            break;
        }
    }
    lines
}

#[allow(clippy::too_many_arguments)]
fn break_paragraph(
    text: &str,
    start: usize,
    end: usize,
    params: &LayoutParams,
    wrap_width: Option<f64>,
    indent: f64,
    metrics: &mut dyn TextMetrics,
    lines: &mut Vec<LineBox>,
) {
    let Some(wrap) = wrap_width else {
        lines.push(LineBox {
            start,
            end,
            hard_break: false,
            first_in_paragraph: true,
        });
        return;
    };

    let paragraph = &text[start..end];
    let mut pen = Pen::new(indent);
    let mut line_start = start;
    let mut first = true;
    let mut i = 0;
    while i < paragraph.len() {
        let token_end = token_end(paragraph, i);
        let token = &paragraph[i..token_end];
        if token.starts_with([' ', '\t']) {
            // preserved whitespace hangs past the wrap edge rather than
            // forcing a break
            pen.advance_run(token, params, metrics);
            i = token_end;
            continue;
        }

        let mut trial = pen;
        trial.advance_run(token, params, metrics);
        if trial.x <= wrap + WRAP_SLACK {
            pen = trial;
            i = token_end;
            continue;
        }

        if start + i > line_start {
            // wrap before the word and retry it on a fresh line
            lines.push(LineBox {
                start: line_start,
                end: start + i,
                hard_break: false,
                first_in_paragraph: first,
            });
            first = false;
            line_start = start + i;
            pen = Pen {
                x: 0.0,
                at_word_start: pen.at_word_start,
            };
            continue;
        }

        // a single word wider than the content box breaks inside itself,
        // one grapheme minimum per line
        for (offset, grapheme) in token.grapheme_indices(true) {
            let at = start + i + offset;
            let mut trial = pen;
            trial.advance(grapheme, params, metrics);
            if trial.x > wrap + WRAP_SLACK && at > line_start {
                lines.push(LineBox {
                    start: line_start,
                    end: at,
                    hard_break: false,
                    first_in_paragraph: first,
                });
                first = false;
                line_start = at;
                pen = Pen {
                    x: 0.0,
                    at_word_start: pen.at_word_start,
                };
                pen.advance(grapheme, params, metrics);
            } else {
                pen = trial;
            }
        }
        i = token_end;
    }

    lines.push(LineBox {
        start: line_start,
        end,
        hard_break: false,
        first_in_paragraph: first,
    });
}

/// End of the homogeneous token (whitespace run or word run) starting at
/// `from`.
fn token_end(paragraph: &str, from: usize) -> usize {
    let rest = &paragraph[from..];
    let is_space = rest.starts_with([' ', '\t']);
    rest.char_indices()
        .find(|(_, c)| (*c == ' ' || *c == '\t') != is_space)
        .map_or(paragraph.len(), |(i, _)| from + i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caret::style::{StyleProperty, StyleSnapshot};
    use crate::caret::widget::TextWidget;
    use std::collections::HashMap;

    const CHAR_WIDTH: f64 = 8.0;

    /// Fixed-width metrics: every grapheme advances 8px, except uppercase
    /// ASCII which advances 10px so transform effects are observable.
    struct MonoMetrics;

    impl TextMetrics for MonoMetrics {
        fn advance_width(&mut self, text: &str, _font: &FontSpec) -> f64 {
            text.graphemes(true)
                .map(|g| {
                    if g.chars().all(|c| c.is_ascii_uppercase()) {
                        10.0
                    } else {
                        CHAR_WIDTH
                    }
                })
                .sum()
        }
    }

    struct StyledWidget {
        styles: HashMap<StyleProperty, String>,
    }

    impl StyledWidget {
        fn new(overrides: &[(StyleProperty, &str)]) -> Self {
            StyledWidget {
                styles: overrides
                    .iter()
                    .map(|(p, v)| (*p, (*v).to_string()))
                    .collect(),
            }
        }
    }

    impl TextWidget for StyledWidget {
        fn content(&self) -> String {
            String::new()
        }
        fn selection_start(&self) -> usize {
            0
        }
        fn scroll_top(&self) -> f64 {
            0.0
        }
        fn scroll_left(&self) -> f64 {
            0.0
        }
        fn client_height(&self) -> f64 {
            100.0
        }
        fn is_attached(&self) -> bool {
            true
        }
        fn computed_style(&self, property: StyleProperty) -> Option<String> {
            Some(
                self.styles
                    .get(&property)
                    .cloned()
                    .unwrap_or_else(|| property.default_value().to_string()),
            )
        }
    }

    fn surface_with(overrides: &[(StyleProperty, &str)]) -> MeasurementSurface {
        let widget = StyledWidget::new(overrides);
        let mut surface = MeasurementSurface::new();
        surface.apply_style(&StyleSnapshot::capture(&widget));
        surface
    }

    fn offset(surface: &mut MeasurementSurface, prefix: &str, marker: &str) -> SurfaceOffset {
        surface.set_content(prefix);
        surface.set_marker(marker);
        let result = surface.marker_offset(&mut MonoMetrics);
        surface.clear();
        result
    }

    #[test]
    fn unwrapped_text_advances_on_one_line() {
        let mut surface = surface_with(&[(StyleProperty::LineHeight, "20px")]);
        let at_start = offset(&mut surface, "", "hello");
        let at_three = offset(&mut surface, "hel", "lo");
        assert_eq!(at_start.top, 0.0);
        assert_eq!(at_start.left, 0.0);
        assert_eq!(at_three.top, 0.0);
        assert_eq!(at_three.left, 3.0 * CHAR_WIDTH);
    }

    #[test]
    fn newline_starts_a_new_visual_line() {
        let mut surface = surface_with(&[(StyleProperty::LineHeight, "20px")]);
        let second_line = offset(&mut surface, "one\n", "two");
        assert_eq!(second_line.top, 20.0);
        assert_eq!(second_line.left, 0.0);
    }

    #[test]
    fn caret_on_the_newline_stays_on_its_line() {
        let mut surface = surface_with(&[(StyleProperty::LineHeight, "20px")]);
        let before_break = offset(&mut surface, "one", "\ntwo");
        assert_eq!(before_break.top, 0.0);
        assert_eq!(before_break.left, 3.0 * CHAR_WIDTH);
    }

    #[test]
    fn long_word_breaks_inside_itself() {
        // 10 chars per 80px line
        let mut surface = surface_with(&[
            (StyleProperty::Width, "80px"),
            (StyleProperty::LineHeight, "20px"),
        ]);
        let after_wrap = offset(&mut surface, "aaaaaaaaaaaa", ".");
        assert_eq!(after_wrap.top, 20.0);
        assert_eq!(after_wrap.left, 2.0 * CHAR_WIDTH);
    }

    #[test]
    fn soft_wrap_happens_at_whitespace() {
        // "hello " hangs its space; "world" no longer fits after it
        let mut surface = surface_with(&[
            (StyleProperty::Width, "64px"),
            (StyleProperty::LineHeight, "20px"),
        ]);
        let at_word = offset(&mut surface, "hello ", "world");
        assert_eq!(at_word.top, 20.0);
        assert_eq!(at_word.left, 0.0);
    }

    #[test]
    fn wrap_decision_sees_past_the_caret() {
        // caret in the middle of "world": the whole word wraps, so the
        // caret lands mid-word on the second line
        let mut surface = surface_with(&[
            (StyleProperty::Width, "64px"),
            (StyleProperty::LineHeight, "20px"),
        ]);
        let mid_word = offset(&mut surface, "hello wor", "ld");
        assert_eq!(mid_word.top, 20.0);
        assert_eq!(mid_word.left, 3.0 * CHAR_WIDTH);
    }

    #[test]
    fn padding_and_indent_shift_the_origin() {
        let mut surface = surface_with(&[
            (StyleProperty::PaddingTop, "4px"),
            (StyleProperty::PaddingLeft, "6px"),
            (StyleProperty::TextIndent, "16px"),
            (StyleProperty::LineHeight, "20px"),
        ]);
        let origin = offset(&mut surface, "", "x");
        assert_eq!(origin.top, 4.0);
        assert_eq!(origin.left, 6.0 + 16.0);
    }

    #[test]
    fn tabs_advance_to_tab_stops() {
        let mut surface = surface_with(&[
            (StyleProperty::TabSize, "4"),
            (StyleProperty::LineHeight, "20px"),
        ]);
        // "a\t" advances to the first 4-column stop (32px)
        let after_tab = offset(&mut surface, "a\t", "b");
        assert_eq!(after_tab.left, 4.0 * CHAR_WIDTH);
    }

    #[test]
    fn letter_and_word_spacing_widen_runs() {
        let mut surface = surface_with(&[
            (StyleProperty::LetterSpacing, "2px"),
            (StyleProperty::WordSpacing, "3px"),
            (StyleProperty::LineHeight, "20px"),
        ]);
        // "a b" = 3 glyphs + 3 * letter-spacing + 1 * word-spacing
        let after = offset(&mut surface, "a b", ".");
        assert_eq!(after.left, 3.0 * CHAR_WIDTH + 3.0 * 2.0 + 3.0);
    }

    #[test]
    fn uppercase_transform_changes_measured_width() {
        let mut surface = surface_with(&[
            (StyleProperty::TextTransform, "uppercase"),
            (StyleProperty::LineHeight, "20px"),
        ]);
        let after = offset(&mut surface, "ab", ".");
        assert_eq!(after.left, 2.0 * 10.0);
    }

    #[test]
    fn centered_lines_shift_by_half_the_slack() {
        let mut surface = surface_with(&[
            (StyleProperty::Width, "80px"),
            (StyleProperty::TextAlign, "center"),
            (StyleProperty::LineHeight, "20px"),
        ]);
        // line "ab." is 24px wide in an 80px box, so content starts at 28px
        let at_start = offset(&mut surface, "", "ab.");
        assert_eq!(at_start.left, (80.0 - 24.0) / 2.0);
    }

    #[test]
    fn clear_resets_text_but_keeps_the_surface() {
        let mut surface = surface_with(&[]);
        surface.set_content("abc");
        surface.set_marker("d");
        assert!(!surface.is_clear());
        surface.clear();
        assert!(surface.is_clear());
    }

    #[test]
    fn shared_surface_is_one_per_thread() {
        let a = shared_surface();
        let b = shared_surface();
        assert!(Rc::ptr_eq(&a, &b));
    }
}
