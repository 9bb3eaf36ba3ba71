// Style capture for caret measurement.
// The property list is the exact subset of a text widget's resolved style
// that influences text flow and box geometry. Dropping any entry makes the
// measurement surface diverge from the real widget for inputs that
// exercise it (tabs, letter spacing, indent, ...).

use crate::caret::surface::FontSpec;
use crate::caret::widget::TextWidget;

pub const STYLE_PROPERTY_COUNT: usize = 26;

const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// The enumerated style contract replicated onto the measurement surface.
///
/// Order matters only for auditing: `ALL` lists box-model properties first,
/// then typography, then text-flow properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    Direction,
    BoxSizing,
    Width,
    BorderTopWidth,
    BorderRightWidth,
    BorderBottomWidth,
    BorderLeftWidth,
    BorderStyle,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    FontStyle,
    FontVariant,
    FontWeight,
    FontStretch,
    FontSize,
    LineHeight,
    FontFamily,
    TextAlign,
    TextTransform,
    TextIndent,
    TextDecoration,
    LetterSpacing,
    WordSpacing,
    TabSize,
}

impl StyleProperty {
    pub const ALL: [StyleProperty; STYLE_PROPERTY_COUNT] = [
        StyleProperty::Direction,
        StyleProperty::BoxSizing,
        StyleProperty::Width,
        StyleProperty::BorderTopWidth,
        StyleProperty::BorderRightWidth,
        StyleProperty::BorderBottomWidth,
        StyleProperty::BorderLeftWidth,
        StyleProperty::BorderStyle,
        StyleProperty::PaddingTop,
        StyleProperty::PaddingRight,
        StyleProperty::PaddingBottom,
        StyleProperty::PaddingLeft,
        StyleProperty::FontStyle,
        StyleProperty::FontVariant,
        StyleProperty::FontWeight,
        StyleProperty::FontStretch,
        StyleProperty::FontSize,
        StyleProperty::LineHeight,
        StyleProperty::FontFamily,
        StyleProperty::TextAlign,
        StyleProperty::TextTransform,
        StyleProperty::TextIndent,
        StyleProperty::TextDecoration,
        StyleProperty::LetterSpacing,
        StyleProperty::WordSpacing,
        StyleProperty::TabSize,
    ];

    /// CSS-style property name, used by hosts that resolve styles by name.
    pub fn name(self) -> &'static str {
        match self {
            StyleProperty::Direction => "direction",
            StyleProperty::BoxSizing => "box-sizing",
            StyleProperty::Width => "width",
            StyleProperty::BorderTopWidth => "border-top-width",
            StyleProperty::BorderRightWidth => "border-right-width",
            StyleProperty::BorderBottomWidth => "border-bottom-width",
            StyleProperty::BorderLeftWidth => "border-left-width",
            StyleProperty::BorderStyle => "border-style",
            StyleProperty::PaddingTop => "padding-top",
            StyleProperty::PaddingRight => "padding-right",
            StyleProperty::PaddingBottom => "padding-bottom",
            StyleProperty::PaddingLeft => "padding-left",
            StyleProperty::FontStyle => "font-style",
            StyleProperty::FontVariant => "font-variant",
            StyleProperty::FontWeight => "font-weight",
            StyleProperty::FontStretch => "font-stretch",
            StyleProperty::FontSize => "font-size",
            StyleProperty::LineHeight => "line-height",
            StyleProperty::FontFamily => "font-family",
            StyleProperty::TextAlign => "text-align",
            StyleProperty::TextTransform => "text-transform",
            StyleProperty::TextIndent => "text-indent",
            StyleProperty::TextDecoration => "text-decoration",
            StyleProperty::LetterSpacing => "letter-spacing",
            StyleProperty::WordSpacing => "word-spacing",
            StyleProperty::TabSize => "tab-size",
        }
    }

    /// Resolved value assumed when the widget cannot answer (not attached).
    pub fn default_value(self) -> &'static str {
        match self {
            StyleProperty::Direction => "ltr",
            StyleProperty::BoxSizing => "content-box",
            StyleProperty::Width => "auto",
            StyleProperty::BorderTopWidth
            | StyleProperty::BorderRightWidth
            | StyleProperty::BorderBottomWidth
            | StyleProperty::BorderLeftWidth => "0px",
            StyleProperty::BorderStyle => "none",
            StyleProperty::PaddingTop
            | StyleProperty::PaddingRight
            | StyleProperty::PaddingBottom
            | StyleProperty::PaddingLeft => "0px",
            StyleProperty::FontStyle | StyleProperty::FontVariant => "normal",
            StyleProperty::FontWeight => "400",
            StyleProperty::FontStretch => "100%",
            StyleProperty::FontSize => "16px",
            StyleProperty::LineHeight => "normal",
            StyleProperty::FontFamily => "monospace",
            StyleProperty::TextAlign => "start",
            StyleProperty::TextTransform => "none",
            StyleProperty::TextIndent => "0px",
            StyleProperty::TextDecoration => "none",
            StyleProperty::LetterSpacing | StyleProperty::WordSpacing => "normal",
            StyleProperty::TabSize => "8",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Horizontal placement of line content inside the content box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Case mapping applied to text before measuring, mirroring text-transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTransform {
    None,
    Uppercase,
    Lowercase,
    Capitalize,
}

impl TextTransform {
    /// Transform one grapheme. `at_word_start` drives capitalization.
    pub fn apply(self, grapheme: &str, at_word_start: bool) -> String {
        match self {
            TextTransform::None => grapheme.to_string(),
            TextTransform::Uppercase => grapheme.to_uppercase(),
            TextTransform::Lowercase => grapheme.to_lowercase(),
            TextTransform::Capitalize => {
                if at_word_start {
                    grapheme.to_uppercase()
                } else {
                    grapheme.to_string()
                }
            }
        }
    }
}

/// Tab advance unit: a column count multiplies the space advance, a pixel
/// value is used as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TabStop {
    Columns(f64),
    Px(f64),
}

/// An immutable capture of the layout-relevant style of one widget.
///
/// Captured fresh per measurement; a snapshot taken before a resize or
/// theme change no longer describes the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSnapshot {
    values: [String; STYLE_PROPERTY_COUNT],
}

impl StyleSnapshot {
    /// Read the full property set off a live widget.
    ///
    /// Never fails: a widget that cannot answer (not attached yet) yields
    /// the per-property defaults, so callers get approximate geometry
    /// instead of an error.
    pub fn capture(widget: &dyn TextWidget) -> Self {
        let mut values: [String; STYLE_PROPERTY_COUNT] = std::array::from_fn(|_| String::new());
        for property in StyleProperty::ALL {
            values[property.index()] = widget
                .computed_style(property)
                .unwrap_or_else(|| property.default_value().to_string());
        }
        StyleSnapshot { values }
    }

    /// Snapshot made purely of defaults, for surfaces with no widget yet.
    pub fn detached() -> Self {
        let mut values: [String; STYLE_PROPERTY_COUNT] = std::array::from_fn(|_| String::new());
        for property in StyleProperty::ALL {
            values[property.index()] = property.default_value().to_string();
        }
        StyleSnapshot { values }
    }

    /// Raw resolved value for one property.
    pub fn get(&self, property: StyleProperty) -> &str {
        &self.values[property.index()]
    }

    /// Pixel quantity, if the resolved value parses as one.
    pub fn px(&self, property: StyleProperty) -> Option<f64> {
        parse_px(self.get(property))
    }

    pub fn font_size(&self) -> f64 {
        self.px(StyleProperty::FontSize)
            .filter(|v| *v > 0.0)
            .unwrap_or(DEFAULT_FONT_SIZE_PX)
    }

    /// Resolved line height in pixels. Falls back to the font size when the
    /// widget reports a keyword ("normal") rather than a pixel quantity.
    pub fn line_height(&self) -> f64 {
        match self.px(StyleProperty::LineHeight).filter(|v| *v > 0.0) {
            Some(height) => height,
            None => {
                tracing::debug!(
                    value = self.get(StyleProperty::LineHeight),
                    "line-height is not a pixel quantity, using font size"
                );
                self.font_size()
            }
        }
    }

    pub fn border_top_width(&self) -> f64 {
        self.px(StyleProperty::BorderTopWidth).unwrap_or(0.0)
    }

    pub fn border_left_width(&self) -> f64 {
        self.px(StyleProperty::BorderLeftWidth).unwrap_or(0.0)
    }

    pub fn padding_top(&self) -> f64 {
        self.px(StyleProperty::PaddingTop).unwrap_or(0.0)
    }

    pub fn padding_left(&self) -> f64 {
        self.px(StyleProperty::PaddingLeft).unwrap_or(0.0)
    }

    fn padding_right(&self) -> f64 {
        self.px(StyleProperty::PaddingRight).unwrap_or(0.0)
    }

    fn border_right_width(&self) -> f64 {
        self.px(StyleProperty::BorderRightWidth).unwrap_or(0.0)
    }

    /// Width available to text, or None when the widget does not constrain
    /// it (no wrapping happens then).
    pub fn content_width(&self) -> Option<f64> {
        let width = self.px(StyleProperty::Width)?;
        let inner = if self
            .get(StyleProperty::BoxSizing)
            .eq_ignore_ascii_case("border-box")
        {
            width
                - self.border_left_width()
                - self.border_right_width()
                - self.padding_left()
                - self.padding_right()
        } else {
            width
        };
        (inner.is_finite() && inner > 0.0).then_some(inner)
    }

    pub fn letter_spacing(&self) -> f64 {
        self.px(StyleProperty::LetterSpacing).unwrap_or(0.0)
    }

    pub fn word_spacing(&self) -> f64 {
        self.px(StyleProperty::WordSpacing).unwrap_or(0.0)
    }

    pub fn text_indent(&self) -> f64 {
        self.px(StyleProperty::TextIndent).unwrap_or(0.0)
    }

    pub fn tab_stop(&self) -> TabStop {
        let raw = self.get(StyleProperty::TabSize).trim();
        if let Some(px) = parse_px_strict(raw) {
            return TabStop::Px(px);
        }
        match raw.parse::<f64>() {
            Ok(columns) if columns.is_finite() && columns > 0.0 => TabStop::Columns(columns),
            _ => TabStop::Columns(8.0),
        }
    }

    pub fn text_align(&self) -> TextAlign {
        let rtl = self.get(StyleProperty::Direction).eq_ignore_ascii_case("rtl");
        match self.get(StyleProperty::TextAlign).trim() {
            "center" => TextAlign::Center,
            "right" => TextAlign::Right,
            "left" => TextAlign::Left,
            // start/end resolve against the writing direction
            "end" => {
                if rtl {
                    TextAlign::Left
                } else {
                    TextAlign::Right
                }
            }
            _ => {
                if rtl {
                    TextAlign::Right
                } else {
                    TextAlign::Left
                }
            }
        }
    }

    pub fn text_transform(&self) -> TextTransform {
        match self.get(StyleProperty::TextTransform).trim() {
            "uppercase" => TextTransform::Uppercase,
            "lowercase" => TextTransform::Lowercase,
            "capitalize" => TextTransform::Capitalize,
            _ => TextTransform::None,
        }
    }

    /// Font parameters for the metrics backend.
    pub fn font_spec(&self) -> FontSpec {
        let weight = self.get(StyleProperty::FontWeight).trim();
        let bold = weight.eq_ignore_ascii_case("bold")
            || weight.parse::<f64>().is_ok_and(|w| w >= 600.0);
        let style = self.get(StyleProperty::FontStyle);
        let italic = style.contains("italic") || style.contains("oblique");
        FontSpec {
            family: self.get(StyleProperty::FontFamily).to_string(),
            size: self.font_size(),
            bold,
            italic,
        }
    }
}

/// Parse a resolved length like "14px", "14.5px" or "14". Keywords and
/// percentages yield None so callers can fall back.
fn parse_px(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    if number.is_empty() || number.ends_with('%') {
        return None;
    }
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Like `parse_px` but only accepts values that actually carry the unit.
fn parse_px_strict(value: &str) -> Option<f64> {
    let number = value.trim().strip_suffix("px")?;
    number.trim().parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn property_list_is_complete_and_unique() {
        assert_eq!(StyleProperty::ALL.len(), STYLE_PROPERTY_COUNT);
        let names: HashSet<&str> = StyleProperty::ALL.iter().map(|p| p.name()).collect();
        assert_eq!(names.len(), STYLE_PROPERTY_COUNT);
    }

    #[test]
    fn parse_px_accepts_lengths_and_rejects_keywords() {
        assert_eq!(parse_px("14px"), Some(14.0));
        assert_eq!(parse_px(" 14.5px "), Some(14.5));
        assert_eq!(parse_px("14"), Some(14.0));
        assert_eq!(parse_px("normal"), None);
        assert_eq!(parse_px("120%"), None);
        assert_eq!(parse_px(""), None);
    }

    #[test]
    fn detached_snapshot_falls_back_to_font_size() {
        let snapshot = StyleSnapshot::detached();
        // line-height resolves to "normal", which is not a pixel quantity
        assert_eq!(snapshot.get(StyleProperty::LineHeight), "normal");
        assert_eq!(snapshot.line_height(), snapshot.font_size());
        assert!(snapshot.line_height() > 0.0);
    }

    #[test]
    fn content_width_subtracts_border_box_insets() {
        let mut snapshot = StyleSnapshot::detached();
        snapshot.values[StyleProperty::BoxSizing as usize] = "border-box".into();
        snapshot.values[StyleProperty::Width as usize] = "100px".into();
        snapshot.values[StyleProperty::BorderLeftWidth as usize] = "2px".into();
        snapshot.values[StyleProperty::BorderRightWidth as usize] = "2px".into();
        snapshot.values[StyleProperty::PaddingLeft as usize] = "5px".into();
        snapshot.values[StyleProperty::PaddingRight as usize] = "5px".into();
        assert_eq!(snapshot.content_width(), Some(86.0));
    }

    #[test]
    fn content_width_is_none_without_a_resolved_width() {
        let snapshot = StyleSnapshot::detached();
        assert_eq!(snapshot.get(StyleProperty::Width), "auto");
        assert_eq!(snapshot.content_width(), None);
    }

    #[test]
    fn tab_stop_parses_columns_and_lengths() {
        let mut snapshot = StyleSnapshot::detached();
        assert_eq!(snapshot.tab_stop(), TabStop::Columns(8.0));
        snapshot.values[StyleProperty::TabSize as usize] = "4".into();
        assert_eq!(snapshot.tab_stop(), TabStop::Columns(4.0));
        snapshot.values[StyleProperty::TabSize as usize] = "32px".into();
        assert_eq!(snapshot.tab_stop(), TabStop::Px(32.0));
        snapshot.values[StyleProperty::TabSize as usize] = "bogus".into();
        assert_eq!(snapshot.tab_stop(), TabStop::Columns(8.0));
    }

    #[test]
    fn start_alignment_follows_direction() {
        let mut snapshot = StyleSnapshot::detached();
        assert_eq!(snapshot.text_align(), TextAlign::Left);
        snapshot.values[StyleProperty::Direction as usize] = "rtl".into();
        assert_eq!(snapshot.text_align(), TextAlign::Right);
    }

    #[test]
    fn bold_detected_from_numeric_weight() {
        let mut snapshot = StyleSnapshot::detached();
        assert!(!snapshot.font_spec().bold);
        snapshot.values[StyleProperty::FontWeight as usize] = "700".into();
        assert!(snapshot.font_spec().bold);
        snapshot.values[StyleProperty::FontWeight as usize] = "bold".into();
        assert!(snapshot.font_spec().bold);
    }
}
