// Test doubles for the caret estimator: a scriptable textarea-like widget
// and fixed-width text metrics. Not every test target uses every helper.
#![allow(dead_code)]

use std::collections::HashMap;

use inkpad::caret::{FontSpec, StyleProperty, TextMetrics, TextWidget};

pub const CHAR_WIDTH: f64 = 8.0;
pub const LINE_HEIGHT: f64 = 20.0;

/// Every character advances the same width, so expected coordinates can be
/// computed by hand.
pub struct MonoMetrics;

impl TextMetrics for MonoMetrics {
    fn advance_width(&mut self, text: &str, _font: &FontSpec) -> f64 {
        text.chars().count() as f64 * CHAR_WIDTH
    }
}

/// A textarea-shaped widget exposing only logical state, like the real
/// host widget does.
pub struct MockTextarea {
    pub content: String,
    pub selection_start: usize,
    pub scroll_top: f64,
    pub scroll_left: f64,
    pub client_height: f64,
    pub attached: bool,
    styles: HashMap<StyleProperty, String>,
}

impl MockTextarea {
    pub fn new(content: &str) -> Self {
        let mut styles = HashMap::new();
        styles.insert(StyleProperty::LineHeight, format!("{LINE_HEIGHT}px"));
        MockTextarea {
            content: content.to_string(),
            selection_start: 0,
            scroll_top: 0.0,
            scroll_left: 0.0,
            client_height: 100.0,
            attached: true,
            styles,
        }
    }

    /// Constrain the content width so text wraps.
    pub fn with_width(mut self, px: f64) -> Self {
        self.styles
            .insert(StyleProperty::Width, format!("{px}px"));
        self
    }

    pub fn with_style(mut self, property: StyleProperty, value: &str) -> Self {
        self.styles.insert(property, value.to_string());
        self
    }

    pub fn detached(mut self) -> Self {
        self.attached = false;
        self
    }
}

impl TextWidget for MockTextarea {
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
        self.scroll_left
    }

    fn client_height(&self) -> f64 {
        self.client_height
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn computed_style(&self, property: StyleProperty) -> Option<String> {
        if !self.attached {
            return None;
        }
        Some(
            self.styles
                .get(&property)
                .cloned()
                .unwrap_or_else(|| property.default_value().to_string()),
        )
    }
}
