use fltk::{prelude::*, *};

use crate::theme::{rgb, Theme};

fn fl_color(color: u32) -> enums::Color {
    let (r, g, b) = rgb(color);
    enums::Color::from_rgb(r, g, b)
}

const BUTTON_WIDTH: i32 = 60;
const BUTTON_GAP: i32 = 4;

/// Bottom status bar: file action buttons on the left, word/char counts in
/// the middle, preview toggle on the right.
pub struct StatusBar {
    background: frame::Frame,
    new_button: button::Button,
    open_button: button::Button,
    save_button: button::Button,
    counts: frame::Frame,
    preview_toggle: button::Button,
}

impl StatusBar {
    pub fn new(x: i32, y: i32, w: i32, h: i32, theme: &Theme) -> Self {
        let mut background = frame::Frame::new(x, y, w, h, None);
        background.set_frame(enums::FrameType::FlatBox);

        let mut new_button = button::Button::new(x + BUTTON_GAP, y + 2, BUTTON_WIDTH, h - 4, None);
        new_button.set_label("New");
        let mut open_button = button::Button::new(
            x + BUTTON_GAP * 2 + BUTTON_WIDTH,
            y + 2,
            BUTTON_WIDTH,
            h - 4,
            None,
        );
        open_button.set_label("Open");
        let mut save_button = button::Button::new(
            x + BUTTON_GAP * 3 + BUTTON_WIDTH * 2,
            y + 2,
            BUTTON_WIDTH,
            h - 4,
            None,
        );
        save_button.set_label("Save");

        let buttons_end = x + BUTTON_GAP * 4 + BUTTON_WIDTH * 3;
        let toggle_x = x + w - BUTTON_WIDTH - BUTTON_GAP;
        let mut counts = frame::Frame::new(buttons_end, y, toggle_x - buttons_end, h, None);
        counts.set_frame(enums::FrameType::FlatBox);
        counts.set_align(enums::Align::Right | enums::Align::Inside);
        counts.set_label("0 words · 0 chars");

        let mut preview_toggle = button::Button::new(toggle_x, y + 2, BUTTON_WIDTH, h - 4, None);
        preview_toggle.set_label("Preview");

        let mut bar = StatusBar {
            background,
            new_button,
            open_button,
            save_button,
            counts,
            preview_toggle,
        };
        bar.apply_theme(theme);
        bar
    }

    pub fn apply_theme(&mut self, theme: &Theme) {
        let bg = fl_color(theme.status_background);
        let text = fl_color(theme.status_text);
        self.background.set_color(bg);
        self.counts.set_color(bg);
        self.counts.set_label_color(text);
        for button in [
            &mut self.new_button,
            &mut self.open_button,
            &mut self.save_button,
            &mut self.preview_toggle,
        ] {
            button.set_frame(enums::FrameType::FlatBox);
            button.set_color(fl_color(theme.status_hover));
            button.set_label_color(text);
            button.set_label_size(app::font_size() - 1);
        }
        self.counts.set_label_size(app::font_size() - 1);
        self.background.redraw();
    }

    /// Update the "N words · M chars" display.
    pub fn set_counts_label(&mut self, label: &str) {
        self.counts.set_label(label);
    }

    /// Flip the toggle's label between Preview and Edit.
    pub fn set_preview_active(&mut self, active: bool) {
        self.preview_toggle
            .set_label(if active { "Edit" } else { "Preview" });
    }

    pub fn on_new<F: FnMut() + 'static>(&mut self, mut cb: F) {
        self.new_button.set_callback(move |_| cb());
    }

    pub fn on_open<F: FnMut() + 'static>(&mut self, mut cb: F) {
        self.open_button.set_callback(move |_| cb());
    }

    pub fn on_save<F: FnMut() + 'static>(&mut self, mut cb: F) {
        self.save_button.set_callback(move |_| cb());
    }

    pub fn on_toggle_preview<F: FnMut() + 'static>(&mut self, mut cb: F) {
        self.preview_toggle.set_callback(move |_| cb());
    }

    pub fn resize(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.background.resize(x, y, w, h);
        self.new_button
            .resize(x + BUTTON_GAP, y + 2, BUTTON_WIDTH, h - 4);
        self.open_button.resize(
            x + BUTTON_GAP * 2 + BUTTON_WIDTH,
            y + 2,
            BUTTON_WIDTH,
            h - 4,
        );
        self.save_button.resize(
            x + BUTTON_GAP * 3 + BUTTON_WIDTH * 2,
            y + 2,
            BUTTON_WIDTH,
            h - 4,
        );
        let buttons_end = x + BUTTON_GAP * 4 + BUTTON_WIDTH * 3;
        let toggle_x = x + w - BUTTON_WIDTH - BUTTON_GAP;
        self.counts.resize(buttons_end, y, toggle_x - buttons_end, h);
        self.preview_toggle.resize(toggle_x, y + 2, BUTTON_WIDTH, h - 4);
    }

    pub fn height(&self) -> i32 {
        self.background.height()
    }
}
