// Editor color schemes. Dark is the default: host theme detection is
// unreliable on Linux desktops, so the choice is explicit via CLI flag or
// the persisted state.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    Light,
    Dark,
}

/// Colors are RGBA words, 0xRRGGBBAA.
pub struct Theme {
    pub kind: ThemeKind,

    pub background_color: u32,
    pub text_color: u32,
    pub caret_color: u32,
    pub selection_color: u32,

    pub status_background: u32,
    pub status_text: u32,
    pub status_hover: u32,

    pub padding_vertical: i32,
    pub padding_horizontal: i32,

    pub font_size: u8,
    pub line_height: i32,
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            kind: ThemeKind::Dark,
            background_color: 0x1E1E1EFF, // Near-black editor background
            text_color: 0xD8D8D8FF,       // Soft white text
            caret_color: 0x7FD4FFFF,      // Light blue caret
            selection_color: 0x264F78FF,  // Muted blue selection
            status_background: 0x2A2A2AFF,
            status_text: 0xBBBBBBFF,
            status_hover: 0x3A3A3AFF,
            padding_vertical: 8,
            padding_horizontal: 12,
            font_size: 14,
            line_height: 20,
        }
    }

    pub fn light() -> Self {
        Theme {
            kind: ThemeKind::Light,
            background_color: 0xFFFFF8FF, // Off-white editor background
            text_color: 0x1A1A1AFF,
            caret_color: 0x0055CCFF, // Blue caret
            selection_color: 0xB4D5FEFF,
            status_background: 0xE8E8E0FF,
            status_text: 0x333333FF,
            status_hover: 0xD8D8D0FF,
            padding_vertical: 8,
            padding_horizontal: 12,
            font_size: 14,
            line_height: 20,
        }
    }

    pub fn for_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Light => Theme::light(),
            ThemeKind::Dark => Theme::dark(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::dark()
    }
}

/// Split an RGBA word into its color channels.
pub fn rgb(color: u32) -> (u8, u8, u8) {
    (
        ((color >> 24) & 0xFF) as u8,
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
    )
}
