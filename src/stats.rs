// Word and character counts for the status bar.

use unicode_segmentation::UnicodeSegmentation;

/// Unicode-aware word count (UAX #29 word boundaries).
pub fn count_words(text: &str) -> usize {
    text.unicode_words().count()
}

/// Character count in scalar values, not bytes.
pub fn count_chars(text: &str) -> usize {
    text.chars().count()
}
