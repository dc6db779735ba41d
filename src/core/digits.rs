//! Full-width digit normalization
//!
//! Japanese input methods commonly produce full-width numerals (`０`..`９`).
//! Quantities are normalized to ASCII before they are checked or parsed.

const FULLWIDTH_ZERO: char = '\u{FF10}';
const FULLWIDTH_NINE: char = '\u{FF19}';

/// Replace every full-width decimal digit with its ASCII equivalent
///
/// All other characters, including full-width letters and other Unicode
/// digit forms, pass through unchanged.
pub fn normalize_digits(s: &str) -> String {
    s.chars().map(to_ascii_digit).collect()
}

fn to_ascii_digit(ch: char) -> char {
    if (FULLWIDTH_ZERO..=FULLWIDTH_NINE).contains(&ch) {
        let value = ch as u32 - FULLWIDTH_ZERO as u32;
        // value is 0..=9, so this is always an ASCII digit
        char::from(b'0' + value as u8)
    } else {
        ch
    }
}
