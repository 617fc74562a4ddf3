//! # Text Processing Module
//!
//! Input normalization for incoming chat text and for identifiers read from disk.
//!
//! ## Features
//!
//! - Glyph canonicalization: Arabic Yeh/Kaf variants produced by some keyboards are
//!   folded into their Persian forms so that typed names match catalog keys
//! - Prefix splitting of button labels such as `"City Tehran"` into `("City", "Tehran")`

use log::trace;

/// Glyph variants and the canonical glyph each one folds into
pub const GLYPH_FOLDS: &[(char, char)] = &[
    ('\u{064A}', '\u{06CC}'), // ARABIC LETTER YEH -> FARSI YEH
    ('\u{0643}', '\u{06A9}'), // ARABIC LETTER KAF -> KEHEH
];

fn fold_glyph(c: char) -> char {
    GLYPH_FOLDS
        .iter()
        .find(|(variant, _)| *variant == c)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(c)
}

/// Replace visually identical glyph variants with their canonical form.
///
/// No canonical glyph is itself a variant, so applying this twice is the same
/// as applying it once.
///
/// # Examples
///
/// ```rust
/// use shora_bot::text_processing::normalize;
///
/// assert_eq!(normalize("\u{0643}\u{064A}"), "\u{06A9}\u{06CC}");
/// ```
pub fn normalize(text: &str) -> String {
    let normalized: String = text.chars().map(fold_glyph).collect();
    if normalized != text {
        trace!("Normalized glyph variants in {:?}", text);
    }
    normalized
}

/// Split text into its first whitespace-separated token and the rest.
///
/// The remainder is rejoined with single spaces so multi-word identifiers survive.
/// Returns `None` for text without any token.
pub fn split_prefix(text: &str) -> Option<(&str, String)> {
    let mut tokens = text.split_whitespace();
    let prefix = tokens.next()?;
    let remainder = tokens.collect::<Vec<_>>().join(" ");
    Some((prefix, remainder))
}
