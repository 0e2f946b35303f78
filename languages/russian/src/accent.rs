use unicode_normalization::UnicodeNormalization;

/// U+0301 COMBINING ACUTE ACCENT, the stress mark in dictionaries and textbooks
pub const STRESS_MARK: char = '\u{0301}';

/// Remove stress marks while keeping letters that decompose, like `й` and `ё`
pub fn strip_stress(text: &str) -> String {
    text.nfd().filter(|c| *c != STRESS_MARK).nfc().collect()
}

/// Cyrillic script: the base block, Supplement, Extended-A to D and the two phonetic letters
pub fn is_cyrillic(c: char) -> bool {
    matches!(
        c,
        '\u{0400}'..='\u{0484}'
            | '\u{0487}'..='\u{052F}'
            | '\u{1C80}'..='\u{1C88}'
            | '\u{1D2B}'
            | '\u{1D78}'
            | '\u{2DE0}'..='\u{2DFF}'
            | '\u{A640}'..='\u{A69F}'
            | '\u{FE2E}'..='\u{FE2F}'
            | '\u{1E030}'..='\u{1E06D}'
            | '\u{1E08F}'
    )
}
