use unicode_normalization::UnicodeNormalization;

use crate::types::collapse_whitespace;

pub trait Preprocessor {
    // Compatibility-folds full-width and ligature forms typed from mixed layouts
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        let text: String = text.nfkc().collect();

        collapse_whitespace(&text).to_lowercase()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}

/// Canonical composition only, for scripts where NFKC would be too aggressive
pub struct ComposingPreprocessor;
impl Preprocessor for ComposingPreprocessor {
    fn process(&self, text: &str) -> String {
        let text: String = text.trim().nfc().collect();
        collapse_whitespace(&text).to_lowercase()
    }
}
