pub mod lemmatizer;
pub mod processor;

pub use lemmatizer::EnglishLemmatizer;
pub use processor::EnglishNormalizer;
