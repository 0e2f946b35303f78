use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Languages a session can search in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Russian,
}

impl Language {
    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Russian => "ru",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => f.write_str("english"),
            Language::Russian => f.write_str("russian"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "eng" | "english" => Ok(Language::English),
            "ru" | "rus" | "russian" => Ok(Language::Russian),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

/// One user submission after normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    raw_input: String,
    canonical_key: String,
    language: Language,
}

impl Query {
    pub fn new(raw_input: impl Into<String>, canonical_key: impl Into<String>, language: Language) -> Self {
        Self {
            raw_input: raw_input.into(),
            canonical_key: canonical_key.into(),
            language,
        }
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    /// Key used for cache lookups and provider queries
    pub fn canonical_key(&self) -> &str {
        &self.canonical_key
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

/// Ordered, non-empty list of whitespace-normalized definitions.
///
/// Entries that are blank after collapsing whitespace are dropped on
/// construction; a list with nothing left is never built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct DefinitionList(Vec<String>);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("definition list has no non-blank entries")]
pub struct EmptyDefinitions;

impl DefinitionList {
    /// Build from raw provider strings, `None` when nothing survives
    pub fn from_raw<I, S>(items: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let definitions: Vec<String> = items
            .into_iter()
            .map(|s| collapse_whitespace(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();

        if definitions.is_empty() {
            None
        } else {
            Some(Self(definitions))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl TryFrom<Vec<String>> for DefinitionList {
    type Error = EmptyDefinitions;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        DefinitionList::from_raw(value).ok_or(EmptyDefinitions)
    }
}

impl From<DefinitionList> for Vec<String> {
    fn from(value: DefinitionList) -> Self {
        value.0
    }
}

impl<'a> IntoIterator for &'a DefinitionList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Collapse every run of whitespace into one space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Identity of one issued search, allocated in increasing order by the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchId(pub u64);

impl SearchId {
    pub fn next(self) -> Self {
        SearchId(self.0 + 1)
    }
}

impl fmt::Display for SearchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Optional cap on how many merged definitions a search keeps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultCap {
    #[default]
    Unbounded,
    /// Keep at most N definitions from each provider
    PerProvider(usize),
    /// Keep at most N definitions overall, in priority order
    Total(usize),
}
