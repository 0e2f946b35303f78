use serde::{Deserialize, Serialize};
use tuidict_types::{Language, ResultCap};

fn default_timeout_ms() -> u64 {
    8000
}

fn default_dict_server() -> String {
    "dict.org:2628".to_string()
}

fn default_free_dictionary_url() -> String {
    "https://api.dictionaryapi.dev/api/v2/entries/en".to_string()
}

fn default_urban_url() -> String {
    "https://api.urbandictionary.com/v0/define".to_string()
}

fn default_english_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::FreeDictionary,
        SourceConfig::Dict {
            database: "wn".to_string(),
        },
        SourceConfig::Urban,
    ]
}

fn default_russian_sources() -> Vec<SourceConfig> {
    vec![SourceConfig::Dict {
        database: "fd-rus-eng".to_string(),
    }]
}

/// One configured definition source. List order is display priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceConfig {
    FreeDictionary,
    Urban,
    /// DICT protocol server database, `!` searches all of them
    Dict { database: String },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DictionaryConfig {
    #[serde(default = "default_english_sources")]
    pub english: Vec<SourceConfig>,
    #[serde(default = "default_russian_sources")]
    pub russian: Vec<SourceConfig>,
    /// Budget for each individual provider call
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub result_cap: ResultCap,
    #[serde(default = "default_dict_server")]
    pub dict_server: String,
    #[serde(default = "default_free_dictionary_url")]
    pub free_dictionary_url: String,
    #[serde(default = "default_urban_url")]
    pub urban_url: String,
}

impl DictionaryConfig {
    pub fn sources_for(&self, language: Language) -> &[SourceConfig] {
        match language {
            Language::English => &self.english,
            Language::Russian => &self.russian,
        }
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            english: default_english_sources(),
            russian: default_russian_sources(),
            timeout_ms: default_timeout_ms(),
            result_cap: ResultCap::default(),
            dict_server: default_dict_server(),
            free_dictionary_url: default_free_dictionary_url(),
            urban_url: default_urban_url(),
        }
    }
}
