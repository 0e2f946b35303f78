use serde::{Deserialize, Serialize};

fn default_stress_service_url() -> String {
    "http://localhost:8790/stress".to_string()
}

/// Optional remote stress-mark annotation used before accent stripping
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RussianConfig {
    #[serde(default)]
    pub stress_service_enabled: bool,
    #[serde(default = "default_stress_service_url")]
    pub stress_service_url: String,
}

impl Default for RussianConfig {
    fn default() -> Self {
        Self {
            stress_service_enabled: false,
            stress_service_url: default_stress_service_url(),
        }
    }
}
