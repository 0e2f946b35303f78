use std::env;

use serde::{Deserialize, Serialize};

fn default_user_agent() -> String {
    env::var("TUIDICT_USER_AGENT")
        .unwrap_or_else(|_| format!("tuidict/{}", env!("CARGO_PKG_VERSION")))
}

fn default_connect_timeout_ms() -> u64 {
    3000
}

/// Settings shared by every outbound provider connection
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}
