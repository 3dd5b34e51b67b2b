use serde::{Deserialize, Serialize};

use crate::service::matcher::MANUAL_ITEM_MATCH_THRESHOLD;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// 自动关联阈值, 低于该分数的匹配需人工确认
    pub auto_link_threshold: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            matching: MatchingConfig {
                auto_link_threshold: MANUAL_ITEM_MATCH_THRESHOLD,
            },
        }
    }
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            matching: MatchingConfig {
                auto_link_threshold: std::env::var("MATCH_THRESHOLD")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(MANUAL_ITEM_MATCH_THRESHOLD),
            },
        }
    }
}
