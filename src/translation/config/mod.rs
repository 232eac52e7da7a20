//! 翻译配置管理模块
//!
//! 提供简化的配置管理，支持环境变量、配置文件和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, TranslatorConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 输入限制
    pub const DEFAULT_MAX_CHARS: usize = 50000;
    /// 翻译接口单次请求的安全字符数，小于接口自身的 5000 字符上限
    pub const API_CHUNK_SIZE: usize = 4500;

    // 重试策略
    pub const DEFAULT_MAX_RETRY_ATTEMPTS: usize = 3;
    pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

    // 自动翻译延迟
    pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(500);
    pub const MIN_DEBOUNCE_DELAY: Duration = Duration::from_millis(100);
    pub const MAX_DEBOUNCE_DELAY: Duration = Duration::from_millis(2000);

    // 默认API设置
    pub const DEFAULT_API_URL: &str = "https://translate.googleapis.com/translate_a/single";
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "live-translate.toml",
        ".live-translate.toml",
        "live-translate.json",
        "~/.config/live-translate/config.toml",
        "/etc/live-translate/config.toml",
    ];
}

/// 便利函数
pub fn config_file_exists() -> bool {
    constants::CONFIG_PATHS
        .iter()
        .any(|path| std::path::Path::new(shellexpand::tilde(path).as_ref()).exists())
}

/// 加载配置，失败时回退到默认配置
pub fn load_translator_config() -> TranslatorConfig {
    match ConfigManager::new() {
        Ok(manager) => manager.into_config(),
        Err(e) => {
            tracing::warn!("配置加载失败，使用默认配置: {}", e);
            TranslatorConfig::default()
        }
    }
}
