//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::language::{Language, LanguagePair};

/// 翻译配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslatorConfig {
    // 语言配置
    pub source_lang: String,
    pub target_lang: String,
    pub api_url: String,

    // 输入与分片
    pub max_chars: usize,
    pub api_chunk_size: usize,

    // 自动翻译
    pub debounce_delay_secs: f64,

    // 重试与超时
    pub max_retry_attempts: usize,
    pub retry_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            source_lang: Language::Auto.code().to_string(),
            target_lang: Language::Chinese.code().to_string(),
            api_url: constants::DEFAULT_API_URL.to_string(),

            max_chars: constants::DEFAULT_MAX_CHARS,
            api_chunk_size: constants::API_CHUNK_SIZE,

            debounce_delay_secs: constants::DEFAULT_DEBOUNCE_DELAY.as_secs_f64(),

            max_retry_attempts: constants::DEFAULT_MAX_RETRY_ATTEMPTS,
            retry_delay_ms: constants::DEFAULT_RETRY_DELAY.as_millis() as u64,
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

impl TranslatorConfig {
    /// 创建带指定语言的默认配置
    pub fn default_with_lang(target_lang: &str, source_lang: Option<&str>) -> Self {
        let mut config = Self::default();
        config.target_lang = target_lang.to_string();
        if let Some(source) = source_lang {
            config.source_lang = source.to_string();
        }
        config
    }

    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if self.max_chars == 0 {
            return Err(TranslationError::ConfigError("最大字符数不能为0".to_string()));
        }

        if self.api_chunk_size == 0 {
            return Err(TranslationError::ConfigError("片段大小不能为0".to_string()));
        }

        if self.api_chunk_size > self.max_chars {
            return Err(TranslationError::ConfigError(format!(
                "片段大小 {} 不能超过最大字符数 {}",
                self.api_chunk_size, self.max_chars
            )));
        }

        if self.max_retry_attempts == 0 {
            return Err(TranslationError::ConfigError("最大尝试次数不能为0".to_string()));
        }

        let min = constants::MIN_DEBOUNCE_DELAY.as_secs_f64();
        let max = constants::MAX_DEBOUNCE_DELAY.as_secs_f64();
        if !(min..=max).contains(&self.debounce_delay_secs) {
            return Err(TranslationError::ConfigError(format!(
                "自动翻译延迟必须在 {:.1} 到 {:.1} 秒之间",
                min, max
            )));
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(TranslationError::ConfigError(format!(
                "API URL 无效: {}",
                self.api_url
            )));
        }

        self.languages().map(|_| ())
    }

    /// 解析配置中的语言代码
    pub fn languages(&self) -> TranslationResult<LanguagePair> {
        let source = Language::lookup(&self.source_lang).ok_or_else(|| {
            TranslationError::ConfigError(format!("不支持的源语言: {}", self.source_lang))
        })?;
        let target = match Language::lookup(&self.target_lang) {
            Some(Language::Auto) => {
                return Err(TranslationError::ConfigError(
                    "目标语言不能为 auto".to_string(),
                ))
            }
            Some(lang) => lang,
            None => {
                return Err(TranslationError::ConfigError(format!(
                    "不支持的目标语言: {}",
                    self.target_lang
                )))
            }
        };
        Ok(LanguagePair::new(source, target))
    }

    /// 应用环境变量覆盖
    ///
    /// 只覆盖显式设置的变量；无效的值记录警告后忽略。
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{translation, EnvVar};

        fn take<T>(name: &str, value: Option<crate::env::EnvResult<T>>) -> Option<T> {
            match value {
                Some(Ok(v)) => Some(v),
                Some(Err(e)) => {
                    tracing::warn!("忽略无效的环境变量 {}: {}", name, e);
                    None
                }
                None => None,
            }
        }

        if let Some(source) = take(translation::SourceLang::NAME, translation::SourceLang::get_set()) {
            self.source_lang = source;
        }

        if let Some(target) = take(translation::TargetLang::NAME, translation::TargetLang::get_set()) {
            self.target_lang = target;
        }

        if let Some(api_url) = take(translation::ApiUrl::NAME, translation::ApiUrl::get_set()) {
            tracing::info!("环境变量覆盖 API URL: {}", api_url);
            self.api_url = api_url;
        }

        if let Some(max_chars) = take(translation::MaxChars::NAME, translation::MaxChars::get_set()) {
            self.max_chars = max_chars;
        }

        if let Some(chunk) = take(translation::ChunkSize::NAME, translation::ChunkSize::get_set()) {
            self.api_chunk_size = chunk;
        }

        if let Some(delay) = take(
            translation::DebounceDelay::NAME,
            translation::DebounceDelay::get_set(),
        ) {
            self.debounce_delay_secs = delay.as_secs_f64();
        }

        if let Some(retries) = take(translation::MaxRetries::NAME, translation::MaxRetries::get_set()) {
            self.max_retry_attempts = retries;
        }

        if let Some(delay) = take(translation::RetryDelay::NAME, translation::RetryDelay::get_set()) {
            self.retry_delay_ms = delay.as_millis() as u64;
        }
    }

    /// 转换为Duration类型
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_secs_f64(self.debounce_delay_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 简化的配置管理器
pub struct ConfigManager {
    config: TranslatorConfig,
}

impl ConfigManager {
    /// 创建新的配置管理器
    pub fn new() -> TranslationResult<Self> {
        let mut config = Self::load_config()?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(Self { config })
    }

    /// 从指定文件创建（不查找默认路径，仍然应用环境变量覆盖）
    pub fn from_file(path: &Path) -> TranslationResult<Self> {
        let mut config = Self::load_from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(Self { config })
    }

    /// 获取配置
    pub fn get_config(&self) -> &TranslatorConfig {
        &self.config
    }

    pub fn into_config(self) -> TranslatorConfig {
        self.config
    }

    /// 从默认路径加载配置
    fn load_config() -> TranslationResult<TranslatorConfig> {
        // 首先尝试加载 .env 文件
        Self::load_dotenv();

        // 查找配置文件
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            let candidate = Path::new(expanded_path.as_ref());
            if candidate.exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(candidate);
            }
        }

        tracing::info!("未找到配置文件，使用默认配置");
        Ok(TranslatorConfig::default())
    }

    /// 从指定文件加载配置，格式由扩展名决定（TOML 或 JSON）
    pub fn load_from_file(path: &Path) -> TranslationResult<TranslatorConfig> {
        if !path.exists() {
            return Err(TranslationError::ConfigError(format!(
                "配置文件不存在: {}",
                path.display()
            )));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;

        settings
            .try_deserialize::<TranslatorConfig>()
            .map_err(|e| TranslationError::ConfigError(format!("解析配置失败: {}", e)))
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &Path) -> TranslationResult<()> {
        let config = TranslatorConfig::default();
        let content = toml::to_string_pretty(&config)?;

        std::fs::write(path, content)
            .map_err(|e| TranslationError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = TranslatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_chars, 50000);
        assert_eq!(config.api_chunk_size, 4500);
        assert_eq!(config.debounce_delay(), Duration::from_millis(500));
        assert_eq!(config.retry_delay(), Duration::from_secs(2));
        assert_eq!(
            config.languages().unwrap(),
            LanguagePair::new(Language::Auto, Language::Chinese)
        );
    }

    #[test]
    fn test_validation_failures() {
        let mut config = TranslatorConfig::default();
        config.api_chunk_size = 0;
        assert!(config.validate().is_err());

        let mut config = TranslatorConfig::default();
        config.api_chunk_size = config.max_chars + 1;
        assert!(config.validate().is_err());

        let mut config = TranslatorConfig::default();
        config.debounce_delay_secs = 5.0;
        assert!(config.validate().is_err());

        let mut config = TranslatorConfig::default();
        config.max_retry_attempts = 0;
        assert!(config.validate().is_err());

        let config = TranslatorConfig::default_with_lang("auto", None);
        assert!(config.validate().is_err());

        let config = TranslatorConfig::default_with_lang("en", Some("xx"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "target_lang = \"ja\"").unwrap();
        writeln!(file, "api_chunk_size = 1000").unwrap();

        let config = ConfigManager::load_from_file(file.path()).unwrap();
        assert_eq!(config.target_lang, "ja");
        assert_eq!(config.api_chunk_size, 1000);
        // 未指定的字段使用默认值
        assert_eq!(config.max_chars, 50000);
        assert_eq!(config.source_lang, "auto");
    }

    #[test]
    fn test_generate_example_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("example.toml");
        ConfigManager::generate_example_config(&path).unwrap();

        let loaded = ConfigManager::load_from_file(&path).unwrap();
        assert_eq!(loaded, TranslatorConfig::default());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = ConfigManager::load_from_file(Path::new("/nonexistent/live.toml")).unwrap_err();
        assert!(matches!(err, TranslationError::ConfigError(_)));
    }
}
