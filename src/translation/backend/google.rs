//! Google 翻译网页接口后端
//!
//! 使用免费的 `translate_a/single` 接口（`client=gtx`）。响应是嵌套 JSON 数组，
//! 第一个元素是译文分段列表，每个分段的第一个元素是译文文本。

use std::time::Duration;

use serde_json::Value;
use url::Url;

use super::TranslationBackend;
use crate::translation::config::TranslatorConfig;
use crate::translation::error::{helpers, TranslationResult};

/// Google 翻译后端
#[derive(Debug, Clone)]
pub struct GoogleBackend {
    client: reqwest::Client,
    api_url: Url,
}

impl GoogleBackend {
    pub fn new(api_url: &str, timeout: Duration) -> TranslationResult<Self> {
        let api_url = Url::parse(api_url)
            .map_err(|e| helpers::config_error(format!("API URL 无效 '{}': {}", api_url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0")
            .build()?;

        Ok(Self { client, api_url })
    }

    pub fn from_config(config: &TranslatorConfig) -> TranslationResult<Self> {
        Self::new(&config.api_url, config.request_timeout())
    }

    /// 构造请求地址
    pub fn request_url(&self, text: &str, source: &str, target: &str) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("client", "gtx")
            .append_pair("sl", source)
            .append_pair("tl", target)
            .append_pair("dt", "t")
            .append_pair("q", text);
        url
    }

    async fn fetch(&self, text: &str, source: &str, target: &str) -> TranslationResult<String> {
        let url = self.request_url(text, source, target);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(helpers::network_error(format!("翻译接口返回错误: {}", status)));
        }

        let json = response.json::<Value>().await?;
        parse_response(&json)
    }
}

impl TranslationBackend for GoogleBackend {
    async fn translate(&self, text: &str, source: &str, target: &str) -> TranslationResult<String> {
        // 纯空白片段（例如单独的换行）原样保留
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        tracing::trace!(
            "请求翻译接口: {} 字符, {} -> {}",
            text.chars().count(),
            source,
            target
        );
        self.fetch(text, source, target).await
    }
}

/// 解析接口响应，拼接所有译文分段
pub fn parse_response(json: &Value) -> TranslationResult<String> {
    let segments = json
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| helpers::parse_error("响应中缺少译文分段"))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        return Err(helpers::parse_error("译文为空"));
    }

    Ok(translated)
}
