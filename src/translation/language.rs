//! 语言表与语言交换
//!
//! 固定的语言映射表（显示名称 ↔ 翻译接口语言代码），以及源/目标语言交换规则。

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 支持的语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// 自动检测，只能用作源语言
    Auto,
    Chinese,
    English,
    Japanese,
    Korean,
    French,
    German,
    Spanish,
    Russian,
    Indonesian,
}

/// (语言, 接口代码, 中文显示名, 英文名)
const LANGUAGE_TABLE: &[(Language, &str, &str, &str)] = &[
    (Language::Auto, "auto", "auto", "Auto-detect"),
    (Language::Chinese, "zh-CN", "中文", "Chinese"),
    (Language::English, "en", "英语", "English"),
    (Language::Japanese, "ja", "日语", "Japanese"),
    (Language::Korean, "ko", "韩语", "Korean"),
    (Language::French, "fr", "法语", "French"),
    (Language::German, "de", "德语", "German"),
    (Language::Spanish, "es", "西班牙语", "Spanish"),
    (Language::Russian, "ru", "俄语", "Russian"),
    (Language::Indonesian, "id", "印尼语", "Indonesian"),
];

impl Language {
    fn entry(self) -> &'static (Language, &'static str, &'static str, &'static str) {
        LANGUAGE_TABLE
            .iter()
            .find(|(lang, ..)| *lang == self)
            .unwrap_or(&LANGUAGE_TABLE[0])
    }

    /// 翻译接口使用的语言代码
    pub fn code(self) -> &'static str {
        self.entry().1
    }

    /// 界面显示名称
    pub fn display_name(self) -> &'static str {
        self.entry().2
    }

    pub fn english_name(self) -> &'static str {
        self.entry().3
    }

    pub fn is_auto(self) -> bool {
        self == Language::Auto
    }

    /// 按语言代码查找（大小写不敏感，`zh` 视为 `zh-CN`）
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.eq_ignore_ascii_case("zh") {
            return Some(Language::Chinese);
        }
        LANGUAGE_TABLE
            .iter()
            .find(|(_, c, ..)| c.eq_ignore_ascii_case(code))
            .map(|(lang, ..)| *lang)
    }

    /// 按显示名称查找，中英文名称均可
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        LANGUAGE_TABLE
            .iter()
            .find(|(_, _, zh, en)| *zh == name || en.eq_ignore_ascii_case(name))
            .map(|(lang, ..)| *lang)
    }

    /// 代码或名称均可
    pub fn lookup(value: &str) -> Option<Self> {
        Self::from_code(value).or_else(|| Self::from_name(value))
    }

    /// 解析源语言选择，无法识别时回退到自动检测
    pub fn source_or_auto(value: &str) -> Self {
        Self::lookup(value).unwrap_or(Language::Auto)
    }

    /// 解析目标语言选择，无法识别时回退到中文
    pub fn target_or_chinese(value: &str) -> Self {
        match Self::lookup(value) {
            Some(Language::Auto) | None => Language::Chinese,
            Some(lang) => lang,
        }
    }

    /// 源语言下拉框的选项：`auto` 在前，其余按显示名称排序
    pub fn source_choices() -> Vec<Self> {
        let mut choices = vec![Language::Auto];
        choices.extend(Self::target_choices());
        choices
    }

    /// 目标语言下拉框的选项，按显示名称排序
    pub fn target_choices() -> Vec<Self> {
        let mut langs: Vec<Self> = LANGUAGE_TABLE
            .iter()
            .map(|(lang, ..)| *lang)
            .filter(|lang| !lang.is_auto())
            .collect();
        langs.sort_by_key(|lang| lang.display_name());
        langs
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Serialize for Language {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Language::lookup(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unsupported language '{}'", raw)))
    }
}

/// 当前选中的源语言与目标语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: Language,
    pub target: Language,
}

impl LanguagePair {
    pub fn new(source: Language, target: Language) -> Self {
        Self { source, target }
    }

    /// 交换语言
    ///
    /// 源语言不是 `auto` 时正常交换；源语言为 `auto` 时，旧的目标语言成为新的源语言，
    /// 目标语言保持不变（两端会是同一种语言）。这是原有行为，保持不变。
    pub fn swapped(self) -> Self {
        if self.source.is_auto() {
            Self {
                source: self.target,
                target: self.target,
            }
        } else {
            Self {
                source: self.target,
                target: self.source,
            }
        }
    }
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self {
            source: Language::Auto,
            target: Language::Chinese,
        }
    }
}
