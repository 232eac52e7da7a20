//! 日志初始化

use tracing_subscriber::EnvFilter;

use crate::env::{self, EnvVar};

/// 安装全局 fmt 订阅器
///
/// `level` 为空时依次使用 `RUST_LOG`、`LIVE_TRANSLATE_LOG_LEVEL`、`warn`。
/// 重复调用不会报错，已安装的订阅器保持不变。
pub fn init(level: Option<&str>, no_color: bool) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => match env::core::LogLevel::get_set() {
                Some(Ok(level)) => EnvFilter::new(level),
                _ => EnvFilter::new("warn"),
            },
        },
    };

    let ansi = !no_color && !env::core::NoColor::get_or_default(false) && atty::is(atty::Stream::Stderr);

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(std::io::stderr)
        .try_init();

    if result.is_err() {
        tracing::trace!("日志订阅器已安装");
    }
}
