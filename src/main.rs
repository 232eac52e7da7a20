//! 命令行入口

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

use live_translate::env::generate_env_docs;
use live_translate::logging;
use live_translate::translation::core::{Dispatcher, RunStatus, TranslationRequest};
use live_translate::translation::debounce::{clamp_delay, normalize_input};
use live_translate::translation::error::helpers;
use live_translate::translation::{
    ConfigManager, GoogleBackend, Language, SessionStatus, TranslationError, TranslationEvent,
    TranslationResult, TranslationSession, TranslatorConfig,
};

/// 边输入边翻译
#[derive(Parser, Debug)]
#[command(name = "live-translate", version, about)]
struct Cli {
    /// 源语言（代码或名称，默认 auto）
    #[arg(short, long, global = true)]
    source: Option<String>,

    /// 目标语言（代码或名称）
    #[arg(short, long, global = true)]
    target: Option<String>,

    /// 自动翻译延迟（秒，0.1 到 2.0）
    #[arg(long, global = true)]
    delay: Option<f64>,

    /// 最大字符数
    #[arg(long, global = true)]
    max_chars: Option<usize>,

    /// 配置文件路径
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 日志级别
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// 禁用颜色输出
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 翻译文件或标准输入的全部内容
    Translate {
        /// 输入文件，省略时读取标准输入
        file: Option<PathBuf>,
    },
    /// 实时翻译：每行输入替换当前文本，支持 :swap :clear :cancel :now :copy :quit
    Watch,
    /// 配置文件
    Config {
        /// 生成示例配置文件
        #[arg(long, value_name = "PATH")]
        generate: PathBuf,
    },
    /// 打印环境变量说明
    EnvDocs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref(), cli.no_color);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("错误: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> TranslationResult<ExitCode> {
    match &cli.command {
        Command::EnvDocs => {
            print!("{}", generate_env_docs());
            Ok(ExitCode::SUCCESS)
        }
        Command::Config { generate } => {
            ConfigManager::generate_example_config(generate)?;
            println!("已生成配置文件: {}", generate.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Translate { file } => {
            let config = load_config(&cli)?;
            translate_once(&config, file.as_ref()).await
        }
        Command::Watch => {
            let config = load_config(&cli)?;
            watch(&config).await
        }
    }
}

/// 加载配置并应用命令行参数
fn load_config(cli: &Cli) -> TranslationResult<TranslatorConfig> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::from_file(path)?,
        None => ConfigManager::new()?,
    };
    let mut config = manager.into_config();

    if let Some(source) = &cli.source {
        let lang = Language::lookup(source)
            .ok_or_else(|| helpers::validation_error(format!("不支持的源语言: {}", source)))?;
        config.source_lang = lang.code().to_string();
    }
    if let Some(target) = &cli.target {
        let lang = Language::lookup(target)
            .ok_or_else(|| helpers::validation_error(format!("不支持的目标语言: {}", target)))?;
        config.target_lang = lang.code().to_string();
    }
    if let Some(delay) = cli.delay {
        let delay = Duration::try_from_secs_f64(delay)
            .map_err(|e| helpers::validation_error(format!("延迟无效: {}", e)))?;
        config.debounce_delay_secs = clamp_delay(delay).as_secs_f64();
    }
    if let Some(max_chars) = cli.max_chars {
        config.max_chars = max_chars;
        config.api_chunk_size = config.api_chunk_size.min(max_chars);
    }

    config.validate()?;
    Ok(config)
}

/// 一次性翻译
async fn translate_once(
    config: &TranslatorConfig,
    file: Option<&PathBuf>,
) -> TranslationResult<ExitCode> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    let (text, truncated) = normalize_input(&raw, config.max_chars);
    if truncated {
        eprintln!(
            "{}",
            TranslationError::LimitExceeded {
                max_chars: config.max_chars
            }
        );
    }
    if text.is_empty() {
        eprintln!("{}", TranslationError::EmptyInput);
        return Ok(ExitCode::SUCCESS);
    }

    let backend = GoogleBackend::from_config(config)?;
    let dispatcher = Dispatcher::from_config(config)?;
    let request = TranslationRequest::new(config.languages()?, text, config.max_chars);
    let redraw = atty::is(atty::Stream::Stderr);

    let outcome = dispatcher
        .run(&request, &backend, &AtomicBool::new(false), |progress| {
            let status = SessionStatus::Translating {
                completed: progress.completed,
                total: progress.total,
            };
            if redraw {
                eprint!("\r{}", status);
            } else {
                eprintln!("{}", status);
            }
        })
        .await;
    if redraw {
        eprintln!();
    }

    match &outcome.status {
        RunStatus::Completed => {
            println!("{}", outcome.output().unwrap_or_default());
            Ok(ExitCode::SUCCESS)
        }
        RunStatus::Failed(e) => {
            eprintln!("翻译出错: {}", e);
            Ok(ExitCode::FAILURE)
        }
        _ => Ok(ExitCode::SUCCESS),
    }
}

/// 实时翻译
async fn watch(config: &TranslatorConfig) -> TranslationResult<ExitCode> {
    let backend = GoogleBackend::from_config(config)?;
    let (session, mut events) = TranslationSession::new(backend, config)?;
    let redraw = atty::is(atty::Stream::Stderr);

    let languages = session.languages();
    eprintln!(
        "{} -> {}，延迟 {:.1} 秒",
        languages.source.display_name(),
        languages.target.display_name(),
        session.delay().as_secs_f64()
    );

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            render(&event, redraw);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            ":quit" | ":q" => break,
            ":swap" => {
                session.swap_languages();
            }
            ":clear" => session.clear(),
            ":cancel" => {
                if !session.cancel() {
                    eprintln!("没有进行中的翻译");
                }
            }
            ":now" => {
                if session.translate_now().is_none() {
                    eprintln!("没有可翻译的内容或翻译进行中");
                }
            }
            ":copy" => match session.copyable_output() {
                Some(text) => println!("{}", text),
                None => eprintln!("没有可复制的内容"),
            },
            _ => {
                let update = session.on_input_changed(&line);
                tracing::debug!("{}", update.char_count_label());
            }
        }
    }

    // 等待最后一次自动翻译完成
    tokio::time::sleep(session.delay()).await;
    while session.is_in_flight() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    drop(session);
    let _ = tokio::time::timeout(Duration::from_secs(1), printer).await;

    Ok(ExitCode::SUCCESS)
}

fn render(event: &TranslationEvent, redraw: bool) {
    match event {
        TranslationEvent::Progress { .. } => {
            if let Some(status) = event.status() {
                if redraw {
                    eprint!("\r{}", status);
                } else {
                    eprintln!("{}", status);
                }
            }
        }
        TranslationEvent::Completed { text, .. } => {
            if redraw {
                eprintln!();
            }
            eprintln!("{}", SessionStatus::Completed);
            println!("{}", text);
        }
        TranslationEvent::Failed { message, .. } => {
            if redraw {
                eprintln!();
            }
            eprintln!("翻译出错: {}", message);
        }
        TranslationEvent::LimitExceeded { max_chars } => {
            eprintln!("{}", TranslationError::LimitExceeded { max_chars: *max_chars });
        }
        TranslationEvent::Swapped { languages } => {
            eprintln!(
                "{} -> {}",
                languages.source.display_name(),
                languages.target.display_name()
            );
        }
        other => {
            if let Some(status) = other.status() {
                eprintln!("{}", status);
            }
        }
    }
}
