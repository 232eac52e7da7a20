//! 翻译会话集成测试
//!
//! 防抖合并、单次飞行、取消后的过期结果过滤、语言交换、截断和清空

use std::time::Duration;

use live_translate::translation::{
    FnBackend, Language, LanguagePair, RunStatus, SessionStatus, TranslationError,
    TranslationEvent, TranslationResult, TranslationSession,
};
use tokio::time::sleep;

mod common {
    include!("common/mod.rs");
}

use common::{drain, test_config, ScriptedBackend};

/// 连续输入只触发一次翻译，使用最后的文本
#[tokio::test(start_paused = true)]
async fn test_rapid_edits_coalesce_into_one_run() {
    let backend = ScriptedBackend::new();
    let (session, mut events) =
        TranslationSession::new(backend.clone(), &test_config(4500, 50000)).unwrap();

    session.on_input_changed("h");
    sleep(Duration::from_millis(100)).await;
    session.on_input_changed("he");
    sleep(Duration::from_millis(100)).await;
    session.on_input_changed("hello");
    sleep(Duration::from_secs(1)).await;

    assert_eq!(backend.texts(), vec!["hello"]);
    assert_eq!(session.copyable_output().as_deref(), Some("HELLO"));
    assert_eq!(session.status(), SessionStatus::Completed);

    let events = drain(&mut events);
    let started = events
        .iter()
        .filter(|e| matches!(e, TranslationEvent::Started { .. }))
        .count();
    assert_eq!(started, 1);
    assert!(matches!(
        events.last(),
        Some(TranslationEvent::Completed { text, .. }) if text == "HELLO"
    ));
}

/// 一次运行的事件顺序：开始、进度、完成
#[tokio::test(start_paused = true)]
async fn test_run_event_sequence() {
    let backend = ScriptedBackend::new();
    let (session, mut events) =
        TranslationSession::new(backend.clone(), &test_config(5, 50000)).unwrap();

    session.on_input_changed("One. Two.");
    let handle = session.translate_now().expect("run dispatched");
    let run_id = handle.run_id;
    let outcome = handle.outcome().await;
    assert_eq!(outcome.status, RunStatus::Completed);

    let events: Vec<_> = drain(&mut events)
        .into_iter()
        .filter(|e| e.run_id() == Some(run_id))
        .collect();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0], TranslationEvent::Started { run_id });
    assert!(matches!(
        events[1],
        TranslationEvent::Progress { completed: 1, total: 2, .. }
    ));
    assert!(matches!(
        events[2],
        TranslationEvent::Progress { completed: 2, total: 2, .. }
    ));
    assert_eq!(
        events[3],
        TranslationEvent::Completed {
            run_id,
            text: "ONE. TWO.".to_string()
        }
    );
}

/// 运行进行中时新的请求被丢弃，不排队
#[tokio::test(start_paused = true)]
async fn test_trigger_while_in_flight_is_dropped() {
    let backend = ScriptedBackend::new().with_latency(Duration::from_secs(1));
    let (session, _events) =
        TranslationSession::new(backend.clone(), &test_config(4500, 50000)).unwrap();

    session.on_input_changed("first");
    let handle = session.translate_now().expect("run dispatched");
    assert!(session.is_in_flight());

    session.on_input_changed("second");
    assert!(session.translate_now().is_none());

    // 自动翻译在运行进行中触发，同样被丢弃
    handle.outcome().await;
    sleep(Duration::from_secs(2)).await;

    assert_eq!(backend.texts(), vec!["first"]);
    assert!(!session.is_in_flight());
    assert_eq!(session.copyable_output().as_deref(), Some("FIRST"));
}

/// 取消立即释放位置；旧运行之后完成的结果不会覆盖新运行
#[tokio::test(start_paused = true)]
async fn test_cancelled_run_results_are_ignored() {
    let backend = ScriptedBackend::new().with_latency(Duration::from_secs(1));
    let (session, mut events) =
        TranslationSession::new(backend.clone(), &test_config(4500, 50000)).unwrap();

    session.on_input_changed("first");
    let first = session.translate_now().expect("first run dispatched");
    let first_id = first.run_id;

    // 让第一个运行进入后端调用
    sleep(Duration::from_millis(10)).await;
    assert!(session.cancel());
    assert!(!session.is_in_flight());
    assert_eq!(session.status(), SessionStatus::Cancelled);

    session.on_input_changed("second");
    let second = session.translate_now().expect("slot freed by cancel");
    let second_id = second.run_id;
    assert_ne!(first_id, second_id);

    // 已提交的片段照常完成，但结果不再写入会话
    let first_outcome = first.outcome().await;
    assert_eq!(first_outcome.status, RunStatus::Completed);
    second.outcome().await;

    assert_eq!(session.copyable_output().as_deref(), Some("SECOND"));

    let events = drain(&mut events);
    assert!(events.contains(&TranslationEvent::Cancelled { run_id: first_id }));
    assert!(!events.iter().any(|e| {
        matches!(e, TranslationEvent::Completed { run_id, .. } | TranslationEvent::Progress { run_id, .. } if *run_id == first_id)
    }));
    assert!(events.contains(&TranslationEvent::Completed {
        run_id: second_id,
        text: "SECOND".to_string()
    }));
}

/// 后端 panic 时运行以内部错误结束，位置被释放，之后的翻译照常进行
#[tokio::test]
async fn test_panicking_backend_releases_slot() {
    let backend = FnBackend(
        |text: &str, _source: &str, _target: &str| -> TranslationResult<String> {
            if text == "boom" {
                panic!("backend exploded");
            }
            Ok(text.to_uppercase())
        },
    );
    let (session, mut events) = TranslationSession::new(backend, &test_config(4500, 50000)).unwrap();

    session.on_input_changed("boom");
    let handle = session.translate_now().expect("run dispatched");
    let run_id = handle.run_id;
    let outcome = handle.outcome().await;

    assert!(matches!(
        outcome.error(),
        Some(TranslationError::InternalError(_))
    ));
    assert!(!session.is_in_flight());
    assert_eq!(session.status(), SessionStatus::Failed);
    assert!(session
        .copyable_output()
        .is_some_and(|text| text.starts_with("翻译出错: ")));
    assert!(drain(&mut events).iter().any(|e| matches!(
        e,
        TranslationEvent::Failed { run_id: id, .. } if *id == run_id
    )));

    session.on_input_changed("hello");
    let handle = session.translate_now().expect("slot released after panic");
    assert_eq!(handle.outcome().await.output().as_deref(), Some("HELLO"));
    assert_eq!(session.copyable_output().as_deref(), Some("HELLO"));
}

/// 没有运行时取消不做任何事
#[tokio::test]
async fn test_cancel_without_run() {
    let (session, mut events) =
        TranslationSession::new(ScriptedBackend::new(), &test_config(4500, 50000)).unwrap();

    assert!(!session.cancel());
    assert!(drain(&mut events).is_empty());
}

/// 源语言为 auto 时交换：新源语言为旧目标语言，目标语言不变
#[tokio::test(start_paused = true)]
async fn test_swap_with_auto_source() {
    let backend = FnBackend(
        |text: &str, _source: &str, target: &str| -> TranslationResult<String> {
            Ok(format!("{}:{}\n", target, text))
        },
    );
    let (session, _events) = TranslationSession::new(backend, &test_config(4500, 50000)).unwrap();

    session.on_input_changed("hello");
    sleep(Duration::from_secs(1)).await;
    assert_eq!(session.snapshot().output, "en:hello\n");

    let swap = session.swap_languages();
    assert_eq!(
        swap.languages,
        LanguagePair::new(Language::English, Language::English)
    );
    // 旧输出去掉末尾换行成为输入，旧输入成为输出
    assert_eq!(swap.input.text, "en:hello");
    assert!(swap.input.scheduled);
    assert_eq!(swap.output, "hello");

    // 新输入照常自动翻译
    sleep(Duration::from_secs(1)).await;
    assert_eq!(session.copyable_output().as_deref(), Some("en:en:hello"));
    assert_eq!(session.languages(), swap.languages);
}

/// 源语言不是 auto 时正常交换
#[tokio::test(start_paused = true)]
async fn test_swap_exchanges_languages() {
    let backend = ScriptedBackend::new();
    let mut config = test_config(4500, 50000);
    config.source_lang = "ja".to_string();
    let (session, _events) = TranslationSession::new(backend.clone(), &config).unwrap();

    session.on_input_changed("konnichiwa");
    sleep(Duration::from_secs(1)).await;

    let swap = session.swap_languages();
    assert_eq!(
        swap.languages,
        LanguagePair::new(Language::English, Language::Japanese)
    );
    sleep(Duration::from_secs(1)).await;

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!((calls[0].source.as_str(), calls[0].target.as_str()), ("ja", "en"));
    assert_eq!(calls[1].text, "KONNICHIWA");
    assert_eq!((calls[1].source.as_str(), calls[1].target.as_str()), ("en", "ja"));
}

/// 语言变化只影响之后的运行
#[tokio::test(start_paused = true)]
async fn test_language_change_applies_to_next_run() {
    let backend = ScriptedBackend::new();
    let (session, _events) =
        TranslationSession::new(backend.clone(), &test_config(4500, 50000)).unwrap();

    session.on_input_changed("hello");
    sleep(Duration::from_secs(1)).await;
    session.set_languages(LanguagePair::new(Language::English, Language::French));
    session.on_input_changed("hello again");
    sleep(Duration::from_secs(1)).await;

    let targets: Vec<String> = backend.calls().into_iter().map(|c| c.target).collect();
    assert_eq!(targets, vec!["en", "fr"]);
}

/// 超过最大字符数的输入被截断并通知
#[tokio::test(start_paused = true)]
async fn test_input_over_limit_is_truncated() {
    let backend = ScriptedBackend::new();
    let (session, mut events) =
        TranslationSession::new(backend.clone(), &test_config(10, 10)).unwrap();

    let update = session.on_input_changed("abcdefghijklmno");
    assert!(update.truncated);
    assert_eq!(update.text, "abcdefghij");
    assert_eq!(update.char_count_label(), "字符数: 10/10");

    let first_events = drain(&mut events);
    assert_eq!(
        first_events.first(),
        Some(&TranslationEvent::LimitExceeded { max_chars: 10 })
    );

    sleep(Duration::from_secs(1)).await;
    assert_eq!(backend.texts(), vec!["abcdefghij"]);
}

/// 重试耗尽后输出区显示错误
#[tokio::test(start_paused = true)]
async fn test_failed_run_shows_error() {
    let backend = ScriptedBackend::new().always_fail("broken");
    let (session, mut events) =
        TranslationSession::new(backend.clone(), &test_config(4500, 50000)).unwrap();

    session.on_input_changed("broken");
    sleep(Duration::from_secs(10)).await;

    assert_eq!(backend.call_count("broken"), 3);
    assert_eq!(session.status(), SessionStatus::Failed);
    let output = session.copyable_output().unwrap_or_default();
    assert!(
        output.starts_with("翻译出错: 翻译片段 1 失败"),
        "output: {}",
        output
    );
    assert!(drain(&mut events)
        .iter()
        .any(|e| matches!(e, TranslationEvent::Failed { .. })));
    assert!(!session.is_in_flight());
}

/// 相同文本（忽略首尾空白）不会重新翻译
#[tokio::test(start_paused = true)]
async fn test_unchanged_input_is_not_retranslated() {
    let backend = ScriptedBackend::new();
    let (session, _events) =
        TranslationSession::new(backend.clone(), &test_config(4500, 50000)).unwrap();

    session.on_input_changed("hello");
    sleep(Duration::from_secs(1)).await;
    let update = session.on_input_changed("  hello \n");
    assert!(!update.scheduled);
    sleep(Duration::from_secs(1)).await;

    assert_eq!(backend.texts(), vec!["hello"]);
}

/// 清空后没有可复制的内容，同样的文本会再次翻译
#[tokio::test(start_paused = true)]
async fn test_clear_resets_session() {
    let backend = ScriptedBackend::new();
    let (session, mut events) =
        TranslationSession::new(backend.clone(), &test_config(4500, 50000)).unwrap();

    session.on_input_changed("hello");
    sleep(Duration::from_secs(1)).await;
    assert!(session.copyable_output().is_some());

    session.clear();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.input, "");
    assert_eq!(snapshot.output, "");
    assert_eq!(snapshot.status, SessionStatus::Ready);
    assert_eq!(snapshot.char_count_label(), "字符数: 0/50000");
    assert_eq!(session.copyable_output(), None);
    assert_eq!(drain(&mut events).last(), Some(&TranslationEvent::Cleared));

    assert!(session.on_input_changed("hello").scheduled);
    sleep(Duration::from_secs(1)).await;
    assert_eq!(backend.texts(), vec!["hello", "hello"]);
}

/// 空白输入不会派发运行
#[tokio::test(start_paused = true)]
async fn test_blank_input_never_dispatches() {
    let backend = ScriptedBackend::new();
    let (session, _events) =
        TranslationSession::new(backend.clone(), &test_config(4500, 50000)).unwrap();

    session.on_input_changed("   ");
    assert!(session.translate_now().is_none());
    sleep(Duration::from_secs(1)).await;

    assert!(backend.calls().is_empty());
    assert_eq!(session.copyable_output(), None);
}

/// 防抖延迟被限制在 0.1 到 2 秒之间
#[tokio::test]
async fn test_delay_is_clamped() {
    let (session, _events) =
        TranslationSession::new(ScriptedBackend::new(), &test_config(4500, 50000)).unwrap();

    assert_eq!(session.delay(), Duration::from_millis(500));
    assert_eq!(session.set_delay(Duration::from_secs(10)), Duration::from_secs(2));
    assert_eq!(
        session.set_delay(Duration::from_millis(1)),
        Duration::from_millis(100)
    );
}
