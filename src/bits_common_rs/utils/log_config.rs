//! ログ初期化
//! `env_logger` を設定のレベルで初期化する。`RUST_LOG` が設定されていればそちらを優先。

use std::env;

use log::LevelFilter;

use super::config_loader::LogConfig;

pub fn parse_level(level: &str) -> Result<LevelFilter, String> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::Trace),
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        _ => Err(format!("Invalid log level: {}", level)),
    }
}

/// ロガーを初期化する。`debug` が真なら設定より詳細な Debug レベルを使う。
/// 既に初期化済みの場合は何もしない。
pub fn init_logging(config: &LogConfig, debug: bool) -> Result<(), String> {
    let level = if debug { LevelFilter::Debug } else { parse_level(&config.level)? };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp_millis();
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    // テストなどで二重に初期化されても失敗扱いにしない
    let _ = builder.try_init();
    Ok(())
}
