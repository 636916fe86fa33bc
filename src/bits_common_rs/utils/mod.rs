//! 入出力・設定・ログのユーティリティ

pub mod config_loader;
pub mod hex_input;
pub mod log_config;
